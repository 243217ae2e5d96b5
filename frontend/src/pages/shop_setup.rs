use crate::auth::use_app;
use crate::components::feedback::{FieldError, SubmissionFeedback, SubmitButton};
use crate::components::format::optional;
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use crate::web::router::use_router;
use leptos::prelude::*;
use repairhub::controller::ShopSetupController;
use repairhub::gate::Access;
use repairhub::shared::ShopDraft;

const SHOP_FIELDS: &[&str] = &["name", "address"];

#[derive(Debug, Clone, Default)]
struct ShopInput {
    name: String,
    address: String,
    city: String,
    phone: String,
    description: String,
    /// 逗号分隔
    specialities: String,
}

impl ShopInput {
    fn to_draft(&self) -> ShopDraft {
        ShopDraft {
            name: self.name.clone(),
            address: self.address.clone(),
            city: optional(self.city.clone()),
            phone: optional(self.phone.clone()),
            description: optional(self.description.clone()),
            specialities: self
                .specialities
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        }
    }
}

#[component]
pub fn ShopSetupPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let router = use_router();
    let page = Page::mount(ShopSetupController::new(&hub, &access), hub.config.notice_ttl());
    let submission = Signal::derive(move || page.state().submission);
    let input = RwSignal::new(ShopInput::default());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = input.get_untracked().to_draft();
        page.spawn(move |ctrl| async move {
            if let Some(next) = ctrl.create(draft).await {
                router.navigate_to(next);
            }
        });
    };

    let field = move |id: &'static str, label: &'static str, slot: fn(&mut ShopInput) -> &mut String| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    class="input input-bordered"
                    on:input=move |ev| input.update(|i| *slot(i) = event_target_value(&ev))
                />
                <FieldError submission=submission field=id />
            </div>
        }
    };

    view! {
        <DashboardShell access=access>
            <SubmissionFeedback submission=submission inline=SHOP_FIELDS />
            <form class="card bg-base-100 shadow-sm max-w-2xl" on:submit=on_submit>
                <div class="card-body">
                    <h2 class="card-title">"Tell customers about your shop"</h2>
                    {field("name", "Shop name", |i| &mut i.name)}
                    {field("address", "Street address", |i| &mut i.address)}
                    <div class="grid gap-2 md:grid-cols-2">
                        {field("city", "City", |i| &mut i.city)}
                        {field("phone", "Phone", |i| &mut i.phone)}
                    </div>
                    {field("specialities", "Specialities (comma separated)", |i| &mut i.specialities)}
                    <div class="form-control">
                        <label class="label" for="description">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="description"
                            class="textarea textarea-bordered"
                            on:input=move |ev| input.update(|i| i.description = event_target_value(&ev))
                        ></textarea>
                    </div>
                    <div class="card-actions justify-end">
                        <SubmitButton submission=submission idle="Create shop" busy="Creating..." />
                    </div>
                </div>
            </form>
        </DashboardShell>
    }
}
