//! 店主的线索面板：紧急程度筛选、提交报价、查看线索图片

use crate::auth::use_app;
use crate::components::feedback::{EmptyState, FieldError, SubmissionFeedback, SubmitButton, render_list};
use crate::components::format::{optional, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::lightbox::LightboxView;
use crate::components::page::Page;
use crate::web::router::use_router;
use leptos::prelude::*;
use repairhub::controller::{LeadsController, UrgencyFilter};
use repairhub::gate::Access;
use repairhub::route::AppRoute;
use repairhub::shared::{ProposalDraft, RepairLead, Urgency};

const PROPOSAL_FIELDS: &[&str] = &["message", "estimated_cost"];

#[component]
pub fn LeadsPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let router = use_router();
    let page = Page::mount(LeadsController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let submission = Signal::derive(move || page.state().leads.submission);
    let lightbox = Signal::derive(move || page.state().lightbox);

    let tab = move |label: &'static str, filter: UrgencyFilter| {
        let active = move || page.state().filter == filter;
        view! {
            <a
                role="tab"
                class=move || if active() { "tab tab-active" } else { "tab" }
                on:click=move |_| page.act(|c| c.set_filter(filter))
            >
                {label}
            </a>
        }
    };
    let tabs = std::iter::once(tab("All", UrgencyFilter::All))
        .chain(Urgency::ALL.into_iter().map(|u| tab(u.as_str(), UrgencyFilter::Only(u))))
        .collect_view();

    let body = move || {
        if page.state().shop_missing {
            return view! {
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body items-center text-center">
                        <p>"You need a shop profile before you can respond to leads."</p>
                        <button class="btn btn-primary" on:click=move |_| router.navigate_to(AppRoute::ShopSetup)>
                            "Create shop"
                        </button>
                    </div>
                </div>
            }
            .into_any();
        }
        let list = render_list(page.read(|c| c.view()), "leads", move |lead| {
            view! { <LeadCard lead=lead page=page /> }
        });
        view! { <div class="grid gap-4 lg:grid-cols-2">{list}</div> }.into_any()
    };

    view! {
        <DashboardShell access=access>
            <SubmissionFeedback submission=submission inline=PROPOSAL_FIELDS />
            <div role="tablist" class="tabs tabs-boxed w-fit capitalize">{tabs}</div>
            {body}
            {move || {
                page.state()
                    .proposing_for
                    .map(|lead_id| view! { <ProposalForm lead_id=lead_id page=page /> })
            }}
            <LightboxView
                lightbox=lightbox
                on_prev=Callback::new(move |_| page.act(|c| c.prev_image()))
                on_next=Callback::new(move |_| page.act(|c| c.next_image()))
                on_close=Callback::new(move |_| page.act(|c| c.close_images()))
            />
        </DashboardShell>
    }
}

#[component]
fn LeadCard(lead: RepairLead, page: Page<LeadsController>) -> impl IntoView {
    let id = StoredValue::new(lead.id.clone());
    let vehicle = lead
        .vehicle
        .as_ref()
        .map(|v| format!("{} {} {}", v.year, v.make, v.model));
    let thumbs = lead
        .images
        .iter()
        .enumerate()
        .map(|(index, src)| {
            view! {
                <img
                    src=src.clone()
                    class="h-16 w-16 rounded object-cover cursor-pointer"
                    on:click=move |_| page.act(|c| c.open_images(&id.get_value(), index))
                />
            }
        })
        .collect_view();

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-start justify-between gap-2">
                    <h3 class="card-title">{lead.title.clone()}</h3>
                    <span class=lead.urgency.badge()>{lead.urgency.as_str()}</span>
                </div>
                <p class="text-sm text-base-content/60">{or_dash(vehicle.as_deref())}</p>
                <p>{lead.description.clone()}</p>
                <div class="flex gap-2 flex-wrap">{thumbs}</div>
                <div class="card-actions justify-between items-center mt-2">
                    <span class="text-sm text-base-content/60">
                        {format!("{} proposals", lead.proposal_count)}
                    </span>
                    <button
                        class="btn btn-sm btn-primary"
                        on:click=move |_| page.act(|c| c.open_proposal_form(&id.get_value()))
                    >
                        "Send proposal"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn ProposalForm(lead_id: String, page: Page<LeadsController>) -> impl IntoView {
    let submission = Signal::derive(move || page.state().leads.submission);
    let lead_id = StoredValue::new(lead_id);
    let (message, set_message) = signal(String::new());
    let (cost, set_cost) = signal(String::new());
    let (duration, set_duration) = signal(String::new());
    let (warranty, set_warranty) = signal(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = ProposalDraft {
            lead_id: lead_id.get_value(),
            message: message.get_untracked(),
            estimated_cost: cost.get_untracked().trim().parse().unwrap_or_default(),
            estimated_duration: optional(duration.get_untracked()),
            warranty: optional(warranty.get_untracked()),
        };
        page.spawn(move |ctrl| async move {
            ctrl.submit_proposal(draft).await;
        });
    };

    let title = page.read(|c| {
        c.state()
            .leads
            .find(&lead_id.get_value())
            .map(|l| l.title.clone())
            .unwrap_or_default()
    });
    if title.is_empty() {
        return view! { <EmptyState message="This lead is no longer available" /> }.into_any();
    }

    view! {
        <div class="modal modal-open">
            <form class="modal-box" on:submit=on_submit>
                <h3 class="font-bold text-lg">{format!("Proposal for {}", title)}</h3>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Message"</span></label>
                    <textarea
                        class="textarea textarea-bordered h-28"
                        prop:value=message
                        on:input=move |ev| set_message.set(event_target_value(&ev))
                    ></textarea>
                    <FieldError submission=submission field="message" />
                </div>
                <div class="grid gap-2 md:grid-cols-3">
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Estimated cost"</span></label>
                        <input
                            type="number"
                            min="0"
                            step="0.01"
                            class="input input-bordered"
                            prop:value=cost
                            on:input=move |ev| set_cost.set(event_target_value(&ev))
                        />
                        <FieldError submission=submission field="estimated_cost" />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Duration"</span></label>
                        <input
                            class="input input-bordered"
                            placeholder="2 days"
                            prop:value=duration
                            on:input=move |ev| set_duration.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"Warranty"</span></label>
                        <input
                            class="input input-bordered"
                            placeholder="12 months"
                            prop:value=warranty
                            on:input=move |ev| set_warranty.set(event_target_value(&ev))
                        />
                    </div>
                </div>
                <div class="modal-action">
                    <button
                        type="button"
                        class="btn btn-ghost"
                        on:click=move |_| page.act(|c| c.close_proposal_form())
                    >
                        "Cancel"
                    </button>
                    <SubmitButton submission=submission idle="Submit proposal" busy="Submitting..." />
                </div>
            </form>
        </div>
    }
    .into_any()
}
