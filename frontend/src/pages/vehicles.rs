//! 车辆列表：搜索、添加、编辑、设为主车辆、删除

use crate::auth::use_app;
use crate::components::feedback::{FieldError, SubmissionFeedback, SubmitButton, render_list};
use crate::components::format::{mileage, money, optional, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use crate::web::dialog::confirm;
use crate::web::router::use_router;
use leptos::prelude::*;
use repairhub::controller::VehiclesController;
use repairhub::gate::Access;
use repairhub::route::AppRoute;
use repairhub::shared::{Vehicle, VehicleDraft, VehiclePatch};

const DRAFT_FIELDS: &[&str] = &["vin", "year", "make", "model"];

/// 表单输入保持字符串，提交时再转换
#[derive(Debug, Clone, Default)]
struct DraftInput {
    vin: String,
    year: String,
    make: String,
    model: String,
    trim: String,
    color: String,
    license_plate: String,
    mileage: String,
    is_primary: bool,
}

impl DraftInput {
    fn to_draft(&self) -> VehicleDraft {
        VehicleDraft {
            vin: self.vin.clone(),
            year: self.year.trim().parse().unwrap_or_default(),
            make: self.make.clone(),
            model: self.model.clone(),
            trim: optional(self.trim.clone()),
            color: optional(self.color.clone()),
            license_plate: optional(self.license_plate.clone()),
            mileage: self.mileage.trim().parse().ok(),
            is_primary: self.is_primary,
        }
    }
}

#[component]
pub fn VehiclesPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(VehiclesController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let submission = Signal::derive(move || page.state().list.submission);
    let (adding, set_adding) = signal(false);
    let editing = RwSignal::new(Option::<Vehicle>::None);

    let list = move || {
        render_list(page.read(|c| c.view()), "vehicles", move |vehicle| {
            view! { <VehicleCard vehicle=vehicle page=page editing=editing /> }
        })
    };

    view! {
        <DashboardShell access=access>
            <SubmissionFeedback submission=submission inline=DRAFT_FIELDS />
            <div class="flex flex-wrap gap-4 items-center justify-between">
                <input
                    type="search"
                    placeholder="Search by VIN, make, model or plate"
                    class="input input-bordered w-full md:w-96"
                    on:input=move |ev| page.act(|c| c.set_search(&event_target_value(&ev)))
                />
                <button class="btn btn-primary" on:click=move |_| set_adding.update(|a| *a = !*a)>
                    {move || if adding.get() { "Cancel" } else { "Add vehicle" }}
                </button>
            </div>
            <Show when=move || adding.get()>
                <AddVehicleForm page=page on_done=Callback::new(move |_| set_adding.set(false)) />
            </Show>
            {move || {
                editing
                    .get()
                    .map(|vehicle| {
                        view! {
                            <EditVehiclePanel
                                vehicle=vehicle
                                page=page
                                on_done=Callback::new(move |_| editing.set(None))
                            />
                        }
                    })
            }}
            <div class="grid gap-4 md:grid-cols-2 xl:grid-cols-3">{list}</div>
        </DashboardShell>
    }
}

#[component]
fn VehicleCard(
    vehicle: Vehicle,
    page: Page<VehiclesController>,
    editing: RwSignal<Option<Vehicle>>,
) -> impl IntoView {
    let router = use_router();
    let id = StoredValue::new(vehicle.id.clone());
    let title = vehicle.display_name();
    let edit_target = vehicle.clone();

    let on_delete = move |_| {
        let id = id.get_value();
        let confirmed = confirm("Delete this vehicle? Its repair history will no longer be linked.");
        page.spawn(move |ctrl| async move {
            ctrl.delete(&id, confirmed).await;
        });
    };
    let on_primary = move |_| {
        let id = id.get_value();
        page.spawn(move |ctrl| async move {
            ctrl.set_primary(&id).await;
        });
    };

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <div class="flex items-start justify-between">
                    <h3 class="card-title">{title}</h3>
                    {vehicle.is_primary.then(|| view! { <span class="badge badge-primary">"Primary"</span> })}
                </div>
                <p class="font-mono text-sm">{vehicle.vin.clone()}</p>
                <div class="grid grid-cols-2 gap-1 text-sm text-base-content/70">
                    <span>"Plate"</span>
                    <span>{or_dash(vehicle.license_plate.as_deref())}</span>
                    <span>"Mileage"</span>
                    <span>{mileage(vehicle.mileage)}</span>
                    <span>"Repairs"</span>
                    <span>{vehicle.repair_count}</span>
                    <span>"Spent"</span>
                    <span>{money(vehicle.total_repair_cost)}</span>
                </div>
                <div class="card-actions justify-end mt-2">
                    <button
                        class="btn btn-sm btn-ghost"
                        on:click=move |_| router.navigate_to(AppRoute::VehicleDetail(id.get_value()))
                    >
                        "Details"
                    </button>
                    {(!vehicle.is_primary)
                        .then(|| {
                            view! {
                                <button class="btn btn-sm btn-ghost" on:click=on_primary>
                                    "Set primary"
                                </button>
                            }
                        })}
                    <button
                        class="btn btn-sm btn-ghost"
                        on:click=move |_| editing.set(Some(edit_target.clone()))
                    >
                        "Edit"
                    </button>
                    <button class="btn btn-sm btn-error btn-outline" on:click=on_delete>
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn AddVehicleForm(page: Page<VehiclesController>, on_done: Callback<()>) -> impl IntoView {
    let submission = Signal::derive(move || page.state().list.submission);
    let input = RwSignal::new(DraftInput::default());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = input.get_untracked().to_draft();
        page.spawn(move |ctrl| async move {
            if ctrl.create(draft).await {
                on_done.run(());
            }
        });
    };

    let field = move |id: &'static str, label: &'static str, slot: fn(&mut DraftInput) -> &mut String| {
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
        <form class="card bg-base-100 shadow-sm" on:submit=on_submit>
            <div class="card-body">
                <h3 class="card-title">"New vehicle"</h3>
                <div class="grid gap-2 md:grid-cols-2">
                    {field("vin", "VIN", |i| &mut i.vin)}
                    {field("year", "Year", |i| &mut i.year)}
                    {field("make", "Make", |i| &mut i.make)}
                    {field("model", "Model", |i| &mut i.model)}
                    {field("trim", "Trim", |i| &mut i.trim)}
                    {field("color", "Color", |i| &mut i.color)}
                    {field("license_plate", "License plate", |i| &mut i.license_plate)}
                    {field("mileage", "Mileage", |i| &mut i.mileage)}
                </div>
                <label class="label cursor-pointer justify-start gap-2">
                    <input
                        type="checkbox"
                        class="checkbox checkbox-primary"
                        on:change=move |ev| input.update(|i| i.is_primary = event_target_checked(&ev))
                    />
                    <span class="label-text">"Make this my primary vehicle"</span>
                </label>
                <div class="card-actions justify-end">
                    <SubmitButton submission=submission idle="Save vehicle" busy="Saving..." />
                </div>
            </div>
        </form>
    }
}

#[component]
fn EditVehiclePanel(
    vehicle: Vehicle,
    page: Page<VehiclesController>,
    on_done: Callback<()>,
) -> impl IntoView {
    let submission = Signal::derive(move || page.state().list.submission);
    let id = StoredValue::new(vehicle.id.clone());
    let (miles, set_miles) = signal(vehicle.mileage.map(|m| m.to_string()).unwrap_or_default());
    let (color, set_color) = signal(vehicle.color.clone().unwrap_or_default());
    let (plate, set_plate) = signal(vehicle.license_plate.clone().unwrap_or_default());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let patch = VehiclePatch {
            mileage: miles.get_untracked().trim().parse().ok(),
            color: optional(color.get_untracked()),
            license_plate: optional(plate.get_untracked()),
            trim: None,
        };
        let id = id.get_value();
        page.spawn(move |ctrl| async move {
            if ctrl.update(&id, patch).await {
                on_done.run(());
            }
        });
    };

    view! {
        <div class="modal modal-open">
            <form class="modal-box" on:submit=on_submit>
                <h3 class="font-bold text-lg">{format!("Edit {}", vehicle.display_name())}</h3>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Mileage"</span></label>
                    <input
                        class="input input-bordered"
                        prop:value=miles
                        on:input=move |ev| set_miles.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"Color"</span></label>
                    <input
                        class="input input-bordered"
                        prop:value=color
                        on:input=move |ev| set_color.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">"License plate"</span></label>
                    <input
                        class="input input-bordered"
                        prop:value=plate
                        on:input=move |ev| set_plate.set(event_target_value(&ev))
                    />
                </div>
                <div class="modal-action">
                    <button type="button" class="btn btn-ghost" on:click=move |_| on_done.run(())>
                        "Cancel"
                    </button>
                    <SubmitButton submission=submission idle="Save" busy="Saving..." />
                </div>
            </form>
        </div>
    }
}
