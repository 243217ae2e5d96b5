use crate::auth::use_app;
use crate::components::feedback::{EmptyState, Spinner};
use crate::components::format::{mileage, money, or_dash};
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use leptos::prelude::*;
use repairhub::controller::VehicleDetailController;
use repairhub::gate::Access;

#[component]
pub fn VehicleDetailPage(access: Access, vehicle_id: String) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(
        VehicleDetailController::new(&hub, &access, &vehicle_id),
        hub.config.notice_ttl(),
    );
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });

    let body = move || {
        let state = page.state();
        if state.loading {
            return view! { <Spinner /> }.into_any();
        }
        let Some(vehicle) = state.vehicle else {
            return view! { <EmptyState message="Vehicle not found" /> }.into_any();
        };
        let stats = state.stats.unwrap_or_default();
        let repairs = page.read(|c| c.recent_repairs());
        let rows = if repairs.is_empty() {
            view! { <tr><td colspan="4" class="text-center text-base-content/60">"No repairs yet"</td></tr> }
                .into_any()
        } else {
            repairs
                .into_iter()
                .map(|r| {
                    view! {
                        <tr>
                            <td>{r.service_date}</td>
                            <td>{r.service_type}</td>
                            <td>{or_dash(r.shop_name.as_deref())}</td>
                            <td class="text-right">{money(r.cost)}</td>
                        </tr>
                    }
                })
                .collect_view()
                .into_any()
        };

        view! {
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h2 class="card-title text-2xl">{vehicle.display_name()}</h2>
                    <p class="font-mono">{vehicle.vin}</p>
                    <div class="grid grid-cols-2 md:grid-cols-4 gap-2 text-sm">
                        <span>"Color: " {or_dash(vehicle.color.as_deref())}</span>
                        <span>"Plate: " {or_dash(vehicle.license_plate.as_deref())}</span>
                        <span>"Trim: " {or_dash(vehicle.trim.as_deref())}</span>
                        <span>"Mileage: " {mileage(vehicle.mileage)}</span>
                    </div>
                </div>
            </div>
            <div class="stats stats-vertical md:stats-horizontal w-full shadow-sm">
                <div class="stat">
                    <div class="stat-title">"Repairs"</div>
                    <div class="stat-value text-2xl">{stats.repair_count}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Total cost"</div>
                    <div class="stat-value text-2xl">{money(stats.total_cost)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Average"</div>
                    <div class="stat-value text-2xl">{money(stats.average_cost)}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"Last service"</div>
                    <div class="stat-value text-lg">{or_dash(stats.last_service_date.as_deref())}</div>
                </div>
            </div>
            <div class="card bg-base-100 shadow-sm overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Date"</th>
                            <th>"Service"</th>
                            <th>"Shop"</th>
                            <th class="text-right">"Cost"</th>
                        </tr>
                    </thead>
                    <tbody>{rows}</tbody>
                </table>
            </div>
        }
        .into_any()
    };

    view! { <DashboardShell access=access>{body}</DashboardShell> }
}
