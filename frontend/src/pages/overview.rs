use crate::auth::use_app;
use crate::components::feedback::{EmptyState, Spinner};
use crate::components::format::{mileage, money};
use crate::components::layout::DashboardShell;
use crate::components::page::Page;
use crate::web::router::use_router;
use leptos::prelude::*;
use repairhub::controller::{CarOwnerOverview, Overview, OverviewController, ShopOwnerOverview};
use repairhub::gate::Access;
use repairhub::route::AppRoute;
use repairhub::shared::{ProposalStatus, User};

#[component]
fn StatCard(title: &'static str, #[prop(into)] value: String) -> impl IntoView {
    view! {
        <div class="stat bg-base-100 rounded-box shadow-sm">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-2xl">{value}</div>
        </div>
    }
}

#[component]
pub fn OverviewPage(access: Access) -> impl IntoView {
    let hub = use_app().hub();
    let page = Page::mount(OverviewController::new(&hub, &access), hub.config.notice_ttl());
    page.spawn(|ctrl| async move {
        ctrl.load().await;
    });
    let greeting = format!("Welcome back, {}", page.read(|c| c.user().name.clone()));

    view! {
        <DashboardShell access=access>
            <h2 class="text-2xl font-semibold">{greeting}</h2>
            {move || match page.state() {
                Overview::Loading => view! { <Spinner /> }.into_any(),
                Overview::CarOwner(data) => car_owner(data).into_any(),
                Overview::ShopOwner(data) => shop_owner(data).into_any(),
                Overview::ShopSetupRequired => view! { <SetupPrompt /> }.into_any(),
                Overview::InsuranceCompany(user) => insurance(user).into_any(),
                Overview::Unavailable => {
                    view! { <EmptyState message="Dashboard data is unavailable right now. Please try again later." /> }
                        .into_any()
                }
            }}
        </DashboardShell>
    }
}

fn car_owner(data: CarOwnerOverview) -> impl IntoView {
    let stats = data.stats.clone().unwrap_or_default();
    let primary = data.primary_vehicle().cloned().map(|v| {
        view! {
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h3 class="card-title">"Primary vehicle"</h3>
                    <p class="text-lg">{v.display_name()}</p>
                    <p class="text-sm text-base-content/60">
                        {format!("VIN {} · {}", v.vin, mileage(v.mileage))}
                    </p>
                </div>
            </div>
        }
    });
    let reminders = data
        .reminders
        .iter()
        .map(|r| {
            let due = r
                .due_date
                .clone()
                .or_else(|| r.due_mileage.map(|m| format!("{} mi", m)))
                .unwrap_or_default();
            view! {
                <li class="flex justify-between py-2">
                    <span>
                        {r.service_type.clone()}
                        <span class="text-base-content/60 ml-2">
                            {r.vehicle_name.clone().unwrap_or_default()}
                        </span>
                    </span>
                    <span class="badge badge-outline">{due}</span>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="stats stats-vertical md:stats-horizontal w-full gap-4 bg-transparent">
            <StatCard title="Vehicles" value=data.vehicles.len().to_string() />
            <StatCard title="Repairs" value=stats.total_repairs.to_string() />
            <StatCard title="Total spent" value=money(stats.total_cost) />
            <StatCard title="This year" value=money(stats.this_year_cost) />
        </div>
        {primary}
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <h3 class="card-title">"Upcoming service"</h3>
                <ul class="divide-y divide-base-200">{reminders}</ul>
            </div>
        </div>
    }
}

fn shop_owner(data: ShopOwnerOverview) -> impl IntoView {
    let router = use_router();
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <h3 class="card-title">{data.shop.name.clone()}</h3>
                <p class="text-base-content/60">{data.shop.address.clone()}</p>
            </div>
        </div>
        <div class="stats stats-vertical md:stats-horizontal w-full gap-4 bg-transparent">
            <StatCard title="Open leads" value=data.leads.len().to_string() />
            <StatCard title="Urgent" value=data.urgent_leads().to_string() />
            <StatCard title="Pending proposals" value=data.proposals_with(ProposalStatus::Pending).to_string() />
            <StatCard title="Accepted" value=data.proposals_with(ProposalStatus::Accepted).to_string() />
        </div>
        <button class="btn btn-primary w-fit" on:click=move |_| router.navigate_to(AppRoute::Leads)>
            "Browse leads"
        </button>
    }
}

fn insurance(user: User) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body">
                <h3 class="card-title">{user.name}</h3>
                <p class="text-base-content/70">
                    "Claims review tools are coming soon. Reports are available from the menu."
                </p>
            </div>
        </div>
    }
}

#[component]
fn SetupPrompt() -> impl IntoView {
    let router = use_router();
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body items-center text-center">
                <h3 class="card-title">"Set up your shop"</h3>
                <p class="text-base-content/70">
                    "Create your shop profile to start receiving repair leads."
                </p>
                <button class="btn btn-primary" on:click=move |_| router.navigate_to(AppRoute::ShopSetup)>
                    "Create shop"
                </button>
            </div>
        </div>
    }
}
