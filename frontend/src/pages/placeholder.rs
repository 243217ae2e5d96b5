//! 仍是静态内容的页面：浏览维修店、我的需求、工单、客户、报表、设置

use crate::components::layout::DashboardShell;
use leptos::prelude::*;
use repairhub::gate::Access;
use repairhub::route::AppRoute;

fn blurb(route: &AppRoute) -> &'static str {
    match route {
        AppRoute::Requests => "Post a repair request and compare proposals from nearby shops.",
        AppRoute::Shops => "Browse verified repair shops near you.",
        AppRoute::Shop => "Manage your shop profile, hours and specialities.",
        AppRoute::Jobs => "Track accepted jobs from intake to pickup.",
        AppRoute::Customers => "See the customers you have worked with.",
        AppRoute::Reports => "Claims and repair cost reports.",
        _ => "",
    }
}

#[component]
pub fn PlaceholderPage(access: Access, route: AppRoute) -> impl IntoView {
    let title = route.title();
    let text = blurb(&route);
    view! {
        <DashboardShell access=access>
            <div class="card bg-base-100 shadow-sm">
                <div class="card-body">
                    <h2 class="card-title">{title}</h2>
                    <p class="text-base-content/70">{text}</p>
                    <div class="badge badge-outline">"Coming soon"</div>
                </div>
            </div>
        </DashboardShell>
    }
}

/// 账户信息（只读）
#[component]
pub fn SettingsPage(access: Access) -> impl IntoView {
    let user = access.user().clone();
    let row = |label: &'static str, value: String| {
        view! {
            <tr>
                <th class="w-40">{label}</th>
                <td>{value}</td>
            </tr>
        }
    };
    view! {
        <DashboardShell access=access>
            <div class="card bg-base-100 shadow-sm max-w-2xl">
                <div class="card-body">
                    <h2 class="card-title">"Profile"</h2>
                    <table class="table">
                        <tbody>
                            {row("Name", user.name.clone())}
                            {row("Email", user.email.clone())}
                            {row("Role", user.role.label().to_string())}
                            {row("Phone", user.phone.clone().unwrap_or_default())}
                            {row("Address", user.address.clone().unwrap_or_default())}
                        </tbody>
                    </table>
                </div>
            </div>
        </DashboardShell>
    }
}
