//! 控制面板外壳：按角色生成的侧边导航 + 页面标题 + 注销

use crate::auth::use_app;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use repairhub::gate::Access;
use repairhub::route::AppRoute;

#[component]
pub fn DashboardShell(access: Access, children: Children) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let current = router.current_route();

    let user = access.user().clone();
    let nav = AppRoute::navigation(access.role())
        .into_iter()
        .map(|route| {
            let title = route.title();
            let href = route.to_path();
            let target = route.clone();
            let active = move || current.get() == route;
            view! {
                <li>
                    <a
                        href=href
                        class=move || if active() { "active" } else { "" }
                        on:click=move |ev| {
                            ev.prevent_default();
                            router.navigate_to(target.clone());
                        }
                    >
                        {title}
                    </a>
                </li>
            }
        })
        .collect_view();

    let on_logout = move |_| {
        spawn_local(async move { app.logout().await });
    };

    view! {
        <div class="drawer lg:drawer-open min-h-screen bg-base-200">
            <input id="nav-drawer" type="checkbox" class="drawer-toggle" />
            <div class="drawer-content p-4 md:p-8">
                <div class="navbar bg-base-100 rounded-box shadow-sm mb-6">
                    <div class="flex-1">
                        <label for="nav-drawer" class="btn btn-ghost lg:hidden">"☰"</label>
                        <h1 class="text-xl font-bold px-2">{move || current.get().title()}</h1>
                    </div>
                    <div class="flex-none gap-2 items-center">
                        <span class="text-sm text-base-content/70 hidden sm:inline">
                            {user.name.clone()} " · " {user.role.label()}
                        </span>
                        <button class="btn btn-sm btn-ghost" on:click=on_logout>"Log out"</button>
                    </div>
                </div>
                <div class="max-w-7xl mx-auto space-y-6">{children()}</div>
            </div>
            <div class="drawer-side">
                <label for="nav-drawer" class="drawer-overlay"></label>
                <ul class="menu p-4 w-64 min-h-full bg-base-100">
                    <li class="menu-title text-lg text-primary">"RepairHub"</li>
                    {nav}
                </ul>
            </div>
        </div>
    }
}
