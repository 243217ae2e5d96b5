//! RepairHub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `repairhub::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎），挂载页面前运行访问守卫
//! - `auth`: 应用上下文与认证状态
//! - `components`: 通用 UI 组件
//! - `pages`: 各页面，只负责渲染控制器快照并转发用户意图

mod auth;
mod components {
    pub mod feedback;
    pub mod format;
    pub mod layout;
    pub mod lightbox;
    pub mod page;
}
mod pages {
    pub mod auth;
    pub mod diagnosis;
    pub mod leads;
    pub mod overview;
    pub mod placeholder;
    pub mod proposals;
    pub mod repairs;
    pub mod request_detail;
    pub mod shop_setup;
    pub mod vehicle_detail;
    pub mod vehicles;
}

use crate::auth::AppContext;
use crate::pages::auth::AuthPage;
use crate::pages::diagnosis::DiagnosisPage;
use crate::pages::leads::LeadsPage;
use crate::pages::overview::OverviewPage;
use crate::pages::placeholder::{PlaceholderPage, SettingsPage};
use crate::pages::proposals::ProposalsPage;
use crate::pages::repairs::RepairsPage;
use crate::pages::request_detail::RequestDetailPage;
use crate::pages::shop_setup::ShopSetupPage;
use crate::pages::vehicle_detail::VehicleDetailPage;
use crate::pages::vehicles::VehiclesPage;

use leptos::prelude::*;
use repairhub::gate::Access;
use repairhub::route::AppRoute;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch、localStorage、history），
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod dialog;
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::LocalTokenStore;
}

use web::router::{Router, RouterOutlet};

fn not_found() -> AnyView {
    let router = web::router::use_router();
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <a
                    href="/dashboard"
                    class="btn btn-primary mt-6"
                    on:click=move |ev| {
                        ev.prevent_default();
                        router.navigate("/dashboard");
                    }
                >
                    "Back to dashboard"
                </a>
            </div>
        </div>
    }
    .into_any()
}

/// 公开页面的匹配函数
fn public_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Signup => view! { <AuthPage /> }.into_any(),
        _ => not_found(),
    }
}

/// 受保护页面的匹配函数
///
/// 只有访问守卫放行后才会被调用，`Access` 随之传给页面控制器。
fn protected_matcher(route: AppRoute, access: Access) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <OverviewPage access=access /> }.into_any(),
        AppRoute::Vehicles => view! { <VehiclesPage access=access /> }.into_any(),
        AppRoute::VehicleDetail(id) => {
            view! { <VehicleDetailPage access=access vehicle_id=id /> }.into_any()
        }
        AppRoute::Repairs => view! { <RepairsPage access=access /> }.into_any(),
        AppRoute::RepairDetail(id) => view! { <RepairsPage access=access open=id /> }.into_any(),
        AppRoute::RequestDetail(id) => {
            view! { <RequestDetailPage access=access lead_id=id /> }.into_any()
        }
        AppRoute::Diagnosis => view! { <DiagnosisPage access=access /> }.into_any(),
        AppRoute::ShopSetup => view! { <ShopSetupPage access=access /> }.into_any(),
        AppRoute::Leads => view! { <LeadsPage access=access /> }.into_any(),
        AppRoute::Proposals => view! { <ProposalsPage access=access /> }.into_any(),
        AppRoute::Settings => view! { <SettingsPage access=access /> }.into_any(),
        AppRoute::Signup | AppRoute::NotFound => not_found(),
        other => view! { <PlaceholderPage access=access route=other /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建应用上下文（配置、会话、服务）
    let app = AppContext::new();
    provide_context(app);

    // 2. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = app.is_authenticated_signal();

    view! {
        // 3. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet public=public_matcher protected=protected_matcher />
        </Router>
    }
}
