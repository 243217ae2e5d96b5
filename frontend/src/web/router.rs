//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 导航流程："监听 -> 验证 -> 访问守卫 -> 加载"。
//! 受保护的页面在挂载前先由 `AccessGate` 确认会话和角色，
//! 页面组件只有拿到 `Access` 后才会被创建。

use crate::auth::use_app;
use crate::components::feedback::Spinner;
use leptos::prelude::*;
use leptos::task::spawn_local;
use repairhub::gate::{Access, AccessGate, GateState};
use repairhub::route::AppRoute;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 用于重定向，不留下历史记录
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；认证状态以信号形式注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        Self {
            current_route: RwSignal::new(initial_route),
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.go(route, true);
    }

    /// 重定向：替换当前历史记录
    pub fn redirect(&self, route: AppRoute) {
        self.go(route, false);
    }

    /// 这里只检查是否登录；角色由页面挂载前的访问守卫检查
    fn go(&self, target: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();

        let target = if target.requires_auth() && !is_auth {
            tracing::info!("[Router] not signed in, redirecting from {}", target);
            AppRoute::auth_failure_redirect()
        } else if target.should_redirect_when_authenticated() && is_auth {
            AppRoute::home()
        } else {
            target
        };

        if use_push {
            push_history_state(&target.to_path());
        } else {
            replace_history_state(&target.to_path());
        }
        self.current_route.set(target);
    }

    /// 浏览器后退/前进时也执行守卫逻辑
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.go(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化（登录、登出、会话失效）时自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();

            if is_auth && route.should_redirect_when_authenticated() {
                router.go(AppRoute::home(), true);
            } else if !is_auth && route.requires_auth() {
                tracing::info!("[Router] session ended, redirecting to sign up");
                router.go(AppRoute::auth_failure_redirect(), true);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    // 首次加载也走一次守卫
    router.redirect(router.current_route.get_untracked());
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// 路由出口组件
///
/// 公开页面直接渲染；受保护页面先经过访问守卫。
#[component]
pub fn RouterOutlet(
    /// 公开页面的匹配函数
    public: fn(AppRoute) -> AnyView,
    /// 受保护页面的匹配函数，只有守卫放行后才会被调用
    protected: fn(AppRoute, Access) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let route = router.current_route().get();
        if route.requires_auth() {
            view! { <Guarded route=route render=protected /> }.into_any()
        } else {
            public(route)
        }
    }
}

/// 每次挂载执行一次访问守卫
#[component]
fn Guarded(route: AppRoute, render: fn(AppRoute, Access) -> AnyView) -> impl IntoView {
    let app = use_app();
    let router = use_router();
    let state = RwSignal::new(GateState::Checking);

    let gate = Rc::new(AccessGate::for_route(&route));
    let handle = StoredValue::new_local(gate.clone());
    on_cleanup(move || {
        let _ = handle.try_with_value(|g| g.dismiss());
    });

    spawn_local(async move {
        let next = gate.run(&app.hub().services.auth).await;
        // 守卫结束前页面可能已经被切走，迟到的结果不再跳转
        if gate.is_dismissed() {
            return;
        }
        if let GateState::Redirected(target) = &next {
            if *target == AppRoute::auth_failure_redirect() {
                app.signed_out();
            }
            router.redirect(target.clone());
        }
        let _ = state.try_set(next);
    });

    move || match state.get() {
        GateState::Ready(access) => render(route.clone(), access),
        GateState::Checking | GateState::Redirected(_) => view! { <Spinner /> }.into_any(),
    }
}
