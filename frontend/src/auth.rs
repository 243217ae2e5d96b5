//! 应用上下文
//!
//! 持有 `RepairHub`（配置、会话与各服务），并把会话状态暴露为信号，
//! 路由服务通过注入的信号感知登录/登出，与会话实现解耦。

use crate::web::{FetchHttpClient, LocalTokenStore};
use leptos::prelude::*;
use repairhub::RepairHub;
use repairhub::config::{
    ClientConfig, ENV_API_URL, ENV_LEAD_LIMIT, ENV_NOTICE_TTL_MS, ENV_TIMEOUT_SECS, ENV_TOKEN_KEY,
};

/// 构建时注入的配置（trunk build 时的环境变量）
fn build_time_env(key: &str) -> Option<String> {
    let value = match key {
        ENV_API_URL => option_env!("REPAIRHUB_API_URL"),
        ENV_TOKEN_KEY => option_env!("REPAIRHUB_TOKEN_KEY"),
        ENV_NOTICE_TTL_MS => option_env!("REPAIRHUB_NOTICE_TTL_MS"),
        ENV_LEAD_LIMIT => option_env!("REPAIRHUB_LEAD_LIMIT"),
        ENV_TIMEOUT_SECS => option_env!("REPAIRHUB_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// 应用上下文
///
/// `RepairHub` 不是 `Send`，因此放在本地存储的 `StoredValue` 中；
/// 整个上下文是 `Copy`，可以在任意闭包中捕获。
#[derive(Clone, Copy)]
pub struct AppContext {
    hub: StoredValue<RepairHub, LocalStorage>,
    authenticated: RwSignal<bool>,
}

impl AppContext {
    pub fn new() -> Self {
        let config = ClientConfig::from_lookup(build_time_env);
        let store = LocalTokenStore::new(config.token_storage_key.clone());
        let hub = RepairHub::new(config, FetchHttpClient, store);

        let authenticated = RwSignal::new(hub.session().has_session());
        // API 返回 401 时会话失效，路由服务随之跳回登录页
        hub.session()
            .on_invalidate(move || authenticated.set(false));

        Self {
            hub: StoredValue::new_local(hub),
            authenticated,
        }
    }

    pub fn hub(&self) -> RepairHub {
        self.hub.get_value()
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.authenticated.into()
    }

    /// 登录或注册成功后调用
    pub fn signed_in(&self) {
        self.authenticated.set(true);
    }

    /// 守卫发现会话无效时调用
    pub fn signed_out(&self) {
        self.authenticated.set(false);
    }

    /// 注销：导航由路由服务的认证状态监听自动处理
    pub async fn logout(&self) {
        if let Err(e) = self.hub().services.auth.logout().await {
            tracing::warn!("logout call failed: {}", e);
        }
        self.signed_out();
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
