//! RepairHub 客户端核心
//!
//! 与界面框架无关的部分：会话、带类型的 API 服务、访问守卫以及各页面的视图状态控制器。
//! 展示层（`frontend/`）只负责把控制器快照渲染出来，并把用户意图转发回控制器。

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod gate;
pub mod request;
pub mod route;
pub mod services;
pub mod session;
pub mod view;

pub use repairhub_shared as shared;

use api::ApiClient;
use config::ClientConfig;
use request::HttpClient;
use services::Services;
use session::{Session, TokenStore};

/// 应用级句柄：配置 + 共享同一会话的服务集合
///
/// clone 开销很小，各页面控制器通过它拿到依赖。
#[derive(Clone)]
pub struct RepairHub {
    pub config: ClientConfig,
    pub services: Services,
}

impl RepairHub {
    pub fn new(config: ClientConfig, http: impl HttpClient + 'static, store: impl TokenStore + 'static) -> Self {
        let session = Session::new(store);
        let api = ApiClient::new(config.api_base_url(), http, session);
        Self {
            config,
            services: Services::new(api),
        }
    }

    /// 使用 reqwest 作为传输层，超时取自配置
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_reqwest(config: ClientConfig, store: impl TokenStore + 'static) -> Self {
        let http = request::ReqwestHttpClient::new(config.request_timeout());
        Self::new(config, http, store)
    }

    pub fn session(&self) -> &Session {
        self.services.session()
    }
}
