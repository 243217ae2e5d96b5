//! API 服务层
//!
//! 每个服务对应远端 API 的一组资源，共享同一个 `ApiClient`。
//! 读操作返回 `ApiResponse<T>`（失败不会中断并发的兄弟请求），
//! 写操作返回 `ClientResult<T>`（失败由表单内联展示）。

mod auth;
mod diagnosis;
mod repair;
mod shop;
mod vehicle;

pub use auth::AuthService;
pub use diagnosis::DiagnosisService;
pub use repair::RepairService;
pub use shop::ShopService;
pub use vehicle::VehicleService;

use crate::api::ApiClient;
use crate::session::Session;

/// 所有服务的集合，clone 后共享同一个客户端与会话
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub vehicles: VehicleService,
    pub shops: ShopService,
    pub repairs: RepairService,
    pub diagnosis: DiagnosisService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            vehicles: VehicleService::new(api.clone()),
            shops: ShopService::new(api.clone()),
            repairs: RepairService::new(api.clone()),
            diagnosis: DiagnosisService::new(api),
        }
    }

    pub fn session(&self) -> &Session {
        self.auth.session()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Services;
    use crate::api::ApiClient;
    use crate::request::MockHttpClient;
    use crate::session::{MemoryTokenStore, Session};
    use std::rc::Rc;

    pub const BASE: &str = "http://api.test";

    pub fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    /// 基于 MockHttpClient 的服务集合；`token` 为 None 时没有会话
    pub fn mock_services(token: Option<&str>) -> (Services, Rc<MockHttpClient>) {
        let mock = Rc::new(MockHttpClient::new());
        let session = match token {
            Some(t) => Session::new(MemoryTokenStore::with_token(t)),
            None => Session::in_memory(),
        };
        let api = ApiClient::new(BASE, mock.clone(), session);
        (Services::new(api), mock)
    }
}
