//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性（是否需要认证、允许的角色）。

use repairhub_shared::Role;
use std::fmt::Display;

const CAR_OWNER: &[Role] = &[Role::CarOwner];
const SHOP_OWNER: &[Role] = &[Role::ShopOwner];

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 注册/登录入口 (默认路由)
    #[default]
    Signup,
    /// 控制面板首页，所有角色共用
    Dashboard,
    Vehicles,
    VehicleDetail(String),
    Repairs,
    RepairDetail(String),
    Requests,
    RequestDetail(String),
    Diagnosis,
    /// 车主浏览维修店
    Shops,
    /// 店主自己的店铺
    Shop,
    ShopSetup,
    Leads,
    Proposals,
    Jobs,
    Customers,
    Reports,
    Settings,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["login"] | ["signup"] => Self::Signup,
            ["dashboard"] => Self::Dashboard,
            ["dashboard", "vehicles"] => Self::Vehicles,
            ["dashboard", "vehicles", id] => Self::VehicleDetail(id.to_string()),
            ["dashboard", "repairs"] => Self::Repairs,
            ["dashboard", "repairs", id] => Self::RepairDetail(id.to_string()),
            ["dashboard", "requests"] => Self::Requests,
            ["dashboard", "requests", id] => Self::RequestDetail(id.to_string()),
            ["dashboard", "diagnosis"] => Self::Diagnosis,
            ["dashboard", "shops"] => Self::Shops,
            ["dashboard", "shop"] => Self::Shop,
            ["dashboard", "shop", "setup"] => Self::ShopSetup,
            ["dashboard", "leads"] => Self::Leads,
            ["dashboard", "proposals"] => Self::Proposals,
            ["dashboard", "jobs"] => Self::Jobs,
            ["dashboard", "customers"] => Self::Customers,
            ["dashboard", "reports"] => Self::Reports,
            ["dashboard", "settings"] => Self::Settings,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Signup => "/signup".into(),
            Self::Dashboard => "/dashboard".into(),
            Self::Vehicles => "/dashboard/vehicles".into(),
            Self::VehicleDetail(id) => format!("/dashboard/vehicles/{}", id),
            Self::Repairs => "/dashboard/repairs".into(),
            Self::RepairDetail(id) => format!("/dashboard/repairs/{}", id),
            Self::Requests => "/dashboard/requests".into(),
            Self::RequestDetail(id) => format!("/dashboard/requests/{}", id),
            Self::Diagnosis => "/dashboard/diagnosis".into(),
            Self::Shops => "/dashboard/shops".into(),
            Self::Shop => "/dashboard/shop".into(),
            Self::ShopSetup => "/dashboard/shop/setup".into(),
            Self::Leads => "/dashboard/leads".into(),
            Self::Proposals => "/dashboard/proposals".into(),
            Self::Jobs => "/dashboard/jobs".into(),
            Self::Customers => "/dashboard/customers".into(),
            Self::Reports => "/dashboard/reports".into(),
            Self::Settings => "/dashboard/settings".into(),
            Self::NotFound => "/404".into(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Signup | Self::NotFound)
    }

    /// 允许访问的角色；空切片表示任何已登录角色
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            Self::Vehicles
            | Self::VehicleDetail(_)
            | Self::Repairs
            | Self::RepairDetail(_)
            | Self::Requests
            | Self::RequestDetail(_)
            | Self::Diagnosis
            | Self::Shops => CAR_OWNER,
            Self::Shop
            | Self::ShopSetup
            | Self::Leads
            | Self::Proposals
            | Self::Jobs
            | Self::Customers
            | Self::Reports => SHOP_OWNER,
            Self::Signup | Self::Dashboard | Self::Settings | Self::NotFound => &[],
        }
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Signup)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Signup
    }

    /// 获取认证成功或角色不符时的重定向目标
    pub fn home() -> Self {
        Self::Dashboard
    }

    /// 导航栏标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Signup => "Sign up",
            Self::Dashboard => "Overview",
            Self::Vehicles | Self::VehicleDetail(_) => "My Vehicles",
            Self::Repairs | Self::RepairDetail(_) => "Repair History",
            Self::Requests | Self::RequestDetail(_) => "Repair Requests",
            Self::Diagnosis => "AI Diagnosis",
            Self::Shops => "Find Shops",
            Self::Shop => "My Shop",
            Self::ShopSetup => "Shop Setup",
            Self::Leads => "Leads",
            Self::Proposals => "My Proposals",
            Self::Jobs => "Jobs",
            Self::Customers => "Customers",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
            Self::NotFound => "Not Found",
        }
    }

    /// 某个角色侧边栏中的导航项
    pub fn navigation(role: Role) -> Vec<AppRoute> {
        let mut items = vec![Self::Dashboard];
        items.extend(match role {
            Role::CarOwner => vec![
                Self::Vehicles,
                Self::Repairs,
                Self::Requests,
                Self::Diagnosis,
                Self::Shops,
            ],
            Role::ShopOwner => vec![
                Self::Shop,
                Self::Leads,
                Self::Proposals,
                Self::Jobs,
                Self::Customers,
                Self::Reports,
            ],
            Role::InsuranceCompany => Vec::new(),
        });
        items.push(Self::Settings);
        items
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip_for_detail_routes() {
        let route = AppRoute::from_path("/dashboard/requests/42/");
        assert_eq!(route, AppRoute::RequestDetail("42".into()));
        assert_eq!(route.to_path(), "/dashboard/requests/42");
        assert_eq!(AppRoute::from_path("/dashboard/shop/setup?x=1"), AppRoute::ShopSetup);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Signup);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Signup);
        assert_eq!(AppRoute::from_path("/admin"), AppRoute::NotFound);
    }

    #[test]
    fn test_role_requirements() {
        assert_eq!(AppRoute::Leads.required_roles(), &[Role::ShopOwner]);
        assert_eq!(AppRoute::Diagnosis.required_roles(), &[Role::CarOwner]);
        assert!(AppRoute::Dashboard.required_roles().is_empty());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(!AppRoute::Signup.requires_auth());
    }

    #[test]
    fn test_navigation_only_lists_permitted_routes() {
        for role in Role::ALL {
            for route in AppRoute::navigation(role) {
                let roles = route.required_roles();
                assert!(roles.is_empty() || roles.contains(&role), "{} for {}", route, role);
            }
        }
    }
}
