//! 访问守卫
//!
//! 每个受保护页面挂载前运行一次：检查会话 → 拉取当前用户 → 校验角色。
//! 只有守卫能产出 `Access`，而所有受保护的控制器都要求传入 `&Access`，
//! 因此角色不符时不可能发出任何受限请求。

use crate::route::AppRoute;
use crate::services::AuthService;
use repairhub_shared::{Role, User};
use std::cell::{Cell, RefCell};

/// 允许访问的角色集合；空集合表示任何已登录角色
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn only(roles: &[Role]) -> Self {
        Self {
            roles: roles.to_vec(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

/// 通过守卫后的访问凭证
#[derive(Debug, Clone, PartialEq)]
pub struct Access {
    user: User,
}

impl Access {
    pub(crate) fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateState {
    Checking,
    Ready(Access),
    Redirected(AppRoute),
}

impl GateState {
    pub fn access(&self) -> Option<&Access> {
        match self {
            GateState::Ready(access) => Some(access),
            _ => None,
        }
    }

    pub fn redirect(&self) -> Option<&AppRoute> {
        match self {
            GateState::Redirected(route) => Some(route),
            _ => None,
        }
    }
}

pub struct AccessGate {
    roles: RoleSet,
    started: Cell<bool>,
    /// 所属页面已经卸载
    dismissed: Cell<bool>,
    state: RefCell<GateState>,
}

impl AccessGate {
    pub fn new(roles: RoleSet) -> Self {
        Self {
            roles,
            started: Cell::new(false),
            dismissed: Cell::new(false),
            state: RefCell::new(GateState::Checking),
        }
    }

    pub fn for_route(route: &AppRoute) -> Self {
        Self::new(RoleSet::only(route.required_roles()))
    }

    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// 页面卸载时调用，之后到达的守卫结果一律丢弃
    pub fn dismiss(&self) {
        self.dismissed.set(true);
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed.get()
    }

    /// 只执行一次；重复调用直接返回当前状态，不发请求
    ///
    /// 结果到达时页面已卸载则不跳转、不清会话，状态停留在 `Checking`。
    pub async fn run(&self, auth: &AuthService) -> GateState {
        if self.started.replace(true) {
            return self.state();
        }

        let next = self.evaluate(auth).await;
        if self.is_dismissed() {
            tracing::debug!("access gate finished after unmount, dropping result");
            return self.state();
        }
        if next.redirect() == Some(&AppRoute::auth_failure_redirect()) {
            auth.session().clear();
        }
        match &next {
            GateState::Ready(access) => {
                tracing::info!("access granted to {}", access.role())
            }
            GateState::Redirected(route) => tracing::info!("access gate redirecting to {}", route),
            GateState::Checking => {}
        }
        *self.state.borrow_mut() = next.clone();
        next
    }

    async fn evaluate(&self, auth: &AuthService) -> GateState {
        let session = auth.session();
        if !session.has_session() {
            return GateState::Redirected(AppRoute::auth_failure_redirect());
        }

        match auth.current_user().await.into_result() {
            Err(e) => {
                tracing::warn!("could not load current user: {}", e);
                GateState::Redirected(AppRoute::auth_failure_redirect())
            }
            Ok(user) if !self.roles.allows(user.role) => GateState::Redirected(AppRoute::home()),
            Ok(user) => GateState::Ready(Access::new(user)),
        }
    }
}
