//! 页面视图状态控制器
//!
//! 每个页面实例拥有自己的控制器，状态只在该实例的事件处理中被修改：
//! - 首次加载通过 `Lifetime::claim_first_load` 保证每次挂载只请求一次
//! - 卸载后到达的响应会被丢弃，不再写入状态
//! - 同一控制器同时最多只有一个写操作在进行 (`Submission::begin`)
//! - 并发读取各自更新自己那一部分状态

mod auth_forms;
mod diagnosis;
mod leads;
mod overview;
mod proposals;
mod repairs;
mod request_detail;
mod shop_setup;
mod vehicle_detail;
mod vehicles;

#[cfg(test)]
mod tests;

pub use auth_forms::{LoginForm, SignupForm, SignupInput};
pub use diagnosis::{ChatMessage, ChatRole, DiagnosisController, DiagnosisMode, DiagnosisState};
pub use leads::{LeadsController, LeadsState, UrgencyFilter};
pub use overview::{CarOwnerOverview, Overview, OverviewController, ShopOwnerOverview};
pub use proposals::{ProposalsController, ProposalsState, StatusFilter};
pub use repairs::{RepairFilter, RepairsController, RepairsState};
pub use request_detail::{RequestDetailController, RequestDetailState};
pub use shop_setup::{ShopSetupController, ShopSetupState};
pub use vehicle_detail::{VehicleDetailController, VehicleDetailState};
pub use vehicles::{VehicleSearch, VehiclesController, VehiclesState};

use crate::error::{ClientError, ClientResult, ValidationError};
use chrono::{DateTime, Utc};
use repairhub_shared::Entity;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

// =========================================================
// 生命周期 (Lifetime)
// =========================================================

/// 控制器实例的挂载生命周期
///
/// 守卫状态归属于实例本身，不同实例之间互不影响。
#[derive(Debug)]
pub struct Lifetime {
    first_load: Cell<bool>,
    alive: Cell<bool>,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self {
            first_load: Cell::new(false),
            alive: Cell::new(true),
        }
    }
}

impl Lifetime {
    /// 第一次调用返回 true，之后都返回 false
    pub fn claim_first_load(&self) -> bool {
        !self.first_load.replace(true)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn unmount(&self) {
        self.alive.set(false);
    }
}

// =========================================================
// 视图状态单元 (ViewCell)
// =========================================================

struct ViewInner<S> {
    state: RefCell<S>,
    lifetime: Lifetime,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

/// 页面状态容器，clone 后共享同一份状态
pub struct ViewCell<S> {
    inner: Rc<ViewInner<S>>,
}

impl<S> Clone for ViewCell<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Clone> ViewCell<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                state: RefCell::new(state),
                lifetime: Lifetime::default(),
                on_change: RefCell::new(None),
            }),
        }
    }

    /// 当前状态快照
    pub fn read(&self) -> S {
        self.inner.state.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// 修改状态；已卸载时丢弃并返回 `None`
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        if !self.is_alive() {
            return None;
        }
        let result = f(&mut self.inner.state.borrow_mut());
        let listener = self.inner.on_change.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
        Some(result)
    }

    pub fn apply(&self, f: impl FnOnce(&mut S)) -> bool {
        self.update(f).is_some()
    }

    /// 状态变化时的回调（展示层用来触发重新渲染）
    pub fn on_change(&self, f: impl Fn() + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(f));
    }

    pub fn lifetime(&self) -> &Lifetime {
        &self.inner.lifetime
    }

    pub fn claim_first_load(&self) -> bool {
        self.inner.lifetime.claim_first_load()
    }

    pub fn is_alive(&self) -> bool {
        self.inner.lifetime.is_alive()
    }

    pub fn unmount(&self) {
        self.inner.lifetime.unmount();
    }
}

/// 拥有一个 `ViewCell` 的页面控制器
///
/// 展示层只通过这个接口订阅状态变化并读取快照。
pub trait ViewController: Clone + 'static {
    type State: Clone + 'static;

    fn cell(&self) -> &ViewCell<Self::State>;

    fn state(&self) -> Self::State {
        self.cell().read()
    }
}

// =========================================================
// 提交状态 (Submission)
// =========================================================

/// 成功提示，超过 ttl 后不再显示
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub shown_at: DateTime<Utc>,
    ttl: Duration,
}

impl Notice {
    pub fn new(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            shown_at: Utc::now(),
            ttl,
        }
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());
        now < self.shown_at + ttl
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Utc::now())
    }
}

/// 表单/弹窗的提交状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub submitting: bool,
    pub error: Option<ClientError>,
    pub notice: Option<Notice>,
}

impl Submission {
    /// 已有提交在进行中时拒绝
    pub fn begin(&mut self) -> ClientResult<()> {
        if self.submitting {
            return Err(ClientError::busy());
        }
        self.submitting = true;
        self.error = None;
        self.notice = None;
        Ok(())
    }

    pub fn succeed(&mut self, text: impl Into<String>, ttl: Duration) {
        self.submitting = false;
        self.error = None;
        self.notice = Some(Notice::new(text, ttl));
    }

    pub fn fail(&mut self, error: ClientError) {
        self.submitting = false;
        self.error = Some(error);
    }

    /// 客户端校验失败，请求不会发出
    pub fn reject(&mut self, error: ValidationError) {
        self.error = Some(error.into());
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message())
    }

    /// 某个表单字段上的内联错误
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.field() == Some(field))
            .map(|e| e.message())
    }

    pub fn visible_notice(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.is_visible())
            .map(|n| n.text.as_str())
    }
}

/// 拥有提交状态的页面状态
pub trait Submits {
    fn submission(&mut self) -> &mut Submission;
}

impl Submits for Submission {
    fn submission(&mut self) -> &mut Submission {
        self
    }
}

/// 执行一次写操作
///
/// 1. 已有提交在进行中 → 不发请求，返回 `None`
/// 2. 等待结果；期间页面被卸载 → 丢弃结果
/// 3. 失败写入 `Submission::error`；成功把值交还调用方，由调用方更新实体并给出提示
pub(crate) async fn mutate<S, T, Fut>(cell: &ViewCell<S>, op: &str, fut: Fut) -> Option<T>
where
    S: Clone + Submits,
    Fut: Future<Output = ClientResult<T>>,
{
    match cell.update(|s| s.submission().begin()) {
        Some(Ok(())) => {}
        Some(Err(e)) => {
            tracing::debug!("{} skipped: {}", op, e);
            return None;
        }
        None => return None,
    }

    let result = fut.await;
    if !cell.is_alive() {
        tracing::debug!("{} finished after unmount, dropping result", op);
        return None;
    }

    match result {
        Ok(value) => {
            tracing::info!("{} succeeded", op);
            Some(value)
        }
        Err(e) => {
            tracing::error!("{} failed: {}", op, e);
            cell.apply(|s| s.submission().fail(e));
            None
        }
    }
}

// =========================================================
// 列表状态 (ListState)
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    pub entities: Vec<T>,
    /// 首次加载结束前为 true
    pub loading: bool,
    pub submission: Submission,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            loading: true,
            submission: Submission::default(),
        }
    }
}

impl<T> Submits for ListState<T> {
    fn submission(&mut self) -> &mut Submission {
        &mut self.submission
    }
}

impl<T: Entity> ListState<T> {
    /// 读取失败时保持为空，不显示错误横幅
    pub fn settle(&mut self, loaded: Option<Vec<T>>) {
        self.entities = loaded.unwrap_or_default();
        self.loading = false;
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn append(&mut self, entity: T) {
        self.entities.push(entity);
    }

    /// 用服务端返回的实体替换本地同 id 的实体
    pub fn replace(&mut self, entity: T) -> bool {
        match self.entities.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entities.len();
        self.entities.retain(|e| e.id() != id);
        self.entities.len() != before
    }
}

