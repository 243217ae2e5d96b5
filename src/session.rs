//! 会话模块
//!
//! 持有不透明的认证 token，本身没有任何业务逻辑。
//! `Session` 是唯一的数据源，以句柄形式注入到 API 客户端、访问守卫和各页面控制器中。

use std::cell::RefCell;
use std::rc::Rc;

/// token 的持久化后端
///
/// 浏览器里由 LocalStorage 实现，测试和原生环境使用 `MemoryTokenStore`。
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn remove(&self);
}

/// 纯内存存储
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RefCell::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.token.borrow_mut() = Some(token.to_string());
    }

    fn remove(&self) {
        *self.token.borrow_mut() = None;
    }
}

type Listener = Rc<dyn Fn()>;

struct SessionInner {
    store: Box<dyn TokenStore>,
    listeners: RefCell<Vec<Listener>>,
}

/// 会话句柄，clone 开销很小，所有 clone 共享同一份状态
#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

impl Session {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                store: Box::new(store),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    pub fn token(&self) -> Option<String> {
        self.inner.store.get().filter(|t| !t.is_empty())
    }

    pub fn has_session(&self) -> bool {
        self.token().is_some()
    }

    /// 登录/注册成功后保存 token
    pub fn establish(&self, token: &str) {
        self.inner.store.set(token);
    }

    /// 主动清除（例如注销），不触发失效通知
    pub fn clear(&self) {
        self.inner.store.remove();
    }

    /// 服务端拒绝了 token：清除并通知所有监听者
    pub fn invalidate(&self) {
        let had_token = self.has_session();
        self.clear();
        if had_token {
            tracing::info!("session invalidated");
        }

        // 先复制一份，监听者内部可能再次注册
        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    pub fn on_invalidate(&self, f: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(f));
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_session", &self.has_session())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_establish_and_clear() {
        let session = Session::in_memory();
        assert!(!session.has_session());

        session.establish("tok-1");
        let shared = session.clone();
        assert_eq!(shared.token().as_deref(), Some("tok-1"));

        shared.clear();
        assert!(!session.has_session());
    }

    #[test]
    fn test_invalidate_notifies_listeners() {
        let session = Session::new(MemoryTokenStore::with_token("stale"));
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        session.on_invalidate(move || counter.set(counter.get() + 1));

        session.clear();
        assert_eq!(fired.get(), 0);

        session.establish("stale");
        session.invalidate();
        assert!(!session.has_session());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_empty_token_is_no_session() {
        let session = Session::new(MemoryTokenStore::with_token(""));
        assert!(!session.has_session());
    }
}
