//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并以此实现会话的 `TokenStore`。

use repairhub::session::TokenStore;

/// 本地存储操作封装
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// token 持久化在 LocalStorage 的指定键下，刷新页面后会话依然有效
pub struct LocalTokenStore {
    key: String,
}

impl LocalTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        BrowserStorage::get(&self.key).filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) {
        if !BrowserStorage::set(&self.key, token) {
            tracing::warn!("failed to persist session token");
        }
    }

    fn remove(&self) {
        BrowserStorage::delete(&self.key);
    }
}
