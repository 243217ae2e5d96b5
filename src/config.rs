use serde::Deserialize;
use std::time::Duration;

// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果环境变量 (或 .env) 中没有定义，则使用这些值
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_KEY: &str = "repairhub_token";
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;
pub const DEFAULT_LEAD_LIMIT: u32 = 20;

pub const ENV_API_URL: &str = "REPAIRHUB_API_URL";
pub const ENV_TOKEN_KEY: &str = "REPAIRHUB_TOKEN_KEY";
pub const ENV_NOTICE_TTL_MS: &str = "REPAIRHUB_NOTICE_TTL_MS";
pub const ENV_LEAD_LIMIT: &str = "REPAIRHUB_LEAD_LIMIT";
pub const ENV_TIMEOUT_SECS: &str = "REPAIRHUB_TIMEOUT_SECS";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_notice_ttl_ms() -> u64 {
    DEFAULT_NOTICE_TTL_MS
}

fn default_lead_limit() -> u32 {
    DEFAULT_LEAD_LIMIT
}

/// 客户端配置
/// 负责读取环境变量，实现配置解耦
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    api_base_url: String,
    #[serde(default = "default_token_key")]
    pub token_storage_key: String,
    #[serde(default = "default_notice_ttl_ms")]
    notice_ttl_ms: u64,
    #[serde(default = "default_lead_limit")]
    pub lead_page_size: u32,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            token_storage_key: default_token_key(),
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
            lead_page_size: DEFAULT_LEAD_LIMIT,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// 先加载 .env (不存在也没关系)，再读进程环境变量
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("no .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key → value 查找函数构建
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            // 尝试读取 REPAIRHUB_API_URL，读不到就用默认值
            api_base_url: lookup(ENV_API_URL)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),

            token_storage_key: lookup(ENV_TOKEN_KEY)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.token_storage_key),

            notice_ttl_ms: parse_or(&lookup, ENV_NOTICE_TTL_MS, defaults.notice_ttl_ms),

            lead_page_size: parse_or(&lookup, ENV_LEAD_LIMIT, defaults.lead_page_size),

            request_timeout_secs: lookup(ENV_TIMEOUT_SECS).and_then(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| tracing::warn!("ignoring invalid {}: {:?}", ENV_TIMEOUT_SECS, raw))
                    .ok()
            }),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// 去掉末尾 `/` 的 API 根地址
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("invalid {}: {:?}, using default {:?}", key, raw, default);
            default
        }),
    }
}
