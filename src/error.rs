use std::fmt;

use crate::request::HttpError;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
/// 对应界面上的不同处理方式（重定向、内联提示、静默降级）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401: 无会话或会话失效 → 清除会话并跳转登录
    Unauthenticated,
    /// 403: 已登录但角色不符 → 跳转到角色首页
    Forbidden,
    /// 客户端校验失败，请求未发出
    Validation,
    /// 服务端返回失败（非 2xx 或 `success: false`）
    Request,
    /// 网络层失败（连接、超时等）
    Transport,
    /// 响应不符合 `{ success, data }` 约定
    Decode,
    /// 已有一个提交在进行中
    Busy,
}

impl ErrorKind {
    /// 获取机器可读的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Validation => "VALIDATION_FAILED",
            ErrorKind::Request => "REQUEST_FAILED",
            ErrorKind::Transport => "NETWORK_ERROR",
            ErrorKind::Decode => "UNEXPECTED_RESPONSE",
            ErrorKind::Busy => "SUBMISSION_IN_FLIGHT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
/// 记录错误发生时的操作和相关细节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "vehicles.delete", "api.send"
    pub operation: String,
    /// 额外的细节信息，如请求路径、实体 id 等
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - kind: 错误类型/语义
/// - message: 可直接展示给用户的消息
/// - status: 服务端 HTTP 状态码（如有）
/// - field: 校验失败时出错的表单字段
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone, PartialEq)]
pub struct ClientError {
    pub kind: ErrorKind,
    pub message: String,
    status: Option<u16>,
    field: Option<&'static str>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            field: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthenticated, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Request, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    pub fn busy() -> Self {
        Self::new(ErrorKind::Busy, "Another request is still in progress")
    }

    // --- Context builders ---

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_auth_failure(&self) -> bool {
        self.kind == ErrorKind::Unauthenticated
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 客户端校验错误
// =========================================================

/// 表单校验失败，内联显示在对应字段旁
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("Message must be at least {min} characters")]
    MessageTooShort { min: usize },
    #[error("VIN must be exactly {expected} characters")]
    VinLength { expected: usize },
    #[error("Estimated cost cannot be negative")]
    NegativeCost,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Year must be between {min} and {max}")]
    YearOutOfRange { min: i32, max: i32 },
    #[error("Start date must be on or before end date")]
    InvalidDateRange,
    #[error("This request already has an accepted proposal")]
    ProposalAlreadyAccepted,
    #[error("This proposal has already been {status}")]
    ProposalResolved { status: &'static str },
}

impl ValidationError {
    /// 出错的表单字段名
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Required { field } => *field,
            ValidationError::MessageTooShort { .. } => "message",
            ValidationError::VinLength { .. } => "vin",
            ValidationError::NegativeCost => "estimated_cost",
            ValidationError::PasswordMismatch => "confirm_password",
            ValidationError::PasswordTooShort { .. } => "password",
            ValidationError::InvalidEmail => "email",
            ValidationError::YearOutOfRange { .. } => "year",
            ValidationError::InvalidDateRange => "start",
            ValidationError::ProposalAlreadyAccepted | ValidationError::ProposalResolved { .. } => {
                "proposal"
            }
        }
    }
}

/// 按表单顺序找出第一个未通过 `validator` 规则的字段
pub(crate) fn first_invalid(
    report: &validator::ValidationErrors,
    order: &[&'static str],
) -> Option<&'static str> {
    let failed = report.field_errors();
    order.iter().copied().find(|field| failed.contains_key(field))
}

// =========================================================
// 类型转换实现
// =========================================================

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        let field = e.field();
        let mut err = ClientError::new(ErrorKind::Validation, e.to_string());
        err.field = Some(field);
        err
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        ClientError::transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string())
    }
}
