use super::{Submission, ViewCell, ViewController, mutate};
use crate::RepairHub;
use crate::error::{ValidationError, first_invalid};
use crate::route::AppRoute;
use repairhub_shared::{Credentials, Role, SignupProfile};
use validator::Validate;

pub const MIN_PASSWORD_LEN: usize = 8;

// =========================================================
// 登录 (Login)
// =========================================================

#[derive(Clone)]
pub struct LoginForm {
    hub: RepairHub,
    cell: ViewCell<Submission>,
}

impl ViewController for LoginForm {
    type State = Submission;

    fn cell(&self) -> &ViewCell<Submission> {
        &self.cell
    }
}

impl LoginForm {
    pub fn new(hub: &RepairHub) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(Submission::default()),
        }
    }

    /// 成功后返回要跳转的页面
    pub async fn submit(&self, email: &str, password: &str) -> Option<AppRoute> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        if let Err(report) = credentials.validate() {
            let error = match first_invalid(&report, &["email", "password"]) {
                Some("password") => ValidationError::Required { field: "password" },
                _ => ValidationError::InvalidEmail,
            };
            self.cell.apply(|s| s.reject(error));
            return None;
        }

        mutate(&self.cell, "auth.login", self.hub.services.auth.login(email, password)).await?;
        let ttl = self.hub.config.notice_ttl();
        self.cell
            .apply(|s| s.succeed("Signed in", ttl))
            .then(AppRoute::home)
    }
}

// =========================================================
// 注册 (Signup)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
    pub phone: String,
    pub address: String,
}

impl SignupInput {
    /// 校验后生成注册请求体；姓名和邮箱先去掉首尾空白
    pub fn to_profile(&self) -> Result<SignupProfile, ValidationError> {
        let trimmed = SignupInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        };
        if let Err(report) = trimmed.validate() {
            return Err(match first_invalid(&report, &["name", "email", "password"]) {
                Some("name") => ValidationError::Required { field: "name" },
                Some("password") => ValidationError::PasswordTooShort {
                    min: MIN_PASSWORD_LEN,
                },
                _ => ValidationError::InvalidEmail,
            });
        }
        if trimmed.password != trimmed.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let role = trimmed.role.ok_or(ValidationError::Required { field: "role" })?;

        let optional = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(SignupProfile {
            phone: optional(&trimmed.phone),
            address: optional(&trimmed.address),
            name: trimmed.name,
            email: trimmed.email,
            password: trimmed.password,
            role,
        })
    }
}

#[derive(Clone)]
pub struct SignupForm {
    hub: RepairHub,
    cell: ViewCell<Submission>,
}

impl ViewController for SignupForm {
    type State = Submission;

    fn cell(&self) -> &ViewCell<Submission> {
        &self.cell
    }
}

impl SignupForm {
    pub fn new(hub: &RepairHub) -> Self {
        Self {
            hub: hub.clone(),
            cell: ViewCell::new(Submission::default()),
        }
    }

    /// 注册成功即登录；店主接着去创建店铺
    pub async fn submit(&self, input: &SignupInput) -> Option<AppRoute> {
        let profile = match input.to_profile() {
            Ok(p) => p,
            Err(e) => {
                self.cell.apply(|s| s.reject(e));
                return None;
            }
        };

        let user = mutate(&self.cell, "auth.signup", self.hub.services.auth.signup(&profile)).await?;
        let ttl = self.hub.config.notice_ttl();
        let next = match user.role {
            Role::ShopOwner => AppRoute::ShopSetup,
            _ => AppRoute::home(),
        };
        self.cell
            .apply(|s| s.succeed("Account created", ttl))
            .then_some(next)
    }
}
