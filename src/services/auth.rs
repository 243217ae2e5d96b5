use crate::api::{ApiClient, ApiResponse};
use crate::error::ClientResult;
use crate::session::Session;
use repairhub_shared::protocol::{CurrentUser, Logout};
use repairhub_shared::{Credentials, SignupProfile, User};

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// 登录成功后保存 token
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let auth = self
            .api
            .send(&credentials)
            .await
            .map_err(|e| e.in_op("auth.login"))?;
        self.session().establish(&auth.token);
        tracing::info!("signed in as {} ({})", auth.user.email, auth.user.role);
        Ok(auth.user)
    }

    pub async fn signup(&self, profile: &SignupProfile) -> ClientResult<User> {
        let auth = self
            .api
            .send(profile)
            .await
            .map_err(|e| e.in_op("auth.signup"))?;
        self.session().establish(&auth.token);
        tracing::info!("registered {} as {}", auth.user.email, auth.user.role);
        Ok(auth.user)
    }

    /// 无论服务端是否成功，本地会话都会被清除
    pub async fn logout(&self) -> ClientResult<()> {
        let result = if self.session().has_session() {
            self.api.send(&Logout).await.map(|_| ())
        } else {
            Ok(())
        };
        self.session().clear();
        result.map_err(|e| e.in_op("auth.logout"))
    }

    pub async fn current_user(&self) -> ApiResponse<User> {
        self.api.fetch(&CurrentUser).await
    }
}
