//! 认证服务
//!
//! 登录签发访问令牌；每次请求重新校验令牌并回查主体当前状态，
//! 账号被停用后下一次请求立即失效，即使令牌本身未过期。

use std::sync::Arc;

use cobalt_auth_core::TokenService;
use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use tracing::{info, instrument};

use crate::domain::user::{UserProfile, UserRepository};

/// 登录命令
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// 登录结果
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// 已认证主体
pub type AuthenticatedUser = UserProfile;

/// 认证服务
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// 用户登录
    ///
    /// 用户不存在与密码错误返回同一错误消息，不泄露账号是否存在。
    #[instrument(skip(self, cmd))]
    pub async fn login(&self, cmd: LoginCommand) -> AppResult<LoginResponse> {
        let user = self
            .users
            .find_by_username(&cmd.username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !user.password.verify(&cmd.password)? {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        if !user.is_enabled() {
            return Err(AppError::unauthorized("Account is disabled"));
        }

        let access_token = self.tokens.generate_access_token(&user.id)?;
        info!(user_id = %user.id, username = %user.username, "user logged in");

        Ok(LoginResponse {
            access_token,
            expires_in: self.tokens.expires_in(),
            user: user.profile(),
        })
    }

    /// 校验访问令牌并解析当前主体
    ///
    /// 主体状态每次都重新读取，不信任签发时刻的快照。
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.tokens.validate_access_token(token)?;
        let user_id: UserId = claims.user_id()?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        if !user.is_enabled() {
            return Err(AppError::unauthorized("Account is disabled"));
        }

        Ok(user.profile())
    }

    /// 用户登出（令牌由客户端丢弃）
    pub async fn logout(&self, user_id: &UserId) -> AppResult<()> {
        info!(user_id = %user_id, "user logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{HashedPassword, User, UserStatus};
    use crate::testing::MemStore;

    fn token_service() -> TokenService {
        TokenService::new(
            "test-secret",
            3600,
            "cobalt-admin".to_string(),
            "cobalt-admin".to_string(),
        )
    }

    fn service(store: &Arc<MemStore>) -> AuthService {
        AuthService::new(store.clone(), token_service())
    }

    fn user(username: &str, password: &str) -> User {
        User::new(
            username.to_string(),
            HashedPassword::from_plain(password).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_login_and_authenticate_round_trip() {
        let store = MemStore::new();
        let user_id = store.add_user(user("admin", "s3cret-pw"));

        let service = service(&store);
        let response = service
            .login(LoginCommand {
                username: "admin".to_string(),
                password: "s3cret-pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.id, user_id);
        assert_eq!(response.expires_in, 3600);

        let subject = service.authenticate(&response.access_token).await.unwrap();
        assert_eq!(subject.id, user_id);
        assert_eq!(subject.username, "admin");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_user_alike() {
        let store = MemStore::new();
        store.add_user(user("admin", "s3cret-pw"));
        let service = service(&store);

        let wrong = service
            .login(LoginCommand {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        let unknown = service
            .login(LoginCommand {
                username: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_rejects_disabled_account() {
        let store = MemStore::new();
        let mut disabled = user("admin", "s3cret-pw");
        disabled.status = UserStatus::Disabled;
        store.add_user(disabled);

        let err = service(&store)
            .login(LoginCommand {
                username: "admin".to_string(),
                password: "s3cret-pw".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_valid_token_for_disabled_account_is_rejected() {
        let store = MemStore::new();
        let user_id = store.add_user(user("admin", "s3cret-pw"));
        let service = service(&store);

        let response = service
            .login(LoginCommand {
                username: "admin".to_string(),
                password: "s3cret-pw".to_string(),
            })
            .await
            .unwrap();

        // 签发之后停用账号：令牌仍未过期，但下一次请求必须被拒绝
        {
            let mut users = store.users.lock().unwrap();
            users.get_mut(&user_id).unwrap().status = UserStatus::Disabled;
        }

        let err = service.authenticate(&response.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_rejected() {
        let store = MemStore::new();
        let user_id = store.add_user(user("admin", "s3cret-pw"));
        let service = service(&store);

        let response = service
            .login(LoginCommand {
                username: "admin".to_string(),
                password: "s3cret-pw".to_string(),
            })
            .await
            .unwrap();

        store.users.lock().unwrap().remove(&user_id);

        let err = service.authenticate(&response.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        let store = MemStore::new();

        let err = service(&store).authenticate("garbage.token").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
