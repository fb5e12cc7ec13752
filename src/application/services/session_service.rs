use crate::application::ports::gateway::{AuthGateway, UserGateway};
use crate::application::ports::session_store::{
    SessionStore, KEY_ACCESS_TOKEN, KEY_TEST_LOGIN, KEY_USER_DATA,
};
use crate::domain::entities::User;
use crate::shared::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Debug, Clone, Default)]
struct SessionState {
    logged_in: bool,
    user: Option<User>,
}

/// ログイン状態と現在のユーザープロフィールを保持するストア。
///
/// ベアラートークンとプロフィールは `SessionStore` 経由で永続化され、
/// 再起動後も `restore` で復元できる。トークンの取得口は全コンポーネント
/// からここを通す。
pub struct SessionService {
    auth_gateway: Arc<dyn AuthGateway>,
    user_gateway: Arc<dyn UserGateway>,
    storage: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
}

impl SessionService {
    pub fn new(
        auth_gateway: Arc<dyn AuthGateway>,
        user_gateway: Arc<dyn UserGateway>,
        storage: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth_gateway,
            user_gateway,
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// 起動時に永続化済みセッションを復元する。
    /// プロフィールが壊れていたらセッションごと破棄する。
    pub async fn restore(&self) -> Result<()> {
        let token = self.storage.retrieve(KEY_ACCESS_TOKEN).await?;
        let user_data = self.storage.retrieve(KEY_USER_DATA).await?;

        if let (Some(_), Some(raw)) = (token, user_data) {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    let mut state = self.state.write().await;
                    state.logged_in = true;
                    state.user = Some(user);
                }
                Err(err) => {
                    warn!("cached profile is unreadable, dropping session: {err}");
                    self.storage.delete(KEY_ACCESS_TOKEN).await?;
                    self.storage.delete(KEY_USER_DATA).await?;
                }
            }
        }
        Ok(())
    }

    pub async fn is_logged_in(&self) -> bool {
        self.state.read().await.logged_in
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// 永続化済みのベアラートークン。
    pub async fn token(&self) -> Result<Option<String>> {
        Ok(self.storage.retrieve(KEY_ACCESS_TOKEN).await?)
    }

    /// トークン（と分かっていればプロフィール）を保存してログイン状態にし、
    /// 直後にサーバーから最新プロフィールを取得する。
    pub async fn login(&self, token: &str, user: Option<User>) -> Result<()> {
        self.storage.store(KEY_ACCESS_TOKEN, token).await?;
        if let Some(user) = &user {
            self.storage
                .store(KEY_USER_DATA, &serde_json::to_string(user)?)
                .await?;
        }

        {
            let mut state = self.state.write().await;
            state.logged_in = true;
            if user.is_some() {
                state.user = user;
            }
        }

        // プロフィール取得の失敗でログイン自体は巻き戻さない
        if let Err(err) = self.fetch_profile().await {
            warn!("profile fetch after login failed: {err}");
        }
        Ok(())
    }

    pub async fn sign_in_with_google(&self, id_token: &str) -> Result<User> {
        let response = self.auth_gateway.google_login(id_token).await?;
        self.login(&response.access_token, Some(response.user.clone()))
            .await?;
        Ok(response.user)
    }

    /// バックエンドのテストログイン。次回起動からモックゲートウェイが
    /// 選択されるよう、テストログインフラグも立てる。
    pub async fn sign_in_test(&self) -> Result<User> {
        let response = self.auth_gateway.test_login().await?;
        self.storage.store(KEY_TEST_LOGIN, "true").await?;
        self.login(&response.access_token, Some(response.user.clone()))
            .await?;
        Ok(response.user)
    }

    /// トークン・プロフィール・テストログインフラグをすべて破棄する。
    pub async fn logout(&self) -> Result<()> {
        self.storage.delete(KEY_ACCESS_TOKEN).await?;
        self.storage.delete(KEY_USER_DATA).await?;
        self.storage.delete(KEY_TEST_LOGIN).await?;

        let mut state = self.state.write().await;
        state.logged_in = false;
        state.user = None;
        Ok(())
    }

    /// サーバーから最新プロフィールを取得してキャッシュする。
    /// 取得できなければ認証切れとみなしてログアウトする。
    pub async fn fetch_profile(&self) -> Result<Option<User>> {
        if self.token().await?.is_none() {
            return Ok(None);
        }

        match self.user_gateway.me().await {
            Ok(user) => {
                self.storage
                    .store(KEY_USER_DATA, &serde_json::to_string(&user)?)
                    .await?;
                let mut state = self.state.write().await;
                state.logged_in = true;
                state.user = Some(user.clone());
                Ok(Some(user))
            }
            Err(err) => {
                warn!("profile fetch failed, dropping session: {err}");
                self.logout().await?;
                Err(err)
            }
        }
    }

    /// ニックネームをサーバーで変更し、成功したらキャッシュにも反映する。
    pub async fn update_nickname(&self, nickname: &str) -> Result<String> {
        let message = self.user_gateway.update_nickname(nickname).await?;

        let mut state = self.state.write().await;
        if let Some(user) = state.user.as_mut() {
            user.nickname = nickname.to_string();
            self.storage
                .store(KEY_USER_DATA, &serde_json::to_string(user)?)
                .await?;
        }
        Ok(message)
    }

    pub async fn is_test_login(&self) -> Result<bool> {
        let flag = self.storage.retrieve(KEY_TEST_LOGIN).await?;
        Ok(flag.as_deref() == Some("true"))
    }

    pub async fn set_test_login(&self, enabled: bool) -> Result<()> {
        if enabled {
            self.storage.store(KEY_TEST_LOGIN, "true").await?;
        } else {
            self.storage.delete(KEY_TEST_LOGIN).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::gateway::LoginResponse;
    use crate::infrastructure::storage::MemorySessionStore;
    use crate::shared::error::AppError;
    use async_trait::async_trait;

    struct TestAuthGateway;

    #[async_trait]
    impl AuthGateway for TestAuthGateway {
        async fn google_login(&self, _id_token: &str) -> Result<LoginResponse> {
            Ok(LoginResponse {
                access_token: "google-token".to_string(),
                user: sample_user(),
            })
        }

        async fn test_login(&self) -> Result<LoginResponse> {
            Ok(LoginResponse {
                access_token: "test-token-1".to_string(),
                user: sample_user(),
            })
        }

        async fn logout(&self) -> Result<()> {
            Ok(())
        }
    }

    struct TestUserGateway {
        result: fn() -> Result<User>,
    }

    #[async_trait]
    impl UserGateway for TestUserGateway {
        async fn me(&self) -> Result<User> {
            (self.result)()
        }

        async fn update_nickname(&self, _nickname: &str) -> Result<String> {
            Ok("닉네임이 성공적으로 변경되었습니다.".to_string())
        }
    }

    fn sample_user() -> User {
        User {
            id: 1,
            email: "user@gmail.com".to_string(),
            nickname: "홍대 맛집 탐험가".to_string(),
        }
    }

    fn service_with(
        me: fn() -> Result<User>,
    ) -> (SessionService, Arc<MemorySessionStore>) {
        let storage = Arc::new(MemorySessionStore::new());
        let service = SessionService::new(
            Arc::new(TestAuthGateway),
            Arc::new(TestUserGateway { result: me }),
            storage.clone(),
        );
        (service, storage)
    }

    #[tokio::test]
    async fn restore_recovers_persisted_session() {
        let (service, storage) = service_with(|| Ok(sample_user()));
        storage
            .store(KEY_ACCESS_TOKEN, "token")
            .await
            .expect("store token");
        storage
            .store(
                KEY_USER_DATA,
                &serde_json::to_string(&sample_user()).expect("serialize user"),
            )
            .await
            .expect("store profile");

        service.restore().await.expect("restore");

        assert!(service.is_logged_in().await);
        assert_eq!(
            service.current_user().await.map(|u| u.nickname),
            Some("홍대 맛집 탐험가".to_string())
        );
    }

    #[tokio::test]
    async fn restore_drops_session_with_malformed_profile() {
        let (service, storage) = service_with(|| Ok(sample_user()));
        storage
            .store(KEY_ACCESS_TOKEN, "token")
            .await
            .expect("store token");
        storage
            .store(KEY_USER_DATA, "not-json")
            .await
            .expect("store broken profile");

        service.restore().await.expect("restore");

        assert!(!service.is_logged_in().await);
        assert!(service.token().await.expect("token query").is_none());
    }

    #[tokio::test]
    async fn sign_in_test_sets_flag_and_fetches_profile() {
        let (service, _storage) = service_with(|| Ok(sample_user()));

        let user = service.sign_in_test().await.expect("test login");

        assert_eq!(user.id, 1);
        assert!(service.is_logged_in().await);
        assert!(service.is_test_login().await.expect("flag query"));
        assert_eq!(
            service.token().await.expect("token query").as_deref(),
            Some("test-token-1")
        );
    }

    #[tokio::test]
    async fn profile_fetch_failure_forces_logout() {
        let (service, storage) = service_with(|| {
            Err(AppError::Unauthorized("authentication required".to_string()))
        });
        storage
            .store(KEY_ACCESS_TOKEN, "stale-token")
            .await
            .expect("store token");

        let err = service
            .fetch_profile()
            .await
            .expect_err("profile fetch should fail");
        assert!(err.is_unauthorized());

        assert!(!service.is_logged_in().await);
        assert!(service.token().await.expect("token query").is_none());
    }

    #[tokio::test]
    async fn logout_clears_test_login_flag() {
        let (service, _storage) = service_with(|| Ok(sample_user()));
        service.sign_in_test().await.expect("test login");

        service.logout().await.expect("logout");

        assert!(!service.is_logged_in().await);
        assert!(!service.is_test_login().await.expect("flag query"));
        assert!(service.current_user().await.is_none());
    }

    #[tokio::test]
    async fn update_nickname_patches_cached_profile() {
        let (service, storage) = service_with(|| Ok(sample_user()));
        service.sign_in_test().await.expect("test login");

        service
            .update_nickname("새 닉네임")
            .await
            .expect("nickname update");

        assert_eq!(
            service.current_user().await.map(|u| u.nickname),
            Some("새 닉네임".to_string())
        );
        let persisted = storage
            .retrieve(KEY_USER_DATA)
            .await
            .expect("profile query")
            .expect("profile present");
        assert!(persisted.contains("새 닉네임"));
    }
}
