use crate::application::ports::gateway::PostGateway;
use crate::domain::entities::{NewPost, Post};
use crate::shared::error::{AppError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// 完了メッセージにこの文字列が含まれていれば成功とみなす。
const COMPLETION_MARKER: &str = "완료";

/// 掲示板投稿のキャッシュストア。
///
/// キャッシュは常に全件入れ替えで更新し、部分マージはしない。
/// 変更系の操作は成功時に全件を取り直す。失敗はエラースロットに残し、
/// 表示層がそこから読む。自動リトライはない。
pub struct PostService {
    gateway: Arc<dyn PostGateway>,
    posts: RwLock<Vec<Post>>,
    last_error: RwLock<Option<String>>,
}

impl PostService {
    pub fn new(gateway: Arc<dyn PostGateway>) -> Self {
        Self {
            gateway,
            posts: RwLock::new(Vec::new()),
            last_error: RwLock::new(None),
        }
    }

    /// 現在のキャッシュのスナップショット。
    pub async fn posts(&self) -> Vec<Post> {
        self.posts.read().await.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    async fn set_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }

    async fn clear_error(&self) {
        *self.last_error.write().await = None;
    }

    /// 全投稿を取り直してキャッシュを丸ごと差し替える。
    pub async fn refresh(&self) -> Result<()> {
        match self.gateway.all_posts().await {
            Ok(posts) => {
                debug!("post cache refreshed: {} posts", posts.len());
                *self.posts.write().await = posts;
                self.clear_error().await;
                Ok(())
            }
            Err(err) => {
                warn!("post refresh failed: {err}");
                self.set_error(err.to_string()).await;
                Err(err)
            }
        }
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.gateway.get_post(id).await
    }

    pub async fn my_posts(&self) -> Result<Vec<Post>> {
        self.gateway.my_posts().await
    }

    pub async fn search(&self, keyword: &str) -> Result<Vec<Post>> {
        self.gateway.search_posts(keyword).await
    }

    pub async fn create_post(&self, request: &NewPost) -> Result<()> {
        let outcome = self.gateway.create_post(request).await;
        self.apply_mutation("create", outcome).await
    }

    pub async fn update_post(&self, id: i64, request: &NewPost) -> Result<()> {
        let outcome = self.gateway.update_post(id, request).await;
        self.apply_mutation("update", outcome).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<()> {
        let outcome = self.gateway.delete_post(id).await;
        self.apply_mutation("delete", outcome).await
    }

    /// 変更系操作の共通後処理: 完了メッセージを確認し、成功時のみ取り直す。
    async fn apply_mutation(&self, operation: &str, outcome: Result<String>) -> Result<()> {
        match outcome {
            Ok(message) if message.contains(COMPLETION_MARKER) => {
                self.refresh().await?;
                Ok(())
            }
            Ok(message) => {
                warn!("post {operation} returned unexpected response: {message}");
                self.set_error(message.clone()).await;
                Err(AppError::Api {
                    status: 200,
                    message,
                })
            }
            Err(err) => {
                warn!("post {operation} failed: {err}");
                self.set_error(err.to_string()).await;
                Err(err)
            }
        }
    }

    /// ログアウト時に呼ぶ。キャッシュは空として扱う。
    pub async fn clear(&self) {
        self.posts.write().await.clear();
        *self.last_error.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockBackend;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "B".to_string(),
            address: "C".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn service() -> (PostService, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::without_latency());
        backend.set_test_mode(true);
        (PostService::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn refresh_replaces_cache_wholesale() {
        let (service, _backend) = service();
        assert!(service.posts().await.is_empty());

        service.refresh().await.expect("refresh");

        let posts = service.posts().await;
        assert_eq!(posts.len(), 8);
        assert_eq!(posts[0].id, 1);
    }

    #[tokio::test]
    async fn create_appends_with_incrementing_id_and_refreshes() {
        let (service, _backend) = service();
        service.refresh().await.expect("initial refresh");

        service
            .create_post(&new_post("A"))
            .await
            .expect("create post");

        let posts = service.posts().await;
        assert_eq!(posts.len(), 9);
        let created = posts.last().expect("created post present");
        assert_eq!(created.id, 9);
        assert_eq!(created.title, "A");
        assert!(service.last_error().await.is_none());
    }

    #[tokio::test]
    async fn failed_create_sets_error_and_keeps_cache() {
        let (service, backend) = service();
        service.refresh().await.expect("initial refresh");
        let before = service.posts().await;

        // テストモードを落として失敗させる
        backend.set_test_mode(false);
        let err = service
            .create_post(&new_post("A"))
            .await
            .expect_err("create should fail");
        assert!(matches!(err, AppError::TestModeInactive));

        assert_eq!(service.posts().await, before);
        assert!(service.last_error().await.is_some());
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let (service, _backend) = service();
        service.refresh().await.expect("initial refresh");

        let err = service
            .delete_post(999)
            .await
            .expect_err("delete should fail");
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(service.posts().await.len(), 8);
    }

    #[tokio::test]
    async fn update_rewrites_post_in_place() {
        let (service, _backend) = service();
        service.refresh().await.expect("initial refresh");

        service
            .update_post(1, &new_post("고친 제목"))
            .await
            .expect("update post");

        let posts = service.posts().await;
        let updated = posts.iter().find(|p| p.id == 1).expect("post 1 present");
        assert_eq!(updated.title, "고친 제목");
    }

    #[tokio::test]
    async fn clear_empties_cache_and_error() {
        let (service, backend) = service();
        service.refresh().await.expect("initial refresh");
        backend.set_test_mode(false);
        let _ = service.create_post(&new_post("A")).await;

        service.clear().await;

        assert!(service.posts().await.is_empty());
        assert!(service.last_error().await.is_none());
    }
}
