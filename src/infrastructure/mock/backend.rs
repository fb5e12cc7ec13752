use super::fixtures;
use crate::application::ports::gateway::{
    AuthGateway, BookmarkGateway, LoginResponse, PlaceBookmarkRequest, PostGateway,
    StampBoardGateway, UserGateway, MSG_BOARD_COLOR_UPDATED, MSG_BOARD_DELETED,
    MSG_BOARD_TITLE_UPDATED, MSG_BOOKMARK_ADDED, MSG_BOOKMARK_ADDED_BY_SEARCH,
    MSG_BOOKMARK_CANCELLED, MSG_BOOKMARK_REMOVED, MSG_NICKNAME_UPDATED, MSG_POST_CREATED,
    MSG_POST_DELETED, MSG_POST_UPDATED,
};
use crate::domain::entities::{BoardOwner, Bookmark, NewPost, Post, StampBoard, User};
use crate::domain::value_objects::BoardColor;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};

/// 既定の疑似レイテンシ（ミリ秒、一様乱数）。
pub const DEFAULT_LATENCY_MS: (u64, u64) = (300, 800);

#[derive(Debug, Clone)]
struct FixtureState {
    users: Vec<User>,
    posts: Vec<Post>,
    bookmarks: Vec<Bookmark>,
    boards: Vec<StampBoard>,
}

impl FixtureState {
    fn seeded() -> Self {
        Self {
            users: fixtures::seed_users(),
            posts: fixtures::seed_posts(),
            bookmarks: fixtures::seed_bookmarks(),
            boards: fixtures::seed_boards(),
        }
    }
}

/// 本物のゲートウェイと同じポート一式を実装するテストモード用バックエンド。
///
/// 状態はプロセス全体の可変配列ではなくインスタンスに閉じており、
/// テストごとに独立して動かせる。各操作はテストモードが有効でなければ
/// 失敗し、有効なら疑似レイテンシを挟んでからインメモリの状態を読み書き
/// する。状態はセッション中は保たれ、作り直せばシードに戻る。
pub struct MockBackend {
    state: RwLock<FixtureState>,
    enabled: AtomicBool,
    latency: Option<(u64, u64)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(FixtureState::seeded()),
            enabled: AtomicBool::new(false),
            latency: Some(DEFAULT_LATENCY_MS),
        }
    }

    /// レイテンシなしの構成。ユニットテスト向け。
    pub fn without_latency() -> Self {
        Self {
            state: RwLock::new(FixtureState::seeded()),
            enabled: AtomicBool::new(false),
            latency: None,
        }
    }

    pub fn set_test_mode(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_test_mode(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// 状態をシードデータに戻す。
    pub async fn reset(&self) {
        *self.state.write().await = FixtureState::seeded();
    }

    /// モード確認とレイテンシ挿入。すべての操作の入口。
    async fn begin(&self) -> Result<()> {
        if !self.enabled.load(Ordering::SeqCst) {
            return Err(AppError::TestModeInactive);
        }
        if let Some((min, max)) = self.latency {
            let delay = rand::thread_rng().gen_range(min..=max);
            sleep(Duration::from_millis(delay)).await;
        }
        Ok(())
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthGateway for MockBackend {
    async fn google_login(&self, _id_token: &str) -> Result<LoginResponse> {
        self.begin().await?;
        Err(AppError::InvalidInput(
            "google login is not available in test mode".to_string(),
        ))
    }

    async fn test_login(&self) -> Result<LoginResponse> {
        self.begin().await?;
        let state = self.state.read().await;
        let user = state
            .users
            .first()
            .cloned()
            .ok_or_else(|| AppError::NotFound("no fixture user".to_string()))?;
        Ok(LoginResponse {
            access_token: format!("test-token-{}", Self::now_millis()),
            user,
        })
    }

    async fn logout(&self) -> Result<()> {
        self.begin().await?;
        Ok(())
    }
}

#[async_trait]
impl UserGateway for MockBackend {
    async fn me(&self) -> Result<User> {
        self.begin().await?;
        let state = self.state.read().await;
        state
            .users
            .first()
            .cloned()
            .ok_or_else(|| AppError::NotFound("no fixture user".to_string()))
    }

    async fn update_nickname(&self, nickname: &str) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let user = state
            .users
            .first_mut()
            .ok_or_else(|| AppError::NotFound("no fixture user".to_string()))?;
        user.nickname = nickname.to_string();
        Ok(MSG_NICKNAME_UPDATED.to_string())
    }
}

#[async_trait]
impl PostGateway for MockBackend {
    async fn all_posts(&self) -> Result<Vec<Post>> {
        self.begin().await?;
        Ok(self.state.read().await.posts.clone())
    }

    async fn my_posts(&self) -> Result<Vec<Post>> {
        self.begin().await?;
        // フィクスチャではユーザー別の絞り込みをしない
        Ok(self.state.read().await.posts.clone())
    }

    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>> {
        self.begin().await?;
        let needle = keyword.to_lowercase();
        Ok(self
            .state
            .read()
            .await
            .posts
            .iter()
            .filter(|post| {
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
                    || post.address.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        self.begin().await?;
        Ok(self
            .state
            .read()
            .await
            .posts
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    async fn create_post(&self, request: &NewPost) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let post = Post {
            id: state.posts.len() as i64 + 1,
            title: request.title.clone(),
            content: request.content.clone(),
            address: request.address.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
        };
        state.posts.push(post);
        Ok(MSG_POST_CREATED.to_string())
    }

    async fn update_post(&self, id: i64, request: &NewPost) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;
        post.apply(request);
        Ok(MSG_POST_UPDATED.to_string())
    }

    async fn delete_post(&self, id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let index = state
            .posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| AppError::NotFound(format!("post {id} not found")))?;
        state.posts.remove(index);
        Ok(MSG_POST_DELETED.to_string())
    }
}

#[async_trait]
impl BookmarkGateway for MockBackend {
    async fn my_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>> {
        self.begin().await?;
        let state = self.state.read().await;
        Ok(match visited {
            Some(visited) => state
                .bookmarks
                .iter()
                .filter(|bookmark| bookmark.visited == visited)
                .cloned()
                .collect(),
            None => state.bookmarks.clone(),
        })
    }

    async fn add_by_post(&self, post_id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;
        if state.bookmarks.iter().any(|b| b.post_id == post_id) {
            return Err(AppError::InvalidInput(format!(
                "post {post_id} is already bookmarked"
            )));
        }
        state.bookmarks.push(Bookmark {
            post_id,
            title: post.title,
            address: post.address,
            latitude: post.latitude,
            longitude: post.longitude,
            visited: false,
        });
        Ok(MSG_BOOKMARK_ADDED.to_string())
    }

    async fn remove_by_post(&self, post_id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let index = state
            .bookmarks
            .iter()
            .position(|bookmark| bookmark.post_id == post_id)
            .ok_or_else(|| AppError::NotFound(format!("bookmark {post_id} not found")))?;
        state.bookmarks.remove(index);
        Ok(MSG_BOOKMARK_CANCELLED.to_string())
    }

    async fn add_by_search(&self, request: &PlaceBookmarkRequest) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        // 検索由来のブックマークはエポックミリ秒を ID に使う
        state.bookmarks.push(Bookmark {
            post_id: Self::now_millis(),
            title: request.place_name.clone(),
            address: request.address.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            visited: false,
        });
        Ok(MSG_BOOKMARK_ADDED_BY_SEARCH.to_string())
    }
}

#[async_trait]
impl StampBoardGateway for MockBackend {
    async fn my_boards(&self) -> Result<Vec<StampBoard>> {
        self.begin().await?;
        Ok(self.state.read().await.boards.clone())
    }

    async fn get_board(&self, id: i64) -> Result<Option<StampBoard>> {
        self.begin().await?;
        Ok(self
            .state
            .read()
            .await
            .boards
            .iter()
            .find(|board| board.id == id)
            .cloned())
    }

    async fn create_board(&self, title: &str, color: BoardColor) -> Result<StampBoard> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let board = StampBoard {
            id: Self::now_millis(),
            title: title.to_string(),
            color,
            created_at: Utc::now(),
            owner: BoardOwner { id: 1 },
            bookmarks: Vec::new(),
        };
        state.boards.push(board.clone());
        Ok(board)
    }

    async fn update_title(&self, id: i64, title: &str) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let board = state
            .boards
            .iter_mut()
            .find(|board| board.id == id)
            .ok_or_else(|| AppError::NotFound(format!("stamp board {id} not found")))?;
        board.title = title.to_string();
        Ok(MSG_BOARD_TITLE_UPDATED.to_string())
    }

    async fn update_color(&self, id: i64, color: BoardColor) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let board = state
            .boards
            .iter_mut()
            .find(|board| board.id == id)
            .ok_or_else(|| AppError::NotFound(format!("stamp board {id} not found")))?;
        board.color = color;
        Ok(MSG_BOARD_COLOR_UPDATED.to_string())
    }

    async fn delete_board(&self, id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let index = state
            .boards
            .iter()
            .position(|board| board.id == id)
            .ok_or_else(|| AppError::NotFound(format!("stamp board {id} not found")))?;
        state.boards.remove(index);
        Ok(MSG_BOARD_DELETED.to_string())
    }

    async fn add_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let bookmark = state
            .bookmarks
            .iter()
            .find(|bookmark| bookmark.post_id == bookmark_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("bookmark {bookmark_id} not found")))?;
        let board = state
            .boards
            .iter_mut()
            .find(|board| board.id == board_id)
            .ok_or_else(|| AppError::NotFound(format!("stamp board {board_id} not found")))?;
        if board.bookmarks.iter().any(|b| b.post_id == bookmark_id) {
            return Err(AppError::InvalidInput(format!(
                "bookmark {bookmark_id} is already on board {board_id}"
            )));
        }
        board.bookmarks.push(bookmark);
        Ok(MSG_BOOKMARK_ADDED.to_string())
    }

    async fn remove_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String> {
        self.begin().await?;
        let mut state = self.state.write().await;
        let board = state
            .boards
            .iter_mut()
            .find(|board| board.id == board_id)
            .ok_or_else(|| AppError::NotFound(format!("stamp board {board_id} not found")))?;
        let index = board
            .bookmarks
            .iter()
            .position(|bookmark| bookmark.post_id == bookmark_id)
            .ok_or_else(|| AppError::NotFound(format!("bookmark {bookmark_id} not found")))?;
        board.bookmarks.remove(index);
        Ok(MSG_BOOKMARK_REMOVED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "B".to_string(),
            address: "C".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn active_backend() -> MockBackend {
        let backend = MockBackend::without_latency();
        backend.set_test_mode(true);
        backend
    }

    #[tokio::test]
    async fn every_operation_requires_test_mode() {
        let backend = MockBackend::without_latency();

        let err = backend.all_posts().await.expect_err("must fail when inactive");
        assert!(matches!(err, AppError::TestModeInactive));
        let err = backend
            .create_post(&new_post("A"))
            .await
            .expect_err("must fail when inactive");
        assert!(matches!(err, AppError::TestModeInactive));
        let err = backend.my_boards().await.expect_err("must fail when inactive");
        assert!(matches!(err, AppError::TestModeInactive));
    }

    #[tokio::test]
    async fn create_post_returns_literal_and_appends_with_incrementing_id() {
        let backend = active_backend();

        let message = backend
            .create_post(&new_post("A"))
            .await
            .expect("create post");
        assert_eq!(message, "게시글 작성 완료");

        let posts = backend.all_posts().await.expect("all posts");
        assert_eq!(posts.len(), 9);
        assert_eq!(posts[8].id, 9);
        assert_eq!(posts[8].title, "A");
    }

    #[tokio::test]
    async fn state_persists_across_calls_and_resets_on_demand() {
        let backend = active_backend();
        backend
            .delete_post(1)
            .await
            .expect("delete post");
        assert_eq!(backend.all_posts().await.expect("all posts").len(), 7);

        backend.reset().await;
        assert_eq!(backend.all_posts().await.expect("all posts").len(), 8);
    }

    #[tokio::test]
    async fn bookmarks_filter_by_visited_flag() {
        let backend = active_backend();

        let visited = backend
            .my_bookmarks(Some(true))
            .await
            .expect("visited bookmarks");
        assert_eq!(visited.len(), 3);
        assert!(visited.iter().all(|b| b.visited));

        let unvisited = backend
            .my_bookmarks(Some(false))
            .await
            .expect("unvisited bookmarks");
        assert_eq!(unvisited.len(), 3);
        assert!(unvisited.iter().all(|b| !b.visited));
    }

    #[tokio::test]
    async fn duplicate_board_bookmark_is_rejected() {
        let backend = active_backend();

        // ブックマーク 1 はボード 1 に既に載っている
        let err = backend
            .add_bookmark(1, 1)
            .await
            .expect_err("duplicate should fail");
        assert!(matches!(err, AppError::InvalidInput(_)));

        // ボード 2 にはまだ無いので追加できる
        let message = backend.add_bookmark(2, 1).await.expect("add bookmark");
        assert_eq!(message, "북마크 추가 완료");
    }

    #[tokio::test]
    async fn board_crud_round_trip() {
        let backend = active_backend();

        let board = backend
            .create_board("새 보드", BoardColor::palette(3))
            .await
            .expect("create board");
        assert!(board.id > 1_700_000_000_000, "millisecond id");
        assert!(board.bookmarks.is_empty());

        backend
            .update_title(board.id, "이름 변경")
            .await
            .expect("update title");
        backend
            .update_color(board.id, BoardColor::palette(4))
            .await
            .expect("update color");

        let detail = backend
            .get_board(board.id)
            .await
            .expect("get board")
            .expect("board present");
        assert_eq!(detail.title, "이름 변경");
        assert_eq!(detail.color, BoardColor::palette(4));

        let message = backend.delete_board(board.id).await.expect("delete board");
        assert_eq!(message, "삭제 완료");
        assert!(backend
            .get_board(board.id)
            .await
            .expect("get board")
            .is_none());
    }

    #[tokio::test]
    async fn search_bookmark_gets_synthetic_millisecond_id() {
        let backend = active_backend();

        backend
            .add_by_search(&PlaceBookmarkRequest {
                place_name: "가미우동".to_string(),
                address: "서울 마포구 와우산로 123".to_string(),
                latitude: 37.5535,
                longitude: 126.935,
            })
            .await
            .expect("bookmark by search");

        let bookmarks = backend.my_bookmarks(None).await.expect("bookmarks");
        let added = bookmarks.last().expect("added bookmark");
        assert_eq!(added.title, "가미우동");
        assert!(added.post_id > 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_login_mints_timestamped_token() {
        let backend = active_backend();

        let response = backend.test_login().await.expect("test login");
        assert!(response.access_token.starts_with("test-token-"));
        assert_eq!(response.user.email, "user@gmail.com");
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_simulated_within_the_configured_range() {
        let backend = MockBackend::new();
        backend.set_test_mode(true);

        let started = tokio::time::Instant::now();
        backend.all_posts().await.expect("all posts");
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(DEFAULT_LATENCY_MS.0));
        assert!(elapsed <= Duration::from_millis(DEFAULT_LATENCY_MS.1));
    }

    #[tokio::test]
    async fn update_nickname_mutates_fixture_user() {
        let backend = active_backend();

        let message = backend
            .update_nickname("새 닉네임")
            .await
            .expect("update nickname");
        assert_eq!(message, "닉네임이 성공적으로 변경되었습니다.");

        let user = backend.me().await.expect("me");
        assert_eq!(user.nickname, "새 닉네임");
    }
}
