use crate::domain::entities::{Bookmark, NewPost, Post, StampBoard, User};
use crate::domain::value_objects::BoardColor;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// ログイン成功時のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

/// 検索結果から直接ブックマークするときのリクエスト。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBookmarkRequest {
    pub place_name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

// バックエンドが成功時に返す完了メッセージ。プレーンテキストの契約であり、
// クライアント側はこの文字列で成否を確認する。
pub const MSG_POST_CREATED: &str = "게시글 작성 완료";
pub const MSG_POST_UPDATED: &str = "게시글 수정 완료";
pub const MSG_POST_DELETED: &str = "게시글 삭제 완료";
pub const MSG_BOARD_TITLE_UPDATED: &str = "보드 이름이 수정되었습니다.";
pub const MSG_BOARD_COLOR_UPDATED: &str = "보드 컬러가 수정되었습니다.";
pub const MSG_BOARD_DELETED: &str = "삭제 완료";
pub const MSG_BOOKMARK_ADDED: &str = "북마크 추가 완료";
pub const MSG_BOOKMARK_REMOVED: &str = "북마크 삭제 완료";
pub const MSG_BOOKMARK_CANCELLED: &str = "북마크 취소됨";
pub const MSG_BOOKMARK_ADDED_BY_SEARCH: &str = "Bookmark added by search";
pub const MSG_NICKNAME_UPDATED: &str = "닉네임이 성공적으로 변경되었습니다.";

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn google_login(&self, id_token: &str) -> Result<LoginResponse, AppError>;
    async fn test_login(&self) -> Result<LoginResponse, AppError>;
    async fn logout(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn me(&self) -> Result<User, AppError>;
    async fn update_nickname(&self, nickname: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait PostGateway: Send + Sync {
    async fn all_posts(&self) -> Result<Vec<Post>, AppError>;
    async fn my_posts(&self) -> Result<Vec<Post>, AppError>;
    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>, AppError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, AppError>;
    async fn create_post(&self, request: &NewPost) -> Result<String, AppError>;
    async fn update_post(&self, id: i64, request: &NewPost) -> Result<String, AppError>;
    async fn delete_post(&self, id: i64) -> Result<String, AppError>;
}

#[async_trait]
pub trait BookmarkGateway: Send + Sync {
    /// `visited` を渡すと訪問状態で絞り込む。
    async fn my_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>, AppError>;
    async fn add_by_post(&self, post_id: i64) -> Result<String, AppError>;
    async fn remove_by_post(&self, post_id: i64) -> Result<String, AppError>;
    async fn add_by_search(&self, request: &PlaceBookmarkRequest) -> Result<String, AppError>;
}

#[async_trait]
pub trait StampBoardGateway: Send + Sync {
    /// 一覧。各ボードの `bookmarks` は空のことがある。
    async fn my_boards(&self) -> Result<Vec<StampBoard>, AppError>;
    /// 個別取得。`bookmarks` まで埋まった詳細を返す。
    async fn get_board(&self, id: i64) -> Result<Option<StampBoard>, AppError>;
    async fn create_board(&self, title: &str, color: BoardColor) -> Result<StampBoard, AppError>;
    async fn update_title(&self, id: i64, title: &str) -> Result<String, AppError>;
    async fn update_color(&self, id: i64, color: BoardColor) -> Result<String, AppError>;
    async fn delete_board(&self, id: i64) -> Result<String, AppError>;
    async fn add_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String, AppError>;
    async fn remove_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String, AppError>;
}
