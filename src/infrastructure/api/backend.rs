use super::client::ApiClient;
use crate::application::ports::gateway::{
    AuthGateway, BookmarkGateway, LoginResponse, PlaceBookmarkRequest, PostGateway,
    StampBoardGateway, UserGateway,
};
use crate::domain::entities::{Bookmark, NewPost, Post, StampBoard, User};
use crate::domain::value_objects::BoardColor;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

/// 本物のバックエンドに対するゲートウェイ実装。
/// リソースパスとパラメータの渡し方は API 仕様のとおり。
pub struct HttpBackend {
    api: ApiClient,
}

impl HttpBackend {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// 404 を「存在しない」として `None` に読み替える。
fn none_on_not_found<T>(outcome: Result<T>) -> Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(AppError::Api { status: 404, .. }) | Err(AppError::NotFound(_)) => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
impl AuthGateway for HttpBackend {
    async fn google_login(&self, id_token: &str) -> Result<LoginResponse> {
        self.api
            .request_json(
                Method::POST,
                "/auth/google",
                &[],
                Some(json!({ "idToken": id_token })),
            )
            .await
    }

    async fn test_login(&self) -> Result<LoginResponse> {
        self.api
            .request_json(Method::POST, "/auth/test", &[], None)
            .await
    }

    async fn logout(&self) -> Result<()> {
        self.api
            .request_text(Method::POST, "/auth/logout", &[], None)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl UserGateway for HttpBackend {
    async fn me(&self) -> Result<User> {
        self.api.request_json(Method::GET, "/user/me", &[], None).await
    }

    async fn update_nickname(&self, nickname: &str) -> Result<String> {
        self.api
            .request_text(
                Method::PATCH,
                "/user/me",
                &[],
                Some(json!({ "nickname": nickname })),
            )
            .await
    }
}

#[async_trait]
impl PostGateway for HttpBackend {
    async fn all_posts(&self) -> Result<Vec<Post>> {
        self.api
            .request_json(Method::GET, "/posts/allPosts", &[], None)
            .await
    }

    async fn my_posts(&self) -> Result<Vec<Post>> {
        self.api.request_json(Method::GET, "/posts/me", &[], None).await
    }

    async fn search_posts(&self, keyword: &str) -> Result<Vec<Post>> {
        self.api
            .request_json(
                Method::GET,
                "/posts/search",
                &[("keyword", keyword.to_string())],
                None,
            )
            .await
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        none_on_not_found(
            self.api
                .request_json(Method::GET, &format!("/posts/{id}"), &[], None)
                .await,
        )
    }

    async fn create_post(&self, request: &NewPost) -> Result<String> {
        self.api
            .request_text(
                Method::POST,
                "/posts/",
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    async fn update_post(&self, id: i64, request: &NewPost) -> Result<String> {
        self.api
            .request_text(
                Method::PUT,
                &format!("/posts/{id}"),
                &[],
                Some(serde_json::to_value(request)?),
            )
            .await
    }

    async fn delete_post(&self, id: i64) -> Result<String> {
        self.api
            .request_text(Method::DELETE, &format!("/posts/{id}"), &[], None)
            .await
    }
}

#[async_trait]
impl BookmarkGateway for HttpBackend {
    async fn my_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>> {
        let mut query = Vec::new();
        if let Some(visited) = visited {
            query.push(("visited", visited.to_string()));
        }
        self.api
            .request_json(Method::GET, "/users/me/bookmarks", &query, None)
            .await
    }

    async fn add_by_post(&self, post_id: i64) -> Result<String> {
        self.api
            .request_text(Method::POST, &format!("/users/{post_id}"), &[], None)
            .await
    }

    async fn remove_by_post(&self, post_id: i64) -> Result<String> {
        self.api
            .request_text(Method::DELETE, &format!("/users/{post_id}"), &[], None)
            .await
    }

    async fn add_by_search(&self, request: &PlaceBookmarkRequest) -> Result<String> {
        self.api
            .request_text(
                Method::POST,
                "/users/search",
                &[
                    ("placeName", request.place_name.clone()),
                    ("address", request.address.clone()),
                    ("latitude", request.latitude.to_string()),
                    ("longitude", request.longitude.to_string()),
                ],
                None,
            )
            .await
    }
}

#[async_trait]
impl StampBoardGateway for HttpBackend {
    async fn my_boards(&self) -> Result<Vec<StampBoard>> {
        self.api
            .request_json(Method::GET, "/stampboards/me/boards", &[], None)
            .await
    }

    async fn get_board(&self, id: i64) -> Result<Option<StampBoard>> {
        none_on_not_found(
            self.api
                .request_json(Method::GET, &format!("/stampboards/{id}"), &[], None)
                .await,
        )
    }

    async fn create_board(&self, title: &str, color: BoardColor) -> Result<StampBoard> {
        self.api
            .request_json(
                Method::POST,
                "/stampboards",
                &[
                    ("title", title.to_string()),
                    ("color", color.to_string()),
                ],
                None,
            )
            .await
    }

    async fn update_title(&self, id: i64, title: &str) -> Result<String> {
        self.api
            .request_text(
                Method::PATCH,
                &format!("/stampboards/{id}/title"),
                &[("title", title.to_string())],
                None,
            )
            .await
    }

    async fn update_color(&self, id: i64, color: BoardColor) -> Result<String> {
        self.api
            .request_text(
                Method::PATCH,
                &format!("/stampboards/{id}/color"),
                &[("color", color.to_string())],
                None,
            )
            .await
    }

    async fn delete_board(&self, id: i64) -> Result<String> {
        self.api
            .request_text(Method::DELETE, &format!("/stampboards/{id}"), &[], None)
            .await
    }

    async fn add_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String> {
        // 本文はブックマーク ID の生の数値ひとつ
        self.api
            .request_text(
                Method::POST,
                &format!("/stampboards/{board_id}/bookmark"),
                &[],
                Some(json!(bookmark_id)),
            )
            .await
    }

    async fn remove_bookmark(&self, board_id: i64, bookmark_id: i64) -> Result<String> {
        self.api
            .request_text(
                Method::DELETE,
                &format!("/stampboards/{board_id}/bookmark"),
                &[],
                Some(json!(bookmark_id)),
            )
            .await
    }
}
