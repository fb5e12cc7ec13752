use crate::application::ports::session_store::{
    SessionStore, KEY_ACCESS_TOKEN, KEY_USER_DATA,
};
use crate::shared::config::ApiConfig;
use crate::shared::error::{AppError, Result};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// ベアラートークン付きでバックエンドを呼ぶ HTTP クライアント。
///
/// トランスポート失敗・非 2xx・Content-Type の違いを共通の `Result` に
/// 正規化する。呼び出し側はエンドポイントごとに JSON かプレーンテキスト
/// かを選ぶだけでよい。
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    storage: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, storage: Arc<dyn SessionStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|err| AppError::Configuration(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, endpoint));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Ok(Some(token)) = self.storage.retrieve(KEY_ACCESS_TOKEN).await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;
        self.normalize(response).await
    }

    /// 401 はセッション破棄込みで特別扱いする。その他の非 2xx は本文の
    /// `message` を拾って API エラーに落とす。
    async fn normalize(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("backend returned 401, dropping persisted session");
            let _ = self.storage.delete(KEY_ACCESS_TOKEN).await;
            let _ = self.storage.delete(KEY_USER_DATA).await;
            return Err(AppError::Unauthorized(
                "authentication required".to_string(),
            ));
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// JSON を返すエンドポイント用。
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let response = self.send(method, endpoint, query, body).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        if !content_type.contains("application/json") {
            return Err(AppError::Serialization(format!(
                "expected a JSON response, got content-type {content_type:?}"
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Serialization(err.to_string()))
    }

    /// 完了メッセージなどプレーンテキストを返すエンドポイント用。
    pub async fn request_text(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<String> {
        let response = self.send(method, endpoint, query, body).await?;
        response
            .text()
            .await
            .map_err(|err| AppError::Network(err.to_string()))
    }
}
