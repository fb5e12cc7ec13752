use async_trait::async_trait;

// 永続化キー。ブラウザ版クライアントの localStorage キーをそのまま踏襲する。
pub const KEY_ACCESS_TOKEN: &str = "accessToken";
pub const KEY_USER_DATA: &str = "userData";
pub const KEY_TEST_LOGIN: &str = "isTestLogin";

/// セッション状態（トークン・プロフィール・テストログインフラグ）の
/// 永続化ポート。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn store(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn retrieve(
        &self,
        key: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>;
    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
