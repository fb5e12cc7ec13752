use crate::domain::entities::PlaceCandidate;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// サードパーティのキーワード検索ポート。
#[async_trait]
pub trait PlaceSearchGateway: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, AppError>;
}
