use crate::application::ports::place_search::PlaceSearchGateway;
use crate::domain::entities::PlaceCandidate;
use crate::shared::error::Result;
use std::sync::Arc;

/// フリーテキスト検索の薄いラッパー。
/// 空文字のクエリはネットワークに出さずに空の結果を返す。
pub struct PlaceSearchService {
    gateway: Arc<dyn PlaceSearchGateway>,
}

impl PlaceSearchService {
    pub fn new(gateway: Arc<dyn PlaceSearchGateway>) -> Self {
        Self { gateway }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway.search(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGateway {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlaceSearchGateway for CountingGateway {
        async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == "없는곳" {
                return Err(AppError::Network("search request failed".to_string()));
            }
            Ok(vec![PlaceCandidate {
                id: "1".to_string(),
                name: query.to_string(),
                address: "서울 마포구".to_string(),
                road_address: "서울 마포구 홍대로".to_string(),
                category: "카페".to_string(),
                phone: String::new(),
                latitude: 37.5519,
                longitude: 126.9255,
                place_url: "https://place.example/1".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn blank_query_short_circuits() {
        let gateway = Arc::new(CountingGateway {
            calls: AtomicUsize::new(0),
        });
        let service = PlaceSearchService::new(gateway.clone());

        let results = service.search("   ").await.expect("blank search");

        assert!(results.is_empty());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn trims_query_before_dispatch() {
        let gateway = Arc::new(CountingGateway {
            calls: AtomicUsize::new(0),
        });
        let service = PlaceSearchService::new(gateway.clone());

        let results = service.search(" 스타벅스 ").await.expect("search");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "스타벅스");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn propagates_gateway_errors() {
        let gateway = Arc::new(CountingGateway {
            calls: AtomicUsize::new(0),
        });
        let service = PlaceSearchService::new(gateway);

        let err = service.search("없는곳").await.expect_err("search fails");
        assert!(matches!(err, AppError::Network(_)));
    }
}
