use crate::application::ports::place_search::PlaceSearchGateway;
use crate::domain::entities::PlaceCandidate;
use crate::shared::config::SearchConfig;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct KakaoSearchResponse {
    documents: Vec<KakaoPlace>,
}

#[derive(Debug, Deserialize)]
struct KakaoPlace {
    id: String,
    place_name: String,
    place_url: String,
    category_name: String,
    address_name: String,
    road_address_name: String,
    phone: String,
    /// 経度（文字列で返ってくる）
    x: String,
    /// 緯度（文字列で返ってくる）
    y: String,
}

/// Kakao ローカル検索のキーワードエンドポイントを叩くクライアント。
pub struct KakaoSearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    page_size: u8,
}

impl KakaoSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let api_key = config
            .rest_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::Configuration("Kakao REST API key is not set".to_string())
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
            page_size: config.page_size,
        })
    }

    fn parse_coordinate(value: &str, axis: &str) -> Result<f64> {
        value.parse::<f64>().map_err(|_| {
            AppError::Serialization(format!(
                "invalid {axis} coordinate in search response: {value}"
            ))
        })
    }

    fn into_candidate(place: KakaoPlace) -> Result<PlaceCandidate> {
        let latitude = Self::parse_coordinate(&place.y, "y")?;
        let longitude = Self::parse_coordinate(&place.x, "x")?;
        Ok(PlaceCandidate {
            id: place.id,
            name: place.place_name,
            address: place.address_name,
            road_address: place.road_address_name,
            category: place.category_name,
            phone: place.phone,
            latitude,
            longitude,
            place_url: place.place_url,
        })
    }
}

#[async_trait]
impl PlaceSearchGateway for KakaoSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("size", &self.page_size.to_string())])
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api {
                status: status.as_u16(),
                message: "place search request failed".to_string(),
            });
        }

        let body: KakaoSearchResponse = response
            .json()
            .await
            .map_err(|err| AppError::Serialization(err.to_string()))?;
        body.documents.into_iter().map(Self::into_candidate).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_requires_api_key() {
        let mut config = SearchConfig {
            endpoint: "https://dapi.kakao.com/v2/local/search/keyword.json".to_string(),
            rest_api_key: None,
            page_size: 15,
        };
        assert!(matches!(
            KakaoSearchClient::new(&config),
            Err(AppError::Configuration(_))
        ));

        config.rest_api_key = Some("key".to_string());
        assert!(KakaoSearchClient::new(&config).is_ok());
    }

    #[test]
    fn maps_documents_with_string_coordinates() {
        let place = KakaoPlace {
            id: "8291".to_string(),
            place_name: "스타벅스 홍대점".to_string(),
            place_url: "https://place.map.kakao.com/8291".to_string(),
            category_name: "음식점 > 카페".to_string(),
            address_name: "서울 마포구 홍대로 396".to_string(),
            road_address_name: "서울 마포구 홍대로 396".to_string(),
            phone: "02-123-4567".to_string(),
            x: "126.9255".to_string(),
            y: "37.5519".to_string(),
        };

        let candidate = KakaoSearchClient::into_candidate(place).expect("candidate");
        assert_eq!(candidate.name, "스타벅스 홍대점");
        assert!((candidate.latitude - 37.5519).abs() < f64::EPSILON);
        assert!((candidate.longitude - 126.9255).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_coordinate_is_an_error() {
        let place = KakaoPlace {
            id: "1".to_string(),
            place_name: "어딘가".to_string(),
            place_url: String::new(),
            category_name: String::new(),
            address_name: String::new(),
            road_address_name: String::new(),
            phone: String::new(),
            x: "not-a-number".to_string(),
            y: "37.0".to_string(),
        };

        assert!(matches!(
            KakaoSearchClient::into_candidate(place),
            Err(AppError::Serialization(_))
        ));
    }
}
