use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// バックエンド REST API のベース URL。
    pub base_url: String,
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// キーワード検索エンドポイント。
    pub endpoint: String,
    /// 検索プロバイダの REST API キー。未設定なら検索機能は無効。
    #[serde(default)]
    pub rest_api_key: Option<String>,
    pub page_size: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// セッション状態を永続化するディレクトリ。空なら OS 既定の場所。
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 開発ビルド専用: スタンプデータの取得に失敗した際に
    /// ローカルのフィクスチャを代わりに使う。
    #[serde(default)]
    pub dev_fixture_fallback: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                request_timeout: 30,
            },
            search: SearchConfig {
                endpoint: "https://dapi.kakao.com/v2/local/search/keyword.json".to_string(),
                rest_api_key: None,
                page_size: 15,
            },
            storage: StorageConfig {
                data_dir: String::new(),
            },
            session: SessionConfig {
                dev_fixture_fallback: false,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        // 既定値
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("STAMPBOOK_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api.base_url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("STAMPBOOK_API_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.api.request_timeout = value.max(1);
            }
        }

        if let Ok(v) = std::env::var("STAMPBOOK_SEARCH_ENDPOINT") {
            if !v.trim().is_empty() {
                cfg.search.endpoint = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("STAMPBOOK_KAKAO_REST_API_KEY") {
            let key = v.trim().to_string();
            if !key.is_empty() {
                cfg.search.rest_api_key = Some(key);
            }
        }
        if let Ok(v) = std::env::var("STAMPBOOK_SEARCH_PAGE_SIZE") {
            if let Some(value) = parse_u8(&v) {
                cfg.search.page_size = value;
            }
        }

        if let Ok(v) = std::env::var("STAMPBOOK_DATA_DIR") {
            cfg.storage.data_dir = v.trim().to_string();
        }
        if let Ok(v) = std::env::var("STAMPBOOK_DEV_FIXTURES") {
            cfg.session.dev_fixture_fallback = parse_bool(&v, cfg.session.dev_fixture_fallback);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if self.api.request_timeout == 0 {
            return Err("API request_timeout must be greater than 0".to_string());
        }
        if self.search.page_size == 0 || self.search.page_size > 45 {
            return Err("Search page_size must be between 1 and 45".to_string());
        }
        if let Some(key) = &self.search.rest_api_key {
            if key.trim().is_empty() {
                return Err("Search rest_api_key must not be blank when set".to_string());
            }
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u8(value: &str) -> Option<u8> {
    value.trim().parse::<u8>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = AppConfig::default();
        cfg.api.request_timeout = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_page() {
        let mut cfg = AppConfig::default();
        cfg.search.page_size = 46;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_search_key() {
        let mut cfg = AppConfig::default();
        cfg.search.rest_api_key = Some("  ".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_bool_falls_back_to_default() {
        assert!(parse_bool("definitely", true));
        assert!(!parse_bool("definitely", false));
        assert!(parse_bool("on", false));
        assert!(!parse_bool("off", true));
    }
}
