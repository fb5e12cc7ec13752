// モジュール定義
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::services::{PlaceSearchService, PostService, SessionService, StampService};
pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;

use tracing_subscriber::EnvFilter;

/// ログ設定の初期化。`RUST_LOG` が無ければ info で立ち上げる。
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
