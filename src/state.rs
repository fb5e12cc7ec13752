use crate::application::ports::gateway::{
    AuthGateway, BookmarkGateway, PostGateway, StampBoardGateway, UserGateway,
};
use crate::application::ports::session_store::{SessionStore, KEY_TEST_LOGIN};
use crate::application::services::{
    PlaceSearchService, PostService, SessionService, StampService,
};
use crate::infrastructure::api::{ApiClient, HttpBackend};
use crate::infrastructure::mock::{fixtures, MockBackend};
use crate::infrastructure::search::KakaoSearchClient;
use crate::infrastructure::storage::FileSessionStore;
use crate::shared::config::AppConfig;
use crate::shared::error::{AppError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

struct Gateways {
    auth: Arc<dyn AuthGateway>,
    user: Arc<dyn UserGateway>,
    post: Arc<dyn PostGateway>,
    bookmark: Arc<dyn BookmarkGateway>,
    board: Arc<dyn StampBoardGateway>,
}

/// アプリ全体の配線。
///
/// ゲートウェイの実体（本物の REST かモックか）は、セッション開始時に
/// 永続化済みのテストログインフラグを 1 回だけ読んで決める。以降の
/// 呼び出しでモードを再判定することはなく、ストア側のコードは実体を
/// 知らない。
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<SessionService>,
    pub posts: Arc<PostService>,
    pub stamps: Arc<StampService>,
    /// 検索キーが設定されているときだけ使える。
    pub place_search: Option<Arc<PlaceSearchService>>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let path = if config.storage.data_dir.trim().is_empty() {
            FileSessionStore::default_path()
        } else {
            PathBuf::from(&config.storage.data_dir).join("session.json")
        };
        let storage: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(path).await?);
        Self::with_storage(config, storage).await
    }

    /// ストレージを差し替えて構築する。テストや組み込み用途向け。
    pub async fn with_storage(config: AppConfig, storage: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate().map_err(AppError::Configuration)?;

        let test_login =
            matches!(storage.retrieve(KEY_TEST_LOGIN).await?.as_deref(), Some("true"));
        let gateways = if test_login {
            info!("test login flag is set, using the mock backend");
            let mock = Arc::new(MockBackend::new());
            mock.set_test_mode(true);
            Gateways {
                auth: mock.clone(),
                user: mock.clone(),
                post: mock.clone(),
                bookmark: mock.clone(),
                board: mock,
            }
        } else {
            let api = ApiClient::new(&config.api, storage.clone())?;
            let backend = Arc::new(HttpBackend::new(api));
            Gateways {
                auth: backend.clone(),
                user: backend.clone(),
                post: backend.clone(),
                bookmark: backend.clone(),
                board: backend,
            }
        };

        let session = Arc::new(SessionService::new(
            gateways.auth,
            gateways.user,
            storage.clone(),
        ));
        session.restore().await?;

        let posts = Arc::new(PostService::new(gateways.post));

        let mut stamps = StampService::new(gateways.board, gateways.bookmark);
        if config.session.dev_fixture_fallback {
            stamps = stamps.with_fixture_fallback(fixtures::seed_boards());
        }
        let stamps = Arc::new(stamps);

        let place_search = match &config.search.rest_api_key {
            Some(_) => {
                let client = KakaoSearchClient::new(&config.search)?;
                Some(Arc::new(PlaceSearchService::new(Arc::new(client))))
            }
            None => None,
        };

        Ok(Self {
            config,
            session,
            posts,
            stamps,
            place_search,
        })
    }

    /// ログアウトの一括処理。セッションを破棄し、各ストアのキャッシュも
    /// 無効化する。
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await?;
        self.posts.clear().await;
        self.stamps.clear().await;
        Ok(())
    }
}
