use crate::application::ports::gateway::{
    BookmarkGateway, PlaceBookmarkRequest, StampBoardGateway,
};
use crate::domain::entities::{Bookmark, StampBoard};
use crate::domain::membership;
use crate::domain::value_objects::BoardColor;
use crate::shared::error::Result;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// ボード一覧と、全ボードのブックマークを平坦化したミラーのスナップショット。
/// ミラーは refresh のたびにボードから作り直される。
#[derive(Debug, Clone, Default)]
pub struct StampData {
    pub boards: Vec<StampBoard>,
    pub bookmarks: Vec<Bookmark>,
}

/// ボード更新リクエスト。指定したフィールドだけを更新する。
#[derive(Debug, Clone, Default)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub color: Option<BoardColor>,
}

/// ローカルに追加するブックマーク。ID はエポックミリ秒で採番される。
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visited: bool,
}

/// スタンプボードのクライアント側ミラー。
///
/// サーバーが真実の情報源であり、ここは楽観的キャッシュにすぎない。
/// ずれを検知したときの回復手段は常に `refresh` による全件取り直し。
pub struct StampService {
    board_gateway: Arc<dyn StampBoardGateway>,
    bookmark_gateway: Arc<dyn BookmarkGateway>,
    data: RwLock<StampData>,
    last_error: RwLock<Option<String>>,
    /// 開発ビルド専用。一覧取得に失敗したときに使うフィクスチャ。
    fixture_fallback: Option<Vec<StampBoard>>,
}

fn collect_bookmarks(boards: &[StampBoard]) -> Vec<Bookmark> {
    let mut all = Vec::new();
    for board in boards {
        all.extend(board.bookmarks.iter().cloned());
    }
    all
}

impl StampService {
    pub fn new(
        board_gateway: Arc<dyn StampBoardGateway>,
        bookmark_gateway: Arc<dyn BookmarkGateway>,
    ) -> Self {
        Self {
            board_gateway,
            bookmark_gateway,
            data: RwLock::new(StampData::default()),
            last_error: RwLock::new(None),
            fixture_fallback: None,
        }
    }

    /// 一覧取得に失敗したときのフィクスチャを設定する。開発ビルド以外で
    /// 有効化してはならない。
    pub fn with_fixture_fallback(mut self, boards: Vec<StampBoard>) -> Self {
        self.fixture_fallback = Some(boards);
        self
    }

    pub async fn data(&self) -> StampData {
        self.data.read().await.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    async fn set_error(&self, message: String) {
        *self.last_error.write().await = Some(message);
    }

    async fn clear_error(&self) {
        *self.last_error.write().await = None;
    }

    /// 指定の場所を含むボード ID の一覧。キャッシュのスナップショットに
    /// 対する純粋な読み取りで、ネットワークには出ない。
    pub async fn boards_for_place(&self, name: &str, latitude: f64, longitude: f64) -> Vec<String> {
        let data = self.data.read().await;
        membership::boards_containing(&data.boards, name, latitude, longitude)
    }

    /// ボード一覧と各ボードの詳細を取り直し、キャッシュを丸ごと差し替える。
    ///
    /// 詳細取得はボードごとに並列で行い、失敗したボードは空のブックマーク
    /// として扱う（ストア全体のエラーにはしない）。一覧取得そのものが
    /// 失敗した場合のみストアのエラーになり、キャッシュは前回の内容を保つ。
    pub async fn refresh(&self) -> Result<()> {
        let boards = match self.board_gateway.my_boards().await {
            Ok(boards) => boards,
            Err(err) => {
                warn!("stamp board list fetch failed: {err}");
                if let Some(fixtures) = &self.fixture_fallback {
                    warn!("using local fixture data instead");
                    let boards = fixtures.clone();
                    let bookmarks = collect_bookmarks(&boards);
                    *self.data.write().await = StampData { boards, bookmarks };
                    self.clear_error().await;
                    return Ok(());
                }
                self.set_error(err.to_string()).await;
                return Err(err);
            }
        };

        let detail_fetches = boards.into_iter().map(|board| async move {
            match self.board_gateway.get_board(board.id).await {
                Ok(Some(detail)) => StampBoard {
                    bookmarks: detail.bookmarks,
                    ..board
                },
                Ok(None) => {
                    warn!("stamp board {} disappeared during refresh", board.id);
                    StampBoard {
                        bookmarks: Vec::new(),
                        ..board
                    }
                }
                Err(err) => {
                    warn!("stamp board {} detail fetch failed: {err}", board.id);
                    StampBoard {
                        bookmarks: Vec::new(),
                        ..board
                    }
                }
            }
        });
        let boards = join_all(detail_fetches).await;

        debug!("stamp cache refreshed: {} boards", boards.len());
        let bookmarks = collect_bookmarks(&boards);
        *self.data.write().await = StampData { boards, bookmarks };
        self.clear_error().await;
        Ok(())
    }

    /// ボードを作成し、サーバーが採番したボードをキャッシュに追加する。
    /// 失敗時はキャッシュに触れず、リトライもしない。
    pub async fn create_board(&self, title: &str, color: BoardColor) -> Result<StampBoard> {
        match self.board_gateway.create_board(title, color).await {
            Ok(board) => {
                self.data.write().await.boards.push(board.clone());
                self.clear_error().await;
                Ok(board)
            }
            Err(err) => {
                warn!("stamp board create failed: {err}");
                self.set_error(err.to_string()).await;
                Err(err)
            }
        }
    }

    /// タイトルと色は独立したエンドポイントなので、指定があったものを
    /// それぞれ呼ぶ。ローカルへの反映は全件成功時のみ（全か無か）。
    /// タイトルだけ成功して色が失敗すると、次の refresh までサーバーと
    /// キャッシュがずれる点は既知のギャップ。
    pub async fn update_board(&self, id: i64, patch: BoardPatch) -> Result<()> {
        let mut failure = None;

        if let Some(title) = &patch.title {
            if let Err(err) = self.board_gateway.update_title(id, title).await {
                warn!("stamp board {id} title update failed: {err}");
                failure = Some(err);
            }
        }
        if let Some(color) = &patch.color {
            if let Err(err) = self.board_gateway.update_color(id, color.clone()).await {
                warn!("stamp board {id} color update failed: {err}");
                failure.get_or_insert(err);
            }
        }

        if let Some(err) = failure {
            self.set_error(err.to_string()).await;
            return Err(err);
        }

        let mut data = self.data.write().await;
        if let Some(board) = data.boards.iter_mut().find(|board| board.id == id) {
            if let Some(title) = patch.title {
                board.title = title;
            }
            if let Some(color) = patch.color {
                board.color = color;
            }
        }
        Ok(())
    }

    /// ボードを削除し、成功したらキャッシュからも落とす。
    pub async fn delete_board(&self, id: i64) -> Result<()> {
        match self.board_gateway.delete_board(id).await {
            Ok(_) => {
                self.data.write().await.boards.retain(|board| board.id != id);
                self.clear_error().await;
                Ok(())
            }
            Err(err) => {
                warn!("stamp board {id} delete failed: {err}");
                self.set_error(err.to_string()).await;
                Err(err)
            }
        }
    }

    /// 訪問状態で絞ったブックマーク一覧をサーバーから取得する。
    pub async fn fetch_bookmarks(&self, visited: Option<bool>) -> Result<Vec<Bookmark>> {
        self.bookmark_gateway.my_bookmarks(visited).await
    }

    /// 投稿からのブックマーク登録。成功したら全体を取り直す。
    pub async fn bookmark_post(&self, post_id: i64) -> Result<()> {
        self.apply_remote(self.bookmark_gateway.add_by_post(post_id).await)
            .await
    }

    pub async fn unbookmark_post(&self, post_id: i64) -> Result<()> {
        self.apply_remote(self.bookmark_gateway.remove_by_post(post_id).await)
            .await
    }

    /// 検索結果からのブックマーク登録。
    pub async fn bookmark_place(&self, request: &PlaceBookmarkRequest) -> Result<()> {
        self.apply_remote(self.bookmark_gateway.add_by_search(request).await)
            .await
    }

    pub async fn add_bookmark_to_board(&self, board_id: i64, bookmark_id: i64) -> Result<()> {
        self.apply_remote(self.board_gateway.add_bookmark(board_id, bookmark_id).await)
            .await
    }

    pub async fn remove_bookmark_from_board(&self, board_id: i64, bookmark_id: i64) -> Result<()> {
        self.apply_remote(
            self.board_gateway
                .remove_bookmark(board_id, bookmark_id)
                .await,
        )
        .await
    }

    async fn apply_remote(&self, outcome: Result<String>) -> Result<()> {
        match outcome {
            Ok(_) => self.refresh().await,
            Err(err) => {
                warn!("bookmark operation failed: {err}");
                self.set_error(err.to_string()).await;
                Err(err)
            }
        }
    }

    /// ローカル専用のブックマーク追加。平坦化ミラーにだけ入る。
    pub async fn add_bookmark_local(&self, bookmark: NewBookmark) -> Bookmark {
        let bookmark = Bookmark {
            post_id: Utc::now().timestamp_millis(),
            title: bookmark.title,
            address: bookmark.address,
            latitude: bookmark.latitude,
            longitude: bookmark.longitude,
            visited: bookmark.visited,
        };
        self.data.write().await.bookmarks.push(bookmark.clone());
        bookmark
    }

    /// ローカル専用のブックマーク削除。ボード内とミラーの両方から落とす。
    pub async fn remove_bookmark_local(&self, bookmark_id: i64) {
        let mut data = self.data.write().await;
        for board in &mut data.boards {
            board.bookmarks.retain(|b| b.post_id != bookmark_id);
        }
        data.bookmarks.retain(|b| b.post_id != bookmark_id);
    }

    /// 訪問状態の切り替え。対応するバックエンドのエンドポイントが
    /// まだ無いため、クライアント側の状態だけを書き換える。
    pub async fn set_bookmark_visited(&self, bookmark_id: i64, visited: bool) {
        let mut data = self.data.write().await;
        for board in &mut data.boards {
            for bookmark in &mut board.bookmarks {
                if bookmark.post_id == bookmark_id {
                    bookmark.visited = visited;
                }
            }
        }
        for bookmark in &mut data.bookmarks {
            if bookmark.post_id == bookmark_id {
                bookmark.visited = visited;
            }
        }
    }

    /// ログアウト時に呼ぶ。キャッシュは空として扱う。
    pub async fn clear(&self) {
        *self.data.write().await = StampData::default();
        *self.last_error.write().await = None;
    }
}
