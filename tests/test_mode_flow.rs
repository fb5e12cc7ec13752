//! テストログインフラグで組んだ AppState を、モックバックエンド越しに
//! 一通り動かす結合テスト。

use stampbook::application::ports::session_store::{SessionStore, KEY_TEST_LOGIN};
use stampbook::domain::entities::NewPost;
use stampbook::infrastructure::storage::MemorySessionStore;
use stampbook::shared::config::AppConfig;
use stampbook::state::AppState;
use std::sync::Arc;

async fn test_mode_state() -> AppState {
    let storage = Arc::new(MemorySessionStore::new());
    storage
        .store(KEY_TEST_LOGIN, "true")
        .await
        .expect("set test login flag");
    AppState::with_storage(AppConfig::default(), storage)
        .await
        .expect("app state")
}

#[tokio::test(start_paused = true)]
async fn test_login_session_drives_all_stores_through_the_mock_backend() {
    let state = test_mode_state().await;

    let user = state.session.sign_in_test().await.expect("test login");
    assert_eq!(user.email, "user@gmail.com");
    assert!(state.session.is_logged_in().await);
    let token = state
        .session
        .token()
        .await
        .expect("token query")
        .expect("token present");
    assert!(token.starts_with("test-token-"));

    state.posts.refresh().await.expect("post refresh");
    assert_eq!(state.posts.posts().await.len(), 8);

    state.stamps.refresh().await.expect("stamp refresh");
    let data = state.stamps.data().await;
    assert_eq!(data.boards.len(), 3);
    assert_eq!(data.bookmarks.len(), 6);

    let ids = state
        .stamps
        .boards_for_place("스타벅스", 37.5519, 126.9255)
        .await;
    assert_eq!(ids, vec!["1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn posting_and_bookmarking_flow_updates_the_caches() {
    let state = test_mode_state().await;
    state.session.sign_in_test().await.expect("test login");
    state.posts.refresh().await.expect("post refresh");
    state.stamps.refresh().await.expect("stamp refresh");

    state
        .posts
        .create_post(&NewPost {
            title: "연남동 베이글 맛집".to_string(),
            content: "아침에만 여는 베이글 가게를 찾았습니다.".to_string(),
            address: "서울 마포구 연남로 12".to_string(),
            latitude: 37.5602,
            longitude: 126.9218,
        })
        .await
        .expect("create post");
    let posts = state.posts.posts().await;
    assert_eq!(posts.len(), 9);
    let created = posts.last().expect("created post");

    state
        .stamps
        .bookmark_post(created.id)
        .await
        .expect("bookmark new post");
    let bookmarks = state
        .stamps
        .fetch_bookmarks(None)
        .await
        .expect("fetch bookmarks");
    assert!(bookmarks.iter().any(|b| b.title == "연남동 베이글 맛집"));
}

#[tokio::test(start_paused = true)]
async fn logout_invalidates_every_store() {
    let state = test_mode_state().await;
    state.session.sign_in_test().await.expect("test login");
    state.posts.refresh().await.expect("post refresh");
    state.stamps.refresh().await.expect("stamp refresh");

    state.logout().await.expect("logout");

    assert!(!state.session.is_logged_in().await);
    assert!(state
        .session
        .token()
        .await
        .expect("token query")
        .is_none());
    assert!(state.posts.posts().await.is_empty());
    assert!(state
        .stamps
        .boards_for_place("스타벅스", 37.5519, 126.9255)
        .await
        .is_empty());
}
