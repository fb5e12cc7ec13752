use super::entities::{Bookmark, StampBoard};

/// 同一の場所とみなす座標差の上限（度）。緯度経度それぞれ約11mに相当する。
pub const COORDINATE_TOLERANCE: f64 = 0.0001;

/// ブックマークが指定の場所を指しているか。
///
/// 名前は正規化なしの完全一致。座標は軸ごとに独立して許容誤差内か判定する
/// （ユークリッド距離ではない）。同じ店でも投稿経由と検索経由で保存座標が
/// 微妙にずれるため、厳密一致では照合できない。
fn bookmark_matches(bookmark: &Bookmark, name: &str, latitude: f64, longitude: f64) -> bool {
    bookmark.title == name
        && (bookmark.latitude - latitude).abs() < COORDINATE_TOLERANCE
        && (bookmark.longitude - longitude).abs() < COORDINATE_TOLERANCE
}

/// 指定の場所を含むボードの ID を、ボードの並び順のまま返す。
///
/// ボード内に一致するブックマークが1件でもあればそのボードは含まれる。
/// 純関数であり、キャッシュのスナップショットにのみ依存する。
pub fn boards_containing(
    boards: &[StampBoard],
    name: &str,
    latitude: f64,
    longitude: f64,
) -> Vec<String> {
    let mut board_ids = Vec::new();
    for board in boards {
        let contains = board
            .bookmarks
            .iter()
            .any(|bookmark| bookmark_matches(bookmark, name, latitude, longitude));
        if contains {
            board_ids.push(board.id.to_string());
        }
    }
    board_ids
}
