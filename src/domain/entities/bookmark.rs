use serde::{Deserialize, Serialize};

/// 保存済みの場所。`post_id` がブックマーク ID を兼ねる。
/// 投稿由来なら実在の投稿 ID、検索由来ならエポックミリ秒の合成 ID。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub post_id: i64,
    pub title: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub visited: bool,
}
