use super::bookmark::Bookmark;
use crate::domain::value_objects::BoardColor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ブックマークを束ねるスタンプボード。
///
/// 所属の事実はボードの `bookmarks` の中にしか存在しない。
/// 一覧エンドポイントは `bookmarks` を省略するため serde 既定値で空になり、
/// 個別取得で初めて埋まる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampBoard {
    pub id: i64,
    pub title: String,
    pub color: BoardColor,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "user")]
    pub owner: BoardOwner,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardOwner {
    pub id: i64,
}
