use serde::{Deserialize, Serialize};
use std::fmt;

/// ボードに選べる色（デザインパレット準拠）。
pub const BOARD_PALETTE: [&str; 20] = [
    "#153641", "#22556e", "#4799b7", "#6db3bf", "#94cfc9", "#be6c84", "#665f79", "#355e7c",
    "#f6b192", "#f0747f", "#f94045", "#f99620", "#fcc651", "#92bd6b", "#57758f", "#665076",
    "#c75554", "#f08f6e", "#778c63", "#b2bc77",
];

/// スタンプボードの色。パレット外の値は受け付けない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardColor(String);

impl BoardColor {
    /// 16進カラー文字列から `BoardColor` を生成する。
    pub fn new(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err("BoardColor cannot be empty".to_string());
        }
        if !BOARD_PALETTE.contains(&normalized.as_str()) {
            return Err(format!("Color {value} is not in the board palette"));
        }
        Ok(Self(normalized))
    }

    /// パレットの n 番目の色。範囲外はパレット長で折り返す。
    pub fn palette(index: usize) -> Self {
        Self(BOARD_PALETTE[index % BOARD_PALETTE.len()].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BoardColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<BoardColor> for String {
    fn from(value: BoardColor) -> Self {
        value.0
    }
}
