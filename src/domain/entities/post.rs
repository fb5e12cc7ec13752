use serde::{Deserialize, Serialize};

/// 場所についての掲示板投稿。ID はサーバーが採番する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// 投稿の作成・更新リクエスト本文。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Post {
    /// リクエスト内容で本体を上書きする。ID は変わらない。
    pub fn apply(&mut self, request: &NewPost) {
        self.title = request.title.clone();
        self.content = request.content.clone();
        self.address = request.address.clone();
        self.latitude = request.latitude;
        self.longitude = request.longitude;
    }
}
