use serde::{Deserialize, Serialize};

/// ログイン中ユーザーのプロフィール。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub nickname: String,
}
