use crate::application::ports::session_store::SessionStore;
use anyhow::{Context, Result as AnyResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// localStorage 相当の JSON ファイルストア。
///
/// 1 ファイルにキーと値のマップを持ち、変更のたびに書き戻す。
/// 有効期限の管理はせず、消えるのは明示的な削除か 401 起因のクリアのみ。
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileSessionStore {
    /// 既定の保存先。OS のデータディレクトリ配下に置く。
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stampbook")
            .join("session.json")
    }

    /// ファイルを読み込んでストアを開く。ファイルが無ければ空で始める。
    pub async fn open(path: impl Into<PathBuf>) -> AnyResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).context("session file is not valid JSON")?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err).context("failed to read session file"),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> AnyResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create session directory")?;
        }
        let raw =
            serde_json::to_string_pretty(entries).context("failed to serialize session data")?;
        tokio::fs::write(&self.path, raw)
            .await
            .context("failed to write session file")?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn store(
        &self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await.map_err(Into::into)
    }

    async fn retrieve(
        &self,
        key: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        self.persist(&entries).await.map_err(Into::into)
    }

    async fn clear(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await.map_err(Into::into)
    }
}
