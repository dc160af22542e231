//! Downloads a file to a local storage directory.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;
use taskhive_shared::task::InternalTask;
use tokio::io::AsyncWriteExt;

use crate::dispatcher::TaskHandler;

#[derive(Debug, Deserialize)]
struct DownloadFilePayload {
    url: String,
    filename: String,
}

pub struct DownloadFileHandler {
    storage_dir: PathBuf,
    client: reqwest::Client,
}

impl DownloadFileHandler {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            storage_dir,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TaskHandler for DownloadFileHandler {
    async fn handle(&self, task: &InternalTask) -> anyhow::Result<()> {
        let payload: DownloadFilePayload = serde_json::from_value(task.task.payload.clone())?;
        if payload.url.is_empty() || payload.filename.is_empty() {
            anyhow::bail!("url and filename must not be empty");
        }

        tokio::fs::create_dir_all(&self.storage_dir).await?;
        let output_path = self.storage_dir.join(&payload.filename);

        let response = self.client.get(&payload.url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("non-200 response: {}", response.status());
        }
        let bytes = response.bytes().await?;

        let mut file = tokio::fs::File::create(&output_path).await?;
        file.write_all(&bytes).await?;

        tracing::debug!(bytes = bytes.len(), path = %output_path.display(), "downloaded file");
        Ok(())
    }
}
