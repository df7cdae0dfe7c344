use anyhow::{anyhow, Context, Result};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::storage::{FileKind, FilePatch, FileRecord, NewFile, TreeNode};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Thin HTTP client for the file tree API.
#[derive(Clone)]
pub struct FilesClient {
    base: Url,
    client: reqwest::Client,
}

impl FilesClient {
    /// `base` may carry a path prefix (e.g. behind a proxy); requests resolve below it.
    pub fn new(base: &str) -> Result<Self> {
        let mut base = Url::parse(base).context("invalid base URL")?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url { &self.base }

    // Paths are relative so the base prefix survives the join.
    fn url(&self, path: &str) -> Result<Url> {
        self.base.join(path).with_context(|| format!("invalid request path: {}", path))
    }

    fn file_url(&self, id: &str) -> Result<Url> {
        let mut url = self.url("api/files")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base URL cannot carry a path"))?
            .push(id);
        Ok(url)
    }

    pub async fn tree(&self) -> Result<Vec<TreeNode>> {
        let resp = self.client.get(self.url("api/files")?).send().await?;
        read_json(resp).await
    }

    pub async fn list(&self) -> Result<Vec<FileRecord>> {
        let mut url = self.url("api/files")?;
        url.query_pairs_mut().append_pair("flat", "true");
        let resp = self.client.get(url).send().await?;
        read_json(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<FileRecord> {
        let resp = self.client.get(self.file_url(id)?).send().await?;
        read_json(resp).await
    }

    pub async fn create(&self, name: &str, kind: FileKind, parent_id: Option<&str>, content: Option<&str>) -> Result<FileRecord> {
        let body = NewFile {
            name: name.to_string(),
            kind,
            parent_id: parent_id.map(|s| s.to_string()),
            content: content.map(|s| s.to_string()),
        };
        let resp = self.client.post(self.url("api/files")?).json(&body).send().await?;
        read_json(resp).await
    }

    pub async fn update(&self, id: &str, patch: &FilePatch) -> Result<FileRecord> {
        let resp = self.client.patch(self.file_url(id)?).json(patch).send().await?;
        read_json(resp).await
    }

    /// Returns false when the server reports the id as absent.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let resp = self.client.delete(self.file_url(id)?).send().await?;
        match resp.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(remote_error(resp).await),
        }
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        let resp = self.client.get(self.url("health")?).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        return Err(remote_error(resp).await);
    }
    let v = resp.json::<T>().await.context("failed to decode server response")?;
    Ok(v)
}

async fn remote_error(resp: Response) -> anyhow::Error {
    let status = resp.status();
    let val: serde_json::Value = resp.json().await.unwrap_or(serde_json::json!({}));
    match (val.get("code").and_then(|c| c.as_str()), val.get("message").and_then(|m| m.as_str())) {
        (Some(code), Some(message)) => anyhow!("remote error (HTTP {}): {}: {}", status.as_u16(), code, message),
        _ => anyhow!("remote error: HTTP {}", status),
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod connectivity_tests;
