//! Google Drive API 客户端
//!
//! 封装 files.list 调用

use crate::error::{ApiError, AppError};
use crate::models::{DriveFile, FileList};
use anyhow::{Context, Result};
use tracing::debug;

/// files.list 请求的字段
pub const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size, parents, modifiedTime)";

/// Drive 客户端
pub struct DriveClient {
    base_url: String,
    access_token: String,
    http: reqwest::Client,
}

impl DriveClient {
    /// # 参数
    /// - `base_url`: API 地址，例如 `https://www.googleapis.com`
    /// - `access_token`: OAuth 访问令牌
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            http: reqwest::Client::new(),
        }
    }

    /// 读取一页文件列表
    pub async fn list_page(&self, page_size: u32, page_token: Option<&str>) -> Result<FileList> {
        let endpoint = format!("{}/drive/v3/files", self.base_url);
        let page_size = page_size.to_string();
        let mut query: Vec<(&str, &str)> = vec![("pageSize", page_size.as_str()), ("fields", LIST_FIELDS)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let resp = self
            .http
            .get(&endpoint)
            .bearer_auth(&self.access_token)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("请求失败: {}", endpoint))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                body,
            })
            .into());
        }

        let list: FileList = resp.json().await.context("无法解析 files.list 响应")?;
        debug!("本页 {} 个文件", list.files.len());
        Ok(list)
    }

    /// 读取文件列表，最多跟随 `max_pages` 页
    pub async fn list_files(&self, page_size: u32, max_pages: u32) -> Result<Vec<DriveFile>> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..max_pages.max(1) {
            let page = self.list_page(page_size, page_token.as_deref()).await?;
            files.extend(page.files);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }
}
