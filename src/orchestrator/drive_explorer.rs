//! Google Drive 文件脚本 - 编排层

use crate::config::Config;
use crate::models::{resolve_data_path, DriveFile};
use crate::services::{render_files, Doc, DriveAuth, DriveClient, KeywordMatcher, PhraseNormalizer};
use crate::utils::logging::log_startup;
use anyhow::Result;
use tracing::info;

/// Drive 文件浏览
pub struct DriveExplorer {
    config: Config,
}

impl DriveExplorer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 没有关键词时列出文件，否则按关键词匹配文件名
    pub async fn run(&self, keywords: &[String]) -> Result<()> {
        log_startup("Google Drive", None);

        let files = self.fetch_files().await?;
        if keywords.is_empty() {
            show_files(&files);
        } else {
            let matches = search_files(&files, keywords)?;
            if matches.is_empty() {
                info!("No matches found.");
            }
            for doc in matches {
                info!("Matches: {}", doc);
            }
        }
        Ok(())
    }

    async fn fetch_files(&self) -> Result<Vec<DriveFile>> {
        let secrets = resolve_data_path(&self.config.credential_filename, &self.config.data_folder);
        let auth = DriveAuth::new(secrets, &self.config.token_path, self.config.scopes());
        let token = auth.access_token().await?;

        let client = DriveClient::new(&self.config.drive_api_base_url, token);
        client
            .list_files(self.config.page_size, self.config.max_pages)
            .await
    }
}

/// 输出文件表格
pub fn show_files(files: &[DriveFile]) {
    let listing = render_files(files);
    info!("{}", listing.message);
    if let Some(data) = listing.data {
        info!("\n{}", data);
    }
}

/// 返回规范化后与关键词匹配的文件名
pub fn search_files(files: &[DriveFile], keywords: &[String]) -> Result<Vec<String>> {
    let normalizer = PhraseNormalizer::new()?;
    let matcher = KeywordMatcher::new(keywords);
    let docs: Vec<Doc> = files.iter().map(|f| normalizer.doc(&f.name)).collect();
    Ok(matcher.find(&docs).into_iter().map(Doc::to_string).collect())
}
