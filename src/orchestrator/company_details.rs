//! 公司主页详情脚本 - 编排层

use crate::browser;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::JsExecutor;
use crate::models::{resolve_data_path, CompanyDetail, CompanyTable, PROFILE_HEADERS};
use crate::services::{ChallengeGuard, ProfileScraper};
use crate::utils::logging::{log_inputs_loaded, log_progress, log_startup, log_summary};
use crate::utils::render_table;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// 输入 CSV 中的链接列
pub const URL_COLUMN: &str = "Url";

/// 公司主页详情任务
pub struct CompanyDetailsJob {
    config: Config,
    output: Option<PathBuf>,
}

impl CompanyDetailsJob {
    /// # 参数
    /// - `output`: 额外写出的 CSV 文件，None 时只输出到日志
    pub fn new(config: Config, output: Option<PathBuf>) -> Self {
        Self { config, output }
    }

    pub async fn run(&self) -> Result<()> {
        log_startup("公司详情抓取", Some(self.config.headless));

        let source = resolve_data_path(&self.config.profile_filename, &self.config.data_folder);
        let urls = load_urls(&source)?;
        log_inputs_loaded(urls.len(), &source.display().to_string());
        if urls.is_empty() {
            warn!("⚠️ 没有需要处理的链接，程序结束");
            return Ok(());
        }

        let (_browser, page) = browser::open_session(&self.config).await?;
        let executor = JsExecutor::new(page);
        let guard = ChallengeGuard::new(
            !self.config.interactive_browser(),
            Duration::from_secs(self.config.challenge_poll_secs),
            Duration::from_secs(2),
        )
        .settle_always();
        let scraper = ProfileScraper::new(guard);

        let mut details = Vec::with_capacity(urls.len());
        let mut failed = 0;
        for (idx, url) in urls.iter().enumerate() {
            log_progress(idx + 1, urls.len(), url);
            match scraper.scrape(&executor, url).await {
                Ok(detail) => details.push(detail),
                Err(e) if is_blocking(&e) => return Err(e),
                Err(e) => {
                    warn!("抓取 {} 失败: {:#}", url, e);
                    failed += 1;
                }
            }
        }

        let (message, table) = render_details(&details);
        info!("{}", message);
        info!("\n{}", table);

        if let Some(output) = &self.output {
            write_details(&details, output)?;
            info!("详情已写入: {}", output.display());
        }

        log_summary(details.len(), failed, urls.len());
        Ok(())
    }
}

/// 读取链接列，跳过空行
pub fn load_urls(path: &Path) -> Result<Vec<String>> {
    let table = CompanyTable::load(path)?;
    Ok(table
        .column(URL_COLUMN)?
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect())
}

/// 生成日志标题和详情表格
pub fn render_details(details: &[CompanyDetail]) -> (String, String) {
    let rows: Vec<Vec<String>> = details.iter().map(CompanyDetail::to_row).collect();
    ("Companies Details:".to_string(), render_table(&PROFILE_HEADERS, &rows))
}

/// 把详情写成 CSV
pub fn write_details(details: &[CompanyDetail], path: &Path) -> Result<()> {
    let table = CompanyTable::from_parts(
        PROFILE_HEADERS.iter().map(|h| h.to_string()).collect(),
        details.iter().map(CompanyDetail::to_row).collect(),
    );
    table.save(path)
}

/// 需要终止整个任务的错误
fn is_blocking(err: &anyhow::Error) -> bool {
    err.downcast_ref::<AppError>()
        .map(AppError::is_challenge_blocked)
        .unwrap_or(false)
}
