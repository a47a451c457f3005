use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, BrowserError};
use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info};

/// 启动浏览器并打开一个空白页
///
/// # 参数
/// - `headless`: 是否无头；需要人工处理验证码时应关闭
/// - `executable`: 浏览器可执行文件，None 时由 chromiumoxide 自动查找
pub async fn launch_browser(headless: bool, executable: Option<&str>) -> Result<(Browser, Page)> {
    info!("🚀 启动浏览器 (无头模式: {})...", headless);

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        debug!("使用浏览器: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--lang=en-US",
        ])
        .window_size(1366, 900)
        .build()
        .map_err(|e| AppError::Browser(BrowserError::LaunchFailed(e)))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| AppError::Browser(BrowserError::LaunchFailed(e.to_string())))?;

    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await?;
    debug!("浏览器启动成功");

    Ok((browser, page))
}
