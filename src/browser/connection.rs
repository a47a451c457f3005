use crate::error::{AppError, BrowserError};
use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已启动的浏览器（--remote-debugging-port）并获取页面
///
/// 适合需要人工处理验证码的场景：浏览器窗口由用户自己打开并保持可见。
/// 指定 `target_title` 时复用标题匹配的标签页，否则新建页面。
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            message: e.to_string(),
        })
    })?;

    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    if let Some(title) = target_title {
        for p in browser.pages().await? {
            if let Ok(Some(page_title)) = p.get_title().await {
                if page_title.contains(title) {
                    info!("✓ 找到目标页面: {}", page_title);
                    return Ok((browser, p));
                }
            }
        }
        debug!("未找到标题包含 '{}' 的页面，将创建新页面", title);
    }

    let page = browser.new_page("about:blank").await?;
    if let Some(url) = target_url {
        page.goto(url).await?;
        info!("已导航到: {}", url);
    }

    Ok((browser, page))
}
