pub mod connection;
pub mod launch;

pub use connection::connect_to_browser_and_page;
pub use launch::launch_browser;

use crate::config::Config;
use anyhow::Result;
use chromiumoxide::{Browser, Page};

/// 根据配置获取浏览器会话：设置了调试端口就连接已有浏览器，否则新启动一个
pub async fn open_session(config: &Config) -> Result<(Browser, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port, None, None).await,
        None => launch_browser(config.headless, config.chrome_executable.as_deref()).await,
    }
}
