//! 页面执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS / 等待元素 / 输入"等能力

use crate::error::{AppError, BrowserError};
use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// 轮询元素是否出现的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 页面执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 不认识公司 / LinkedIn
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 导航到指定 URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    /// 当前页面 URL
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// 页面上是否存在匹配选择器的元素
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.eval_as(js_code).await
    }

    /// 等待元素出现，超时返回 `BrowserError::SelectorTimeout`
    pub async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            serde_json::to_string(selector)?
        );
        self.wait_for_value(&js_code, selector, timeout).await?;
        Ok(())
    }

    /// 反复执行脚本，直到返回既不是 null 也不是 false 的值
    ///
    /// # 参数
    /// - `js_code`: 每次轮询执行的脚本
    /// - `what`: 超时错误中显示的描述
    /// - `timeout`: 最长等待时间
    pub async fn wait_for_value(&self, js_code: &str, what: &str, timeout: Duration) -> Result<JsonValue> {
        let started = Instant::now();
        loop {
            let value = self.eval(js_code).await?;
            if !matches!(value, JsonValue::Null | JsonValue::Bool(false)) {
                return Ok(value);
            }
            if started.elapsed() >= timeout {
                return Err(AppError::Browser(BrowserError::SelectorTimeout {
                    selector: what.to_string(),
                    timeout_secs: timeout.as_secs(),
                })
                .into());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// 清空输入框并输入文本
    pub async fn fill(&self, selector: &str, text: &str) -> Result<()> {
        let js_code = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.focus();
                el.value = "";
                el.dispatchEvent(new Event("input", {{ bubbles: true }}));
                return true;
            }})()"#,
            serde_json::to_string(selector)?
        );
        let found: bool = self.eval_as(js_code).await?;
        if !found {
            return Err(AppError::Browser(BrowserError::ElementNotFound(selector.to_string())).into());
        }

        self.page
            .find_element(selector)
            .await?
            .click()
            .await?
            .type_str(text)
            .await?;
        Ok(())
    }

    /// 在元素上按回车
    pub async fn press_enter(&self, selector: &str) -> Result<()> {
        self.page.find_element(selector).await?.press_key("Enter").await?;
        Ok(())
    }

    /// 点击元素
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.page.find_element(selector).await?.click().await?;
        Ok(())
    }

    /// 固定等待
    pub async fn pause(&self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}
