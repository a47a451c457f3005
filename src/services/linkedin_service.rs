//! LinkedIn 服务 - 业务能力层
//!
//! 负责登录和查询单个公司的员工数，不关心 CSV 的读写

use crate::infrastructure::JsExecutor;
use crate::models::EmployeeInfo;
use crate::services::challenge_guard::{ChallengeGuard, ChallengeOutcome, UrlProbe};
use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info};

const LOGIN_INPUT: &str = "input#session_key";
const PASSWORD_INPUT: &str = "input#session_password";
const SEARCH_INPUT: &str = ".search-global-typeahead__input";
const NAV_ANCHOR: &str = ".org-page-navigation__item-anchor";
const PEOPLE_CAROUSEL: &str = ".org-people__header-spacing-carousel";
/// 登录后出现验证时 URL 中包含的片段
pub const CHECKPOINT_FRAGMENT: &str = "checkpoint/challenge";

/// 登录凭据
#[derive(Clone)]
pub struct LinkedInCredentials {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for LinkedInCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInCredentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// LinkedIn 服务
pub struct LinkedInService {
    home_url: String,
    guard: ChallengeGuard,
    timeout: Duration,
}

impl LinkedInService {
    /// # 参数
    /// - `home_url`: 登录页
    /// - `guard`: 登录后处理 checkpoint 的守卫
    /// - `timeout`: 等待页面元素的最长时间
    pub fn new(home_url: impl Into<String>, guard: ChallengeGuard, timeout: Duration) -> Self {
        Self {
            home_url: home_url.into(),
            guard,
            timeout,
        }
    }

    /// 登录；出现 checkpoint 时等待人工处理
    pub async fn login(&self, executor: &JsExecutor, credentials: &LinkedInCredentials) -> Result<ChallengeOutcome> {
        executor.goto(&self.home_url).await?;
        executor.wait_for_selector(LOGIN_INPUT, self.timeout).await?;

        executor.fill(LOGIN_INPUT, &credentials.login).await?;
        executor.fill(PASSWORD_INPUT, &credentials.password).await?;
        executor
            .wait_for_value(&click_by_text_js("button", "Sign in", true)?, "Sign in 按钮", self.timeout)
            .await?;
        debug!("已提交登录表单");
        executor.pause(2000).await;

        let probe = UrlProbe::new(executor, CHECKPOINT_FRAGMENT);
        let outcome = self.guard.wait_until_clear(&probe).await?;
        if outcome == ChallengeOutcome::NotPresent {
            info!("本次登录没有出现验证，继续处理");
        }
        Ok(outcome)
    }

    /// 搜索公司并读取 People 页面的员工数
    pub async fn lookup(&self, executor: &JsExecutor, company: &str) -> Result<EmployeeInfo> {
        executor.wait_for_selector(SEARCH_INPUT, self.timeout).await?;
        executor.fill(SEARCH_INPUT, company).await?;
        executor.press_enter(SEARCH_INPUT).await?;

        let href = executor
            .wait_for_value(&click_by_text_js("a", company, true)?, company, self.timeout)
            .await
            .with_context(|| format!("搜索结果中没有名为 {} 的链接", company))?;
        let url = link_target(&href);
        debug!("{} 的主页: {:?}", company, url);

        executor
            .wait_for_value(&click_by_text_js(NAV_ANCHOR, "People", false)?, "People 导航", self.timeout)
            .await?;
        executor.pause(2000).await;
        executor.wait_for_selector(PEOPLE_CAROUSEL, self.timeout).await?;

        let headlines: Vec<String> = executor.eval_as(headlines_js()?).await?;
        Ok(EmployeeInfo { url, headlines })
    }
}

/// 点击第一个文本匹配的元素，返回其 href（没有 href 时返回 true），找不到返回 null
///
/// `exact` 为 true 时要求去掉首尾空白后完全相等，否则只需包含
fn click_by_text_js(selector: &str, text: &str, exact: bool) -> Result<String> {
    Ok(format!(
        r#"(() => {{
            const wanted = {text};
            const el = Array.from(document.querySelectorAll({selector})).find((e) => {{
                const t = (e.innerText || "").trim();
                return {exact} ? t === wanted : t.includes(wanted);
            }});
            if (!el) return null;
            const href = el.getAttribute("href");
            el.click();
            return href === null ? true : href;
        }})()"#,
        text = serde_json::to_string(text)?,
        selector = serde_json::to_string(selector)?,
        exact = exact,
    ))
}

fn headlines_js() -> Result<String> {
    Ok(format!(
        r#"Array.from(document.querySelectorAll({} + " h2")).map((e) => (e.innerText || "").trim())"#,
        serde_json::to_string(PEOPLE_CAROUSEL)?
    ))
}

/// 点击脚本返回 href 字符串时取出链接
fn link_target(value: &JsonValue) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_js_escapes_text() {
        let js = click_by_text_js("a", r#"Acme "Tools""#, true).unwrap();
        assert!(js.contains(r#"const wanted = "Acme \"Tools\"";"#));
        assert!(js.contains(r#"document.querySelectorAll("a")"#));
        assert!(js.contains("true ? t === wanted"));
    }

    #[test]
    fn test_click_js_contains_mode() {
        let js = click_by_text_js(NAV_ANCHOR, "People", false).unwrap();
        assert!(js.contains("false ? t === wanted : t.includes(wanted)"));
    }

    #[test]
    fn test_link_target() {
        assert_eq!(
            link_target(&serde_json::json!("https://www.linkedin.com/company/acme/")),
            Some("https://www.linkedin.com/company/acme/".to_string())
        );
        assert_eq!(link_target(&serde_json::json!(true)), None);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = LinkedInCredentials {
            login: "me@example.com".to_string(),
            password: "secret".to_string(),
        };
        let text = format!("{:?}", creds);
        assert!(text.contains("me@example.com"));
        assert!(!text.contains("secret"));
    }
}
