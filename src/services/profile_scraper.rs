//! 公司主页抓取服务 - 业务能力层
//!
//! 只负责"打开一个公司主页并读出详情"，不关心输入文件和输出格式

use crate::infrastructure::JsExecutor;
use crate::models::CompanyDetail;
use crate::services::challenge_guard::{ChallengeGuard, SelectorProbe};
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Cloudflare 挑战页上的元素
pub const CHALLENGE_SELECTOR: &str = "#challenge-running";

/// 页面上的一个详情块，字段都是原始文本
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DetailBlock {
    /// `p.fw-semibold > a` 的文本和链接
    pub link_text: Option<String>,
    pub link_href: Option<String>,
    /// `p.fw-semibold` 的文本
    pub label: Option<String>,
    /// 第一个 `span` 的文本
    pub span: Option<String>,
    /// 第一个和最后一个 `p` 的文本
    pub first_p: Option<String>,
    pub last_p: Option<String>,
}

impl DetailBlock {
    /// 把详情块转换成 (标签, 值)
    ///
    /// - 有链接：标签为链接文本，值为 href
    /// - 有 span：标签为加粗段落，值为第一个 span
    /// - 其余：第一个段落为标签，最后一个段落为值
    pub fn to_entry(&self) -> Option<(String, String)> {
        if let Some(text) = &self.link_text {
            return Some((text.clone(), self.link_href.clone().unwrap_or_default()));
        }
        if let Some(span) = &self.span {
            return Some((self.label.clone().unwrap_or_default(), span.clone()));
        }
        match (&self.first_p, &self.last_p) {
            (Some(first), Some(last)) => Some((first.clone(), last.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    name: String,
    blocks: Vec<DetailBlock>,
}

/// 读取页面标题和详情块的脚本
const EXTRACT_PROFILE_JS: &str = r#"
(() => {
    const text = (el) => (el ? el.innerText.trim() : null);
    const header = document.querySelector("div.rated-item__info h2");
    const blocks = [];
    document.querySelectorAll("div.show-for-xlarge .paper .detail-block__text").forEach((item) => {
        const link = item.querySelector("p.fw-semibold > a");
        const paragraphs = item.querySelectorAll("p");
        blocks.push({
            link_text: text(link),
            link_href: link ? link.getAttribute("href") : null,
            label: text(item.querySelector("p.fw-semibold")),
            span: text(item.querySelector("span")),
            first_p: paragraphs.length ? text(paragraphs[0]) : null,
            last_p: paragraphs.length ? text(paragraphs[paragraphs.length - 1]) : null,
        });
    });
    return { name: text(header) || "", blocks };
})()
"#;

/// 公司主页抓取服务
pub struct ProfileScraper {
    guard: ChallengeGuard,
}

impl ProfileScraper {
    pub fn new(guard: ChallengeGuard) -> Self {
        Self { guard }
    }

    /// 打开公司主页并抓取详情
    pub async fn scrape(&self, executor: &JsExecutor, url: &str) -> Result<CompanyDetail> {
        executor.goto(url).await?;

        let probe = SelectorProbe::new(executor, CHALLENGE_SELECTOR);
        self.guard.wait_until_clear(&probe).await?;

        let raw: RawProfile = executor.eval_as(EXTRACT_PROFILE_JS).await?;
        debug!("{} 共有 {} 个详情块", url, raw.blocks.len());
        if raw.name.is_empty() {
            warn!("页面上没有找到公司名称: {}", url);
        }

        Ok(build_detail(raw.name, &raw.blocks))
    }
}

/// 组合详情块，后出现的同名标签覆盖前面的
fn build_detail(name: String, blocks: &[DetailBlock]) -> CompanyDetail {
    let details: HashMap<String, String> = blocks.iter().filter_map(DetailBlock::to_entry).collect();
    CompanyDetail { name, details }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(json: serde_json::Value) -> DetailBlock {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_link_block() {
        let b = block(serde_json::json!({
            "link_text": "Visit website",
            "link_href": "https://acme.test",
            "label": "Visit website",
            "first_p": "Visit website",
            "last_p": "Visit website"
        }));
        assert_eq!(
            b.to_entry(),
            Some(("Visit website".to_string(), "https://acme.test".to_string()))
        );
    }

    #[test]
    fn test_span_block() {
        let b = block(serde_json::json!({
            "label": "Phone",
            "span": "555-0100",
            "first_p": "Phone",
            "last_p": "Phone"
        }));
        assert_eq!(b.to_entry(), Some(("Phone".to_string(), "555-0100".to_string())));
    }

    #[test]
    fn test_paragraph_block() {
        let b = block(serde_json::json!({
            "label": "Year Founded",
            "first_p": "Year Founded",
            "last_p": "1999"
        }));
        assert_eq!(b.to_entry(), Some(("Year Founded".to_string(), "1999".to_string())));
    }

    #[test]
    fn test_empty_block_is_skipped() {
        assert_eq!(DetailBlock::default().to_entry(), None);
    }

    #[test]
    fn test_build_detail() {
        let blocks = vec![
            block(serde_json::json!({ "first_p": "Ownership", "last_p": "Private" })),
            block(serde_json::json!({ "label": "HQ Location", "span": "Springfield" })),
            DetailBlock::default(),
        ];
        let detail = build_detail("Acme".to_string(), &blocks);
        assert_eq!(detail.get("Name"), Some("Acme"));
        assert_eq!(detail.get("Ownership"), Some("Private"));
        assert_eq!(detail.get("HQ Location"), Some("Springfield"));
        assert_eq!(detail.details.len(), 2);
    }
}
