//! 关键词匹配服务 - 业务能力层
//!
//! 把文件名拆成单词序列，再查找与关键词完全一致的连续片段

use anyhow::Result;
use regex::Regex;
use std::fmt;

/// 文件名规范化：只保留单词（可带一个大写首字母），用空格连接
///
/// `thinking_out_the_box` → `thinking out the box`，
/// `QuarterlyReport2024.xlsx` → `Quarterly Report xlsx`
pub struct PhraseNormalizer {
    word: Regex,
}

impl PhraseNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word: Regex::new(r"[A-Z]?[a-z]+")?,
        })
    }

    pub fn normalize(&self, phrase: &str) -> String {
        self.word
            .find_iter(phrase)
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// 由原始文件名生成文档
    pub fn doc(&self, name: &str) -> Doc {
        Doc::new(self.normalize(name))
    }
}

/// 分词后的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doc {
    text: String,
    tokens: Vec<String>,
}

impl Doc {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = text.split_whitespace().map(str::to_string).collect();
        Self { text, tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// 关键词匹配器：每个关键词对应一个词元，要求按顺序连续出现且大小写一致
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    pattern: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            pattern: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
        }
    }

    /// 文档中是否出现关键词序列；空模式不匹配任何文档
    pub fn matches(&self, doc: &Doc) -> bool {
        if self.pattern.is_empty() {
            return false;
        }
        doc.tokens()
            .windows(self.pattern.len())
            .any(|window| window == self.pattern.as_slice())
    }

    /// 返回所有匹配的文档
    pub fn find<'a>(&self, docs: &'a [Doc]) -> Vec<&'a Doc> {
        docs.iter().filter(|d| self.matches(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_doc(name: &str) -> Doc {
        PhraseNormalizer::new().unwrap().doc(name)
    }

    #[test]
    fn test_normalize_phrase() {
        let normalizer = PhraseNormalizer::new().unwrap();
        assert_eq!(normalizer.normalize("thinking_out_the_box"), "thinking out the box");
        assert_eq!(normalizer.normalize("QuarterlyReport2024.xlsx"), "Quarterly Report xlsx");
        assert_eq!(normalizer.normalize("ABC"), "");
        assert_eq!(normalizer.normalize("Duna"), "Duna");
    }

    #[test]
    fn test_single_keyword() {
        let doc = make_doc("thinking_out_the_box");
        assert!(KeywordMatcher::new(&["box"]).matches(&doc));
        assert!(!KeywordMatcher::new(&["rice"]).matches(&doc));
    }

    #[test]
    fn test_sequence_must_be_contiguous() {
        let doc = make_doc("thinking_out_the_box");
        assert!(KeywordMatcher::new(&["the", "box"]).matches(&doc));
        assert!(!KeywordMatcher::new(&["out", "box"]).matches(&doc));
        assert!(!KeywordMatcher::new(&["box", "the"]).matches(&doc));
    }

    #[test]
    fn test_case_sensitive() {
        let doc = make_doc("Annual_Report");
        assert!(KeywordMatcher::new(&["Report"]).matches(&doc));
        assert!(!KeywordMatcher::new(&["report"]).matches(&doc));
    }

    #[test]
    fn test_empty_pattern_and_longer_pattern() {
        let doc = make_doc("box");
        let empty: [&str; 0] = [];
        assert!(!KeywordMatcher::new(&empty).matches(&doc));
        assert!(!KeywordMatcher::new(&["a", "box"]).matches(&doc));
    }

    #[test]
    fn test_find() {
        let docs = vec![make_doc("thinking_out_the_box"), make_doc("Duna")];
        let found = KeywordMatcher::new(&["box"]).find(&docs);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].to_string(), "thinking out the box");
    }
}
