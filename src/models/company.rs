use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 公司详情表格的列，`Name` 来自页面标题，其余来自详情块
pub const PROFILE_HEADERS: [&str; 7] = [
    "Name",
    "Visit website",
    "Year Founded",
    "Total Revenue (USD mm)",
    "HQ Location",
    "Ownership",
    "Phone",
];

/// 缺失字段的占位文本
pub const MISSING: &str = "N/A";

/// 从公司主页抓取到的详情
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyDetail {
    /// 公司名称
    pub name: String,
    /// 详情块：标签 → 值
    #[serde(default)]
    pub details: HashMap<String, String>,
}

impl CompanyDetail {
    /// 按列名取值，`Name` 对应公司名称
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == "Name" {
            return Some(self.name.as_str()).filter(|n| !n.is_empty());
        }
        self.details.get(key).map(String::as_str)
    }

    /// 按 `PROFILE_HEADERS` 的顺序生成一行，缺失字段填 N/A
    pub fn to_row(&self) -> Vec<String> {
        PROFILE_HEADERS
            .iter()
            .map(|h| self.get(h).unwrap_or(MISSING).to_string())
            .collect()
    }
}

/// LinkedIn 上查到的公司信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeInfo {
    /// 公司主页链接
    pub url: Option<String>,
    /// People 页面卡片中的标题文本
    pub headlines: Vec<String>,
}

impl EmployeeInfo {
    /// 员工数：第一个标题的第一个词，例如 "1,234 employees" → "1,234"
    pub fn employee_count(&self) -> Option<&str> {
        self.headlines
            .first()
            .and_then(|h| h.split_whitespace().next())
    }
}
