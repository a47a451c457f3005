//! LinkedIn 员工数脚本 - 编排层

use crate::browser;
use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::JsExecutor;
use crate::models::{resolve_data_path, CompanyTable, EmployeeInfo};
use crate::services::{ChallengeGuard, LinkedInCredentials, LinkedInService};
use crate::utils::logging::{log_inputs_loaded, log_progress, log_startup, log_summary};
use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const COMPANY_COLUMN: &str = "Companies";
pub const URL_COLUMN: &str = "Url";
pub const EMPLOYEES_COLUMN: &str = "Employees";
/// 员工数列插入的位置
const EMPLOYEES_INDEX: usize = 2;

/// LinkedIn 员工数任务
pub struct EmployeeCounterJob {
    config: Config,
    output: Option<PathBuf>,
}

impl EmployeeCounterJob {
    /// # 参数
    /// - `output`: 结果文件，None 时写到当前目录下与输入同名的文件
    pub fn new(config: Config, output: Option<PathBuf>) -> Self {
        Self { config, output }
    }

    pub async fn run(&self) -> Result<()> {
        log_startup("LinkedIn 员工数统计", Some(self.config.headless));

        let credentials = self.credentials()?;
        let source = resolve_data_path(&self.config.company_filename, &self.config.data_folder);
        let mut table = CompanyTable::load(&source)?;
        if table.is_empty() {
            warn!("⚠️ {} 中没有公司记录，程序结束", source.display());
            return Ok(());
        }
        let companies: Vec<String> = table
            .column(COMPANY_COLUMN)?
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        log_inputs_loaded(companies.len(), &source.display().to_string());

        let (mut browser, page) = browser::open_session(&self.config).await?;
        let executor = JsExecutor::new(page);
        let guard = ChallengeGuard::new(
            !self.config.interactive_browser(),
            Duration::from_secs(2),
            Duration::from_secs(5),
        );
        let service = LinkedInService::new(
            self.config.linkedin_url.clone(),
            guard,
            Duration::from_secs(self.config.selector_timeout_secs),
        );

        service.login(&executor, &credentials).await?;

        let mut results = HashMap::new();
        for (idx, name) in companies.iter().enumerate() {
            log_progress(idx + 1, companies.len(), name);
            match service.lookup(&executor, name).await {
                Ok(info) => {
                    info!(
                        "{}: {} 名员工",
                        name,
                        info.employee_count().unwrap_or("未知")
                    );
                    results.insert(name.clone(), info);
                }
                Err(e) => warn!("查询 {} 失败: {:#}", name, e),
            }
        }
        if let Err(e) = browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }

        apply_results(&mut table, &results)?;
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.company_filename));
        table.save(&output)?;

        log_summary(results.len(), companies.len() - results.len(), companies.len());
        info!(
            "All information are collected, please check on your {}!",
            output.display()
        );
        Ok(())
    }

    fn credentials(&self) -> Result<LinkedInCredentials> {
        let login = self
            .config
            .account_name
            .clone()
            .ok_or_else(|| AppError::missing_setting("ACCOUNT_NAME"))?;
        let password = self
            .config
            .account_password
            .clone()
            .ok_or_else(|| AppError::missing_setting("ACCOUNT_PASSWORD"))?;
        Ok(LinkedInCredentials { login, password })
    }
}

/// 把查询结果写入表格
///
/// 在第 3 列插入 `Employees`，`Url` 列不存在时追加；没有结果的公司保持空白。
pub fn apply_results(table: &mut CompanyTable, results: &HashMap<String, EmployeeInfo>) -> Result<()> {
    table.insert_column(EMPLOYEES_INDEX, EMPLOYEES_COLUMN, "");
    table.ensure_column(URL_COLUMN);

    for (name, info) in results {
        let Some(row) = table.find_row(COMPANY_COLUMN, name) else {
            warn!("表格中找不到公司: {}", name);
            continue;
        };
        if let Some(url) = &info.url {
            table.set(row, URL_COLUMN, url.as_str())?;
        }
        table.set(row, EMPLOYEES_COLUMN, info.employee_count().unwrap_or_default())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(url: &str, headline: &str) -> EmployeeInfo {
        EmployeeInfo {
            url: Some(url.to_string()),
            headlines: vec![headline.to_string()],
        }
    }

    #[test]
    fn test_apply_results() {
        let mut table = CompanyTable::from_parts(
            vec!["Companies".into(), "Url".into()],
            vec![vec!["Acme".into(), "".into()], vec!["Globex".into(), "".into()]],
        );
        let mut results = HashMap::new();
        results.insert(
            "Globex".to_string(),
            info("https://www.linkedin.com/company/globex/", "12,345 employees"),
        );
        results.insert("Unknown".to_string(), info("x", "1 employee"));

        apply_results(&mut table, &results).unwrap();

        assert_eq!(table.headers(), ["Companies", "Url", "Employees"]);
        assert_eq!(table.rows()[0], vec!["Acme", "", ""]);
        assert_eq!(
            table.rows()[1],
            vec!["Globex", "https://www.linkedin.com/company/globex/", "12,345"]
        );
    }

    #[test]
    fn test_apply_results_adds_url_column() {
        let mut table = CompanyTable::from_parts(vec!["Companies".into()], vec![vec!["Acme".into()]]);
        let mut results = HashMap::new();
        results.insert("Acme".to_string(), info("https://l.test/acme", "7 employees"));

        apply_results(&mut table, &results).unwrap();
        assert_eq!(table.headers(), ["Companies", "Employees", "Url"]);
        assert_eq!(table.rows()[0], vec!["Acme", "7", "https://l.test/acme"]);
    }

    #[tokio::test]
    async fn test_empty_input_skips_browser() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("companies.csv"), "Companies,Url\n").unwrap();
        let config = Config {
            data_folder: dir.path().display().to_string(),
            account_name: Some("me@example.com".to_string()),
            account_password: Some("secret".to_string()),
            ..Config::default()
        };
        let output = dir.path().join("result.csv");

        EmployeeCounterJob::new(config, Some(output.clone()))
            .run()
            .await
            .unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_credentials() {
        let job = EmployeeCounterJob::new(Config::default(), None);
        let err = job.credentials().unwrap_err();
        assert!(err.to_string().contains("ACCOUNT_NAME"));
    }
}
