use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 输入文件所在目录
    pub data_folder: String,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 已运行浏览器的调试端口，设置后直接连接而不是新启动
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<String>,
    // --- 公司详情 ---
    pub profile_filename: String,
    // --- LinkedIn ---
    pub company_filename: String,
    pub linkedin_url: String,
    pub account_name: Option<String>,
    pub account_password: Option<String>,
    // --- Google Drive ---
    pub credential_filename: String,
    pub token_path: String,
    pub scopes: Vec<String>,
    pub page_size: u32,
    pub max_pages: u32,
    pub drive_api_base_url: String,
    // --- 等待参数 ---
    pub challenge_poll_secs: u64,
    pub selector_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_folder: "data".to_string(),
            headless: true,
            browser_debug_port: None,
            chrome_executable: None,
            profile_filename: "companies_urls.csv".to_string(),
            company_filename: "companies.csv".to_string(),
            linkedin_url: "https://www.linkedin.com/home".to_string(),
            account_name: None,
            account_password: None,
            credential_filename: "credentials.json".to_string(),
            token_path: "token.json".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/drive.metadata.readonly".to_string()],
            page_size: 10,
            max_pages: 1,
            drive_api_base_url: "https://www.googleapis.com".to_string(),
            challenge_poll_secs: 5,
            selector_timeout_secs: 30,
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    data_folder: Option<String>,
    headless: Option<bool>,
    browser_debug_port: Option<u16>,
    chrome_executable: Option<String>,
    profile_filename: Option<String>,
    company_filename: Option<String>,
    linkedin_url: Option<String>,
    account_name: Option<String>,
    account_password: Option<String>,
    credential_filename: Option<String>,
    token_path: Option<String>,
    scopes: Option<Vec<String>>,
    page_size: Option<u32>,
    max_pages: Option<u32>,
    drive_api_base_url: Option<String>,
    challenge_poll_secs: Option<u64>,
    selector_timeout_secs: Option<u64>,
}

impl Config {
    /// 加载配置：默认值 → 配置文件（可选） → 环境变量（含 .env）
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        let default_file = Path::new("scout.toml");
        match config_file {
            Some(path) => config.merge_file(path)?,
            None if default_file.exists() => config.merge_file(default_file)?,
            None => {}
        }
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 浏览器窗口是否对用户可见（连接到已打开的浏览器时总是可见）
    pub fn interactive_browser(&self) -> bool {
        !self.headless || self.browser_debug_port.is_some()
    }

    /// 规范化后的授权范围：去掉空白和空项
    pub fn scopes(&self) -> Vec<String> {
        self.scopes
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        self.merge_toml(&content)
            .map_err(|message| ConfigError::FileParseFailed {
                path: path.display().to_string(),
                message,
            })
    }

    fn merge_toml(&mut self, content: &str) -> Result<(), String> {
        let file: FileConfig = toml::from_str(content).map_err(|e| e.to_string())?;

        if let Some(v) = file.data_folder {
            self.data_folder = v;
        }
        if let Some(v) = file.headless {
            self.headless = v;
        }
        if file.browser_debug_port.is_some() {
            self.browser_debug_port = file.browser_debug_port;
        }
        if file.chrome_executable.is_some() {
            self.chrome_executable = file.chrome_executable;
        }
        if let Some(v) = file.profile_filename {
            self.profile_filename = v;
        }
        if let Some(v) = file.company_filename {
            self.company_filename = v;
        }
        if let Some(v) = file.linkedin_url {
            self.linkedin_url = v;
        }
        if file.account_name.is_some() {
            self.account_name = file.account_name;
        }
        if file.account_password.is_some() {
            self.account_password = file.account_password;
        }
        if let Some(v) = file.credential_filename {
            self.credential_filename = v;
        }
        if let Some(v) = file.token_path {
            self.token_path = v;
        }
        if let Some(v) = file.scopes {
            self.scopes = v;
        }
        if let Some(v) = file.page_size {
            self.page_size = v;
        }
        if let Some(v) = file.max_pages {
            self.max_pages = v;
        }
        if let Some(v) = file.drive_api_base_url {
            self.drive_api_base_url = v;
        }
        if let Some(v) = file.challenge_poll_secs {
            self.challenge_poll_secs = v;
        }
        if let Some(v) = file.selector_timeout_secs {
            self.selector_timeout_secs = v;
        }
        Ok(())
    }

    fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATA_FOLDER") {
            self.data_folder = v;
        }
        if let Some(v) = lookup("HEADLESS_MODE") {
            self.headless = parse_flag("HEADLESS_MODE", &v)?;
        }
        if let Some(v) = lookup("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_value("BROWSER_DEBUG_PORT", &v, "u16")?);
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = lookup("G2_FILENAME") {
            self.profile_filename = v;
        }
        if let Some(v) = lookup("COMPANY_FILENAME") {
            self.company_filename = v;
        }
        if let Some(v) = lookup("LINKEDIN_URL") {
            self.linkedin_url = v;
        }
        if let Some(v) = lookup("ACCOUNT_NAME") {
            self.account_name = Some(v);
        }
        if let Some(v) = lookup("ACCOUNT_PASSWORD") {
            self.account_password = Some(v);
        }
        if let Some(v) = lookup("CREDENTIAL_FILENAME") {
            self.credential_filename = v;
        }
        if let Some(v) = lookup("TOKEN_PATH") {
            self.token_path = v;
        }
        if let Some(v) = lookup("SCOPES") {
            self.scopes = v.split(',').map(|s| s.to_string()).collect();
        }
        if let Some(v) = lookup("PAGE_SIZE") {
            self.page_size = parse_value("PAGE_SIZE", &v, "u32")?;
        }
        if let Some(v) = lookup("MAX_PAGES") {
            self.max_pages = parse_value("MAX_PAGES", &v, "u32")?;
        }
        if let Some(v) = lookup("DRIVE_API_BASE_URL") {
            self.drive_api_base_url = v;
        }
        if let Some(v) = lookup("CHALLENGE_POLL_SECS") {
            self.challenge_poll_secs = parse_value("CHALLENGE_POLL_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("SELECTOR_TIMEOUT_SECS") {
            self.selector_timeout_secs = parse_value("SELECTOR_TIMEOUT_SECS", &v, "u64")?;
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

/// 解析 0/1/true/false 形式的开关
fn parse_flag(var_name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: "bool".to_string(),
        }),
    }
}
