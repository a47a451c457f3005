use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// OAuth 授权错误
    #[error("授权错误: {0}")]
    Auth(#[from] AuthError),
    /// 数据文件错误
    #[error("数据错误: {0}")]
    Data(#[from] DataError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 无头模式下遇到人机验证，无法人工介入
    #[error("页面出现人机验证 ({url})，无头模式下无法人工处理，请关闭 HEADLESS_MODE 后重试")]
    ChallengeBlocked { url: String },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {message}")]
    ConnectionFailed { port: u16, message: String },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 等待元素超时
    #[error("等待元素 {selector} 超时 ({timeout_secs} 秒)")]
    SelectorTimeout { selector: String, timeout_secs: u64 },
    /// 页面上找不到元素
    #[error("页面上找不到元素: {0}")]
    ElementNotFound(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, body={body}")]
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// OAuth 授权错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 客户端凭据文件格式不正确
    #[error("凭据文件 {path} 中缺少 installed/web 配置")]
    InvalidClientSecrets { path: String },
    /// 回调参数 state 不匹配
    #[error("OAuth 回调 state 参数不匹配")]
    StateMismatch,
    /// 用户拒绝授权或回调中没有 code
    #[error("OAuth 授权失败: {0}")]
    Denied(String),
    /// 令牌交换或刷新失败
    #[error("令牌请求失败 (status={status}): {body}")]
    TokenRequestFailed { status: u16, body: String },
}

/// 数据文件错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// CSV 中缺少指定列
    #[error("CSV 文件 {path} 中缺少列 {column}")]
    MissingColumn { path: String, column: String },
    /// 记录的字段数多于表头
    #[error("CSV 文件 {path} 第 {line} 行有 {found} 个字段，表头只有 {expected} 列")]
    TooManyFields {
        path: String,
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必需的设置不存在
    #[error("缺少必需的设置 {var_name}")]
    Missing { var_name: String },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {message}")]
    FileParseFailed { path: String, message: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建"缺少设置"错误
    pub fn missing_setting(var_name: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Missing {
            var_name: var_name.into(),
        })
    }

    /// 创建"缺少列"错误
    pub fn missing_column(path: impl Into<String>, column: impl Into<String>) -> Self {
        AppError::Data(DataError::MissingColumn {
            path: path.into(),
            column: column.into(),
        })
    }

    /// 是否为人机验证阻断
    pub fn is_challenge_blocked(&self) -> bool {
        matches!(self, AppError::ChallengeBlocked { .. })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_blocked_mentions_headless() {
        let err = AppError::ChallengeBlocked {
            url: "https://example.com".to_string(),
        };
        assert!(err.is_challenge_blocked());
        assert!(err.to_string().contains("HEADLESS_MODE"));
    }

    #[test]
    fn test_missing_column_message() {
        let err = AppError::missing_column("companies.csv", "Url");
        let text = err.to_string();
        assert!(text.contains("companies.csv"));
        assert!(text.contains("Url"));
        assert!(!err.is_challenge_blocked());
    }
}
