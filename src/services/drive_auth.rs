//! Google OAuth 授权 - 业务能力层
//!
//! 已安装应用流程：本地回环地址接收授权码，令牌缓存到 token 文件，
//! 过期后使用 refresh_token 刷新。

use crate::error::{AppError, AuthError};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use url::Url;

/// 令牌到期前提前视为过期的秒数
const EXPIRY_SKEW_SECS: i64 = 60;

/// 客户端凭据（credentials.json 中的 installed / web 部分）
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// 读取 Google Cloud Console 下载的凭据文件
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取凭据文件: {}", path.display()))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(content)
            .with_context(|| format!("无法解析凭据文件: {}", path.display()))?;
        file.installed.or(file.web).ok_or_else(|| {
            AppError::Auth(AuthError::InvalidClientSecrets {
                path: path.display().to_string(),
            })
            .into()
        })
    }
}

/// 缓存在 token 文件中的授权信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// 是否已过期（没有到期时间的令牌视为未过期）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now >= expiry - ChronoDuration::seconds(EXPIRY_SKEW_SECS),
            None => false,
        }
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && !self.is_expired(now)
    }

    /// 授权范围是否覆盖所需的范围
    pub fn covers(&self, scopes: &[String]) -> bool {
        self.scopes.is_empty() || scopes.iter().all(|s| self.scopes.contains(s))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// OAuth 授权服务
pub struct DriveAuth {
    secrets_path: PathBuf,
    token_path: PathBuf,
    scopes: Vec<String>,
    http: reqwest::Client,
}

impl DriveAuth {
    /// # 参数
    /// - `secrets_path`: 客户端凭据文件
    /// - `token_path`: 令牌缓存文件
    /// - `scopes`: 请求的授权范围
    pub fn new(secrets_path: impl Into<PathBuf>, token_path: impl Into<PathBuf>, scopes: Vec<String>) -> Self {
        Self {
            secrets_path: secrets_path.into(),
            token_path: token_path.into(),
            scopes,
            http: reqwest::Client::new(),
        }
    }

    /// 获取可用的访问令牌
    ///
    /// 缓存有效 → 直接使用；已过期且有 refresh_token → 刷新；否则走浏览器授权。
    /// 新令牌写回 token 文件。
    pub async fn access_token(&self) -> Result<String> {
        let cached = self.load_cached();

        let token = match cached {
            Some(token) if token.is_valid(Utc::now()) => {
                debug!("使用缓存的访问令牌");
                return Ok(token.token);
            }
            Some(token) if token.refresh_token.is_some() => {
                info!("🔄 访问令牌已过期，正在刷新...");
                self.refresh(token).await?
            }
            _ => self.authorize().await?,
        };

        self.save(&token)?;
        Ok(token.token)
    }

    fn load_cached(&self) -> Option<StoredToken> {
        let content = std::fs::read_to_string(&self.token_path).ok()?;
        match serde_json::from_str::<StoredToken>(&content) {
            Ok(token) if token.covers(&self.scopes) => Some(token),
            Ok(_) => {
                info!("缓存令牌的授权范围不足，重新授权");
                None
            }
            Err(e) => {
                warn!("忽略无法解析的令牌文件 {}: {}", self.token_path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &StoredToken) -> Result<()> {
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.token_path, json)
            .with_context(|| format!("无法写入令牌文件: {}", self.token_path.display()))?;
        debug!("令牌已保存到 {}", self.token_path.display());
        Ok(())
    }

    /// 使用 refresh_token 刷新
    pub async fn refresh(&self, token: StoredToken) -> Result<StoredToken> {
        let refresh_token = token.refresh_token.clone().unwrap_or_default();
        let response = self
            .request_token(
                &token.token_uri,
                &[
                    ("client_id", token.client_id.as_str()),
                    ("client_secret", token.client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await?;

        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response.refresh_token.or(token.refresh_token),
            expiry: response
                .expires_in
                .map(|secs| Utc::now() + ChronoDuration::seconds(secs)),
            ..token
        })
    }

    /// 浏览器授权流程
    async fn authorize(&self) -> Result<StoredToken> {
        let secrets = ClientSecrets::load(&self.secrets_path)?;

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("无法绑定本地端口")?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://127.0.0.1:{}", port);
        let state = Alphanumeric.sample_string(&mut rand::rng(), 30);

        let consent_url = build_consent_url(&secrets, &redirect_uri, &self.scopes, &state)?;
        info!("🔐 正在打开浏览器进行授权...");
        if webbrowser::open(consent_url.as_str()).is_err() {
            println!("请手动打开以下链接完成授权: {}", consent_url);
        }

        let (stream, _) = listener.accept().await.context("等待授权回调失败")?;
        let mut reader = BufReader::new(stream);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;

        let result = parse_callback(&request_line, &state);
        let body = if result.is_ok() {
            "Authentication successful! You can close this window."
        } else {
            "Authentication failed. Check the terminal for details."
        };
        let mut stream = reader.into_inner();
        stream
            .write_all(format!("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\n{}", body).as_bytes())
            .await?;
        let code = result?;

        let response = self
            .request_token(
                &secrets.token_uri,
                &[
                    ("client_id", secrets.client_id.as_str()),
                    ("client_secret", secrets.client_secret.as_str()),
                    ("code", code.as_str()),
                    ("grant_type", "authorization_code"),
                    ("redirect_uri", redirect_uri.as_str()),
                ],
            )
            .await?;
        info!("✓ 授权成功");

        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secrets.token_uri,
            client_id: secrets.client_id,
            client_secret: secrets.client_secret,
            scopes: self.scopes.clone(),
            expiry: response
                .expires_in
                .map(|secs| Utc::now() + ChronoDuration::seconds(secs)),
        })
    }

    async fn request_token(&self, token_uri: &str, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let resp = self
            .http
            .post(token_uri)
            .form(form)
            .send()
            .await
            .with_context(|| format!("令牌请求失败: {}", token_uri))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Auth(AuthError::TokenRequestFailed {
                status: status.as_u16(),
                body,
            })
            .into());
        }

        Ok(resp.json().await.context("无法解析令牌响应")?)
    }
}

/// 构造授权页面 URL
pub fn build_consent_url(secrets: &ClientSecrets, redirect_uri: &str, scopes: &[String], state: &str) -> Result<Url> {
    let mut url = Url::parse(&secrets.auth_uri)
        .with_context(|| format!("无效的授权地址: {}", secrets.auth_uri))?;
    url.query_pairs_mut()
        .append_pair("client_id", &secrets.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &scopes.join(" "))
        .append_pair("state", state)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent");
    Ok(url)
}

/// 从回调请求行（`GET /?code=...&state=... HTTP/1.1`）中取出授权码
pub fn parse_callback(request_line: &str, expected_state: &str) -> Result<String> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AppError::Auth(AuthError::Denied("无效的回调请求".to_string())))?;

    let url = Url::parse(&format!("http://localhost{}", target)).context("无法解析回调地址")?;
    let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

    if let Some(error) = pairs.get("error") {
        return Err(AppError::Auth(AuthError::Denied(error.clone())).into());
    }
    if pairs.get("state").map(String::as_str) != Some(expected_state) {
        return Err(AppError::Auth(AuthError::StateMismatch).into());
    }
    pairs
        .get("code")
        .cloned()
        .ok_or_else(|| AppError::Auth(AuthError::Denied("回调中没有 code 参数".to_string())).into())
}
