//! 人机验证守卫 - 业务能力层
//!
//! 页面出现验证（Cloudflare 挑战页、LinkedIn checkpoint）时等待人工处理。
//! 无头模式下没有可见窗口，直接返回错误。

use crate::error::AppError;
use crate::infrastructure::JsExecutor;
use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// 检测页面上是否仍有验证
#[allow(async_fn_in_trait)]
pub trait ChallengeProbe {
    /// 验证是否仍在页面上
    async fn is_present(&self) -> Result<bool>;

    /// 用于日志和错误信息的描述
    fn describe(&self) -> String;
}

/// 通过 CSS 选择器检测，例如 `#challenge-running`
pub struct SelectorProbe<'a> {
    executor: &'a JsExecutor,
    selector: &'a str,
}

impl<'a> SelectorProbe<'a> {
    pub fn new(executor: &'a JsExecutor, selector: &'a str) -> Self {
        Self { executor, selector }
    }
}

impl ChallengeProbe for SelectorProbe<'_> {
    async fn is_present(&self) -> Result<bool> {
        self.executor.exists(self.selector).await
    }

    fn describe(&self) -> String {
        format!("selector {}", self.selector)
    }
}

/// 通过当前 URL 中的片段检测，例如 `checkpoint/challenge`
pub struct UrlProbe<'a> {
    executor: &'a JsExecutor,
    fragment: &'a str,
}

impl<'a> UrlProbe<'a> {
    pub fn new(executor: &'a JsExecutor, fragment: &'a str) -> Self {
        Self { executor, fragment }
    }
}

impl ChallengeProbe for UrlProbe<'_> {
    async fn is_present(&self) -> Result<bool> {
        let url = self.executor.current_url().await?;
        Ok(url.contains(self.fragment))
    }

    fn describe(&self) -> String {
        format!("url contains {}", self.fragment)
    }
}

/// 等待结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// 从未出现验证
    NotPresent,
    /// 出现过验证，已被人工处理
    Cleared,
}

/// 验证守卫
#[derive(Debug, Clone)]
pub struct ChallengeGuard {
    headless: bool,
    poll: Duration,
    settle: Duration,
    settle_if_absent: bool,
}

impl ChallengeGuard {
    /// # 参数
    /// - `headless`: 无头模式下遇到验证直接失败
    /// - `poll`: 轮询间隔
    /// - `settle`: 验证消失后再等待的时间，让页面完成跳转
    pub fn new(headless: bool, poll: Duration, settle: Duration) -> Self {
        Self {
            headless,
            poll,
            settle,
            settle_if_absent: false,
        }
    }

    /// 从未出现验证时同样等待 `settle`
    pub fn settle_always(mut self) -> Self {
        self.settle_if_absent = true;
        self
    }

    /// 轮询直到验证消失
    ///
    /// 有可见窗口时不设上限，由用户在窗口中完成验证。
    pub async fn wait_until_clear<P: ChallengeProbe>(&self, probe: &P) -> Result<ChallengeOutcome> {
        let mut warned = false;
        loop {
            let present = probe.is_present().await?;

            if present && self.headless {
                warn!("⚠️ 出现人机验证，需要人工处理！");
                return Err(AppError::ChallengeBlocked {
                    url: probe.describe(),
                }
                .into());
            }

            if !present {
                let outcome = if warned {
                    info!("✓ 验证已通过，继续处理");
                    ChallengeOutcome::Cleared
                } else {
                    info!("未检测到人机验证 ({})", probe.describe());
                    ChallengeOutcome::NotPresent
                };
                if warned || self.settle_if_absent {
                    sleep(self.settle).await;
                }
                return Ok(outcome);
            }

            if !warned {
                warn!("⚠️ 出现人机验证，请在浏览器窗口中完成验证...");
                warned = true;
            }
            sleep(self.poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按预设序列回答的探针
    struct ScriptedProbe {
        answers: Mutex<VecDeque<bool>>,
        calls: Mutex<usize>,
    }

    impl ScriptedProbe {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().copied().collect()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl ChallengeProbe for ScriptedProbe {
        async fn is_present(&self) -> Result<bool> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn guard(headless: bool) -> ChallengeGuard {
        ChallengeGuard::new(headless, Duration::from_millis(1), Duration::from_millis(1))
    }

    #[test]
    fn test_no_challenge() {
        let probe = ScriptedProbe::new(&[false]);
        let mut outcome = None;
        let logs = crate::logger::capture_logs(crate::logger::default_filter(false), || {
            outcome = Some(tokio_test::block_on(guard(true).wait_until_clear(&probe)).unwrap());
        });
        assert_eq!(outcome, Some(ChallengeOutcome::NotPresent));
        assert_eq!(probe.calls(), 1);
        assert!(logs.contains("未检测到人机验证 (scripted)"));
    }

    #[tokio::test]
    async fn test_headless_challenge_fails() {
        let probe = ScriptedProbe::new(&[true]);
        let err = guard(true).wait_until_clear(&probe).await.unwrap_err();
        let app_err = err.downcast_ref::<AppError>().unwrap();
        assert!(app_err.is_challenge_blocked());
    }

    #[tokio::test]
    async fn test_headed_challenge_waits_until_cleared() {
        let probe = ScriptedProbe::new(&[true, true, true, false]);
        let outcome = guard(false)
            .settle_always()
            .wait_until_clear(&probe)
            .await
            .unwrap();
        assert_eq!(outcome, ChallengeOutcome::Cleared);
        assert_eq!(probe.calls(), 4);
    }
}
