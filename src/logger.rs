use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 未设置 `RUST_LOG` 时的过滤规则，同时覆盖库（scout_scripts）和可执行文件（scout）
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "scout_scripts=debug,scout=debug,info"
    } else {
        "scout_scripts=info,scout=info"
    }
}

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择默认级别
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}

/// 在测试中收集日志输出
#[cfg(test)]
pub(crate) fn capture_logs(filter: &str, f: impl FnOnce()) -> String {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::registry().with(EnvFilter::new(filter)).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(move || writer.clone()),
    );
    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_errors_pass_default_filter() {
        let output = capture_logs(default_filter(false), || {
            tracing::error!(target: "scout", "❌ 缺少必需的设置 ACCOUNT_NAME");
            tracing::info!(target: "scout_scripts::orchestrator", "库日志");
            tracing::debug!(target: "scout", "调试日志");
        });
        assert!(output.contains("缺少必需的设置 ACCOUNT_NAME"));
        assert!(output.contains("库日志"));
        assert!(!output.contains("调试日志"));
    }

    #[test]
    fn test_verbose_filter_enables_debug() {
        let output = capture_logs(default_filter(true), || {
            tracing::debug!(target: "scout", "调试日志");
            tracing::debug!(target: "hyper", "依赖调试");
        });
        assert!(output.contains("调试日志"));
        assert!(!output.contains("依赖调试"));
    }
}
