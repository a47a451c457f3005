/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

/// 记录脚本启动信息
///
/// # 参数
/// - `script`: 脚本名称
/// - `headless`: 是否无头模式（不涉及浏览器时传 None）
pub fn log_startup(script: &str, headless: Option<bool>) {
    info!("{}", "=".repeat(60));
    info!("🚀 {} 启动 - {}", script, now());
    if let Some(headless) = headless {
        info!("🖥️ 无头模式: {}", if headless { "开" } else { "关" });
    }
    info!("{}", "=".repeat(60));
}

/// 记录输入加载信息
///
/// # 参数
/// - `total`: 记录总数
/// - `source`: 来源文件
pub fn log_inputs_loaded(total: usize, source: &str) {
    info!("✓ 从 {} 读取到 {} 条记录", source, total);
}

/// 记录单条进度
pub fn log_progress(index: usize, total: usize, item: &str) {
    info!("[{}/{}] 正在处理: {}", index, total, truncate_text(item, 80));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
pub fn log_summary(success: usize, failed: usize, total: usize) {
    info!("{}", "=".repeat(60));
    info!("📊 处理完成 - {}", now());
    info!("✅ 成功: {}/{}", success, total);
    if failed > 0 {
        info!("❌ 失败: {}", failed);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
