use std::path::{Path, PathBuf};
use tracing::debug;

/// 在数据目录中查找输入文件
///
/// 目录中存在同名文件（忽略首尾空白）时返回该文件路径，
/// 否则原样返回 `filename`，由调用方按当前目录处理。
pub fn resolve_data_path(filename: &str, folder: impl AsRef<Path>) -> PathBuf {
    let folder = folder.as_ref();
    let wanted = filename.trim();

    let entries = match std::fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("数据目录 {} 不可读: {}", folder.display(), e);
            return PathBuf::from(filename);
        }
    };

    for entry in entries.flatten() {
        if entry.file_name().to_string_lossy().trim() == wanted {
            let path = entry.path();
            debug!("在数据目录中找到 {}", path.display());
            return path;
        }
    }

    PathBuf::from(filename)
}
