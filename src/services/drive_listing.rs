//! Drive 文件列表展示

use crate::models::DriveFile;
use crate::utils::{format_size, render_table};

pub const FILE_HEADERS: [&str; 6] = ["ID", "Name", "Parents", "Size", "Type", "Modified Time"];

/// 要输出到日志的标题和表格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileListing {
    pub message: String,
    pub data: Option<String>,
}

/// 把文件列表整理成表格，没有文件时只有提示信息
pub fn render_files(files: &[DriveFile]) -> FileListing {
    if files.is_empty() {
        return FileListing {
            message: "No files found.".to_string(),
            data: None,
        };
    }

    let rows: Vec<Vec<String>> = files.iter().map(file_row).collect();
    FileListing {
        message: "Files:".to_string(),
        data: Some(render_table(&FILE_HEADERS, &rows)),
    }
}

fn file_row(file: &DriveFile) -> Vec<String> {
    let parents = match &file.parents {
        Some(parents) if !parents.is_empty() => parents.join(", "),
        _ => "N/A".to_string(),
    };
    let size = file
        .size_bytes()
        .map(|bytes| format_size(bytes, 1024.0, "B"))
        .unwrap_or_else(|| "N/A".to_string());

    vec![
        file.id.clone(),
        file.name.clone(),
        parents,
        size,
        file.mime_type.clone(),
        file.modified_time.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: &str, name: &str) -> DriveFile {
        DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: "document".to_string(),
            modified_time: "1990-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_files() {
        let listing = render_files(&[]);
        assert_eq!(listing.message, "No files found.");
        assert!(listing.data.is_none());
    }

    #[test]
    fn test_single_file_table() {
        let listing = render_files(&[file("1", "Test")]);
        assert_eq!(listing.message, "Files:");
        assert_eq!(
            listing.data.as_deref(),
            Some(
                "  ID  Name    Parents    Size    Type      Modified Time\n\
                 ----  ------  ---------  ------  --------  ---------------\n   \
                 1  Test    N/A        N/A     document  1990-01-01"
            )
        );
    }

    #[test]
    fn test_size_and_parents() {
        let mut f = file("abc", "report.pdf");
        f.size = Some("1536".to_string());
        f.parents = Some(vec!["root".to_string(), "shared".to_string()]);
        let row = file_row(&f);
        assert_eq!(row[2], "root, shared");
        assert_eq!(row[3], "1.50KB");
    }
}
