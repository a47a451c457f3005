use crate::error::{AppError, DataError};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 以行为单位的 CSV 表
///
/// 所有单元格按字符串保存，写回时不附加索引列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    source: PathBuf,
}

impl CompanyTable {
    /// 读取 CSV 文件
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::Data(DataError::NotFound {
                path: path.display().to_string(),
            })
            .into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("无法打开CSV文件: {}", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("无法读取CSV表头: {}", path.display()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let width = headers.len();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("无法解析CSV记录: {}", path.display()))?;
            if record.len() > width {
                return Err(AppError::Data(DataError::TooManyFields {
                    path: path.display().to_string(),
                    line: record.position().map(|p| p.line()).unwrap_or_default(),
                    expected: width,
                    found: record.len(),
                })
                .into());
            }
            let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        debug!("从 {} 读取到 {} 行, {} 列", path.display(), rows.len(), width);
        Ok(Self {
            headers,
            rows,
            source: path.to_path_buf(),
        })
    }

    /// 由内存数据构造
    pub fn from_parts(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Self {
            headers,
            rows,
            source: PathBuf::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列索引
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 读取整列
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.column_index(name).ok_or_else(|| {
            AppError::missing_column(self.source.display().to_string(), name)
        })?;
        Ok(self.rows.iter().map(|r| r[idx].clone()).collect())
    }

    /// 在 `index` 处插入一列，已存在同名列时不做任何修改
    pub fn insert_column(&mut self, index: usize, name: &str, fill: &str) {
        if self.column_index(name).is_some() {
            return;
        }
        let index = index.min(self.headers.len());
        self.headers.insert(index, name.to_string());
        for row in &mut self.rows {
            row.insert(index, fill.to_string());
        }
    }

    /// 确保列存在，不存在时追加到末尾，返回列索引
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.insert_column(self.headers.len(), name, "");
        self.headers.len() - 1
    }

    /// 第一个该列值等于 `value` 的行
    pub fn find_row(&self, column: &str, value: &str) -> Option<usize> {
        let idx = self.column_index(column)?;
        self.rows.iter().position(|r| r[idx] == value)
    }

    /// 修改单元格
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<String>) -> Result<()> {
        let idx = self.column_index(column).ok_or_else(|| {
            AppError::missing_column(self.source.display().to_string(), column)
        })?;
        let total = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .with_context(|| format!("行 {} 超出范围 (共 {} 行)", row, total))?;
        cells[idx] = value.into();
        Ok(())
    }

    /// 写回 CSV 文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("无法创建CSV文件: {}", path.display()))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!("已写入 {} 行到 {}", self.rows.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("companies.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Companies,Url\nAcme,\n\"Globex, Inc\",https://globex.test\n");

        let table = CompanyTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("Companies").unwrap(), vec!["Acme", "Globex, Inc"]);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Name\nAcme\n");

        let table = CompanyTable::load(&path).unwrap();
        let err = table.column("Url").unwrap_err();
        let app_err = err.downcast_ref::<AppError>().unwrap();
        assert!(matches!(app_err, AppError::Data(DataError::MissingColumn { .. })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompanyTable::load(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::Data(DataError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_insert_column_is_idempotent() {
        let mut table = CompanyTable::from_parts(
            vec!["Companies".into(), "Url".into(), "Sector".into()],
            vec![vec!["Acme".into(), "".into(), "Tools".into()]],
        );
        table.insert_column(2, "Employees", "");
        table.insert_column(2, "Employees", "x");
        assert_eq!(table.headers(), ["Companies", "Url", "Employees", "Sector"]);
        assert_eq!(table.rows()[0], vec!["Acme", "", "", "Tools"]);

        table.insert_column(99, "Notes", "-");
        assert_eq!(table.headers().last().map(String::as_str), Some("Notes"));
        assert_eq!(table.rows()[0][4], "-");
    }

    #[test]
    fn test_update_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Companies,Url\nAcme,\nGlobex,\n");

        let mut table = CompanyTable::load(&path).unwrap();
        table.insert_column(2, "Employees", "");
        let row = table.find_row("Companies", "Globex").unwrap();
        table.set(row, "Url", "https://linkedin.test/globex").unwrap();
        table.set(row, "Employees", "1,234").unwrap();
        assert!(table.set(10, "Url", "x").is_err());

        let out = dir.path().join("out.csv");
        table.save(&out).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            "Companies,Url,Employees\nAcme,,\nGlobex,https://linkedin.test/globex,\"1,234\"\n"
        );
    }

    #[test]
    fn test_extra_cells_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let content = "Companies,Url\nAcme,https://a.test,EXTRA-NOTE\n";
        let path = write_csv(dir.path(), content);

        let err = CompanyTable::load(&path).unwrap_err();
        match err.downcast_ref::<AppError>() {
            Some(AppError::Data(DataError::TooManyFields { line, expected, found, .. })) => {
                assert_eq!(*line, 2);
                assert_eq!(*expected, 2);
                assert_eq!(*found, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // 原文件保持不变
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_set_out_of_range_row() {
        let mut table = CompanyTable::from_parts(vec!["Companies".into()], vec![vec!["Acme".into()]]);
        let err = table.set(3, "Companies", "Globex").unwrap_err();
        assert!(err.to_string().contains("共 1 行"));
        assert_eq!(table.rows()[0], vec!["Acme"]);
    }

    #[test]
    fn test_short_records_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Companies,Url\nAcme\n");
        let table = CompanyTable::load(&path).unwrap();
        assert_eq!(table.rows()[0], vec!["Acme", ""]);
    }
}
