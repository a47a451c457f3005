//! 纯文本表格
//!
//! 输出格式：表头、每列一段横线、数据行，列间两个空格，
//! 纯数字列右对齐，其余左对齐，每行去掉行尾空白。

/// 表头两侧预留的最小填充
const HEADER_PADDING: usize = 2;
const COLUMN_SEPARATOR: &str = "  ";

/// 渲染表格
///
/// 行的长度可以与表头不同：缺少的单元格按空字符串处理，多余的忽略。
pub fn render_table<H, R, C>(headers: &[H], rows: &[R]) -> String
where
    H: AsRef<str>,
    R: AsRef<[C]>,
    C: AsRef<str>,
{
    let columns = headers.len();
    let cell = |row: &R, col: usize| -> String {
        row.as_ref()
            .get(col)
            .map(|c| c.as_ref().to_string())
            .unwrap_or_default()
    };

    let mut widths = Vec::with_capacity(columns);
    let mut numeric = Vec::with_capacity(columns);
    for (col, header) in headers.iter().enumerate() {
        let cells: Vec<String> = rows.iter().map(|r| cell(r, col)).collect();
        let longest = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        widths.push(longest.max(header.as_ref().chars().count() + HEADER_PADDING));
        numeric.push(is_numeric_column(&cells));
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(
        headers.iter().map(|h| h.as_ref().to_string()),
        &widths,
        &numeric,
    ));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_SEPARATOR),
    );
    for row in rows {
        lines.push(format_line((0..columns).map(|c| cell(row, c)), &widths, &numeric));
    }
    lines.join("\n")
}

fn format_line(cells: impl Iterator<Item = String>, widths: &[usize], numeric: &[bool]) -> String {
    let padded: Vec<String> = cells
        .zip(widths.iter().zip(numeric))
        .map(|(text, (width, right))| {
            if *right {
                format!("{:>width$}", text, width = width)
            } else {
                format!("{:<width$}", text, width = width)
            }
        })
        .collect();
    padded.join(COLUMN_SEPARATOR).trim_end().to_string()
}

fn is_numeric_column(cells: &[String]) -> bool {
    let mut seen = false;
    for c in cells.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        if c.parse::<f64>().is_err() {
            return false;
        }
        seen = true;
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drive_listing_layout() {
        let headers = ["ID", "Name", "Parents", "Size", "Type", "Modified Time"];
        let rows = vec![vec!["1", "Test", "N/A", "N/A", "document", "1990-01-01"]];
        let expected = "  ID  Name    Parents    Size    Type      Modified Time\n\
                        ----  ------  ---------  ------  --------  ---------------\n   \
                        1  Test    N/A        N/A     document  1990-01-01";
        assert_eq!(render_table(&headers, &rows), expected);
    }

    #[test]
    fn test_long_cells_widen_column() {
        let headers = ["Name", "Phone"];
        let rows = vec![
            vec!["Acme Corporation".to_string(), "N/A".to_string()],
            vec!["Io".to_string(), "555-0100".to_string()],
        ];
        let table = render_table(&headers, &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Name              Phone");
        assert_eq!(lines[1], "----------------  --------");
        assert_eq!(lines[2], "Acme Corporation  N/A");
        assert_eq!(lines[3], "Io                555-0100");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let headers = ["A", "B"];
        let rows = vec![vec!["x"]];
        assert_eq!(render_table(&headers, &rows), "A    B\n---  ---\nx");
    }

    #[test]
    fn test_no_rows() {
        let headers = ["Name"];
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(render_table(&headers, &rows), "Name\n------");
    }
}
