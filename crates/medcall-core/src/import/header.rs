//! Header row detection for imported patient sheets.

/// How deep into the sheet to look for a header row.
const HEADER_SCAN_DEPTH: usize = 10;

const NAME_KEYWORDS: &[&str] = &["фамилия", "имя", "фио", "name"];
const PHONE_KEYWORDS: &[&str] = &["телефон", "тел", "номер", "phone", "number"];
const BRANCH_KEYWORDS: &[&str] = &["филиал", "branch"];

/// Detected header row and column-role mapping. A role is `None` when no
/// column label matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    pub row: usize,
    pub name_col: Option<usize>,
    pub phone_col: Option<usize>,
    pub branch_col: Option<usize>,
}

fn matches_any(cell: &str, keywords: &[&str]) -> bool {
    let folded = cell.trim().to_lowercase();
    !folded.is_empty() && keywords.iter().any(|kw| folded.contains(kw))
}

/// Scan the first rows of a grid for the header. A row qualifies when at
/// least two of its cells label a known column role.
pub fn locate_header(grid: &[Vec<String>]) -> Option<HeaderMap> {
    for (row_index, row) in grid.iter().take(HEADER_SCAN_DEPTH).enumerate() {
        let mut name_col = None;
        let mut phone_col = None;
        let mut branch_col = None;

        for (col, cell) in row.iter().enumerate() {
            if name_col.is_none() && matches_any(cell, NAME_KEYWORDS) {
                name_col = Some(col);
            } else if phone_col.is_none() && matches_any(cell, PHONE_KEYWORDS) {
                phone_col = Some(col);
            } else if branch_col.is_none() && matches_any(cell, BRANCH_KEYWORDS) {
                branch_col = Some(col);
            }
        }

        let matched =
            [name_col, phone_col, branch_col].iter().filter(|c| c.is_some()).count();
        if matched >= 2 {
            return Some(HeaderMap {
                row: row_index,
                name_col,
                phone_col,
                branch_col,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_finds_russian_header() {
        let grid = vec![
            row(&["Отчёт за февраль", "", ""]),
            row(&["", "", ""]),
            row(&["ФИО пациента", "Номер телефона", "Филиал"]),
        ];
        let header = locate_header(&grid).unwrap();
        assert_eq!(header.row, 2);
        assert_eq!(header.name_col, Some(0));
        assert_eq!(header.phone_col, Some(1));
        assert_eq!(header.branch_col, Some(2));
    }

    #[test]
    fn test_two_roles_suffice() {
        let grid = vec![row(&["Имя", "Телефон"])];
        let header = locate_header(&grid).unwrap();
        assert_eq!(header.branch_col, None);
    }

    #[test]
    fn test_one_role_is_not_a_header() {
        let grid = vec![row(&["Телефон", "Комментарий"]), row(&["", ""])];
        assert_eq!(locate_header(&grid), None);
    }

    #[test]
    fn test_scan_depth_limit() {
        let mut grid = vec![row(&["", ""]); 10];
        grid.push(row(&["Имя", "Телефон", "Филиал"]));
        assert_eq!(locate_header(&grid), None);
    }

    #[test]
    fn test_english_labels() {
        let grid = vec![row(&["Name", "Phone number", "Branch"])];
        let header = locate_header(&grid).unwrap();
        assert_eq!(header.name_col, Some(0));
        assert_eq!(header.phone_col, Some(1));
        assert_eq!(header.branch_col, Some(2));
    }
}
