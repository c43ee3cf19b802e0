//! First-sheet tokenization into header-keyed rows
use calamine::{open_workbook_auto_from_rs, Reader};
use std::collections::HashMap;
use std::io::Cursor;

use crate::normalizer::{cell_value, normalize_header, CellValue};
use crate::ImportError;

/// One data row keyed by normalized header
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    /// Row number as an operator counts it: header is 1, first data row is 2.
    pub number: usize,
    pub cells: HashMap<String, CellValue>,
}

impl SheetRow {
    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// First alias that holds a value.
    pub fn lookup<S: AsRef<str>>(&self, aliases: &[S]) -> Option<&CellValue> {
        aliases.iter().find_map(|a| self.cells.get(a.as_ref()))
    }

    /// [`lookup`](Self::lookup) as trimmed text, empty when absent.
    pub fn text<S: AsRef<str>>(&self, aliases: &[S]) -> String {
        self.lookup(aliases).map(CellValue::trimmed).unwrap_or_default()
    }
}

/// Read every data row of the first worksheet.
///
/// Duplicate headers keep their first column, blank headers are ignored.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<SheetRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ImportError::Format(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)?
        .map_err(|e| ImportError::Format(e.to_string()))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let mut seen = std::collections::HashSet::new();
    let headers: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| {
            let name = normalize_header(&cell_value(cell).map(|v| v.as_text()).unwrap_or_default());
            (!name.is_empty() && seen.insert(name.clone())).then_some(name)
        })
        .collect();

    Ok(rows
        .enumerate()
        .map(|(index, cells)| SheetRow {
            number: index + 2,
            cells: headers
                .iter()
                .zip(cells)
                .filter_map(|(header, cell)| Some((header.clone()?, cell_value(cell)?)))
                .collect(),
        })
        .collect())
}
