//! Workbook writers
use cqr_core::Report;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::columns::{self, CellOut};
use crate::ExportError;

/// Padding added to the longest value of each column.
const WIDTH_PADDING: usize = 2;

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &CellOut) -> Result<(), XlsxError> {
    match cell {
        CellOut::Text(s) if s.is_empty() => {}
        CellOut::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        CellOut::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
    }
    Ok(())
}

fn write_table(sheet: &mut Worksheet, headers: &[String], rows: &[Vec<CellOut>]) -> Result<(), XlsxError> {
    for (c, header) in headers.iter().enumerate() {
        sheet.write_string(0, c as u16, header)?;
    }
    for (r, cells) in rows.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            write_cell(sheet, r as u32 + 1, c as u16, cell)?;
        }
    }
    Ok(())
}

/// Width per column: longest of header and values, plus padding.
pub fn auto_widths(headers: &[String], rows: &[Vec<CellOut>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(c, header)| {
            let longest = rows
                .iter()
                .filter_map(|cells| cells.get(c))
                .map(CellOut::display_len)
                .max()
                .unwrap_or(0);
            header.chars().count().max(longest) + WIDTH_PADDING
        })
        .collect()
}

/// Flatten every report into the `Reports` sheet.
pub fn export_reports(reports: &[Report]) -> Result<Vec<u8>, ExportError> {
    if reports.is_empty() {
        return Err(ExportError::NoReports);
    }

    let headers = columns::headers();
    let rows: Vec<Vec<CellOut>> = reports.iter().map(columns::row).collect();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(crate::REPORTS_SHEET)?;
    write_table(sheet, &headers, &rows)?;
    for (c, width) in auto_widths(&headers, &rows).into_iter().enumerate() {
        sheet.set_column_width(c as u16, width as f64)?;
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::info!(count = reports.len(), size = bytes.len(), "reports exported");
    Ok(bytes)
}

const TEMPLATE_SAMPLE: &[(&str, Option<Sample>)] = &[
    ("Unique Ref. No.", Some(Sample::Text("2024-08-01-1"))),
    ("Client Name", Some(Sample::Text("Future Homes LLC"))),
    ("Site / Plant", Some(Sample::Text("Site"))),
    ("Date of Casting", Some(Sample::Text("2024-07-28"))),
    ("Grade", Some(Sample::Text("M30"))),
    ("Mix Code", Some(Sample::Text("MIX-B-45"))),
    ("FT Name", Some(Sample::Text("Jane Smith"))),
    ("Mix Type", Some(Sample::Text("Customer"))),
    ("Cube Size (mm)", Some(Sample::Number(150.0))),
    ("OPC (kg)", Some(Sample::Number(380.0))),
    ("Flyash (kg)", Some(Sample::Number(120.0))),
    ("PPC (kg)", Some(Sample::Number(0.0))),
    ("7-Day Weight 1", Some(Sample::Number(8.21))),
    ("7-Day Weight 2", Some(Sample::Number(8.22))),
    ("7-Day Weight 3", Some(Sample::Number(8.19))),
    ("7-Day Load 1", Some(Sample::Number(450.0))),
    ("7-Day Load 2", Some(Sample::Number(465.0))),
    ("7-Day Load 3", Some(Sample::Number(455.0))),
    ("28-Day Weight 1", None),
    ("28-Day Weight 2", None),
    ("28-Day Weight 3", None),
    ("28-Day Load 1", None),
    ("28-Day Load 2", None),
    ("28-Day Load 3", None),
    ("Observations", Some(Sample::Text("Casting was performed under normal conditions."))),
];

#[derive(Debug, Clone, Copy)]
enum Sample {
    Text(&'static str),
    Number(f64),
}

const INSTRUCTIONS: &[[&str; 3]] = &[
    ["Column Header", "Description", "Example"],
    ["Unique Ref. No. (or Ticket No., ID, etc.)", "Required. The unique identifier for the report.", "2024-08-01-1"],
    ["Client Name", "Required. Name of the client.", "Future Homes LLC"],
    ["Site / Plant", "Required. Choose either \"Site\" or \"Plant\".", "Site"],
    ["Date of Casting", "Required. The date the concrete was cast in YYYY-MM-DD format.", "2024-07-28"],
    ["Grade", "Required. The grade of the concrete mix.", "M30"],
    ["Mix Code", "Required. The specific code for the mix.", "MIX-B-45"],
    ["FT Name", "Optional. Name of the Field Technician.", "Jane Smith"],
    ["Mix Type", "Optional. \"Standard\" or \"Customer\". Defaults to Standard.", "Customer"],
    ["Cube Size (mm)", "Optional. \"100\" or \"150\". Defaults to 150.", "150"],
    ["OPC (kg)", "Optional. Amount of OPC in kilograms.", "380"],
    ["Flyash (kg)", "Optional. Amount of Flyash in kilograms.", "120"],
    ["PPC (kg)", "Optional. Amount of PPC in kilograms.", "0"],
    ["7-Day Weight 1/2/3", "Optional. Weight of the cube in kg for the 7-day test.", "8.21"],
    ["7-Day Load 1/2/3", "Optional. Load applied in kN for the 7-day test.", "450"],
    ["28-Day Weight 1/2/3", "Optional. Weight of the cube in kg for the 28-day test.", "8.25"],
    ["28-Day Load 1/2/3", "Optional. Load applied in kN for the 28-day test.", "680"],
    ["Observations", "Optional. Any additional notes or observations.", "No issues observed during casting."],
    ["---", "---", "---"],
    [
        "NOTE:",
        "The columns for AI analysis (Score, Status, Summary, etc.) are only read back from full exports.",
        "They are populated by the system upon saving/analyzing.",
    ],
];

const INSTRUCTION_WIDTHS: [f64; 3] = [40.0, 60.0, 40.0];

/// Operator-facing import template: `Data Entry` + `Instructions`.
pub fn export_template() -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let data = workbook.add_worksheet();
    data.set_name(crate::TEMPLATE_DATA_SHEET)?;
    for (c, (header, sample)) in TEMPLATE_SAMPLE.iter().enumerate() {
        let c = c as u16;
        data.write_string(0, c, *header)?;
        match sample {
            Some(Sample::Text(s)) => {
                data.write_string(1, c, *s)?;
            }
            Some(Sample::Number(n)) => {
                data.write_number(1, c, *n)?;
            }
            None => {}
        }
        data.set_column_width(c, (header.len() + 5) as f64)?;
    }

    let instructions = workbook.add_worksheet();
    instructions.set_name(crate::TEMPLATE_INSTRUCTIONS_SHEET)?;
    for (r, line) in INSTRUCTIONS.iter().enumerate() {
        for (c, text) in line.iter().enumerate() {
            instructions.write_string(r as u32, c as u16, *text)?;
        }
    }
    for (c, width) in INSTRUCTION_WIDTHS.iter().enumerate() {
        instructions.set_column_width(c as u16, *width)?;
    }

    Ok(workbook.save_to_buffer()?)
}
