//! Access to the two date cells of a car's workbook.
//!
//! Reads go through calamine, which yields the cached cell values. Writes load
//! the workbook with umya-spreadsheet, update the cells and replace the file
//! through a temp file in the same directory, so a failed save never leaves a
//! half-written workbook behind.

use calamine::{open_workbook, Data, DataType, Reader, Xlsx, XlsxError};
use chrono::NaiveDate;
use fleet_shared::dates::{format_date, parse_date, DateInput};
use fleet_shared::models::{ScanErrorKind, ScanFailure};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Office writes `~$name.xlsx` next to a workbook while it is open.
const LOCK_FILE_PREFIX: &str = "~$";
const WORKBOOK_EXTENSION: &str = "xlsx";

/// Location of a cell on the first worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub a1: &'static str,
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub column: u32,
}

pub const LAST_RESERVED_CELL: CellRef = CellRef {
    a1: "I3",
    row: 2,
    column: 8,
};

pub const AVAILABLE_AGAIN_CELL: CellRef = CellRef {
    a1: "I4",
    row: 3,
    column: 8,
};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("cannot open workbook: {0}")]
    Open(#[from] XlsxError),

    #[error("workbook has no worksheets")]
    MissingWorksheet,

    #[error("cannot write workbook: {0}")]
    Save(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SheetError {
    pub fn kind(&self) -> ScanErrorKind {
        match self {
            SheetError::NotFound(_) => ScanErrorKind::NotFound,
            SheetError::Open(_) => ScanErrorKind::Unreadable,
            SheetError::MissingWorksheet => ScanErrorKind::MissingWorksheet,
            SheetError::Save(_) | SheetError::Io(_) => ScanErrorKind::Io,
        }
    }

    pub fn to_failure(&self) -> ScanFailure {
        ScanFailure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// The two dates stored in a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetDates {
    pub last_reserved: Option<NaiveDate>,
    pub available_again: Option<NaiveDate>,
}

/// Whether a directory entry name refers to a car workbook.
pub fn is_workbook_name(name: &str) -> bool {
    if name.starts_with(LOCK_FILE_PREFIX) {
        return false;
    }

    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXTENSION))
}

/// List eligible workbooks in `dir`, sorted by filename.
pub fn list_workbooks(dir: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut workbooks = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };

        let path = entry.path();
        if is_workbook_name(&name) && path.is_file() {
            workbooks.push((name, path));
        }
    }

    workbooks.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(workbooks)
}

/// Map a user-supplied filename onto an existing workbook inside `dir`.
pub fn resolve(dir: &Path, filename: &str) -> Result<PathBuf, SheetError> {
    let plain = !filename.contains(['/', '\\']) && filename != "." && filename != "..";
    if !plain || !is_workbook_name(filename) {
        return Err(SheetError::NotFound(filename.to_string()));
    }

    let path = dir.join(filename);
    if !path.is_file() {
        return Err(SheetError::NotFound(filename.to_string()));
    }

    Ok(path)
}

/// Read both dates from the first worksheet.
pub fn read_dates(path: &Path) -> Result<SheetDates, SheetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SheetError::MissingWorksheet)??;

    let date_at = |cell: CellRef| cell_date(range.get_value((cell.row, cell.column)));

    Ok(SheetDates {
        last_reserved: date_at(LAST_RESERVED_CELL),
        available_again: date_at(AVAILABLE_AGAIN_CELL),
    })
}

fn cell_date(value: Option<&Data>) -> Option<NaiveDate> {
    let input = match value {
        Some(Data::DateTime(excel)) => excel
            .as_datetime()
            .map_or(DateInput::Empty, DateInput::DateTime),
        Some(iso @ Data::DateTimeIso(_)) => iso
            .as_datetime()
            .map_or(DateInput::Empty, DateInput::DateTime),
        Some(Data::String(text)) => DateInput::Text(text),
        // Plain numbers and booleans are not dates
        _ => DateInput::Empty,
    };

    parse_date(input)
}

/// Store both dates as `DD.MM.YYYY` text; `None` clears the cell.
pub fn write_dates(path: &Path, dates: SheetDates) -> Result<(), SheetError> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|e| SheetError::Save(e.to_string()))?;

    let sheet = book.get_sheet_mut(&0).ok_or(SheetError::MissingWorksheet)?;
    for (cell, date) in [
        (LAST_RESERVED_CELL, dates.last_reserved),
        (AVAILABLE_AGAIN_CELL, dates.available_again),
    ] {
        let text = date.map(format_date).unwrap_or_default();
        sheet.get_cell_mut(cell.a1).set_value_string(text);
    }

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    umya_spreadsheet::writer::xlsx::write_writer(&book, staged.as_file_mut())
        .map_err(|e| SheetError::Save(e.to_string()))?;
    // Temp files are created 0600; the replacement keeps the workbook's mode
    fs::set_permissions(staged.path(), fs::metadata(path)?.permissions())?;
    staged.persist(path).map_err(|e| SheetError::Io(e.error))?;

    Ok(())
}
