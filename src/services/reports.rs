//! Growth report export in xlsx or csv form.

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use thiserror::Error;

use crate::domain::student_milestone::StudentMilestoneDetail;
use crate::domain::types::{MilestoneStatus, StudentId};
use crate::repository::{StudentMilestoneReader, StudentReader};

use super::{ServiceError, ServiceResult};

const SHEET_NAME: &str = "Growth Report";
const TITLE: &str = "My Growth Adventure!";
const HEADERS: [&str; 3] = ["Category", "Milestone", "Status"];
const HEADER_ROW: u32 = 3;
const COLUMN_WIDTH: f64 = 30.0;
const MASTERED_FILL: u32 = 0xC6EFCE;
const PENDING_FILL: u32 = 0xFFC7CE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Xlsx,
}

impl TryFrom<&str> for ReportFormat {
    type Error = ReportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(ReportError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid report format: {0}")]
    InvalidFormat(String),
    #[error("failed to render csv")]
    CsvRender,
    #[error("failed to render xlsx: {0}")]
    XlsxRender(#[from] XlsxError),
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub category: String,
    pub milestone: String,
    pub status: MilestoneStatus,
}

impl From<&StudentMilestoneDetail> for ReportRow {
    fn from(value: &StudentMilestoneDetail) -> Self {
        Self {
            category: value.category.name.as_str().to_string(),
            milestone: value.milestone.description.as_str().to_string(),
            status: value.status,
        }
    }
}

/// Reduce the student name to ASCII letters, digits, `-` and `_` so it is
/// safe inside a quoted `Content-Disposition` filename.
fn file_stem(student_name: &str) -> String {
    let name: String = student_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("Growth_Report_{name}")
}

fn escape_csv_cell(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}

fn render_xlsx(student_name: &str, rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let title_format = Format::new().set_bold().set_font_size(16);
    let plain = Format::new();
    let bold = Format::new().set_bold();
    let mastered = Format::new().set_background_color(Color::RGB(MASTERED_FILL));
    let pending = Format::new().set_background_color(Color::RGB(PENDING_FILL));

    worksheet.merge_range(0, 0, 0, 2, TITLE, &title_format)?;
    let name_line = format!("Student Name: {student_name}");
    worksheet.merge_range(1, 0, 1, 2, &name_line, &plain)?;

    for (col_idx, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col_idx as u16, *header, &bold)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let sheet_row = HEADER_ROW + 1 + row_idx as u32;
        let fill = if row.status == MilestoneStatus::Mastered {
            &mastered
        } else {
            &pending
        };
        worksheet.write_string(sheet_row, 0, &row.category)?;
        worksheet.write_string(sheet_row, 1, &row.milestone)?;
        worksheet.write_string_with_format(sheet_row, 2, row.status.as_str(), fill)?;
    }

    for col_idx in 0..HEADERS.len() as u16 {
        worksheet.set_column_width(col_idx, COLUMN_WIDTH)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn render_csv(rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(HEADERS)
        .map_err(|_| ReportError::CsvRender)?;
    for row in rows {
        writer
            .write_record([
                escape_csv_cell(&row.category),
                escape_csv_cell(&row.milestone),
                row.status.as_str().to_string(),
            ])
            .map_err(|_| ReportError::CsvRender)?;
    }
    writer.into_inner().map_err(|_| ReportError::CsvRender)
}

/// Render the growth report of one student.
pub fn render_growth_report(
    student_name: &str,
    rows: &[ReportRow],
    format: ReportFormat,
) -> Result<DownloadFile, ReportError> {
    let stem = file_stem(student_name);
    match format {
        ReportFormat::Csv => Ok(DownloadFile {
            file_name: format!("{stem}.csv"),
            content_type: "text/csv; charset=utf-8",
            bytes: render_csv(rows)?,
        }),
        ReportFormat::Xlsx => Ok(DownloadFile {
            file_name: format!("{stem}.xlsx"),
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            bytes: render_xlsx(student_name, rows)?,
        }),
    }
}

/// Load a student's milestones and render them as a downloadable report.
///
/// A student without milestone rows has nothing to report and yields
/// [`ServiceError::NotFound`].
pub fn download_report<R>(
    student_id: i32,
    format: &str,
    repo: &R,
) -> ServiceResult<DownloadFile>
where
    R: StudentReader + StudentMilestoneReader,
{
    let format = ReportFormat::try_from(format).map_err(|e| ServiceError::Form(e.to_string()))?;
    let student_id = StudentId::new(student_id)?;

    let student = match repo.get_student_by_id(student_id) {
        Ok(Some(student)) => student,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load student: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let records = repo.list_student_milestones(student_id).map_err(|e| {
        log::error!("Failed to list student milestones: {e}");
        ServiceError::Internal
    })?;
    if records.is_empty() {
        return Err(ServiceError::NotFound);
    }

    let rows: Vec<ReportRow> = records.iter().map(ReportRow::from).collect();
    render_growth_report(student.full_name.as_str(), &rows, format).map_err(|e| {
        log::error!("Failed to render growth report: {e}");
        ServiceError::Internal
    })
}
