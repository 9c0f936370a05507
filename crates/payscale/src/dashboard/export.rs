use super::domain::{Currency, NormalizedRow};
use super::i18n::TranslationLookup;
use super::present::PresentationAdapter;
use super::stats::ExchangeRate;
use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

/// Column keys shared by the table and the CSV export, resolved under
/// `table_headers.<key>`.
pub const COLUMN_KEYS: [&str; 6] = [
    "job_title",
    "category",
    "city",
    "employment_type",
    "salary",
    "source",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to flush export buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8",
            Self::Json => "application/json",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("payscale_data_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Header row of translated column names, then one fully quoted record per
/// row. Field values are the raw normalized values; the salary column is
/// converted and formatted in `currency`.
pub fn export_csv<L: TranslationLookup>(
    rows: &[NormalizedRow],
    adapter: &PresentationAdapter<L>,
    currency: Currency,
    rate: ExchangeRate,
) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMN_KEYS.iter().map(|key| adapter.header(key)))?;
    for row in rows {
        let amount = rate.convert(row.amount_min, row.currency, currency);
        writer.write_record([
            row.title.as_str(),
            row.category.as_str(),
            row.city.as_str(),
            row.employment_type.as_str(),
            adapter.format_salary(Some(amount), currency).as_str(),
            row.portal_name.as_str(),
        ])?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(buffer)?)
}

pub fn export_json(rows: &[NormalizedRow]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(rows)?)
}
