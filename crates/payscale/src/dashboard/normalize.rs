use super::domain::{Currency, NormalizedRow, SalaryPeriod, PLACEHOLDER};
use super::raw::{RawDataset, RawJobRecord};
use serde_json::Value;
use tracing::info;

pub fn normalize_all(dataset: &RawDataset) -> Vec<NormalizedRow> {
    let rows: Vec<NormalizedRow> = dataset.jobs.iter().map(normalize).collect();
    let without_salary = rows.iter().filter(|row| !row.has_salary()).count();
    info!(
        rows = rows.len(),
        without_salary, "normalized payscale dataset"
    );
    rows
}

/// Total: every record yields a row, missing members become [`PLACEHOLDER`]
/// and a missing salary becomes `IQD 0`.
pub fn normalize(record: &RawJobRecord) -> NormalizedRow {
    let iqd = record.salary_iqd().and_then(parse_amount);
    let usd = record.salary_usd().and_then(parse_amount);
    let (currency, amount) = select_salary(iqd, usd);

    NormalizedRow {
        id: text_or_placeholder(record.job_id.as_deref()),
        title: text_or_placeholder(record.title()),
        category: text_or_placeholder(record.category()),
        employment_type: clean_employment_type(record.position().unwrap_or(PLACEHOLDER)),
        period: SalaryPeriod::Monthly,
        city: text_or_placeholder(record.city()),
        currency,
        amount_min: amount,
        amount_max: amount,
        portal_name: text_or_placeholder(record.portal_site()),
        portal_link: record.portal_link().unwrap_or_default().to_string(),
    }
}

/// Parses a salary figure given as a JSON number or a loosely formatted
/// string. Everything except digits, `.` and `-` is discarded before parsing.
pub fn parse_amount(value: &Value) -> Option<i64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
                .collect();
            if cleaned.is_empty() || cleaned == "." || cleaned == "-" {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };

    number.is_finite().then(|| number.round() as i64)
}

/// IQD wins whenever it carries a positive amount, including when a USD
/// figure is present as well. Non-positive figures count as missing.
pub fn select_salary(iqd: Option<i64>, usd: Option<i64>) -> (Currency, i64) {
    let iqd = iqd.filter(|amount| *amount > 0);
    let usd = usd.filter(|amount| *amount > 0);

    match (iqd, usd) {
        (Some(amount), _) => (Currency::Iqd, amount),
        (None, Some(amount)) => (Currency::Usd, amount),
        (None, None) => (Currency::Iqd, 0),
    }
}

/// Upstream exports append a stray `0` to the position string.
pub fn clean_employment_type(value: &str) -> String {
    value.strip_suffix('0').unwrap_or(value).to_string()
}

fn text_or_placeholder(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}
