use crate::infra::{parse_date, parse_language, DashboardData};
use chrono::{Local, NaiveDate};
use clap::Args;
use payscale::config::AppConfig;
use payscale::dashboard::{
    export_file_name, Currency, DashboardSession, DashboardView, ExportFormat, FilterCriteria,
    JsonCatalog, Language,
};
use payscale::error::AppError;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct SelectionArgs {
    /// Salary dataset to load instead of the configured one
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Translation catalog to load instead of the configured one
    #[arg(long)]
    pub(crate) translations: Option<PathBuf>,
    /// Display language (en, ar, ku). Defaults to PAYSCALE_DEFAULT_LANG.
    #[arg(long, value_parser = parse_language)]
    pub(crate) lang: Option<Language>,
    /// Display currency (IQD or USD)
    #[arg(long, value_parser = parse_currency)]
    pub(crate) currency: Option<Currency>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) employment_type: Option<String>,
    #[arg(long)]
    pub(crate) period: Option<String>,
}

impl SelectionArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            city: self.city.clone(),
            category: self.category.clone(),
            employment_type: self.employment_type.clone(),
            period: self.period.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    /// Number of listings to print after the summary
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) selection: SelectionArgs,
    /// Export format (csv or json)
    #[arg(long, value_parser = parse_format, default_value = "csv")]
    pub(crate) format: ExportFormat,
    /// Output file or directory. Defaults to payscale_data_<date>.<ext> in the
    /// working directory.
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Date stamped into the default file name (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { selection, limit } = args;
    let mut session = load_session(&selection)?;
    let view = session.view();
    print!("{}", render_report(&view, limit));
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        selection,
        format,
        output,
        date,
    } = args;

    let session = load_session(&selection)?;
    let body = session.export(format)?;
    let file_name = export_file_name(format, date.unwrap_or_else(|| Local::now().date_naive()));
    let path = match output {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    };

    std::fs::write(&path, body)?;
    println!(
        "Wrote {} listings to {}",
        session.filtered().len(),
        path.display()
    );
    Ok(())
}

fn load_session(selection: &SelectionArgs) -> Result<DashboardSession<Arc<JsonCatalog>>, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(data) = &selection.data {
        config.dashboard.data_path = data.clone();
    }
    if let Some(translations) = &selection.translations {
        config.dashboard.translations_path = Some(translations.clone());
    }

    let language = selection.lang.unwrap_or(config.dashboard.default_language);
    let data = DashboardData::load(config.dashboard)?;
    let mut session = data.session(language);
    session.set_criteria(selection.criteria());
    session.set_currency(selection.currency.unwrap_or_default());
    Ok(session)
}

pub(crate) fn render_report(view: &DashboardView, limit: usize) -> String {
    let mut out = String::new();
    let title = view.label("title").unwrap_or("title");

    let _ = writeln!(out, "{title} ({}, {})", view.language, view.currency);
    let _ = writeln!(out, "- {}", view.kpis.result_label);
    let _ = writeln!(out, "- {}", view.kpis.median_label);
    let _ = writeln!(out, "- {}", view.kpis.iqr_label);
    let _ = writeln!(out, "- {}", view.kpis.sample_label);

    let _ = writeln!(out, "\n{}", view.label("ai_insights").unwrap_or("ai_insights"));
    for insight in &view.insights {
        let _ = writeln!(out, "  - {}", insight.message);
    }

    if let Some(message) = &view.table.empty_message {
        let _ = writeln!(out, "\n{message}");
        return out;
    }

    let _ = writeln!(out, "\n{}", view.table.columns.join(" | "));
    for row in view.table.rows.iter().take(limit) {
        let _ = writeln!(out, "  {}", row.cells().join(" | "));
    }
    if view.table.rows.len() > limit {
        let _ = writeln!(out, "  ... {} more", view.table.rows.len() - limit);
    }
    out
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::parse(raw).ok_or_else(|| format!("unsupported currency '{raw}' (expected IQD or USD)"))
}

fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(raw).ok_or_else(|| format!("unsupported export format '{raw}' (expected csv or json)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fixtures;
    use payscale::dashboard::FilterField;

    #[test]
    fn report_lists_kpis_insights_and_rows() {
        let data = fixtures::data();
        let mut session = data.session(Language::En);
        let report = render_report(&session.view(), 2);

        assert!(report.starts_with("title (en, IQD)\n"));
        assert!(report.contains("- 3 results\n"));
        assert!(report.contains("- median_salary: 1,310,000 IQD/mo\n"));
        assert!(report.contains("job_title | category | city"));
        assert!(report.contains("  Accountant | IT | Baghdad | Full-Time | 1,000,000 IQD/mo | Bayt\n"));
        assert!(report.ends_with("  ... 1 more\n"));
    }

    #[test]
    fn empty_selection_prints_no_data() {
        let data = fixtures::data();
        let mut session = data.session(Language::En);
        session.set_filter(FilterField::City, Some("Basra".to_string()));

        let report = render_report(&session.view(), 10);
        assert!(report.contains("- 0 results\n"));
        assert!(report.contains("  - no_data\n"));
        assert!(report.ends_with("\nno_data\n"));
    }

    #[test]
    fn selection_flags_become_criteria() {
        let selection = SelectionArgs {
            city: Some("Erbil".to_string()),
            period: Some("monthly".to_string()),
            ..SelectionArgs::default()
        };
        let criteria = selection.criteria();
        assert_eq!(criteria.get(FilterField::City), Some("Erbil"));
        assert_eq!(criteria.get(FilterField::Category), None);
        assert_eq!(criteria.get(FilterField::Period), Some("monthly"));
        assert!(parse_currency("usd").is_ok());
        assert!(parse_format("xlsx").is_err());
    }
}
