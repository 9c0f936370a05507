use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use payscale::config::DashboardConfig;
use payscale::dashboard::{
    normalize_all, DashboardContext, DashboardSession, JsonCatalog, Language, NormalizedRow,
    RawDataset,
};
use payscale::error::AppError;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Canonical rows and translation tables, loaded once and shared read-only
/// by every request.
#[derive(Clone)]
pub(crate) struct DashboardData {
    pub(crate) rows: Arc<[NormalizedRow]>,
    pub(crate) catalog: Arc<JsonCatalog>,
    pub(crate) config: DashboardConfig,
}

impl DashboardData {
    pub(crate) fn load(config: DashboardConfig) -> Result<Self, AppError> {
        let dataset = RawDataset::from_path(&config.data_path)?;
        let catalog = load_catalog(config.translations_path.as_deref())?;
        let rows = normalize_all(&dataset);

        info!(
            path = %config.data_path.display(),
            rows = rows.len(),
            "loaded salary dataset"
        );

        Ok(Self::new(rows, catalog, config))
    }

    pub(crate) fn new(rows: Vec<NormalizedRow>, catalog: JsonCatalog, config: DashboardConfig) -> Self {
        Self {
            rows: rows.into(),
            catalog: Arc::new(catalog),
            config,
        }
    }

    pub(crate) fn session(&self, language: Language) -> DashboardSession<Arc<JsonCatalog>> {
        let context: DashboardContext = self.config.context_for(language);
        DashboardSession::new(self.rows.clone(), self.catalog.clone(), context)
    }
}

fn load_catalog(path: Option<&Path>) -> Result<JsonCatalog, AppError> {
    match path {
        Some(path) => Ok(JsonCatalog::from_path(path)?),
        None => {
            warn!("no translation catalog configured; labels fall back to keys");
            Ok(JsonCatalog::default())
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_code(raw).ok_or_else(|| {
        format!("unsupported language '{raw}' (expected one of en, ar, ku)")
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use payscale::dashboard::{Currency, SalaryPeriod};
    use payscale::dashboard::{ExchangeRate, InsightThresholds};
    use serde_json::json;
    use std::path::PathBuf;

    pub(crate) fn config() -> DashboardConfig {
        DashboardConfig {
            data_path: PathBuf::from("unused.json"),
            translations_path: None,
            exchange_rate: ExchangeRate::default(),
            default_language: Language::En,
            page_size: 25,
            thresholds: InsightThresholds::default(),
            warn_on_missing_translations: false,
        }
    }

    fn row(id: &str, city: &str, category: &str, currency: Currency, amount: i64) -> NormalizedRow {
        NormalizedRow {
            id: id.to_string(),
            title: "Accountant".to_string(),
            category: category.to_string(),
            employment_type: "Full-Time".to_string(),
            period: SalaryPeriod::Monthly,
            city: city.to_string(),
            currency,
            amount_min: amount,
            amount_max: amount,
            portal_name: "Bayt".to_string(),
            portal_link: String::new(),
        }
    }

    pub(crate) fn data() -> DashboardData {
        let rows = vec![
            row("1", "Baghdad", "IT", Currency::Iqd, 1_000_000),
            row("2", "Erbil", "IT", Currency::Iqd, 2_000_000),
            row("3", "Baghdad", "Finance", Currency::Usd, 1000),
        ];
        let catalog = JsonCatalog::from_value(json!({
            "ui_text": {
                "ar": {
                    "cities": { "Baghdad": "بغداد" },
                    "payscale": { "median_salary": "الراتب الوسيط" }
                }
            },
            "job_titles": { "ar": { "Accountant": "محاسب" } }
        }))
        .expect("catalog");
        DashboardData::new(rows, catalog, config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_dates_and_languages() {
        assert_eq!(
            parse_date(" 2025-10-12 "),
            Ok(NaiveDate::from_ymd_opt(2025, 10, 12).expect("valid date"))
        );
        assert!(parse_date("12/10/2025").is_err());
        assert_eq!(parse_language("AR"), Ok(Language::Ar));
        assert!(parse_language("fr").is_err());
    }

    #[test]
    fn sessions_share_canonical_rows() {
        let data = fixtures::data();
        let session = data.session(Language::Ar);
        assert_eq!(session.rows().len(), 3);
        assert_eq!(session.language(), Language::Ar);
        assert!(Arc::ptr_eq(&data.rows, &data.clone().rows));
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let mut config = fixtures::config();
        config.data_path = "/nonexistent/salaries.json".into();
        assert!(matches!(DashboardData::load(config), Err(AppError::Dataset(_))));
    }
}
