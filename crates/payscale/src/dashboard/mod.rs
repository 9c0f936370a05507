//! Salary dashboard pipeline: raw job records are normalized once, filtered per
//! request, summarized, and presented in the active language.

pub mod domain;
pub mod export;
pub mod filter;
pub mod i18n;
pub mod insights;
pub mod normalize;
pub mod present;
pub mod raw;
mod session;
pub mod stats;
pub mod views;

pub use domain::{Currency, NormalizedRow, SalaryPeriod, PLACEHOLDER};
pub use export::{export_csv, export_file_name, export_json, ExportError, ExportFormat};
pub use filter::{filter_rows, FilterCriteria, FilterField, FilterOptions};
pub use i18n::{
    CatalogError, JsonCatalog, Language, TextDirection, TranslationDomain, TranslationLookup,
    Untranslated,
};
pub use insights::{generate_insights, Insight, InsightThresholds};
pub use normalize::{normalize, normalize_all};
pub use present::{
    resolve_titles, PresentationAdapter, PresentationError, RenderPass, ResolvedTitles,
    TitleBatch, TitleTranslator, TranslationError,
};
pub use raw::{DatasetError, RawDataset, RawJobRecord};
pub use session::{DashboardContext, DashboardSession, RenderError, RenderOutcome, TableRenderer};
pub use stats::{median, percentile, summarize, ExchangeRate, SalarySummary};
pub use views::{DashboardView, DisplayRow, KpiView, LegendEntry, OptionEntry, TableView};
