use super::domain::{Currency, NormalizedRow};
use super::export::{export_csv, export_json, ExportError, ExportFormat, COLUMN_KEYS};
use super::filter::{distinct_values, filter_rows, FilterCriteria, FilterField, FilterOptions};
use super::i18n::{Language, TranslationDomain, TranslationLookup, Untranslated};
use super::insights::{generate_insights, Insight, InsightThresholds};
use super::normalize::normalize_all;
use super::present::{PresentationAdapter, PresentationError, RenderPass, ResolvedTitles, TitleBatch};
use super::raw::RawDataset;
use super::stats::{summarize, ExchangeRate, SalarySummary};
use super::views::{
    DashboardView, FilterControlView, FilterControlsView, InsightView, KpiView, LegendEntry,
    LegendView, OptionEntry, PaginationLabels, TableView,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const UI_LABEL_KEYS: [&str; 12] = [
    "title",
    "theme",
    "caption",
    "reset_filters",
    "export_csv",
    "export_json",
    "print",
    "ai_insights",
    "city_legend",
    "category_legend",
    "table_title",
    "table_caption",
];

/// Explicit replacement for page-level globals: everything a recompute needs
/// besides the rows and the filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardContext {
    pub language: Language,
    pub exchange_rate: ExchangeRate,
    pub thresholds: InsightThresholds,
    pub page_size: usize,
    pub warn_on_missing_translations: bool,
}

impl Default for DashboardContext {
    fn default() -> Self {
        Self {
            language: Language::En,
            exchange_rate: ExchangeRate::default(),
            thresholds: InsightThresholds::default(),
            page_size: 25,
            warn_on_missing_translations: false,
        }
    }
}

/// External table widget (search, sort and pagination live there).
pub trait TableRenderer {
    fn render(&mut self, table: &TableView) -> Result<(), RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("table widget failed: {0}")]
    Widget(String),
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(DashboardView),
    /// The translated table was rejected; an untranslated one was accepted.
    Fallback {
        view: DashboardView,
        error: RenderError,
    },
    Failed {
        view: DashboardView,
        error: RenderError,
    },
}

impl RenderOutcome {
    pub fn view(&self) -> &DashboardView {
        match self {
            Self::Rendered(view) | Self::Fallback { view, .. } | Self::Failed { view, .. } => view,
        }
    }
}

/// State container for one dashboard: the canonical rows (normalized once,
/// never mutated), the filter/currency selection, and the presentation state.
/// Every setter starts a new render pass; callers re-invoke [`Self::view`].
pub struct DashboardSession<L> {
    rows: Arc<[NormalizedRow]>,
    options: FilterOptions,
    criteria: FilterCriteria,
    currency: Currency,
    context: DashboardContext,
    adapter: PresentationAdapter<L>,
}

impl<L: TranslationLookup> DashboardSession<L> {
    pub fn new(rows: impl Into<Arc<[NormalizedRow]>>, lookup: L, context: DashboardContext) -> Self {
        let rows = rows.into();
        let options = FilterOptions::from_rows(&rows);
        let adapter = PresentationAdapter::new(lookup, context.language)
            .with_missing_key_warnings(context.warn_on_missing_translations);

        Self {
            rows,
            options,
            criteria: FilterCriteria::default(),
            currency: Currency::Iqd,
            context,
            adapter,
        }
    }

    pub fn from_dataset(dataset: &RawDataset, lookup: L, context: DashboardContext) -> Self {
        Self::new(normalize_all(dataset), lookup, context)
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn language(&self) -> Language {
        self.context.language
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn adapter(&self) -> &PresentationAdapter<L> {
        &self.adapter
    }

    pub fn set_filter(&mut self, field: FilterField, value: Option<String>) -> RenderPass {
        self.criteria.set(field, value);
        self.adapter.begin_pass()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> RenderPass {
        self.criteria = criteria;
        self.adapter.begin_pass()
    }

    pub fn reset_filters(&mut self) -> RenderPass {
        debug!("resetting dashboard filters");
        self.criteria = FilterCriteria::default();
        self.adapter.begin_pass()
    }

    pub fn set_currency(&mut self, currency: Currency) -> RenderPass {
        self.currency = currency;
        self.adapter.begin_pass()
    }

    pub fn set_language(&mut self, language: Language) -> RenderPass {
        info!(%language, "dashboard language changed");
        self.context.language = language;
        self.adapter.set_language(language)
    }

    /// A fresh copy of the rows matching the current criteria.
    pub fn filtered(&self) -> Vec<NormalizedRow> {
        let filtered = filter_rows(&self.rows, &self.criteria);
        debug!(total = self.rows.len(), matched = filtered.len(), "applied filters");
        filtered
    }

    pub fn summary(&self) -> SalarySummary {
        summarize(&self.filtered(), self.currency, self.context.exchange_rate)
    }

    pub fn insights(&self) -> Vec<Insight> {
        generate_insights(
            &self.filtered(),
            self.context.exchange_rate,
            &self.context.thresholds,
        )
    }

    pub fn pending_titles(&self) -> TitleBatch {
        self.adapter.pending_titles(&self.filtered())
    }

    pub fn commit_titles(&mut self, resolved: ResolvedTitles) -> Result<usize, PresentationError> {
        self.adapter.commit_titles(resolved)
    }

    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let filtered = self.filtered();
        match format {
            ExportFormat::Csv => export_csv(
                &filtered,
                &self.adapter,
                self.currency,
                self.context.exchange_rate,
            ),
            ExportFormat::Json => export_json(&filtered),
        }
    }

    pub fn view(&mut self) -> DashboardView {
        let filtered = self.filtered();
        let rate = self.context.exchange_rate;
        let summary = summarize(&filtered, self.currency, rate);
        let insights = generate_insights(&filtered, rate, &self.context.thresholds);

        let table = build_table(
            &mut self.adapter,
            &filtered,
            self.currency,
            rate,
            self.context.page_size,
        );
        let adapter = &self.adapter;

        let kpis = KpiView {
            median_label: format!(
                "{}: {}",
                adapter.label("median_salary"),
                adapter.format_salary(summary.median, self.currency)
            ),
            iqr_label: format!(
                "IQR (P25-P75): {} - {}",
                adapter.format_salary(summary.p25, self.currency),
                adapter.format_salary(summary.p75, self.currency)
            ),
            sample_label: format!("{}: {}", adapter.label("sample_size"), summary.count),
            result_label: format!("{} {}", filtered.len(), adapter.label("results")),
            summary,
        };

        let insights = insights
            .into_iter()
            .map(|insight| InsightView {
                message: adapter.label(&insight.message_key()),
                insight,
            })
            .collect();

        let labels: BTreeMap<String, String> = UI_LABEL_KEYS
            .iter()
            .map(|key| (key.to_string(), adapter.label(key)))
            .collect();

        let legends = LegendView {
            cities: legend(adapter, &filtered, FilterField::City, TranslationDomain::City),
            categories: legend(
                adapter,
                &filtered,
                FilterField::Category,
                TranslationDomain::Category,
            ),
        };

        let filters = FilterControlsView {
            city: control(adapter, &self.options, FilterField::City, "all_cities"),
            category: control(adapter, &self.options, FilterField::Category, "all_categories"),
            employment_type: control(
                adapter,
                &self.options,
                FilterField::EmploymentType,
                "all_types",
            ),
            period: control(adapter, &self.options, FilterField::Period, "all_periods"),
        };

        info!(
            pass = %adapter.current_pass(),
            language = %self.context.language,
            currency = %self.currency,
            results = filtered.len(),
            "built dashboard view"
        );

        DashboardView {
            pass: adapter.current_pass(),
            language: self.context.language,
            direction: self.context.language.direction(),
            currency: self.currency,
            result_count: filtered.len(),
            labels,
            kpis,
            insights,
            table,
            legends,
            filters,
        }
    }

    /// Hands the table to `renderer`. A widget failure never loses the
    /// computed view: the table is retried untranslated, and the outcome
    /// reports what happened.
    pub fn publish<R: TableRenderer>(&mut self, renderer: &mut R) -> RenderOutcome {
        let view = self.view();
        let error = match renderer.render(&view.table) {
            Ok(()) => return RenderOutcome::Rendered(view),
            Err(error) => error,
        };
        warn!(pass = %view.pass, %error, "table render failed; retrying untranslated");

        let mut plain = PresentationAdapter::new(Untranslated, self.context.language);
        let fallback = build_table(
            &mut plain,
            &self.filtered(),
            self.currency,
            self.context.exchange_rate,
            self.context.page_size,
        );

        match renderer.render(&fallback) {
            Ok(()) => RenderOutcome::Fallback { view, error },
            Err(error) => {
                error!(pass = %view.pass, %error, "untranslated table render failed");
                RenderOutcome::Failed { view, error }
            }
        }
    }
}

fn build_table<L: TranslationLookup>(
    adapter: &mut PresentationAdapter<L>,
    rows: &[NormalizedRow],
    currency: Currency,
    rate: ExchangeRate,
    page_size: usize,
) -> TableView {
    let display_rows = rows
        .iter()
        .map(|row| adapter.present(row, currency, rate))
        .collect::<Vec<_>>();
    let empty_message = display_rows
        .is_empty()
        .then(|| adapter.label("no_data"));

    TableView {
        columns: COLUMN_KEYS.iter().map(|key| adapter.header(key)).collect(),
        rows: display_rows,
        page_size,
        search_placeholder: adapter.label("search_placeholder"),
        pagination: PaginationLabels {
            previous: adapter.label("previous"),
            next: adapter.label("next"),
            showing: adapter.label("showing"),
            to: adapter.label("to"),
            of: adapter.label("of"),
            results: adapter.label("results"),
        },
        empty_message,
    }
}

fn legend<L: TranslationLookup>(
    adapter: &PresentationAdapter<L>,
    rows: &[NormalizedRow],
    field: FilterField,
    domain: TranslationDomain,
) -> Vec<LegendEntry> {
    distinct_values(rows, field)
        .into_iter()
        .map(|value| LegendEntry {
            label: adapter.translate(domain, &value),
            color: legend_color(&value),
            value,
        })
        .collect()
}

fn control<L: TranslationLookup>(
    adapter: &PresentationAdapter<L>,
    options: &FilterOptions,
    field: FilterField,
    all_key: &str,
) -> FilterControlView {
    let domain = match field {
        FilterField::City => TranslationDomain::City,
        FilterField::Category => TranslationDomain::Category,
        FilterField::EmploymentType => TranslationDomain::EmploymentType,
        FilterField::Period => TranslationDomain::Period,
    };

    FilterControlView {
        all_label: adapter.label(all_key),
        options: options
            .values(field)
            .iter()
            .map(|value| OptionEntry {
                value: value.clone(),
                label: adapter.translate(domain, value),
            })
            .collect(),
    }
}

/// Stable per-value colour: a 31-multiplier hash over UTF-16 code units,
/// mapped onto the hue wheel.
pub(crate) fn legend_color(value: &str) -> String {
    let hash = value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    let hue = i64::from(hash).abs() % 360;
    format!("hsl({hue}, 60%, 55%)")
}
