use super::domain::{Currency, NormalizedRow, PLACEHOLDER};
use super::i18n::{Language, TranslationDomain, TranslationLookup};
use super::stats::ExchangeRate;
use super::views::DisplayRow;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use tracing::{debug, warn};

/// Monotonic identifier of one render of the dashboard. Asynchronous title
/// translations started for an older pass are rejected on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RenderPass(pub u64);

impl fmt::Display for RenderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pass-{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PresentationError {
    #[error("title batch for {batch} arrived after {current} started")]
    StalePass {
        batch: RenderPass,
        current: RenderPass,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation service unavailable: {0}")]
    Unavailable(String),
    #[error("translation rejected for '{title}': {reason}")]
    Rejected { title: String, reason: String },
}

/// Asynchronous job-title translation backend (e.g. a remote translation API).
pub trait TitleTranslator: Send + Sync {
    fn translate(
        &self,
        title: &str,
        language: Language,
    ) -> impl Future<Output = Result<String, TranslationError>> + Send;
}

/// Titles still missing from the cache for a given pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBatch {
    pub pass: RenderPass,
    pub language: Language,
    pub titles: Vec<String>,
}

impl TitleBatch {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitles {
    pub pass: RenderPass,
    pub language: Language,
    pub translations: Vec<(String, String)>,
    pub failed: Vec<String>,
}

/// Resolves each title independently. A failed title is reported in
/// `failed` and left out of the cache so a later pass can retry it.
pub async fn resolve_titles<T: TitleTranslator>(translator: &T, batch: TitleBatch) -> ResolvedTitles {
    let TitleBatch {
        pass,
        language,
        titles,
    } = batch;
    let mut translations = Vec::with_capacity(titles.len());
    let mut failed = Vec::new();

    for title in titles {
        match translator.translate(&title, language).await {
            Ok(translated) => translations.push((title, translated)),
            Err(err) => {
                warn!(%pass, %language, %title, error = %err, "title translation failed");
                failed.push(title);
            }
        }
    }

    ResolvedTitles {
        pass,
        language,
        translations,
        failed,
    }
}

/// Turns normalized rows into language-specific display rows. Holds the only
/// mutable presentation state: the title cache and the render-pass counter.
#[derive(Debug)]
pub struct PresentationAdapter<L> {
    lookup: L,
    language: Language,
    warn_on_missing: bool,
    title_cache: HashMap<(Language, String), String>,
    pass: RenderPass,
}

impl<L: TranslationLookup> PresentationAdapter<L> {
    pub fn new(lookup: L, language: Language) -> Self {
        Self {
            lookup,
            language,
            warn_on_missing: false,
            title_cache: HashMap::new(),
            pass: RenderPass(0),
        }
    }

    pub fn with_missing_key_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_missing = enabled;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn current_pass(&self) -> RenderPass {
        self.pass
    }

    pub fn begin_pass(&mut self) -> RenderPass {
        self.pass = RenderPass(self.pass.0 + 1);
        self.pass
    }

    /// Switching language drops every cached title and starts a new pass.
    pub fn set_language(&mut self, language: Language) -> RenderPass {
        if language != self.language {
            debug!(
                from = %self.language,
                to = %language,
                evicted = self.title_cache.len(),
                "clearing title cache"
            );
            self.title_cache.clear();
            self.language = language;
        }
        self.begin_pass()
    }

    pub fn cached_titles(&self) -> usize {
        self.title_cache.len()
    }

    pub fn translate(&self, domain: TranslationDomain, value: &str) -> String {
        if value.is_empty() || value == PLACEHOLDER {
            return value.to_string();
        }
        self.resolve(&domain.path(value), value)
    }

    /// Dashboard label under `payscale.<key>`, falling back to the key.
    pub fn label(&self, key: &str) -> String {
        self.resolve(&format!("payscale.{key}"), key)
    }

    /// Table column header under `table_headers.<key>`, falling back to the key.
    pub fn header(&self, key: &str) -> String {
        self.resolve(&format!("table_headers.{key}"), key)
    }

    pub fn title(&mut self, title: &str) -> String {
        if title.is_empty() || title == PLACEHOLDER {
            return title.to_string();
        }

        let key = (self.language, title.to_string());
        if let Some(cached) = self.title_cache.get(&key) {
            return cached.clone();
        }

        // Misses stay uncached so they remain pending for the async translator.
        match self.lookup.lookup_title(self.language, title) {
            Some(translated) => {
                self.title_cache.insert(key, translated.clone());
                translated
            }
            None => {
                self.report_miss(&format!("job_titles.{title}"));
                title.to_string()
            }
        }
    }

    /// Titles of `rows` that neither the cache nor the synchronous lookup can
    /// resolve in the current language. English titles are never queued.
    pub fn pending_titles(&self, rows: &[NormalizedRow]) -> TitleBatch {
        let mut seen = HashSet::new();
        let titles = match self.language {
            Language::En => Vec::new(),
            Language::Ar | Language::Ku => rows
                .iter()
                .map(|row| row.title.as_str())
                .filter(|title| !title.is_empty() && *title != PLACEHOLDER)
                .filter(|title| seen.insert(*title))
                .filter(|title| {
                    !self
                        .title_cache
                        .contains_key(&(self.language, title.to_string()))
                })
                .filter(|title| self.lookup.lookup_title(self.language, title).is_none())
                .map(str::to_string)
                .collect(),
        };

        TitleBatch {
            pass: self.pass,
            language: self.language,
            titles,
        }
    }

    /// Applies asynchronously resolved titles if their pass is still current.
    pub fn commit_titles(&mut self, resolved: ResolvedTitles) -> Result<usize, PresentationError> {
        if resolved.pass != self.pass || resolved.language != self.language {
            warn!(
                batch = %resolved.pass,
                current = %self.pass,
                "discarding stale title translations"
            );
            return Err(PresentationError::StalePass {
                batch: resolved.pass,
                current: self.pass,
            });
        }

        let applied = resolved.translations.len();
        for (title, translated) in resolved.translations {
            self.title_cache.insert((resolved.language, title), translated);
        }
        Ok(applied)
    }

    pub fn format_salary(&self, amount: Option<i64>, currency: Currency) -> String {
        format_salary(amount, currency, self.language)
    }

    pub fn present(
        &mut self,
        row: &NormalizedRow,
        currency: Currency,
        rate: ExchangeRate,
    ) -> DisplayRow {
        let amount = rate.convert(row.amount_min, row.currency, currency);

        DisplayRow {
            id: row.id.clone(),
            title: self.title(&row.title),
            category: self.translate(TranslationDomain::Category, &row.category),
            city: self.translate(TranslationDomain::City, &row.city),
            employment_type: self
                .translate(TranslationDomain::EmploymentType, &row.employment_type),
            period: self.translate(TranslationDomain::Period, row.period.key()),
            amount,
            currency,
            salary: self.format_salary(Some(amount), currency),
            source_portal: row.portal_name.clone(),
            source_link: row.portal_link.clone(),
        }
    }

    fn resolve(&self, path: &str, fallback: &str) -> String {
        match self.lookup.lookup(self.language, path) {
            Some(value) => value,
            None => {
                self.report_miss(path);
                fallback.to_string()
            }
        }
    }

    fn report_miss(&self, path: &str) {
        if self.warn_on_missing {
            warn!(language = %self.language, path, "missing translation");
        }
    }
}

/// `"1,310,000 IQD/mo"`; Arabic uses Arabic-Indic digits and `٬` grouping.
/// `None` renders the placeholder.
pub fn format_salary(amount: Option<i64>, currency: Currency, language: Language) -> String {
    match amount {
        Some(amount) => format!("{}{}", format_grouped(amount, language), currency.monthly_suffix()),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn format_grouped(amount: i64, language: Language) -> String {
    let separator = match language {
        Language::Ar => '\u{066C}',
        Language::En | Language::Ku => ',',
    };

    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(localize_digit(digit, language));
    }
    grouped
}

fn localize_digit(digit: char, language: Language) -> char {
    match language {
        Language::Ar => digit
            .to_digit(10)
            .and_then(|value| char::from_u32(0x0660 + value))
            .unwrap_or(digit),
        Language::En | Language::Ku => digit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::SalaryPeriod;
    use crate::dashboard::i18n::{JsonCatalog, Untranslated};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn row(title: &str) -> NormalizedRow {
        NormalizedRow {
            id: "job-1".to_string(),
            title: title.to_string(),
            category: "IT".to_string(),
            employment_type: "Full-Time".to_string(),
            period: SalaryPeriod::Monthly,
            city: "Baghdad".to_string(),
            currency: Currency::Usd,
            amount_min: 1000,
            amount_max: 1000,
            portal_name: "Bayt".to_string(),
            portal_link: "https://example.test/job-1".to_string(),
        }
    }

    fn catalog() -> JsonCatalog {
        JsonCatalog::from_value(json!({
            "ui_text": {
                "ar": {
                    "job_categories": { "IT": "تقنية المعلومات" },
                    "cities": { "Baghdad": "بغداد" },
                    "salary_periods": { "monthly": "شهري" },
                    "table_headers": { "salary": "الراتب" },
                    "payscale": { "median_salary": "الراتب الوسيط" }
                }
            },
            "job_titles": { "ar": { "Software Engineer": "مهندس برمجيات" } }
        }))
        .expect("catalog")
    }

    /// Counts title lookups and answers with the language code appended.
    #[derive(Default)]
    struct CountingLookup {
        title_calls: AtomicUsize,
    }

    impl TranslationLookup for CountingLookup {
        fn lookup(&self, _language: Language, _path: &str) -> Option<String> {
            None
        }

        fn lookup_title(&self, language: Language, title: &str) -> Option<String> {
            self.title_calls.fetch_add(1, Ordering::SeqCst);
            Some(format!("{title} [{language}]"))
        }
    }

    struct SuffixTranslator;

    impl TitleTranslator for SuffixTranslator {
        async fn translate(&self, title: &str, language: Language) -> Result<String, TranslationError> {
            if title.starts_with("Broken") {
                return Err(TranslationError::Unavailable("offline".to_string()));
            }
            Ok(format!("{title} ({language})"))
        }
    }

    #[test]
    fn grouping_follows_locale() {
        assert_eq!(format_grouped(0, Language::En), "0");
        assert_eq!(format_grouped(999, Language::En), "999");
        assert_eq!(format_grouped(1_310_000, Language::En), "1,310,000");
        assert_eq!(format_grouped(-12_345, Language::Ku), "-12,345");
        assert_eq!(format_grouped(1_310_000, Language::Ar), "١٬٣١٠٬٠٠٠");
        assert_eq!(
            format_salary(Some(800), Currency::Usd, Language::En),
            "800 USD/mo"
        );
        assert_eq!(format_salary(None, Currency::Iqd, Language::En), PLACEHOLDER);
    }

    #[test]
    fn present_translates_fields_and_converts_salary() {
        let mut adapter = PresentationAdapter::new(catalog(), Language::Ar);
        let display = adapter.present(
            &row("Software Engineer"),
            Currency::Iqd,
            ExchangeRate::default(),
        );

        assert_eq!(display.title, "مهندس برمجيات");
        assert_eq!(display.category, "تقنية المعلومات");
        assert_eq!(display.city, "بغداد");
        assert_eq!(display.employment_type, "Full-Time");
        assert_eq!(display.period, "شهري");
        assert_eq!(display.amount, 1_310_000);
        assert_eq!(display.salary, "١٬٣١٠٬٠٠٠ IQD/mo");
        assert_eq!(display.source_portal, "Bayt");
    }

    #[test]
    fn misses_fall_back_to_raw_values_and_keys() {
        let adapter = PresentationAdapter::new(Untranslated, Language::Ar)
            .with_missing_key_warnings(true);
        assert_eq!(adapter.translate(TranslationDomain::City, "Erbil"), "Erbil");
        assert_eq!(adapter.translate(TranslationDomain::City, PLACEHOLDER), PLACEHOLDER);
        assert_eq!(adapter.label("median_salary"), "median_salary");
        assert_eq!(adapter.header("job_title"), "job_title");

        let adapter = PresentationAdapter::new(catalog(), Language::Ar);
        assert_eq!(adapter.label("median_salary"), "الراتب الوسيط");
        assert_eq!(adapter.header("salary"), "الراتب");
    }

    #[test]
    fn title_cache_avoids_repeat_lookups() {
        let lookup = Arc::new(CountingLookup::default());
        let mut adapter = PresentationAdapter::new(lookup.clone(), Language::Ar);

        assert_eq!(adapter.title("Accountant"), "Accountant [ar]");
        assert_eq!(adapter.title("Accountant"), "Accountant [ar]");
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.title(PLACEHOLDER), PLACEHOLDER);
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn language_change_clears_title_cache() {
        let lookup = Arc::new(CountingLookup::default());
        let mut adapter = PresentationAdapter::new(lookup.clone(), Language::Ar);
        adapter.title("Accountant");
        assert_eq!(adapter.cached_titles(), 1);

        adapter.set_language(Language::Ku);
        assert_eq!(adapter.cached_titles(), 0);
        assert_eq!(adapter.title("Accountant"), "Accountant [ku]");
        assert_eq!(lookup.title_calls.load(Ordering::SeqCst), 2);

        adapter.set_language(Language::Ku);
        assert_eq!(adapter.cached_titles(), 1);
    }

    #[test]
    fn pending_titles_are_distinct_and_unresolved() {
        let mut adapter = PresentationAdapter::new(catalog(), Language::Ar);
        assert_eq!(adapter.title("Software Engineer"), "مهندس برمجيات");
        let rows = vec![
            row("Software Engineer"),
            row("Driver"),
            row(PLACEHOLDER),
            row("Driver"),
            row("Nurse"),
        ];

        let batch = adapter.pending_titles(&rows);
        assert_eq!(batch.pass, adapter.current_pass());
        assert_eq!(batch.titles, ["Driver", "Nurse"]);
    }

    #[test]
    fn lookup_misses_stay_pending_after_render() {
        let mut adapter = PresentationAdapter::new(Untranslated, Language::Ar);
        assert_eq!(adapter.title("Driver"), "Driver");
        assert_eq!(adapter.cached_titles(), 0);
        assert_eq!(adapter.pending_titles(&[row("Driver")]).titles, ["Driver"]);
    }

    #[test]
    fn english_titles_are_never_queued() {
        let adapter = PresentationAdapter::new(Untranslated, Language::En);
        let batch = adapter.pending_titles(&[row("Driver"), row("Nurse")]);
        assert!(batch.is_empty());
        assert_eq!(batch.language, Language::En);
    }

    #[tokio::test]
    async fn resolved_titles_are_committed_for_current_pass() {
        let mut adapter = PresentationAdapter::new(Untranslated, Language::Ar);
        adapter.begin_pass();
        let batch = adapter.pending_titles(&[row("Driver"), row("Broken Title")]);

        let resolved = resolve_titles(&SuffixTranslator, batch).await;
        assert_eq!(resolved.failed, ["Broken Title"]);

        let applied = adapter.commit_titles(resolved).expect("pass is current");
        assert_eq!(applied, 1);
        assert_eq!(adapter.title("Driver"), "Driver (ar)");
        assert_eq!(adapter.title("Broken Title"), "Broken Title");
    }

    #[tokio::test]
    async fn stale_batches_are_rejected() {
        let mut adapter = PresentationAdapter::new(Untranslated, Language::Ar);
        let first = adapter.begin_pass();
        let batch = adapter.pending_titles(&[row("Driver")]);

        let current = adapter.begin_pass();
        let resolved = resolve_titles(&SuffixTranslator, batch).await;

        assert_eq!(
            adapter.commit_titles(resolved),
            Err(PresentationError::StalePass {
                batch: first,
                current,
            })
        );
        assert_eq!(adapter.cached_titles(), 0);
    }

    #[tokio::test]
    async fn language_switch_invalidates_in_flight_batch() {
        let mut adapter = PresentationAdapter::new(Untranslated, Language::Ar);
        let batch = adapter.pending_titles(&[row("Driver")]);
        adapter.set_language(Language::En);

        let resolved = resolve_titles(&SuffixTranslator, batch).await;
        assert!(adapter.commit_titles(resolved).is_err());
    }
}
