use super::domain::Currency;
use super::i18n::{Language, TextDirection};
use super::insights::Insight;
use super::present::RenderPass;
use super::stats::SalarySummary;
use serde::Serialize;
use std::collections::BTreeMap;

/// One table row in display form, ready for the table widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub city: String,
    pub employment_type: String,
    pub period: String,
    pub amount: i64,
    pub currency: Currency,
    pub salary: String,
    pub source_portal: String,
    pub source_link: String,
}

impl DisplayRow {
    /// Cells in column order: title, category, city, employment type,
    /// salary, source.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.title,
            &self.category,
            &self.city,
            &self.employment_type,
            &self.salary,
            &self.source_portal,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLabels {
    pub previous: String,
    pub next: String,
    pub showing: String,
    pub to: String,
    pub of: String,
    pub results: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
    pub page_size: usize,
    pub search_placeholder: String,
    pub pagination: PaginationLabels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiView {
    pub summary: SalarySummary,
    pub median_label: String,
    pub iqr_label: String,
    pub sample_label: String,
    pub result_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightView {
    pub insight: Insight,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub value: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendView {
    pub cities: Vec<LegendEntry>,
    pub categories: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

/// One filter control: the "all" option label followed by concrete values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControlView {
    pub all_label: String,
    pub options: Vec<OptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControlsView {
    pub city: FilterControlView,
    pub category: FilterControlView,
    pub employment_type: FilterControlView,
    pub period: FilterControlView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub pass: RenderPass,
    pub language: Language,
    pub direction: TextDirection,
    pub currency: Currency,
    pub result_count: usize,
    pub labels: BTreeMap<String, String>,
    pub kpis: KpiView,
    pub insights: Vec<InsightView>,
    pub table: TableView,
    pub legends: LegendView,
    pub filters: FilterControlsView,
}

impl DashboardView {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}
