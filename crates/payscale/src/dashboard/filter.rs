use super::domain::NormalizedRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    City,
    Category,
    EmploymentType,
    Period,
}

impl FilterField {
    pub const fn ordered() -> [Self; 4] {
        [Self::City, Self::Category, Self::EmploymentType, Self::Period]
    }

    pub fn value_of(self, row: &NormalizedRow) -> &str {
        match self {
            Self::City => &row.city,
            Self::Category => &row.category,
            Self::EmploymentType => &row.employment_type,
            Self::Period => row.period.key(),
        }
    }
}

/// Current selection of the four filter controls. Empty strings and `None`
/// both mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

impl FilterCriteria {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        let value = match field {
            FilterField::City => &self.city,
            FilterField::Category => &self.category,
            FilterField::EmploymentType => &self.employment_type,
            FilterField::Period => &self.period,
        };
        value.as_deref().filter(|value| !value.is_empty())
    }

    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        let value = value.filter(|value| !value.is_empty());
        match field {
            FilterField::City => self.city = value,
            FilterField::Category => self.category = value,
            FilterField::EmploymentType => self.employment_type = value,
            FilterField::Period => self.period = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ordered()
            .into_iter()
            .all(|field| self.get(field).is_none())
    }

    pub fn matches(&self, row: &NormalizedRow) -> bool {
        FilterField::ordered().into_iter().all(|field| match self.get(field) {
            Some(expected) => field.value_of(row) == expected,
            None => true,
        })
    }
}

/// Stable filter: the result keeps the input order and owns its rows, so the
/// canonical set is never touched.
pub fn filter_rows(rows: &[NormalizedRow], criteria: &FilterCriteria) -> Vec<NormalizedRow> {
    rows.iter()
        .filter(|row| criteria.matches(row))
        .cloned()
        .collect()
}

/// Distinct values offered by each filter control, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub categories: Vec<String>,
    pub employment_types: Vec<String>,
    pub periods: Vec<String>,
}

impl FilterOptions {
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        Self {
            cities: distinct_values(rows, FilterField::City),
            categories: distinct_values(rows, FilterField::Category),
            employment_types: distinct_values(rows, FilterField::EmploymentType),
            periods: distinct_values(rows, FilterField::Period),
        }
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::City => &self.cities,
            FilterField::Category => &self.categories,
            FilterField::EmploymentType => &self.employment_types,
            FilterField::Period => &self.periods,
        }
    }
}

pub(crate) fn distinct_values(rows: &[NormalizedRow], field: FilterField) -> Vec<String> {
    rows.iter()
        .map(|row| field.value_of(row))
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::domain::{Currency, SalaryPeriod};

    fn row(id: &str, city: &str, category: &str, employment_type: &str) -> NormalizedRow {
        NormalizedRow {
            id: id.to_string(),
            title: format!("Job {id}"),
            category: category.to_string(),
            employment_type: employment_type.to_string(),
            period: SalaryPeriod::Monthly,
            city: city.to_string(),
            currency: Currency::Iqd,
            amount_min: 1_000_000,
            amount_max: 1_000_000,
            portal_name: "Portal".to_string(),
            portal_link: String::new(),
        }
    }

    fn rows() -> Vec<NormalizedRow> {
        vec![
            row("1", "Baghdad", "IT", "Full-Time"),
            row("2", "Erbil", "IT", "Part-Time"),
            row("3", "Baghdad", "HR", "Full-Time"),
            row("4", "Basra", "IT", "Full-Time"),
        ]
    }

    fn ids(rows: &[NormalizedRow]) -> Vec<&str> {
        rows.iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let filtered = filter_rows(&rows(), &FilterCriteria::default());
        assert_eq!(ids(&filtered), ["1", "2", "3", "4"]);
    }

    #[test]
    fn criteria_are_anded() {
        let mut criteria = FilterCriteria::default();
        criteria.set(FilterField::City, Some("Baghdad".to_string()));
        assert_eq!(ids(&filter_rows(&rows(), &criteria)), ["1", "3"]);

        criteria.set(FilterField::Category, Some("IT".to_string()));
        assert_eq!(ids(&filter_rows(&rows(), &criteria)), ["1"]);

        criteria.set(FilterField::Period, Some("monthly".to_string()));
        assert_eq!(ids(&filter_rows(&rows(), &criteria)), ["1"]);
    }

    #[test]
    fn empty_string_imposes_no_constraint() {
        let criteria = FilterCriteria {
            city: Some(String::new()),
            employment_type: Some("Full-Time".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&filter_rows(&rows(), &criteria)), ["1", "3", "4"]);
        assert!(!criteria.is_empty());
        assert!(FilterCriteria {
            city: Some(String::new()),
            ..FilterCriteria::default()
        }
        .is_empty());
    }

    #[test]
    fn unknown_value_yields_empty_set() {
        let mut criteria = FilterCriteria::default();
        criteria.set(FilterField::City, Some("Mosul".to_string()));
        assert!(filter_rows(&rows(), &criteria).is_empty());
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let options = FilterOptions::from_rows(&rows());
        assert_eq!(options.cities, ["Baghdad", "Basra", "Erbil"]);
        assert_eq!(options.categories, ["HR", "IT"]);
        assert_eq!(options.employment_types, ["Full-Time", "Part-Time"]);
        assert_eq!(options.values(FilterField::Period), ["monthly"]);
    }
}
