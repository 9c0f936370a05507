use super::domain::{Currency, NormalizedRow};
use super::stats::{amounts_in, ExchangeRate};
use serde::{Deserialize, Serialize};

/// Advisory rule thresholds. Averages are expressed in IQD; shares are
/// fractions of the filtered row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    pub high_average_iqd: f64,
    pub low_average_iqd: f64,
    pub watched_category: String,
    pub category_share: f64,
    pub watched_city: String,
    pub city_share: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_average_iqd: 1_500_000.0,
            low_average_iqd: 800_000.0,
            watched_category: "IT".to_string(),
            category_share: 0.3,
            watched_city: "Baghdad".to_string(),
            city_share: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    NoData,
    HighAverage { average_iqd: i64 },
    LowAverage { average_iqd: i64 },
    CategoryDominant { category: String, share: f64 },
    CityDominant { city: String, share: f64 },
    Balanced,
}

impl Insight {
    /// Key of the advisory sentence under the `payscale` label namespace.
    pub fn message_key(&self) -> String {
        match self {
            Self::NoData => "no_data".to_string(),
            Self::HighAverage { .. } => "insight_high_avg".to_string(),
            Self::LowAverage { .. } => "insight_low_avg".to_string(),
            Self::CategoryDominant { category, .. } => {
                format!("insight_{}_dominant", slug(category))
            }
            Self::CityDominant { city, .. } => format!("insight_{}_dominant", slug(city)),
            Self::Balanced => "insight_balanced".to_string(),
        }
    }
}

pub fn generate_insights(
    rows: &[NormalizedRow],
    rate: ExchangeRate,
    thresholds: &InsightThresholds,
) -> Vec<Insight> {
    let values = amounts_in(rows, Currency::Iqd, rate);
    if values.is_empty() {
        return vec![Insight::NoData];
    }

    let total_iqd: i128 = values.iter().map(|value| i128::from(*value)).sum();
    let average = total_iqd as f64 / values.len() as f64;
    let mut insights = Vec::new();

    if average > thresholds.high_average_iqd {
        insights.push(Insight::HighAverage {
            average_iqd: average.round() as i64,
        });
    } else if average < thresholds.low_average_iqd {
        insights.push(Insight::LowAverage {
            average_iqd: average.round() as i64,
        });
    }

    let total = rows.len() as f64;
    let category_share = rows
        .iter()
        .filter(|row| row.category == thresholds.watched_category)
        .count() as f64
        / total;
    if category_share > thresholds.category_share {
        insights.push(Insight::CategoryDominant {
            category: thresholds.watched_category.clone(),
            share: category_share,
        });
    }

    let city_share = rows
        .iter()
        .filter(|row| row.city == thresholds.watched_city)
        .count() as f64
        / total;
    if city_share > thresholds.city_share {
        insights.push(Insight::CityDominant {
            city: thresholds.watched_city.clone(),
            share: city_share,
        });
    }

    if insights.is_empty() {
        insights.push(Insight::Balanced);
    }

    insights
}

fn slug(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}
