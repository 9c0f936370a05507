use serde::{Deserialize, Serialize};
use std::fmt;

/// Substituted for any string field missing from the source record.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "IQD")]
    Iqd,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Iqd => "IQD",
            Self::Usd => "USD",
        }
    }

    /// Suffix appended to formatted monthly amounts.
    pub const fn monthly_suffix(self) -> &'static str {
        match self {
            Self::Iqd => " IQD/mo",
            Self::Usd => " USD/mo",
        }
    }

    /// Accepts the currency code in any case; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IQD" => Some(Self::Iqd),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Pay period of a listing. The source data only carries monthly salaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryPeriod {
    #[default]
    Monthly,
}

impl SalaryPeriod {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
        }
    }
}

/// Flat, typed view of one job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub employment_type: String,
    pub period: SalaryPeriod,
    pub city: String,
    pub currency: Currency,
    pub amount_min: i64,
    pub amount_max: i64,
    pub portal_name: String,
    pub portal_link: String,
}

impl NormalizedRow {
    pub fn has_salary(&self) -> bool {
        self.amount_min > 0
    }
}
