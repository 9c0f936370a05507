use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The `{ "jobs": [...] }` document injected by the site build.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub jobs: Vec<RawJobRecord>,
}

impl RawDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let document: Value = serde_json::from_reader(reader)?;
        Ok(Self::from_value(document))
    }

    /// Never fails: a missing or non-array `jobs` member yields an empty
    /// dataset, and entries that are not objects become empty records.
    pub fn from_value(document: Value) -> Self {
        let entries = match document {
            Value::Object(mut map) => match map.remove("jobs") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    warn!(kind = json_kind(&other), "dataset `jobs` is not an array");
                    Vec::new()
                }
                None => Vec::new(),
            },
            other => {
                warn!(kind = json_kind(&other), "dataset root is not an object");
                Vec::new()
            }
        };

        let jobs = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<RawJobRecord>(entry).unwrap_or_else(|err| {
                    debug!(index, %err, "job entry is not an object; using empty record");
                    RawJobRecord::default()
                })
            })
            .collect();

        Self { jobs }
    }
}

/// One listing as emitted upstream. Every member is optional and tolerant of
/// unexpected JSON types: a mismatched member reads as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobRecord {
    #[serde(rename = "jobID", default, deserialize_with = "lenient_text")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub job: Option<RawJob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(rename = "jobDetails", default, deserialize_with = "lenient")]
    pub job_details: Option<RawJobDetails>,
    #[serde(default, deserialize_with = "lenient")]
    pub salary: Option<RawSalary>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub sources: Option<RawSources>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobDetails {
    #[serde(rename = "jobTitle", default, deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub position: Option<String>,
}

/// Salary figures are kept as raw JSON; they arrive as numbers or as
/// formatted strings such as `"1,200,000"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSalary {
    #[serde(default)]
    pub iqd: Option<Value>,
    #[serde(default)]
    pub usd: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocation {
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSources {
    #[serde(rename = "jobPortal", default, deserialize_with = "lenient")]
    pub job_portal: Option<RawJobPortal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobPortal {
    #[serde(default, deserialize_with = "lenient_text")]
    pub site: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub link: Option<String>,
}

impl RawJobRecord {
    fn details(&self) -> Option<&RawJobDetails> {
        self.job.as_ref()?.job_details.as_ref()
    }

    fn portal(&self) -> Option<&RawJobPortal> {
        self.job.as_ref()?.sources.as_ref()?.job_portal.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.details()?.job_title.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.details()?.category.as_deref()
    }

    pub fn position(&self) -> Option<&str> {
        self.details()?.position.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.job.as_ref()?.location.as_ref()?.city.as_deref()
    }

    pub fn salary_iqd(&self) -> Option<&Value> {
        self.job.as_ref()?.salary.as_ref()?.iqd.as_ref()
    }

    pub fn salary_usd(&self) -> Option<&Value> {
        self.job.as_ref()?.salary.as_ref()?.usd.as_ref()
    }

    pub fn portal_site(&self) -> Option<&str> {
        self.portal()?.site.as_deref()
    }

    pub fn portal_link(&self) -> Option<&str> {
        self.portal()?.link.as_deref()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// Strings and numbers are accepted; empty strings and other types are absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
