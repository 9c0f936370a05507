use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
    Ku,
}

impl Language {
    pub const fn supported() -> [Self; 3] {
        [Self::En, Self::Ar, Self::Ku]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
            Self::Ku => "ku",
        }
    }

    pub const fn direction(self) -> TextDirection {
        match self {
            Self::En => TextDirection::Ltr,
            Self::Ar | Self::Ku => TextDirection::Rtl,
        }
    }

    /// Locale used for number formatting.
    pub const fn number_locale(self) -> &'static str {
        match self {
            Self::Ar => "ar-IQ",
            Self::En | Self::Ku => "en-US",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            "ku" | "ckb" => Some(Self::Ku),
            _ => None,
        }
    }

    /// Unsupported or empty codes resolve to `fallback`.
    pub fn from_code_or(code: &str, fallback: Self) -> Self {
        Self::from_code(code).unwrap_or(fallback)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Enumerated listing fields that have translation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationDomain {
    Category,
    City,
    EmploymentType,
    Period,
}

impl TranslationDomain {
    pub const fn namespace(self) -> &'static str {
        match self {
            Self::Category => "job_categories",
            Self::City => "cities",
            Self::EmploymentType => "employment_types",
            Self::Period => "salary_periods",
        }
    }

    pub fn path(self, value: &str) -> String {
        format!("{}.{}", self.namespace(), value)
    }
}

/// Key/string lookup collaborator. Implementations return `None` on a miss;
/// callers substitute the untranslated value.
pub trait TranslationLookup: Send + Sync {
    fn lookup(&self, language: Language, path: &str) -> Option<String>;

    fn lookup_title(&self, language: Language, title: &str) -> Option<String> {
        self.lookup(language, &format!("job_titles.{title}"))
    }
}

impl<T: TranslationLookup + ?Sized> TranslationLookup for std::sync::Arc<T> {
    fn lookup(&self, language: Language, path: &str) -> Option<String> {
        (**self).lookup(language, path)
    }

    fn lookup_title(&self, language: Language, title: &str) -> Option<String> {
        (**self).lookup_title(language, title)
    }
}

/// Lookup that never translates. Used for fallback renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl TranslationLookup for Untranslated {
    fn lookup(&self, _language: Language, _path: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read translation catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("translation catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("translation catalog root must be an object")]
    NotAnObject,
}

/// Translation tables shaped like the site data files:
/// `{ "ui_text": { "<lang>": { ...nested... } }, "job_titles": { "<lang>": { "<title>": "..." } } }`.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    ui_text: Value,
    job_titles: Value,
}

impl JsonCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_reader(reader)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, CatalogError> {
        let Value::Object(mut map) = document else {
            return Err(CatalogError::NotAnObject);
        };

        Ok(Self {
            ui_text: map.remove("ui_text").unwrap_or(Value::Null),
            job_titles: map.remove("job_titles").unwrap_or(Value::Null),
        })
    }
}

impl TranslationLookup for JsonCatalog {
    fn lookup(&self, language: Language, path: &str) -> Option<String> {
        let root = self.ui_text.get(language.code())?;
        value_at_path(root, path)?.as_str().map(str::to_string)
    }

    fn lookup_title(&self, language: Language, title: &str) -> Option<String> {
        self.job_titles
            .get(language.code())?
            .get(title)?
            .as_str()
            .map(str::to_string)
    }
}

/// Walks a dotted path through nested objects. Returns `None` when any
/// segment is missing or the walk hits a non-object; the caller supplies the
/// default.
pub fn value_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |node, segment| node.as_object()?.get(segment))
}
