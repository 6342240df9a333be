use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::REFERENCE_LANGUAGE;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I18N not found")]
    NotFound,

    #[error("parsing I18N: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I18N must map language codes to objects, got {0}")]
    Shape(String),

    #[error("I18N has no '{0}' table")]
    MissingReference(&'static str),
}

/// Key/text pairs for one language, in table order.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    pub code: String,
    entries: Map<String, Value>,
}

impl LanguageTable {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True when `key` exists with a non-blank text.
    pub fn has_text(&self, key: &str) -> bool {
        match self.entries.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }
}

/// Every language of the site, in table order.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    languages: Vec<LanguageTable>,
    reference: usize,
}

impl TranslationTable {
    /// Parse `{ "<lang>": { "<key>": "<text>", ... }, ... }`.
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, TableError> {
        let Value::Object(root) = value else {
            return Err(TableError::Shape(kind(&value).to_string()));
        };

        let mut languages = Vec::with_capacity(root.len());
        for (code, entries) in root {
            match entries {
                Value::Object(entries) => languages.push(LanguageTable { code, entries }),
                other => return Err(TableError::Shape(format!("{} for '{}'", kind(&other), code))),
            }
        }

        let reference = languages
            .iter()
            .position(|l| l.code == REFERENCE_LANGUAGE)
            .ok_or(TableError::MissingReference(REFERENCE_LANGUAGE))?;

        Ok(Self { languages, reference })
    }

    pub fn languages(&self) -> &[LanguageTable] {
        &self.languages
    }

    pub fn language(&self, code: &str) -> Option<&LanguageTable> {
        self.languages.iter().find(|l| l.code == code)
    }

    /// The English table.
    pub fn reference(&self) -> &LanguageTable {
        &self.languages[self.reference]
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)const I18N\s*=\s*(\{.*?\});").expect("embedded table pattern is valid")
    })
}

/// Pull the `const I18N = {...};` literal out of a page. The literal must be JSON.
pub fn extract_embedded(html: &str) -> Result<TranslationTable, TableError> {
    let captures = embedded_pattern().captures(html).ok_or(TableError::NotFound)?;
    TranslationTable::from_json_str(&captures[1])
}
