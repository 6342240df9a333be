use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::table::TranslationTable;
use crate::{CRITICAL_KEYS, SECTION_IDS};

/// Keys and anchors the page must provide.
#[derive(Debug, Clone)]
pub struct Checks {
    pub critical_keys: Vec<String>,
    pub section_ids: Vec<String>,
}

impl Default for Checks {
    fn default() -> Self {
        Self {
            critical_keys: CRITICAL_KEYS.iter().map(|k| k.to_string()).collect(),
            section_ids: SECTION_IDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Findings of one validation pass. Content problems are reported, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Language code and key count, in table order.
    pub key_counts: Vec<(String, usize)>,
    /// English keys absent from each other language.
    pub missing: Vec<(String, Vec<String>)>,
    /// Keys of each other language that English does not have.
    pub extra: Vec<(String, Vec<String>)>,
    pub missing_critical: Vec<(String, Vec<String>)>,
    /// Distinct `data-i18n` keys referenced by the page.
    pub references: Vec<String>,
    /// References with no English text.
    pub unresolved: Vec<String>,
    pub missing_sections: Vec<String>,
    pub line_count: usize,
    /// English keys the page never references.
    pub unused: Vec<String>,
}

impl Report {
    /// True when no discrepancy of any kind was found.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.extra.is_empty()
            && self.missing_critical.is_empty()
            && self.unresolved.is_empty()
            && self.missing_sections.is_empty()
            && self.unused.is_empty()
    }

    pub fn missing_in(&self, code: &str) -> &[String] {
        lookup(&self.missing, code)
    }

    pub fn missing_critical_in(&self, code: &str) -> &[String] {
        lookup(&self.missing_critical, code)
    }
}

fn lookup<'a>(entries: &'a [(String, Vec<String>)], code: &str) -> &'a [String] {
    entries
        .iter()
        .find(|(c, _)| c == code)
        .map(|(_, keys)| keys.as_slice())
        .unwrap_or(&[])
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"data-i18n="([^"]+)""#).expect("reference pattern is valid"))
}

/// Distinct `data-i18n` keys in order of first appearance.
fn references(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    reference_pattern()
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Run every check against `html` and its translation `table`.
pub fn validate(html: &str, table: &TranslationTable, checks: &Checks) -> Report {
    let reference = table.reference();
    let mut report = Report {
        key_counts: table
            .languages()
            .iter()
            .map(|l| (l.code.clone(), l.len()))
            .collect(),
        ..Report::default()
    };

    for language in table.languages().iter().filter(|l| l.code != reference.code) {
        let missing: Vec<String> = reference
            .keys()
            .filter(|k| !language.contains(k))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            report.missing.push((language.code.clone(), missing));
        }

        let extra: Vec<String> = language
            .keys()
            .filter(|k| !reference.contains(k))
            .map(String::from)
            .collect();
        if !extra.is_empty() {
            report.extra.push((language.code.clone(), extra));
        }
    }

    for language in table.languages() {
        let absent: Vec<String> = checks
            .critical_keys
            .iter()
            .filter(|k| !language.has_text(k))
            .cloned()
            .collect();
        if !absent.is_empty() {
            report.missing_critical.push((language.code.clone(), absent));
        }
    }

    report.references = references(html);
    report.unresolved = report
        .references
        .iter()
        .filter(|k| !reference.has_text(k))
        .cloned()
        .collect();

    report.missing_sections = checks
        .section_ids
        .iter()
        .filter(|id| !html.contains(&format!("id=\"{}\"", id)))
        .cloned()
        .collect();

    report.line_count = html.split('\n').count();

    let referenced: HashSet<&str> = report.references.iter().map(String::as_str).collect();
    report.unused = reference
        .keys()
        .filter(|k| !referenced.contains(k))
        .map(String::from)
        .collect();

    report
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.key_counts.iter().map(|(c, _)| c.as_str()).collect();
        writeln!(f, "Languages: {}", codes.join(", "))?;
        for (code, count) in &self.key_counts {
            writeln!(f, "  {}: {} keys", code, count)?;
        }

        for (code, keys) in &self.missing {
            writeln!(f, "Missing in {}: {}", code.to_uppercase(), keys.join(", "))?;
        }
        for (code, keys) in &self.extra {
            writeln!(f, "Extra in {}: {}", code.to_uppercase(), keys.join(", "))?;
        }
        if self.missing.is_empty() {
            writeln!(f, "All EN keys present in all languages")?;
        }

        if self.missing_critical.is_empty() {
            writeln!(f, "All critical keys present in all languages")?;
        } else {
            writeln!(f, "MISSING CRITICAL KEYS:")?;
            for (code, keys) in &self.missing_critical {
                writeln!(f, "  {}: {}", code, keys.join(", "))?;
            }
        }

        writeln!(f, "HTML data-i18n refs: {}", self.references.len())?;
        if self.unresolved.is_empty() {
            writeln!(f, "All HTML data-i18n refs resolved in EN")?;
        } else {
            writeln!(f, "WARNING: HTML refs not in EN I18N: {}", self.unresolved.join(", "))?;
        }

        for id in &self.missing_sections {
            writeln!(f, "MISSING section id: {}", id)?;
        }
        if self.missing_sections.is_empty() {
            writeln!(f, "All section IDs present")?;
        }
        writeln!(f, "Total lines: {}", self.line_count)?;

        if self.unused.is_empty() {
            writeln!(f, "All keys are used in HTML")
        } else {
            writeln!(
                f,
                "Defined but unused keys ({}): {}",
                self.unused.len(),
                self.unused.join(", ")
            )
        }
    }
}
