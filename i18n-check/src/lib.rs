//! Translation consistency checks for the static site.
//!
//! Compares every language's keys against English, checks that critical
//! keys are filled in, and cross-references the `data-i18n` attributes in
//! the page against the English table.

mod report;
mod table;

pub use report::{validate, Checks, Report};
pub use table::{extract_embedded, LanguageTable, TableError, TranslationTable};

/// Language every other table is compared against.
pub const REFERENCE_LANGUAGE: &str = "en";

/// Keys whose absence breaks a visible part of the page.
pub const CRITICAL_KEYS: &[&str] = &[
    "hero_h1",
    "hero_sub",
    "cta_demo",
    "cta_ios",
    "cta_android",
    "mission_title",
    "about_title",
    "hq_headquarters",
    "two_apps_title",
    "security_title",
    "benefits_title",
    "for_everyone_title",
    "final_cta_title",
    "contact_title",
    "footer_rights",
];

/// Anchors the navigation links point at.
pub const SECTION_IDS: &[&str] = &["home", "services", "about", "software", "industries", "contact"];
