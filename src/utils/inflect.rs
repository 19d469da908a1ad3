//! Class-name inflection compatible with the Rails `underscore` helper.
//!
//! Report identities are derived from class names such as `Report::TestRunSummary`,
//! which underscore to `report/test_run_summary`. The exact output matters: it is
//! mixed into every cache key and every chart/text component key, so the rules
//! below must stay byte-compatible with keys already stored by other processes.

use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Convert a CamelCase, `::`-namespaced name into its snake_case path form.
pub fn underscore(name: &str) -> String {
    let word = name.replace("::", "/");
    let word = ACRONYM_BOUNDARY.replace_all(&word, "${1}_${2}");
    let word = WORD_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}
