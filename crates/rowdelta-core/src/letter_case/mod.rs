//! Letter-case-aware identifier matching.
//!
//! Databases disagree on how unquoted identifiers are cased in their
//! metadata (Oracle upper-cases them, PostgreSQL lower-cases them, SQLite
//! keeps them as typed). A [`LetterCase`] pairs a [`CaseConversion`] with a
//! [`CaseComparison`] so that a table or column name coming from one source
//! can be recognized in another.
//!
//! Instances are only handed out by [`LetterCase::get_letter_case`], which
//! memoizes one instance per `(conversion, comparison)` pair for the whole
//! process:
//!
//! ```
//! use rowdelta_core::letter_case::{CaseComparison, CaseConversion, LetterCase};
//!
//! let a = LetterCase::get_letter_case(CaseConversion::Upper, CaseComparison::Ignore);
//! let b = LetterCase::get_letter_case(CaseConversion::Upper, CaseComparison::Ignore);
//! assert!(std::ptr::eq(a, b));
//! assert!(a.is_equal(Some("id"), Some("ID")));
//! ```

pub mod comparison;
pub mod conversion;

pub use comparison::CaseComparison;
pub use conversion::CaseConversion;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::errors::Result;

/// An immutable (conversion, comparison) policy pair.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct LetterCase {
    conversion: CaseConversion,
    comparison: CaseComparison,
}

type Registry = Mutex<HashMap<(CaseConversion, CaseComparison), &'static LetterCase>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

impl LetterCase {
    /// Get the shared instance for a policy pair.
    ///
    /// The first call for a pair allocates the instance; every later call,
    /// from any thread, returns that same instance. Instances live for the
    /// rest of the process (the key space has six entries).
    pub fn get_letter_case(
        conversion: CaseConversion,
        comparison: CaseComparison,
    ) -> &'static LetterCase {
        let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
        // A panic while holding the lock cannot leave the map half-written,
        // so a poisoned lock is still safe to use.
        let mut entries = registry.lock().unwrap_or_else(PoisonError::into_inner);
        *entries
            .entry((conversion, comparison))
            .or_insert_with(|| {
                tracing::debug!(
                    component = module_path!(),
                    conversion = conversion.name(),
                    comparison = comparison.name(),
                    "registering letter case"
                );
                Box::leak(Box::new(LetterCase {
                    conversion,
                    comparison,
                }))
            })
    }

    /// Resolve a policy pair from configuration names.
    ///
    /// # Errors
    ///
    /// - `UnknownPolicy` - either name is empty or not recognized
    pub fn from_names(conversion: &str, comparison: &str) -> Result<&'static LetterCase> {
        let conversion: CaseConversion = conversion.parse()?;
        let comparison: CaseComparison = comparison.parse()?;
        Ok(Self::get_letter_case(conversion, comparison))
    }

    /// Default policy for table names: keep as typed, compare ignoring case.
    pub fn table_default() -> &'static LetterCase {
        Self::get_letter_case(CaseConversion::None, CaseComparison::Ignore)
    }

    /// Default policy for column names: upper-case, compare ignoring case.
    pub fn column_default() -> &'static LetterCase {
        Self::get_letter_case(CaseConversion::Upper, CaseComparison::Ignore)
    }

    /// Default policy for primary-key names: upper-case, compare ignoring case.
    pub fn primary_key_default() -> &'static LetterCase {
        Self::get_letter_case(CaseConversion::Upper, CaseComparison::Ignore)
    }

    pub fn conversion(&self) -> CaseConversion {
        self.conversion
    }

    pub fn comparison(&self) -> CaseComparison {
        self.comparison
    }

    /// Convert an identifier. `None` stays `None`.
    pub fn convert(&self, name: Option<&str>) -> Option<String> {
        self.conversion.convert(name)
    }

    /// Convert a present identifier.
    pub fn convert_str(&self, name: &str) -> String {
        self.conversion.convert_str(name)
    }

    /// Compare two identifiers; `None` sorts first.
    pub fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        self.comparison.compare(a, b)
    }

    pub fn is_equal(&self, a: Option<&str>, b: Option<&str>) -> bool {
        self.comparison.is_equal(a, b)
    }

    /// Equality of two present identifiers.
    pub fn eq_str(&self, a: &str, b: &str) -> bool {
        self.comparison.compare_str(a, b) == Ordering::Equal
    }

    /// Position of `name` in `names` under this comparison.
    pub fn position_in<S: AsRef<str>>(&self, names: &[S], name: &str) -> Option<usize> {
        names.iter().position(|n| self.eq_str(n.as_ref(), name))
    }
}

impl fmt::Display for LetterCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.conversion, self.comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_pair_same_instance() {
        let a = LetterCase::get_letter_case(CaseConversion::Lower, CaseComparison::Strict);
        let b = LetterCase::get_letter_case(CaseConversion::Lower, CaseComparison::Strict);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_distinct_pairs_distinct_instances() {
        let mut seen: Vec<&'static LetterCase> = Vec::new();
        for conversion in CaseConversion::ALL {
            for comparison in CaseComparison::ALL {
                let lc = LetterCase::get_letter_case(conversion, comparison);
                assert!(seen.iter().all(|other| !std::ptr::eq(*other, lc)));
                assert_eq!(lc.conversion(), conversion);
                assert_eq!(lc.comparison(), comparison);
                seen.push(lc);
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_defaults() {
        let table = LetterCase::table_default();
        assert_eq!(table.conversion(), CaseConversion::None);
        assert_eq!(table.comparison(), CaseComparison::Ignore);
        assert!(std::ptr::eq(
            LetterCase::column_default(),
            LetterCase::primary_key_default()
        ));
        assert_eq!(LetterCase::column_default().convert_str("name"), "NAME");
    }

    #[test]
    fn test_from_names_rejects_empty() {
        let err = LetterCase::from_names("", "ignore").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::UnknownPolicy);
        let err = LetterCase::from_names("upper", "sometimes").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ExErrorKind::UnknownPolicy);
    }

    #[test]
    fn test_position_in() {
        let lc = LetterCase::column_default();
        let names = vec!["ID".to_string(), "NAME".to_string()];
        assert_eq!(lc.position_in(&names, "name"), Some(1));
        assert_eq!(lc.position_in(&names, "email"), None);
    }

    #[test]
    fn test_display() {
        let lc = LetterCase::get_letter_case(CaseConversion::Upper, CaseComparison::Strict);
        assert_eq!(lc.to_string(), "upper/strict");
    }
}
