//! Case comparison policies.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::RowDeltaError;

/// How two identifiers are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseComparison {
    /// Ordinal, case-sensitive comparison
    Strict,
    /// Comparison of the lower-cased forms
    Ignore,
}

impl CaseComparison {
    /// All comparison policies, in declaration order.
    pub const ALL: [CaseComparison; 2] = [CaseComparison::Strict, CaseComparison::Ignore];

    /// Compare two possibly-absent identifiers.
    ///
    /// `None` sorts strictly before any present identifier; two `None` are equal.
    pub fn compare(&self, a: Option<&str>, b: Option<&str>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.compare_str(a, b),
        }
    }

    /// Compare two present identifiers.
    pub fn compare_str(&self, a: &str, b: &str) -> Ordering {
        match self {
            CaseComparison::Strict => a.cmp(b),
            CaseComparison::Ignore => {
                // char-wise so that no intermediate String is allocated
                let lower_a = a.chars().flat_map(char::to_lowercase);
                let lower_b = b.chars().flat_map(char::to_lowercase);
                lower_a.cmp(lower_b)
            }
        }
    }

    /// Equality under this policy.
    pub fn is_equal(&self, a: Option<&str>, b: Option<&str>) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Stable configuration name
    pub fn name(&self) -> &'static str {
        match self {
            CaseComparison::Strict => "strict",
            CaseComparison::Ignore => "ignore",
        }
    }
}

impl fmt::Display for CaseComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseComparison {
    type Err = RowDeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "sensitive" => Ok(CaseComparison::Strict),
            "ignore" | "insensitive" => Ok(CaseComparison::Ignore),
            _ => Err(RowDeltaError::UnknownPolicy {
                policy: "case comparison".to_string(),
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_is_ordinal() {
        assert_eq!(CaseComparison::Strict.compare_str("ID", "id"), Ordering::Less);
        assert!(!CaseComparison::Strict.is_equal(Some("ID"), Some("id")));
    }

    #[test]
    fn test_ignore_folds() {
        assert_eq!(CaseComparison::Ignore.compare_str("ID", "id"), Ordering::Equal);
        assert_eq!(CaseComparison::Ignore.compare_str("abc", "ABD"), Ordering::Less);
    }

    #[test]
    fn test_null_ordering() {
        for comparison in CaseComparison::ALL {
            assert_eq!(comparison.compare(None, None), Ordering::Equal);
            assert_eq!(comparison.compare(None, Some("")), Ordering::Less);
            assert_eq!(comparison.compare(Some(""), None), Ordering::Greater);
        }
    }

    #[test]
    fn test_ignore_handles_non_ascii() {
        assert!(CaseComparison::Ignore.is_equal(Some("ÉTÉ"), Some("été")));
    }
}
