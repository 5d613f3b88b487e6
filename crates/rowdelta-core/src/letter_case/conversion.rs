//! Case conversion policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RowDeltaError;

/// How an identifier is rewritten before it is stored or compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConversion {
    /// Leave the identifier as typed
    None,
    /// Fold to lower case
    Lower,
    /// Fold to upper case
    Upper,
}

impl CaseConversion {
    /// All conversion policies, in declaration order.
    pub const ALL: [CaseConversion; 3] = [
        CaseConversion::None,
        CaseConversion::Lower,
        CaseConversion::Upper,
    ];

    /// Apply the conversion. `None` input yields `None`.
    pub fn convert(&self, name: Option<&str>) -> Option<String> {
        name.map(|n| self.convert_str(n))
    }

    /// Apply the conversion to a present identifier.
    pub fn convert_str(&self, name: &str) -> String {
        match self {
            CaseConversion::None => name.to_string(),
            CaseConversion::Lower => name.to_lowercase(),
            CaseConversion::Upper => name.to_uppercase(),
        }
    }

    /// Stable configuration name
    pub fn name(&self) -> &'static str {
        match self {
            CaseConversion::None => "none",
            CaseConversion::Lower => "lower",
            CaseConversion::Upper => "upper",
        }
    }
}

impl fmt::Display for CaseConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseConversion {
    type Err = RowDeltaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no" => Ok(CaseConversion::None),
            "lower" | "lower_case" | "lowercase" => Ok(CaseConversion::Lower),
            "upper" | "upper_case" | "uppercase" => Ok(CaseConversion::Upper),
            _ => Err(RowDeltaError::UnknownPolicy {
                policy: "case conversion".to_string(),
                name: s.to_string(),
            }),
        }
    }
}
