//! Letter-case configuration.
//!
//! [`LetterCaseSettings`] selects the policy used for each kind of
//! identifier. Every kind can be overridden independently; anything not
//! overridden keeps the defaults:
//!
//! | kind        | conversion | comparison |
//! |-------------|------------|------------|
//! | table       | none       | ignore     |
//! | column      | upper      | ignore     |
//! | primary key | upper      | ignore     |
//!
//! Settings can also be loaded from a TOML document:
//!
//! ```
//! use rowdelta_core::config::LetterCaseSettings;
//! use rowdelta_core::letter_case::CaseComparison;
//!
//! let settings = LetterCaseSettings::from_toml_str(
//!     r#"
//!     [letter_case.column]
//!     conversion = "lower"
//!     comparison = "strict"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(settings.column().comparison(), CaseComparison::Strict);
//! // not mentioned, so still the default
//! assert_eq!(settings.table().comparison(), CaseComparison::Ignore);
//! ```

use serde::Deserialize;

use crate::errors::{Result, RowDeltaError};
use crate::letter_case::LetterCase;

/// The three kinds of identifier that carry their own letter-case policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    Table,
    Column,
    PrimaryKey,
}

/// Letter-case policies for table, column and primary-key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterCaseSettings {
    table: &'static LetterCase,
    column: &'static LetterCase,
    primary_key: &'static LetterCase,
}

impl Default for LetterCaseSettings {
    fn default() -> Self {
        Self {
            table: LetterCase::table_default(),
            column: LetterCase::column_default(),
            primary_key: LetterCase::primary_key_default(),
        }
    }
}

impl LetterCaseSettings {
    pub fn new(
        table: &'static LetterCase,
        column: &'static LetterCase,
        primary_key: &'static LetterCase,
    ) -> Self {
        Self {
            table,
            column,
            primary_key,
        }
    }

    /// Override the table-name policy
    pub fn with_table(mut self, letter_case: &'static LetterCase) -> Self {
        self.table = letter_case;
        self
    }

    /// Override the column-name policy
    pub fn with_column(mut self, letter_case: &'static LetterCase) -> Self {
        self.column = letter_case;
        self
    }

    /// Override the primary-key-name policy
    pub fn with_primary_key(mut self, letter_case: &'static LetterCase) -> Self {
        self.primary_key = letter_case;
        self
    }

    pub fn table(&self) -> &'static LetterCase {
        self.table
    }

    pub fn column(&self) -> &'static LetterCase {
        self.column
    }

    pub fn primary_key(&self) -> &'static LetterCase {
        self.primary_key
    }

    /// Policy for a kind of identifier
    pub fn letter_case(&self, kind: IdentifierKind) -> &'static LetterCase {
        match kind {
            IdentifierKind::Table => self.table,
            IdentifierKind::Column => self.column,
            IdentifierKind::PrimaryKey => self.primary_key,
        }
    }

    /// Convert a raw identifier with the policy for its kind.
    pub fn normalize(&self, kind: IdentifierKind, raw: &str) -> String {
        self.letter_case(kind).convert_str(raw)
    }

    /// Whether two identifiers of the given kind denote the same object.
    pub fn identifiers_equal(&self, kind: IdentifierKind, a: &str, b: &str) -> bool {
        self.letter_case(kind).eq_str(a, b)
    }

    /// Load settings from a TOML document with an optional `[letter_case]` table.
    ///
    /// # Errors
    ///
    /// - `Serialization` - the document is not valid TOML or has the wrong shape
    /// - `UnknownPolicy` - a conversion/comparison name is not recognized
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let document: ConfigDocument = toml::from_str(text).map_err(RowDeltaError::from)?;
        document.letter_case.resolve()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    letter_case: RawSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    table: Option<RawPolicy>,
    column: Option<RawPolicy>,
    primary_key: Option<RawPolicy>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    conversion: String,
    comparison: String,
}

impl RawSettings {
    fn resolve(&self) -> Result<LetterCaseSettings> {
        let mut settings = LetterCaseSettings::default();
        if let Some(policy) = &self.table {
            settings = settings.with_table(policy.resolve()?);
        }
        if let Some(policy) = &self.column {
            settings = settings.with_column(policy.resolve()?);
        }
        if let Some(policy) = &self.primary_key {
            settings = settings.with_primary_key(policy.resolve()?);
        }
        Ok(settings)
    }
}

impl RawPolicy {
    fn resolve(&self) -> Result<&'static LetterCase> {
        LetterCase::from_names(&self.conversion, &self.comparison)
    }
}
