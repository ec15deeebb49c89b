//! Filter controls and their serialised form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter controls keyed by the dotted field path they filter on.
pub type FilterSchema = IndexMap<String, FilterField>;

/// How a string-list filter combines the selected values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// A record matches when it holds any selected value.
    #[default]
    Or,
    /// A record matches only when it holds every selected value.
    And,
}

/// Control rendered for one filterable path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterKind {
    /// Numeric bounds.
    Range {
        /// Lowest selectable value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Highest selectable value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Any subset of known values.
    MultiChoice {
        /// Values to choose from.
        options: Vec<Value>,
    },
    /// Free-form string values.
    StringList {
        /// How selected values combine.
        #[serde(default)]
        mode: MatchMode,
    },
    /// Tri-state yes/no/any.
    Boolean,
    /// Substring match.
    Text,
    /// Placeholder for a path that cannot be filtered on.
    Invalid {
        /// Why the path is unusable.
        reason: String,
    },
}

/// One entry of a [`FilterSchema`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// Display label.
    pub label: String,
    /// Control kind and its parameters.
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl FilterField {
    /// A filter control labelled `label`.
    #[must_use]
    pub fn new(label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }

    /// Placeholder for an unusable path.
    #[must_use]
    pub fn invalid(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            label,
            FilterKind::Invalid {
                reason: reason.into(),
            },
        )
    }

    /// Returns `false` for placeholders.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self.kind, FilterKind::Invalid { .. })
    }
}
