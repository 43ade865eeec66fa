//! Aggregate kinds and statistic values

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::columns::DataKind;
use crate::record::format_float;

/// Sentinel text for a statistic that does not apply
pub const NOT_AVAILABLE: &str = "N/A";

/// A named aggregate computable over one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Count,
    #[serde(alias = "avg", alias = "mean")]
    Average,
    Median,
    #[serde(alias = "sum")]
    Total,
    #[serde(alias = "min")]
    Minimum,
    #[serde(alias = "max")]
    Maximum,
    Earliest,
    Latest,
    RangeDays,
    #[serde(alias = "unique")]
    UniqueValues,
    MostCommon,
    MostCommonCount,
}

const NUMERIC_KINDS: [AggregateKind; 6] = [
    AggregateKind::Count,
    AggregateKind::Average,
    AggregateKind::Median,
    AggregateKind::Total,
    AggregateKind::Minimum,
    AggregateKind::Maximum,
];

const DATE_KINDS: [AggregateKind; 4] = [
    AggregateKind::Count,
    AggregateKind::Earliest,
    AggregateKind::Latest,
    AggregateKind::RangeDays,
];

const TEXT_KINDS: [AggregateKind; 4] = [
    AggregateKind::Count,
    AggregateKind::UniqueValues,
    AggregateKind::MostCommon,
    AggregateKind::MostCommonCount,
];

impl AggregateKind {
    /// Every kind, in catalog order
    pub const ALL: [AggregateKind; 12] = [
        AggregateKind::Count,
        AggregateKind::Average,
        AggregateKind::Median,
        AggregateKind::Total,
        AggregateKind::Minimum,
        AggregateKind::Maximum,
        AggregateKind::Earliest,
        AggregateKind::Latest,
        AggregateKind::RangeDays,
        AggregateKind::UniqueValues,
        AggregateKind::MostCommon,
        AggregateKind::MostCommonCount,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Count => "count",
            AggregateKind::Average => "average",
            AggregateKind::Median => "median",
            AggregateKind::Total => "total",
            AggregateKind::Minimum => "minimum",
            AggregateKind::Maximum => "maximum",
            AggregateKind::Earliest => "earliest",
            AggregateKind::Latest => "latest",
            AggregateKind::RangeDays => "range_days",
            AggregateKind::UniqueValues => "unique_values",
            AggregateKind::MostCommon => "most_common",
            AggregateKind::MostCommonCount => "most_common_count",
        }
    }

    /// Result label, as used in descriptions and footers
    pub fn label(&self) -> &'static str {
        match self {
            AggregateKind::Count => "Count",
            AggregateKind::Average => "Average",
            AggregateKind::Median => "Median",
            AggregateKind::Total => "Total",
            AggregateKind::Minimum => "Minimum",
            AggregateKind::Maximum => "Maximum",
            AggregateKind::Earliest => "Earliest",
            AggregateKind::Latest => "Latest",
            AggregateKind::RangeDays => "Range (days)",
            AggregateKind::UniqueValues => "Unique Values",
            AggregateKind::MostCommon => "Most Common",
            AggregateKind::MostCommonCount => "Most Common Count",
        }
    }

    /// Kinds offered for a column of the given type, in display order
    pub fn applicable_to(kind: DataKind) -> &'static [AggregateKind] {
        match kind {
            DataKind::Numeric => &NUMERIC_KINDS,
            DataKind::Date => &DATE_KINDS,
            DataKind::Text => &TEXT_KINDS,
        }
    }

    pub fn applies_to(&self, kind: DataKind) -> bool {
        Self::applicable_to(kind).contains(self)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregateKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(name) || kind.label().eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| format!("Unknown aggregate '{}'", name))
    }
}

/// One computed statistic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Count(usize),
    Date(NaiveDateTime),
    Text(String),
    NotApplicable,
}

impl StatValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => Some(*n),
            StatValue::Count(c) => Some(*c as f64),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, StatValue::NotApplicable)
    }

    /// Display text, with `not_available` standing in for inapplicable values.
    ///
    /// Counts are integers, non-integral numbers carry two decimals and dates
    /// render as `YYYY-MM-DD`.
    pub fn display_with(&self, not_available: &str) -> String {
        match self {
            StatValue::Number(n) if n.fract() == 0.0 => format_float(*n),
            StatValue::Number(n) => format!("{:.2}", n),
            StatValue::Count(c) => c.to_string(),
            StatValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            StatValue::Text(s) => s.clone(),
            StatValue::NotApplicable => not_available.to_string(),
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with(NOT_AVAILABLE))
    }
}
