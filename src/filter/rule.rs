//! Filter rule definitions
//!
//! Operators form a closed enumeration. Operator names only arrive as free
//! text at the JSON boundary (`RuleSpec`), where `FilterSet::compile` maps
//! them onto the enum under an explicit `UnknownOperatorPolicy`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::{FilterError, FilterResult};
use crate::observability::{log_event_with_fields, Event};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Is,
    IsNot,
    IsAnyOf,
    IsNotAnyOf,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    Between,
    NotBetween,
    Before,
    After,
    IncludesAll,
    ExcludesAll,
    IsEmpty,
    IsNotEmpty,
}

/// Number of values an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Existence checks
    Zero,
    /// Relational and text operators
    One,
    /// Range operators
    Two,
    /// Set operators
    Many,
}

impl Arity {
    /// Returns true if `count` values fit this arity
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Arity::Zero => count == 0,
            Arity::One => count == 1,
            Arity::Two => count == 2,
            Arity::Many => true,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Arity::Zero => "0",
            Arity::One => "1",
            Arity::Two => "2",
            Arity::Many => "any number of",
        }
    }
}

impl FilterOperator {
    /// Every operator, in catalog order
    pub const ALL: [FilterOperator; 20] = [
        FilterOperator::Is,
        FilterOperator::IsNot,
        FilterOperator::IsAnyOf,
        FilterOperator::IsNotAnyOf,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::Between,
        FilterOperator::NotBetween,
        FilterOperator::Before,
        FilterOperator::After,
        FilterOperator::IncludesAll,
        FilterOperator::ExcludesAll,
        FilterOperator::IsEmpty,
        FilterOperator::IsNotEmpty,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Is => "is",
            FilterOperator::IsNot => "is_not",
            FilterOperator::IsAnyOf => "is_any_of",
            FilterOperator::IsNotAnyOf => "is_not_any_of",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::Between => "between",
            FilterOperator::NotBetween => "not_between",
            FilterOperator::Before => "before",
            FilterOperator::After => "after",
            FilterOperator::IncludesAll => "includes_all",
            FilterOperator::ExcludesAll => "excludes_all",
            FilterOperator::IsEmpty => "is_empty",
            FilterOperator::IsNotEmpty => "is_not_empty",
        }
    }

    /// Number of values the operator takes
    pub fn arity(&self) -> Arity {
        match self {
            FilterOperator::IsEmpty | FilterOperator::IsNotEmpty => Arity::Zero,
            FilterOperator::Between | FilterOperator::NotBetween => Arity::Two,
            FilterOperator::IsAnyOf
            | FilterOperator::IsNotAnyOf
            | FilterOperator::IncludesAll
            | FilterOperator::ExcludesAll => Arity::Many,
            _ => Arity::One,
        }
    }

    /// Returns true for the operators that can match an absent value
    pub fn is_existence_check(&self) -> bool {
        self.arity() == Arity::Zero
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        FilterOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| name.to_string())
    }
}

/// A single typed filter rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Unique rule id
    pub id: String,
    /// Column id the rule reads
    pub field: String,
    /// Operator
    pub operator: FilterOperator,
    /// Operands; count depends on the operator
    #[serde(default)]
    pub values: Vec<Value>,
}

impl FilterRule {
    /// Create a rule with a generated id
    pub fn new(field: impl Into<String>, operator: FilterOperator, values: Vec<Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            field: field.into(),
            operator,
            values,
        }
    }

    /// Replace the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Checks the value count against the operator's arity.
    ///
    /// A rule failing this check still evaluates (fail-closed).
    pub fn validate(&self) -> FilterResult<()> {
        let arity = self.operator.arity();
        if arity.accepts(self.values.len()) {
            Ok(())
        } else {
            Err(FilterError::Arity {
                rule_id: self.id.clone(),
                operator: self.operator.as_str(),
                expected: arity.describe(),
                actual: self.values.len(),
            })
        }
    }
}

/// What to do with a rule whose operator is not in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOperatorPolicy {
    /// Drop the rule so every record passes it, and report a diagnostic
    #[default]
    Pass,
    /// Fail compilation of the whole rule list
    Reject,
}

/// Filter rule as received over the wire, operator still free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Rule id; generated when empty
    #[serde(default)]
    pub id: String,
    /// Column id
    pub field: String,
    /// Operator name
    pub operator: String,
    /// Operands
    #[serde(default)]
    pub values: Vec<Value>,
}

impl From<&FilterRule> for RuleSpec {
    fn from(rule: &FilterRule) -> Self {
        Self {
            id: rule.id.clone(),
            field: rule.field.clone(),
            operator: rule.operator.as_str().to_string(),
            values: rule.values.clone(),
        }
    }
}

/// A non-fatal problem found while compiling rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDiagnostic {
    /// Stable code of the underlying problem
    pub code: String,
    /// Rule the problem was found in
    pub rule_id: String,
    /// Human-readable description
    pub message: String,
}

impl From<&FilterError> for FilterDiagnostic {
    fn from(err: &FilterError) -> Self {
        let rule_id = match err {
            FilterError::UnknownOperator { rule_id, .. } | FilterError::Arity { rule_id, .. } => {
                rule_id.clone()
            }
        };
        Self {
            code: err.code().to_string(),
            rule_id,
            message: err.to_string(),
        }
    }
}

/// A compiled, conjunctive list of rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    rules: Vec<FilterRule>,
    diagnostics: Vec<FilterDiagnostic>,
}

impl FilterSet {
    /// Wraps already-typed rules
    pub fn from_rules(rules: Vec<FilterRule>) -> Self {
        let diagnostics = rules
            .iter()
            .filter_map(|rule| rule.validate().err())
            .map(|err| FilterDiagnostic::from(&err))
            .collect();
        Self { rules, diagnostics }
    }

    /// Compiles wire rules into typed rules.
    ///
    /// Arity mismatches are kept (they evaluate fail-closed) and reported as
    /// diagnostics. Unknown operators follow `policy`.
    pub fn compile(specs: &[RuleSpec], policy: UnknownOperatorPolicy) -> FilterResult<Self> {
        let mut rules = Vec::with_capacity(specs.len());
        let mut diagnostics = Vec::new();

        for spec in specs {
            let id = if spec.id.trim().is_empty() {
                Uuid::new_v4().to_string()
            } else {
                spec.id.clone()
            };

            let operator = match spec.operator.parse::<FilterOperator>() {
                Ok(operator) => operator,
                Err(name) => {
                    let err = FilterError::UnknownOperator {
                        rule_id: id.clone(),
                        operator: name,
                    };
                    log_event_with_fields(
                        Event::UnknownOperator,
                        &[
                            ("field", spec.field.as_str()),
                            ("operator", spec.operator.as_str()),
                            ("rule_id", id.as_str()),
                        ],
                    );
                    match policy {
                        UnknownOperatorPolicy::Pass => {
                            diagnostics.push(FilterDiagnostic::from(&err));
                            continue;
                        }
                        UnknownOperatorPolicy::Reject => return Err(err),
                    }
                }
            };

            let rule = FilterRule {
                id,
                field: spec.field.clone(),
                operator,
                values: spec.values.clone(),
            };

            if let Err(err) = rule.validate() {
                let count = rule.values.len().to_string();
                log_event_with_fields(
                    Event::RuleArityMismatch,
                    &[
                        ("operator", operator.as_str()),
                        ("rule_id", rule.id.as_str()),
                        ("values", count.as_str()),
                    ],
                );
                diagnostics.push(FilterDiagnostic::from(&err));
            }

            rules.push(rule);
        }

        Ok(Self { rules, diagnostics })
    }

    /// Typed rules in input order
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Problems found while compiling
    pub fn diagnostics(&self) -> &[FilterDiagnostic] {
        &self.diagnostics
    }

    /// Returns true if no rule survived compilation
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of typed rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Consumes the set, returning its rules
    pub fn into_rules(self) -> Vec<FilterRule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(id: &str, field: &str, operator: &str, values: Vec<Value>) -> RuleSpec {
        RuleSpec {
            id: id.into(),
            field: field.into(),
            operator: operator.into(),
            values,
        }
    }

    #[test]
    fn test_operator_round_trips_through_name() {
        for op in FilterOperator::ALL {
            assert_eq!(op.as_str().parse::<FilterOperator>(), Ok(op));
        }
        assert_eq!("IS_ANY_OF".parse::<FilterOperator>(), Ok(FilterOperator::IsAnyOf));
        assert!("fuzzy".parse::<FilterOperator>().is_err());
    }

    #[test]
    fn test_operator_serde_names() {
        let op: FilterOperator = serde_json::from_str("\"not_between\"").unwrap();
        assert_eq!(op, FilterOperator::NotBetween);
        assert_eq!(
            serde_json::to_string(&FilterOperator::IsNotEmpty).unwrap(),
            "\"is_not_empty\""
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(FilterOperator::IsEmpty.arity(), Arity::Zero);
        assert_eq!(FilterOperator::Contains.arity(), Arity::One);
        assert_eq!(FilterOperator::Between.arity(), Arity::Two);
        assert_eq!(FilterOperator::IsAnyOf.arity(), Arity::Many);
        assert!(FilterOperator::IsNotEmpty.is_existence_check());
        assert!(!FilterOperator::Is.is_existence_check());
    }

    #[test]
    fn test_validate_arity() {
        let ok = FilterRule::new("salary", FilterOperator::Between, vec![json!(1), json!(2)]);
        assert!(ok.validate().is_ok());

        let bad = FilterRule::new("salary", FilterOperator::Between, vec![json!(1)]);
        assert_eq!(bad.validate().unwrap_err().code(), "TABLEDECK_RULE_ARITY");
    }

    #[test]
    fn test_new_generates_unique_ids() {
        let a = FilterRule::new("f", FilterOperator::IsEmpty, vec![]);
        let b = FilterRule::new("f", FilterOperator::IsEmpty, vec![]);
        assert_ne!(a.id, b.id);
        assert_eq!(a.with_id("fixed").id, "fixed");
    }

    #[test]
    fn test_compile_known_operators() {
        let set = FilterSet::compile(
            &[spec("r1", "name", "contains", vec![json!("al")])],
            UnknownOperatorPolicy::Pass,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.rules()[0].operator, FilterOperator::Contains);
        assert!(set.diagnostics().is_empty());
    }

    #[test]
    fn test_compile_unknown_operator_pass_policy() {
        let set = FilterSet::compile(
            &[
                spec("r1", "name", "sounds_like", vec![json!("al")]),
                spec("r2", "name", "is", vec![json!("alice")]),
            ],
            UnknownOperatorPolicy::Pass,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.rules()[0].id, "r2");
        assert_eq!(set.diagnostics().len(), 1);
        assert_eq!(set.diagnostics()[0].code, "TABLEDECK_UNKNOWN_OPERATOR");
        assert_eq!(set.diagnostics()[0].rule_id, "r1");
    }

    #[test]
    fn test_compile_unknown_operator_reject_policy() {
        let err = FilterSet::compile(
            &[spec("r1", "name", "sounds_like", vec![])],
            UnknownOperatorPolicy::Reject,
        )
        .unwrap_err();

        assert_eq!(
            err,
            FilterError::UnknownOperator {
                rule_id: "r1".into(),
                operator: "sounds_like".into()
            }
        );
    }

    #[test]
    fn test_compile_keeps_arity_mismatch_with_diagnostic() {
        let set = FilterSet::compile(
            &[spec("r1", "salary", "between", vec![json!(1)])],
            UnknownOperatorPolicy::Pass,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.diagnostics()[0].code, "TABLEDECK_RULE_ARITY");
    }

    #[test]
    fn test_compile_generates_missing_ids() {
        let set = FilterSet::compile(
            &[spec("", "name", "is_empty", vec![])],
            UnknownOperatorPolicy::Pass,
        )
        .unwrap();
        assert!(!set.rules()[0].id.is_empty());
    }

    #[test]
    fn test_rule_spec_deserializes_without_values() {
        let spec: RuleSpec =
            serde_json::from_str(r#"{"field": "name", "operator": "is_empty"}"#).unwrap();
        assert!(spec.values.is_empty());
        assert!(spec.id.is_empty());
    }
}
