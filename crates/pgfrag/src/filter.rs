//! Declarative filter specs and WHERE fragments.
//!
//! Each entity declares its recognized filter keys once as a [`FilterSpec`];
//! [`FilterSpec::build`] turns caller-supplied [`FilterValues`] into a
//! `WHERE ...` fragment. Output follows spec order, never the order the
//! caller assembled its values in, so identical inputs always produce
//! byte-identical clauses.

use crate::error::{FragError, FragResult};
use crate::fragment::Fragment;
use crate::value::Value;

/// Comparison operator kind for a filter rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `column=$i`
    Exact,
    /// `column>=$i` (lower bound)
    RangeMin,
    /// `column<=$i` (upper bound)
    RangeMax,
    /// `column ILIKE $i` with the raw value wrapped in `%...%`
    LikeContains,
    /// `column>$i` bound to 0, emitted only for truthy flags
    PositiveThreshold,
}

/// One recognized filter key, bound to a column and an operator kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    key: String,
    op: FilterOp,
    column: String,
}

impl FilterRule {
    pub fn new(key: &str, op: FilterOp, column: &str) -> Self {
        Self {
            key: key.to_string(),
            op,
            column: column.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    pub fn column(&self) -> &str {
        &self.column
    }
}

/// Ordered, per-entity list of recognized filter rules.
///
/// Specs are declared once per entity and never mutated at call time.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    rules: Vec<FilterRule>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Earlier rules emit earlier in the clause.
    pub fn rule(mut self, key: &str, op: FilterOp, column: &str) -> Self {
        self.rules.push(FilterRule::new(key, op, column));
        self
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Whether `key` is a recognized filter key of this spec.
    pub fn contains_key(&self, key: &str) -> bool {
        self.rules.iter().any(|r| r.key == key)
    }

    /// Build the WHERE fragment for the supplied filter values.
    ///
    /// Every supplied key must be declared in this spec, else
    /// [`FragError::UnknownFilterKey`]. A min/max rule pair on the same
    /// column with both keys supplied must satisfy `min <= max`, else
    /// [`FragError::RangeOrder`]. Empty input (or input whose only effect is
    /// falsy threshold flags) yields an empty fragment: no filtering.
    pub fn build(&self, values: &FilterValues) -> FragResult<Fragment> {
        for key in values.keys() {
            if !self.contains_key(key) {
                return Err(FragError::unknown_filter_key(key));
            }
        }

        self.check_range_order(values)?;

        let mut parts = Vec::new();
        let mut bound = Vec::new();
        for rule in &self.rules {
            let Some(value) = values.get(&rule.key) else {
                continue;
            };
            // Skipped rules never consume a placeholder index.
            let idx = bound.len() + 1;
            match rule.op {
                FilterOp::Exact => {
                    parts.push(format!("{}=${idx}", rule.column));
                    bound.push(value.clone());
                }
                FilterOp::RangeMin => {
                    parts.push(format!("{}>=${idx}", rule.column));
                    bound.push(value.clone());
                }
                FilterOp::RangeMax => {
                    parts.push(format!("{}<=${idx}", rule.column));
                    bound.push(value.clone());
                }
                FilterOp::LikeContains => {
                    parts.push(format!("{} ILIKE ${idx}", rule.column));
                    bound.push(Value::Text(format!("%{value}%")));
                }
                FilterOp::PositiveThreshold => {
                    if value.is_truthy() {
                        parts.push(format!("{}>${idx}", rule.column));
                        bound.push(Value::Int(0));
                    }
                }
            }
        }

        if parts.is_empty() {
            return Ok(Fragment::default());
        }

        Ok(Fragment::new(
            format!("WHERE {}", parts.join(" AND ")),
            bound,
        ))
    }

    /// Reject a lower bound greater than its paired upper bound.
    fn check_range_order(&self, values: &FilterValues) -> FragResult<()> {
        for min_rule in self.rules.iter().filter(|r| r.op == FilterOp::RangeMin) {
            let Some(max_rule) = self
                .rules
                .iter()
                .find(|r| r.op == FilterOp::RangeMax && r.column == min_rule.column)
            else {
                continue;
            };
            let (Some(min), Some(max)) = (values.get(&min_rule.key), values.get(&max_rule.key))
            else {
                continue;
            };
            if let (Some(min), Some(max)) = (min.as_f64(), max.as_f64()) {
                if min > max {
                    return Err(FragError::range_order(&min_rule.key, &max_rule.key));
                }
            }
        }
        Ok(())
    }
}

/// Caller-supplied filter values keyed by recognized filter keys.
///
/// Insertion order never affects the built clause; only spec order does.
#[derive(Debug, Clone, Default)]
pub struct FilterValues {
    entries: Vec<(String, Value)>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter value, replacing any previous value for the key.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert a JSON object (e.g. a deserialized query payload).
    ///
    /// Values must be scalars; anything else is [`FragError::Unsupported`].
    pub fn from_json(value: &serde_json::Value) -> FragResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(FragError::unsupported(format!(
                "expected a JSON object, got {value}"
            )));
        };
        let mut out = Self::new();
        for (key, raw) in map {
            out = out.set(key, Value::from_json(raw)?);
        }
        Ok(out)
    }
}

impl FromIterator<(String, Value)> for FilterValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (k, v)| acc.set(&k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_spec() -> FilterSpec {
        FilterSpec::new()
            .rule("minEmployees", FilterOp::RangeMin, "num_employees")
            .rule("maxEmployees", FilterOp::RangeMax, "num_employees")
            .rule("nameLike", FilterOp::LikeContains, "name")
    }

    fn job_spec() -> FilterSpec {
        FilterSpec::new()
            .rule("title", FilterOp::LikeContains, "title")
            .rule("minSalary", FilterOp::RangeMin, "salary")
            .rule("hasEquity", FilterOp::PositiveThreshold, "equity")
    }

    #[test]
    fn full_company_filter() {
        let values = FilterValues::new()
            .set("minEmployees", 12i64)
            .set("maxEmployees", 32i64)
            .set("nameLike", "Alex");

        let frag = company_spec().build(&values).unwrap();
        assert_eq!(
            frag.clause(),
            "WHERE num_employees>=$1 AND num_employees<=$2 AND name ILIKE $3"
        );
        assert_eq!(
            frag.values(),
            &[
                Value::Int(12),
                Value::Int(32),
                Value::Text("%Alex%".into()),
            ]
        );
    }

    #[test]
    fn output_order_ignores_insertion_order() {
        let reversed = FilterValues::new()
            .set("nameLike", "Alex")
            .set("maxEmployees", 32i64)
            .set("minEmployees", 12i64);

        let frag = company_spec().build(&reversed).unwrap();
        assert_eq!(
            frag.clause(),
            "WHERE num_employees>=$1 AND num_employees<=$2 AND name ILIKE $3"
        );
    }

    #[test]
    fn empty_values_mean_no_filtering() {
        let frag = company_spec().build(&FilterValues::new()).unwrap();
        assert!(frag.is_empty());
        assert_eq!(frag.clause(), "");
        assert_eq!(frag.values(), &[]);
    }

    #[test]
    fn min_greater_than_max_is_rejected() {
        let values = FilterValues::new()
            .set("minEmployees", 42i64)
            .set("maxEmployees", 32i64);
        let err = company_spec().build(&values).unwrap_err();
        assert!(matches!(err, FragError::RangeOrder { .. }));
    }

    #[test]
    fn min_equal_to_max_is_allowed() {
        let values = FilterValues::new()
            .set("minEmployees", 32i64)
            .set("maxEmployees", 32i64);
        let frag = company_spec().build(&values).unwrap();
        assert_eq!(
            frag.clause(),
            "WHERE num_employees>=$1 AND num_employees<=$2"
        );
    }

    #[test]
    fn unpaired_bounds_skip_the_order_check() {
        // Min and max on different columns are not a pair.
        let spec = FilterSpec::new()
            .rule("minSalary", FilterOp::RangeMin, "salary")
            .rule("maxEmployees", FilterOp::RangeMax, "num_employees");
        let values = FilterValues::new()
            .set("minSalary", 100i64)
            .set("maxEmployees", 5i64);
        assert!(spec.build(&values).is_ok());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let values = FilterValues::new().set("foo", 1i64);
        let err = company_spec().build(&values).unwrap_err();
        assert!(matches!(err, FragError::UnknownFilterKey(ref key) if key == "foo"));
    }

    #[test]
    fn unknown_key_is_rejected_even_when_falsy() {
        let values = FilterValues::new().set("foo", false);
        let err = job_spec().build(&values).unwrap_err();
        assert!(matches!(err, FragError::UnknownFilterKey(ref key) if key == "foo"));
    }

    #[test]
    fn full_job_filter() {
        let values = FilterValues::new()
            .set("title", "j")
            .set("minSalary", 32i64)
            .set("hasEquity", true);

        let frag = job_spec().build(&values).unwrap();
        assert_eq!(
            frag.clause(),
            "WHERE title ILIKE $1 AND salary>=$2 AND equity>$3"
        );
        assert_eq!(
            frag.values(),
            &[Value::Text("%j%".into()), Value::Int(32), Value::Int(0)]
        );
    }

    #[test]
    fn falsy_threshold_emits_nothing() {
        let frag = job_spec()
            .build(&FilterValues::new().set("hasEquity", false))
            .unwrap();
        assert!(frag.is_empty());
        assert_eq!(frag.values(), &[]);
    }

    #[test]
    fn skipped_rules_do_not_consume_indices() {
        // hasEquity is falsy, so minSalary after it still binds $1 and a
        // later present rule binds $2.
        let spec = FilterSpec::new()
            .rule("hasEquity", FilterOp::PositiveThreshold, "equity")
            .rule("minSalary", FilterOp::RangeMin, "salary")
            .rule("title", FilterOp::LikeContains, "title");
        let values = FilterValues::new()
            .set("hasEquity", false)
            .set("minSalary", 10i64)
            .set("title", "dev");

        let frag = spec.build(&values).unwrap();
        assert_eq!(frag.clause(), "WHERE salary>=$1 AND title ILIKE $2");
        assert_eq!(
            frag.values(),
            &[Value::Int(10), Value::Text("%dev%".into())]
        );
    }

    #[test]
    fn exact_rule_binds_unchanged() {
        let spec = FilterSpec::new().rule("handle", FilterOp::Exact, "company_handle");
        let frag = spec
            .build(&FilterValues::new().set("handle", "anderson"))
            .unwrap();
        assert_eq!(frag.clause(), "WHERE company_handle=$1");
        assert_eq!(frag.values(), &[Value::Text("anderson".into())]);
    }

    #[test]
    fn like_wrapping_leaves_input_untouched() {
        let values = FilterValues::new().set("nameLike", "Alex");
        company_spec().build(&values).unwrap();
        assert_eq!(values.get("nameLike"), Some(&Value::Text("Alex".into())));
    }

    #[test]
    fn from_json_object() {
        let values = FilterValues::from_json(&serde_json::json!({
            "minEmployees": 12,
            "nameLike": "Alex",
        }))
        .unwrap();
        let frag = company_spec().build(&values).unwrap();
        assert_eq!(frag.clause(), "WHERE num_employees>=$1 AND name ILIKE $2");
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(FilterValues::from_json(&serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn set_replaces_existing_key() {
        let values = FilterValues::new()
            .set("minEmployees", 1i64)
            .set("minEmployees", 12i64);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("minEmployees"), Some(&Value::Int(12)));
    }
}
