//! Partial-update SET fragments.
//!
//! [`UpdateData`] collects the fields a caller wants to change, in the order
//! they were supplied; [`ColumnMap`] translates semantic field names to
//! physical columns. Building produces a `"col"=$1, ...` fragment whose value
//! order matches the field order exactly.

use crate::error::{FragError, FragResult};
use crate::fragment::Fragment;
use crate::value::Value;
use std::collections::BTreeMap;

/// Maps semantic field names to physical column names.
///
/// Lookup is total: unmapped fields resolve to themselves.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: BTreeMap<String, String>,
}

impl ColumnMap {
    /// Create an empty map (every field resolves to itself).
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a field name to a physical column.
    pub fn map(mut self, field: &str, column: &str) -> Self {
        self.columns.insert(field.to_string(), column.to_string());
        self
    }

    /// Resolve a field to its column, falling back to the field itself.
    pub fn resolve<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map(String::as_str).unwrap_or(field)
    }
}

/// Ordered partial-update data.
///
/// Insertion order is caller-significant: it fixes both placeholder numbering
/// and value order in the built fragment.
#[derive(Debug, Clone, Default)]
pub struct UpdateData {
    fields: Vec<(String, Value)>,
}

impl UpdateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to update. Fields keep the order they were set in.
    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.push((field.to_string(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build the SET fragment: `"col"=$1, "col2"=$2, ...`.
    ///
    /// Columns are resolved through `columns` and quoted as identifiers;
    /// values pass through unchanged. Fails with [`FragError::EmptyUpdate`]
    /// when no fields were set.
    pub fn build(&self, columns: &ColumnMap) -> FragResult<Fragment> {
        if self.fields.is_empty() {
            return Err(FragError::EmptyUpdate);
        }

        let mut parts = Vec::with_capacity(self.fields.len());
        let mut values = Vec::with_capacity(self.fields.len());
        for (idx, (field, value)) in self.fields.iter().enumerate() {
            parts.push(format!("{}=${}", quote(columns.resolve(field)), idx + 1));
            values.push(value.clone());
        }

        Ok(Fragment::new(parts.join(", "), values))
    }
}

impl FromIterator<(String, Value)> for UpdateData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Render `name` as a quoted SQL identifier, doubling embedded quotes.
fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_set_clause_in_field_order() {
        let data = UpdateData::new()
            .set("name", "Phil")
            .set("description", "coder")
            .set("isCool", "yes!");
        let columns = ColumnMap::new().map("isCool", "is_cool");

        let frag = data.build(&columns).unwrap();
        assert_eq!(frag.clause(), r#""name"=$1, "description"=$2, "is_cool"=$3"#);
        assert_eq!(
            frag.values(),
            &[
                Value::Text("Phil".into()),
                Value::Text("coder".into()),
                Value::Text("yes!".into()),
            ]
        );
    }

    #[test]
    fn empty_data_is_rejected() {
        let err = UpdateData::new().build(&ColumnMap::new()).unwrap_err();
        assert!(matches!(err, FragError::EmptyUpdate));
        assert_eq!(err.to_string(), "No data");
    }

    #[test]
    fn unmapped_fields_resolve_to_themselves() {
        let columns = ColumnMap::new().map("numEmployees", "num_employees");
        assert_eq!(columns.resolve("numEmployees"), "num_employees");
        assert_eq!(columns.resolve("name"), "name");
    }

    #[test]
    fn value_count_matches_field_count() {
        let data = UpdateData::new()
            .set("a", 1i64)
            .set("b", 2i64)
            .set("c", 3i64)
            .set("d", 4i64);
        let frag = data.build(&ColumnMap::new()).unwrap();
        assert_eq!(frag.values().len(), data.len());
        assert_eq!(frag.clause(), r#""a"=$1, "b"=$2, "c"=$3, "d"=$4"#);
    }

    #[test]
    fn values_pass_through_unchanged() {
        let data = UpdateData::new()
            .set("flag", true)
            .set("count", 7i64)
            .set("note", Option::<i64>::None);
        let frag = data.build(&ColumnMap::new()).unwrap();
        assert_eq!(
            frag.values(),
            &[Value::Bool(true), Value::Int(7), Value::Null]
        );
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let frag = UpdateData::new()
            .set("odd\"field", 1i64)
            .build(&ColumnMap::new())
            .unwrap();
        assert_eq!(frag.clause(), r#""odd""field"=$1"#);
    }

    #[test]
    fn from_iterator_preserves_order() {
        let data: UpdateData = vec![
            ("x".to_string(), Value::Int(1)),
            ("y".to_string(), Value::Int(2)),
        ]
        .into_iter()
        .collect();
        let frag = data.build(&ColumnMap::new()).unwrap();
        assert_eq!(frag.clause(), r#""x"=$1, "y"=$2"#);
    }
}
