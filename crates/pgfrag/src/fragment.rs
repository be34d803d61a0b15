//! Clause text paired with positionally bound values.

use crate::value::Value;
use tokio_postgres::types::ToSql;

/// A clause of query text together with its positionally ordered bound values.
///
/// The i-th `$n` placeholder in the clause (1-based, textual order) always
/// binds `values[i - 1]`; the clause never embeds a raw value. Fragments are
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    clause: String,
    values: Vec<Value>,
}

impl Fragment {
    pub(crate) fn new(clause: String, values: Vec<Value>) -> Self {
        Self { clause, values }
    }

    /// The clause text. Empty means "no filtering" for filter fragments.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    /// The bound values, in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// True when the fragment carries no clause at all.
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// 1-based placeholder index for an anchor value a composer appends
    /// after this fragment's own values (e.g. a primary key in an UPDATE's
    /// WHERE clause).
    pub fn anchor_index(&self) -> usize {
        self.values.len() + 1
    }

    /// Bound values as `ToSql` references, ready to execute with.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Split into clause text and owned values.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.clause, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fragment() {
        let frag = Fragment::default();
        assert!(frag.is_empty());
        assert_eq!(frag.clause(), "");
        assert_eq!(frag.values(), &[]);
        assert_eq!(frag.anchor_index(), 1);
    }

    #[test]
    fn anchor_follows_values() {
        let frag = Fragment::new(
            "\"name\"=$1, \"age\"=$2".to_string(),
            vec![Value::Text("Phil".into()), Value::Int(32)],
        );
        assert_eq!(frag.anchor_index(), 3);
        assert_eq!(frag.params().len(), 2);
    }
}
