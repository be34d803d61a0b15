//! Company storage operations.

use crate::client::GenericClient;
use crate::error::{FragError, FragResult};
use crate::filter::{FilterOp, FilterSpec, FilterValues};
use crate::fragment::Fragment;
use crate::row::{FromRow, RowExt};
use crate::update::{ColumnMap, UpdateData};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

static FILTER_SPEC: LazyLock<FilterSpec> = LazyLock::new(|| {
    FilterSpec::new()
        .rule("minEmployees", FilterOp::RangeMin, "num_employees")
        .rule("maxEmployees", FilterOp::RangeMax, "num_employees")
        .rule("nameLike", FilterOp::LikeContains, "name")
});

static UPDATE_COLUMNS: LazyLock<ColumnMap> = LazyLock::new(|| {
    ColumnMap::new()
        .map("numEmployees", "num_employees")
        .map("logoUrl", "logo_url")
});

/// A company row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> FragResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Data for creating a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl Company {
    /// Recognized filter keys for [`Company::find_all`].
    pub fn filter_spec() -> &'static FilterSpec {
        &FILTER_SPEC
    }

    /// Column map applied to [`Company::update`] data.
    pub fn update_columns() -> &'static ColumnMap {
        &UPDATE_COLUMNS
    }

    /// Insert a new company and return the stored row.
    ///
    /// A duplicate handle surfaces as [`FragError::UniqueViolation`].
    pub async fn create(client: &impl GenericClient, new: &NewCompany) -> FragResult<Company> {
        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        tracing::debug!(target: "pgfrag.sql", sql = %sql, param_count = 5, "create company");
        let row = client
            .query_one(
                &sql,
                &[
                    &new.handle,
                    &new.name,
                    &new.description,
                    &new.num_employees,
                    &new.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies matching `filter`, ordered by name.
    ///
    /// An empty filter lists everything.
    pub async fn find_all(
        client: &impl GenericClient,
        filter: &FilterValues,
    ) -> FragResult<Vec<Company>> {
        let (sql, fragment) = Self::find_all_query(filter)?;
        tracing::debug!(
            target: "pgfrag.sql",
            sql = %sql,
            param_count = fragment.values().len(),
            "find companies"
        );
        let rows = client.query(&sql, &fragment.params()).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// Fetch one company by handle.
    pub async fn get(client: &impl GenericClient, handle: &str) -> FragResult<Company> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        tracing::debug!(target: "pgfrag.sql", sql = %sql, param_count = 1, "get company");
        let row = client
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| FragError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Partially update a company and return the stored row.
    ///
    /// `data` may carry `name`, `description`, `numEmployees`, and `logoUrl`;
    /// only supplied fields change.
    pub async fn update(
        client: &impl GenericClient,
        handle: &str,
        data: &UpdateData,
    ) -> FragResult<Company> {
        let (sql, fragment) = Self::update_query(data)?;
        tracing::debug!(
            target: "pgfrag.sql",
            sql = %sql,
            param_count = fragment.anchor_index(),
            "update company"
        );
        let mut params = fragment.params();
        params.push(&handle);
        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| FragError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company.
    pub async fn remove(client: &impl GenericClient, handle: &str) -> FragResult<()> {
        let sql = "DELETE FROM companies WHERE handle = $1";
        tracing::debug!(target: "pgfrag.sql", sql, param_count = 1, "remove company");
        let deleted = client.execute(sql, &[&handle]).await?;
        if deleted == 0 {
            return Err(FragError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }

    fn find_all_query(filter: &FilterValues) -> FragResult<(String, Fragment)> {
        let fragment = FILTER_SPEC.build(filter)?;
        let mut sql = format!("SELECT {COLUMNS} FROM companies");
        if !fragment.is_empty() {
            sql.push(' ');
            sql.push_str(fragment.clause());
        }
        sql.push_str(" ORDER BY name");
        Ok((sql, fragment))
    }

    fn update_query(data: &UpdateData) -> FragResult<(String, Fragment)> {
        let fragment = data.build(&UPDATE_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            fragment.clause(),
            fragment.anchor_index(),
        );
        Ok((sql, fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn find_all_without_filters_has_no_where() {
        let (sql, fragment) = Company::find_all_query(&FilterValues::new()).unwrap();
        assert_eq!(
            sql,
            "SELECT handle, name, description, num_employees, logo_url \
             FROM companies ORDER BY name"
        );
        assert!(fragment.is_empty());
    }

    #[test]
    fn find_all_with_filters_splices_where_before_order_by() {
        let filter = FilterValues::new()
            .set("minEmployees", 12i64)
            .set("maxEmployees", 32i64)
            .set("nameLike", "Alex");
        let (sql, fragment) = Company::find_all_query(&filter).unwrap();
        assert_eq!(
            sql,
            "SELECT handle, name, description, num_employees, logo_url \
             FROM companies \
             WHERE num_employees>=$1 AND num_employees<=$2 AND name ILIKE $3 \
             ORDER BY name"
        );
        assert_eq!(
            fragment.values(),
            &[
                Value::Int(12),
                Value::Int(32),
                Value::Text("%Alex%".into()),
            ]
        );
    }

    #[test]
    fn find_all_rejects_unknown_keys() {
        let filter = FilterValues::new().set("foo", 1i64);
        let err = Company::find_all_query(&filter).unwrap_err();
        assert!(matches!(err, FragError::UnknownFilterKey(ref key) if key == "foo"));
    }

    #[test]
    fn find_all_rejects_inverted_range() {
        let filter = FilterValues::new()
            .set("minEmployees", 42i64)
            .set("maxEmployees", 32i64);
        let err = Company::find_all_query(&filter).unwrap_err();
        assert!(matches!(err, FragError::RangeOrder { .. }));
    }

    #[test]
    fn update_anchors_handle_after_set_values() {
        let data = UpdateData::new()
            .set("name", "Phil")
            .set("numEmployees", 12i64)
            .set("logoUrl", "http://logo");
        let (sql, fragment) = Company::update_query(&data).unwrap();
        assert_eq!(
            sql,
            "UPDATE companies \
             SET \"name\"=$1, \"num_employees\"=$2, \"logo_url\"=$3 \
             WHERE handle = $4 \
             RETURNING handle, name, description, num_employees, logo_url"
        );
        assert_eq!(fragment.anchor_index(), 4);
    }

    #[test]
    fn update_with_no_data_is_rejected() {
        let err = Company::update_query(&UpdateData::new()).unwrap_err();
        assert!(matches!(err, FragError::EmptyUpdate));
    }
}
