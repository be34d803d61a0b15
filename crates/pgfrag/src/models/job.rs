//! Job storage operations.

use crate::client::GenericClient;
use crate::error::{FragError, FragResult};
use crate::filter::{FilterOp, FilterSpec, FilterValues};
use crate::fragment::Fragment;
use crate::row::{FromRow, RowExt};
use crate::update::{ColumnMap, UpdateData};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

static FILTER_SPEC: LazyLock<FilterSpec> = LazyLock::new(|| {
    FilterSpec::new()
        .rule("title", FilterOp::LikeContains, "title")
        .rule("minSalary", FilterOp::RangeMin, "salary")
        .rule("hasEquity", FilterOp::PositiveThreshold, "equity")
});

// Job fields already match their column names.
static UPDATE_COLUMNS: LazyLock<ColumnMap> = LazyLock::new(ColumnMap::new);

/// A job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> FragResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

/// Data for creating a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl Job {
    /// Recognized filter keys for [`Job::find_all`].
    pub fn filter_spec() -> &'static FilterSpec {
        &FILTER_SPEC
    }

    /// Insert a new job and return the stored row.
    pub async fn create(client: &impl GenericClient, new: &NewJob) -> FragResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        tracing::debug!(target: "pgfrag.sql", sql = %sql, param_count = 4, "create job");
        let row = client
            .query_one(
                &sql,
                &[&new.title, &new.salary, &new.equity, &new.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs matching `filter`, ordered by company handle.
    ///
    /// An empty filter lists everything.
    pub async fn find_all(
        client: &impl GenericClient,
        filter: &FilterValues,
    ) -> FragResult<Vec<Job>> {
        let (sql, fragment) = Self::find_all_query(filter)?;
        tracing::debug!(
            target: "pgfrag.sql",
            sql = %sql,
            param_count = fragment.values().len(),
            "find jobs"
        );
        let rows = client.query(&sql, &fragment.params()).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Fetch one job by id.
    pub async fn get(client: &impl GenericClient, id: i32) -> FragResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        tracing::debug!(target: "pgfrag.sql", sql = %sql, param_count = 1, "get job");
        let row = client
            .query_opt(&sql, &[&id])
            .await?
            .ok_or_else(|| FragError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Partially update a job and return the stored row.
    ///
    /// `data` may carry `title`, `salary`, and `equity`; only supplied
    /// fields change.
    pub async fn update(
        client: &impl GenericClient,
        id: i32,
        data: &UpdateData,
    ) -> FragResult<Job> {
        let (sql, fragment) = Self::update_query(data)?;
        tracing::debug!(
            target: "pgfrag.sql",
            sql = %sql,
            param_count = fragment.anchor_index(),
            "update job"
        );
        let mut params = fragment.params();
        params.push(&id);
        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| FragError::not_found(format!("No job: {id}")))?;
        Job::from_row(&row)
    }

    /// Delete a job.
    pub async fn remove(client: &impl GenericClient, id: i32) -> FragResult<()> {
        let sql = "DELETE FROM jobs WHERE id = $1";
        tracing::debug!(target: "pgfrag.sql", sql, param_count = 1, "remove job");
        let deleted = client.execute(sql, &[&id]).await?;
        if deleted == 0 {
            return Err(FragError::not_found(format!("No job: {id}")));
        }
        Ok(())
    }

    fn find_all_query(filter: &FilterValues) -> FragResult<(String, Fragment)> {
        let fragment = FILTER_SPEC.build(filter)?;
        let mut sql = format!("SELECT {COLUMNS} FROM jobs");
        if !fragment.is_empty() {
            sql.push(' ');
            sql.push_str(fragment.clause());
        }
        sql.push_str(" ORDER BY company_handle");
        Ok((sql, fragment))
    }

    fn update_query(data: &UpdateData) -> FragResult<(String, Fragment)> {
        let fragment = data.build(&UPDATE_COLUMNS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            fragment.clause(),
            fragment.anchor_index(),
        );
        Ok((sql, fragment))
    }
}
