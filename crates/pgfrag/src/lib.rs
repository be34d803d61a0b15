//! # pgfrag
//!
//! Parameterized SQL fragment builders for PostgreSQL, plus a small model
//! layer that composes the fragments into executable statements.
//!
//! ## Features
//!
//! - **Injection-safe by construction**: clause text only ever contains `$n`
//!   placeholders; values travel separately and bind positionally
//! - **Deterministic**: update clauses follow caller field order, filter
//!   clauses follow spec order, regardless of how inputs were assembled
//! - **Declarative filters**: each entity declares its recognized keys once
//!   as a [`FilterSpec`]; unknown keys are rejected, never ignored
//! - **Composable**: fragments expose their bound values as `ToSql`
//!   references and the anchor index for appending a primary-key bind
//!
//! ## Building fragments
//!
//! ```ignore
//! use pgfrag::{ColumnMap, UpdateData};
//!
//! let fragment = UpdateData::new()
//!     .set("name", "Phil")
//!     .set("isCool", "yes!")
//!     .build(&ColumnMap::new().map("isCool", "is_cool"))?;
//! assert_eq!(fragment.clause(), r#""name"=$1, "is_cool"=$2"#);
//! ```
//!
//! ```ignore
//! use pgfrag::{FilterOp, FilterSpec, FilterValues};
//!
//! let spec = FilterSpec::new()
//!     .rule("minEmployees", FilterOp::RangeMin, "num_employees")
//!     .rule("nameLike", FilterOp::LikeContains, "name");
//!
//! let fragment = spec.build(&FilterValues::new().set("minEmployees", 12))?;
//! assert_eq!(fragment.clause(), "WHERE num_employees>=$1");
//! ```
//!
//! ## Executing through a model
//!
//! ```ignore
//! use pgfrag::{Company, FilterValues};
//!
//! let companies = Company::find_all(
//!     &client,
//!     &FilterValues::new().set("nameLike", "net"),
//! )
//! .await?;
//! ```

pub mod client;
pub mod error;
pub mod filter;
pub mod fragment;
pub mod models;
pub mod row;
pub mod update;
pub mod value;

pub use client::GenericClient;
pub use error::{FragError, FragResult};
pub use filter::{FilterOp, FilterRule, FilterSpec, FilterValues};
pub use fragment::Fragment;
pub use models::{Company, Job, NewCompany, NewJob};
pub use row::{FromRow, RowExt};
pub use update::{ColumnMap, UpdateData};
pub use value::Value;
