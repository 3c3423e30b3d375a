//! update-guard-check
//!
//! Static analysis behind update-guard: rebuild the literal SQL of a
//! parameterized statement and decide whether an UPDATE would rewrite every
//! row of its table.
//!
//! # Features
//!
//! - **Literal rendering**: substitute `?` placeholders with quoted/unquoted literals
//! - **Statement analysis**: parse SQL with `sqlparser` and pick out UPDATE filters
//! - **Tautology detection**: recognise `1 = 1`, `a = a`, `1 != 2` and their
//!   AND/OR/parenthesized combinations, or a missing WHERE clause
//!
//! # Example
//!
//! ```
//! use update_guard_check::{BoundSql, ParamValue, SqlDialect, analyze_sql};
//!
//! let bound = BoundSql::new("UPDATE t SET v = ? WHERE id = ?")
//!     .with_mapping("v")
//!     .with_mapping("id")
//!     .with_parameter_object(ParamValue::record([("v", 10), ("id", 5)]));
//!
//! let rendered = bound.render().unwrap();
//! assert_eq!(rendered.sql, "UPDATE t SET v = 10 WHERE id = 5");
//!
//! let analysis = analyze_sql(&rendered.sql, SqlDialect::Generic).unwrap();
//! assert!(analysis.first_full_update().is_none());
//! ```

pub mod error;
pub mod filter;
pub mod sql_analysis;
pub mod sql_render;

pub use error::{CheckError, CheckResult};
pub use filter::{FilterExpr, is_full_update};
pub use sql_analysis::{
    SqlAnalysis, SqlDialect, StatementAnalysis, StatementKind, UpdateAnalysis, analyze_sql,
};
pub use sql_render::{
    BoundSql, PLACEHOLDER, ParamMode, ParamValue, ParameterBinding, ParameterMapping,
    RenderedSql, TIMESTAMP_FORMAT, render_literal_sql, render_literal_sql_for,
};
