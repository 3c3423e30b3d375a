//! update-guard
//!
//! A pre-execution guard that refuses UPDATE statements which would rewrite
//! every row of a table.
//!
//! # Features
//!
//! - **Literal rendering**: statements are inspected with their `?` placeholders
//!   replaced by the bound values, so `WHERE id = ?` bound to `id` stays narrow
//!   while `WHERE ? = ?` bound to two equal values is caught
//! - **Tautology detection**: missing WHERE, `1 = 1`, `a = a`, `1 != 2` and their
//!   AND/OR/parenthesized combinations
//! - **Hooks**: plug the guard into a host's execution pipeline through
//!   [`monitor::QueryHook`], alongside SQL logging via `tracing`
//! - **Configuration**: disabled by default, enabled in code or from TOML
//!
//! # Example
//!
//! ```
//! use update_guard::{BoundSql, FullUpdateGuard, GuardConfig, GuardError, ParamValue};
//!
//! let guard = FullUpdateGuard::new(GuardConfig::new().enable());
//!
//! let narrow = BoundSql::new("UPDATE t SET v = ? WHERE id = ?")
//!     .with_mapping("v")
//!     .with_mapping("id")
//!     .with_parameter_object(ParamValue::record([("v", 10), ("id", 5)]));
//! assert!(guard.inspect(&narrow).is_ok());
//!
//! let wide = BoundSql::new("UPDATE t SET v = 10 WHERE 1 = 1");
//! assert_eq!(guard.inspect(&wide), Err(GuardError::FullUpdateRejected));
//! ```

pub mod config;
pub mod error;
pub mod guard;
pub mod monitor;

pub use config::{ConfigError, GuardConfig};
pub use error::{GuardError, GuardResult};
pub use guard::FullUpdateGuard;
pub use monitor::{
    CompositeHook, HookAction, QueryContext, QueryHook, QueryType, SqlForm, TracingSqlHook,
};

pub use update_guard_check as check;
pub use update_guard_check::{
    BoundSql, FilterExpr, ParamMode, ParamValue, ParameterBinding, ParameterMapping, RenderedSql,
    SqlDialect,
};
