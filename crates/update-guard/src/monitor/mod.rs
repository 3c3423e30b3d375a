//! Statement hooks run by the host before execution.
//!
//! The host builds a [`QueryContext`] for every statement and asks a
//! [`QueryHook`] whether to proceed. [`FullUpdateGuard`](crate::FullUpdateGuard)
//! is the hook that rejects full-table updates; [`TracingSqlHook`] logs
//! statements and [`CompositeHook`] chains several hooks.
//!
//! # Example
//!
//! ```rust
//! use update_guard::monitor::{CompositeHook, QueryContext, QueryHook, TracingSqlHook};
//! use update_guard::{FullUpdateGuard, GuardConfig};
//!
//! let hook = CompositeHook::new()
//!     .add(TracingSqlHook::new().literal())
//!     .add(FullUpdateGuard::new(GuardConfig::new().enable()));
//!
//! let action = hook.before_query(&QueryContext::new("UPDATE users SET active = false"));
//! assert!(action.is_abort());
//! ```

mod hooks;
mod tracing_hook;
mod types;


pub use hooks::CompositeHook;
pub use tracing_hook::{SqlForm, TracingSqlHook};
pub use types::{HookAction, QueryContext, QueryHook, QueryType};

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
