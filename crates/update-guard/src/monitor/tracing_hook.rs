use super::truncate_sql_bytes;
use super::types::{HookAction, QueryContext, QueryHook};
use tracing::Level;

/// Which text [`TracingSqlHook`] logs for a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlForm {
    /// The SQL as issued, placeholders included.
    #[default]
    Parameterized,
    /// The SQL with bound values substituted, as the guard sees it.
    Literal,
}

/// Logs every statement through `tracing` before it runs. Never aborts.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    pub level: Level,
    /// Byte limit for the logged SQL; `None` logs it whole.
    pub max_sql_length: Option<usize>,
    pub form: SqlForm,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            form: SqlForm::Parameterized,
        }
    }
}

impl TracingSqlHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log [`SqlForm::Literal`] text.
    pub fn literal(self) -> Self {
        self.form(SqlForm::Literal)
    }

    pub fn form(mut self, form: SqlForm) -> Self {
        self.form = form;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn display_sql(&self, ctx: &QueryContext) -> String {
        let rendered = match self.form {
            SqlForm::Literal => ctx.bound_sql.render().ok().map(|r| r.sql),
            SqlForm::Parameterized => None,
        };
        // Blank SQL cannot be rendered; log it as issued.
        self.truncate_sql(rendered.as_deref().unwrap_or_else(|| ctx.sql()))
    }
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        macro_rules! log_at {
            ($level:expr, $($rest:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($rest)*),
                    Level::WARN => tracing::warn!($($rest)*),
                    Level::INFO => tracing::info!($($rest)*),
                    Level::DEBUG => tracing::debug!($($rest)*),
                    Level::TRACE => tracing::trace!($($rest)*),
                }
            };
        }

        let sql = self.display_sql(ctx);
        log_at!(
            self.level,
            target: "update_guard.sql",
            query_type = ?ctx.query_type,
            tag = ctx.tag.as_deref().unwrap_or("-"),
            mappings = ctx.param_count(),
            form = ?self.form,
            sql = %sql,
            fields = ?ctx.fields
        );
        HookAction::Continue
    }
}
