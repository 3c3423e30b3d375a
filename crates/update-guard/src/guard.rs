//! The full-table update guard.

use crate::config::GuardConfig;
use crate::error::{GuardError, GuardResult};
use crate::monitor::{HookAction, QueryContext, QueryHook};
use tracing::{debug, warn};
use update_guard_check::{BoundSql, analyze_sql};

/// Rejects UPDATE statements whose filter cannot narrow the affected rows.
///
/// The guard renders the statement with its parameters substituted, parses
/// the result and refuses any UPDATE that has no WHERE clause or whose WHERE
/// clause is a tautology such as `1 = 1` or `a = a OR b = 1`.
///
/// The guard holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullUpdateGuard {
    config: GuardConfig,
}

impl FullUpdateGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Inspect a parameterized statement before it is executed.
    ///
    /// Returns `Ok(())` when execution may proceed.
    ///
    /// # Errors
    ///
    /// - [`GuardError::EmptyStatement`] when the SQL is blank
    /// - [`GuardError::ParseFailure`] when the rendered SQL cannot be parsed
    /// - [`GuardError::FullUpdateRejected`] when an UPDATE would touch every row
    pub fn inspect(&self, bound: &BoundSql) -> GuardResult<()> {
        if !self.config.enabled {
            debug!(target: "update_guard", "guard disabled, skipping inspection");
            return Ok(());
        }

        let rendered = bound.render_for(self.config.dialect)?;
        if !rendered.is_aligned() {
            warn!(
                target: "update_guard",
                placeholders = rendered.placeholders,
                bindings = rendered.bindings,
                sql = %bound.sql,
                "placeholder count does not match parameter mappings"
            );
        }
        debug!(target: "update_guard", sql = %rendered.sql, "inspecting statement");

        self.check_rendered(&rendered.sql)
    }

    /// Inspect SQL that already carries its literal values.
    pub fn check_sql(&self, sql: &str) -> GuardResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        if sql.trim().is_empty() {
            return Err(GuardError::EmptyStatement);
        }
        self.check_rendered(sql)
    }

    fn check_rendered(&self, sql: &str) -> GuardResult<()> {
        let analysis = analyze_sql(sql, self.config.dialect).inspect_err(|err| {
            warn!(target: "update_guard", error = %err, sql, "failed to parse statement");
        })?;

        if let Some(update) = analysis.first_full_update() {
            let filter = update
                .filter
                .as_ref()
                .map_or_else(|| "<none>".to_string(), ToString::to_string);
            warn!(
                target: "update_guard",
                table = %update.table,
                filter = %filter,
                sql,
                "rejected full-table update"
            );
            return Err(GuardError::FullUpdateRejected);
        }

        Ok(())
    }
}

impl QueryHook for FullUpdateGuard {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        match self.inspect(&ctx.bound_sql) {
            Ok(()) => HookAction::Continue,
            Err(err) => HookAction::Abort(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use update_guard_check::{ParamValue, ParameterMapping, SqlDialect};

    fn enabled() -> FullUpdateGuard {
        FullUpdateGuard::new(GuardConfig::new().enable())
    }

    #[test]
    fn test_disabled_guard_passes_everything() {
        let guard = FullUpdateGuard::default();
        assert!(!guard.is_enabled());
        assert_eq!(guard.inspect(&BoundSql::new("UPDATE t SET v = 1")), Ok(()));
        assert_eq!(guard.inspect(&BoundSql::new("   ")), Ok(()));
        assert_eq!(guard.check_sql("not sql at all"), Ok(()));
    }

    #[test]
    fn test_missing_where_rejected() {
        let err = enabled()
            .inspect(&BoundSql::new("UPDATE users SET active = false"))
            .unwrap_err();
        assert!(err.is_full_update_rejected());
    }

    #[test]
    fn test_tautology_after_substitution_rejected() {
        let bound = BoundSql::new("UPDATE users SET name = ? WHERE id = ?")
            .with_mapping("name")
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([
                ("name", ParamValue::from("x")),
                ("id", ParamValue::from(7)),
            ]));
        assert_eq!(enabled().inspect(&bound), Ok(()));

        // Both operands render to the same literal.
        let bound = BoundSql::new("UPDATE users SET name = 'x' WHERE ? = ?")
            .with_mapping("a")
            .with_mapping("b")
            .with_parameter_object(ParamValue::record([("a", 1), ("b", 1)]));
        assert_eq!(enabled().inspect(&bound), Err(GuardError::FullUpdateRejected));
    }

    #[test]
    fn test_empty_statement() {
        assert_eq!(
            enabled().inspect(&BoundSql::new("")),
            Err(GuardError::EmptyStatement)
        );
        assert_eq!(enabled().check_sql(" \n\t"), Err(GuardError::EmptyStatement));
    }

    #[test]
    fn test_parse_failure() {
        let err = enabled()
            .inspect(&BoundSql::new("UPDATE t SET v = = 1"))
            .unwrap_err();
        assert!(err.is_parse_failure());
    }

    #[test]
    fn test_out_mapping_keeps_placeholder() {
        // `?` left in place still parses as a placeholder expression.
        let bound = BoundSql::new("UPDATE t SET v = ? WHERE id = ?")
            .with_parameter_mapping(ParameterMapping::out("v"))
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([("v", 1), ("id", 2)]));
        assert_eq!(enabled().inspect(&bound), Ok(()));
    }

    #[test]
    fn test_dialect_is_used() {
        let guard = FullUpdateGuard::new(
            GuardConfig::new()
                .enable()
                .with_dialect(SqlDialect::MySql),
        );
        assert_eq!(
            guard.check_sql("UPDATE `users` SET `name` = 'x' WHERE `id` = `id`"),
            Err(GuardError::FullUpdateRejected)
        );
        assert_eq!(
            guard.check_sql("UPDATE `users` SET `name` = 'x' WHERE `id` = 3"),
            Ok(())
        );
    }

    #[test]
    fn test_mysql_backslash_value_still_parses() {
        let guard = FullUpdateGuard::new(
            GuardConfig::new()
                .enable()
                .with_dialect(SqlDialect::MySql),
        );
        let bound = BoundSql::new("UPDATE t SET path = ? WHERE id = ?")
            .with_mapping("path")
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([
                ("path", ParamValue::from("C:\\")),
                ("id", ParamValue::from(1)),
            ]));
        assert_eq!(guard.inspect(&bound), Ok(()));
    }

    #[test]
    fn test_hook_maps_errors_to_abort() {
        let guard = enabled();
        assert_eq!(
            guard.before_query(&QueryContext::new("UPDATE t SET v = 1 WHERE 1 = 1")),
            HookAction::Abort(GuardError::FullUpdateRejected)
        );
        assert_eq!(
            guard.before_query(&QueryContext::new("SELECT * FROM t")),
            HookAction::Continue
        );
    }
}
