use crate::error::{CheckError, CheckResult};
use crate::filter::{self, FilterExpr};
use serde::{Deserialize, Serialize};
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};
use sqlparser::parser::Parser;

/// SQL dialect used to parse rendered statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SqlDialect {
    #[default]
    #[serde(rename = "generic")]
    Generic,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "postgres", alias = "postgresql")]
    PostgreSql,
    #[serde(rename = "sqlite")]
    Sqlite,
    #[serde(rename = "mssql")]
    MsSql,
}

impl SqlDialect {
    /// Whether `\` escapes the next character inside quoted text.
    pub fn uses_backslash_escapes(self) -> bool {
        matches!(self, SqlDialect::MySql)
    }

    fn parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic => Box::new(GenericDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::PostgreSql => Box::new(PostgreSqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::MsSql => Box::new(MsSqlDialect {}),
        }
    }
}

/// Type of SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAnalysis {
    /// Target table (including joins, as written).
    pub table: String,
    pub set_columns: Vec<String>,
    /// WHERE clause, `None` when absent.
    pub filter: Option<FilterExpr>,
}

impl UpdateAnalysis {
    /// Whether this UPDATE is guaranteed to touch every row.
    pub fn is_full_update(&self) -> bool {
        filter::is_full_update(self.filter.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementAnalysis {
    pub kind: StatementKind,
    /// Present for UPDATE statements only.
    pub update: Option<UpdateAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlAnalysis {
    pub statements: Vec<StatementAnalysis>,
}

impl SqlAnalysis {
    /// All UPDATE statements, in source order.
    pub fn updates(&self) -> impl Iterator<Item = &UpdateAnalysis> {
        self.statements.iter().filter_map(|s| s.update.as_ref())
    }

    /// The first UPDATE that touches every row, if any.
    pub fn first_full_update(&self) -> Option<&UpdateAnalysis> {
        self.updates().find(|u| u.is_full_update())
    }
}

/// Parse `sql` (one or more statements) and extract what the guard needs.
///
/// # Example
/// ```
/// use update_guard_check::{SqlDialect, StatementKind, analyze_sql};
///
/// let analysis = analyze_sql("UPDATE t SET v = 1 WHERE 1 = 1", SqlDialect::Generic).unwrap();
/// assert_eq!(analysis.statements[0].kind, StatementKind::Update);
/// assert!(analysis.first_full_update().is_some());
/// ```
pub fn analyze_sql(sql: &str, dialect: SqlDialect) -> CheckResult<SqlAnalysis> {
    if sql.trim().is_empty() {
        return Err(CheckError::EmptyStatement);
    }

    let parser_dialect = dialect.parser_dialect();
    let statements =
        Parser::parse_sql(&*parser_dialect, sql).map_err(|e| CheckError::parse(e.to_string()))?;

    Ok(SqlAnalysis {
        statements: statements.iter().map(analyze_statement).collect(),
    })
}

fn analyze_statement(statement: &Statement) -> StatementAnalysis {
    let kind = match statement {
        Statement::Query(_) => StatementKind::Select,
        Statement::Insert(_) => StatementKind::Insert,
        Statement::Delete(_) => StatementKind::Delete,
        Statement::Update(update) => {
            return StatementAnalysis {
                kind: StatementKind::Update,
                update: Some(UpdateAnalysis {
                    table: update.table.to_string(),
                    set_columns: update
                        .assignments
                        .iter()
                        .map(|a| a.target.to_string())
                        .collect(),
                    filter: update.selection.as_ref().map(FilterExpr::from_ast),
                }),
            };
        }
        _ => StatementKind::Other,
    };

    StatementAnalysis { kind, update: None }
}
