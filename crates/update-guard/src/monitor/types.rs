use crate::error::{GuardError, GuardResult};
use std::collections::BTreeMap;
use update_guard_check::BoundSql;

/// Statement kind as the host labels it.
///
/// Informational only: the guard parses every statement itself, so a
/// mislabelled UPDATE is still inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// DDL, procedure calls and anything else.
    Other,
}

const LEADING_KEYWORDS: [(&str, QueryType); 5] = [
    ("SELECT", QueryType::Select),
    ("WITH", QueryType::Select),
    ("INSERT", QueryType::Insert),
    ("UPDATE", QueryType::Update),
    ("DELETE", QueryType::Delete),
];

impl QueryType {
    /// Guess the kind from the first keyword, skipping whitespace, comments
    /// and opening parentheses. A CTE counts as [`QueryType::Select`].
    pub fn from_sql(sql: &str) -> Self {
        let head = skip_sql_prefix(sql);
        LEADING_KEYWORDS
            .iter()
            .find(|(keyword, _)| starts_with_keyword(head, keyword))
            .map_or(QueryType::Other, |&(_, kind)| kind)
    }
}

fn skip_sql_prefix(sql: &str) -> &str {
    let mut s = sql;
    loop {
        let before = s;
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("--") {
            s = rest.split_once('\n').map_or("", |(_, after)| after);
        } else if let Some(rest) = s.strip_prefix("/*") {
            s = rest.split_once("*/").map_or("", |(_, after)| after);
        } else if let Some(rest) = s.strip_prefix('(') {
            s = rest;
        }
        if s == before {
            return s;
        }
    }
}

fn starts_with_keyword(s: &str, keyword: &str) -> bool {
    let Some(head) = s.get(..keyword.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(keyword)
        && !s[keyword.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Context information about the statement about to be executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Parameterized SQL together with its parameter mappings and argument object.
    pub bound_sql: BoundSql,
    /// Statement kind as reported by the host (or detected from the SQL).
    pub query_type: QueryType,
    /// Optional statement name/tag for identification (e.g. a mapper id).
    pub tag: Option<String>,
    /// Optional structured fields for observability (low-cardinality).
    pub fields: BTreeMap<String, String>,
}

impl QueryContext {
    /// Context for a statement without parameters.
    pub fn new(sql: &str) -> Self {
        Self::from_bound_sql(BoundSql::new(sql))
    }

    /// Context for a parameterized statement.
    pub fn from_bound_sql(bound_sql: BoundSql) -> Self {
        let query_type = QueryType::from_sql(&bound_sql.sql);
        Self {
            bound_sql,
            query_type,
            tag: None,
            fields: BTreeMap::new(),
        }
    }

    /// Override the detected query type.
    pub fn with_query_type(mut self, query_type: QueryType) -> Self {
        self.query_type = query_type;
        self
    }

    /// Add a tag to identify this statement.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Add a structured field (low-cardinality).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The parameterized SQL text.
    pub fn sql(&self) -> &str {
        &self.bound_sql.sql
    }

    /// Number of parameter mappings.
    pub fn param_count(&self) -> usize {
        self.bound_sql.mappings.len()
    }
}

/// Action to take after a hook inspects a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Proceed with execution.
    Continue,
    /// Abort execution with an error.
    Abort(GuardError),
}

impl HookAction {
    pub fn is_abort(&self) -> bool {
        matches!(self, HookAction::Abort(_))
    }

    /// `Ok(())` to proceed, `Err` to abort.
    pub fn into_result(self) -> GuardResult<()> {
        match self {
            HookAction::Continue => Ok(()),
            HookAction::Abort(err) => Err(err),
        }
    }
}

/// Trait for hooking into statement execution.
///
/// The host calls [`QueryHook::before_query`] once per statement, synchronously,
/// right before it is sent to the database.
pub trait QueryHook: Send + Sync {
    /// Called before a statement is executed.
    ///
    /// Return `HookAction::Continue` to proceed normally or
    /// `HookAction::Abort` to cancel the statement.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }
}
