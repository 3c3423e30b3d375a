//! Literal SQL rendering.
//!
//! Turns a parameterized statement (`?` placeholders) plus its bound values into
//! a single literal SQL string that can be handed to a parser for structural
//! analysis. The output is meant for inspection only and is never executed.

use crate::error::{CheckError, CheckResult};
use crate::sql_analysis::SqlDialect;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Positional placeholder marker in parameterized SQL.
pub const PLACEHOLDER: char = '?';

/// Format used for temporal literals.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Tokens the renderer must not look inside, plus whitespace runs and `?`.
// Unterminated quotes and block comments run to the end of the input.
static STANDARD_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"'(?:[^']|'')*'?|"(?:[^"]|"")*"?|`(?:[^`]|``)*`?|--[^\n]*|/\*(?s:.*?)(?:\*/|\z)|\s+|\?"##,
    )
    .expect("token pattern is valid")
});

// MySQL adds backslash escapes in quoted text, `#` comments, and requires
// whitespace after `--`.
static MYSQL_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"'(?:[^'\\]|\\(?s:.)|'')*'?|"(?:[^"\\]|\\(?s:.)|"")*"?|`(?:[^`]|``)*`?|--(?:[ \t\r][^\n]*)?(?m:$)|#[^\n]*|/\*(?s:.*?)(?:\*/|\z)|\s+|\?"##,
    )
    .expect("token pattern is valid")
});

/// A runtime value bound to a placeholder (or the argument object it is read from).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue {
    /// SQL NULL / absent value.
    #[default]
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
    Text(String),
    Timestamp(NaiveDateTime),
    Bool(bool),
    Bytes(Vec<u8>),
    List(Vec<ParamValue>),
    /// Structured argument object; properties are looked up by name.
    Record(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Convert any serializable value through `serde_json`.
    ///
    /// Structs and maps become [`ParamValue::Record`], sequences become
    /// [`ParamValue::List`]. Temporal types serialize as strings and are
    /// therefore treated as text.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }

    /// Build a record from `(name, value)` pairs.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<ParamValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        ParamValue::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Whether this value is a single literal rather than a structured object.
    ///
    /// A scalar argument object is bound as-is to every placeholder.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ParamValue::List(_) | ParamValue::Record(_))
    }

    /// Look up a dotted property path (`address.city`) through nested records.
    pub fn get_path(&self, path: &str) -> Option<&ParamValue> {
        path.split('.').try_fold(self, |current, segment| match current {
            ParamValue::Record(fields) => fields.get(segment),
            _ => None,
        })
    }

    /// Render this value as a SQL literal.
    ///
    /// Numbers are emitted bare, text and timestamps are single-quoted, and
    /// everything else (NULL, booleans, bytes, lists, records) collapses to `''`.
    pub fn to_sql_literal(&self) -> String {
        self.to_sql_literal_for(SqlDialect::Generic)
    }

    /// Render this value as a SQL literal for `dialect`.
    ///
    /// Same as [`to_sql_literal`](Self::to_sql_literal), except that dialects
    /// with backslash escapes also get `\\` doubled inside text.
    pub fn to_sql_literal_for(&self, dialect: SqlDialect) -> String {
        let quote = |s: &str| quote_literal(s, dialect.uses_backslash_escapes());
        match self {
            ParamValue::Int(v) => v.to_string(),
            ParamValue::UInt(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            #[cfg(feature = "rust_decimal")]
            ParamValue::Decimal(v) => v.to_string(),
            ParamValue::Timestamp(ts) => quote(&ts.format(TIMESTAMP_FORMAT).to_string()),
            ParamValue::Text(s) => quote(s),
            _ => "''".to_string(),
        }
    }
}

fn quote_literal(s: &str, backslash_escapes: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' || (backslash_escapes && ch == '\\') {
            out.push(ch);
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

macro_rules! impl_from_for_param_value {
    ($variant:ident => $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_for_param_value!(Int => i64: i8, i16, i32, i64);
impl_from_for_param_value!(UInt => u64: u8, u16, u32, u64, usize);
impl_from_for_param_value!(Float => f64: f32, f64);

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::Timestamp(value)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        ParamValue::Timestamp(value.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ParamValue {
    fn from(value: DateTime<Tz>) -> Self {
        ParamValue::Timestamp(value.naive_local())
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for ParamValue {
    fn from(value: rust_decimal::Decimal) -> Self {
        ParamValue::Decimal(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        ParamValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ParamValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ParamValue::UInt(u)
                } else {
                    n.as_f64().map_or(ParamValue::Null, ParamValue::Float)
                }
            }
            Value::String(s) => ParamValue::Text(s),
            Value::Array(items) => ParamValue::List(items.into_iter().map(Self::from).collect()),
            Value::Object(fields) => ParamValue::Record(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Direction of a statement parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamMode {
    #[default]
    In,
    /// Output parameter; has no value to render.
    Out,
    InOut,
}

/// Declared source of one placeholder: the property it is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMapping {
    pub property: String,
    pub mode: ParamMode,
}

impl ParameterMapping {
    /// An input mapping.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            mode: ParamMode::In,
        }
    }

    /// An output mapping.
    pub fn out(property: impl Into<String>) -> Self {
        Self::new(property).with_mode(ParamMode::Out)
    }

    pub fn with_mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }
}

/// One resolved value for one placeholder position.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    /// Ordinal of the placeholder this binding fills (0-based).
    pub position: usize,
    pub property: String,
    pub value: ParamValue,
    pub mode: ParamMode,
}

impl ParameterBinding {
    /// An input binding at `position`.
    pub fn new(position: usize, value: impl Into<ParamValue>) -> Self {
        Self {
            position,
            property: String::new(),
            value: value.into(),
            mode: ParamMode::In,
        }
    }

    /// Input bindings for `values`, numbered in order.
    pub fn from_values<V, I>(values: I) -> Vec<Self>
    where
        V: Into<ParamValue>,
        I: IntoIterator<Item = V>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(position, value)| Self::new(position, value))
            .collect()
    }
}

/// A parameterized statement as handed over by the host before execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundSql {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// One mapping per placeholder, in placeholder order.
    pub mappings: Vec<ParameterMapping>,
    /// Primary argument object. `None` when the statement takes no argument.
    pub parameter_object: Option<ParamValue>,
    /// Synthetic parameters injected by the host framework (loop variables etc).
    pub additional_parameters: BTreeMap<String, ParamValue>,
}

impl BoundSql {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            ..Self::default()
        }
    }

    /// Append an input mapping for the next placeholder.
    pub fn with_mapping(mut self, property: impl Into<String>) -> Self {
        self.mappings.push(ParameterMapping::new(property));
        self
    }

    /// Append a mapping with an explicit mode.
    pub fn with_parameter_mapping(mut self, mapping: ParameterMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn with_parameter_object(mut self, object: impl Into<ParamValue>) -> Self {
        self.parameter_object = Some(object.into());
        self
    }

    pub fn with_additional_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.additional_parameters.insert(name.into(), value.into());
        self
    }

    /// Resolve every mapping to a concrete value.
    ///
    /// Lookup order per property:
    /// 1. an additional parameter named by the first path segment,
    /// 2. `Null` when there is no argument object,
    /// 3. the argument object itself when it is a scalar,
    /// 4. the property path read from the argument object.
    ///
    /// Output mappings are kept (so positions stay aligned) but carry `Null`.
    pub fn resolve_bindings(&self) -> Vec<ParameterBinding> {
        self.mappings
            .iter()
            .enumerate()
            .map(|(position, mapping)| ParameterBinding {
                position,
                property: mapping.property.clone(),
                value: if mapping.mode == ParamMode::Out {
                    ParamValue::Null
                } else {
                    self.resolve_value(&mapping.property)
                },
                mode: mapping.mode,
            })
            .collect()
    }

    fn resolve_value(&self, property: &str) -> ParamValue {
        let (head, rest) = match property.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (property, None),
        };

        if let Some(additional) = self.additional_parameters.get(head) {
            let found = match rest {
                Some(rest) => additional.get_path(rest),
                None => Some(additional),
            };
            return found.cloned().unwrap_or_default();
        }

        match &self.parameter_object {
            None => ParamValue::Null,
            Some(object) if object.is_scalar() => object.clone(),
            Some(object) => object.get_path(property).cloned().unwrap_or_default(),
        }
    }

    /// Resolve bindings and render the literal SQL.
    pub fn render(&self) -> CheckResult<RenderedSql> {
        self.render_for(SqlDialect::Generic)
    }

    /// Like [`render`](Self::render), lexing quotes and comments the way
    /// `dialect` does.
    pub fn render_for(&self, dialect: SqlDialect) -> CheckResult<RenderedSql> {
        render_literal_sql_for(&self.sql, &self.resolve_bindings(), dialect)
    }
}

/// Literal SQL produced by [`render_literal_sql`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSql {
    pub sql: String,
    /// Placeholders found outside quoted text.
    pub placeholders: usize,
    /// Placeholders replaced by a literal.
    pub substituted: usize,
    /// Bindings supplied, including output bindings.
    pub bindings: usize,
}

impl RenderedSql {
    /// Whether every placeholder had exactly one binding.
    pub fn is_aligned(&self) -> bool {
        self.placeholders == self.bindings
    }
}

impl fmt::Display for RenderedSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Replace every placeholder in `sql` with the literal of its binding.
///
/// SQL without any `?` is returned unchanged. Otherwise comments are dropped,
/// whitespace runs outside quotes collapse to a single space, and placeholders
/// are filled left to right, the n-th placeholder taking the binding whose
/// `position` is n. A `?` inside a quoted literal, a quoted identifier or a
/// comment is not a placeholder.
///
/// Count mismatches never fail: placeholders without an input binding keep
/// their `?` and surplus bindings are ignored. Compare
/// [`RenderedSql::placeholders`] with [`RenderedSql::bindings`] to detect them.
///
/// Quotes and comments are lexed with the generic rules; see
/// [`render_literal_sql_for`] for MySQL backslash escapes.
///
/// # Example
/// ```
/// use update_guard_check::{ParameterBinding, render_literal_sql};
///
/// let bindings = ParameterBinding::from_values([10, 5]);
/// let rendered = render_literal_sql("UPDATE t SET v=? WHERE id = ?", &bindings).unwrap();
/// assert_eq!(rendered.sql, "UPDATE t SET v=10 WHERE id = 5");
/// ```
pub fn render_literal_sql(sql: &str, bindings: &[ParameterBinding]) -> CheckResult<RenderedSql> {
    render_literal_sql_for(sql, bindings, SqlDialect::Generic)
}

/// [`render_literal_sql`] with the quoting and comment rules of `dialect`.
pub fn render_literal_sql_for(
    sql: &str,
    bindings: &[ParameterBinding],
    dialect: SqlDialect,
) -> CheckResult<RenderedSql> {
    if sql.trim().is_empty() {
        return Err(CheckError::EmptyStatement);
    }

    if !sql.contains(PLACEHOLDER) {
        return Ok(RenderedSql {
            sql: sql.to_string(),
            placeholders: 0,
            substituted: 0,
            bindings: bindings.len(),
        });
    }

    // Keyed by position so a stray huge position costs nothing.
    let literals: BTreeMap<usize, String> = bindings
        .iter()
        .filter(|b| b.mode != ParamMode::Out)
        .map(|b| (b.position, b.value.to_sql_literal_for(dialect)))
        .collect();

    let tokens = if dialect.uses_backslash_escapes() {
        &*MYSQL_TOKENS
    } else {
        &*STANDARD_TOKENS
    };

    let mut out = String::with_capacity(sql.len());
    let mut placeholders = 0usize;
    let mut substituted = 0usize;
    let mut last = 0usize;

    for token in tokens.find_iter(sql) {
        out.push_str(&sql[last..token.start()]);
        last = token.end();

        let text = token.as_str();
        match text.as_bytes().first() {
            Some(b'?') => {
                match literals.get(&placeholders) {
                    Some(literal) => {
                        out.push_str(literal);
                        substituted += 1;
                    }
                    None => out.push(PLACEHOLDER),
                }
                placeholders += 1;
            }
            Some(b'\'' | b'"' | b'`') => out.push_str(text),
            // Whitespace or a comment: both separate tokens.
            _ => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
        }
    }
    out.push_str(&sql[last..]);

    Ok(RenderedSql {
        sql: out,
        placeholders,
        substituted,
        bindings: bindings.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_render_numeric_bindings() {
        let bindings = ParameterBinding::from_values([10, 5]);
        let rendered = render_literal_sql("UPDATE t SET v=? WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v=10 WHERE id = 5");
        assert_eq!(rendered.placeholders, 2);
        assert_eq!(rendered.substituted, 2);
        assert!(rendered.is_aligned());
    }

    #[test]
    fn test_render_mixed_types_in_binding_order() {
        let bindings = vec![
            ParameterBinding::new(0, 42),
            ParameterBinding::new(1, "alice"),
            ParameterBinding::new(2, ts(2024, 3, 9, 7, 5, 1)),
            ParameterBinding::new(3, ParamValue::Null),
            ParameterBinding::new(4, 2.5),
            ParameterBinding::new(5, true),
        ];
        let rendered = render_literal_sql(
            "UPDATE users SET age = ?, name = ?, seen_at = ?, note = ?, score = ?, active = ? WHERE id = 1",
            &bindings,
        )
        .unwrap();
        assert_eq!(
            rendered.sql,
            "UPDATE users SET age = 42, name = 'alice', seen_at = '2024-03-09 07:05:01', note = '', score = 2.5, active = '' WHERE id = 1"
        );
        assert_eq!(rendered.substituted, 6);
    }

    #[test]
    fn test_render_escapes_quotes_in_text() {
        let bindings = ParameterBinding::from_values(["O'Brien"]);
        let rendered = render_literal_sql("UPDATE t SET name = ? WHERE id = 1", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET name = 'O''Brien' WHERE id = 1");
    }

    #[test]
    fn test_render_collapses_whitespace() {
        let bindings = ParameterBinding::from_values([1]);
        let rendered =
            render_literal_sql("UPDATE t\n   SET v = 2\n\tWHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 2 WHERE id = 1");
    }

    #[test]
    fn test_render_without_placeholders_is_unchanged() {
        let sql = "UPDATE t\n SET v = 1\n WHERE 1 = 1";
        let rendered = render_literal_sql(sql, &[]).unwrap();
        assert_eq!(rendered.sql, sql);
        assert_eq!(rendered.placeholders, 0);
    }

    #[test]
    fn test_render_empty_sql_is_error() {
        assert_eq!(
            render_literal_sql("", &[]).unwrap_err(),
            CheckError::EmptyStatement
        );
        assert_eq!(
            render_literal_sql(" \n\t ", &[]).unwrap_err(),
            CheckError::EmptyStatement
        );
    }

    #[test]
    fn test_render_ignores_placeholder_inside_literal() {
        let bindings = ParameterBinding::from_values([7]);
        let rendered =
            render_literal_sql("UPDATE t SET note = 'why?' WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET note = 'why?' WHERE id = 7");
        assert_eq!(rendered.placeholders, 1);
    }

    #[test]
    fn test_render_does_not_resubstitute_rendered_text() {
        let bindings = ParameterBinding::from_values(["a?b", "c"]);
        let rendered = render_literal_sql("UPDATE t SET x = ? WHERE y = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET x = 'a?b' WHERE y = 'c'");
    }

    #[test]
    fn test_render_fewer_bindings_than_placeholders() {
        let bindings = ParameterBinding::from_values([1]);
        let rendered = render_literal_sql("UPDATE t SET v = ? WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = ?");
        assert_eq!(rendered.placeholders, 2);
        assert_eq!(rendered.substituted, 1);
        assert!(!rendered.is_aligned());
    }

    #[test]
    fn test_render_more_bindings_than_placeholders() {
        let bindings = ParameterBinding::from_values([1, 2, 3]);
        let rendered = render_literal_sql("UPDATE t SET v = ? WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = 2");
        assert!(!rendered.is_aligned());
    }

    #[test]
    fn test_render_out_binding_keeps_placeholder() {
        let bound = BoundSql::new("CALL bump(?, ?)")
            .with_parameter_mapping(ParameterMapping::out("result"))
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([("id", 9)]));
        let rendered = bound.render().unwrap();
        assert_eq!(rendered.sql, "CALL bump(?, 9)");
        assert_eq!(rendered.substituted, 1);
        assert!(rendered.is_aligned());
    }

    #[test]
    fn test_render_ignores_out_of_range_positions() {
        let bindings = vec![
            ParameterBinding::new(usize::MAX, 1),
            ParameterBinding::new(u32::MAX as usize, 2),
        ];
        let rendered = render_literal_sql("UPDATE t SET v = ? WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = ? WHERE id = ?");
        assert_eq!(rendered.placeholders, 2);
        assert_eq!(rendered.substituted, 0);
    }

    #[test]
    fn test_render_drops_line_comments() {
        let bindings = ParameterBinding::from_values([1, 5]);
        let rendered =
            render_literal_sql("UPDATE t SET v = ? -- bump value\nWHERE id = ?", &bindings)
                .unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = 5");

        let rendered =
            render_literal_sql("UPDATE t SET v = ? -- why?\nWHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = 5");
        assert_eq!(rendered.placeholders, 2);
    }

    #[test]
    fn test_render_drops_block_comments() {
        let bindings = ParameterBinding::from_values([1, 2]);
        let rendered =
            render_literal_sql("UPDATE t SET v = ? /* was ? */ WHERE id = ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = 2");
        assert_eq!(rendered.placeholders, 2);

        let rendered = render_literal_sql("UPDATE t SET v=?/*x*/WHERE id=?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v=1 WHERE id=2");

        let rendered = render_literal_sql("UPDATE t SET v = ? /* open ?", &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 ");
        assert_eq!(rendered.placeholders, 1);
    }

    #[test]
    fn test_render_keeps_whitespace_inside_quotes() {
        let bindings = ParameterBinding::from_values([1]);
        let rendered = render_literal_sql(
            "UPDATE t SET note = 'a  b\n-- c' WHERE id = ?",
            &bindings,
        )
        .unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET note = 'a  b\n-- c' WHERE id = 1");
    }

    #[test]
    fn test_render_mysql_backslash_escapes() {
        let bindings = ParameterBinding::from_values([4]);
        let sql = "UPDATE t SET note = 'it\\'s ? ok' WHERE id = ?";

        let rendered = render_literal_sql_for(sql, &bindings, SqlDialect::MySql).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET note = 'it\\'s ? ok' WHERE id = 4");
        assert_eq!(rendered.placeholders, 1);

        // Generic rules close the quote at the backslash.
        let rendered = render_literal_sql(sql, &bindings).unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET note = 'it\\'s 4 ok' WHERE id = ?");
    }

    #[test]
    fn test_render_mysql_comments() {
        let bindings = ParameterBinding::from_values([1, 2]);
        let rendered = render_literal_sql_for(
            "UPDATE t SET v = ? # set ?\nWHERE id = ?",
            &bindings,
            SqlDialect::MySql,
        )
        .unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = 1 WHERE id = 2");
        assert_eq!(rendered.placeholders, 2);

        // `--` needs trailing whitespace to start a MySQL comment.
        let rendered = render_literal_sql_for(
            "UPDATE t SET v = v --1\nWHERE id = ?",
            &bindings,
            SqlDialect::MySql,
        )
        .unwrap();
        assert_eq!(rendered.sql, "UPDATE t SET v = v --1 WHERE id = 1");
    }

    #[test]
    fn test_text_literal_per_dialect() {
        let value = ParamValue::from("C:\\dir\\it's");
        assert_eq!(value.to_sql_literal(), "'C:\\dir\\it''s'");
        assert_eq!(
            value.to_sql_literal_for(SqlDialect::MySql),
            "'C:\\\\dir\\\\it''s'"
        );
        assert_eq!(
            value.to_sql_literal_for(SqlDialect::PostgreSql),
            value.to_sql_literal()
        );
    }

    #[test]
    fn test_bound_sql_render_for_dialect() {
        let bound = BoundSql::new("UPDATE t SET path = ? WHERE id = ?")
            .with_mapping("path")
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([
                ("path", ParamValue::from("a\\b")),
                ("id", ParamValue::from(1)),
            ]));
        assert_eq!(
            bound.render_for(SqlDialect::MySql).unwrap().sql,
            "UPDATE t SET path = 'a\\\\b' WHERE id = 1"
        );
        assert_eq!(
            bound.render().unwrap().sql,
            "UPDATE t SET path = 'a\\b' WHERE id = 1"
        );
    }

    #[test]
    fn test_resolve_prefers_additional_parameters() {
        let bound = BoundSql::new("UPDATE t SET v = ? WHERE id = ?")
            .with_mapping("__frch_item_0.value")
            .with_mapping("id")
            .with_parameter_object(ParamValue::record([("id", 3)]))
            .with_additional_parameter("__frch_item_0", ParamValue::record([("value", "x")]));
        let bindings = bound.resolve_bindings();
        assert_eq!(bindings[0].value, ParamValue::Text("x".into()));
        assert_eq!(bindings[1].value, ParamValue::Int(3));
        assert_eq!(bindings[1].position, 1);
    }

    #[test]
    fn test_resolve_without_argument_object_is_null() {
        let bound = BoundSql::new("UPDATE t SET v = ?").with_mapping("v");
        assert_eq!(bound.resolve_bindings()[0].value, ParamValue::Null);
        assert_eq!(bound.render().unwrap().sql, "UPDATE t SET v = ''");
    }

    #[test]
    fn test_resolve_scalar_argument_object() {
        let bound = BoundSql::new("UPDATE t SET v = 1 WHERE id = ?")
            .with_mapping("id")
            .with_parameter_object(17);
        assert_eq!(bound.render().unwrap().sql, "UPDATE t SET v = 1 WHERE id = 17");
    }

    #[test]
    fn test_resolve_nested_property_and_missing_property() {
        let user = ParamValue::record([
            ("id", ParamValue::from(5)),
            ("address", ParamValue::record([("city", "Oslo")])),
        ]);
        let bound = BoundSql::new("UPDATE u SET city = ?, zip = ? WHERE id = ?")
            .with_mapping("address.city")
            .with_mapping("address.zip")
            .with_mapping("id")
            .with_parameter_object(user);
        assert_eq!(
            bound.render().unwrap().sql,
            "UPDATE u SET city = 'Oslo', zip = '' WHERE id = 5"
        );
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct User {
            id: i64,
            name: String,
            nickname: Option<String>,
        }

        let value = ParamValue::from_serialize(&User {
            id: 8,
            name: "bob".into(),
            nickname: None,
        })
        .unwrap();
        assert!(!value.is_scalar());
        assert_eq!(value.get_path("id"), Some(&ParamValue::Int(8)));
        assert_eq!(value.get_path("name"), Some(&ParamValue::Text("bob".into())));
        assert_eq!(value.get_path("nickname"), Some(&ParamValue::Null));
    }

    #[test]
    fn test_date_renders_at_midnight() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(ParamValue::from(date).to_sql_literal(), "'2023-12-31 00:00:00'");
    }

    #[test]
    fn test_unsupported_values_render_empty_literal() {
        assert_eq!(ParamValue::Bytes(vec![1, 2]).to_sql_literal(), "''");
        assert_eq!(ParamValue::from(vec![1, 2]).to_sql_literal(), "''");
        assert_eq!(ParamValue::record([("a", 1)]).to_sql_literal(), "''");
        assert_eq!(ParamValue::from(None::<i32>).to_sql_literal(), "''");
    }
}
