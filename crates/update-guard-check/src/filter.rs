//! WHERE-clause tautology detection.
//!
//! A filter is reduced to the handful of node kinds that can be judged purely
//! syntactically (`=`, `!=`, `AND`, `OR`, parentheses). Everything else is kept
//! as an opaque [`FilterExpr::Other`] and never counts as matching every row.
//!
//! Generated filters (`id = ? OR id = ? OR ...`) can be tens of thousands of
//! levels deep, so every walk over the tree uses an explicit work stack.

use sqlparser::ast::{BinaryOperator, Expr};
use std::fmt;

/// Operands nested deeper than this are not rendered back to SQL text.
const MAX_OPERAND_DEPTH: usize = 256;

/// Text kept for an [`FilterExpr::Other`] node too deep to render.
const UNRENDERED: &str = "<deeply nested expression>";

/// Structural view of a WHERE-clause expression.
///
/// Comparison operands are kept as their canonical SQL text and compared for
/// textual identity; they are never evaluated.
pub enum FilterExpr {
    /// `left = right`
    Equal { left: String, right: String },
    /// `left != right` / `left <> right`
    NotEqual { left: String, right: String },
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// A parenthesized expression.
    Grouped(Box<FilterExpr>),
    /// Any other expression, with its SQL text.
    Other(String),
}

/// One unit of pending work in a post-order rebuild of a tree.
enum Step<N> {
    Visit(N),
    And,
    Or,
    Grouped,
}

/// Output stack of a post-order rebuild.
#[derive(Default)]
struct TreeBuilder {
    built: Vec<FilterExpr>,
}

impl TreeBuilder {
    fn push(&mut self, node: FilterExpr) {
        self.built.push(node);
    }

    fn apply<N>(&mut self, step: Step<N>) {
        match step {
            Step::Visit(_) => {}
            Step::And => self.join(FilterExpr::and),
            Step::Or => self.join(FilterExpr::or),
            Step::Grouped => {
                if let Some(inner) = self.built.pop() {
                    self.built.push(FilterExpr::grouped(inner));
                }
            }
        }
    }

    fn join(&mut self, combine: fn(FilterExpr, FilterExpr) -> FilterExpr) {
        if let (Some(right), Some(left)) = (self.built.pop(), self.built.pop()) {
            self.built.push(combine(left, right));
        }
    }

    fn finish(mut self) -> FilterExpr {
        self.built.pop().unwrap_or_else(|| FilterExpr::other(""))
    }
}

/// Whether `expr` nests operators deeper than [`MAX_OPERAND_DEPTH`].
///
/// Operator chains are the only way sqlparser builds deep trees without
/// hitting its recursion limit, so only operator-like nodes are followed.
fn too_deep(expr: &Expr) -> bool {
    let mut stack = vec![(expr, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_OPERAND_DEPTH {
            return true;
        }
        match node {
            Expr::BinaryOp { left, right, .. } => {
                stack.extend([(&**left, depth + 1), (&**right, depth + 1)]);
            }
            Expr::Nested(inner) | Expr::IsNull(inner) | Expr::IsNotNull(inner) => {
                stack.push((&**inner, depth + 1));
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } => {
                stack.push((&**expr, depth + 1));
            }
            _ => {}
        }
    }
    false
}

fn render_expr(expr: &Expr) -> Option<String> {
    (!too_deep(expr)).then(|| expr.to_string())
}

fn comparison(
    left: &Expr,
    right: &Expr,
    whole: &Expr,
    build: fn(String, String) -> FilterExpr,
) -> FilterExpr {
    match (render_expr(left), render_expr(right)) {
        (Some(left), Some(right)) => build(left, right),
        // Unrenderable operands cannot be compared, which never counts as full.
        _ => other_from(whole),
    }
}

fn combine_verdicts(verdicts: &mut Vec<bool>, op: fn(bool, bool) -> bool) {
    let right = verdicts.pop().unwrap_or(false);
    let left = verdicts.pop().unwrap_or(false);
    verdicts.push(op(left, right));
}

fn other_from(expr: &Expr) -> FilterExpr {
    FilterExpr::Other(render_expr(expr).unwrap_or_else(|| UNRENDERED.to_string()))
}

impl FilterExpr {
    pub fn eq(left: impl Into<String>, right: impl Into<String>) -> Self {
        FilterExpr::Equal {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn ne(left: impl Into<String>, right: impl Into<String>) -> Self {
        FilterExpr::NotEqual {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn and(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: FilterExpr, right: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(left), Box::new(right))
    }

    pub fn grouped(inner: FilterExpr) -> Self {
        FilterExpr::Grouped(Box::new(inner))
    }

    pub fn other(sql: impl Into<String>) -> Self {
        FilterExpr::Other(sql.into())
    }

    /// Convert a parsed `sqlparser` expression.
    ///
    /// Comparisons whose operands are nested too deeply to render become
    /// [`FilterExpr::Other`].
    pub fn from_ast(expr: &Expr) -> Self {
        let mut steps = vec![Step::Visit(expr)];
        let mut builder = TreeBuilder::default();

        while let Some(step) = steps.pop() {
            let node = match step {
                Step::Visit(node) => node,
                other => {
                    builder.apply(other);
                    continue;
                }
            };
            match node {
                Expr::BinaryOp { left, op, right } => match op {
                    BinaryOperator::Eq => builder.push(comparison(left, right, node, |l, r| {
                        FilterExpr::Equal { left: l, right: r }
                    })),
                    BinaryOperator::NotEq => builder.push(comparison(left, right, node, |l, r| {
                        FilterExpr::NotEqual { left: l, right: r }
                    })),
                    BinaryOperator::And => {
                        steps.extend([Step::And, Step::Visit(&**right), Step::Visit(&**left)]);
                    }
                    BinaryOperator::Or => {
                        steps.extend([Step::Or, Step::Visit(&**right), Step::Visit(&**left)]);
                    }
                    _ => builder.push(other_from(node)),
                },
                Expr::Nested(inner) => steps.extend([Step::Grouped, Step::Visit(&**inner)]),
                _ => builder.push(other_from(node)),
            }
        }

        builder.finish()
    }

    /// Whether this filter is guaranteed to select every row.
    ///
    /// | node | verdict |
    /// |---|---|
    /// | `l = r` | `l` and `r` are the same text |
    /// | `l != r` | `l` and `r` differ textually |
    /// | `a OR b` | either side |
    /// | `a AND b` | both sides |
    /// | `(a)` | `a` |
    /// | anything else | `false` |
    pub fn is_full_match(&self) -> bool {
        let mut steps = vec![Step::Visit(self)];
        let mut verdicts: Vec<bool> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => match node {
                    FilterExpr::Equal { left, right } => verdicts.push(left == right),
                    FilterExpr::NotEqual { left, right } => verdicts.push(left != right),
                    FilterExpr::And(left, right) => {
                        steps.extend([Step::And, Step::Visit(&**right), Step::Visit(&**left)]);
                    }
                    FilterExpr::Or(left, right) => {
                        steps.extend([Step::Or, Step::Visit(&**right), Step::Visit(&**left)]);
                    }
                    FilterExpr::Grouped(inner) => steps.push(Step::Visit(&**inner)),
                    FilterExpr::Other(_) => verdicts.push(false),
                },
                Step::And => combine_verdicts(&mut verdicts, |l, r| l && r),
                Step::Or => combine_verdicts(&mut verdicts, |l, r| l || r),
                Step::Grouped => {}
            }
        }

        verdicts.pop().unwrap_or(false)
    }

    /// Move the children out so dropping `self` does not recurse.
    fn detach_children(&mut self, pending: &mut Vec<FilterExpr>) {
        let vacant = || FilterExpr::Other(String::new());
        match self {
            FilterExpr::And(left, right) | FilterExpr::Or(left, right) => {
                pending.push(std::mem::replace(&mut **left, vacant()));
                pending.push(std::mem::replace(&mut **right, vacant()));
            }
            FilterExpr::Grouped(inner) => pending.push(std::mem::replace(&mut **inner, vacant())),
            FilterExpr::Equal { .. } | FilterExpr::NotEqual { .. } | FilterExpr::Other(_) => {}
        }
    }
}

impl Drop for FilterExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl Clone for FilterExpr {
    fn clone(&self) -> Self {
        let mut steps = vec![Step::Visit(self)];
        let mut builder = TreeBuilder::default();

        while let Some(step) = steps.pop() {
            let node = match step {
                Step::Visit(node) => node,
                other => {
                    builder.apply(other);
                    continue;
                }
            };
            match node {
                FilterExpr::Equal { left, right } => builder.push(Self::eq(left, right)),
                FilterExpr::NotEqual { left, right } => builder.push(Self::ne(left, right)),
                FilterExpr::And(left, right) => {
                    steps.extend([Step::And, Step::Visit(&**right), Step::Visit(&**left)]);
                }
                FilterExpr::Or(left, right) => {
                    steps.extend([Step::Or, Step::Visit(&**right), Step::Visit(&**left)]);
                }
                FilterExpr::Grouped(inner) => steps.extend([Step::Grouped, Step::Visit(&**inner)]),
                FilterExpr::Other(sql) => builder.push(Self::other(sql)),
            }
        }

        builder.finish()
    }
}

impl PartialEq for FilterExpr {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some(pair) = pairs.pop() {
            match pair {
                (
                    FilterExpr::Equal { left: l1, right: r1 },
                    FilterExpr::Equal { left: l2, right: r2 },
                )
                | (
                    FilterExpr::NotEqual { left: l1, right: r1 },
                    FilterExpr::NotEqual { left: l2, right: r2 },
                ) => {
                    if l1 != l2 || r1 != r2 {
                        return false;
                    }
                }
                (FilterExpr::And(l1, r1), FilterExpr::And(l2, r2))
                | (FilterExpr::Or(l1, r1), FilterExpr::Or(l2, r2)) => {
                    pairs.extend([(&**l1, &**l2), (&**r1, &**r2)]);
                }
                (FilterExpr::Grouped(a), FilterExpr::Grouped(b)) => pairs.push((&**a, &**b)),
                (FilterExpr::Other(a), FilterExpr::Other(b)) => {
                    if a != b {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for FilterExpr {}

impl fmt::Debug for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilterExpr")
            .field(&format_args!("{self}"))
            .finish()
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'a> {
            Node(&'a FilterExpr),
            Text(&'static str),
        }

        let mut pieces = vec![Piece::Node(self)];
        while let Some(piece) = pieces.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };
            match node {
                FilterExpr::Equal { left, right } => write!(f, "{left} = {right}")?,
                FilterExpr::NotEqual { left, right } => write!(f, "{left} <> {right}")?,
                FilterExpr::And(left, right) => pieces.extend([
                    Piece::Node(&**right),
                    Piece::Text(" AND "),
                    Piece::Node(&**left),
                ]),
                FilterExpr::Or(left, right) => pieces.extend([
                    Piece::Node(&**right),
                    Piece::Text(" OR "),
                    Piece::Node(&**left),
                ]),
                FilterExpr::Grouped(inner) => {
                    pieces.extend([Piece::Text(")"), Piece::Node(&**inner), Piece::Text("(")]);
                }
                FilterExpr::Other(sql) => f.write_str(sql)?,
            }
        }
        Ok(())
    }
}

/// Whether an UPDATE with this filter touches every row.
///
/// A missing filter (no WHERE clause) always does.
///
/// # Example
/// ```
/// use update_guard_check::{FilterExpr, is_full_update};
///
/// assert!(is_full_update(None));
/// assert!(is_full_update(Some(&FilterExpr::eq("1", "1"))));
/// assert!(!is_full_update(Some(&FilterExpr::eq("id", "5"))));
/// ```
pub fn is_full_update(filter: Option<&FilterExpr>) -> bool {
    filter.is_none_or(FilterExpr::is_full_match)
}
