use std::collections::HashMap;
use std::fmt::Display;

use once_cell::sync::Lazy;

/// Logical and comparison operators understood in predicate trees.
///
/// Operators are keys of a predicate tree in their own right, kept apart
/// from field names by [`Key`](super::Key). Each one has a stable token
/// (`$gte`) and a human-readable name (`greaterThanOrEqual`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    Not,
    Is,
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Between,
    NotBetween,
    In,
    NotIn,
    Like,
    NotLike,
    StartsWith,
    EndsWith,
    Substring,
    Regexp,
    NotRegexp,
    Col,
}

/// Full vocabulary, in declaration order.
pub const OPERATORS: [Operator; 22] = [
    Operator::Not,
    Operator::Is,
    Operator::And,
    Operator::Or,
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::Between,
    Operator::NotBetween,
    Operator::In,
    Operator::NotIn,
    Operator::Like,
    Operator::NotLike,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::Substring,
    Operator::Regexp,
    Operator::NotRegexp,
    Operator::Col,
];

// First entry wins, so "like" resolves to `Like` and never to `NotLike`.
static BY_HUMAN_NAME: Lazy<HashMap<&'static str, Operator>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(OPERATORS.len());
    for op in OPERATORS {
        map.entry(op.human_name()).or_insert(op);
    }
    map
});

static BY_TOKEN: Lazy<HashMap<&'static str, Operator>> =
    Lazy::new(|| OPERATORS.iter().map(|op| (op.token(), *op)).collect());

impl Operator {
    /// Opaque token identity.
    pub const fn token(self) -> &'static str {
        match self {
            Operator::Not => "$not",
            Operator::Is => "$is",
            Operator::And => "$and",
            Operator::Or => "$or",
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Between => "$between",
            Operator::NotBetween => "$notBetween",
            Operator::In => "$in",
            Operator::NotIn => "$notIn",
            Operator::Like => "$like",
            Operator::NotLike => "$notLike",
            Operator::StartsWith => "$startsWith",
            Operator::EndsWith => "$endsWith",
            Operator::Substring => "$substring",
            Operator::Regexp => "$regexp",
            Operator::NotRegexp => "$notRegexp",
            Operator::Col => "$col",
        }
    }

    /// Display name used when a predicate is rendered for logs or responses.
    ///
    /// `NotLike` shares the name `like` with `Like`. Existing rendered
    /// output depends on that, so the collision is kept here and resolved
    /// in [`Operator::from_human_name`].
    pub const fn human_name(self) -> &'static str {
        match self {
            Operator::Not => "not",
            Operator::Is => "is",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Eq => "equal",
            Operator::Ne => "notEqual",
            Operator::Gt => "greaterThan",
            Operator::Gte => "greaterThanOrEqual",
            Operator::Lt => "lessThan",
            Operator::Lte => "lessThanOrEqual",
            Operator::Between => "between",
            Operator::NotBetween => "notBetween",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Like => "like",
            Operator::NotLike => "like",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Substring => "substring",
            Operator::Regexp => "regexp",
            Operator::NotRegexp => "notRegexp",
            Operator::Col => "col",
        }
    }

    /// Reverse of [`Operator::human_name`]. `"like"` always yields `Like`;
    /// `NotLike` has no recoverable human name.
    pub fn from_human_name(name: &str) -> Option<Operator> {
        BY_HUMAN_NAME.get(name).copied()
    }

    pub fn from_token(token: &str) -> Option<Operator> {
        BY_TOKEN.get(token).copied()
    }

    /// Whether `from_human_name(human_name())` gives the operator back.
    pub fn is_bijective(self) -> bool {
        Operator::from_human_name(self.human_name()) == Some(self)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
