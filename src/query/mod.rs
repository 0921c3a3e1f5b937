pub mod operator;
pub mod predicate;
pub mod value;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use operator::{OPERATORS, Operator};
pub use predicate::{HumanPredicate, Key, Node, Predicate, Tree, TreeKey};
pub use value::Value;

/// Sort direction of an order entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl Direction {
    pub fn from_desc(desc: bool) -> Self {
        if desc { Direction::Desc } else { Direction::Asc }
    }
}

/// One `(field, direction)` pair, serialized as `["field", "ASC"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy(pub String, pub Direction);

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy(field.into(), Direction::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy(field.into(), Direction::Desc)
    }

    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn direction(&self) -> Direction {
        self.1
    }
}

/// Projection of the fetched rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attributes {
    Only(Vec<String>),
    Exclude(Vec<String>),
}

impl Attributes {
    pub fn keeps(&self, field: &str) -> bool {
        match self {
            Attributes::Only(fields) => fields.iter().any(|f| f == field),
            Attributes::Exclude(fields) => !fields.iter().any(|f| f == field),
        }
    }
}

/// Relation to join into the fetched rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Include {
    pub association: String,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_: Option<Predicate>,
    pub required: bool,
}

impl Include {
    pub fn new(association: impl Into<String>) -> Self {
        Self {
            association: association.into(),
            alias: None,
            where_: None,
            required: false,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.where_ = Some(predicate);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// -----------------------------
/// Find options (model contract)
/// -----------------------------

/// Query specification handed to a [`Model`](crate::adapters::Model).
///
/// `count` implementations are expected to ignore `order`, `attributes`,
/// `offset` and `limit`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub where_: Option<Predicate>,
    pub include: Option<Vec<Include>>,
    pub attributes: Option<Attributes>,
    pub order: Vec<OrderBy>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Adapter-specific options forwarded verbatim.
    pub extra: BTreeMap<String, Value>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.where_ = Some(predicate);
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}
