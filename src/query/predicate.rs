use std::fmt::Display;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{
    error::Error,
    query::{operator::Operator, value::Value},
};

/// Key of a predicate tree entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Column or attribute name.
    Field(String),
    /// Operator from the built-in vocabulary.
    Op(Operator),
    /// Operator token the vocabulary does not know, e.g. a dialect extension.
    Custom(String),
}

impl Key {
    pub fn field(name: impl Into<String>) -> Self {
        Key::Field(name.into())
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            Key::Field(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_op(&self) -> Option<Operator> {
        match self {
            Key::Op(op) => Some(*op),
            _ => None,
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Behaviour a tree key needs for ordering and rendering.
pub trait TreeKey: Clone + PartialEq {
    /// Operator keys are traversed after every plain key.
    fn is_operator(&self) -> bool;

    fn label(&self) -> &str;
}

impl TreeKey for Key {
    fn is_operator(&self) -> bool {
        !matches!(self, Key::Field(_))
    }

    fn label(&self) -> &str {
        match self {
            Key::Field(name) => name,
            Key::Op(op) => op.token(),
            Key::Custom(token) => token,
        }
    }
}

impl TreeKey for String {
    fn is_operator(&self) -> bool {
        false
    }

    fn label(&self) -> &str {
        self
    }
}

/// Ordered mapping from keys to nodes.
///
/// Entries are stored in traversal order: plain keys first, then operator
/// keys, each group keeping insertion order. Equality is therefore
/// sensitive to the relative order within each group only.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<K> {
    entries: Vec<(K, Node<K>)>,
}

/// Value position of a tree entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<K> {
    Value(Value),
    Tree(Tree<K>),
    List(Vec<Node<K>>),
}

/// Predicate keyed by field names and operator tokens, as sent to a model.
pub type Predicate = Tree<Key>;

/// Predicate keyed by plain strings, as rendered for people.
pub type HumanPredicate = Tree<String>;

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: TreeKey> Tree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing the node of an equal key in place.
    pub fn insert(&mut self, key: K, node: impl Into<Node<K>>) {
        let node = node.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = node;
            return;
        }

        if key.is_operator() {
            self.entries.push((key, node));
        } else {
            let at = self
                .entries
                .iter()
                .position(|(k, _)| k.is_operator())
                .unwrap_or(self.entries.len());
            self.entries.insert(at, (key, node));
        }
    }

    pub fn with(mut self, key: K, node: impl Into<Node<K>>) -> Self {
        self.insert(key, node);
        self
    }

    pub fn get(&self, key: &K) -> Option<&Node<K>> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Node<K>)> {
        self.entries.iter().map(|(k, n)| (k, n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl<K: TreeKey> FromIterator<(K, Node<K>)> for Tree<K> {
    fn from_iter<I: IntoIterator<Item = (K, Node<K>)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        for (key, node) in iter {
            tree.insert(key, node);
        }
        tree
    }
}

impl<K: TreeKey> IntoIterator for Tree<K> {
    type Item = (K, Node<K>);
    type IntoIter = std::vec::IntoIter<(K, Node<K>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Predicate {
    pub fn field(self, name: impl Into<String>, node: impl Into<Node<Key>>) -> Self {
        self.with(Key::Field(name.into()), node)
    }

    pub fn op(self, op: Operator, node: impl Into<Node<Key>>) -> Self {
        self.with(Key::Op(op), node)
    }

    pub fn custom(self, token: impl Into<String>, node: impl Into<Node<Key>>) -> Self {
        self.with(Key::Custom(token.into()), node)
    }

    pub fn get_field(&self, name: &str) -> Option<&Node<Key>> {
        self.iter()
            .find(|(k, _)| k.as_field() == Some(name))
            .map(|(_, n)| n)
    }
}

impl HumanPredicate {
    /// Builds a human predicate from a JSON object. Objects become nested
    /// trees, arrays become lists and everything else a scalar.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, Error> {
        match json {
            serde_json::Value::Object(map) => Ok(map
                .iter()
                .map(|(k, v)| (k.clone(), Node::from_json(v)))
                .collect()),
            other => Err(Error::InvalidPredicate(format!(
                "expected a JSON object, found {}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(k, n)| (k.clone(), n.to_json()))
                .collect(),
        )
    }
}

impl Node<String> {
    fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(_) => match HumanPredicate::from_json(json) {
                Ok(tree) => Node::Tree(tree),
                Err(_) => Node::Value(Value::from(json)),
            },
            serde_json::Value::Array(items) => {
                Node::List(items.iter().map(Node::from_json).collect())
            }
            scalar => Node::Value(Value::from(scalar)),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Value(v) => serde_json::to_value(v).unwrap_or(serde_json::Value::Null),
            Node::Tree(tree) => tree.to_json(),
            Node::List(items) => {
                serde_json::Value::Array(items.iter().map(Node::to_json).collect())
            }
        }
    }
}

impl<K> Node<K> {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree<K>> {
        match self {
            Node::Tree(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node<K>]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }
}

impl<K> From<Value> for Node<K> {
    fn from(v: Value) -> Self {
        Node::Value(v)
    }
}

impl<K> From<Tree<K>> for Node<K> {
    fn from(t: Tree<K>) -> Self {
        Node::Tree(t)
    }
}

impl<K> From<Vec<Node<K>>> for Node<K> {
    fn from(items: Vec<Node<K>>) -> Self {
        Node::List(items)
    }
}

impl<K> From<Vec<Value>> for Node<K> {
    fn from(items: Vec<Value>) -> Self {
        Node::List(items.into_iter().map(Node::Value).collect())
    }
}

macro_rules! impl_node_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<K> From<$ty> for Node<K> {
                fn from(v: $ty) -> Self {
                    Node::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_node_from_scalar!(bool, i64, i32, u32, f64, &str, String);

impl<K: TreeKey> Serialize for Tree<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self.iter() {
            map.serialize_entry(key.label(), node)?;
        }
        map.end()
    }
}

impl<K: TreeKey> Serialize for Node<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Value(v) => v.serialize(serializer),
            Node::Tree(t) => t.serialize(serializer),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_kept_ahead_of_operators() {
        let tree = Predicate::new()
            .op(Operator::Or, vec![Node::from(1)])
            .field("name", "ada")
            .custom("$overlap", 2)
            .field("age", 3);

        let labels: Vec<_> = tree.keys().map(|k| k.label().to_string()).collect();
        assert_eq!(labels, vec!["name", "age", "$or", "$overlap"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut tree = Predicate::new().field("a", 1).field("b", 2);
        tree.insert(Key::field("a"), 10);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get_field("a"), Some(&Node::from(10)));
        assert_eq!(tree.keys().next(), Some(&Key::field("a")));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = HumanPredicate::from_json(&serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::json!({
            "age": { "greaterThan": 18 },
            "or": [{ "name": "ada" }, { "name": null }]
        });
        let tree = HumanPredicate::from_json(&json).unwrap();

        assert_eq!(tree.to_json(), json);
        assert_eq!(serde_json::to_value(&tree).unwrap(), json);
    }

    #[test]
    fn test_from_json_keeps_document_order() {
        let json: serde_json::Value = serde_json::from_str(r#"{"zeta":1,"alpha":2}"#).unwrap();
        let tree = HumanPredicate::from_json(&json).unwrap();

        let keys: Vec<_> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_to_json_matches_serialize_order() {
        let tree = Predicate::new()
            .op(Operator::And, vec![Node::from(Predicate::new().field("a", 1))])
            .field("zeta", 1)
            .field("beta", 2)
            .to_human();

        let expected = r#"{"zeta":1,"beta":2,"and":[{"a":1}]}"#;
        assert_eq!(tree.to_json().to_string(), expected);
        assert_eq!(serde_json::to_string(&tree).unwrap(), expected);
    }

    #[test]
    fn test_predicate_serializes_tokens() {
        let tree = Predicate::new().field("age", Predicate::new().op(Operator::Gte, 21));
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            serde_json::json!({ "age": { "$gte": 21 } })
        );
    }
}
