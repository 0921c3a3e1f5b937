//! Translation between operator-keyed predicates and their human-readable
//! form.
//!
//! Neither direction can fail. Operator tokens the vocabulary does not know
//! render as `<unknownN>`, `N` being the key's position in traversal order,
//! and human keys that name no operator come back as field keys.

use crate::query::{HumanPredicate, Key, Node, Operator, Predicate};

/// Renders a predicate with human operator names. `None` passes through.
pub fn to_human(tree: Option<&Predicate>) -> Option<HumanPredicate> {
    tree.map(Predicate::to_human)
}

/// Parses human operator names back into operator keys. `None` passes
/// through.
pub fn from_human(tree: Option<&HumanPredicate>) -> Option<Predicate> {
    tree.map(HumanPredicate::from_human)
}

impl Predicate {
    pub fn to_human(&self) -> HumanPredicate {
        self.iter()
            .enumerate()
            .map(|(index, (key, node))| {
                let label = match key {
                    Key::Field(name) => name.clone(),
                    Key::Op(op) => op.human_name().to_string(),
                    Key::Custom(_) => format!("<unknown{}>", index),
                };
                (label, humanize_node(node))
            })
            .collect()
    }
}

impl HumanPredicate {
    pub fn from_human(&self) -> Predicate {
        self.iter()
            .map(|(label, node)| {
                let key = match Operator::from_human_name(label) {
                    Some(op) => Key::Op(op),
                    None => Key::Field(label.clone()),
                };
                (key, dehumanize_node(node))
            })
            .collect()
    }
}

fn humanize_node(node: &Node<Key>) -> Node<String> {
    match node {
        Node::Value(v) => Node::Value(v.clone()),
        Node::Tree(tree) => Node::Tree(tree.to_human()),
        Node::List(items) => Node::List(items.iter().map(humanize_node).collect()),
    }
}

fn dehumanize_node(node: &Node<String>) -> Node<Key> {
    match node {
        Node::Value(v) => Node::Value(v.clone()),
        Node::Tree(tree) => Node::Tree(tree.from_human()),
        Node::List(items) => Node::List(items.iter().map(dehumanize_node).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{OPERATORS, Value};

    fn sample() -> Predicate {
        Predicate::new()
            .field("status", "active")
            .field(
                "age",
                Predicate::new()
                    .op(Operator::Gte, 18)
                    .op(Operator::Lt, 65),
            )
            .op(
                Operator::Or,
                vec![
                    Node::from(Predicate::new().field("name", Predicate::new().op(Operator::Like, "a%"))),
                    Node::from(Predicate::new().field("deleted_at", Value::Null)),
                ],
            )
    }

    #[test]
    fn test_to_human_renders_operator_names() {
        let human = sample().to_human();

        assert_eq!(
            human.to_json(),
            serde_json::json!({
                "status": "active",
                "age": { "greaterThanOrEqual": 18, "lessThan": 65 },
                "or": [
                    { "name": { "like": "a%" } },
                    { "deleted_at": null }
                ]
            })
        );
    }

    #[test]
    fn test_round_trips_are_identity() {
        let tree = sample();
        assert_eq!(tree.to_human().from_human(), tree);

        let human = tree.to_human();
        assert_eq!(human.from_human().to_human(), human);
    }

    #[test]
    fn test_every_bijective_operator_round_trips() {
        for op in OPERATORS.into_iter().filter(|op| op.is_bijective()) {
            let tree = Predicate::new().field("f", Predicate::new().op(op, 1));
            assert_eq!(tree.to_human().from_human(), tree, "{}", op);
        }
    }

    #[test]
    fn test_not_like_comes_back_as_like() {
        let tree = Predicate::new().field("name", Predicate::new().op(Operator::NotLike, "%x"));
        let back = tree.to_human().from_human();

        assert_eq!(
            back,
            Predicate::new().field("name", Predicate::new().op(Operator::Like, "%x"))
        );
    }

    #[test]
    fn test_unknown_token_gets_positional_placeholder() {
        let tree = Predicate::new()
            .custom("$overlap", vec![Value::from(1), Value::from(2)])
            .field("a", 1)
            .op(Operator::And, vec![Node::from(Predicate::new().custom("$contains", 3))])
            .field("b", 2);

        let human = tree.to_human();
        let keys: Vec<_> = human.keys().cloned().collect();

        // fields a, b occupy 0 and 1; the custom token is the first operator
        assert_eq!(keys, vec!["a", "b", "<unknown2>", "and"]);
        assert_eq!(
            human.to_json()["and"],
            serde_json::json!([{ "<unknown0>": 3 }])
        );
    }

    #[test]
    fn test_empty_and_absent() {
        assert!(Predicate::new().to_human().is_empty());
        assert!(HumanPredicate::new().from_human().is_empty());
        assert_eq!(to_human(None), None);
        assert_eq!(from_human(None), None);
    }

    #[test]
    fn test_unknown_human_names_become_fields() {
        let human = HumanPredicate::from_json(&serde_json::json!({
            "roughly": 3,
            "equal": 4
        }))
        .unwrap();
        let tree = human.from_human();

        assert_eq!(tree.get_field("roughly"), Some(&Node::from(3)));
        assert_eq!(tree.get(&Key::Op(Operator::Eq)), Some(&Node::from(4)));
    }
}
