use std::cmp::Ordering;

use regex::Regex;

use crate::{
    adapters::memory::Record,
    error::Error,
    query::{Key, Node, Operator, Predicate, Value},
};

/// Whether `record` satisfies every entry of `predicate`.
pub(crate) fn matches(record: &Record, predicate: &Predicate) -> Result<bool, Error> {
    for (key, node) in predicate.iter() {
        let holds = match key {
            Key::Field(name) => field_matches(record, record.get(name), node)?,
            Key::Op(Operator::And) => all(record, node)?,
            Key::Op(Operator::Or) => any(record, node)?,
            Key::Op(Operator::Not) => !all(record, node)?,
            Key::Op(op) => {
                return Err(Error::InvalidPredicate(format!(
                    "{} must be applied to a field",
                    op
                )));
            }
            Key::Custom(token) => return Err(Error::UnsupportedOperator(token.clone())),
        };

        if !holds {
            return Ok(false);
        }
    }
    Ok(true)
}

fn all(record: &Record, node: &Node<Key>) -> Result<bool, Error> {
    match node {
        Node::Tree(tree) => matches(record, tree),
        Node::List(items) => {
            for item in items {
                if !all(record, item)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Node::Value(v) => Err(Error::InvalidPredicate(format!(
            "expected a predicate, found {:?}",
            v
        ))),
    }
}

fn any(record: &Record, node: &Node<Key>) -> Result<bool, Error> {
    match node {
        Node::Tree(tree) => {
            for (key, child) in tree.iter() {
                let single = Predicate::new().with(key.clone(), child.clone());
                if matches(record, &single)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Node::List(items) => {
            for item in items {
                if all(record, item)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Node::Value(v) => Err(Error::InvalidPredicate(format!(
            "expected a predicate, found {:?}",
            v
        ))),
    }
}

/// Condition attached to one field: a scalar means equality, a list means
/// membership and a tree holds operator entries.
fn field_matches(record: &Record, value: &Value, node: &Node<Key>) -> Result<bool, Error> {
    match node {
        Node::Value(expected) => Ok(equals(value, expected)),
        Node::List(items) => in_list(record, value, items),
        Node::Tree(tree) => {
            for (key, operand) in tree.iter() {
                let holds = match key {
                    Key::Op(op) => apply(record, value, *op, operand)?,
                    Key::Field(name) => {
                        return Err(Error::InvalidPredicate(format!(
                            "nested field {} is not supported",
                            name
                        )));
                    }
                    Key::Custom(token) => return Err(Error::UnsupportedOperator(token.clone())),
                };
                if !holds {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

fn apply(record: &Record, value: &Value, op: Operator, operand: &Node<Key>) -> Result<bool, Error> {
    match op {
        Operator::And => match operand {
            Node::List(items) => {
                for item in items {
                    if !field_matches(record, value, item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            other => field_matches(record, value, other),
        },
        Operator::Or => match operand {
            Node::List(items) => {
                for item in items {
                    if field_matches(record, value, item)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Node::Tree(tree) => {
                for (key, child) in tree.iter() {
                    let single = Predicate::new().with(key.clone(), child.clone());
                    if field_matches(record, value, &Node::Tree(single))? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Node::Value(_) => field_matches(record, value, operand),
        },
        Operator::Not => match operand {
            Node::Tree(tree) if !is_col(tree) => Ok(!field_matches(record, value, operand)?),
            _ => Ok(!equals(value, &resolve(record, operand)?)),
        },
        Operator::Col => {
            let column = Node::Tree(Predicate::new().op(Operator::Col, operand.clone()));
            Ok(equals(value, &resolve(record, &column)?))
        }
        Operator::Is => match resolve(record, operand)? {
            Value::Null => Ok(value.is_null()),
            Value::Bool(b) => Ok(value.as_bool() == Some(b)),
            other => Err(Error::InvalidPredicate(format!(
                "is expects null or a boolean, found {:?}",
                other
            ))),
        },
        Operator::Eq => Ok(equals(value, &resolve(record, operand)?)),
        Operator::Ne => Ok(!value.is_null() && !equals(value, &resolve(record, operand)?)),
        Operator::Gt => ordered(value, &resolve(record, operand)?, |o| o == Ordering::Greater),
        Operator::Gte => ordered(value, &resolve(record, operand)?, |o| o != Ordering::Less),
        Operator::Lt => ordered(value, &resolve(record, operand)?, |o| o == Ordering::Less),
        Operator::Lte => ordered(value, &resolve(record, operand)?, |o| o != Ordering::Greater),
        Operator::Between => between(record, value, operand),
        Operator::NotBetween => Ok(!value.is_null() && !between(record, value, operand)?),
        Operator::In => match operand {
            Node::List(items) => in_list(record, value, items),
            _ => Err(Error::InvalidPredicate("in expects a list".to_string())),
        },
        Operator::NotIn => match operand {
            Node::List(items) => Ok(!value.is_null() && !in_list(record, value, items)?),
            _ => Err(Error::InvalidPredicate("notIn expects a list".to_string())),
        },
        Operator::Like => text(value, &resolve(record, operand)?, |s, p| Ok(like(p)?.is_match(s))),
        Operator::NotLike => {
            text(value, &resolve(record, operand)?, |s, p| Ok(!like(p)?.is_match(s)))
        }
        Operator::StartsWith => text(value, &resolve(record, operand)?, |s, p| Ok(s.starts_with(p))),
        Operator::EndsWith => text(value, &resolve(record, operand)?, |s, p| Ok(s.ends_with(p))),
        Operator::Substring => text(value, &resolve(record, operand)?, |s, p| Ok(s.contains(p))),
        Operator::Regexp => text(value, &resolve(record, operand)?, |s, p| Ok(regex(p)?.is_match(s))),
        Operator::NotRegexp => {
            text(value, &resolve(record, operand)?, |s, p| Ok(!regex(p)?.is_match(s)))
        }
    }
}

fn is_col(tree: &Predicate) -> bool {
    tree.len() == 1 && tree.get(&Key::Op(Operator::Col)).is_some()
}

/// Scalar operand, with `{ col: "name" }` standing for another column.
fn resolve(record: &Record, operand: &Node<Key>) -> Result<Value, Error> {
    match operand {
        Node::Value(v) => Ok(v.clone()),
        Node::Tree(tree) if is_col(tree) => match tree.get(&Key::Op(Operator::Col)) {
            Some(Node::Value(Value::String(column))) => Ok(record.get(column).clone()),
            _ => Err(Error::InvalidPredicate("col expects a column name".to_string())),
        },
        other => Err(Error::InvalidPredicate(format!(
            "expected a scalar operand, found {:?}",
            other
        ))),
    }
}

/// SQL-style equality; comparing with null means `IS NULL`.
fn equals(value: &Value, expected: &Value) -> bool {
    if expected.is_null() {
        value.is_null()
    } else {
        value.loosely_eq(expected)
    }
}

fn ordered(value: &Value, operand: &Value, accept: impl Fn(Ordering) -> bool) -> Result<bool, Error> {
    Ok(value.compare(operand).filter(|_| !value.is_null()).is_some_and(accept))
}

fn in_list(record: &Record, value: &Value, items: &[Node<Key>]) -> Result<bool, Error> {
    for item in items {
        if equals(value, &resolve(record, item)?) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn between(record: &Record, value: &Value, operand: &Node<Key>) -> Result<bool, Error> {
    let bounds = match operand {
        Node::List(items) if items.len() == 2 => {
            (resolve(record, &items[0])?, resolve(record, &items[1])?)
        }
        _ => {
            return Err(Error::InvalidPredicate(
                "between expects a list of two bounds".to_string(),
            ));
        }
    };

    let above = ordered(value, &bounds.0, |o| o != Ordering::Less)?;
    let below = ordered(value, &bounds.1, |o| o != Ordering::Greater)?;
    Ok(above && below)
}

fn text(
    value: &Value,
    operand: &Value,
    test: impl Fn(&str, &str) -> Result<bool, Error>,
) -> Result<bool, Error> {
    match (value.as_string(), operand.as_string()) {
        (Some(s), Some(pattern)) => test(s, pattern),
        (_, None) if !operand.is_null() => Err(Error::InvalidPredicate(format!(
            "expected a text pattern, found {:?}",
            operand
        ))),
        _ => Ok(false),
    }
}

/// Translates a SQL `LIKE` pattern (`%`, `_`, `\` escapes) to an anchored
/// regular expression.
fn like(pattern: &str) -> Result<Regex, Error> {
    let mut expr = String::with_capacity(pattern.len() + 2);
    expr.push('^');
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => expr.push_str("(?s:.*)"),
            '_' => expr.push_str("(?s:.)"),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    expr.push_str(&regex::escape(&escaped.to_string()));
                }
            }
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    regex(&expr)
}

fn regex(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::InvalidPredicate(e.to_string()))
}
