// src/adapters/memory/mod.rs
mod eval;

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    adapters::Model,
    error::Error,
    query::{Attributes, Direction, FindOptions, OrderBy, Value},
};

static NULL: Value = Value::Null;

/// Flat row of the in-memory model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// Value of `field`; missing fields read as null.
    pub fn get(&self, field: &str) -> &Value {
        self.0.get(field).unwrap_or(&NULL)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn project(&self, attributes: &Attributes) -> Record {
        Record(
            self.0
                .iter()
                .filter(|(field, _)| attributes.keeps(field))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Model over records held in process.
///
/// Evaluates the operator vocabulary directly; `include` is ignored since
/// records carry no relations. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    records: Arc<RwLock<Vec<Record>>>,
}

impl MemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn insert(&self, record: Record) -> Result<(), Error> {
        self.records
            .write()
            .map_err(|_| Error::Storage("memory store poisoned".to_string()))?
            .push(record);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.read()?.len())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Record>>, Error> {
        self.records
            .read()
            .map_err(|_| Error::Storage("memory store poisoned".to_string()))
    }

    fn filtered(&self, options: &FindOptions) -> Result<Vec<Record>, Error> {
        let records = self.read()?;
        let mut out = Vec::new();
        for record in records.iter() {
            let keep = match &options.where_ {
                Some(predicate) => eval::matches(record, predicate)?,
                None => true,
            };
            if keep {
                out.push(record.clone());
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Model for MemoryModel {
    type Row = Record;

    async fn count(&self, options: &FindOptions) -> Result<u64, Error> {
        Ok(self.filtered(options)?.len() as u64)
    }

    async fn find_all(&self, options: &FindOptions) -> Result<Vec<Record>, Error> {
        let mut rows = self.filtered(options)?;
        rows.sort_by(|a, b| compare_rows(a, b, &options.order));

        let offset = options.offset.unwrap_or(0) as usize;
        let limit = options.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| match &options.attributes {
                Some(attributes) => row.project(attributes),
                None => row,
            })
            .collect())
    }
}

/// Nulls sort first ascending; mixed kinds follow [`Value::total_cmp`].
fn compare_rows(a: &Record, b: &Record, order: &[OrderBy]) -> Ordering {
    for entry in order {
        let ord = a.get(entry.field()).total_cmp(b.get(entry.field()));
        let ord = match entry.direction() {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
