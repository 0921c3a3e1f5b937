use serde::Serialize;

use crate::query::{Attributes, HumanPredicate, Include, OrderBy};

/// Result of one `paginate` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub entities: Vec<T>,
    /// Echoed in the caller's index base.
    pub page_index: i64,
    /// Rows matching the predicate, ignoring pagination.
    pub count: u64,
    pub page_size: u64,
    pub page_count: u64,
    /// Predicate with human operator names, for display only.
    #[serde(rename = "where")]
    pub where_: Option<HumanPredicate>,
    /// Order the rows were fetched with, tie-break included.
    pub order: Vec<OrderBy>,
    pub attributes: Option<Attributes>,
    pub include: Option<Vec<Include>>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            entities: self.entities.into_iter().map(f).collect(),
            page_index: self.page_index,
            count: self.count,
            page_size: self.page_size,
            page_count: self.page_count,
            where_: self.where_,
            order: self.order,
            attributes: self.attributes,
            include: self.include,
        }
    }
}

/// `ceil(count / page_size)`; zero rows give zero pages.
pub fn page_count(count: u64, page_size: u64) -> u64 {
    count.div_ceil(page_size)
}
