//! # Selis
//!
//! *σελίς: the column of text on a papyrus scroll, one page of many.*
//!
//! Selis adds offset pagination to any model that can count and fetch rows,
//! and renders filter predicates with human-readable operator names.
//!
//! ## Pagination
//!
//! A [`Paginator`] is configured once with defaults and bound to a model.
//! Every call resolves its parameters against those defaults, appends the
//! primary key to the order when it is missing (so pages never overlap or
//! skip rows when the caller's sort key is not unique), counts the matching
//! rows and fetches one page.
//!
//! ```rust,ignore
//! use selis::{PaginateOptions, Paginator, PaginatorOptions, query::OrderBy};
//!
//! let users = Paginator::configure(
//!     PaginatorOptions::new().page_size(20).one_base_index(true),
//! )
//! .bind(users_model);
//!
//! let page = users
//!     .paginate(PaginateOptions::new().page_index(3).order(vec![OrderBy::asc("name")]))
//!     .await?;
//!
//! println!("{} of {} rows", page.entities.len(), page.count);
//! ```
//!
//! ## Human predicates
//!
//! Predicates use operator keys that cannot collide with field names.
//! [`to_human`] swaps them for readable names, for logs and API responses;
//! [`from_human`] goes the other way.
//!
//! ```rust,ignore
//! let tree = Predicate::new().field("age", Predicate::new().op(Operator::Gte, 18));
//! assert_eq!(tree.to_human().to_json(), json!({ "age": { "greaterThanOrEqual": 18 } }));
//! ```
//!
//! ## Feature flags
//!
//! | Flag     | Default | Description                                 |
//! |----------|---------|---------------------------------------------|
//! | `memory` | ✓       | In-process model evaluating predicate trees |
//!

pub mod adapters;
pub mod error;
pub mod humanize;
pub mod paginate;
pub mod query;

pub use crate::adapters::Model;
pub use crate::error::Error;
pub use crate::humanize::{from_human, to_human};
pub use crate::paginate::{
    Page, PaginateExt, PaginateOptions, Paginated, Paginator, PaginatorConfig, PaginatorOptions,
};
pub use crate::query::{FindOptions, HumanPredicate, Operator, Predicate};

#[cfg(feature = "memory")]
pub use crate::adapters::memory::{MemoryModel, Record};
