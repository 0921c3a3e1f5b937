#[cfg(feature = "memory")]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::Error, query::FindOptions};

/// -----------------------------
/// Model contract
/// -----------------------------

/// Row source a paginator is bound to.
///
/// Both operations receive the same query specification shape. `count`
/// only honours `where_`, `include` and `extra`.
#[async_trait]
pub trait Model: Send + Sync {
    type Row: Send;

    async fn count(&self, options: &FindOptions) -> Result<u64, Error>;

    async fn find_all(&self, options: &FindOptions) -> Result<Vec<Self::Row>, Error>;
}

#[async_trait]
impl<M: Model + ?Sized> Model for Arc<M> {
    type Row = M::Row;

    async fn count(&self, options: &FindOptions) -> Result<u64, Error> {
        (**self).count(options).await
    }

    async fn find_all(&self, options: &FindOptions) -> Result<Vec<Self::Row>, Error> {
        (**self).find_all(options).await
    }
}
