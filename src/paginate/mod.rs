pub mod options;
pub mod page;

use std::ops::Deref;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, trace, warn};

pub use options::{
    DEFAULT_METHOD_NAME, DEFAULT_PAGE_SIZE, DEFAULT_PRIMARY_KEY, PaginateOptions,
    PaginatorConfig, PaginatorOptions, QueryDefaults,
};
pub use page::{Page, page_count};

use crate::{
    adapters::Model,
    error::Error,
    humanize::to_human,
    query::{Direction, FindOptions, OrderBy},
};

/// Configured pagination defaults, ready to be bound to models.
///
/// ```rust,ignore
/// let users = Paginator::configure(PaginatorOptions::new().page_size(20))
///     .bind(users);
///
/// let page = users.paginate(PaginateOptions::new().page_index(2)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Paginator {
    config: Arc<PaginatorConfig>,
}

impl Paginator {
    pub fn configure(options: PaginatorOptions) -> Self {
        Self {
            config: Arc::new(options.into()),
        }
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Wraps `model`, adding the pagination operation. The model itself is
    /// left untouched and stays reachable through the wrapper.
    pub fn bind<M: Model>(&self, model: M) -> Paginated<M> {
        Paginated {
            model,
            config: self.config.clone(),
        }
    }
}

/// A model augmented with [`Paginated::paginate`].
#[derive(Debug, Clone)]
pub struct Paginated<M> {
    model: M,
    config: Arc<PaginatorConfig>,
}

impl<M> Deref for Paginated<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<M> Paginated<M> {
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_inner(self) -> M {
        self.model
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Name the operation was configured under; labels logs and metrics.
    pub fn method_name(&self) -> &str {
        &self.config.method_name
    }
}

impl<M: Model> Paginated<M> {
    /// Fetches one page and the total count of matching rows.
    ///
    /// Count and fetch run one after the other; the fetch is issued even
    /// when nothing matches. Model errors are returned as they are.
    pub async fn paginate(&self, call: PaginateOptions) -> Result<Page<M::Row>, Error> {
        let start = Instant::now();
        let method = self.config.method_name.as_str();
        let params = options::resolve(&self.config, call);

        let zero_base_page_index = if self.config.one_base_index {
            params.page_index.saturating_sub(1)
        } else {
            params.page_index
        };

        if zero_base_page_index < 0 {
            warn!(
                method,
                page_index = params.page_index,
                zero_base_page_index,
                "rejected negative page index"
            );
            counter!("selis.paginate.rejected", "method" => method.to_string(), "reason" => "page_index")
                .increment(1);
            return Err(Error::InvalidPageIndex {
                page_index: params.page_index,
                zero_base_page_index,
            });
        }

        if params.page_size == 0 {
            counter!("selis.paginate.rejected", "method" => method.to_string(), "reason" => "page_size")
                .increment(1);
            return Err(Error::InvalidPageSize);
        }

        let order = tie_break_order(
            params.order,
            &self.config.primary_key_field,
            params.primary_desc,
        );
        let offset = (zero_base_page_index as u64).saturating_mul(params.page_size);

        debug!(
            method,
            page_index = params.page_index,
            zero_base_page_index,
            offset,
            limit = params.page_size,
            "paginating"
        );

        let count_options = FindOptions {
            where_: params.where_.clone(),
            include: params.include.clone(),
            extra: params.extra.clone(),
            ..FindOptions::default()
        };
        let count = self.model.count(&count_options).await?;

        let find_options = FindOptions {
            where_: params.where_,
            include: params.include,
            attributes: params.attributes,
            order,
            offset: Some(offset),
            limit: Some(params.page_size),
            extra: params.extra,
        };
        trace!(method, ?find_options, "fetching page");
        let entities = self.model.find_all(&find_options).await?;

        histogram!("selis.paginate.duration_ms", "method" => method.to_string())
            .record(start.elapsed().as_millis() as f64);

        Ok(Page {
            entities,
            page_index: params.page_index,
            count,
            page_size: params.page_size,
            page_count: page_count(count, params.page_size),
            where_: to_human(find_options.where_.as_ref()),
            order: find_options.order,
            attributes: find_options.attributes,
            include: find_options.include,
        })
    }
}

/// Appends `primary_key` to `order` unless an entry for it exists, so rows
/// with equal sort keys keep the same relative position on every page.
pub fn tie_break_order(mut order: Vec<OrderBy>, primary_key: &str, desc: bool) -> Vec<OrderBy> {
    if !order.iter().any(|o| o.field() == primary_key) {
        order.push(OrderBy(primary_key.to_string(), Direction::from_desc(desc)));
    }
    order
}

/// Binds a paginator to any model in one step.
pub trait PaginateExt: Model + Sized {
    fn paginated(self, options: PaginatorOptions) -> Paginated<Self> {
        Paginator::configure(options).bind(self)
    }
}

impl<M: Model> PaginateExt for M {}
