use std::collections::BTreeMap;

use crate::{
    error::Error,
    query::{Attributes, Include, OrderBy, Predicate, Value},
};

pub const DEFAULT_METHOD_NAME: &str = "paginate";
pub const DEFAULT_PRIMARY_KEY: &str = "id";
pub const DEFAULT_PAGE_SIZE: u64 = 1;

/// Pass-through keys owned by the paginator and never forwarded.
const RESERVED_EXTRA: [&str; 2] = ["offset", "limit"];

/// Query parameters that can be defaulted when configuring a paginator and
/// overridden on each call. `None` means "not set at this layer".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDefaults {
    pub page_size: Option<u64>,
    pub where_: Option<Predicate>,
    pub order: Option<Vec<OrderBy>>,
    pub attributes: Option<Attributes>,
    pub include: Option<Vec<Include>>,
}

impl QueryDefaults {
    fn builtin() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
            where_: None,
            order: Some(Vec::new()),
            attributes: None,
            include: None,
        }
    }

    /// Fills every unset parameter from `fallback`.
    fn or(self, fallback: &QueryDefaults) -> QueryDefaults {
        QueryDefaults {
            page_size: self.page_size.or(fallback.page_size),
            where_: self.where_.or_else(|| fallback.where_.clone()),
            order: self.order.or_else(|| fallback.order.clone()),
            attributes: self.attributes.or_else(|| fallback.attributes.clone()),
            include: self.include.or_else(|| fallback.include.clone()),
        }
    }
}

/// Options accepted by [`Paginator::configure`](super::Paginator::configure).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginatorOptions {
    pub method_name: Option<String>,
    pub primary_key_field: Option<String>,
    pub one_base_index: Option<bool>,
    pub query: QueryDefaults,
}

impl PaginatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configure layer from `SELIS_METHOD_NAME`,
    /// `SELIS_PRIMARY_KEY`, `SELIS_ONE_BASE_INDEX` and `SELIS_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut options = Self::new();
        options.method_name = lookup("SELIS_METHOD_NAME");
        options.primary_key_field = lookup("SELIS_PRIMARY_KEY");

        if let Some(raw) = lookup("SELIS_ONE_BASE_INDEX") {
            options.one_base_index = Some(parse_flag("SELIS_ONE_BASE_INDEX", &raw)?);
        }

        if let Some(raw) = lookup("SELIS_PAGE_SIZE") {
            let size = raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("SELIS_PAGE_SIZE={:?}: {}", raw, e))
            })?;
            options.query.page_size = Some(size);
        }

        Ok(options)
    }

    pub fn method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = Some(name.into());
        self
    }

    pub fn primary_key_field(mut self, field: impl Into<String>) -> Self {
        self.primary_key_field = Some(field.into());
        self
    }

    pub fn one_base_index(mut self, one_base: bool) -> Self {
        self.one_base_index = Some(one_base);
        self
    }

    pub fn page_size(mut self, size: u64) -> Self {
        self.query.page_size = Some(size);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.query.where_ = Some(predicate);
        self
    }

    pub fn order(mut self, order: Vec<OrderBy>) -> Self {
        self.query.order = Some(order);
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.query.attributes = Some(attributes);
        self
    }

    pub fn include(mut self, include: Vec<Include>) -> Self {
        self.query.include = Some(include);
        self
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{}={:?}: expected a boolean", name, raw))),
    }
}

/// Options of a single `paginate` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginateOptions {
    pub primary_desc: Option<bool>,
    pub page_index: Option<i64>,
    pub query: QueryDefaults,
    /// Forwarded to both count and fetch, minus `offset` and `limit`.
    pub extra: BTreeMap<String, Value>,
}

impl PaginateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(page_index: i64, page_size: u64) -> Self {
        Self::new().page_index(page_index).page_size(page_size)
    }

    pub fn primary_desc(mut self, desc: bool) -> Self {
        self.primary_desc = Some(desc);
        self
    }

    pub fn page_index(mut self, index: i64) -> Self {
        self.page_index = Some(index);
        self
    }

    pub fn page_size(mut self, size: u64) -> Self {
        self.query.page_size = Some(size);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.query.where_ = Some(predicate);
        self
    }

    pub fn order(mut self, order: Vec<OrderBy>) -> Self {
        self.query.order = Some(order);
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.query.attributes = Some(attributes);
        self
    }

    pub fn include(mut self, include: Vec<Include>) -> Self {
        self.query.include = Some(include);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Configure-time settings with built-in defaults applied. Shared
/// read-only by every call of the bound paginator.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatorConfig {
    pub method_name: String,
    pub primary_key_field: String,
    pub one_base_index: bool,
    pub defaults: QueryDefaults,
}

impl From<PaginatorOptions> for PaginatorConfig {
    fn from(options: PaginatorOptions) -> Self {
        Self {
            method_name: options
                .method_name
                .unwrap_or_else(|| DEFAULT_METHOD_NAME.to_string()),
            primary_key_field: options
                .primary_key_field
                .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
            one_base_index: options.one_base_index.unwrap_or(false),
            defaults: options.query,
        }
    }
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        PaginatorOptions::default().into()
    }
}

/// Parameters of one call with every layer applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Resolved {
    pub page_size: u64,
    pub page_index: i64,
    pub primary_desc: bool,
    pub where_: Option<Predicate>,
    pub order: Vec<OrderBy>,
    pub attributes: Option<Attributes>,
    pub include: Option<Vec<Include>>,
    pub extra: BTreeMap<String, Value>,
}

/// Resolves call parameters. Precedence, highest first:
///
/// 1. values set on the call,
/// 2. defaults given to `configure`,
/// 3. built-in module defaults.
pub(crate) fn resolve(config: &PaginatorConfig, call: PaginateOptions) -> Resolved {
    let query = call
        .query
        .or(&config.defaults)
        .or(&QueryDefaults::builtin());

    let default_index = if config.one_base_index { 1 } else { 0 };

    let mut extra = call.extra;
    extra.retain(|key, _| !RESERVED_EXTRA.contains(&key.as_str()));

    Resolved {
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        page_index: call.page_index.unwrap_or(default_index),
        primary_desc: call.primary_desc.unwrap_or(false),
        where_: query.where_,
        order: query.order.unwrap_or_default(),
        attributes: query.attributes,
        include: query.include,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let resolved = resolve(&PaginatorConfig::default(), PaginateOptions::new());

        assert_eq!(resolved.page_size, 1);
        assert_eq!(resolved.page_index, 0);
        assert!(!resolved.primary_desc);
        assert!(resolved.order.is_empty());
        assert!(resolved.where_.is_none());
    }

    #[test]
    fn test_one_base_default_index() {
        let config: PaginatorConfig = PaginatorOptions::new().one_base_index(true).into();
        assert_eq!(resolve(&config, PaginateOptions::new()).page_index, 1);
    }

    #[test]
    fn test_call_overrides_configured_defaults() {
        let config: PaginatorConfig = PaginatorOptions::new()
            .page_size(20)
            .order(vec![OrderBy::desc("created_at")])
            .filter(Predicate::new().field("active", true))
            .into();

        let inherited = resolve(&config, PaginateOptions::new());
        assert_eq!(inherited.page_size, 20);
        assert_eq!(inherited.order, vec![OrderBy::desc("created_at")]);
        assert!(inherited.where_.is_some());

        let overridden = resolve(
            &config,
            PaginateOptions::new()
                .page_size(5)
                .order(vec![OrderBy::asc("name")]),
        );
        assert_eq!(overridden.page_size, 5);
        assert_eq!(overridden.order, vec![OrderBy::asc("name")]);
        assert_eq!(overridden.where_, config.defaults.where_);
    }

    #[test]
    fn test_offset_and_limit_are_not_passed_through() {
        let resolved = resolve(
            &PaginatorConfig::default(),
            PaginateOptions::new()
                .extra("offset", 99)
                .extra("limit", 1)
                .extra("paranoid", false),
        );

        assert_eq!(resolved.extra.len(), 1);
        assert_eq!(resolved.extra.get("paranoid"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_from_lookup() {
        let options = PaginatorOptions::from_lookup(|name| match name {
            "SELIS_PRIMARY_KEY" => Some("uuid".to_string()),
            "SELIS_ONE_BASE_INDEX" => Some("TRUE".to_string()),
            "SELIS_PAGE_SIZE" => Some("25".to_string()),
            _ => None,
        })
        .unwrap();

        let config = PaginatorConfig::from(options);
        assert_eq!(config.method_name, "paginate");
        assert_eq!(config.primary_key_field, "uuid");
        assert!(config.one_base_index);
        assert_eq!(config.defaults.page_size, Some(25));
    }

    #[test]
    fn test_from_lookup_rejects_malformed_values() {
        let err = PaginatorOptions::from_lookup(|name| {
            (name == "SELIS_PAGE_SIZE").then(|| "ten".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = PaginatorOptions::from_lookup(|name| {
            (name == "SELIS_ONE_BASE_INDEX").then(|| "maybe".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
