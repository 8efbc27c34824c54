//! URI-template routing — compile templates, detect conflicts, match paths.
//!
//! This module provides [`Router`], which maps request paths to registered resources
//! using templates with typed parameters:
//!
//! | Template                               | Example match                 | Captured params                |
//! |----------------------------------------|-------------------------------|--------------------------------|
//! | `/users`                               | `/users`, `/USERS`            | *(none)*                       |
//! | `/users/{id:int}`                      | `/users/42`                   | `id → 42`                      |
//! | `/geo/{lat:float}/{lon:float}`         | `/geo/1.5/-2.25`              | `lat → 1.5`, `lon → -2.25`     |
//! | `/files/{rest:path}`                   | `/files/docs/readme.txt`      | `rest → "docs/readme.txt"`     |
//! | `/items/{uid:uuid}`                    | `/items/0b5f06ab-…`           | `uid → "0b5f06ab-…"`           |
//! | `/report.{ext:regex:xml\|json}`        | `/report.json`                | `ext → "json"`                 |
//!
//! Registration validates eagerly: malformed templates, unknown parameter types, a
//! second greedy parameter or a template whose identity is already taken all fail the
//! [`Router::route`] call. Matching never fails; an unmatched path is `None`.
//!
//! Compiled route records are written through to a [`Cache`] as they are registered
//! and the whole index is written back by [`Router::flush`], so the next process can
//! reload routes instead of recompiling every template. Resources that cannot be
//! persisted ([`Resource::Live`]) are kept in memory and take precedence over the
//! persisted record.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{Cache, CacheError};
use crate::config::{ConfigError, RouterConfig};

pub mod callback;
pub mod error;
pub mod identity;
pub mod index;
pub mod matcher;
pub mod params;
pub mod resource;
pub mod template;
pub mod types;

pub use callback::CallbackRegistry;
pub use error::RouteError;
pub use identity::IdentityTable;
pub use index::{CompiledRoute, IndexedRoute, RouteId, RouteIndex};
pub use matcher::MatchResult;
pub use params::{ParamValue, Params};
pub use resource::Resource;
pub use types::ParamType;

/// URI-template router backed by a persistent route index.
///
/// Routes are registered during bootstrap with [`route`](Self::route) and resolved
/// with [`match_path`](Self::match_path). A path equal to a registered literal
/// template is found by id in O(1); anything else is tested against each route's
/// pattern in registration order and the first match wins.
///
/// Call [`flush`](Self::flush) or [`close`](Self::close) when the router's owner
/// shuts down; nothing is written on drop.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rttp_router::{MemoryCache, ParamValue, Router};
///
/// let cache = Arc::new(MemoryCache::new());
/// let mut router = Router::new(cache.clone());
/// router.route("/users/{id:int}", "handlers::user").unwrap();
///
/// let found = router.match_path("/users/42").unwrap();
/// assert_eq!(found.template, "/users/{id:int}");
/// assert_eq!(found.params.get("id"), Some(&ParamValue::Int(42)));
/// assert!(router.match_path("/users/abc").is_none());
///
/// router.close().unwrap();
/// assert!(Router::new(cache).is_snapshot_cached());
/// ```
pub struct Router {
    config: RouterConfig,
    index: RouteIndex,
    identities: IdentityTable,
    callbacks: CallbackRegistry,
}

impl Router {
    /// Create a router over `cache` with the default [`RouterConfig`], loading any
    /// route index snapshot already stored there.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::load(cache, RouterConfig::default())
    }

    /// Create a router over `cache` using the key layout from `config`.
    ///
    /// Routes restored from the snapshot also claim their identities, so a template
    /// registered later still conflicts with a cached one of the same shape.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if `config` has an empty key; the cache is not read.
    pub fn with_config(cache: Arc<dyn Cache>, config: RouterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::load(cache, config))
    }

    fn load(cache: Arc<dyn Cache>, config: RouterConfig) -> Self {
        let index = RouteIndex::load(cache, config.index_key());

        let mut identities = IdentityTable::new();
        for entry in index.iter() {
            if let Err(e) = identities.register(&entry.route.identity, &entry.route.template) {
                warn!(error = %e, "cached route shadows an earlier route of the same shape");
            }
        }

        Self {
            config,
            index,
            identities,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Register `template`, bound to `resource`.
    ///
    /// The first registration of a template compiles it, checks its identity for
    /// conflicts, writes the record through to the cache and indexes it. A
    /// non-persistable resource goes to the callback registry instead of the record.
    ///
    /// Registering an already indexed template never recompiles it; the resource is
    /// only attached when the stored record has none (a live resource after the
    /// index was restored from the cache).
    ///
    /// # Errors
    ///
    /// Every [`RouteError`] variant; see its documentation. On error nothing is
    /// indexed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use rttp_router::{MemoryCache, RouteError, Router};
    ///
    /// let mut router = Router::new(Arc::new(MemoryCache::new()));
    /// router.route("/{a}", "first").unwrap();
    ///
    /// let err = router.route("/{b}", "second").unwrap_err();
    /// assert!(matches!(err, RouteError::DuplicateRouteIdentity { .. }));
    /// ```
    pub fn route(&mut self, template: &str, resource: impl Into<Resource>) -> Result<(), RouteError> {
        template::validate(template)?;

        let id = self.config.route_id(template);
        let resource = resource.into();

        if let Some(entry) = self.index.get(&id) {
            if entry.route.resource.is_none() {
                debug!(template, "resource attached to cached route");
                self.callbacks.insert(id, resource);
            }
            return Ok(());
        }

        let compiled = template::compile(template)?;
        self.identities.register(&compiled.identity, template)?;

        let persisted = resource.persistable().map(str::to_owned);
        let route = CompiledRoute {
            pattern: compiled.pattern,
            identity: compiled.identity,
            template: template.to_owned(),
            resource: persisted.clone(),
        };
        debug!(template, identity = %route.identity, pattern = %route.pattern, "route compiled");

        self.index.insert(id.clone(), route, compiled.regex)?;
        if persisted.is_none() {
            self.callbacks.insert(id, resource);
        }
        Ok(())
    }

    /// Resolve `path` to a registered route.
    ///
    /// Returns `None` when no route matches; turning that into a not-found outcome is
    /// up to the caller.
    pub fn match_path(&self, path: &str) -> Option<MatchResult> {
        let id = self.config.route_id(path);
        matcher::resolve(&self.index, &self.callbacks, &id, path)
    }

    /// Persist the route index snapshot if the cache does not already hold all of it.
    ///
    /// Returns `true` if a snapshot was written.
    ///
    /// # Errors
    ///
    /// The cache's error if the write fails; a later call retries.
    pub fn flush(&mut self) -> Result<bool, CacheError> {
        self.index.flush()
    }

    /// Flush and consume the router.
    ///
    /// # Errors
    ///
    /// As [`flush`](Self::flush).
    pub fn close(mut self) -> Result<(), CacheError> {
        self.flush().map(|_| ())
    }

    /// Return the number of indexed routes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Return `true` if no routes are indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over route records in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &CompiledRoute> {
        self.index.iter().map(|entry| &entry.route)
    }

    /// Return `true` if the cache already holds a snapshot with every indexed route.
    pub fn is_snapshot_cached(&self) -> bool {
        self.index.is_cached()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("index", &self.index)
            .field("live_resources", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileCache, MemoryCache};
    use proptest::prelude::*;
    use serde_json::Value;
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn router() -> Router {
        Router::new(Arc::new(MemoryCache::new()))
    }

    fn noop() -> Resource {
        Resource::live(Arc::new(|| {}) as Arc<dyn Fn() + Send + Sync>)
    }

    fn param<'a>(m: &'a MatchResult, name: &str) -> &'a ParamValue {
        m.params
            .get(name)
            .unwrap_or_else(|| panic!("missing param {name} in {:?}", m.params))
    }

    // ── literal routes ────────────────────────────────────────────────────────

    #[test]
    fn router_starts_empty() {
        let router = router();
        assert!(router.is_empty());
        assert_eq!(router.len(), 0);
        assert!(router.match_path("/").is_none());
    }

    #[test]
    fn literal_route_matches_exactly() {
        let mut router = router();
        router.route("/fubar", "h").unwrap();

        let m = router.match_path("/fubar").unwrap();
        assert_eq!(m.identity, "/fubar");
        assert_eq!(m.pattern, "(?i)^/fubar$");
        assert!(m.params.is_empty());
        assert!(router.match_path("/fubarx").is_none());
    }

    #[test]
    fn literal_route_matches_case_insensitively_through_scan() {
        let mut router = router();
        router.route("/About", "h").unwrap();
        assert_eq!(router.match_path("/about").unwrap().template, "/About");
    }

    #[test]
    fn literal_route_without_named_groups_has_empty_params() {
        let mut router = router();
        router.route("/status", noop()).unwrap();
        assert_eq!(router.match_path("/STATUS").unwrap().params, Params::new());
    }

    proptest! {
        #[test]
        fn every_literal_template_matches_itself_only(
            segments in prop::collection::vec("[a-z0-9._-]{1,8}", 1..4)
        ) {
            let template = format!("/{}", segments.join("/"));
            let mut router = router();
            router.route(&template, "h").unwrap();

            prop_assert!(router.match_path(&template).is_some());
            let extended = format!("{template}x");
            prop_assert!(router.match_path(&extended).is_none());
        }
    }

    // ── literal vs dynamic ────────────────────────────────────────────────────

    #[test]
    fn explicit_route_wins_over_catch_all_of_same_type() {
        let mut router = router();
        router.route("/fubar", noop()).unwrap();
        router.route("/{param}", noop()).unwrap();

        let m = router.match_path("/fubar").unwrap();
        assert_eq!(m.identity, "/fubar");

        let m = router.match_path("/fubar/").unwrap();
        assert_eq!(m.pattern, "(?i)^/(?P<param>.+?)$");
        assert_eq!(param(&m, "param"), &ParamValue::Str("fubar/".into()));

        let m = router.match_path("/barqux").unwrap();
        assert_eq!(param(&m, "param"), &ParamValue::Str("barqux".into()));
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn explicit_route_wins_even_when_registered_after_catch_all() {
        let mut router = router();
        router.route("/{param}", noop()).unwrap();
        router.route("/fubar", noop()).unwrap();

        assert_eq!(router.match_path("/fubar").unwrap().identity, "/fubar");
        assert_eq!(router.match_path("/barqux").unwrap().identity, "/:str");
    }

    // ── parameter types ───────────────────────────────────────────────────────

    #[test]
    fn int_parameter_is_numeric() {
        let mut router = router();
        router.route("/{id:int}", "h").unwrap();

        let m = router.match_path("/123").unwrap();
        assert_eq!(param(&m, "id"), &ParamValue::Int(123));
        assert!(router.match_path("/abc").is_none());
    }

    #[test]
    fn float_parameters() {
        let mut router = router();
        router.route("/{lon:float}/{lat:float}", noop()).unwrap();

        let m = router.match_path("/12.345/67.890").unwrap();
        assert_eq!(param(&m, "lon"), &ParamValue::Float(12.345));
        assert_eq!(param(&m, "lat"), &ParamValue::Float(67.89));
    }

    #[test]
    fn uuid_parameter() {
        let mut router = router();
        router.route("/{uid:uuid}", noop()).unwrap();

        let uid = uuid::Uuid::new_v4().to_string();
        let m = router.match_path(&format!("/{uid}")).unwrap();
        assert_eq!(param(&m, "uid"), &ParamValue::Str(uid));
        assert!(router.match_path("/not-a-uuid").is_none());
    }

    #[test]
    fn regex_parameters_are_coerced_too() {
        let mut router = router();
        router
            .route(r"/{lon:regex:\d+\.\d+}/{lat:regex:\d+\.\d+}", noop())
            .unwrap();

        let m = router.match_path("/1.234/5.678").unwrap();
        assert_eq!(param(&m, "lon"), &ParamValue::Float(1.234));
        assert_eq!(param(&m, "lat"), &ParamValue::Float(5.678));
    }

    #[test]
    fn path_parameter_spans_segments() {
        let mut router = router();
        router.route("/{uri:path}", noop()).unwrap();

        let m = router.match_path("/foo/bar-123/baz.json").unwrap();
        assert_eq!(param(&m, "uri"), &ParamValue::Str("foo/bar-123/baz.json".into()));
    }

    #[test]
    fn untyped_parameter_is_str() {
        let mut router = router();
        router.route("/{param}", noop()).unwrap();

        let m = router.match_path("/foo-bar-baz.xml").unwrap();
        assert_eq!(param(&m, "param"), &ParamValue::Str("foo-bar-baz.xml".into()));
    }

    #[test]
    fn int_and_uuid_in_one_template() {
        let mut router = router();
        router
            .route("/api/{id:int}/collection/{uuid:uuid}", noop())
            .unwrap();

        let uid = uuid::Uuid::new_v4().to_string();
        let m = router.match_path(&format!("/api/462/collection/{uid}")).unwrap();
        assert_eq!(m.identity, "/api/:int/collection/:uuid");
        assert_eq!(param(&m, "id"), &ParamValue::Int(462));
        assert_eq!(param(&m, "uuid"), &ParamValue::Str(uid));
    }

    #[test]
    fn mixed_float_and_regex_params_keep_capture_order() {
        let mut router = router();
        router
            .route(r"/{lat:float}/{lon:regex:\d+.\d+}.{ext:regex:xml|json}", noop())
            .unwrap();

        let m = router.match_path("/1.23/4.56.xml").unwrap();
        assert_eq!(m.identity, r"/:float/\d+.\d+.xml|json");
        let names: Vec<_> = m.params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["lat", "lon", "ext"]);
        assert_eq!(param(&m, "ext"), &ParamValue::Str("xml".into()));
    }

    #[test]
    fn str_and_path_and_regex_together() {
        let mut router = router();
        router
            .route(r"/{version}/{path:path}/{id:regex:\d+}", noop())
            .unwrap();

        let m = router.match_path("/v1/bar/baz/qux/123").unwrap();
        assert_eq!(param(&m, "version"), &ParamValue::Str("v1".into()));
        assert_eq!(param(&m, "path"), &ParamValue::Str("bar/baz/qux".into()));
        assert_eq!(param(&m, "id"), &ParamValue::Int(123));
    }

    #[test]
    fn first_registered_of_overlapping_regex_routes_wins() {
        let ip_with_mime = r"(?P<addr>([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3}))\.(?P<mime>xml|json)";
        let ip_only = r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}";

        let mut router = router();
        router.route(&format!("/{{ip:regex:{ip_with_mime}}}"), noop()).unwrap();
        router.route(&format!("/{{ip:regex:{ip_only}}}"), noop()).unwrap();

        let m = router.match_path("/127.0.0.1.xml").unwrap();
        assert_eq!(param(&m, "ip"), &ParamValue::Str("127.0.0.1.xml".into()));
        assert_eq!(param(&m, "addr"), &ParamValue::Str("127.0.0.1".into()));
        assert_eq!(param(&m, "mime"), &ParamValue::Str("xml".into()));
        assert_eq!(router.match_path("/127.0.0.1.xml"), Some(m));
    }

    // ── registration errors ───────────────────────────────────────────────────

    #[test]
    fn same_shape_templates_conflict() {
        let mut router = router();
        router.route("/{fubar}/", noop()).unwrap();

        match router.route("/{param}/", noop()) {
            Err(RouteError::DuplicateRouteIdentity {
                template, existing, ..
            }) => {
                assert_eq!(template, "/{param}/");
                assert_eq!(existing, "/{fubar}/");
            }
            other => panic!("expected DuplicateRouteIdentity, got {other:?}"),
        }
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn str_and_path_of_same_shape_conflict() {
        let mut router = router();
        router.route("/{version}/{path:path}", noop()).unwrap();

        let err = router.route("/{param1}/{param2}", noop()).unwrap_err();
        assert!(matches!(
            &err,
            RouteError::DuplicateRouteIdentity { template, existing, .. }
                if template == "/{param1}/{param2}" && existing == "/{version}/{path:path}"
        ));
        assert!(err.to_string().contains("conflicts with already defined route"));
    }

    #[test]
    fn registration_errors_index_nothing() {
        let mut router = router();
        let cases = [
            ("nope", "InvalidTemplate"),
            ("/a//b", "InvalidTemplate"),
            ("/{x:regex}", "MissingRegexFilter"),
            (r"/{x:regexeses:\s+}", "UnsupportedParameterType"),
            ("/{p1:path}/{p2:path}", "MultipleGreedyParameters"),
            ("/{id:int}/{id:float}", "PatternCompilationFailure"),
        ];

        for (template, expected) in cases {
            let err = router.route(template, "h").unwrap_err();
            let kind = match err {
                RouteError::InvalidTemplate { .. } => "InvalidTemplate",
                RouteError::MissingRegexFilter { .. } => "MissingRegexFilter",
                RouteError::UnsupportedParameterType { .. } => "UnsupportedParameterType",
                RouteError::MultipleGreedyParameters { .. } => "MultipleGreedyParameters",
                RouteError::PatternCompilationFailure { .. } => "PatternCompilationFailure",
                RouteError::DuplicateRouteIdentity { .. } => "DuplicateRouteIdentity",
                RouteError::Cache(_) => "Cache",
            };
            assert_eq!(kind, expected, "{template}");
        }
        assert!(router.is_empty());
        assert!(router.match_path("/anything").is_none());
    }

    #[test]
    fn error_reports_offending_template() {
        let err = router().route("/{p1:path}/{p2:path}", "h").unwrap_err();
        assert_eq!(err.template(), Some("/{p1:path}/{p2:path}"));
    }

    // ── resources ─────────────────────────────────────────────────────────────

    #[test]
    fn persistable_resource_is_written_through() {
        let cache = Arc::new(MemoryCache::new());
        let mut router = Router::new(cache.clone());
        router.route("/fubar/", "app::TestResource").unwrap();

        let id = router.config().route_id("/fubar/");
        let stored = cache.get(id.as_str(), Value::Null);
        assert_eq!(stored["resource"], Value::from("app::TestResource"));

        let m = router.match_path("/fubar/").unwrap();
        assert_eq!(m.resource, Some(Resource::from("app::TestResource")));
    }

    #[test]
    fn live_resource_is_not_cached() {
        let cache = Arc::new(MemoryCache::new());
        let mut router = Router::new(cache.clone());
        let live = noop();
        router.route("/fubar/", live.clone()).unwrap();

        let id = router.config().route_id("/fubar/");
        assert_eq!(cache.get(id.as_str(), Value::Null)["resource"], Value::Null);
        assert!(!router.is_snapshot_cached());
        assert_eq!(router.match_path("/fubar/").unwrap().resource, Some(live));
    }

    #[test]
    fn live_resource_wins_on_scan_match() {
        let mut router = router();
        let live = Resource::live(99u16);
        router.route("/items/{id:int}", live.clone()).unwrap();

        let m = router.match_path("/items/5").unwrap();
        assert_eq!(m.resource, Some(live));
        assert_eq!(m.resource.unwrap().downcast_ref::<u16>(), Some(&99));
    }

    #[test]
    fn reregistering_a_template_does_not_replace_persisted_resource() {
        let mut router = router();
        router.route("/a", "first").unwrap();
        router.route("/a", "second").unwrap();

        assert_eq!(router.len(), 1);
        assert_eq!(router.match_path("/a").unwrap().resource, Some(Resource::from("first")));
    }

    #[test]
    fn reregistering_a_template_with_live_resource_rebinds_it() {
        let mut router = router();
        router.route("/a", Resource::live(1u8)).unwrap();
        let second = Resource::live(2u8);
        router.route("/a", second.clone()).unwrap();

        assert_eq!(router.match_path("/a").unwrap().resource, Some(second));
    }

    #[test]
    fn exact_template_text_hits_the_fast_path() {
        let mut router = router();
        router.route("/{id:int}", "h").unwrap();

        let m = router.match_path("/{id:int}").unwrap();
        assert_eq!(m.template, "/{id:int}");
        assert!(m.params.is_empty());
    }

    // ── persistence ───────────────────────────────────────────────────────────

    const TEMPLATES: [(&str, &str); 5] = [
        ("/", "home"),
        ("/users", "users::list"),
        ("/users/{id:int}", "users::show"),
        ("/geo/{lat:float}/{lon:float}", "geo::point"),
        ("/files/{rest:path}", "files::serve"),
    ];

    const PROBES: [&str; 7] = [
        "/",
        "/users",
        "/users/42",
        "/geo/1.5/-2.25",
        "/files/a/b/c.txt",
        "/USERS",
        "/missing/route",
    ];

    fn register_all(router: &mut Router) {
        for (template, handler) in TEMPLATES {
            router.route(template, handler).unwrap();
        }
    }

    #[test]
    fn persist_and_reload_gives_identical_matches() {
        let cache = Arc::new(MemoryCache::new());

        let mut cold = Router::new(cache.clone());
        assert!(!cold.is_snapshot_cached());
        register_all(&mut cold);
        let before: Vec<_> = PROBES.iter().map(|p| cold.match_path(p)).collect();
        cold.close().unwrap();

        let warm = Router::new(cache.clone());
        assert!(warm.is_snapshot_cached());
        assert_eq!(warm.len(), TEMPLATES.len());
        let after: Vec<_> = PROBES.iter().map(|p| warm.match_path(p)).collect();

        assert_eq!(before, after);
        assert!(after.last().unwrap().is_none());
    }

    #[test]
    fn warm_router_does_not_recompile_or_rewrite() {
        let cache = Arc::new(MemoryCache::new());
        let mut cold = Router::new(cache.clone());
        register_all(&mut cold);
        cold.close().unwrap();
        let keys = cache.len();

        let mut warm = Router::new(cache.clone());
        register_all(&mut warm);
        assert!(warm.is_snapshot_cached());
        assert!(!warm.flush().unwrap());
        assert_eq!(cache.len(), keys);
    }

    #[test]
    fn cached_routes_still_detect_conflicts() {
        let cache = Arc::new(MemoryCache::new());
        let mut cold = Router::new(cache.clone());
        cold.route("/{a}/{b}", "h").unwrap();
        cold.close().unwrap();

        let mut warm = Router::new(cache);
        assert!(matches!(
            warm.route("/{x}/{rest:path}", "h"),
            Err(RouteError::DuplicateRouteIdentity { .. })
        ));
    }

    #[test]
    fn live_resource_must_be_rebound_after_reload() {
        let cache = Arc::new(MemoryCache::new());
        let mut cold = Router::new(cache.clone());
        cold.route("/hook", noop()).unwrap();
        cold.close().unwrap();

        let mut warm = Router::new(cache);
        assert_eq!(warm.match_path("/hook").unwrap().resource, None);

        let live = noop();
        warm.route("/hook", live.clone()).unwrap();
        assert_eq!(warm.match_path("/hook").unwrap().resource, Some(live));
    }

    #[test]
    fn routes_added_after_a_hit_are_flushed() {
        let cache = Arc::new(MemoryCache::new());
        let mut cold = Router::new(cache.clone());
        cold.route("/a", "h").unwrap();
        cold.close().unwrap();

        let mut warm = Router::new(cache.clone());
        warm.route("/b", "h").unwrap();
        assert!(!warm.is_snapshot_cached());
        assert!(warm.flush().unwrap());

        let next = Router::new(cache);
        let templates: Vec<_> = next.routes().map(|r| r.template.as_str()).collect();
        assert_eq!(templates, vec!["/a", "/b"]);
    }

    #[test]
    fn custom_key_layout() {
        let cache = Arc::new(MemoryCache::new());
        let config = RouterConfig::new()
            .with_index_key("svc.routes")
            .with_key_prefix("svc.r.");
        let mut router = Router::with_config(cache.clone(), config).unwrap();
        router.route("/ping", "h").unwrap();
        router.close().unwrap();

        assert!(cache.has("svc.routes"));
        assert!(!cache.has("router.index"));
        assert!(cache.has(RouteId::derive("svc.r.", "/ping").as_str()));
    }

    #[test]
    fn empty_configured_keys_are_rejected() {
        let cache = Arc::new(MemoryCache::new());
        let no_index = RouterConfig::new().with_index_key("");
        assert!(matches!(
            Router::with_config(cache.clone(), no_index),
            Err(ConfigError::Invalid { field: "index_key", .. })
        ));

        let no_prefix = RouterConfig::new().with_key_prefix("");
        assert!(matches!(
            Router::with_config(cache, no_prefix),
            Err(ConfigError::Invalid { field: "key_prefix", .. })
        ));
    }

    // ── cache failures ────────────────────────────────────────────────────────

    // A memory cache whose writes can be switched off.
    #[derive(Default)]
    struct FailingCache {
        inner: MemoryCache,
        failing: AtomicBool,
    }

    impl FailingCache {
        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    impl Cache for FailingCache {
        fn get(&self, key: &str, default: Value) -> Value {
            self.inner.get(key, default)
        }

        fn has(&self, key: &str) -> bool {
            self.inner.has(key)
        }

        fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(io::Error::other("cache unavailable").into());
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn write_through_failure_indexes_nothing_and_retry_succeeds() {
        let cache = Arc::new(FailingCache::default());
        let mut router = Router::new(cache.clone());

        cache.fail(true);
        let err = router.route("/users/{id:int}", "users::show").unwrap_err();
        assert!(matches!(err, RouteError::Cache(CacheError::Io(_))));
        assert!(router.is_empty());
        assert!(router.match_path("/users/7").is_none());

        cache.fail(false);
        router.route("/users/{id:int}", "users::show").unwrap();
        assert_eq!(router.len(), 1);
        let found = router.match_path("/users/7").unwrap();
        assert_eq!(param(&found, "id"), &ParamValue::Int(7));
    }

    #[test]
    fn failed_flush_is_retried_by_the_next_router() {
        let cache = Arc::new(FailingCache::default());
        let mut router = Router::new(cache.clone());
        router.route("/a", "h").unwrap();

        cache.fail(true);
        assert!(router.flush().is_err());
        assert!(!router.is_snapshot_cached());
        drop(router);

        cache.fail(false);
        let mut next = Router::new(cache.clone());
        assert!(!next.is_snapshot_cached());
        next.route("/a", "h").unwrap();
        assert!(next.flush().unwrap());
        assert!(Router::new(cache).is_snapshot_cached());
    }

    #[test]
    fn failed_file_flush_leaves_no_phantom_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        std::fs::create_dir(&state).unwrap();
        let cache = Arc::new(FileCache::open(state.join("routes.json")).unwrap());

        let mut router = Router::new(cache.clone());
        router.route("/a", "h").unwrap();
        std::fs::remove_dir_all(&state).unwrap();
        assert!(router.flush().is_err());

        let next = Router::new(cache);
        assert!(!next.is_snapshot_cached());
        assert!(!state.join("routes.json").exists());
    }

    #[test]
    fn file_cache_survives_process_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");

        let mut cold = Router::new(Arc::new(FileCache::open(&path).unwrap()));
        register_all(&mut cold);
        let before: Vec<_> = PROBES.iter().map(|p| cold.match_path(p)).collect();
        cold.close().unwrap();

        let warm = Router::new(Arc::new(FileCache::open(&path).unwrap()));
        assert!(warm.is_snapshot_cached());
        let after: Vec<_> = PROBES.iter().map(|p| warm.match_path(p)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn drop_does_not_flush() {
        let cache = Arc::new(MemoryCache::new());
        {
            let mut router = Router::new(cache.clone());
            router.route("/a", "h").unwrap();
        }
        assert!(!cache.has("router.index"));
    }
}
