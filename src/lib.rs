//! # rttp-router
//!
//! A URI-template router with typed path parameters, registration-time conflict
//! detection and a route index persisted through a pluggable cache.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use rttp_router::{MemoryCache, ParamValue, Router};
//!
//! let cache = Arc::new(MemoryCache::new());
//! let mut router = Router::new(cache);
//!
//! router.route("/api/{id:int}/collection/{uuid:uuid}", "collections::show")?;
//! router.route("/static/{file:path}", "assets::serve")?;
//!
//! let found = router
//!     .match_path("/api/462/collection/0b5f06ab-3d35-4a2c-9a7e-1c5b0e2c9f10")
//!     .expect("route should match");
//! assert_eq!(found.identity, "/api/:int/collection/:uuid");
//! assert_eq!(found.params.get("id"), Some(&ParamValue::Int(462)));
//!
//! // Persist the compiled index for the next start.
//! router.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod router;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{Cache, CacheError, FileCache, MemoryCache};
pub use config::{ConfigError, RouterConfig};
pub use router::{
    CompiledRoute, MatchResult, ParamType, ParamValue, Params, Resource, RouteError, RouteId,
    Router,
};
