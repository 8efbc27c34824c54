//! Registers a small route table against a file-backed cache, resolves a few paths,
//! then reopens the cache the way a restarted process would.
//!
//! ```text
//! RUST_LOG=rttp_router=debug cargo run --example route_table
//! ```

use std::sync::Arc;

use rttp_router::{FileCache, Resource, Router};
use tracing_subscriber::EnvFilter;

const ROUTES: &[(&str, &str)] = &[
    ("/", "pages::home"),
    ("/users", "users::index"),
    ("/users/{id:int}", "users::show"),
    ("/geo/{lat:float}/{lon:float}", "geo::point"),
    ("/items/{uid:uuid}", "items::show"),
    ("/static/{file:path}", "assets::serve"),
    (r"/report.{ext:regex:xml|json}", "reports::export"),
];

const PROBES: &[&str] = &[
    "/",
    "/users/42",
    "/geo/51.5/-0.12",
    "/items/0b5f06ab-3d35-4a2c-9a7e-1c5b0e2c9f10",
    "/static/css/site.css",
    "/report.json",
    "/health",
    "/nope/nope",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let dir = std::env::temp_dir().join("rttp-router-demo");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("routes.json");
    let _ = std::fs::remove_file(&path);

    let mut router = Router::new(Arc::new(FileCache::open(&path)?));
    for (template, handler) in ROUTES {
        router.route(template, *handler)?;
    }
    router.route("/health", Resource::live(|| "ok"))?;

    if let Err(e) = router.route("/users/{uid:int}", "users::by_uid") {
        println!("rejected: {e}");
    }

    for probe in PROBES {
        match router.match_path(probe) {
            Some(found) => println!(
                "{probe:<48} -> {:<32} {:?} params={}",
                found.template,
                found.resource,
                serde_json::to_string(&found.params)?
            ),
            None => println!("{probe:<48} -> (no route)"),
        }
    }
    router.close()?;

    let reopened = Router::new(Arc::new(FileCache::open(&path)?));
    println!(
        "reopened {} routes from {} (snapshot cached: {})",
        reopened.len(),
        path.display(),
        reopened.is_snapshot_cached()
    );
    Ok(())
}
