//! Path resolution against the route index.

use tracing::trace;

use super::callback::CallbackRegistry;
use super::index::{IndexedRoute, RouteId, RouteIndex};
use super::params::Params;
use super::resource::Resource;

/// A successful match of a request path.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The template the path matched.
    pub template: String,
    /// The template's canonical identity.
    pub identity: String,
    /// The anchored pattern the path was tested against.
    pub pattern: String,
    /// The live resource if one is registered, else the persisted identifier, else
    /// `None` (a record restored from the cache whose live resource was not bound
    /// again).
    pub resource: Option<Resource>,
    /// Captured and coerced parameters.
    pub params: Params,
}

impl MatchResult {
    fn new(entry: &IndexedRoute, callbacks: &CallbackRegistry, params: Params) -> Self {
        let resource = callbacks
            .get(&entry.id)
            .cloned()
            .or_else(|| entry.route.resource.clone().map(Resource::Persistable));

        Self {
            template: entry.route.template.clone(),
            identity: entry.route.identity.clone(),
            pattern: entry.route.pattern.clone(),
            resource,
            params,
        }
    }
}

/// Resolves `path`, whose id is `id`, against `index`.
///
/// An entry stored under exactly `id` wins without running any pattern; otherwise the
/// first entry in registration order whose pattern matches is returned.
pub(crate) fn resolve(
    index: &RouteIndex,
    callbacks: &CallbackRegistry,
    id: &RouteId,
    path: &str,
) -> Option<MatchResult> {
    if let Some(entry) = index.get(id) {
        trace!(path, template = %entry.route.template, "exact route id hit");
        return Some(MatchResult::new(entry, callbacks, Params::new()));
    }

    let found = index.iter().find_map(|entry| {
        entry.regex.captures(path).map(|captures| {
            let params = Params::from_captures(&entry.regex, &captures);
            MatchResult::new(entry, callbacks, params)
        })
    });

    match &found {
        Some(m) => trace!(path, template = %m.template, params = m.params.len(), "pattern match"),
        None => trace!(path, "no route matched"),
    }
    found
}
