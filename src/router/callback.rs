//! In-memory registry for resources that are not persisted with their route.

use std::collections::HashMap;

use super::index::RouteId;
use super::resource::Resource;

/// `RouteId → Resource` for routes whose persisted record carries no resource.
///
/// Lookups through this registry take precedence over the persisted resource of the
/// same route. Entries live as long as the owning [`Router`](super::Router).
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    resources: HashMap<RouteId, Resource>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `resource` to `id`, replacing any previous binding.
    pub fn insert(&mut self, id: RouteId, resource: Resource) {
        self.resources.insert(id, resource);
    }

    pub fn get(&self, id: &RouteId) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
