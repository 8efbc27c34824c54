//! Conflict detection over route identities.
//!
//! Two templates with the same identity describe the same routing shape, so only the
//! first one registered may own it.

use std::collections::HashMap;

use super::error::RouteError;

/// `identity → template` table.
#[derive(Debug, Default)]
pub struct IdentityTable {
    owners: HashMap<String, String>,
}

impl IdentityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `identity` to `template`.
    ///
    /// Binding the same pair again is a no-op.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateRouteIdentity`] if `identity` is already owned by a
    /// different template. The error names both templates.
    pub fn register(&mut self, identity: &str, template: &str) -> Result<(), RouteError> {
        match self.owners.get(identity) {
            Some(existing) if existing == template => Ok(()),
            Some(existing) => Err(RouteError::DuplicateRouteIdentity {
                template: template.to_owned(),
                existing: existing.clone(),
                identity: identity.to_owned(),
            }),
            None => {
                self.owners.insert(identity.to_owned(), template.to_owned());
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
