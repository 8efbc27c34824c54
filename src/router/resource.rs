//! Route resources — what a route resolves to.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The value bound to a route.
///
/// A resource either crosses the persistence boundary (a handler identifier string,
/// stored in the cache with the route) or it does not (a live value such as a
/// closure or a service object, kept only in the router's callback registry).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rttp_router::router::Resource;
///
/// let named = Resource::from("app::handlers::users");
/// assert_eq!(named.persistable(), Some("app::handlers::users"));
///
/// let live = Resource::live(Arc::new(|| 42) as Arc<dyn Fn() -> i32 + Send + Sync>);
/// assert!(live.is_live());
/// let handler = live.downcast_ref::<Arc<dyn Fn() -> i32 + Send + Sync>>().unwrap();
/// assert_eq!(handler(), 42);
/// ```
#[derive(Clone)]
pub enum Resource {
    /// A handler identifier that can be stored in the cache.
    Persistable(String),
    /// A live value that only exists for the lifetime of the router.
    Live(Arc<dyn Any + Send + Sync>),
}

impl Resource {
    /// Wraps any `'static` value as a [`Resource::Live`].
    pub fn live<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self::Live(Arc::new(value))
    }

    /// Returns the identifier to persist, or `None` if this resource must stay in
    /// memory. An empty identifier is not persistable.
    pub fn persistable(&self) -> Option<&str> {
        match self {
            Self::Persistable(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// Returns `true` for [`Resource::Live`].
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    /// Borrows the live value as `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Live(value) => value.downcast_ref::<T>(),
            Self::Persistable(_) => None,
        }
    }
}

impl From<&str> for Resource {
    fn from(name: &str) -> Self {
        Self::Persistable(name.to_owned())
    }
}

impl From<String> for Resource {
    fn from(name: String) -> Self {
        Self::Persistable(name)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistable(name) => f.debug_tuple("Persistable").field(name).finish(),
            Self::Live(_) => f.write_str("Live(..)"),
        }
    }
}

/// Identifiers compare by value, live values by identity.
impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Persistable(a), Self::Persistable(b)) => a == b,
            (Self::Live(a), Self::Live(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
