//! Route registration errors.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors raised by [`Router::route`](super::Router::route).
///
/// Every variant is fatal to the registration call that produced it and carries the
/// offending template, plus whatever else the caller needs to fix its route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid URI template \"{template}\": {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },

    #[error(
        "invalid route parameter type '{param_type}' in \"{template}\"; use one of the supported parameter types: {}",
        .supported.join(", ")
    )]
    UnsupportedParameterType {
        template: String,
        param_type: String,
        supported: Vec<&'static str>,
    },

    #[error("invalid route \"{template}\": no regular expression provided for a regex parameter")]
    MissingRegexFilter { template: String },

    #[error(
        "invalid route \"{template}\": {count} path parameters found, only one \"path\" type is allowed"
    )]
    MultipleGreedyParameters { template: String, count: usize },

    #[error(
        "duplicate route: the URI template \"{template}\" conflicts with already defined route \"{existing}\" (identity \"{identity}\")"
    )]
    DuplicateRouteIdentity {
        template: String,
        existing: String,
        identity: String,
    },

    #[error("pattern compilation failed for \"{template}\": {source}")]
    PatternCompilationFailure {
        template: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to persist route: {0}")]
    Cache(#[from] CacheError),
}

impl RouteError {
    /// Returns the template that caused the error, when there is one.
    pub fn template(&self) -> Option<&str> {
        match self {
            Self::InvalidTemplate { template, .. }
            | Self::UnsupportedParameterType { template, .. }
            | Self::MissingRegexFilter { template }
            | Self::MultipleGreedyParameters { template, .. }
            | Self::DuplicateRouteIdentity { template, .. }
            | Self::PatternCompilationFailure { template, .. } => Some(template),
            Self::Cache(_) => None,
        }
    }
}
