//! Parameter type registry.
//!
//! Every template parameter carries a type token (`{id:int}`); the token selects the
//! regex fragment the parameter compiles to and whether the capture is greedy.
//!
//! | Token   | Fragment                                                | Greedy |
//! |---------|---------------------------------------------------------|--------|
//! | `str`   | `.+?`                                                   | no     |
//! | `int`   | `-?\d+`                                                 | no     |
//! | `float` | `-?\d*\.\d+`                                            | no     |
//! | `path`  | `.+`                                                    | yes    |
//! | `regex` | *(caller supplied)*                                     | no     |
//! | `uuid`  | `[a-f0-9]{8}-[a-f0-9]{4}-[1345][a-f0-9]{3}-…{12}`       | no     |

use std::fmt;

/// Canonical textual UUID (versions 1, 3, 4 and 5, lowercase hex).
pub const UUID_PATTERN: &str =
    "[a-f0-9]{8}-[a-f0-9]{4}-[1345][a-f0-9]{3}-[a-f0-9]{4}-[a-f0-9]{12}";

/// A built-in route parameter type.
///
/// # Examples
///
/// ```
/// use rttp_router::router::ParamType;
///
/// let ty: ParamType = "int".parse().unwrap();
/// assert_eq!(ty, ParamType::Int);
/// assert_eq!(ty.fragment(), Some(r"-?\d+"));
/// assert!(!ty.is_greedy());
/// assert!(ParamType::Path.is_greedy());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Lazy, non-empty text.
    Str,
    /// Optionally signed integer.
    Int,
    /// Optionally signed decimal with a mandatory fractional part.
    Float,
    /// Greedy remainder of the path, slashes included.
    Path,
    /// Caller-supplied expression only.
    Regex,
    /// Canonical UUID.
    Uuid,
}

impl ParamType {
    /// All registered types, in the order they are reported to callers.
    pub const ALL: [ParamType; 6] = [
        Self::Str,
        Self::Int,
        Self::Float,
        Self::Path,
        Self::Regex,
        Self::Uuid,
    ];

    /// Returns the type token as written in templates.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Path => "path",
            Self::Regex => "regex",
            Self::Uuid => "uuid",
        }
    }

    /// Returns the default regex fragment, or `None` for [`ParamType::Regex`], which has
    /// no default and always needs a filter.
    pub fn fragment(self) -> Option<&'static str> {
        match self {
            Self::Str => Some(".+?"),
            Self::Int => Some(r"-?\d+"),
            Self::Float => Some(r"-?\d*\.\d+"),
            Self::Path => Some(".+"),
            Self::Regex => None,
            Self::Uuid => Some(UUID_PATTERN),
        }
    }

    /// Returns `true` if the capture consumes as much of the remaining path as possible.
    pub fn is_greedy(self) -> bool {
        matches!(self, Self::Path)
    }

    /// Returns `true` if a parameter of this type makes the whole pattern
    /// case-insensitive.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Self::Str | Self::Path)
    }

    /// Returns the marker this type contributes to a route identity.
    ///
    /// `path` folds into `:str`: a greedy and a lazy capture over the same shape are
    /// indistinguishable for dispatch. `regex` has no marker; its filter text is used.
    pub fn identity_marker(self) -> Option<&'static str> {
        match self {
            Self::Str | Self::Path => Some(":str"),
            Self::Int => Some(":int"),
            Self::Float => Some(":float"),
            Self::Uuid => Some(":uuid"),
            Self::Regex => None,
        }
    }

    /// The type tokens accepted in templates, in registry order.
    pub fn supported() -> Vec<&'static str> {
        Self::ALL.iter().map(|ty| ty.as_str()).collect()
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type token is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParamType(pub String);

impl fmt::Display for UnknownParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parameter type '{}'", self.0)
    }
}

impl std::error::Error for UnknownParamType {}

impl std::str::FromStr for ParamType {
    type Err = UnknownParamType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownParamType(s.to_owned()))
    }
}
