//! Template compiler — turns a URI template into an anchored pattern and an identity.
//!
//! A template is either *literal* (`/about/team`) or *dynamic*, containing one or more
//! parameter tokens of the form `{name[:type[:filter]]}`:
//!
//! | Token                     | Pattern fragment        | Identity marker |
//! |---------------------------|-------------------------|-----------------|
//! | `{slug}`                  | `(?P<slug>.+?)`         | `:str`          |
//! | `{id:int}`                | `(?P<id>-?\d+)`         | `:int`          |
//! | `{rest:path}`             | `(?P<rest>.+)`          | `:str`          |
//! | `{ext:regex:xml\|json}`   | `(?P<ext>xml\|json)`    | `xml\|json`     |
//! | `{id:int:\d{3}}`          | `(?P<id>\d{3})`         | `:int`          |
//!
//! Text outside of tokens is copied into the pattern as-is, so it may use regex syntax.
//! Literal templates are escaped and matched case-insensitively.

use regex::Regex;

use super::error::RouteError;
use super::types::ParamType;

/// Output of [`compile`]: the pattern source, its compiled form and the identity.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub pattern: String,
    pub identity: String,
    pub regex: Regex,
}

/// A parsed `{name[:type[:filter]]}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub param_type: ParamType,
    pub filter: Option<String>,
}

impl ParameterSpec {
    /// Parse the body of a parameter token (the text between the outer braces).
    ///
    /// The body is split on `:` into at most three parts, so a filter may itself
    /// contain colons. The type defaults to `str`.
    pub fn parse(body: &str, template: &str) -> Result<Self, RouteError> {
        let mut parts = body.splitn(3, ':');
        let name = parts.next().unwrap_or_default();
        let type_token = parts.next().unwrap_or("str");
        let filter = parts.next().filter(|f| !f.is_empty());

        if type_token == ParamType::Regex.as_str() && filter.is_none() {
            return Err(RouteError::MissingRegexFilter {
                template: template.to_owned(),
            });
        }

        let param_type = type_token
            .parse::<ParamType>()
            .map_err(|_| RouteError::UnsupportedParameterType {
                template: template.to_owned(),
                param_type: type_token.to_owned(),
                supported: ParamType::supported(),
            })?;

        Ok(Self {
            name: name.to_owned(),
            param_type,
            filter: filter.map(str::to_owned),
        })
    }

    /// The expression captured by this parameter: the filter when given, otherwise the
    /// type's default fragment.
    pub fn fragment(&self) -> &str {
        self.filter
            .as_deref()
            .or_else(|| self.param_type.fragment())
            .unwrap_or_default()
    }

    /// The text this parameter contributes to the route identity.
    pub fn identity_marker(&self) -> &str {
        self.param_type
            .identity_marker()
            .or(self.filter.as_deref())
            .unwrap_or_default()
    }
}

// A slice of a template: literal text or the body of a `{…}` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Parameter(&'a str),
}

// Split `template` into literal text and brace-balanced parameter tokens.
//
// Nested braces stay inside their token (`{ip:regex:[0-9]{1,3}}` is one token). An
// unmatched `}` and an unclosed `{` are kept as literal text.
fn scan(template: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut literal_start = 0;
    let mut token_start = 0;

    for (i, byte) in template.bytes().enumerate() {
        match byte {
            b'{' => {
                if depth == 0 {
                    token_start = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if literal_start < token_start {
                        pieces.push(Piece::Literal(&template[literal_start..token_start]));
                    }
                    pieces.push(Piece::Parameter(&template[token_start + 1..i]));
                    literal_start = i + 1;
                }
            }
            _ => {}
        }
    }

    if literal_start < template.len() {
        pieces.push(Piece::Literal(&template[literal_start..]));
    }
    pieces
}

/// Check the structural rules every template must satisfy.
///
/// # Errors
///
/// [`RouteError::InvalidTemplate`] if `template` does not start with `/` or contains
/// `//`.
pub fn validate(template: &str) -> Result<(), RouteError> {
    let reason = if !template.starts_with('/') {
        "URI template must begin with \"/\""
    } else if template.contains("//") {
        "URI template has duplicate slashes"
    } else {
        return Ok(());
    };

    Err(RouteError::InvalidTemplate {
        template: template.to_owned(),
        reason,
    })
}

/// Compile a URI template into its anchored pattern and canonical identity.
///
/// # Errors
///
/// - [`RouteError::InvalidTemplate`] — malformed template.
/// - [`RouteError::MissingRegexFilter`] — `regex` parameter without a filter.
/// - [`RouteError::UnsupportedParameterType`] — type token not in the registry.
/// - [`RouteError::MultipleGreedyParameters`] — more than one `path` parameter.
/// - [`RouteError::PatternCompilationFailure`] — the assembled pattern is rejected by
///   the regex engine (duplicate or invalid group names, unsupported syntax).
///
/// # Examples
///
/// ```
/// use rttp_router::router::template::compile;
///
/// let compiled = compile("/api/{id:int}/collection/{uuid:uuid}").unwrap();
/// assert_eq!(compiled.identity, "/api/:int/collection/:uuid");
/// assert!(compiled.regex.is_match("/api/462/collection/0b5f06ab-3d35-4a2c-9a7e-1c5b0e2c9f10"));
/// ```
pub fn compile(template: &str) -> Result<CompiledTemplate, RouteError> {
    validate(template)?;

    if !template.contains('{') {
        let pattern = format!("(?i)^{}$", regex::escape(template));
        return finish(template, pattern, template.to_owned());
    }

    let mut pattern = String::with_capacity(template.len() * 2);
    let mut identity = String::with_capacity(template.len());
    let mut case_insensitive = false;
    let mut greedy = 0usize;

    for piece in scan(template) {
        match piece {
            Piece::Literal(text) => {
                pattern.push_str(text);
                identity.push_str(text);
            }
            Piece::Parameter(body) => {
                let param = ParameterSpec::parse(body, template)?;
                pattern.push_str("(?P<");
                pattern.push_str(&param.name);
                pattern.push('>');
                pattern.push_str(param.fragment());
                pattern.push(')');
                identity.push_str(param.identity_marker());

                case_insensitive |= param.param_type.is_case_insensitive();
                if param.param_type.is_greedy() {
                    greedy += 1;
                }
            }
        }
    }

    if greedy > 1 {
        return Err(RouteError::MultipleGreedyParameters {
            template: template.to_owned(),
            count: greedy,
        });
    }

    let flags = if case_insensitive { "(?i)" } else { "" };
    finish(template, format!("{flags}^{pattern}$"), identity)
}

// Compile the assembled pattern.
fn finish(template: &str, pattern: String, identity: String) -> Result<CompiledTemplate, RouteError> {
    let regex = Regex::new(&pattern).map_err(|source| RouteError::PatternCompilationFailure {
        template: template.to_owned(),
        source,
    })?;

    Ok(CompiledTemplate {
        pattern,
        identity,
        regex,
    })
}
