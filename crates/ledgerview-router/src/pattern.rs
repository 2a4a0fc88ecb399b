//! Path patterns and path normalization
//!
//! A pattern is a `/`-separated template whose segments are either literal
//! text or a named parameter written `:name`.

use crate::error::{RouterError, RouterResult};
use crate::Params;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;

static PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name regex is valid"));

/// One segment of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text that must match exactly
    Static(String),
    /// Named parameter bound to whatever the path holds at this position
    Param(String),
}

/// Parsed path pattern such as `/ledger/:ledger_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern string
    pub fn parse(pattern: &str) -> RouterResult<Self> {
        let invalid = |reason: &str| RouterError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            match part.strip_prefix(':') {
                Some(name) => {
                    if !PARAM_NAME.is_match(name) {
                        return Err(invalid(&format!("bad parameter name ':{}'", name)));
                    }
                    if segments.iter().any(|s| matches!(s, Segment::Param(n) if n == name)) {
                        return Err(invalid(&format!("parameter ':{}' appears twice", name)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Static(part.to_string())),
            }
        }

        Ok(Self {
            raw: normalize_path(pattern),
            segments,
        })
    }

    /// The normalized pattern text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the parameters in declaration order
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// True when the pattern has no parameter segments
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Static(_)))
    }

    /// Shape used for collision detection: parameters collapse to `:`
    pub fn shape(&self) -> String {
        let parts: Vec<&str> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Static(text) => text.as_str(),
                Segment::Param(_) => ":",
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    /// Specificity rank, compared left to right: a literal beats a parameter
    pub fn rank(&self) -> Vec<u8> {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Static(_) => 2,
                Segment::Param(_) => 1,
            })
            .collect()
    }

    /// Match already-split path segments, decoding parameter values
    ///
    /// Returns `Ok(None)` when the path does not fit this pattern.
    pub fn matches(&self, parts: &[&str]) -> RouterResult<Option<Params>> {
        if parts.len() != self.segments.len() {
            return Ok(None);
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(text) => {
                    if text != part {
                        return Ok(None);
                    }
                }
                Segment::Param(name) => {
                    let value = urlencoding::decode(part).map_err(|e| RouterError::InvalidParameter {
                        name: name.clone(),
                        reason: format!("not valid UTF-8 after decoding: {}", e),
                    })?;
                    params.insert(name.clone(), value.into_owned());
                }
            }
        }

        Ok(Some(params))
    }

    /// Substitute parameters back into the pattern
    pub fn build(&self, params: &Params) -> RouterResult<String> {
        let mut parts: Vec<Cow<'_, str>> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => parts.push(Cow::Borrowed(text.as_str())),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| RouterError::InvalidParameter {
                        name: name.clone(),
                        reason: "missing".to_string(),
                    })?;
                    if value.is_empty() {
                        return Err(RouterError::InvalidParameter {
                            name: name.clone(),
                            reason: "empty".to_string(),
                        });
                    }
                    parts.push(encode_segment(value));
                }
            }
        }
        Ok(format!("/{}", parts.join("/")))
    }
}

/// Characters allowed unescaped in a path segment (RFC 3986 `pchar`)
fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:@".contains(c)
}

/// Percent-encode a parameter value for use as one path segment
fn encode_segment(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_segment_char) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() * 3);
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if is_segment_char(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    Cow::Owned(out)
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Split a location into its path and raw query, dropping any `#fragment`
pub fn split_location(location: &str) -> (&str, Option<&str>) {
    let without_hash = location.split_once('#').map_or(location, |(before, _)| before);
    match without_hash.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_hash, None),
    }
}

/// Normalize a path before matching
///
/// Ensures a leading slash, collapses repeated slashes, drops the trailing
/// slash (except for the root) and strips the query and fragment.
pub fn normalize_path(path: &str) -> String {
    let (path, _) = split_location(path);
    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

/// Split a normalized path into segments
pub fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parse a raw query string into decoded key/value pairs
///
/// `+` is treated as a space. Pairs that fail to decode are skipped.
pub fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// Remove a base prefix such as `/app/` from a path
///
/// Returns `None` when the path lies outside the base.
pub fn strip_base<'a>(base: &str, path: &'a str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return Some(path);
    }
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') || rest.starts_with('#') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_segments() {
        let pattern = PathPattern::parse("/ledger/:ledger_id/accounts/:account_id/register").unwrap();
        assert_eq!(pattern.segments().len(), 5);
        assert_eq!(pattern.segments()[1], Segment::Param("ledger_id".to_string()));
        assert_eq!(pattern.param_names(), vec!["ledger_id", "account_id"]);
        assert_eq!(pattern.shape(), "/ledger/:/accounts/:/register");
        assert!(!pattern.is_literal());
    }

    #[test]
    fn test_parse_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.segments().is_empty());
        assert!(pattern.is_literal());
        assert_eq!(pattern.as_str(), "/");
        assert_eq!(pattern.matches(&[]).unwrap(), Some(Params::new()));
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!(matches!(
            PathPattern::parse("ledger/:id"),
            Err(RouterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/ledger/:1id"),
            Err(RouterError::InvalidPattern { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/:id/b/:id"),
            Err(RouterError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_matches_binds_and_decodes() {
        let pattern = PathPattern::parse("/ledger/:ledger_id").unwrap();
        assert_eq!(
            pattern.matches(&["ledger", "42"]).unwrap(),
            Some(params(&[("ledger_id", "42")]))
        );
        assert_eq!(
            pattern.matches(&["ledger", "my%20books"]).unwrap(),
            Some(params(&[("ledger_id", "my books")]))
        );
        assert_eq!(pattern.matches(&["ledgers", "42"]).unwrap(), None);
        assert_eq!(pattern.matches(&["ledger"]).unwrap(), None);
    }

    #[test]
    fn test_matches_rejects_invalid_utf8() {
        let pattern = PathPattern::parse("/ledger/:ledger_id").unwrap();
        let err = pattern.matches(&["ledger", "%FF"]).unwrap_err();
        assert!(matches!(err, RouterError::InvalidParameter { ref name, .. } if name == "ledger_id"));
    }

    #[test]
    fn test_build_round_trip() {
        let pattern = PathPattern::parse("/ledger/:ledger_id/accounts/:account_id/register").unwrap();
        for path in ["/ledger/42/accounts/7/register", "/ledger/main-books/accounts/Assets_Cash/register"] {
            let parts = path_segments(path);
            let bound = pattern.matches(&parts).unwrap().unwrap();
            assert_eq!(pattern.build(&bound).unwrap(), path);
        }
    }

    #[test]
    fn test_build_encodes_values() {
        let pattern = PathPattern::parse("/ledger/:ledger_id").unwrap();
        assert_eq!(
            pattern.build(&params(&[("ledger_id", "a/b c")])).unwrap(),
            "/ledger/a%2Fb%20c"
        );
    }

    #[test]
    fn test_build_keeps_legal_segment_characters() {
        let pattern = PathPattern::parse("/ledger/:ledger_id").unwrap();
        assert_eq!(
            pattern.build(&params(&[("ledger_id", "Assets:Cash@Bank,EUR;a=b+c")])).unwrap(),
            "/ledger/Assets:Cash@Bank,EUR;a=b+c"
        );
        assert_eq!(
            pattern.build(&params(&[("ledger_id", "50%?#é")])).unwrap(),
            "/ledger/50%25%3F%23%C3%A9"
        );
    }

    #[test]
    fn test_build_missing_or_empty_param() {
        let pattern = PathPattern::parse("/ledger/:ledger_id").unwrap();
        let err = pattern.build(&Params::new()).unwrap_err();
        assert!(matches!(err, RouterError::InvalidParameter { ref reason, .. } if reason == "missing"));

        let err = pattern.build(&params(&[("ledger_id", "")])).unwrap_err();
        assert!(matches!(err, RouterError::InvalidParameter { ref reason, .. } if reason == "empty"));
    }

    #[test]
    fn test_rank_prefers_literals() {
        let literal = PathPattern::parse("/ledger/new").unwrap();
        let param = PathPattern::parse("/ledger/:ledger_id").unwrap();
        assert!(literal.rank() > param.rank());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/ledger/42/"), "/ledger/42");
        assert_eq!(normalize_path("ledger/42"), "/ledger/42");
        assert_eq!(normalize_path("//ledger//42"), "/ledger/42");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/ledger/42?tab=1#top"), "/ledger/42");
    }

    #[test]
    fn test_split_location_and_query() {
        assert_eq!(split_location("/a?x=1#h"), ("/a", Some("x=1")));
        assert_eq!(split_location("/a#h?x=1"), ("/a", None));

        let query = parse_query("q=cash+flow&page=2&flag");
        assert_eq!(query.get("q").map(String::as_str), Some("cash flow"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
        assert_eq!(query.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn test_strip_base() {
        assert_eq!(strip_base("/", "/ledger/1"), Some("/ledger/1"));
        assert_eq!(strip_base("/app/", "/app/ledger/1"), Some("/ledger/1"));
        assert_eq!(strip_base("/app", "/app"), Some(""));
        assert_eq!(strip_base("/app", "/application"), None);
        assert_eq!(strip_base("/app", "/other"), None);
    }
}
