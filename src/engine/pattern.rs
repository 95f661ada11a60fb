//! Pattern matching for a single rule.
//!
//! A rule's `pattern` is interpreted according to its [`MatchType`]:
//!
//! ```text
//! exact    -> full URL == pattern                 (case-sensitive)
//! domain   -> host == d || host ends with ".d"    (d = normalized pattern)
//! wildcard -> ^glob$ over the full URL            (case-insensitive, * and ?)
//! regex    -> Regex::is_match over the full URL   (as written)
//! ```
//!
//! Patterns are compiled once into a [`CompiledPattern`]. Compilation is the
//! only fallible step; callers on the routing path turn failures into
//! diagnostics so a broken rule simply never matches.

use super::scan::UrlInfo;
use crate::{Error, MatchType, Result, Rule};
use regex::Regex;

/// A rule pattern ready to be applied to URLs.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Exact(String),
    /// Normalized domain (lowercase, no scheme, no leading `*.`).
    Domain(String),
    /// Compiled form of both wildcard and regex rules.
    Regex(Regex),
}

impl CompiledPattern {
    /// Compile `rule.pattern` for `rule.match_type`.
    ///
    /// Returns [`Error::EmptyPattern`] when nothing usable is left after
    /// normalization and [`Error::MalformedPattern`] when the regex does not
    /// compile.
    pub fn compile(rule: &Rule) -> Result<Self> {
        let pattern = rule.pattern.trim();
        if pattern.is_empty() {
            return Err(Error::EmptyPattern { rule_id: rule.id.clone() });
        }

        let malformed = |source| Error::MalformedPattern {
            rule_id: rule.id.clone(),
            pattern: pattern.to_string(),
            source,
        };

        match rule.match_type {
            MatchType::Exact => Ok(CompiledPattern::Exact(pattern.to_string())),
            MatchType::Domain => {
                let domain = normalize_domain(pattern);
                if domain.is_empty() {
                    return Err(Error::EmptyPattern { rule_id: rule.id.clone() });
                }
                Ok(CompiledPattern::Domain(domain))
            }
            MatchType::Wildcard => Regex::new(&wildcard_to_regex(pattern)).map(CompiledPattern::Regex).map_err(malformed),
            MatchType::Regex => Regex::new(pattern).map(CompiledPattern::Regex).map_err(malformed),
        }
    }

    /// Match against a URL whose host has already been extracted.
    pub fn is_match(&self, url: &UrlInfo<'_>) -> bool {
        match self {
            CompiledPattern::Exact(expected) => url.raw == expected.as_str(),
            CompiledPattern::Domain(domain) => url.host.as_deref().is_some_and(|host| host_matches(domain, host)),
            CompiledPattern::Regex(re) => re.is_match(url.raw),
        }
    }

    pub fn is_match_str(&self, url: &str) -> bool {
        self.is_match(&UrlInfo::scan(url))
    }
}

/// Evaluate one rule against one URL.
///
/// Never fails: a pattern that does not compile is logged and treated as
/// non-matching. The `enabled` flag is not consulted here; that is the
/// resolver's job.
pub fn matches(url: &str, rule: &Rule) -> bool {
    match CompiledPattern::compile(rule) {
        Ok(pattern) => pattern.is_match_str(url),
        Err(err) => {
            tracing::warn!(rule_id = %rule.id, pattern = %rule.pattern, "{err}");
            false
        }
    }
}

/// Reduce a domain pattern to a bare host in the form the `url` crate reports
/// hosts: lowercase, internationalized labels in punycode.
///
/// Accepts the forms people actually type: `Example.com`, `*.example.com`,
/// `.example.com`, `https://example.com/path`, `example.com:8080`,
/// `bücher.de`.
pub(crate) fn normalize_domain(pattern: &str) -> String {
    let lower = pattern.trim().to_lowercase();
    let re = crate::regex!(r"^(?:[a-z][a-z0-9+.\-]*://)?(?:\*?\.)?([^/:?#]*)");
    let host = re.captures(&lower).and_then(|c| c.get(1)).map_or("", |m| m.as_str());
    let host = host.trim_end_matches('.');
    match url::Host::parse(host) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => host.to_string(),
    }
}

/// `host` is `domain` or one of its subdomains.
pub(crate) fn host_matches(domain: &str, host: &str) -> bool {
    if host == domain {
        return true;
    }
    host.len() > domain.len() && host.ends_with(domain) && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

/// Translate a glob into an anchored, case-insensitive regex.
fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str("(?i)^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                out.push_str(&regex::escape(&literal));
                literal.clear();
                out.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    out.push_str(&regex::escape(&literal));
    out.push('$');
    out
}
