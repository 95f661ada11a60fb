//! URL pre-classification.
//!
//! Before a URL is run against a compiled rule set it is scanned once to
//! extract the coarse signals the matchers need:
//!
//! - **Host**: lowercase host from the `url` crate, used by domain rules and
//!   by the domain index in `compiled_rules.rs`.
//! - **Host suffixes**: the host and every parent domain (`a.b.c`, `b.c`,
//!   `c`), used to look domain rules up without scanning all of them.
//!
//! Parsing is skipped entirely when the rule set carries no domain rules.
//! URLs the `url` crate rejects simply have no host; exact, wildcard and
//! regex rules still see the raw string.

/// Signals derived from one candidate URL.
#[derive(Debug, Clone)]
pub struct UrlInfo<'a> {
    pub raw: &'a str,
    pub host: Option<String>,
}

impl<'a> UrlInfo<'a> {
    /// Scan `raw`, parsing out the host.
    pub fn scan(raw: &'a str) -> Self {
        Self::scan_with(raw, true)
    }

    pub fn scan_with(raw: &'a str, want_host: bool) -> Self {
        let host = if want_host { host_of(raw) } else { None };
        UrlInfo { raw, host }
    }

    /// The host followed by each parent domain, most specific first.
    pub fn host_suffixes(&self) -> impl Iterator<Item = &str> {
        let host = self.host.as_deref().unwrap_or("");
        let mut rest = Some(host).filter(|h| !h.is_empty());
        std::iter::from_fn(move || {
            let current = rest?;
            rest = current.split_once('.').map(|(_, tail)| tail).filter(|tail| !tail.is_empty());
            Some(current)
        })
    }
}

fn host_of(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() { None } else { Some(host) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_extracts_lowercase_host() {
        let info = UrlInfo::scan("https://Docs.Example.COM:8443/a?b#c");
        assert_eq!(info.host.as_deref(), Some("docs.example.com"));
        assert_eq!(info.raw, "https://Docs.Example.COM:8443/a?b#c");
    }

    #[test]
    fn scan_without_host_skips_parsing() {
        let info = UrlInfo::scan_with("https://example.com", false);
        assert!(info.host.is_none());
    }

    #[test]
    fn urls_without_host_yield_no_suffixes() {
        assert!(UrlInfo::scan("about:blank").host.is_none());
        assert!(UrlInfo::scan("not a url").host_suffixes().next().is_none());
    }

    #[test]
    fn suffixes_walk_towards_the_root() {
        let info = UrlInfo::scan("https://a.b.example.com/");
        let suffixes: Vec<&str> = info.host_suffixes().collect();
        assert_eq!(suffixes, vec!["a.b.example.com", "b.example.com", "example.com", "com"]);
    }
}
