//! Rule resolution.
//!
//! Given a URL and a rule set, pick the single rule that decides the URL's
//! container:
//!
//! ```text
//! rules ──▶ enabled + compiled (compiled_rules.rs)
//!       ──▶ pattern matches URL (pattern.rs)
//!       ──▶ highest priority
//!       ──▶ most recently modified
//!       ──▶ earliest in input order
//! ```
//!
//! An absent priority ranks below every explicit one. The same ordering is
//! used by the duplicate detector when it suggests which rule of a group to
//! keep (`dedup.rs`), so operators see one consistent notion of "stronger
//! rule".

use super::compiled_rules::CompiledRules;
use super::metrics::ResolveTrace;
use crate::Rule;
use std::cmp::Ordering;
use std::time::Instant;

/// Compare two rules by precedence. `Greater` means `a` beats `b`.
///
/// Input order is not part of this comparison; callers keep the earlier rule
/// on `Equal`.
pub fn precedence(a: &Rule, b: &Rule) -> Ordering {
    a.priority.cmp(&b.priority).then_with(|| a.modified.cmp(&b.modified))
}

/// Strongest rule of `rules`; on a full tie the first one seen wins.
pub(crate) fn strongest<'r>(rules: impl IntoIterator<Item = &'r Rule>) -> Option<&'r Rule> {
    let mut best: Option<&Rule> = None;
    for rule in rules {
        match best {
            Some(current) if precedence(rule, current) != Ordering::Greater => {}
            _ => best = Some(rule),
        }
    }
    best
}

impl<'a> CompiledRules<'a> {
    /// The winning rule for `url`, or `None` when no enabled rule matches.
    pub fn resolve(&self, url: &str) -> Option<&'a Rule> {
        let info = self.scan(url);
        let (_, matched) = self.matching(&info);
        let winner = strongest(matched.into_iter().map(|id| self.rules[id]));
        tracing::debug!(url, winner = winner.map(|r| r.id.as_str()), "resolved");
        winner
    }

    /// Like [`resolve`](Self::resolve) but also reports the candidates and
    /// matches that led to the decision.
    pub fn resolve_with_trace(&self, url: &str) -> ResolveTrace<'a> {
        let started = Instant::now();
        let info = self.scan(url);
        let (considered, matched) = self.matching(&info);
        let matched: Vec<&'a Rule> = matched.into_iter().map(|id| self.rules[id]).collect();
        let winner = strongest(matched.iter().copied());

        ResolveTrace { host: info.host, considered, matched, winner, elapsed: started.elapsed() }
    }
}

/// Resolve `url` against `rules` in one shot.
///
/// Compiles the rule set on every call; use [`CompiledRules`] directly when
/// resolving many URLs against the same rules.
pub fn resolve<'r>(url: &str, rules: &'r [Rule]) -> Option<&'r Rule> {
    CompiledRules::new(rules).resolve(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule;

    #[test]
    fn no_rules_means_no_override() {
        assert!(resolve("https://example.com", &[]).is_none());
    }

    #[test]
    fn disabled_rules_never_win() {
        let rules = vec![
            rule!(id: "off", pattern: "example.com", match_type: Domain, priority: 100, enabled: false),
            rule!(id: "on", pattern: "example.com", match_type: Domain, priority: 1),
        ];
        assert_eq!(resolve("https://example.com/", &rules).map(|r| r.id.as_str()), Some("on"));

        let only_disabled = vec![rule!(id: "off", pattern: "example.com", match_type: Domain, enabled: false)];
        assert!(resolve("https://example.com/", &only_disabled).is_none());
    }

    #[test]
    fn higher_priority_beats_recency() {
        let rules = vec![
            rule!(id: "new", pattern: "*", match_type: Wildcard, priority: 1, modified: 9_000),
            rule!(id: "strong", pattern: "example.com", match_type: Domain, priority: 2, modified: 1_000),
        ];
        assert_eq!(resolve("https://example.com/", &rules).unwrap().id, "strong");
    }

    #[test]
    fn recency_breaks_priority_ties() {
        let rules = vec![
            rule!(id: "old", pattern: "example.com", match_type: Domain, priority: 3, modified: 1_000),
            rule!(id: "fresh", pattern: "https://example.com/*", match_type: Wildcard, priority: 3, modified: 2_000),
        ];
        assert_eq!(resolve("https://example.com/a", &rules).unwrap().id, "fresh");
    }

    #[test]
    fn input_order_breaks_full_ties() {
        let rules = vec![
            rule!(id: "first", pattern: "https://example.com/*", match_type: Wildcard, priority: 3, modified: 5),
            rule!(id: "second", pattern: "example.com", match_type: Domain, priority: 3, modified: 5),
        ];
        assert_eq!(resolve("https://example.com/a", &rules).unwrap().id, "first");

        let reversed: Vec<Rule> = rules.into_iter().rev().collect();
        assert_eq!(resolve("https://example.com/a", &reversed).unwrap().id, "second");
    }

    #[test]
    fn missing_priority_ranks_lowest() {
        let rules = vec![
            rule!(id: "unset", pattern: "example.com", match_type: Domain, modified: 99_999),
            rule!(id: "negative", pattern: "example.com", match_type: Domain, priority: -10, modified: 1),
        ];
        assert_eq!(resolve("https://example.com", &rules).unwrap().id, "negative");
    }

    #[test]
    fn malformed_rules_are_skipped_not_raised() {
        let rules = vec![
            rule!(id: "broken", pattern: "[", match_type: Regex, priority: 50),
            rule!(id: "fallback", pattern: "example.com", match_type: Domain),
        ];
        let compiled = CompiledRules::new(&rules);
        assert_eq!(compiled.resolve("https://example.com/").unwrap().id, "fallback");
        assert_eq!(compiled.diagnostics()[0].rule_id, "broken");
    }

    #[test]
    fn trace_reports_matches_and_winner() {
        let rules = vec![
            rule!(id: "a", pattern: "example.com", match_type: Domain, priority: 1),
            rule!(id: "b", pattern: "other.org", match_type: Domain, priority: 9),
            rule!(id: "c", pattern: "https://example.com/*", match_type: Wildcard, priority: 2),
        ];
        let compiled = CompiledRules::new(&rules);
        let trace = compiled.resolve_with_trace("https://example.com/x");

        assert_eq!(trace.host.as_deref(), Some("example.com"));
        assert_eq!(trace.considered, 2);
        assert_eq!(trace.matched.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(trace.winner.unwrap().id, "c");
    }

    #[test]
    fn resolution_is_deterministic() {
        let rules = vec![
            rule!(id: "a", pattern: "example.com", match_type: Domain, priority: 1, modified: 10),
            rule!(id: "b", pattern: "example.com", match_type: Domain, priority: 1, modified: 10),
            rule!(id: "c", pattern: ".*example.*", match_type: Regex, priority: 1, modified: 10),
        ];
        let compiled = CompiledRules::new(&rules);
        let first = compiled.resolve("https://www.example.com/").map(|r| r.id.clone());
        for _ in 0..20 {
            assert_eq!(compiled.resolve("https://www.example.com/").map(|r| r.id.clone()), first);
        }
        assert_eq!(first.as_deref(), Some("a"));
    }
}
