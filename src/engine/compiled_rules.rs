//! Rule compilation and indexing.
//!
//! This module holds the *static* side of routing: the structures derived
//! from the full rule list that make repeated URL queries cheap and keep
//! broken rules out of the hot path.
//!
//! Routing is split into two phases:
//!
//! 1. **Compile/index rules** (this module): compile every pattern once
//!    (`pattern.rs`), record a [`Diagnostic`] for each one that fails, and
//!    index the enabled survivors.
//! 2. **Resolve** (see `resolve.rs`): scan the URL (`scan.rs`), collect the
//!    candidate rules from the index, run their patterns and apply the
//!    precedence policy.
//!
//! The index currently supports:
//!
//! - **Domain buckets** (`RuleIndex::by_domain`): domain rules keyed by their
//!   normalized domain, looked up with every suffix of the URL host.
//! - **Scanned rules** (`RuleIndex::scanned`): exact, wildcard and regex
//!   rules, which have to be tried one by one.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules` and
//!   `CompiledRules::patterns`. Those vectors stay aligned with the input
//!   slice, so sorting candidate ids restores input order.
//! - Disabled rules and rules without a compiled pattern are never indexed.

use super::pattern::CompiledPattern;
use super::scan::UrlInfo;
use crate::{Error, MatchType, Rule};
use std::collections::HashMap;

/// Rule identifier (index into the input slice).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Match kinds present among the indexed rules.
    ///
    /// Used to skip URL parsing when no domain rule could use the host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchTypeSet: u8 {
        const EXACT    = 1 << 0;
        const DOMAIN   = 1 << 1;
        const WILDCARD = 1 << 2;
        const REGEX    = 1 << 3;
    }
}

impl From<MatchType> for MatchTypeSet {
    fn from(match_type: MatchType) -> Self {
        match match_type {
            MatchType::Exact => MatchTypeSet::EXACT,
            MatchType::Domain => MatchTypeSet::DOMAIN,
            MatchType::Wildcard => MatchTypeSet::WILDCARD,
            MatchType::Regex => MatchTypeSet::REGEX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    EmptyPattern,
    MalformedPattern,
}

/// A rule that was skipped because its pattern is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub rule_id: String,
    pub pattern: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    fn from_error(rule: &Rule, err: &Error) -> Self {
        let kind = match err {
            Error::MalformedPattern { .. } => DiagnosticKind::MalformedPattern,
            _ => DiagnosticKind::EmptyPattern,
        };
        Diagnostic { rule_id: rule.id.clone(), pattern: rule.pattern.clone(), kind, message: err.to_string() }
    }
}

#[derive(Default, Debug)]
pub struct RuleIndex {
    pub by_domain: HashMap<String, Vec<RuleId>>,
    pub scanned: Vec<RuleId>,
}

/// Pre-compiled rule set with diagnostics and a domain index.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub rules: Vec<&'a Rule>,
    pub patterns: Vec<Option<CompiledPattern>>,
    pub index: RuleIndex,
    pub kinds: MatchTypeSet,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> CompiledRules<'a> {
    /// Compile a rule set.
    ///
    /// Every rule is compiled, enabled or not, so that operators see
    /// diagnostics for rules they might re-enable later.
    pub fn new(rules: &'a [Rule]) -> Self {
        let mut patterns = Vec::with_capacity(rules.len());
        let mut diagnostics = Vec::new();
        let mut index = RuleIndex::default();
        let mut kinds = MatchTypeSet::empty();

        for (id, rule) in rules.iter().enumerate() {
            let compiled = match CompiledPattern::compile(rule) {
                Ok(compiled) => compiled,
                Err(err) => {
                    tracing::warn!(rule_id = %rule.id, pattern = %rule.pattern, "skipping rule: {err}");
                    diagnostics.push(Diagnostic::from_error(rule, &err));
                    patterns.push(None);
                    continue;
                }
            };

            if rule.enabled {
                kinds |= MatchTypeSet::from(rule.match_type);
                match &compiled {
                    CompiledPattern::Domain(domain) => index.by_domain.entry(domain.clone()).or_default().push(id),
                    _ => index.scanned.push(id),
                }
            }
            patterns.push(Some(compiled));
        }

        CompiledRules { rules: rules.iter().collect(), patterns, index, kinds, diagnostics }
    }

    /// Rules skipped because their pattern could not be compiled.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn scan<'u>(&self, url: &'u str) -> UrlInfo<'u> {
        UrlInfo::scan_with(url, self.kinds.contains(MatchTypeSet::DOMAIN))
    }

    /// Ids of the enabled rules that could match `url`, in input order.
    pub(crate) fn candidates(&self, url: &UrlInfo<'_>) -> Vec<RuleId> {
        let mut ids: Vec<RuleId> = url
            .host_suffixes()
            .filter_map(|suffix| self.index.by_domain.get(suffix))
            .flatten()
            .chain(self.index.scanned.iter())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Enabled rules whose pattern matches `url`, in input order.
    pub(crate) fn matching(&self, url: &UrlInfo<'_>) -> (usize, Vec<RuleId>) {
        let candidates = self.candidates(url);
        let considered = candidates.len();
        let matched = candidates
            .into_iter()
            .filter(|&id| self.patterns[id].as_ref().is_some_and(|p| p.is_match(url)))
            .collect();
        (considered, matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule;

    #[test]
    fn broken_rules_become_diagnostics() {
        let rules = vec![
            rule!(id: "ok", pattern: "example.com", match_type: Domain),
            rule!(id: "bad", pattern: "([a-z]", match_type: Regex),
            rule!(id: "empty", pattern: "  ", match_type: Exact),
        ];
        let compiled = CompiledRules::new(&rules);

        let diags = compiled.diagnostics();
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].rule_id, "bad");
        assert_eq!(diags[0].kind, DiagnosticKind::MalformedPattern);
        assert_eq!(diags[1].rule_id, "empty");
        assert_eq!(diags[1].kind, DiagnosticKind::EmptyPattern);
        assert!(compiled.patterns[1].is_none());
        assert_eq!(compiled.kinds, MatchTypeSet::DOMAIN);
    }

    #[test]
    fn disabled_rules_are_compiled_but_not_indexed() {
        let rules = vec![
            rule!(id: "off", pattern: "(", match_type: Regex, enabled: false),
            rule!(id: "off-ok", pattern: "example.com", match_type: Domain, enabled: false),
        ];
        let compiled = CompiledRules::new(&rules);

        assert_eq!(compiled.diagnostics().len(), 1);
        assert!(compiled.index.by_domain.is_empty());
        assert!(compiled.index.scanned.is_empty());
        assert!(compiled.kinds.is_empty());
    }

    #[test]
    fn candidates_come_back_in_input_order() {
        let rules = vec![
            rule!(id: "glob", pattern: "*", match_type: Wildcard),
            rule!(id: "sub", pattern: "mail.example.com", match_type: Domain),
            rule!(id: "other", pattern: "other.org", match_type: Domain),
            rule!(id: "root", pattern: "example.com", match_type: Domain),
        ];
        let compiled = CompiledRules::new(&rules);
        let url = compiled.scan("https://mail.example.com/");

        assert_eq!(compiled.candidates(&url), vec![0, 1, 3]);
    }

    #[test]
    fn host_is_not_parsed_without_domain_rules() {
        let rules = vec![rule!(id: "glob", pattern: "https://*", match_type: Wildcard)];
        let compiled = CompiledRules::new(&rules);
        assert!(compiled.scan("https://example.com").host.is_none());
    }
}
