//! Duplicate rule detection.
//!
//! Two rules are duplicates when they route exactly the same way: same
//! normalized pattern, match type, rule type and target container. This
//! module defines `DuplicateKey`, the hashable form of that tuple, and the
//! grouping built on top of it.
//!
//! ## What counts as "the same rule"
//!
//! - Pattern: trimmed and lowercased.
//! - Match type and rule type: compared as-is.
//! - Container: compared as-is, absent treated as `""`.
//!
//! Priority, enabled state and timestamps are ignored: they decide which
//! duplicate to keep, not whether rules are duplicates.
//!
//! ## Ordering
//!
//! Groups come out in the order their first member appears in the input, and
//! members keep input order inside a group. Nothing here sorts or deletes;
//! [`suggest_rules_to_keep`] only recommends.

use super::resolve::strongest;
use crate::{MatchType, Rule, RuleType};
use serde::Serialize;
use std::collections::HashMap;

/// Routing-equivalence key of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub pattern: String,
    pub match_type: MatchType,
    pub rule_type: RuleType,
    pub container_id: String,
}

impl DuplicateKey {
    pub fn from_rule(rule: &Rule) -> Self {
        DuplicateKey {
            pattern: rule.pattern.trim().to_lowercase(),
            match_type: rule.match_type,
            rule_type: rule.rule_type,
            container_id: rule.container_id.clone().unwrap_or_default(),
        }
    }

    /// Synthetic group id, stable for a given key. `|` separates the parts;
    /// `\` and `|` inside the pattern and container id are backslash-escaped,
    /// so distinct keys never share an id.
    pub fn group_id(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            escape_id_part(&self.pattern),
            self.match_type.as_str(),
            self.rule_type.as_str(),
            escape_id_part(&self.container_id)
        )
    }
}

fn escape_id_part(part: &str) -> String {
    part.replace('\\', "\\\\").replace('|', "\\|")
}

/// Two or more routing-equivalent rules. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub id: String,
    pub rules: Vec<Rule>,
    pub pattern: String,
    pub match_type: MatchType,
    pub rule_type: RuleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
}

/// Keep/remove recommendation for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct KeepSuggestion<'g> {
    pub group_id: &'g str,
    pub keep: &'g Rule,
    pub remove: Vec<&'g Rule>,
}

/// Partition `rules` into duplicate groups of two or more members.
pub fn find_duplicate_rules(rules: &[Rule]) -> Vec<DuplicateGroup> {
    let mut slots: HashMap<DuplicateKey, usize> = HashMap::new();
    let mut buckets: Vec<(DuplicateKey, Vec<&Rule>)> = Vec::new();

    for rule in rules {
        let key = DuplicateKey::from_rule(rule);
        match slots.get(&key) {
            Some(&slot) => buckets[slot].1.push(rule),
            None => {
                slots.insert(key.clone(), buckets.len());
                buckets.push((key, vec![rule]));
            }
        }
    }

    let groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, members)| DuplicateGroup {
            id: key.group_id(),
            pattern: key.pattern,
            match_type: key.match_type,
            rule_type: key.rule_type,
            container_id: members[0].container_id.clone(),
            rules: members.into_iter().cloned().collect(),
        })
        .collect();

    tracing::debug!(rules = rules.len(), groups = groups.len(), "duplicate scan finished");
    groups
}

/// Number of rules that would be removed if every group kept one rule.
pub fn get_duplicate_count(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(|g| g.rules.len().saturating_sub(1)).sum()
}

/// Pick the rule to keep in `group` using the resolver's precedence
/// (priority, then recency, then input order). Everything else is
/// recommended for removal.
pub fn suggest_rules_to_keep(group: &DuplicateGroup) -> Option<KeepSuggestion<'_>> {
    let keep = strongest(&group.rules)?;
    let remove = group.rules.iter().filter(|r| !std::ptr::eq(*r, keep)).collect();
    Some(KeepSuggestion { group_id: &group.id, keep, remove })
}

/// [`suggest_rules_to_keep`] for every group, in group order.
pub fn suggest_all(groups: &[DuplicateGroup]) -> Vec<KeepSuggestion<'_>> {
    groups.iter().filter_map(suggest_rules_to_keep).collect()
}
