use super::*;
use crate::{BookmarkNode, Rule, rule};

fn scenario_tree() -> Vec<BookmarkNode> {
    let mut without_url = BookmarkNode::bookmark("bookmark-without-url", "No URL", "");
    without_url.url = None;

    vec![
        BookmarkNode::folder(
            "root-folder",
            "Root",
            vec![
                BookmarkNode::bookmark("bookmark-1", "One", "https://one.test"),
                BookmarkNode::folder(
                    "nested-folder",
                    "Nested",
                    vec![BookmarkNode::bookmark("bookmark-2", "Two", "https://two.test")],
                ),
            ],
        ),
        BookmarkNode::bookmark("bookmark-3", "Three", "https://three.test"),
        without_url,
    ]
}

fn ids(rules: &[Rule]) -> Vec<&str> {
    rules.iter().map(|r| r.id.as_str()).collect()
}

#[test]
fn higher_priority_domain_rule_wins() {
    let rules = vec![
        rule!(id: "p1", pattern: "example.com", match_type: Domain, priority: 1),
        rule!(id: "p5", pattern: "example.com", match_type: Domain, priority: 5),
    ];
    assert_eq!(resolve("https://example.com/x", &rules).unwrap().id, "p5");
}

#[test]
fn resolver_and_keep_suggestion_agree_on_ties() {
    let rules = vec![
        rule!(id: "older", pattern: "example.com", match_type: Domain, priority: 2, modified: 1_000),
        rule!(id: "newer", pattern: "example.com", match_type: Domain, priority: 2, modified: 2_000),
    ];

    let resolved = resolve("https://example.com/", &rules).unwrap();
    let groups = find_duplicate_rules(&rules);
    let suggestion = suggest_rules_to_keep(&groups[0]).unwrap();

    assert_eq!(resolved.id, "newer");
    assert_eq!(suggestion.keep.id, resolved.id);
}

#[test]
fn flatten_and_folder_ids_follow_pre_order() {
    let tree = scenario_tree();
    let flat: Vec<&str> = flatten_bookmark_tree(&tree).iter().map(|n| n.id.as_str()).collect();

    assert_eq!(flat, vec!["bookmark-1", "bookmark-2", "bookmark-3"]);
    assert_eq!(get_folder_ids(&tree), vec!["root-folder", "nested-folder"]);
}

#[test]
fn nested_folder_selection_adds_nothing() {
    let tree = scenario_tree();
    let single = get_bookmark_ids_in_folder(&tree, "root-folder");
    let both = get_bookmark_ids_in_folders(&tree, &["root-folder", "nested-folder"]);

    assert_eq!(both, single);
    let unique: std::collections::HashSet<&str> = both.iter().copied().collect();
    assert_eq!(unique.len(), both.len());
}

#[test]
fn container_is_part_of_the_duplicate_key() {
    let rules = vec![
        rule!(id: "a", pattern: "example.com", match_type: Domain, container: "work"),
        rule!(id: "b", pattern: "example.com", match_type: Domain, container: "personal"),
    ];
    assert!(find_duplicate_rules(&rules).is_empty());
}

#[test]
fn duplicate_groups_follow_first_occurrence_order() {
    let rules = vec![
        rule!(id: "z1", pattern: "zeta.test", match_type: Domain),
        rule!(id: "a1", pattern: "alpha.test", match_type: Domain),
        rule!(id: "solo", pattern: "solo.test", match_type: Domain),
        rule!(id: "a2", pattern: "alpha.test", match_type: Domain),
        rule!(id: "z2", pattern: "ZETA.test", match_type: Domain),
        rule!(id: "a3", pattern: "alpha.test", match_type: Domain),
    ];
    let groups = find_duplicate_rules(&rules);

    assert_eq!(groups.len(), 2);
    assert_eq!(ids(&groups[0].rules), vec!["z1", "z2"]);
    assert_eq!(ids(&groups[1].rules), vec!["a1", "a2", "a3"]);
    assert!(groups.iter().all(|g| g.rules.len() >= 2));
    assert_eq!(get_duplicate_count(&groups), groups.iter().map(|g| g.rules.len() - 1).sum::<usize>());
    assert_eq!(get_duplicate_count(&groups), 3);
}

#[test]
fn every_group_member_derives_the_same_key() {
    let rules = vec![
        rule!(id: "a", pattern: "Example.com", match_type: Wildcard, container: "c"),
        rule!(id: "b", pattern: " example.com", match_type: Wildcard, container: "c"),
        rule!(id: "c", pattern: "example.COM ", match_type: Wildcard, container: "c"),
    ];
    for group in find_duplicate_rules(&rules) {
        let key = DuplicateKey::from_rule(&group.rules[0]);
        assert_eq!(key.group_id(), group.id);
        for member in &group.rules[1..] {
            assert_eq!(DuplicateKey::from_rule(member), key);
        }
    }
}

#[test]
fn empty_inputs_are_not_errors() {
    assert!(resolve("https://example.com", &[]).is_none());
    assert!(find_duplicate_rules(&[]).is_empty());
    assert_eq!(get_duplicate_count(&[]), 0);
    assert!(flatten_bookmark_tree(&[]).is_empty());
    assert!(get_bookmark_ids_in_folders::<&str>(&[], &[]).is_empty());
}
