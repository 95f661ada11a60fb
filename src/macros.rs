#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`Rule`](crate::Rule) with deterministic timestamps.
///
/// `modified` is epoch milliseconds and defaults to 0; `created` mirrors it.
#[macro_export]
macro_rules! rule {
    (
        id: $id:expr,
        pattern: $pattern:expr,
        match_type: $match_type:ident
        $(, rule_type: $rule_type:ident)?
        $(, container: $container:expr)?
        $(, priority: $priority:expr)?
        $(, modified: $modified:expr)?
        $(, enabled: $enabled:expr)?
        $(,)?
    ) => {{
        let mut rule = $crate::Rule::new($id, $pattern, $crate::MatchType::$match_type);
        $(rule.rule_type = $crate::RuleType::$rule_type;)?
        $(rule.container_id = Some(::std::string::String::from($container));)?
        $(rule.priority = Some($priority);)?
        rule.modified = $crate::timestamp_millis({ 0 $(+ $modified)? });
        rule.created = rule.modified;
        $(rule.enabled = $enabled;)?
        rule
    }};
}
