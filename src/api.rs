use crate::engine::{self, CompiledRules, ViewFields};
use crate::store::{ContainerLookup, ContainerStore, MetadataStore};
use crate::{BookmarkMetadata, BookmarkNode, BookmarkView, FolderMetadata, Rule, RuleType};

/// Options that affect how the combined view is built.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Computed fields to fill in; all of them by default.
    pub fields: ViewFields,
}

/// What the navigation interceptor should do with a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// No enabled rule matched; keep the browser's default behavior.
    Default,
    /// Reopen in the container behind `cookie_store_id`.
    OpenIn { rule_id: String, container_id: String, cookie_store_id: String },
    /// Open outside any container (exclude rule, or a rule without one).
    BreakOut { rule_id: String },
    /// The winning rule names a container the store no longer has.
    UnknownContainer { rule_id: String, container_id: String },
}

/// Decide how to open `url`.
///
/// # Example
/// ```
/// use routemark::{CompiledRules, Container, NavigationDecision, Rule, MatchType, route_navigation, timestamp_millis};
///
/// let mut rule = Rule::new("r1", "example.com", MatchType::Domain);
/// rule.container_id = Some("work".into());
/// let rules = vec![rule];
/// let containers = vec![Container {
///     id: "work".into(),
///     name: "Work".into(),
///     icon: "briefcase".into(),
///     color: "blue".into(),
///     cookie_store_id: "firefox-container-1".into(),
///     created: timestamp_millis(0),
///     modified: timestamp_millis(0),
///     temporary: false,
///     sync_enabled: false,
/// }];
///
/// let compiled = CompiledRules::new(&rules);
/// let decision = route_navigation("https://www.example.com/", &compiled, &containers);
/// assert!(matches!(decision, NavigationDecision::OpenIn { ref cookie_store_id, .. } if cookie_store_id == "firefox-container-1"));
/// ```
pub fn route_navigation<C: ContainerStore + ?Sized>(
    url: &str,
    rules: &CompiledRules<'_>,
    containers: &C,
) -> NavigationDecision {
    let Some(rule) = rules.resolve(url) else {
        return NavigationDecision::Default;
    };

    let container_id = match (rule.rule_type, rule.container_id.as_deref()) {
        (RuleType::Exclude, _) | (_, None) => return NavigationDecision::BreakOut { rule_id: rule.id.clone() },
        (_, Some(id)) => id,
    };

    match containers.lookup(container_id) {
        ContainerLookup::Found(container) => NavigationDecision::OpenIn {
            rule_id: rule.id.clone(),
            container_id: container.id.clone(),
            cookie_store_id: container.cookie_store_id.clone(),
        },
        ContainerLookup::Missing(id) => {
            tracing::warn!(rule_id = %rule.id, container_id = id, "rule targets an unknown container");
            NavigationDecision::UnknownContainer { rule_id: rule.id.clone(), container_id: id.to_string() }
        }
    }
}

/// Combined view of `tree` with every computed field.
pub fn combine<B, F>(tree: &[BookmarkNode], bookmarks: &B, folders: &F, rules: &[Rule]) -> Vec<BookmarkView>
where
    B: MetadataStore<BookmarkMetadata> + ?Sized,
    F: MetadataStore<FolderMetadata> + ?Sized,
{
    combine_with(tree, bookmarks, folders, &CompiledRules::new(rules), &Options::default())
}

/// Combined view of `tree` using an already compiled rule set.
pub fn combine_with<B, F>(
    tree: &[BookmarkNode],
    bookmarks: &B,
    folders: &F,
    rules: &CompiledRules<'_>,
    options: &Options,
) -> Vec<BookmarkView>
where
    B: MetadataStore<BookmarkMetadata> + ?Sized,
    F: MetadataStore<FolderMetadata> + ?Sized,
{
    engine::combine_view(tree, bookmarks, folders, rules, options.fields)
}
