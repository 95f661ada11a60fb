use routemark::store::{ContainerStore, find_dangling_metadata, find_unknown_container_refs};
use routemark::{
    BookmarkView, CompiledRules, NavigationDecision, NodeType, ResolveTrace, Rule, Snapshot, find_duplicate_rules,
    get_duplicate_count, suggest_all,
};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
        if self.enabled { format!("{}{}{}", color, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn bold(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::BOLD, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn dim(&self, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{}{}{}", ansi::DIM, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn section(&self, title: &str) {
        println!("\n{}", self.paint(format!("━━━ {title} ━━━"), ansi::GRAY));
    }
}

pub fn print_summary(snapshot: &Snapshot, compiled: &CompiledRules<'_>, palette: &Palette) {
    let enabled = snapshot.rules.iter().filter(|r| r.enabled).count();
    println!(
        "\n{}",
        palette.bold(palette.paint(
            format!(
                "⚙  {} rules ({} enabled) │ {} containers │ {} bookmark records │ {} folder records",
                snapshot.rules.len(),
                enabled,
                snapshot.containers.len(),
                snapshot.bookmark_metadata.len(),
                snapshot.folder_metadata.len()
            ),
            ansi::CYAN
        ))
    );

    if compiled.diagnostics().is_empty() {
        return;
    }

    palette.section("Rule diagnostics");
    for diag in compiled.diagnostics() {
        println!(
            "  {} {} {}",
            palette.paint("✗", ansi::RED),
            palette.paint(&diag.rule_id, ansi::BLUE),
            palette.dim(format!("{:?}: {}", diag.kind, diag.message))
        );
    }
}

pub fn print_resolution(url: &str, trace: &ResolveTrace<'_>, decision: &NavigationDecision, palette: &Palette) {
    palette.section(&format!("Route {url}"));
    println!(
        "  {} {}  {} {}  {} {}",
        palette.dim("host:"),
        palette.paint(trace.host.as_deref().unwrap_or("-"), ansi::YELLOW),
        palette.dim("considered:"),
        palette.paint(trace.considered.to_string(), ansi::YELLOW),
        palette.dim("matched:"),
        palette.paint(trace.matched.len().to_string(), ansi::YELLOW),
    );

    for rule in &trace.matched {
        let marker = if trace.winner.is_some_and(|w| std::ptr::eq(w, *rule)) { "▶" } else { " " };
        println!("  {} {}", palette.paint(marker, ansi::GREEN), fmt_rule(rule, palette));
    }

    let verdict = match decision {
        NavigationDecision::Default => palette.dim("default (no rule matched)"),
        NavigationDecision::OpenIn { container_id, cookie_store_id, .. } => {
            palette.paint(format!("open in {container_id} ({cookie_store_id})"), ansi::GREEN)
        }
        NavigationDecision::BreakOut { .. } => palette.paint("open outside containers", ansi::YELLOW),
        NavigationDecision::UnknownContainer { container_id, .. } => {
            palette.paint(format!("unknown container {container_id}"), ansi::RED)
        }
    };
    println!("  {} {}  {}", palette.dim("→"), verdict, palette.dim(format!("({:?})", trace.elapsed)));
}

pub fn print_duplicates(rules: &[Rule], palette: &Palette) {
    let groups = find_duplicate_rules(rules);
    palette.section("Duplicates");
    if groups.is_empty() {
        println!("{}", palette.dim("  No duplicate rules"));
        return;
    }

    for suggestion in suggest_all(&groups) {
        println!("  {}", palette.paint(suggestion.group_id, ansi::BLUE));
        println!("    {} {}", palette.paint("keep  ", ansi::GREEN), fmt_rule(suggestion.keep, palette));
        for rule in &suggestion.remove {
            println!("    {} {}", palette.paint("remove", ansi::RED), fmt_rule(rule, palette));
        }
    }
    println!(
        "\n  {} group(s), {} removable rule(s)",
        palette.bold(groups.len().to_string()),
        palette.bold(get_duplicate_count(&groups).to_string())
    );
}

pub fn print_tree(views: &[BookmarkView], snapshot: &Snapshot, palette: &Palette) {
    palette.section("Bookmarks");
    if views.is_empty() {
        println!("{}", palette.dim("  No bookmarks"));
        return;
    }

    let mut stack: Vec<(usize, &BookmarkView)> = views.iter().rev().map(|v| (0, v)).collect();
    while let Some((depth, view)) = stack.pop() {
        let indent = "  ".repeat(depth + 1);
        match view.node_type {
            NodeType::Folder => {
                let inherit = if view.inherit_settings == Some(true) { " ⇣" } else { "" };
                println!("{indent}{}{}", palette.bold(&view.title), palette.dim(inherit));
            }
            NodeType::Separator => println!("{indent}{}", palette.dim("────")),
            NodeType::Bookmark => println!("{indent}{}", fmt_bookmark(view, snapshot, palette)),
        }
        stack.extend(view.children.iter().rev().map(|child| (depth + 1, child)));
    }
}

pub fn print_dangling(snapshot: &Snapshot, palette: &Palette) {
    palette.section("Dangling references");
    let bookmarks = find_dangling_metadata(&snapshot.bookmarks, &snapshot.bookmark_store());
    let folders = find_dangling_metadata(&snapshot.bookmarks, &snapshot.folder_store());
    let rules = find_unknown_container_refs(&snapshot.rules, snapshot);

    if bookmarks.is_empty() && folders.is_empty() && rules.is_empty() {
        println!("{}", palette.dim("  None"));
        return;
    }

    for id in &bookmarks {
        println!("  {} {}", palette.dim("bookmark metadata"), palette.paint(id, ansi::YELLOW));
    }
    for id in &folders {
        println!("  {} {}", palette.dim("folder metadata  "), palette.paint(id, ansi::YELLOW));
    }
    for rule in rules {
        println!("  {} {}", palette.dim("rule container   "), fmt_rule(rule, palette));
    }
}

fn fmt_rule(rule: &Rule, palette: &Palette) -> String {
    let priority = rule.priority.map_or_else(|| "-".to_string(), |p| p.to_string());
    let state = if rule.enabled { "" } else { " (disabled)" };
    format!(
        "{} {} {} {} {}{}",
        palette.paint(&rule.id, ansi::CYAN),
        palette.dim(format!("{}/{}", rule.match_type.as_str(), rule.rule_type.as_str())),
        palette.bold(&rule.pattern),
        palette.dim(format!("→ {}", rule.container_id.as_deref().unwrap_or("∅"))),
        palette.dim(format!("p={priority} m={}", rule.modified.format("%Y-%m-%d %H:%M:%S"))),
        palette.dim(state),
    )
}

fn fmt_bookmark(view: &BookmarkView, snapshot: &Snapshot, palette: &Palette) -> String {
    let mut out = format!("{} {}", view.title, palette.dim(view.url.as_deref().unwrap_or("")));
    if let Some(id) = view.container_id.as_deref() {
        let source = if view.inherited_from.is_some() { "inherited" } else { "assigned" };
        out.push_str(&format!(" {}", palette.paint(format!("[{source}: {}]", snapshot.lookup(id).display_name()), ansi::GREEN)));
    }
    if let Some(id) = view.matched_container.as_deref() {
        out.push_str(&format!(" {}", palette.paint(format!("[rule: {}]", snapshot.lookup(id).display_name()), ansi::BLUE)));
    }
    if !view.tags.is_empty() {
        out.push_str(&format!(" {}", palette.dim(format!("#{}", view.tags.join(" #")))));
    }
    out
}
