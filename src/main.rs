mod report;

use routemark::store::{BookmarkTreeProvider, RuleStore};
use routemark::{CompiledRules, Options, Snapshot, combine_with, route_navigation};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ROUTEMARK_LOG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(config.verbose);

    let snapshot = match load_snapshot(config.snapshot.as_deref()) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let palette = report::Palette::new(config.color);
    let compiled = CompiledRules::new(RuleStore::list(&snapshot));
    report::print_summary(&snapshot, &compiled, &palette);

    for url in &config.urls {
        let trace = compiled.resolve_with_trace(url);
        let decision = route_navigation(url, &compiled, &snapshot);
        report::print_resolution(url, &trace, &decision, &palette);
    }

    if config.duplicates {
        report::print_duplicates(RuleStore::list(&snapshot), &palette);
    }

    if config.tree {
        let views =
            combine_with(snapshot.tree(), &snapshot.bookmark_store(), &snapshot.folder_store(), &compiled, &Options::default());
        if config.json {
            // Snapshot loading caps nesting, so the view serializes within bounds.
            match serde_json::to_string_pretty(&views) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: failed to encode view: {err}");
                    std::process::exit(1);
                }
            }
        } else {
            report::print_tree(&views, &snapshot, &palette);
        }
    }

    if config.dangling {
        report::print_dangling(&snapshot, &palette);
    }
}

struct CliConfig {
    snapshot: Option<String>,
    urls: Vec<String>,
    duplicates: bool,
    tree: bool,
    json: bool,
    dangling: bool,
    color: bool,
    verbose: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config = CliConfig {
        snapshot: None,
        urls: Vec::new(),
        duplicates: false,
        tree: false,
        json: false,
        dangling: false,
        color: io::stdout().is_terminal(),
        verbose: false,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("routemark {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => config.color = true,
            "--no-color" => config.color = false,
            "-v" | "--verbose" => config.verbose = true,
            "--duplicates" => config.duplicates = true,
            "--tree" => config.tree = true,
            "--json" => config.json = true,
            "--dangling" => config.dangling = true,
            "--snapshot" | "-s" => {
                let value = args.next().ok_or_else(|| "error: --snapshot expects a value".to_string())?;
                set_snapshot(&mut config, value)?;
            }
            "--url" | "-u" => {
                let value = args.next().ok_or_else(|| "error: --url expects a value".to_string())?;
                config.urls.push(value);
            }
            _ if arg.starts_with("--snapshot=") => {
                set_snapshot(&mut config, arg.trim_start_matches("--snapshot=").to_string())?;
            }
            _ if arg.starts_with("--url=") => {
                config.urls.push(arg.trim_start_matches("--url=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => config.urls.push(arg),
        }
    }

    if config.json && !config.tree {
        return Err("error: --json only applies to --tree".to_string());
    }

    if config.urls.is_empty() && !config.tree && !config.dangling {
        config.duplicates = true;
    }

    Ok(config)
}

fn set_snapshot(config: &mut CliConfig, value: String) -> Result<(), String> {
    if config.snapshot.is_some() {
        return Err("error: snapshot provided multiple times".to_string());
    }
    config.snapshot = Some(value);
    Ok(())
}

fn load_snapshot(path: Option<&str>) -> routemark::Result<Snapshot> {
    match path {
        Some("-") | None => Snapshot::from_reader(io::stdin().lock()),
        Some(path) => Snapshot::from_path(path),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "routemark {version}

Evaluate container routing rules and bookmark metadata from a JSON snapshot.

Usage:
  routemark [OPTIONS] [<url>...]
  routemark [OPTIONS] --snapshot <file> --url <url>

Options:
  -s, --snapshot <file>      Snapshot JSON. Reads stdin when omitted or '-'.
  -u, --url <url>            URL to route. Repeatable; bare arguments are
                             treated as URLs too.
  --duplicates               List duplicate rule groups with keep/remove
                             suggestions (default when nothing else is asked).
  --tree                     Print the combined bookmark view.
  --json                     With --tree, print the view as JSON.
  --dangling                 List metadata for deleted bookmarks and rules
                             pointing at unknown containers.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -v, --verbose              Log at debug level unless {log_env} is set.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}                  tracing filter, e.g. 'routemark=debug'.

Exit codes:
  0  Success.
  1  Snapshot could not be read.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV
    )
}
