//! Quoteboard CLI — inspect a quote collection the way the surfaces see it.
//!
//! Usage:
//!   quoteboard show --input quotes.json [--search q] [--starred] [--uncheck TAG]...
//!   quoteboard stats [--db path]

use clap::{Parser, Subcommand};
use quoteboard::{
    QuoteRecord, QuoteView, QuoteboardApi, QuoteboardConfig, SqliteSink, TagFilter, ViewMode,
};
use quoteboard::storage::GROUP_NAMES;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "quoteboard",
    version,
    about = "Shared quote-annotation data layer"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load quotes from a JSON file and print the filtered, clustered view
    Show {
        /// Path to a JSON array of quote records
        #[arg(long)]
        input: PathBuf,
        /// Search query (applied immediately, no debounce)
        #[arg(long)]
        search: Option<String>,
        /// Show starred quotes only
        #[arg(long)]
        starred: bool,
        /// Uncheck a tag name (repeatable)
        #[arg(long = "uncheck")]
        unchecked: Vec<String>,
        /// Hide quotes with no tags
        #[arg(long)]
        no_tags_unchecked: bool,
        /// Path to a YAML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Path to the local sink database
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Print what the local sink database currently holds
    Stats {
        /// Path to the local sink database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default sink database path (~/.local/share/quoteboard/quoteboard.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let dir = data_dir.join("quoteboard");
    std::fs::create_dir_all(&dir).ok();
    dir.join("quoteboard.db")
}

fn load_records(path: &PathBuf) -> Result<Vec<QuoteRecord>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid quotes JSON: {}", e))
}

fn load_config(path: Option<PathBuf>) -> Result<QuoteboardConfig, String> {
    match path {
        Some(p) => QuoteboardConfig::load(&p)
            .map_err(|e| format!("cannot load config '{}': {}", p.display(), e)),
        None => Ok(QuoteboardConfig::default()),
    }
}

/// Group views by session id, preserving first-seen order.
fn group_by_session(quotes: Vec<QuoteView>) -> Vec<(String, Vec<QuoteView>)> {
    let mut groups: Vec<(String, Vec<QuoteView>)> = Vec::new();
    for quote in quotes {
        match groups.iter_mut().find(|(name, _)| *name == quote.session_id) {
            Some((_, members)) => members.push(quote),
            None => groups.push((quote.session_id.clone(), vec![quote])),
        }
    }
    groups
}

fn render_highlighted(api: &QuoteboardApi, text: &str) -> String {
    api.highlight_matches(text)
        .into_iter()
        .map(|span| {
            if span.is_match {
                format!("[{}]", span.text)
            } else {
                span.text
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn cmd_show(
    input: PathBuf,
    search: Option<String>,
    starred: bool,
    unchecked: Vec<String>,
    no_tags_unchecked: bool,
    config: Option<PathBuf>,
    db: Option<PathBuf>,
) -> i32 {
    let config = match load_config(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let records = match load_records(&input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let sink = match SqliteSink::open(db.unwrap_or_else(default_db_path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot open sink database: {}", e);
            return 1;
        }
    };

    let api = QuoteboardApi::with_config(Arc::new(sink), config);
    api.init_from_quotes(records, true);

    if let Some(query) = search {
        api.set_search_query_now(query);
    }
    if starred {
        api.set_view_mode(ViewMode::Starred);
    }
    if !unchecked.is_empty() || no_tags_unchecked {
        let mut tag_filter = TagFilter {
            no_tags_unchecked,
            ..Default::default()
        };
        for name in unchecked {
            tag_filter = tag_filter.uncheck(name);
        }
        api.set_tag_filter(tag_filter);
    }

    let groups = api.visible_groups(group_by_session(api.quotes()));
    if groups.is_empty() {
        println!("No visible quotes.");
        return 0;
    }

    for (session, quotes) in groups {
        println!("== session {} ==", session);
        let labels = api.cluster_labels(&quotes);
        for (quote, label) in quotes.iter().zip(labels.iter()) {
            let speaker = if label.shows_speaker_badge() {
                format!("{:<12}", quote.participant_id)
            } else {
                format!("{:<12}", "")
            };
            let marks = [
                if quote.is_starred { "*" } else { " " },
                if quote.is_edited { "e" } else { " " },
            ]
            .concat();
            println!(
                "  {} {:>6?} {} {}",
                marks,
                label,
                speaker,
                render_highlighted(&api, &quote.text)
            );
        }
        println!();
    }
    0
}

fn cmd_stats(db: Option<PathBuf>) -> i32 {
    let sink = match SqliteSink::open(db.unwrap_or_else(default_db_path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: cannot open sink database: {}", e);
            return 1;
        }
    };

    println!("{:<16}  {:>8}", "GROUP", "ENTRIES");
    println!("{}", "-".repeat(26));
    for group in GROUP_NAMES {
        let entries = match sink.load_group(group) {
            Ok(Some(serde_json::Value::Object(map))) => map.len().to_string(),
            Ok(Some(_)) => "?".to_string(),
            Ok(None) => "-".to_string(),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        println!("{:<16}  {:>8}", group, entries);
    }
    match sink.decision_count() {
        Ok(count) => println!("{:<16}  {:>8}", "decisions", count),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    }
    0
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Show {
            input,
            search,
            starred,
            unchecked,
            no_tags_unchecked,
            config,
            db,
        } => cmd_show(input, search, starred, unchecked, no_tags_unchecked, config, db),
        Commands::Stats { db } => cmd_stats(db),
    };
    std::process::exit(code);
}
