use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use scriptview::fuzzy_index::{
    DEFAULT_MIN_MATCH_LEN,
    DEFAULT_THRESHOLD,
    MatcherOptions,
};

#[derive(Debug, Parser)]
#[command(
    name = "scriptview",
    about = "Find scripts by fuzzy or spoken search and page through them"
)]
pub struct Cli {
    /// Directory holding the PDF scripts
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every script in the catalog
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fuzzy search script names
    Search(SearchArgs),
    /// Print the page count of a script
    Pages {
        /// Script name or file name, matched case-insensitively
        name: String,
    },
    /// Interactive search and viewer on the terminal
    Browse(BrowseArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Matcher --

#[derive(Debug, Clone, clap::Args)]
pub struct MatcherArgs {
    /// Maximum score (0 = exact, 1 = anything) a match may have
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Queries shorter than this use substring matching
    #[arg(long, default_value_t = DEFAULT_MIN_MATCH_LEN)]
    pub min_length: usize,

    /// Penalize matches that start far into the name (in characters)
    #[arg(long)]
    pub distance: Option<usize>,
}

impl MatcherArgs {
    pub fn options(&self) -> MatcherOptions {
        MatcherOptions {
            threshold: self.threshold,
            min_match_len: self.min_length,
            distance: self.distance,
        }
    }
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Return every match
    #[arg(long)]
    pub all: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,

    #[command(flatten)]
    pub matcher: MatcherArgs,
}

// -- Browse --

#[derive(Debug, Parser)]
pub struct BrowseArgs {
    /// Viewport width in pixels, used for layout and initial zoom
    #[arg(long, default_value = "1280")]
    pub width: u32,

    #[command(flatten)]
    pub matcher: MatcherArgs,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "scriptview",
            &mut std::io::stdout(),
        );
    }
}
