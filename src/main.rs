use std::sync::Arc;

use clap::Parser;
use scriptview::{
    catalog::{self, CatalogEntry, DirectoryCatalog},
    data_dir::DataDir,
    decoder::{DocumentDecoder, PdfDecoder},
    error,
    fuzzy_index::SearchIndex,
    search,
    selection::SelectionController,
    session::Session,
    text_util,
    viewer::Viewer,
    voice::{Capture, VoiceController},
};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{BrowseArgs, Cli, Command, MatcherArgs, SearchArgs};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("SCRIPTVIEW_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let data_dir = DataDir::resolve(cli.dir.as_deref())?;
    if !data_dir.exists() {
        tracing::info!(
            dir = %data_dir.root().display(),
            "scripts directory does not exist"
        );
    }
    let entries = catalog::load_or_empty(&DirectoryCatalog::new(&data_dir));

    match cli.command {
        Command::List { json } => {
            let index = SearchIndex::build(&entries);
            let results = search::execute_search(&index, "");
            if json {
                search::format_json(&results, "")?;
            } else {
                search::format_human(&results, index.len());
            }
        }
        Command::Search(args) => {
            cmd_search(&entries, &args)?;
        }
        Command::Pages { name } => {
            cmd_pages(&entries, &name, &PdfDecoder)?;
        }
        Command::Browse(args) => {
            cmd_browse(&entries, &args)?;
        }
        Command::Completions(_) => {}
    }

    Ok(())
}

fn build_index(
    entries: &[CatalogEntry],
    matcher: &MatcherArgs,
) -> error::Result<SearchIndex> {
    let options = matcher.options();
    options.validate()?;
    Ok(SearchIndex::with_options(entries, options))
}

fn cmd_search(entries: &[CatalogEntry], args: &SearchArgs) -> error::Result<()> {
    let index = build_index(entries, &args.matcher)?;
    let mut results = search::execute_search(&index, &args.query);
    if !args.all {
        results.truncate(args.count);
    }

    if args.json {
        search::format_json(&results, &args.query)?;
    } else if args.files {
        search::format_files(&results);
    } else {
        search::format_human(&results, index.len());
    }
    Ok(())
}

/// Find an entry by display name or file name, ignoring case.
fn find_entry<'a>(
    entries: &'a [CatalogEntry],
    name: &str,
) -> error::Result<&'a CatalogEntry> {
    entries
        .iter()
        .find(|e| {
            e.name.eq_ignore_ascii_case(name)
                || e.raw_name.eq_ignore_ascii_case(name)
                || e.label().eq_ignore_ascii_case(name)
        })
        .ok_or_else(|| error::Error::NotFound {
            kind: "script",
            name: name.to_string(),
        })
}

fn cmd_pages(
    entries: &[CatalogEntry],
    name: &str,
    decoder: &dyn DocumentDecoder,
) -> error::Result<()> {
    let entry = find_entry(entries, name)?;
    let pages = decoder.page_count(&entry.locator)?;
    println!(
        "{}: {}",
        entry.label(),
        text_util::count_noun(pages as usize, "page")
    );
    Ok(())
}

fn cmd_browse(entries: &[CatalogEntry], args: &BrowseArgs) -> error::Result<()> {
    let index = build_index(entries, &args.matcher)?;
    let session = Session::new(
        SelectionController::new(index),
        Viewer::new(args.width),
        VoiceController::new(Capture::detect()),
    );
    scriptview::browse::run_browse(session, Arc::new(PdfDecoder))
}
