//! Leadfilter CLI application entry point
//!
//! Drives one filter drawer session from the command line: change
//! selections, apply them, and print the resulting payload for the lead list.
//!
//! # Usage
//!
//! ```bash
//! # Show the active chips (default command)
//! leadfilter
//!
//! # Select options and a custom date range, then apply
//! leadfilter apply --set leadType=visitor --set region=Berlin --date-from 2024-03-01
//!
//! # Remove one chip by its label
//! leadfilter apply --unset region=Berlin
//!
//! # Look up city suggestions and add the first as a region tag
//! leadfilter suggest region ber --pick 0
//!
//! # Work in another session
//! leadfilter --session campaign-42 show
//! ```
//!
//! # Configuration
//!
//! Settings are read from `~/.config/leadfilter/config.toml` on Linux and
//! can be overridden with `LEADFILTER_*` environment variables. Logging is
//! controlled with `RUST_LOG`.

use leadfilter::{
    LeadFilterError,
    assist::SuggestionSource,
    cli::{Cli, Commands, SuggestField},
    config::FilterConfig,
    drawer::FilterDrawer,
    facets::FacetRegistry,
    output,
    persistence::{FileSessionStore, FilterPersistence},
    resolver::SystemClock,
};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, LeadFilterError>;

/// Print the chips of the drawer, one facet per line
fn print_chips(drawer: &FilterDrawer<'_, FileSessionStore>, quiet: bool) {
    let lines = output::chip_lines(drawer.engine(), quiet);
    if lines.is_empty() {
        if !quiet {
            println!("No active filters.");
        }
        return;
    }
    if !quiet {
        println!("Active filters:");
    }
    for line in lines {
        println!("{line}");
    }
}

/// Print an applied payload as pretty JSON
fn print_payload(payload: &leadfilter::snapshot::FilterSnapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/// Handle the suggest command
///
/// A failed lookup prints an empty list, like the drawer would show.
///
/// # Arguments
/// * `pick` - Index of the suggestion to accept; the drawer is applied afterwards
fn handle_suggest_command(
    config: &FilterConfig,
    registry: &FacetRegistry,
    persistence: FilterPersistence<FileSessionStore>,
    field: SuggestField,
    query: &str,
    pick: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let source = config.suggestion_source()?;
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let mut assist = config.assist_state();

    let now = Instant::now();
    let searched = match field {
        SuggestField::Region => assist.region.search_now(query, now, |q| {
            runtime.block_on(source.search_locations(q))
        }),
        SuggestField::Contact => assist.contact.search_now(query, now, |q| {
            runtime.block_on(source.search_contacts(q))
        }),
    };
    if !searched {
        return Err(LeadFilterError::InvalidInput(format!(
            "query must be at least {} characters",
            config.min_query_len
        )));
    }

    let lines = match field {
        SuggestField::Region => {
            output::suggestion_lines(assist.region.suggestions(), quiet, output::location)
        }
        SuggestField::Contact => {
            output::suggestion_lines(assist.contact.suggestions(), quiet, String::clone)
        }
    };
    if lines.is_empty() && !quiet {
        println!("No suggestions.");
    }
    for line in &lines {
        println!("{line}");
    }

    let Some(index) = pick else {
        return Ok(());
    };
    let mut drawer = FilterDrawer::mount(registry, persistence, SystemClock);
    let accepted = match field {
        SuggestField::Region => assist.accept_region(index, drawer.engine_mut()),
        SuggestField::Contact => assist.accept_contact(index, drawer.engine_mut()),
    };
    if !accepted && index >= lines.len() {
        return Err(LeadFilterError::InvalidInput(format!("no suggestion at index {index}")));
    }
    let payload = drawer.apply();
    if !quiet {
        print_chips(&drawer, false);
    }
    print_payload(&payload)
}

fn run(cli: &Cli, config: &FilterConfig) -> Result<()> {
    let quiet = cli.quiet;
    let registry = config.registry();

    match cli.get_command() {
        Commands::Facets => {
            for facet in registry.all() {
                println!("{}", output::facet_summary(facet, quiet));
            }
        }
        Commands::Show { json } => {
            let persistence = config.persistence(&cli.session)?;
            let drawer = FilterDrawer::mount(&registry, persistence, SystemClock);
            if json {
                print_payload(&drawer.snapshot())?;
            } else {
                print_chips(&drawer, quiet);
            }
        }
        Commands::Apply(args) => {
            let persistence = config.persistence(&cli.session)?;
            let mut drawer = FilterDrawer::mount(&registry, persistence, SystemClock);
            args.apply_to(drawer.engine_mut())?;
            let payload = drawer.apply();
            if !quiet {
                print_chips(&drawer, false);
            }
            print_payload(&payload)?;
        }
        Commands::Clear => {
            let persistence = config.persistence(&cli.session)?;
            let mut drawer = FilterDrawer::mount(&registry, persistence, SystemClock);
            drawer.clear_all();
            if !quiet {
                println!("Cleared all filters of session '{}'.", cli.session);
            }
        }
        Commands::Suggest { field, query, pick } => {
            let persistence = config.persistence(&cli.session)?;
            handle_suggest_command(config, &registry, persistence, field, &query, pick, quiet)?;
        }
        Commands::EndSession => {
            config.session_store(&cli.session)?.end_session()?;
            if !quiet {
                println!("Ended session '{}'.", cli.session);
            }
        }
    }

    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let result = FilterConfig::load()
        .map_err(LeadFilterError::from)
        .and_then(|config| run(&cli, &config));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
