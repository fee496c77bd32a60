use clap::Parser;
use pokedex_registry::{Catalog, Menu, Registry};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pokedex", about = "Interactive multi-owner Pokedex")]
struct Args {
    /// RON species catalog to use instead of the built-in one
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Log tree and ring mutations to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn setup_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pokedex_registry=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path),
        None => pokedex_registry::species::builtin().cloned(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "could not load species catalog");
            eprintln!("Error loading species catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(species = catalog.len(), "session started");

    let stdin = io::stdin();
    let mut menu = Menu::new(Registry::new(catalog), stdin.lock(), io::stdout());
    let result = menu.run();
    info!("session finished");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "console failure");
            ExitCode::FAILURE
        }
    }
}
