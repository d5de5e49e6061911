use clap::Parser;
use rotsit::cli::commands;
use rotsit::cli::{Cli, Commands};
use rotsit::config;
use rotsit::logging::init_logging;
use rotsit::{RotsitError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, None) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    // Config errors surface again from the command itself.
    let json = cli.json
        || config::load_config(&overrides)
            .map(|config| config.json)
            .unwrap_or(false);

    let result = match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, json, &overrides),
        Commands::Add(args) => commands::add::execute(args, json, &overrides),
        Commands::Show { ids } => commands::show::execute(ids, json, &overrides),
        Commands::Comment(args) => commands::comment::execute(args, json, &overrides),
        Commands::Assign(args) => commands::assign::execute(args, json, &overrides),
        Commands::Close(args) => commands::close::execute(args, json, &overrides),
        Commands::Reopen(args) => commands::reopen::execute(args, json, &overrides),
        Commands::Dup(args) => commands::dup::execute(args, json, &overrides),
        Commands::Export => commands::export::execute(json, &overrides),
        Commands::List(args) => commands::list::execute(args, json, &overrides),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = result {
        handle_error(&e, json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &RotsitError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        actor: cli.actor.clone(),
        json: cli.json.then_some(true),
    }
}
