//! Command dispatch: each subcommand drives a calculator session

use std::io::{self, BufRead, Write};
use std::path::Path;

use clap::CommandFactory;
use colored::Colorize;
use tracing::{debug, info, instrument};

use crate::application::services::CalculatorService;
use crate::cli::args::{Cli, Commands, ConfigCommands, Format};
use crate::cli::output;
use crate::cli::parse::{parse_line, Command, HELP};
use crate::cli::render::{render_costs, render_view};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        None | Some(Commands::Repl) => _repl(&Settings::load(config)?),
        Some(Commands::Eval { format, intents }) => {
            _eval(&Settings::load(config)?, intents, *format)
        }
        Some(Commands::Costs) => _costs(&Settings::load(config)?),
        Some(Commands::Config { command }) => _config(command, config),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "xpcalc", &mut io::stdout());
            Ok(())
        }
    }
}

/// Fresh session built from validated settings.
pub fn new_session(settings: &Settings) -> CliResult<CalculatorService> {
    let rules = settings.rules()?;
    debug!(
        "new_session: stats={}, max_level={}, initial_perks={}",
        rules.stat_names().len(),
        rules.max_level(),
        settings.initial_perks
    );
    Ok(CalculatorService::new(rules).with_initial_perks(settings.initial_perks))
}

#[instrument(skip(settings))]
fn _repl(settings: &Settings) -> CliResult<()> {
    let mut service = new_session(settings)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut service, stdin.lock(), &mut stdout.lock(), true)
}

/// Read commands line by line, apply them and re-render after each intent.
///
/// Bad lines are reported and skipped; the session continues.
pub fn run_session<R: BufRead, W: Write>(
    service: &mut CalculatorService,
    input: R,
    out: &mut W,
    interactive: bool,
) -> CliResult<()> {
    let write_err = |e: io::Error| CliError::io("write output", e);
    write!(out, "{}", render_view(&service.view())).map_err(write_err)?;

    let mut lines = input.lines();
    loop {
        if interactive {
            output::prompt(&mut *out, ">").map_err(write_err)?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| CliError::io("read input", e))?;

        let command = match parse_line(&line, service) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", output::warning_line(&e)).map_err(write_err)?;
                continue;
            }
        };

        match command {
            Command::Intent(intent) => {
                if !service.apply(&intent) {
                    writeln!(out, "{}", "(no change)".dimmed()).map_err(write_err)?;
                }
                write!(out, "{}", render_view(&service.view())).map_err(write_err)?;
            }
            Command::Show => write!(out, "{}", render_view(&service.view())).map_err(write_err)?,
            Command::Costs => write!(out, "{}", render_costs(service.rules())).map_err(write_err)?,
            Command::Help => writeln!(out, "{HELP}").map_err(write_err)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

/// Apply every intent in order to a fresh session.
pub fn eval_intents(settings: &Settings, intents: &[String]) -> CliResult<CalculatorService> {
    let mut service = new_session(settings)?;
    for (position, text) in intents.iter().enumerate() {
        let command = parse_line(text, &service).map_err(|e| {
            CliError::InvalidArgs(format!("intent {} ({text:?}): {e}", position + 1))
        })?;
        match command {
            Some(Command::Intent(intent)) => {
                service.apply(&intent);
            }
            None => {}
            Some(other) => {
                return Err(CliError::Usage(format!(
                    "intent {} ({text:?}): {other:?} is only available interactively",
                    position + 1
                )))
            }
        }
    }
    Ok(service)
}

#[instrument(skip(settings))]
fn _eval(settings: &Settings, intents: &[String], format: Format) -> CliResult<()> {
    let service = eval_intents(settings, intents)?;
    let view = service.view();
    info!("eval: applied {} intents", intents.len());
    match format {
        Format::Text => print!("{}", render_view(&view)),
        Format::Toml => {
            let text = toml::to_string_pretty(&view)
                .map_err(|e| CliError::Render(e.to_string()))?;
            print!("{text}");
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _costs(settings: &Settings) -> CliResult<()> {
    let rules = settings.rules()?;
    output::header("Cost tables");
    print!("{}", render_costs(&rules));
    Ok(())
}

#[instrument]
fn _config(command: &ConfigCommands, explicit: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(explicit)?;
            output::header("Effective configuration");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (missing)" };
                    output::detail(&format!("global:   {}{state}", path.display()));
                }
                None => output::detail("global:   <no config directory>"),
            }
            if let Some(path) = explicit {
                output::detail(&format!("explicit: {}", path.display()));
            }
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine the config directory".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("wrote {}", path.display()));
        }
    }
    Ok(())
}
