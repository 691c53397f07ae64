//! richlist - run edit scripts against a list-aware styled text buffer.
//!
//! # Usage
//!
//! ```bash
//! richlist notes.txt --script edits.txt
//! richlist -e 'caret 5' -e enter -e 'type next item' --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use richlist::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use richlist::editor::StyledBuffer;
use richlist::list::DEFAULT_GUARD_FRAMES;
use richlist::perf;
use richlist::script::{Command, parse_line, parse_script, run};
use richlist::session::Session;

/// Run edit scripts against a list-aware styled text buffer
#[derive(Parser, Debug)]
#[command(name = "richlist", version, about, long_about = None)]
struct Cli {
    /// Initial buffer contents (empty buffer if omitted)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Script file with one command per line
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Single command, run after the script file (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    exec: Vec<String>,

    /// Print a JSON snapshot instead of plain text
    #[arg(long)]
    json: bool,

    /// Print the final selection after the text
    #[arg(long)]
    show_selection: bool,

    /// Enable timing output
    #[arg(long)]
    perf: bool,

    /// Frames the observer guard stays active
    #[arg(long, value_name = "N")]
    guard_frames: Option<u32>,

    /// Write every edit decision to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn load_commands(cli: &Cli) -> Result<Vec<Command>> {
    let mut commands = match &cli.script {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            parse_script(&source).with_context(|| format!("In script {}", path.display()))?
        }
        None => Vec::new(),
    };
    for (idx, line) in cli.exec.iter().enumerate() {
        if let Some(command) =
            parse_line(idx + 1, line).with_context(|| format!("In --exec {line:?}"))?
        {
            commands.push(command);
        }
    }
    Ok(commands)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("RICHLIST_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            path = %debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
            %err,
            "failed to open debug log"
        );
    }

    let text = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };
    let commands = load_commands(&cli)?;

    let mut session = Session::new(StyledBuffer::from_text(&text))
        .with_guard_frames(effective.guard_frames.unwrap_or(DEFAULT_GUARD_FRAMES));
    run(&mut session, &commands);

    if effective.json {
        let snapshot = serde_json::to_string_pretty(&session.snapshot())
            .context("Failed to serialize snapshot")?;
        println!("{snapshot}");
    } else {
        print!("{}", session.text());
        if !session.text().ends_with('\n') {
            println!();
        }
        if effective.show_selection {
            let selection = session.selection();
            println!("selection: {}..{}", selection.start, selection.end);
        }
    }
    Ok(())
}
