//! voxcore CLI
//!
//! Interactive REPL by default, plus one-shot subcommands for parsing a
//! single utterance and printing platform diagnostics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use voxcore::config::Config;
use voxcore::dispatch::Session;
use voxcore::{parser, system, VERSION};

#[derive(Parser)]
#[command(name = "voxcore", version = VERSION, about = "Voice-assistant command core")]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Parse an utterance and print the resulting command
    Parse {
        /// The utterance, as one or more words
        text: Vec<String>,
        /// Print the command as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print platform diagnostics as JSON
    Platform,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    match cli.command {
        Some(CliCommand::Parse { text, json }) => cmd_parse(&text.join(" "), json),
        Some(CliCommand::Platform) => cmd_platform(),
        None => repl().await,
    }
}

fn init_tracing(interactive: bool) {
    // One-shot commands print their result; keep their log noise down.
    let default = if interactive { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn cmd_parse(text: &str, json: bool) -> Result<()> {
    let command = parser::parse(text);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&command).context("serializing command")?
        );
        return Ok(());
    }
    match command.intent {
        Some(intent) => {
            println!("intent:  {intent}");
            println!("target:  {}", command.target.as_deref().unwrap_or("-"));
            println!("confirm: {}", command.needs_confirm);
        }
        None => println!("no intent recognized"),
    }
    Ok(())
}

fn cmd_platform() -> Result<()> {
    let info = system::PlatformInfo::current().context("detecting platform")?;
    println!(
        "{}",
        serde_json::to_string_pretty(&info).context("serializing platform info")?
    );
    Ok(())
}

async fn repl() -> Result<()> {
    let config = Config::load();
    let mut session = Session::new(config);

    println!("voxcore v{VERSION} — say a command, or \"exit\" to leave.");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            prompt()?;
            continue;
        }

        let reply = session.submit(line).await;
        println!("{}", reply.message);
        if reply.exit {
            break;
        }
        prompt()?;
    }
    Ok(())
}

fn prompt() -> Result<()> {
    use std::io::Write;
    print!("> ");
    std::io::stdout().flush().context("flushing prompt")?;
    Ok(())
}
