//! summoner - CLI entry point.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Input};
use tracing_subscriber::EnvFilter;

use summoner::backend::{Assistant, Backend};
use summoner::config::{
    Credential, DEFAULT_ASK_TIMEOUT_SECS, DEFAULT_CONVERSE_TIMEOUT_SECS, DEFAULT_DELAY_SECS,
    DEFAULT_OUTPUT_DIR, DEFAULT_ROUNDS, resolve_timeout,
};
use summoner::conversation::{
    ConversationDriver, ConversationEvent, ConversationOptions, DriverState, Interrupt,
    Personality, Speaker,
};
use summoner::error::ConversationError;
use summoner::invoke::{InvokerConfig, SystemInvoker};
use summoner::repl::Repl;
use summoner::retry::RetryPolicy;
use summoner::transcript::{TranscriptFormat, TranscriptWriter};

/// Relay prompts to an AI-assistant CLI, or let two instances talk.
#[derive(Parser, Debug)]
#[command(name = "summoner")]
#[command(about = "Relay prompts to an AI-assistant CLI, or let two instances talk")]
#[command(version)]
struct Cli {
    /// Assistant CLI to invoke
    #[arg(long, value_enum, default_value_t = Backend::Codex, global = true)]
    backend: Backend,

    /// Model name passed to the CLI (defaults per backend)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Per-invocation timeout in seconds (overrides SUMMONER_TIMEOUT)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive prompt loop (the default)
    Ask,
    /// Run a turn-taking conversation between two instances
    Converse(ConverseArgs),
    /// Check that the assistant CLI and its credential are available
    Check,
}

#[derive(Args, Debug)]
struct ConverseArgs {
    /// Project name, used in the transcript file name
    project: Option<String>,

    /// Initial prompt for the first speaker
    prompt: Option<String>,

    /// Number of conversation rounds
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    rounds: Option<u32>,

    /// Personality preset for the first speaker
    #[arg(long, default_value = "creative")]
    first: String,

    /// Personality preset for the second speaker
    #[arg(long, default_value = "analytical")]
    second: String,

    /// Enter free-text personalities interactively
    #[arg(long)]
    customize: bool,

    /// Seconds to wait between rounds
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    delay: u64,

    /// Directory for transcripts
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Transcript format
    #[arg(long, value_enum, default_value_t = TranscriptFormat::Markdown)]
    format: TranscriptFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let invoker = SystemInvoker::new(InvokerConfig::from_process());
    let credential = Credential::from_env(cli.backend);

    match cli.command.unwrap_or(Command::Ask) {
        Command::Ask => {
            let assistant = build_assistant(
                cli.backend,
                cli.model,
                resolve_timeout(cli.timeout, DEFAULT_ASK_TIMEOUT_SECS),
                credential,
            );
            let interrupt = Interrupt::new();
            interrupt.listen_for_ctrl_c();

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            let session = Repl::new(&invoker, &assistant, interrupt)
                .run(stdin, &mut stdout)
                .await;

            // Tokio reads stdin on a blocking thread that a pending read pins
            // forever, so runtime shutdown cannot be relied on here.
            let _ = stdout.flush();
            if let Err(e) = session {
                eprintln!("Error: Interactive session failed: {}", e);
                std::process::exit(1);
            }
            std::process::exit(0);
        }
        Command::Converse(args) => {
            let assistant = build_assistant(
                cli.backend,
                cli.model,
                resolve_timeout(cli.timeout, DEFAULT_CONVERSE_TIMEOUT_SECS),
                credential,
            );
            run_conversation(&invoker, &assistant, args).await?;
        }
        Command::Check => {
            run_check(&invoker, cli.backend, credential).await?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "summoner=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_assistant(
    backend: Backend,
    model: Option<String>,
    timeout: std::time::Duration,
    credential: Option<Credential>,
) -> Assistant {
    let assistant = Assistant::new(backend, timeout).with_credential(credential);
    match model {
        Some(model) => assistant.with_model(model),
        None => assistant,
    }
}

async fn run_conversation(
    invoker: &SystemInvoker,
    assistant: &Assistant,
    args: ConverseArgs,
) -> Result<()> {
    let interactive = args.project.is_none() || args.prompt.is_none();

    let project = match args.project {
        Some(project) => project,
        None => Input::<String>::new()
            .with_prompt("Enter project name")
            .interact_text()
            .context("Failed to read project name")?,
    };
    if project.trim().is_empty() {
        bail!("Project name is required");
    }

    let initial_prompt = match args.prompt {
        Some(prompt) => prompt,
        None => Input::<String>::new()
            .with_prompt("Enter initial prompt")
            .interact_text()
            .context("Failed to read initial prompt")?,
    };
    if initial_prompt.trim().is_empty() {
        bail!("Initial prompt is required");
    }

    let rounds = match args.rounds {
        Some(rounds) => rounds,
        None if interactive => Input::<u32>::new()
            .with_prompt("Enter number of conversation rounds")
            .default(DEFAULT_ROUNDS)
            .validate_with(|n: &u32| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
            .interact_text()
            .context("Failed to read round count")?,
        None => DEFAULT_ROUNDS,
    };

    let first_preset = preset(&args.first);
    let second_preset = preset(&args.second);
    let customize = args.customize
        || (interactive
            && Confirm::new()
                .with_prompt("Customize instance personalities?")
                .default(false)
                .interact()
                .context("Failed to read confirmation")?);

    let backend = assistant.backend();
    let first_name = format!("{} Alpha", backend);
    let second_name = format!("{} Beta", backend);

    let (first_personality, second_personality) = if customize {
        (
            ask_personality(&first_name, first_preset)?,
            ask_personality(&second_name, second_preset)?,
        )
    } else {
        (
            first_preset.prompt().to_string(),
            second_preset.prompt().to_string(),
        )
    };

    let speakers = [
        Speaker::new(&first_name).with_personality(first_personality),
        Speaker::new(&second_name).with_personality(second_personality),
    ];

    let options = ConversationOptions {
        rounds,
        delay: std::time::Duration::from_secs(args.delay),
        retry: RetryPolicy::single_retry(),
    };
    let writer = TranscriptWriter::new(&args.output_dir, &project, args.format, Local::now());

    println!("Starting conversation on project: {}", project);
    println!("Initial prompt: {}", initial_prompt);
    println!("Rounds: {}", rounds);
    println!("Participants: {}, {}", first_name, second_name);
    println!("{}", "=".repeat(60));

    let interrupt = Interrupt::new();
    interrupt.listen_for_ctrl_c();

    let driver = ConversationDriver::new(invoker, assistant, &project, speakers, options, interrupt);

    match driver.run(&initial_prompt, &writer, print_event).await {
        Ok(report) if report.state == DriverState::Interrupted => {
            println!("\n\nConversation interrupted by user.");
            println!(
                "Partial conversation ({} turns) saved to: {}",
                report.turns.len(),
                report.transcript_path.display()
            );
            Ok(())
        }
        Ok(report) => {
            println!(
                "\nConversation completed! Saved to: {}",
                report.transcript_path.display()
            );
            Ok(())
        }
        Err(e @ ConversationError::Turn { .. }) => {
            eprintln!("\nError during conversation: {}", e);
            if let ConversationError::Turn {
                transcript: Some(path),
                ..
            } = &e
            {
                eprintln!("Partial conversation saved to: {}", path.display());
            } else {
                eprintln!("Partial conversation could not be saved.");
            }
            Err(e).context("Conversation stopped early")
        }
        Err(e) => Err(e).context("Failed to save conversation transcript"),
    }
}

fn preset(name: &str) -> Personality {
    let personality = Personality::from_name_or_default(name);
    if personality.as_str() != name.trim().to_lowercase() {
        eprintln!(
            "Warning: unknown personality '{}', using '{}'",
            name, personality
        );
    }
    personality
}

fn ask_personality(speaker: &str, preset: Personality) -> Result<String> {
    Input::<String>::new()
        .with_prompt(format!("Enter personality for {}", speaker))
        .default(preset.prompt().to_string())
        .interact_text()
        .context("Failed to read personality")
}

fn print_event(event: ConversationEvent<'_>) {
    match event {
        ConversationEvent::RoundStarted { round, speaker } => {
            println!("\n--- Round {} ---", round);
            println!("{} is responding...", speaker.name);
        }
        ConversationEvent::TurnRecorded(turn) => {
            println!("\n{}'s response:", turn.speaker);
            println!("{}", "-".repeat(40));
            println!("{}", turn.response);
            println!("{}", "-".repeat(40));
        }
        ConversationEvent::Waiting(delay) => {
            println!("\nWaiting {} seconds before next round...", delay.as_secs());
        }
    }
}

async fn run_check(
    invoker: &SystemInvoker,
    backend: Backend,
    credential: Option<Credential>,
) -> Result<()> {
    println!("Environment check for {}:", backend);

    match &credential {
        Some(credential) => println!(
            "  [PASS] {} is set (length: {})",
            credential.var(),
            credential.value().len()
        ),
        None => println!(
            "  [WARN] {} not set - {} may prompt for authentication",
            backend.credential_var(),
            backend.executable()
        ),
    }

    match backend.probe(invoker).await {
        Ok(version) => {
            println!("  [PASS] {} is installed ({})", backend.executable(), version);
            Ok(())
        }
        Err(e) => {
            println!("  [FAIL] {}", e);
            println!("         Install with: {}", backend.install_hint());
            bail!("{} is not available", backend.executable())
        }
    }
}
