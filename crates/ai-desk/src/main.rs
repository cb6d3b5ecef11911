//! Talks to the AI service from the terminal.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use ai_desk::core::transcript::{Message, Origin};
use ai_desk::core::{ApiClient, Chat, ChatBuilder, GeneratorBuilder};
use ai_desk::http::{DEFAULT_API_KEY, DEFAULT_BASE_URL, HttpConfigBuilder};
use ai_desk::surface::{CommandClipboard, DirectorySink};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";
const CLEAR_COMMAND: &str = "/clear";

/// Chat with the AI service, or have it generate content.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Base URL of the service.
    #[arg(long, env = "AI_DESK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// The shared key sent as `X-API-Key`.
    #[arg(
        long,
        env = "AI_DESK_API_KEY",
        default_value = DEFAULT_API_KEY,
        hide_default_value = true,
        hide_env_values = true
    )]
    api_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat. Type `/clear` to clear the transcript.
    Chat,
    /// Generate content from a single prompt.
    Generate {
        prompt: String,
        /// Copy the result to the system clipboard.
        #[arg(long)]
        copy: bool,
        /// Save the result as a text file into this directory.
        #[arg(long, value_name = "DIR")]
        download: Option<PathBuf>,
    },
    /// Check whether the service is up.
    Health,
}

enum ChatEvent {
    Message(Message),
    Cleared,
    Idle,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = HttpConfigBuilder::with_api_key(cli.api_key)
        .with_base_url(cli.base_url)
        .build();
    let client = ai_desk::connect(config);

    match cli.command {
        Command::Chat => run_chat(client).await,
        Command::Generate {
            prompt,
            copy,
            download,
        } => run_generate(client, &prompt, copy, download).await,
        Command::Health => run_health(client).await,
    }
}

async fn run_chat(client: ApiClient) -> ExitCode {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let chat = build_chat(ChatBuilder::with_client(client), event_tx);
    let mut stdin = io::BufReader::new(io::stdin());
    chat_loop(&chat, &mut event_rx, &mut stdin).await;
    ExitCode::SUCCESS
}

fn build_chat(
    builder: ChatBuilder,
    event_tx: UnboundedSender<ChatEvent>,
) -> Chat {
    builder
        .on_message({
            let event_tx = event_tx.clone();
            move |msg| {
                event_tx.send(ChatEvent::Message(msg.clone())).ok();
            }
        })
        .on_clear({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(ChatEvent::Cleared).ok();
            }
        })
        .on_idle(move || {
            event_tx.send(ChatEvent::Idle).ok();
        })
        .build()
}

/// Submits every line of `input` and waits for its reply before reading
/// the next one. Returns at the end of the input.
async fn chat_loop<R>(
    chat: &Chat,
    event_rx: &mut UnboundedReceiver<ChatEvent>,
    input: &mut R,
) where
    R: AsyncBufRead + Unpin,
{
    // The welcome message always comes first.
    if let Some(ChatEvent::Message(msg)) = event_rx.recv().await {
        print_message(&msg);
    }

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(input).await else {
            break;
        };
        let line = line.trim();

        if line == CLEAR_COMMAND {
            chat.clear();
            // Clearing is synchronous, the events are already queued.
            while let Ok(event) = event_rx.try_recv() {
                print_event(&event);
            }
            continue;
        }
        if chat.submit(line).is_none() {
            continue;
        }

        let mut progress_bar = None;
        loop {
            progress_bar.get_or_insert_with(thinking_spinner).inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = progress_bar.take() {
                progress_bar.finish_and_clear();
            }

            print_event(&event);
            if matches!(event, ChatEvent::Idle) {
                break;
            }
        }
    }
}

async fn run_generate(
    client: ApiClient,
    prompt: &str,
    copy: bool,
    download: Option<PathBuf>,
) -> ExitCode {
    let generator = GeneratorBuilder::with_client(client).build();
    let Some(mut task) = generator.generate(prompt) else {
        eprintln!("the prompt is empty");
        return ExitCode::FAILURE;
    };

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(spinner_style());
    progress_bar.set_message(generator.view().trigger.label().to_owned());
    let joined = loop {
        select! {
            joined = &mut task => break joined,
            _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
        }
    };
    progress_bar.finish_and_clear();
    if let Err(err) = joined {
        error!("generation task failed: {err}");
        return ExitCode::FAILURE;
    }

    let view = generator.view();
    println!("{}{}", BAR_CHAR.bright_cyan(), view.result.bright_white());

    let mut code = ExitCode::SUCCESS;
    if copy {
        match generator.copy_result(&CommandClipboard::new()).await {
            Ok(()) => println!("{}", generator.view().copy.label().green()),
            Err(err) => {
                eprintln!("{}", format!("Could not copy: {err}").red());
                code = ExitCode::FAILURE;
            }
        }
    }
    if let Some(dir) = download {
        match generator.download_result(&DirectorySink::new(dir)) {
            Ok(path) => println!("Saved to {}", path.display()),
            Err(err) => {
                eprintln!("{}", format!("Could not save: {err}").red());
                code = ExitCode::FAILURE;
            }
        }
    }
    code
}

async fn run_health(client: ApiClient) -> ExitCode {
    match client.health().await {
        Ok(health) => {
            println!("status: {}", health.status.green());
            println!("service: {}", health.service);
            println!("model ready: {}", health.gemini_ready);
            for model in &health.available_models {
                println!("  - {model}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", format!("{} ({err})", err.kind()).red());
            ExitCode::FAILURE
        }
    }
}

fn print_event(event: &ChatEvent) {
    match event {
        ChatEvent::Message(msg) => print_message(msg),
        ChatEvent::Cleared => println!("{}", "── cleared ──".dimmed()),
        ChatEvent::Idle => {}
    }
}

fn print_message(msg: &Message) {
    // The user already sees what they typed.
    if msg.origin() == Origin::Assistant {
        println!(
            "{}🤖 {}",
            BAR_CHAR.bright_cyan(),
            msg.text().bright_white()
        );
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
}

fn thinking_spinner() -> ProgressBar {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(spinner_style());
    progress_bar.set_message("🤔 Thinking...");
    progress_bar
}

async fn read_line<R>(input: &mut R) -> Option<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();

    match input.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
