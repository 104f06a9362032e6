mod config;
mod render;
mod speech;

use std::collections::HashMap;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::fmt::time::ChronoLocal;

use neurovisa_api::{auth, Config as ApiConfig, InterviewClient};
use neurovisa_core::api::InterviewApi;
use neurovisa_core::capabilities::{CapabilityError, MediaCapture, SpeechInput, SpeechOutput};
use neurovisa_core::dashboard::DashboardSummary;
use neurovisa_core::flow::{InterviewFlow, Phase, REVEAL_MS_PER_CHAR};
use neurovisa_core::report::Report;
use neurovisa_core::{Command, Input, InputMode, TimerKind};

use crate::config::Config;
use crate::speech::{ConsoleSpeech, NoMediaCapture, UnsupportedRecognition};

#[derive(Parser)]
#[command(name = "neurovisa", version, about = "Mock visa interview practice from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start a new interview session
    Start {
        /// Input mode to begin in
        #[arg(long, value_enum, default_value = "text")]
        mode: ModeArg,
    },
    /// Resume an in-progress session
    Resume {
        session_id: i64,
        #[arg(long, value_enum, default_value = "text")]
        mode: ModeArg,
    },
    /// List your sessions with a readiness summary
    Sessions,
    /// Render the report for a finished session
    Report { session_id: i64 },
    /// Create an account (password read from NEUROVISA_PASSWORD)
    Register {
        email: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        target_country: Option<String>,
        #[arg(long)]
        visa_type: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Text,
    Voice,
    Video,
}

impl From<ModeArg> for InputMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => InputMode::Text,
            ModeArg::Voice => InputMode::Voice,
            ModeArg::Video => InputMode::Video,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    tracing::info!("Configuration loaded successfully. Starting interview service...");

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();

    // --- 4. Dispatch ---
    match args.command {
        // Registration runs unauthenticated.
        CliCommand::Register {
            email,
            full_name,
            target_country,
            visa_type,
        } => {
            let password = config
                .password
                .as_ref()
                .context("NEUROVISA_PASSWORD is not set")?;
            let registration = auth::Registration {
                email,
                password: password.expose_secret().to_string(),
                full_name,
                target_country,
                visa_type,
            };
            let profile = auth::register(&config.api_url, &registration)
                .await
                .context("Registration failed")?;
            println!("registered {} (id {})", profile.email, profile.id);
            Ok(())
        }
        CliCommand::Sessions => {
            let client = authed_client(&config).await?;
            let sessions = client
                .my_sessions()
                .await
                .context("Failed to fetch sessions")?;
            let summary = DashboardSummary::from_sessions(&sessions);
            print!("{}", render::sessions_panel(&sessions, &summary));
            Ok(())
        }
        CliCommand::Report { session_id } => {
            let client = authed_client(&config).await?;
            let session = client
                .fetch_session(session_id)
                .await
                .context("Failed to fetch session")?;
            print!("{}", render::report_panel(&Report::from_session(&session)));
            Ok(())
        }
        CliCommand::Start { mode } => {
            let client = authed_client(&config).await?;
            let session = client
                .start_session()
                .await
                .context("Failed to start a new session")?;
            tracing::info!(session_id = session.id, "session started");
            run_interview(client, session.id, mode.into()).await
        }
        CliCommand::Resume { session_id, mode } => {
            let client = authed_client(&config).await?;
            run_interview(client, session_id, mode.into()).await
        }
    }
}

/// Resolve a bearer token (configured or via login), verify it against
/// `/users/me`, and build the API client.
async fn authed_client(config: &Config) -> Result<Arc<InterviewClient>> {
    let token: SecretString = match config.token.clone() {
        Some(token) => token,
        None => {
            let email = config
                .email
                .as_deref()
                .context("NEUROVISA_EMAIL is not set")?;
            let password = config
                .password
                .as_ref()
                .context("NEUROVISA_PASSWORD is not set")?;
            auth::login(&config.api_url, email, password)
                .await
                .context("Login failed")?
        }
    };

    let profile = auth::me(&config.api_url, &token)
        .await
        .context("Token check failed")?;
    tracing::info!(email = %profile.email, "authenticated");

    let api_config = ApiConfig::builder()
        .with_base_url(&config.api_url)
        .with_token(token)
        .build();
    Ok(Arc::new(InterviewClient::new(api_config)))
}

/// The interview event loop: the flow owns the session state, the command
/// executor runs its side effects, and stdin feeds user events back in.
async fn run_interview(
    client: Arc<InterviewClient>,
    session_id: i64,
    mode: InputMode,
) -> Result<()> {
    // Create the channel pair that decouples core logic from the runtime.
    let (input_tx, mut input_rx) = mpsc::channel::<Input>(256);
    let (command_tx, command_rx) = mpsc::channel::<Command>(64);

    // Capability adapters for a terminal. Recognition and camera capture
    // are unsupported here, which drives the flow's fallback handling when
    // voice or video mode is selected.
    let speech: Arc<dyn SpeechOutput> = Arc::new(ConsoleSpeech::new(input_tx.clone()));
    let recognition: Arc<dyn SpeechInput> = Arc::new(UnsupportedRecognition);
    let capture: Arc<dyn MediaCapture> = Arc::new(NoMediaCapture);

    let executor = tokio::spawn(execute_commands(
        command_rx,
        input_tx.clone(),
        speech,
        recognition,
        capture,
    ));

    // This task turns stdin lines into flow events.
    let (quit_tx, mut quit_rx) = mpsc::channel::<()>(1);
    let stdin_events = input_tx.clone();
    let stdin_task = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_line(line.trim()) {
                LineAction::Event(input) => {
                    if stdin_events.send(input).await.is_err() {
                        break;
                    }
                }
                LineAction::Quit => {
                    let _ = quit_tx.send(()).await;
                    break;
                }
                LineAction::Help => print_help(),
                LineAction::Ignore => {}
            }
        }
    });

    print_help();

    let mut flow = InterviewFlow::new(session_id, mode);
    flow.start(&*client, &command_tx).await?;

    while *flow.phase() != Phase::Done {
        tokio::select! {
            Some(input) = input_rx.recv() => {
                flow.handle(&*client, input, &command_tx).await?;
            }
            _ = quit_rx.recv() => {
                tracing::info!("Quit requested, leaving the session as-is...");
                flow.shutdown(&command_tx).await?;
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, shutting down...");
                flow.shutdown(&command_tx).await?;
                break;
            }
        }
    }

    let finished = *flow.phase() == Phase::Done;
    // Closing the command channel ends the executor, which aborts any
    // timers still pending.
    drop(command_tx);
    stdin_task.abort();
    executor.await.ok();

    if finished {
        let session = client
            .fetch_session(session_id)
            .await
            .context("Failed to fetch the finished session")?;
        print!("{}", render::report_panel(&Report::from_session(&session)));
    }
    Ok(())
}

/// Executes commands from the flow: presentation, capability calls and the
/// keyed timers. One live timer per `TimerKind`; starting a kind restarts
/// it, cancelling aborts it, and closing the command channel aborts all of
/// them.
async fn execute_commands(
    mut command_rx: mpsc::Receiver<Command>,
    events: mpsc::Sender<Input>,
    speech: Arc<dyn SpeechOutput>,
    recognition: Arc<dyn SpeechInput>,
    capture: Arc<dyn MediaCapture>,
) {
    let mut timers: HashMap<TimerKind, JoinHandle<()>> = HashMap::new();
    let mut reveal: Option<JoinHandle<()>> = None;
    let mut analyzing: Option<JoinHandle<()>> = None;

    while let Some(command) = command_rx.recv().await {
        match command {
            Command::RevealPrompt { text, follow_up } => {
                if let Some(handle) = reveal.take() {
                    handle.abort();
                }
                reveal = Some(tokio::spawn(async move {
                    let heading = if follow_up { "FOLLOW-UP" } else { "QUESTION" };
                    println!("\n--- {heading} ---");
                    let mut rendered = String::new();
                    for c in text.chars() {
                        rendered.push(c);
                        print!("\r{rendered}");
                        let _ = std::io::stdout().flush();
                        tokio::time::sleep(Duration::from_millis(REVEAL_MS_PER_CHAR)).await;
                    }
                    println!();
                }));
            }
            Command::Speak(text) => {
                if let Err(e) = speech.speak(&text).await {
                    tracing::warn!("Speech synthesis failed: {:?}", e);
                }
            }
            Command::StopSpeaking => speech.cancel().await,
            Command::StartListening => {
                if let Err(e) = recognition.start().await {
                    match e {
                        CapabilityError::Unsupported => {
                            let _ = events.send(Input::RecognitionUnavailable).await;
                        }
                        other => {
                            tracing::warn!("Recognition failed to start: {:?}", other);
                            let _ = events.send(Input::RecognitionEnded).await;
                        }
                    }
                }
            }
            Command::StopListening => recognition.stop().await,
            Command::AcquireCapture => {
                if let Err(e) = capture.acquire().await {
                    tracing::warn!("Media capture unavailable: {:?}", e);
                    let _ = events.send(Input::CameraDenied).await;
                }
            }
            Command::ReleaseCapture => capture.release().await,
            Command::SetCameraEnabled(enabled) => capture.set_camera_enabled(enabled).await,
            Command::SetMicEnabled(enabled) => capture.set_mic_enabled(enabled).await,
            Command::SetInputEnabled(enabled) => {
                if enabled {
                    println!("(answer below; /send to submit)");
                }
            }
            Command::StartTimer { kind, duration } => {
                let tx = events.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    if let Err(e) = tx.send(Input::TimerFired(kind)).await {
                        tracing::warn!("Failed to deliver timer event: {:?}", e);
                    }
                });
                if let Some(old) = timers.insert(kind, handle) {
                    old.abort();
                }
            }
            Command::CancelTimer(kind) => {
                if let Some(handle) = timers.remove(&kind) {
                    handle.abort();
                }
            }
            Command::ShowAnalyzing { stages } => {
                if let Some(handle) = analyzing.take() {
                    handle.abort();
                }
                analyzing = Some(tokio::spawn(async move {
                    for stage in stages.iter().cycle() {
                        println!("  {stage}");
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                }));
            }
            Command::ShowFeedback(feedback) => {
                if let Some(handle) = analyzing.take() {
                    handle.abort();
                }
                print!("{}", render::feedback_panel(&feedback));
            }
            Command::ShowSilenceWarning => {
                println!("(no speech detected; are you still there?)");
            }
            Command::ClearSilenceWarning => {}
            Command::Notice(text) => println!("* {text}"),
            Command::ShowError { message, retryable } => {
                if retryable {
                    eprintln!("error: {message} (/retry to try again)");
                } else {
                    eprintln!("error: {message}");
                }
            }
            Command::ConfirmTermination => {
                println!("End this session early? /yes to confirm, /no to keep going.");
            }
            Command::NavigateToReport(id) => {
                tracing::info!(session_id = id, "session finished");
            }
        }
    }

    for (_, handle) in timers.drain() {
        handle.abort();
    }
    if let Some(handle) = reveal.take() {
        handle.abort();
    }
    if let Some(handle) = analyzing.take() {
        handle.abort();
    }
}

enum LineAction {
    Event(Input),
    Quit,
    Help,
    Ignore,
}

fn parse_line(line: &str) -> LineAction {
    match line {
        "" => LineAction::Ignore,
        "/send" => LineAction::Event(Input::Submit),
        "/next" => LineAction::Event(Input::Next),
        "/retry" => LineAction::Event(Input::Retry),
        "/end" => LineAction::Event(Input::TerminateRequested),
        "/yes" => LineAction::Event(Input::TerminateConfirmed),
        "/no" => LineAction::Event(Input::TerminateCancelled),
        "/mic" => LineAction::Event(Input::ToggleMic),
        "/camera" => LineAction::Event(Input::ToggleCamera),
        "/quit" => LineAction::Quit,
        "/help" => LineAction::Help,
        _ => {
            if let Some(rest) = line.strip_prefix("/mode ") {
                match rest.trim() {
                    "text" => LineAction::Event(Input::SwitchMode(InputMode::Text)),
                    "voice" => LineAction::Event(Input::SwitchMode(InputMode::Voice)),
                    "video" => LineAction::Event(Input::SwitchMode(InputMode::Video)),
                    _ => LineAction::Help,
                }
            } else if line.starts_with('/') {
                LineAction::Help
            } else {
                // A plain line replaces the current answer draft.
                LineAction::Event(Input::TextEdited(line.to_string()))
            }
        }
    }
}

fn print_help() {
    println!("type your answer and press enter (each line replaces the draft)");
    println!("/send submit   /next continue   /mode text|voice|video   /mic   /camera");
    println!("/end finish early   /retry retry a failed call   /help   /quit leave without finishing");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands_map_to_events() {
        assert!(matches!(parse_line("/send"), LineAction::Event(Input::Submit)));
        assert!(matches!(parse_line("/next"), LineAction::Event(Input::Next)));
        assert!(matches!(parse_line("/end"), LineAction::Event(Input::TerminateRequested)));
        assert!(matches!(parse_line("/quit"), LineAction::Quit));
        assert!(matches!(
            parse_line("/mode voice"),
            LineAction::Event(Input::SwitchMode(InputMode::Voice))
        ));
    }

    #[test]
    fn plain_text_becomes_a_draft_edit() {
        match parse_line("I am visiting my sister.") {
            LineAction::Event(Input::TextEdited(text)) => {
                assert_eq!(text, "I am visiting my sister.");
            }
            _ => panic!("expected a text edit"),
        }
    }

    #[test]
    fn unknown_slash_commands_show_help() {
        assert!(matches!(parse_line("/frobnicate"), LineAction::Help));
        assert!(matches!(parse_line("/mode hologram"), LineAction::Help));
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(matches!(parse_line(""), LineAction::Ignore));
    }

    fn spawn_executor() -> (
        mpsc::Sender<Command>,
        mpsc::Receiver<Input>,
        tokio::task::JoinHandle<()>,
    ) {
        let (input_tx, input_rx) = mpsc::channel::<Input>(16);
        let (command_tx, command_rx) = mpsc::channel::<Command>(16);
        let speech: Arc<dyn SpeechOutput> = Arc::new(ConsoleSpeech::new(input_tx.clone()));
        let recognition: Arc<dyn SpeechInput> = Arc::new(UnsupportedRecognition);
        let capture: Arc<dyn MediaCapture> = Arc::new(NoMediaCapture);
        let executor = tokio::spawn(execute_commands(
            command_rx,
            input_tx,
            speech,
            recognition,
            capture,
        ));
        (command_tx, input_rx, executor)
    }

    #[tokio::test]
    async fn executor_reports_capability_fallbacks() {
        let (command_tx, mut input_rx, executor) = spawn_executor();

        // Recognition is unsupported on a terminal, so listening degrades.
        command_tx.send(Command::StartListening).await.unwrap();
        assert!(matches!(
            input_rx.recv().await,
            Some(Input::RecognitionUnavailable)
        ));

        // Camera capture is denied, so video mode degrades.
        command_tx.send(Command::AcquireCapture).await.unwrap();
        assert!(matches!(input_rx.recv().await, Some(Input::CameraDenied)));

        // Console synthesis reports completion right away.
        command_tx
            .send(Command::Speak("Why this country?".into()))
            .await
            .unwrap();
        assert!(matches!(input_rx.recv().await, Some(Input::SpeechEnded)));

        drop(command_tx);
        executor.await.unwrap();
    }

    #[tokio::test]
    async fn executor_timers_fire_and_cancel_by_kind() {
        let (command_tx, mut input_rx, executor) = spawn_executor();

        command_tx
            .send(Command::StartTimer {
                kind: TimerKind::Silence,
                duration: Duration::from_millis(200),
            })
            .await
            .unwrap();
        command_tx
            .send(Command::CancelTimer(TimerKind::Silence))
            .await
            .unwrap();
        command_tx
            .send(Command::StartTimer {
                kind: TimerKind::InputGrace,
                duration: Duration::from_millis(10),
            })
            .await
            .unwrap();

        // Only the uncancelled timer delivers.
        assert!(matches!(
            input_rx.recv().await,
            Some(Input::TimerFired(TimerKind::InputGrace))
        ));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(input_rx.try_recv().is_err());

        drop(command_tx);
        executor.await.unwrap();
    }
}
