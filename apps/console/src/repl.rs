use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api_client::FeedbackAck;
use crate::conversation::{PendingTurn, SendOutcome, SkipReason};
use crate::desk::RecruiterDesk;
use crate::errors::ClientError;
use crate::feedback::{self, FeedbackDraft, FeedbackKind, ParseFeedbackError, Severity};
use crate::health::{self, Connectivity};
use crate::render;
use crate::session::UploadedContext;
use crate::upload::{ResumeFile, UploadError};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Upload(PathBuf),
    Actions,
    Action(String),
    Analysis,
    Feedback(FeedbackDraft),
    Health,
    History,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command '{0}' (try /help)")]
    Unknown(String),

    #[error(transparent)]
    Feedback(#[from] ParseFeedbackError),
}

/// Parses one input line. Anything not starting with `/` is chat text and
/// is passed through untouched; blank-input filtering happens in the controller.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Chat(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest.trim_end(), ""),
    };

    match name {
        "upload" if args.is_empty() => Err(CommandError::Usage("/upload <path-to-pdf>")),
        "upload" => Ok(Command::Upload(PathBuf::from(args))),
        "actions" => Ok(Command::Actions),
        "action" if args.is_empty() => Err(CommandError::Usage("/action <id>")),
        "action" => Ok(Command::Action(args.to_string())),
        "analysis" => Ok(Command::Analysis),
        "feedback" => parse_feedback(args).map(Command::Feedback),
        "health" => Ok(Command::Health),
        "history" => Ok(Command::History),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_feedback(args: &str) -> Result<FeedbackDraft, CommandError> {
    const USAGE: &str = "/feedback <hallucination|bias|error|suggestion> [severity] <message>";

    let mut words = args.splitn(2, char::is_whitespace);
    let kind: FeedbackKind = match words.next().filter(|w| !w.is_empty()) {
        Some(word) => word.parse()?,
        None => return Err(CommandError::Usage(USAGE)),
    };
    let rest = words.next().unwrap_or("").trim();

    let (severity, message) = match rest.split_once(char::is_whitespace) {
        Some((first, tail)) => match first.parse::<Severity>() {
            Ok(severity) => (severity, tail.trim()),
            Err(_) => (Severity::default(), rest),
        },
        None => match rest.parse::<Severity>() {
            Ok(severity) => (severity, ""),
            Err(_) => (Severity::default(), rest),
        },
    };
    if message.is_empty() {
        return Err(CommandError::Usage(USAGE));
    }

    Ok(FeedbackDraft::new(kind, message).with_severity(severity))
}

/// Work finished off the input loop, reported back for rendering.
enum Event {
    Reply(SendOutcome),
    Health(Connectivity),
    FileRead(Result<ResumeFile, UploadError>),
    Uploaded(Result<UploadedContext, UploadError>),
    Feedback(Result<FeedbackAck, ClientError>),
}

type Events = mpsc::UnboundedSender<Event>;

/// Runs the interactive loop on stdin until `/quit` or end of input.
pub async fn run(desk: RecruiterDesk, resume: Option<PathBuf>) -> Result<()> {
    run_with(desk, resume, BufReader::new(tokio::io::stdin())).await
}

/// Every backend call (chat, upload, health, feedback) runs on a spawned
/// task so the prompt stays live; results come back over a channel and are
/// rendered as they land.
async fn run_with<R>(mut desk: RecruiterDesk, resume: Option<PathBuf>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut lines = input.lines();

    println!("{}\n", render::header(desk.connectivity()));
    println!("{}\n", render::welcome());
    println!("{}\n", render::upload_card(&desk.upload_state()));
    println!("Type /help for commands.");

    probe_health(&desk, &tx);
    if let Some(path) = resume {
        read_resume(path, &tx);
    }

    loop {
        tokio::select! {
            Some(event) = rx.recv() => on_event(&mut desk, event, &tx),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("input closed");
                    break;
                };
                match parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle(&mut desk, command, &tx),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    if desk.conversation().is_pending() {
        println!("Exiting with a reply still pending; it will be discarded.");
    }
    Ok(())
}

fn handle(desk: &mut RecruiterDesk, command: Command, tx: &Events) {
    match command {
        Command::Chat(text) => match desk.begin_chat(&text) {
            Ok(pending) => dispatch(pending, tx),
            Err(SkipReason::InFlight) => println!("Still waiting on the previous reply."),
            Err(SkipReason::EmptyInput) => {}
        },
        Command::Action(id) => match desk.begin_quick_action(&id) {
            Ok(pending) => dispatch(pending, tx),
            Err(e) => println!("{e}"),
        },
        Command::Actions => print!("{}", render::quick_actions(desk.session().has_context())),
        Command::Upload(path) => read_resume(path, tx),
        Command::Analysis => print!("{}", render::analysis_panel(desk.latest_analysis().as_ref())),
        Command::Feedback(draft) => {
            let request = desk.feedback_request(draft);
            let backend = desk.backend();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = feedback::submit(backend.as_ref(), &request).await;
                let _ = tx.send(Event::Feedback(result));
            });
        }
        Command::Health => {
            println!("Checking backend...");
            probe_health(desk, tx);
        }
        Command::History => {
            let messages = desk.conversation().messages();
            if messages.is_empty() {
                println!("{}", render::welcome());
            }
            for message in &messages {
                print!("{}", render::message(message));
            }
        }
        Command::Help => println!("{}", render::help()),
        Command::Quit => {}
    }
}

fn on_event(desk: &mut RecruiterDesk, event: Event, tx: &Events) {
    match event {
        Event::Reply(outcome) => {
            desk.record(&outcome);
            print_outcome(desk, &outcome);
        }
        Event::Health(connectivity) => {
            println!("{}", render::header(desk.set_connectivity(connectivity)));
        }
        Event::FileRead(Ok(file)) => match desk.begin_upload(file) {
            Ok(pending) => {
                println!("{}", render::upload_card(&desk.upload_state()));
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = pending.complete().await;
                    let _ = tx.send(Event::Uploaded(result));
                });
            }
            Err(e) => println!("Upload failed: {e}"),
        },
        Event::FileRead(Err(e)) => println!("Upload failed: {e}"),
        Event::Uploaded(result) => {
            if let Err(e) = desk.finish_upload(result) {
                println!("Upload failed: {e}");
            }
            println!("{}", render::upload_card(&desk.upload_state()));
            if let Some(line) = render::current_resume(desk.session().uploaded()) {
                println!("{line}");
            }
        }
        Event::Feedback(Ok(ack)) => println!("{}", ack.message),
        Event::Feedback(Err(e)) => println!("Feedback submission failed: {e}"),
    }
}

/// Echoes the user's message, then completes the turn off the loop.
fn dispatch(pending: PendingTurn, tx: &Events) {
    println!("{}", announce(&pending));
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = pending.complete().await;
        // Receiver only disappears when the loop has exited.
        let _ = tx.send(Event::Reply(outcome));
    });
}

/// What every started turn prints, whether typed or from a quick action.
fn announce(pending: &PendingTurn) -> String {
    format!(
        "{}{}",
        render::message(pending.user_message()),
        render::pending_indicator()
    )
}

fn probe_health(desk: &RecruiterDesk, tx: &Events) {
    let backend = desk.backend();
    let tx = tx.clone();
    tokio::spawn(async move {
        let connectivity = health::probe(backend.as_ref()).await;
        let _ = tx.send(Event::Health(connectivity));
    });
}

fn read_resume(path: PathBuf, tx: &Events) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let file = ResumeFile::from_path(&path).await;
        let _ = tx.send(Event::FileRead(file));
    });
}

fn print_outcome(desk: &RecruiterDesk, outcome: &SendOutcome) {
    let Some(message) = outcome.message() else {
        return;
    };
    print!("{}", render::message(message));

    let carried_analysis = message
        .metadata
        .as_ref()
        .is_some_and(|m| m.contains_key("analysis"));
    if carried_analysis {
        print!("{}", render::analysis_panel(desk.latest_analysis().as_ref()));
    }
    if let Some(mode) = render::current_mode(desk.conversation().current_task().as_ref()) {
        println!("{mode}");
    }
}
