//! Line-oriented shell: the stand-in view layer. Parses user commands into
//! orchestrator messages and renders the view model to stdout.

use std::io::{self, BufRead};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::client_warn;
use docchat_core::{AppViewModel, Msg, Role, StagedFile, MIME_PDF, MIME_TEXT_PLAIN};

use crate::AppEvent;

/// One parsed shell command. Parsing is pure; file loading happens later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ChatStage(Vec<String>),
    Upload,
    Ask(String),
    ChatReset,
    BatchStage(Vec<String>),
    Prompt(String),
    Submit,
    BatchReset,
    Status,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head {
        "chat-stage" => Some(Command::ChatStage(split_paths(rest))),
        "upload" => Some(Command::Upload),
        "ask" => Some(Command::Ask(rest.to_string())),
        "chat-reset" => Some(Command::ChatReset),
        "batch-stage" => Some(Command::BatchStage(split_paths(rest))),
        "prompt" => Some(Command::Prompt(rest.to_string())),
        "submit" => Some(Command::Submit),
        "batch-reset" => Some(Command::BatchReset),
        "status" => Some(Command::Status),
        "help" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn split_paths(rest: &str) -> Vec<String> {
    rest.split_whitespace().map(ToOwned::to_owned).collect()
}

/// MIME type by extension. Unknown extensions get an opaque type and are
/// filtered out by the core, like any other unsupported file.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => MIME_PDF,
        Some(ext) if ext.eq_ignore_ascii_case("txt") => MIME_TEXT_PLAIN,
        _ => "application/octet-stream",
    }
}

fn load_staged(paths: &[String]) -> Vec<StagedFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path_ref = Path::new(path);
        match std::fs::read(path_ref) {
            Ok(bytes) => files.push(StagedFile {
                name: path_ref
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(path)
                    .to_string(),
                mime_type: mime_for_path(path_ref).to_string(),
                bytes: Arc::new(bytes),
            }),
            Err(err) => {
                client_warn!("could not read {}: {}", path, err);
                println!("could not read {path}");
            }
        }
    }
    files
}

fn command_events(command: Command) -> Vec<AppEvent> {
    match command {
        Command::ChatStage(paths) => {
            vec![AppEvent::Intent(Msg::ChatFilesStaged(load_staged(&paths)))]
        }
        Command::Upload => vec![AppEvent::Intent(Msg::ChatUploadClicked)],
        Command::Ask(text) => vec![
            AppEvent::Intent(Msg::ChatQueryEdited(text)),
            AppEvent::Intent(Msg::ChatQuerySubmitted),
        ],
        Command::ChatReset => vec![AppEvent::Intent(Msg::ChatResetClicked)],
        Command::BatchStage(paths) => {
            vec![AppEvent::Intent(Msg::BatchFilesStaged(load_staged(&paths)))]
        }
        Command::Prompt(text) => vec![AppEvent::Intent(Msg::BatchPromptEdited(text))],
        Command::Submit => vec![AppEvent::Intent(Msg::BatchSubmitClicked)],
        Command::BatchReset => vec![AppEvent::Intent(Msg::BatchResetClicked)],
        Command::Status => vec![AppEvent::Render],
        Command::Help => {
            print_help();
            Vec::new()
        }
        Command::Quit => vec![AppEvent::Quit],
    }
}

/// Reads stdin until EOF or `quit`, forwarding events to the main loop.
pub fn spawn_input_thread(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_line(&line) else {
                println!("unknown command; type `help`");
                continue;
            };
            let quit = command == Command::Quit;
            for event in command_events(command) {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
            if quit {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}

pub fn print_help() {
    println!("commands:");
    println!("  chat-stage <paths...>   stage files for the chat corpus");
    println!("  upload                  upload staged files");
    println!("  ask <question>          ask the corpus a question");
    println!("  chat-reset              clear the chat and the server corpus");
    println!("  batch-stage <paths...>  stage PDFs for a batch job");
    println!("  prompt <text>           set the batch prompt");
    println!("  submit                  run the batch job");
    println!("  batch-reset             clear the batch form");
    println!("  status                  reprint the current state");
    println!("  quit                    exit");
}

pub fn render(view: &AppViewModel) {
    println!("-- chat --");
    if !view.chat.staged_names.is_empty() {
        println!("staged: {}", view.chat.staged_names);
    }
    if !view.chat.upload_status.is_empty() {
        println!("upload: {}", view.chat.upload_status);
    }
    for turn in &view.chat.transcript {
        let who = match turn.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{who}: {}", turn.content);
    }
    if !view.chat.notice.is_empty() {
        println!("note: {}", view.chat.notice);
    }
    if view.chat.busy.is_some() {
        println!("(waiting for backend...)");
    }
    println!("-- batch --");
    if !view.batch.file_names.is_empty() {
        println!("files: {}", view.batch.file_names.join(", "));
    }
    if !view.batch.prompt.is_empty() {
        println!("prompt: {}", view.batch.prompt);
    }
    if !view.batch.status_line.is_empty() {
        println!("status: {}", view.batch.status_line);
    }
    if let Some(name) = &view.batch.archive_filename {
        println!("archive: {name}");
    }
    if view.batch.busy {
        println!("(processing batch...)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse_line("chat-stage a.pdf b.txt"),
            Some(Command::ChatStage(vec![
                "a.pdf".to_string(),
                "b.txt".to_string()
            ]))
        );
        assert_eq!(
            parse_line("ask what is this about?"),
            Some(Command::Ask("what is this about?".to_string()))
        );
        assert_eq!(parse_line("  submit  "), Some(Command::Submit));
        assert_eq!(parse_line("exit"), Some(Command::Quit));
    }

    #[test]
    fn rejects_unknown_and_empty_input() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line("frobnicate"), None);
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for_path(Path::new("doc.pdf")), MIME_PDF);
        assert_eq!(mime_for_path(Path::new("DOC.PDF")), MIME_PDF);
        assert_eq!(mime_for_path(Path::new("notes.txt")), MIME_TEXT_PLAIN);
        assert_eq!(
            mime_for_path(Path::new("image.png")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_for_path(Path::new("no_extension")),
            "application/octet-stream"
        );
    }
}
