//! Interactive session loop — line-oriented terminal chat.
//!
//! Reads one line per iteration from stdin, dispatches to the assembler,
//! prints the completion. A failed remote call is reported and the loop
//! continues; `exit`, `quit`, and end-of-input terminate it.

use std::io::Write as _;

use colloquy_config::UiMessages;
use colloquy_core::error::Error;
use colloquy_core::history::ConversationStore;
use colloquy_core::CompletionClient;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::error;

use crate::assembler::RequestAssembler;

/// What a line of input asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Terminate the session (`exit`, `quit`)
    Quit,
    /// Nothing to send; re-prompt
    Empty,
    /// Forward this text to the assembler
    Prompt(String),
}

/// Classify one raw input line.
///
/// The exit commands are exact and case-sensitive; anything else that
/// survives trimming is forwarded verbatim.
pub fn classify(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        "" => Command::Empty,
        "exit" | "quit" => Command::Quit,
        _ => Command::Prompt(trimmed.to_string()),
    }
}

/// Run the interactive session until the user quits or input ends.
///
/// Owns the conversation store for the lifetime of the session; one turn is
/// fully processed before the next line is read.
pub async fn run(
    assembler: &RequestAssembler,
    client: &dyn CompletionClient,
    ui: &UiMessages,
) -> io::Result<()> {
    let mut store = ConversationStore::new();

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    println!("{}", ui.greeting);

    loop {
        print!("{}", ui.prompt);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };

        match classify(&line) {
            Command::Quit => break,
            Command::Empty => {
                println!("{}", ui.empty_input);
            }
            Command::Prompt(text) => {
                match assembler.complete_turn(&mut store, &text, client).await {
                    Ok(response) => {
                        println!("{response}");
                        println!();
                    }
                    Err(Error::EmptyInput) => {
                        // classify() already filters these; keep the guard
                        // symmetric with the assembler's.
                        println!("{}", ui.empty_input);
                    }
                    Err(e) => {
                        error!(error = %e, "Turn failed");
                        eprintln!("[error] {e}");
                        println!();
                    }
                }
            }
        }
    }

    println!("{}", ui.exit);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(classify(""), Command::Empty);
        assert_eq!(classify("   "), Command::Empty);
        assert_eq!(classify("\t"), Command::Empty);
    }

    #[test]
    fn exit_commands_are_exact() {
        assert_eq!(classify("exit"), Command::Quit);
        assert_eq!(classify("quit"), Command::Quit);
        assert_eq!(classify("  exit  "), Command::Quit);
    }

    #[test]
    fn exit_commands_are_case_sensitive() {
        assert_eq!(classify("Exit"), Command::Prompt("Exit".into()));
        assert_eq!(classify("QUIT"), Command::Prompt("QUIT".into()));
        assert_eq!(classify("exit now"), Command::Prompt("exit now".into()));
    }

    #[test]
    fn other_lines_are_forwarded_trimmed() {
        assert_eq!(
            classify("  tell me about Trajan  "),
            Command::Prompt("tell me about Trajan".into())
        );
    }
}
