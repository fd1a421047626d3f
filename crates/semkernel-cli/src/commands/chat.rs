//! Chat command handler

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use semkernel::{ChatHistory, SemkernelApp};

use crate::error::{CliError, Result};

pub async fn run_chat(app: &SemkernelApp, initial_message: Option<String>, once: bool) -> Result<()> {
    // Only show header in interactive mode
    if !once {
        println!("🤖 Semkernel Chat - Type 'exit' to quit");
        println!("================================");
    }

    let mut history = ChatHistory::new();

    if let Some(msg) = initial_message {
        if !once {
            println!("You: {msg}");
        }
        let reply = app.chat(&mut history, msg).await?;

        // In once mode, just print the reply without "Bot:" prefix
        if once {
            println!("{reply}");
            return Ok(());
        }
        println!("Bot: {reply}");
    } else if once {
        return Err(CliError::InvalidInput(
            "Message is required in once mode".to_string(),
        ));
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("🤖 > ") {
            Ok(line) => {
                let input = line.trim();

                if input == "exit" || input == "quit" {
                    println!("Goodbye! 👋");
                    break;
                }
                if input.is_empty() {
                    continue;
                }
                if input == "/history" {
                    for message in &history {
                        println!("  [{}] {}", message.role, message.content);
                    }
                    continue;
                }

                rl.add_history_entry(&line).ok();

                // A failed turn leaves the conversation untouched
                match app.chat(&mut history, input).await {
                    Ok(reply) => println!("Bot: {reply}"),
                    Err(e) => eprintln!("⚠️  {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("\nCtrl-C received. Use 'exit' to quit.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye! 👋");
                break;
            }
            Err(err) => {
                return Err(err.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_once_requires_message() {
        let app = SemkernelApp::builder("chat-test").with_echo_service().build().unwrap();
        let err = run_chat(&app, None, true).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_once_with_message() {
        let app = SemkernelApp::builder("chat-test").with_echo_service().build().unwrap();
        assert!(run_chat(&app, Some("hi".to_string()), true).await.is_ok());
    }
}
