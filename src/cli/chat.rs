use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatSession, Command, HistoryDir, Outcome};
use crate::core::{AppConfig, Config};
use crate::openai::OpenAiClient;

/// Maps a line of input to a command. Anything that isn't a known
/// slash command is a prompt.
fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.split_once(' ') {
        Some(("/load", name)) => Command::Load(name.trim().to_string()),
        _ => match trimmed {
            "/load" => Command::Load(String::new()),
            "/history" => Command::ListHistory,
            "/config" => Command::ViewConfig,
            "/status" => Command::ConfigStatus,
            "/quit" | "/exit" => Command::Close,
            _ => Command::Submit(line.to_string()),
        },
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Reply(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Outcome::Skipped => {}
        Outcome::Sessions(names) if names.is_empty() => println!("No saved sessions"),
        Outcome::Sessions(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Outcome::Text(text) => println!("{}", text),
        Outcome::NotFound(name) => println!("Not found: {}", name),
        Outcome::Closed(Some(path)) => println!("Session saved to {}", path.display()),
        Outcome::Closed(None) => {}
    }
}

/// Runs one command from the prompt. A failed command, including a
/// failed model call, is reported and the session stays open.
async fn run_command(session: &mut ChatSession, command: Command) {
    match session.dispatch(command).await {
        Ok(outcome) => print_outcome(&outcome),
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            println!("Error: {:#}", err);
        }
    }
}

pub async fn run(app_config: &AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let config = Config::load(&app_config.config_path)?;
    let completion = OpenAiClient::new(
        &app_config.api_hostname,
        config.api_key(),
        config.model_name(),
    );
    let mut session = ChatSession::new(
        config,
        app_config.config_path.clone(),
        HistoryDir::new(&app_config.history_dir),
        Box::new(completion),
    );
    println!("{}", session.config().status());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                let command = parse_command(&line);
                if command == Command::Close {
                    break;
                }
                run_command(&mut session, command).await;
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    let outcome = session.dispatch(Command::Close).await?;
    print_outcome(&outcome);

    Ok(())
}
