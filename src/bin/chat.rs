use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use persona_chat::commands::{Action, CommandInterpreter};
use persona_chat::core::config::log_level_from_env;
use persona_chat::core::{ChatError, Config};
use persona_chat::features::personas::{PersonaFile, PersonaRegistry};
use persona_chat::features::reply::OpenAiGateway;
use persona_chat::session::{Outcome, Session};

fn prompt_user() -> Result<()> {
    print!("You: ");
    std::io::stdout().flush()?;
    Ok(())
}

fn print_personas(personas: &[(String, String)], active: &str) {
    println!("Personas:");
    for (name, description) in personas {
        let marker = if name == active { "*" } else { " " };
        println!(" {marker} {name} - {description}");
    }
}

/// Log a startup error and stop before any input is read
fn exit_on_fatal(e: ChatError) -> ! {
    error!("Cannot start chat session: {e}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Logger first so configuration warnings are not lost
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level_from_env()))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => exit_on_fatal(e),
    };

    // The openai crate reads its key from the environment
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);

    let mut registry = PersonaRegistry::new();
    if let Some(path) = &config.personas_path {
        let file = PersonaFile::load(path).unwrap_or_else(|e| exit_on_fatal(e));
        info!("Loaded {} personas from {path}", file.personas.len());
        registry = registry.with_personas(file.personas);
    }

    let gateway = OpenAiGateway::new(config.openai_model.clone(), config.timeout);
    info!("Starting persona chat | Model: {}", gateway.model());
    let mut session = Session::new(registry, &config.persona, config.reply_options);

    println!("ChatBot with Memory and Personas");
    println!(
        "Active persona: {} | max length: {} | creativity: {:.1}",
        session.active_persona(),
        session.options().max_response_length,
        session.options().creativity
    );
    println!("Type /help for commands. Get started by typing your first message.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt_user()?;

    while let Some(line) = lines.next_line().await? {
        if matches!(
            CommandInterpreter::new(session.registry()).interpret(&line),
            Action::Converse(_)
        ) {
            println!("Chatbot is typing...");
        }

        match session.handle(&line, &gateway).await {
            Outcome::Noop => {}
            Outcome::Replied { text, error } => {
                if let Some(e) = error {
                    error!("Reply replaced by error turn: {e}");
                }
                println!("Chatbot: {text}\n");
            }
            Outcome::Farewell(text) => {
                println!("Chatbot: {text}");
                info!("Conversation ended by user after {} turns", session.history().len());
                return Ok(());
            }
            Outcome::PersonaSwitched(name) => println!("Persona switched to: {name}"),
            Outcome::PersonaRejected(e) => println!("{e}"),
            Outcome::Cleared => println!("Memory cleared."),
            Outcome::Personas(list) => print_personas(&list, session.active_persona()),
            Outcome::ExportRequested(path) => {
                let path = path.unwrap_or_else(|| config.transcript_path.clone());
                match session.save_transcript(Path::new(&path)).await {
                    Ok(_) => println!("Conversation saved to {path}"),
                    Err(e) => {
                        error!("Failed to save transcript to {path}: {e}");
                        println!("Could not save conversation: {e}");
                    }
                }
            }
            Outcome::Help(text) => println!("{text}"),
        }

        prompt_user()?;
    }

    info!("Input closed, ending session");
    Ok(())
}
