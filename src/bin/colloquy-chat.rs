//! Interactive chat application for OpenAI-compatible endpoints.
//!
//! This binary provides a REPL interface for multi-turn conversations
//! driven by the colloquy session state machine.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! colloquy-chat
//!
//! # Select a model by display name
//! colloquy-chat --model GPT-4o
//!
//! # Set a system prompt
//! colloquy-chat --system "You are a helpful coding assistant"
//!
//! # Disable colors (useful for piping output)
//! colloquy-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/key <value>` - Set the API key for this session
//! - `/clear` - Clear conversation history
//! - `/model <name>` - Change the model
//! - `/models` - List available models
//! - `/system [prompt]` - Set or clear system prompt
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use colloquy::ModelDescriptor;
use colloquy::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, SessionStats,
    help_text, parse_command,
};

/// Main entry point for the colloquy-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("colloquy-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;
    let startup_model = config.model.clone();

    let mut session = ChatSession::new(config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    if let Some(model) = startup_model
        && let Err(err) = session.select_model(&model)
    {
        renderer.print_error(&err.to_string());
    }

    // Ctrl+C while a request is in flight only sets this flag; the request
    // runs to completion before the prompt returns.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "Colloquy Chat (model: {})",
        session.current_model().display_name
    );
    if !session.credential_set() {
        println!("No API key found; set OPENAI_API_KEY or use /key <value>.");
    }
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Key(value) => {
                            session.set_credential(&value);
                            if session.credential_set() {
                                renderer.print_info("API key updated.");
                            } else {
                                renderer.print_info("API key cleared.");
                            }
                        }
                        ChatCommand::Model(model_name) => {
                            match session.select_model(&model_name) {
                                Ok(()) => renderer
                                    .print_info(&format!("Model changed to: {}", model_name)),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Models => {
                            print_models(session.models(), &session.current_model().display_name);
                        }
                        ChatCommand::System(prompt) => {
                            session.set_system_prompt(prompt.clone());
                            match prompt {
                                Some(p) => {
                                    renderer.print_info(&format!("System prompt set to: {}", p))
                                }
                                None => renderer.print_info("System prompt cleared."),
                            }
                        }
                        ChatCommand::Temperature(value) => {
                            match session.set_temperature(value) {
                                Ok(()) => renderer
                                    .print_info(&format!("temperature set to {:.2}", value)),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::ClearTemperature => {
                            session.reset_temperature();
                            renderer.print_info("temperature reset to model default");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session.stats());
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session.stats());
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the provider
                match session.submit(line).await {
                    Ok(reply) => renderer.print_assistant(&reply),
                    Err(e) => renderer.print_error(&e.to_string()),
                }
                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_info("(request already completed; use /quit to exit)");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_models(models: &[ModelDescriptor], current: &str) {
    println!("    Available models:");
    for descriptor in models {
        let marker = if descriptor.display_name == current {
            "*"
        } else {
            " "
        };
        if descriptor.implemented {
            println!(
                "      {} {} ({})",
                marker, descriptor.display_name, descriptor.provider_id
            );
        } else {
            println!("      {} {}", marker, descriptor.display_name);
        }
    }
}

fn print_stats(stats: &SessionStats) {
    println!("    Session Statistics:");
    println!("      Model: {}", stats.model);
    println!("      Messages: {}", stats.message_count);
    println!("      Temperature: {}", describe_float(stats.temperature));
    if let Some(prompt) = stats.system_prompt.as_deref() {
        println!("      System prompt: {}", prompt);
    } else {
        println!("      System prompt: (default)");
    }
    println!("      State: {:?}", stats.state);
    println!(
        "      Total tokens: {} in / {} out ({} requests)",
        stats.total_prompt_tokens, stats.total_completion_tokens, stats.total_requests
    );
    if let Some(prompt_tokens) = stats.last_turn_prompt_tokens {
        let completion_tokens = stats.last_turn_completion_tokens.unwrap_or(0);
        println!("      Last turn tokens: {prompt_tokens} in / {completion_tokens} out");
    }
}

fn print_config(stats: &SessionStats) {
    println!("    Current Configuration:");
    println!("      Model: {}", stats.model);
    println!("      Temperature: {}", describe_float(stats.temperature));
    if let Some(prompt) = stats.system_prompt.as_deref() {
        println!("      System prompt: {}", prompt);
    } else {
        println!("      System prompt: (default)");
    }
}

fn describe_float(value: Option<f32>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "default".to_string())
}
