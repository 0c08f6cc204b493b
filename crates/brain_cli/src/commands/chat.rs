//! Chat command - Interactive conversation.
//!
//! Each line typed is fed to the conversation's input field key by key.
//! Enter sends; a line ending in `\` is a Shift+Enter line break.

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use brain_chat::render::{
    render_brand_menu, render_empty_state, render_message, DISCLAIMER, STARTER_PROMPTS, THINKING,
};
use brain_chat::{ChatSession, ClientConfig, Conversation, KeyPress};

#[derive(Args)]
pub struct ChatArgs {
    /// Brand id to start with
    #[arg(short, long)]
    brand: Option<String>,
}

const HELP: &str = "\
Commands:
  /brand <id>   select a brand
  /brands       reload and show the brand list
  /prompt <n>   send starter prompt n
  /regen        regenerate the last answer
  /help         show this help
  /quit         leave
End a line with \\ to continue on the next line.";

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ChatInput {
    Quit,
    Help,
    Regenerate,
    Brands,
    Brand(String),
    Prompt(usize),
    /// Text followed by a line break that does not send.
    Continue(String),
    /// Text followed by Enter.
    Text(String),
    Unknown(String),
}

pub fn parse_line(line: &str) -> ChatInput {
    let trimmed = line.trim_end_matches(['\r', '\n']);

    if let Some(command) = trimmed.trim().strip_prefix('/') {
        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();
        return match name {
            "quit" | "exit" | "q" => ChatInput::Quit,
            "help" => ChatInput::Help,
            "regen" | "regenerate" => ChatInput::Regenerate,
            "brands" => ChatInput::Brands,
            "brand" if !arg.is_empty() => ChatInput::Brand(arg.to_string()),
            "prompt" => match arg.parse::<usize>() {
                Ok(n) if n >= 1 => ChatInput::Prompt(n - 1),
                _ => ChatInput::Unknown(trimmed.to_string()),
            },
            _ => ChatInput::Unknown(trimmed.to_string()),
        };
    }

    match trimmed.strip_suffix('\\') {
        Some(text) => ChatInput::Continue(text.to_string()),
        None => ChatInput::Text(trimmed.to_string()),
    }
}

pub async fn execute(config: ClientConfig, args: ChatArgs) -> Result<()> {
    let mut session = ChatSession::from_config(config);

    println!("{}", render_empty_state());
    println!();
    load_and_show_brands(&mut session).await;

    if let Some(ref id) = args.brand {
        if !session.select_brand(id) {
            anyhow::bail!("Brand not found: {}", id);
        }
    }
    print_prompt(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = session.conversation().messages().len();

    while let Some(line) = lines.next_line().await? {
        let sent = match parse_line(&line) {
            ChatInput::Quit => break,
            ChatInput::Help => {
                println!("{}", HELP);
                false
            }
            ChatInput::Brands => {
                load_and_show_brands(&mut session).await;
                false
            }
            ChatInput::Brand(id) => {
                if !session.select_brand(&id) {
                    println!("Unknown brand: {}", id);
                }
                false
            }
            ChatInput::Prompt(index) => {
                if index >= STARTER_PROMPTS.len() {
                    println!("No starter prompt {}", index + 1);
                    false
                } else {
                    println!("{}", THINKING);
                    session.use_starter(index).await
                }
            }
            ChatInput::Regenerate => {
                if session.conversation().ends_with_assistant() {
                    shown -= 1;
                }
                println!("{}", THINKING);
                let sent = session.regenerate().await;
                if !sent {
                    shown = session.conversation().messages().len();
                }
                sent
            }
            ChatInput::Continue(text) => {
                if let Some(hint) = dropped_input_hint(session.conversation(), &text) {
                    println!("{}", hint);
                }
                type_text(&mut session, &text).await;
                session.press(KeyPress::shift_enter()).await;
                continue;
            }
            ChatInput::Text(text) => {
                if let Some(hint) = dropped_input_hint(session.conversation(), &text) {
                    println!("{}", hint);
                }
                type_text(&mut session, &text).await;
                if session.conversation().can_submit() {
                    println!("{}", THINKING);
                }
                session.press(KeyPress::enter()).await
            }
            ChatInput::Unknown(cmd) => {
                println!("Unknown command: {} (try /help)", cmd);
                false
            }
        };

        if sent {
            let messages = session.conversation().messages();
            for message in messages.iter().skip(shown).filter(|m| m.is_assistant()) {
                println!("{}", render_message(message));
            }
            shown = messages.len();
            if let Some(error) = session.conversation().last_error() {
                println!("! {}", error);
            }
        }
        print_prompt(&session);
    }

    Ok(())
}

/// Typed text is ignored while input is disabled; say why instead of
/// dropping it silently.
fn dropped_input_hint(conversation: &Conversation, text: &str) -> Option<String> {
    if conversation.input_enabled() || text.trim().is_empty() {
        return None;
    }
    Some(format!("{} (use /brand <id>)", conversation.placeholder()))
}

async fn type_text(session: &mut ChatSession, text: &str) {
    for c in text.chars() {
        session.press(KeyPress::char(c)).await;
    }
}

async fn load_and_show_brands(session: &mut ChatSession) {
    session.load_brands().await;
    if let Some(reason) = session.selector().last_failure() {
        println!("⚠️  Brand fetch failed: {}", reason);
    }
    println!(
        "{}",
        render_brand_menu(session.selector(), session.selected_brand())
    );
}

fn print_prompt(session: &ChatSession) {
    println!();
    println!("[{}]  {}", session.conversation().placeholder(), DISCLAIMER);
}
