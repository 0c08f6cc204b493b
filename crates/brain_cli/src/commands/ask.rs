//! Ask command - One question, one answer.

use anyhow::Result;
use clap::Args;
use tracing::info;

use brain_chat::render::render_message;
use brain_chat::{ChatSession, ClientConfig};

#[derive(Args)]
pub struct AskArgs {
    /// Brand id to ask about (defaults to the auto-selected brand)
    #[arg(short, long)]
    brand: Option<String>,

    /// The question
    #[arg(required = true, num_args = 1..)]
    question: Vec<String>,
}

pub async fn execute(config: ClientConfig, args: AskArgs) -> Result<()> {
    let mut session = ChatSession::from_config(config);
    session.load_brands().await;

    if let Some(ref id) = args.brand {
        if !session.select_brand(id) {
            anyhow::bail!("Brand not found: {}", id);
        }
    }

    let brand = match session.selected_brand() {
        Some(brand) => brand.clone(),
        None => {
            let ids: Vec<_> = session.selector().brands().iter().map(|b| b.id.as_str()).collect();
            anyhow::bail!(
                "No brand selected; pass --brand <id> (available: {})",
                if ids.is_empty() { "none".to_string() } else { ids.join(", ") }
            );
        }
    };

    let question = args.question.join(" ");
    info!("Asking {} about: {}", brand.id, question);

    if !session.ask(&question).await {
        anyhow::bail!("Question is empty");
    }

    if let Some(error) = session.conversation().last_error() {
        anyhow::bail!("{}", error);
    }

    if let Some(answer) = session.conversation().messages().last() {
        println!("{}", render_message(answer));
    }

    Ok(())
}
