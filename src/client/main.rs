/**
 * radiochat Terminal Client
 *
 * Usage: radiochat [username] [--realtime]
 *
 * Lines typed on stdin are sent as messages. `/name <new>` switches the
 * username and `/quit` leaves. New messages are printed as they arrive.
 */

use radiochat::client::{ChatApi, ChatSession, UpdateStrategy};
use radiochat::shared::{AppConfig, Message, MessageId};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let strategy = if std::env::args().any(|a| a == "--realtime") {
        UpdateStrategy::Realtime
    } else {
        UpdateStrategy::Polling {
            interval: config.poll_interval,
        }
    };
    let arg_username = std::env::args().skip(1).find(|a| !a.starts_with("--"));

    let mut session = ChatSession::new(ChatApi::new(config), strategy);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut username = arg_username.unwrap_or_default();
    while let Err(e) = session.join(&username) {
        tracing::debug!("[Client] {}", e);
        prompt("Username: ").await?;
        match lines.next_line().await? {
            Some(line) => username = line,
            None => return Ok(()),
        }
    }
    println!("Joined as {}. Type /name <new> to switch, /quit to leave.", username.trim());

    let printer = tokio::spawn(print_messages(session.messages()));

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Rename(name) => {
                session.change_username();
                if let Err(e) = session.join(name) {
                    eprintln!("{}", e);
                }
            }
            Command::Say(_) if session.username().is_none() => {
                eprintln!("Set a username first with /name <username>");
            }
            Command::Say(text) => {
                if let Err(e) = session.send(text).await {
                    eprintln!("Failed to send: {}", e);
                }
            }
        }
    }

    session.leave();
    printer.abort();
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Rename(&'a str),
    Say(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    if line == "/quit" {
        return Command::Quit;
    }
    if line == "/name" {
        return Command::Rename("");
    }
    match line.strip_prefix("/name ") {
        Some(name) => Command::Rename(name.trim()),
        None => Command::Say(line),
    }
}

async fn prompt(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await
}

async fn print_messages(mut rx: watch::Receiver<Vec<Message>>) {
    let mut last_seen: Option<MessageId> = None;

    while rx.changed().await.is_ok() {
        let messages = rx.borrow_and_update().clone();

        if messages.is_empty() && last_seen.is_some() {
            println!("-- chat cleared --");
            last_seen = None;
            continue;
        }

        for message in messages.iter().filter(|m| last_seen.map_or(true, |id| m.id > id)) {
            println!(
                "{} {}: {}",
                message.created_at.format("%H:%M"),
                message.username,
                message.content
            );
        }
        if let Some(last) = messages.last() {
            last_seen = Some(last.id);
        }
    }
}
