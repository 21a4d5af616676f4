//! Local stdin channel for trying the bot without a chat server.
//!
//! Messages are blocks of lines ended by an empty line. A block starting with
//! `/dm` is sent privately, `/as <id> [name]` switches the simulated sender,
//! anything else is posted publicly to the console channel.

use {
    anyhow::Result,
    async_trait::async_trait,
    rsvp_channels::{ChannelOutbound, ChannelType},
    rsvp_common::types::{InboundMessage, OutboundMessage, ReplyTarget},
    rsvp_router::MessageRouter,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::{debug, info, warn},
};

const DEFAULT_SENDER_ID: &str = "you@console";
const DEFAULT_SENDER_NAME: &str = "You";

/// Who the console is currently speaking as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub name: String,
}

impl Default for Sender {
    fn default() -> Self {
        Self {
            id: DEFAULT_SENDER_ID.into(),
            name: DEFAULT_SENDER_NAME.into(),
        }
    }
}

/// What a finished input block asks the console to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    SwitchSender(Sender),
    Message(InboundMessage),
    /// Nothing to send (a lone `/dm`, a `/as` without an id).
    Empty,
}

/// Interpret one input block as `sender`, posting public messages to
/// `channel`.
pub fn parse_block(block: &str, sender: &Sender, channel: &str) -> Block {
    let block = block.trim_matches('\n');
    let (first, rest) = block.split_once('\n').unwrap_or((block, ""));

    if let Some(args) = command_args(first, "/as") {
        let mut words = args.split_whitespace();
        let Some(id) = words.next() else {
            return Block::Empty;
        };
        let name = words.collect::<Vec<_>>().join(" ");
        let name = if name.is_empty() {
            id.split('@').next().unwrap_or(id).to_string()
        } else {
            name
        };
        return Block::SwitchSender(Sender {
            id: id.to_string(),
            name,
        });
    }

    if let Some(args) = command_args(first, "/dm") {
        let body = [args.trim(), rest]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if body.trim().is_empty() {
            return Block::Empty;
        }
        return Block::Message(InboundMessage::private(
            body,
            sender.id.as_str(),
            sender.name.as_str(),
        ));
    }

    if block.trim().is_empty() {
        return Block::Empty;
    }
    Block::Message(InboundMessage::public(
        block,
        sender.id.as_str(),
        sender.name.as_str(),
        channel,
        None,
    ))
}

/// Text after `command` when `line` starts with it as a whole word.
fn command_args<'a>(line: &'a str, command: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(command)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Prints replies to stdout.
#[derive(Debug, Default)]
pub struct ConsoleOutbound;

#[async_trait]
impl ChannelOutbound for ConsoleOutbound {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Console
    }

    async fn send(&self, message: &OutboundMessage) -> rsvp_channels::Result<()> {
        let header = match &message.to {
            ReplyTarget::Channel { channel, .. } => format!("[#{channel}]"),
            ReplyTarget::Direct { recipient } => format!("[dm to {recipient}]"),
        };
        println!("{header}\n{}\n", message.text);
        Ok(())
    }
}

/// Read blocks from stdin until EOF or ctrl-c.
pub async fn run(mut router: MessageRouter, channel: &str) -> Result<()> {
    eprintln!(
        "rsvpbot console: posting to #{channel} as {DEFAULT_SENDER_NAME}. \
         End each message with an empty line; \"/dm\" sends privately, \
         \"/as <id> [name]\" switches sender."
    );

    let outbound = ConsoleOutbound;
    let mut sender = Sender::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut block = String::new();

    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let finished = match &line {
            Some(text) if !text.trim().is_empty() => {
                block.push_str(text);
                block.push('\n');
                continue;
            },
            Some(_) => false,
            None => true,
        };

        if !block.is_empty() {
            match parse_block(&block, &sender, channel) {
                Block::SwitchSender(next) => {
                    info!(id = %next.id, name = %next.name, "console sender switched");
                    sender = next;
                },
                Block::Message(msg) => {
                    match router.dispatch(&msg, &outbound).await {
                        Ok(true) => {},
                        Ok(false) => debug!("message ignored"),
                        Err(e) => warn!(error = %e, "failed to print reply"),
                    }
                },
                Block::Empty => {},
            }
            block.clear();
        }

        if finished {
            break;
        }
    }

    info!("console closed");
    Ok(())
}
