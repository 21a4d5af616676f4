use {
    rsvp_channels::ChannelOutbound,
    rsvp_common::types::{InboundMessage, OutboundMessage, Visibility},
    rsvp_config::RsvpConfig,
    rsvp_polls::{Command, Error, HelpTexts, PollRegistry, add_option, cast_vote, parse, render},
    tracing::{debug, info, warn},
};

use crate::help::load_help_texts;

/// Routes inbound messages through the poll engine.
///
/// The router owns the registry and is driven by a single task, so every
/// mutation completes in [`MessageRouter::handle`] before the reply is sent.
#[derive(Debug)]
pub struct MessageRouter {
    polls: PollRegistry,
    trigger: String,
    bot_identity: Option<String>,
    help: HelpTexts,
}

impl MessageRouter {
    pub fn new(trigger: impl Into<String>, help: HelpTexts) -> Self {
        Self {
            polls: PollRegistry::new(),
            trigger: trigger.into(),
            bot_identity: None,
            help,
        }
    }

    /// Build a router from config, reading the help documents.
    pub fn from_config(config: &RsvpConfig) -> Self {
        let help = load_help_texts(&config.help, &config.bot.trigger);
        let router = Self::new(config.bot.trigger.clone(), help);
        match config.bot_identity() {
            Some(identity) => router.with_bot_identity(identity),
            None => router,
        }
    }

    /// Ignore messages sent by `identity` (the bot's own account).
    #[must_use]
    pub fn with_bot_identity(mut self, identity: impl Into<String>) -> Self {
        self.bot_identity = Some(identity.into());
        self
    }

    pub fn polls(&self) -> &PollRegistry {
        &self.polls
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Interpret `msg` and apply it to the registry.
    ///
    /// Returns the reply to send, or `None` when the message is not for the
    /// bot.
    pub fn handle(&mut self, msg: &InboundMessage) -> Option<OutboundMessage> {
        if self
            .bot_identity
            .as_deref()
            .is_some_and(|me| me.eq_ignore_ascii_case(&msg.sender_id))
        {
            debug!(sender = %msg.sender_id, "ignoring own message");
            return None;
        }

        let command = parse(msg, &self.trigger, &self.polls)?;
        info!(
            sender = %msg.sender_id,
            visibility = ?msg.visibility(),
            ?command,
            "bot command"
        );

        let text = self.apply(command, msg);
        Some(OutboundMessage {
            text,
            to: msg.reply_target(),
        })
    }

    /// [`handle`](Self::handle) then deliver the reply through `outbound`.
    ///
    /// Returns whether a reply was sent.
    pub async fn dispatch(
        &mut self,
        msg: &InboundMessage,
        outbound: &dyn ChannelOutbound,
    ) -> rsvp_channels::Result<bool> {
        let Some(reply) = self.handle(msg) else {
            return Ok(false);
        };
        outbound.send(&reply).await?;
        debug!(channel = %outbound.channel_type(), to = ?reply.to, "reply sent");
        Ok(true)
    }

    fn apply(&mut self, command: Command, msg: &InboundMessage) -> String {
        let visibility = msg.visibility();
        match command {
            Command::Help | Command::NotFound { .. } => Ok(self.help_text(visibility)),
            Command::Malformed { title } => {
                debug!(topic = %title, "malformed command");
                Ok(render::malformed(self.help.for_visibility(visibility)))
            },
            Command::NewTopic { title, options } => {
                self.polls.create(&title, &options).map(|poll| {
                    info!(topic = %poll.title(), options = options.len(), "topic created");
                    render::new_topic(poll)
                })
            },
            Command::Vote { title, option } => self.vote(&title, option, msg),
            Command::ImplicitVote { title } => self.vote(&title, 0, msg),
            Command::AddOption { title, label } => self.add_option(&title, &label),
            Command::ResultsRequest { title } => self.polls.close(&title).map(|poll| {
                info!(topic = %poll.title(), voters = poll.voter_count(), "topic closed");
                render::results(&poll)
            }),
        }
        .unwrap_or_else(|e| self.render_error(e, visibility))
    }

    fn vote(&mut self, title: &str, option: usize, msg: &InboundMessage) -> Result<String, Error> {
        let poll = self.polls.require_mut(title)?;
        match cast_vote(poll, &msg.sender_id, &msg.sender_name, option) {
            Ok(outcome) => Ok(render::vote_confirmation(poll, outcome, msg.visibility())),
            Err(Error::OptionOutOfRange { .. }) => Ok(render::out_of_range(poll)),
            Err(e) => Err(e),
        }
    }

    fn add_option(&mut self, title: &str, label: &str) -> Result<String, Error> {
        let poll = self.polls.require_mut(title)?;
        let index = add_option(poll, label)?;
        info!(topic = %poll.title(), index, label = %label, "option added");
        Ok(render::option_added(poll))
    }

    fn render_error(&self, err: Error, visibility: Visibility) -> String {
        match err {
            Error::DuplicateOption { title, label } => render::duplicate_option(&title, &label),
            Error::TopicExists { title } => render::topic_exists(&title),
            Error::UnknownTopic { title } => {
                debug!(topic = %title, "no open topic");
                self.help_text(visibility)
            },
            e @ Error::OptionOutOfRange { .. } => {
                warn!(error = %e, "unexpected option failure");
                self.help_text(visibility)
            },
        }
    }

    fn help_text(&self, visibility: Visibility) -> String {
        self.help.for_visibility(visibility).to_string()
    }
}
