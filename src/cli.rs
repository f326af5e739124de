//! CLI commands: stdin lines mapped onto onboarding triggers and thread actions.

use std::str::FromStr;

use crate::error::{CliError, FlowError};
use crate::onboarding::{DraftSnapshot, OnboardingFlow, StatusKind, Transition};

pub const ONBOARDING_HELP: &str = "\
Commands:
  name <full name>      email <address>      password <secret>
  terms <yes|no>        submit               toggle
  bio <text>            suggest              edit <suggestion text>
  accept                finish               state
  help                  quit";

pub const THREAD_HELP: &str = "\
Commands:
  say <text>            image <url>          send
  open                  back                 profile
  logout                help                 quit";

/// A line typed during onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Name(String),
    Email(String),
    Password(String),
    Terms(bool),
    Bio(String),
    EditSuggestion(String),
    Submit,
    Toggle,
    Suggest,
    Accept,
    Finish,
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_command(line);
        let cmd = match word {
            "name" => Self::Name(rest.to_string()),
            "email" => Self::Email(rest.to_string()),
            "password" => Self::Password(rest.to_string()),
            "terms" => Self::Terms(parse_flag("terms", rest)?),
            "bio" => Self::Bio(rest.to_string()),
            "edit" => Self::EditSuggestion(rest.to_string()),
            "submit" => Self::Submit,
            "toggle" => Self::Toggle,
            "suggest" => Self::Suggest,
            "accept" => Self::Accept,
            "finish" => Self::Finish,
            "state" => Self::State,
            "help" | "?" => Self::Help,
            "quit" | "/quit" => Self::Quit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }
}

/// What the REPL should print after a command.
#[derive(Debug)]
pub enum Reply {
    Transition(Transition),
    Edited,
    Snapshot(DraftSnapshot),
    Help,
    Quit,
}

/// Run one command against the flow.
pub fn apply(flow: &mut OnboardingFlow, cmd: Command) -> Result<Reply, FlowError> {
    let reply = match cmd {
        Command::Name(v) => flow.set_full_name(v).map(|_| Reply::Edited)?,
        Command::Email(v) => flow.set_email(v).map(|_| Reply::Edited)?,
        Command::Password(v) => flow.set_password(v).map(|_| Reply::Edited)?,
        Command::Terms(v) => flow.set_agree_to_terms(v).map(|_| Reply::Edited)?,
        Command::Bio(v) => flow.set_bio_text(v).map(|_| Reply::Edited)?,
        Command::EditSuggestion(v) => flow.edit_suggestion(v).map(|_| Reply::Edited)?,
        Command::Submit => Reply::Transition(flow.submit()?),
        Command::Toggle => Reply::Transition(flow.toggle()?),
        Command::Suggest => Reply::Transition(flow.generate_suggestion()?),
        Command::Accept => Reply::Transition(flow.accept_suggestion()?),
        Command::Finish => Reply::Transition(flow.finish_bio()?),
        Command::State => Reply::Snapshot(flow.snapshot()),
        Command::Help => Reply::Help,
        Command::Quit => Reply::Quit,
    };
    Ok(reply)
}

/// One-line rendering of a transition, e.g. `[login] error: Please enter a valid email address.`
pub fn render_transition(t: &Transition) -> String {
    match &t.status {
        Some(status) => {
            let label = match status.kind {
                StatusKind::Success => "ok",
                StatusKind::Error => "error",
            };
            format!("[{}] {}: {}", t.stage, label, status.text)
        }
        None => format!("[{}] {}", t.stage, t.stage.title()),
    }
}

/// A line typed while a conversation is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadCommand {
    Say(String),
    Image(String),
    Send,
    Open,
    Back,
    Profile,
    Logout,
    Help,
    Quit,
}

impl FromStr for ThreadCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (word, rest) = split_command(line);
        let cmd = match word {
            "say" => Self::Say(rest.to_string()),
            "image" if !rest.is_empty() => Self::Image(rest.to_string()),
            "image" => return Err(CliError::MissingValue("image")),
            "send" => Self::Send,
            "open" => Self::Open,
            "back" => Self::Back,
            "profile" => Self::Profile,
            "logout" => Self::Logout,
            "help" | "?" => Self::Help,
            "quit" | "/quit" => Self::Quit,
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(cmd)
    }
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

fn parse_flag(command: &'static str, raw: &str) -> Result<bool, CliError> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" | "1" => Ok(true),
        "no" | "n" | "false" | "off" | "0" => Ok(false),
        "" => Err(CliError::MissingValue(command)),
        _ => Err(CliError::InvalidValue {
            command,
            value: raw.to_string(),
        }),
    }
}
