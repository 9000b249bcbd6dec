//! Interactive chat loop.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use chrono::Local;
use colored::Colorize;
use lecul_core::persona::Persona;
use lecul_core::session::{ChatSession, ChatTransport, Message, SendOutcome};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::Result;

const COMMANDS: [&str; 4] = ["/new", "/mode", "/help", "/quit"];

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    NewChat,
    ToggleMode,
    SetMode(Persona),
    Help,
    Quit,
    Unknown(String),
}

/// Classify a line. Anything not starting with `/` is a message, kept verbatim.
pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return Input::Message(line.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (command, arg) {
        ("/new", None) => Input::NewChat,
        ("/mode", None) => Input::ToggleMode,
        ("/mode", Some(tag)) => match tag.parse() {
            Ok(persona) => Input::SetMode(persona),
            Err(_) => Input::Unknown(trimmed.to_string()),
        },
        ("/help", _) => Input::Help,
        ("/quit" | "/exit", _) => Input::Quit,
        _ => Input::Unknown(trimmed.to_string()),
    }
}

/// Readline helper: shows the persona placeholder on an empty line and
/// completes slash commands.
struct ChatHelper {
    placeholder: &'static str,
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        line.is_empty().then(|| self.placeholder.to_string())
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.dimmed().to_string())
    }
}

impl Validator for ChatHelper {}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("lecul").join("history.txt"))
}

fn print_banner(session: &ChatSession) {
    let branding = session.branding();
    println!();
    println!("{}", branding.display_name.bold());
    println!("{}", branding.tagline.bright_white());
    println!("{}", "Posez-moi n'importe quelle question (/help pour l'aide)".dimmed());
    println!();
}

fn print_help() {
    println!("{}", "/new            nouvelle conversation".dimmed());
    println!("{}", "/mode           changer de personnage".dimmed());
    println!("{}", "/mode <nom>     primary | secondary".dimmed());
    println!("{}", "/quit           quitter".dimmed());
}

fn print_reply(session: &ChatSession, message: &Message) {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    println!(
        "{} {}",
        session.branding().display_name.bright_magenta().bold(),
        format!("[{time}]").dimmed()
    );
    println!("{}", message.content);
    println!();
}

/// Run the chat loop until `/quit`, Ctrl-C, or end of input.
pub async fn run<T: ChatTransport>(transport: &T, persona: Persona) -> Result<()> {
    let mut session = ChatSession::new(persona);
    let mut editor: Editor<ChatHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ChatHelper {
        placeholder: session.branding().placeholder,
    }));

    let history = history_path();
    if let Some(path) = &history
        && let Err(e) = editor.load_history(path)
    {
        log::debug!("no readline history loaded: {e}");
    }

    print_banner(&session);

    loop {
        let prompt = format!("{} ", "›".bright_blue());
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }

        match parse_input(&line) {
            Input::Message(text) => {
                session.set_input(text);
                if !session.can_send() {
                    continue;
                }
                println!("{}", session.branding().thinking.dimmed());
                if session.send(transport).await == SendOutcome::Replied
                    && let Some(reply) = session.messages().last()
                {
                    print_reply(&session, reply);
                }
            }
            Input::NewChat => {
                session.new_chat();
                print_banner(&session);
            }
            Input::ToggleMode => {
                session.toggle_persona();
                switch_branding(&mut editor, &session);
            }
            Input::SetMode(persona) => {
                if session.set_persona(persona) {
                    switch_branding(&mut editor, &session);
                }
            }
            Input::Help => print_help(),
            Input::Quit => break,
            Input::Unknown(cmd) => {
                println!("{}", format!("Commande inconnue : {cmd} (tapez /help)").yellow());
            }
        }
    }

    if let Some(path) = &history {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        if let Err(e) = editor.save_history(path) {
            log::warn!("could not save readline history: {e}");
        }
    }

    Ok(())
}

fn switch_branding(editor: &mut Editor<ChatHelper, DefaultHistory>, session: &ChatSession) {
    if let Some(helper) = editor.helper_mut() {
        helper.placeholder = session.branding().placeholder;
    }
    print_banner(session);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse_input(" bonjour "), Input::Message(" bonjour ".into()));
        assert_eq!(parse_input(""), Input::Message(String::new()));
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_input("/new"), Input::NewChat);
        assert_eq!(parse_input("  /mode  "), Input::ToggleMode);
        assert_eq!(parse_input("/mode secondary"), Input::SetMode(Persona::Secondary));
        assert_eq!(parse_input("/mode primary"), Input::SetMode(Persona::Primary));
        assert_eq!(parse_input("/help"), Input::Help);
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(parse_input("/exit"), Input::Quit);
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(parse_input("/mode bogus"), Input::Unknown("/mode bogus".into()));
        assert_eq!(parse_input("/dance"), Input::Unknown("/dance".into()));
        assert_eq!(parse_input("/new now"), Input::Unknown("/new now".into()));
    }
}
