//! Front desk line commands
//!
//! One command per line, arguments separated by whitespace. Arguments
//! containing spaces can be wrapped in single or double quotes:
//!
//! ```text
//! register "Ana Silva" "+1 555 0100" booked dental
//! edit 3 status=done name="Ana S."
//! ```

use strum::IntoEnumIterator;

use crate::app::cli::display::{entry_table, registration_line, render_snapshot};
use crate::core::styles::StyleRole;
use crate::core::validation::ValidationError;
use crate::serving::api::{
    EntryEdit, EntryId, EntryKind, EntryStatus, NewEntry, QueueResult, QueueService,
};

const REGISTER_USAGE: &str = "register <name> <contact> [kind] [category]";
const EDIT_USAGE: &str = "edit <id> [name=<name>] [category=<category>] [status=<status>]";

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unknown command '{0}'; type 'help' for the list of commands")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unterminated quote in input")]
    UnterminatedQuote,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register(NewEntry),
    Next,
    Show(EntryId),
    Edit(EntryId, EntryEdit),
    Delete(EntryId),
    Reset,
    List,
    Help,
    Quit,
}

/// What the console should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Split a line into arguments, honouring quotes
pub fn tokenize(line: &str) -> Result<Vec<String>, ConsoleError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ConsoleError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_id(args: &[String], usage: &'static str) -> Result<EntryId, ConsoleError> {
    match args {
        [id] => Ok(id.parse()?),
        _ => Err(ConsoleError::Usage(usage)),
    }
}

fn parse_register(args: &[String]) -> Result<Command, ConsoleError> {
    let (name, contact, rest) = match args {
        [name, contact, rest @ ..] if rest.len() <= 2 => (name, contact, rest),
        _ => return Err(ConsoleError::Usage(REGISTER_USAGE)),
    };

    let mut new_entry = NewEntry::new(name.as_str(), contact.as_str());
    if let Some(kind) = rest.first() {
        let kind = kind.parse::<EntryKind>().map_err(|_| {
            ValidationError::new(format!("'{kind}' is not a client kind ({})", kind_names()))
        })?;
        new_entry = new_entry.with_kind(kind);
    }
    if let Some(category) = rest.get(1) {
        new_entry = new_entry.with_category(category.as_str());
    }
    Ok(Command::Register(new_entry))
}

fn parse_edit(args: &[String]) -> Result<Command, ConsoleError> {
    let Some((id, fields)) = args.split_first() else {
        return Err(ConsoleError::Usage(EDIT_USAGE));
    };
    if fields.is_empty() {
        return Err(ConsoleError::Usage(EDIT_USAGE));
    }

    let id: EntryId = id.parse()?;
    let mut edit = EntryEdit::default();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(ConsoleError::Usage(EDIT_USAGE));
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "name" => edit.name = Some(value.to_string()),
            "category" => edit.category = Some(value.to_string()),
            "status" => {
                let status = value.parse::<EntryStatus>().map_err(|_| {
                    ValidationError::new(format!(
                        "'{value}' is not a status ({})",
                        status_names()
                    ))
                })?;
                edit.status = Some(status);
            }
            other => {
                return Err(ValidationError::new(format!(
                    "'{other}' cannot be edited; use name, category or status"
                ))
                .into())
            }
        }
    }
    Ok(Command::Edit(id, edit))
}

/// Parse one console line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, ConsoleError> {
    let tokens = tokenize(line)?;
    let Some((verb, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "register" | "add" => parse_register(args)?,
        "next" | "advance" => Command::Next,
        "show" => Command::Show(parse_id(args, "show <id>")?),
        "edit" => parse_edit(args)?,
        "delete" | "remove" => Command::Delete(parse_id(args, "delete <id>")?),
        "reset" => Command::Reset,
        "list" | "queue" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn kind_names() -> String {
    EntryKind::iter()
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn status_names() -> String {
    EntryStatus::iter()
        .map(|status| status.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn help_text(use_color: bool) -> String {
    let commands = [
        (REGISTER_USAGE, "add a client to the queue"),
        ("next", "finish the current client and call the next one"),
        ("list", "show the queue"),
        ("show <id>", "show one entry with its tracking link"),
        (EDIT_USAGE, "change an entry"),
        ("delete <id>", "remove an entry"),
        ("reset", "remove every entry"),
        ("quit", "leave the console"),
    ];

    let mut text = StyleRole::Header.paint("Commands:", use_color);
    for (usage, description) in commands {
        text.push_str(&format!(
            "\n  {}\n      {}",
            StyleRole::Booked.paint(usage, use_color),
            description
        ));
    }
    text.push_str(&format!(
        "\nKinds: {}\nStatuses: {}",
        kind_names(),
        status_names()
    ));
    text
}

/// Run a parsed command against the queue
pub async fn execute(
    service: &QueueService,
    command: Command,
    use_color: bool,
) -> QueueResult<Reply> {
    let text = match command {
        Command::Register(new_entry) => {
            let registration = service.register(new_entry).await?;
            registration_line(&registration, use_color)
        }
        Command::Next => {
            let advance = service.advance_service().await?;
            let finished = advance
                .completed
                .map(|done| format!("Finished #{} {}. ", done.sequence_number, done.name))
                .unwrap_or_default();
            let calling = match advance.started {
                Some(next) => format!("Calling #{} {}", next.sequence_number, next.name),
                None => "Nobody is waiting".to_string(),
            };
            StyleRole::Serving.paint(&format!("{finished}{calling}"), use_color)
        }
        Command::Show(id) => entry_table(&service.get_entry(id).await?, use_color).to_string(),
        Command::Edit(id, edit) => {
            let entry = service.edit_entry(id, edit).await?;
            format!(
                "Updated #{} {} [{}, {}]",
                entry.sequence_number, entry.name, entry.status, entry.category
            )
        }
        Command::Delete(id) => {
            service.delete_entry(id).await?;
            format!("Deleted entry {id}")
        }
        Command::Reset => {
            let removed = service.reset().await?;
            format!("Queue cleared, {removed} entries removed")
        }
        Command::List => render_snapshot(&service.snapshot().await?, use_color),
        Command::Help => help_text(use_color),
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Text(text))
}
