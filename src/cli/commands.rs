//! The command registry and the interactive protocol of every command.
//!
//! A command may prompt several times before it acts. Typing `b` at any line prompt
//! abandons it (`AppError::CommandStopped`); validation failures surface as
//! `AppError::InvalidInput`. Both are handled by the dispatcher in `App`.

use super::{Context, Flow, Terminal};
use crate::error::{AppError, Result};
use crate::models::{Bookmark, ExportDocument, ExportedBookmark, ImportDocument};
use crate::service::BookmarkService;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Input that abandons the running command.
const BACK: &str = "b";

pub const USAGE: &str = "
    Acceptable commands:
    'q', 'quit' - quit,
    'h', 'help' - help,
    'b' - back (inside a command),
    'add' - add a new bookmark,
    'show' - show given amount of bookmarks,
    'search' - search bookmarks by a term,
    'select' - select a bookmark,
    'edit' - edit a selected bookmark,
    'delete' - delete a selected bookmark,
    'export' - export all bookmarks to a json file,
    'import' - import bookmarks from a json file
";

const DELETE_HINT: &str = "
    To delete a bookmark, first choose 'select', type the ID of the bookmark and then 'd'
";

const SHOW_USAGE: &str = "Show usage:
    get all: show | limit selection: show <int> | get range: show <start> <count>
";

const SELECT_USAGE: &str = "
    To delete a bookmark: type in ID of the bookmark, press enter and then type 'd'
    To edit a bookmark: type in ID of the bookmark, press enter and then type 'e'
    To go back: type in 'b'
";

/// Every command the prompt understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Add,
    Show,
    Edit,
    Delete,
    Select,
    Search,
    Quit,
    Export,
    Import,
    Unknown,
}

impl Command {
    /// Looks a command up by name, ignoring case. Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "help" | "h" => Command::Help,
            "add" => Command::Add,
            "show" => Command::Show,
            "edit" => Command::Edit,
            "delete" => Command::Delete,
            "select" => Command::Select,
            "search" => Command::Search,
            "quit" | "q" => Command::Quit,
            "export" => Command::Export,
            "import" => Command::Import,
            _ => Command::Unknown,
        }
    }

    /// Whether the screen is cleared before the command runs.
    pub fn clears_screen(self) -> bool {
        self != Command::Quit
    }

    /// Runs the command with the arguments that followed its name.
    pub async fn execute<S, T>(self, argv: &[String], ctx: &mut Context<S, T>) -> Result<Flow>
    where
        S: BookmarkService,
        T: Terminal,
    {
        match self {
            Command::Help => {
                ctx.terminal.write(USAGE);
                ctx.terminal.write(DELETE_HINT);
            },
            Command::Add => add(ctx).await?,
            Command::Show => show(argv, ctx).await?,
            Command::Edit => edit()?,
            Command::Delete => delete(argv, ctx).await?,
            Command::Select => select(argv, ctx).await?,
            Command::Search => search(argv, ctx).await?,
            Command::Quit => {
                ctx.terminal.exit("Have a nice day!");
                return Ok(Flow::Quit);
            },
            Command::Export => export(argv, ctx).await?,
            Command::Import => import(argv, ctx).await?,
            Command::Unknown => {
                ctx.terminal.write("command unrecognized.");
                ctx.terminal.write(USAGE);
            },
        }
        Ok(Flow::Continue)
    }
}

/// Splits an input line into a command and its arguments. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<(Command, Vec<String>)> {
    let mut tokens = line.split_whitespace();
    let command = Command::from_name(tokens.next()?);
    Some((command, tokens.map(str::to_string).collect()))
}

/// Parses an integer argument, `None` if the token is not one.
pub fn parse_int(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// Prints an optional header and reads one line, aborting the command on `b`.
fn read_new_arg<T: Terminal>(terminal: &mut T, prompt: &str, title: &str) -> Result<String> {
    if !title.is_empty() {
        terminal.write(title);
    }
    let arg = terminal.read(prompt)?;
    if arg.trim() == BACK {
        debug!("Command stopped at prompt '{}'", prompt.trim());
        return Err(AppError::CommandStopped);
    }
    Ok(arg)
}

/// Reads single characters until one of `accepted` is typed.
fn read_choice<T: Terminal>(terminal: &mut T, prompt: &str, accepted: &[char]) -> Result<char> {
    loop {
        let choice = terminal.read_chr(prompt)?;
        if accepted.contains(&choice) {
            return Ok(choice);
        }
    }
}

fn invalid<T: Terminal>(terminal: &mut T, usage: &str) {
    terminal.write(&format!("Invalid command!\n{}", usage));
}

// --- add ---

async fn add<S: BookmarkService, T: Terminal>(ctx: &mut Context<S, T>) -> Result<()> {
    let url = read_new_arg(&mut ctx.terminal, "Url: ", "New bookmark")?
        .trim()
        .to_string();

    ctx.terminal.start_progress("Fetching page title...")?;
    let fetched = ctx.service.get_title_by_url(&url).await;
    ctx.terminal.finish_progress();

    let url_title = fetched?.ok_or_else(|| AppError::invalid("Invalid url"))?;
    let title = choose_title(&mut ctx.terminal, &url, &url_title)?;

    let bookmark = ctx
        .service
        .create(&url, &title)
        .await?
        .ok_or_else(|| AppError::invalid("Invalid bookmark"))?;
    ctx.terminal
        .write(&format!("\nBookmark \"{}\" created!", bookmark.short_str()));
    Ok(())
}

/// Keeps the fetched title or asks for a custom one.
fn choose_title<T: Terminal>(terminal: &mut T, url: &str, url_title: &str) -> Result<String> {
    let prompt = format!("Do you want to keep the title \"{}\"? [y/n]", url_title);
    terminal.write("");
    if read_choice(terminal, &prompt, &['y', 'n'])? == 'y' {
        return Ok(url_title.to_string());
    }

    terminal.clear();
    let title = read_new_arg(terminal, "Title: ", &format!("New bookmark\nUrl: {}", url))?;
    Ok(title.trim().to_string())
}

// --- show ---

async fn show<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    match argv {
        [] => list(ctx, None, None).await,
        [arg] => match parse_int(arg) {
            Some(count) if count >= 0 => list(ctx, Some(0), Some(count)).await,
            None if arg == "help" => {
                ctx.terminal.write(SHOW_USAGE);
                Ok(())
            },
            _ => {
                invalid(&mut ctx.terminal, SHOW_USAGE);
                Ok(())
            },
        },
        [start, count, ..] => match (parse_int(start), parse_int(count)) {
            (Some(start), Some(count)) if start >= 0 && count >= 0 => {
                list(ctx, Some(start), Some(count)).await
            },
            _ => {
                invalid(&mut ctx.terminal, SHOW_USAGE);
                Ok(())
            },
        },
    }
}

async fn list<S: BookmarkService, T: Terminal>(
    ctx: &mut Context<S, T>,
    start: Option<i64>,
    count: Option<i64>,
) -> Result<()> {
    let bookmarks = ctx.service.get_all(start, count).await?;
    if bookmarks.is_empty() {
        ctx.terminal.write("No bookmarks");
    } else {
        ctx.terminal.print_bookmarks(&bookmarks, None);
    }
    Ok(())
}

// --- edit ---

fn edit() -> Result<()> {
    Err(AppError::invalid("Edit-command is not yet implemented"))
}

// --- delete ---

/// Deletes the selected bookmark, or every id in `argv` when nothing is selected.
///
/// The first id that does not exist aborts the remaining deletions. The selection
/// is cleared either way.
async fn delete<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let targets: Vec<String> = match &ctx.selected {
        Some(bookmark) => vec![bookmark.id.to_string()],
        None if argv.is_empty() => {
            return Err(AppError::invalid("Please select a bookmark to delete it"));
        },
        None => argv.to_vec(),
    };

    let result = delete_each(&targets, ctx).await;
    ctx.selected = None;
    result
}

async fn delete_each<S: BookmarkService, T: Terminal>(
    targets: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    for target in targets {
        let deleted = match parse_int(target) {
            Some(id) => ctx.service.delete(id).await?,
            None => false,
        };
        if !deleted {
            return Err(AppError::invalid(format!("Bookmark {} didn't exist!", target)));
        }
        ctx.terminal
            .write(&format!("Bookmark {} deleted successfully", target));
    }
    Ok(())
}

// --- select ---

async fn select<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let id = match argv.first().and_then(|arg| parse_int(arg)) {
        Some(id) => id,
        None => {
            let input =
                read_new_arg(&mut ctx.terminal, "enter bookmark id: ", "Bookmark selector")?;
            match parse_int(&input) {
                Some(id) => id,
                None => {
                    invalid(&mut ctx.terminal, SELECT_USAGE);
                    return Ok(());
                },
            }
        },
    };

    ctx.terminal.clear();
    let bookmark = ctx
        .service
        .get_one(id)
        .await?
        .ok_or_else(|| AppError::invalid("Bookmark selector\nInvalid id"))?;

    ctx.terminal
        .write(&format!("Selected {}\n", bookmark.short_str()));
    ctx.selected = Some(bookmark);

    let result = act_on_selection(id, ctx).await;
    ctx.selected = None;
    result
}

async fn act_on_selection<S: BookmarkService, T: Terminal>(
    id: i64,
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let choice = read_choice(
        &mut ctx.terminal,
        "\nAvailable commands: [e]dit, [d]elete, [b]ack",
        &['e', 'd', 'b'],
    )?;

    let argv = [id.to_string()];
    match choice {
        'e' => {
            ctx.terminal.clear();
            edit()
        },
        'd' => {
            ctx.terminal.clear();
            delete(&argv, ctx).await
        },
        _ => Ok(()),
    }
}

// --- search ---

async fn search<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let by_url = argv.first().is_some_and(|arg| arg == "url");

    let (bookmarks, not_found) = if by_url {
        let term = match argv.get(1) {
            Some(term) => term.clone(),
            None => read_new_arg(&mut ctx.terminal, "Url: ", "Search")?,
        };
        (
            ctx.service.get_by_url(term.trim()).await?,
            "Could not find any bookmarks with that url",
        )
    } else {
        let term = match argv.first() {
            Some(term) => term.clone(),
            None => read_new_arg(&mut ctx.terminal, "Term: ", "Search")?,
        };
        (
            ctx.service.get_by_title(term.trim()).await?,
            "Could not find any bookmarks with that title",
        )
    };

    if bookmarks.is_empty() {
        return Err(AppError::invalid(not_found));
    }
    ctx.terminal.print_bookmarks(&bookmarks, Some("Search results"));
    ctx.terminal
        .write_spaced(&format!("Found {} results", bookmarks.len()), 1);
    Ok(())
}

// --- export ---

async fn export<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let bookmarks = ctx.service.get_all(None, None).await?;
    if bookmarks.is_empty() {
        debug!("Nothing to export");
        return Ok(());
    }

    let path = match argv {
        [name] => export_path(&ctx.export_dir, name),
        _ => default_export_path(&ctx.export_dir, Local::now()),
    };
    write_export(&path, &bookmarks)?;

    info!("Exported {} bookmarks to {}", bookmarks.len(), path.display());
    ctx.terminal.write("Exported successfully!");
    Ok(())
}

/// Places a user supplied file name inside `export_dir` and forces a `.json` extension.
pub fn export_path(export_dir: &Path, name: &str) -> PathBuf {
    let candidate = Path::new(name);
    let escapes = candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir));

    // Naming the export dir itself is a file name, not a path into it.
    let inside = candidate.strip_prefix(export_dir).map_or(false, |rest| {
        rest.components().any(|c| matches!(c, Component::Normal(_)))
    });

    let mut path = if inside && !escapes {
        candidate.to_path_buf()
    } else {
        let relative: PathBuf = candidate
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        if relative.as_os_str().is_empty() {
            export_dir.join("bookmarks")
        } else {
            export_dir.join(relative)
        }
    };

    if path.extension() != Some(OsStr::new("json")) {
        let mut with_ext = path.into_os_string();
        with_ext.push(".json");
        path = PathBuf::from(with_ext);
    }
    path
}

/// `<export_dir>/<local timestamp>.json`.
pub fn default_export_path(export_dir: &Path, now: DateTime<Local>) -> PathBuf {
    export_dir.join(format!("{}.json", now.format("%Y-%m-%dT%H-%M-%S%.6f")))
}

/// Writes `{"bookmarks": [{"title", "url"}, ...]}` with sorted keys and 4-space indentation.
pub fn write_export(path: &Path, bookmarks: &[Bookmark]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let document = ExportDocument {
        bookmarks: bookmarks.iter().map(ExportedBookmark::from).collect(),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    document.serialize(&mut serializer)?;
    writer.flush()?;
    Ok(())
}

// --- import ---

async fn import<S: BookmarkService, T: Terminal>(
    argv: &[String],
    ctx: &mut Context<S, T>,
) -> Result<()> {
    let path = argv
        .first()
        .ok_or_else(|| AppError::invalid("Import argument missing"))?;

    let document = read_import(Path::new(path)).map_err(|e| {
        warn!("Could not read import file {}: {}", path, e);
        AppError::invalid("File not found")
    })?;

    info!("Importing {} records from {}", document.db.len(), path);
    for record in document.db {
        let created = match (record.url.as_deref(), record.title.as_deref()) {
            (Some(url), Some(title)) => match ctx.service.create(url, title).await {
                Ok(created) => created,
                Err(e) => {
                    warn!("Failed to import bookmark {}: {}", url, e);
                    None
                },
            },
            _ => None,
        };

        match created {
            Some(bookmark) => ctx.terminal.write(&bookmark.short_str()),
            None => ctx.terminal.write("Invalid bookmark"),
        }
    }

    ctx.terminal.write("Bookmarks imported successfully!");
    Ok(())
}

/// Opens and parses an import file.
pub fn read_import(path: &Path) -> Result<ImportDocument> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
