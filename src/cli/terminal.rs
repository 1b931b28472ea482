//! Terminal I/O used by the command loop.
//!
//! Commands only see the `Terminal` trait, so tests can script input and capture output.

use crate::error::Result;
use crate::models::Bookmark;
use colored::*;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, ErrorKind};
use std::time::Duration;
use tracing::debug;

/// Line-oriented terminal operations needed by the commands.
pub trait Terminal {
    /// Writes one line of text.
    fn write(&mut self, text: &str);

    /// Writes `text` after `offset` blank lines.
    fn write_spaced(&mut self, text: &str, offset: usize) {
        for _ in 0..offset {
            self.write("");
        }
        self.write(text);
    }

    /// Reports a failed command to the user.
    fn error(&mut self, text: &str) {
        self.write(text);
    }

    /// Reads one line of input after showing `prompt`.
    fn read(&mut self, prompt: &str) -> Result<String>;

    /// Reads a single character after showing `prompt`.
    fn read_chr(&mut self, prompt: &str) -> Result<char>;

    fn clear(&mut self);

    /// Shows the farewell message before the loop ends.
    fn exit(&mut self, message: &str);

    /// Lists bookmarks, optionally under a heading.
    fn print_bookmarks(&mut self, bookmarks: &[Bookmark], heading: Option<&str>);

    /// Starts a spinner for a slow operation.
    fn start_progress(&mut self, message: &str) -> Result<()>;

    fn finish_progress(&mut self);
}

/// The interactive terminal on stdout/stdin.
pub struct ConsoleTerminal {
    term: Term,
    theme: ColorfulTheme,
    spinner: Option<ProgressBar>,
}

impl ConsoleTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
            spinner: None,
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ConsoleTerminal {
    fn write(&mut self, text: &str) {
        println!("{}", text);
    }

    fn error(&mut self, text: &str) {
        println!("{}", text.red());
    }

    fn read(&mut self, prompt: &str) -> Result<String> {
        // The theme draws its own separator after the prompt.
        let prompt = prompt.trim_end().trim_end_matches(':');
        let line: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(line)
    }

    fn read_chr(&mut self, prompt: &str) -> Result<char> {
        self.term.write_line(prompt)?;
        if self.term.is_term() {
            return Ok(self.term.read_char()?);
        }
        // Piped input has no raw mode, take the first character of the next line.
        first_char(&mut std::io::stdin().lock())
    }

    fn clear(&mut self) {
        if let Err(e) = self.term.clear_screen() {
            debug!("Could not clear the screen: {}", e);
        }
    }

    fn exit(&mut self, message: &str) {
        println!("{}", message.green());
    }

    fn print_bookmarks(&mut self, bookmarks: &[Bookmark], heading: Option<&str>) {
        if let Some(heading) = heading {
            println!("{}", heading.cyan().bold());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Title", "URL"]);
        for bookmark in bookmarks {
            table.add_row(vec![
                bookmark.id.to_string(),
                bookmark.title.clone(),
                bookmark.url.clone(),
            ]);
        }
        println!("{table}");
    }

    fn start_progress(&mut self, message: &str) -> Result<()> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
        Ok(())
    }

    fn finish_progress(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// First character of the next line, `'\n'` for a blank one. Fails once the input is exhausted.
fn first_char<R: BufRead>(reader: &mut R) -> Result<char> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into());
    }
    Ok(line.trim().chars().next().unwrap_or('\n'))
}
