//! Handles the interactive Command Line Interface.
//!
//! Includes the command registry and state machine (`commands`), terminal I/O
//! (`terminal`), and the prompt loop that dispatches one input line at a time.

mod commands;
mod terminal;

pub use commands::*;
pub use terminal::*;

use crate::error::{AppError, Result};
use crate::models::Bookmark;
use crate::service::BookmarkService;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// What the prompt loop does after a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// State shared by every command invocation.
pub struct Context<S, T> {
    pub service: S,
    pub terminal: T,
    /// The bookmark picked with `select`, only set while its follow-up action runs.
    pub selected: Option<Bookmark>,
    pub export_dir: PathBuf,
}

impl<S, T> Context<S, T> {
    pub fn new(service: S, terminal: T, export_dir: PathBuf) -> Self {
        Self {
            service,
            terminal,
            selected: None,
            export_dir,
        }
    }
}

/// The interactive bookmark manager.
pub struct App<S, T> {
    ctx: Context<S, T>,
}

impl<S: BookmarkService, T: Terminal> App<S, T> {
    pub fn new(service: S, terminal: T, export_dir: PathBuf) -> Self {
        Self {
            ctx: Context::new(service, terminal, export_dir),
        }
    }

    #[cfg(test)]
    pub fn context(&self) -> &Context<S, T> {
        &self.ctx
    }

    #[cfg(test)]
    pub fn context_mut(&mut self) -> &mut Context<S, T> {
        &mut self.ctx
    }

    /// Reads and dispatches lines until `quit` or the end of input.
    pub async fn run(&mut self) -> Result<()> {
        let stored = self.ctx.service.count().await?;
        self.ctx.terminal.write(&format!(
            "Welcome to the bookmark manager! {} bookmarks stored. Type 'help' for commands.",
            stored
        ));

        loop {
            let line = match self.ctx.terminal.read("> ") {
                Ok(line) => line,
                Err(e) => {
                    info!("Input closed, leaving the prompt loop: {}", e);
                    break;
                },
            };

            if self.dispatch(&line).await == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    /// Runs one input line. Command failures are reported here and never end the loop.
    pub async fn dispatch(&mut self, line: &str) -> Flow {
        let Some((command, argv)) = parse_line(line) else {
            return Flow::Continue;
        };
        info!("Dispatching {:?} with arguments {:?}", command, argv);

        if command.clears_screen() {
            self.ctx.terminal.clear();
        }

        let result = command.execute(&argv, &mut self.ctx).await;
        self.ctx.terminal.finish_progress();

        match result {
            Ok(flow) => flow,
            Err(AppError::CommandStopped) => {
                debug!("{:?} stopped by the user", command);
                Flow::Continue
            },
            Err(AppError::InvalidInput(message)) => {
                debug!("{:?} rejected input: {}", command, message);
                self.ctx.terminal.error(&message);
                Flow::Continue
            },
            Err(e) => {
                error!("Command {:?} failed: {:?}", command, e);
                self.ctx.terminal.error(&format!("Error: {}", e));
                Flow::Continue
            },
        }
    }
}
