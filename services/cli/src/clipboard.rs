//! Clipboard backed by an external command (`wl-copy`, `xclip`, `pbcopy`).

use securelog_client::{Clipboard, ClipboardError};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Environment variable naming the clipboard command.
pub const CLIPBOARD_CMD_VAR: &str = "SECURELOG_CLIPBOARD_CMD";

/// Pipes text into a configured command's stdin.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    command: Option<Vec<String>>,
}

impl CommandClipboard {
    /// Read the command from `SECURELOG_CLIPBOARD_CMD`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(CLIPBOARD_CMD_VAR).ok().as_deref())
    }

    /// Whitespace-separated command line; `None` or blank disables the clipboard.
    #[must_use]
    pub fn new(command_line: Option<&str>) -> Self {
        let command = command_line
            .map(|line| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self { command }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            return Err(ClipboardError(format!("{CLIPBOARD_CMD_VAR} is not set")));
        };
        debug!(program, "Writing to clipboard command");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError(format!("{program}: {e}")))?;

        // stdin is dropped before waiting so the command sees EOF.
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));
        if let Err(e) = written {
            // Reap the child before reporting; it may still be running.
            let _ = child.kill();
            let _ = child.wait();
            return Err(ClipboardError(format!("{program}: {e}")));
        }

        let status = child
            .wait()
            .map_err(|e| ClipboardError(format!("{program}: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError(format!("{program} exited with {status}")))
        }
    }
}
