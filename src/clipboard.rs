/*!
 * Clipboard sink for single-item SQL exports
 *
 * Pipes text into whichever platform clipboard command is available.
 */

use std::env;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use log::debug;
use strum::{Display, EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to run the clipboard command
    #[error("{0} failed: {1}")]
    CommandFailed(ClipboardCommand, String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Anything that can receive copied text
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
}

/// Known clipboard commands, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ClipboardCommand {
    /// macOS
    Pbcopy,
    /// Windows and WSL
    #[strum(serialize = "clip.exe")]
    ClipExe,
    /// Wayland
    WlCopy,
    /// X11
    Xsel,
    /// X11
    Xclip,
    /// Termux on Android
    TermuxClipboardSet,
}

impl ClipboardCommand {
    /// Executable name and arguments
    fn invocation(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Pbcopy => ("pbcopy", &[]),
            Self::ClipExe => ("clip.exe", &[]),
            Self::WlCopy => ("wl-copy", &[]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::TermuxClipboardSet => ("termux-clipboard-set", &[]),
        }
    }

    /// Whether this command makes sense on the current platform
    fn supported_here(&self) -> bool {
        match self {
            Self::Pbcopy => cfg!(target_os = "macos"),
            Self::ClipExe => cfg!(target_os = "windows") || env::var("WSL_DISTRO_NAME").is_ok(),
            Self::WlCopy => cfg!(target_os = "linux") && env::var("WAYLAND_DISPLAY").is_ok(),
            Self::Xsel | Self::Xclip => cfg!(target_os = "linux"),
            Self::TermuxClipboardSet => cfg!(target_os = "android"),
        }
    }

    /// First available command for this system
    pub fn detect() -> Option<Self> {
        Self::iter().find(|cmd| cmd.supported_here() && command_exists(cmd.invocation().0))
    }
}

impl Clipboard for ClipboardCommand {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (program, args) = self.invocation();
        let failed = |reason: String| ClipboardError::CommandFailed(*self, reason);

        let status = pipe_text(program, args, text).map_err(|e| failed(e.to_string()))?;
        if !status.success() {
            return Err(failed(format!("exited with {}", status)));
        }

        debug!("copied {} bytes with {}", text.len(), self);
        Ok(())
    }
}

/// Spawn `program`, write `text` to its stdin and wait for it to exit.
///
/// The child is waited on even when writing fails.
fn pipe_text(program: &str, args: &[&str], text: &str) -> io::Result<ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()?;

    // stdin is dropped at the end of the match so the child sees EOF
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin unavailable")),
    };

    let status = child.wait()?;
    written.map(|()| status)
}

/// Copy text with the first available clipboard command
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    ClipboardCommand::detect()
        .ok_or(ClipboardError::NoClipboardFound)?
        .copy_to_clipboard(text)
}

/// Check whether an executable is on `PATH`
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}
