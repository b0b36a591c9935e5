use anyhow::{Context, Result};
use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use crate::config::ClipboardConfig;

/// Write-only access to the system clipboard.
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<()>;
}

/// Pipes text into a platform clipboard command.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    command: String,
    args: Vec<String>,
}

impl SystemClipboard {
    /// Use the configured command, or detect one for this platform.
    pub fn from_config(config: &ClipboardConfig) -> Self {
        if !config.command.is_empty() {
            return Self {
                command: config.command.clone(),
                args: config.args.clone(),
            };
        }
        let (command, args) = detect_command();
        Self {
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[allow(dead_code)]
    pub fn command(&self) -> &str {
        &self.command
    }
}

fn detect_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("pbcopy", &[])
    } else if cfg!(target_os = "windows") {
        ("clip", &[])
    } else {
        // Linux: try xclip, fall back to xsel
        if Command::new("which")
            .arg("xclip")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
        {
            ("xclip", &["-selection", "clipboard"])
        } else {
            ("xsel", &["--clipboard", "--input"])
        }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to open clipboard command '{}'", self.command))?;

        // stdin is dropped at the end of the closure so the command sees EOF
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(text.as_bytes()));
        self.finish(&mut child, written)
    }
}

impl SystemClipboard {
    /// Reap the child whether or not the write went through.
    fn finish(&self, child: &mut Child, written: io::Result<()>) -> Result<()> {
        if let Err(err) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err)
                .with_context(|| format!("Failed to write to clipboard command '{}'", self.command));
        }
        let status = child.wait().context("Clipboard command failed")?;
        if !status.success() {
            anyhow::bail!("Clipboard command '{}' exited with {}", self.command, status);
        }
        Ok(())
    }
}
