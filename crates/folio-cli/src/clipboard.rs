// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use folio_tui::CopyReceipt;
use std::env;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Common terminal limit for the base64 payload of one OSC 52 write.
const MAX_OSC52_PAYLOAD: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Osc52,
    Command,
    None,
}

impl ClipboardMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Osc52 => "osc52",
            Self::Command => "command",
            Self::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "osc52" => Some(Self::Osc52),
            "command" => Some(Self::Command),
            "none" | "off" => Some(Self::None),
            _ => None,
        }
    }

    /// `FOLIO_CLIPBOARD` wins over the configured mode.
    pub fn resolve(configured: Self) -> Result<Self> {
        match env::var("FOLIO_CLIPBOARD") {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value).with_context(|| {
                format!("FOLIO_CLIPBOARD={value:?} is not one of osc52, command, none")
            }),
            _ => Ok(configured),
        }
    }
}

/// Program plus arguments that reads the clipboard text from stdin.
type CopyCommand = (&'static str, &'static [&'static str]);

const NO_ARGS: &[&str] = &[];

#[derive(Debug, Clone)]
pub struct Clipboard {
    mode: ClipboardMode,
    commands: Vec<CopyCommand>,
}

impl Clipboard {
    pub fn new(mode: ClipboardMode) -> Self {
        Self::with_commands(mode, copy_commands())
    }

    fn with_commands(mode: ClipboardMode, commands: Vec<CopyCommand>) -> Self {
        Self { mode, commands }
    }

    pub fn mode(&self) -> ClipboardMode {
        self.mode
    }

    pub fn copy(&self, text: &str) -> Result<CopyReceipt> {
        self.copy_via(text, &mut io::stdout())
    }

    /// In `osc52` mode a local copy tool is tried first because it reports
    /// success; the OSC 52 write is the fallback and is never confirmed.
    fn copy_via(&self, text: &str, terminal: &mut impl Write) -> Result<CopyReceipt> {
        match self.mode {
            ClipboardMode::None => {
                bail!("clipboard is disabled; set [clipboard].mode or FOLIO_CLIPBOARD")
            }
            ClipboardMode::Command => {
                copy_with_command(&self.commands, text)?;
                Ok(CopyReceipt::Copied)
            }
            ClipboardMode::Osc52 => match copy_with_command(&self.commands, text) {
                Ok(()) => Ok(CopyReceipt::Copied),
                Err(error) => {
                    tracing::debug!(error = %format!("{error:#}"), "no copy tool; writing osc52");
                    write_osc52(terminal, text)?;
                    tracing::debug!(bytes = text.len(), "clipboard write via osc52");
                    Ok(CopyReceipt::SentToTerminal)
                }
            },
        }
    }
}

pub fn osc52_sequence(text: &str) -> Result<String> {
    let encoded = STANDARD.encode(text.as_bytes());
    if encoded.len() > MAX_OSC52_PAYLOAD {
        bail!(
            "OSC 52 payload too large ({} > {MAX_OSC52_PAYLOAD})",
            encoded.len()
        );
    }
    Ok(format!("\x1b]52;c;{encoded}\x07"))
}

fn write_osc52(writer: &mut impl Write, text: &str) -> Result<()> {
    let sequence = osc52_sequence(text)?;
    writer
        .write_all(sequence.as_bytes())
        .and_then(|()| writer.flush())
        .context("write OSC 52 sequence")
}

fn copy_commands() -> Vec<CopyCommand> {
    if cfg!(target_os = "macos") {
        return vec![("pbcopy", NO_ARGS)];
    }
    if cfg!(target_os = "windows") {
        return vec![("clip", NO_ARGS)];
    }
    let mut commands: Vec<CopyCommand> = Vec::new();
    if env::var_os("WAYLAND_DISPLAY").is_some() {
        commands.push(("wl-copy", NO_ARGS));
    }
    commands.push(("xclip", &["-selection", "clipboard"]));
    commands.push(("xsel", &["--clipboard", "--input"]));
    commands
}

fn copy_with_command(commands: &[CopyCommand], text: &str) -> Result<()> {
    let mut last_error = None;
    for &(command, args) in commands {
        match run_with_input(command, args, text) {
            Ok(()) => {
                tracing::debug!(command, bytes = text.len(), "clipboard write via command");
                return Ok(());
            }
            Err(error) => last_error = Some(error),
        }
    }
    match last_error {
        Some(error) => Err(error.context("no clipboard command succeeded")),
        None => bail!("no clipboard command available on this platform"),
    }
}

fn run_with_input(command: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("spawn {command}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("write to {command}"))?;
    }

    let status = child.wait().with_context(|| format!("wait for {command}"))?;
    if !status.success() {
        bail!("{command} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        Clipboard, ClipboardMode, MAX_OSC52_PAYLOAD, NO_ARGS, osc52_sequence, write_osc52,
    };
    use anyhow::Result;
    use folio_tui::CopyReceipt;

    #[test]
    fn osc52_sequence_wraps_base64_payload() -> Result<()> {
        assert_eq!(osc52_sequence("qtl")?, "\x1b]52;c;cXRs\x07");
        assert_eq!(osc52_sequence("")?, "\x1b]52;c;\x07");
        Ok(())
    }

    #[test]
    fn oversized_osc52_payload_is_rejected() {
        let text = "x".repeat(MAX_OSC52_PAYLOAD);
        let error = osc52_sequence(&text).expect_err("payload over limit");
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn write_osc52_emits_sequence() -> Result<()> {
        let mut buffer = Vec::new();
        write_osc52(&mut buffer, "alex@example.com")?;
        assert_eq!(
            String::from_utf8(buffer)?,
            "\x1b]52;c;YWxleEBleGFtcGxlLmNvbQ==\x07"
        );
        Ok(())
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!(ClipboardMode::parse(" OSC52 "), Some(ClipboardMode::Osc52));
        assert_eq!(ClipboardMode::parse("command"), Some(ClipboardMode::Command));
        assert_eq!(ClipboardMode::parse("off"), Some(ClipboardMode::None));
        assert_eq!(ClipboardMode::parse("pigeon"), None);
        for mode in [ClipboardMode::Osc52, ClipboardMode::Command, ClipboardMode::None] {
            assert_eq!(ClipboardMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn disabled_clipboard_reports_error() {
        let error = Clipboard::new(ClipboardMode::None)
            .copy("qtl")
            .expect_err("disabled clipboard");
        assert!(error.to_string().contains("clipboard is disabled"));
    }

    #[test]
    fn osc52_mode_falls_back_to_terminal_when_no_tool_runs() -> Result<()> {
        let clipboard = Clipboard::with_commands(
            ClipboardMode::Osc52,
            vec![("folio-missing-copy-tool", NO_ARGS)],
        );
        let mut terminal = Vec::new();
        let receipt = clipboard.copy_via("qtl", &mut terminal)?;
        assert_eq!(receipt, CopyReceipt::SentToTerminal);
        assert_eq!(String::from_utf8(terminal)?, "\x1b]52;c;cXRs\x07");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn osc52_mode_prefers_a_working_copy_tool() -> Result<()> {
        let clipboard = Clipboard::with_commands(ClipboardMode::Osc52, vec![("cat", NO_ARGS)]);
        let mut terminal = Vec::new();
        let receipt = clipboard.copy_via("qtl", &mut terminal)?;
        assert_eq!(receipt, CopyReceipt::Copied);
        assert!(terminal.is_empty());
        Ok(())
    }

    #[test]
    fn command_mode_reports_missing_tools() {
        let clipboard = Clipboard::with_commands(
            ClipboardMode::Command,
            vec![("folio-missing-copy-tool", NO_ARGS)],
        );
        let error = clipboard
            .copy_via("qtl", &mut Vec::new())
            .expect_err("no tool can run");
        assert!(format!("{error:#}").contains("no clipboard command succeeded"));
    }
}
