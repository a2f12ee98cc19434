// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::clipboard::Clipboard;
use anyhow::{Context, Result, bail};
use folio_app::Theme;
use folio_store::Store;
use folio_tui::CopyReceipt;
use std::process::{Command, Stdio};

/// Hands a URL to the platform opener.
pub trait Opener {
    fn open(&mut self, url: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&mut self, url: &str) -> Result<()> {
        let (program, args): (&str, Vec<&str>) = if cfg!(target_os = "macos") {
            ("open", vec![url])
        } else if cfg!(target_os = "windows") {
            ("cmd", vec!["/C", "start", "", url])
        } else {
            ("xdg-open", vec![url])
        };
        let status = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("run {program}"))?;
        if !status.success() {
            bail!("{program} exited with {status}");
        }
        Ok(())
    }
}

pub struct StoreRuntime<'a, O: Opener = SystemOpener> {
    store: &'a Store,
    clipboard: Clipboard,
    opener: O,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: &'a Store, clipboard: Clipboard) -> Self {
        Self::with_opener(store, clipboard, SystemOpener)
    }
}

impl<'a, O: Opener> StoreRuntime<'a, O> {
    pub fn with_opener(store: &'a Store, clipboard: Clipboard, opener: O) -> Self {
        Self {
            store,
            clipboard,
            opener,
        }
    }
}

impl<O: Opener> folio_tui::AppRuntime for StoreRuntime<'_, O> {
    fn save_location(&mut self, fragment: &str) -> Result<()> {
        self.store.put_location(fragment)
    }

    fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.put_theme(theme)
    }

    fn copy_text(&mut self, text: &str) -> Result<CopyReceipt> {
        self.clipboard.copy(text)
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        tracing::info!(url, "opening link");
        self.opener.open(url)
    }
}

#[cfg(test)]
mod tests {
    use super::{Opener, StoreRuntime};
    use crate::clipboard::{Clipboard, ClipboardMode};
    use anyhow::{Result, bail};
    use folio_app::Theme;
    use folio_store::Store;
    use folio_tui::AppRuntime;

    #[derive(Debug, Default)]
    struct RecordingOpener {
        opened: Vec<String>,
        fail: bool,
    }

    impl Opener for RecordingOpener {
        fn open(&mut self, url: &str) -> Result<()> {
            if self.fail {
                bail!("no opener");
            }
            self.opened.push(url.to_owned());
            Ok(())
        }
    }

    fn store() -> Result<Store> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        Ok(store)
    }

    #[test]
    fn location_and_theme_are_written_to_the_store() -> Result<()> {
        let store = store()?;
        let mut runtime = StoreRuntime::with_opener(
            &store,
            Clipboard::new(ClipboardMode::None),
            RecordingOpener::default(),
        );
        runtime.save_location("#contact")?;
        runtime.save_theme(Theme::Glow)?;

        assert_eq!(store.get_location()?.as_deref(), Some("#contact"));
        assert_eq!(store.get_theme()?, Some(Theme::Glow));
        Ok(())
    }

    #[test]
    fn bare_location_is_rejected_by_the_store() -> Result<()> {
        let store = store()?;
        let mut runtime = StoreRuntime::with_opener(
            &store,
            Clipboard::new(ClipboardMode::None),
            RecordingOpener::default(),
        );
        assert!(runtime.save_location("contact").is_err());
        assert_eq!(store.get_location()?, None);
        Ok(())
    }

    #[test]
    fn links_go_through_the_opener() -> Result<()> {
        let store = store()?;
        let mut runtime = StoreRuntime::with_opener(
            &store,
            Clipboard::new(ClipboardMode::None),
            RecordingOpener::default(),
        );
        runtime.open_url("https://github.com/example")?;
        assert_eq!(runtime.opener.opened, vec!["https://github.com/example"]);

        runtime.opener.fail = true;
        assert!(runtime.open_url("mailto:alex@example.com").is_err());
        Ok(())
    }

    #[test]
    fn disabled_clipboard_surfaces_an_error() -> Result<()> {
        let store = store()?;
        let mut runtime = StoreRuntime::with_opener(
            &store,
            Clipboard::new(ClipboardMode::None),
            RecordingOpener::default(),
        );
        let error = runtime.copy_text("qtl").expect_err("clipboard disabled");
        assert!(error.to_string().contains("clipboard is disabled"));
        Ok(())
    }
}
