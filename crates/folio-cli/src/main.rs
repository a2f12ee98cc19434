// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod clipboard;
mod config;
mod export;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use clipboard::{Clipboard, ClipboardMode};
use config::Config;
use folio_app::{AppCommand, AppState, Panel, Portfolio, normalize_fragment};
use folio_store::Store;
use folio_tui::AppRuntime;
use runtime::StoreRuntime;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `folio --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let content_path = options
        .content_path
        .clone()
        .or_else(|| config.content_path(&options.config_path));
    let portfolio = load_portfolio(content_path.as_deref())?;

    if let Some(query) = &options.list_query {
        println!("{}", export::listing_json(&portfolio, query)?);
        return Ok(());
    }

    if let Some(path) = &options.export_html {
        export::write_static_page(&portfolio, path)?;
        println!("{}", path.display());
        return Ok(());
    }

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let log_path = config.log_path()?;
    logging::init(&log_path, config.log_level())?;

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or FOLIO_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let clipboard = Clipboard::new(ClipboardMode::resolve(config.clipboard_mode())?);
    if options.check_only {
        print_check_report(&options.config_path, &db_path, &log_path, &store, &portfolio, &clipboard)?;
        return Ok(());
    }

    let theme = match store.get_theme() {
        Ok(stored) => stored.unwrap_or_else(|| config.theme()),
        Err(error) => {
            tracing::warn!(error = %format!("{error:#}"), "ignoring stored theme");
            config.theme()
        }
    };
    let fragment = match options.open.clone() {
        Some(fragment) => fragment,
        None => store
            .get_location()?
            .or_else(|| config.start_location())
            .unwrap_or_else(|| Panel::DEFAULT.fragment()),
    };

    let mut state = AppState::new(portfolio, theme);
    state.initialize(&fragment);
    let mut runtime = StoreRuntime::new(&store, clipboard);
    save_start_location(&mut state, &mut runtime);
    tracing::info!(
        panel = state.active_panel().as_str(),
        theme = theme.as_str(),
        projects = state.catalog().len(),
        "starting terminal ui"
    );

    folio_tui::run_app(&mut state, &mut runtime)
}

/// Persist the startup location. A failure is logged and surfaced on the
/// status line; the UI still starts.
fn save_start_location<R: AppRuntime>(state: &mut AppState, runtime: &mut R) {
    let fragment = state.nav().location().fragment().to_owned();
    if let Err(error) = runtime.save_location(&fragment) {
        tracing::warn!(%fragment, error = %format!("{error:#}"), "save location failed");
        state.dispatch(AppCommand::SetStatus(format!("save location failed: {error}")));
    }
}

fn load_portfolio(path: Option<&Path>) -> Result<Portfolio> {
    let Some(path) = path else {
        return Ok(Portfolio::demo());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read content file {}", path.display()))?;
    Portfolio::from_toml_str(&raw).with_context(|| format!("load content file {}", path.display()))
}

fn print_check_report(
    config_path: &Path,
    db_path: &Path,
    log_path: &Path,
    store: &Store,
    portfolio: &Portfolio,
    clipboard: &Clipboard,
) -> Result<()> {
    println!("config     {}", config_path.display());
    println!("database   {}", db_path.display());
    println!("log        {}", log_path.display());
    println!("clipboard  {}", clipboard.mode().as_str());
    println!(
        "content    {} projects, {} tags",
        portfolio.catalog.len(),
        portfolio.catalog.tags().len()
    );
    for (key, value) in store.list_settings()? {
        println!("{:<10} {}", key.as_str(), value.as_deref().unwrap_or("(unset)"));
    }
    store.get_theme()?;
    Ok(())
}

/// Accepts `resume` as shorthand for `#resume`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    content_path: Option<PathBuf>,
    open: Option<String>,
    export_html: Option<PathBuf>,
    list_query: Option<String>,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        content_path: None,
        open: None,
        export_html: None,
        list_query: None,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--content" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--content requires a file path"))?;
                options.content_path = Some(PathBuf::from(value.as_ref()));
            }
            "--open" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--open requires a location such as #projects"))?;
                options.open = Some(normalize_fragment(value.as_ref()));
            }
            "--export-html" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--export-html requires an output path"))?;
                options.export_html = Some(PathBuf::from(value.as_ref()));
            }
            "--list" => {
                let query = match iter.next_if(|next| !AsRef::<str>::as_ref(next).starts_with("--")) {
                    Some(query) => query.as_ref().to_owned(),
                    None => String::new(),
                };
                options.list_query = Some(query);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("folio");
    println!("  --config <path>          Use a specific config path");
    println!("  --content <path>         Load profile and projects from a TOML file");
    println!("  --open <location>        Start on a panel (#home, #projects, #resume, #contact)");
    println!("  --list [query]           Print matching projects as JSON");
    println!("  --export-html <path>     Write a static HTML page of all projects");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Keep preferences in memory for this run");
    println!("  --check                  Validate config, content and database, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, load_portfolio, parse_cli_args, save_start_location};
    use anyhow::{Result, bail};
    use folio_app::{AppState, Panel, Portfolio, Theme};
    use folio_tui::{AppRuntime, CopyReceipt};
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    struct ReadOnlyRuntime {
        attempted: Vec<String>,
    }

    impl AppRuntime for ReadOnlyRuntime {
        fn save_location(&mut self, fragment: &str) -> Result<()> {
            self.attempted.push(fragment.to_owned());
            bail!("database is read-only")
        }

        fn save_theme(&mut self, _theme: Theme) -> Result<()> {
            bail!("database is read-only")
        }

        fn copy_text(&mut self, _text: &str) -> Result<CopyReceipt> {
            Ok(CopyReceipt::Copied)
        }

        fn open_url(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/folio-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                content_path: None,
                open: None,
                export_html: None,
                list_query: None,
                print_config_path: false,
                print_db_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_paths() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--content",
                "site.toml",
                "--export-html",
                "out/index.html",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.content_path, Some(PathBuf::from("site.toml")));
        assert_eq!(options.export_html, Some(PathBuf::from("out/index.html")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--content", "--open", "--export-html"] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains(&format!("{flag} requires")));
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn open_accepts_bare_panel_names() -> Result<()> {
        let options = parse_cli_args(vec!["--open", "resume"], default_options_path())?;
        assert_eq!(options.open.as_deref(), Some("#resume"));

        let options = parse_cli_args(vec!["--open", "#projects"], default_options_path())?;
        assert_eq!(options.open.as_deref(), Some("#projects"));
        Ok(())
    }

    #[test]
    fn list_query_is_optional() -> Result<()> {
        let bare = parse_cli_args(vec!["--list"], default_options_path())?;
        assert_eq!(bare.list_query.as_deref(), Some(""));

        let followed = parse_cli_args(vec!["--list", "--demo"], default_options_path())?;
        assert_eq!(followed.list_query.as_deref(), Some(""));
        assert!(followed.demo);

        let query = parse_cli_args(vec!["--list", "pygame"], default_options_path())?;
        assert_eq!(query.list_query.as_deref(), Some("pygame"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_db_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        assert!(parse_cli_args(vec!["--help"], default_options_path())?.show_help);
        assert!(parse_cli_args(vec!["-h"], default_options_path())?.show_help);
        Ok(())
    }

    #[test]
    fn content_file_replaces_demo_portfolio() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = folio_testkit::write_file(
            temp.path(),
            "portfolio.toml",
            folio_testkit::SAMPLE_CONTENT_TOML,
        )?;
        let portfolio = load_portfolio(Some(path.as_path()))?;
        assert_eq!(portfolio.profile.name, "Sample Person");
        assert_eq!(portfolio.catalog.len(), 2);

        assert_eq!(load_portfolio(None)?.catalog.len(), 6);
        Ok(())
    }

    #[test]
    fn unreadable_content_file_names_the_path() {
        let error = load_portfolio(Some(Path::new("/nonexistent/folio.toml")))
            .expect_err("missing file");
        assert!(format!("{error:#}").contains("/nonexistent/folio.toml"));
    }

    #[test]
    fn startup_location_save_failure_becomes_a_status() {
        let mut state = AppState::new(Portfolio::demo(), Theme::Calm);
        state.initialize("resume");
        let mut runtime = ReadOnlyRuntime::default();

        save_start_location(&mut state, &mut runtime);

        assert_eq!(runtime.attempted, vec!["#resume"]);
        assert_eq!(state.active_panel(), Panel::Resume);
        assert_eq!(
            state.status_line.as_deref(),
            Some("save location failed: database is read-only")
        );
    }
}
