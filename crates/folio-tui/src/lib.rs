// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod layout;
mod render;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use folio_app::{
    Action, AppCommand, AppEvent, AppState, ContactField, FocusTarget, ModalControl, Panel, Theme,
    normalize_fragment,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

pub use layout::strip_width;

const PAGE_ROWS: i32 = 10;
const WHEEL_ROWS: i32 = 3;
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Side effects the terminal front end cannot perform itself.
/// How far a copy is known to have gone. Terminals give no answer to an
/// OSC 52 write, so those copies are only `SentToTerminal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyReceipt {
    Copied,
    SentToTerminal,
}

pub trait AppRuntime {
    fn save_location(&mut self, fragment: &str) -> Result<()>;
    fn save_theme(&mut self, theme: Theme) -> Result<()>;
    fn copy_text(&mut self, text: &str) -> Result<CopyReceipt>;
    fn open_url(&mut self, url: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ViewData {
    pub viewport: Rect,
    pub status_token: u64,
    pub prompt: Option<String>,
    pub help_visible: bool,
    pub counters_started: Option<Instant>,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = terminal
        .size()
        .context("read terminal size")
        .map(|size| resize(state, &mut view_data, Rect::new(0, 0, size.width, size.height)));
    if state.status_line.is_some() {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(&internal_tx, view_data.status_token);
    }

    while result.is_ok() {
        process_internal_events(state, &mut view_data, &internal_rx);
        if state.active_panel() == Panel::Home && view_data.counters_started.is_none() {
            view_data.counters_started = Some(Instant::now());
        }

        if let Err(error) = terminal.draw(|frame| render::render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match poll_event() {
            Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                    break;
                }
            }
            Ok(Some(Event::Mouse(mouse))) => {
                handle_mouse_event(state, runtime, &mut view_data, &internal_tx, mouse);
            }
            Ok(Some(Event::Resize(width, height))) => {
                resize(state, &mut view_data, Rect::new(0, 0, width, height));
            }
            Ok(_) => {}
            Err(error) => result = Err(error),
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    result
}

fn poll_event() -> Result<Option<Event>> {
    if event::poll(Duration::from_millis(120)).context("poll event")? {
        return event::read().context("read event").map(Some);
    }
    Ok(None)
}

fn resize(state: &mut AppState, view_data: &mut ViewData, area: Rect) {
    view_data.viewport = area;
    state.dispatch(AppCommand::Resize {
        strip_width: strip_width(area),
    });
    clamp_scroll(state, view_data);
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

fn dispatch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    handle_events(state, runtime, view_data, internal_tx, events);
}

fn handle_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    for event in events {
        match event {
            AppEvent::LocationReplaced(fragment) => {
                if let Err(error) = runtime.save_location(&fragment) {
                    tracing::warn!(%fragment, error = %format!("{error:#}"), "save location failed");
                    emit_status(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        format!("save location failed: {error}"),
                    );
                }
            }
            AppEvent::ThemeChanged(theme) => {
                if let Err(error) = runtime.save_theme(theme) {
                    tracing::warn!(theme = theme.as_str(), error = %format!("{error:#}"), "save theme failed");
                    emit_status(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        format!("save theme failed: {error}"),
                    );
                }
            }
            AppEvent::ActionRequested(action) => {
                perform_action(state, runtime, view_data, internal_tx, action);
            }
            AppEvent::StatusUpdated(_) => {
                view_data.status_token = view_data.status_token.saturating_add(1);
                schedule_status_clear(internal_tx, view_data.status_token);
            }
            AppEvent::FocusMoved(target) => reveal(state, view_data, &target),
            AppEvent::PanelActivated(_)
            | AppEvent::GridUpdated { .. }
            | AppEvent::ModalOpened(_)
            | AppEvent::ModalClosed(_)
            | AppEvent::StatusCleared => {}
        }
    }
}

fn perform_action<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    action: Action,
) {
    let status = match action {
        Action::Copy { label, text } => match runtime.copy_text(&text) {
            Ok(CopyReceipt::Copied) => format!("{label} copied"),
            Ok(CopyReceipt::SentToTerminal) => format!("{label} sent to terminal clipboard"),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "clipboard write failed");
                format!("copy failed: {error}")
            }
        },
        Action::OpenUrl(url) => match runtime.open_url(&url) {
            Ok(()) => format!("opened {url}"),
            Err(error) => {
                tracing::warn!(%url, error = %format!("{error:#}"), "open link failed");
                format!("open failed: {error}")
            }
        },
        Action::SubmitContact => {
            let recipient = state.profile().email.clone();
            match state.contact.compose_mailto(&recipient) {
                Err(error) => error.to_string(),
                Ok(mailto) => match runtime.open_url(mailto.as_str()) {
                    Ok(()) => {
                        tracing::info!("contact draft handed to mail client");
                        state.dispatch(AppCommand::ResetContact);
                        "mail draft opened".to_owned()
                    }
                    Err(error) => format!("could not open mail client: {error}"),
                },
            }
        }
    };
    emit_status(state, runtime, view_data, internal_tx, status);
}

fn scroll<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    rows: i32,
) {
    dispatch(state, runtime, view_data, internal_tx, AppCommand::ScrollBy(rows));
    clamp_scroll(state, view_data);
}

/// Scroll the active panel so a newly focused control is on screen.
fn reveal(state: &mut AppState, view_data: &ViewData, target: &FocusTarget) {
    if let Some(offset) = layout::scroll_to_reveal(state, view_data.viewport, target) {
        let delta = i32::from(offset) - i32::from(state.scroll_offset());
        state.dispatch(AppCommand::ScrollBy(delta));
        clamp_scroll(state, view_data);
    }
}

fn clamp_scroll(state: &mut AppState, view_data: &ViewData) {
    let max = layout::max_scroll(state, view_data.viewport);
    let current = state.scroll_offset();
    if current > max {
        state.dispatch(AppCommand::ScrollBy(i32::from(max) - i32::from(current)));
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.prompt.is_some() {
        handle_prompt_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.modal().is_some() {
        handle_modal_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if state.focus().is_some_and(FocusTarget::accepts_text)
        && handle_text_key(state, runtime, view_data, internal_tx, key)
    {
        return false;
    }

    let command = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab => AppCommand::FocusNext,
        KeyCode::BackTab => AppCommand::FocusPrev,
        KeyCode::Left => AppCommand::Arrow(-1),
        KeyCode::Right => AppCommand::Arrow(1),
        KeyCode::Enter | KeyCode::Char(' ') => AppCommand::ActivateFocused,
        KeyCode::Char(digit @ '1'..='4') => {
            let index = usize::from(digit as u8 - b'1');
            AppCommand::ActivatePanel(Panel::ALL[index])
        }
        KeyCode::Char('t') => AppCommand::ToggleTheme,
        KeyCode::Esc => AppCommand::Focus(FocusTarget::Panel(state.active_panel())),
        KeyCode::Up | KeyCode::Char('k') => {
            scroll(state, runtime, view_data, internal_tx, -1);
            return false;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll(state, runtime, view_data, internal_tx, 1);
            return false;
        }
        KeyCode::PageUp => {
            scroll(state, runtime, view_data, internal_tx, -PAGE_ROWS);
            return false;
        }
        KeyCode::PageDown => {
            scroll(state, runtime, view_data, internal_tx, PAGE_ROWS);
            return false;
        }
        KeyCode::Char('/') => {
            dispatch(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::ActivatePanel(Panel::Projects),
            );
            AppCommand::Focus(FocusTarget::Search)
        }
        KeyCode::Char(':') => {
            view_data.prompt = Some(String::new());
            return false;
        }
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        _ => return false,
    };
    dispatch(state, runtime, view_data, internal_tx, command);
    false
}

/// Keys for a focused search box or contact field. Returns `false` for keys
/// that should fall through to regular navigation.
fn handle_text_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let command = match key.code {
        KeyCode::Char(ch) if plain => AppCommand::InsertChar(ch),
        KeyCode::Backspace => AppCommand::Backspace,
        KeyCode::Esc => AppCommand::Focus(FocusTarget::Panel(state.active_panel())),
        KeyCode::Enter => match state.focus() {
            Some(FocusTarget::ContactField(ContactField::Message)) => AppCommand::InsertChar('\n'),
            Some(FocusTarget::ContactField(_)) => AppCommand::FocusNext,
            _ => return true,
        },
        _ => return false,
    };
    dispatch(state, runtime, view_data, internal_tx, command);
    if state.active_panel() == Panel::Projects {
        clamp_scroll(state, view_data);
    }
    true
}

fn handle_modal_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => AppCommand::CloseModal,
        KeyCode::Tab | KeyCode::Right => AppCommand::FocusNext,
        KeyCode::BackTab | KeyCode::Left => AppCommand::FocusPrev,
        KeyCode::Enter | KeyCode::Char(' ') => AppCommand::ActivateFocused,
        KeyCode::Char('c') => AppCommand::Click(FocusTarget::Modal(ModalControl::CopyId)),
        KeyCode::Up | KeyCode::Char('k') => AppCommand::ScrollBy(-1),
        KeyCode::Down | KeyCode::Char('j') => AppCommand::ScrollBy(1),
        _ => return,
    };
    dispatch(state, runtime, view_data, internal_tx, command);
}

fn handle_prompt_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(input) = view_data.prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => view_data.prompt = None,
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(ch) => input.push(ch),
        KeyCode::Enter => {
            let raw = view_data.prompt.take().unwrap_or_default();
            go_to_location(state, runtime, view_data, internal_tx, raw.trim());
        }
        _ => {}
    }
}

/// Treat `raw` as an externally changed location, like editing the URL
/// fragment by hand.
fn go_to_location<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    raw: &str,
) {
    let fragment = normalize_fragment(raw);
    let events = state.dispatch(AppCommand::LocationChanged(fragment.clone()));
    let normalized = events
        .iter()
        .any(|event| matches!(event, AppEvent::LocationReplaced(_)));
    handle_events(state, runtime, view_data, internal_tx, events);

    if normalized {
        emit_status(
            state,
            runtime,
            view_data,
            internal_tx,
            format!("no panel at {fragment}; showing {}", state.active_panel().label()),
        );
    } else if let Err(error) = runtime.save_location(state.nav().location().fragment()) {
        tracing::warn!(%fragment, error = %format!("{error:#}"), "save location failed");
        emit_status(
            state,
            runtime,
            view_data,
            internal_tx,
            format!("save location failed: {error}"),
        );
    }
}

fn handle_mouse_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if view_data.help_visible {
                view_data.help_visible = false;
                return;
            }
            match layout::hit_test(view_data.viewport, state, mouse.column, mouse.row) {
                Some(layout::Hit::Target(target)) => {
                    dispatch(state, runtime, view_data, internal_tx, AppCommand::Click(target));
                }
                Some(layout::Hit::Backdrop) => {
                    dispatch(state, runtime, view_data, internal_tx, AppCommand::CloseModal);
                }
                None => {}
            }
        }
        MouseEventKind::ScrollDown => scroll(state, runtime, view_data, internal_tx, WHEEL_ROWS),
        MouseEventKind::ScrollUp => scroll(state, runtime, view_data, internal_tx, -WHEEL_ROWS),
        _ => {}
    }
}
