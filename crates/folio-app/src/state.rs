// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;

use crate::catalog::{Catalog, Portfolio};
use crate::contact::ContactForm;
use crate::filter::{FilterState, TagFilter};
use crate::focus::{ContactField, FocusTarget, ModalControl, cycle};
use crate::ids::ProjectKey;
use crate::markup::GridContents;
use crate::modal::{ModalContent, ProjectModal};
use crate::model::{Panel, Profile, Theme};
use crate::nav::{Activation, NavigationController, UrlUpdate};

/// Side effects the front end performs on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Copy { label: String, text: String },
    OpenUrl(String),
    SubmitContact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Activate(String),
    ActivatePanel(Panel),
    LocationChanged(String),
    Arrow(isize),
    Resize { strip_width: u16 },
    InsertChar(char),
    Backspace,
    SetQuery(String),
    SelectTag(TagFilter),
    OpenProject(ProjectKey),
    CloseModal,
    FocusNext,
    FocusPrev,
    Focus(FocusTarget),
    ActivateFocused,
    Click(FocusTarget),
    ScrollBy(i32),
    ToggleTheme,
    ResetContact,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    PanelActivated(Panel),
    LocationReplaced(String),
    FocusMoved(FocusTarget),
    GridUpdated { visible: usize },
    ModalOpened(ProjectKey),
    ModalClosed(ProjectKey),
    ActionRequested(Action),
    ThemeChanged(Theme),
    StatusUpdated(String),
    StatusCleared,
}

/// Owns every piece of mutable UI state. Built in dependency order:
/// catalog, then navigation and filter, then the modal.
#[derive(Debug, Clone)]
pub struct AppState {
    profile: Profile,
    catalog: Arc<Catalog>,
    tags: Vec<String>,
    nav: NavigationController,
    filter: FilterState,
    grid: GridContents,
    modal: ProjectModal,
    focus: Option<FocusTarget>,
    scroll: [u16; 4],
    pub contact: ContactForm,
    pub theme: Theme,
    pub status_line: Option<String>,
}

impl AppState {
    pub fn new(portfolio: Portfolio, theme: Theme) -> Self {
        let Portfolio { profile, catalog } = portfolio;
        let tags = catalog.tags();
        let nav = NavigationController::default();
        let filter = FilterState::default();
        let modal = ProjectModal::new(Arc::clone(&catalog));
        Self {
            profile,
            catalog,
            tags,
            nav,
            filter,
            grid: GridContents::Pending,
            modal,
            focus: None,
            scroll: [0; 4],
            contact: ContactForm::default(),
            theme,
            status_line: None,
        }
    }

    /// First activation from the saved location. The location is only
    /// rewritten when it named no known panel.
    pub fn initialize(&mut self, fragment: &str) -> Vec<AppEvent> {
        let mut events = self.refilter();
        let activation = self.nav.init_from_location(fragment);
        events.extend(self.after_activation(activation));
        events
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    pub fn active_panel(&self) -> Panel {
        self.nav.active()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn grid(&self) -> &GridContents {
        &self.grid
    }

    pub fn modal(&self) -> Option<&ModalContent> {
        self.modal.content()
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.focus.as_ref()
    }

    pub fn scroll_locked(&self) -> bool {
        self.modal.is_open()
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll[self.nav.active().index()]
    }

    /// Chip labels: `All` followed by the catalog's distinct tags.
    pub fn chip_labels(&self) -> Vec<&str> {
        std::iter::once("All")
            .chain(self.tags.iter().map(String::as_str))
            .collect()
    }

    pub fn chip_filter(&self, index: usize) -> Option<TagFilter> {
        match index {
            0 => Some(TagFilter::Any),
            _ => self
                .tags
                .get(index - 1)
                .map(|tag| TagFilter::Tag(tag.clone())),
        }
    }

    pub fn selected_chip(&self) -> usize {
        match &self.filter.tag {
            TagFilter::Any => 0,
            TagFilter::Tag(tag) => self
                .tags
                .iter()
                .position(|candidate| candidate.eq_ignore_ascii_case(tag.trim()))
                .map_or(0, |index| index + 1),
        }
    }

    /// Tab order of the background document: the tab strip, then the
    /// active panel's controls.
    pub fn focus_ring(&self) -> Vec<FocusTarget> {
        let mut ring: Vec<FocusTarget> = Panel::ALL.into_iter().map(FocusTarget::Tab).collect();
        match self.nav.active() {
            Panel::Home => ring.extend([
                FocusTarget::Jump(Panel::Projects),
                FocusTarget::Jump(Panel::Contact),
                FocusTarget::CopyEmail,
                FocusTarget::CopyLinks,
            ]),
            Panel::Projects => {
                ring.push(FocusTarget::Search);
                ring.extend((0..=self.tags.len()).map(FocusTarget::TagChip));
                ring.extend(
                    self.grid
                        .cards()
                        .iter()
                        .map(|card| FocusTarget::Card(card.id.clone())),
                );
            }
            Panel::Resume => {}
            Panel::Contact => {
                ring.extend(ContactField::ALL.into_iter().map(FocusTarget::ContactField));
                ring.push(FocusTarget::ContactSubmit);
            }
        }
        ring
    }

    /// Whether `target` is currently part of the visible document.
    pub fn document_contains(&self, target: &FocusTarget) -> bool {
        if target.is_modal() {
            return self.modal.contains_focus(target);
        }
        *target == FocusTarget::Panel(self.nav.active()) || self.focus_ring().contains(target)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Activate(name) => match self.nav.activate(&name, UrlUpdate::Replace) {
                Some(activation) => self.after_activation(activation),
                None => Vec::new(),
            },
            AppCommand::ActivatePanel(panel) => {
                let activation = self.nav.activate_panel(panel, UrlUpdate::Replace);
                self.after_activation(activation)
            }
            AppCommand::LocationChanged(fragment) => {
                let activation = self.nav.location_changed(&fragment);
                if self.modal.is_open() {
                    // The dialog keeps focus; the panel switches underneath.
                    return activation_events(&activation);
                }
                self.after_activation(activation)
            }
            AppCommand::Arrow(delta) => self.arrow(delta),
            AppCommand::Resize { strip_width } => {
                self.nav.resize(strip_width);
                Vec::new()
            }
            AppCommand::InsertChar(ch) => self.edit_focused_text(|text| text.push(ch)),
            AppCommand::Backspace => self.edit_focused_text(|text| {
                text.pop();
            }),
            AppCommand::SetQuery(query) => {
                self.filter.query = query;
                self.refilter()
            }
            AppCommand::SelectTag(tag) => {
                self.filter.tag = tag;
                self.refilter()
            }
            AppCommand::OpenProject(id) => self.open_project(&id),
            AppCommand::CloseModal => self.close_modal(),
            AppCommand::FocusNext => self.cycle_focus(false),
            AppCommand::FocusPrev => self.cycle_focus(true),
            AppCommand::Focus(target) => self.set_focus(target),
            AppCommand::ActivateFocused => self.activate_focused(),
            AppCommand::Click(target) => {
                let mut events = self.set_focus(target);
                events.extend(self.activate_focused());
                events
            }
            AppCommand::ScrollBy(delta) => {
                if !self.scroll_locked() {
                    let slot = &mut self.scroll[self.nav.active().index()];
                    *slot = (i32::from(*slot) + delta).clamp(0, i32::from(u16::MAX)) as u16;
                }
                Vec::new()
            }
            AppCommand::ToggleTheme => {
                self.theme = self.theme.toggled();
                vec![
                    AppEvent::ThemeChanged(self.theme),
                    self.set_status(&format!("theme: {}", self.theme.as_str())),
                ]
            }
            AppCommand::ResetContact => {
                self.contact = ContactForm::default();
                Vec::new()
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn after_activation(&mut self, activation: Activation) -> Vec<AppEvent> {
        let mut events = activation_events(&activation);
        self.focus = Some(FocusTarget::Panel(activation.panel));
        events.push(AppEvent::FocusMoved(FocusTarget::Panel(activation.panel)));
        events
    }

    fn arrow(&mut self, delta: isize) -> Vec<AppEvent> {
        if self.modal.is_open() || !self.focus.as_ref().is_some_and(FocusTarget::is_tab) {
            return Vec::new();
        }
        let activation = self.nav.step(delta);
        let panel = activation.panel;
        let mut events = self.after_activation(activation);
        events.extend(self.set_focus(FocusTarget::Tab(panel)));
        events
    }

    fn refilter(&mut self) -> Vec<AppEvent> {
        let visible = self.filter.apply(&self.catalog);
        self.grid = GridContents::from_filtered(&visible, &self.filter);
        let count = visible.len();
        tracing::trace!(query = %self.filter.query, tag = self.filter.tag.label(), count, "grid refiltered");

        let mut events = vec![AppEvent::GridUpdated { visible: count }];
        let stranded = match &self.focus {
            Some(FocusTarget::Card(id)) => !self.grid.cards().iter().any(|card| &card.id == id),
            _ => false,
        };
        if stranded {
            self.focus = Some(FocusTarget::Search);
            events.push(AppEvent::FocusMoved(FocusTarget::Search));
        }
        events
    }

    fn edit_focused_text(&mut self, edit: impl FnOnce(&mut String)) -> Vec<AppEvent> {
        if self.modal.is_open() {
            return Vec::new();
        }
        match self.focus {
            Some(FocusTarget::Search) => {
                edit(&mut self.filter.query);
                self.refilter()
            }
            Some(FocusTarget::ContactField(field)) => {
                edit(self.contact.field_mut(field));
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn open_project(&mut self, id: &ProjectKey) -> Vec<AppEvent> {
        let Some(opened) = self.modal.open(id, self.focus.clone()) else {
            return Vec::new();
        };
        self.focus = Some(opened.focus.clone());
        vec![
            AppEvent::ModalOpened(opened.project),
            AppEvent::FocusMoved(opened.focus),
        ]
    }

    fn close_modal(&mut self) -> Vec<AppEvent> {
        let Some(closed) = self.modal.close() else {
            return Vec::new();
        };
        let restored = closed
            .return_focus
            .filter(|target| self.document_contains(target))
            .unwrap_or(FocusTarget::Panel(self.nav.active()));
        self.focus = Some(restored.clone());
        vec![
            AppEvent::ModalClosed(closed.project),
            AppEvent::FocusMoved(restored),
        ]
    }

    fn cycle_focus(&mut self, backwards: bool) -> Vec<AppEvent> {
        let next = if self.modal.is_open() {
            self.modal.cycle_focus(self.focus.as_ref(), backwards)
        } else {
            let ring = self.focus_ring();
            let current = match &self.focus {
                Some(FocusTarget::Panel(_)) | None => None,
                other => other.as_ref(),
            };
            cycle(&ring, current, backwards)
        };
        match next {
            Some(target) => {
                self.focus = Some(target.clone());
                vec![AppEvent::FocusMoved(target)]
            }
            None => Vec::new(),
        }
    }

    fn set_focus(&mut self, target: FocusTarget) -> Vec<AppEvent> {
        if self.modal.is_open() != target.is_modal() || !self.document_contains(&target) {
            return Vec::new();
        }
        self.focus = Some(target.clone());
        vec![AppEvent::FocusMoved(target)]
    }

    fn activate_focused(&mut self) -> Vec<AppEvent> {
        let Some(target) = self.focus.clone() else {
            return Vec::new();
        };
        match target {
            FocusTarget::Tab(panel) | FocusTarget::Jump(panel) => {
                self.dispatch(AppCommand::ActivatePanel(panel))
            }
            FocusTarget::TagChip(index) => match self.chip_filter(index) {
                Some(tag) => {
                    self.filter.tag = tag;
                    self.refilter()
                }
                None => Vec::new(),
            },
            FocusTarget::Card(id) => self.open_project(&id),
            FocusTarget::CopyEmail => vec![AppEvent::ActionRequested(Action::Copy {
                label: "Email".to_owned(),
                text: self.profile.email.clone(),
            })],
            FocusTarget::CopyLinks => vec![AppEvent::ActionRequested(Action::Copy {
                label: "Links".to_owned(),
                text: self.profile.links_text(),
            })],
            FocusTarget::ContactSubmit => vec![AppEvent::ActionRequested(Action::SubmitContact)],
            FocusTarget::Modal(control) => self.activate_modal_control(control),
            FocusTarget::Panel(_) | FocusTarget::Search | FocusTarget::ContactField(_) => {
                Vec::new()
            }
        }
    }

    fn activate_modal_control(&mut self, control: ModalControl) -> Vec<AppEvent> {
        match control {
            ModalControl::Close => self.close_modal(),
            ModalControl::CopyId => match self.modal.open_project() {
                Some(id) => vec![AppEvent::ActionRequested(Action::Copy {
                    label: "Project id".to_owned(),
                    text: id.to_string(),
                })],
                None => Vec::new(),
            },
            ModalControl::Link(index) => match self
                .modal
                .content()
                .and_then(|content| content.links.get(index))
            {
                Some(link) => vec![AppEvent::ActionRequested(Action::OpenUrl(link.href.clone()))],
                None => Vec::new(),
            },
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

fn activation_events(activation: &Activation) -> Vec<AppEvent> {
    let mut events = vec![AppEvent::PanelActivated(activation.panel)];
    if let Some(fragment) = &activation.fragment_written {
        events.push(AppEvent::LocationReplaced(fragment.clone()));
    }
    events
}
