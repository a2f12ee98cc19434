// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::focus::{FocusTarget, ModalControl, cycle};
use crate::ids::ProjectKey;
use crate::model::{ProjectLink, ProjectRecord};

/// Everything the overlay shows, copied out of one record at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalContent {
    pub id: ProjectKey,
    pub icon: String,
    pub title: String,
    pub meta: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub details: Vec<String>,
    pub links: Vec<ProjectLink>,
}

impl ModalContent {
    pub fn from_record(record: &ProjectRecord) -> Self {
        let meta = match (record.meta.is_empty(), record.year.is_empty()) {
            (false, false) => format!("{} • {}", record.meta, record.year),
            (false, true) => record.meta.clone(),
            (true, _) => record.year.clone(),
        };
        Self {
            id: record.id.clone(),
            icon: record.icon.clone(),
            title: record.title.clone(),
            meta,
            summary: record.summary.clone(),
            tags: record.tags.clone(),
            details: record.details.clone(),
            links: record.links.clone(),
        }
    }

    /// Focus order inside the overlay: close, copy id, then each link.
    pub fn focusables(&self) -> Vec<ModalControl> {
        let mut controls = vec![ModalControl::Close, ModalControl::CopyId];
        controls.extend((0..self.links.len()).map(ModalControl::Link));
        controls
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open {
        content: ModalContent,
        return_focus: Option<FocusTarget>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub project: ProjectKey,
    pub focus: FocusTarget,
    pub replaced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closed {
    pub project: ProjectKey,
    pub return_focus: Option<FocusTarget>,
}

#[derive(Debug, Clone)]
pub struct ProjectModal {
    catalog: Arc<Catalog>,
    state: ModalState,
}

impl ProjectModal {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: ModalState::Closed,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn content(&self) -> Option<&ModalContent> {
        match &self.state {
            ModalState::Open { content, .. } => Some(content),
            ModalState::Closed => None,
        }
    }

    pub fn open_project(&self) -> Option<&ProjectKey> {
        self.content().map(|content| &content.id)
    }

    /// Open (or re-target) the overlay. Unknown ids are a no-op.
    ///
    /// `current_focus` is captured as the return target only on the
    /// `Closed -> Open` edge; re-opening keeps the original target.
    pub fn open(&mut self, id: &ProjectKey, current_focus: Option<FocusTarget>) -> Option<Opened> {
        let Some(record) = self.catalog.get(id) else {
            tracing::debug!(project = %id, "ignoring open for unknown project");
            return None;
        };
        let content = ModalContent::from_record(record);
        let focus = initial_focus(&content);

        let (return_focus, replaced) = match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Open { return_focus, .. } => (return_focus, true),
            ModalState::Closed => (current_focus.filter(|target| !target.is_modal()), false),
        };
        self.state = ModalState::Open {
            content,
            return_focus,
        };
        tracing::debug!(project = %id, replaced, "modal opened");
        Some(Opened {
            project: id.clone(),
            focus,
            replaced,
        })
    }

    /// Close the overlay; a no-op when already closed.
    pub fn close(&mut self) -> Option<Closed> {
        match std::mem::replace(&mut self.state, ModalState::Closed) {
            ModalState::Open {
                content,
                return_focus,
            } => {
                tracing::debug!(project = %content.id, "modal closed");
                Some(Closed {
                    project: content.id,
                    return_focus,
                })
            }
            ModalState::Closed => None,
        }
    }

    /// Tab / Shift+Tab containment: focus never leaves the overlay's own
    /// controls while it is open.
    pub fn cycle_focus(&self, current: Option<&FocusTarget>, backwards: bool) -> Option<FocusTarget> {
        let content = self.content()?;
        let ring: Vec<FocusTarget> = content
            .focusables()
            .into_iter()
            .map(FocusTarget::Modal)
            .collect();
        cycle(&ring, current, backwards)
    }

    pub fn contains_focus(&self, target: &FocusTarget) -> bool {
        match (self.content(), target) {
            (Some(content), FocusTarget::Modal(control)) => content.focusables().contains(control),
            _ => false,
        }
    }
}

fn initial_focus(content: &ModalContent) -> FocusTarget {
    let controls = content.focusables();
    let control = if controls.contains(&ModalControl::Close) {
        ModalControl::Close
    } else {
        controls.first().copied().unwrap_or(ModalControl::Close)
    };
    FocusTarget::Modal(control)
}

#[cfg(test)]
mod tests {
    use super::{ModalState, ProjectModal};
    use crate::catalog::Catalog;
    use crate::focus::{FocusTarget, ModalControl};
    use crate::ids::ProjectKey;
    use crate::model::Panel;
    use std::sync::Arc;

    fn key(value: &str) -> ProjectKey {
        ProjectKey::parse(value).expect("valid key")
    }

    fn modal() -> ProjectModal {
        ProjectModal::new(Arc::new(Catalog::demo()))
    }

    #[test]
    fn open_captures_focus_and_focuses_close() {
        let mut modal = modal();
        let opened = modal
            .open(&key("qtl"), Some(FocusTarget::Card(key("qtl"))))
            .expect("known project");
        assert_eq!(opened.focus, FocusTarget::Modal(ModalControl::Close));
        assert!(!opened.replaced);
        assert!(matches!(
            modal.state(),
            ModalState::Open { return_focus: Some(FocusTarget::Card(_)), .. }
        ));
    }

    #[test]
    fn unknown_project_is_a_no_op() {
        let mut modal = modal();
        assert_eq!(modal.open(&key("missing"), None), None);
        assert!(!modal.is_open());
    }

    #[test]
    fn reopen_replaces_content_and_keeps_return_focus() {
        let mut modal = modal();
        let origin = FocusTarget::Card(key("qtl"));
        modal.open(&key("qtl"), Some(origin.clone()));
        let opened = modal
            .open(&key("buri"), Some(FocusTarget::Modal(ModalControl::Close)))
            .expect("known project");
        assert!(opened.replaced);

        let content = modal.content().expect("open");
        assert_eq!(content.title, "Buri Drift Simulator");
        assert!(content.summary.contains("Drosophila"));

        let closed = modal.close().expect("was open");
        assert_eq!(closed.return_focus, Some(origin));
    }

    #[test]
    fn close_when_closed_is_a_no_op() {
        let mut modal = modal();
        assert_eq!(modal.close(), None);
        modal.open(&key("wf"), Some(FocusTarget::Panel(Panel::Projects)));
        assert!(modal.close().is_some());
        assert_eq!(modal.close(), None);
    }

    #[test]
    fn focus_cycles_within_two_controls() {
        let mut modal = modal();
        modal.open(&key("scroll"), None);
        let close = FocusTarget::Modal(ModalControl::Close);
        let copy = FocusTarget::Modal(ModalControl::CopyId);

        assert_eq!(modal.cycle_focus(Some(&copy), false), Some(close.clone()));
        assert_eq!(modal.cycle_focus(Some(&close), true), Some(copy.clone()));
        assert_eq!(modal.cycle_focus(Some(&close), false), Some(copy));
    }

    #[test]
    fn focus_ring_includes_every_link() {
        let mut modal = modal();
        modal.open(&key("qtl"), None);
        let last = FocusTarget::Modal(ModalControl::Link(0));
        assert!(modal.contains_focus(&last));
        assert!(!modal.contains_focus(&FocusTarget::Modal(ModalControl::Link(1))));
        assert_eq!(
            modal.cycle_focus(Some(&last), false),
            Some(FocusTarget::Modal(ModalControl::Close))
        );
        assert_eq!(
            modal.cycle_focus(Some(&FocusTarget::Search), false),
            Some(FocusTarget::Modal(ModalControl::Close))
        );
    }

    #[test]
    fn modal_shows_full_tag_list_and_details() {
        let mut modal = modal();
        modal.open(&key("qtl"), None);
        let content = modal.content().expect("open");
        assert_eq!(content.tags.len(), 4);
        assert_eq!(content.details.len(), 3);
        assert_eq!(content.meta, "Python • Pandas • Matplotlib • 2025");
    }
}
