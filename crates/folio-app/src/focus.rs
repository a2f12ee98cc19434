// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::ProjectKey;
use crate::model::Panel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalControl {
    Close,
    CopyId,
    Link(usize),
}

/// Anything that can hold keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    Tab(Panel),
    Panel(Panel),
    Jump(Panel),
    Search,
    TagChip(usize),
    Card(ProjectKey),
    ContactField(ContactField),
    ContactSubmit,
    CopyEmail,
    CopyLinks,
    Modal(ModalControl),
}

impl FocusTarget {
    pub fn is_tab(&self) -> bool {
        matches!(self, Self::Tab(_))
    }

    pub fn is_modal(&self) -> bool {
        matches!(self, Self::Modal(_))
    }

    pub fn accepts_text(&self) -> bool {
        matches!(self, Self::Search | Self::ContactField(_))
    }
}

/// Next (or previous) entry of `ring` after `current`, wrapping at both
/// ends. A `current` outside the ring lands on the first (or last) entry.
pub fn cycle<T: PartialEq + Clone>(ring: &[T], current: Option<&T>, backwards: bool) -> Option<T> {
    if ring.is_empty() {
        return None;
    }
    let len = ring.len();
    let next = match current.and_then(|item| ring.iter().position(|entry| entry == item)) {
        Some(index) if backwards => (index + len - 1) % len,
        Some(index) => (index + 1) % len,
        None if backwards => len - 1,
        None => 0,
    };
    Some(ring[next].clone())
}

#[cfg(test)]
mod tests {
    use super::cycle;

    #[test]
    fn cycle_wraps_in_both_directions() {
        let ring = ["a", "b", "c"];
        assert_eq!(cycle(&ring, Some(&"c"), false), Some("a"));
        assert_eq!(cycle(&ring, Some(&"a"), true), Some("c"));
        assert_eq!(cycle(&ring, Some(&"a"), false), Some("b"));
    }

    #[test]
    fn cycle_recovers_from_foreign_focus() {
        let ring = ["a", "b"];
        assert_eq!(cycle(&ring, Some(&"z"), false), Some("a"));
        assert_eq!(cycle(&ring, Some(&"z"), true), Some("b"));
        assert_eq!(cycle(&ring, None, false), Some("a"));
        assert_eq!(cycle::<&str>(&[], None, false), None);
    }
}
