// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::ProjectKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    Home,
    Projects,
    Resume,
    Contact,
}

impl Panel {
    pub const ALL: [Self; 4] = [Self::Home, Self::Projects, Self::Resume, Self::Contact];
    pub const DEFAULT: Self = Self::Home;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Projects => "projects",
            Self::Resume => "resume",
            Self::Contact => "contact",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "home" => Some(Self::Home),
            "projects" => Some(Self::Projects),
            "resume" => Some(Self::Resume),
            "contact" => Some(Self::Contact),
            _ => None,
        }
    }

    /// Accepts `#name` or `name`; anything else is unknown.
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        Self::parse(fragment.strip_prefix('#').unwrap_or(fragment))
    }

    pub fn fragment(self) -> String {
        format!("#{}", self.as_str())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Projects => "Projects",
            Self::Resume => "Resume",
            Self::Contact => "Contact",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Home => "H",
            Self::Projects => "P",
            Self::Resume => "R",
            Self::Contact => "C",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|panel| *panel == self)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Calm,
    Glow,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Glow => "glow",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "calm" => Some(Self::Calm),
            "glow" => Some(Self::Glow),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Calm => Self::Glow,
            Self::Glow => Self::Calm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectKey,
    #[serde(default)]
    pub icon: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
}

impl ProjectRecord {
    /// Trimmed, case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.tags
            .iter()
            .any(|candidate| candidate.trim().to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: u32,
    #[serde(default)]
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub heading: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub intro: String,
    pub email: String,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub resume: Vec<ResumeSection>,
}

impl Profile {
    /// Text handed to the clipboard by the "copy links" control.
    pub fn links_text(&self) -> String {
        let mut lines = vec![format!("Email: {}", self.email)];
        lines.extend(
            self.links
                .iter()
                .map(|link| format!("{}: {}", link.label, link.href)),
        );
        lines.join("\n")
    }
}
