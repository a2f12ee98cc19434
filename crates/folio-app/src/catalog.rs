// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

use crate::ids::ProjectKey;
use crate::model::{ProjectLink, ProjectRecord, Profile, ResumeSection, Stat};

const ALLOWED_LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateId(ProjectKey),
    EmptyTitle(ProjectKey),
    InvalidLink {
        project: ProjectKey,
        href: String,
        reason: String,
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate project id `{id}`"),
            Self::EmptyTitle(id) => write!(f, "project `{id}` has an empty title"),
            Self::InvalidLink {
                project,
                href,
                reason,
            } => write!(f, "project `{project}` link {href:?} is invalid: {reason}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Ordered, read-only list of projects. Ids are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<ProjectRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProjectRecord>) -> std::result::Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
            if record.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(record.id.clone()));
            }
            for link in &record.links {
                validate_link(&record.id, link)?;
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ProjectKey) -> Option<&ProjectRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn get_str(&self, id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|record| record.id.as_str() == id)
    }

    /// Distinct tags in first-seen order; case-insensitive dedupe keeps the
    /// first spelling.
    pub fn tags(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut tags = Vec::new();
        for tag in self.records.iter().flat_map(|record| record.tags.iter()) {
            let trimmed = tag.trim();
            if trimmed.is_empty() {
                continue;
            }
            if seen.insert(trimmed.to_lowercase()) {
                tags.push(trimmed.to_owned());
            }
        }
        tags
    }

    pub fn demo() -> Self {
        Self {
            records: demo_records(),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ProjectRecord;
    type IntoIter = std::slice::Iter<'a, ProjectRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn validate_link(project: &ProjectKey, link: &ProjectLink) -> std::result::Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidLink {
        project: project.clone(),
        href: link.href.clone(),
        reason,
    };
    let parsed = Url::parse(&link.href).map_err(|error| invalid(error.to_string()))?;
    if !ALLOWED_LINK_SCHEMES.contains(&parsed.scheme()) {
        return Err(invalid(format!(
            "scheme `{}` is not one of http, https, mailto",
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Everything the front end shows: owner profile plus the catalog.
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub profile: Profile,
    pub catalog: Arc<Catalog>,
}

#[derive(Debug, Deserialize)]
struct ContentDocument {
    profile: Option<Profile>,
    #[serde(default)]
    projects: Vec<ProjectRecord>,
}

impl Portfolio {
    pub fn demo() -> Self {
        Self {
            profile: demo_profile(),
            catalog: Arc::new(Catalog::demo()),
        }
    }

    /// Parse a content file. A missing `[profile]` falls back to the demo
    /// profile; an empty `[[projects]]` list falls back to the demo catalog.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let document: ContentDocument = toml::from_str(raw).context("parse content TOML")?;
        let catalog = if document.projects.is_empty() {
            Catalog::demo()
        } else {
            Catalog::new(document.projects).context("validate project catalog")?
        };
        tracing::debug!(projects = catalog.len(), "loaded content document");
        Ok(Self {
            profile: document.profile.unwrap_or_else(demo_profile),
            catalog: Arc::new(catalog),
        })
    }
}

fn key(value: &'static str) -> ProjectKey {
    ProjectKey::from_static(value)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn github_link() -> Vec<ProjectLink> {
    vec![ProjectLink {
        label: "GitHub".to_owned(),
        href: "https://github.com/example".to_owned(),
    }]
}

fn demo_records() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord {
            id: key("qtl"),
            icon: "🧬".to_owned(),
            title: "QTL Analysis Toolkit".to_owned(),
            year: "2025".to_owned(),
            meta: "Python • Pandas • Matplotlib".to_owned(),
            tags: strings(&["Python", "Pandas", "Matplotlib", "Genetics"]),
            summary: "An interactive toolkit for genome-wide QTL scans linking genotype to phenotype, built for research-driven analysis and clean scientific outputs.".to_owned(),
            details: strings(&[
                "Single-marker association testing with LOD visualization",
                "Permutation thresholds for more rigorous inference",
                "Exports plots and CSV outputs for reporting pipelines",
            ]),
            links: github_link(),
        },
        ProjectRecord {
            id: key("buri"),
            icon: "🎲".to_owned(),
            title: "Buri Drift Simulator".to_owned(),
            year: "2025".to_owned(),
            meta: "Python • NumPy • Matplotlib".to_owned(),
            tags: strings(&["Python", "NumPy", "Matplotlib", "Simulation"]),
            summary: "Simulates genetic drift in small Drosophila populations, reproducing classic Buri-style outcomes with stochastic modeling.".to_owned(),
            details: strings(&[
                "Interactive visualization of allele frequencies over time",
                "Tracks genotype distributions and drift outcomes",
                "Modular code for classroom demonstrations",
            ]),
            links: github_link(),
        },
        ProjectRecord {
            id: key("wf"),
            icon: "📉".to_owned(),
            title: "Selection Simulator (Wright-Fisher Model)".to_owned(),
            year: "2025".to_owned(),
            meta: "Python • Simulation • Data Visualization".to_owned(),
            tags: strings(&["Python", "Simulation", "Data Visualization"]),
            summary: "A dual deterministic and stochastic simulator showing allele trajectories, mean fitness and phenotype distributions in real time.".to_owned(),
            details: strings(&[
                "Deterministic and stochastic dynamics side by side",
                "Phenotype distributions via mixture modeling",
                "Real-time visualization tuned for intuition",
            ]),
            links: github_link(),
        },
        ProjectRecord {
            id: key("proteinvis"),
            icon: "🧪".to_owned(),
            title: "ProteinVis (DNA to Protein Visualizer)".to_owned(),
            year: "2025".to_owned(),
            meta: "Python • Teaching Tool".to_owned(),
            tags: strings(&["Python", "Teaching Tool"]),
            summary: "A codon translation and amino acid visualization tool illustrating the DNA-to-protein relationship with strong validation and clean visuals.".to_owned(),
            details: strings(&[
                "Codon translation with input validation",
                "Optimized visual output for many sequences",
                "Built for teaching molecular biology concepts",
            ]),
            links: github_link(),
        },
        ProjectRecord {
            id: key("ash"),
            icon: "🎮".to_owned(),
            title: "To Ash Again (2D Platformer)".to_owned(),
            year: "2025".to_owned(),
            meta: "Python • Pygame • Game Dev".to_owned(),
            tags: strings(&["Python", "Pygame", "Game Dev"]),
            summary: "A pixel-art platformer featuring physics, enemy AI, cutscenes and level progression, built with modular design and object management.".to_owned(),
            details: strings(&[
                "Player physics and responsive controls",
                "Enemy behaviors and progression structure",
                "Cutscenes and modular game architecture",
            ]),
            links: github_link(),
        },
        ProjectRecord {
            id: key("scroll"),
            icon: "🗂".to_owned(),
            title: "Sc-Roll (Student Attendance System)".to_owned(),
            year: "2025".to_owned(),
            meta: "React • Project Management".to_owned(),
            tags: strings(&["React", "Project Management"]),
            summary: "Led a four-member team to design and document an attendance web app for 200+ users, improving record accuracy by 35%.".to_owned(),
            details: strings(&[
                "Team leadership and project documentation",
                "UX focused on reliability and speed of entry",
                "Designed for real multi-user workflows",
            ]),
            links: Vec::new(),
        },
    ]
}

fn demo_profile() -> Profile {
    Profile {
        name: "Alex Morgan".to_owned(),
        headline: "Computational biology · simulation · teaching tools".to_owned(),
        intro: "I build research software that turns population genetics into something you can poke at.".to_owned(),
        email: "alex@example.com".to_owned(),
        links: vec![
            ProjectLink {
                label: "GitHub".to_owned(),
                href: "https://github.com/example".to_owned(),
            },
            ProjectLink {
                label: "LinkedIn".to_owned(),
                href: "https://linkedin.com/in/example".to_owned(),
            },
        ],
        stats: vec![
            Stat {
                label: "projects shipped".to_owned(),
                value: 6,
                suffix: String::new(),
            },
            Stat {
                label: "users served".to_owned(),
                value: 200,
                suffix: "+".to_owned(),
            },
            Stat {
                label: "accuracy gain".to_owned(),
                value: 35,
                suffix: "%".to_owned(),
            },
        ],
        resume: vec![
            ResumeSection {
                heading: "Education".to_owned(),
                items: strings(&["B.S. Biological Sciences, minor in Computer Science"]),
            },
            ResumeSection {
                heading: "Skills".to_owned(),
                items: strings(&[
                    "Python, NumPy, Pandas, Matplotlib",
                    "Simulation and statistical genetics",
                    "React, project leadership",
                ]),
            },
            ResumeSection {
                heading: "Experience".to_owned(),
                items: strings(&[
                    "Undergraduate researcher, population genetics lab",
                    "Team lead, student attendance system",
                ]),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, Portfolio};
    use crate::ids::ProjectKey;
    use crate::model::{ProjectLink, ProjectRecord};
    use anyhow::Result;
    use std::collections::BTreeSet;

    fn record(id: &str, title: &str) -> ProjectRecord {
        ProjectRecord {
            id: ProjectKey::parse(id).expect("valid test key"),
            icon: String::new(),
            title: title.to_owned(),
            year: String::new(),
            meta: String::new(),
            tags: Vec::new(),
            summary: String::new(),
            details: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn demo_catalog_ids_are_pairwise_distinct() {
        let catalog = Catalog::demo();
        let ids: BTreeSet<_> = catalog.iter().map(|record| record.id.clone()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(Catalog::new(catalog.records().to_vec()).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let error = Catalog::new(vec![record("a", "First"), record("a", "Second")])
            .expect_err("duplicate id should fail");
        assert_eq!(
            error,
            CatalogError::DuplicateId(ProjectKey::parse("a").expect("valid key"))
        );
        assert_eq!(error.to_string(), "duplicate project id `a`");
    }

    #[test]
    fn empty_titles_are_rejected() {
        let error = Catalog::new(vec![record("a", "  ")]).expect_err("empty title should fail");
        assert!(matches!(error, CatalogError::EmptyTitle(_)));
    }

    #[test]
    fn links_must_use_web_or_mail_schemes() {
        let mut bad = record("a", "A");
        bad.links.push(ProjectLink {
            label: "script".to_owned(),
            href: "javascript:alert(1)".to_owned(),
        });
        let error = Catalog::new(vec![bad]).expect_err("javascript link should fail");
        assert!(error.to_string().contains("scheme `javascript`"));

        let mut relative = record("b", "B");
        relative.links.push(ProjectLink {
            label: "rel".to_owned(),
            href: "/docs".to_owned(),
        });
        assert!(Catalog::new(vec![relative]).is_err());
    }

    #[test]
    fn tags_dedupe_case_insensitively_in_first_seen_order() -> Result<()> {
        let mut first = record("a", "A");
        first.tags = vec!["Python".to_owned(), "Pandas".to_owned()];
        let mut second = record("b", "B");
        second.tags = vec![" python ".to_owned(), "React".to_owned(), String::new()];
        let catalog = Catalog::new(vec![first, second])?;
        assert_eq!(catalog.tags(), vec!["Python", "Pandas", "React"]);
        Ok(())
    }

    #[test]
    fn content_document_without_projects_uses_demo_catalog() -> Result<()> {
        let portfolio = Portfolio::from_toml_str(
            "[profile]\nname = \"Sam\"\nemail = \"sam@example.com\"\n",
        )?;
        assert_eq!(portfolio.profile.name, "Sam");
        assert_eq!(portfolio.catalog.len(), Catalog::demo().len());
        Ok(())
    }

    #[test]
    fn content_document_rejects_invalid_project_ids() {
        let error = Portfolio::from_toml_str("[[projects]]\nid = \"has space\"\ntitle = \"X\"\n")
            .expect_err("invalid id should fail");
        assert!(format!("{error:#}").contains("has space"));
    }
}
