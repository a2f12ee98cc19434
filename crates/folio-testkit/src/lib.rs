// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use folio_app::{Catalog, ProjectKey, ProjectLink, ProjectRecord};
use std::path::{Path, PathBuf};

const ICONS: [&str; 8] = ["🧬", "🪰", "📈", "🔬", "🎮", "📅", "🧪", "🗺️"];

const SUBJECTS: [&str; 12] = [
    "Genome",
    "Allele",
    "Codon",
    "Drift",
    "Fitness",
    "Phenotype",
    "Attendance",
    "Pixel",
    "Sprite",
    "Protein",
    "Lineage",
    "Mutation",
];

const KINDS: [&str; 8] = [
    "Toolkit",
    "Simulator",
    "Explorer",
    "Visualizer",
    "Tracker",
    "Notebook",
    "Platformer",
    "Dashboard",
];

const TAGS: [&str; 12] = [
    "Python",
    "Rust",
    "NumPy",
    "Pandas",
    "Matplotlib",
    "React",
    "Simulation",
    "Genetics",
    "Game Dev",
    "Teaching Tool",
    "Data Visualization",
    "Pygame",
];

const WORDS: [&str; 24] = [
    "interactive",
    "stochastic",
    "model",
    "population",
    "visual",
    "analysis",
    "pipeline",
    "research",
    "teaching",
    "allele",
    "frequency",
    "genotype",
    "trait",
    "tracking",
    "plots",
    "level",
    "physics",
    "students",
    "clean",
    "outputs",
    "validation",
    "design",
    "modular",
    "dataset",
];

/// Content file with two projects and a profile, used by config and CLI tests.
pub const SAMPLE_CONTENT_TOML: &str = r#"
[profile]
name = "Sample Person"
headline = "Builds small tools"
email = "sample@example.com"

[[profile.links]]
label = "GitHub"
href = "https://github.com/example"

[[profile.stats]]
label = "Projects shipped"
value = 2

[[profile.resume]]
heading = "Skills"
items = ["Rust", "Python"]

[[projects]]
id = "alpha"
icon = "🧪"
title = "Alpha Toolkit"
year = "2024"
meta = "Rust • CLI"
tags = ["Rust", "CLI"]
summary = "A small alpha toolkit."
details = ["Parses input", "Writes reports"]

[[projects.links]]
label = "Source"
href = "https://example.com/alpha"

[[projects]]
id = "beta"
title = "Beta Notebook"
year = "2025"
tags = ["Python"]
summary = "Exploratory notebook."
"#;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible project records.
#[derive(Debug, Clone)]
pub struct PortfolioFaker {
    rng: DeterministicRng,
    next_id: usize,
}

impl PortfolioFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 0,
        }
    }

    pub fn project(&mut self) -> ProjectRecord {
        self.next_id += 1;
        let id = format!("p{:03}", self.next_id);
        let title = format!("{} {}", self.pick(&SUBJECTS), self.pick(&KINDS));

        let tag_count = 1 + self.rng.int_n(5);
        let mut tags: Vec<String> = Vec::with_capacity(tag_count);
        while tags.len() < tag_count {
            let tag = self.pick(&TAGS);
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_owned());
            }
        }

        let year = (2019 + self.rng.int_n(7)).to_string();
        let meta = tags.join(" • ");
        let summary = self.sentence(8, 16);
        let details = (0..self.rng.int_n(4)).map(|_| self.sentence(3, 7)).collect();
        let links = if self.rng.int_n(3) == 0 {
            Vec::new()
        } else {
            vec![ProjectLink {
                label: "GitHub".to_owned(),
                href: format!("https://github.com/example/{id}"),
            }]
        };

        ProjectRecord {
            id: key(&id),
            icon: self.pick(&ICONS).to_owned(),
            title,
            year,
            meta,
            tags,
            summary,
            details,
            links,
        }
    }

    pub fn catalog(&mut self, count: usize) -> Result<Catalog> {
        let records = (0..count).map(|_| self.project()).collect();
        Catalog::new(records).context("build faked catalog")
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        let mut sentence = (0..count)
            .map(|_| self.pick(&WORDS))
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

/// Panics on an invalid key; only for fixtures.
pub fn key(value: &str) -> ProjectKey {
    ProjectKey::parse(value).unwrap_or_else(|| panic!("invalid fixture key {value:?}"))
}

/// Minimal record with the given tags and no links.
pub fn record(id: &str, title: &str, tags: &[&str]) -> ProjectRecord {
    ProjectRecord {
        id: key(id),
        icon: String::new(),
        title: title.to_owned(),
        year: "2025".to_owned(),
        meta: String::new(),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        summary: format!("{title} summary."),
        details: Vec::new(),
        links: Vec::new(),
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("folio.db");
    Ok((dir, db_path))
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn fixture_datetime() -> &'static str {
    "2026-02-19T12:34:56Z"
}
