// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::catalog::Catalog;
use crate::model::ProjectRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    Any,
    Tag(String),
}

impl TagFilter {
    pub fn matches(&self, record: &ProjectRecord) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(tag) => record.has_tag(tag),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Any => "All",
            Self::Tag(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub query: String,
    pub tag: TagFilter,
}

impl FilterState {
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a ProjectRecord> {
        filter(catalog, &self.query, &self.tag)
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.tag != TagFilter::Any
    }
}

/// Order-preserving reduction: tag filter first, then a case-insensitive
/// substring match over title, summary, tags, year and meta.
pub fn filter<'a>(catalog: &'a Catalog, query: &str, tag: &TagFilter) -> Vec<&'a ProjectRecord> {
    let needle = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|record| tag.matches(record))
        .filter(|record| needle.is_empty() || search_haystack(record).contains(&needle))
        .collect()
}

fn search_haystack(record: &ProjectRecord) -> String {
    let mut haystack = String::with_capacity(
        record.title.len() + record.summary.len() + record.meta.len() + record.year.len() + 32,
    );
    for part in [&record.title, &record.summary, &record.year, &record.meta]
        .into_iter()
        .chain(record.tags.iter())
    {
        haystack.push_str(&part.to_lowercase());
        haystack.push('\n');
    }
    haystack
}

#[cfg(test)]
mod tests {
    use super::{FilterState, TagFilter, filter};
    use crate::catalog::Catalog;

    fn ids(records: &[&crate::ProjectRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.to_string()).collect()
    }

    #[test]
    fn empty_query_without_tag_returns_catalog_in_order() {
        let catalog = Catalog::demo();
        let all = filter(&catalog, "", &TagFilter::Any);
        assert_eq!(
            ids(&all),
            catalog
                .iter()
                .map(|record| record.id.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn query_is_trimmed_and_case_insensitive() {
        let catalog = Catalog::demo();
        assert_eq!(ids(&filter(&catalog, "qtl", &TagFilter::Any)), vec!["qtl"]);
        assert_eq!(ids(&filter(&catalog, "  QTL  ", &TagFilter::Any)), vec!["qtl"]);
    }

    #[test]
    fn query_matches_tags_and_meta() {
        let catalog = Catalog::demo();
        assert_eq!(ids(&filter(&catalog, "pygame", &TagFilter::Any)), vec!["ash"]);
        assert_eq!(
            ids(&filter(&catalog, "project management", &TagFilter::Any)),
            vec!["scroll"]
        );
    }

    #[test]
    fn tag_filter_keeps_relative_order() {
        let catalog = Catalog::demo();
        let python = filter(&catalog, "", &TagFilter::Tag("Python".to_owned()));
        assert_eq!(ids(&python), vec!["qtl", "buri", "wf", "proteinvis", "ash"]);
        assert!(python.iter().all(|record| record.has_tag("python")));

        let lower = filter(&catalog, "", &TagFilter::Tag(" python ".to_owned()));
        assert_eq!(ids(&lower), ids(&python));
    }

    #[test]
    fn tag_and_text_compose_with_and() {
        let catalog = Catalog::demo();
        let records = filter(&catalog, "drift", &TagFilter::Tag("Simulation".to_owned()));
        assert_eq!(ids(&records), vec!["buri"]);

        let none = filter(&catalog, "attendance", &TagFilter::Tag("Python".to_owned()));
        assert!(none.is_empty());
    }

    #[test]
    fn filter_state_reports_activity() {
        let mut state = FilterState::default();
        assert!(!state.is_active());
        state.query = "   ".to_owned();
        assert!(!state.is_active());
        state.tag = TagFilter::Tag("React".to_owned());
        assert!(state.is_active());
        assert_eq!(ids(&state.apply(&Catalog::demo())), vec!["scroll"]);
    }
}
