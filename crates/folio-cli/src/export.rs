// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use folio_app::{
    FilterState, GridContents, HtmlRenderer, ModalContent, Portfolio, ProjectRecord,
    render_static_page,
};
use std::fs;
use std::path::Path;

/// Static page with every project card and its detail section.
pub fn static_page(portfolio: &Portfolio) -> String {
    let filter = FilterState::default();
    let records = filter.apply(&portfolio.catalog);
    let grid = GridContents::from_filtered(&records, &filter);
    let modals: Vec<ModalContent> = records
        .iter()
        .map(|record| ModalContent::from_record(record))
        .collect();
    render_static_page(&HtmlRenderer, &portfolio.profile, &grid, &modals)
}

pub fn write_static_page(portfolio: &Portfolio, path: &Path) -> Result<()> {
    let page = static_page(portfolio);
    fs::write(path, page).with_context(|| format!("write HTML export {}", path.display()))?;
    tracing::info!(path = %path.display(), projects = portfolio.catalog.len(), "exported static page");
    Ok(())
}

/// Projects matching `query`, as pretty JSON.
pub fn listing_json(portfolio: &Portfolio, query: &str) -> Result<String> {
    let filter = FilterState {
        query: query.to_owned(),
        ..FilterState::default()
    };
    let records: Vec<&ProjectRecord> = filter.apply(&portfolio.catalog);
    serde_json::to_string_pretty(&records).context("encode project listing")
}

#[cfg(test)]
mod tests {
    use super::{listing_json, static_page, write_static_page};
    use anyhow::Result;
    use folio_app::Portfolio;

    #[test]
    fn listing_filters_by_query_and_keeps_order() -> Result<()> {
        let json = listing_json(&Portfolio::demo(), "simulation")?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        let ids: Vec<&str> = value
            .as_array()
            .map(|items| items.iter().filter_map(|item| item["id"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["buri", "wf"]);
        Ok(())
    }

    #[test]
    fn empty_query_lists_everything() -> Result<()> {
        let json = listing_json(&Portfolio::demo(), "")?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert_eq!(value.as_array().map(Vec::len), Some(6));
        Ok(())
    }

    #[test]
    fn static_page_escapes_loaded_content() -> Result<()> {
        let portfolio = Portfolio::from_toml_str(
            "[profile]\nname = \"Sam <Dev>\"\nemail = \"sam@example.com\"\n\n[[projects]]\nid = \"x\"\ntitle = \"<script>alert(1)</script>\"\nsummary = \"Tom & Jerry\"\n",
        )?;
        let page = static_page(&portfolio);
        assert!(page.starts_with("<!doctype html>"));
        assert!(page.contains("Sam &lt;Dev&gt;"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("Tom &amp; Jerry"));
        assert!(!page.contains("<script>"));
        Ok(())
    }

    #[test]
    fn write_static_page_creates_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("index.html");
        write_static_page(&Portfolio::demo(), &path)?;
        let page = std::fs::read_to_string(&path)?;
        assert!(page.contains("QTL Analysis Toolkit"));
        assert!(page.contains("Alex Morgan"));
        Ok(())
    }
}
