// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::borrow::Cow;

use crate::filter::{FilterState, TagFilter};
use crate::ids::ProjectKey;
use crate::modal::ModalContent;
use crate::model::{ProjectRecord, Profile};

/// Cards show at most this many tags; the modal shows all of them.
pub const CARD_TAG_LIMIT: usize = 3;

/// Escape the five reserved markup characters.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDescriptor {
    pub id: ProjectKey,
    pub icon: String,
    pub title: String,
    pub year: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub hidden_tags: usize,
}

impl CardDescriptor {
    pub fn from_record(record: &ProjectRecord) -> Self {
        Self {
            id: record.id.clone(),
            icon: record.icon.clone(),
            title: record.title.clone(),
            year: record.year.clone(),
            summary: record.summary.clone(),
            tags: record.tags.iter().take(CARD_TAG_LIMIT).cloned().collect(),
            hidden_tags: record.tags.len().saturating_sub(CARD_TAG_LIMIT),
        }
    }
}

/// What the project grid currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GridContents {
    #[default]
    Pending,
    Empty {
        message: String,
    },
    Cards(Vec<CardDescriptor>),
}

impl GridContents {
    pub fn from_filtered(records: &[&ProjectRecord], filter: &FilterState) -> Self {
        if records.is_empty() {
            return Self::Empty {
                message: empty_message(filter),
            };
        }
        Self::Cards(
            records
                .iter()
                .map(|record| CardDescriptor::from_record(record))
                .collect(),
        )
    }

    pub fn cards(&self) -> &[CardDescriptor] {
        match self {
            Self::Cards(cards) => cards,
            Self::Pending | Self::Empty { .. } => &[],
        }
    }
}

fn empty_message(filter: &FilterState) -> String {
    let query = filter.query.trim();
    match (query.is_empty(), &filter.tag) {
        (true, TagFilter::Any) => "No projects yet.".to_owned(),
        (false, TagFilter::Any) => format!("No projects match \"{query}\"."),
        (true, TagFilter::Tag(tag)) => format!("No projects tagged {tag}."),
        (false, TagFilter::Tag(tag)) => {
            format!("No projects tagged {tag} match \"{query}\".")
        }
    }
}

/// Turns view descriptors into markup. Every implementation must escape
/// text it inserts.
pub trait MarkupRenderer {
    fn card(&self, card: &CardDescriptor) -> String;
    fn grid(&self, contents: &GridContents) -> String;
    fn modal(&self, content: &ModalContent) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkupRenderer for HtmlRenderer {
    fn card(&self, card: &CardDescriptor) -> String {
        let tags: String = card
            .tags
            .iter()
            .map(|tag| format!("<span class=\"chip\">{}</span>", escape_html(tag)))
            .collect();
        let more = if card.hidden_tags > 0 {
            format!("<span class=\"chip chip-more\">+{}</span>", card.hidden_tags)
        } else {
            String::new()
        };
        format!(
            "<article class=\"card\" tabindex=\"0\" role=\"button\" data-project=\"{id}\">\
<div class=\"card__icon\">{icon}</div>\
<h3 class=\"card__title\">{title}</h3>\
<p class=\"card__meta\">{year}</p>\
<p class=\"card__summary\">{summary}</p>\
<div class=\"card__tags\">{tags}{more}</div>\
</article>",
            id = escape_html(card.id.as_str()),
            icon = escape_html(&card.icon),
            title = escape_html(&card.title),
            year = escape_html(&card.year),
            summary = escape_html(&card.summary),
        )
    }

    fn grid(&self, contents: &GridContents) -> String {
        match contents {
            GridContents::Pending => "<div class=\"grid\" aria-busy=\"true\"></div>".to_owned(),
            GridContents::Empty { message } => format!(
                "<div class=\"grid\"><p class=\"empty\">{}</p></div>",
                escape_html(message)
            ),
            GridContents::Cards(cards) => {
                let body: String = cards.iter().map(|card| self.card(card)).collect();
                format!("<div class=\"grid\">{body}</div>")
            }
        }
    }

    fn modal(&self, content: &ModalContent) -> String {
        let tags: String = content
            .tags
            .iter()
            .map(|tag| format!("<span class=\"chip\">{}</span>", escape_html(tag)))
            .collect();
        let details: String = content
            .details
            .iter()
            .map(|detail| format!("<li>{}</li>", escape_html(detail)))
            .collect();
        let links: String = content
            .links
            .iter()
            .map(|link| {
                format!(
                    "<a class=\"btn\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{} ↗</a>",
                    escape_html(&link.href),
                    escape_html(&link.label)
                )
            })
            .collect();
        format!(
            "<section class=\"modal\" id=\"project-{id}\" role=\"dialog\" aria-modal=\"true\">\
<button class=\"modal__close\" data-close=\"true\">×</button>\
<div class=\"modal__icon\">{icon}</div>\
<h2>{title}</h2>\
<p class=\"modal__meta\">{meta}</p>\
<p class=\"modal__summary\">{summary}</p>\
<div class=\"modal__tags\">{tags}</div>\
<ul class=\"modal__details\">{details}</ul>\
<div class=\"modal__links\">{links}</div>\
<button class=\"modal__copy\" data-copy=\"{id}\">copy id</button>\
</section>",
            id = escape_html(content.id.as_str()),
            icon = escape_html(&content.icon),
            title = escape_html(&content.title),
            meta = escape_html(&content.meta),
            summary = escape_html(&content.summary),
        )
    }
}

/// Static page with the full grid and one modal section per project.
pub fn render_static_page<R: MarkupRenderer>(
    renderer: &R,
    profile: &Profile,
    grid: &GridContents,
    modals: &[ModalContent],
) -> String {
    let modal_markup: String = modals.iter().map(|modal| renderer.modal(modal)).collect();
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{name}</title>\n</head>\n<body>\n<header><h1>{name}</h1><p>{headline}</p></header>\n<main id=\"projects\">{grid}</main>\n<aside>{modal_markup}</aside>\n</body>\n</html>\n",
        name = escape_html(&profile.name),
        headline = escape_html(&profile.headline),
        grid = renderer.grid(grid),
    )
}
