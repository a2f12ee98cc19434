// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Screen geometry shared by drawing and mouse hit-testing. Everything here
//! is a pure function of the terminal area and the app state, so a click
//! always resolves against exactly what was drawn.

use folio_app::{AppState, ContactField, FocusTarget, GridContents, ModalContent, ModalControl, Panel};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub(crate) const HEADER_HEIGHT: u16 = 4;
pub(crate) const FOOTER_HEIGHT: u16 = 2;
pub(crate) const CARD_WIDTH: u16 = 34;
pub(crate) const CARD_HEIGHT: u16 = 7;
pub(crate) const STAT_WIDTH: u16 = 24;
const BODY_PADDING: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenRects {
    pub header: Rect,
    pub strip: Rect,
    pub indicator: Rect,
    pub body: Rect,
    pub footer: Rect,
}

pub(crate) fn screen_rects(area: Rect) -> ScreenRects {
    let header_height = HEADER_HEIGHT.min(area.height);
    let footer_height = FOOTER_HEIGHT.min(area.height - header_height);
    let body_height = area.height - header_height - footer_height;

    let header = Rect::new(area.x, area.y, area.width, header_height);
    let body = Rect::new(area.x, area.y + header_height, area.width, body_height);
    let footer = Rect::new(area.x, body.y + body_height, area.width, footer_height);

    let inner_width = strip_width(area);
    let strip = Rect::new(
        area.x + 1,
        area.y + 1,
        inner_width,
        u16::from(header_height >= 3),
    );
    let indicator = Rect::new(
        area.x + 1,
        area.y + 2,
        inner_width,
        u16::from(header_height >= HEADER_HEIGHT),
    );
    ScreenRects {
        header,
        strip,
        indicator,
        body,
        footer,
    }
}

/// Columns available to the tab strip inside the header border.
pub fn strip_width(area: Rect) -> u16 {
    area.width.saturating_sub(2)
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Greedy word wrap. Words longer than `width` overflow and get clipped
/// when drawn.
pub(crate) fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            let line_len = line.chars().count();
            if !line.is_empty() && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotKind {
    Heading(String),
    Text(Vec<String>),
    Stat(usize),
    Control(FocusTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot {
    pub area: Rect,
    pub kind: SlotKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BodyLayout {
    pub slots: Vec<Slot>,
    pub content_height: u16,
}

impl BodyLayout {
    pub fn control_at(&self, x: u16, y: u16) -> Option<&FocusTarget> {
        self.slots.iter().find_map(|slot| match &slot.kind {
            SlotKind::Control(target) if contains(slot.area, x, y) => Some(target),
            _ => None,
        })
    }

    pub fn area_of(&self, target: &FocusTarget) -> Option<Rect> {
        self.slots.iter().find_map(|slot| match &slot.kind {
            SlotKind::Control(candidate) if candidate == target => Some(slot.area),
            _ => None,
        })
    }
}

/// Vertical flow of blocks in virtual rows; only blocks that fit entirely
/// inside the scrolled viewport become slots.
struct Flow {
    body: Rect,
    left: u16,
    width: u16,
    scroll: u16,
    clip: bool,
    cursor: u16,
    slots: Vec<Slot>,
}

impl Flow {
    fn new(body: Rect, scroll: u16) -> Self {
        let left = BODY_PADDING.min(body.width / 2);
        Self {
            body,
            left,
            width: body.width.saturating_sub(left * 2),
            scroll,
            clip: true,
            cursor: 1,
            slots: Vec::new(),
        }
    }

    fn place(&mut self, x_offset: u16, width: u16, height: u16, kind: SlotKind) {
        let top = self.cursor;
        let visible = !self.clip
            || (top >= self.scroll && top + height <= self.scroll + self.body.height);
        if !visible || x_offset >= self.width {
            return;
        }
        let width = width.min(self.width - x_offset);
        self.slots.push(Slot {
            area: Rect::new(
                self.body.x + self.left + x_offset,
                self.body.y + top - self.scroll,
                width,
                height,
            ),
            kind,
        });
    }

    fn advance(&mut self, rows: u16) {
        self.cursor = self.cursor.saturating_add(rows);
    }

    fn block(&mut self, height: u16, kind: SlotKind) {
        self.place(0, self.width, height, kind);
        self.advance(height);
    }

    fn text(&mut self, text: &str) {
        let lines = wrap_text(text, self.width);
        let height = lines.len() as u16;
        self.block(height, SlotKind::Text(lines));
    }

    /// Left-to-right run of fixed-size items, wrapping onto new rows.
    fn inline(&mut self, items: Vec<(u16, SlotKind)>, height: u16, gap: u16) {
        let mut x = 0u16;
        for (width, kind) in items {
            if x > 0 && x + width > self.width {
                self.advance(height + u16::from(height > 1));
                x = 0;
            }
            self.place(x, width, height, kind);
            x += width + gap;
        }
        self.advance(height);
    }

    fn finish(self) -> BodyLayout {
        BodyLayout {
            slots: self.slots,
            content_height: self.cursor + 1,
        }
    }
}

pub(crate) fn label_width(label: &str) -> u16 {
    label.chars().count() as u16
}

/// Text of every single-line control, shared by layout and drawing.
pub(crate) fn control_label(state: &AppState, target: &FocusTarget) -> String {
    match target {
        FocusTarget::Jump(Panel::Projects) => "[ View projects ]".to_owned(),
        FocusTarget::Jump(Panel::Contact) => "[ Contact me ]".to_owned(),
        FocusTarget::Jump(panel) => format!("[ {} ]", panel.label()),
        FocusTarget::CopyEmail => "[ Copy email ]".to_owned(),
        FocusTarget::CopyLinks => "[ Copy links ]".to_owned(),
        FocusTarget::ContactSubmit => "[ Send message ]".to_owned(),
        FocusTarget::TagChip(index) => {
            let labels = state.chip_labels();
            format!(" {} ", labels.get(*index).copied().unwrap_or("?"))
        }
        FocusTarget::Tab(panel) | FocusTarget::Panel(panel) => panel.label().to_owned(),
        FocusTarget::Search => "search".to_owned(),
        FocusTarget::Card(id) => id.to_string(),
        FocusTarget::ContactField(field) => field.label().to_owned(),
        FocusTarget::Modal(control) => match state.modal() {
            Some(content) => modal_control_label(content, *control),
            None => String::new(),
        },
    }
}

pub(crate) fn body_layout(state: &AppState, body: Rect) -> BodyLayout {
    body_layout_at(state, body, state.scroll_offset())
}

fn body_layout_at(state: &AppState, body: Rect, scroll: u16) -> BodyLayout {
    flow_panel(state, Flow::new(body, scroll))
}

/// Every block at its unscrolled position, on screen or not.
fn body_layout_unclipped(state: &AppState, body: Rect) -> BodyLayout {
    let mut flow = Flow::new(body, 0);
    flow.clip = false;
    flow_panel(state, flow)
}

fn flow_panel(state: &AppState, mut flow: Flow) -> BodyLayout {
    match state.active_panel() {
        Panel::Home => home(&mut flow, state),
        Panel::Projects => projects(&mut flow, state),
        Panel::Resume => resume(&mut flow, state),
        Panel::Contact => contact(&mut flow, state),
    }
    flow.finish()
}

fn home(flow: &mut Flow, state: &AppState) {
    let profile = state.profile();
    flow.block(1, SlotKind::Heading(profile.name.clone()));
    if !profile.headline.is_empty() {
        flow.text(&profile.headline);
    }
    flow.advance(1);
    if !profile.intro.is_empty() {
        flow.text(&profile.intro);
        flow.advance(1);
    }
    if !profile.stats.is_empty() {
        let stats = (0..profile.stats.len())
            .map(|index| (STAT_WIDTH, SlotKind::Stat(index)))
            .collect();
        flow.inline(stats, 3, 1);
        flow.advance(1);
    }
    let buttons = [
        FocusTarget::Jump(Panel::Projects),
        FocusTarget::Jump(Panel::Contact),
        FocusTarget::CopyEmail,
        FocusTarget::CopyLinks,
    ]
    .into_iter()
    .map(|target| {
        let width = label_width(&control_label(state, &target));
        (width, SlotKind::Control(target))
    })
    .collect();
    flow.inline(buttons, 1, 2);
}

fn projects(flow: &mut Flow, state: &AppState) {
    flow.block(3, SlotKind::Control(FocusTarget::Search));
    flow.advance(1);

    let chips = (0..state.chip_labels().len())
        .map(|index| {
            let target = FocusTarget::TagChip(index);
            let width = label_width(&control_label(state, &target));
            (width, SlotKind::Control(target))
        })
        .collect();
    flow.inline(chips, 1, 1);
    flow.advance(1);

    match state.grid() {
        GridContents::Pending => flow.text("Loading projects…"),
        GridContents::Empty { message } => flow.text(message),
        GridContents::Cards(cards) => {
            let columns = ((flow.width + 1) / (CARD_WIDTH + 1)).max(1);
            let card_width = (flow.width.saturating_sub(columns - 1)) / columns;
            for row in cards.chunks(usize::from(columns)) {
                for (column, card) in row.iter().enumerate() {
                    flow.place(
                        column as u16 * (card_width + 1),
                        card_width,
                        CARD_HEIGHT,
                        SlotKind::Control(FocusTarget::Card(card.id.clone())),
                    );
                }
                flow.advance(CARD_HEIGHT + 1);
            }
        }
    }
}

fn resume(flow: &mut Flow, state: &AppState) {
    for section in &state.profile().resume {
        flow.block(1, SlotKind::Heading(section.heading.clone()));
        for item in &section.items {
            flow.text(&format!("• {item}"));
        }
        flow.advance(1);
    }
}

fn contact(flow: &mut Flow, state: &AppState) {
    flow.block(1, SlotKind::Heading("Get in touch".to_owned()));
    flow.text("Have a question or want to work together? Fill in the form and your mail client opens with a ready draft.");
    flow.advance(1);
    for field in ContactField::ALL {
        let height = match field {
            ContactField::Message => 6,
            ContactField::Name | ContactField::Email => 3,
        };
        flow.block(height, SlotKind::Control(FocusTarget::ContactField(field)));
    }
    flow.advance(1);
    let submit = FocusTarget::ContactSubmit;
    let width = label_width(&control_label(state, &submit));
    flow.inline(vec![(width, SlotKind::Control(submit))], 1, 0);
    flow.advance(1);
    flow.text(&format!("Or write directly to {}", state.profile().email));
}

pub(crate) fn modal_control_label(content: &ModalContent, control: ModalControl) -> String {
    match control {
        ModalControl::Close => "[ × close ]".to_owned(),
        ModalControl::CopyId => "[ copy id ]".to_owned(),
        ModalControl::Link(index) => match content.links.get(index) {
            Some(link) => format!("[ {} ↗ ]", link.label),
            None => String::new(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModalLayout {
    pub overlay: Rect,
    pub text: Rect,
    pub controls: Vec<(Rect, ModalControl)>,
}

impl ModalLayout {
    pub fn control_at(&self, x: u16, y: u16) -> Option<ModalControl> {
        self.controls
            .iter()
            .find(|(area, _)| contains(*area, x, y))
            .map(|(_, control)| *control)
    }
}

pub(crate) fn modal_layout(area: Rect, content: &ModalContent) -> ModalLayout {
    let overlay = centered_rect(72, 72, area);
    let inner = Rect::new(
        overlay.x + 2,
        overlay.y + 1,
        overlay.width.saturating_sub(4),
        overlay.height.saturating_sub(2),
    );

    let close_label = modal_control_label(content, ModalControl::Close);
    let close_width = label_width(&close_label).min(overlay.width.saturating_sub(2));
    let close = Rect::new(
        (overlay.x + overlay.width).saturating_sub(close_width + 2),
        overlay.y,
        close_width,
        1,
    );
    let mut controls = vec![(close, ModalControl::Close)];

    let mut rows: Vec<Vec<(u16, ModalControl)>> = vec![Vec::new()];
    let mut x = 0u16;
    for control in content.focusables().into_iter().skip(1) {
        let width = label_width(&modal_control_label(content, control)).min(inner.width);
        if x > 0 && x + width > inner.width {
            rows.push(Vec::new());
            x = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push((x, control));
        }
        x += width + 2;
    }

    let row_count = rows.len() as u16;
    let first_row = (inner.y + inner.height).saturating_sub(row_count);
    for (row_index, row) in rows.into_iter().enumerate() {
        for (offset, control) in row {
            let width = label_width(&modal_control_label(content, control)).min(inner.width);
            controls.push((
                Rect::new(inner.x + offset, first_row + row_index as u16, width, 1),
                control,
            ));
        }
    }

    let text = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(row_count + 1),
    );
    ModalLayout {
        overlay,
        text,
        controls,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Hit {
    Target(FocusTarget),
    Backdrop,
}

/// Resolve a click to the innermost control under it.
pub(crate) fn hit_test(area: Rect, state: &AppState, x: u16, y: u16) -> Option<Hit> {
    if let Some(content) = state.modal() {
        let modal = modal_layout(area, content);
        if let Some(control) = modal.control_at(x, y) {
            return Some(Hit::Target(FocusTarget::Modal(control)));
        }
        if contains(modal.overlay, x, y) {
            return None;
        }
        return Some(Hit::Backdrop);
    }

    let rects = screen_rects(area);
    if contains(rects.strip, x, y) {
        return state
            .nav()
            .strip()
            .and_then(|strip| strip.hit(x - rects.strip.x))
            .map(|panel| Hit::Target(FocusTarget::Tab(panel)));
    }
    if contains(rects.body, x, y) {
        return body_layout(state, rects.body)
            .control_at(x, y)
            .cloned()
            .map(Hit::Target);
    }
    None
}

/// Scroll offset that brings `target` fully into the body, or `None` when it
/// is already visible or is not a body control.
pub(crate) fn scroll_to_reveal(state: &AppState, area: Rect, target: &FocusTarget) -> Option<u16> {
    if target.is_modal() {
        return None;
    }
    let body = screen_rects(area).body;
    let rect = body_layout_unclipped(state, body).area_of(target)?;
    let top = rect.y - body.y;
    let bottom = top + rect.height;
    let current = state.scroll_offset();
    if top < current {
        Some(top)
    } else if bottom > current + body.height {
        Some(bottom.saturating_sub(body.height).min(top))
    } else {
        None
    }
}

/// Largest scroll offset that still shows the end of the panel.
pub(crate) fn max_scroll(state: &AppState, area: Rect) -> u16 {
    let body = screen_rects(area).body;
    body_layout_at(state, body, 0)
        .content_height
        .saturating_sub(body.height)
}

#[cfg(test)]
mod tests {
    use super::{Hit, body_layout, hit_test, modal_layout, screen_rects, wrap_text};
    use folio_app::{AppCommand, AppState, FocusTarget, ModalControl, Panel, Portfolio, ProjectKey, Theme};
    use ratatui::layout::Rect;

    fn state_at(fragment: &str, area: Rect) -> AppState {
        let mut state = AppState::new(Portfolio::demo(), Theme::Calm);
        state.initialize(fragment);
        state.dispatch(AppCommand::Resize {
            strip_width: super::strip_width(area),
        });
        state
    }

    #[test]
    fn wrap_text_breaks_on_words_and_keeps_blank_lines() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
        assert_eq!(wrap_text("unbreakableword", 4), vec!["unbreakableword"]);
    }

    #[test]
    fn screen_rects_stack_header_body_footer() {
        let rects = screen_rects(Rect::new(0, 0, 100, 40));
        assert_eq!(rects.header.height, 4);
        assert_eq!(rects.body.y, 4);
        assert_eq!(rects.body.height, 34);
        assert_eq!(rects.footer.y, 38);
        assert_eq!(rects.strip, Rect::new(1, 1, 98, 1));
    }

    #[test]
    fn every_demo_card_is_laid_out_on_a_tall_screen() {
        let area = Rect::new(0, 0, 120, 80);
        let state = state_at("#projects", area);
        let layout = body_layout(&state, screen_rects(area).body);
        for card in state.grid().cards() {
            assert!(
                layout.area_of(&FocusTarget::Card(card.id.clone())).is_some(),
                "{}",
                card.id
            );
        }
    }

    #[test]
    fn click_inside_card_hits_that_card() {
        let area = Rect::new(0, 0, 120, 80);
        let state = state_at("#projects", area);
        let target = FocusTarget::Card(ProjectKey::parse("wf").expect("key"));
        let card = body_layout(&state, screen_rects(area).body)
            .area_of(&target)
            .expect("card visible");

        let corner = hit_test(area, &state, card.x + card.width - 1, card.y + card.height - 1);
        assert_eq!(corner, Some(Hit::Target(target)));
    }

    #[test]
    fn tab_strip_clicks_resolve_to_tabs() {
        let area = Rect::new(0, 0, 100, 40);
        let state = state_at("#home", area);
        assert_eq!(
            hit_test(area, &state, 1 + 8, 1),
            Some(Hit::Target(FocusTarget::Tab(Panel::Projects)))
        );
        assert_eq!(hit_test(area, &state, 1 + 6, 1), None);
    }

    #[test]
    fn modal_clicks_split_into_controls_inside_and_backdrop_outside() {
        let area = Rect::new(0, 0, 100, 40);
        let mut state = state_at("#projects", area);
        state.dispatch(AppCommand::OpenProject(ProjectKey::parse("qtl").expect("key")));
        let content = state.modal().expect("open").clone();
        let modal = modal_layout(area, &content);

        let (close, _) = modal.controls[0];
        assert_eq!(
            hit_test(area, &state, close.x, close.y),
            Some(Hit::Target(FocusTarget::Modal(ModalControl::Close)))
        );
        assert_eq!(hit_test(area, &state, modal.text.x, modal.text.y), None);
        assert_eq!(hit_test(area, &state, 0, 0), Some(Hit::Backdrop));
        assert_eq!(modal.controls.len(), content.focusables().len());
    }

    #[test]
    fn scrolled_blocks_that_do_not_fit_are_dropped() {
        let area = Rect::new(0, 0, 60, 16);
        let mut state = state_at("#resume", area);
        let body = screen_rects(area).body;
        let full = body_layout(&state, body);
        assert!(full.content_height > body.height);

        state.dispatch(AppCommand::ScrollBy(3));
        let scrolled = body_layout(&state, body);
        for slot in &scrolled.slots {
            assert!(slot.area.y >= body.y);
            assert!(slot.area.y + slot.area.height <= body.y + body.height);
        }
        assert!(super::max_scroll(&state, area) > 0);
    }
}
