// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::time::Duration;

use folio_app::{
    AppState, CardDescriptor, ContactField, FocusTarget, ModalContent, ModalControl, Theme,
};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use time::OffsetDateTime;

use crate::ViewData;
use crate::layout::{
    SlotKind, body_layout, centered_rect, control_label, modal_layout, modal_control_label,
    screen_rects, wrap_text,
};

pub(crate) const COUNTER_DURATION: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy)]
struct Palette {
    accent: Color,
    text: Color,
    muted: Color,
    highlight: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Calm => Palette {
            accent: Color::Cyan,
            text: Color::White,
            muted: Color::DarkGray,
            highlight: Color::LightCyan,
        },
        Theme::Glow => Palette {
            accent: Color::Magenta,
            text: Color::White,
            muted: Color::Gray,
            highlight: Color::Yellow,
        },
    }
}

/// Ease-out count from zero to `target` over [`COUNTER_DURATION`].
pub(crate) fn counter_value(target: u32, elapsed: Duration) -> u32 {
    if elapsed >= COUNTER_DURATION {
        return target;
    }
    let progress = elapsed.as_secs_f64() / COUNTER_DURATION.as_secs_f64();
    let eased = 1.0 - (1.0 - progress).powi(3);
    ((f64::from(target) * eased).round() as u32).min(target)
}

pub(crate) fn footer_text(name: &str, year: i32) -> String {
    format!("© {year} {name} · press ? for keys")
}

pub(crate) fn help_overlay_text() -> &'static str {
    "global: ctrl+c/q quit | ? help | t theme | : go to location\n\
nav: tab/shift+tab focus | left/right tabs | 1-4 panels | / search projects\n\
nav: enter/space activate | up/down/j/k scroll | pgup/pgdn page | esc leave field\n\
projects: type to filter | enter on chip filters by tag | enter on card opens details\n\
details: tab/shift+tab cycle | enter activate | c copy id | esc or q close | click outside closes\n\
contact: type in fields | enter next field | send opens a mail draft\n\
prompt: type #home #projects #resume #contact | enter go | esc cancel"
}

pub(crate) fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(input) = &view_data.prompt {
        return format!("go to: {input}▏");
    }
    let hint = if state.modal().is_some() {
        "tab cycle | enter activate | esc close"
    } else if state.focus().is_some_and(FocusTarget::accepts_text) {
        "typing | tab next | esc done"
    } else {
        "tab focus | ←/→ tabs | enter open | t theme | : go | ? help | q quit"
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hint}"),
        None => hint.to_owned(),
    }
}

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let area = frame.area();
    let colors = palette(state.theme);
    let rects = screen_rects(area);

    render_header(frame, state, colors, rects.header, rects.strip, rects.indicator);
    render_body(frame, state, view_data, colors, rects.body);

    let year = OffsetDateTime::now_utc().year();
    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            status_text(state, view_data),
            Style::default().fg(colors.highlight),
        )),
        Line::from(Span::styled(
            footer_text(&state.profile().name, year),
            Style::default().fg(colors.muted),
        )),
    ]);
    frame.render_widget(footer, rects.footer);

    if let Some(content) = state.modal() {
        render_modal(frame, state, content, colors, area);
    }

    if view_data.help_visible {
        let help_area = centered_rect(80, 60, area);
        frame.render_widget(Clear, help_area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, help_area);
    }
}

fn render_header(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    colors: Palette,
    header: Rect,
    strip_area: Rect,
    indicator_area: Rect,
) {
    let block = Block::default()
        .title(format!(" folio · {} ", state.profile().name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.muted));
    frame.render_widget(block, header);

    let active = state.active_panel();
    let Some(strip) = state.nav().strip() else {
        if strip_area.height > 0 {
            let label = Paragraph::new(active.label()).style(
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::BOLD),
            );
            frame.render_widget(label, strip_area);
        }
        return;
    };
    if strip_area.height == 0 {
        return;
    }

    for (index, bounds) in strip.tabs().iter().enumerate() {
        if index > 0 && bounds.offset > 0 {
            let divider = Rect::new(strip_area.x + bounds.offset - 1, strip_area.y, 1, 1);
            frame.render_widget(
                Paragraph::new("│").style(Style::default().fg(colors.muted)),
                divider,
            );
        }
        let mut style = if bounds.panel == active {
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text)
        };
        if state.focus() == Some(&FocusTarget::Tab(bounds.panel)) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let tab_area = Rect::new(strip_area.x + bounds.offset, strip_area.y, bounds.width, 1);
        frame.render_widget(
            Paragraph::new(strip.title(bounds.panel)).style(style),
            tab_area,
        );
    }

    if let Some(indicator) = state.nav().indicator()
        && indicator_area.height > 0
    {
        let underline = Rect::new(
            indicator_area.x + indicator.offset,
            indicator_area.y,
            indicator.width,
            1,
        );
        frame.render_widget(
            Paragraph::new("▔".repeat(usize::from(indicator.width)))
                .style(Style::default().fg(colors.accent)),
            underline,
        );
    }
}

fn render_body(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    colors: Palette,
    body: Rect,
) {
    let layout = body_layout(state, body);
    let panel_focused = state.focus() == Some(&FocusTarget::Panel(state.active_panel()));
    if panel_focused && body.height > 0 {
        let marker = Rect::new(body.x, body.y, 1, body.height);
        frame.render_widget(
            Paragraph::new("▌\n".repeat(usize::from(body.height)))
                .style(Style::default().fg(colors.muted)),
            marker,
        );
    }

    let elapsed = view_data
        .counters_started
        .map(|started| started.elapsed())
        .unwrap_or_default();

    for slot in &layout.slots {
        match &slot.kind {
            SlotKind::Heading(text) => frame.render_widget(
                Paragraph::new(text.as_str()).style(
                    Style::default()
                        .fg(colors.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                slot.area,
            ),
            SlotKind::Text(lines) => frame.render_widget(
                Paragraph::new(lines.join("\n")).style(Style::default().fg(colors.text)),
                slot.area,
            ),
            SlotKind::Stat(index) => {
                if let Some(stat) = state.profile().stats.get(*index) {
                    let value = counter_value(stat.value, elapsed);
                    let widget = Paragraph::new(format!("{value}{}", stat.suffix))
                        .style(
                            Style::default()
                                .fg(colors.highlight)
                                .add_modifier(Modifier::BOLD),
                        )
                        .block(
                            Block::default()
                                .title(stat.label.as_str())
                                .borders(Borders::ALL)
                                .border_style(Style::default().fg(colors.muted)),
                        );
                    frame.render_widget(widget, slot.area);
                }
            }
            SlotKind::Control(target) => {
                render_control(frame, state, colors, target, slot.area);
            }
        }
    }
}

fn render_control(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    colors: Palette,
    target: &FocusTarget,
    area: Rect,
) {
    let focused = state.focus() == Some(target);
    let border = if focused {
        Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors.muted)
    };

    match target {
        FocusTarget::Search => {
            let visible = state.grid().cards().len();
            let query = &state.filter().query;
            let (text, style) = if query.is_empty() && !focused {
                (
                    "type to filter by title, tag or year".to_owned(),
                    Style::default().fg(colors.muted),
                )
            } else {
                (with_cursor(query, focused), Style::default().fg(colors.text))
            };
            let widget = Paragraph::new(text).style(style).block(
                Block::default()
                    .title(format!(" search · {visible} shown "))
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(widget, area);
        }
        FocusTarget::Card(id) => {
            if let Some(card) = state.grid().cards().iter().find(|card| &card.id == id) {
                render_card(frame, card, colors, border, area);
            }
        }
        FocusTarget::ContactField(field) => {
            let value = state.contact.field(*field);
            let text = match field {
                ContactField::Message => {
                    wrap_text(&with_cursor(value, focused), area.width.saturating_sub(2)).join("\n")
                }
                ContactField::Name | ContactField::Email => with_cursor(value, focused),
            };
            let widget = Paragraph::new(text)
                .style(Style::default().fg(colors.text))
                .block(
                    Block::default()
                        .title(field.label())
                        .borders(Borders::ALL)
                        .border_style(border),
                );
            frame.render_widget(widget, area);
        }
        FocusTarget::TagChip(index) => {
            let mut style = if state.selected_chip() == *index {
                Style::default().fg(Color::Black).bg(colors.accent)
            } else {
                Style::default().fg(colors.text)
            };
            if focused {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
            }
            frame.render_widget(
                Paragraph::new(control_label(state, target)).style(style),
                area,
            );
        }
        _ => {
            let style = if focused {
                Style::default()
                    .fg(colors.accent)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default().fg(colors.accent)
            };
            frame.render_widget(
                Paragraph::new(control_label(state, target)).style(style),
                area,
            );
        }
    }
}

fn with_cursor(value: &str, focused: bool) -> String {
    if focused {
        format!("{value}▏")
    } else {
        value.to_owned()
    }
}

/// Tag line for a card: capped tags plus a `+N` overflow marker.
pub(crate) fn card_tag_line(card: &CardDescriptor) -> String {
    let mut parts: Vec<String> = card.tags.iter().map(|tag| format!("#{tag}")).collect();
    if card.hidden_tags > 0 {
        parts.push(format!("+{}", card.hidden_tags));
    }
    parts.join(" ")
}

fn render_card(
    frame: &mut ratatui::Frame<'_>,
    card: &CardDescriptor,
    colors: Palette,
    border: Style,
    area: Rect,
) {
    let inner_width = area.width.saturating_sub(2);
    let summary_rows = usize::from(area.height.saturating_sub(4));
    let mut lines = vec![Line::from(Span::styled(
        card.year.clone(),
        Style::default().fg(colors.muted),
    ))];
    lines.extend(
        wrap_text(&card.summary, inner_width)
            .into_iter()
            .take(summary_rows)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text)))),
    );
    while lines.len() < summary_rows + 1 {
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        card_tag_line(card),
        Style::default().fg(colors.accent),
    )));

    let title = if card.icon.is_empty() {
        format!(" {} ", card.title)
    } else {
        format!(" {} {} ", card.icon, card.title)
    };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(widget, area);
}

pub(crate) fn modal_body_lines(content: &ModalContent, width: u16) -> Vec<String> {
    let mut lines = vec![content.meta.clone(), String::new()];
    lines.extend(wrap_text(&content.summary, width));
    if !content.tags.is_empty() {
        lines.push(String::new());
        lines.push(
            content
                .tags
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    if !content.details.is_empty() {
        lines.push(String::new());
        for detail in &content.details {
            lines.extend(wrap_text(&format!("• {detail}"), width));
        }
    }
    lines
}

fn render_modal(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    content: &ModalContent,
    colors: Palette,
    area: Rect,
) {
    let layout = modal_layout(area, content);
    frame.render_widget(Clear, layout.overlay);

    let title = if content.icon.is_empty() {
        format!(" {} ", content.title)
    } else {
        format!(" {} {} ", content.icon, content.title)
    };
    frame.render_widget(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent)),
        layout.overlay,
    );
    frame.render_widget(
        Paragraph::new(modal_body_lines(content, layout.text.width).join("\n"))
            .style(Style::default().fg(colors.text)),
        layout.text,
    );

    for (control_area, control) in &layout.controls {
        let focused = state.focus() == Some(&FocusTarget::Modal(*control));
        let mut style = match control {
            ModalControl::Close => Style::default().fg(colors.muted),
            ModalControl::CopyId | ModalControl::Link(_) => Style::default().fg(colors.accent),
        };
        if focused {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }
        frame.render_widget(
            Paragraph::new(modal_control_label(content, *control)).style(style),
            *control_area,
        );
    }
}
