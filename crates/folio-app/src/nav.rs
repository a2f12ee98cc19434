// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Active-panel state, the location fragment that mirrors it, and the tab
//! strip indicator geometry.
//!
//! The location fragment is written here and nowhere else. Activation
//! updates the active panel and the fragment in the same call, so no caller
//! can observe one without the other.

use crate::model::Panel;

const TAB_PADDING: u16 = 1;
const TAB_DIVIDER_WIDTH: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlUpdate {
    Replace,
    Suppress,
}

/// Prefix `#` onto user input that names a fragment without one.
pub fn normalize_fragment(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('#') {
        trimmed.to_owned()
    } else {
        format!("#{trimmed}")
    }
}

/// Shareable location fragment, e.g. `#projects`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    fragment: String,
}

impl Location {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    fn replace(&mut self, fragment: String) {
        self.fragment = fragment;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabBounds {
    pub panel: Panel,
    pub offset: u16,
    pub width: u16,
}

/// Horizontal placement of every tab inside the strip, relative to the
/// strip's left edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStripLayout {
    tabs: Vec<TabBounds>,
    compact: bool,
}

impl TabStripLayout {
    /// Full labels when they fit, single-letter labels when only those fit,
    /// and no strip at all below that.
    pub fn measure(available_width: u16) -> Option<Self> {
        [false, true].into_iter().find_map(|compact| {
            let layout = Self::with_labels(compact);
            (layout.total_width() <= available_width).then_some(layout)
        })
    }

    fn with_labels(compact: bool) -> Self {
        let mut offset = 0u16;
        let mut tabs = Vec::with_capacity(Panel::ALL.len());
        for (index, panel) in Panel::ALL.into_iter().enumerate() {
            if index > 0 {
                offset += TAB_DIVIDER_WIDTH;
            }
            let label = if compact {
                panel.short_label()
            } else {
                panel.label()
            };
            let width = label.chars().count() as u16 + TAB_PADDING * 2;
            tabs.push(TabBounds {
                panel,
                offset,
                width,
            });
            offset += width;
        }
        Self { tabs, compact }
    }

    pub fn total_width(&self) -> u16 {
        self.tabs
            .last()
            .map_or(0, |last| last.offset + last.width)
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn title(&self, panel: Panel) -> String {
        let label = if self.compact {
            panel.short_label()
        } else {
            panel.label()
        };
        format!("{:pad$}{label}{:pad$}", "", "", pad = TAB_PADDING as usize)
    }

    pub fn tabs(&self) -> &[TabBounds] {
        &self.tabs
    }

    pub fn bounds(&self, panel: Panel) -> Option<TabBounds> {
        self.tabs.iter().copied().find(|tab| tab.panel == panel)
    }

    /// Tab under strip-relative column `x`; dividers hit nothing.
    pub fn hit(&self, x: u16) -> Option<Panel> {
        self.tabs
            .iter()
            .find(|tab| x >= tab.offset && x < tab.offset + tab.width)
            .map(|tab| tab.panel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorGeometry {
    pub offset: u16,
    pub width: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub panel: Panel,
    pub fragment_written: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationController {
    active: Panel,
    location: Location,
    strip: Option<TabStripLayout>,
    indicator: Option<IndicatorGeometry>,
}

impl Default for NavigationController {
    fn default() -> Self {
        Self {
            active: Panel::DEFAULT,
            location: Location::default(),
            strip: None,
            indicator: None,
        }
    }
}

impl NavigationController {
    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn strip(&self) -> Option<&TabStripLayout> {
        self.strip.as_ref()
    }

    pub fn indicator(&self) -> Option<IndicatorGeometry> {
        self.indicator
    }

    /// Unknown names are ignored: no panel change and no location write.
    pub fn activate(&mut self, name: &str, update: UrlUpdate) -> Option<Activation> {
        let Some(panel) = Panel::parse(name) else {
            tracing::debug!(name, "ignoring activation of unknown panel");
            return None;
        };
        Some(self.activate_panel(panel, update))
    }

    pub fn activate_panel(&mut self, panel: Panel, update: UrlUpdate) -> Activation {
        self.active = panel;
        self.sync_indicator();
        let fragment_written = match update {
            UrlUpdate::Replace => {
                let fragment = panel.fragment();
                self.location.replace(fragment.clone());
                Some(fragment)
            }
            UrlUpdate::Suppress => None,
        };
        tracing::debug!(panel = panel.as_str(), ?fragment_written, "panel activated");
        Activation {
            panel,
            fragment_written,
        }
    }

    /// Startup path: a known fragment activates its panel and is stored in
    /// canonical `#panel` form without a location write. Anything else falls
    /// back to the default panel and the location is normalized to match it.
    pub fn init_from_location(&mut self, fragment: &str) -> Activation {
        self.location = Location::new(fragment);
        self.sync_to_location()
    }

    /// The location was changed from outside (prompt, jump link, restore).
    pub fn location_changed(&mut self, fragment: &str) -> Activation {
        self.init_from_location(fragment)
    }

    fn sync_to_location(&mut self) -> Activation {
        match Panel::from_fragment(self.location.fragment()) {
            Some(panel) => {
                self.location.replace(panel.fragment());
                self.activate_panel(panel, UrlUpdate::Suppress)
            }
            None => self.activate_panel(Panel::DEFAULT, UrlUpdate::Replace),
        }
    }

    /// Arrow-key navigation: move to the adjacent tab, wrapping at both ends,
    /// and activate it.
    pub fn step(&mut self, delta: isize) -> Activation {
        let len = Panel::ALL.len() as isize;
        let next = (self.active.index() as isize + delta).rem_euclid(len) as usize;
        self.activate_panel(Panel::ALL[next], UrlUpdate::Replace)
    }

    /// Re-measure the strip for a new viewport width and move the indicator.
    pub fn resize(&mut self, strip_width: u16) {
        self.strip = TabStripLayout::measure(strip_width);
        self.sync_indicator();
    }

    pub fn sync_indicator(&mut self) {
        self.indicator = self
            .strip
            .as_ref()
            .and_then(|strip| strip.bounds(self.active))
            .map(|bounds| IndicatorGeometry {
                offset: bounds.offset,
                width: bounds.width,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::{
        IndicatorGeometry, NavigationController, TabStripLayout, UrlUpdate, normalize_fragment,
    };
    use crate::model::Panel;

    #[test]
    fn unknown_panel_is_ignored() {
        let mut nav = NavigationController::default();
        nav.activate("resume", UrlUpdate::Replace);

        assert_eq!(nav.activate("bogus", UrlUpdate::Replace), None);
        assert_eq!(nav.active(), Panel::Resume);
        assert_eq!(nav.location().fragment(), "#resume");
    }

    #[test]
    fn activation_writes_fragment_unless_suppressed() {
        let mut nav = NavigationController::default();
        let activation = nav
            .activate("projects", UrlUpdate::Replace)
            .expect("known panel");
        assert_eq!(activation.fragment_written.as_deref(), Some("#projects"));
        assert_eq!(nav.location().fragment(), "#projects");

        let activation = nav
            .activate("contact", UrlUpdate::Suppress)
            .expect("known panel");
        assert_eq!(activation.fragment_written, None);
        assert_eq!(nav.active(), Panel::Contact);
        assert_eq!(nav.location().fragment(), "#projects");
    }

    #[test]
    fn init_from_known_fragment_does_not_rewrite_location() {
        let mut nav = NavigationController::default();
        let activation = nav.init_from_location("#projects");
        assert_eq!(activation.panel, Panel::Projects);
        assert_eq!(activation.fragment_written, None);
        assert_eq!(nav.location().fragment(), "#projects");
    }

    #[test]
    fn init_from_bare_panel_name_stores_the_canonical_fragment() {
        let mut nav = NavigationController::default();
        let activation = nav.init_from_location("projects");
        assert_eq!(activation.panel, Panel::Projects);
        assert_eq!(activation.fragment_written, None);
        assert_eq!(nav.location().fragment(), "#projects");

        nav.location_changed("resume");
        assert_eq!(nav.active(), Panel::Resume);
        assert_eq!(nav.location().fragment(), Panel::Resume.fragment());
    }

    #[test]
    fn normalize_fragment_prefixes_missing_hash() {
        assert_eq!(normalize_fragment(" resume "), "#resume");
        assert_eq!(normalize_fragment("#contact"), "#contact");
    }

    #[test]
    fn init_from_unknown_fragment_falls_back_to_home() {
        let mut nav = NavigationController::default();
        let activation = nav.init_from_location("#nowhere");
        assert_eq!(activation.panel, Panel::Home);
        assert_eq!(nav.location().fragment(), "#home");

        let activation = nav.location_changed("");
        assert_eq!(activation.panel, Panel::Home);
    }

    #[test]
    fn round_trip_through_location() {
        let mut nav = NavigationController::default();
        nav.activate("projects", UrlUpdate::Replace);
        let saved = nav.location().fragment().to_owned();

        let mut reloaded = NavigationController::default();
        reloaded.init_from_location(&saved);
        assert_eq!(reloaded.active(), Panel::Projects);
    }

    #[test]
    fn step_wraps_around_the_strip() {
        let mut nav = NavigationController::default();
        nav.activate_panel(Panel::Contact, UrlUpdate::Suppress);
        assert_eq!(nav.step(1).panel, Panel::Home);
        assert_eq!(nav.step(-1).panel, Panel::Contact);
        assert_eq!(nav.location().fragment(), "#contact");
    }

    #[test]
    fn strip_measure_switches_to_compact_then_disappears() {
        let full = TabStripLayout::measure(80).expect("wide strip");
        assert!(!full.is_compact());
        assert_eq!(full.title(Panel::Home), " Home ");
        assert_eq!(full.total_width(), 36);

        let compact = TabStripLayout::measure(20).expect("narrow strip");
        assert!(compact.is_compact());
        assert_eq!(compact.total_width(), 15);

        assert_eq!(TabStripLayout::measure(10), None);
    }

    #[test]
    fn strip_hit_testing_skips_dividers() {
        let strip = TabStripLayout::measure(80).expect("wide strip");
        assert_eq!(strip.hit(0), Some(Panel::Home));
        assert_eq!(strip.hit(5), Some(Panel::Home));
        assert_eq!(strip.hit(6), None);
        assert_eq!(strip.hit(7), Some(Panel::Projects));
        assert_eq!(strip.hit(200), None);
    }

    #[test]
    fn indicator_tracks_activation_and_resize() {
        let mut nav = NavigationController::default();
        assert_eq!(nav.indicator(), None);

        nav.resize(80);
        assert_eq!(
            nav.indicator(),
            Some(IndicatorGeometry {
                offset: 0,
                width: 6
            })
        );

        nav.activate_panel(Panel::Projects, UrlUpdate::Replace);
        assert_eq!(
            nav.indicator(),
            Some(IndicatorGeometry {
                offset: 7,
                width: 10
            })
        );

        nav.resize(20);
        assert_eq!(
            nav.indicator(),
            Some(IndicatorGeometry {
                offset: 4,
                width: 3
            })
        );
    }

    #[test]
    fn missing_strip_degrades_to_no_indicator() {
        let mut nav = NavigationController::default();
        nav.resize(4);
        let activation = nav.activate("resume", UrlUpdate::Replace);
        assert!(activation.is_some());
        assert_eq!(nav.active(), Panel::Resume);
        assert_eq!(nav.indicator(), None);
    }
}
