//! Controller construction options.
//!
//! [`Options`] is the typed, fully resolved record a controller is built
//! with. [`OptionsOverrides`] is its partial counterpart: every field is
//! optional and [`Options::with_overrides`] merges it shallowly over the
//! defaults (a present field replaces the default wholesale).

use crate::model::NodeId;
use crate::surface::{Selector, SelectorError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HEADER_CLASS: &str = "handorgel__header";
pub const DEFAULT_CONTENT_CLASS: &str = "handorgel__content";
pub const DEFAULT_INITIAL_OPEN_ATTRIBUTE: &str = "data-open";
pub const DEFAULT_INITIAL_OPEN_TRANSITION_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(200);

/// Where a controller finds its header or content surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSource {
    /// Resolved against the container on every `update()`.
    Selector(Selector),
    /// Pre-resolved surfaces, index = fold order.
    Nodes(Vec<NodeId>),
}

impl From<Selector> for ElementSource {
    fn from(selector: Selector) -> Self {
        ElementSource::Selector(selector)
    }
}

impl From<Vec<NodeId>> for ElementSource {
    fn from(nodes: Vec<NodeId>) -> Self {
        ElementSource::Nodes(nodes)
    }
}

/// Which of a fold's two surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Header,
    Content,
}

/// State reflected as a class on both of a fold's surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldClass {
    /// Set while open or opening.
    Open,
    /// Set once the opening transition finished.
    Opened,
    Disabled,
    Focus,
}

/// Class names applied for each fold state, per surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub header_open: String,
    pub content_open: String,
    pub header_opened: String,
    pub content_opened: String,
    pub header_disabled: String,
    pub content_disabled: String,
    pub header_focus: String,
    pub content_focus: String,
}

impl ClassNames {
    pub fn get(&self, part: Part, class: FoldClass) -> &str {
        match (part, class) {
            (Part::Header, FoldClass::Open) => &self.header_open,
            (Part::Content, FoldClass::Open) => &self.content_open,
            (Part::Header, FoldClass::Opened) => &self.header_opened,
            (Part::Content, FoldClass::Opened) => &self.content_opened,
            (Part::Header, FoldClass::Disabled) => &self.header_disabled,
            (Part::Content, FoldClass::Disabled) => &self.content_disabled,
            (Part::Header, FoldClass::Focus) => &self.header_focus,
            (Part::Content, FoldClass::Focus) => &self.content_focus,
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        let modifier = |base: &str, state: &str| format!("{base}--{state}");
        Self {
            header_open: modifier(DEFAULT_HEADER_CLASS, "open"),
            content_open: modifier(DEFAULT_CONTENT_CLASS, "open"),
            header_opened: modifier(DEFAULT_HEADER_CLASS, "opened"),
            content_opened: modifier(DEFAULT_CONTENT_CLASS, "opened"),
            header_disabled: modifier(DEFAULT_HEADER_CLASS, "disabled"),
            content_disabled: modifier(DEFAULT_CONTENT_CLASS, "disabled"),
            header_focus: modifier(DEFAULT_HEADER_CLASS, "focus"),
            content_focus: modifier(DEFAULT_CONTENT_CLASS, "focus"),
        }
    }
}

/// Resolved controller options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Arrow/Home/End/Ctrl+PageUp/PageDown navigation between headers.
    pub keyboard_interaction: bool,
    /// Allow more than one fold open at once.
    pub multi_selectable: bool,
    /// Maintain ARIA attributes on buttons and contents.
    pub aria_enabled: bool,
    /// Allow the user to close an open fold. When false an open fold is
    /// disabled until a sibling closes it.
    pub collapsible: bool,
    /// Wrap focus around at either end of the fold list.
    pub carousel_focus: bool,
    /// Attribute on a header or content marking the fold initially open.
    pub initial_open_attribute: String,
    /// Animate the initial open instead of completing it at once.
    pub initial_open_transition: bool,
    /// Delay before `opened` fires for an animated initial open.
    pub initial_open_transition_delay: Duration,
    /// Delay between `open`/`close` and `opened`/`closed` for user transitions.
    pub transition_duration: Duration,
    pub header_elements: ElementSource,
    pub content_elements: ElementSource,
    pub classes: ClassNames,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            keyboard_interaction: true,
            multi_selectable: true,
            aria_enabled: true,
            collapsible: true,
            carousel_focus: true,
            initial_open_attribute: DEFAULT_INITIAL_OPEN_ATTRIBUTE.to_string(),
            initial_open_transition: true,
            initial_open_transition_delay: DEFAULT_INITIAL_OPEN_TRANSITION_DELAY,
            transition_duration: DEFAULT_TRANSITION_DURATION,
            header_elements: ElementSource::Selector(Selector::class(DEFAULT_HEADER_CLASS)),
            content_elements: ElementSource::Selector(Selector::class(DEFAULT_CONTENT_CLASS)),
            classes: ClassNames::default(),
        }
    }
}

/// Partial options as written in a config file.
///
/// ```toml
/// [options]
/// multi_selectable = false
/// carousel_focus = false
/// header_elements = "dt"
/// content_elements = "dd"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OptionsOverrides {
    #[serde(default)]
    pub keyboard_interaction: Option<bool>,
    #[serde(default)]
    pub multi_selectable: Option<bool>,
    #[serde(default)]
    pub aria_enabled: Option<bool>,
    #[serde(default)]
    pub collapsible: Option<bool>,
    #[serde(default)]
    pub carousel_focus: Option<bool>,
    #[serde(default)]
    pub initial_open_attribute: Option<String>,
    #[serde(default)]
    pub initial_open_transition: Option<bool>,
    #[serde(default)]
    pub initial_open_transition_delay_ms: Option<u64>,
    #[serde(default)]
    pub transition_duration_ms: Option<u64>,
    /// Selector resolved against the container.
    #[serde(default)]
    pub header_elements: Option<String>,
    /// Selector resolved against the container.
    #[serde(default)]
    pub content_elements: Option<String>,
    #[serde(default)]
    pub header_open_class: Option<String>,
    #[serde(default)]
    pub content_open_class: Option<String>,
    #[serde(default)]
    pub header_opened_class: Option<String>,
    #[serde(default)]
    pub content_opened_class: Option<String>,
    #[serde(default)]
    pub header_disabled_class: Option<String>,
    #[serde(default)]
    pub content_disabled_class: Option<String>,
    #[serde(default)]
    pub header_focus_class: Option<String>,
    #[serde(default)]
    pub content_focus_class: Option<String>,
}

impl Options {
    /// Shallow-merge `overrides` over `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if a selector override does not parse.
    pub fn with_overrides(self, overrides: OptionsOverrides) -> Result<Self, SelectorError> {
        let selector = |raw: Option<String>, current: ElementSource| match raw {
            Some(raw) => Selector::parse(&raw).map(ElementSource::Selector),
            None => Ok(current),
        };

        let classes = self.classes;
        Ok(Self {
            keyboard_interaction: overrides
                .keyboard_interaction
                .unwrap_or(self.keyboard_interaction),
            multi_selectable: overrides.multi_selectable.unwrap_or(self.multi_selectable),
            aria_enabled: overrides.aria_enabled.unwrap_or(self.aria_enabled),
            collapsible: overrides.collapsible.unwrap_or(self.collapsible),
            carousel_focus: overrides.carousel_focus.unwrap_or(self.carousel_focus),
            initial_open_attribute: overrides
                .initial_open_attribute
                .unwrap_or(self.initial_open_attribute),
            initial_open_transition: overrides
                .initial_open_transition
                .unwrap_or(self.initial_open_transition),
            initial_open_transition_delay: overrides
                .initial_open_transition_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(self.initial_open_transition_delay),
            transition_duration: overrides
                .transition_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(self.transition_duration),
            header_elements: selector(overrides.header_elements, self.header_elements)?,
            content_elements: selector(overrides.content_elements, self.content_elements)?,
            classes: ClassNames {
                header_open: overrides.header_open_class.unwrap_or(classes.header_open),
                content_open: overrides.content_open_class.unwrap_or(classes.content_open),
                header_opened: overrides
                    .header_opened_class
                    .unwrap_or(classes.header_opened),
                content_opened: overrides
                    .content_opened_class
                    .unwrap_or(classes.content_opened),
                header_disabled: overrides
                    .header_disabled_class
                    .unwrap_or(classes.header_disabled),
                content_disabled: overrides
                    .content_disabled_class
                    .unwrap_or(classes.content_disabled),
                header_focus: overrides.header_focus_class.unwrap_or(classes.header_focus),
                content_focus: overrides
                    .content_focus_class
                    .unwrap_or(classes.content_focus),
            },
        })
    }

    /// Defaults with `overrides` applied.
    pub fn from_overrides(overrides: OptionsOverrides) -> Result<Self, SelectorError> {
        Self::default().with_overrides(overrides)
    }
}
