//! Styling for accordion headers and content.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Determines whether colors should be enabled or disabled based on:
/// - `--no-color` CLI flag
/// - `NO_COLOR` environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Create a ColorConfig from CLI args and environment.
    ///
    /// The flag wins; otherwise `NO_COLOR` with any value disables colors.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var("NO_COLOR").is_err();
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== AccordionStyles =====

/// Visual state of one header row, derived from its surface classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderState {
    pub open: bool,
    pub focused: bool,
    pub disabled: bool,
}

/// Styles for header rows and content lines.
///
/// Focus and disabled states use modifiers so they stay visible without
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionStyles {
    header: Style,
    header_open: Style,
    content: Style,
    content_opening: Style,
}

impl AccordionStyles {
    pub fn new() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }

    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                header: Style::default().fg(Color::Cyan),
                header_open: Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                content: Style::default(),
                content_opening: Style::default().fg(Color::DarkGray),
            }
        } else {
            Self {
                header: Style::default(),
                header_open: Style::default().add_modifier(Modifier::BOLD),
                content: Style::default(),
                content_opening: Style::default(),
            }
        }
    }

    pub fn header(&self, state: HeaderState) -> Style {
        let mut style = if state.open {
            self.header_open
        } else {
            self.header
        };
        if state.focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if state.disabled {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }

    /// Content style; `settled` is false while the open transition runs.
    pub fn content(&self, settled: bool) -> Style {
        if settled {
            self.content
        } else {
            self.content_opening
        }
    }
}

impl Default for AccordionStyles {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(
            !config.colors_enabled(),
            "--no-color flag should disable colors"
        );
    }

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_env_var() {
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env_and_args(false);
        assert!(
            !config.colors_enabled(),
            "NO_COLOR with any value should disable colors"
        );
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        let config = ColorConfig::from_env_and_args(false);
        assert!(config.colors_enabled());
    }

    #[test]
    fn focused_and_disabled_headers_use_modifiers_without_color() {
        let styles = AccordionStyles::with_color_config(ColorConfig::from_env_and_args(true));

        let style = styles.header(HeaderState {
            open: false,
            focused: true,
            disabled: true,
        });

        assert!(style.fg.is_none());
        assert!(style.add_modifier.contains(Modifier::REVERSED));
        assert!(style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn open_header_is_bold() {
        let styles = AccordionStyles::with_color_config(ColorConfig::from_env_and_args(true));

        let style = styles.header(HeaderState {
            open: true,
            ..HeaderState::default()
        });

        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
