//! Configuration module.
//!
//! [`Options`] configures a controller. The loader resolves the demo's
//! config file and command-line overrides into a [`ResolvedConfig`].

pub mod keybindings;
pub mod loader;
pub mod options;

pub use keybindings::{to_key_press, KeyBindings};
pub use loader::{
    apply_cli_overrides, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, ResolvedConfig,
};
pub use options::{ClassNames, ElementSource, FoldClass, Options, OptionsOverrides, Part};
