//! Accordion documents for the terminal demo.
//!
//! A document is a TOML file with one `[[fold]]` table per header/content
//! pair:
//!
//! ```toml
//! [[fold]]
//! title = "What is this?"
//! body = """
//! An accordion.
//! Each line becomes a paragraph."""
//! open = true
//! ```
//!
//! [`AccordionDocument::build`] turns it into markup the controller's
//! default selectors find.

use crate::config::options::{DEFAULT_CONTENT_CLASS, DEFAULT_HEADER_CLASS};
use crate::dom::Document;
use crate::model::NodeId;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Class on the container element.
pub const CONTAINER_CLASS: &str = "handorgel";
/// Class on the wrapper inside each content element.
pub const CONTENT_INNER_CLASS: &str = "handorgel__content__inner";

/// Errors loading a demo document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document file does not exist.
    #[error("Document not found: {path:?}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error reading the document.
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid TOML or has unknown keys.
    #[error("Invalid document {path:?}: {reason}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// One `[[fold]]` entry.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FoldSpec {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Starts open (sets the initial-open marker on the header).
    #[serde(default)]
    pub open: bool,
    /// Disabled right after the controller attaches.
    #[serde(default)]
    pub disabled: bool,
    /// Header button starts focused.
    #[serde(default)]
    pub autofocus: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccordionDocument {
    #[serde(default, rename = "fold")]
    pub folds: Vec<FoldSpec>,
}

/// Surfaces created by [`AccordionDocument::build`], in fold order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltAccordion {
    pub container: NodeId,
    pub headers: Vec<NodeId>,
    pub buttons: Vec<NodeId>,
    pub contents: Vec<NodeId>,
}

impl AccordionDocument {
    /// Parse a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error message if the text does not describe a document.
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Indices of folds to disable after attaching.
    pub fn disabled_indices(&self) -> Vec<usize> {
        self.folds
            .iter()
            .enumerate()
            .filter(|(_, fold)| fold.disabled)
            .map(|(index, _)| index)
            .collect()
    }

    /// Append the accordion markup below `parent`:
    ///
    /// ```text
    /// div.handorgel
    ///   h3.handorgel__header[data-open] > button[autofocus] > "title"
    ///   div.handorgel__content > div.handorgel__content__inner > p "line"*
    /// ```
    pub fn build(&self, doc: &mut Document, parent: NodeId) -> BuiltAccordion {
        let container = doc.append_element(parent, "div", &[("class", CONTAINER_CLASS)]);
        let mut built = BuiltAccordion {
            container,
            headers: Vec::with_capacity(self.folds.len()),
            buttons: Vec::with_capacity(self.folds.len()),
            contents: Vec::with_capacity(self.folds.len()),
        };

        for fold in &self.folds {
            let mut header_attributes = vec![("class", DEFAULT_HEADER_CLASS)];
            if fold.open {
                header_attributes.push(("data-open", ""));
            }
            let header = doc.append_element(container, "h3", &header_attributes);

            let button_attributes: &[(&str, &str)] = if fold.autofocus {
                &[("autofocus", "")]
            } else {
                &[]
            };
            let button = doc.append_element(header, "button", button_attributes);
            doc.append_text(button, &fold.title);

            let content = doc.append_element(container, "div", &[("class", DEFAULT_CONTENT_CLASS)]);
            let inner = doc.append_element(content, "div", &[("class", CONTENT_INNER_CLASS)]);
            for line in fold.body.lines() {
                let paragraph = doc.append_element(inner, "p", &[]);
                doc.append_text(paragraph, line);
            }

            built.headers.push(header);
            built.buttons.push(button);
            built.contents.push(content);
        }
        built
    }
}

/// Load a document from a TOML file.
///
/// # Errors
///
/// Returns `DocumentError::FileNotFound` if the file does not exist,
/// `DocumentError::Io` if it cannot be read and `DocumentError::Parse` if
/// its contents are not a document.
pub fn load_document(path: impl AsRef<Path>) -> Result<AccordionDocument, DocumentError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DocumentError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    AccordionDocument::from_toml_str(&text).map_err(|reason| DocumentError::Parse {
        path: path.to_path_buf(),
        reason,
    })
}
