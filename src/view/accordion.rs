//! Line layout of an attached accordion.
//!
//! Everything is read back from the surface classes the folds maintain, the
//! same way a stylesheet would see them.

use super::styles::{AccordionStyles, HeaderState};
use crate::config::{FoldClass, Part};
use crate::dom::Document;
use crate::handorgel::Handorgel;
use crate::model::NodeId;
use crate::surface::Surface;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

const MARKER_OPEN: &str = "▾";
const MARKER_CLOSED: &str = "▸";
const CONTENT_INDENT: &str = "    ";

/// Rendered lines plus the line index of each header row.
#[derive(Debug, Clone, Default)]
pub struct AccordionLines {
    pub lines: Vec<Line<'static>>,
    /// `(line index, header button)` in fold order.
    pub headers: Vec<(usize, NodeId)>,
}

/// Lay out `controller`'s folds for an area `width` columns wide.
///
/// Header rows are padded to the full width so the focus highlight reads as
/// a bar. Content lines appear while the content carries its open class.
pub fn accordion_lines(
    doc: &Document,
    controller: &Handorgel,
    styles: &AccordionStyles,
    width: u16,
) -> AccordionLines {
    let classes = &controller.options().classes;
    let mut out = AccordionLines::default();

    for fold in controller.folds() {
        let header = fold.header();
        let state = HeaderState {
            open: doc.has_class(header, classes.get(Part::Header, FoldClass::Open)),
            focused: doc.has_class(header, classes.get(Part::Header, FoldClass::Focus)),
            disabled: doc.has_class(header, classes.get(Part::Header, FoldClass::Disabled)),
        };
        let marker = if state.open { MARKER_OPEN } else { MARKER_CLOSED };
        let text = format!(" {marker} {}", doc.text_content(fold.button()).trim());
        let padding = usize::from(width).saturating_sub(text.width());

        out.headers.push((out.lines.len(), fold.button()));
        out.lines.push(Line::from(Span::styled(
            format!("{text}{}", " ".repeat(padding)),
            styles.header(state),
        )));

        let content = fold.content();
        if doc.has_class(content, classes.get(Part::Content, FoldClass::Open)) {
            let settled = doc.has_class(content, classes.get(Part::Content, FoldClass::Opened));
            for paragraph in paragraphs(doc, content) {
                out.lines.push(Line::from(Span::styled(
                    format!("{CONTENT_INDENT}{paragraph}"),
                    styles.content(settled),
                )));
            }
        }
    }
    out
}

/// Text of each leaf element below `content`, or its whole text when it has
/// no element descendants.
fn paragraphs(doc: &Document, content: NodeId) -> Vec<String> {
    let leaves: Vec<String> = doc
        .descendants(content)
        .filter(|&node| {
            doc.tag(node).is_some() && doc.children(node).iter().all(|&c| doc.tag(c).is_none())
        })
        .map(|node| doc.text_content(node))
        .collect();
    if !leaves.is_empty() {
        return leaves;
    }

    let text = doc.text_content(content);
    if text.trim().is_empty() {
        Vec::new()
    } else {
        vec![text]
    }
}
