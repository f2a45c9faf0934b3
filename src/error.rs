//! Error type shared by every stage of the report pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::CellRange;
use crate::richtext::ParseError;

/// Errors raised while building styles, validating a story, rendering or writing the PDF.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A block or a base style references a style that was never registered.
    #[error("style not found: '{0}'")]
    StyleNotFound(String),

    /// A style name was registered twice.
    #[error("duplicate style: '{0}' is already registered")]
    DuplicateStyle(String),

    /// Inline markup in a paragraph or cell failed to parse.
    #[error("invalid markup in {location}: {source}")]
    Markup {
        location: String,
        #[source]
        source: ParseError,
    },

    /// A table styling rule addresses cells outside the table's grid.
    #[error(
        "out-of-range styling rule #{rule} in table '{table}': {range:?} does not fit a {cols}x{rows} grid"
    )]
    RuleOutOfRange {
        table: String,
        rule: usize,
        range: CellRange,
        cols: usize,
        rows: usize,
    },

    /// Table rows, cells and column widths do not describe a rectangular grid.
    #[error("malformed table '{table}': {detail}")]
    MalformedTable { table: String, detail: String },

    /// Page geometry leaves no room for body content.
    #[error("invalid page geometry: {0}")]
    Geometry(String),

    /// No usable font family could be loaded.
    #[error("failed to load fonts")]
    FontLoad(#[source] genpdf::error::Error),

    /// `genpdf` failed while laying out or encoding the document.
    #[error("render error")]
    Render(#[source] genpdf::error::Error),

    /// Post-processing of the rendered PDF (outline, metadata) failed.
    #[error("failed to finalize PDF")]
    Finalize(#[from] lopdf::Error),

    /// The output file could not be written.
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReportError {
    /// Whether the error stems from the story or style sheet rather than from rendering or I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::StyleNotFound(_)
                | Self::DuplicateStyle(_)
                | Self::Markup { .. }
                | Self::RuleOutOfRange { .. }
                | Self::MalformedTable { .. }
                | Self::Geometry(_)
        )
    }
}
