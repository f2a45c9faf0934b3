//! Core entry point for the seo_report crate.
//!
//! The crate turns a fixed SEO indexing audit into a paginated PDF. Content is assembled into a
//! [`model::Story`] by [`report::build_story`], styled through a [`styles::StyleRegistry`], and
//! laid out onto pages by [`builder::DocumentBuilder`] with a [`decorator::ReportHeader`] drawing
//! the running header and footer.

pub mod bookmarks;
pub mod builder;
pub mod decorator;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod paint;
pub mod report;
pub mod richtext;
pub mod styles;
pub mod theme;
pub mod units;
pub mod validate;

use std::path::Path;

use log::info;

use crate::builder::{DocumentBuilder, RenderedPdf};
use crate::decorator::ReportHeader;
use crate::error::ReportError;
use crate::report::AuditReport;
use crate::styles::StyleRegistry;

/// Default location of the rendered report, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "SEO_Indexing_Analysis.pdf";

/// Builds the style sheet, the story and the document for the bundled audit and writes it to
/// `path`.
pub fn render_report(path: impl AsRef<Path>) -> Result<RenderedPdf, ReportError> {
    render_report_with(path, true)
}

/// Same as [`render_report`] but allows disabling the PDF outline.
pub fn render_report_with(
    path: impl AsRef<Path>,
    outline: bool,
) -> Result<RenderedPdf, ReportError> {
    let path = path.as_ref();
    let report = AuditReport::seo_indexing();
    let styles = StyleRegistry::report_sheet()?;
    let story = report::build_story(&report);

    let rendered = DocumentBuilder::new(&styles)
        .with_title(report.document_title())
        .with_author(report.site)
        .with_creation_date(report.creation_date)
        .with_outline(outline)
        .build(&story, ReportHeader::for_report(&report), path)?;

    info!(
        "Report generated at {} ({} pages)",
        path.display(),
        rendered.page_count()
    );
    Ok(rendered)
}
