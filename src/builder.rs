//! Document construction for report stories.
//!
//! [`DocumentBuilder`] turns a [`Story`] into `genpdf` elements, renders them with a
//! [`PageDecoration`] on every page, then post-processes the bytes with `lopdf` to paint the
//! recorded fills and strokes, add the outline and write fixed metadata. [`DocumentBuilder::build`] writes the result through a temporary file in the
//! target directory, so a failed build never leaves a partial PDF behind.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use genpdf::{self, Size};
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::bookmarks;
use crate::decorator::{DecoratorAdapter, PageDecoration, PageGeometry, PageLog, PageStamp};
use crate::elements::{
    CellContent, RuleElement, SectionMarker, SpacerElement, StyledTable, TextBlock, Typefaces,
};
use crate::error::ReportError;
use crate::fonts::FontSet;
use crate::metadata::{self, DocumentInfo, PdfDate};
use crate::model::{Block, SectionStart, Story, TableBlock};
use crate::paint::{self, PageShapes, Painter};
use crate::richtext::parse_markup;
use crate::styles::StyleRegistry;
use crate::validate;

/// A rendered document and what was recorded while laying it out.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    /// Header and footer output, one stamp per page in page order.
    pub pages: Vec<PageStamp>,
    /// First page of every anchored section, in story order.
    pub sections: Vec<SectionStart>,
}

impl RenderedPdf {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Renders stories with a fixed style sheet and page geometry.
pub struct DocumentBuilder<'a> {
    styles: &'a StyleRegistry,
    geometry: PageGeometry,
    title: String,
    author: Option<String>,
    created: Option<PdfDate>,
    outline: bool,
}

impl<'a> DocumentBuilder<'a> {
    /// Creates a builder for US Letter pages with an outline and no author.
    pub fn new(styles: &'a StyleRegistry) -> Self {
        Self {
            styles,
            geometry: PageGeometry::default(),
            title: String::from("Report"),
            author: None,
            created: None,
            outline: true,
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Date written as creation and modification date. Defaults to [`PdfDate::UNDATED`].
    pub fn with_creation_date(mut self, date: PdfDate) -> Self {
        self.created = Some(date);
        self
    }

    /// Whether anchored sections are written as PDF bookmarks.
    pub fn with_outline(mut self, outline: bool) -> Self {
        self.outline = outline;
        self
    }

    /// Lays out `story` and returns the finished PDF bytes.
    pub fn render(
        &self,
        story: &Story,
        decoration: impl PageDecoration + 'static,
    ) -> Result<RenderedPdf, ReportError> {
        self.geometry.validate()?;
        validate::lint_story(story, self.styles)?;

        let fonts = FontSet::load()?;
        let mut document = genpdf::Document::new(fonts.sans);
        let typefaces = Typefaces::new(fonts.mono.map(|family| document.add_font_family(family)));
        document.set_title(self.title.clone());
        document.set_minimal_conformance();
        document.set_paper_size(Size::new(
            self.geometry.width.to_mm(),
            self.geometry.height.to_mm(),
        ));

        let log = Rc::new(RefCell::new(PageLog::default()));
        document.set_page_decorator(DecoratorAdapter::new(
            Box::new(decoration),
            self.geometry,
            Rc::clone(&log),
        ));

        let painter = Painter::new(Rc::clone(&log), self.geometry);
        for block in story.blocks() {
            self.push_block(&mut document, block, &typefaces, &log, &painter)?;
        }

        let mut bytes = Vec::new();
        document.render(&mut bytes).map_err(ReportError::Render)?;
        let PageLog {
            stamps,
            sections,
            shapes,
            ..
        } = std::mem::take(&mut *log.borrow_mut());
        debug!("laid out {} blocks on {} pages", story.len(), stamps.len());

        let bytes = self.finalize(&bytes, &sections, &shapes)?;
        Ok(RenderedPdf {
            bytes,
            pages: stamps,
            sections,
        })
    }

    /// Renders `story` and writes it to `path`, replacing any existing file.
    pub fn build(
        &self,
        story: &Story,
        decoration: impl PageDecoration + 'static,
        path: impl AsRef<Path>,
    ) -> Result<RenderedPdf, ReportError> {
        let path = path.as_ref();
        let rendered = self.render(story, decoration)?;
        write_atomically(path, &rendered.bytes)?;
        info!(
            "wrote {} bytes ({} pages) to {}",
            rendered.bytes.len(),
            rendered.page_count(),
            path.display()
        );
        Ok(rendered)
    }

    fn push_block(
        &self,
        document: &mut genpdf::Document,
        block: &Block,
        typefaces: &Typefaces,
        log: &Rc<RefCell<PageLog>>,
        painter: &Painter,
    ) -> Result<(), ReportError> {
        match block {
            Block::Paragraph(paragraph) => {
                let style = self.styles.lookup(paragraph.style())?;
                let spans = parse_markup(paragraph.text()).map_err(|source| {
                    ReportError::Markup {
                        location: format!("paragraph '{}'", paragraph.text()),
                        source,
                    }
                })?;
                document.push(TextBlock::new(
                    typefaces.runs(&spans, style),
                    style,
                    painter.clone(),
                ));
            }
            Block::Preformatted(paragraph) => {
                let style = self.styles.lookup(paragraph.style())?;
                document.push(TextBlock::new(
                    typefaces.literal(paragraph.text(), style),
                    style,
                    painter.clone(),
                ));
            }
            Block::Spacer(height) => document.push(SpacerElement::new(*height)),
            Block::Rule(rule) => document.push(RuleElement::new(
                rule.thickness,
                rule.color,
                rule.width_fraction,
                painter.clone(),
            )),
            Block::PageBreak => document.push(genpdf::elements::PageBreak::new()),
            Block::Anchor(title) => {
                document.push(SectionMarker::new(title.clone(), Rc::clone(log)))
            }
            Block::Table(table) => {
                document.push(self.table_element(table, typefaces, painter.clone())?)
            }
        }
        Ok(())
    }

    fn table_element(
        &self,
        table: &TableBlock,
        typefaces: &Typefaces,
        painter: Painter,
    ) -> Result<StyledTable, ReportError> {
        let styling = table.resolve_styling()?;
        let mut cells = Vec::with_capacity(table.row_count());
        for (row, row_cells) in table.rows().iter().enumerate() {
            let mut contents = Vec::with_capacity(row_cells.len());
            for (col, cell) in row_cells.iter().enumerate() {
                let base = self.styles.lookup(cell.style())?;
                let style = match styling.cell(col, row).text_color {
                    Some(color) => base.with_color(color),
                    None => base.clone(),
                };
                let spans = parse_markup(cell.text()).map_err(|source| ReportError::Markup {
                    location: format!("table '{}' cell ({}, {})", table.name(), col, row),
                    source,
                })?;
                contents.push(CellContent {
                    runs: typefaces.runs(&spans, &style),
                    alignment: style.alignment,
                });
            }
            cells.push(contents);
        }
        Ok(StyledTable::new(
            table.name(),
            table.column_widths(),
            cells,
            styling,
            painter,
        ))
    }

    fn finalize(
        &self,
        bytes: &[u8],
        sections: &[SectionStart],
        shapes: &PageShapes,
    ) -> Result<Vec<u8>, ReportError> {
        let mut document = lopdf::Document::load_mem(bytes)?;
        let painted = paint::paint_pages(&mut document, shapes, self.geometry.height)?;
        debug!("painted shapes on {} pages", painted);
        if self.outline {
            bookmarks::insert_outline(&mut document, sections)?;
        }
        metadata::stamp(
            &mut document,
            &DocumentInfo {
                title: self.title.clone(),
                author: self.author.clone(),
                created: self.created.unwrap_or(PdfDate::UNDATED),
            },
        )?;

        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(lopdf::Error::from)?;
        Ok(buffer)
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(directory).map_err(io_error)?;
    file.write_all(bytes).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    file.persist(path).map_err(|err| io_error(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::ReportHeader;

    #[test]
    fn lint_failures_stop_the_build_before_fonts_load() {
        let styles = StyleRegistry::report_sheet().expect("sheet builds");
        let story = Story::new().with_block(Block::paragraph("text", "Unregistered"));
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.pdf");

        let err = DocumentBuilder::new(&styles)
            .build(&story, ReportHeader::new("label", "date"), &path)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(!path.exists());
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"old").expect("seed file");
        write_atomically(&path, b"%PDF-new").expect("write succeeds");
        assert_eq!(std::fs::read(&path).expect("readable"), b"%PDF-new");
        assert_eq!(std::fs::read_dir(dir.path()).expect("listable").count(), 1);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("report.pdf");
        let err = write_atomically(&path, b"%PDF").unwrap_err();
        assert!(matches!(err, ReportError::Io { path: p, .. } if p == path));
    }

    #[test]
    fn builder_defaults() {
        let styles = StyleRegistry::report_sheet().expect("sheet builds");
        let builder = DocumentBuilder::new(&styles).with_title("Audit");
        assert_eq!(builder.title, "Audit");
        assert!(builder.outline);
        assert_eq!(builder.geometry, PageGeometry::letter());
        assert_eq!(builder.created, None);
    }
}
