//! Data structures describing the logical content of the report.
//!
//! The types in this module form a backend-neutral model of the document: a [`Story`] is an
//! ordered list of [`Block`]s that reference styles by name. Nothing here touches fonts or page
//! geometry, so stories can be built and validated without loading a single font file.

use std::ops::Range;

use genpdf::style::Color;

use crate::error::ReportError;
use crate::styles::Insets;
use crate::units::Pt;

/// Horizontal alignment of text within its block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Fully justified paragraphs. Rendered left aligned.
    Justified,
}

/// Vertical alignment of content inside a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Text content paired with the name of the style it is rendered with.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    text: String,
    style: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &str {
        &self.style
    }
}

/// A horizontal rule drawn across a fraction of the frame width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleLine {
    pub thickness: Pt,
    pub color: Color,
    /// Share of the available width covered by the line, in `(0, 1]`.
    pub width_fraction: f64,
}

impl RuleLine {
    /// A full-width rule.
    pub fn new(thickness: f64, color: Color) -> Self {
        Self {
            thickness: Pt(thickness),
            color,
            width_fraction: 1.0,
        }
    }

    pub fn with_width_fraction(mut self, width_fraction: f64) -> Self {
        self.width_fraction = width_fraction;
        self
    }
}

/// One cell of a table: inline-markup text and a style name.
pub type Cell = Paragraph;

/// Coordinates of a rectangular cell region as `(column, row)` pairs, both ends inclusive.
///
/// Negative coordinates count from the end: `-1` is the last column or row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub start: (isize, isize),
    pub end: (isize, isize),
}

impl CellRange {
    pub fn new(start: (isize, isize), end: (isize, isize)) -> Self {
        Self { start, end }
    }

    /// Every cell of the table.
    pub fn all() -> Self {
        Self::new((0, 0), (-1, -1))
    }

    /// Every column of a single row.
    pub fn row(row: isize) -> Self {
        Self::new((0, row), (-1, row))
    }

    /// Every column of the rows `first..=last`.
    pub fn rows(first: isize, last: isize) -> Self {
        Self::new((0, first), (-1, last))
    }

    /// Resolves the range against a grid of `cols` × `rows` cells.
    ///
    /// Returns `None` when a coordinate falls outside the grid or the range is empty.
    pub fn resolve(&self, cols: usize, rows: usize) -> Option<GridRange> {
        let c0 = resolve_index(self.start.0, cols)?;
        let r0 = resolve_index(self.start.1, rows)?;
        let c1 = resolve_index(self.end.0, cols)?;
        let r1 = resolve_index(self.end.1, rows)?;
        if c0 > c1 || r0 > r1 {
            return None;
        }
        Some(GridRange {
            cols: c0..c1 + 1,
            rows: r0..r1 + 1,
        })
    }
}

fn resolve_index(index: isize, len: usize) -> Option<usize> {
    let len = isize::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// A resolved, in-bounds cell region with half-open ranges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRange {
    pub cols: Range<usize>,
    pub rows: Range<usize>,
}

impl GridRange {
    pub fn contains(&self, col: usize, row: usize) -> bool {
        self.cols.contains(&col) && self.rows.contains(&row)
    }
}

/// What a table styling rule does to the cells it addresses.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleKind {
    Background(Color),
    TextColor(Color),
    /// Lines around every cell of the range.
    Grid { width: Pt, color: Color },
    /// A single outline around the range.
    Box { width: Pt, color: Color },
    Padding(Insets),
    /// Alternating row backgrounds, starting with the first color on the range's first row.
    RowBands(Vec<Color>),
    VerticalAlign(VerticalAlignment),
}

/// A declarative styling rule applied to a region of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRule {
    pub kind: RuleKind,
    pub range: CellRange,
}

impl TableRule {
    pub fn new(kind: RuleKind, range: CellRange) -> Self {
        Self { kind, range }
    }
}

/// A table of styled cells with fixed column widths.
#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    name: String,
    rows: Vec<Vec<Cell>>,
    column_widths: Vec<Pt>,
    rules: Vec<TableRule>,
}

impl TableBlock {
    /// Creates a table. `name` only appears in diagnostics.
    pub fn new(name: impl Into<String>, column_widths: Vec<Pt>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            column_widths,
            rules: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        self.rows.extend(rows);
        self
    }

    pub fn with_rule(mut self, kind: RuleKind, range: CellRange) -> Self {
        self.rules.push(TableRule::new(kind, range));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_widths(&self) -> &[Pt] {
        &self.column_widths
    }

    pub fn rules(&self) -> &[TableRule] {
        &self.rules
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    /// Checks the grid shape: at least one row, every row as wide as the column list, positive
    /// column widths.
    pub fn check_shape(&self) -> Result<(), ReportError> {
        let malformed = |detail: String| ReportError::MalformedTable {
            table: self.name.clone(),
            detail,
        };
        if self.column_widths.is_empty() {
            return Err(malformed("no columns declared".to_owned()));
        }
        if let Some(width) = self.column_widths.iter().find(|w| w.value() <= 0.0) {
            return Err(malformed(format!(
                "column width {} pt is not positive",
                width.value()
            )));
        }
        if self.rows.is_empty() {
            return Err(malformed("table has no rows".to_owned()));
        }
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.column_count() {
                return Err(malformed(format!(
                    "row {} has {} cells but {} columns are declared",
                    index,
                    row.len(),
                    self.column_count()
                )));
            }
        }
        Ok(())
    }

    /// Applies the styling rules to the grid, in declaration order.
    pub fn resolve_styling(&self) -> Result<TableStyling, ReportError> {
        self.check_shape()?;
        let cols = self.column_count();
        let rows = self.row_count();
        let mut styling = TableStyling::new(cols, rows);

        for (index, rule) in self.rules.iter().enumerate() {
            let range =
                rule.range
                    .resolve(cols, rows)
                    .ok_or_else(|| ReportError::RuleOutOfRange {
                        table: self.name.clone(),
                        rule: index,
                        range: rule.range,
                        cols,
                        rows,
                    })?;
            if matches!(&rule.kind, RuleKind::RowBands(colors) if colors.is_empty()) {
                return Err(ReportError::MalformedTable {
                    table: self.name.clone(),
                    detail: format!("rule {} has no row band colors", index),
                });
            }
            styling.apply(&rule.kind, &range);
        }

        Ok(styling)
    }
}

/// Per-cell styling for one table, after every rule has been applied.
#[derive(Clone, Debug, PartialEq)]
pub struct TableStyling {
    cols: usize,
    cells: Vec<CellStyling>,
    frames: Vec<Frame>,
}

/// Styling of one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyling {
    pub background: Option<Color>,
    pub text_color: Option<Color>,
    pub padding: Insets,
    pub valign: VerticalAlignment,
}

impl Default for CellStyling {
    fn default() -> Self {
        Self {
            background: None,
            text_color: None,
            padding: Insets::symmetric(3.0, 6.0),
            valign: VerticalAlignment::Top,
        }
    }
}

/// A set of lines drawn around a cell region.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub range: GridRange,
    pub width: Pt,
    pub color: Color,
    /// Whether lines are drawn between the cells of the region as well.
    pub inner: bool,
}

impl TableStyling {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            cells: vec![CellStyling::default(); cols * rows],
            frames: Vec::new(),
        }
    }

    fn apply(&mut self, kind: &RuleKind, range: &GridRange) {
        match kind {
            RuleKind::Grid { width, color } | RuleKind::Box { width, color } => {
                self.frames.push(Frame {
                    range: range.clone(),
                    width: *width,
                    color: *color,
                    inner: matches!(kind, RuleKind::Grid { .. }),
                });
            }
            _ => {
                for row in range.rows.clone() {
                    for col in range.cols.clone() {
                        let index = row * self.cols + col;
                        let cell = &mut self.cells[index];
                        match kind {
                            RuleKind::Background(color) => cell.background = Some(*color),
                            RuleKind::TextColor(color) => cell.text_color = Some(*color),
                            RuleKind::Padding(insets) => cell.padding = *insets,
                            RuleKind::VerticalAlign(valign) => cell.valign = *valign,
                            RuleKind::RowBands(colors) => {
                                let band = (row - range.rows.start) % colors.len();
                                cell.background = Some(colors[band]);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> &CellStyling {
        &self.cells[row * self.cols + col]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Individual content blocks that make up a story.
#[derive(Clone, Debug, PartialEq)]
pub enum Block {
    /// Inline-markup paragraph.
    Paragraph(Paragraph),
    /// Literal text printed line by line, without markup.
    Preformatted(Paragraph),
    /// Vertical whitespace.
    Spacer(Pt),
    Table(TableBlock),
    Rule(RuleLine),
    /// Explicit page break request.
    PageBreak,
    /// Marks the start of a report section for the document outline.
    Anchor(String),
}

impl Block {
    /// Convenience helper for building a paragraph block.
    pub fn paragraph(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self::Paragraph(Paragraph::new(text, style))
    }

    /// Convenience helper for building a preformatted block.
    pub fn preformatted(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self::Preformatted(Paragraph::new(text, style))
    }

    /// Convenience helper for a spacer of `height` points.
    pub fn spacer(height: f64) -> Self {
        Self::Spacer(Pt(height))
    }

    /// Convenience helper for a full-width rule.
    pub fn rule(thickness: f64, color: Color) -> Self {
        Self::Rule(RuleLine::new(thickness, color))
    }

    /// Convenience helper that yields an explicit page break block.
    pub fn page_break() -> Self {
        Self::PageBreak
    }

    pub fn anchor(title: impl Into<String>) -> Self {
        Self::Anchor(title.into())
    }
}

/// The complete ordered content of a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Story {
    blocks: Vec<Block>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Appends a block and returns the updated story.
    pub fn with_block(mut self, block: Block) -> Self {
        self.push(block);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Titles of every [`Block::Anchor`], in story order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Anchor(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Iterates over every table in the story.
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

impl Extend<Block> for Story {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        self.blocks.extend(iter);
    }
}

impl FromIterator<Block> for Story {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

/// The page on which a report section begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionStart {
    pub title: String,
    /// 1-based page number.
    pub page: usize,
}
