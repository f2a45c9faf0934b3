//! `genpdf` elements for the report's block types.
//!
//! Every element lays its text out with [`crate::layout::wrap`] before drawing, which lets it split
//! itself across pages at line or row granularity. Backgrounds, rules and table borders go through
//! a [`Painter`] and end up underneath the text. Lengths are millimetres unless a name says
//! otherwise.

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{Font, FontFamily};
use genpdf::style::{Color, Style};
use genpdf::{render, Context, Element, Position, RenderResult, Size};
use log::{debug, warn};

use crate::decorator::SharedPageLog;
use crate::layout::{self, Line, Measure, Run};
use crate::model::{HorizontalAlignment, SectionStart, TableStyling, VerticalAlignment};
use crate::paint::Painter;
use crate::richtext::Span;
use crate::styles::{FontFace, Insets, ResolvedStyle};
use crate::units::{mm_from_f64, mm_to_f64, Pt};

const EPSILON: f64 = 1e-6;

/// Space drawn above and below a horizontal rule.
const RULE_GAP: Pt = Pt(1.0);

/// A section heading is moved to the next page when less than this much room is left.
const SECTION_MIN_SPACE: Pt = Pt(72.0);

/// Maps resolved styles and inline spans onto `genpdf` styles.
#[derive(Clone, Copy, Debug, Default)]
pub struct Typefaces {
    mono: Option<FontFamily<Font>>,
}

impl Typefaces {
    /// `mono` is the monospace family registered with the document, if one was loaded.
    pub fn new(mono: Option<FontFamily<Font>>) -> Self {
        Self { mono }
    }

    pub fn base_style(&self, style: &ResolvedStyle) -> Style {
        let mut out = Style::new()
            .with_font_size(style.size)
            .with_line_spacing(style.line_spacing())
            .with_color(style.color);
        if style.bold {
            out = out.bold();
        }
        if style.italic {
            out = out.italic();
        }
        if style.face == FontFace::Mono {
            out = self.monospace(out);
        }
        out
    }

    fn monospace(&self, style: Style) -> Style {
        match self.mono {
            Some(family) => style.with_font_family(family),
            None => style,
        }
    }

    fn span_style(&self, base: Style, span: &Span) -> Style {
        let mut style = base;
        if span.is_bold() {
            style = style.bold();
        }
        if span.is_italic() {
            style = style.italic();
        }
        if span.is_monospace() {
            style = self.monospace(style);
        }
        if let Some(color) = span.color() {
            style = style.with_color(color);
        }
        style
    }

    /// Converts parsed spans into layout runs printed with `style`.
    pub fn runs(&self, spans: &[Span], style: &ResolvedStyle) -> Vec<Run> {
        let base = self.base_style(style);
        spans
            .iter()
            .map(|span| Run::new(span.text(), self.span_style(base, span)))
            .collect()
    }

    /// A single run of literal text printed with `style`.
    pub fn literal(&self, text: &str, style: &ResolvedStyle) -> Vec<Run> {
        vec![Run::new(text, self.base_style(style))]
    }
}

/// Padding in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Edges {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl From<Insets> for Edges {
    fn from(insets: Insets) -> Self {
        Self {
            top: insets.top.as_mm_f64(),
            right: insets.right.as_mm_f64(),
            bottom: insets.bottom.as_mm_f64(),
            left: insets.left.as_mm_f64(),
        }
    }
}

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

fn size(width: f64, height: f64) -> Size {
    Size::new(mm_from_f64(width), mm_from_f64(height))
}

fn alignment_offset(alignment: HorizontalAlignment, available: f64, used: f64) -> f64 {
    let slack = (available - used).max(0.0);
    match alignment {
        HorizontalAlignment::Left | HorizontalAlignment::Justified => 0.0,
        HorizontalAlignment::Center => slack / 2.0,
        HorizontalAlignment::Right => slack,
    }
}

fn print_line(
    area: &render::Area<'_>,
    context: &Context,
    line: &Line,
    x: f64,
    y: f64,
) -> Result<(), Error> {
    for fragment in &line.fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }
        let printed = area.print_str(
            &context.font_cache,
            position(x + fragment.x, y),
            fragment.style,
            &fragment.text,
        )?;
        if !printed {
            return Err(Error::new(
                format!("line does not fit into its area: {:?}", line.text()),
                ErrorKind::PageSizeExceeded,
            ));
        }
    }
    Ok(())
}

/// Index one past the last line of `lines[start..]` that fits below `top` in `available`.
///
/// The final line of the block must also leave room for `pad_bottom`.
fn fit_lines(lines: &[Line], start: usize, top: f64, available: f64, pad_bottom: f64) -> (usize, f64) {
    let mut y = top;
    let mut end = start;
    while end < lines.len() {
        let mut needed = lines[end].height;
        if end + 1 == lines.len() {
            needed += pad_bottom;
        }
        if y + needed > available + EPSILON {
            break;
        }
        y += lines[end].height;
        end += 1;
    }
    (end, y)
}

/// A paragraph or preformatted block.
///
/// Renders its lines top to bottom and continues on the next page when the area runs out.
/// Space before the block and top padding are applied to its first page only; bottom padding and
/// space after to its last.
pub struct TextBlock {
    runs: Vec<Run>,
    alignment: HorizontalAlignment,
    space_before: f64,
    space_after: f64,
    background: Option<Color>,
    padding: Edges,
    indent: f64,
    lines: Option<Vec<Line>>,
    next_line: usize,
    painter: Painter,
}

impl TextBlock {
    pub(crate) fn new(runs: Vec<Run>, style: &ResolvedStyle, painter: Painter) -> Self {
        Self {
            runs,
            alignment: style.alignment,
            space_before: style.space_before.as_mm_f64(),
            space_after: style.space_after.as_mm_f64(),
            background: style.background,
            padding: style.padding.into(),
            indent: style.left_indent.as_mm_f64(),
            lines: None,
            next_line: 0,
            painter,
        }
    }
}

impl Element for TextBlock {
    fn render(
        &mut self,
        context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        let height = mm_to_f64(area.size().height);
        let text_x = self.indent + self.padding.left;
        let text_width = (width - text_x - self.padding.right).max(0.0);

        let runs = &self.runs;
        let lines = self
            .lines
            .get_or_insert_with(|| layout::wrap(runs, text_width, &context.font_cache));

        let first = self.next_line == 0;
        let top = if first { self.space_before } else { 0.0 };
        let text_top = top + if first { self.padding.top } else { 0.0 };
        let start = self.next_line;
        let (end, text_bottom) = fit_lines(lines, start, text_top, height, self.padding.bottom);
        let finished = end == lines.len();

        let mut result = RenderResult::default();
        if end == start && !finished {
            result.has_more = true;
            return Ok(result);
        }

        let block_bottom = if finished {
            text_bottom + self.padding.bottom
        } else {
            text_bottom
        };
        if let Some(color) = self.background {
            self.painter.fill(
                &area,
                self.indent,
                top,
                width - self.indent,
                block_bottom - top,
                color,
            );
        }

        let mut y = text_top;
        for line in &lines[start..end] {
            let offset = alignment_offset(self.alignment, text_width, line.width);
            print_line(&area, context, line, text_x + offset, y)?;
            y += line.height;
        }
        self.next_line = end;

        let used = if finished {
            (block_bottom + self.space_after).min(height.max(0.0))
        } else {
            block_bottom
        };
        result.size = size(width, used);
        result.has_more = !finished;
        Ok(result)
    }
}

/// Fixed vertical whitespace. Truncated at the bottom of a page.
pub struct SpacerElement {
    height: f64,
}

impl SpacerElement {
    pub fn new(height: Pt) -> Self {
        Self {
            height: height.as_mm_f64(),
        }
    }
}

impl Element for SpacerElement {
    fn render(
        &mut self,
        _context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = mm_to_f64(area.size().height).max(0.0);
        let mut result = RenderResult::default();
        result.size = size(0.0, self.height.min(available));
        Ok(result)
    }
}

/// A centered horizontal rule with a point of space above and below.
pub struct RuleElement {
    thickness: f64,
    color: Color,
    width_fraction: f64,
    painter: Painter,
}

impl RuleElement {
    pub(crate) fn new(thickness: Pt, color: Color, width_fraction: f64, painter: Painter) -> Self {
        Self {
            thickness: thickness.as_mm_f64(),
            color,
            width_fraction: width_fraction.clamp(0.0, 1.0),
            painter,
        }
    }
}

impl Element for RuleElement {
    fn render(
        &mut self,
        _context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let gap = RULE_GAP.as_mm_f64();
        let total = self.thickness + 2.0 * gap;
        let width = mm_to_f64(area.size().width);
        let mut result = RenderResult::default();
        if total > mm_to_f64(area.size().height) + EPSILON {
            result.has_more = true;
            return Ok(result);
        }
        let line_width = width * self.width_fraction;
        let x = (width - line_width) / 2.0;
        let y = gap + self.thickness / 2.0;
        self.painter
            .line(&area, (x, y), (x + line_width, y), self.thickness, self.color);
        result.size = size(width, total);
        Ok(result)
    }
}

/// Records the page on which a report section starts.
///
/// When fewer than 72 pt remain on the page the marker defers itself, so the section heading that
/// follows starts on the next page together with its recorded page number.
pub struct SectionMarker {
    title: String,
    log: SharedPageLog,
    deferred: bool,
}

impl SectionMarker {
    pub(crate) fn new(title: impl Into<String>, log: SharedPageLog) -> Self {
        Self {
            title: title.into(),
            log,
            deferred: false,
        }
    }
}

impl Element for SectionMarker {
    fn render(
        &mut self,
        _context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        if !self.deferred && mm_to_f64(area.size().height) < SECTION_MIN_SPACE.as_mm_f64() {
            self.deferred = true;
            result.has_more = true;
            return Ok(result);
        }
        let mut log = self.log.borrow_mut();
        let page = log.page.max(1);
        debug!("section '{}' starts on page {}", self.title, page);
        log.sections.push(SectionStart {
            title: self.title.clone(),
            page,
        });
        Ok(result)
    }
}

/// Content of one table cell, ready for layout.
#[derive(Clone, Debug)]
pub struct CellContent {
    pub runs: Vec<Run>,
    pub alignment: HorizontalAlignment,
}

#[derive(Debug)]
struct RowLayout {
    height: f64,
    cells: Vec<Vec<Line>>,
}

#[derive(Debug)]
struct TableLayout {
    x: f64,
    columns: Vec<f64>,
    rows: Vec<RowLayout>,
}

impl TableLayout {
    fn column_x(&self, col: usize) -> f64 {
        self.x + self.columns[..col].iter().sum::<f64>()
    }

    fn width(&self) -> f64 {
        self.columns.iter().sum()
    }
}

/// Scales the declared widths down when they exceed `available` and centers the table.
fn fit_columns(name: &str, widths: &[f64], available: f64) -> (f64, Vec<f64>) {
    let total: f64 = widths.iter().sum();
    if total > available + EPSILON && total > 0.0 {
        warn!(
            "table '{}' is {:.1} mm wide but only {:.1} mm are available; scaling columns",
            name, total, available
        );
        let factor = available / total;
        (0.0, widths.iter().map(|w| w * factor).collect())
    } else {
        ((available - total) / 2.0, widths.to_vec())
    }
}

fn layout_table<M: Measure + ?Sized>(
    name: &str,
    widths: &[f64],
    cells: &[Vec<CellContent>],
    styling: &TableStyling,
    available: f64,
    measure: &M,
) -> TableLayout {
    let (x, columns) = fit_columns(name, widths, available);
    let rows = cells
        .iter()
        .enumerate()
        .map(|(row, contents)| {
            let mut height: f64 = 0.0;
            let cells = contents
                .iter()
                .enumerate()
                .map(|(col, content)| {
                    let padding = Edges::from(styling.cell(col, row).padding);
                    let inner = (columns[col] - padding.left - padding.right).max(0.0);
                    let lines = layout::wrap(&content.runs, inner, measure);
                    height = height.max(layout::total_height(&lines) + padding.top + padding.bottom);
                    lines
                })
                .collect();
            RowLayout { height, cells }
        })
        .collect();
    debug!("laid out table '{}' ({} rows)", name, cells.len());
    TableLayout { x, columns, rows }
}

fn fit_rows(rows: &[RowLayout], start: usize, available: f64) -> (usize, f64) {
    let mut y = 0.0;
    let mut end = start;
    while end < rows.len() && y + rows[end].height <= available + EPSILON {
        y += rows[end].height;
        end += 1;
    }
    (end, y)
}

/// A table with per-cell backgrounds, text colors, padding, vertical alignment and frames.
///
/// Rows never split; a table that does not fit continues on the next page at a row boundary.
pub struct StyledTable {
    name: String,
    widths: Vec<f64>,
    cells: Vec<Vec<CellContent>>,
    styling: TableStyling,
    layout: Option<TableLayout>,
    next_row: usize,
    stalled: bool,
    painter: Painter,
}

impl StyledTable {
    /// `widths` are the declared column widths; `cells` is row-major.
    pub(crate) fn new(
        name: impl Into<String>,
        widths: &[Pt],
        cells: Vec<Vec<CellContent>>,
        styling: TableStyling,
        painter: Painter,
    ) -> Self {
        Self {
            name: name.into(),
            widths: widths.iter().map(|w| w.as_mm_f64()).collect(),
            cells,
            styling,
            layout: None,
            next_row: 0,
            stalled: false,
            painter,
        }
    }
}

impl Element for StyledTable {
    fn render(
        &mut self,
        context: &Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let width = mm_to_f64(area.size().width);
        let height = mm_to_f64(area.size().height);
        let (name, widths, cells, styling) = (&self.name, &self.widths, &self.cells, &self.styling);
        let layout = self.layout.get_or_insert_with(|| {
            layout_table(name, widths, cells, styling, width, &context.font_cache)
        });

        let start = self.next_row;
        let (end, used) = fit_rows(&layout.rows, start, height);
        let mut result = RenderResult::default();
        if end == start {
            if self.stalled {
                return Err(Error::new(
                    format!("row {} of table '{}' is taller than a page", start, self.name),
                    ErrorKind::PageSizeExceeded,
                ));
            }
            self.stalled = true;
            result.has_more = start < layout.rows.len();
            return Ok(result);
        }
        self.stalled = false;

        let mut row_tops = Vec::with_capacity(end - start + 1);
        let mut y = 0.0;
        for row in &layout.rows[start..end] {
            row_tops.push(y);
            y += row.height;
        }
        row_tops.push(y);

        for (offset, row) in (start..end).enumerate() {
            for col in 0..layout.columns.len() {
                if let Some(color) = self.styling.cell(col, row).background {
                    self.painter.fill(
                        &area,
                        layout.column_x(col),
                        row_tops[offset],
                        layout.columns[col],
                        layout.rows[row].height,
                        color,
                    );
                }
            }
        }

        for (offset, row) in (start..end).enumerate() {
            let row_layout = &layout.rows[row];
            for (col, lines) in row_layout.cells.iter().enumerate() {
                let cell = self.styling.cell(col, row);
                let padding = Edges::from(cell.padding);
                let inner_height = row_layout.height - padding.top - padding.bottom;
                let slack = (inner_height - layout::total_height(lines)).max(0.0);
                let valign = match cell.valign {
                    VerticalAlignment::Top => 0.0,
                    VerticalAlignment::Middle => slack / 2.0,
                    VerticalAlignment::Bottom => slack,
                };
                let inner_width = layout.columns[col] - padding.left - padding.right;
                let x = layout.column_x(col) + padding.left;
                let mut line_y = row_tops[offset] + padding.top + valign;
                for line in lines {
                    let align = alignment_offset(self.cells[row][col].alignment, inner_width, line.width);
                    print_line(&area, context, line, x + align, line_y)?;
                    line_y += line.height;
                }
            }
        }

        for frame in self.styling.frames() {
            let rows_start = frame.range.rows.start.max(start);
            let rows_end = frame.range.rows.end.min(end);
            if rows_start >= rows_end {
                continue;
            }
            let top = row_tops[rows_start - start];
            let bottom = row_tops[rows_end - start];
            let left = layout.column_x(frame.range.cols.start);
            let right = layout.column_x(frame.range.cols.end);
            let thickness = frame.width.as_mm_f64();

            let horizontal: Vec<f64> = if frame.inner {
                row_tops[rows_start - start..=rows_end - start].to_vec()
            } else {
                vec![top, bottom]
            };
            for y in horizontal {
                self.painter
                    .line(&area, (left, y), (right, y), thickness, frame.color);
            }

            let vertical: Vec<f64> = if frame.inner {
                (frame.range.cols.start..=frame.range.cols.end)
                    .map(|col| layout.column_x(col))
                    .collect()
            } else {
                vec![left, right]
            };
            for x in vertical {
                self.painter
                    .line(&area, (x, top), (x, bottom), thickness, frame.color);
            }
        }

        self.next_row = end;
        result.size = size(layout.width(), used);
        result.has_more = end < layout.rows.len();
        Ok(result)
    }
}
