//! Running header and footer.
//!
//! A [`PageDecoration`] draws onto a [`PageCanvas`] in absolute page coordinates (points from the
//! top-left corner). The canvas records every string it draws so a finished render can report
//! which header and footer texts ended up on which page.

use std::cell::RefCell;
use std::rc::Rc;

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style};
use genpdf::{render, Context, Margins, PageDecorator, Position};
use log::debug;

use crate::error::ReportError;
use crate::layout::Measure;
use crate::model::SectionStart;
use crate::paint::{PageShapes, Shape};
use crate::report::AuditReport;
use crate::styles::Insets;
use crate::theme;
use crate::units::{mm_from_f64, Pt};

/// Paper size and margins, in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: Pt,
    pub height: Pt,
    pub margins: Insets,
}

impl PageGeometry {
    pub fn new(width: Pt, height: Pt, margins: Insets) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    /// US Letter with the report's margins.
    pub fn letter() -> Self {
        Self::new(
            Pt::inch(8.5),
            Pt::inch(11.0),
            Insets::new(56.0, 54.0, 50.0, 54.0),
        )
    }

    pub fn body_width(&self) -> Pt {
        self.width - self.margins.left - self.margins.right
    }

    pub fn body_height(&self) -> Pt {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Fails when the margins leave no room for body content.
    pub fn validate(&self) -> Result<(), ReportError> {
        let margins = [
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
            self.margins.left,
        ];
        if margins.iter().any(|m| m.value() < 0.0) {
            return Err(ReportError::Geometry("margins must not be negative".to_owned()));
        }
        if self.body_width().value() <= 0.0 || self.body_height().value() <= 0.0 {
            return Err(ReportError::Geometry(format!(
                "margins leave no body area on a {}x{} pt page",
                self.width.value(),
                self.height.value()
            )));
        }
        Ok(())
    }

    pub(crate) fn genpdf_margins(&self) -> Margins {
        Margins::trbl(
            self.margins.top.to_mm(),
            self.margins.right.to_mm(),
            self.margins.bottom.to_mm(),
            self.margins.left.to_mm(),
        )
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::letter()
    }
}

/// Per-page information handed to a decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageContext {
    /// 1-based page number.
    pub number: usize,
    pub geometry: PageGeometry,
}

/// Draws the running elements of one page.
pub trait PageDecoration {
    fn decorate(&self, page: &PageContext, canvas: &mut PageCanvas<'_, '_>) -> Result<(), Error>;
}

/// Horizontal anchoring of a string relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Left,
    Center,
    Right,
}

/// Region of the page a drawn string falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Header,
    Body,
    Footer,
}

/// A string drawn by a decoration.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnText {
    pub text: String,
    pub anchor: TextAnchor,
    pub x: Pt,
    pub baseline: Pt,
    pub band: Band,
}

/// A line drawn by a decoration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawnLine {
    pub from: (Pt, Pt),
    pub to: (Pt, Pt),
    pub thickness: Pt,
    pub color: Color,
}

/// Everything a decoration drew on one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageStamp {
    pub page: usize,
    pub texts: Vec<DrawnText>,
    pub lines: Vec<DrawnLine>,
}

impl PageStamp {
    fn texts_in(&self, band: Band) -> Vec<&str> {
        self.texts
            .iter()
            .filter(|t| t.band == band)
            .map(|t| t.text.as_str())
            .collect()
    }

    pub fn header_texts(&self) -> Vec<&str> {
        self.texts_in(Band::Header)
    }

    pub fn footer_texts(&self) -> Vec<&str> {
        self.texts_in(Band::Footer)
    }
}

struct Surface<'a, 'p> {
    area: &'a render::Area<'p>,
    font_cache: &'a FontCache,
}

/// Drawing target for decorations.
///
/// Strings are printed straight onto the page in their own color. Lines are only recorded here
/// and painted with their thickness after the document is rendered.
pub struct PageCanvas<'a, 'p> {
    surface: Option<Surface<'a, 'p>>,
    measure: &'a dyn Measure,
    geometry: PageGeometry,
    stamp: PageStamp,
}

impl<'a, 'p> PageCanvas<'a, 'p> {
    fn on_area(
        area: &'a render::Area<'p>,
        font_cache: &'a FontCache,
        geometry: PageGeometry,
        page: usize,
    ) -> Self {
        Self {
            surface: Some(Surface { area, font_cache }),
            measure: font_cache,
            geometry,
            stamp: PageStamp {
                page,
                ..PageStamp::default()
            },
        }
    }

    /// A canvas that records draws without producing output.
    pub fn recording(measure: &'a dyn Measure, geometry: PageGeometry, page: usize) -> Self {
        Self {
            surface: None,
            measure,
            geometry,
            stamp: PageStamp {
                page,
                ..PageStamp::default()
            },
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    fn band(&self, y: Pt) -> Band {
        if y < self.geometry.margins.top {
            Band::Header
        } else if y > self.geometry.height - self.geometry.margins.bottom {
            Band::Footer
        } else {
            Band::Body
        }
    }

    /// Records a line. Lines are painted underneath the page content once the document is
    /// rendered.
    pub fn line(&mut self, from: (Pt, Pt), to: (Pt, Pt), thickness: Pt, color: Color) {
        self.stamp.lines.push(DrawnLine {
            from,
            to,
            thickness,
            color,
        });
    }

    /// Draws `text` with its baseline at `baseline`, anchored at `x`.
    pub fn text(
        &mut self,
        text: &str,
        x: Pt,
        baseline: Pt,
        anchor: TextAnchor,
        font_size: u8,
        color: Color,
    ) -> Result<(), Error> {
        let style = Style::new().with_font_size(font_size).with_color(color);
        let width = self.measure.text_width(text, style);
        let left = x.as_mm_f64()
            - match anchor {
                TextAnchor::Left => 0.0,
                TextAnchor::Center => width / 2.0,
                TextAnchor::Right => width,
            };

        if let Some(surface) = &self.surface {
            let ascent = crate::units::mm_to_f64(
                style
                    .font(surface.font_cache)
                    .glyph_height(style.font_size()),
            );
            let top = (baseline.as_mm_f64() - ascent).max(0.0);
            let printed = surface.area.print_str(
                surface.font_cache,
                Position::new(mm_from_f64(left), mm_from_f64(top)),
                style,
                text,
            )?;
            if !printed {
                return Err(Error::new(
                    format!("page decoration text does not fit: {:?}", text),
                    ErrorKind::PageSizeExceeded,
                ));
            }
        }

        let band = self.band(baseline);
        self.stamp.texts.push(DrawnText {
            text: text.to_owned(),
            anchor,
            x,
            baseline,
            band,
        });
        Ok(())
    }

    pub fn into_stamp(self) -> PageStamp {
        self.stamp
    }
}

/// Header rule, label and date on top, centered page number at the bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportHeader {
    pub label: String,
    pub date: String,
}

impl ReportHeader {
    const RULE_FROM_TOP: Pt = Pt(40.0);
    const RULE_THICKNESS: Pt = Pt(2.0);
    const TEXT_FROM_TOP: Pt = Pt(36.0);
    const FOOTER_FROM_BOTTOM: Pt = Pt(30.0);
    const FONT_SIZE: u8 = 8;

    pub fn new(label: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            date: date.into(),
        }
    }

    pub fn for_report(report: &AuditReport) -> Self {
        Self::new(report.header_label, report.header_date)
    }
}

impl PageDecoration for ReportHeader {
    fn decorate(&self, page: &PageContext, canvas: &mut PageCanvas<'_, '_>) -> Result<(), Error> {
        let geometry = page.geometry;
        let left = geometry.margins.left;
        let right = geometry.width - geometry.margins.right;

        canvas.line(
            (left, Self::RULE_FROM_TOP),
            (right, Self::RULE_FROM_TOP),
            Self::RULE_THICKNESS,
            theme::ACCENT_BLUE,
        );
        canvas.text(
            &self.label,
            left,
            Self::TEXT_FROM_TOP,
            TextAnchor::Left,
            Self::FONT_SIZE,
            theme::TEXT_MEDIUM,
        )?;
        canvas.text(
            &self.date,
            right,
            Self::TEXT_FROM_TOP,
            TextAnchor::Right,
            Self::FONT_SIZE,
            theme::TEXT_MEDIUM,
        )?;
        canvas.text(
            &format!("Page {}", page.number),
            Pt(geometry.width.value() / 2.0),
            geometry.height - Self::FOOTER_FROM_BOTTOM,
            TextAnchor::Center,
            Self::FONT_SIZE,
            theme::TEXT_MEDIUM,
        )
    }
}

/// Per-render record of pages, stamps and section starts.
#[derive(Debug, Default)]
pub(crate) struct PageLog {
    pub page: usize,
    pub stamps: Vec<PageStamp>,
    pub sections: Vec<SectionStart>,
    pub shapes: PageShapes,
}

pub(crate) type SharedPageLog = Rc<RefCell<PageLog>>;

/// Bridges a [`PageDecoration`] to `genpdf`'s page decorator hook.
pub(crate) struct DecoratorAdapter {
    decoration: Box<dyn PageDecoration>,
    geometry: PageGeometry,
    log: SharedPageLog,
}

impl DecoratorAdapter {
    pub(crate) fn new(
        decoration: Box<dyn PageDecoration>,
        geometry: PageGeometry,
        log: SharedPageLog,
    ) -> Self {
        Self {
            decoration,
            geometry,
            log,
        }
    }
}

impl PageDecorator for DecoratorAdapter {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: render::Area<'a>,
        _style: Style,
    ) -> Result<render::Area<'a>, Error> {
        let number = {
            let mut log = self.log.borrow_mut();
            log.page += 1;
            log.page
        };
        debug!("decorating page {}", number);

        let page = PageContext {
            number,
            geometry: self.geometry,
        };
        let stamp = {
            let mut canvas = PageCanvas::on_area(&area, &context.font_cache, self.geometry, number);
            self.decoration.decorate(&page, &mut canvas)?;
            canvas.into_stamp()
        };
        {
            let mut log = self.log.borrow_mut();
            let lines = stamp.lines.iter().map(|line| Shape::Line {
                from: line.from,
                to: line.to,
                width: line.thickness,
                color: line.color,
            });
            log.shapes.entry(number).or_default().extend(lines);
            log.stamps.push(stamp);
        }

        area.add_margins(self.geometry.genpdf_margins());
        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tests::FixedMeasure;

    const MEASURE: FixedMeasure = FixedMeasure {
        char_width: 1.0,
        line_height: 3.0,
    };

    fn decorate(page: usize) -> PageStamp {
        let geometry = PageGeometry::letter();
        let header = ReportHeader::new("SEO Indexing Analysis | avinashsangle.com", "February 2026");
        let mut canvas = PageCanvas::recording(&MEASURE, geometry, page);
        header
            .decorate(&PageContext { number: page, geometry }, &mut canvas)
            .expect("recording never fails");
        canvas.into_stamp()
    }

    #[test]
    fn letter_geometry_leaves_body_area() {
        let geometry = PageGeometry::letter();
        assert_eq!(geometry.width, Pt(612.0));
        assert_eq!(geometry.height, Pt(792.0));
        assert_eq!(geometry.body_width(), Pt(504.0));
        assert_eq!(geometry.body_height(), Pt(686.0));
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn margins_wider_than_the_page_are_rejected() {
        let geometry = PageGeometry::new(Pt(100.0), Pt(100.0), Insets::uniform(60.0));
        assert!(matches!(geometry.validate(), Err(ReportError::Geometry(_))));
    }

    #[test]
    fn header_draws_label_date_and_rule() {
        let stamp = decorate(1);
        assert_eq!(
            stamp.header_texts(),
            vec!["SEO Indexing Analysis | avinashsangle.com", "February 2026"]
        );
        assert_eq!(stamp.lines.len(), 1);
        let rule = stamp.lines[0];
        assert_eq!(rule.from, (Pt(54.0), Pt(40.0)));
        assert_eq!(rule.to, (Pt(558.0), Pt(40.0)));
        assert_eq!(rule.thickness, Pt(2.0));
        assert_eq!(rule.color, theme::ACCENT_BLUE);
    }

    #[test]
    fn footer_shows_the_page_number_centered() {
        let stamp = decorate(7);
        assert_eq!(stamp.footer_texts(), vec!["Page 7"]);
        let footer = stamp
            .texts
            .iter()
            .find(|t| t.band == Band::Footer)
            .expect("footer text");
        assert_eq!(footer.anchor, TextAnchor::Center);
        assert_eq!(footer.x, Pt(306.0));
        assert_eq!(footer.baseline, Pt(762.0));
    }

    #[test]
    fn date_is_right_aligned_to_the_margin() {
        let stamp = decorate(1);
        let date = stamp
            .texts
            .iter()
            .find(|t| t.text == "February 2026")
            .expect("date text");
        assert_eq!(date.anchor, TextAnchor::Right);
        assert_eq!(date.x, Pt(558.0));
        assert_eq!(date.baseline, Pt(36.0));
    }
}
