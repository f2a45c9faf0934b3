//! Filled rectangles and stroked lines.
//!
//! `genpdf` strokes every line as a hairline and has no fill operation, so elements record their
//! shapes here while they are laid out. Once the document is rendered, [`paint_pages`] writes the
//! shapes of each page into a content stream placed in front of the page's own content. The fills
//! therefore sit underneath the text.

use std::collections::BTreeMap;

use genpdf::render;
use genpdf::style::Color;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::decorator::{PageGeometry, SharedPageLog};
use crate::units::{mm_from_f64, mm_to_f64, pt_from_mm, Pt};

const EPSILON: f64 = 1e-6;

/// A shape in points, measured from the top-left corner of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Fill {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        color: Color,
    },
    Line {
        from: (Pt, Pt),
        to: (Pt, Pt),
        width: Pt,
        color: Color,
    },
}

/// Shapes keyed by 1-based page number, in drawing order.
pub type PageShapes = BTreeMap<usize, Vec<Shape>>;

/// Records shapes given in millimetres relative to an element's render area.
///
/// Body elements are laid out by `genpdf`'s vertical layout, whose areas keep the left margin and
/// the bottom margin of the page. The top of an area is recovered from its remaining height.
#[derive(Clone)]
pub(crate) struct Painter {
    log: SharedPageLog,
    geometry: PageGeometry,
}

impl Painter {
    pub(crate) fn new(log: SharedPageLog, geometry: PageGeometry) -> Self {
        Self { log, geometry }
    }

    /// Fills the rectangle at (`x`, `y`) of `area`.
    pub(crate) fn fill(
        &self,
        area: &render::Area<'_>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) {
        self.fill_in(mm_to_f64(area.size().height), x, y, width, height, color);
    }

    /// Strokes a straight line of `width` millimetres across `area`.
    pub(crate) fn line(
        &self,
        area: &render::Area<'_>,
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    ) {
        self.line_in(mm_to_f64(area.size().height), from, to, width, color);
    }

    fn fill_in(&self, area_height: f64, x: f64, y: f64, width: f64, height: f64, color: Color) {
        if width <= EPSILON || height <= EPSILON {
            return;
        }
        let (left, top) = self.origin(area_height);
        self.record(Shape::Fill {
            x: points(left + x),
            y: points(top + y),
            width: points(width),
            height: points(height),
            color,
        });
    }

    fn line_in(&self, area_height: f64, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
        let (left, top) = self.origin(area_height);
        self.record(Shape::Line {
            from: (points(left + from.0), points(top + from.1)),
            to: (points(left + to.0), points(top + to.1)),
            width: points(width),
            color,
        });
    }

    fn origin(&self, area_height: f64) -> (f64, f64) {
        let bottom = (self.geometry.height - self.geometry.margins.bottom).as_mm_f64();
        (self.geometry.margins.left.as_mm_f64(), bottom - area_height)
    }

    fn record(&self, shape: Shape) {
        let mut log = self.log.borrow_mut();
        let page = log.page.max(1);
        log.shapes.entry(page).or_default().push(shape);
    }
}

fn points(mm: f64) -> Pt {
    pt_from_mm(mm_from_f64(mm))
}

fn number(value: f64) -> Object {
    Object::from(value)
}

fn color_operation(color: Color, stroking: bool) -> Operation {
    let channel = |value: u8| number(f64::from(value) / 255.0);
    let (operator, operands) = match color {
        Color::Rgb(r, g, b) => ("rg", vec![channel(r), channel(g), channel(b)]),
        Color::Cmyk(c, m, y, k) => ("k", vec![channel(c), channel(m), channel(y), channel(k)]),
        Color::Greyscale(value) => ("g", vec![channel(value)]),
    };
    if stroking {
        Operation::new(&operator.to_uppercase(), operands)
    } else {
        Operation::new(operator, operands)
    }
}

/// Content-stream operations drawing `shapes` on a page `page_height` points tall.
///
/// Every shape is wrapped in `q`/`Q` so its color and line width do not leak into the page content
/// that follows.
pub fn operations(shapes: &[Shape], page_height: Pt) -> Vec<Operation> {
    let flip = |y: Pt| number((page_height - y).value());
    let mut operations = Vec::with_capacity(shapes.len() * 6);
    for shape in shapes {
        operations.push(Operation::new("q", vec![]));
        match *shape {
            Shape::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                operations.push(color_operation(color, false));
                operations.push(Operation::new(
                    "re",
                    vec![
                        number(x.value()),
                        flip(y + height),
                        number(width.value()),
                        number(height.value()),
                    ],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            Shape::Line {
                from,
                to,
                width,
                color,
            } => {
                operations.push(color_operation(color, true));
                operations.push(Operation::new("w", vec![number(width.value())]));
                operations.push(Operation::new("m", vec![number(from.0.value()), flip(from.1)]));
                operations.push(Operation::new("l", vec![number(to.0.value()), flip(to.1)]));
                operations.push(Operation::new("S", vec![]));
            }
        }
        operations.push(Operation::new("Q", vec![]));
    }
    operations
}

/// Puts the recorded shapes underneath the content of every page that has any.
///
/// Returns the number of pages painted. Shapes recorded for pages the document does not have are
/// ignored.
pub fn paint_pages(
    document: &mut Document,
    shapes: &PageShapes,
    page_height: Pt,
) -> Result<usize, lopdf::Error> {
    let mut painted = 0;
    for (number, page_id) in document.get_pages() {
        let Some(page_shapes) = shapes.get(&(number as usize)) else {
            continue;
        };
        if page_shapes.is_empty() {
            continue;
        }
        let mut bytes = Content {
            operations: operations(page_shapes, page_height),
        }
        .encode()?;
        bytes.push(b'\n');
        let content_id = document.add_object(Stream::new(dictionary! {}, bytes));
        prepend_contents(document, page_id, content_id)?;
        painted += 1;
    }
    Ok(painted)
}

fn prepend_contents(
    document: &mut Document,
    page_id: ObjectId,
    content_id: ObjectId,
) -> Result<(), lopdf::Error> {
    let page = document.get_object_mut(page_id)?.as_dict_mut()?;
    let contents = match page.get(b"Contents").ok().cloned() {
        Some(Object::Array(mut streams)) => {
            streams.insert(0, Object::Reference(content_id));
            streams
        }
        Some(existing) => vec![Object::Reference(content_id), existing],
        None => vec![Object::Reference(content_id)],
    };
    page.set("Contents", Object::Array(contents));
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::decorator::PageLog;
    use crate::theme;

    fn painter() -> (Painter, SharedPageLog) {
        let log = Rc::new(RefCell::new(PageLog::default()));
        (Painter::new(Rc::clone(&log), PageGeometry::letter()), log)
    }

    fn value(object: &Object) -> f64 {
        f64::from(object.as_float().expect("numeric operand"))
    }

    fn operators(operations: &[Operation]) -> Vec<&str> {
        operations.iter().map(|op| op.operator.as_str()).collect()
    }

    fn document_with_content(page_count: usize) -> Document {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let kids: Vec<Object> = (0..page_count)
            .map(|_| {
                let content = document.add_object(Stream::new(dictionary! {}, b"BT ET\n".to_vec()));
                let page = document.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content,
                });
                Object::Reference(page)
            })
            .collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document
    }

    #[test]
    fn area_offsets_are_measured_from_the_body_frame() {
        let (painter, log) = painter();
        log.borrow_mut().page = 2;
        // An area with 100 mm left ends at the bottom margin, so its top is 100 mm above it.
        painter.fill_in(100.0, 0.0, 0.0, 10.0, 5.0, theme::LIGHT_GRAY);

        let log = log.borrow();
        let shapes = &log.shapes[&2];
        let Shape::Fill { x, y, height, .. } = shapes[0] else {
            panic!("expected a fill, got {:?}", shapes[0]);
        };
        assert!((x.value() - 54.0).abs() < 1e-6);
        assert!((height.value() - points(5.0).value()).abs() < 1e-6);
        let expected_top = 792.0 - 50.0 - points(100.0).value();
        assert!((y.value() - expected_top).abs() < 1e-6);
    }

    #[test]
    fn empty_rectangles_are_not_recorded() {
        let (painter, log) = painter();
        painter.fill_in(100.0, 0.0, 0.0, 0.0, 5.0, theme::LIGHT_GRAY);
        painter.fill_in(100.0, 0.0, 0.0, 5.0, 0.0, theme::LIGHT_GRAY);
        assert!(log.borrow().shapes.is_empty());
    }

    #[test]
    fn fills_become_rectangles_in_pdf_coordinates() {
        let shapes = [Shape::Fill {
            x: Pt(54.0),
            y: Pt(100.0),
            width: Pt(200.0),
            height: Pt(20.0),
            color: Color::Rgb(255, 0, 0),
        }];
        let ops = operations(&shapes, Pt(792.0));
        assert_eq!(operators(&ops), vec!["q", "rg", "re", "f", "Q"]);

        let rgb: Vec<f64> = ops[1].operands.iter().map(value).collect();
        assert_eq!(rgb, vec![1.0, 0.0, 0.0]);
        let rect: Vec<f64> = ops[2].operands.iter().map(value).collect();
        assert_eq!(rect, vec![54.0, 672.0, 200.0, 20.0]);
    }

    #[test]
    fn lines_set_their_width_before_stroking() {
        let shapes = [Shape::Line {
            from: (Pt(54.0), Pt(40.0)),
            to: (Pt(558.0), Pt(40.0)),
            width: Pt(2.0),
            color: Color::Greyscale(0),
        }];
        let ops = operations(&shapes, Pt(792.0));
        assert_eq!(operators(&ops), vec!["q", "G", "w", "m", "l", "S", "Q"]);
        assert_eq!(value(&ops[2].operands[0]), 2.0);
        assert_eq!(value(&ops[3].operands[1]), 752.0);
    }

    #[test]
    fn painted_stream_comes_before_the_page_content() {
        let mut document = document_with_content(2);
        let mut shapes = PageShapes::new();
        shapes.insert(
            2,
            vec![Shape::Fill {
                x: Pt(0.0),
                y: Pt(0.0),
                width: Pt(10.0),
                height: Pt(10.0),
                color: theme::LIGHT_GRAY,
            }],
        );
        shapes.insert(9, vec![]);

        let painted = paint_pages(&mut document, &shapes, Pt(792.0)).expect("pages painted");
        assert_eq!(painted, 1);

        let pages = document.get_pages();
        assert_eq!(document.get_page_contents(pages[&1]).len(), 1);
        let second = pages[&2];
        assert_eq!(document.get_page_contents(second).len(), 2);

        let content = document.get_page_content(second).expect("content readable");
        let decoded = Content::decode(&content).expect("content decodes");
        let ops = operators(&decoded.operations);
        assert_eq!(&ops[..5], &["q", "rg", "re", "f", "Q"]);
        assert_eq!(&ops[5..], &["BT", "ET"]);
    }
}
