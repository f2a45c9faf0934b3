use seo_report::bookmarks::read_outline;
use seo_report::builder::{DocumentBuilder, RenderedPdf};
use seo_report::decorator::ReportHeader;
use seo_report::error::ReportError;
use seo_report::fonts;
use seo_report::metadata::{info_entry, PdfDate};
use seo_report::model::{Block, Cell, CellRange, RuleKind, Story, TableBlock};
use seo_report::report::{self, AuditReport};
use seo_report::styles::StyleRegistry;
use seo_report::theme;
use seo_report::units::Pt;
use genpdf::style::Color;
use lopdf::content::{Content, Operation};
use sha2::{Digest, Sha256};

const LABEL: &str = "SEO Indexing Analysis | avinashsangle.com";

fn header() -> ReportHeader {
    ReportHeader::new(LABEL, "February 2026")
}

fn render(story: &Story) -> Option<RenderedPdf> {
    if !fonts::fonts_available() {
        eprintln!("skipping: no fonts available");
        return None;
    }
    let styles = StyleRegistry::report_sheet().expect("sheet builds");
    let rendered = DocumentBuilder::new(&styles)
        .with_title("Rendering test")
        .with_creation_date(PdfDate::new(2026, 2, 8))
        .render(story, header())
        .expect("story renders");
    Some(rendered)
}

fn scorecard_story() -> Story {
    let statuses = ["CRITICAL", "CRITICAL", "OK", "HIGH", "MEDIUM"];
    let mut table = TableBlock::new("scorecard", vec![Pt::inch(1.6), Pt::inch(1.0)])
        .with_row(vec![
            Cell::new("Category", "TableCellBold"),
            Cell::new("Status", "TableCellBold"),
        ])
        .with_rows(statuses.iter().enumerate().map(|(index, status)| {
            vec![
                Cell::new(format!("Check {}", index + 1), "TableCell"),
                Cell::new(*status, theme::severity_cell_style(status)),
            ]
        }));
    for (index, status) in statuses.iter().enumerate() {
        table = table.with_rule(
            RuleKind::Background(theme::severity_tint(status)),
            CellRange::row(index as isize + 1),
        );
    }
    Story::new()
        .with_block(Block::anchor("Scorecard"))
        .with_block(Block::paragraph("Scorecard", "SectionHead"))
        .with_block(Block::Table(table))
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes)
        .expect("output parses")
        .get_pages()
        .len()
}

fn first_page_operations(bytes: &[u8]) -> Vec<Operation> {
    let document = lopdf::Document::load_mem(bytes).expect("output parses");
    let page_id = document.get_pages()[&1];
    let content = document.get_page_content(page_id).expect("page content readable");
    Content::decode(&content).expect("content decodes").operations
}

fn operands(operation: &Operation) -> Vec<f64> {
    operation
        .operands
        .iter()
        .map(|operand| f64::from(operand.as_float().expect("numeric operand")))
        .collect()
}

fn is_color(operation: &Operation, operator: &str, color: Color) -> bool {
    let Color::Rgb(r, g, b) = color else {
        return false;
    };
    let expected = [r, g, b].map(|channel| f64::from(channel) / 255.0);
    operation.operator == operator
        && operands(operation)
            .iter()
            .zip(expected)
            .all(|(actual, expected)| (actual - expected).abs() < 1e-3)
}

#[test]
fn table_bands_and_header_rule_are_painted_under_the_text() {
    let band = theme::CRITICAL_BG;
    let table = TableBlock::new("banded", vec![Pt::inch(2.0), Pt::inch(2.0)])
        .with_row(vec![
            Cell::new("Name", "TableCellBold"),
            Cell::new("Value", "TableCellBold"),
        ])
        .with_rows((1..=4).map(|row| {
            vec![
                Cell::new(format!("Row {}", row), "TableCell"),
                Cell::new("text", "TableCell"),
            ]
        }))
        .with_rule(RuleKind::RowBands(vec![theme::WHITE, band]), CellRange::rows(1, -1));
    let story = Story::new().with_block(Block::Table(table));
    let Some(rendered) = render(&story) else {
        return;
    };
    let ops = first_page_operations(&rendered.bytes);

    let band_fills = ops
        .windows(3)
        .filter(|w| is_color(&w[0], "rg", band) && w[1].operator == "re" && w[2].operator == "f")
        .count();
    assert_eq!(band_fills, 4, "one band fill per cell of rows 2 and 4");
    let first_fill = ops.iter().position(|op| op.operator == "f").expect("a fill");
    let first_text = ops.iter().position(|op| op.operator == "BT").expect("page text");
    assert!(first_fill < first_text, "fills must precede the text");

    let rule = ops
        .iter()
        .position(|op| op.operator == "w" && operands(op) == vec![2.0])
        .expect("a 2 pt line width");
    assert!(is_color(&ops[rule - 1], "RG", theme::ACCENT_BLUE));
    let stroke: Vec<&str> = ops[rule + 1..rule + 4]
        .iter()
        .map(|op| op.operator.as_str())
        .collect();
    assert_eq!(stroke, vec!["m", "l", "S"]);
    let y = operands(&ops[rule + 1])[1];
    assert!((y - (792.0 - 40.0)).abs() < 1e-3, "header rule sits 40 pt below the top");
}

#[test]
fn scorecard_pages_carry_header_and_final_page_number() {
    let Some(rendered) = render(&scorecard_story()) else {
        return;
    };
    assert!(rendered.page_count() >= 1);
    assert_eq!(page_count(&rendered.bytes), rendered.page_count());

    let first = &rendered.pages[0];
    assert_eq!(first.header_texts()[0], LABEL);
    let last = rendered.pages.last().expect("at least one page");
    assert_eq!(
        last.footer_texts(),
        vec![format!("Page {}", rendered.page_count()).as_str()]
    );
}

#[test]
fn page_break_moves_the_second_paragraph_to_a_later_page() {
    let story = Story::new()
        .with_block(Block::anchor("first"))
        .with_block(Block::paragraph("Short first paragraph.", "BodyText"))
        .with_block(Block::page_break())
        .with_block(Block::anchor("second"))
        .with_block(Block::paragraph("Second paragraph.", "BodyText"));
    let Some(rendered) = render(&story) else {
        return;
    };
    let pages: Vec<usize> = rendered.sections.iter().map(|s| s.page).collect();
    assert_eq!(pages, vec![1, 2]);
    assert_eq!(rendered.page_count(), 2);
}

#[test]
fn rendering_twice_yields_identical_bytes() {
    let story = report::build_story(&AuditReport::seo_indexing());
    let (Some(first), Some(second)) = (render(&story), render(&story)) else {
        return;
    };
    assert_eq!(
        Sha256::digest(&first.bytes),
        Sha256::digest(&second.bytes),
        "renders differ"
    );
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn full_report_has_an_outline_and_fixed_metadata() {
    if !fonts::fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("SEO_Indexing_Analysis.pdf");
    let rendered = seo_report::render_report(&path).expect("report renders");

    let bytes = std::fs::read(&path).expect("output written");
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(bytes, rendered.bytes);

    let document = lopdf::Document::load_mem(&bytes).expect("output parses");
    let outline = read_outline(&document).expect("outline readable");
    let titles: Vec<&str> = outline.iter().map(|(title, _)| title.as_str()).collect();
    let story = report::build_story(&AuditReport::seo_indexing());
    assert_eq!(titles, story.section_titles());
    assert!(outline.windows(2).all(|pair| pair[0].1 <= pair[1].1));
    assert!(outline.iter().all(|(_, page)| *page >= 1));

    assert_eq!(
        info_entry(&document, "CreationDate").as_deref(),
        Some("D:20260208000000Z")
    );
    assert_eq!(
        info_entry(&document, "Author").as_deref(),
        Some("avinashsangle.com")
    );
    for stamp in &rendered.pages {
        assert_eq!(stamp.header_texts(), vec![LABEL, "February 2026"]);
    }
}

#[test]
fn outline_can_be_disabled() {
    if !fonts::fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("plain.pdf");
    let rendered = seo_report::render_report_with(&path, false).expect("report renders");
    let document = lopdf::Document::load_mem(&rendered.bytes).expect("output parses");
    assert!(read_outline(&document).expect("readable").is_empty());
}

#[test]
fn failed_build_leaves_no_output_file() {
    let table = TableBlock::new("findings", vec![Pt(100.0)])
        .with_row(vec![Cell::new("only row", "TableCell")])
        .with_rule(RuleKind::Background(theme::LIGHT_GRAY), CellRange::row(3));
    let story = Story::new().with_block(Block::Table(table));
    let styles = StyleRegistry::report_sheet().expect("sheet builds");
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.pdf");

    let err = DocumentBuilder::new(&styles)
        .build(&story, header(), &path)
        .unwrap_err();
    assert!(matches!(err, ReportError::RuleOutOfRange { rule: 0, .. }));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).expect("listable").count(), 0);
}

#[test]
fn unwritable_destination_is_reported_as_io_error() {
    if !fonts::fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("no-such-dir").join("report.pdf");
    let err = seo_report::render_report(&path).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
    assert!(!path.exists());
}
