//! Static checks of a story against a style registry, run before any font is loaded.

use log::debug;

use crate::error::ReportError;
use crate::model::{Block, Paragraph, Story, TableBlock};
use crate::richtext::parse_markup;
use crate::styles::StyleRegistry;

/// Returns the first problem found in `story`, if any.
pub fn lint_story(story: &Story, styles: &StyleRegistry) -> Result<(), ReportError> {
    match lint_all(story, styles).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Collects every problem in `story`, in block order.
pub fn lint_all(story: &Story, styles: &StyleRegistry) -> Vec<ReportError> {
    let mut problems = Vec::new();
    for (index, block) in story.blocks().iter().enumerate() {
        match block {
            Block::Paragraph(paragraph) => {
                check_paragraph(paragraph, format!("block {}", index), styles, &mut problems)
            }
            Block::Preformatted(paragraph) => {
                if let Err(err) = styles.lookup(paragraph.style()) {
                    problems.push(err);
                }
            }
            Block::Table(table) => check_table(table, styles, &mut problems),
            Block::Spacer(height) if height.value() < 0.0 => problems.push(ReportError::Geometry(
                format!("block {}: spacer height {} pt is negative", index, height.value()),
            )),
            Block::Rule(rule) if !(rule.width_fraction > 0.0 && rule.width_fraction <= 1.0) => {
                problems.push(ReportError::Geometry(format!(
                    "block {}: rule width fraction {} is outside (0, 1]",
                    index, rule.width_fraction
                )))
            }
            _ => {}
        }
    }
    debug!(
        "linted {} blocks, {} problem(s)",
        story.len(),
        problems.len()
    );
    problems
}

fn check_paragraph(
    paragraph: &Paragraph,
    location: String,
    styles: &StyleRegistry,
    problems: &mut Vec<ReportError>,
) {
    if let Err(err) = styles.lookup(paragraph.style()) {
        problems.push(err);
    }
    if let Err(source) = parse_markup(paragraph.text()) {
        problems.push(ReportError::Markup { location, source });
    }
}

fn check_table(table: &TableBlock, styles: &StyleRegistry, problems: &mut Vec<ReportError>) {
    if let Err(err) = table.resolve_styling() {
        problems.push(err);
    }
    for (row, cells) in table.rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let location = format!("table '{}' cell ({}, {})", table.name(), col, row);
            check_paragraph(cell, location, styles, problems);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellRange, RuleKind};
    use crate::theme;
    use crate::units::Pt;

    fn sheet() -> StyleRegistry {
        StyleRegistry::report_sheet().expect("sheet builds")
    }

    #[test]
    fn clean_story_passes() {
        let story = Story::new()
            .with_block(Block::paragraph("**Fix:** add redirects", "BodyText"))
            .with_block(Block::preformatted("alternates: { canonical: \"/\" }", "CodeBlock"));
        assert!(lint_story(&story, &sheet()).is_ok());
    }

    #[test]
    fn unknown_style_is_reported() {
        let story = Story::new().with_block(Block::paragraph("text", "NoSuchStyle"));
        let err = lint_story(&story, &sheet()).unwrap_err();
        assert!(matches!(err, ReportError::StyleNotFound(name) if name == "NoSuchStyle"));
    }

    #[test]
    fn unbalanced_markup_names_its_location() {
        let story = Story::new()
            .with_block(Block::spacer(4.0))
            .with_block(Block::paragraph("**never closed", "BodyText"));
        match lint_story(&story, &sheet()).unwrap_err() {
            ReportError::Markup { location, .. } => assert_eq!(location, "block 1"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_problem_is_collected() {
        let table = TableBlock::new("broken", vec![Pt(50.0)])
            .with_row(vec![Paragraph::new("cell", "Missing")])
            .with_rule(RuleKind::Background(theme::WHITE), CellRange::row(1));
        let story = Story::new()
            .with_block(Block::Table(table))
            .with_block(Block::paragraph("ok", "BodyText"));
        let problems = lint_all(&story, &sheet());
        assert_eq!(problems.len(), 2);
        assert!(matches!(problems[0], ReportError::RuleOutOfRange { .. }));
        assert!(matches!(&problems[1], ReportError::StyleNotFound(name) if name == "Missing"));
    }

    #[test]
    fn row_bands_without_colors_fail_the_lint() {
        let table = TableBlock::new("bands", vec![Pt(80.0)])
            .with_row(vec![Paragraph::new("header", "TableCellBold")])
            .with_row(vec![Paragraph::new("data", "TableCell")])
            .with_rule(RuleKind::RowBands(Vec::new()), CellRange::rows(1, -1));
        let story = Story::new().with_block(Block::Table(table));
        match lint_story(&story, &sheet()).unwrap_err() {
            ReportError::MalformedTable { table, detail } => {
                assert_eq!(table, "bands");
                assert!(detail.contains("no row band colors"), "{detail}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
