//! Assembly of the audit story.
//!
//! [`AuditReport`] carries the literal findings, [`build_story`] arranges them into blocks. The
//! functions here never touch fonts or files; the result is checked by
//! [`crate::validate::lint_story`] and rendered by [`crate::builder::DocumentBuilder`].

pub mod data;

use genpdf::style::Color;

use crate::decorator::PageGeometry;
use crate::metadata::PdfDate;
use crate::model::{Block, Cell, CellRange, RuleKind, Story, TableBlock, VerticalAlignment};
use crate::richtext::escape_markup;
use crate::styles::Insets;
use crate::theme::{
    self, priority_cell_style, severity_cell_style, severity_label, severity_tint,
};
use crate::units::Pt;

use self::data::{
    ActionItem, CanonicalRow, CrawledUrl, GoodItem, IndexingReason, ScorecardRow, TimelineEntry,
};

/// The complete content of one audit.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditReport {
    pub site: &'static str,
    pub report_date: &'static str,
    pub framework: &'static str,
    /// Left side of the running header.
    pub header_label: &'static str,
    /// Right side of the running header.
    pub header_date: &'static str,
    pub creation_date: PdfDate,
    pub pages_not_indexed: u32,
    pub pages_indexed: u32,
    pub total_clicks: u32,
    pub scorecard: &'static [ScorecardRow],
    pub canonicals: &'static [CanonicalRow],
    pub indexing_reasons: &'static [IndexingReason],
    pub discovered: &'static [CrawledUrl],
    pub redirects: &'static [CrawledUrl],
    pub not_found: &'static [CrawledUrl],
    pub bundle_risks: &'static [&'static str],
    pub working_well: &'static [GoodItem],
    pub action_plan: &'static [ActionItem],
    pub timeline: &'static [TimelineEntry],
}

impl AuditReport {
    /// The February 2026 indexing audit of avinashsangle.com.
    pub fn seo_indexing() -> Self {
        Self {
            site: data::SITE,
            report_date: data::REPORT_DATE,
            framework: data::FRAMEWORK,
            header_label: "SEO Indexing Analysis | avinashsangle.com",
            header_date: data::HEADER_DATE,
            creation_date: PdfDate::new(2026, 2, 8),
            pages_not_indexed: data::PAGES_NOT_INDEXED,
            pages_indexed: data::PAGES_INDEXED,
            total_clicks: data::TOTAL_CLICKS,
            scorecard: data::SCORECARD,
            canonicals: data::CANONICALS,
            indexing_reasons: data::INDEXING_REASONS,
            discovered: data::DISCOVERED_NOT_INDEXED,
            redirects: data::REDIRECTS,
            not_found: data::NOT_FOUND,
            bundle_risks: data::BUNDLE_RISKS,
            working_well: data::WORKING_WELL,
            action_plan: data::ACTION_PLAN,
            timeline: data::TIMELINE,
        }
    }

    pub fn document_title(&self) -> String {
        format!("SEO Indexing Analysis: {}", self.site)
    }
}

const HEADER_ROW: isize = 0;

fn cell(text: &str, style: &str) -> Cell {
    Cell::new(escape_markup(text), style)
}

fn header_cells(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| cell(title, "TableCellBold"))
        .collect()
}

fn inches(widths: &[f64]) -> Vec<Pt> {
    widths.iter().map(|width| Pt::inch(*width)).collect()
}

/// A findings table: blue header row, thin grid, banded data rows.
fn findings_table(
    name: &str,
    widths: &[f64],
    header: &[&str],
    rows: Vec<Vec<Cell>>,
    padding: Insets,
    valign: Option<VerticalAlignment>,
) -> TableBlock {
    let table = TableBlock::new(name, inches(widths))
        .with_row(header_cells(header))
        .with_rows(rows)
        .with_rule(
            RuleKind::Background(theme::ACCENT_BLUE),
            CellRange::row(HEADER_ROW),
        )
        .with_rule(RuleKind::TextColor(theme::WHITE), CellRange::row(HEADER_ROW))
        .with_rule(
            RuleKind::Grid {
                width: Pt(0.4),
                color: theme::MID_GRAY,
            },
            CellRange::all(),
        )
        .with_rule(RuleKind::Padding(padding), CellRange::all());
    let table = match valign {
        Some(valign) => table.with_rule(RuleKind::VerticalAlign(valign), CellRange::all()),
        None => table,
    };
    table.with_rule(
        RuleKind::RowBands(vec![theme::WHITE, theme::LIGHT_GRAY]),
        CellRange::rows(1, -1),
    )
}

/// A single-column box with a tinted title row above a white body row.
fn callout_box(
    name: &str,
    title: Cell,
    body: Cell,
    title_background: Color,
    border: Color,
) -> TableBlock {
    TableBlock::new(name, vec![PageGeometry::default().body_width()])
        .with_row(vec![title])
        .with_row(vec![body])
        .with_rule(RuleKind::Background(title_background), CellRange::row(0))
        .with_rule(RuleKind::Background(theme::WHITE), CellRange::row(1))
        .with_rule(
            RuleKind::Box {
                width: Pt(1.5),
                color: border,
            },
            CellRange::all(),
        )
        .with_rule(
            RuleKind::Padding(Insets::symmetric(10.0, 14.0)),
            CellRange::all(),
        )
}

/// Status column colored by severity, each data row tinted to match.
fn scorecard_table(rows: &[ScorecardRow]) -> TableBlock {
    let mut table = TableBlock::new("scorecard", inches(&[1.6, 1.0, 3.9]))
        .with_row(header_cells(&["Category", "Status", "Impact"]))
        .with_rows(rows.iter().map(|row| {
            vec![
                cell(row.category, "TableCell"),
                cell(row.status, severity_cell_style(row.status)),
                cell(row.impact, "TableCell"),
            ]
        }))
        .with_rule(
            RuleKind::Background(theme::ACCENT_BLUE),
            CellRange::row(HEADER_ROW),
        )
        .with_rule(RuleKind::TextColor(theme::WHITE), CellRange::row(HEADER_ROW));

    for (index, row) in rows.iter().enumerate() {
        let row_index = isize::try_from(index + 1).unwrap_or(isize::MAX);
        table = table.with_rule(
            RuleKind::Background(severity_tint(row.status)),
            CellRange::row(row_index),
        );
    }

    table
        .with_rule(
            RuleKind::Grid {
                width: Pt(0.5),
                color: theme::MID_GRAY,
            },
            CellRange::all(),
        )
        .with_rule(
            RuleKind::Padding(Insets::symmetric(6.0, 8.0)),
            CellRange::all(),
        )
        .with_rule(
            RuleKind::VerticalAlign(VerticalAlignment::Middle),
            CellRange::all(),
        )
}

fn url_rows(urls: &[CrawledUrl]) -> Vec<Vec<Cell>> {
    urls.iter()
        .map(|url| match url.crawled {
            Some(date) => vec![cell(url.url, "TableCell"), cell(date, "TableCell")],
            None => vec![cell(url.url, "TableCell"), cell("N/A", "TableCellRed")],
        })
        .collect()
}

/// Anchor, heading and the colored rule that open every numbered section.
fn open_section(
    story: &mut Story,
    number: u8,
    title: &str,
    severity: Option<&str>,
    rule_color: Color,
) {
    story.push(Block::anchor(format!("{}. {}", number, title)));
    let heading = match severity {
        Some(label) => format!(
            "{}. {}: {}",
            number,
            severity_label(label),
            escape_markup(title)
        ),
        None => format!("{}. {}", number, escape_markup(title)),
    };
    story.push(Block::paragraph(heading, "SectionHead"));
    story.push(Block::rule(1.0, rule_color));
    story.push(Block::spacer(8.0));
}

fn body(text: impl Into<String>) -> Block {
    Block::paragraph(text, "BodyText")
}

fn title_page(report: &AuditReport, story: &mut Story) {
    story.push(Block::spacer(80.0));
    story.push(Block::paragraph("Google Search Console", "ReportTitle"));
    story.push(Block::paragraph("Indexing Analysis Report", "ReportTitle"));
    story.push(Block::spacer(8.0));
    story.push(Block::rule(3.0, theme::ACCENT_BLUE));
    story.push(Block::spacer(12.0));
    story.push(Block::paragraph(
        format!("Site: **{}**", escape_markup(report.site)),
        "ReportSubtitle",
    ));
    story.push(Block::paragraph(
        format!("Date: {}", escape_markup(report.report_date)),
        "ReportSubtitle",
    ));
    story.push(Block::paragraph(
        format!("Framework: {}", escape_markup(report.framework)),
        "ReportSubtitle",
    ));
    story.push(Block::spacer(30.0));

    let summary = format!(
        "Google Search Console reports **{} pages not indexed** and only **{} pages indexed** \
         with just **{} total clicks**. The biggest category is **'Discovered - currently not \
         indexed' ({} pages)** where Google found your pages via the sitemap but decided not to \
         crawl or index them. The root cause is a **critical canonical URL misconfiguration** in \
         layout.tsx that tells Google every page is a duplicate of the homepage. Additional \
         issues include 5 redirect pages, 3 broken 404s from your old site structure, and 1 \
         canonical conflict.",
        report.pages_not_indexed,
        report.pages_indexed,
        report.total_clicks,
        report.discovered.len(),
    );
    story.push(Block::anchor("Executive Summary"));
    story.push(Block::Table(callout_box(
        "executive summary",
        Cell::new("EXECUTIVE SUMMARY", "BoxTitle"),
        Cell::new(summary, "BodyText"),
        theme::SUMMARY_BG,
        theme::ACCENT_BLUE,
    )));
    story.push(Block::spacer(20.0));
    story.push(Block::Table(scorecard_table(report.scorecard)));
    story.push(Block::page_break());
}

fn canonical_section(report: &AuditReport, story: &mut Story) {
    open_section(
        story,
        1,
        "Canonical URL Misconfiguration",
        Some("CRITICAL"),
        theme::ACCENT_RED,
    );
    story.push(body(format!(
        "**What's happening:** Almost every page on your site has a \
         [color={}]{{<link rel='canonical'>}} tag pointing to **https://avinashsangle.com/** (the \
         homepage), instead of pointing to its own URL. This tells Google that all these pages \
         are duplicates of the homepage, so Google ignores them.",
        theme::hex(theme::ACCENT_RED)
    )));
    story.push(Block::spacer(6.0));

    let rows = report
        .canonicals
        .iter()
        .map(|row| {
            let status = row.status();
            let current_style = if row.is_wrong() {
                "TableCellRed"
            } else if row.current != data::HOMEPAGE {
                "TableCellGreen"
            } else {
                "TableCell"
            };
            vec![
                cell(row.page, "TableCell"),
                cell(row.current, current_style),
                cell(row.correct, "TableCell"),
                cell(status, if row.is_wrong() { "TableCellRed" } else { "TableCellGreen" }),
            ]
        })
        .collect();
    story.push(Block::Table(findings_table(
        "canonical URLs",
        &[1.55, 1.7, 1.7, 0.7],
        &["Page", "Current Canonical", "Correct Canonical", "Status"],
        rows,
        Insets::symmetric(4.0, 6.0),
        Some(VerticalAlignment::Middle),
    )));
    story.push(Block::spacer(12.0));

    let wrong = report.canonicals.iter().filter(|row| row.is_wrong()).count();
    story.push(body(format!(
        "**Result:** {} out of {} pages have incorrect canonicals. Only the homepage and \
         /blog/clawdbot-guide/ are correct.",
        wrong,
        report.canonicals.len()
    )));

    story.push(Block::spacer(10.0));
    story.push(Block::paragraph("Root Cause", "SubSection"));
    story.push(body(
        "In **src/app/layout.tsx** (line 70-72), the root layout sets a global canonical to '/' \
         for ALL pages:",
    ));
    story.push(Block::preformatted(
        "alternates: { canonical: \"/\" }",
        "CodeBlock",
    ));
    story.push(body(
        "Since Next.js resolves this relative to metadataBase (https://avinashsangle.com), every \
         page gets canonical = https://avinashsangle.com/. Only the clawdbot-guide page overrides \
         this with its own canonical. All other pages inherit the wrong value.",
    ));

    story.push(Block::spacer(10.0));
    story.push(Block::paragraph("The Fix", "SubSection"));
    story.push(body(
        "**Option A (Recommended):** Remove the global canonical from layout.tsx entirely:",
    ));
    story.push(Block::preformatted(
        "// In src/app/layout.tsx - DELETE these lines:\n  alternates: {\n    canonical: \"/\",\n  },",
        "CodeBlock",
    ));
    story.push(body(
        "Next.js with metadataBase will auto-generate the correct canonical for each route.",
    ));
    story.push(Block::spacer(4.0));
    story.push(body(
        "**Option B:** Add explicit canonical overrides in each page's metadata export:",
    ));
    story.push(Block::preformatted(
        "// Example: src/app/blog/page.tsx\nexport const metadata: Metadata = {\n  ...\n  alternates: {\n    canonical: \"/blog/\",\n  },\n};",
        "CodeBlock",
    ));
    story.push(Block::page_break());
}

fn indexing_section(report: &AuditReport, story: &mut Story) {
    open_section(
        story,
        2,
        "Google Search Console: Full Indexing Breakdown",
        None,
        theme::ACCENT_RED,
    );
    story.push(body(format!(
        "Data pulled directly from your GSC account (last updated {}). GSC shows **{} \
         not-indexed pages** across {} different reasons and **{} indexed pages**:",
        data::DATA_UPDATED,
        report.pages_not_indexed,
        report.indexing_reasons.len(),
        report.pages_indexed
    )));
    story.push(Block::spacer(4.0));

    let rows = report
        .indexing_reasons
        .iter()
        .map(|reason| {
            vec![
                cell(reason.reason, "TableCell"),
                cell(reason.source, "TableCell"),
                cell(&reason.pages.to_string(), reason.pages_style),
                cell(reason.severity, priority_cell_style(reason.severity)),
            ]
        })
        .collect();
    story.push(Block::Table(findings_table(
        "indexing reasons",
        &[2.8, 1.1, 0.7, 0.9],
        &["Reason", "Source", "Pages", "Severity"],
        rows,
        Insets::symmetric(5.0, 8.0),
        None,
    )));
    story.push(Block::spacer(12.0));

    story.push(Block::paragraph(
        format!(
            "2a. 'Discovered - currently not indexed' ({} pages)",
            report.discovered.len()
        ),
        "SubSection",
    ));
    story.push(body(
        "Google found these URLs in your sitemap but has **not even crawled them yet** (Last \
         Crawled: N/A). This strongly correlates with the canonical issue - Google may be \
         deprioritizing these pages because their canonical tag points to the homepage.",
    ));
    story.push(Block::Table(findings_table(
        "discovered URLs",
        &[4.5, 1.2],
        &["URL", "Last Crawled"],
        url_rows(report.discovered),
        Insets::symmetric(3.0, 6.0),
        None,
    )));
    story.push(Block::spacer(10.0));

    story.push(Block::paragraph(
        format!("2b. 'Page with redirect' ({} pages)", report.redirects.len()),
        "SubSection",
    ));
    story.push(body(
        "These are old URLs or variant domains that redirect. This is **expected behavior** for \
         the domain variants (http/www redirecting to https). The clawdbot-guide without trailing \
         slash redirects to the trailing slash version. The old /make-twitter-oauth/ URL is from a \
         previous site structure.",
    ));
    story.push(Block::Table(findings_table(
        "redirects",
        &[4.2, 1.2],
        &["URL", "Crawled"],
        url_rows(report.redirects),
        Insets::symmetric(4.0, 6.0),
        None,
    )));
    story.push(Block::spacer(10.0));

    story.push(Block::paragraph(
        format!("2c. 'Not found - 404' ({} pages)", report.not_found.len()),
        "SubSection",
    ));
    story.push(body(
        "These are **old URLs from your previous site structure** (plain .html files) that no \
         longer exist after the Next.js migration. Google still remembers them and keeps checking.",
    ));
    story.push(Block::Table(findings_table(
        "not found",
        &[4.5, 1.2],
        &["URL", "Crawled"],
        url_rows(report.not_found),
        Insets::symmetric(4.0, 6.0),
        None,
    )));
    story.push(body(
        "**Fix:** Add 301 redirects from old URLs to new ones: /blog.html -> /blog/, \
         /project-aws-ec2-agent.html -> /projects/aws-ec2-agent/. The Cloudflare email protection \
         URL can be ignored.",
    ));
    story.push(Block::spacer(14.0));
}

fn sitemap_section(story: &mut Story) {
    open_section(
        story,
        3,
        "Showcase Page Missing from Sitemap",
        Some("HIGH"),
        theme::ACCENT_ORANGE,
    );
    story.push(body(
        "The **/showcase/** page exists as a fully rendered HTML page and is crawlable (robots: \
         index, follow), but it is **not included in sitemap.xml**. Additionally, its title has a \
         duplication bug: \"UI Component Showcase | Avinash Sangle | Avinash Sangle\" (the name \
         appears twice due to the title template).",
    ));
    story.push(body(
        "**Fix:** Either add /showcase/ to the sitemap generation, or if it's an internal/dev \
         page, set `robots: { index: false }` in its metadata to prevent crawling.",
    ));
    story.push(Block::spacer(14.0));
}

fn bundle_section(report: &AuditReport, story: &mut Story) {
    open_section(
        story,
        4,
        "Large JavaScript Bundles",
        Some("MEDIUM"),
        theme::ACCENT_YELLOW,
    );
    story.push(body(
        "The site ships approximately **3.2 MB of JavaScript** across multiple chunks. The three \
         largest chunks are each ~549 KB (likely React DOM, Recharts, and Radix UI). While the \
         site is statically exported (so core content is in HTML), large JS bundles can:",
    ));
    story.extend(
        report
            .bundle_risks
            .iter()
            .map(|risk| Block::paragraph(format!("- {}", escape_markup(risk)), "BulletItem")),
    );
    story.push(Block::spacer(6.0));
    story.push(body(
        "**Fix:** Consider code-splitting more aggressively, lazy-loading Recharts and Radix UI \
         components, and auditing unused dependencies. Run `npx @next/bundle-analyzer` to identify \
         the largest contributors.",
    ));
    story.push(Block::page_break());
}

fn working_well_section(report: &AuditReport, story: &mut Story) {
    open_section(story, 5, "What's Working Well", None, theme::ACCENT_GREEN);
    story.extend(report.working_well.iter().map(|item| {
        Block::paragraph(
            format!(
                "**{}:** {}",
                escape_markup(item.topic),
                escape_markup(item.detail)
            ),
            "BulletItem",
        )
    }));
    story.push(Block::spacer(14.0));
}

fn action_plan_section(report: &AuditReport, story: &mut Story) {
    open_section(
        story,
        6,
        "Action Plan (Priority Order)",
        None,
        theme::ACCENT_BLUE,
    );

    let rows = report
        .action_plan
        .iter()
        .map(|item| {
            vec![
                cell(&item.rank.to_string(), "TableCell"),
                cell(item.priority, priority_cell_style(item.priority)),
                cell(item.action, "TableCellBold"),
                cell(item.details, "TableCell"),
                cell(item.effort, "TableCell"),
            ]
        })
        .collect();
    story.push(Block::Table(findings_table(
        "action plan",
        &[0.3, 0.85, 1.4, 3.0, 0.7],
        &["#", "Priority", "Action", "Details", "Time"],
        rows,
        Insets::symmetric(5.0, 6.0),
        Some(VerticalAlignment::Top),
    )));
    story.push(Block::spacer(20.0));

    let timeline = report
        .timeline
        .iter()
        .map(|entry| {
            format!(
                "**{}:** {}",
                escape_markup(entry.period),
                escape_markup(entry.outcome)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    story.push(Block::Table(callout_box(
        "expected timeline",
        Cell::new("EXPECTED TIMELINE AFTER FIXES", "CalloutTitle"),
        Cell::new(timeline, "BodyText"),
        theme::OK_BG,
        theme::ACCENT_GREEN,
    )));
}

/// Builds the complete story for `report`, title page first and the action plan last.
pub fn build_story(report: &AuditReport) -> Story {
    let mut story = Story::new();
    title_page(report, &mut story);
    canonical_section(report, &mut story);
    indexing_section(report, &mut story);
    sitemap_section(&mut story);
    bundle_section(report, &mut story);
    working_well_section(report, &mut story);
    action_plan_section(report, &mut story);
    story
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::{parse_markup, plain_text};
    use crate::styles::StyleRegistry;
    use crate::validate::lint_all;

    fn story() -> Story {
        build_story(&AuditReport::seo_indexing())
    }

    fn table<'a>(story: &'a Story, name: &str) -> &'a TableBlock {
        story
            .tables()
            .find(|table| table.name() == name)
            .unwrap_or_else(|| panic!("table {name} is part of the story"))
    }

    #[test]
    fn report_story_lints_clean() {
        let sheet = StyleRegistry::report_sheet().expect("sheet builds");
        let problems = lint_all(&story(), &sheet);
        assert!(problems.is_empty(), "unexpected problems: {problems:?}");
    }

    #[test]
    fn sections_appear_in_report_order() {
        let story = story();
        assert_eq!(
            story.section_titles(),
            vec![
                "Executive Summary",
                "1. Canonical URL Misconfiguration",
                "2. Google Search Console: Full Indexing Breakdown",
                "3. Showcase Page Missing from Sitemap",
                "4. Large JavaScript Bundles",
                "5. What's Working Well",
                "6. Action Plan (Priority Order)",
            ]
        );
    }

    #[test]
    fn story_is_identical_across_builds() {
        assert_eq!(story(), story());
    }

    #[test]
    fn explicit_page_breaks_follow_title_canonicals_and_bundles() {
        let breaks = story()
            .blocks()
            .iter()
            .filter(|block| matches!(block, Block::PageBreak))
            .count();
        assert_eq!(breaks, 3);
    }

    #[test]
    fn scorecard_rows_are_tinted_by_severity() {
        let story = story();
        let styling = table(&story, "scorecard")
            .resolve_styling()
            .expect("scorecard rules are in range");
        assert_eq!(styling.cell(0, 0).background, Some(theme::ACCENT_BLUE));
        assert_eq!(styling.cell(0, 0).text_color, Some(theme::WHITE));
        assert_eq!(styling.cell(1, 1).background, Some(theme::CRITICAL_BG));
        assert_eq!(styling.cell(2, 3).background, Some(theme::OK_BG));
        assert_eq!(styling.cell(0, 8).background, Some(theme::MEDIUM_BG));
        assert_eq!(styling.cell(0, 9).background, Some(theme::HIGH_BG));
        assert_eq!(styling.cell(1, 5).valign, VerticalAlignment::Middle);
    }

    #[test]
    fn findings_tables_band_their_data_rows() {
        let story = story();
        let canonicals = table(&story, "canonical URLs");
        let styling = canonicals.resolve_styling().expect("rules in range");
        for row in 1..canonicals.row_count() {
            let expected = if row % 2 == 1 {
                theme::WHITE
            } else {
                theme::LIGHT_GRAY
            };
            assert_eq!(styling.cell(0, row).background, Some(expected), "row {row}");
        }
    }

    #[test]
    fn medium_findings_print_bold_and_counts_keep_their_own_color() {
        let story = story();
        let reasons = table(&story, "indexing reasons");
        let counts: Vec<&str> = reasons.rows()[1..].iter().map(|row| row[2].style()).collect();
        assert_eq!(
            counts,
            vec![
                "TableCellRed",
                "TableCellRed",
                "TableCellOrange",
                "TableCellRed",
                "TableCellOrange",
                "TableCellBold",
            ]
        );
        let severities: Vec<&str> = reasons.rows()[1..].iter().map(|row| row[3].style()).collect();
        assert_eq!(
            severities,
            vec![
                "TableCellRed",
                "TableCellOrange",
                "TableCellOrange",
                "TableCellRed",
                "TableCellBold",
                "TableCellBold",
            ]
        );

        let plan = table(&story, "action plan");
        for row in &plan.rows()[1..] {
            let expected = match row[1].text() {
                "CRITICAL" => "TableCellRed",
                "HIGH" => "TableCellOrange",
                _ => "TableCellBold",
            };
            assert_eq!(row[1].style(), expected, "priority {}", row[1].text());
        }
        assert!(plan.rows().iter().any(|row| row[1].text() == "MEDIUM"));
    }

    #[test]
    fn wrong_canonicals_print_in_red() {
        let story = story();
        let canonicals = table(&story, "canonical URLs");
        let blog = &canonicals.rows()[2];
        assert_eq!(blog[1].style(), "TableCellRed");
        assert_eq!(blog[3].text(), "WRONG");
        let guide = &canonicals.rows()[3];
        assert_eq!(guide[1].style(), "TableCellGreen");
    }

    #[test]
    fn literal_braces_survive_cell_markup() {
        let story = story();
        let plan = table(&story, "action plan");
        let spans = parse_markup(plan.rows()[1][3].text()).expect("escaped cell parses");
        assert!(plain_text(&spans).starts_with("Remove 'alternates: { canonical: \"/\" }'"));
    }

    #[test]
    fn headings_lead_with_a_colored_severity_label() {
        let story = story();
        let heading = story
            .blocks()
            .iter()
            .find_map(|block| match block {
                Block::Paragraph(p) if p.style() == "SectionHead" => Some(p.text()),
                _ => None,
            })
            .expect("first section heading");
        let spans = parse_markup(heading).expect("heading parses");
        assert_eq!(
            plain_text(&spans),
            "1. CRITICAL: Canonical URL Misconfiguration"
        );
        assert_eq!(spans[1].text(), "CRITICAL");
        assert_eq!(spans[1].color(), Some(theme::ACCENT_RED));
        assert_eq!(spans[2].color(), None);
    }
}
