//! Report palette and the severity-to-color mapping.

use genpdf::style::Color;

use crate::richtext::escape_markup;

pub const ACCENT_BLUE: Color = Color::Rgb(0x0f, 0x34, 0x60);
pub const ACCENT_RED: Color = Color::Rgb(0xe9, 0x45, 0x60);
pub const ACCENT_GREEN: Color = Color::Rgb(0x16, 0xc7, 0x9a);
pub const ACCENT_ORANGE: Color = Color::Rgb(0xf5, 0xa6, 0x23);
pub const ACCENT_YELLOW: Color = Color::Rgb(0xff, 0xd7, 0x00);
pub const LIGHT_GRAY: Color = Color::Rgb(0xf5, 0xf5, 0xf5);
pub const MID_GRAY: Color = Color::Rgb(0xe0, 0xe0, 0xe0);
pub const TEXT_DARK: Color = Color::Rgb(0x2c, 0x2c, 0x2c);
pub const TEXT_MEDIUM: Color = Color::Rgb(0x55, 0x55, 0x55);
pub const CODE_TEXT: Color = Color::Rgb(0x33, 0x33, 0x33);
pub const SUMMARY_BG: Color = Color::Rgb(0xe8, 0xee, 0xf7);
pub const CRITICAL_BG: Color = Color::Rgb(0xfd, 0xec, 0xea);
pub const HIGH_BG: Color = Color::Rgb(0xff, 0xf3, 0xe0);
pub const MEDIUM_BG: Color = Color::Rgb(0xff, 0xfd, 0xe7);
pub const OK_BG: Color = Color::Rgb(0xe8, 0xf5, 0xe9);
pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);

/// Color used for any severity label without a dedicated mapping.
pub const NEUTRAL: Color = TEXT_MEDIUM;

/// Severity of a finding, as printed in the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Ok,
}

impl Severity {
    /// Parses an upper-case severity label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "CRITICAL" => Some(Self::Critical),
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "OK" => Some(Self::Ok),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Ok => "OK",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Critical => ACCENT_RED,
            Self::High => ACCENT_ORANGE,
            Self::Medium => ACCENT_YELLOW,
            Self::Ok => ACCENT_GREEN,
        }
    }

    /// Light background used for table rows carrying this severity.
    pub fn tint(self) -> Color {
        match self {
            Self::Critical => CRITICAL_BG,
            Self::High => HIGH_BG,
            Self::Medium => MEDIUM_BG,
            Self::Ok => OK_BG,
        }
    }
}

/// Maps a severity label to its accent color, falling back to [`NEUTRAL`] for unknown labels.
pub fn severity_color(label: &str) -> Color {
    Severity::from_label(label).map_or(NEUTRAL, Severity::color)
}

/// Maps a severity label to its row tint, falling back to white for unknown labels.
pub fn severity_tint(label: &str) -> Color {
    Severity::from_label(label).map_or(WHITE, Severity::tint)
}

/// Table cell style name used to print a severity label.
///
/// Yellow text is unreadable on white, so MEDIUM shares the orange cell style.
pub fn severity_cell_style(label: &str) -> &'static str {
    match Severity::from_label(label) {
        Some(Severity::Critical) => "TableCellRed",
        Some(Severity::High) | Some(Severity::Medium) => "TableCellOrange",
        Some(Severity::Ok) => "TableCellGreen",
        None => "TableCellBold",
    }
}

/// Cell style for severity and priority columns of findings tables.
///
/// Only CRITICAL and HIGH are colored there. Every other label, MEDIUM included, is plain bold.
pub fn priority_cell_style(label: &str) -> &'static str {
    match Severity::from_label(label) {
        Some(Severity::Critical) => "TableCellRed",
        Some(Severity::High) => "TableCellOrange",
        _ => "TableCellBold",
    }
}

/// Returns inline markup rendering `LABEL` in bold, in the severity's color.
pub fn severity_label(label: &str) -> String {
    format!(
        "[color={}]{{**{}**}}",
        hex(severity_color(label)),
        escape_markup(label)
    )
}

/// Formats a palette color as `#rrggbb`. Non-RGB colors format as [`NEUTRAL`].
pub fn hex(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02x}{:02x}{:02x}", r, g, b),
        _ => hex(NEUTRAL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::parse_markup;

    #[test]
    fn severity_mapping_is_total() {
        assert_eq!(severity_color("CRITICAL"), ACCENT_RED);
        assert_eq!(severity_color("HIGH"), ACCENT_ORANGE);
        assert_eq!(severity_color("MEDIUM"), ACCENT_YELLOW);
        assert_eq!(severity_color("OK"), ACCENT_GREEN);
        for other in ["LOW", "", "critical", "WRONG", "N/A"] {
            assert_eq!(severity_color(other), NEUTRAL, "label {other:?}");
        }
    }

    #[test]
    fn unknown_severity_rows_are_not_tinted() {
        assert_eq!(severity_tint("CRITICAL"), CRITICAL_BG);
        assert_eq!(severity_tint("LOW"), WHITE);
    }

    #[test]
    fn findings_tables_color_only_critical_and_high() {
        assert_eq!(priority_cell_style("CRITICAL"), "TableCellRed");
        assert_eq!(priority_cell_style("HIGH"), "TableCellOrange");
        assert_eq!(priority_cell_style("MEDIUM"), "TableCellBold");
        assert_eq!(priority_cell_style("LOW"), "TableCellBold");
        assert_eq!(severity_cell_style("MEDIUM"), "TableCellOrange");
    }

    #[test]
    fn severity_label_colors_only_the_label() {
        let spans = parse_markup(&format!("1. {}: Title", severity_label("CRITICAL")))
            .expect("label markup parses");
        let texts: Vec<&str> = spans.iter().map(|span| span.text()).collect();
        assert_eq!(texts, vec!["1. ", "CRITICAL", ": Title"]);
        assert_eq!(spans[1].color(), Some(ACCENT_RED));
        assert!(spans[1].is_bold());
        assert_eq!(spans[2].color(), None);
    }

    #[test]
    fn hex_formats_rgb() {
        assert_eq!(hex(ACCENT_RED), "#e94560");
    }
}
