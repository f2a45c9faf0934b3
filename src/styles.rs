//! Named paragraph styles and their inheritance.
//!
//! A style is registered once under a unique name as a [`StyleAttrs`] record of optional
//! attributes. Registration immediately resolves the record against its base style (or the
//! built-in defaults) into a [`ResolvedStyle`] in which every attribute is concrete, so lookups
//! never need to walk an inheritance chain.

use std::collections::BTreeMap;

use genpdf::style::Color;

use crate::error::ReportError;
use crate::model::HorizontalAlignment;
use crate::theme;
use crate::units::Pt;

/// Typeface used by a style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontFace {
    /// The proportional document family.
    #[default]
    Sans,
    /// The monospace family used for code.
    Mono,
}

/// Padding around a block of text or a table cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Insets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top: Pt(top),
            right: Pt(right),
            bottom: Pt(bottom),
            left: Pt(left),
        }
    }

    /// Uses `vertical` for top/bottom and `horizontal` for left/right.
    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    pub fn uniform(value: f64) -> Self {
        Self::symmetric(value, value)
    }
}

/// A partially specified style. Unset fields are inherited from the base style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleAttrs {
    pub face: Option<FontFace>,
    pub size: Option<u8>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
    pub alignment: Option<HorizontalAlignment>,
    pub leading: Option<Pt>,
    pub space_before: Option<Pt>,
    pub space_after: Option<Pt>,
    pub background: Option<Option<Color>>,
    pub padding: Option<Insets>,
    pub left_indent: Option<Pt>,
}

impl StyleAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn face(mut self, face: FontFace) -> Self {
        self.face = Some(face);
        self
    }

    pub fn size(mut self, size: u8) -> Self {
        self.size = Some(size);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Sets the baseline-to-baseline distance in points.
    pub fn leading(mut self, leading: f64) -> Self {
        self.leading = Some(Pt(leading));
        self
    }

    pub fn space_before(mut self, space: f64) -> Self {
        self.space_before = Some(Pt(space));
        self
    }

    pub fn space_after(mut self, space: f64) -> Self {
        self.space_after = Some(Pt(space));
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(Some(color));
        self
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn left_indent(mut self, indent: f64) -> Self {
        self.left_indent = Some(Pt(indent));
        self
    }

    /// Fills every unset attribute from `base`.
    pub fn resolve(&self, name: &str, base: &ResolvedStyle) -> ResolvedStyle {
        let size = self.size.unwrap_or(base.size);
        // A new size without an explicit leading keeps the base's leading ratio.
        let leading = match (self.leading, self.size) {
            (Some(leading), _) => leading,
            (None, Some(size)) => Pt(base.leading.value() * f64::from(size) / f64::from(base.size)),
            (None, None) => base.leading,
        };
        ResolvedStyle {
            name: name.to_owned(),
            face: self.face.unwrap_or(base.face),
            size,
            bold: self.bold.unwrap_or(base.bold),
            italic: self.italic.unwrap_or(base.italic),
            color: self.color.unwrap_or(base.color),
            alignment: self.alignment.unwrap_or(base.alignment),
            leading,
            space_before: self.space_before.unwrap_or(base.space_before),
            space_after: self.space_after.unwrap_or(base.space_after),
            background: self.background.unwrap_or(base.background),
            padding: self.padding.unwrap_or(base.padding),
            left_indent: self.left_indent.unwrap_or(base.left_indent),
        }
    }
}

/// A fully resolved style; every attribute has a value.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub name: String,
    pub face: FontFace,
    pub size: u8,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub alignment: HorizontalAlignment,
    pub leading: Pt,
    pub space_before: Pt,
    pub space_after: Pt,
    pub background: Option<Color>,
    pub padding: Insets,
    pub left_indent: Pt,
}

impl ResolvedStyle {
    /// The attributes every root style starts from.
    pub fn defaults() -> Self {
        Self {
            name: String::new(),
            face: FontFace::Sans,
            size: 10,
            bold: false,
            italic: false,
            color: Color::Rgb(0, 0, 0),
            alignment: HorizontalAlignment::Left,
            leading: Pt(12.0),
            space_before: Pt(0.0),
            space_after: Pt(0.0),
            background: None,
            padding: Insets::default(),
            left_indent: Pt(0.0),
        }
    }

    /// Line spacing factor handed to `genpdf`, derived from leading and size.
    pub fn line_spacing(&self) -> f64 {
        if self.size == 0 {
            1.0
        } else {
            (self.leading.value() / f64::from(self.size)).max(0.5)
        }
    }

    /// Returns a copy with the text color replaced.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }
}

/// Registry mapping style names to resolved styles.
#[derive(Clone, Debug, Default)]
pub struct StyleRegistry {
    styles: BTreeMap<String, ResolvedStyle>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, inheriting unset attributes from `base` or from
    /// [`ResolvedStyle::defaults`] when no base is given.
    pub fn register(
        &mut self,
        name: &str,
        attrs: StyleAttrs,
        base: Option<&str>,
    ) -> Result<(), ReportError> {
        if self.styles.contains_key(name) {
            return Err(ReportError::DuplicateStyle(name.to_owned()));
        }
        let resolved = match base {
            Some(base) => attrs.resolve(name, self.lookup(base)?),
            None => attrs.resolve(name, &ResolvedStyle::defaults()),
        };
        self.styles.insert(name.to_owned(), resolved);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&ResolvedStyle, ReportError> {
        self.styles
            .get(name)
            .ok_or_else(|| ReportError::StyleNotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Base sheet: `Normal`, `Title`, `Heading1` and `Heading2`.
    pub fn base_sheet() -> Result<Self, ReportError> {
        let mut sheet = Self::new();
        sheet.register("Normal", StyleAttrs::new().size(10).leading(12.0), None)?;
        sheet.register(
            "Title",
            StyleAttrs::new()
                .size(18)
                .leading(22.0)
                .bold(true)
                .alignment(HorizontalAlignment::Center)
                .space_after(6.0),
            Some("Normal"),
        )?;
        sheet.register(
            "Heading1",
            StyleAttrs::new()
                .size(18)
                .leading(22.0)
                .bold(true)
                .space_before(12.0)
                .space_after(6.0),
            Some("Normal"),
        )?;
        sheet.register(
            "Heading2",
            StyleAttrs::new()
                .size(14)
                .leading(18.0)
                .bold(true)
                .space_before(12.0)
                .space_after(6.0),
            Some("Normal"),
        )?;
        Ok(sheet)
    }

    /// The base sheet extended with every style the audit report references.
    pub fn report_sheet() -> Result<Self, ReportError> {
        let mut sheet = Self::base_sheet()?;
        let left = HorizontalAlignment::Left;

        sheet.register(
            "ReportTitle",
            StyleAttrs::new()
                .size(26)
                .leading(32.0)
                .color(theme::ACCENT_BLUE)
                .space_after(6.0)
                .alignment(left),
            Some("Title"),
        )?;
        sheet.register(
            "ReportSubtitle",
            StyleAttrs::new()
                .size(12)
                .color(theme::TEXT_MEDIUM)
                .space_after(20.0)
                .alignment(left),
            Some("Normal"),
        )?;
        sheet.register(
            "SectionHead",
            StyleAttrs::new()
                .size(16)
                .leading(20.0)
                .color(theme::ACCENT_BLUE)
                .space_before(18.0)
                .space_after(10.0),
            Some("Heading1"),
        )?;
        sheet.register(
            "SubSection",
            StyleAttrs::new()
                .size(13)
                .leading(16.0)
                .color(theme::TEXT_DARK)
                .space_before(14.0)
                .space_after(8.0),
            Some("Heading2"),
        )?;

        let body = StyleAttrs::new()
            .size(10)
            .leading(14.0)
            .color(theme::TEXT_DARK);
        sheet.register("BodyText", body.clone().space_after(8.0), Some("Normal"))?;
        sheet.register(
            "BodyBold",
            body.clone().bold(true).space_after(4.0),
            Some("Normal"),
        )?;
        sheet.register(
            "BulletItem",
            body.space_after(4.0).left_indent(20.0),
            Some("Normal"),
        )?;
        sheet.register(
            "CodeBlock",
            StyleAttrs::new()
                .face(FontFace::Mono)
                .size(9)
                .leading(12.0)
                .color(theme::CODE_TEXT)
                .left_indent(16.0)
                .space_after(8.0)
                .background(theme::LIGHT_GRAY)
                .padding(Insets::uniform(6.0)),
            Some("Normal"),
        )?;

        let label = StyleAttrs::new().size(10).bold(true);
        sheet.register(
            "CriticalLabel",
            label.clone().color(theme::ACCENT_RED),
            Some("Normal"),
        )?;
        sheet.register("OkLabel", label.color(theme::ACCENT_GREEN), Some("Normal"))?;
        sheet.register(
            "SmallNote",
            StyleAttrs::new()
                .size(8)
                .leading(10.0)
                .italic(true)
                .color(theme::TEXT_MEDIUM)
                .space_after(6.0),
            Some("Normal"),
        )?;
        sheet.register(
            "BoxTitle",
            StyleAttrs::new()
                .size(12)
                .leading(15.0)
                .bold(true)
                .color(theme::ACCENT_BLUE),
            Some("Normal"),
        )?;
        sheet.register(
            "CalloutTitle",
            StyleAttrs::new().size(11).leading(14.0),
            Some("BoxTitle"),
        )?;

        let cell = StyleAttrs::new()
            .size(9)
            .leading(12.0)
            .color(theme::TEXT_DARK);
        sheet.register("TableCell", cell, Some("Normal"))?;
        sheet.register(
            "TableCellBold",
            StyleAttrs::new().bold(true),
            Some("TableCell"),
        )?;
        sheet.register(
            "TableCellRed",
            StyleAttrs::new().color(theme::ACCENT_RED),
            Some("TableCellBold"),
        )?;
        sheet.register(
            "TableCellOrange",
            StyleAttrs::new().color(theme::ACCENT_ORANGE),
            Some("TableCellBold"),
        )?;
        sheet.register(
            "TableCellGreen",
            StyleAttrs::new().color(theme::ACCENT_GREEN),
            Some("TableCellBold"),
        )?;

        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_inherits_unset_attributes_from_base() {
        let sheet = StyleRegistry::report_sheet().expect("sheet builds");
        let red = sheet.lookup("TableCellRed").expect("registered");
        assert_eq!(red.size, 9);
        assert!(red.bold);
        assert_eq!(red.color, theme::ACCENT_RED);
        assert_eq!(red.leading, Pt(12.0));
    }

    #[test]
    fn lookup_of_unknown_style_fails() {
        let sheet = StyleRegistry::base_sheet().expect("sheet builds");
        let err = sheet.lookup("Missing").unwrap_err();
        assert!(matches!(err, ReportError::StyleNotFound(name) if name == "Missing"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut sheet = StyleRegistry::new();
        sheet
            .register("Body", StyleAttrs::new().size(10), None)
            .expect("first registration");
        let err = sheet
            .register("Body", StyleAttrs::new().size(12), None)
            .unwrap_err();
        assert!(matches!(err, ReportError::DuplicateStyle(name) if name == "Body"));
        assert_eq!(sheet.lookup("Body").expect("kept").size, 10);
    }

    #[test]
    fn unknown_base_is_reported_as_missing_style() {
        let mut sheet = StyleRegistry::new();
        let err = sheet
            .register("Child", StyleAttrs::new(), Some("Parent"))
            .unwrap_err();
        assert!(matches!(err, ReportError::StyleNotFound(name) if name == "Parent"));
        assert!(!sheet.contains("Child"));
    }

    #[test]
    fn resizing_without_leading_scales_leading() {
        let mut sheet = StyleRegistry::new();
        sheet
            .register("Base", StyleAttrs::new().size(10).leading(14.0), None)
            .expect("base");
        sheet
            .register("Big", StyleAttrs::new().size(20), Some("Base"))
            .expect("big");
        assert_eq!(sheet.lookup("Big").expect("big").leading, Pt(28.0));
    }

    #[test]
    fn background_can_be_inherited() {
        let mut sheet = StyleRegistry::new();
        sheet
            .register("Shaded", StyleAttrs::new().background(theme::LIGHT_GRAY), None)
            .expect("shaded");
        sheet
            .register("Child", StyleAttrs::new().size(8), Some("Shaded"))
            .expect("child");
        assert_eq!(
            sheet.lookup("Child").expect("child").background,
            Some(theme::LIGHT_GRAY)
        );
    }
}
