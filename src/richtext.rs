//! Utilities for working with styled text fragments.
//!
//! Report prose is authored with a small markdown-inspired markup so that emphasis, inline code
//! and colored badges can live inside plain string literals. [`parse_markup`] turns that markup
//! into [`Span`]s which the layout code measures and prints with `genpdf`.

use std::fmt;

use genpdf::style::Color;

/// A slice of text together with inline style attributes.
///
/// Attributes set on a span are applied on top of the paragraph's resolved style: a span only
/// ever adds emphasis, switches to the monospace face, or overrides the color.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
    monospace: bool,
    color: Option<Color>,
}

impl Span {
    /// Creates a new span with the provided text and no styles applied.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text contained in this span.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span should be rendered in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span should be rendered in italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Returns whether the span should be rendered with the monospace face.
    pub fn is_monospace(&self) -> bool {
        self.monospace
    }

    /// Returns the configured color for the span, if any.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Sets the bold flag and returns the updated span.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Sets the italic flag and returns the updated span.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Sets the monospace flag and returns the updated span.
    pub fn with_monospace(mut self, monospace: bool) -> Self {
        self.monospace = monospace;
        self
    }

    /// Sets the span color and returns the updated span.
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Convenience shorthand that marks the span as bold.
    pub fn bold(self) -> Self {
        self.with_bold(true)
    }

    /// Convenience shorthand that marks the span as italic.
    pub fn italic(self) -> Self {
        self.with_italic(true)
    }

    /// Convenience shorthand that assigns a color to the span.
    pub fn colored(self, color: Color) -> Self {
        self.with_color(Some(color))
    }
}

/// Concatenates the text of all spans, dropping the styling.
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Escapes every marker character so `text` parses back as a single plain span.
pub fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '*' | '`' | '[' | ']' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the original input string where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the parsing error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, Default)]
struct StyleState {
    bold: bool,
    italic: bool,
    monospace: bool,
    color: Option<Color>,
}

impl StyleState {
    fn to_span(self, text: impl Into<String>) -> Span {
        Span {
            text: text.into(),
            bold: self.bold,
            italic: self.italic,
            monospace: self.monospace,
            color: self.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
    Code,
    Color,
}

impl Marker {
    fn closing_token(self) -> &'static str {
        match self {
            Marker::Bold => "**",
            Marker::Italic => "*",
            Marker::Code => "`",
            Marker::Color => "}",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Marker::Bold => "bold span",
            Marker::Italic => "italic span",
            Marker::Code => "code span",
            Marker::Color => "color span",
        }
    }
}

/// Parses a small markdown-inspired syntax into a list of [`Span`]s.
///
/// The supported constructs are:
///
/// - `**bold**` for bold text
/// - `*italic*` for italic text
/// - `` `code` `` for monospace text; markup is not interpreted inside code spans
/// - `[color=#RRGGBB]{text}` for colored text, where `RRGGBB` is a hexadecimal RGB value
/// - `\x` to print any of the marker characters `\ * ` [ ] { }` literally
///
/// The parser performs strict validation and returns [`ParseError`] with positional information for
/// malformed inputs.
pub fn parse_markup(input: &str) -> Result<Vec<Span>, ParseError> {
    let (spans, idx) = parse_inner(input, 0, StyleState::default(), None)?;
    debug_assert_eq!(idx, input.len());
    Ok(spans)
}

fn parse_inner(
    input: &str,
    mut index: usize,
    state: StyleState,
    closing_marker: Option<Marker>,
) -> Result<(Vec<Span>, usize), ParseError> {
    let mut spans = Vec::new();
    let mut buffer = String::new();

    while index < input.len() {
        let rest = &input[index..];

        if let Some(marker) = closing_marker {
            if rest.starts_with(marker.closing_token()) {
                flush_buffer(&mut buffer, &mut spans, state);
                index += marker.closing_token().len();
                return Ok((spans, index));
            }
        }

        if rest.starts_with('\\') {
            let escaped = rest[1..].chars().next().ok_or_else(|| {
                ParseError::new(index, "dangling escape character at end of input")
            })?;
            buffer.push(escaped);
            index += 1 + escaped.len_utf8();
            continue;
        }

        if rest.starts_with("**") {
            flush_buffer(&mut buffer, &mut spans, state);
            index += 2;
            let mut nested_state = state;
            nested_state.bold = true;
            let (nested, new_index) = parse_inner(input, index, nested_state, Some(Marker::Bold))?;
            spans.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with('*') {
            flush_buffer(&mut buffer, &mut spans, state);
            index += 1;
            let mut nested_state = state;
            nested_state.italic = true;
            let (nested, new_index) =
                parse_inner(input, index, nested_state, Some(Marker::Italic))?;
            spans.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with('`') {
            flush_buffer(&mut buffer, &mut spans, state);
            let start = index + 1;
            let end = input[start..]
                .find('`')
                .map(|offset| start + offset)
                .ok_or_else(|| {
                    ParseError::new(index, format!("unterminated {}", Marker::Code.description()))
                })?;
            let mut code_state = state;
            code_state.monospace = true;
            if end > start {
                spans.push(code_state.to_span(&input[start..end]));
            }
            index = end + Marker::Code.closing_token().len();
            continue;
        }

        if rest.starts_with("[color=") {
            let (color, after_directive) = parse_color_directive(input, index)?;
            flush_buffer(&mut buffer, &mut spans, state);
            let mut nested_state = state;
            nested_state.color = Some(color);
            index = after_directive;
            let (nested, new_index) = parse_inner(input, index, nested_state, Some(Marker::Color))?;
            spans.extend(nested);
            index = new_index;
            continue;
        }

        if rest.starts_with('}') {
            return Err(ParseError::new(
                index,
                "unexpected closing token `}` without matching opening `[color=...]`",
            ));
        }

        if rest.starts_with(']') {
            return Err(ParseError::new(index, "unexpected closing token `]`"));
        }

        if rest.starts_with('[') {
            return Err(ParseError::new(
                index,
                "unsupported directive; expected `[color=#RRGGBB]{...}` or an escaped `\\[`",
            ));
        }

        if let Some(ch) = rest.chars().next() {
            buffer.push(ch);
            index += ch.len_utf8();
        }
    }

    if let Some(marker) = closing_marker {
        Err(ParseError::new(
            index,
            format!("unterminated {}", marker.description()),
        ))
    } else {
        flush_buffer(&mut buffer, &mut spans, state);
        Ok((spans, index))
    }
}

fn flush_buffer(buffer: &mut String, spans: &mut Vec<Span>, state: StyleState) {
    if buffer.is_empty() {
        return;
    }
    spans.push(state.to_span(std::mem::take(buffer)));
}

fn parse_color_directive(input: &str, index: usize) -> Result<(Color, usize), ParseError> {
    const PREFIX: &str = "[color=";
    let start_hex = index + PREFIX.len();
    if !input[start_hex..].starts_with('#') {
        return Err(ParseError::new(
            start_hex,
            "expected `#` followed by a hexadecimal RGB value",
        ));
    }

    let hex_start = start_hex + 1;
    let hex_end = hex_start + 6;
    let hex = input.get(hex_start..hex_end).ok_or_else(|| {
        ParseError::new(
            hex_start,
            "incomplete color specification; expected 6 hexadecimal digits",
        )
    })?;

    let channel = |offset: usize| {
        u8::from_str_radix(&hex[offset..offset + 2], 16).map_err(|_| {
            ParseError::new(
                hex_start + offset,
                "invalid RGB specification; use hexadecimal digits only",
            )
        })
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseError::new(
            hex_start,
            "invalid RGB specification; use hexadecimal digits only",
        ));
    }
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);

    let bracket_index = hex_end;
    if !input[bracket_index..].starts_with(']') {
        return Err(ParseError::new(
            bracket_index,
            "expected `]` to close color directive",
        ));
    }

    let brace_index = bracket_index + 1;
    if !input[brace_index..].starts_with('{') {
        return Err(ParseError::new(
            brace_index,
            "expected `{` to start the colored text",
        ));
    }

    Ok((Color::Rgb(r, g, b), brace_index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_text() {
        let spans = parse_markup("Hello world").expect("parse succeeds");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Hello world");
        assert!(!spans[0].is_bold());
    }

    #[test]
    fn parse_nested_styles() {
        let spans = parse_markup("This is **very *cool***!").expect("parse succeeds");
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].text(), "This is ");
        assert!(!spans[0].is_bold());
        assert!(spans[1].is_bold());
        assert_eq!(spans[1].text(), "very ");
        assert!(spans[2].is_bold());
        assert!(spans[2].is_italic());
        assert_eq!(spans[2].text(), "cool");
        assert_eq!(spans[3].text(), "!");
        assert!(!spans[3].is_bold());
    }

    #[test]
    fn parse_color_directive() {
        let spans = parse_markup("[color=#ff0000]{Red} text").expect("parse succeeds");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text(), "Red");
        assert_eq!(spans[0].color(), Some(Color::Rgb(0xff, 0x00, 0x00)));
        assert_eq!(spans[1].text(), " text");
    }

    #[test]
    fn code_spans_are_monospace_and_literal() {
        let spans = parse_markup("Run `robots: { index: false }` now").expect("parse succeeds");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text(), "robots: { index: false }");
        assert!(spans[1].is_monospace());
        assert!(!spans[2].is_monospace());
    }

    #[test]
    fn escapes_print_marker_characters() {
        let spans = parse_markup(r"\[OK\] \*not italic\* \{x\}").expect("parse succeeds");
        assert_eq!(plain_text(&spans), "[OK] *not italic* {x}");
        assert!(spans.iter().all(|span| !span.is_italic()));
    }

    #[test]
    fn error_on_unterminated_bold() {
        let err = parse_markup("**oops").unwrap_err();
        assert!(err.message().contains("unterminated bold"));
    }

    #[test]
    fn error_on_unterminated_code() {
        let err = parse_markup("see `this").unwrap_err();
        assert!(err.message().contains("unterminated code"));
        assert_eq!(err.index(), 4);
    }

    #[test]
    fn error_on_invalid_color() {
        let err = parse_markup("[color=#12FG34]{x}").unwrap_err();
        assert!(err.message().contains("invalid RGB"));
    }

    #[test]
    fn error_on_stray_brace() {
        let err = parse_markup("alternates: { canonical: \"/\" }").unwrap_err();
        assert!(err.message().contains("unexpected closing token"));
    }

    #[test]
    fn escaped_text_parses_back_verbatim() {
        let raw = r#"Remove 'alternates: { canonical: "/" }' from *layout.tsx* [now] \ `x`"#;
        let spans = parse_markup(&escape_markup(raw)).expect("escaped text parses");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), raw);
    }

    #[test]
    fn error_on_dangling_escape() {
        let err = parse_markup("oops\\").unwrap_err();
        assert!(err.message().contains("dangling escape"));
    }
}
