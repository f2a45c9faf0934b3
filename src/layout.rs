//! Greedy line breaking for styled text.
//!
//! `genpdf`'s own paragraph element cannot paint backgrounds or report how tall it will be before
//! it is drawn, both of which tables and shaded code blocks need. This module breaks styled runs
//! into lines up front; the elements in [`crate::elements`] then paint backgrounds, text and
//! borders in that order.
//!
//! All lengths in this module are millimetres, as plain `f64`.

use genpdf::fonts::FontCache;
use genpdf::style::{Style, StyledString};

use crate::units::mm_to_f64;

/// Source of text metrics.
pub trait Measure {
    /// Width of `text` printed with `style`.
    fn text_width(&self, text: &str, style: Style) -> f64;

    /// Height of one line printed with `style`, including line spacing.
    fn line_height(&self, style: Style) -> f64;
}

impl Measure for FontCache {
    fn text_width(&self, text: &str, style: Style) -> f64 {
        mm_to_f64(StyledString::new(text.to_owned(), style).width(self))
    }

    fn line_height(&self, style: Style) -> f64 {
        mm_to_f64(style.line_height(self))
    }
}

/// Text sharing one style.
#[derive(Clone, Debug)]
pub struct Run {
    pub text: String,
    pub style: Style,
}

impl Run {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A piece of a line, printed at `x` from the line's start.
#[derive(Clone, Debug)]
pub struct Fragment {
    pub text: String,
    pub style: Style,
    pub x: f64,
    run: usize,
}

/// One laid-out line.
#[derive(Clone, Debug, Default)]
pub struct Line {
    pub fragments: Vec<Fragment>,
    pub width: f64,
    pub height: f64,
}

impl Line {
    /// Concatenated text of the line.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// Total height of `lines`.
pub fn total_height(lines: &[Line]) -> f64 {
    lines.iter().map(|line| line.height).sum()
}

/// Breaks `runs` into lines no wider than `max_width`.
///
/// Whitespace separates words; a `\n` forces a line break. Whitespace at the start of a line is
/// kept only after a forced break, so indentation in literal text survives while soft-wrapped
/// lines start flush. Words wider than `max_width` are split between characters.
pub fn wrap<M: Measure + ?Sized>(runs: &[Run], max_width: f64, measure: &M) -> Vec<Line> {
    let mut breaker = LineBreaker::new(max_width, measure);
    for (index, run) in runs.iter().enumerate() {
        for (segment_index, segment) in run.text.split('\n').enumerate() {
            if segment_index > 0 {
                breaker.hard_break(run.style);
            }
            for (is_space, chunk) in chunks(segment) {
                if is_space {
                    breaker.space(chunk, index, run.style);
                } else {
                    breaker.word(chunk, index, run.style);
                }
            }
        }
    }
    breaker.finish()
}

/// Splits text into alternating whitespace and non-whitespace chunks.
fn chunks(text: &str) -> Vec<(bool, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (offset, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match current {
            Some(kind) if kind == is_space => {}
            Some(kind) => {
                out.push((kind, &text[start..offset]));
                start = offset;
                current = Some(is_space);
            }
            None => current = Some(is_space),
        }
    }
    if let Some(kind) = current {
        out.push((kind, &text[start..]));
    }
    out
}

struct LineBreaker<'m, M: Measure + ?Sized> {
    max_width: f64,
    measure: &'m M,
    lines: Vec<Line>,
    current: Line,
    hard_start: bool,
    pending_space: Option<(String, usize, Style)>,
}

impl<'m, M: Measure + ?Sized> LineBreaker<'m, M> {
    fn new(max_width: f64, measure: &'m M) -> Self {
        Self {
            max_width: max_width.max(0.0),
            measure,
            lines: Vec::new(),
            current: Line::default(),
            hard_start: true,
            pending_space: None,
        }
    }

    fn space(&mut self, text: &str, run: usize, style: Style) {
        match &mut self.pending_space {
            Some((pending, _, _)) => pending.push_str(text),
            None => self.pending_space = Some((text.to_owned(), run, style)),
        }
    }

    fn word(&mut self, word: &str, run: usize, style: Style) {
        let word_width = self.measure.text_width(word, style);
        let pending = self.pending_space.take();

        if self.current.fragments.is_empty() {
            if self.hard_start {
                if let Some((space, space_run, space_style)) = pending {
                    self.push(&space, space_run, space_style);
                }
            }
        } else {
            let space_width = pending
                .as_ref()
                .map_or(0.0, |(space, _, style)| self.measure.text_width(space, *style));
            if self.current.width + space_width + word_width <= self.max_width {
                if let Some((space, space_run, space_style)) = pending {
                    self.push(&space, space_run, space_style);
                }
            } else {
                self.soft_break();
            }
        }

        if self.current.width + word_width <= self.max_width || self.current.fragments.is_empty()
        {
            if word_width <= self.max_width || !self.current.fragments.is_empty() {
                self.push(word, run, style);
            } else {
                self.split_word(word, run, style);
            }
        } else {
            self.soft_break();
            self.split_word(word, run, style);
        }
    }

    /// Places a word that is wider than a whole line, character by character.
    fn split_word(&mut self, word: &str, run: usize, style: Style) {
        let mut piece = String::new();
        let mut piece_width = 0.0;
        for ch in word.chars() {
            let mut buf = [0u8; 4];
            let ch_width = self.measure.text_width(ch.encode_utf8(&mut buf), style);
            if !piece.is_empty() && self.current.width + piece_width + ch_width > self.max_width {
                self.push(&piece, run, style);
                piece.clear();
                piece_width = 0.0;
                self.soft_break();
            }
            piece.push(ch);
            piece_width += ch_width;
        }
        if !piece.is_empty() {
            self.push(&piece, run, style);
        }
    }

    fn push(&mut self, text: &str, run: usize, style: Style) {
        let width = self.measure.text_width(text, style);
        let height = self.measure.line_height(style);
        let line = &mut self.current;
        match line.fragments.last_mut() {
            Some(last) if last.run == run => last.text.push_str(text),
            _ => line.fragments.push(Fragment {
                text: text.to_owned(),
                style,
                x: line.width,
                run,
            }),
        }
        line.width += width;
        line.height = line.height.max(height);
    }

    fn soft_break(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
        self.hard_start = false;
    }

    fn hard_break(&mut self, style: Style) {
        self.pending_space = None;
        let mut line = std::mem::take(&mut self.current);
        if line.fragments.is_empty() {
            line.height = self.measure.line_height(style);
        }
        self.lines.push(line);
        self.hard_start = true;
    }

    fn finish(mut self) -> Vec<Line> {
        if !self.current.fragments.is_empty() {
            self.lines.push(self.current);
        }
        self.lines
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is `char_width` wide; every line is `line_height` tall.
    pub(crate) struct FixedMeasure {
        pub char_width: f64,
        pub line_height: f64,
    }

    impl Measure for FixedMeasure {
        fn text_width(&self, text: &str, _style: Style) -> f64 {
            text.chars().count() as f64 * self.char_width
        }

        fn line_height(&self, _style: Style) -> f64 {
            self.line_height
        }
    }

    const UNIT: FixedMeasure = FixedMeasure {
        char_width: 1.0,
        line_height: 2.0,
    };

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(Line::text).collect()
    }

    fn plain(text: &str) -> Vec<Run> {
        vec![Run::new(text, Style::new())]
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let lines = wrap(&plain("the quick brown fox"), 10.0, &UNIT);
        assert_eq!(texts(&lines), vec!["the quick", "brown fox"]);
        assert_eq!(lines[0].width, 9.0);
        assert_eq!(total_height(&lines), 4.0);
    }

    #[test]
    fn forced_breaks_keep_indentation() {
        let lines = wrap(&plain("a: {\n  b: 1,\n}"), 40.0, &UNIT);
        assert_eq!(texts(&lines), vec!["a: {", "  b: 1,", "}"]);
    }

    #[test]
    fn empty_lines_between_forced_breaks_have_height() {
        let lines = wrap(&plain("one\n\ntwo"), 40.0, &UNIT);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].height, 2.0);
        assert!(lines[1].fragments.is_empty());
    }

    #[test]
    fn soft_wrapped_lines_drop_leading_space() {
        let lines = wrap(&plain("aaaa    bbbb"), 6.0, &UNIT);
        assert_eq!(texts(&lines), vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn overlong_words_are_split() {
        let lines = wrap(&plain("https://example.com/very/long"), 10.0, &UNIT);
        assert!(lines.iter().all(|line| line.width <= 10.0));
        assert_eq!(
            texts(&lines).concat(),
            "https://example.com/very/long".to_owned()
        );
    }

    #[test]
    fn fragments_record_offsets_across_runs() {
        let runs = vec![
            Run::new("Fix: ", Style::new().bold()),
            Run::new("add redirects", Style::new()),
        ];
        let lines = wrap(&runs, 40.0, &UNIT);
        assert_eq!(lines.len(), 1);
        let fragments = &lines[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "Fix: ");
        assert_eq!(fragments[1].x, 5.0);
        assert_eq!(fragments[1].text, "add redirects");
    }

    #[test]
    fn empty_input_produces_no_lines() {
        assert!(wrap(&plain(""), 10.0, &UNIT).is_empty());
    }
}
