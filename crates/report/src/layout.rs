//! In-memory page model and the cursor-based builder that fills it.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and `y` growing downwards. The PDF writer flips them when it
//! serializes. Text `y` is the top of the line box.

use crate::fonts::{Font, ASCENT, LINE_HEIGHT};

/// A4 portrait.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

/// Uniform page margin.
pub const MARGIN: f32 = 50.0;

/// Left edge of the content area.
pub const CONTENT_LEFT: f32 = MARGIN;
/// Right edge of the content area.
pub const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN;
/// Width of the content area.
pub const CONTENT_WIDTH: f32 = CONTENT_RIGHT - CONTENT_LEFT;
/// Lowest `y` a line may end at before flowing onto a new page.
pub const CONTENT_BOTTOM: f32 = PAGE_HEIGHT - MARGIN;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GREY: Color = Color::rgb(0x80, 0x80, 0x80);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Components scaled to `0.0..=1.0`, as PDF colour operators expect.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

/// Font, size and colour of a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn regular(size: f32) -> Self {
        Self {
            font: Font::Regular,
            size,
            color: Color::BLACK,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            font: Font::Bold,
            size,
            color: Color::BLACK,
        }
    }

    pub const fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }

    pub fn baseline_offset(&self) -> f32 {
        self.size * ASCENT
    }
}

/// Horizontal alignment inside a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A single drawing operation on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        line_width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text content of the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether any text run on the page contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

/// A laid-out document, ready to be serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A piece of text with its own style, used to compose mixed-style lines.
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    pub text: &'a str,
    pub style: TextStyle,
}

impl<'a> Run<'a> {
    pub fn new(text: &'a str, style: TextStyle) -> Self {
        Self { text, style }
    }
}

/// Appends content page by page, tracking a vertical cursor.
///
/// Flowing text breaks onto a new page when the next line would cross
/// [`CONTENT_BOTTOM`]. Absolutely positioned content never moves the
/// cursor on its own.
#[derive(Debug)]
pub struct DocumentBuilder {
    pages: Vec<Page>,
    y: f32,
    last_style: TextStyle,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
            last_style: TextStyle::regular(12.0),
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Index of the page currently being filled.
    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Vertical space left above [`CONTENT_BOTTOM`].
    pub fn remaining(&self) -> f32 {
        CONTENT_BOTTOM - self.y
    }

    /// Start a new page and put the cursor at the top margin.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.y = MARGIN;
    }

    /// Advance the cursor by `lines` lines of the most recently used style.
    pub fn move_down(&mut self, lines: f32) {
        self.y += lines * self.last_style.line_height();
    }

    fn push(&mut self, op: DrawOp) {
        let index = self.page_index();
        self.pages[index].ops.push(op);
    }

    fn ensure_line_fits(&mut self, height: f32) {
        if self.y + height > CONTENT_BOTTOM && self.y > MARGIN {
            self.add_page();
        }
    }

    /// Flow a single-style paragraph across the content width.
    pub fn text(&mut self, text: &str, style: TextStyle) {
        self.paragraph(&[Run::new(text, style)], Align::Left);
    }

    /// Flow a single-style paragraph with the given alignment.
    pub fn text_aligned(&mut self, text: &str, style: TextStyle, align: Align) {
        self.paragraph(&[Run::new(text, style)], align);
    }

    /// Flow a single-style paragraph starting `indent` points in from the
    /// left margin; wrapped lines keep the indent.
    pub fn text_indented(&mut self, text: &str, style: TextStyle, indent: f32) {
        self.flow(&[Run::new(text, style)], Align::Left, indent);
    }

    /// Flow mixed-style runs as one paragraph, wrapping on spaces.
    ///
    /// Words wider than the content width are broken between characters.
    pub fn paragraph(&mut self, runs: &[Run<'_>], align: Align) {
        self.flow(runs, align, 0.0);
    }

    fn flow(&mut self, runs: &[Run<'_>], align: Align, indent: f32) {
        let width = CONTENT_WIDTH - indent;
        let lines = wrap_runs(runs, width);
        let fallback = runs.last().map(|r| r.style).unwrap_or(self.last_style);

        for line in lines {
            let height = line
                .iter()
                .map(|seg| seg.style.line_height())
                .fold(fallback.line_height(), f32::max);
            self.ensure_line_fits(height);

            let line_width: f32 = line.iter().map(|seg| seg.width).sum();
            let left = CONTENT_LEFT + indent;
            let mut x = match align {
                Align::Left => left,
                Align::Center => left + (width - line_width).max(0.0) / 2.0,
            };
            for seg in line {
                let advance = seg.width;
                if !seg.text.is_empty() {
                    self.push(DrawOp::Text {
                        x,
                        y: self.y,
                        style: seg.style,
                        text: seg.text,
                    });
                }
                x += advance;
            }
            self.y += height;
        }
        self.last_style = fallback;
    }

    /// Advance the cursor by a fixed number of points.
    pub fn space(&mut self, points: f32) {
        self.y += points;
    }

    /// Place one line of text inside a box without moving the cursor.
    pub fn text_at(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
        text: &str,
        style: TextStyle,
    ) {
        let text_width = style.font.text_width(text, style.size);
        let x = match align {
            Align::Left => x,
            Align::Center => x + (width - text_width).max(0.0) / 2.0,
        };
        self.push(DrawOp::Text {
            x,
            y,
            style,
            text: text.to_string(),
        });
    }

    /// Horizontal rule at `y`.
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, color: Color) {
        self.push(DrawOp::Line {
            from: (x1, y),
            to: (x2, y),
            color,
            width: 1.0,
        });
    }

    /// Horizontal rule at the cursor.
    pub fn rule(&mut self, x1: f32, x2: f32, color: Color) {
        let y = self.y;
        self.hline(x1, x2, y, color);
    }

    /// A checkbox followed by its label on one flowing line.
    pub fn checkbox(&mut self, checked: bool, label: &str, style: TextStyle) {
        let height = style.line_height();
        self.ensure_line_fits(height);

        let side = style.size * 0.8;
        let x = CONTENT_LEFT;
        let y = self.y + (style.baseline_offset() - side).max(0.0);
        self.push(DrawOp::Rect {
            x,
            y,
            width: side,
            height: side,
            color: style.color,
            line_width: 0.8,
        });
        if checked {
            self.push(DrawOp::Line {
                from: (x + 1.5, y + 1.5),
                to: (x + side - 1.5, y + side - 1.5),
                color: style.color,
                width: 1.0,
            });
            self.push(DrawOp::Line {
                from: (x + side - 1.5, y + 1.5),
                to: (x + 1.5, y + side - 1.5),
                color: style.color,
                width: 1.0,
            });
        }
        self.push(DrawOp::Text {
            x: x + side + 4.0,
            y: self.y,
            style,
            text: label.to_string(),
        });
        self.y += height;
        self.last_style = style;
    }

    /// Run `stamp` on every page, with the 1-based page number and total.
    pub fn stamp_pages(&mut self, mut stamp: impl FnMut(&mut Page, usize, usize)) {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            stamp(page, index + 1, total);
        }
    }

    pub fn finish(self) -> Document {
        Document { pages: self.pages }
    }
}

/// Number of lines `text` occupies when flowed across `width`.
pub fn line_count(text: &str, style: TextStyle, width: f32) -> usize {
    wrap_runs(&[Run::new(text, style)], width).len()
}

/// Centred single-line text op for stamping onto an existing page.
pub fn centered_text(y: f32, text: &str, style: TextStyle) -> DrawOp {
    let width = style.font.text_width(text, style.size);
    DrawOp::Text {
        x: CONTENT_LEFT + (CONTENT_WIDTH - width).max(0.0) / 2.0,
        y,
        style,
        text: text.to_string(),
    }
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    style: TextStyle,
    width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Space,
    /// Hard line break from a `\n` in the source text.
    Break,
}

/// One token of a paragraph: a word, the space that follows it, or a
/// forced line break.
struct Token {
    text: String,
    style: TextStyle,
    kind: TokenKind,
}

fn tokenize(runs: &[Run<'_>]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for run in runs {
        let mut word = String::new();
        for c in run.text.chars() {
            let kind = match c {
                ' ' | '\t' => TokenKind::Space,
                '\n' => TokenKind::Break,
                '\r' => continue,
                _ => {
                    word.push(c);
                    continue;
                }
            };
            if !word.is_empty() {
                tokens.push(Token {
                    text: std::mem::take(&mut word),
                    style: run.style,
                    kind: TokenKind::Word,
                });
            }
            let text = if kind == TokenKind::Space { " " } else { "" };
            tokens.push(Token {
                text: text.to_string(),
                style: run.style,
                kind,
            });
        }
        if !word.is_empty() {
            tokens.push(Token {
                text: word,
                style: run.style,
                kind: TokenKind::Word,
            });
        }
    }
    tokens
}

/// Break runs into lines no wider than `max_width`, merging adjacent tokens
/// of the same style into one segment.
fn wrap_runs(runs: &[Run<'_>], max_width: f32) -> Vec<Vec<Segment>> {
    let mut lines: Vec<Vec<Segment>> = Vec::new();
    let mut line: Vec<Segment> = Vec::new();
    let mut line_width = 0.0f32;

    for token in tokenize(runs) {
        let width = token.style.font.text_width(&token.text, token.style.size);

        if token.kind == TokenKind::Break {
            trim_trailing_space(&mut line);
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
            continue;
        }

        if token.kind == TokenKind::Space {
            if line.is_empty() {
                continue;
            }
            append(&mut line, &token.text, token.style, width);
            line_width += width;
            continue;
        }

        if line_width + width > max_width && !line.is_empty() {
            trim_trailing_space(&mut line);
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }

        if width > max_width {
            for piece in split_word(&token.text, token.style, max_width) {
                let w = token.style.font.text_width(&piece, token.style.size);
                if line_width + w > max_width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                append(&mut line, &piece, token.style, w);
                line_width += w;
            }
        } else {
            append(&mut line, &token.text, token.style, width);
            line_width += width;
        }
    }

    trim_trailing_space(&mut line);
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn append(line: &mut Vec<Segment>, text: &str, style: TextStyle, width: f32) {
    match line.last_mut() {
        Some(last) if last.style == style => {
            last.text.push_str(text);
            last.width += width;
        }
        _ => line.push(Segment {
            text: text.to_string(),
            style,
            width,
        }),
    }
}

fn trim_trailing_space(line: &mut Vec<Segment>) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end_matches(' ').len();
        if trimmed == last.text.len() {
            break;
        }
        let removed = last.text.len() - trimmed;
        last.text.truncate(trimmed);
        last.width -= last.style.font.text_width(&" ".repeat(removed), last.style.size);
        if last.text.is_empty() {
            line.pop();
        } else {
            break;
        }
    }
}

fn split_word(word: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut width = 0.0f32;
    for c in word.chars() {
        let w = style.font.text_width(c.encode_utf8(&mut [0; 4]), style.size);
        if width + w > max_width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(c);
        width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
