//! Minimal PDF 1.4 serializer for a laid-out [`Document`].
//!
//! Object layout:
//!
//! | Object       | Content                          |
//! |--------------|----------------------------------|
//! | 1            | Catalog                          |
//! | 2            | Pages tree                       |
//! | 3, 4         | Helvetica, Helvetica-Bold        |
//! | 5            | Document info                    |
//! | 6 + 2n       | Page `n`                         |
//! | 7 + 2n       | Content stream of page `n`       |
//!
//! Text is encoded as WinAnsi, which covers the Portuguese character set.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::ReportError;
use crate::fonts::Font;
use crate::layout::{Color, Document, DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_IDS: [usize; 2] = [3, 4];
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;

/// Metadata written to the document info dictionary.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    /// `D:YYYYMMDDHHmmSS` date string.
    pub creation_date: String,
}

/// Serialize `document` as a PDF into `out`.
pub fn write_pdf<W: Write>(
    document: &Document,
    info: &DocumentInfo,
    out: W,
) -> Result<(), ReportError> {
    if document.pages.is_empty() {
        return Err(ReportError::Layout("document has no pages".into()));
    }

    let mut w = CountingWriter::new(out);
    let page_count = document.pages.len();
    let object_count = FIRST_PAGE_ID - 1 + 2 * page_count;
    let mut offsets = vec![0usize; object_count + 1];

    w.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;

    offsets[CATALOG_ID] = w.position();
    write_object(
        &mut w,
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    )?;

    offsets[PAGES_ID] = w.position();
    let kids = (0..page_count)
        .map(|n| format!("{} 0 R", page_object_id(n)))
        .collect::<Vec<_>>()
        .join(" ");
    write_object(
        &mut w,
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"),
    )?;

    for (font, id) in Font::ALL.iter().zip(FONT_IDS) {
        offsets[id] = w.position();
        write_object(
            &mut w,
            id,
            &format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            ),
        )?;
    }

    offsets[INFO_ID] = w.position();
    let mut info_dict = String::from("<<");
    write_text_entry(&mut info_dict, "Title", &info.title);
    write_text_entry(&mut info_dict, "Producer", &info.producer);
    if !info.creation_date.is_empty() {
        write_text_entry(&mut info_dict, "CreationDate", &info.creation_date);
    }
    info_dict.push_str(" >>");
    write_object(&mut w, INFO_ID, &info_dict)?;

    let font_resources = Font::ALL
        .iter()
        .zip(FONT_IDS)
        .map(|(font, id)| format!("/{} {id} 0 R", font.resource_name()))
        .collect::<Vec<_>>()
        .join(" ");

    for (n, page) in document.pages.iter().enumerate() {
        let page_id = page_object_id(n);
        let content_id = page_id + 1;

        offsets[page_id] = w.position();
        write_object(
            &mut w,
            page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << {font_resources} >> >> /Contents {content_id} 0 R >>",
                num(PAGE_WIDTH),
                num(PAGE_HEIGHT)
            ),
        )?;

        let stream = content_stream(page);
        offsets[content_id] = w.position();
        write!(w, "{content_id} 0 obj\n<< /Length {} >>\nstream\n", stream.len())?;
        w.write_all(&stream)?;
        w.write_all(b"\nendstream\nendobj\n")?;
    }

    let xref_offset = w.position();
    write!(w, "xref\n0 {}\n", object_count + 1)?;
    w.write_all(b"0000000000 65535 f \n")?;
    for offset in &offsets[1..] {
        write!(w, "{offset:010} 00000 n \n")?;
    }
    write!(
        w,
        "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        object_count + 1
    )?;
    w.flush()?;
    Ok(())
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + 2 * index
}

fn write_object<W: Write>(w: &mut W, id: usize, body: &str) -> std::io::Result<()> {
    write!(w, "{id} 0 obj\n{body}\nendobj\n")
}

fn write_text_entry(dict: &mut String, key: &str, value: &str) {
    dict.push_str(" /");
    dict.push_str(key);
    dict.push_str(" (");
    // Info strings are PDFDocEncoding; WinAnsi agrees for the characters we emit.
    for byte in encode_win_ansi(value) {
        push_escaped(dict, byte);
    }
    dict.push(')');
}

// ---------------------------------------------------------------------------
// Content streams
// ---------------------------------------------------------------------------

/// Build the content stream bytes for one page.
fn content_stream(page: &Page) -> Vec<u8> {
    let mut out = String::new();
    for op in &page.ops {
        match op {
            DrawOp::Text { x, y, style, text } => {
                let baseline = PAGE_HEIGHT - (y + style.baseline_offset());
                let _ = write!(
                    out,
                    "BT\n{} rg\n/{} {} Tf\n{} {} Td\n(",
                    color_operands(style.color),
                    style.font.resource_name(),
                    num(style.size),
                    num(*x),
                    num(baseline)
                );
                for byte in encode_win_ansi(text) {
                    push_escaped(&mut out, byte);
                }
                out.push_str(") Tj\nET\n");
            }
            DrawOp::Line {
                from,
                to,
                color,
                width,
            } => {
                let _ = write!(
                    out,
                    "{} RG\n{} w\n{} {} m\n{} {} l\nS\n",
                    color_operands(*color),
                    num(*width),
                    num(from.0),
                    num(PAGE_HEIGHT - from.1),
                    num(to.0),
                    num(PAGE_HEIGHT - to.1)
                );
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                let _ = write!(
                    out,
                    "{} RG\n{} w\n{} {} {} {} re\nS\n",
                    color_operands(*color),
                    num(*line_width),
                    num(*x),
                    num(PAGE_HEIGHT - (y + height)),
                    num(*width),
                    num(*height)
                );
            }
        }
    }
    // Escaped text bytes above 0x7f were pushed as octal, so the string is ASCII.
    out.into_bytes()
}

fn color_operands(color: Color) -> String {
    let (r, g, b) = color.unit();
    format!("{} {} {}", num(r), num(g), num(b))
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f32) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape one byte for a PDF literal string. Non-ASCII bytes use octal.
fn push_escaped(out: &mut String, byte: u8) {
    match byte {
        b'(' | b')' | b'\\' => {
            out.push('\\');
            out.push(byte as char);
        }
        b'\n' => out.push_str("\\n"),
        b'\r' => out.push_str("\\r"),
        b'\t' => out.push_str("\\t"),
        0x20..=0x7e => out.push(byte as char),
        _ => {
            let _ = write!(out, "\\{byte:03o}");
        }
    }
}

/// Map text to WinAnsiEncoding, replacing unsupported characters with `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        0x20..=0x7e => c as u8,
        // Latin-1 supplement maps one to one.
        0xa0..=0xff => c as u32 as u8,
        _ => match c {
            '\t' | '\n' | '\r' => b' ',
            '\u{20ac}' => 0x80,
            '\u{201a}' => 0x82,
            '\u{201e}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2122}' => 0x99,
            _ => b'?',
        },
    }
}

// ---------------------------------------------------------------------------
// Offset tracking
// ---------------------------------------------------------------------------

/// Writer adapter that records how many bytes went through it, for the
/// cross-reference table.
struct CountingWriter<W> {
    inner: W,
    written: usize,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    fn position(&self) -> usize {
        self.written
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
