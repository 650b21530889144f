//! Fixed-pitch text layout and the section pagination rule.

use serde::{Deserialize, Serialize};

use super::templates::{Block, Section};

const MM_PER_POINT: f32 = 25.4 / 72.0;
/// Advance width of every Courier glyph, in ems.
const COURIER_ADVANCE_EM: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A4,
    Legal,
}

impl PaperSize {
    pub const fn width_mm(self) -> f32 {
        match self {
            PaperSize::A4 => 210.0,
            PaperSize::Legal => 215.9,
        }
    }

    pub const fn height_mm(self) -> f32 {
        match self {
            PaperSize::A4 => 297.0,
            PaperSize::Legal => 355.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSettings {
    pub margin_mm: f32,
    pub section_gap_mm: f32,
    pub font_size_pt: f32,
    pub line_height_factor: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            margin_mm: 10.0,
            section_gap_mm: 5.0,
            font_size_pt: 10.0,
            line_height_factor: 1.4,
        }
    }
}

impl LayoutSettings {
    pub fn line_height_mm(&self) -> f32 {
        self.font_size_pt * self.line_height_factor * MM_PER_POINT
    }

    pub fn char_width_mm(&self) -> f32 {
        self.font_size_pt * COURIER_ADVANCE_EM * MM_PER_POINT
    }

    /// Characters per line between the margins.
    pub fn columns(&self, paper: PaperSize) -> usize {
        let usable = paper.width_mm() - 2.0 * self.margin_mm;
        ((usable / self.char_width_mm()).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading,
    Body,
}

/// Line of a section before it is assigned a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLine {
    pub text: String,
    pub style: LineStyle,
    pub indent: usize,
    pub centered: bool,
}

/// Line positioned on a page. `y_mm` is the top of the line, measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Greedy word wrap. Words wider than a line are split across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while !chars.is_empty() {
            let needed = if current_len == 0 {
                chars.len()
            } else {
                current_len + 1 + chars.len()
            };

            if needed <= width {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(chars.drain(..));
                current_len += needed - current_len;
            } else if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            } else {
                current.extend(chars.drain(..width));
                lines.push(std::mem::take(&mut current));
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Builtin PDF fonts only cover Latin-1, so anything outside ASCII is replaced.
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_ascii() && !ch.is_ascii_control() { ch } else { '?' })
        .collect()
}

/// Break one section into lines for the given column count.
pub fn section_lines(section: &Section, columns: usize) -> Vec<SectionLine> {
    let mut lines = Vec::new();
    let body = |text: String, indent: usize| SectionLine {
        text,
        style: LineStyle::Body,
        indent,
        centered: false,
    };

    for (index, block) in section.blocks.iter().enumerate() {
        let previous_heading = index > 0 && matches!(section.blocks[index - 1], Block::Heading(_));
        let is_heading = matches!(block, Block::Heading(_));
        if index > 0 && !(is_heading && previous_heading) {
            lines.push(body(String::new(), 0));
        }

        match block {
            Block::Heading(text) => {
                for line in wrap(&printable(text), columns) {
                    lines.push(SectionLine {
                        text: line,
                        style: LineStyle::Heading,
                        indent: 0,
                        centered: true,
                    });
                }
            }
            Block::Paragraph(text) => {
                lines.extend(
                    wrap(&printable(text), columns)
                        .into_iter()
                        .map(|line| body(line, 0)),
                );
            }
            Block::Numbered(items) => {
                for (position, item) in items.iter().enumerate() {
                    let marker = format!("{}. ", position + 1);
                    let hanging = marker.len();
                    let wrapped = wrap(&printable(item), columns.saturating_sub(hanging));
                    for (line_index, line) in wrapped.into_iter().enumerate() {
                        if line_index == 0 {
                            lines.push(body(format!("{marker}{line}"), 0));
                        } else {
                            lines.push(body(line, hanging));
                        }
                    }
                }
            }
            Block::Fields(fields) => {
                for (label, value) in fields {
                    let text = printable(&format!("{label}: {value}"));
                    lines.extend(wrap(&text, columns).into_iter().map(|line| body(line, 0)));
                }
            }
        }
    }

    lines
}

/// Place sections on pages.
///
/// A section starts on a fresh page when it would cross the bottom margin and the current
/// page already holds something. Sections taller than a page continue on the next pages.
pub fn paginate(sections: &[Section], paper: PaperSize, settings: &LayoutSettings) -> Vec<Page> {
    let columns = settings.columns(paper);
    let line_height = settings.line_height_mm();
    let char_width = settings.char_width_mm();
    let top = settings.margin_mm;
    let bottom = paper.height_mm() - settings.margin_mm;

    let mut pages = vec![Page::default()];
    let mut cursor = top;

    for section in sections {
        let lines = section_lines(section, columns);
        if lines.is_empty() {
            continue;
        }

        let height = lines.len() as f32 * line_height;
        if cursor + height > bottom && cursor > top {
            pages.push(Page::default());
            cursor = top;
        }

        for line in lines {
            if cursor + line_height > bottom && cursor > top {
                pages.push(Page::default());
                cursor = top;
            }

            let text_width = line.text.chars().count() as f32 * char_width;
            let x_mm = if line.centered {
                let usable = paper.width_mm() - 2.0 * settings.margin_mm;
                settings.margin_mm + ((usable - text_width) / 2.0).max(0.0)
            } else {
                settings.margin_mm + line.indent as f32 * char_width
            };

            if let Some(page) = pages.last_mut() {
                if !line.text.is_empty() {
                    page.lines.push(PlacedLine {
                        text: line.text,
                        style: line.style,
                        x_mm,
                        y_mm: cursor,
                    });
                }
            }
            cursor += line_height;
        }

        cursor += settings.section_gap_mm;
    }

    pages
}
