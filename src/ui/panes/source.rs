//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the program
//! being traced with basic syntax highlighting and execution indicators.
//!
//! # Features
//!
//! - Keyword highlighting for the C, Java, Python and JavaScript families
//! - Current line highlighting with arrow indicator
//! - A separate cursor line used as the run-to target
//! - Input line highlighting while a statement waits for input
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::utils::{pane_block, visible_rows};

/// Simple syntax highlighting shared by all supported languages
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (at, c) = chars[i];

        // Handle comments
        let slash_comment = c == '/' && chars.get(i + 1).is_some_and(|&(_, n)| n == '/');
        if slash_comment || c == '#' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                line[at..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            return Line::from(spans);
        }

        // Handle strings
        if c == '"' || c == '\'' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let stop = chars.get(end).map_or(line.len(), |&(pos, _)| pos);
            spans.push(Span::styled(
                line[at..stop].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = get_keyword_style(&current_word, c == '(');
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = get_keyword_style(&current_word, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "int" | "char" | "void" | "bool" | "boolean" | "float" | "double" | "long" | "short"
        | "unsigned" | "String" | "let" | "const" | "var" => {
            Style::default().fg(DEFAULT_THEME.type_name) // Types
        }
        "return" | "if" | "else" | "elif" | "while" | "for" | "do" | "in" | "def" | "function"
        | "break" | "continue" | "public" | "static" | "class" | "new" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD), // Keywords
        "true" | "false" | "True" | "False" | "null" | "None" | "NULL" | "endl" => {
            Style::default().fg(DEFAULT_THEME.number) // Constants
        }
        _ if word.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_function => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg), // Variables/Identifiers
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the followed line is kept at
    pub target_line_row: Option<usize>,
}

/// What the source pane draws
pub struct SourceRenderData<'a> {
    pub lines: &'a [String],
    /// 0-based line about to execute
    pub current_line: Option<usize>,
    /// 0-based run-to cursor
    pub cursor_line: usize,
    /// The current line is waiting for input
    pub awaiting_input: bool,
    /// Follow the cursor instead of the current line
    pub follow_cursor: bool,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: &SourceRenderData<'_>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source Code ", is_focused);

    let total_lines = data.lines.len();
    let visible_height = visible_rows(area.height);

    // Initialize target_line_row to center if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the followed line at the target visual row
    let followed = if data.follow_cursor {
        Some(data.cursor_line)
    } else {
        data.current_line
    };
    if let Some(idx) = followed.filter(|&idx| idx < total_lines) {
        scroll_state.offset = idx.saturating_sub(target_row);
        if total_lines > visible_height {
            scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = data
        .lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = data.current_line == Some(idx);
            let is_cursor = data.cursor_line == idx;
            let marker = match (is_current, is_cursor) {
                (true, _) => "▶",
                (false, true) => "›",
                _ => " ",
            };
            let line_num_str = format!("{}{:4} ", marker, idx + 1);

            let (num_style, content_base_style) = if is_current && data.awaiting_input {
                // INPUT LINE: Secondary background with bold line number
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.secondary)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else if is_cursor {
                (
                    Style::default().fg(DEFAULT_THEME.primary),
                    Style::default().bg(DEFAULT_THEME.cursor_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut content_line = highlight_source_code(line);
            if is_current && data.awaiting_input {
                for span in &mut content_line.spans {
                    span.style = content_base_style;
                }
            } else if is_current || is_cursor {
                for span in &mut content_line.spans {
                    span.style = span.style.patch(content_base_style);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
