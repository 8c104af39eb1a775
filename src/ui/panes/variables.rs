//! Variables pane: bindings in the order they were first made, then the
//! active loop stack

use crate::memory::{Value, VariableStore};
use crate::snapshot::LoopFrame;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

use super::utils::{clamp_scroll, pane_block, visible_rows};

pub struct VariablesRenderData<'a> {
    pub variables: &'a VariableStore,
    /// Outermost first
    pub loops: &'a [LoopFrame],
}

fn value_span(value: &Value) -> Span<'static> {
    let color = if value.is_number() {
        DEFAULT_THEME.number
    } else {
        DEFAULT_THEME.string
    };
    Span::styled(value.to_string(), Style::default().fg(color))
}

fn loop_line(depth: usize, frame: &LoopFrame) -> Line<'static> {
    let condition = if frame.condition.trim().is_empty() {
        "(always)".to_string()
    } else {
        frame.condition.trim().to_string()
    };
    Line::from(vec![
        Span::raw("  ".repeat(depth)),
        Span::styled(
            format!("for @ line {}", frame.header + 1),
            Style::default()
                .fg(DEFAULT_THEME.loop_frame)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  iteration {}", frame.iteration),
            Style::default().fg(DEFAULT_THEME.fg),
        ),
        Span::styled(
            format!("  while {}", condition),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])
}

pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    data: &VariablesRenderData<'_>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Variables ", is_focused);

    if data.variables.is_empty() && data.loops.is_empty() {
        let paragraph = Paragraph::new("(no variables yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut items: Vec<ListItem> = data
        .variables
        .iter()
        .map(|(name, value)| {
            ListItem::new(Line::from(vec![
                Span::styled(name.to_string(), Style::default().fg(DEFAULT_THEME.type_name)),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                value_span(value),
            ]))
        })
        .collect();

    if !data.loops.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "Active loops",
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ))));
        items.extend(
            data.loops
                .iter()
                .enumerate()
                .map(|(depth, active)| ListItem::new(loop_line(depth, active))),
        );
    }

    let visible_height = visible_rows(area.height);
    clamp_scroll(scroll_offset, items.len(), visible_height);

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
