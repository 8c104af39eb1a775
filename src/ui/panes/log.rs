//! Execution log pane

use crate::snapshot::LogEntry;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use super::utils::{clamp_scroll, pane_block, visible_rows};

/// Render the log, newest entry last. The newest entry is drawn in bold.
pub fn render_log_pane(
    frame: &mut Frame,
    area: Rect,
    log: &[LogEntry],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Execution Log ", is_focused);

    if log.is_empty() {
        let paragraph = Paragraph::new("(nothing executed yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let newest = log.len() - 1;
    let items: Vec<ListItem> = log
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let message_style = if i == newest {
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("L{:<4}", entry.line),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ),
                Span::styled(entry.message.clone(), message_style),
            ]))
        })
        .collect();

    let visible_height = visible_rows(area.height);
    clamp_scroll(scroll_offset, items.len(), visible_height);

    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
