use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::overlay::OverlayKind;

/// Draws the start, win or lose message as a centered popup.
pub fn render_overlay(
    frame: &mut Frame<'_>,
    area: Rect,
    kind: OverlayKind,
    unlock_score: u32,
    theme: &Theme,
) {
    let popup = centered_popup(area, 80, 50);
    frame.render_widget(Clear, popup);

    let title_color = match kind {
        OverlayKind::Won => theme.overlay_win,
        OverlayKind::Start | OverlayKind::Lost(_) => theme.overlay_title,
    };

    let lines = vec![
        Line::from(kind.title()).style(
            Style::new()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(kind.subtitle(unlock_score)),
        Line::from(""),
        Line::from(kind.action_hint()).style(Style::new().fg(theme.muted)),
        Line::from("[Q]/[Esc] Quit").style(Style::new().fg(theme.muted)),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::new().fg(title_color))),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
