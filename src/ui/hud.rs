use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph};

use crate::config::Theme;
use crate::game::progress_percent;

/// Values shown in the HUD rows.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub score: u32,
    pub unlock_score: u32,
    pub tick_interval: Duration,
    /// Navigation badge state, fed by unlock notifications.
    pub badge_unlocked: bool,
    pub theme: &'a Theme,
}

/// Renders the score line and the progress bar toward the unlock threshold.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) {
    let [status_row, progress_row, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(status_line(info)).alignment(Alignment::Left),
        status_row,
    );

    let percent = progress_percent(info.score, info.unlock_score);
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::new().fg(info.theme.progress))
            .percent(percent)
            .label(format!("{}/{} ({percent}%)", info.score, info.unlock_score)),
        progress_row,
    );
}

/// Renders the contact section placeholder beside the controls.
pub fn render_contact_panel(frame: &mut Frame<'_>, area: Rect, unlocked: bool, theme: &Theme) {
    let (text, color) = if unlocked {
        ("OPEN", theme.unlocked)
    } else {
        ("LOCKED", theme.locked)
    };

    frame.render_widget(
        Paragraph::new(Line::from(text))
            .alignment(Alignment::Center)
            .style(Style::new().fg(color).add_modifier(Modifier::BOLD))
            .block(
                Block::bordered()
                    .title(" contact ")
                    .border_style(Style::new().fg(color)),
            ),
        area,
    );
}

fn status_line<'a>(info: &HudInfo<'a>) -> Line<'a> {
    let theme = info.theme;
    let (badge, badge_color) = if info.badge_unlocked {
        ("unlocked", theme.unlocked)
    } else {
        ("locked", theme.locked)
    };

    Line::from(vec![
        Span::styled("SCORE ", Style::new().fg(theme.muted)),
        Span::styled(
            info.score.to_string(),
            Style::new()
                .fg(theme.hud_score)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  TICK ", Style::new().fg(theme.muted)),
        Span::styled(
            format!("{}ms", info.tick_interval.as_millis()),
            Style::new().fg(theme.hud_score),
        ),
        Span::styled("  CONTACT ", Style::new().fg(theme.muted)),
        Span::styled(badge, Style::new().fg(badge_color)),
    ])
}
