use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::config::{CELL_WIDTH, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, GridSize, Theme};
use crate::game::RenderSnapshot;
use crate::input::Direction;
use crate::overlay::OverlayKind;
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_contact_panel, render_hud};
use crate::ui::layout::ScreenLayout;
use crate::ui::menu::render_overlay;

/// Everything the renderer reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub snapshot: &'a RenderSnapshot,
    pub grid: GridSize,
    pub overlay: Option<OverlayKind>,
    pub score: u32,
    pub unlock_score: u32,
    pub tick_interval: Duration,
    pub badge_unlocked: bool,
    pub contact_unlocked: bool,
    pub theme: &'a Theme,
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, layout: &ScreenLayout, view: &RenderView<'_>) {
    let theme = view.theme;

    render_hud(
        frame,
        layout.hud(),
        &HudInfo {
            score: view.score,
            unlock_score: view.unlock_score,
            tick_interval: view.tick_interval,
            badge_unlocked: view.badge_unlocked,
            theme,
        },
    );

    let block = Block::bordered()
        .border_style(Style::new().fg(theme.border_fg))
        .style(Style::new().bg(theme.play_bg));
    frame.render_widget(block, layout.field_block());

    let inner = layout.play_field();
    render_food(frame, inner, view);
    render_snake(frame, inner, view);

    for (direction, rect) in layout.controls() {
        render_control(frame, rect, direction, theme);
    }

    if let Some(panel) = layout.contact_panel() {
        render_contact_panel(frame, panel, view.contact_unlocked, theme);
    }

    if let Some(kind) = view.overlay {
        render_overlay(frame, layout.field_block(), kind, view.unlock_score, theme);
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, view: &RenderView<'_>) {
    let Some((x, y)) = logical_to_terminal(inner, view.grid, view.snapshot.food) else {
        return;
    };

    frame.buffer_mut().set_string(
        x,
        y,
        GLYPH_FOOD,
        Style::new().fg(view.theme.food).bg(view.theme.play_bg),
    );
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, view: &RenderView<'_>) {
    let theme = view.theme;
    let buffer = frame.buffer_mut();

    // Tail first so the head wins if cells ever coincide.
    for (index, segment) in view.snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, view.grid, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(theme.snake_head)
                    .bg(theme.play_bg)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_BODY,
                Style::new().fg(theme.snake_body).bg(theme.play_bg),
            );
        }
    }
}

fn render_control(frame: &mut Frame<'_>, area: Rect, direction: Direction, theme: &Theme) {
    let arrow = match direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Left => "◀",
        Direction::Right => "▶",
    };

    frame.render_widget(
        Paragraph::new(arrow)
            .alignment(Alignment::Center)
            .style(Style::new().fg(theme.snake_head))
            .block(Block::bordered().border_style(Style::new().fg(theme.muted))),
        area,
    );
}

fn logical_to_terminal(inner: Rect, grid: GridSize, position: Position) -> Option<(u16, u16)> {
    if !grid.contains(position) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
