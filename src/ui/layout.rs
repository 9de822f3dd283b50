use ratatui::layout::Rect;

use crate::config::{CELL_WIDTH, GridSize};
use crate::input::Direction;

/// Rows reserved above the play field for score and progress.
pub const HUD_HEIGHT: u16 = 3;

const BUTTON_WIDTH: u16 = 5;
const BUTTON_HEIGHT: u16 = 3;
const SIDE_PANEL_GAP: u16 = 2;
const CONTACT_PANEL_WIDTH: u16 = 3 * BUTTON_WIDTH;
const CONTACT_PANEL_HEIGHT: u16 = 3;

/// Screen regions for one terminal size.
///
/// Computed once per frame and shared by the renderer and pointer
/// hit-testing so both agree on where the controls are.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScreenLayout {
    hud: Rect,
    field_block: Rect,
    play_field: Rect,
    controls: Vec<(Direction, Rect)>,
    contact_panel: Option<Rect>,
}

impl ScreenLayout {
    #[must_use]
    pub fn compute(area: Rect, grid: GridSize) -> Self {
        let hud = Rect {
            height: HUD_HEIGHT.min(area.height),
            ..area
        };

        let body_y = hud.bottom();
        let body_height = area.bottom().saturating_sub(body_y);
        let field_block = Rect {
            x: area.x,
            y: body_y,
            width: grid
                .side
                .saturating_mul(CELL_WIDTH)
                .saturating_add(2)
                .min(area.width),
            height: grid.side.saturating_add(2).min(body_height),
        };
        let play_field = Rect {
            x: field_block.x.saturating_add(1),
            y: field_block.y.saturating_add(1),
            width: field_block.width.saturating_sub(2),
            height: field_block.height.saturating_sub(2),
        };

        let pad_x = field_block.right().saturating_add(SIDE_PANEL_GAP);
        let pad_y = body_y.saturating_add(1);
        let button = |column: u16, row: u16| Rect {
            x: pad_x.saturating_add(column * BUTTON_WIDTH),
            y: pad_y.saturating_add(row * BUTTON_HEIGHT),
            width: BUTTON_WIDTH,
            height: BUTTON_HEIGHT,
        };
        let fits = |rect: &Rect| rect.right() <= area.right() && rect.bottom() <= area.bottom();

        let controls = [
            (Direction::Up, button(1, 0)),
            (Direction::Left, button(0, 1)),
            (Direction::Right, button(2, 1)),
            (Direction::Down, button(1, 2)),
        ]
        .into_iter()
        .filter(|(_, rect)| fits(rect))
        .collect();

        let contact_panel = Some(Rect {
            x: pad_x,
            y: pad_y.saturating_add(3 * BUTTON_HEIGHT + 1),
            width: CONTACT_PANEL_WIDTH,
            height: CONTACT_PANEL_HEIGHT,
        })
        .filter(fits);

        Self {
            hud,
            field_block,
            play_field,
            controls,
            contact_panel,
        }
    }

    #[must_use]
    pub fn hud(&self) -> Rect {
        self.hud
    }

    /// Play field including its border.
    #[must_use]
    pub fn field_block(&self) -> Rect {
        self.field_block
    }

    /// Cell area inside the border.
    #[must_use]
    pub fn play_field(&self) -> Rect {
        self.play_field
    }

    /// On-screen direction buttons that fit the terminal.
    pub fn controls(&self) -> impl Iterator<Item = (Direction, Rect)> + '_ {
        self.controls.iter().copied()
    }

    #[must_use]
    pub fn contact_panel(&self) -> Option<Rect> {
        self.contact_panel
    }

    /// Direction of the button under `(column, row)`, if any.
    #[must_use]
    pub fn control_at(&self, column: u16, row: u16) -> Option<Direction> {
        self.controls
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(direction, _)| *direction)
    }

    #[must_use]
    pub fn play_surface_contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.field_block, column, row)
    }
}

fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{HUD_HEIGHT, ScreenLayout};
    use crate::config::GridSize;
    use crate::input::Direction;

    #[test]
    fn play_field_fits_grid_below_hud() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 80, 30), GridSize::square(20));

        assert_eq!(layout.field_block(), Rect::new(0, HUD_HEIGHT, 42, 22));
        assert_eq!(layout.play_field(), Rect::new(1, HUD_HEIGHT + 1, 40, 20));
    }

    #[test]
    fn controls_do_not_overlap_and_hit_test() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 80, 30), GridSize::square(20));
        let controls: Vec<_> = layout.controls().collect();
        assert_eq!(controls.len(), 4);

        for (direction, rect) in &controls {
            assert_eq!(layout.control_at(rect.x + 2, rect.y + 1), Some(*direction));
            assert!(!layout.play_surface_contains(rect.x, rect.y));
        }

        assert_eq!(layout.control_at(0, 0), None);
        assert!(layout.contact_panel().is_some());
    }

    #[test]
    fn narrow_terminal_drops_controls() {
        let layout = ScreenLayout::compute(Rect::new(0, 0, 44, 30), GridSize::square(20));

        assert_eq!(layout.controls().count(), 0);
        assert_eq!(layout.control_at(43, 10), None::<Direction>);
        assert!(layout.contact_panel().is_none());
    }
}
