use crate::game::{DeathReason, Outcome};

/// Which message the overlay is showing.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OverlayKind {
    Start,
    Won,
    Lost(DeathReason),
}

impl OverlayKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Start => "SNAKE // ACCESS GATE",
            Self::Won => "ACCESS GRANTED",
            Self::Lost(_) => "GAME OVER",
        }
    }

    #[must_use]
    pub fn subtitle(self, unlock_score: u32) -> String {
        match self {
            Self::Start => format!("Score {unlock_score} to unlock the contact section"),
            Self::Won => "Contact section unlocked".to_owned(),
            Self::Lost(DeathReason::WallCollision) => "You hit the wall".to_owned(),
            Self::Lost(DeathReason::SelfCollision) => "You bit yourself".to_owned(),
        }
    }

    #[must_use]
    pub fn action_hint(self) -> &'static str {
        match self {
            Self::Start => "[Enter]/[Space]/click or steer to start",
            Self::Won => "[Enter]/[Space]/click to play again",
            Self::Lost(_) => "[Enter]/[Space]/click or a pad button to play again",
        }
    }
}

impl From<Outcome> for OverlayKind {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => Self::Won,
            Outcome::Lost(reason) => Self::Lost(reason),
        }
    }
}

/// Start/win/lose messaging shown over the play field.
///
/// Visible at launch; hidden while a session runs; shown again with the
/// outcome until a restart.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Overlay {
    current: Option<OverlayKind>,
}

impl Overlay {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Some(OverlayKind::Start),
        }
    }

    pub fn show(&mut self, kind: OverlayKind) {
        self.current = Some(kind);
    }

    /// Shows the outcome of a finished session.
    pub fn show_outcome(&mut self, outcome: Outcome) {
        self.show(OverlayKind::from(outcome));
    }

    pub fn hide(&mut self) {
        self.current = None;
    }

    #[must_use]
    pub fn current(&self) -> Option<OverlayKind> {
        self.current
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new()
    }
}
