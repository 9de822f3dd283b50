use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineConfig;
use crate::food::Food;
use crate::input::{Direction, direction_change_is_valid};
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// Reset and waiting for the first direction or an explicit start.
    Idle,
    Running,
    Ended { won: bool },
}

/// What ended a lost session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// How a session finished. A loss always carries its cause.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    Won,
    Lost(DeathReason),
}

impl Outcome {
    #[must_use]
    pub fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Read-only view of the board handed to the renderer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenderSnapshot {
    /// Occupied cells, head first.
    pub snake: Vec<Position>,
    pub food: Position,
    pub score: u32,
}

/// Notifications produced by the engine, drained by whoever drives it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GameEvent {
    ScoreChanged { score: u32, threshold: u32 },
    Frame(RenderSnapshot),
    /// Queued once per session.
    Ended(Outcome),
}

/// Per-session state. Replaced wholesale on reset.
#[derive(Debug, Clone)]
struct Session {
    snake: Snake,
    direction: Direction,
    pending_direction: Direction,
    food: Food,
    score: u32,
    tick_count: u64,
    status: GameStatus,
    death_reason: Option<DeathReason>,
}

/// Grid snake engine: owns one play session and the random source used to
/// place food.
#[derive(Debug, Clone)]
pub struct GameEngine<R = StdRng> {
    config: EngineConfig,
    session: Session,
    events: Vec<GameEvent>,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Creates an engine seeded from OS entropy.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible sessions.
    #[must_use]
    pub fn new_with_seed(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Creates an idle engine drawing food positions from `rng`.
    pub fn with_rng(config: EngineConfig, mut rng: R) -> Self {
        let session = Session::fresh(&config, &mut rng);
        let mut engine = Self {
            config,
            session,
            events: Vec::new(),
            rng,
        };
        engine.queue_reset_events();
        engine
    }

    /// Creates an idle engine from an explicit board, for scripted scenarios.
    ///
    /// `direction` is both the effective and the pending direction.
    pub fn from_parts(
        config: EngineConfig,
        snake: Snake,
        direction: Direction,
        food: Position,
        rng: R,
    ) -> Self {
        Self {
            config,
            session: Session {
                snake,
                direction,
                pending_direction: direction,
                food: Food::new(food),
                score: 0,
                tick_count: 0,
                status: GameStatus::Idle,
                death_reason: None,
            },
            events: Vec::new(),
            rng,
        }
    }

    /// Discards the session and starts a fresh idle one.
    pub fn reset(&mut self) {
        self.session = Session::fresh(&self.config, &mut self.rng);
        self.events.clear();
        self.queue_reset_events();
        debug!("session reset");
    }

    /// Moves an idle session to running. No-op in any other state.
    pub fn start(&mut self) {
        if self.session.status == GameStatus::Idle {
            self.session.status = GameStatus::Running;
            info!("session started");
        }
    }

    /// Resets, then starts.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Records `direction` for the next tick unless it reverses the direction
    /// in effect. The first accepted direction starts an idle session.
    ///
    /// Ignored once the session has ended.
    pub fn request_direction(&mut self, direction: Direction) {
        if matches!(self.session.status, GameStatus::Ended { .. }) {
            return;
        }

        if !direction_change_is_valid(self.session.direction, direction) {
            debug!(
                "rejected reversal {direction:?} while moving {:?}",
                self.session.direction
            );
            return;
        }

        self.session.pending_direction = direction;
        self.start();
    }

    /// Advances the session by one cell. No-op unless running.
    pub fn tick(&mut self) {
        if self.session.status != GameStatus::Running {
            return;
        }

        let session = &mut self.session;
        session.direction = session.pending_direction;
        let new_head = session.snake.next_head(session.direction);

        if !self.config.grid.contains(new_head) {
            self.end(Outcome::Lost(DeathReason::WallCollision));
            return;
        }

        if self.session.snake.collides_with_body(new_head) {
            self.end(Outcome::Lost(DeathReason::SelfCollision));
            return;
        }

        let session = &mut self.session;
        session.tick_count += 1;
        let ate = new_head == session.food.position;
        session.snake.advance(new_head, ate);

        if ate {
            session.score += 1;
            let score = session.score;
            self.events.push(GameEvent::ScoreChanged {
                score,
                threshold: self.config.unlock_score,
            });
            debug!("food eaten at {new_head:?}, score {score}");

            if score >= self.config.unlock_score {
                self.end(Outcome::Won);
                return;
            }

            self.respawn_food();
        }

        self.events.push(GameEvent::Frame(self.snapshot()));
    }

    /// Returns the board as the renderer should draw it.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            snake: self.session.snake.segments().copied().collect(),
            food: self.session.food.position,
            score: self.session.score,
        }
    }

    /// Takes all notifications queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Delay before the next tick at the current score.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.config.ramp.interval_for(self.session.score)
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.session.death_reason
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score
    }

    #[must_use]
    pub fn unlock_score(&self) -> u32 {
        self.config.unlock_score
    }

    /// Direction applied on the most recent tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.session.direction
    }

    /// Direction the next tick will apply.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.session.pending_direction
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.session.snake
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.session.food
    }

    /// Number of successful ticks in this session.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.session.tick_count
    }

    fn end(&mut self, outcome: Outcome) {
        self.session.status = GameStatus::Ended {
            won: outcome.is_win(),
        };
        self.events.push(GameEvent::Ended(outcome));

        match outcome {
            Outcome::Won => info!("session won with score {}", self.session.score),
            Outcome::Lost(reason) => {
                self.session.death_reason = Some(reason);
                info!(
                    "session lost ({reason:?}) with score {}",
                    self.session.score
                );
            }
        }
    }

    fn respawn_food(&mut self) {
        match Food::spawn(&mut self.rng, self.config.grid, &self.session.snake) {
            Some(food) => self.session.food = food,
            None => warn!("no free cell left for food; keeping previous position"),
        }
    }

    #[cfg(test)]
    pub(crate) fn place_food(&mut self, position: Position) {
        self.session.food = Food::new(position);
    }

    fn queue_reset_events(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: 0,
            threshold: self.config.unlock_score,
        });
        self.events.push(GameEvent::Frame(self.snapshot()));
    }
}

impl Session {
    fn fresh<R: Rng + ?Sized>(config: &EngineConfig, rng: &mut R) -> Self {
        let snake = Snake::centered(config.grid);
        // A validated config always has room beside the starting snake.
        let food = Food::spawn(rng, config.grid, &snake)
            .unwrap_or_else(|| Food::new(Position::new(0, 0)));

        Self {
            snake,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food,
            score: 0,
            tick_count: 0,
            status: GameStatus::Idle,
            death_reason: None,
        }
    }
}

/// Share of the unlock threshold reached, clamped to `0..=100`.
#[must_use]
pub fn progress_percent(score: u32, threshold: u32) -> u16 {
    if threshold == 0 {
        return 100;
    }

    let percent = u64::from(score) * 100 / u64::from(threshold);
    u16::try_from(percent.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::{EngineConfig, GridSize};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{DeathReason, GameEngine, GameEvent, GameStatus, Outcome, progress_percent};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn scenario(segments: Vec<Position>, direction: Direction, food: Position) -> GameEngine {
        let snake = Snake::from_segments(segments).expect("non-empty body");
        let mut engine =
            GameEngine::from_parts(config(), snake, direction, food, StdRng::seed_from_u64(5));
        engine.start();
        engine
    }

    fn centered(food: Position) -> GameEngine {
        scenario(
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10),
            ],
            Direction::Right,
            food,
        )
    }

    #[test]
    fn reset_produces_the_initial_layout() {
        let mut engine = GameEngine::new_with_seed(config(), 1);

        let cells: Vec<_> = engine.snake().segments().copied().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.pending_direction(), Direction::Right);
        assert_eq!(engine.status(), GameStatus::Idle);
        assert_eq!(engine.score(), 0);
        assert!(!engine.snake().occupies(engine.food().position));

        let events = engine.drain_events();
        assert_eq!(
            events[0],
            GameEvent::ScoreChanged {
                score: 0,
                threshold: 10
            }
        );
        assert!(matches!(events[1], GameEvent::Frame(_)));
    }

    #[test]
    fn plain_tick_moves_head_and_drops_tail() {
        let mut engine = centered(Position::new(0, 0));

        engine.tick();

        let cells: Vec<_> = engine.snake().segments().copied().collect();
        assert_eq!(
            cells,
            vec![
                Position::new(11, 10),
                Position::new(10, 10),
                Position::new(9, 10)
            ]
        );
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn tick_is_a_no_op_unless_running() {
        let snake = Snake::centered(GridSize::square(20));
        let mut engine = GameEngine::from_parts(
            config(),
            snake.clone(),
            Direction::Right,
            Position::new(0, 0),
            StdRng::seed_from_u64(2),
        );

        engine.tick();
        assert_eq!(engine.snake(), &snake);
        assert_eq!(engine.status(), GameStatus::Idle);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn reverse_request_is_ignored() {
        let mut engine = centered(Position::new(0, 0));

        engine.request_direction(Direction::Left);
        assert_eq!(engine.pending_direction(), Direction::Right);

        engine.request_direction(Direction::Up);
        assert_eq!(engine.pending_direction(), Direction::Up);

        // Still checked against the effective direction, not the pending one.
        engine.request_direction(Direction::Down);
        assert_eq!(engine.pending_direction(), Direction::Down);
    }

    #[test]
    fn only_the_last_request_applies_per_tick() {
        let mut engine = centered(Position::new(0, 0));

        engine.request_direction(Direction::Up);
        engine.request_direction(Direction::Down);
        engine.tick();

        assert_eq!(engine.direction(), Direction::Down);
        assert_eq!(engine.snake().head(), Position::new(10, 11));
    }

    #[test]
    fn first_direction_starts_idle_session() {
        let mut engine = GameEngine::new_with_seed(config(), 3);

        engine.request_direction(Direction::Left);
        assert_eq!(engine.status(), GameStatus::Idle);

        engine.request_direction(Direction::Up);
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.pending_direction(), Direction::Up);
    }

    #[test]
    fn start_keeps_direction_and_is_idempotent() {
        let mut engine = GameEngine::new_with_seed(config(), 4);

        engine.start();
        engine.start();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn wall_collision_ends_without_mutation() {
        let mut engine = scenario(
            vec![
                Position::new(19, 4),
                Position::new(18, 4),
                Position::new(17, 4),
            ],
            Direction::Right,
            Position::new(0, 0),
        );
        let before = engine.snake().clone();
        engine.drain_events();

        engine.tick();

        assert_eq!(engine.status(), GameStatus::Ended { won: false });
        assert_eq!(engine.death_reason(), Some(DeathReason::WallCollision));
        assert_eq!(engine.snake(), &before);
        assert_eq!(engine.score(), 0);
        assert_eq!(
            engine.drain_events(),
            vec![GameEvent::Ended(Outcome::Lost(
                DeathReason::WallCollision
            ))]
        );
    }

    #[test]
    fn self_collision_ends_the_game() {
        let mut engine = scenario(
            vec![
                Position::new(2, 2),
                Position::new(2, 1),
                Position::new(3, 1),
                Position::new(3, 2),
                Position::new(3, 3),
                Position::new(2, 3),
                Position::new(1, 3),
            ],
            Direction::Down,
            Position::new(0, 0),
        );
        let before = engine.snake().clone();

        engine.tick();

        assert_eq!(engine.status(), GameStatus::Ended { won: false });
        assert_eq!(engine.death_reason(), Some(DeathReason::SelfCollision));
        assert_eq!(engine.snake(), &before);
    }

    #[test]
    fn moving_onto_the_tail_is_legal() {
        let mut engine = scenario(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
            ],
            Direction::Left,
            Position::new(0, 0),
        );
        engine.request_direction(Direction::Down);

        engine.tick();

        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.snake().head(), Position::new(5, 6));
        assert_eq!(engine.snake().len(), 4);
    }

    #[test]
    fn eating_grows_scores_and_respawns_food() {
        let mut engine = centered(Position::new(11, 10));
        engine.drain_events();

        engine.tick();

        assert_eq!(engine.snake().len(), 4);
        assert_eq!(engine.score(), 1);
        assert!(!engine.snake().occupies(engine.food().position));

        let events = engine.drain_events();
        assert_eq!(
            events[0],
            GameEvent::ScoreChanged {
                score: 1,
                threshold: 10
            }
        );
        assert!(matches!(&events[1], GameEvent::Frame(frame) if frame.score == 1));
    }

    #[test]
    fn reaching_the_threshold_wins_without_respawning_food() {
        let config = EngineConfig {
            unlock_score: 1,
            ..EngineConfig::default()
        };
        let snake = Snake::centered(config.grid);
        let mut engine = GameEngine::from_parts(
            config,
            snake,
            Direction::Right,
            Position::new(11, 10),
            StdRng::seed_from_u64(8),
        );
        engine.start();
        engine.drain_events();

        engine.tick();

        assert_eq!(engine.status(), GameStatus::Ended { won: true });
        assert_eq!(engine.score(), engine.unlock_score());
        assert_eq!(engine.food().position, Position::new(11, 10));
        assert_eq!(engine.snake().head(), Position::new(11, 10));
        assert_eq!(
            engine.drain_events(),
            vec![
                GameEvent::ScoreChanged {
                    score: 1,
                    threshold: 1
                },
                GameEvent::Ended(Outcome::Won),
            ]
        );

        let frozen = engine.snapshot();
        engine.tick();
        engine.request_direction(Direction::Up);
        assert_eq!(engine.snapshot(), frozen);
        assert_eq!(engine.pending_direction(), Direction::Right);
    }

    #[test]
    fn speed_follows_score() {
        let mut engine = scenario(
            vec![
                Position::new(3, 10),
                Position::new(2, 10),
                Position::new(1, 10),
            ],
            Direction::Right,
            Position::new(4, 10),
        );
        assert_eq!(engine.tick_interval(), Duration::from_millis(150));

        for eaten in 1..=5 {
            engine.tick();
            assert_eq!(engine.score(), eaten);
            let ahead = engine.snake().next_head(Direction::Right);
            engine.place_food(ahead);
        }

        assert_eq!(engine.tick_interval(), Duration::from_millis(130));
        assert_eq!(engine.snake().len(), 8);
        assert_eq!(engine.status(), GameStatus::Running);
    }

    #[test]
    fn restart_reinitializes_everything() {
        let mut engine = centered(Position::new(11, 10));
        engine.tick();
        engine.request_direction(Direction::Up);
        engine.tick();

        engine.restart();

        let fresh = Snake::centered(GridSize::square(20));
        assert_eq!(engine.snake(), &fresh);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.direction(), Direction::Right);
        assert_eq!(engine.status(), GameStatus::Running);
        assert_eq!(engine.death_reason(), None);
        assert_eq!(engine.tick_count(), 0);
        assert!(!fresh.occupies(engine.food().position));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress_percent(0, 10), 0);
        assert_eq!(progress_percent(3, 10), 30);
        assert_eq!(progress_percent(25, 10), 100);
        assert_eq!(progress_percent(1, 0), 100);
    }
}
