use rand::SeedableRng;
use rand::rngs::StdRng;
use unlock_snake::config::EngineConfig;
use unlock_snake::game::{DeathReason, GameEngine, GameEvent, GameStatus};
use unlock_snake::input::Direction;
use unlock_snake::snake::{Position, Snake};

fn centered_engine(food: Position) -> GameEngine {
    let config = EngineConfig::default();
    GameEngine::from_parts(
        config,
        Snake::centered(config.grid),
        Direction::Right,
        food,
        StdRng::seed_from_u64(42),
    )
}

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let mut engine = centered_engine(Position::new(11, 10));

    engine.request_direction(Direction::Right);
    assert_eq!(engine.status(), GameStatus::Running);

    engine.tick();
    assert_eq!(engine.score(), 1);
    assert_eq!(engine.snake().len(), 4);
    assert_eq!(engine.snake().head(), Position::new(11, 10));

    engine.request_direction(Direction::Up);
    for _ in 0..10 {
        engine.tick();
        assert_eq!(engine.status(), GameStatus::Running);
    }
    assert_eq!(engine.snake().head().y, 0);

    let snake_before = engine.snake().clone();
    let score_before = engine.score();
    engine.tick();

    assert_eq!(engine.status(), GameStatus::Ended { won: false });
    assert_eq!(engine.death_reason(), Some(DeathReason::WallCollision));
    assert_eq!(engine.snake(), &snake_before);
    assert_eq!(engine.score(), score_before);
}

#[test]
fn plain_tick_matches_reference_example() {
    let mut engine = centered_engine(Position::new(0, 0));
    engine.start();

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
fn seeded_sessions_with_equal_inputs_are_identical() {
    let script = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Down,
        Direction::Right,
    ];

    let play = || {
        let mut engine = GameEngine::new_with_seed(EngineConfig::default(), 7);
        let mut frames = Vec::new();
        for direction in script {
            engine.request_direction(direction);
            for _ in 0..3 {
                engine.tick();
            }
            frames.push((engine.snapshot(), engine.tick_interval()));
        }
        frames
    };

    assert_eq!(play(), play());
}

#[test]
fn growth_and_food_invariants_hold_over_a_long_walk() {
    let mut engine = GameEngine::new_with_seed(EngineConfig::default(), 2024);
    engine.start();

    // Sweep the board in a serpentine so the snake keeps moving safely.
    let mut previous_len = engine.snake().len();
    let mut heading_right = true;
    for _ in 0..400 {
        if engine.status() != GameStatus::Running {
            break;
        }

        let head = engine.snake().head();
        let at_edge = if heading_right { head.x == 19 } else { head.x == 0 };
        if at_edge {
            let vertical = if head.y == 19 { Direction::Up } else { Direction::Down };
            engine.request_direction(vertical);
            engine.tick();
            heading_right = !heading_right;
            engine.request_direction(if heading_right {
                Direction::Right
            } else {
                Direction::Left
            });
        } else {
            engine.tick();
        }

        let events = engine.drain_events();
        let ate = events
            .iter()
            .any(|event| matches!(event, GameEvent::ScoreChanged { score, .. } if *score > 0));
        let len = engine.snake().len();
        if engine.status() == GameStatus::Running {
            assert!(!engine.snake().occupies(engine.food().position));
        }
        if ate {
            assert_eq!(len, previous_len + 1);
        } else {
            assert_eq!(len, previous_len);
        }
        previous_len = len;
    }
}
