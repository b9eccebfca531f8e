use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use gridsnake::{
    Coords, Difficulty, Direction, FileStore, Frame, GameOverSummary, GameSink, Geometry, MemoryStore, Result,
    ScoreStore, Session, SessionState, TickOutcome,
};

#[derive(Default)]
struct Recorder {
    frames: Vec<(Vec<Coords>, Option<Coords>, u32)>,
    game_overs: Vec<GameOverSummary>,
}

impl GameSink for Recorder {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.frames.push((frame.snake.body().iter().copied().collect(), frame.food, frame.score));
        Ok(())
    }

    fn game_over(&mut self, summary: &GameOverSummary) -> Result<()> {
        self.game_overs.push(*summary);
        Ok(())
    }
}

/// Store shared between sessions, like a file that outlives them.
#[derive(Clone, Default)]
struct SharedStore(Rc<Cell<u32>>);

impl ScoreStore for SharedStore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.0.get())
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.0.set(high_score);
        Ok(())
    }
}

fn classic_board() -> Geometry {
    Geometry::new(400, 20).unwrap()
}

#[test]
fn running_into_the_left_wall_ends_the_game() {
    let mut s = Session::with_rng(classic_board(), Difficulty::Easy, MemoryStore::new(), StdRng::seed_from_u64(1));
    let mut out = Recorder::default();
    s.start();

    s.set_direction(Direction::Up);
    assert_ne!(s.tick(&mut out).unwrap(), TickOutcome::Skipped);
    assert_eq!(s.snake().head(), (100, 180));

    s.set_direction(Direction::Left);
    for x in [80, 60, 40, 20, 0] {
        let outcome = s.tick(&mut out).unwrap();
        assert!(matches!(outcome, TickOutcome::Moved | TickOutcome::Fed));
        assert_eq!(s.snake().head(), (x, 180));
    }

    let score_before = s.score();
    let rendered_before = out.frames.len();
    let outcome = s.tick(&mut out).unwrap();

    assert_eq!(outcome, TickOutcome::GameOver(GameOverSummary { score: score_before, won: false }));
    assert_eq!(s.state(), SessionState::GameOver);
    assert_eq!(s.score(), score_before);
    assert_eq!(s.snake().head(), (0, 180));
    assert_eq!(out.frames.len(), rendered_before);
    assert_eq!(out.game_overs.len(), 1);
}

#[test]
fn reversing_does_not_kill_the_snake() {
    let mut s = Session::with_rng(classic_board(), Difficulty::Easy, MemoryStore::new(), StdRng::seed_from_u64(2));
    let mut out = Recorder::default();
    s.start();

    assert_eq!(s.set_direction(Direction::Left), Direction::Right);
    assert_eq!(s.direction(), Direction::Right);

    let outcome = s.tick(&mut out).unwrap();
    assert!(matches!(outcome, TickOutcome::Moved | TickOutcome::Fed));
    assert_eq!(s.snake().head(), (120, 200));
    assert_eq!(s.state(), SessionState::Running);
}

#[test]
fn every_render_keeps_food_off_the_snake() {
    let mut s = Session::with_rng(Geometry::new(120, 20).unwrap(), Difficulty::Hard, MemoryStore::new(), StdRng::seed_from_u64(3));
    let mut out = Recorder::default();
    s.start();

    for _ in 0..200 {
        if s.state() != SessionState::Running {
            break;
        }
        chase_food(&mut s);
        s.tick(&mut out).unwrap();
    }

    for (body, food, _) in &out.frames {
        if let Some(food) = food {
            assert!(!body.contains(food));
        }
    }
}

#[test]
fn scores_step_by_ten() {
    let mut s = Session::with_rng(Geometry::new(120, 20).unwrap(), Difficulty::Medium, MemoryStore::new(), StdRng::seed_from_u64(4));
    let mut out = Recorder::default();
    s.start();

    let mut last = 0;
    for _ in 0..200 {
        if s.state() != SessionState::Running {
            break;
        }
        chase_food(&mut s);
        let len_before = s.snake().len();
        match s.tick(&mut out).unwrap() {
            TickOutcome::Fed => {
                assert_eq!(s.score(), last + 10);
                assert_eq!(s.snake().len(), len_before + 1);
            }
            TickOutcome::Moved => {
                assert_eq!(s.score(), last);
                assert_eq!(s.snake().len(), len_before);
            }
            _ => {}
        }
        last = s.score();
    }
}

#[test]
fn high_score_is_the_best_score_across_sessions() {
    let store = SharedStore::default();
    let mut best = 0;

    for seed in 0..4 {
        let mut s = Session::with_rng(Geometry::new(120, 20).unwrap(), Difficulty::Easy, store.clone(), StdRng::seed_from_u64(seed));
        assert_eq!(s.high_score(), best);
        let mut out = Recorder::default();
        s.start();

        for _ in 0..300 {
            if s.state() != SessionState::Running {
                break;
            }
            chase_food(&mut s);
            s.tick(&mut out).unwrap();
            best = best.max(s.score());
            assert_eq!(s.high_score(), best);
        }
    }

    assert_eq!(store.0.get(), best);
}

#[test]
fn file_store_survives_sessions() {
    let path = std::env::temp_dir().join(format!("gridsnake-flow-{}.toml", std::process::id()));
    let mut store = FileStore::new(&path);
    store.save(250).unwrap();

    let s = Session::new(classic_board(), Difficulty::Easy, FileStore::new(&path));
    assert_eq!(s.high_score(), 250);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn difficulty_change_replaces_the_running_schedule() {
    let mut s = Session::with_rng(classic_board(), Difficulty::Easy, MemoryStore::new(), StdRng::seed_from_u64(5));
    let mut out = Recorder::default();
    s.start();
    let old = s.ticker().handle().unwrap();

    let change = s.set_difficulty(Difficulty::Hard);
    assert_eq!(change.interval, Duration::from_millis(60));
    assert!(change.rearmed);

    // A tick from the old schedule is dropped
    assert_eq!(s.fire(old, &mut out).unwrap(), TickOutcome::Skipped);
    assert!(out.frames.is_empty());

    // The new schedule ticks at the faster rate
    let soon = Instant::now() + Duration::from_millis(60);
    let fired = s.poll_tick(soon, &mut out).unwrap();
    assert!(matches!(fired, Some(TickOutcome::Moved) | Some(TickOutcome::Fed)));
}

#[test]
fn restart_after_game_over_starts_fresh() {
    let mut s = Session::with_rng(classic_board(), Difficulty::Easy, MemoryStore::new(), StdRng::seed_from_u64(6));
    let mut out = Recorder::default();
    s.start();
    s.set_direction(Direction::Up);
    while s.state() == SessionState::Running {
        s.tick(&mut out).unwrap();
    }
    assert_eq!(s.state(), SessionState::GameOver);
    assert_eq!(s.snake().head(), (100, 0));

    assert_eq!(s.start(), SessionState::Running);
    assert_eq!(s.score(), 0);
    assert_eq!(s.direction(), Direction::Right);
    assert_eq!(s.snake().body().iter().copied().collect::<Vec<_>>(), vec![(100, 200), (80, 200), (60, 200)]);
    assert!(s.ticker().is_armed());
}

/// Steers towards the food, never straight back.
fn chase_food<S: ScoreStore>(s: &mut Session<S, StdRng>) {
    let (Some(food), head) = (s.food(), s.snake().head()) else { return };
    let wanted = if food.0 < head.0 {
        Direction::Left
    } else if food.0 > head.0 {
        Direction::Right
    } else if food.1 < head.1 {
        Direction::Up
    } else {
        Direction::Down
    };
    s.set_direction(wanted);
}
