use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use slide_2048::config::GameConfig;
use slide_2048::engine::{Coordinate, Direction, RngSource, SequenceSource};
use slide_2048::expectimax::Expectimax;
use slide_2048::game::{Game, GameStatus, StepOutcome};
use slide_2048::render::{BoardSnapshot, Outcome, Renderer};
use slide_2048::EngineError;

#[derive(Default)]
struct Log {
    renders: Vec<BoardSnapshot>,
    finishes: Vec<Outcome>,
}

struct Recorder(Rc<RefCell<Log>>);

impl Renderer for Recorder {
    fn render(&mut self, snapshot: &BoardSnapshot) -> slide_2048::Result<()> {
        self.0.borrow_mut().renders.push(snapshot.clone());
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome, _snapshot: &BoardSnapshot) -> slide_2048::Result<()> {
        self.0.borrow_mut().finishes.push(outcome);
        Ok(())
    }
}

fn recorded<R: slide_2048::engine::RandomSource>(game: &mut Game<R>) -> Rc<RefCell<Log>> {
    let log = Rc::new(RefCell::new(Log::default()));
    game.add_renderer(Box::new(Recorder(log.clone()))).unwrap();
    log
}

/// Always picks the first empty cell and always spawns a 2.
fn first_cell_twos() -> SequenceSource { SequenceSource::new(vec![0], vec![0.0]) }

#[test]
fn seeding_places_initial_pieces() {
    let game = Game::new(GameConfig::default(), first_cell_twos()).unwrap();
    assert_eq!(game.board().to_rows()[0], vec![2, 2, 0, 0]);
    assert_eq!(game.board().count_empty(), 14);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!((game.score(), game.moves()), (0, 0));
}

#[test]
fn step_merges_scores_and_spawns() {
    let mut game = Game::new(GameConfig::default(), first_cell_twos()).unwrap();
    let log = recorded(&mut game);

    let out = game.step(Direction::Left).unwrap();
    assert_eq!(
        out,
        StepOutcome { moved: true, points: 4, spawned: vec![Coordinate::new(0, 1)], status: GameStatus::InProgress }
    );
    assert_eq!(game.board().to_rows()[0], vec![4, 2, 0, 0]);
    assert_eq!((game.score(), game.moves()), (4, 1));

    let stuck = game.step(Direction::Left).unwrap();
    assert!(!stuck.moved);
    assert!(stuck.spawned.is_empty());
    assert_eq!(game.moves(), 1);

    let log = log.borrow();
    assert_eq!(log.renders.len(), 2);
    assert_eq!(log.renders[1].score, 4);
    assert!(log.finishes.is_empty());
}

#[test]
fn reaching_the_target_wins_once() {
    let cfg = GameConfig { size: 2, target_value: 4, ..Default::default() };
    let mut game = Game::new(cfg, first_cell_twos()).unwrap();
    let log = recorded(&mut game);

    let out = game.step(Direction::Left).unwrap();
    assert_eq!(out.status, GameStatus::Won);
    assert_eq!(game.board().max_value_piece().map(|p| p.value()), Some(4));

    let after = game.step(Direction::Right).unwrap();
    assert!(!after.moved);
    assert_eq!(log.borrow().finishes, vec![Outcome::Won]);
}

#[test]
fn filling_a_locked_board_loses() {
    // Cells: first empty every time. Values cycle 2, 4.
    let cfg = GameConfig { size: 2, ..Default::default() };
    let mut game = Game::new(cfg, SequenceSource::new(vec![0], vec![0.0, 0.95])).unwrap();
    assert_eq!(game.board().to_rows(), vec![vec![2, 4], vec![0, 0]]);
    let log = recorded(&mut game);

    assert_eq!(game.step(Direction::Down).unwrap().status, GameStatus::InProgress);
    assert_eq!(game.board().to_rows(), vec![vec![2, 0], vec![2, 4]]);

    let out = game.step(Direction::Right).unwrap();
    assert_eq!(game.board().to_rows(), vec![vec![4, 2], vec![2, 4]]);
    assert_eq!(out.status, GameStatus::Lost);
    assert!(!game.board().has_valid_moves());
    assert_eq!(log.borrow().finishes, vec![Outcome::Lost]);
}

#[test]
fn late_renderer_still_hears_the_outcome() {
    let cfg = GameConfig { size: 1, ..Default::default() };
    let mut game = Game::new(cfg, first_cell_twos()).unwrap();
    assert_eq!(game.board().count_empty(), 0);
    assert_eq!(game.status(), GameStatus::Lost);
    let log = recorded(&mut game);
    game.step(Direction::Up).unwrap();
    let log = log.borrow();
    assert_eq!(log.renders.len(), 1);
    assert_eq!(log.finishes, vec![Outcome::Lost]);
}

#[test]
fn autoplay_runs_a_small_game() {
    let cfg = GameConfig {
        size: 3,
        target_value: 64,
        search: slide_2048::expectimax::ExpectimaxConfig { depth: 2, ..Default::default() },
        ..Default::default()
    };
    let mut agent = Expectimax::with_config(cfg.agent_config());
    let mut game = Game::new(cfg, RngSource::seeded(2024)).unwrap();
    let status = game.autoplay(&mut agent, Some(400)).unwrap();
    assert!(game.moves() > 0);
    assert!(status.is_over() || game.moves() == 400);
    for (_, piece) in game.board().occupied() {
        assert!(piece.value().is_power_of_two());
    }
}

#[test]
fn config_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "size": 5, "target_value": 512, "search": {{ "depth": 3 }} }}"#).unwrap();
    let cfg = GameConfig::from_json_path(file.path()).unwrap();
    assert_eq!(cfg.size, 5);
    assert_eq!(cfg.agent_config().target_value, 512);
    assert_eq!(cfg.search.depth, 3);

    let game = Game::new(cfg, RngSource::seeded(1)).unwrap();
    assert_eq!(game.board().size(), 5);
}

#[test]
fn bad_config_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "four_probability": 3.0 }}"#).unwrap();
    assert!(matches!(GameConfig::from_json_path(file.path()), Err(EngineError::InvalidConfig(_))));
    assert!(matches!(GameConfig::from_json_path("/nonexistent/slide.json"), Err(EngineError::Io(_))));
}
