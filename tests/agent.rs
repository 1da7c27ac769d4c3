use slide_2048::engine::{Board, Direction, PieceFactory, RngSource};
use slide_2048::expectimax::{Expectimax, ExpectimaxConfig, ExpectimaxParallel, MoveRecommender};

fn midgame_boards(seed: u64, count: usize) -> Vec<Board> {
    let mut rng = RngSource::seeded(seed);
    let factory = PieceFactory::default();
    let mut board = Board::new(4).unwrap();
    let mut boards = Vec::new();
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..count * 3 {
        for slot in board.random_empty_coordinates(1, &mut rng).unwrap() {
            board.place(factory.create(None, &mut rng).unwrap(), slot).unwrap();
        }
        if i % 3 == 0 {
            boards.push(board.clone());
        }
        board.shift(seq[i % seq.len()]);
    }
    boards
}

#[test]
fn picks_the_winning_merge() {
    let b = Board::from_rows(vec![vec![1024, 1024, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]]).unwrap();
    let mut agent = Expectimax::with_config(ExpectimaxConfig { depth: 4, ..Default::default() });
    assert_eq!(agent.recommend_next_move(&b), Some(Direction::Left));
}

#[test]
fn locked_board_yields_none() {
    let b = Board::from_rows(vec![vec![2, 4, 2, 4], vec![4, 2, 4, 2], vec![2, 4, 2, 4], vec![4, 2, 4, 2]]).unwrap();
    let mut seq = Expectimax::default();
    let mut par = ExpectimaxParallel::default();
    assert_eq!(seq.recommend_next_move(&b), None);
    assert_eq!(par.recommend_next_move(&b), None);
}

#[test]
fn parallel_agrees_with_sequential() {
    let cfg = ExpectimaxConfig { depth: 3, ..Default::default() };
    let mut seq = Expectimax::with_config(cfg.clone());
    let mut par = ExpectimaxParallel::with_config(cfg);
    for b in midgame_boards(7777, 8) {
        assert_eq!(seq.branch_evals(&b), par.branch_evals(&b), "branch EVs differ on {b:?}");
        assert_eq!(seq.state_value(&b), par.state_value(&b));
    }
}

#[test]
fn recommendations_always_change_the_board() {
    let mut agents: Vec<Box<dyn MoveRecommender>> = vec![
        Box::new(Expectimax::with_config(ExpectimaxConfig { depth: 3, ..Default::default() })),
        Box::new(ExpectimaxParallel::with_config(ExpectimaxConfig { depth: 3, ..Default::default() })),
    ];
    for b in midgame_boards(42, 10) {
        for agent in agents.iter_mut() {
            let Some(dir) = agent.recommend_next_move(&b) else {
                assert!(!b.has_valid_moves());
                continue;
            };
            assert!(b.clone().shift(dir), "{dir} is a no-op on {b:?}");
        }
    }
}

#[test]
fn deeper_search_visits_more_nodes() {
    let b = Board::from_rows(vec![vec![2, 4, 0, 0], vec![0, 2, 0, 0], vec![0; 4], vec![0; 4]]).unwrap();
    let mut shallow = Expectimax::with_config(ExpectimaxConfig { depth: 1, ..Default::default() });
    let mut deep = Expectimax::with_config(ExpectimaxConfig { depth: 3, ..Default::default() });
    shallow.recommend_next_move(&b);
    deep.recommend_next_move(&b);
    assert!(deep.last_stats().nodes > shallow.last_stats().nodes);
}
