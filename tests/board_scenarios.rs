use slide_2048::engine::{Board, Coordinate, Direction, Piece};
use slide_2048::EngineError;

fn four_by_four(row0: [u64; 4]) -> Board {
    Board::from_rows(vec![row0.to_vec(), vec![0; 4], vec![0; 4], vec![0; 4]]).unwrap()
}

#[test]
fn merge_scenario() {
    let mut b = four_by_four([2, 2, 0, 0]);
    assert!(b.shift(Direction::Left));
    assert_eq!(b.to_rows()[0], vec![4, 0, 0, 0]);
}

#[test]
fn slide_without_merge_scenario() {
    let mut b = four_by_four([0, 0, 2, 4]);
    assert!(b.shift(Direction::Left));
    assert_eq!(b.to_rows()[0], vec![2, 4, 0, 0]);
}

#[test]
fn blocked_scenario() {
    let mut b = four_by_four([2, 4, 0, 0]);
    assert!(!b.shift(Direction::Left));
    assert_eq!(b.to_rows()[0], vec![2, 4, 0, 0]);
}

#[test]
fn chain_prevention_scenario() {
    let mut b = four_by_four([2, 2, 2, 0]);
    assert!(b.shift(Direction::Left));
    assert_eq!(b.to_rows()[0], vec![4, 2, 0, 0]);
}

#[test]
fn win_detection_input() {
    let target = 2048;
    let mut b = Board::new(4).unwrap();
    b.place(Piece::new(target).unwrap(), Coordinate::new(2, 1)).unwrap();
    b.place(Piece::new(16).unwrap(), Coordinate::new(0, 0)).unwrap();
    assert_eq!(b.max_value_piece().map(Piece::value), Some(target));
}

#[test]
fn vertical_shifts_on_a_column() {
    let column = |b: &Board| b.to_rows().iter().map(|r| r[0]).collect::<Vec<_>>();
    let start = Board::from_rows(vec![vec![2, 0, 0], vec![2, 0, 0], vec![4, 0, 0]]).unwrap();

    let mut up = start.clone();
    assert!(up.shift(Direction::Up));
    assert_eq!(column(&up), vec![4, 4, 0]);

    let mut down = start.clone();
    assert!(down.shift(Direction::Down));
    assert_eq!(column(&down), vec![0, 4, 4]);
}

#[test]
fn larger_board_slides_full_width() {
    let mut b = Board::from_rows(vec![
        vec![2, 0, 0, 0, 2],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0],
        vec![0, 0, 8, 0, 0],
    ])
    .unwrap();
    let out = b.slide(Direction::Right);
    assert!(out.moved);
    assert_eq!(out.points, 4);
    assert_eq!(b.to_rows()[0], vec![0, 0, 0, 0, 4]);
    assert_eq!(b.to_rows()[4], vec![0, 0, 0, 0, 8]);
}

#[test]
fn contract_errors_are_reported() {
    let mut b = Board::new(2).unwrap();
    let outside = Coordinate::new(0, 2);
    assert!(matches!(b.piece_at(outside), Err(EngineError::OutOfBounds { .. })));
    assert!(matches!(b.remove(outside), Err(EngineError::OutOfBounds { .. })));
    assert!(matches!(Board::new(0), Err(EngineError::InvalidSize(0))));
    assert!(matches!(Piece::new(0), Err(EngineError::InvalidPieceValue(0))));
}
