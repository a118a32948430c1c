//! Piece catalog tests: shapes, rotation cycles, colors and placement validity

use proptest::prelude::*;

use tetris_replay::core::{shape, Board, Piece};
use tetris_replay::types::{Color, PieceKind, Position, BOARD_HEIGHT, BOARD_WIDTH};

fn offsets(kind: PieceKind, rotation: usize) -> Vec<(i8, i8)> {
    shape(kind).offsets(rotation).collect()
}

// ============== Catalog Tests ==============

#[test]
fn test_rotation_counts() {
    let expected = [
        (PieceKind::I, 2),
        (PieceKind::O, 1),
        (PieceKind::T, 4),
        (PieceKind::S, 2),
        (PieceKind::Z, 2),
        (PieceKind::J, 4),
        (PieceKind::L, 4),
    ];
    for (kind, count) in expected {
        assert_eq!(shape(kind).rotation_count(), count, "{:?}", kind);
    }
}

#[test]
fn test_every_state_has_four_cells() {
    for kind in PieceKind::ALL {
        for rotation in 0..shape(kind).rotation_count() {
            assert_eq!(offsets(kind, rotation).len(), 4, "{:?} rotation {}", kind, rotation);
        }
    }
}

#[test]
fn test_i_piece_shapes() {
    assert_eq!(offsets(PieceKind::I, 0), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
    assert_eq!(offsets(PieceKind::I, 1), vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_o_piece_shape() {
    assert_eq!(offsets(PieceKind::O, 0), vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(offsets(PieceKind::T, 0), vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(offsets(PieceKind::T, 2), vec![(0, 1), (1, 1), (2, 1), (1, 2)]);
}

#[test]
fn test_s_and_z_shapes() {
    assert_eq!(offsets(PieceKind::S, 0), vec![(1, 0), (2, 0), (0, 1), (1, 1)]);
    assert_eq!(offsets(PieceKind::Z, 0), vec![(0, 0), (1, 0), (1, 1), (2, 1)]);
}

#[test]
fn test_j_and_l_shapes() {
    assert_eq!(offsets(PieceKind::J, 0), vec![(0, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(offsets(PieceKind::L, 0), vec![(2, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(offsets(PieceKind::L, 2), vec![(0, 1), (1, 1), (2, 1), (0, 2)]);
}

#[test]
fn test_colors() {
    assert_eq!(shape(PieceKind::I).color(), Color::Cyan);
    assert_eq!(shape(PieceKind::O).color(), Color::Yellow);
    assert_eq!(shape(PieceKind::T).color(), Color::Purple);
    assert_eq!(shape(PieceKind::S).color(), Color::Green);
    assert_eq!(shape(PieceKind::Z).color(), Color::Red);
    assert_eq!(shape(PieceKind::J).color(), Color::Blue);
    assert_eq!(shape(PieceKind::L).color(), Color::Orange);
}

#[test]
fn test_spawn_position() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        assert_eq!(piece.position, Position::new(4, 0));
        assert_eq!(piece.rotation(), 0);
    }
}

#[test]
fn test_rotated_keeps_position() {
    let piece = Piece::at(PieceKind::T, Position::new(3, 7), 0);
    let rotated = piece.rotated();
    assert_eq!(rotated.position, piece.position);
    assert_eq!(rotated.rotation(), 1);
    assert_eq!(piece.rotation(), 0);
}

#[test]
fn test_o_rotation_is_identity() {
    let piece = Piece::spawn(PieceKind::O);
    assert_eq!(piece.rotated(), piece);
}

// ============== Properties ==============

fn any_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn rotating_count_times_is_identity(kind in any_kind(), start in 0usize..4, x in -2i8..10, y in -2i8..20) {
        let piece = Piece::at(kind, Position::new(x, y), start);
        let mut turned = piece;
        for _ in 0..shape(kind).rotation_count() {
            turned = turned.rotated();
        }
        prop_assert_eq!(turned, piece);
    }

    #[test]
    fn rotation_index_wraps(kind in any_kind(), index in 0usize..64) {
        let count = shape(kind).rotation_count();
        prop_assert_eq!(shape(kind).rotation(index), shape(kind).rotation(index % count));
    }

    #[test]
    fn validity_matches_cellwise_rule(
        kind in any_kind(),
        rotation in 0usize..4,
        x in -4i8..14,
        y in -4i8..24,
        filled in prop::collection::vec(any::<bool>(), (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize)),
    ) {
        let mut board = Board::new();
        for (i, &f) in filled.iter().enumerate() {
            if f {
                let bx = (i % BOARD_WIDTH as usize) as i8;
                let by = (i / BOARD_WIDTH as usize) as i8;
                board.set(bx, by, Some(Color::Gray));
            }
        }

        let piece = Piece::at(kind, Position::new(x, y), rotation);
        let expected = piece.cells().all(|(cx, cy)| {
            let in_columns = cx >= 0 && cx < BOARD_WIDTH as i8;
            let above_floor = cy < BOARD_HEIGHT as i8;
            in_columns && above_floor && (cy < 0 || !board.is_occupied(cx, cy))
        });
        prop_assert_eq!(board.is_position_valid(&piece), expected);
    }
}
