//! Synthetic Chess960 dataset for tests

use shakmaty::Square;

use crate::classify::classify;
use crate::dataset::{ClassifiedPosition, MoveDescriptor, PieceKind, PieceOrder, Position, DATASET_SIZE};

pub fn square(name: &str) -> Square {
    name.parse().unwrap()
}

pub fn descriptor(
    san: &str,
    uci: &str,
    piece: PieceKind,
    from: &str,
    to: &str,
    score: i32,
) -> MoveDescriptor {
    MoveDescriptor {
        san: san.to_string(),
        uci: uci.to_string(),
        piece_moved: piece,
        from_square: square(from),
        to_square: square(to),
        score,
    }
}

pub fn pawn_push(from: &str, to: &str, score: i32) -> MoveDescriptor {
    descriptor(to, &format!("{}{}", from, to), PieceKind::Pawn, from, to, score)
}

pub fn knight_jump(from: &str, to: &str, score: i32) -> MoveDescriptor {
    descriptor(&format!("N{}", to), &format!("{}{}", from, to), PieceKind::Knight, from, to, score)
}

pub fn castle(king: &str, rook: &str, score: i32) -> MoveDescriptor {
    descriptor("O-O", &format!("{}{}", king, rook), PieceKind::King, king, rook, score)
}

/// Back rank for a 0-based Chess960 index (Scharnagl numbering, 518 = RNBQKBNR)
pub fn back_rank(index: usize) -> PieceOrder {
    const KNIGHTS: [(usize, usize); 10] = [
        (0, 1), (0, 2), (0, 3), (0, 4), (1, 2),
        (1, 3), (1, 4), (2, 3), (2, 4), (3, 4),
    ];

    let mut rank: [Option<PieceKind>; 8] = [None; 8];
    let mut n = index;

    rank[(n % 4) * 2 + 1] = Some(PieceKind::Bishop);
    n /= 4;
    rank[(n % 4) * 2] = Some(PieceKind::Bishop);
    n /= 4;

    let empty = |rank: &[Option<PieceKind>; 8]| -> Vec<usize> {
        (0..8).filter(|&f| rank[f].is_none()).collect()
    };

    let free = empty(&rank);
    rank[free[n % 6]] = Some(PieceKind::Queen);
    n /= 6;

    let free = empty(&rank);
    let (k1, k2) = KNIGHTS[n];
    rank[free[k1]] = Some(PieceKind::Knight);
    rank[free[k2]] = Some(PieceKind::Knight);

    let free = empty(&rank);
    rank[free[0]] = Some(PieceKind::Rook);
    rank[free[1]] = Some(PieceKind::King);
    rank[free[2]] = Some(PieceKind::Rook);

    PieceOrder::new(rank.map(|p| p.unwrap()))
}

pub fn fen_for(order: &PieceOrder) -> String {
    let white = order.to_string();
    format!(
        "{}/pppppppp/8/8/8/8/PPPPPPPP/{} w KQkq - 0 1",
        white.to_lowercase(),
        white
    )
}

pub fn position(number: u32, order: PieceOrder, best: MoveDescriptor) -> Position {
    Position {
        number,
        fen: fen_for(&order),
        piece_order: order,
        evaluation_score: best.score,
        top_moves: vec![best.clone()],
        best_move: best,
    }
}

pub fn classified(position: Position) -> ClassifiedPosition {
    let classification = classify(&position.best_move).unwrap();
    ClassifiedPosition { position, classification }
}

/// Deterministic best move: cycles through the 16 pawn pushes, a knight move and castling
fn best_move_for(number: u32, order: &PieceOrder) -> MoveDescriptor {
    const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
    let score = (number as i32 % 61) - 10;
    let slot = (number % 18) as usize;

    let file_of = |kind: PieceKind| order.pieces().iter().position(|&p| p == kind).unwrap();

    match slot {
        0..=15 => {
            let file = FILES[slot / 2];
            let rank = if slot % 2 == 0 { '3' } else { '4' };
            pawn_push(&format!("{}2", file), &format!("{}{}", file, rank), score)
        }
        16 => {
            let f = file_of(PieceKind::Knight);
            let to = if f > 0 { f - 1 } else { f + 1 };
            knight_jump(&format!("{}1", FILES[f]), &format!("{}3", FILES[to]), score)
        }
        _ => {
            let king = file_of(PieceKind::King);
            let rook = (king..8).find(|&f| order.pieces()[f] == PieceKind::Rook).unwrap();
            castle(&format!("{}1", FILES[king]), &format!("{}1", FILES[rook]), score)
        }
    }
}

/// The full 960-position dataset, numbered 1..=960
pub fn full_positions() -> Vec<Position> {
    (0..DATASET_SIZE)
        .map(|index| {
            let number = index as u32 + 1;
            let order = back_rank(index);
            let best = best_move_for(number, &order);
            position(number, order, best)
        })
        .collect()
}

pub fn full_dataset() -> Vec<ClassifiedPosition> {
    full_positions().into_iter().map(classified).collect()
}

/// The full dataset in the camelCase record shape
pub fn dataset_json() -> String {
    serde_json::to_string(&full_positions()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_back_rank() {
        assert_eq!(back_rank(518).to_string(), "RNBQKBNR");
    }

    #[test]
    fn test_back_ranks_are_distinct() {
        let mut ranks: Vec<String> = (0..DATASET_SIZE).map(|i| back_rank(i).to_string()).collect();
        ranks.sort();
        ranks.dedup();
        assert_eq!(ranks.len(), DATASET_SIZE);
    }
}
