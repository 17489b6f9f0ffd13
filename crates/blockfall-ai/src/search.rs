use std::iter;

use blockfall_engine::{Board, MoveDirection, Piece, PieceKind};

use crate::weights::FeatureWeights;

/// A searched move for one piece: the rotation state and anchor column to
/// take before dropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rotation: u8,
    pub col: i32,
}

/// Every resting position reachable by rotating and shifting a freshly
/// spawned piece of `kind`, already dropped to where it rests.
///
/// Rotation states are visited in ascending order. For each state the piece
/// is pushed to the leftmost legal column and then scanned rightward while
/// the board allows it, so scan order is stable and ties resolve toward low
/// rotations and low columns.
fn candidate_placements(board: &Board, kind: PieceKind) -> impl Iterator<Item = Piece> {
    (0..kind.rotation_states()).flat_map(move |rotation| {
        let mut piece = Piece::spawn(kind, board.config()).with_rotation(rotation);
        while board.is_move_legal(&piece, MoveDirection::Left) {
            piece = piece.shifted(MoveDirection::Left);
        }
        iter::successors(Some(piece), move |prev| {
            board
                .is_move_legal(prev, MoveDirection::Right)
                .then(|| prev.shifted(MoveDirection::Right))
        })
        .map(move |candidate| drop_to_rest(board, candidate))
    })
}

fn drop_to_rest(board: &Board, mut piece: Piece) -> Piece {
    while board.is_move_legal(&piece, MoveDirection::Down) {
        piece = piece.shifted(MoveDirection::Down);
    }
    piece
}

/// Scores a candidate on a throwaway copy of the board.
fn score_placement(board: &Board, candidate: &Piece, weights: &FeatureWeights) -> f32 {
    let mut trial = board.clone();
    trial.place(candidate);
    weights.evaluate(&trial)
}

/// Best reachable score for `kind` on `board`, `None` when every placement
/// tops out.
fn best_score(board: &Board, kind: PieceKind, weights: &FeatureWeights) -> Option<f32> {
    candidate_placements(board, kind)
        .map(|candidate| score_placement(board, &candidate, weights))
        .filter(|score| score.is_finite())
        .reduce(f32::max)
}

/// Picks the best placement for `kind` on `board` under `weights`.
///
/// Scores are compared strictly, so the first-scanned of equally scored
/// placements wins. Returns `None` when every placement tops out.
#[must_use]
pub fn select_move(board: &Board, kind: PieceKind, weights: &FeatureWeights) -> Option<Placement> {
    let mut best: Option<(f32, Placement)> = None;
    for candidate in candidate_placements(board, kind) {
        let score = score_placement(board, &candidate, weights);
        if !score.is_finite() {
            continue;
        }
        if best.is_none_or(|(best_score, _)| score > best_score) {
            let placement = Placement {
                rotation: candidate.rotation(),
                col: candidate.col(),
            };
            best = Some((score, placement));
        }
    }
    best.map(|(_, placement)| placement)
}

/// Picks a placement for `kind` weighing in the best follow-up available to
/// `next`.
///
/// Each surviving candidate's score is added to the best score the next kind
/// can reach on the cleared result of that candidate. When every follow-up
/// tops out, the plain immediate best is used instead, so a cornered search
/// still plays the strongest move it has.
#[must_use]
pub fn select_move_with_lookahead(
    board: &Board,
    kind: PieceKind,
    next: PieceKind,
    weights: &FeatureWeights,
) -> Option<Placement> {
    let mut best: Option<(f32, Placement)> = None;
    let mut best_immediate: Option<(f32, Placement)> = None;
    for candidate in candidate_placements(board, kind) {
        let score = score_placement(board, &candidate, weights);
        if !score.is_finite() {
            continue;
        }
        let placement = Placement {
            rotation: candidate.rotation(),
            col: candidate.col(),
        };
        if best_immediate.is_none_or(|(s, _)| score > s) {
            best_immediate = Some((score, placement));
        }

        let mut after = board.clone();
        after.place(&candidate);
        after.clear_full_rows_now();
        let Some(follow_up) = best_score(&after, next, weights) else {
            continue;
        };
        let combined = score + follow_up;
        if best.is_none_or(|(s, _)| combined > s) {
            best = Some((combined, placement));
        }
    }
    best.or(best_immediate).map(|(_, placement)| placement)
}
