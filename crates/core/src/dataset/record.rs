//! Wire records for the position dataset
//!
//! Two shapes are accepted: the camelCase record with a nested `bestMove`
//! descriptor, and the flat snake_case record written by the offline engine
//! pipeline (`best_move` as UCI, `best_move_san`, `best_score`, `top_moves`).

use serde::Deserialize;
use shakmaty::{fen::Fen, san::San, CastlingMode, Chess, Color, File, Move, Rank, Role, Square};
use std::collections::BTreeMap;

use super::models::*;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DatasetFile {
    List(Vec<PositionRecord>),
    Keyed(BTreeMap<String, PositionRecord>),
}

impl DatasetFile {
    pub(crate) fn into_records(self) -> Vec<PositionRecord> {
        match self {
            DatasetFile::List(records) => records,
            DatasetFile::Keyed(map) => map.into_values().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionRecord {
    #[serde(alias = "position_number")]
    pub number: u32,
    pub fen: String,
    #[serde(default, rename = "pieceOrder", alias = "piece_order")]
    piece_order: Option<PieceOrderRecord>,
    #[serde(default, rename = "bestMove", alias = "best_move")]
    best_move: Option<BestMoveRecord>,
    #[serde(default)]
    best_move_san: Option<String>,
    #[serde(default)]
    piece_moved: Option<String>,
    #[serde(default)]
    from_square: Option<String>,
    #[serde(default)]
    to_square: Option<String>,
    #[serde(default, rename = "topMoves", alias = "top_moves")]
    top_moves: Vec<MoveRecord>,
    #[serde(default, rename = "evaluationScore", alias = "best_score")]
    evaluation_score: Option<ScoreRecord>,
    #[serde(default)]
    score: Option<ScoreRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PieceOrderRecord {
    Letters(String),
    Names(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BestMoveRecord {
    Descriptor(MoveRecord),
    Uci(String),
}

#[derive(Debug, Clone, Deserialize)]
struct MoveRecord {
    #[serde(alias = "move_san")]
    san: String,
    #[serde(default, alias = "move_uci")]
    uci: Option<String>,
    #[serde(default, rename = "pieceMoved", alias = "piece_moved")]
    piece_moved: Option<String>,
    #[serde(default, rename = "fromSquare", alias = "from_square")]
    from_square: Option<String>,
    #[serde(default, rename = "toSquare", alias = "to_square")]
    to_square: Option<String>,
    #[serde(default, alias = "score_cp")]
    score: Option<ScoreRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScoreRecord {
    Centipawns(i32),
    Text(String),
}

impl ScoreRecord {
    /// Accepts plain integers and the engine's `PovScore(Cp(+35), WHITE)` form
    fn centipawns(&self) -> std::result::Result<i32, String> {
        match self {
            ScoreRecord::Centipawns(cp) => Ok(*cp),
            ScoreRecord::Text(text) => {
                if text.contains("Mate") || text.contains('#') {
                    return Err(format!("mate score '{}' has no centipawn value", text));
                }
                let digits = match text.find("Cp(") {
                    Some(start) => {
                        let rest = &text[start + 3..];
                        &rest[..rest.find(')').unwrap_or(rest.len())]
                    }
                    None => text.as_str(),
                };
                digits
                    .trim()
                    .trim_start_matches('+')
                    .parse()
                    .map_err(|_| format!("unreadable score '{}'", text))
            }
        }
    }
}

/// Resolution context for one record
struct RecordContext {
    number: u32,
    fen: Fen,
    chess: Option<Chess>,
}

impl RecordContext {
    fn error(&self, message: impl std::fmt::Display) -> Error {
        Error::DataLoad(format!("position {}: {}", self.number, message))
    }

    /// Board position for resolving SAN, built on first use
    fn chess(&mut self) -> Result<&Chess> {
        if self.chess.is_none() {
            let position: Chess = self
                .fen
                .clone()
                .into_position(CastlingMode::Chess960)
                .map_err(|e| self.error(format!("illegal position: {}", e)))?;
            self.chess = Some(position);
        }
        self.chess
            .as_ref()
            .ok_or_else(|| self.error("position unavailable"))
    }

    fn square(&self, name: &str) -> Result<Square> {
        name.parse()
            .map_err(|_| self.error(format!("invalid square '{}'", name)))
    }

    fn resolve(&mut self, record: &MoveRecord, fallback_score: Option<i32>) -> Result<MoveDescriptor> {
        let score = match &record.score {
            Some(s) => s.centipawns().map_err(|e| self.error(e))?,
            None => fallback_score.ok_or_else(|| self.error(format!("move {} has no score", record.san)))?,
        };

        if let (Some(piece), Some(from), Some(to)) =
            (&record.piece_moved, &record.from_square, &record.to_square)
        {
            let piece_moved = PieceKind::from_name(piece)
                .ok_or_else(|| self.error(format!("unknown piece '{}'", piece)))?;
            let from_square = self.square(from)?;
            let to_square = self.square(to)?;
            let uci = record
                .uci
                .clone()
                .unwrap_or_else(|| format!("{}{}", from_square, to_square));
            return Ok(MoveDescriptor {
                san: record.san.clone(),
                uci,
                piece_moved,
                from_square,
                to_square,
                score,
            });
        }

        let san: San = record
            .san
            .parse()
            .map_err(|e| self.error(format!("invalid SAN '{}': {}", record.san, e)))?;
        let number = self.number;
        let mv = san
            .to_move(self.chess()?)
            .map_err(|e| Error::DataLoad(format!("position {}: move {} not playable: {}", number, record.san, e)))?;
        let from_square = mv
            .from()
            .ok_or_else(|| self.error(format!("move {} has no origin square", record.san)))?;

        Ok(MoveDescriptor {
            san: record.san.clone(),
            uci: record.uci.clone().unwrap_or_else(|| move_to_uci(&mv)),
            piece_moved: PieceKind::from_role(mv.role()),
            from_square,
            to_square: mv.to(),
            score,
        })
    }
}

/// Chess960 UCI: castling is written king-to-rook
fn move_to_uci(mv: &Move) -> String {
    match mv {
        Move::Normal { from, to, promotion, .. } => {
            let promo = promotion
                .map(|r| r.char().to_string())
                .unwrap_or_default();
            format!("{}{}{}", from, to, promo)
        }
        Move::EnPassant { from, to, .. } => format!("{}{}", from, to),
        Move::Castle { king, rook } => format!("{}{}", king, rook),
        Move::Put { .. } => String::new(),
    }
}

/// White's first rank as written in the FEN
fn back_rank_of(fen: &Fen) -> Option<PieceOrder> {
    let board = fen.clone().into_setup().board;
    let kinds: Vec<PieceKind> = File::ALL
        .iter()
        .map(|&file| {
            board
                .piece_at(Square::from_coords(file, Rank::First))
                .filter(|piece| piece.color == Color::White && piece.role != Role::Pawn)
                .map(|piece| PieceKind::from_role(piece.role))
        })
        .collect::<Option<_>>()?;
    PieceOrder::from_kinds(&kinds)
}

impl PositionRecord {
    /// Converts a wire record into a validated position, renumbered by `offset`
    pub(crate) fn into_position(self, offset: u32) -> Result<Position> {
        let number = self.number.checked_add(offset).ok_or_else(|| {
            Error::DataLoad(format!("position number {} out of range", self.number))
        })?;
        let fen: Fen = self
            .fen
            .parse()
            .map_err(|e| Error::DataLoad(format!("position {}: invalid FEN: {}", number, e)))?;

        let mut ctx = RecordContext { number, fen, chess: None };

        let derived_order = back_rank_of(&ctx.fen)
            .ok_or_else(|| ctx.error("FEN has no complete white back rank"))?;
        let piece_order = match &self.piece_order {
            None => derived_order,
            Some(record) => {
                let order = match record {
                    PieceOrderRecord::Letters(letters) => PieceOrder::parse(letters),
                    PieceOrderRecord::Names(names) => names
                        .iter()
                        .map(|n| PieceKind::from_name(n))
                        .collect::<Option<Vec<_>>>()
                        .and_then(|kinds| PieceOrder::from_kinds(&kinds)),
                }
                .ok_or_else(|| ctx.error("unreadable piece order"))?;
                if order != derived_order {
                    return Err(ctx.error(format!(
                        "piece order {} disagrees with FEN back rank {}",
                        order, derived_order
                    )));
                }
                order
            }
        };

        let evaluation_score = match self.evaluation_score.as_ref().or(self.score.as_ref()) {
            Some(s) => Some(s.centipawns().map_err(|e| ctx.error(e))?),
            None => None,
        };

        // Wire top moves are not guaranteed to be sorted
        let top_record_score = self
            .top_moves
            .iter()
            .filter_map(|m| m.score.as_ref())
            .filter_map(|s| s.centipawns().ok())
            .max();

        let best_record = match self.best_move {
            Some(BestMoveRecord::Descriptor(record)) => record,
            Some(BestMoveRecord::Uci(uci)) => MoveRecord {
                san: self
                    .best_move_san
                    .clone()
                    .ok_or_else(|| ctx.error("best move has no SAN"))?,
                uci: Some(uci),
                piece_moved: self.piece_moved.clone(),
                from_square: self.from_square.clone(),
                to_square: self.to_square.clone(),
                score: None,
            },
            None => MoveRecord {
                san: self
                    .best_move_san
                    .clone()
                    .ok_or_else(|| ctx.error("record has no best move"))?,
                uci: None,
                piece_moved: self.piece_moved.clone(),
                from_square: self.from_square.clone(),
                to_square: self.to_square.clone(),
                score: None,
            },
        };

        let best_move = ctx.resolve(&best_record, evaluation_score.or(top_record_score))?;
        let evaluation_score = evaluation_score.unwrap_or(best_move.score);

        let mut top_moves = self
            .top_moves
            .iter()
            .map(|record| ctx.resolve(record, None))
            .collect::<Result<Vec<_>>>()?;
        top_moves.sort_by(|a, b| b.score.cmp(&a.score));
        top_moves.truncate(3);

        Ok(Position {
            number,
            fen: self.fen,
            piece_order,
            best_move,
            top_moves,
            evaluation_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPELINE_RECORD: &str = r#"{
        "position_number": 518,
        "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "piece_order": ["Rook", "Knight", "Bishop", "Queen", "King", "Bishop", "Knight", "Rook"],
        "best_move": "e2e4",
        "best_move_san": "e4",
        "best_score": 35,
        "top_moves": [
            {"move_san": "d4", "score_cp": 30},
            {"move_san": "e4", "score_cp": 35},
            {"move_san": "Nf3", "score_cp": 28}
        ]
    }"#;

    #[test]
    fn test_pipeline_record_derives_move_details() {
        let record: PositionRecord = serde_json::from_str(PIPELINE_RECORD).unwrap();
        let position = record.into_position(1).unwrap();

        assert_eq!(position.number, 519);
        assert_eq!(position.piece_order.to_string(), "RNBQKBNR");
        assert_eq!(position.evaluation_score, 35);
        assert_eq!(position.best_move.piece_moved, PieceKind::Pawn);
        assert_eq!(position.best_move.from_square, Square::E2);
        assert_eq!(position.best_move.to_square, Square::E4);
        assert_eq!(position.best_move.uci, "e2e4");

        let sans: Vec<&str> = position.top_moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "d4", "Nf3"]);
        assert_eq!(position.top_moves[2].piece_moved, PieceKind::Knight);
        assert_eq!(position.top_moves[2].to_square, Square::F3);
    }

    #[test]
    fn test_missing_best_score_falls_back_to_highest_top_move() {
        let json = PIPELINE_RECORD.replace(r#""best_score": 35,"#, "");
        let record: PositionRecord = serde_json::from_str(&json).unwrap();
        let position = record.into_position(0).unwrap();
        assert_eq!(position.best_move.score, 35);
        assert_eq!(position.evaluation_score, 35);
    }

    #[test]
    fn test_renumbering_overflow_is_load_error() {
        let json = PIPELINE_RECORD.replace("518", &u32::MAX.to_string());
        let record: PositionRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(record.into_position(1), Err(Error::DataLoad(_))));
    }

    #[test]
    fn test_textual_engine_score() {
        let text = ScoreRecord::Text("PovScore(Cp(+42), WHITE)".to_string());
        assert_eq!(text.centipawns(), Ok(42));

        let negative = ScoreRecord::Text("PovScore(Cp(-7), WHITE)".to_string());
        assert_eq!(negative.centipawns(), Ok(-7));

        let mate = ScoreRecord::Text("PovScore(Mate(+3), WHITE)".to_string());
        assert!(mate.centipawns().is_err());
    }

    #[test]
    fn test_piece_order_must_match_fen() {
        let json = PIPELINE_RECORD.replace(
            r#"["Rook", "Knight", "Bishop", "Queen", "King", "Bishop", "Knight", "Rook"]"#,
            r#""RNBKQBNR""#,
        );
        let record: PositionRecord = serde_json::from_str(&json).unwrap();
        let err = record.into_position(0).unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
    }

    #[test]
    fn test_invalid_fen_is_load_error() {
        let json = PIPELINE_RECORD.replace("rnbqkbnr/pppppppp", "rnbqkbnr/ppppzppp");
        let record: PositionRecord = serde_json::from_str(&json).unwrap();
        assert!(matches!(record.into_position(0), Err(Error::DataLoad(_))));
    }

    #[test]
    fn test_keyed_file_shape() {
        let json = format!(r#"{{"518": {}}}"#, PIPELINE_RECORD);
        let file: DatasetFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file.into_records().len(), 1);
    }
}
