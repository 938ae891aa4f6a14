//! Grid positions and cardinal moves

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::BotError;

/// A cell on the game grid, addressed as (row, column)
///
/// On the wire a position is a two-element array `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell
    ///
    /// Widened to `u64`; two opposite corners of the `i32` plane do not fit
    /// in `u32`.
    pub fn distance(&self, other: &Position) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.col.abs_diff(other.col))
    }

    /// Cell reached by taking one step in `mv`, or `None` off the edge of
    /// the coordinate space
    pub fn step(&self, mv: Move) -> Option<Position> {
        let (dr, dc) = mv.vector();
        Some(Position::new(
            self.row.checked_add(dr)?,
            self.col.checked_add(dc)?,
        ))
    }
}

impl From<[i32; 2]> for Position {
    fn from([row, col]: [i32; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in declaration order
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Unit vector as (row delta, column delta)
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    /// Wire name published to the move topic
    pub const fn as_str(self) -> &'static str {
        match self {
            Move::Up => "UP",
            Move::Down => "DOWN",
            Move::Left => "LEFT",
            Move::Right => "RIGHT",
        }
    }

    /// Row-axis step taking row `from` toward row `to`, if they differ
    pub fn toward_row(from: i32, to: i32) -> Option<Move> {
        match to.cmp(&from) {
            Ordering::Greater => Some(Move::Down),
            Ordering::Less => Some(Move::Up),
            Ordering::Equal => None,
        }
    }

    /// Column-axis step taking column `from` toward column `to`, if they differ
    pub fn toward_col(from: i32, to: i32) -> Option<Move> {
        match to.cmp(&from) {
            Ordering::Greater => Some(Move::Right),
            Ordering::Less => Some(Move::Left),
            Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "UP" => Ok(Move::Up),
            "DOWN" => Ok(Move::Down),
            "LEFT" => Ok(Move::Left),
            "RIGHT" => Ok(Move::Right),
            other => Err(BotError::Protocol(format!("Unknown move: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_unit_vectors() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Move::Up), Some(Position::new(1, 2)));
        assert_eq!(origin.step(Move::Down), Some(Position::new(3, 2)));
        assert_eq!(origin.step(Move::Left), Some(Position::new(2, 1)));
        assert_eq!(origin.step(Move::Right), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_step_off_coordinate_space() {
        let max = Position::new(i32::MAX, i32::MAX);
        assert_eq!(max.step(Move::Down), None);
        assert_eq!(max.step(Move::Right), None);
        assert_eq!(max.step(Move::Up), Some(Position::new(i32::MAX - 1, i32::MAX)));

        let min = Position::new(i32::MIN, i32::MIN);
        assert_eq!(min.step(Move::Up), None);
        assert_eq!(min.step(Move::Left), None);
        assert_eq!(min.step(Move::Right), Some(Position::new(i32::MIN, i32::MIN + 1)));
    }

    #[test]
    fn test_axis_moves_at_extremes() {
        assert_eq!(Move::toward_row(i32::MAX, i32::MIN), Some(Move::Up));
        assert_eq!(Move::toward_row(i32::MIN, i32::MAX), Some(Move::Down));
        assert_eq!(Move::toward_col(i32::MIN, i32::MAX), Some(Move::Right));
        assert_eq!(Move::toward_col(i32::MAX, i32::MIN), Some(Move::Left));
        assert_eq!(Move::toward_col(7, 7), None);
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(2, 2);
        assert_eq!(a.distance(&a), 0);
        assert_eq!(a.distance(&Position::new(5, 2)), 3);
        assert_eq!(a.distance(&Position::new(-1, 6)), 7);

        let max = Position::new(i32::MAX, i32::MAX);
        let min = Position::new(i32::MIN, i32::MIN);
        assert_eq!(max.distance(&min), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_position_wire_format() {
        let pos: Position = serde_json::from_str("[3, 7]").unwrap();
        assert_eq!(pos, Position::new(3, 7));
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[3,7]");
        assert!(serde_json::from_str::<Position>("[3]").is_err());
    }

    #[test]
    fn test_move_names() {
        for mv in Move::ALL {
            assert_eq!(mv.as_str().parse::<Move>().unwrap(), mv);
            assert_eq!(
                serde_json::to_string(&mv).unwrap(),
                format!("\"{}\"", mv.as_str())
            );
        }
        assert!("NORTH".parse::<Move>().is_err());
    }
}
