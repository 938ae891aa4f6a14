//! Move policies
//!
//! A policy maps one [`GameState`] to a single [`Move`], or to `None` when it
//! cannot find anything to do. Policies never fail.
//!
//! Two strategies exist and they are deliberately not merged:
//!
//! - [`GreedyPolicy`] heads for the nearest coin in any direction, stepping
//!   around walls directly adjacent to the player, and otherwise wanders
//!   randomly. Column axis is tried before the row axis. This is the default.
//! - [`StraightLinePolicy`] only chases coins sharing a row or column with
//!   the player and with no wall strictly between them; otherwise it walks
//!   toward a fixed target (the grid centre). Row axis is tried before the
//!   column axis. It ignores walls next to the player, so it may ask to
//!   walk into one.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::grid::{Move, Position};
use crate::state::GameState;

/// Default fallback target for a 10x10 grid
pub const GRID_CENTER: Position = Position::new(5, 5);

/// Decision function selecting one move per game state
pub trait MovePolicy: Send {
    /// Choose the next move, or `None` if no move makes sense
    fn decide(&mut self, state: &GameState) -> Option<Move>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Which policy a deployment runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    StraightLine,
    #[default]
    Greedy,
}

impl PolicyKind {
    /// Build a fresh policy instance
    ///
    /// `fallback` is only used by [`PolicyKind::StraightLine`].
    pub fn build(self, fallback: Position) -> Box<dyn MovePolicy> {
        match self {
            PolicyKind::StraightLine => Box::new(StraightLinePolicy::new(fallback)),
            PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
        }
    }
}

/// True when `mv` leads to a cell that exists and holds no wall
fn is_open(state: &GameState, mv: Move) -> bool {
    state
        .position
        .step(mv)
        .is_some_and(|cell| !state.is_wall(&cell))
}

/// Nearest coin by Manhattan distance, first in input order on ties
fn nearest<'a>(from: Position, coins: impl Iterator<Item = &'a Position>) -> Option<Position> {
    coins.min_by_key(|coin| from.distance(coin)).copied()
}

/// Straight-line coin chaser with a fixed fallback target
#[derive(Debug, Clone)]
pub struct StraightLinePolicy {
    fallback: Position,
}

impl StraightLinePolicy {
    pub fn new(fallback: Position) -> Self {
        Self { fallback }
    }

    /// True when `to` shares a row or column with `from` and no wall lies
    /// strictly between them
    pub fn is_reachable(from: Position, to: Position, walls: &HashSet<Position>) -> bool {
        let between = |a: i32, b: i32, x: i32| a.min(b) < x && x < a.max(b);
        if from.row == to.row {
            !walls
                .iter()
                .any(|w| w.row == from.row && between(from.col, to.col, w.col))
        } else if from.col == to.col {
            !walls
                .iter()
                .any(|w| w.col == from.col && between(from.row, to.row, w.row))
        } else {
            false
        }
    }

    /// One step toward `to`, rows first
    fn step_toward(from: Position, to: Position) -> Option<Move> {
        Move::toward_row(from.row, to.row).or_else(|| Move::toward_col(from.col, to.col))
    }
}

impl Default for StraightLinePolicy {
    fn default() -> Self {
        Self::new(GRID_CENTER)
    }
}

impl MovePolicy for StraightLinePolicy {
    fn decide(&mut self, state: &GameState) -> Option<Move> {
        let pos = state.position;
        let target = nearest(
            pos,
            state
                .coins
                .iter()
                .filter(|coin| Self::is_reachable(pos, **coin, &state.walls)),
        );

        target
            .and_then(|coin| Self::step_toward(pos, coin))
            .or_else(|| Self::step_toward(pos, self.fallback))
    }

    fn name(&self) -> &'static str {
        "straight-line"
    }
}

/// Nearest-coin chaser with local wall avoidance and a random fallback
pub struct GreedyPolicy<R = StdRng> {
    rng: R,
}

impl GreedyPolicy<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for GreedyPolicy<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GreedyPolicy<R> {
    /// Use a caller-supplied random source (seeded in tests)
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// First unblocked move from a uniformly shuffled set of all four
    fn random_open(&mut self, state: &GameState) -> Option<Move> {
        let mut moves = Move::ALL;
        moves.shuffle(&mut self.rng);
        moves.into_iter().find(|mv| is_open(state, *mv))
    }
}

impl<R: Rng + Send> MovePolicy for GreedyPolicy<R> {
    fn decide(&mut self, state: &GameState) -> Option<Move> {
        let pos = state.position;

        if let Some(coin) = nearest(pos, state.coins.iter()) {
            let preferred = [
                Move::toward_col(pos.col, coin.col),
                Move::toward_row(pos.row, coin.row),
            ];
            let open = preferred
                .into_iter()
                .flatten()
                .find(|mv| is_open(state, *mv));
            if open.is_some() {
                return open;
            }
        }

        self.random_open(state)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
