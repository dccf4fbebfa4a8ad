//! A move advisor for the two-player tile-buying board game 'Patchwork'
//!
//! The advisor models the market of patches, the shared time track and both
//! players' ledgers, then walks the game tree to a fixed depth to recommend
//! the move that maximises the mover's projected score.
//!
//! # Basic Usage
//!
//! ```
//! use patchwork_advisor::{snapshot::Snapshot, solver::Solver, GameState};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let snapshot = Snapshot::from_json(include_str!("../test_data/midgame.json"))?;
//! let state = GameState::from_snapshot(&snapshot)?;
//!
//! let mut solver = Solver::new(state).with_depth(2);
//! let recommendation = solver.solve()?;
//!
//! assert!(!recommendation.line.is_empty());
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod patch;

pub mod market;

pub mod track;

pub mod ledger;

pub mod game_state;

pub mod snapshot;

pub mod solver;


pub use error::EngineError;
pub use game_state::{GameState, Seat, TurnAction, TurnRecord};
pub use ledger::Ledger;
pub use market::Market;
pub use patch::Patch;

/// The number of spaces on a player's quilt board
pub const BOARD_CAPACITY: i32 = 81;

/// The final space of the time track
pub const GOAL: u32 = 53;

/// The number of patches that can be bought at any time
pub const MARKET_WINDOW: usize = 3;

/// Points awarded for holding the 7x7 bonus tile
pub const BONUS_TILE_POINTS: i32 = 7;

/// Search depth used when none is configured
pub const DEFAULT_DEPTH: usize = 3;

/// Worker count of the parallel strategy when none is configured
pub const DEFAULT_WORKERS: usize = 4;

// the last income phase is paid out on the goal space itself
const_assert_eq!(track::INCOME_TRIGGERS[track::INCOME_TRIGGERS.len() - 1], GOAL);
const_assert!(track::BONUS_TRIGGERS[track::BONUS_TRIGGERS.len() - 1] < GOAL);
const_assert_eq!(MARKET_WINDOW, 3);
