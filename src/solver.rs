//! A depth-limited search for the best next move

use rayon::prelude::*;

use std::fmt;
use std::str::FromStr;

use crate::{
    error::EngineError,
    game_state::{GameState, Seat, TurnAction, TurnRecord},
    DEFAULT_DEPTH, DEFAULT_WORKERS,
};

/// Both players' scores at the end of an explored line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub first: i32,
    pub second: i32,
}

impl Projection {
    /// Scores as recorded by the last turn played in `state`
    pub fn of(state: &GameState) -> Self {
        match state.history().last() {
            Some(record) => Self {
                first: record.score_of(Seat::First),
                second: record.score_of(Seat::Second),
            },
            None => Self {
                first: state.score(Seat::First),
                second: state.score(Seat::Second),
            },
        }
    }

    pub fn for_seat(&self, seat: Seat) -> i32 {
        match seat {
            Seat::First => self.first,
            Seat::Second => self.second,
        }
    }

    /// The seat's lead over its opponent, negative when behind
    pub fn margin(&self, seat: Seat) -> i32 {
        self.for_seat(seat) - self.for_seat(seat.other())
    }
}

/// The end of an explored line
#[derive(Clone, Debug)]
struct Leaf {
    projection: Projection,
    line: Vec<TurnRecord>,
}

impl From<GameState> for Leaf {
    fn from(state: GameState) -> Self {
        Self {
            projection: Projection::of(&state),
            line: state.into_history(),
        }
    }
}

/// Keeps whichever of two leaves is better for `seat`
///
/// A candidate only replaces the incumbent when it has `seat` ahead of the
/// opponent and scores `seat` strictly higher than the incumbent does. This
/// is a greedy comparison on the mover's own score, not a minimax over the
/// opponent's best reply.
fn choose_better(seat: Seat, best: Option<Leaf>, candidate: Leaf) -> Leaf {
    match best {
        None => candidate,
        Some(best) => {
            let score = candidate.projection.for_seat(seat);
            if score > candidate.projection.for_seat(seat.other())
                && score > best.projection.for_seat(seat)
            {
                candidate
            } else {
                best
            }
        }
    }
}

/// How the root of the search tree is expanded
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// One thread walks the whole tree
    Sequential,
    /// Each root action is searched on its own worker, `0` lets rayon pick
    /// the worker count
    Parallel { workers: usize },
}

impl Strategy {
    /// Recommends a move for the player to move in `state`
    pub fn recommend(
        self,
        state: &GameState,
        max_depth: usize,
    ) -> Result<Recommendation, EngineError> {
        Solver::new(state.clone())
            .with_strategy(self)
            .with_depth(max_depth)
            .solve()
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Sequential
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown strategy '{0}', expected greedy_single_core, greedy_four_core, sequential, parallel or parallel:<workers>")]
pub struct UnknownStrategy(String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_lowercase().as_str() {
            "greedy_single_core" | "sequential" => Ok(Strategy::Sequential),
            "greedy_four_core" | "parallel" => Ok(Strategy::Parallel {
                workers: DEFAULT_WORKERS,
            }),
            other => other
                .strip_prefix("parallel:")
                .and_then(|workers| workers.parse::<usize>().ok())
                .map(|workers| Strategy::Parallel { workers })
                .ok_or_else(|| UnknownStrategy(name.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "sequential"),
            Strategy::Parallel { workers } => write!(f, "parallel:{}", workers),
        }
    }
}

/// The best line found for one root action
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Alternative {
    pub action: TurnAction,
    pub projection: Projection,
}

/// The move to play, with the line that justified it
#[derive(Clone, Debug)]
pub struct Recommendation {
    /// the player the move is recommended for
    pub mover: Seat,
    pub action: TurnAction,
    /// both scores at the end of `line`
    pub projection: Projection,
    /// the turns from the current position to the end of the horizon
    pub line: Vec<TurnRecord>,
    /// every legal root action with its own best line's scores, in action order
    pub alternatives: Vec<Alternative>,
}

impl Recommendation {
    pub fn mover_score(&self) -> i32 {
        self.projection.for_seat(self.mover)
    }

    pub fn opponent_score(&self) -> i32 {
        self.projection.for_seat(self.mover.other())
    }

    /// Alternatives ordered from the best margin for the mover to the worst
    pub fn ranked_alternatives(&self) -> Vec<Alternative> {
        let mut ranked = self.alternatives.clone();
        ranked.sort_by_key(|alternative| -alternative.projection.margin(self.mover));
        ranked
    }
}

// plays `action` on a copy of `state`, then keeps searching below it while
// the horizon allows
fn explore(
    state: &GameState,
    action: TurnAction,
    max_depth: usize,
    depth: usize,
    node_count: &mut usize,
) -> Result<Leaf, EngineError> {
    let mut next = state.clone();
    next.apply(action)?;
    *node_count += 1;

    if depth < max_depth && !next.is_terminal() {
        if let Some(leaf) = search(&next, max_depth, depth + 1, node_count)? {
            return Ok(leaf);
        }
    }
    Ok(Leaf::from(next))
}

// folds every legal action of `state` from the mover's point of view
fn search(
    state: &GameState,
    max_depth: usize,
    depth: usize,
    node_count: &mut usize,
) -> Result<Option<Leaf>, EngineError> {
    let seat = state.active_seat();
    let mut best = None;
    for action in state.legal_actions() {
        let candidate = explore(state, action, max_depth, depth, node_count)?;
        best = Some(choose_better(seat, best, candidate));
    }
    Ok(best)
}

/// An agent recommending moves for Patchwork positions
///
/// # Notes
/// Every legal action is played on its own copy of the position and the
/// tree is walked to `max_depth` turns beyond the root. Leaves are scored
/// for both players by [`Ledger::score`], and results are merged in the
/// fixed order of [`TurnAction::ALL`] so both strategies recommend the same
/// move.
///
/// [`Ledger::score`]: crate::ledger::Ledger::score
#[derive(Clone)]
pub struct Solver {
    state: GameState,
    max_depth: usize,
    strategy: Strategy,

    /// The number of positions searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new sequential `Solver` searching to `DEFAULT_DEPTH`
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            max_depth: DEFAULT_DEPTH,
            strategy: Strategy::Sequential,
            node_count: 0,
        }
    }

    /// Sets how many turns beyond the root are explored, 0 scores each
    /// action directly
    pub fn with_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Searches the position and returns the recommended move
    pub fn solve(&mut self) -> Result<Recommendation, EngineError> {
        if self.state.is_terminal() {
            return Err(EngineError::GameOver);
        }
        let mover = self.state.active_seat();
        let actions = self.state.legal_actions();

        let candidates = match self.strategy {
            Strategy::Sequential => actions
                .iter()
                .map(|&action| self.explore_root(action))
                .collect::<Result<Vec<_>, _>>()?,
            Strategy::Parallel { workers } => {
                log::debug!(
                    "dispatching {} root actions to {} workers",
                    actions.len(),
                    workers
                );
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .build()?;
                let root = &*self;
                // collecting an indexed iterator keeps the action order
                pool.install(|| {
                    actions
                        .par_iter()
                        .map(|&action| root.explore_root(action))
                        .collect::<Result<Vec<_>, _>>()
                })?
            }
        };

        let mut alternatives = Vec::with_capacity(candidates.len());
        let mut best = None;
        for (action, leaf, nodes) in candidates {
            log::debug!(
                "{} for {}: {} to {} after {} positions",
                action,
                mover,
                leaf.projection.for_seat(mover),
                leaf.projection.for_seat(mover.other()),
                nodes
            );
            self.node_count += nodes;
            alternatives.push(Alternative {
                action,
                projection: leaf.projection,
            });
            best = Some(choose_better(mover, best, leaf));
        }

        let best = best.ok_or(EngineError::GameOver)?;
        let action = best
            .line
            .first()
            .map(|record| record.action)
            .ok_or(EngineError::GameOver)?;

        log::info!(
            "recommending {} for {} ({} to {}) after {} positions at depth {}",
            action,
            mover,
            best.projection.for_seat(mover),
            best.projection.for_seat(mover.other()),
            self.node_count,
            self.max_depth
        );

        Ok(Recommendation {
            mover,
            action,
            projection: best.projection,
            line: best.line,
            alternatives,
        })
    }

    fn explore_root(&self, action: TurnAction) -> Result<(TurnAction, Leaf, usize), EngineError> {
        let mut node_count = 0;
        let leaf = explore(&self.state, action, self.max_depth, 0, &mut node_count)?;
        Ok((action, leaf, node_count))
    }
}

impl std::ops::Deref for Solver {
    type Target = GameState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}
