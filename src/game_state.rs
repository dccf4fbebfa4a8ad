//! The full game position and the two kinds of turn

use std::cmp::Ordering;
use std::fmt;

use crate::{
    error::EngineError, ledger::Ledger, market::Market, market::MarketError, track, GOAL,
};

pub use crate::ledger::Seat;

/// Everything a player can do on their turn
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TurnAction {
    TakeSlot0,
    TakeSlot1,
    TakeSlot2,
    Advance,
}

impl TurnAction {
    /// All actions in the fixed order they are searched and merged in
    pub const ALL: [TurnAction; 4] = [
        TurnAction::TakeSlot0,
        TurnAction::TakeSlot1,
        TurnAction::TakeSlot2,
        TurnAction::Advance,
    ];

    /// The market slot bought from, `None` for `Advance`
    pub fn slot(self) -> Option<usize> {
        match self {
            TurnAction::TakeSlot0 => Some(0),
            TurnAction::TakeSlot1 => Some(1),
            TurnAction::TakeSlot2 => Some(2),
            TurnAction::Advance => None,
        }
    }
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot() {
            Some(slot) => write!(f, "buy patch {}", slot + 1),
            None => write!(f, "advance"),
        }
    }
}

/// One played turn, with both scores as they stood straight after it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnRecord {
    pub mover: Seat,
    pub action: TurnAction,
    pub mover_score: i32,
    pub opponent_score: i32,
}

impl TurnRecord {
    pub fn score_of(&self, seat: Seat) -> i32 {
        if seat == self.mover {
            self.mover_score
        } else {
            self.opponent_score
        }
    }
}

/// Decides which of two ledgers moves next
///
/// The marker furthest behind moves, counting a marker stacked on top as one
/// space further along. When that is level, the stacked marker moves, and
/// when neither is stacked `level_tie` moves. The result does not depend on
/// the order the ledgers are passed in.
pub fn resolve_active(a: &Ledger, b: &Ledger, level_tie: Seat) -> Seat {
    match a.effective_advancement().cmp(&b.effective_advancement()) {
        Ordering::Less => a.seat(),
        Ordering::Greater => b.seat(),
        Ordering::Equal => match (a.stacked_on_top, b.stacked_on_top) {
            (true, false) => a.seat(),
            (false, true) => b.seat(),
            _ => level_tie,
        },
    }
}

/// A complete game position
///
/// Cloning produces a fully independent position, so each branch of a
/// search owns its own market and ledgers.
#[derive(Clone, Debug)]
pub struct GameState {
    ledgers: [Ledger; 2],
    market: Market,
    level_tie: Seat,
    history: Vec<TurnRecord>,
}

impl GameState {
    /// Creates a position from both ledgers and the market
    ///
    /// `level_tie` is the player who moves when both markers share a space
    /// and neither is stacked on the other.
    pub fn new(first: Ledger, second: Ledger, market: Market, level_tie: Seat) -> Self {
        // keep ledgers indexed by their seat
        let ledgers = if first.seat() == Seat::Second {
            [second, first]
        } else {
            [first, second]
        };
        Self {
            ledgers,
            market,
            level_tie,
            history: Vec::new(),
        }
    }

    pub fn ledger(&self, seat: Seat) -> &Ledger {
        &self.ledgers[seat.index()]
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn level_tie(&self) -> Seat {
        self.level_tie
    }

    /// Turns played since this position was created, oldest first
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    pub fn into_history(self) -> Vec<TurnRecord> {
        self.history
    }

    /// The seat to move, recomputed from the markers on every call
    pub fn active_seat(&self) -> Seat {
        resolve_active(&self.ledgers[0], &self.ledgers[1], self.level_tie)
    }

    pub fn active(&self) -> &Ledger {
        self.ledger(self.active_seat())
    }

    pub fn passive(&self) -> &Ledger {
        self.ledger(self.active_seat().other())
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.ledger(seat).score()
    }

    /// Both markers have reached the goal
    pub fn is_terminal(&self) -> bool {
        self.ledgers.iter().all(|ledger| ledger.location >= GOAL)
    }

    pub fn is_legal(&self, action: TurnAction) -> bool {
        match action.slot() {
            None => true,
            Some(slot) => {
                self.market.count() > slot
                    && self
                        .market
                        .get(slot)
                        .map_or(false, |patch| self.active().can_afford(patch))
            }
        }
    }

    /// Legal actions for the player to move, in `TurnAction::ALL` order
    pub fn legal_actions(&self) -> Vec<TurnAction> {
        TurnAction::ALL
            .iter()
            .copied()
            .filter(|&action| self.is_legal(action))
            .collect()
    }

    /// Plays `action` for the player to move and records the turn
    ///
    /// The position is left untouched if the action is not legal.
    pub fn apply(&mut self, action: TurnAction) -> Result<(), EngineError> {
        let seat = self.active_seat();
        if !self.is_legal(action) {
            return Err(EngineError::IllegalAction { action, seat });
        }

        match action.slot() {
            Some(slot) => self.take_patch(seat, slot)?,
            None => self.advance(seat),
        }

        self.history.push(TurnRecord {
            mover: seat,
            action,
            mover_score: self.score(seat),
            opponent_score: self.score(seat.other()),
        });
        Ok(())
    }

    fn take_patch(&mut self, seat: Seat, slot: usize) -> Result<(), MarketError> {
        let patch = self.market.take(slot)?;
        let passive_location = self.ledger(seat.other()).location;
        let active = &mut self.ledgers[seat.index()];

        let triggers = track::triggers(active.location, patch.time_cost);
        active.location = active.location.saturating_add(patch.time_cost).min(GOAL);
        active.stacked_on_top = active.location == passive_location;
        active.buy(patch, triggers);
        Ok(())
    }

    fn advance(&mut self, seat: Seat) {
        let passive_location = self.ledger(seat.other()).location;
        let active = &mut self.ledgers[seat.index()];

        // one space past the opponent and a button for each of those spaces,
        // even when the marker itself stops at the goal
        let steps = (passive_location + 1).saturating_sub(active.location);
        let triggers = track::triggers(active.location, steps);
        active.location = (passive_location + 1).min(GOAL);
        active.stacked_on_top = false;
        active.receive_buttons(steps as i32, triggers);
    }
}
