//! Per-player economy and time track position

use std::collections::HashSet;
use std::fmt;

use crate::{patch::Patch, track, track::Triggers, BOARD_CAPACITY, BONUS_TILE_POINTS};

/// Which of the two players a ledger belongs to
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => write!(f, "player 1"),
            Seat::Second => write!(f, "player 2"),
        }
    }
}

/// One player's buttons, income, quilt and time marker
#[derive(Clone, Debug)]
pub struct Ledger {
    seat: Seat,
    pub button_count: i32,
    pub button_production: i32,
    owned_patches: HashSet<Patch>,
    /// derived from `owned_patches`, refreshed on every change to it
    free_capacity: i32,
    pub owns_bonus_tile: bool,
    pub location: u32,
    pub stacked_on_top: bool,
}

impl Ledger {
    /// Creates a ledger at the start of the track with no patches
    pub fn new(seat: Seat, button_count: i32) -> Self {
        Self {
            seat,
            button_count,
            button_production: 0,
            owned_patches: HashSet::new(),
            free_capacity: BOARD_CAPACITY,
            owns_bonus_tile: false,
            location: 0,
            stacked_on_top: false,
        }
    }

    /// Replaces the owned patches, recomputing the free capacity
    pub fn with_patches<I: IntoIterator<Item = Patch>>(mut self, patches: I) -> Self {
        self.owned_patches = patches.into_iter().collect();
        self.recalculate_free_capacity();
        self
    }

    pub fn with_production(mut self, button_production: i32) -> Self {
        self.button_production = button_production;
        self
    }

    pub fn with_marker(mut self, location: u32, stacked_on_top: bool) -> Self {
        self.location = location;
        self.stacked_on_top = stacked_on_top;
        self
    }

    pub fn with_bonus_tile(mut self, owns_bonus_tile: bool) -> Self {
        self.owns_bonus_tile = owns_bonus_tile;
        self
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn owned_patches(&self) -> &HashSet<Patch> {
        &self.owned_patches
    }

    /// Empty spaces left on the quilt board
    pub fn free_capacity(&self) -> i32 {
        self.free_capacity
    }

    /// Position used for turn order, a marker on top counts one space further
    pub fn effective_advancement(&self) -> u32 {
        self.location + self.stacked_on_top as u32
    }

    pub fn can_afford(&self, patch: &Patch) -> bool {
        self.button_count >= patch.button_cost
    }

    /// Projected final score if nothing but income phases happened from here
    pub fn score(&self) -> i32 {
        let bonus = if self.owns_bonus_tile {
            BONUS_TILE_POINTS
        } else {
            0
        };
        -2 * self.free_capacity
            + self.button_count
            + self.button_production * track::remaining_income_phases(self.location) as i32
            + bonus
    }

    /// Pays for `patch` and sews it in, then collects any triggered payouts
    pub fn buy(&mut self, patch: Patch, triggers: Triggers) {
        self.button_count -= patch.button_cost;
        self.button_production += patch.button_income;
        self.owned_patches.insert(patch);
        self.collect(triggers);
        self.recalculate_free_capacity();
    }

    /// Receives buttons for advancing, then collects any triggered payouts
    pub fn receive_buttons(&mut self, buttons: i32, triggers: Triggers) {
        self.button_count += buttons;
        self.collect(triggers);
        self.recalculate_free_capacity();
    }

    // income uses the production as it stands after any purchase this turn
    fn collect(&mut self, triggers: Triggers) {
        if triggers.income {
            self.button_count += self.button_production;
        }
        if triggers.bonus.is_some() {
            self.owned_patches.insert(Patch::bonus());
        }
    }

    fn recalculate_free_capacity(&mut self) {
        let covered = self
            .owned_patches
            .iter()
            .fold(0u32, |covered, patch| covered.saturating_add(patch.size));
        self.free_capacity = BOARD_CAPACITY - i32::try_from(covered).unwrap_or(i32::MAX);
    }
}
