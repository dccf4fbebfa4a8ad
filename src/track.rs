//! The shared time track and the payouts triggered while moving along it

use crate::GOAL;

/// Spaces that pay out each player's button income
pub const INCOME_TRIGGERS: [u32; 9] = [5, 11, 17, 23, 29, 35, 41, 47, GOAL];

/// Spaces that hand a free 1x1 patch to the player crossing them
pub const BONUS_TRIGGERS: [u32; 5] = [26, 32, 38, 44, 50];

/// What a single move along the track set off
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Triggers {
    /// an income phase was reached
    pub income: bool,
    /// the bonus space that was reached, if any
    pub bonus: Option<u32>,
}

// first trigger in the inclusive range [start, start + steps]
// trigger spacing is wider than any single move, so at most one can match
fn first_crossed(triggers: &[u32], start: u32, steps: u32) -> Option<u32> {
    let end = start.saturating_add(steps);
    triggers
        .iter()
        .copied()
        .find(|&position| position >= start)
        .filter(|&position| position <= end)
}

/// Whether moving `steps` spaces from `start` reaches an income space
///
/// Both ends are inclusive: landing on the space, passing over it, or
/// starting on it all count.
pub fn crosses_income(start: u32, steps: u32) -> bool {
    first_crossed(&INCOME_TRIGGERS, start, steps).is_some()
}

/// Whether moving `steps` spaces from `start` reaches a bonus space
pub fn crosses_bonus(start: u32, steps: u32) -> bool {
    bonus_crossed(start, steps).is_some()
}

/// The bonus space reached by moving `steps` spaces from `start`
pub fn bonus_crossed(start: u32, steps: u32) -> Option<u32> {
    first_crossed(&BONUS_TRIGGERS, start, steps)
}

/// Both trigger checks for one move
pub fn triggers(start: u32, steps: u32) -> Triggers {
    Triggers {
        income: crosses_income(start, steps),
        bonus: bonus_crossed(start, steps),
    }
}

/// Income phases still ahead of a marker at `location`
pub fn remaining_income_phases(location: u32) -> u32 {
    INCOME_TRIGGERS.iter().filter(|&&p| p > location).count() as u32
}

/// Spaces left before a marker at `location` reaches the goal
pub fn remaining_time(location: u32) -> u32 {
    GOAL.saturating_sub(location)
}

/// Extra value of a patch whose time cost jumps over a bonus space
///
/// Unlike the payout checks, this only counts bonus spaces strictly between
/// the start and the end of the move.
pub fn bonus_patch_factor(location: u32, time_cost: u32) -> i32 {
    let end = location.saturating_add(time_cost);
    if BONUS_TRIGGERS.iter().any(|&p| location < p && p < end) {
        2
    } else {
        0
    }
}
