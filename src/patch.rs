//! Patches that can be bought from the market or granted by the time track

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Id of the shared bonus patch
pub const BONUS_PATCH_ID: &str = "bonus";

/// A single patch tile
///
/// Patches are never mutated once created. They are compared and hashed by
/// their `id` only, so a ledger can hold each patch at most once.
#[derive(Clone, Debug)]
pub struct Patch {
    id: Arc<str>,
    /// Buttons paid to buy the patch
    pub button_cost: i32,
    /// Spaces the buyer moves along the time track
    pub time_cost: u32,
    /// Buttons the patch adds to each income phase
    pub button_income: i32,
    /// Spaces the patch covers on the quilt board
    pub size: u32,
}

impl Patch {
    pub fn new<S: Into<Arc<str>>>(
        id: S,
        button_cost: i32,
        time_cost: u32,
        button_income: i32,
        size: u32,
    ) -> Self {
        Self {
            id: id.into(),
            button_cost,
            time_cost,
            button_income,
            size,
        }
    }

    /// The free 1x1 patch granted when crossing a bonus trigger
    ///
    /// There is only one of it: every grant yields the same id, so a ledger
    /// that already holds it gains nothing from a second trigger.
    pub fn bonus() -> Self {
        Self::new(BONUS_PATCH_ID, 0, 0, 0, 1)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Approximate value gained per time-track space spent on this patch
    ///
    /// `(2 * size + income * remaining phases - cost + bonus factor) / time`,
    /// where the time cost is capped at the time left before the goal.
    /// Returns `None` once no time remains.
    pub fn button_rate(
        &self,
        remaining_income_phases: u32,
        remaining_time: u32,
        bonus_factor: i32,
    ) -> Option<f64> {
        let time_cost = self.time_cost.min(remaining_time);
        if time_cost == 0 {
            return None;
        }
        let value = self.size as i32 * 2 + self.button_income * remaining_income_phases as i32
            - self.button_cost
            + bonus_factor;
        Some(value as f64 / time_cost as f64)
    }
}

impl PartialEq for Patch {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Patch {}

impl Hash for Patch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (cost {}, time {}, income {}, size {})",
            self.id, self.button_cost, self.time_cost, self.button_income, self.size
        )
    }
}
