//! The circular supply of patches

use std::collections::VecDeque;

use crate::{patch::Patch, MARKET_WINDOW};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("slot {slot} out of range, only {available} patches remain")]
    OutOfRange { slot: usize, available: usize },
}

/// The ring of patches around the board, read clockwise from the neutral token
///
/// The first `MARKET_WINDOW` patches are the ones that can be bought, the
/// rest form a hidden queue. Patches passed over when buying are sent to the
/// back of the queue, so they come around again last.
#[derive(Clone, Debug)]
pub struct Market {
    patches: VecDeque<Patch>,
}

impl Market {
    /// Creates a market from patches in clockwise order, with the first
    /// purchasable patch at `token_position`
    pub fn new(patches: Vec<Patch>, token_position: usize) -> Self {
        let mut patches = VecDeque::from(patches);
        if !patches.is_empty() {
            let len = patches.len();
            patches.rotate_left(token_position % len);
        }
        Self { patches }
    }

    /// The patches that can currently be bought, in slot order
    pub fn visible(&self) -> impl Iterator<Item = &Patch> + '_ {
        self.patches.iter().take(MARKET_WINDOW)
    }

    /// The purchasable patch in `slot`, if any
    pub fn get(&self, slot: usize) -> Option<&Patch> {
        if slot < MARKET_WINDOW {
            self.patches.get(slot)
        } else {
            None
        }
    }

    /// Total number of patches left, visible and hidden
    pub fn count(&self) -> usize {
        self.patches.len()
    }

    /// Removes and returns the patch in `slot`
    ///
    /// Skipped patches move to the back of the hidden queue in their current
    /// order and the window refills from the front of the queue.
    pub fn take(&mut self, slot: usize) -> Result<Patch, MarketError> {
        let available = self.patches.len().min(MARKET_WINDOW);
        if slot >= available {
            return Err(MarketError::OutOfRange { slot, available });
        }
        // skipped patches end up behind the rest of the queue
        self.patches.rotate_left(slot);
        self.patches
            .pop_front()
            .ok_or(MarketError::OutOfRange { slot, available })
    }
}
