//! Snapshot ingestion
//!
//! A snapshot is the JSON record produced by whatever watches the live game.
//! It is validated here in full before any [`GameState`] is built from it.
//!
//! ```json
//! {
//!   "players": [
//!     { "id": "a", "name": "Ann", "buttons": 5, "income": 0,
//!       "timeMarker": { "location": 0, "top": false }, "ownedPatches": [] },
//!     ...
//!   ],
//!   "patches": [
//!     { "key": "patch_1", "cost": 2, "time": 1, "income": 0, "spaces": 2,
//!       "state": 0, "location": "market" },
//!     ...
//!   ],
//!   "tokenPosition": 0,
//!   "activePlayer": "a"
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::io::Read;

use serde::Deserialize;

use crate::{
    game_state::{GameState, Seat},
    ledger::Ledger,
    market::Market,
    patch::Patch,
    track::BONUS_TRIGGERS,
    BOARD_CAPACITY, GOAL,
};

/// Location tag of patches still waiting in the market
pub const MARKET_LOCATION: &str = "market";

/// Key prefix the live game uses for the 1x1 bonus patch, followed by the
/// index of the bonus space that granted it
pub const BONUS_KEY_PREFIX: &str = "patch_0_";

/// Largest button count, button income or patch cost a snapshot may report
pub const BUTTON_LIMIT: i32 = 1_000;

/// Errors that can occur while validating a snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected exactly 2 players, got {0}")]
    WrongPlayerCount(usize),

    #[error("duplicate player id '{0}'")]
    DuplicatePlayer(String),

    #[error("invalid player '{id}': {reason}")]
    InvalidPlayer { id: String, reason: &'static str },

    #[error("invalid patch '{key}': {reason}")]
    InvalidPatch { key: String, reason: &'static str },

    #[error("duplicate patch key '{0}'")]
    DuplicatePatch(String),

    #[error("player '{player}' owns unknown patch '{key}'")]
    UnknownPatch { player: String, key: String },

    #[error("active player '{0}' is not one of the players")]
    UnknownPlayer(String),

    #[error("both time markers are stacked on top of each other")]
    BothStacked,

    #[error("player '{player}' is at location {location}, past the goal at {}", GOAL)]
    LocationOutOfRange { player: String, location: u32 },

    #[error("player '{player}' reports {reported} empty spaces but owns patches leaving {derived}")]
    EmptySpacesMismatch {
        player: String,
        reported: i32,
        derived: i32,
    },

    #[error("token position {token} out of range for a market of {len} patches")]
    TokenOutOfRange { token: usize, len: usize },
}

/// The full game as reported by the live game
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub players: Vec<PlayerRecord>,
    pub patches: Vec<PatchRecord>,
    #[serde(default)]
    pub token_position: usize,
    /// id of the player whose turn it is
    pub active_player: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// hex colour code without the leading '#'
    #[serde(default)]
    pub color: Option<String>,
    pub buttons: i32,
    pub income: i32,
    #[serde(default)]
    pub empty_spaces: Option<i32>,
    #[serde(default)]
    pub owns_special_tile: bool,
    pub time_marker: TimeMarker,
    #[serde(default)]
    pub owned_patches: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeMarker {
    pub location: u32,
    #[serde(default)]
    pub top: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRecord {
    pub key: String,
    pub cost: i32,
    pub time: u32,
    pub income: i32,
    pub spaces: u32,
    /// clockwise position around the board
    #[serde(default)]
    pub state: u32,
    pub location: String,
}

impl PatchRecord {
    fn to_patch(&self) -> Result<Patch, SnapshotError> {
        let reason = if self.cost < 0 {
            Some("negative button cost")
        } else if self.cost > BUTTON_LIMIT {
            Some("button cost too large")
        } else if self.time == 0 {
            Some("time cost must be at least 1")
        } else if self.time > GOAL {
            Some("time cost longer than the track")
        } else if self.income < 0 {
            Some("negative button income")
        } else if self.income > BUTTON_LIMIT {
            Some("button income too large")
        } else if self.spaces == 0 {
            Some("size must be at least 1")
        } else if self.spaces > BOARD_CAPACITY as u32 {
            Some("larger than the quilt board")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(SnapshotError::InvalidPatch {
                key: self.key.clone(),
                reason,
            }),
            None => Ok(Patch::new(
                self.key.as_str(),
                self.cost,
                self.time,
                self.income,
                self.spaces,
            )),
        }
    }
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// The player record sitting in `seat`, in the order the players were listed
    pub fn player(&self, seat: Seat) -> Option<&PlayerRecord> {
        self.players.get(seat.index())
    }

    fn seat_of(&self, id: &str) -> Option<Seat> {
        match self.players.iter().position(|player| player.id == id) {
            Some(0) => Some(Seat::First),
            Some(1) => Some(Seat::Second),
            _ => None,
        }
    }
}

fn owned_patch(
    catalog: &HashMap<&str, Patch>,
    player: &PlayerRecord,
    key: &str,
) -> Result<Patch, SnapshotError> {
    if let Some(patch) = catalog.get(key) {
        return Ok(patch.clone());
    }
    // every bonus space hands out the same patch
    key.strip_prefix(BONUS_KEY_PREFIX)
        .and_then(|index| index.parse::<usize>().ok())
        .filter(|&index| index < BONUS_TRIGGERS.len())
        .map(|_| Patch::bonus())
        .ok_or_else(|| SnapshotError::UnknownPatch {
            player: player.id.clone(),
            key: key.to_string(),
        })
}

fn ledger(
    catalog: &HashMap<&str, Patch>,
    player: &PlayerRecord,
    seat: Seat,
) -> Result<Ledger, SnapshotError> {
    let reason = if player.buttons < 0 {
        Some("negative button count")
    } else if player.buttons > BUTTON_LIMIT {
        Some("button count too large")
    } else if player.income < 0 {
        Some("negative button income")
    } else if player.income > BUTTON_LIMIT {
        Some("button income too large")
    } else {
        None
    };
    if let Some(reason) = reason {
        return Err(SnapshotError::InvalidPlayer {
            id: player.id.clone(),
            reason,
        });
    }
    if player.time_marker.location > GOAL {
        return Err(SnapshotError::LocationOutOfRange {
            player: player.id.clone(),
            location: player.time_marker.location,
        });
    }

    let patches = player
        .owned_patches
        .iter()
        .map(|key| owned_patch(catalog, player, key))
        .collect::<Result<HashSet<_>, _>>()?;
    let covered: u64 = patches.iter().map(|patch| u64::from(patch.size)).sum();
    if covered > BOARD_CAPACITY as u64 {
        return Err(SnapshotError::InvalidPlayer {
            id: player.id.clone(),
            reason: "owned patches cover more than the quilt board",
        });
    }

    let ledger = Ledger::new(seat, player.buttons)
        .with_production(player.income)
        .with_patches(patches)
        .with_marker(player.time_marker.location, player.time_marker.top)
        .with_bonus_tile(player.owns_special_tile);

    match player.empty_spaces {
        Some(reported) if reported != ledger.free_capacity() => {
            Err(SnapshotError::EmptySpacesMismatch {
                player: player.id.clone(),
                reported,
                derived: ledger.free_capacity(),
            })
        }
        _ => Ok(ledger),
    }
}

impl GameState {
    /// Validates a snapshot and builds the position it describes
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, SnapshotError> {
        if snapshot.players.len() != 2 {
            return Err(SnapshotError::WrongPlayerCount(snapshot.players.len()));
        }
        if snapshot.players[0].id == snapshot.players[1].id {
            return Err(SnapshotError::DuplicatePlayer(snapshot.players[0].id.clone()));
        }

        let mut keys = HashSet::new();
        let mut catalog = HashMap::new();
        let mut market_patches = Vec::new();
        for record in snapshot.patches.iter() {
            if !keys.insert(record.key.as_str()) {
                return Err(SnapshotError::DuplicatePatch(record.key.clone()));
            }
            let patch = record.to_patch()?;
            if record.location == MARKET_LOCATION {
                market_patches.push((record.state, patch.clone()));
            }
            catalog.insert(record.key.as_str(), patch);
        }

        // clockwise order around the board
        market_patches.sort_by_key(|(state, _)| *state);
        let len = market_patches.len();
        if len > 0 && snapshot.token_position >= len {
            return Err(SnapshotError::TokenOutOfRange {
                token: snapshot.token_position,
                len,
            });
        }
        let market = Market::new(
            market_patches.into_iter().map(|(_, patch)| patch).collect(),
            snapshot.token_position,
        );

        let first = ledger(&catalog, &snapshot.players[0], Seat::First)?;
        let second = ledger(&catalog, &snapshot.players[1], Seat::Second)?;
        if first.stacked_on_top && second.stacked_on_top {
            return Err(SnapshotError::BothStacked);
        }

        let declared = snapshot
            .seat_of(&snapshot.active_player)
            .ok_or_else(|| SnapshotError::UnknownPlayer(snapshot.active_player.clone()))?;

        let state = GameState::new(first, second, market, declared);
        let derived = state.active_seat();
        if derived != declared {
            log::warn!(
                "snapshot says {} is to move but the time markers put {} first, following the markers",
                declared,
                derived
            );
        }
        Ok(state)
    }
}
