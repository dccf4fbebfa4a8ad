use crate::{game_state::TurnAction, ledger::Seat, market::MarketError};

/// Errors raised while playing out or searching a game state
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{action} is not a legal action for {seat}")]
    IllegalAction { action: TurnAction, seat: Seat },

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("both markers have reached the goal, there is no move to make")]
    GameOver,

    #[error("failed to build the worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
