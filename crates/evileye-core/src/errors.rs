//! Rejection reasons for player actions.
//!
//! None of these are fatal. The engine logs them and surfaces an alert;
//! state is left untouched.

use thiserror::Error;

use crate::upgrades::UpgradeCategory;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("insufficient funds: upgrade costs {cost}, have {money}")]
    InsufficientFunds { cost: u64, money: u64 },
    #[error("{category} is already at max level")]
    MaxLevelReached { category: UpgradeCategory },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealError {
    #[error("cannot heal while a wave is in progress")]
    WaveInProgress,
    #[error("base health is already full")]
    HealthFull,
    #[error("insufficient funds: heal costs {cost}, have {money}")]
    InsufficientFunds { cost: u64, money: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveError {
    #[error("wave {wave} is already running")]
    AlreadyRunning { wave: u32 },
}

/// An upgrade identifier that names no category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown upgrade category `{0}`")]
pub struct UnknownCategory(pub String);

/// Any reason a queued player command was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Purchase(#[from] PurchaseError),
    #[error(transparent)]
    Heal(#[from] HealError),
    #[error(transparent)]
    Wave(#[from] WaveError),
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),
    #[error("dev menu is closed")]
    DevMenuClosed,
    #[error("unknown dev key `{0}`")]
    UnknownDevKey(char),
}

impl CommandError {
    /// Programmer errors, as opposed to ordinary game-flow rejections.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            CommandError::UnknownCategory(_) | CommandError::UnknownDevKey(_)
        )
    }
}
