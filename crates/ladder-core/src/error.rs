//! # Vault Error Types
//!
//! Every failure surfaced by the vault core. Variants are grouped by the kind of
//! problem so callers can tell slippage from capacity from authorization.

use thiserror::Error;

/// Errors produced by vault operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    // ========================================================================
    // Math Errors
    // ========================================================================
    #[error("Math overflow")]
    MathOverflow,

    #[error("Math underflow")]
    MathUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Tick {0} out of range")]
    InvalidTick(i32),

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Zero amount")]
    ZeroAmount,

    #[error("Zero address")]
    ZeroAddress,

    #[error("Performance fee {0} above maximum")]
    PerformanceFeeTooHigh(u32),

    #[error("Management fee {0} above maximum")]
    ManagementFeeTooHigh(u32),

    #[error("Invalid position: {0}")]
    InvalidPosition(&'static str),

    #[error("Insufficient shares: balance {balance}, requested {requested}")]
    InsufficientShares { balance: u128, requested: u128 },

    #[error("Pool tokens cannot be withdrawn")]
    CannotWithdrawPoolToken,

    #[error("The vault cannot mint its own shares")]
    VaultCannotMint,

    #[error("Minimum liquidity held by the vault cannot be burned")]
    VaultCannotBurn,

    #[error("Minimum liquidity held by the vault cannot be transferred")]
    VaultCannotTransfer,

    // ========================================================================
    // Slippage and Consistency Errors
    // ========================================================================
    #[error("Slippage exceeded")]
    SlippageExceeded,

    #[error("Initial mint shares mismatch: expected {expected}, computed {computed}")]
    InitialMintSharesMismatch { expected: u128, computed: u128 },

    // ========================================================================
    // Capacity Errors
    // ========================================================================
    #[error("Quote amount overflow")]
    QuoteAmountOverflow,

    #[error("Deposit exceeds max total: value {value}, max {max}")]
    DepositExceedsMaxTotal { value: u128, max: u128 },

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    #[error("Unauthorized swap contract {0}")]
    UnauthorizedSwapContract(String),

    #[error("Caller {0} is not the manager")]
    Unauthorized(String),

    #[error("Reentrancy detected")]
    ReentrancyDetected,

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Delegate error: {0}")]
    Delegate(String),

    #[error("Swap error: {0}")]
    Swap(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type using vault errors
pub type VaultResult<T> = Result<T, VaultError>;

/// Failure reported by an external collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExternalError(pub String);

impl ExternalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl VaultError {
    pub fn ledger(err: ExternalError) -> Self {
        Self::Ledger(err.0)
    }

    pub fn delegate(err: ExternalError) -> Self {
        Self::Delegate(err.0)
    }

    pub fn swap(err: ExternalError) -> Self {
        Self::Swap(err.0)
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}
