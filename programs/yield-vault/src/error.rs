// =============================================================================
// Yield Vault Error Codes
// =============================================================================
// Every failure in the program is a precondition violation caught before any
// account is mutated. The variants are grouped by the category a client sees
// (see ErrorKind): validation, authorization, pause state, balance, math.
// =============================================================================

use anchor_lang::prelude::*;

/// All possible errors that the yield vault program can return.
///
/// Anchor assigns numeric codes starting from 6000 in declaration order.
#[error_code]
pub enum VaultError {
    // =========================================================================
    // Validation Errors
    // =========================================================================

    /// Deposit, withdrawal, credit or funding of 0 tokens
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    /// Deposit is below Policy.min_deposit
    #[msg("Amount is below minimum deposit")]
    BelowMinimumDeposit,

    /// Affiliate share must be within 0..=10000 bps
    #[msg("Affiliate share must be between 0 and 10000 bps")]
    InvalidAffiliateShare,

    /// Fee cap must be within 0..=100 percent
    #[msg("Max fee percent must be between 0 and 100")]
    InvalidMaxFeePercent,

    /// A role, referrer or mint was the default (all-zero) pubkey
    #[msg("Invalid address")]
    InvalidAddress,

    /// A user cannot be their own referrer
    #[msg("User cannot refer themselves")]
    SelfReferral,

    /// The user already has a referrer - bindings are write-once
    #[msg("Affiliate is already bound for this user")]
    AlreadyBound,

    /// The vault account does not belong to this registry
    #[msg("Account is not a vault of this registry")]
    NotAVault,

    /// Token account mint does not match the vault's mint
    #[msg("Invalid mint - must use the vault's token")]
    InvalidMint,

    /// Token account owner doesn't match expected owner
    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,

    /// The user has a referrer but no token account of theirs was supplied
    #[msg("Referrer token account is required for this user")]
    MissingReferrerAccount,

    // =========================================================================
    // Authorization Errors
    // =========================================================================

    /// Only the protocol owner can perform this action
    #[msg("Only the owner can perform this action")]
    OwnerOnly,

    /// Only the ledger admin can perform this action
    #[msg("Only the ledger admin can perform this action")]
    LedgerAdminOnly,

    /// Profit may only be credited through the registry that created the vault
    #[msg("Unauthorized - profit can only be credited by the registry")]
    Unauthorized,

    // =========================================================================
    // Pause State Errors
    // =========================================================================

    /// The vault has been paused by the ledger admin
    #[msg("Vault is currently paused")]
    VaultPaused,

    /// The registry has been paused by the ledger admin
    #[msg("Registry is currently paused")]
    RegistryPaused,

    /// The registry was initialized without affiliate earnings tracking
    #[msg("Affiliate earnings tracking is disabled")]
    AffiliateTrackingDisabled,

    // =========================================================================
    // Balance Errors
    // =========================================================================

    /// Withdrawal exceeds the user's available principal
    #[msg("Insufficient balance for operation")]
    InsufficientBalance,

    /// There is no pending profit to withdraw
    #[msg("No pending profit to withdraw")]
    NoProfit,

    /// Custody holds less than the payout; the vault needs funding first
    #[msg("Custody balance is too low for this payout")]
    InsufficientCustody,

    // =========================================================================
    // Math & Overflow Errors
    // =========================================================================

    /// A calculation would overflow - this should never happen in normal operation
    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    /// A calculation would underflow - trying to subtract more than available
    #[msg("Math underflow - result would be negative")]
    MathUnderflow,
}

/// Client-facing failure category. All of them are recoverable: nothing was
/// written when an instruction returns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    InsufficientBalance,
    Arithmetic,
}

impl VaultError {
    /// Category for off-chain clients; the program itself never branches on it
    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::ZeroAmount
            | VaultError::BelowMinimumDeposit
            | VaultError::InvalidAffiliateShare
            | VaultError::InvalidMaxFeePercent
            | VaultError::InvalidAddress
            | VaultError::SelfReferral
            | VaultError::AlreadyBound
            | VaultError::NotAVault
            | VaultError::InvalidMint
            | VaultError::InvalidTokenAccountOwner
            | VaultError::MissingReferrerAccount => ErrorKind::Validation,

            VaultError::OwnerOnly
            | VaultError::LedgerAdminOnly
            | VaultError::Unauthorized => ErrorKind::Authorization,

            VaultError::VaultPaused
            | VaultError::RegistryPaused
            | VaultError::AffiliateTrackingDisabled => ErrorKind::State,

            VaultError::InsufficientBalance
            | VaultError::NoProfit
            | VaultError::InsufficientCustody => ErrorKind::InsufficientBalance,

            VaultError::MathOverflow | VaultError::MathUnderflow => ErrorKind::Arithmetic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_errors_are_state_errors() {
        assert_eq!(VaultError::VaultPaused.kind(), ErrorKind::State);
        assert_eq!(VaultError::RegistryPaused.kind(), ErrorKind::State);
    }

    #[test]
    fn role_errors_are_authorization_errors() {
        assert_eq!(VaultError::OwnerOnly.kind(), ErrorKind::Authorization);
        assert_eq!(VaultError::LedgerAdminOnly.kind(), ErrorKind::Authorization);
        assert_eq!(VaultError::Unauthorized.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn amount_errors_are_validation_errors() {
        assert_eq!(VaultError::ZeroAmount.kind(), ErrorKind::Validation);
        assert_eq!(VaultError::BelowMinimumDeposit.kind(), ErrorKind::Validation);
        assert_eq!(VaultError::AlreadyBound.kind(), ErrorKind::Validation);
    }

    #[test]
    fn withdrawal_shortfalls_are_balance_errors() {
        assert_eq!(VaultError::InsufficientBalance.kind(), ErrorKind::InsufficientBalance);
        assert_eq!(VaultError::NoProfit.kind(), ErrorKind::InsufficientBalance);
    }
}
