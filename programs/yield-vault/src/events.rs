// =============================================================================
// Events
// =============================================================================
// Emitted with emit! after every committed mutation. Vault events carry the
// vault's sequence number; a mutation that moves TVL emits its own event and
// a TvlChanged with the same sequence.
// =============================================================================

use anchor_lang::prelude::*;

/// Why a vault's TVL moved
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TvlChangeReason {
    Deposit,
    ProfitCredit,
    ProfitWithdrawal,
    CapitalWithdrawal,
    EmergencyWithdrawal,
}

/// Event emitted when the registry is initialized
#[event]
pub struct RegistryInitialized {
    pub registry: Pubkey,
    pub owner: Pubkey,
    pub ledger_admin: Pubkey,
    pub min_deposit: u64,
    pub affiliate_share_bps: u16,
    pub max_fee_percent: u8,
    pub track_affiliate_earnings: bool,
    pub timestamp: i64,
}

/// Event emitted when a vault is created for a mint
#[event]
pub struct VaultCreated {
    pub registry: Pubkey,
    pub vault: Pubkey,
    pub mint: Pubkey,
    pub custody: Pubkey,
    /// Creation index within the registry
    pub index: u64,
    pub timestamp: i64,
}

/// Emitted alongside every mutation that moves TVL, with the same sequence
#[event]
pub struct TvlChanged {
    pub vault: Pubkey,
    pub sequence: u64,
    pub previous: u64,
    pub current: u64,
    pub reason: TvlChangeReason,
    pub timestamp: i64,
}

/// Event emitted when a user deposits principal
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub sequence: u64,
    pub user: Pubkey,
    pub amount: u64,
    /// User's principal after the deposit
    pub available_principal: u64,
    pub timestamp: i64,
}

/// Event emitted when the registry credits profit to a user
#[event]
pub struct ProfitCredited {
    pub vault: Pubkey,
    pub sequence: u64,
    pub user: Pubkey,
    pub amount: u64,
    /// User's pending profit after the credit
    pub pending_profit: u64,
    pub timestamp: i64,
}

/// Event emitted when a user withdraws all pending profit
#[event]
pub struct ProfitWithdrawn {
    pub vault: Pubkey,
    pub sequence: u64,
    pub user: Pubkey,
    /// Pending profit removed from the ledger
    pub gross: u64,
    /// Performance fee
    pub fee: u64,
    /// Paid to the user
    pub net: u64,
    pub protocol_share: u64,
    pub affiliate_share: u64,
    /// Default pubkey when the user has no referrer
    pub referrer: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a user withdraws principal
#[event]
pub struct CapitalWithdrawn {
    pub vault: Pubkey,
    pub sequence: u64,
    pub user: Pubkey,
    pub amount: u64,
    /// Flat fee to the protocol owner
    pub fee: u64,
    /// Paid to the user
    pub net: u64,
    pub available_principal: u64,
    pub timestamp: i64,
}

/// Event emitted when the owner drains custody
#[event]
pub struct EmergencyWithdrawal {
    pub vault: Pubkey,
    pub sequence: u64,
    pub destination: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

/// Event emitted when custody is topped up without touching TVL
#[event]
pub struct CustodyFunded {
    pub vault: Pubkey,
    pub sequence: u64,
    pub funder: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct VaultPauseChanged {
    pub vault: Pubkey,
    pub sequence: u64,
    pub paused: bool,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct RegistryPauseChanged {
    pub registry: Pubkey,
    pub paused: bool,
    pub authority: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AffiliateBound {
    pub registry: Pubkey,
    pub user: Pubkey,
    pub referrer: Pubkey,
    pub timestamp: i64,
}

/// Reporting side channel, emitted only when earnings tracking is enabled
#[event]
pub struct AffiliateEarningsRecorded {
    pub referrer: Pubkey,
    pub vault: Pubkey,
    pub amount: u64,
    pub total_earned: u64,
    pub timestamp: i64,
}

/// Event emitted after any policy setter succeeds; carries the full policy
#[event]
pub struct PolicyUpdated {
    pub registry: Pubkey,
    pub min_deposit: u64,
    pub affiliate_share_bps: u16,
    pub max_fee_percent: u8,
    pub timestamp: i64,
}

#[event]
pub struct LedgerAdminUpdated {
    pub registry: Pubkey,
    pub previous: Pubkey,
    pub current: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferred {
    pub registry: Pubkey,
    pub previous: Pubkey,
    pub current: Pubkey,
    pub timestamp: i64,
}
