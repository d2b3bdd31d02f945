// =============================================================================
// Vault State Account
// =============================================================================
// One Vault per deposit mint. It tracks the total value locked (TVL) across
// all users' principal and uncollected profit, and the Active/Paused state
// that gates deposits and profit withdrawals.
//
// TVL is a virtual figure. Profit is credited to TVL before the matching
// tokens reach custody, and emergency withdrawals may move more than TVL, so
// TVL is never compared against the custody token balance.
//
// Every committed mutation takes the next event sequence number so that an
// off-chain read model can order the emitted events per vault.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::fees::ProfitWithdrawalQuote;
use crate::state::Policy;

/// TVL before and after a mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TvlChange {
    pub previous: u64,
    pub current: u64,
}

/// A vault for one deposit mint.
///
/// PDA derived from ["vault", registry_pubkey, mint_pubkey].
#[account]
#[derive(InitSpace)]
pub struct Vault {
    // =========================================================================
    // Identification
    // =========================================================================

    /// The registry that created this vault; the only profit-crediting authority
    pub registry: Pubkey,

    /// The SPL token mint users deposit
    pub mint: Pubkey,

    /// PDA-owned token account holding custodied tokens
    pub custody: Pubkey,

    /// Creation index within the registry
    pub index: u64,

    // =========================================================================
    // Accounting (base units of `mint`)
    // =========================================================================

    /// Principal deposited and not withdrawn, plus profit credited and not
    /// withdrawn. Never negative: debits floor at zero.
    pub total_value_locked: u64,

    /// Cumulative profit credited by the registry
    pub total_profit_credited: u64,

    /// Cumulative fees paid out (profit and capital, protocol and affiliate)
    pub total_fees_collected: u64,

    /// Cumulative part of total_fees_collected paid to referrers
    pub total_affiliate_paid: u64,

    // =========================================================================
    // Status
    // =========================================================================

    /// Paused vaults reject deposits and profit withdrawals only
    pub paused: bool,

    /// Sequence number of the last committed mutation
    pub event_sequence: u64,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub custody_bump: u8,
}

impl Vault {
    pub fn require_active(&self) -> Result<()> {
        require!(!self.paused, VaultError::VaultPaused);
        Ok(())
    }

    /// Deposits and profit withdrawals need both the vault and the registry
    /// to be active
    pub fn require_open(&self, policy: &Policy) -> Result<()> {
        self.require_active()?;
        require!(!policy.paused, VaultError::RegistryPaused);
        Ok(())
    }

    /// Returns true if the flag changed
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.paused == paused {
            return false;
        }
        self.paused = paused;
        true
    }

    /// Take the sequence number for the mutation being committed
    pub fn next_sequence(&mut self) -> Result<u64> {
        self.event_sequence = self
            .event_sequence
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok(self.event_sequence)
    }

    // =========================================================================
    // Validation (no mutation)
    // =========================================================================

    pub fn validate_deposit(&self, amount: u64, policy: &Policy) -> Result<()> {
        self.require_open(policy)?;
        require!(amount > 0, VaultError::ZeroAmount);
        require!(amount >= policy.min_deposit, VaultError::BelowMinimumDeposit);
        Ok(())
    }

    // =========================================================================
    // TVL mutations
    // =========================================================================

    /// Add a validated deposit to TVL
    pub fn record_deposit(&mut self, amount: u64) -> Result<TvlChange> {
        self.credit_tvl(amount)
    }

    /// Add credited profit to TVL.
    ///
    /// `caller` must be the registry this vault was created by.
    pub fn credit_profit(&mut self, caller: &Pubkey, amount: u64) -> Result<TvlChange> {
        require_keys_eq!(*caller, self.registry, VaultError::Unauthorized);
        require!(amount > 0, VaultError::ZeroAmount);

        let total_profit_credited = self
            .total_profit_credited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        let change = self.credit_tvl(amount)?;
        self.total_profit_credited = total_profit_credited;
        Ok(change)
    }

    /// Remove a withdrawn profit from TVL. The whole gross profit leaves TVL;
    /// the fee is paid out of custody, not re-added.
    pub fn record_profit_withdrawal(
        &mut self,
        quote: &ProfitWithdrawalQuote,
        policy: &Policy,
    ) -> Result<TvlChange> {
        self.require_open(policy)?;
        self.add_fees(quote.fee, quote.affiliate_share)?;
        Ok(self.debit_tvl(quote.gross))
    }

    /// Remove a principal withdrawal from TVL. Allowed while paused.
    pub fn record_capital_withdrawal(&mut self, amount: u64, fee: u64) -> Result<TvlChange> {
        self.add_fees(fee, 0)?;
        Ok(self.debit_tvl(amount))
    }

    /// Operator override: TVL floors at zero when `amount` exceeds it
    pub fn record_emergency_withdrawal(&mut self, amount: u64) -> Result<TvlChange> {
        require!(amount > 0, VaultError::ZeroAmount);
        Ok(self.debit_tvl(amount))
    }

    fn credit_tvl(&mut self, amount: u64) -> Result<TvlChange> {
        let previous = self.total_value_locked;
        self.total_value_locked = previous
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        Ok(TvlChange {
            previous,
            current: self.total_value_locked,
        })
    }

    fn debit_tvl(&mut self, amount: u64) -> TvlChange {
        let previous = self.total_value_locked;
        self.total_value_locked = previous.saturating_sub(amount);
        TvlChange {
            previous,
            current: self.total_value_locked,
        }
    }

    fn add_fees(&mut self, fee: u64, affiliate_share: u64) -> Result<()> {
        self.total_fees_collected = self
            .total_fees_collected
            .checked_add(fee)
            .ok_or(VaultError::MathOverflow)?;
        self.total_affiliate_paid = self
            .total_affiliate_paid
            .checked_add(affiliate_share)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }
}
