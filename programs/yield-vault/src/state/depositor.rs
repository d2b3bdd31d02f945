// =============================================================================
// Depositor State Account
// =============================================================================
// Tracks one user's two independent balances in one vault:
// - principal: total_deposited - total_withdrawn, withdrawable at any time
// - profit: pending_profit credited by the registry, withdrawn all at once
//
// The account is created lazily by whichever comes first: the user's first
// deposit or the registry's first profit credit for that user.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// A user's position in one vault.
///
/// PDA derived from ["depositor", vault_pubkey, user_pubkey].
#[account]
#[derive(Default, InitSpace)]
pub struct Depositor {
    // =========================================================================
    // Account References
    // =========================================================================

    /// The vault this position belongs to
    pub vault: Pubkey,

    /// The user who owns this position and must sign withdrawals
    pub owner: Pubkey,

    // =========================================================================
    // Principal
    // =========================================================================

    /// Cumulative principal deposited
    pub total_deposited: u64,

    /// Cumulative principal withdrawn (gross, before the capital fee)
    pub total_withdrawn: u64,

    /// Number of deposit transactions this user has made
    pub deposit_count: u32,

    // =========================================================================
    // Profit
    // =========================================================================

    /// Profit credited and not yet withdrawn
    pub pending_profit: u64,

    /// Cumulative profit credited
    pub total_profit_credited: u64,

    /// Cumulative profit withdrawn (gross, before the profit fee)
    pub total_profit_withdrawn: u64,

    // =========================================================================
    // Timestamps
    // =========================================================================

    pub last_deposit_timestamp: i64,
    pub last_withdrawal_timestamp: i64,

    /// Bump seed for this Depositor PDA
    pub bump: u8,
}

impl Depositor {
    /// Fill in the identity of a freshly created account
    pub fn init_if_new(&mut self, vault: Pubkey, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.vault = vault;
            self.owner = owner;
            self.bump = bump;
        }
    }

    /// Principal the user can still withdraw
    pub fn available_principal(&self) -> u64 {
        // total_withdrawn never exceeds total_deposited (see record_capital_withdrawal)
        self.total_deposited.saturating_sub(self.total_withdrawn)
    }

    pub fn record_deposit(&mut self, amount: u64, timestamp: i64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.deposit_count = self
            .deposit_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;

        self.last_deposit_timestamp = timestamp;

        Ok(())
    }

    /// Withdraw `amount` of principal.
    ///
    /// Fails without mutating if `amount` is zero or above available principal.
    pub fn record_capital_withdrawal(&mut self, amount: u64, timestamp: i64) -> Result<()> {
        require!(amount > 0, VaultError::ZeroAmount);
        require!(
            amount <= self.available_principal(),
            VaultError::InsufficientBalance
        );

        self.total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.last_withdrawal_timestamp = timestamp;

        Ok(())
    }

    pub fn credit_profit(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, VaultError::ZeroAmount);

        let pending_profit = self
            .pending_profit
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        let total_profit_credited = self
            .total_profit_credited
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        self.pending_profit = pending_profit;
        self.total_profit_credited = total_profit_credited;

        Ok(())
    }

    /// Zero the pending profit and return what it was
    pub fn take_profit(&mut self, timestamp: i64) -> Result<u64> {
        let profit = self.pending_profit;
        require!(profit > 0, VaultError::NoProfit);

        self.total_profit_withdrawn = self
            .total_profit_withdrawn
            .checked_add(profit)
            .ok_or(VaultError::MathOverflow)?;
        self.pending_profit = 0;
        self.last_withdrawal_timestamp = timestamp;

        Ok(profit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depositor() -> Depositor {
        let mut depositor = Depositor::default();
        depositor.init_if_new(
            Pubkey::new_from_array([1; 32]),
            Pubkey::new_from_array([2; 32]),
            250,
        );
        depositor
    }

    #[test]
    fn init_if_new_does_not_overwrite_identity() {
        let mut depositor = depositor();
        depositor.init_if_new(
            Pubkey::new_from_array([5; 32]),
            Pubkey::new_from_array([6; 32]),
            1,
        );
        assert_eq!(depositor.owner, Pubkey::new_from_array([2; 32]));
        assert_eq!(depositor.bump, 250);
    }

    #[test]
    fn principal_is_deposits_minus_withdrawals() {
        let mut depositor = depositor();
        depositor.record_deposit(50, 10).unwrap();
        depositor.record_deposit(25, 11).unwrap();
        depositor.record_capital_withdrawal(30, 12).unwrap();

        assert_eq!(depositor.available_principal(), 45);
        assert_eq!(depositor.deposit_count, 2);
        assert_eq!(depositor.last_deposit_timestamp, 11);
        assert_eq!(depositor.last_withdrawal_timestamp, 12);
    }

    #[test]
    fn capital_withdrawal_cannot_exceed_principal() {
        let mut depositor = depositor();
        depositor.record_deposit(50, 10).unwrap();

        let err = depositor.record_capital_withdrawal(51, 11).unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());
        assert_eq!(depositor.total_withdrawn, 0);

        depositor.record_capital_withdrawal(50, 11).unwrap();
        assert_eq!(depositor.available_principal(), 0);

        let err = depositor.record_capital_withdrawal(1, 12).unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());
    }

    #[test]
    fn zero_capital_withdrawal_is_rejected() {
        let mut depositor = depositor();
        depositor.record_deposit(50, 10).unwrap();
        let err = depositor.record_capital_withdrawal(0, 11).unwrap_err();
        assert_eq!(err, VaultError::ZeroAmount.into());
    }

    #[test]
    fn profit_does_not_count_as_principal() {
        let mut depositor = depositor();
        depositor.credit_profit(40).unwrap();

        assert_eq!(depositor.available_principal(), 0);
        let err = depositor.record_capital_withdrawal(1, 11).unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());
    }

    #[test]
    fn profit_accumulates_and_is_taken_in_full() {
        let mut depositor = depositor();
        depositor.credit_profit(15).unwrap();
        depositor.credit_profit(5).unwrap();
        assert_eq!(depositor.pending_profit, 20);

        assert_eq!(depositor.take_profit(30).unwrap(), 20);
        assert_eq!(depositor.pending_profit, 0);
        assert_eq!(depositor.total_profit_credited, 20);
        assert_eq!(depositor.total_profit_withdrawn, 20);

        let err = depositor.take_profit(31).unwrap_err();
        assert_eq!(err, VaultError::NoProfit.into());
    }

    #[test]
    fn fresh_position_has_nothing_to_withdraw() {
        let mut depositor = depositor();

        let err = depositor.take_profit(10).unwrap_err();
        assert_eq!(err, VaultError::NoProfit.into());

        let err = depositor.record_capital_withdrawal(1, 10).unwrap_err();
        assert_eq!(err, VaultError::InsufficientBalance.into());

        assert_eq!(depositor.last_withdrawal_timestamp, 0);
    }

    #[test]
    fn zero_profit_credit_is_rejected() {
        let mut depositor = depositor();
        let err = depositor.credit_profit(0).unwrap_err();
        assert_eq!(err, VaultError::ZeroAmount.into());
        assert_eq!(depositor.pending_profit, 0);
    }
}
