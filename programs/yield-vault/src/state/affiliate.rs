// =============================================================================
// Affiliate State Accounts
// =============================================================================
// - AffiliateBinding: one per referred user, set once by the registry owner.
//   A user whose binding PDA was never created has no referrer.
// - AffiliateEarnings: optional per-referrer totals, only kept when the
//   registry was initialized with earnings tracking. Fee splits and payouts
//   never read it.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Write-once link from a user to the referrer who receives part of the
/// user's profit fees.
/// PDA: ["affiliate", registry, user]
#[account]
#[derive(Default, InitSpace)]
pub struct AffiliateBinding {
    /// The referred user
    pub user: Pubkey,

    /// Receives affiliate_share_bps of the user's profit fees
    pub referrer: Pubkey,

    /// Timestamp when the binding was created
    pub bound_at: i64,

    pub bump: u8,
}

impl AffiliateBinding {
    pub fn is_bound(&self) -> bool {
        self.referrer != Pubkey::default()
    }

    /// Record the binding. There is no way to change it afterwards.
    pub fn bind(&mut self, user: Pubkey, referrer: Pubkey, timestamp: i64, bump: u8) -> Result<()> {
        require!(!self.is_bound(), VaultError::AlreadyBound);
        require!(referrer != Pubkey::default(), VaultError::InvalidAddress);
        require!(referrer != user, VaultError::SelfReferral);

        self.user = user;
        self.referrer = referrer;
        self.bound_at = timestamp;
        self.bump = bump;

        Ok(())
    }

    pub fn referrer(&self) -> Option<Pubkey> {
        self.is_bound().then_some(self.referrer)
    }

    /// Look up the referrer stored at a binding PDA that may not exist yet.
    ///
    /// The caller has already checked `info` is at the user's binding address;
    /// an empty account there means the user was never bound.
    pub fn referrer_of(info: &AccountInfo) -> Result<Option<Pubkey>> {
        if info.data_is_empty() {
            return Ok(None);
        }

        require_keys_eq!(
            *info.owner,
            crate::ID,
            anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
        );

        let data = info.try_borrow_data()?;
        let binding = AffiliateBinding::try_deserialize(&mut &data[..])?;
        Ok(binding.referrer())
    }
}

/// Reporting-only total of what a referrer has been paid. Payouts never
/// depend on this account.
/// PDA: ["affiliate_earnings", registry, referrer]
#[account]
#[derive(Default, InitSpace)]
pub struct AffiliateEarnings {
    pub referrer: Pubkey,

    /// Cumulative affiliate share paid, in base units across all vaults
    pub total_earned: u64,

    /// Number of profit withdrawals that paid this referrer
    pub payout_count: u64,

    pub bump: u8,
}

impl AffiliateEarnings {
    pub fn init_if_new(&mut self, referrer: Pubkey, bump: u8) {
        if self.referrer == Pubkey::default() {
            self.referrer = referrer;
            self.bump = bump;
        }
    }

    /// Record an affiliate payout when tracking is enabled and `earnings` is
    /// the record of `referrer`.
    ///
    /// Returns the new total, or None when nothing was recorded.
    pub fn record_if_tracked(
        earnings: Option<&mut AffiliateEarnings>,
        tracking: bool,
        referrer: &Pubkey,
        amount: u64,
    ) -> Result<Option<u64>> {
        match earnings {
            Some(earnings) if tracking && earnings.referrer == *referrer => {
                earnings.record(amount)?;
                Ok(Some(earnings.total_earned))
            }
            _ => Ok(None),
        }
    }

    pub fn record(&mut self, amount: u64) -> Result<()> {
        self.total_earned = self
            .total_earned
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;
        self.payout_count = self
            .payout_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fees::quote_profit_withdrawal;
    use crate::state::Policy;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn bound(user: Pubkey, referrer: Pubkey) -> Vec<u8> {
        let mut binding = AffiliateBinding::default();
        binding.bind(user, referrer, 100, 7).unwrap();
        let mut data = Vec::new();
        binding.try_serialize(&mut data).unwrap();
        data
    }

    fn lookup(owner: &Pubkey, data: &mut [u8]) -> Result<Option<Pubkey>> {
        let address = key(50);
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(&address, false, false, &mut lamports, data, owner, false, 0);
        AffiliateBinding::referrer_of(&info)
    }

    fn tracked(referrer: Pubkey) -> AffiliateEarnings {
        let mut earnings = AffiliateEarnings::default();
        earnings.init_if_new(referrer, 9);
        earnings
    }

    #[test]
    fn missing_binding_account_means_no_referrer() {
        let mut data: [u8; 0] = [];
        assert_eq!(lookup(&Pubkey::default(), &mut data).unwrap(), None);
    }

    #[test]
    fn bound_binding_account_yields_referrer() {
        let mut data = bound(key(1), key(2));
        assert_eq!(lookup(&crate::ID, &mut data).unwrap(), Some(key(2)));
    }

    #[test]
    fn binding_owned_by_another_program_is_rejected() {
        let mut data = bound(key(1), key(2));
        let err = lookup(&key(66), &mut data).unwrap_err();
        assert_eq!(
            err,
            anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram.into()
        );
    }

    #[test]
    fn binding_with_wrong_discriminator_is_rejected() {
        let mut data = bound(key(1), key(2));
        data[0] ^= 0xff;
        assert!(lookup(&crate::ID, &mut data).is_err());
    }

    #[test]
    fn earnings_recorded_only_when_tracked_and_matching() {
        let referrer = key(4);

        assert_eq!(
            AffiliateEarnings::record_if_tracked(None, true, &referrer, 100).unwrap(),
            None
        );

        let mut earnings = tracked(referrer);
        assert_eq!(
            AffiliateEarnings::record_if_tracked(Some(&mut earnings), false, &referrer, 100).unwrap(),
            None
        );
        assert_eq!(earnings.total_earned, 0);

        let mut other = tracked(key(5));
        assert_eq!(
            AffiliateEarnings::record_if_tracked(Some(&mut other), true, &referrer, 100).unwrap(),
            None
        );
        assert_eq!(other.total_earned, 0);

        assert_eq!(
            AffiliateEarnings::record_if_tracked(Some(&mut earnings), true, &referrer, 100).unwrap(),
            Some(100)
        );
        assert_eq!(earnings.payout_count, 1);
    }

    #[test]
    fn earnings_record_does_not_affect_split() {
        let referrer = key(4);
        let policy = Policy {
            min_deposit: 0,
            affiliate_share_bps: 2_500,
            max_fee_percent: 20,
            paused: false,
        };
        let quote = quote_profit_withdrawal(40_000_000, &policy, Some(referrer)).unwrap();
        assert_eq!(quote.fee, 400_000);
        assert_eq!(quote.affiliate_share, 100_000);
        assert_eq!(quote.protocol_share, 300_000);

        // with or without a record, tracked or not, the same share is owed
        let mut earnings = tracked(referrer);
        for (record, tracking) in [(false, false), (false, true), (true, false), (true, true)] {
            let target = if record { Some(&mut earnings) } else { None };
            AffiliateEarnings::record_if_tracked(target, tracking, &referrer, quote.affiliate_share)
                .unwrap();
            let again = quote_profit_withdrawal(40_000_000, &policy, Some(referrer)).unwrap();
            assert_eq!(again, quote);
        }
        assert_eq!(earnings.total_earned, 100_000);
    }

    #[test]
    fn unbound_user_has_no_referrer() {
        let binding = AffiliateBinding::default();
        assert_eq!(binding.referrer(), None);
    }

    #[test]
    fn binding_is_write_once() {
        let mut binding = AffiliateBinding::default();
        binding.bind(key(1), key(2), 100, 7).unwrap();

        let err = binding.bind(key(1), key(3), 200, 7).unwrap_err();
        assert_eq!(err, VaultError::AlreadyBound.into());

        assert_eq!(binding.referrer(), Some(key(2)));
        assert_eq!(binding.bound_at, 100);
    }

    #[test]
    fn binding_rejects_default_and_self_referrer() {
        let mut binding = AffiliateBinding::default();

        let err = binding.bind(key(1), Pubkey::default(), 100, 7).unwrap_err();
        assert_eq!(err, VaultError::InvalidAddress.into());

        let err = binding.bind(key(1), key(1), 100, 7).unwrap_err();
        assert_eq!(err, VaultError::SelfReferral.into());

        assert!(!binding.is_bound());
    }

    #[test]
    fn earnings_accumulate() {
        let mut earnings = AffiliateEarnings::default();
        earnings.init_if_new(key(4), 9);
        earnings.record(100).unwrap();
        earnings.record(50).unwrap();

        assert_eq!(earnings.total_earned, 150);
        assert_eq!(earnings.payout_count, 2);

        earnings.init_if_new(key(5), 1);
        assert_eq!(earnings.referrer, key(4));
    }
}
