// =============================================================================
// Registry State Account
// =============================================================================
// The Registry is the factory for vaults and the holder of global policy.
// It is also the only authority allowed to credit profit into a vault.
//
// Roles:
// - owner: changes policy, credits profit, binds affiliates, unpauses vaults,
//   performs emergency withdrawals, receives protocol fees
// - ledger_admin: pauses vaults, pauses/unpauses the registry
// One key may hold both roles, but they are stored and checked separately.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;

/// Global policy applied to every vault operation.
///
/// Bounds are validated only when a value is written (see the setters on
/// Registry); readers can rely on them.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct Policy {
    /// Smallest accepted deposit, in the vault mint's base units
    pub min_deposit: u64,

    /// Referrer's share of a profit fee, in basis points (0..=10000)
    pub affiliate_share_bps: u16,

    /// Cap on the profit fee rate, in percent (0..=100)
    pub max_fee_percent: u8,

    /// Registry-level pause: blocks vault creation and profit crediting
    pub paused: bool,
}

/// Role required to invoke a privileged instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Owner,
    LedgerAdmin,
}

impl Capability {
    /// Error returned when the signer lacks this capability
    pub fn denied(&self) -> VaultError {
        match self {
            Capability::Owner => VaultError::OwnerOnly,
            Capability::LedgerAdmin => VaultError::LedgerAdminOnly,
        }
    }
}

/// The protocol registry. PDA derived from ["registry"].
#[account]
#[derive(InitSpace)]
pub struct Registry {
    // =========================================================================
    // Roles
    // =========================================================================

    /// Protocol owner
    pub owner: Pubkey,

    /// Pause authority, distinct from owner
    pub ledger_admin: Pubkey,

    // =========================================================================
    // Configuration
    // =========================================================================

    pub policy: Policy,

    /// Whether affiliate payouts are also recorded to AffiliateEarnings.
    /// Fixed at initialization; never changes how a fee is split.
    pub track_affiliate_earnings: bool,

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Number of vaults created by this registry
    pub vault_count: u64,

    /// Bump seed for the Registry PDA
    pub bump: u8,
}

impl Registry {
    /// Whether `signer` holds `capability`
    pub fn has_capability(&self, signer: &Pubkey, capability: Capability) -> bool {
        match capability {
            Capability::Owner => *signer == self.owner,
            Capability::LedgerAdmin => *signer == self.ledger_admin,
        }
    }

    /// Fails with the capability's error unless `signer` holds it
    pub fn authorize(&self, signer: &Pubkey, capability: Capability) -> Result<()> {
        if !self.has_capability(signer, capability) {
            return Err(capability.denied().into());
        }
        Ok(())
    }

    pub fn require_active(&self) -> Result<()> {
        require!(!self.policy.paused, VaultError::RegistryPaused);
        Ok(())
    }

    // =========================================================================
    // Policy setters (bounds are checked here and nowhere else)
    // =========================================================================

    pub fn set_min_deposit(&mut self, min_deposit: u64) -> Result<()> {
        self.policy.min_deposit = min_deposit;
        Ok(())
    }

    pub fn set_affiliate_share_bps(&mut self, affiliate_share_bps: u16) -> Result<()> {
        require!(
            affiliate_share_bps <= MAX_AFFILIATE_SHARE_BPS,
            VaultError::InvalidAffiliateShare
        );
        self.policy.affiliate_share_bps = affiliate_share_bps;
        Ok(())
    }

    pub fn set_max_fee_percent(&mut self, max_fee_percent: u8) -> Result<()> {
        require!(
            max_fee_percent <= MAX_FEE_PERCENT_CAP,
            VaultError::InvalidMaxFeePercent
        );
        self.policy.max_fee_percent = max_fee_percent;
        Ok(())
    }

    pub fn set_ledger_admin(&mut self, ledger_admin: Pubkey) -> Result<()> {
        require!(ledger_admin != Pubkey::default(), VaultError::InvalidAddress);
        self.ledger_admin = ledger_admin;
        Ok(())
    }

    pub fn transfer_ownership(&mut self, new_owner: Pubkey) -> Result<()> {
        require!(new_owner != Pubkey::default(), VaultError::InvalidAddress);
        require!(new_owner != self.owner, VaultError::InvalidAddress);
        self.owner = new_owner;
        Ok(())
    }

    /// Returns true if the flag changed
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.policy.paused == paused {
            return false;
        }
        self.policy.paused = paused;
        true
    }

    /// Reserve the next vault index
    pub fn record_vault_created(&mut self) -> Result<u64> {
        let index = self.vault_count;
        self.vault_count = self
            .vault_count
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    fn registry() -> Registry {
        Registry {
            owner: key(1),
            ledger_admin: key(2),
            policy: Policy {
                min_deposit: 10,
                affiliate_share_bps: 5_000,
                max_fee_percent: 20,
                paused: false,
            },
            track_affiliate_earnings: false,
            vault_count: 0,
            bump: 255,
        }
    }

    #[test]
    fn roles_are_checked_independently() {
        let registry = registry();
        assert!(registry.has_capability(&key(1), Capability::Owner));
        assert!(!registry.has_capability(&key(1), Capability::LedgerAdmin));
        assert!(registry.has_capability(&key(2), Capability::LedgerAdmin));
        assert!(!registry.has_capability(&key(2), Capability::Owner));
    }

    #[test]
    fn pause_authority_does_not_grant_owner_rights() {
        let registry = registry();
        let err = registry.authorize(&key(2), Capability::Owner).unwrap_err();
        assert_eq!(err, VaultError::OwnerOnly.into());

        let err = registry.authorize(&key(1), Capability::LedgerAdmin).unwrap_err();
        assert_eq!(err, VaultError::LedgerAdminOnly.into());
    }

    #[test]
    fn one_key_may_hold_both_roles() {
        let mut registry = registry();
        registry.set_ledger_admin(key(1)).unwrap();
        assert!(registry.authorize(&key(1), Capability::Owner).is_ok());
        assert!(registry.authorize(&key(1), Capability::LedgerAdmin).is_ok());
    }

    #[test]
    fn affiliate_share_bounds() {
        let mut registry = registry();
        registry.set_affiliate_share_bps(0).unwrap();
        registry.set_affiliate_share_bps(10_000).unwrap();
        assert_eq!(registry.policy.affiliate_share_bps, 10_000);

        let err = registry.set_affiliate_share_bps(10_001).unwrap_err();
        assert_eq!(err, VaultError::InvalidAffiliateShare.into());
        assert_eq!(registry.policy.affiliate_share_bps, 10_000);
    }

    #[test]
    fn max_fee_percent_bounds() {
        let mut registry = registry();
        registry.set_max_fee_percent(0).unwrap();
        registry.set_max_fee_percent(100).unwrap();

        let err = registry.set_max_fee_percent(101).unwrap_err();
        assert_eq!(err, VaultError::InvalidMaxFeePercent.into());
        assert_eq!(registry.policy.max_fee_percent, 100);
    }

    #[test]
    fn ledger_admin_cannot_be_default() {
        let mut registry = registry();
        let err = registry.set_ledger_admin(Pubkey::default()).unwrap_err();
        assert_eq!(err, VaultError::InvalidAddress.into());
        assert_eq!(registry.ledger_admin, key(2));
    }

    #[test]
    fn ownership_transfer_rejects_default_and_self() {
        let mut registry = registry();
        assert!(registry.transfer_ownership(Pubkey::default()).is_err());
        assert!(registry.transfer_ownership(key(1)).is_err());

        registry.transfer_ownership(key(9)).unwrap();
        assert!(registry.has_capability(&key(9), Capability::Owner));
        assert!(!registry.has_capability(&key(1), Capability::Owner));
    }

    #[test]
    fn pause_toggle_reports_changes_only() {
        let mut registry = registry();
        assert!(registry.require_active().is_ok());

        assert!(registry.set_paused(true));
        assert!(!registry.set_paused(true));
        let err = registry.require_active().unwrap_err();
        assert_eq!(err, VaultError::RegistryPaused.into());

        assert!(registry.set_paused(false));
        assert!(registry.require_active().is_ok());
    }

    #[test]
    fn vault_indices_are_sequential() {
        let mut registry = registry();
        assert_eq!(registry.record_vault_created().unwrap(), 0);
        assert_eq!(registry.record_vault_created().unwrap(), 1);
        assert_eq!(registry.vault_count, 2);
    }
}
