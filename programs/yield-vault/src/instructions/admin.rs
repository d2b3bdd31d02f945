// =============================================================================
// Admin Instructions
// =============================================================================
// Pause control and policy changes.
//
// Who can do what:
// - ledger_admin: pause a vault, pause/unpause the registry
// - owner: unpause a vault, change policy, rotate ledger_admin, hand over
//   ownership
//
// Re-applying the current pause state is a logged no-op.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{
    LedgerAdminUpdated, OwnershipTransferred, PolicyUpdated, RegistryPauseChanged,
    VaultPauseChanged,
};
use crate::state::{Capability, Registry, Vault};

// =============================================================================
// Vault Pause
// =============================================================================

/// Accounts required for pause_vault instruction
#[derive(Accounts)]
pub struct PauseVault<'info> {
    /// The ledger admin must sign
    pub ledger_admin: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&ledger_admin.key(), Capability::LedgerAdmin) @ VaultError::LedgerAdminOnly
    )]
    pub registry: Account<'info, Registry>,

    /// The vault to pause
    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault
    )]
    pub vault: Account<'info, Vault>,
}

/// Accounts required for unpause_vault instruction
#[derive(Accounts)]
pub struct UnpauseVault<'info> {
    /// The owner must sign
    pub owner: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,

    /// The vault to unpause
    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault
    )]
    pub vault: Account<'info, Vault>,
}

pub fn handler_pause_vault(ctx: Context<PauseVault>) -> Result<()> {
    let authority = ctx.accounts.ledger_admin.key();
    set_vault_paused(&mut ctx.accounts.vault, true, authority)
}

pub fn handler_unpause_vault(ctx: Context<UnpauseVault>) -> Result<()> {
    let authority = ctx.accounts.owner.key();
    set_vault_paused(&mut ctx.accounts.vault, false, authority)
}

fn set_vault_paused(vault: &mut Account<Vault>, paused: bool, authority: Pubkey) -> Result<()> {
    if !vault.set_paused(paused) {
        msg!(
            "Vault is already {}",
            if paused { "paused" } else { "active" }
        );
        return Ok(());
    }

    let sequence = vault.next_sequence()?;

    msg!(
        "Vault {} by {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        authority
    );

    emit!(VaultPauseChanged {
        vault: vault.key(),
        sequence,
        paused,
        authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Registry Pause
// =============================================================================

/// Accounts required for pause_registry / unpause_registry
#[derive(Accounts)]
pub struct SetRegistryPause<'info> {
    /// The ledger admin must sign
    pub ledger_admin: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&ledger_admin.key(), Capability::LedgerAdmin) @ VaultError::LedgerAdminOnly
    )]
    pub registry: Account<'info, Registry>,
}

/// While paused, create_vault, credit_profit, deposit and withdraw_profit fail
pub fn handler_set_registry_paused(ctx: Context<SetRegistryPause>, paused: bool) -> Result<()> {
    let authority = ctx.accounts.ledger_admin.key();
    let registry = &mut ctx.accounts.registry;

    if !registry.set_paused(paused) {
        msg!(
            "Registry is already {}",
            if paused { "paused" } else { "active" }
        );
        return Ok(());
    }

    msg!(
        "Registry {} by {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        authority
    );

    emit!(RegistryPauseChanged {
        registry: registry.key(),
        paused,
        authority,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Policy
// =============================================================================

/// Accounts required for the policy setters
#[derive(Accounts)]
pub struct UpdatePolicy<'info> {
    /// The owner must sign
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,
}

/// A single policy field change
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyChange {
    MinDeposit(u64),
    AffiliateShareBps(u16),
    MaxFeePercent(u8),
}

pub fn handler_update_policy(ctx: Context<UpdatePolicy>, change: PolicyChange) -> Result<()> {
    let registry = &mut ctx.accounts.registry;

    match change {
        PolicyChange::MinDeposit(value) => {
            registry.set_min_deposit(value)?;
            msg!("Min deposit set to {}", value);
        }
        PolicyChange::AffiliateShareBps(value) => {
            registry.set_affiliate_share_bps(value)?;
            msg!("Affiliate share set to {} bps", value);
        }
        PolicyChange::MaxFeePercent(value) => {
            registry.set_max_fee_percent(value)?;
            msg!("Max fee set to {}%", value);
        }
    }

    emit!(PolicyUpdated {
        registry: registry.key(),
        min_deposit: registry.policy.min_deposit,
        affiliate_share_bps: registry.policy.affiliate_share_bps,
        max_fee_percent: registry.policy.max_fee_percent,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Roles
// =============================================================================

/// Accounts required for set_ledger_admin instruction
#[derive(Accounts)]
pub struct SetLedgerAdmin<'info> {
    /// The owner must sign
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,

    /// The new ledger admin
    /// CHECK: This is just the new ledger admin address, we just store it
    pub new_ledger_admin: UncheckedAccount<'info>,
}

pub fn handler_set_ledger_admin(ctx: Context<SetLedgerAdmin>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    let previous = registry.ledger_admin;

    registry.set_ledger_admin(ctx.accounts.new_ledger_admin.key())?;

    msg!("Ledger admin: {} -> {}", previous, registry.ledger_admin);

    emit!(LedgerAdminUpdated {
        registry: registry.key(),
        previous,
        current: registry.ledger_admin,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Accounts required for transfer_ownership instruction
#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    /// The current owner must sign
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,

    /// The new owner
    /// CHECK: This is just the new owner address, we just store it
    pub new_owner: UncheckedAccount<'info>,
}

/// Irreversible: make sure the new owner address is correct
pub fn handler_transfer_ownership(ctx: Context<TransferOwnership>) -> Result<()> {
    let registry = &mut ctx.accounts.registry;
    let previous = registry.owner;

    registry.transfer_ownership(ctx.accounts.new_owner.key())?;

    msg!("Ownership transferred: {} -> {}", previous, registry.owner);

    emit!(OwnershipTransferred {
        registry: registry.key(),
        previous,
        current: registry.owner,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
