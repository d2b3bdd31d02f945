// =============================================================================
// Emergency Withdraw Instruction
// =============================================================================
// Owner-only override that moves custodied tokens straight to a destination,
// with no fee and no per-user bookkeeping.
//
// Normally used on a paused vault, but the pause is not required. The amount
// may exceed TVL, in which case TVL floors at zero.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{EmergencyWithdrawal, TvlChangeReason, TvlChanged};
use crate::instructions::custody::{pay_out, require_custody_covers};
use crate::state::{Capability, Registry, Vault};

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump = vault.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    /// Any token account of the vault's mint
    #[account(
        mut,
        constraint = destination.mint == vault.mint @ VaultError::InvalidMint
    )]
    pub destination: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);
    require_custody_covers(&ctx.accounts.custody, amount)?;

    if !ctx.accounts.vault.paused {
        msg!("WARNING: emergency withdrawal from an active vault");
    }
    msg!(
        "Emergency withdrawal of {} to {}",
        amount,
        ctx.accounts.destination.key()
    );

    let accounts = &ctx.accounts;
    pay_out(
        &accounts.token_program,
        &accounts.vault,
        &accounts.custody,
        &accounts.destination,
        amount,
    )?;

    let clock = Clock::get()?;
    let destination = ctx.accounts.destination.key();
    let vault_key = ctx.accounts.vault.key();

    let vault = &mut ctx.accounts.vault;
    let change = vault.record_emergency_withdrawal(amount)?;
    let sequence = vault.next_sequence()?;

    msg!("TVL: {} -> {}", change.previous, change.current);

    emit!(EmergencyWithdrawal {
        vault: vault_key,
        sequence,
        destination,
        amount,
        timestamp: clock.unix_timestamp,
    });

    emit!(TvlChanged {
        vault: vault_key,
        sequence,
        previous: change.previous,
        current: change.current,
        reason: TvlChangeReason::EmergencyWithdrawal,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
