// =============================================================================
// Credit Profit Instruction
// =============================================================================
// Called by the registry owner to credit externally computed yield to one
// user in one vault.
//
// KEY POINTS:
// - Only the registry owner can call this (the ledger admin cannot)
// - The vault itself also refuses credits from any registry but its own
// - No tokens move: TVL and the user's pending profit grow now, the matching
//   tokens may reach custody later (see fund_custody)
// - Not blocked by a vault pause, blocked by a registry pause
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{ProfitCredited, TvlChangeReason, TvlChanged};
use crate::state::{Capability, Depositor, Registry, Vault};

/// Accounts required for the credit_profit instruction
#[derive(Accounts)]
pub struct CreditProfit<'info> {
    /// The registry owner; pays for the Depositor account if it is new
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// Must have been created by this registry
    #[account(
        mut,
        constraint = vault.registry == registry.key() @ VaultError::NotAVault
    )]
    pub vault: Account<'info, Vault>,

    /// The user receiving the profit
    /// CHECK: Only used as a PDA seed and recorded as the Depositor owner
    pub user: UncheckedAccount<'info>,

    /// The user's position, created if the user never deposited
    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Depositor::INIT_SPACE,
        seeds = [DEPOSITOR_SEED, vault.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub depositor: Account<'info, Depositor>,

    pub system_program: Program<'info, System>,
}

/// Credit profit to a user
///
/// # Arguments
/// * `amount` - Profit to credit (in base units of the vault mint)
pub fn handler_credit_profit(ctx: Context<CreditProfit>, amount: u64) -> Result<()> {
    let registry = &ctx.accounts.registry;
    registry.authorize(&ctx.accounts.owner.key(), Capability::Owner)?;
    registry.require_active()?;
    require!(amount > 0, VaultError::ZeroAmount);

    let registry_key = ctx.accounts.registry.key();
    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();
    let depositor_bump = ctx.bumps.depositor;
    let clock = Clock::get()?;

    msg!("Crediting {} profit to {}", amount, user_key);

    let vault = &mut ctx.accounts.vault;
    let change = vault.credit_profit(&registry_key, amount)?;
    let sequence = vault.next_sequence()?;

    let depositor = &mut ctx.accounts.depositor;
    depositor.init_if_new(vault_key, user_key, depositor_bump);
    depositor.credit_profit(amount)?;

    msg!(
        "Profit credited. Pending profit: {}, TVL: {} -> {}",
        depositor.pending_profit,
        change.previous,
        change.current
    );

    emit!(ProfitCredited {
        vault: vault_key,
        sequence,
        user: user_key,
        amount,
        pending_profit: depositor.pending_profit,
        timestamp: clock.unix_timestamp,
    });

    emit!(TvlChanged {
        vault: vault_key,
        sequence,
        previous: change.previous,
        current: change.current,
        reason: TvlChangeReason::ProfitCredit,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
