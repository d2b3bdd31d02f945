// =============================================================================
// Withdraw Capital Instruction
// =============================================================================
// Allows users to withdraw principal, at any time.
//
// Flow:
// 1. Validate: amount > 0, amount <= available principal
// 2. Flat 0.1% fee, entirely to the protocol owner (no affiliate share)
// 3. Transfer amount - fee to user, fee to owner
// 4. Depositor.total_withdrawn += amount, TVL = max(0, TVL - amount)
//
// Not gated on vault or registry pause.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{CapitalWithdrawn, TvlChangeReason, TvlChanged};
use crate::fees::compute_capital_fee;
use crate::instructions::custody::{pay_out, require_custody_covers};
use crate::state::{Depositor, Registry, Vault};

/// Accounts required for the withdraw_capital instruction
#[derive(Accounts)]
pub struct WithdrawCapital<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    #[account(mut)]
    pub user: Signer<'info>,

    // =========================================================================
    // Protocol Accounts
    // =========================================================================

    /// Registry, for the owner's fee account
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// The vault to withdraw from (no pause constraint)
    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault
    )]
    pub vault: Account<'info, Vault>,

    /// A user with no position in this vault fails here with Anchor's
    /// AccountNotInitialized
    #[account(
        mut,
        seeds = [DEPOSITOR_SEED, vault.key().as_ref(), user.key().as_ref()],
        bump = depositor.bump,
        constraint = depositor.owner == user.key() @ VaultError::Unauthorized
    )]
    pub depositor: Account<'info, Depositor>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump = vault.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    /// Receives amount - fee
    #[account(
        mut,
        constraint = user_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Receives the capital fee
    #[account(
        mut,
        constraint = owner_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = owner_token_account.owner == registry.owner @ VaultError::InvalidTokenAccountOwner
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the withdraw_capital instruction
///
/// # Arguments
/// * `amount` - Principal to withdraw, before the fee (in base units)
pub fn handler_withdraw_capital(ctx: Context<WithdrawCapital>, amount: u64) -> Result<()> {
    // =========================================================================
    // Input Validation
    // =========================================================================

    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        amount <= ctx.accounts.depositor.available_principal(),
        VaultError::InsufficientBalance
    );
    require_custody_covers(&ctx.accounts.custody, amount)?;

    let fee = compute_capital_fee(amount)?;
    let net = amount.checked_sub(fee).ok_or(VaultError::MathUnderflow)?;

    if ctx.accounts.vault.paused {
        msg!("Vault is paused - capital withdrawal still allowed");
    }
    msg!("Withdrawing {} principal: fee {}, net {}", amount, fee, net);

    // =========================================================================
    // Transfers: Custody -> User / Owner
    // =========================================================================

    let accounts = &ctx.accounts;

    pay_out(
        &accounts.token_program,
        &accounts.vault,
        &accounts.custody,
        &accounts.user_token_account,
        net,
    )?;

    pay_out(
        &accounts.token_program,
        &accounts.vault,
        &accounts.custody,
        &accounts.owner_token_account,
        fee,
    )?;

    // =========================================================================
    // Update State
    // =========================================================================

    let clock = Clock::get()?;
    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();

    let depositor = &mut ctx.accounts.depositor;
    depositor.record_capital_withdrawal(amount, clock.unix_timestamp)?;

    let vault = &mut ctx.accounts.vault;
    let change = vault.record_capital_withdrawal(amount, fee)?;
    let sequence = vault.next_sequence()?;

    msg!("Capital withdrawal successful!");
    msg!("Remaining principal: {}", depositor.available_principal());
    msg!("TVL: {} -> {}", change.previous, change.current);

    emit!(CapitalWithdrawn {
        vault: vault_key,
        sequence,
        user: user_key,
        amount,
        fee,
        net,
        available_principal: depositor.available_principal(),
        timestamp: clock.unix_timestamp,
    });

    emit!(TvlChanged {
        vault: vault_key,
        sequence,
        previous: change.previous,
        current: change.current,
        reason: TvlChangeReason::CapitalWithdrawal,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
