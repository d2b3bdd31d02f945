// =============================================================================
// Deposit Instruction
// =============================================================================
// Allows users to deposit principal into a vault.
//
// Flow:
// 1. Validate: vault and registry active, amount > 0, amount >= policy.min_deposit
// 2. Deposit tokens are transferred from user to custody
// 3. Depositor account is created if needed and credited with the principal
// 4. Vault TVL increases by the same amount
// 5. Deposited + TvlChanged events share one sequence number
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{Deposited, TvlChangeReason, TvlChanged};
use crate::state::{Depositor, Registry, Vault};

/// Accounts required for the deposit instruction
#[derive(Accounts)]
pub struct Deposit<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The user depositing tokens
    /// Must sign to authorize the token transfer
    #[account(mut)]
    pub user: Signer<'info>,

    // =========================================================================
    // Protocol Accounts
    // =========================================================================

    /// Registry holding the policy (min deposit)
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// The vault to deposit into
    ///
    /// Constraints:
    /// - seeds: Validates this is the vault PDA for its mint
    /// - has_one: Vault belongs to this registry
    /// - constraint: Vault must not be paused
    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault,
        constraint = !vault.paused @ VaultError::VaultPaused
    )]
    pub vault: Account<'info, Vault>,

    /// The user's position in this vault
    ///
    /// init_if_needed: first-time depositors automatically get a Depositor account
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Depositor::INIT_SPACE,
        seeds = [DEPOSITOR_SEED, vault.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub depositor: Account<'info, Depositor>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    /// User's token account (source of funds)
    #[account(
        mut,
        constraint = user_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Vault custody (destination for deposited tokens)
    #[account(
        mut,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump = vault.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the deposit instruction
///
/// # Arguments
/// * `ctx` - The instruction context with all accounts
/// * `amount` - Amount of tokens to deposit (in base units)
pub fn handler_deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    // =========================================================================
    // Input Validation
    // =========================================================================

    ctx.accounts
        .vault
        .validate_deposit(amount, &ctx.accounts.registry.policy)?;

    // Check user has sufficient balance
    require!(
        ctx.accounts.user_token_account.amount >= amount,
        VaultError::InsufficientBalance
    );

    msg!("Depositing {} tokens", amount);

    // =========================================================================
    // Transfer Tokens: User -> Custody
    // =========================================================================

    let transfer_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.user_token_account.to_account_info(),
            to: ctx.accounts.custody.to_account_info(),
            authority: ctx.accounts.user.to_account_info(),
        },
    );

    token::transfer(transfer_ctx, amount)?;

    // =========================================================================
    // Update Depositor Account
    // =========================================================================

    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();
    let depositor_bump = ctx.bumps.depositor;
    let clock = Clock::get()?;

    let depositor = &mut ctx.accounts.depositor;
    depositor.init_if_new(vault_key, user_key, depositor_bump);
    depositor.record_deposit(amount, clock.unix_timestamp)?;

    // =========================================================================
    // Update Vault State
    // =========================================================================

    let vault = &mut ctx.accounts.vault;
    let change = vault.record_deposit(amount)?;
    let sequence = vault.next_sequence()?;

    // =========================================================================
    // Log Results
    // =========================================================================

    msg!("Deposit successful!");
    msg!("User principal: {}", depositor.available_principal());
    msg!("TVL: {} -> {}", change.previous, change.current);

    emit!(Deposited {
        vault: vault_key,
        sequence,
        user: user_key,
        amount,
        available_principal: depositor.available_principal(),
        timestamp: clock.unix_timestamp,
    });

    emit!(TvlChanged {
        vault: vault_key,
        sequence,
        previous: change.previous,
        current: change.current,
        reason: TvlChangeReason::Deposit,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
