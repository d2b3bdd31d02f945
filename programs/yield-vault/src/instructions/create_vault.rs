// =============================================================================
// Create Vault Instruction
// =============================================================================
// Creates a Vault for one deposit mint, together with the PDA-owned custody
// token account that holds its tokens.
//
// Permissionless: anyone may pay for a vault, but only one can exist per mint
// (the PDA is derived from it) and not while the registry is paused.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::VaultCreated;
use crate::state::{Registry, Vault};

/// Accounts required for the create_vault instruction.
#[derive(Accounts)]
pub struct CreateVault<'info> {
    /// Pays for the vault and custody accounts
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The registry creating the vault
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = !registry.policy.paused @ VaultError::RegistryPaused
    )]
    pub registry: Account<'info, Registry>,

    /// The token users will deposit (e.g., USDC)
    #[account(
        constraint = mint.key() != Pubkey::default() @ VaultError::InvalidAddress
    )]
    pub mint: Account<'info, Mint>,

    /// The Vault account to create
    #[account(
        init,
        payer = payer,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, registry.key().as_ref(), mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// Custody token account, owned by the vault PDA
    #[account(
        init,
        payer = payer,
        token::mint = mint,
        token::authority = vault,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump
    )]
    pub custody: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_create_vault(ctx: Context<CreateVault>) -> Result<()> {
    let registry_key = ctx.accounts.registry.key();
    let index = ctx.accounts.registry.record_vault_created()?;

    let vault = &mut ctx.accounts.vault;

    vault.registry = registry_key;
    vault.mint = ctx.accounts.mint.key();
    vault.custody = ctx.accounts.custody.key();
    vault.index = index;

    vault.total_value_locked = 0;
    vault.total_profit_credited = 0;
    vault.total_fees_collected = 0;
    vault.total_affiliate_paid = 0;

    vault.paused = false;
    vault.event_sequence = 0;

    vault.bump = ctx.bumps.vault;
    vault.custody_bump = ctx.bumps.custody;

    msg!("Vault #{} created: {}", index, vault.key());
    msg!("Mint: {}", vault.mint);
    msg!("Custody: {}", vault.custody);

    emit!(VaultCreated {
        registry: registry_key,
        vault: vault.key(),
        mint: vault.mint,
        custody: vault.custody,
        index,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
