// =============================================================================
// Fund Custody Instruction
// =============================================================================
// Moves tokens into a vault's custody without touching TVL or any user
// balance. This is the physical half of profit crediting: credit_profit
// books the value, fund_custody brings the tokens that will pay it out.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::CustodyFunded;
use crate::state::Vault;

#[derive(Accounts)]
pub struct FundCustody<'info> {
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.registry.as_ref(), vault.mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump = vault.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = funder_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = funder_token_account.owner == funder.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_fund_custody(ctx: Context<FundCustody>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::ZeroAmount);
    require!(
        ctx.accounts.funder_token_account.amount >= amount,
        VaultError::InsufficientBalance
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_token_account.to_account_info(),
                to: ctx.accounts.custody.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    let funder = ctx.accounts.funder.key();
    let vault_key = ctx.accounts.vault.key();
    let sequence = ctx.accounts.vault.next_sequence()?;

    msg!("Custody funded with {} by {}", amount, funder);

    emit!(CustodyFunded {
        vault: vault_key,
        sequence,
        funder,
        amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
