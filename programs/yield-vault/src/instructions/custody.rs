// =============================================================================
// Custody Transfers
// =============================================================================
// Outbound transfers from a vault's custody account, signed by the vault PDA.
// Each runs as a CPI inside the calling instruction: if any transfer fails the
// whole instruction fails and no ledger change is committed.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::VaultError;
use crate::state::Vault;

/// Fail early with a readable error when custody cannot cover `total_out`
pub fn require_custody_covers(custody: &TokenAccount, total_out: u64) -> Result<()> {
    require!(custody.amount >= total_out, VaultError::InsufficientCustody);
    Ok(())
}

/// Transfer `amount` from custody to `destination`. Zero is a no-op.
pub fn pay_out<'info>(
    token_program: &Program<'info, Token>,
    vault: &Account<'info, Vault>,
    custody: &Account<'info, TokenAccount>,
    destination: &Account<'info, TokenAccount>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let bump = [vault.bump];
    let vault_seeds: &[&[u8]] = &[
        VAULT_SEED,
        vault.registry.as_ref(),
        vault.mint.as_ref(),
        &bump,
    ];
    let signer_seeds = &[vault_seeds];

    let transfer_ctx = CpiContext::new_with_signer(
        token_program.to_account_info(),
        Transfer {
            from: custody.to_account_info(),
            to: destination.to_account_info(),
            authority: vault.to_account_info(),
        },
        signer_seeds,
    );

    token::transfer(transfer_ctx, amount)
}
