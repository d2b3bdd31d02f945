// =============================================================================
// Withdraw Profit Instruction
// =============================================================================
// Pays out a user's entire pending profit, minus the tiered performance fee.
//
// Flow:
// 1. Look up the user's referrer (empty binding PDA = no referrer)
// 2. Quote: fee from the tier curve capped by policy, split protocol/affiliate
// 3. Transfer net to user, protocol share to owner, affiliate share to referrer
// 4. Zero pending profit, remove the whole gross profit from TVL
// 5. If earnings tracking is enabled and the referrer's record was supplied,
//    add the affiliate share to it (reporting only, never required to pay)
//
// Blocked while the vault or the registry is paused.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::*;
use crate::error::VaultError;
use crate::events::{AffiliateEarningsRecorded, ProfitWithdrawn, TvlChangeReason, TvlChanged};
use crate::fees::quote_profit_withdrawal;
use crate::instructions::custody::{pay_out, require_custody_covers};
use crate::state::{AffiliateBinding, AffiliateEarnings, Depositor, Registry, Vault};

/// Accounts required for the withdraw_profit instruction
#[derive(Accounts)]
pub struct WithdrawProfit<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    #[account(mut)]
    pub user: Signer<'info>,

    // =========================================================================
    // Protocol Accounts
    // =========================================================================

    /// Registry holding the policy (fee cap, affiliate share) and the owner
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [VAULT_SEED, registry.key().as_ref(), vault.mint.as_ref()],
        bump = vault.bump,
        has_one = registry @ VaultError::NotAVault,
        constraint = !vault.paused @ VaultError::VaultPaused
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

    /// The user's affiliate binding PDA, which may not exist
    /// CHECK: Address is pinned by seeds; contents are read by AffiliateBinding::referrer_of
    #[account(
        seeds = [AFFILIATE_SEED, registry.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub affiliate_binding: UncheckedAccount<'info>,

    /// Referrer's earnings record; only read when tracking is enabled
    #[account(mut)]
    pub affiliate_earnings: Option<Account<'info, AffiliateEarnings>>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    #[account(
        mut,
        seeds = [CUSTODY_SEED, vault.key().as_ref()],
        bump = vault.custody_bump
    )]
    pub custody: Account<'info, TokenAccount>,

    /// Receives the net profit
    #[account(
        mut,
        constraint = user_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = user_token_account.owner == user.key() @ VaultError::InvalidTokenAccountOwner
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// Receives the protocol share of the fee
    #[account(
        mut,
        constraint = owner_token_account.mint == vault.mint @ VaultError::InvalidMint,
        constraint = owner_token_account.owner == registry.owner @ VaultError::InvalidTokenAccountOwner
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// Receives the affiliate share; required when the user has a referrer
    /// and the share is non-zero
    #[account(
        mut,
        constraint = referrer_token_account.mint == vault.mint @ VaultError::InvalidMint
    )]
    pub referrer_token_account: Option<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_profit(ctx: Context<WithdrawProfit>) -> Result<()> {
    ctx.accounts
        .vault
        .require_open(&ctx.accounts.registry.policy)?;

    let pending_profit = ctx.accounts.depositor.pending_profit;
    require!(pending_profit > 0, VaultError::NoProfit);

    // =========================================================================
    // Quote
    // =========================================================================

    let referrer = AffiliateBinding::referrer_of(&ctx.accounts.affiliate_binding)?;
    let quote = quote_profit_withdrawal(pending_profit, &ctx.accounts.registry.policy, referrer)?;

    msg!(
        "Withdrawing profit: gross {}, fee {}, net {}",
        quote.gross,
        quote.fee,
        quote.net
    );
    msg!(
        "Fee split: protocol {}, affiliate {}",
        quote.protocol_share,
        quote.affiliate_share
    );

    require_custody_covers(&ctx.accounts.custody, quote.gross)?;

    // =========================================================================
    // Transfers: Custody -> User / Owner / Referrer
    // =========================================================================

    let accounts = &ctx.accounts;

    pay_out(
        &accounts.token_program,
        &accounts.vault,
        &accounts.custody,
        &accounts.user_token_account,
        quote.net,
    )?;

    pay_out(
        &accounts.token_program,
        &accounts.vault,
        &accounts.custody,
        &accounts.owner_token_account,
        quote.protocol_share,
    )?;

    if let (Some(referrer), true) = (referrer, quote.affiliate_share > 0) {
        let referrer_token_account = accounts
            .referrer_token_account
            .as_ref()
            .ok_or(VaultError::MissingReferrerAccount)?;
        require_keys_eq!(
            referrer_token_account.owner,
            referrer,
            VaultError::InvalidTokenAccountOwner
        );

        pay_out(
            &accounts.token_program,
            &accounts.vault,
            &accounts.custody,
            referrer_token_account,
            quote.affiliate_share,
        )?;
    }

    // =========================================================================
    // Update State
    // =========================================================================

    let clock = Clock::get()?;
    let vault_key = ctx.accounts.vault.key();
    let user_key = ctx.accounts.user.key();

    ctx.accounts.depositor.take_profit(clock.unix_timestamp)?;

    let vault = &mut ctx.accounts.vault;
    let change = vault.record_profit_withdrawal(&quote, &ctx.accounts.registry.policy)?;
    let sequence = vault.next_sequence()?;

    // Reporting side channel: recorded after the split, never a precondition
    if let (Some(referrer), true) = (referrer, quote.affiliate_share > 0) {
        let tracking = ctx.accounts.registry.track_affiliate_earnings;
        let earnings = ctx.accounts.affiliate_earnings.as_mut().map(|e| &mut **e);

        match AffiliateEarnings::record_if_tracked(earnings, tracking, &referrer, quote.affiliate_share)? {
            Some(total_earned) => emit!(AffiliateEarningsRecorded {
                referrer,
                vault: vault_key,
                amount: quote.affiliate_share,
                total_earned,
                timestamp: clock.unix_timestamp,
            }),
            None if tracking => msg!("Affiliate earnings for {} not recorded", referrer),
            None => {}
        }
    }

    msg!("Profit withdrawal successful! TVL: {} -> {}", change.previous, change.current);

    emit!(ProfitWithdrawn {
        vault: vault_key,
        sequence,
        user: user_key,
        gross: quote.gross,
        fee: quote.fee,
        net: quote.net,
        protocol_share: quote.protocol_share,
        affiliate_share: quote.affiliate_share,
        referrer: referrer.unwrap_or_default(),
        timestamp: clock.unix_timestamp,
    });

    emit!(TvlChanged {
        vault: vault_key,
        sequence,
        previous: change.previous,
        current: change.current,
        reason: TvlChangeReason::ProfitWithdrawal,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
