// =============================================================================
// Affiliate Instructions
// =============================================================================
// - bind_affiliate: owner-only, links a user to a referrer exactly once
// - open_affiliate_earnings: creates the reporting record for a referrer when
//   the registry tracks affiliate earnings
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::VaultError;
use crate::events::AffiliateBound;
use crate::state::{AffiliateBinding, AffiliateEarnings, Capability, Registry};

// =============================================================================
// Bind Affiliate
// =============================================================================

#[derive(Accounts)]
pub struct BindAffiliate<'info> {
    /// The registry owner; pays for the binding account
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.has_capability(&owner.key(), Capability::Owner) @ VaultError::OwnerOnly
    )]
    pub registry: Account<'info, Registry>,

    /// The referred user
    /// CHECK: Only used as a PDA seed and stored
    pub user: UncheckedAccount<'info>,

    /// The referrer
    /// CHECK: Only stored; validated against default and self in AffiliateBinding::bind
    pub referrer: UncheckedAccount<'info>,

    /// init_if_needed: a second bind fails with AlreadyBound in the handler
    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + AffiliateBinding::INIT_SPACE,
        seeds = [AFFILIATE_SEED, registry.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub affiliate_binding: Account<'info, AffiliateBinding>,

    pub system_program: Program<'info, System>,
}

pub fn handler_bind_affiliate(ctx: Context<BindAffiliate>) -> Result<()> {
    let user = ctx.accounts.user.key();
    let referrer = ctx.accounts.referrer.key();
    let clock = Clock::get()?;
    let bump = ctx.bumps.affiliate_binding;

    ctx.accounts
        .affiliate_binding
        .bind(user, referrer, clock.unix_timestamp, bump)?;

    msg!("User {} bound to referrer {}", user, referrer);

    emit!(AffiliateBound {
        registry: ctx.accounts.registry.key(),
        user,
        referrer,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Open Affiliate Earnings
// =============================================================================

#[derive(Accounts)]
pub struct OpenAffiliateEarnings<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
        constraint = registry.track_affiliate_earnings @ VaultError::AffiliateTrackingDisabled
    )]
    pub registry: Account<'info, Registry>,

    /// CHECK: Only used as a PDA seed and stored
    pub referrer: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + AffiliateEarnings::INIT_SPACE,
        seeds = [AFFILIATE_EARNINGS_SEED, registry.key().as_ref(), referrer.key().as_ref()],
        bump
    )]
    pub affiliate_earnings: Account<'info, AffiliateEarnings>,

    pub system_program: Program<'info, System>,
}

pub fn handler_open_affiliate_earnings(ctx: Context<OpenAffiliateEarnings>) -> Result<()> {
    let referrer = ctx.accounts.referrer.key();
    require!(referrer != Pubkey::default(), VaultError::InvalidAddress);

    let bump = ctx.bumps.affiliate_earnings;
    let earnings = &mut ctx.accounts.affiliate_earnings;
    earnings.init_if_new(referrer, bump);

    msg!(
        "Affiliate earnings for {}: {} over {} payouts",
        referrer,
        earnings.total_earned,
        earnings.payout_count
    );

    Ok(())
}
