// =============================================================================
// Initialize Registry Instruction
// =============================================================================
// Creates the protocol Registry. The signer becomes the owner; the ledger
// admin is passed in and may be the same key.
//
// Whether affiliate payouts are also recorded to AffiliateEarnings is decided
// here, once, and cannot be changed later.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::RegistryInitialized;
use crate::state::{Policy, Registry};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeRegistryParams {
    /// Smallest accepted deposit, in base units
    pub min_deposit: u64,
    /// Referrer's share of the profit fee, 0..=10000 bps
    pub affiliate_share_bps: u16,
    /// Cap on the profit fee rate, 0..=100 percent
    pub max_fee_percent: u8,
    /// Pause authority
    pub ledger_admin: Pubkey,
    /// Record affiliate payouts to AffiliateEarnings
    pub track_affiliate_earnings: bool,
}

/// Accounts required for the initialize_registry instruction.
#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    /// The protocol owner, pays for the registry account
    #[account(mut)]
    pub owner: Signer<'info>,

    /// The Registry account to create (one per program)
    #[account(
        init,
        payer = owner,
        space = 8 + Registry::INIT_SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    pub system_program: Program<'info, System>,
}

pub fn handler_initialize_registry(
    ctx: Context<InitializeRegistry>,
    params: InitializeRegistryParams,
) -> Result<()> {
    let registry = &mut ctx.accounts.registry;

    registry.owner = ctx.accounts.owner.key();
    registry.policy = Policy {
        min_deposit: 0,
        affiliate_share_bps: 0,
        max_fee_percent: 0,
        paused: false,
    };
    registry.track_affiliate_earnings = params.track_affiliate_earnings;
    registry.vault_count = 0;
    registry.bump = ctx.bumps.registry;

    // Same bounds as the setters
    registry.set_ledger_admin(params.ledger_admin)?;
    registry.set_min_deposit(params.min_deposit)?;
    registry.set_affiliate_share_bps(params.affiliate_share_bps)?;
    registry.set_max_fee_percent(params.max_fee_percent)?;

    msg!("Registry initialized: {}", registry.key());
    msg!("Owner: {}", registry.owner);
    msg!("Ledger admin: {}", registry.ledger_admin);
    msg!(
        "Policy: min_deposit={}, affiliate_share_bps={}, max_fee_percent={}",
        registry.policy.min_deposit,
        registry.policy.affiliate_share_bps,
        registry.policy.max_fee_percent
    );

    emit!(RegistryInitialized {
        registry: registry.key(),
        owner: registry.owner,
        ledger_admin: registry.ledger_admin,
        min_deposit: registry.policy.min_deposit,
        affiliate_share_bps: registry.policy.affiliate_share_bps,
        max_fee_percent: registry.policy.max_fee_percent,
        track_affiliate_earnings: registry.track_affiliate_earnings,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
