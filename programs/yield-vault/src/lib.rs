// =============================================================================
// Yield Vault - Vault Accounting and Fee Distribution
// =============================================================================
//
// A Registry creates one Vault per deposit mint. In each vault:
// - Users deposit principal and may withdraw it at any time (0.1% fee)
// - The registry owner credits externally earned profit to users
// - Users withdraw profit minus a tiered performance fee (1% to 20%),
//   part of which goes to their referrer when one is bound
// - The ledger admin can pause a vault; only the owner can unpause it
//
// This is the main entry point for the yield vault Anchor program.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod fees;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("BTbmxL34U5X6sKiLhBbU2CXdLNFitW4RTjZbSD9QcRum");

/// The yield vault program module
#[program]
pub mod yield_vault {
    use super::*;

    // =========================================================================
    // Registry / Factory
    // =========================================================================

    /// Create the Registry and set the initial policy
    ///
    /// The signer becomes the owner. Can only be called once.
    pub fn initialize_registry(
        ctx: Context<InitializeRegistry>,
        params: InitializeRegistryParams,
    ) -> Result<()> {
        instructions::initialize_registry::handler_initialize_registry(ctx, params)
    }

    /// Create a Vault and its custody account for a deposit mint
    ///
    /// Permissionless, one vault per mint, fails while the registry is paused.
    pub fn create_vault(ctx: Context<CreateVault>) -> Result<()> {
        instructions::create_vault::handler_create_vault(ctx)
    }

    // =========================================================================
    // User Operations
    // =========================================================================

    /// Deposit principal into a vault
    ///
    /// # Arguments
    /// * `amount` - Amount of deposit tokens (in base units), at least policy.min_deposit
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Withdraw all pending profit minus the performance fee
    ///
    /// # Fee Distribution
    /// * Fee rate from the tier curve, capped by policy.max_fee_percent
    /// * affiliate_share_bps of the fee to the user's referrer, if bound
    /// * The rest of the fee to the registry owner
    pub fn withdraw_profit(ctx: Context<WithdrawProfit>) -> Result<()> {
        instructions::withdraw_profit::handler_withdraw_profit(ctx)
    }

    /// Withdraw principal, allowed even while paused
    ///
    /// # Arguments
    /// * `amount` - Principal to withdraw; 0.1% of it goes to the owner
    pub fn withdraw_capital(ctx: Context<WithdrawCapital>, amount: u64) -> Result<()> {
        instructions::withdraw_capital::handler_withdraw_capital(ctx, amount)
    }

    // =========================================================================
    // Profit Crediting (owner only)
    // =========================================================================

    /// Credit profit to a user's pending balance and to the vault TVL
    ///
    /// # Arguments
    /// * `amount` - Profit to credit (in base units)
    pub fn credit_profit(ctx: Context<CreditProfit>, amount: u64) -> Result<()> {
        instructions::credit_profit::handler_credit_profit(ctx, amount)
    }

    /// Move tokens into a vault's custody without changing the ledger
    pub fn fund_custody(ctx: Context<FundCustody>, amount: u64) -> Result<()> {
        instructions::fund_custody::handler_fund_custody(ctx, amount)
    }

    // =========================================================================
    // Affiliates
    // =========================================================================

    /// Bind a user to a referrer (owner only, write-once)
    pub fn bind_affiliate(ctx: Context<BindAffiliate>) -> Result<()> {
        instructions::affiliate::handler_bind_affiliate(ctx)
    }

    /// Create a referrer's AffiliateEarnings record
    ///
    /// Only when the registry was initialized with earnings tracking.
    pub fn open_affiliate_earnings(ctx: Context<OpenAffiliateEarnings>) -> Result<()> {
        instructions::affiliate::handler_open_affiliate_earnings(ctx)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Pause a vault (ledger admin only)
    ///
    /// When paused:
    /// * No deposits
    /// * No profit withdrawals
    /// * Capital withdrawals and profit credits still work
    pub fn pause_vault(ctx: Context<PauseVault>) -> Result<()> {
        instructions::admin::handler_pause_vault(ctx)
    }

    /// Unpause a vault (owner only)
    pub fn unpause_vault(ctx: Context<UnpauseVault>) -> Result<()> {
        instructions::admin::handler_unpause_vault(ctx)
    }

    /// Pause the registry (ledger admin only)
    ///
    /// When paused:
    /// * No new vaults, no profit credits
    /// * No deposits or profit withdrawals in any vault
    /// * Capital withdrawals still work
    pub fn pause_registry(ctx: Context<SetRegistryPause>) -> Result<()> {
        instructions::admin::handler_set_registry_paused(ctx, true)
    }

    /// Unpause the registry (ledger admin only)
    pub fn unpause_registry(ctx: Context<SetRegistryPause>) -> Result<()> {
        instructions::admin::handler_set_registry_paused(ctx, false)
    }

    /// Set the minimum deposit (owner only)
    pub fn set_min_deposit(ctx: Context<UpdatePolicy>, min_deposit: u64) -> Result<()> {
        instructions::admin::handler_update_policy(ctx, PolicyChange::MinDeposit(min_deposit))
    }

    /// Set the referrer's share of the profit fee (owner only)
    ///
    /// # Arguments
    /// * `affiliate_share_bps` - 0..=10000
    pub fn set_affiliate_share_bps(
        ctx: Context<UpdatePolicy>,
        affiliate_share_bps: u16,
    ) -> Result<()> {
        instructions::admin::handler_update_policy(
            ctx,
            PolicyChange::AffiliateShareBps(affiliate_share_bps),
        )
    }

    /// Set the cap on the profit fee rate (owner only)
    ///
    /// # Arguments
    /// * `max_fee_percent` - 0..=100
    pub fn set_max_fee_percent(ctx: Context<UpdatePolicy>, max_fee_percent: u8) -> Result<()> {
        instructions::admin::handler_update_policy(
            ctx,
            PolicyChange::MaxFeePercent(max_fee_percent),
        )
    }

    /// Replace the ledger admin (owner only)
    pub fn set_ledger_admin(ctx: Context<SetLedgerAdmin>) -> Result<()> {
        instructions::admin::handler_set_ledger_admin(ctx)
    }

    /// Transfer ownership to a new address (owner only)
    ///
    /// # Warning
    /// * This is irreversible!
    /// * Make sure the new owner address is correct
    pub fn transfer_ownership(ctx: Context<TransferOwnership>) -> Result<()> {
        instructions::admin::handler_transfer_ownership(ctx)
    }

    /// Move custodied tokens out without fees or bookkeeping (owner only)
    ///
    /// TVL is reduced by `amount`, floored at zero.
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
        instructions::emergency_withdraw::handler_emergency_withdraw(ctx, amount)
    }
}
