// =============================================================================
// Yield Vault Protocol Constants
// =============================================================================
// Fee curve parameters, policy bounds and PDA seeds. Runtime-tunable values
// (minimum deposit, affiliate share, fee cap) live in the Registry's Policy;
// everything here is fixed at compile time.
// =============================================================================

// =============================================================================
// FEE CURVE (profit withdrawals)
// =============================================================================

/// Scale used for the profit tier thresholds: 1 unit = 10^18 base units.
///
/// This is independent of the deposit mint's decimals. A 6-decimal stable
/// token will practically never leave the first tier; that is the behavior
/// of the deployed fee curve and is kept as-is.
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Profit at or below this is charged the floor rate
pub const LOW_TIER_THRESHOLD: u128 = ONE;

/// Profit at or above this is charged the ceiling rate (1,000,000 units)
pub const HIGH_TIER_THRESHOLD: u128 = 1_000_000 * ONE;

/// Floor rate of the curve, in percent
pub const MIN_PROFIT_FEE_PERCENT: u8 = 1;

/// Ceiling rate of the curve, in percent
pub const MAX_PROFIT_FEE_PERCENT: u8 = 20;

/// Percent denominator: fee = profit * rate / 100
pub const PERCENT_DENOMINATOR: u128 = 100;

// =============================================================================
// FEE CONFIGURATION (in basis points - 1 BPS = 0.01%)
// =============================================================================

/// Flat fee on principal withdrawals: 0.1%, always to the protocol owner
pub const CAPITAL_FEE_BPS: u16 = 10;

/// Total basis points (100%) - used as denominator in fee calculations
/// Example: fee = amount * FEE_BPS / BPS_DENOMINATOR
pub const BPS_DENOMINATOR: u16 = 10000;

// =============================================================================
// POLICY BOUNDS
// =============================================================================

/// Upper bound for Policy.max_fee_percent
pub const MAX_FEE_PERCENT_CAP: u8 = 100;

/// Upper bound for Policy.affiliate_share_bps (100% of the fee)
pub const MAX_AFFILIATE_SHARE_BPS: u16 = BPS_DENOMINATOR;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the Registry PDA (one per program)
/// Full seed: ["registry"]
pub const REGISTRY_SEED: &[u8] = b"registry";

/// Seed for a Vault PDA
/// Full seed: ["vault", registry_pubkey, mint_pubkey]
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the custody token account PDA (holds deposited tokens)
/// Full seed: ["custody", vault_pubkey]
pub const CUSTODY_SEED: &[u8] = b"custody";

/// Seed for Depositor account PDA (principal + profit of one user in one vault)
/// Full seed: ["depositor", vault_pubkey, user_pubkey]
pub const DEPOSITOR_SEED: &[u8] = b"depositor";

/// Seed for the write-once affiliate binding of a user
/// Full seed: ["affiliate", registry_pubkey, user_pubkey]
pub const AFFILIATE_SEED: &[u8] = b"affiliate";

/// Seed for the per-referrer earnings record
/// Full seed: ["affiliate_earnings", registry_pubkey, referrer_pubkey]
pub const AFFILIATE_EARNINGS_SEED: &[u8] = b"affiliate_earnings";
