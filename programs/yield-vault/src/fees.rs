// =============================================================================
// Fee Calculation
// =============================================================================
// Pure functions, no account access:
// - compute_profit_fee: tiered performance fee charged on profit withdrawals
// - compute_capital_fee: flat 0.1% charged on principal withdrawals
// - split_fee: protocol / affiliate split of a profit fee
// - quote_profit_withdrawal: the full breakdown used by withdraw_profit
//
// Profit fee curve (rate in percent, thresholds on the 10^18 scale):
//   profit <= 1 ONE               -> 1%
//   1 ONE < profit < 1M ONE       -> 1% + profit * 19% / 1M ONE
//   profit >= 1M ONE              -> 20%
// then effective rate = min(curve rate, policy max_fee_percent)
// and fee = floor(profit * effective rate / 100).
// =============================================================================

use anchor_lang::prelude::*;
use ruint::aliases::U256;

use crate::constants::*;
use crate::error::VaultError;
use crate::state::Policy;

/// Slope of the ramp tier: the rate climbs 19 points between the thresholds
const RAMP_SPAN_PERCENT: u64 = (MAX_PROFIT_FEE_PERCENT - MIN_PROFIT_FEE_PERCENT) as u64;

/// Performance fee on `profit` under a cap of `max_fee_percent`.
///
/// Works on u128 so the 10^24 top threshold is reachable; the ramp tier uses
/// exact 256-bit rational arithmetic and truncates once, at the end.
pub fn compute_profit_fee(profit: u128, max_fee_percent: u8) -> Result<u128> {
    require!(
        max_fee_percent <= MAX_FEE_PERCENT_CAP,
        VaultError::InvalidMaxFeePercent
    );

    if profit == 0 || max_fee_percent == 0 {
        return Ok(0);
    }

    let cap = max_fee_percent as u128;

    if profit <= LOW_TIER_THRESHOLD {
        return percent_of(profit, cap.min(MIN_PROFIT_FEE_PERCENT as u128));
    }

    if profit >= HIGH_TIER_THRESHOLD {
        return percent_of(profit, cap.min(MAX_PROFIT_FEE_PERCENT as u128));
    }

    // Ramp: rate = (H + 19 * profit) / H percent, with H = HIGH_TIER_THRESHOLD
    let high = U256::from(HIGH_TIER_THRESHOLD);
    let profit_wide = U256::from(profit);

    let rate_numerator = profit_wide
        .checked_mul(U256::from(RAMP_SPAN_PERCENT))
        .and_then(|x| x.checked_add(high))
        .ok_or(VaultError::MathOverflow)?;

    let cap_numerator = U256::from(cap)
        .checked_mul(high)
        .ok_or(VaultError::MathOverflow)?;

    // Policy cap binds before the curve does
    if cap_numerator <= rate_numerator {
        return percent_of(profit, cap);
    }

    let fee = profit_wide
        .checked_mul(rate_numerator)
        .and_then(|x| x.checked_div(high))
        .and_then(|x| x.checked_div(U256::from(PERCENT_DENOMINATOR)))
        .ok_or(VaultError::MathOverflow)?;

    u128::try_from(fee).map_err(|_| error!(VaultError::MathOverflow))
}

/// Flat 0.1% fee on a principal withdrawal. Not affected by policy.
pub fn compute_capital_fee(amount: u64) -> Result<u64> {
    let fee = (amount as u128)
        .checked_mul(CAPITAL_FEE_BPS as u128)
        .ok_or(VaultError::MathOverflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(VaultError::MathOverflow)?;

    Ok(fee as u64)
}

/// Split a profit fee between the protocol and the user's referrer.
///
/// Returns: (protocol_share, affiliate_share)
/// - no referrer: the whole fee goes to the protocol
/// - with referrer: affiliate_share = floor(fee * share_bps / 10000),
///   protocol_share is the remainder so the two always sum to `fee`
pub fn split_fee(fee: u64, referrer: Option<Pubkey>, affiliate_share_bps: u16) -> Result<(u64, u64)> {
    if referrer.is_none() {
        return Ok((fee, 0));
    }

    require!(
        affiliate_share_bps <= MAX_AFFILIATE_SHARE_BPS,
        VaultError::InvalidAffiliateShare
    );

    let affiliate_share = (fee as u128)
        .checked_mul(affiliate_share_bps as u128)
        .ok_or(VaultError::MathOverflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(VaultError::MathOverflow)? as u64;

    // Remainder to the protocol, avoids rounding drift
    let protocol_share = fee
        .checked_sub(affiliate_share)
        .ok_or(VaultError::MathUnderflow)?;

    Ok((protocol_share, affiliate_share))
}

/// Breakdown of a profit withdrawal, before any tokens move.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfitWithdrawalQuote {
    /// Entire pending profit, removed from TVL
    pub gross: u64,
    /// Performance fee charged on `gross`
    pub fee: u64,
    /// Part of `fee` paid to the protocol owner
    pub protocol_share: u64,
    /// Part of `fee` paid to the referrer (0 without one)
    pub affiliate_share: u64,
    /// Paid to the user: gross - fee
    pub net: u64,
}

/// Quote a withdrawal of `pending_profit` under `policy` for a user bound to
/// `referrer`.
pub fn quote_profit_withdrawal(
    pending_profit: u64,
    policy: &Policy,
    referrer: Option<Pubkey>,
) -> Result<ProfitWithdrawalQuote> {
    let fee = compute_profit_fee(pending_profit as u128, policy.max_fee_percent)?;

    // fee <= profit, so it always fits back into u64
    let fee = u64::try_from(fee).map_err(|_| error!(VaultError::MathOverflow))?;

    let (protocol_share, affiliate_share) =
        split_fee(fee, referrer, policy.affiliate_share_bps)?;

    let net = pending_profit
        .checked_sub(fee)
        .ok_or(VaultError::MathUnderflow)?;

    Ok(ProfitWithdrawalQuote {
        gross: pending_profit,
        fee,
        protocol_share,
        affiliate_share,
        net,
    })
}

/// floor(amount * percent / 100)
fn percent_of(amount: u128, percent: u128) -> Result<u128> {
    let fee = amount
        .checked_mul(percent)
        .ok_or(VaultError::MathOverflow)?
        .checked_div(PERCENT_DENOMINATOR)
        .ok_or(VaultError::MathOverflow)?;

    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// USDC-style 6 decimal unit
    const USDC: u64 = 1_000_000;

    fn policy(max_fee_percent: u8, affiliate_share_bps: u16) -> Policy {
        Policy {
            min_deposit: 10 * USDC,
            affiliate_share_bps,
            max_fee_percent,
            paused: false,
        }
    }

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    /// a/pa <= b/pb, compared without truncation
    fn ratio_le(fee_a: u128, profit_a: u128, fee_b: u128, profit_b: u128) -> bool {
        U256::from(fee_a) * U256::from(profit_b) <= U256::from(fee_b) * U256::from(profit_a)
    }

    fn ratio_lt(fee_a: u128, profit_a: u128, fee_b: u128, profit_b: u128) -> bool {
        U256::from(fee_a) * U256::from(profit_b) < U256::from(fee_b) * U256::from(profit_a)
    }

    // -------------------------------------------------------------------------
    // Profit fee curve
    // -------------------------------------------------------------------------

    #[test]
    fn low_tier_charges_one_percent() {
        assert_eq!(compute_profit_fee(20_000_000, 20).unwrap(), 200_000);
        assert_eq!(compute_profit_fee(ONE, 20).unwrap(), ONE / 100);
    }

    #[test]
    fn low_tier_truncates() {
        // 1% of 199 base units is 1.99 -> 1
        assert_eq!(compute_profit_fee(199, 20).unwrap(), 1);
        assert_eq!(compute_profit_fee(99, 20).unwrap(), 0);
    }

    #[test]
    fn zero_cap_means_zero_fee_in_every_tier() {
        assert_eq!(compute_profit_fee(500, 0).unwrap(), 0);
        assert_eq!(compute_profit_fee(1_000 * ONE, 0).unwrap(), 0);
        assert_eq!(compute_profit_fee(5_000_000 * ONE, 0).unwrap(), 0);
    }

    #[test]
    fn zero_profit_means_zero_fee() {
        assert_eq!(compute_profit_fee(0, 20).unwrap(), 0);
    }

    #[test]
    fn cap_above_one_hundred_is_rejected() {
        let err = compute_profit_fee(ONE, 101).unwrap_err();
        assert_eq!(err, VaultError::InvalidMaxFeePercent.into());
    }

    #[test]
    fn ramp_midpoint_rate() {
        // profit = 500,000 ONE -> 1% + 9.5% = 10.5%
        let profit = 500_000 * ONE;
        let fee = compute_profit_fee(profit, 20).unwrap();
        assert_eq!(fee, profit * 105 / 1000);
    }

    #[test]
    fn ramp_just_above_low_threshold() {
        // 2 ONE -> 1% + 2 * 19 / 1e6 % = 1.000038%
        let profit = 2 * ONE;
        let fee = compute_profit_fee(profit, 20).unwrap();
        let expected = profit * 1_000_038 / 100_000_000;
        assert_eq!(fee, expected);
    }

    #[test]
    fn high_tier_is_pinned_at_twenty_percent() {
        let at = HIGH_TIER_THRESHOLD;
        assert_eq!(compute_profit_fee(at, 20).unwrap(), at / 5);

        let above = 3 * HIGH_TIER_THRESHOLD + 7;
        assert_eq!(compute_profit_fee(above, 20).unwrap(), above * 20 / 100);

        // a cap above the curve does not raise the ceiling
        assert_eq!(compute_profit_fee(at, 100).unwrap(), at / 5);
    }

    #[test]
    fn policy_cap_clamps_ramp_rate() {
        // 100,000 ONE -> curve rate 2.9%, capped at 2%
        let profit = 100_000 * ONE;
        let fee = compute_profit_fee(profit, 2).unwrap();
        assert_eq!(fee, profit * 2 / 100);
    }

    #[test]
    fn policy_cap_clamps_low_tier_only_below_one_percent() {
        assert_eq!(compute_profit_fee(ONE, 0).unwrap(), 0);
        assert_eq!(compute_profit_fee(ONE, 1).unwrap(), ONE / 100);
        assert_eq!(compute_profit_fee(ONE, 50).unwrap(), ONE / 100);
    }

    #[test]
    fn cap_exactly_at_curve_rate_matches_uncapped() {
        // 500,000 ONE has curve rate 10.5%, cap 11 leaves it alone, cap 10 binds
        let profit = 500_000 * ONE;
        assert_eq!(compute_profit_fee(profit, 11).unwrap(), profit * 105 / 1000);
        assert_eq!(compute_profit_fee(profit, 10).unwrap(), profit / 10);
    }

    #[test]
    fn fee_rate_is_non_decreasing_across_tiers() {
        let samples: [u128; 10] = [
            1_000,
            ONE / 2,
            ONE,
            ONE + 1,
            10 * ONE,
            10_000 * ONE,
            250_000 * ONE,
            999_999 * ONE,
            HIGH_TIER_THRESHOLD,
            40 * HIGH_TIER_THRESHOLD,
        ];

        for pair in samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let fee_a = compute_profit_fee(a, 20).unwrap();
            let fee_b = compute_profit_fee(b, 20).unwrap();
            assert!(fee_a <= fee_b, "fee not monotonic between {} and {}", a, b);
            assert!(
                ratio_le(fee_a, a, fee_b, b),
                "rate decreased between {} and {}",
                a,
                b
            );
        }
    }

    #[test]
    fn fee_rate_strictly_increases_inside_ramp() {
        let samples: [u128; 6] = [
            10 * ONE,
            1_000 * ONE,
            50_000 * ONE,
            300_000 * ONE,
            700_000 * ONE,
            999_000 * ONE,
        ];

        for pair in samples.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let fee_a = compute_profit_fee(a, 20).unwrap();
            let fee_b = compute_profit_fee(b, 20).unwrap();
            assert!(ratio_lt(fee_a, a, fee_b, b), "rate flat between {} and {}", a, b);
        }
    }

    #[test]
    fn largest_u64_profit_does_not_overflow() {
        let fee = compute_profit_fee(u64::MAX as u128, 20).unwrap();
        assert!(fee > (u64::MAX as u128) / 100);
        assert!(fee < (u64::MAX as u128) / 5);
    }

    // -------------------------------------------------------------------------
    // Capital fee
    // -------------------------------------------------------------------------

    #[test]
    fn capital_fee_is_ten_bps() {
        // 20 USDC -> 0.02 USDC
        assert_eq!(compute_capital_fee(20 * USDC).unwrap(), 20_000);
        assert_eq!(compute_capital_fee(999).unwrap(), 0);
        assert_eq!(compute_capital_fee(1_000).unwrap(), 1);
        assert_eq!(compute_capital_fee(u64::MAX).unwrap(), u64::MAX / 1000);
    }

    // -------------------------------------------------------------------------
    // Fee split
    // -------------------------------------------------------------------------

    #[test]
    fn split_without_referrer_keeps_whole_fee() {
        for bps in [0u16, 2_500, 10_000] {
            assert_eq!(split_fee(12_345, None, bps).unwrap(), (12_345, 0));
        }
    }

    #[test]
    fn split_with_referrer_sums_to_fee() {
        let referrer = Some(key(7));
        for (fee, bps) in [(0u64, 5_000u16), (1, 5_000), (333, 3_333), (200_000, 2_000), (u64::MAX, 9_999)] {
            let (protocol, affiliate) = split_fee(fee, referrer, bps).unwrap();
            assert_eq!(protocol + affiliate, fee);
            assert_eq!(affiliate as u128, fee as u128 * bps as u128 / 10_000);
        }
    }

    #[test]
    fn split_edges_of_share_ratio() {
        let referrer = Some(key(7));
        assert_eq!(split_fee(1_000, referrer, 0).unwrap(), (1_000, 0));
        assert_eq!(split_fee(1_000, referrer, 10_000).unwrap(), (0, 1_000));
    }

    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    #[test]
    fn quote_small_profit_without_referrer() {
        // 20 USDC of profit, 1% fee -> 0.2 fee, 19.8 payout
        let quote = quote_profit_withdrawal(20 * USDC, &policy(20, 5_000), None).unwrap();
        assert_eq!(
            quote,
            ProfitWithdrawalQuote {
                gross: 20 * USDC,
                fee: 200_000,
                protocol_share: 200_000,
                affiliate_share: 0,
                net: 19_800_000,
            }
        );
    }

    #[test]
    fn quote_with_referrer_shares_fee_only() {
        let quote = quote_profit_withdrawal(20 * USDC, &policy(20, 2_500), Some(key(3))).unwrap();
        assert_eq!(quote.fee, 200_000);
        assert_eq!(quote.affiliate_share, 50_000);
        assert_eq!(quote.protocol_share, 150_000);
        assert_eq!(quote.net, 19_800_000);
        assert_eq!(quote.net + quote.fee, quote.gross);
    }

    #[test]
    fn quote_with_zero_cap_pays_everything_to_user() {
        let quote = quote_profit_withdrawal(5 * ONE as u64, &policy(0, 5_000), Some(key(3))).unwrap();
        assert_eq!(quote.fee, 0);
        assert_eq!(quote.affiliate_share, 0);
        assert_eq!(quote.net, quote.gross);
    }
}
