use anchor_lang::prelude::*;

use crate::constants::MANTISSA_SCALE;
use crate::errors::PrizePoolError;

/// `amount × mantissa / 1e18`, rounded down.
pub fn mul_mantissa(amount: u64, mantissa: u128) -> Result<u64> {
    let scaled = (amount as u128)
        .checked_mul(mantissa)
        .ok_or(PrizePoolError::MathOverflow)?
        / MANTISSA_SCALE;
    u64::try_from(scaled).map_err(|_| error!(PrizePoolError::MathOverflow))
}

/// Most credit a balance may hold: enough to cover the exit fee on all of it.
pub fn credit_limit(balance: u64, exit_fee_mantissa: u128) -> Result<u64> {
    mul_mantissa(balance, exit_fee_mantissa)
}

/// `amount × rate × seconds / 1e18`. Saturates instead of failing: credit is
/// clamped to `credit_limit` afterwards and interest estimates are advisory.
pub fn rate_over_time(amount: u64, rate_per_second_mantissa: u128, elapsed: u64) -> u64 {
    (amount as u128)
        .checked_mul(rate_per_second_mantissa)
        .and_then(|v| v.checked_mul(elapsed as u128))
        .map(|v| v / MANTISSA_SCALE)
        .map(|v| u64::try_from(v).unwrap_or(u64::MAX))
        .unwrap_or(u64::MAX)
}

/// Seconds `balance` needs to accrue `interest` worth of credit.
///
/// Returns `u64::MAX` when nothing can ever accrue (zero balance or rate) and
/// the target is non-zero.
pub fn estimate_credit_accrual_time(balance: u64, interest: u64, credit_rate_mantissa: u128) -> u64 {
    if interest == 0 {
        return 0;
    }
    let per_second_scaled = (balance as u128).saturating_mul(credit_rate_mantissa);
    if per_second_scaled == 0 {
        return u64::MAX;
    }
    let seconds = (interest as u128) * MANTISSA_SCALE / per_second_scaled;
    u64::try_from(seconds).unwrap_or(u64::MAX)
}

/// Splits interest into (prize, reserve) under the given reserve rate.
pub fn split_reserve(interest: u64, reserve_rate_mantissa: u128) -> Result<(u64, u64)> {
    let reserve = mul_mantissa(interest, reserve_rate_mantissa)?;
    Ok((interest - reserve, reserve))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u64 = 1_000_000_000;
    const TENTH: u128 = MANTISSA_SCALE / 10;

    #[test]
    fn test_mul_mantissa_rounds_down() {
        assert_eq!(mul_mantissa(50 * ONE, TENTH).unwrap(), 5 * ONE);
        assert_eq!(mul_mantissa(9, TENTH).unwrap(), 0);
        assert_eq!(mul_mantissa(u64::MAX, MANTISSA_SCALE).unwrap(), u64::MAX);
    }

    #[test]
    fn test_reserve_split() {
        assert_eq!(split_reserve(100, 0).unwrap(), (100, 0));
        assert_eq!(split_reserve(100, TENTH).unwrap(), (90, 10));
    }

    #[test]
    fn test_accrued_credit_over_one_period() {
        // exit fee 0.1 spread across a 1000 second period
        let rate = TENTH / 1000;
        assert_eq!(rate_over_time(10 * ONE, rate, 1000), ONE);
        assert_eq!(rate_over_time(10 * ONE, rate, 0), 0);
        assert_eq!(rate_over_time(u64::MAX, MANTISSA_SCALE, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_estimate_credit_accrual_time_scales_linearly() {
        let rate = TENTH / 1000;
        assert_eq!(estimate_credit_accrual_time(100 * ONE, 10 * ONE, rate), 1000);
        assert_eq!(estimate_credit_accrual_time(100 * ONE, 30 * ONE, rate), 3000);
        assert_eq!(estimate_credit_accrual_time(100 * ONE, 0, rate), 0);
        assert_eq!(estimate_credit_accrual_time(0, 10 * ONE, rate), u64::MAX);
        assert_eq!(estimate_credit_accrual_time(100 * ONE, 10 * ONE, 0), u64::MAX);
    }
}
