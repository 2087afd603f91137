use primitive_types::U256;

use crate::errors::{Error, Result};

/// `a * b / div` with a 256-bit intermediate, truncating toward zero.
///
/// Fails with [`Error::Overflow`] when `div` is zero or the quotient does
/// not fit back into a `u128`.
pub fn mul_div(a: u128, b: u128, div: u128) -> Result<u128> {
    if div == 0 {
        return Err(Error::Overflow);
    }

    let product = U256::from(a)
        .checked_mul(U256::from(b))
        .ok_or(Error::Overflow)?;
    let quotient = product / U256::from(div);

    if quotient > U256::from(u128::MAX) {
        return Err(Error::Overflow);
    }
    Ok(quotient.low_u128())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(mul_div(10, 300, 1_000), Ok(3));
        assert_eq!(mul_div(7, 1, 2), Ok(3));
    }

    #[test]
    fn survives_intermediate_beyond_u128() {
        let supply = 100_000_000u128 * 1_000_000_000_000_000_000;
        assert_eq!(mul_div(supply, 1_000_000_000_000_000_000, supply), Ok(1_000_000_000_000_000_000));
    }

    #[test]
    fn rejects_zero_divisor_and_oversized_quotient() {
        assert_eq!(mul_div(1, 1, 0), Err(Error::Overflow));
        assert_eq!(mul_div(u128::MAX, 2, 1), Err(Error::Overflow));
    }
}
