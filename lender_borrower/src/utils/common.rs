//! Common utility and helper functions that are used across the project

use alloy_primitives::U256;
use candid::Nat;
use num_bigint::BigUint;

use super::error::*;
use crate::constants::max_bps;

/// Converts values of type `U256` to `Nat`
pub fn u256_to_nat(value: &U256) -> ManagerResult<Nat> {
    Ok(Nat(BigUint::from_bytes_be(&value.to_be_bytes::<32>())))
}

/// Returns `a * b / denominator`, rounded down.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> ManagerResult<U256> {
    a.checked_mul(b)
        .ok_or_else(|| arithmetic_err("Multiplication overflowed."))?
        .checked_div(denominator)
        .ok_or_else(|| arithmetic_err("Denominator was zero."))
}

/// Returns `a * b / denominator`, rounded up.
pub fn mul_div_up(a: U256, b: U256, denominator: U256) -> ManagerResult<U256> {
    if denominator.is_zero() {
        return Err(arithmetic_err("Denominator was zero."));
    }
    let product = a
        .checked_mul(b)
        .ok_or_else(|| arithmetic_err("Multiplication overflowed."))?;
    let quotient = product / denominator;
    if (product % denominator).is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::from(1))
    }
}

/// Applies a basis points ratio to `amount`, rounded down.
pub fn apply_bps(amount: U256, bps: u64) -> ManagerResult<U256> {
    mul_div(amount, U256::from(bps), max_bps())
}
