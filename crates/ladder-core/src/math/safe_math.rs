//! # Safe Math Operations
//!
//! Overflow-checked arithmetic returning vault errors.

use crate::error::{VaultError, VaultResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        pub fn $fn_name(a: $type, b: $type) -> VaultResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };
}

safe_arith!(safe_add_u128, u128, checked_add, VaultError::MathOverflow);
safe_arith!(safe_sub_u128, u128, checked_sub, VaultError::MathUnderflow);
safe_arith!(safe_mul_u128, u128, checked_mul, VaultError::MathOverflow);

safe_arith!(safe_add_i64, i64, checked_add, VaultError::MathOverflow);
safe_arith!(safe_mul_i64, i64, checked_mul, VaultError::MathOverflow);

/// 10^exp as u128
pub fn pow10(exp: u8) -> VaultResult<u128> {
    10u128.checked_pow(exp as u32).ok_or(VaultError::MathOverflow)
}
