//! # Mathematical Functions
//!
//! Fixed-point helpers shared by accounting, fee accrual and ladder planning.

pub mod big_int;
pub mod safe_math;
pub mod tick_math;

// Re-export commonly used functions
pub use big_int::*;
pub use safe_math::*;
pub use tick_math::*;
