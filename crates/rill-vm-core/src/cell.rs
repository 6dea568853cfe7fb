//! Memory cell types
//!
//! A cell is any signed primitive integer. Arithmetic on cells wraps at the
//! type's width.

use std::fmt::{Debug, Display};

use num_traits::{PrimInt, Signed, WrappingAdd, WrappingSub};

/// A signed integer usable as a memory cell
pub trait Cell:
    PrimInt + Signed + WrappingAdd + WrappingSub + Debug + Display + Send + Sync + 'static
{
    /// Convert a raw input byte into a cell, wrapping like an `as` cast
    fn from_byte(byte: u8) -> Self;

    /// Truncate a cell to its low byte
    fn to_byte(self) -> u8;
}

macro_rules! impl_cell {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Cell for $ty {
                #[inline]
                fn from_byte(byte: u8) -> Self {
                    byte as $ty
                }

                #[inline]
                fn to_byte(self) -> u8 {
                    self as u8
                }
            }
        )*
    };
}

impl_cell!(i8, i16, i32, i64, i128, isize);

/// Default cell type
pub type DefaultCell = i32;
