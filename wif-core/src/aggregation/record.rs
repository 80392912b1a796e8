use std::fmt;

use crate::error::{Result, WifError};

/// Unsigned integer usable as an aggregation record value.
pub trait AggregationValue: Copy + Eq + Default + fmt::Debug + fmt::Binary {
    const BITS: u32;

    fn wrapping_increment(self) -> Self;
    fn wrapping_decrement(self) -> Self;
    fn with_bit(self, index: u32) -> Self;
    fn without_bit(self, index: u32) -> Self;
    fn bit_at(self, index: u32) -> u8;
    fn and(self, other: Self) -> Self;
    fn or(self, other: Self) -> Self;
}

macro_rules! aggregation_value {
    ($($ty:ty),*) => {
        $(
            impl AggregationValue for $ty {
                const BITS: u32 = <$ty>::BITS;

                fn wrapping_increment(self) -> Self {
                    self.wrapping_add(1)
                }

                fn wrapping_decrement(self) -> Self {
                    self.wrapping_sub(1)
                }

                fn with_bit(self, index: u32) -> Self {
                    self | (1 << index)
                }

                fn without_bit(self, index: u32) -> Self {
                    self & !(1 << index)
                }

                fn bit_at(self, index: u32) -> u8 {
                    ((self >> index) & 1) as u8
                }

                fn and(self, other: Self) -> Self {
                    self & other
                }

                fn or(self, other: Self) -> Self {
                    self | other
                }
            }
        )*
    };
}

aggregation_value!(u8, u16, u32, u64);

/// A single integer used either as a counter or as a set of bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationRecord<T: AggregationValue> {
    value: T,
}

impl<T: AggregationValue> AggregationRecord<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn clear(&mut self) {
        self.value = T::default();
    }

    /// Add one, wrapping at the maximum.
    pub fn increase(&mut self) {
        self.value = self.value.wrapping_increment();
    }

    /// Subtract one, wrapping at zero.
    pub fn decrease(&mut self) {
        self.value = self.value.wrapping_decrement();
    }

    pub fn set_true(&mut self, index: u32) -> Result<()> {
        Self::check_index(index)?;
        self.value = self.value.with_bit(index);
        Ok(())
    }

    pub fn set_false(&mut self, index: u32) -> Result<()> {
        Self::check_index(index)?;
        self.value = self.value.without_bit(index);
        Ok(())
    }

    pub fn and_value(&mut self, value: T) {
        self.value = self.value.and(value);
    }

    pub fn or_value(&mut self, value: T) {
        self.value = self.value.or(value);
    }

    pub fn has_same_value(&self, other: &AggregationRecord<T>) -> bool {
        self.value == other.value
    }

    /// Bit at `index` (0 is the least significant), as 0 or 1.
    pub fn bit(&self, index: u32) -> Result<u8> {
        Self::check_index(index)?;
        Ok(self.value.bit_at(index))
    }

    /// Number of bits the record holds.
    pub const fn capacity() -> u32 {
        T::BITS
    }

    fn check_index(index: u32) -> Result<()> {
        if index >= T::BITS {
            return Err(WifError::InvalidArgument(format!(
                "bit index {} out of range for a {}-bit record",
                index,
                T::BITS
            )));
        }
        Ok(())
    }
}

impl<T: AggregationValue> fmt::Display for AggregationRecord<T> {
    /// Binary, most significant bit first, zero padded to the full width.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = T::BITS as usize)
    }
}
