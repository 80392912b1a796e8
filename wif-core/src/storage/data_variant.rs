//! Tagged value stored in a flow feature slot.

use serde::{Serialize, Serializer};

use crate::error::{Result, WifError};
use crate::storage::ip_address::IpAddress;

/// One feature value. `Unset` marks a slot nobody filled in.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataVariant {
    #[default]
    Unset,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Double(f64),
    String(String),
    Ip(IpAddress),
    DoubleVec(Vec<f64>),
}

impl DataVariant {
    /// Short name of the held variant, used in type mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataVariant::Unset => "unset",
            DataVariant::U8(_) => "u8",
            DataVariant::U16(_) => "u16",
            DataVariant::U32(_) => "u32",
            DataVariant::U64(_) => "u64",
            DataVariant::Double(_) => "double",
            DataVariant::String(_) => "string",
            DataVariant::Ip(_) => "ip",
            DataVariant::DoubleVec(_) => "double_vec",
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, DataVariant::Unset)
    }

    /// Numeric value widened to f64. Fails for non-numeric variants.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            DataVariant::U8(v) => Ok(f64::from(*v)),
            DataVariant::U16(v) => Ok(f64::from(*v)),
            DataVariant::U32(v) => Ok(f64::from(*v)),
            DataVariant::U64(v) => Ok(*v as f64),
            DataVariant::Double(v) => Ok(*v),
            other => Err(WifError::TypeMismatch {
                expected: "numeric",
                found: other.type_name(),
            }),
        }
    }
}

/// Types that can be read back out of a [`DataVariant`] by reference.
pub trait VariantType {
    const NAME: &'static str;

    fn from_variant(variant: &DataVariant) -> Option<&Self>;
}

macro_rules! variant_type {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl VariantType for $ty {
            const NAME: &'static str = $name;

            fn from_variant(variant: &DataVariant) -> Option<&Self> {
                match variant {
                    DataVariant::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }

        impl From<$ty> for DataVariant {
            fn from(value: $ty) -> Self {
                DataVariant::$variant(value)
            }
        }
    };
}

variant_type!(u8, U8, "u8");
variant_type!(u16, U16, "u16");
variant_type!(u32, U32, "u32");
variant_type!(u64, U64, "u64");
variant_type!(f64, Double, "double");
variant_type!(String, String, "string");
variant_type!(IpAddress, Ip, "ip");
variant_type!(Vec<f64>, DoubleVec, "double_vec");

impl From<&str> for DataVariant {
    fn from(value: &str) -> Self {
        DataVariant::String(value.to_string())
    }
}

impl Serialize for DataVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DataVariant::Unset => serializer.serialize_none(),
            DataVariant::U8(v) => serializer.serialize_u8(*v),
            DataVariant::U16(v) => serializer.serialize_u16(*v),
            DataVariant::U32(v) => serializer.serialize_u32(*v),
            DataVariant::U64(v) => serializer.serialize_u64(*v),
            DataVariant::Double(v) => serializer.serialize_f64(*v),
            DataVariant::String(v) => serializer.serialize_str(v),
            DataVariant::Ip(v) => v.serialize(serializer),
            DataVariant::DoubleVec(v) => v.serialize(serializer),
        }
    }
}
