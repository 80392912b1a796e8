//! Per-flow feature record.

use crate::error::{Result, WifError};
use crate::storage::data_variant::{DataVariant, VariantType};

/// Identifier of a feature slot inside [`FlowFeatures`].
pub type FeatureId = u16;

/// Fixed-size record of feature values, indexed by [`FeatureId`].
///
/// The size is chosen at construction and never changes. Slots start out
/// as [`DataVariant::Unset`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowFeatures {
    values: Vec<DataVariant>,
}

impl FlowFeatures {
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![DataVariant::Unset; size],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Store a value, replacing whatever the slot held.
    pub fn set(&mut self, id: FeatureId, value: impl Into<DataVariant>) -> Result<()> {
        let size = self.values.len();
        let slot = self
            .values
            .get_mut(usize::from(id))
            .ok_or(WifError::FeatureOutOfRange {
                id: usize::from(id),
                size,
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Typed read. Fails if the slot holds a different variant (including unset).
    pub fn get<T: VariantType>(&self, id: FeatureId) -> Result<&T> {
        let value = self.get_raw(id)?;
        T::from_variant(value).ok_or(WifError::TypeMismatch {
            expected: T::NAME,
            found: value.type_name(),
        })
    }

    /// Untyped read of a slot.
    pub fn get_raw(&self, id: FeatureId) -> Result<&DataVariant> {
        self.values
            .get(usize::from(id))
            .ok_or(WifError::FeatureOutOfRange {
                id: usize::from(id),
                size: self.values.len(),
            })
    }

    /// Reset every slot to unset, keeping the size.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = DataVariant::Unset);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataVariant> {
        self.values.iter()
    }
}
