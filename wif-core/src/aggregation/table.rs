use super::record::{AggregationRecord, AggregationValue};

/// Fixed number of [`AggregationRecord`]s addressed by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationTable<T: AggregationValue> {
    records: Vec<AggregationRecord<T>>,
}

impl<T: AggregationValue> AggregationTable<T> {
    /// Table of `size` zeroed records.
    pub fn new(size: usize) -> Self {
        Self {
            records: vec![AggregationRecord::default(); size],
        }
    }

    pub fn get(&self, index: usize) -> Option<&AggregationRecord<T>> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut AggregationRecord<T>> {
        self.records.get_mut(index)
    }

    /// Zero every record.
    pub fn clear(&mut self) {
        self.records.iter_mut().for_each(AggregationRecord::clear);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregationRecord<T>> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_is_zeroed() {
        let table = AggregationTable::<u32>::new(4);
        assert_eq!(table.len(), 4);
        assert!(table.iter().all(|r| r.value() == 0));
    }

    #[test]
    fn test_get_mut_updates_single_record() {
        let mut table = AggregationTable::<u8>::new(3);
        table.get_mut(1).expect("record").increase();
        table.get_mut(1).expect("record").set_true(4).expect("bit");

        assert_eq!(table.get(0).expect("record").value(), 0);
        assert_eq!(table.get(1).expect("record").value(), 0b1_0001);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut table = AggregationTable::<u16>::new(2);
        assert!(table.get(2).is_none());
        assert!(table.get_mut(5).is_none());
    }

    #[test]
    fn test_clear_keeps_size() {
        let mut table = AggregationTable::<u64>::new(2);
        table.get_mut(0).expect("record").or_value(0xFF);
        table.clear();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).expect("record").value(), 0);
    }

    #[test]
    fn test_empty_table() {
        let table = AggregationTable::<u8>::new(0);
        assert!(table.is_empty());
    }
}
