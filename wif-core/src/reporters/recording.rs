//! In-memory reporter.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Reporter;
use crate::error::{Result, WifError};
use crate::storage::DataVariant;

#[derive(Debug, Default)]
struct Recorded {
    records: Vec<Vec<DataVariant>>,
    open: Option<Vec<DataVariant>>,
    flushes: usize,
}

/// Keeps every finished record in memory.
/// Cloning creates a new handle to the same records.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    inner: Arc<RwLock<Recorded>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Recorded>> {
        self.inner
            .read()
            .map_err(|_| WifError::InvalidState("recording reporter lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Recorded>> {
        self.inner
            .write()
            .map_err(|_| WifError::InvalidState("recording reporter lock poisoned".to_string()))
    }

    /// Finished records, oldest first.
    pub fn records(&self) -> Result<Vec<Vec<DataVariant>>> {
        Ok(self.read()?.records.clone())
    }

    pub fn flush_count(&self) -> Result<usize> {
        Ok(self.read()?.flushes)
    }
}

impl Reporter for RecordingReporter {
    fn on_record_start(&mut self) -> Result<()> {
        let mut inner = self.write()?;
        if inner.open.is_some() {
            return Err(WifError::Report("record already open".to_string()));
        }
        inner.open = Some(Vec::new());
        Ok(())
    }

    fn report(&mut self, value: &DataVariant) -> Result<()> {
        self.write()?
            .open
            .as_mut()
            .ok_or_else(|| WifError::Report("no open record".to_string()))?
            .push(value.clone());
        Ok(())
    }

    fn on_record_end(&mut self) -> Result<()> {
        let mut inner = self.write()?;
        let record = inner
            .open
            .take()
            .ok_or_else(|| WifError::Report("no open record".to_string()))?;
        inner.records.push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.write()?.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut reporter = RecordingReporter::new();
        for i in 0..2u8 {
            reporter.on_record_start().expect("start");
            reporter.report(&DataVariant::U8(i)).expect("report");
            reporter.report(&DataVariant::from("x")).expect("report");
            reporter.on_record_end().expect("end");
        }

        let records = reporter.records().expect("records");
        assert_eq!(
            records,
            vec![
                vec![DataVariant::U8(0), DataVariant::from("x")],
                vec![DataVariant::U8(1), DataVariant::from("x")],
            ]
        );
    }

    #[test]
    fn test_clone_shares_records() {
        let reporter = RecordingReporter::new();
        let mut handle = reporter.clone();
        handle.on_record_start().expect("start");
        handle.on_record_end().expect("end");
        assert_eq!(reporter.records().expect("records").len(), 1);
    }

    #[test]
    fn test_unfinished_record_not_visible() {
        let mut reporter = RecordingReporter::new();
        reporter.on_record_start().expect("start");
        reporter.report(&DataVariant::U64(1)).expect("report");
        assert!(reporter.records().expect("records").is_empty());
    }

    #[test]
    fn test_framing_errors() {
        let mut reporter = RecordingReporter::new();
        assert!(matches!(reporter.report(&DataVariant::Unset), Err(WifError::Report(_))));
        assert!(matches!(reporter.on_record_end(), Err(WifError::Report(_))));
        reporter.on_record_start().expect("start");
        assert!(matches!(reporter.on_record_start(), Err(WifError::Report(_))));
    }

    #[test]
    fn test_flush_counted() {
        let mut reporter = RecordingReporter::new();
        reporter.flush().expect("flush");
        reporter.flush().expect("flush");
        assert_eq!(reporter.flush_count().expect("count"), 2);
    }
}
