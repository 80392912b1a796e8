//! JSON Lines reporter: one JSON array per record.

use std::io::Write;

use tracing::debug;

use super::Reporter;
use crate::error::{Result, WifError};
use crate::storage::DataVariant;

/// Writes each finished record as a JSON array on its own line.
#[derive(Debug)]
pub struct JsonLinesReporter<W: Write + Send> {
    writer: W,
    open: Option<Vec<DataVariant>>,
    written: u64,
}

impl<W: Write + Send> JsonLinesReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            open: None,
            written: 0,
        }
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Reporter for JsonLinesReporter<W> {
    fn on_record_start(&mut self) -> Result<()> {
        if self.open.is_some() {
            return Err(WifError::Report("record already open".to_string()));
        }
        self.open = Some(Vec::new());
        Ok(())
    }

    fn report(&mut self, value: &DataVariant) -> Result<()> {
        self.open
            .as_mut()
            .ok_or_else(|| WifError::Report("no open record".to_string()))?
            .push(value.clone());
        Ok(())
    }

    fn on_record_end(&mut self) -> Result<()> {
        let record = self
            .open
            .take()
            .ok_or_else(|| WifError::Report("no open record".to_string()))?;
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        debug!(records = self.written, "reporter flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::IpAddress;

    fn written(reporter: JsonLinesReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).expect("utf8")
    }

    #[test]
    fn test_one_line_per_record() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        let ip: IpAddress = "192.0.2.1".parse().expect("ip");

        reporter.on_record_start().expect("start");
        reporter.report(&DataVariant::Ip(ip)).expect("report");
        reporter.report(&DataVariant::U64(1700000000)).expect("report");
        reporter.report(&DataVariant::DoubleVec(vec![0.25, 0.75])).expect("report");
        reporter.on_record_end().expect("end");

        reporter.on_record_start().expect("start");
        reporter.report(&DataVariant::Unset).expect("report");
        reporter.on_record_end().expect("end");

        assert_eq!(reporter.records_written(), 2);
        assert_eq!(
            written(reporter),
            "[\"192.0.2.1\",1700000000,[0.25,0.75]]\n[null]\n"
        );
    }

    #[test]
    fn test_empty_record() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        reporter.on_record_start().expect("start");
        reporter.on_record_end().expect("end");
        assert_eq!(written(reporter), "[]\n");
    }

    #[test]
    fn test_framing_errors() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        assert!(matches!(reporter.report(&DataVariant::U8(1)), Err(WifError::Report(_))));
        assert!(matches!(reporter.on_record_end(), Err(WifError::Report(_))));
        reporter.on_record_start().expect("start");
        assert!(matches!(reporter.on_record_start(), Err(WifError::Report(_))));
    }

    #[test]
    fn test_flush() {
        let mut reporter = JsonLinesReporter::new(Vec::new());
        reporter.flush().expect("flush");
        assert!(written(reporter).is_empty());
    }
}
