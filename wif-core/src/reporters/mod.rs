//! Sinks for per-flow records emitted by classifiers.
//!
//! A record is a sequence of values framed by `on_record_start` and
//! `on_record_end`. Implementations decide how records are stored or sent.

pub mod jsonl;
pub mod recording;

use crate::error::Result;
use crate::storage::DataVariant;

pub use jsonl::JsonLinesReporter;
pub use recording::RecordingReporter;

pub trait Reporter: Send {
    fn on_record_start(&mut self) -> Result<()>;

    /// Append one value to the open record.
    fn report(&mut self, value: &DataVariant) -> Result<()>;

    fn on_record_end(&mut self) -> Result<()>;

    /// Push buffered records to their destination.
    fn flush(&mut self) -> Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn on_record_start(&mut self) -> Result<()> {
        (**self).on_record_start()
    }

    fn report(&mut self, value: &DataVariant) -> Result<()> {
        (**self).report(value)
    }

    fn on_record_end(&mut self) -> Result<()> {
        (**self).on_record_end()
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
