use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stage of a document composition, in pipeline order
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStage {
    Loading,
    Encoded,
    Complete,
}

/// Percentage reported once all pages are encoded into the temporary file.
pub const ENCODED_PERCENT: u8 = 90;
/// Share of the bar covered by decoding the input images.
pub const LOADING_SHARE: usize = 50;

/// Forwards percentages to an optional caller callback.
///
/// Reports are clamped to `0..=100` and never go backwards, so a caller can
/// bind the values straight to a progress bar.
pub struct ProgressReporter<'a> {
    sink: Option<&'a mut dyn FnMut(u8)>,
    last: Option<u8>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(sink: Option<&'a mut dyn FnMut(u8)>) -> Self {
        Self { sink, last: None }
    }

    /// Reports progress through the loading stage after `completed` of `total` images.
    pub fn loaded(&mut self, completed: usize, total: usize) {
        let percent = if total > 0 {
            (LOADING_SHARE * completed.min(total)) / total
        } else {
            0
        };
        self.report(ProgressStage::Loading, percent as u8);
    }

    pub fn encoded(&mut self) {
        self.report(ProgressStage::Encoded, ENCODED_PERCENT);
    }

    pub fn complete(&mut self) {
        self.report(ProgressStage::Complete, 100);
    }

    fn report(&mut self, stage: ProgressStage, percent: u8) {
        let percent = percent.min(100).max(self.last.unwrap_or(0));
        debug!("Progress {:?}: {}%", stage, percent);
        self.last = Some(percent);
        if let Some(sink) = self.sink.as_mut() {
            sink(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_is_scaled_into_first_half() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut reporter = ProgressReporter::new(Some(&mut sink));
        for i in 1..=3 {
            reporter.loaded(i, 3);
        }
        reporter.encoded();
        reporter.complete();
        drop(reporter);
        assert_eq!(seen, [16, 33, 50, 90, 100]);
    }

    #[test]
    fn reports_never_decrease() {
        let mut seen = Vec::new();
        let mut sink = |p: u8| seen.push(p);
        let mut reporter = ProgressReporter::new(Some(&mut sink));
        reporter.encoded();
        reporter.loaded(1, 2);
        drop(reporter);
        assert_eq!(seen, [90, 90]);
    }

    #[test]
    fn reporter_without_sink_still_clamps() {
        let mut reporter = ProgressReporter::new(None);
        reporter.loaded(1, 1);
        reporter.loaded(0, 1);
        assert_eq!(reporter.last, Some(50));
    }
}
