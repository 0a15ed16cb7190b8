//! Cancellable filter pass over the unit directory
//!
//! A pass never scans anything when it is created. Each call to
//! [`FilterTask::step`] is one scheduling point: it evaluates up to
//! `batch_size` records, and once the directory is exhausted it yields one
//! more time before reporting completion.

use crate::data::filter::UnitPredicate;
use crate::data::units::{UnitDirectory, UnitRecord};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterPhase {
    Scanning { cursor: usize },
    Draining,
    Done,
    Cancelled,
}

/// What one scheduling step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStep {
    /// Records were scanned; the pass continues on the next step
    Scanned { processed: usize, matched: usize },
    /// The pass completed with this many matches
    Finished { matched: usize },
    /// The pass already finished or was cancelled
    Idle,
}

pub struct FilterTask {
    directory: Arc<UnitDirectory>,
    predicate: Box<dyn UnitPredicate>,
    batch_size: usize,
    phase: FilterPhase,
    matched: usize,
}

impl FilterTask {
    pub fn new(
        directory: Arc<UnitDirectory>,
        predicate: Box<dyn UnitPredicate>,
        batch_size: usize,
    ) -> Self {
        Self {
            directory,
            predicate,
            batch_size: batch_size.max(1),
            phase: FilterPhase::Scanning { cursor: 0 },
            matched: 0,
        }
    }

    /// Still has work to do
    pub fn is_running(&self) -> bool {
        matches!(
            self.phase,
            FilterPhase::Scanning { .. } | FilterPhase::Draining
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.phase == FilterPhase::Cancelled
    }

    /// Records scanned so far
    pub fn progress(&self) -> usize {
        match self.phase {
            FilterPhase::Scanning { cursor } => cursor,
            _ => self.directory.len(),
        }
    }

    pub fn matched(&self) -> usize {
        self.matched
    }

    /// Stop the pass; returns true if it was still running
    pub fn cancel(&mut self) -> bool {
        let interrupted = self.is_running();
        if interrupted {
            self.phase = FilterPhase::Cancelled;
        }
        interrupted
    }

    /// Advance the pass by one scheduling point, calling `on_match` for
    /// every record the predicate accepts
    pub fn step(&mut self, mut on_match: impl FnMut(&UnitRecord)) -> FilterStep {
        match self.phase {
            FilterPhase::Scanning { cursor } => {
                let end = (cursor + self.batch_size).min(self.directory.len());
                let mut matched = 0;

                for record in &self.directory.records()[cursor..end] {
                    if self.predicate.matches(record) {
                        on_match(record);
                        matched += 1;
                    }
                }
                self.matched += matched;

                self.phase = if end >= self.directory.len() {
                    FilterPhase::Draining
                } else {
                    FilterPhase::Scanning { cursor: end }
                };

                FilterStep::Scanned {
                    processed: end - cursor,
                    matched,
                }
            }
            FilterPhase::Draining => {
                self.phase = FilterPhase::Done;
                FilterStep::Finished {
                    matched: self.matched,
                }
            }
            FilterPhase::Done | FilterPhase::Cancelled => FilterStep::Idle,
        }
    }
}

impl std::fmt::Debug for FilterTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterTask")
            .field("phase", &self.phase)
            .field("batch_size", &self.batch_size)
            .field("matched", &self.matched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(count: i32) -> Arc<UnitDirectory> {
        let records = (0..count)
            .map(|i| UnitRecord::new(format!("P-{i}"), format!("T{i}"), i))
            .collect();
        Arc::new(UnitDirectory::new(records).unwrap())
    }

    fn even_floors() -> Box<dyn UnitPredicate> {
        Box::new(|record: &UnitRecord| record.floor % 2 == 0)
    }

    #[test]
    fn test_scan_in_batches_then_drain() {
        let mut task = FilterTask::new(directory(5), even_floors(), 2);
        let mut seen = Vec::new();

        assert_eq!(
            task.step(|r| seen.push(r.floor)),
            FilterStep::Scanned { processed: 2, matched: 1 }
        );
        assert_eq!(
            task.step(|r| seen.push(r.floor)),
            FilterStep::Scanned { processed: 2, matched: 1 }
        );
        assert_eq!(
            task.step(|r| seen.push(r.floor)),
            FilterStep::Scanned { processed: 1, matched: 1 }
        );
        assert!(task.is_running());
        assert_eq!(task.step(|_| {}), FilterStep::Finished { matched: 3 });
        assert!(!task.is_running());
        assert_eq!(task.step(|_| {}), FilterStep::Idle);

        assert_eq!(seen, vec![0, 2, 4]);
    }

    #[test]
    fn test_cancel_reports_interruption_once() {
        let mut task = FilterTask::new(directory(10), even_floors(), 3);
        task.step(|_| {});
        assert_eq!(task.progress(), 3);

        assert!(task.cancel());
        assert!(task.is_cancelled());
        assert!(!task.cancel());
        assert_eq!(task.step(|_| panic!("cancelled pass must not scan")), FilterStep::Idle);
    }

    #[test]
    fn test_finished_task_is_not_interrupted_by_cancel() {
        let mut task = FilterTask::new(directory(1), even_floors(), 8);
        task.step(|_| {});
        task.step(|_| {});
        assert!(!task.cancel());
    }

    #[test]
    fn test_empty_directory_still_yields_once() {
        let mut task = FilterTask::new(directory(0), even_floors(), 0);
        assert_eq!(task.step(|_| {}), FilterStep::Scanned { processed: 0, matched: 0 });
        assert_eq!(task.step(|_| {}), FilterStep::Finished { matched: 0 });
    }
}
