//! In-memory doubles for the store, clock, random source and file reader.

use std::collections::HashSet;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::task::{Context, Poll};

use async_trait::async_trait;
use chrono::TimeZone;
use tokio::io::{AsyncRead, ReadBuf};

use crate::store::{NewEvidence, NewReport, NewStatusEntry, ReportStore, StoreError};
use crate::tracking_code::RandomSource;
use crate::types::{Clock, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    FindByCode(String),
    InsertReport(NewReport),
    DeleteReport(DbId),
    InsertEvidence(NewEvidence),
    InsertStatusHistory(NewStatusEntry),
}

/// Which store operations fail, and with what message.
#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub every_code_taken: bool,
    pub lookup: Option<&'static str>,
    pub report: Option<&'static str>,
    pub evidence: Option<&'static str>,
    pub history: Option<&'static str>,
    pub delete: Option<&'static str>,
}

/// Store double that records every call in order.
#[derive(Default)]
pub struct RecordingStore {
    failures: Failures,
    taken_codes: Mutex<HashSet<String>>,
    calls: Mutex<Vec<StoreCall>>,
    last_id: AtomicI64,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: Failures) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    pub fn with_taken_codes(codes: &[&str]) -> Self {
        let store = Self::default();
        store
            .taken_codes
            .lock()
            .unwrap()
            .extend(codes.iter().map(|c| c.to_string()));
        store
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::FindByCode(_)))
            .count()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self) -> DbId {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn fail_with(message: Option<&'static str>) -> Result<(), StoreError> {
    match message {
        Some(msg) => Err(StoreError::new(msg)),
        None => Ok(()),
    }
}

#[async_trait]
impl ReportStore for RecordingStore {
    async fn find_report_by_code(&self, unique_code: &str) -> Result<Option<DbId>, StoreError> {
        self.record(StoreCall::FindByCode(unique_code.to_string()));
        fail_with(self.failures.lookup)?;
        let taken = self.failures.every_code_taken
            || self.taken_codes.lock().unwrap().contains(unique_code);
        Ok(taken.then_some(1))
    }

    async fn insert_report(&self, report: &NewReport) -> Result<DbId, StoreError> {
        self.record(StoreCall::InsertReport(report.clone()));
        fail_with(self.failures.report)?;
        self.taken_codes
            .lock()
            .unwrap()
            .insert(report.unique_code.clone());
        Ok(self.next_id())
    }

    async fn delete_report(&self, id: DbId) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteReport(id));
        fail_with(self.failures.delete)
    }

    async fn insert_evidence(&self, evidence: &NewEvidence) -> Result<DbId, StoreError> {
        self.record(StoreCall::InsertEvidence(evidence.clone()));
        fail_with(self.failures.evidence)?;
        Ok(self.next_id())
    }

    async fn insert_status_history(&self, entry: &NewStatusEntry) -> Result<DbId, StoreError> {
        self.record(StoreCall::InsertStatusHistory(entry.clone()));
        fail_with(self.failures.history)?;
        Ok(self.next_id())
    }
}

// ---------------------------------------------------------------------------
// Clock and randomness
// ---------------------------------------------------------------------------

pub struct FixedClock(pub Timestamp);

impl Default for FixedClock {
    fn default() -> Self {
        Self(chrono::Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Replays a fixed list of picks, wrapping around when exhausted.
pub struct SequenceRandom {
    picks: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self {
            picks,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn pick(&self, bound: usize) -> usize {
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.picks[i % self.picks.len()] % bound
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// A reader whose first read fails.
pub struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("device unplugged")))
    }
}

/// Bytes that start and end like a JPEG, padded to `len`.
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(len.saturating_sub(2), 0x42);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}
