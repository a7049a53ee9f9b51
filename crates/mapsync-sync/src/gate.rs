use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::{Result, SyncError};

/// Number of files reconciled at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Bounds how many reconciliations are in flight, and records the high-water mark.
///
/// One gate is built per batch call and borrowed by every task of that batch.
#[derive(Debug)]
pub struct AdmissionGate {
    permits:   Semaphore,
    capacity:  usize,
    in_flight: AtomicUsize,
    peak:      AtomicUsize,
}

/// Held while a task runs; dropping it frees the slot.
pub struct Admission<'a> {
    gate:    &'a AdmissionGate,
    _permit: SemaphorePermit<'a>,
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Wait for a free slot.
    pub async fn admit(&self) -> Result<Admission<'_>> {
        let permit = self.permits.acquire().await.map_err(|_| SyncError::GateClosed)?;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        Ok(Admission {
            gate:    self,
            _permit: permit,
        })
    }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn in_flight(&self) -> usize { self.in_flight.load(Ordering::SeqCst) }

    /// Most tasks ever admitted at the same time.
    pub fn peak(&self) -> usize { self.peak.load(Ordering::SeqCst) }
}

impl Default for AdmissionGate {
    fn default() -> Self { Self::new(DEFAULT_CONCURRENCY) }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) { self.gate.in_flight.fetch_sub(1, Ordering::SeqCst); }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admission_counts() {
        let gate = AdmissionGate::new(2);
        let a = gate.admit().await.unwrap();
        let b = gate.admit().await.unwrap();
        assert_eq!(gate.in_flight(), 2);
        drop(a);
        assert_eq!(gate.in_flight(), 1);
        let c = gate.admit().await.unwrap();
        drop(b);
        drop(c);
        assert_eq!(gate.in_flight(), 0);
        assert_eq!(gate.peak(), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        assert_eq!(AdmissionGate::new(0).capacity(), 1);
        assert_eq!(AdmissionGate::default().capacity(), DEFAULT_CONCURRENCY);
    }

    #[tokio::test]
    async fn test_full_gate_blocks() {
        let gate = AdmissionGate::new(1);
        let held = gate.admit().await.unwrap();
        let waiting = tokio::time::timeout(std::time::Duration::from_millis(20), gate.admit()).await;
        assert!(waiting.is_err());
        drop(held);
        assert!(gate.admit().await.is_ok());
    }
}
