//! Distributed coordinator.
//!
//! Owns the listening socket, the per-worker channels, and the step
//! barrier. One receiver thread per worker pumps its channel and reports
//! STEP_COMPLETE / SYNC_RESPONSE arrivals; the driver thread broadcasts
//! STEP frames and blocks on the barrier. A worker that dies mid-step
//! simply never reports, and the barrier timeout surfaces the failure to
//! the driver, which decides whether to continue.

use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{info, warn};

use crate::barrier::StepBarrier;
use crate::envelope::{
    parse_payload, Envelope, InitPayload, MessageType, NetError, StepPayload, SyncPayload,
};

pub struct Coordinator {
    writers: Vec<UnixStream>,
    barrier: Arc<StepBarrier>,
    sync_barrier: Arc<StepBarrier>,
    sync_slots: Arc<Mutex<Vec<Option<SyncPayload>>>>,
    receivers: Vec<JoinHandle<()>>,
}

impl Coordinator {
    /// Bind the socket, accept `assignments.len()` workers, and run the
    /// INIT handshake with each: READY in, INIT out, READY ack in.
    /// Workers are indexed by connection order.
    pub fn start(socket_path: &Path, assignments: &[Vec<String>]) -> Result<Self, NetError> {
        let worker_count = assignments.len();
        // A stale socket file from a previous run blocks bind.
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path)?;
        info!(path = %socket_path.display(), workers = worker_count, "coordinator listening");

        let barrier = Arc::new(StepBarrier::new(worker_count));
        let sync_barrier = Arc::new(StepBarrier::new(worker_count));
        let sync_slots = Arc::new(Mutex::new(vec![None; worker_count]));

        let mut writers = Vec::with_capacity(worker_count);
        let mut receivers = Vec::with_capacity(worker_count);

        for (k, assignment) in assignments.iter().enumerate() {
            let (mut stream, _addr) = listener.accept()?;

            // READY → INIT → READY ack.
            let hello = Envelope::read_from(&mut stream)?;
            if hello.msg_type != MessageType::Ready {
                warn!(worker = k, got = ?hello.msg_type, "expected READY");
            }
            let payload = serde_json::to_string(&InitPayload {
                entities: assignment.clone(),
            })
            .unwrap_or_default();
            Envelope::new(MessageType::Init, payload, 0.0).write_to(&mut stream)?;
            let ack = Envelope::read_from(&mut stream)?;
            if ack.msg_type != MessageType::Ready {
                warn!(worker = k, got = ?ack.msg_type, "expected READY ack");
            }
            info!(worker = k, entities = assignment.len(), "worker initialized");

            let reader = stream.try_clone()?;
            receivers.push(spawn_receiver(
                k,
                reader,
                Arc::clone(&barrier),
                Arc::clone(&sync_barrier),
                Arc::clone(&sync_slots),
            ));
            writers.push(stream);
        }

        Ok(Self {
            writers,
            barrier,
            sync_barrier,
            sync_slots,
            receivers,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.writers.len()
    }

    /// Broadcast one STEP and block on the barrier. Returns true when all
    /// workers completed within the timeout.
    pub fn step(&mut self, dt: f64, time: f64, timeout: Duration) -> Result<bool, NetError> {
        self.barrier.reset();
        let payload = serde_json::to_string(&StepPayload { dt, time }).unwrap_or_default();
        for writer in &mut self.writers {
            Envelope::new(MessageType::Step, payload.clone(), time).write_to(writer)?;
        }
        let all_done = self.barrier.wait_for_all(timeout);
        Ok(all_done && self.barrier.all_succeeded())
    }

    /// Broadcast SYNC_REQUEST and gather the per-worker state payloads.
    /// Slots for workers that missed the deadline are None.
    pub fn sync(
        &mut self,
        time: f64,
        timeout: Duration,
    ) -> Result<Vec<Option<SyncPayload>>, NetError> {
        self.sync_barrier.reset();
        {
            let mut slots = self
                .sync_slots
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            slots.iter_mut().for_each(|s| *s = None);
        }
        for writer in &mut self.writers {
            Envelope::new(MessageType::SyncRequest, "", time).write_to(writer)?;
        }
        if !self.sync_barrier.wait_for_all(timeout) {
            warn!("sync timed out waiting for workers");
        }
        let slots = self
            .sync_slots
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        Ok(slots.clone())
    }

    /// Send SHUTDOWN to every worker and join the receiver threads.
    pub fn shutdown(mut self, time: f64) {
        for writer in &mut self.writers {
            if let Err(err) = Envelope::new(MessageType::Shutdown, "", time).write_to(writer) {
                warn!(%err, "shutdown send failed");
            }
        }
        // Closing the write halves unblocks the receivers on EOF.
        drop(self.writers);
        for handle in self.receivers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn spawn_receiver(
    k: usize,
    mut reader: UnixStream,
    barrier: Arc<StepBarrier>,
    sync_barrier: Arc<StepBarrier>,
    sync_slots: Arc<Mutex<Vec<Option<SyncPayload>>>>,
) -> JoinHandle<()> {
    std::thread::spawn(move || loop {
        match Envelope::read_from(&mut reader) {
            Ok(envelope) => match envelope.msg_type {
                MessageType::StepComplete => barrier.worker_done(k, true),
                MessageType::SyncResponse => {
                    let payload: SyncPayload = parse_payload(&envelope.payload);
                    {
                        let mut slots = sync_slots.lock().unwrap_or_else(|e| e.into_inner());
                        if let Some(slot) = slots.get_mut(k) {
                            *slot = Some(payload);
                        }
                    }
                    sync_barrier.worker_done(k, true);
                }
                _ => {}
            },
            Err(_) => {
                // Channel torn down: the worker is gone. The barrier
                // times out on its own; nothing to report here.
                break;
            }
        }
    })
}

/// Deal entity ids across N workers round-robin.
pub fn partition_round_robin(ids: &[String], workers: usize) -> Vec<Vec<String>> {
    let mut assignments = vec![Vec::new(); workers.max(1)];
    for (i, id) in ids.iter().enumerate() {
        assignments[i % workers.max(1)].push(id.clone());
    }
    assignments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_deals_evenly() {
        let ids: Vec<String> = (0..7).map(|i| format!("e{i}")).collect();
        let parts = partition_round_robin(&ids, 3);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], vec!["e0", "e3", "e6"]);
        assert_eq!(parts[1], vec!["e1", "e4"]);
        assert_eq!(parts[2], vec!["e2", "e5"]);
    }

    #[test]
    fn round_robin_handles_zero_workers() {
        let ids = vec!["a".to_string()];
        let parts = partition_round_robin(&ids, 0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], vec!["a"]);
    }
}
