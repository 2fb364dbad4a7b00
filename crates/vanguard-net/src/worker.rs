//! Distributed worker.
//!
//! Connects to the coordinator over a path-addressed Unix socket, takes
//! ownership of its assigned entity subset, and steps them through a
//! pluggable per-entity update on every STEP. An update failure breaks
//! the loop and closes the channel; the coordinator observes the silence
//! as a barrier timeout.

use std::os::unix::net::UnixStream;
use std::path::Path;

use tracing::{debug, info};

use vanguard_core::enums::PhysicsKind;
use vanguard_core::Entity;

use crate::envelope::{
    parse_payload, Envelope, InitPayload, MessageType, NetError, StepPayload, SyncEntry,
    SyncPayload,
};

/// Per-entity update: (entity, dt, time). An error tears the worker down.
pub type UpdateFn<'a> = dyn FnMut(&mut Entity, f64, f64) -> Result<(), String> + 'a;

/// Run the worker protocol to completion (SHUTDOWN or error).
///
/// `pool` holds every entity this process can simulate; INIT selects the
/// assigned subset by id, in assignment order.
pub fn run(
    socket_path: &Path,
    mut pool: Vec<Entity>,
    update: &mut UpdateFn<'_>,
) -> Result<(), NetError> {
    let mut stream = UnixStream::connect(socket_path)?;
    info!(path = %socket_path.display(), "worker connected");
    Envelope::new(MessageType::Ready, "", 0.0).write_to(&mut stream)?;

    // Wait for the assignment.
    let init = loop {
        let envelope = Envelope::read_from(&mut stream)?;
        match envelope.msg_type {
            MessageType::Init => break envelope,
            MessageType::Shutdown => return Ok(()),
            _ => continue,
        }
    };
    let assignment: InitPayload = parse_payload(&init.payload);
    let mut entities = select_assigned(&mut pool, &assignment.entities);
    info!(assigned = entities.len(), "worker initialized");
    Envelope::new(MessageType::Ready, "", init.timestamp).write_to(&mut stream)?;

    let mut sim_time = 0.0;
    loop {
        let envelope = Envelope::read_from(&mut stream)?;
        match envelope.msg_type {
            MessageType::Step => {
                let step: StepPayload = parse_payload(&envelope.payload);
                for entity in &mut entities {
                    update(entity, step.dt, step.time)
                        .map_err(NetError::Update)?;
                }
                sim_time = step.time + step.dt;
                Envelope::new(MessageType::StepComplete, "", sim_time).write_to(&mut stream)?;
            }
            MessageType::SyncRequest => {
                let payload = SyncPayload {
                    entities: entities.iter().map(|e| sync_entry(e, sim_time)).collect(),
                };
                let json = serde_json::to_string(&payload).unwrap_or_default();
                Envelope::new(MessageType::SyncResponse, json, sim_time).write_to(&mut stream)?;
            }
            MessageType::Shutdown => {
                debug!("worker shutting down");
                break;
            }
            // Anything else is coordinator-side chatter; ignore it.
            _ => continue,
        }
    }
    Ok(())
}

/// Pull the assigned ids out of the pool, preserving assignment order.
/// Unknown ids are skipped (fail-safe, like missing payload fields).
fn select_assigned(pool: &mut Vec<Entity>, ids: &[String]) -> Vec<Entity> {
    let mut selected = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(pos) = pool.iter().position(|e| &e.id == id) {
            selected.push(pool.remove(pos));
        }
    }
    selected
}

fn sync_entry(entity: &Entity, time: f64) -> SyncEntry {
    let (position, velocity) = match entity.physics {
        PhysicsKind::OrbitalTwoBody => (entity.pos_eci.to_array(), entity.vel_eci.to_array()),
        _ => {
            let flight = &entity.flight;
            // Local ENU velocity from the flight state.
            let horizontal = flight.tas * flight.gamma.cos();
            (
                entity.geo.to_ecef().to_array(),
                [
                    horizontal * flight.heading.sin(),
                    horizontal * flight.heading.cos(),
                    flight.tas * flight.gamma.sin(),
                ],
            )
        }
    };
    SyncEntry {
        id: entity.id.clone(),
        position,
        velocity,
        time,
    }
}
