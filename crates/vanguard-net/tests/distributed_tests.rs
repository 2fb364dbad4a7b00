//! Coordinator/worker integration over a real Unix socket, with workers
//! running as threads that speak the full protocol.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use vanguard_core::enums::PhysicsKind;
use vanguard_core::Entity;
use vanguard_net::coordinator::{partition_round_robin, Coordinator};
use vanguard_net::worker;
use vanguard_sim::physics;

fn socket_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("vanguard-{}-{}.sock", tag, std::process::id()))
}

fn orbital(id: &str) -> Entity {
    let mut e = Entity::new(id, id.to_uppercase(), "satellite", "blue");
    e.physics = PhysicsKind::OrbitalTwoBody;
    e.pos_eci = glam::DVec3::new(7_000_000.0, 0.0, 0.0);
    e.vel_eci = glam::DVec3::new(
        0.0,
        (vanguard_core::constants::MU_EARTH / 7_000_000.0).sqrt(),
        0.0,
    );
    e
}

/// Block until the coordinator's socket file exists (bind has happened).
fn wait_for_socket(path: &PathBuf) {
    for _ in 0..500 {
        if path.exists() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("coordinator socket never appeared at {}", path.display());
}

fn spawn_worker(path: PathBuf, pool: Vec<Entity>) -> thread::JoinHandle<Result<(), String>> {
    thread::spawn(move || {
        let mut update = |entity: &mut Entity, dt: f64, _time: f64| -> Result<(), String> {
            physics::step_entity(entity, dt);
            Ok(())
        };
        worker::run(&path, pool, &mut update).map_err(|e| e.to_string())
    })
}

#[test]
fn three_workers_step_and_sync() {
    let path = socket_path("trio");
    let _ = std::fs::remove_file(&path);
    let ids: Vec<String> = (0..6).map(|i| format!("sat-{i}")).collect();
    let assignments = partition_round_robin(&ids, 3);

    let coordinator_path = path.clone();
    let assignments_clone = assignments.clone();
    let coordinator = thread::spawn(move || {
        Coordinator::start(&coordinator_path, &assignments_clone).expect("coordinator start")
    });

    wait_for_socket(&path);
    let mut workers = Vec::new();
    for _ in 0..3 {
        let pool: Vec<Entity> = ids.iter().map(|id| orbital(id)).collect();
        workers.push(spawn_worker(path.clone(), pool));
    }

    let mut coordinator = coordinator.join().expect("coordinator thread");
    assert_eq!(coordinator.worker_count(), 3);

    // Ten steps, all inside the deadline.
    let dt = 1.0;
    for tick in 0..10 {
        let ok = coordinator
            .step(dt, tick as f64 * dt, Duration::from_secs(5))
            .expect("step broadcast");
        assert!(ok, "step {tick} should complete");
    }

    // Sync pulls every entity's state, partitioned without overlap.
    let slots = coordinator
        .sync(10.0, Duration::from_secs(5))
        .expect("sync broadcast");
    let mut seen: Vec<String> = slots
        .iter()
        .flatten()
        .flat_map(|p| p.entities.iter().map(|e| e.id.clone()))
        .collect();
    seen.sort();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(seen, expected);

    // Propagation actually happened: 10 s along a 7000 km orbit moves
    // tens of kilometers off the start point.
    let moved = slots
        .iter()
        .flatten()
        .flat_map(|p| &p.entities)
        .all(|e| (e.position[0] - 7_000_000.0).abs() > 1_000.0 || e.position[1].abs() > 1_000.0);
    assert!(moved);

    coordinator.shutdown(10.0);
    for w in workers {
        assert!(w.join().expect("worker thread").is_ok());
    }
    let _ = std::fs::remove_file(&path);
}

#[test]
fn failing_worker_times_out_the_barrier() {
    let path = socket_path("fail");
    let _ = std::fs::remove_file(&path);
    let ids: Vec<String> = (0..3).map(|i| format!("sat-{i}")).collect();
    let assignments = partition_round_robin(&ids, 3);

    let coordinator_path = path.clone();
    let assignments_clone = assignments.clone();
    let coordinator = thread::spawn(move || {
        Coordinator::start(&coordinator_path, &assignments_clone).expect("coordinator start")
    });

    wait_for_socket(&path);
    let mut workers = Vec::new();
    for k in 0..3 {
        let pool: Vec<Entity> = ids.iter().map(|id| orbital(id)).collect();
        if k == 2 {
            // The third worker's update throws on the first entity.
            workers.push(thread::spawn({
                let path = path.clone();
                move || {
                    let mut update = |_e: &mut Entity, _dt: f64, _time: f64| -> Result<(), String> {
                        Err("deliberate failure".to_string())
                    };
                    worker::run(&path, pool, &mut update).map_err(|e| e.to_string())
                }
            }));
        } else {
            workers.push(spawn_worker(path.clone(), pool));
        }
    }

    let mut coordinator = coordinator.join().expect("coordinator thread");
    let ok = coordinator
        .step(1.0, 0.0, Duration::from_millis(500))
        .expect("step broadcast");
    assert!(!ok, "a dead worker must surface as step failure");

    coordinator.shutdown(1.0);
    // Two clean shutdowns, one update error.
    let results: Vec<Result<(), String>> = workers
        .into_iter()
        .map(|w| w.join().expect("worker thread"))
        .collect();
    let failures = results.iter().filter(|r| r.is_err()).count();
    assert_eq!(failures, 1);
    let _ = std::fs::remove_file(&path);
}
