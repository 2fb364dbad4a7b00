//! Monte-Carlo batch runner.
//!
//! Rebuilds a fresh world per replication with seed = base_seed + i,
//! drives the tick pipeline, harvests deduplicated engagement records on
//! a fixed cadence, and stops a run early once a side's combat power is
//! gone. One run's failure is captured in its result and never poisons
//! the rest of the batch.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use vanguard_core::constants::HARVEST_INTERVAL_TICKS;
use vanguard_core::enums::{AiKind, EngagementResult, OrbitalRole, PhysicsKind, WeaponKind};
use vanguard_core::World;
use vanguard_sim::scenario::ScenarioDoc;
use vanguard_sim::{build_world, pipeline};

use crate::report::{EngagementView, McConfigView, McReport, RunResult, SurvivalView};

#[derive(Debug, Clone)]
pub struct McConfig {
    pub num_runs: usize,
    pub base_seed: u32,
    /// Wall of simulated seconds per run.
    pub max_sim_time: f64,
    pub dt: f64,
    pub verbose: bool,
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            num_runs: 1,
            base_seed: 1,
            max_sim_time: 600.0,
            dt: 0.1,
            verbose: false,
        }
    }
}

/// Run the full batch and assemble the report tree.
pub fn run_batch(doc: &ScenarioDoc, config: &McConfig) -> McReport {
    let mut runs = Vec::with_capacity(config.num_runs);
    for run_index in 0..config.num_runs {
        let result = run_once(doc, config, run_index);
        if config.verbose {
            info!(
                run = run_index,
                seed = result.seed,
                engagements = result.engagement_log.len(),
                error = result.error.as_deref().unwrap_or("-"),
                "run complete"
            );
        }
        runs.push(result);
    }
    McReport {
        config: McConfigView {
            num_runs: config.num_runs,
            base_seed: config.base_seed,
            max_sim_time: config.max_sim_time,
        },
        runs,
    }
}

fn run_once(doc: &ScenarioDoc, config: &McConfig, run_index: usize) -> RunResult {
    let seed = config.base_seed.wrapping_add(run_index as u32);

    let mut world = match build_world(doc, seed) {
        Ok(world) => world,
        Err(err) => {
            return RunResult {
                run_index,
                seed,
                sim_time_final: 0.0,
                error: Some(err.to_string()),
                engagement_log: Vec::new(),
                entity_survival: BTreeMap::new(),
            }
        }
    };

    let ticks = (config.max_sim_time / config.dt).ceil() as u64;
    let mut harvester = Harvester::new(&world);

    for tick in 1..=ticks {
        pipeline::step(&mut world, config.dt);

        if tick % HARVEST_INTERVAL_TICKS == 0 {
            harvester.collect(&world);
        }
        if early_termination(&world) {
            harvester.collect(&world);
            debug!(run = run_index, t = world.t, "early termination");
            break;
        }
    }
    harvester.collect(&world);

    RunResult {
        run_index,
        seed,
        sim_time_final: world.t,
        error: None,
        engagement_log: harvester.into_log(),
        entity_survival: survival_snapshot(&world),
    }
}

/// Engagement-log harvester.
///
/// Each collect re-reads every entity's log and deduplicates against
/// everything already harvested on the composite key
/// (source, target, result, time). A salvo legitimately logs several
/// identical records at the same instant, so the key carries an
/// occurrence ordinal — recomputed deterministically from log order on
/// every pass — to keep per-missile LAUNCH accounting intact.
struct Harvester {
    seen: HashSet<(String, String, EngagementResult, u64, u32)>,
    log: Vec<EngagementView>,
}

impl Harvester {
    fn new(_world: &World) -> Self {
        Self {
            seen: HashSet::new(),
            log: Vec::new(),
        }
    }

    /// Harvest records produced since the last collect. Only LAUNCH,
    /// KILL, and MISS survive; KILLED_BY is the target-side mirror of a
    /// KILL.
    fn collect(&mut self, world: &World) {
        for entity in world.entities() {
            let mut occurrence: HashMap<(String, EngagementResult, u64), u32> = HashMap::new();
            for record in &entity.log {
                if !matches!(
                    record.result,
                    EngagementResult::Launch | EngagementResult::Kill | EngagementResult::Miss
                ) {
                    continue;
                }
                let base = (
                    record.target_id.clone(),
                    record.result,
                    record.time.to_bits(),
                );
                let ordinal = occurrence.entry(base.clone()).or_insert(0);
                let key = (entity.id.clone(), base.0, base.1, base.2, *ordinal);
                *ordinal += 1;
                if !self.seen.insert(key) {
                    continue;
                }
                self.log.push(EngagementView {
                    time: record.time,
                    source_id: entity.id.clone(),
                    source_name: entity.name.clone(),
                    source_team: entity.team.clone(),
                    target_id: record.target_id.clone(),
                    target_name: record.target_name.clone(),
                    result: record.result,
                    weapon_type: entity.weapon.into(),
                });
            }
        }
    }

    fn into_log(self) -> Vec<EngagementView> {
        self.log
    }
}

#[derive(Default)]
struct SideCount {
    total: usize,
    alive: usize,
}

/// True when either the orbital or the atmospheric domain has a side
/// whose combat-relevant entities are all dead.
pub fn early_termination(world: &World) -> bool {
    orbital_collapsed(world) || atmospheric_collapsed(world)
}

/// Orbital domain: entities with orbital-combat AI and a real role. A
/// side collapses when its HVAs are all dead, or when its non-HVA combat
/// units are all dead.
fn orbital_collapsed(world: &World) -> bool {
    let mut hvas: BTreeMap<&str, SideCount> = BTreeMap::new();
    let mut units: BTreeMap<&str, SideCount> = BTreeMap::new();

    for entity in world.entities() {
        if entity.ai != AiKind::OrbitalCombat || entity.combat.role == OrbitalRole::None {
            continue;
        }
        let bucket = if entity.combat.role == OrbitalRole::Hva {
            hvas.entry(&entity.team).or_default()
        } else {
            units.entry(&entity.team).or_default()
        };
        bucket.total += 1;
        if entity.is_alive() {
            bucket.alive += 1;
        }
    }

    let collapsed =
        |counts: &BTreeMap<&str, SideCount>| counts.values().any(|c| c.total > 0 && c.alive == 0);
    collapsed(&hvas) || collapsed(&units)
}

/// Atmospheric domain: 3-DOF entities carrying AI or weapons. A side
/// collapses when all of them are dead.
fn atmospheric_collapsed(world: &World) -> bool {
    let mut sides: BTreeMap<&str, SideCount> = BTreeMap::new();
    for entity in world.entities() {
        if entity.physics != PhysicsKind::Flight3Dof {
            continue;
        }
        if entity.ai == AiKind::None && entity.weapon == WeaponKind::None {
            continue;
        }
        let bucket = sides.entry(&entity.team).or_default();
        bucket.total += 1;
        if entity.is_alive() {
            bucket.alive += 1;
        }
    }
    sides.values().any(|c| c.total > 0 && c.alive == 0)
}

fn survival_snapshot(world: &World) -> BTreeMap<String, SurvivalView> {
    world
        .entities()
        .iter()
        .map(|entity| {
            let role = (entity.ai == AiKind::OrbitalCombat
                && entity.combat.role != OrbitalRole::None)
                .then(|| role_name(entity.combat.role).to_string());
            (
                entity.id.clone(),
                SurvivalView {
                    name: entity.name.clone(),
                    team: entity.team.clone(),
                    kind: entity.kind.clone(),
                    role,
                    alive: entity.is_alive(),
                    destroyed: entity.destroyed,
                },
            )
        })
        .collect()
}

fn role_name(role: OrbitalRole) -> &'static str {
    match role {
        OrbitalRole::Hva => "hva",
        OrbitalRole::Defender => "defender",
        OrbitalRole::Attacker => "attacker",
        OrbitalRole::Escort => "escort",
        OrbitalRole::Sweep => "sweep",
        OrbitalRole::None => "none",
    }
}
