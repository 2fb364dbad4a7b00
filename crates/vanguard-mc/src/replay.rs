//! Single-run replay recorder.
//!
//! Samples every entity's ECEF position on a fixed cadence, captures
//! first-death times and weapon events, and emits a self-contained tree
//! for offline reconstruction. Dead entities repeat their last known
//! position so every track shares the timeline length.

use serde::{Deserialize, Serialize};

use vanguard_core::enums::EngagementResult;
use vanguard_core::World;
use vanguard_sim::scenario::ScenarioDoc;
use vanguard_sim::{build_world, pipeline, ScenarioError};

/// Format tag on the output tree.
pub const REPLAY_FORMAT: &str = "vanguard-replay/1";

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub seed: u32,
    pub max_sim_time: f64,
    pub dt: f64,
    /// Seconds between trajectory samples.
    pub sample_interval: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            max_sim_time: 600.0,
            dt: 0.1,
            sample_interval: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub format: String,
    pub config: ReplayConfigView,
    pub timeline: Timeline,
    pub entities: Vec<ReplayEntity>,
    pub events: Vec<ReplayEvent>,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayConfigView {
    pub seed: u32,
    pub max_sim_time: f64,
    pub dt: f64,
    pub sample_interval: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub end_time: f64,
    pub sample_times: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntity {
    pub id: String,
    pub name: String,
    pub team: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// ECEF meters, one `[x, y, z]` per timeline sample.
    pub positions: Vec<[f64; 3]>,
    pub first_death_time: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEvent {
    pub time: f64,
    pub result: EngagementResult,
    pub source_id: String,
    pub target_id: String,
    pub source_position: [f64; 3],
    pub target_position: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub blue_alive: usize,
    pub blue_total: usize,
    pub red_alive: usize,
    pub red_total: usize,
    pub total_kills: usize,
    pub total_launches: usize,
}

/// Run one seeded replication and record its replay.
pub fn record(doc: &ScenarioDoc, config: &ReplayConfig) -> Result<ReplayReport, ScenarioError> {
    let mut world = build_world(doc, config.seed)?;
    let mut recorder = Recorder::new(&world, config.sample_interval);
    // Initial observation catches the t = 0 sample before any tick.
    recorder.observe(&world);

    let ticks = (config.max_sim_time / config.dt).ceil() as u64;
    for _ in 0..ticks {
        pipeline::step(&mut world, config.dt);
        recorder.observe(&world);
    }

    Ok(recorder.finish(&world, config))
}

struct Recorder {
    sample_interval: f64,
    next_sample: f64,
    sample_times: Vec<f64>,
    tracks: Vec<Vec<[f64; 3]>>,
    last_position: Vec<[f64; 3]>,
    first_death: Vec<Option<f64>>,
    log_cursors: Vec<usize>,
    events: Vec<ReplayEvent>,
}

impl Recorder {
    fn new(world: &World, sample_interval: f64) -> Self {
        let n = world.entity_count();
        Self {
            sample_interval,
            next_sample: 0.0,
            sample_times: Vec::new(),
            tracks: vec![Vec::new(); n],
            last_position: world
                .entities()
                .iter()
                .map(|e| e.position_ecef(0.0).to_array())
                .collect(),
            first_death: vec![None; n],
            log_cursors: vec![0; n],
            events: Vec::new(),
        }
    }

    /// Called after every tick (and once before the first): update death
    /// times, capture fresh weapon events, and sample if the cadence is
    /// due.
    fn observe(&mut self, world: &World) {
        for (idx, entity) in world.entities().iter().enumerate() {
            if entity.is_alive() {
                self.last_position[idx] = entity.position_ecef(world.t).to_array();
            } else if self.first_death[idx].is_none() {
                self.first_death[idx] = Some(world.t);
            }
        }

        self.capture_events(world);

        // Tolerate float accumulation in t; never sample twice per tick.
        if world.t >= self.next_sample - 1e-6 {
            self.sample_times.push(world.t);
            for (idx, track) in self.tracks.iter_mut().enumerate() {
                track.push(self.last_position[idx]);
            }
            self.next_sample += self.sample_interval;
        }
    }

    fn capture_events(&mut self, world: &World) {
        for (idx, entity) in world.entities().iter().enumerate() {
            let cursor = &mut self.log_cursors[idx];
            for record in &entity.log[*cursor..] {
                if !matches!(
                    record.result,
                    EngagementResult::Launch | EngagementResult::Kill | EngagementResult::Miss
                ) {
                    continue;
                }
                let target_position = world
                    .index_of(&record.target_id)
                    .map(|j| self.last_position[j])
                    .unwrap_or([0.0; 3]);
                self.events.push(ReplayEvent {
                    time: record.time,
                    result: record.result,
                    source_id: entity.id.clone(),
                    target_id: record.target_id.clone(),
                    source_position: self.last_position[idx],
                    target_position,
                });
            }
            *cursor = entity.log.len();
        }
    }

    fn finish(mut self, world: &World, config: &ReplayConfig) -> ReplayReport {
        self.events
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(std::cmp::Ordering::Equal));

        let mut summary = Summary {
            blue_alive: 0,
            blue_total: 0,
            red_alive: 0,
            red_total: 0,
            total_kills: 0,
            total_launches: 0,
        };
        for entity in world.entities() {
            match entity.team.as_str() {
                "blue" => {
                    summary.blue_total += 1;
                    if entity.is_alive() {
                        summary.blue_alive += 1;
                    }
                }
                "red" => {
                    summary.red_total += 1;
                    if entity.is_alive() {
                        summary.red_alive += 1;
                    }
                }
                _ => {}
            }
        }
        summary.total_kills = self
            .events
            .iter()
            .filter(|e| e.result == EngagementResult::Kill)
            .count();
        summary.total_launches = self
            .events
            .iter()
            .filter(|e| e.result == EngagementResult::Launch)
            .count();

        let entities = world
            .entities()
            .iter()
            .enumerate()
            .map(|(idx, entity)| ReplayEntity {
                id: entity.id.clone(),
                name: entity.name.clone(),
                team: entity.team.clone(),
                kind: entity.kind.clone(),
                positions: std::mem::take(&mut self.tracks[idx]),
                first_death_time: self.first_death[idx],
            })
            .collect();

        ReplayReport {
            format: REPLAY_FORMAT.to_string(),
            config: ReplayConfigView {
                seed: config.seed,
                max_sim_time: config.max_sim_time,
                dt: config.dt,
                sample_interval: config.sample_interval,
            },
            timeline: Timeline {
                end_time: world.t,
                sample_times: self.sample_times,
            },
            entities,
            events: self.events,
            summary,
        }
    }
}
