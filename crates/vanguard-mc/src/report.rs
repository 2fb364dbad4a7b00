//! Serde output trees for the Monte-Carlo runner.
//!
//! View structs are separate from simulation state; the output writer is
//! plain `serde_json` over these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vanguard_core::enums::{EngagementResult, WeaponClass};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McReport {
    pub config: McConfigView,
    pub runs: Vec<RunResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McConfigView {
    pub num_runs: usize,
    pub base_seed: u32,
    pub max_sim_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub run_index: usize,
    pub seed: u32,
    pub sim_time_final: f64,
    pub error: Option<String>,
    pub engagement_log: Vec<EngagementView>,
    /// Keyed by entity id; BTreeMap keeps the encoding stable across hosts.
    pub entity_survival: BTreeMap<String, SurvivalView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementView {
    pub time: f64,
    pub source_id: String,
    pub source_name: String,
    pub source_team: String,
    pub target_id: String,
    pub target_name: String,
    pub result: EngagementResult,
    pub weapon_type: WeaponClass,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivalView {
    pub name: String,
    pub team: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Option<String>,
    pub alive: bool,
    pub destroyed: bool,
}
