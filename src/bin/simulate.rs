use amoeba_players::player::Player;
use amoeba_players::simulator::{Simulation, SimulationOptions, SimulationSummary};
use amoeba_players::types::FormationKind;
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    single: bool,
    #[arg(long)]
    formation: Option<String>,
    #[arg(long)]
    metabolism: Option<f32>,
    #[arg(long)]
    goal_size: Option<usize>,
    #[arg(long)]
    density: Option<f32>,
    #[arg(long)]
    turns: Option<usize>,
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize)]
struct Scenario {
    name: String,
    formation: FormationKind,
    #[serde(flatten)]
    options: SimulationOptions,
}

#[derive(Clone, Debug, Serialize)]
struct ScenarioResultLine {
    scenario: String,
    seed: u32,
    formation: FormationKind,
    metabolism: f32,
    #[serde(rename = "goalSize")]
    goal_size: usize,
    density: f32,
    turns: usize,
    #[serde(rename = "initialSize")]
    initial_size: usize,
    #[serde(rename = "finalSize")]
    final_size: usize,
    #[serde(rename = "reachedGoal")]
    reached_goal: bool,
    absorbed: usize,
    #[serde(rename = "passTurns")]
    pass_turns: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "scenarioCount")]
    scenario_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "goalsReached")]
    goals_reached: usize,
    #[serde(rename = "averageTurns")]
    average_turns: usize,
    scenarios: Vec<ScenarioResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scenario: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<usize>,
    details: Value,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let scenarios = resolve_scenarios(&cli);
    let run_started_at_ms = now_ms();
    let seed_hint = scenarios
        .first()
        .map(|scenario| scenario.options.seed)
        .unwrap_or(0);
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(seed_hint, run_started_at_ms));
    let mut has_anomaly = false;
    let mut scenario_results = Vec::new();

    for scenario in scenarios {
        emit_log(
            "info",
            "scenario_started",
            &match_id,
            Some(&scenario.name),
            Some(scenario.options.seed),
            None,
            json!({
                "formation": scenario.formation,
                "metabolism": scenario.options.metabolism,
                "goalSize": scenario.options.goal_size,
                "density": scenario.options.bacteria_density,
                "maxTurns": scenario.options.max_turns,
            }),
        );

        let summary = match run_scenario(&scenario) {
            Ok(summary) => summary,
            Err(error) => {
                emit_log(
                    "error",
                    "scenario_config_invalid",
                    &match_id,
                    Some(&scenario.name),
                    Some(scenario.options.seed),
                    None,
                    json!({ "error": error }),
                );
                std::process::exit(2);
            }
        };

        for rejection in &summary.rejections {
            emit_log(
                "warn",
                "move_rejected",
                &match_id,
                Some(&scenario.name),
                Some(scenario.options.seed),
                Some(rejection.turn),
                json!({
                    "reason": rejection.reason,
                }),
            );
        }

        let result = to_result_line(&scenario, &summary);
        if !result.anomalies.is_empty() {
            has_anomaly = true;
        }

        emit_log(
            "info",
            "scenario_finished",
            &match_id,
            Some(&scenario.name),
            Some(scenario.options.seed),
            Some(summary.turns),
            json!({
                "finalSize": summary.final_size,
                "reachedGoal": summary.reached_goal,
                "absorbed": summary.absorbed,
                "anomalyCount": result.anomalies.len(),
            }),
        );

        println!(
            "{}",
            serde_json::to_string(&result).expect("scenario result should serialize")
        );
        scenario_results.push(result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        run_started_at_ms,
        now_ms(),
        scenario_results,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "scenarioCount": summary.scenario_count,
            "anomalyCount": summary.anomaly_count,
            "goalsReached": summary.goals_reached,
            "averageTurns": summary.average_turns,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn run_scenario(scenario: &Scenario) -> Result<SimulationSummary, String> {
    let config = scenario.options.player_config(scenario.formation);
    let mut player = Player::new(config).map_err(|error| error.to_string())?;
    let mut simulation =
        Simulation::new(scenario.options.clone()).map_err(|error| error.to_string())?;
    Ok(simulation.run(&mut player))
}

fn to_result_line(scenario: &Scenario, summary: &SimulationSummary) -> ScenarioResultLine {
    let mut anomalies: Vec<String> = summary
        .rejections
        .iter()
        .map(|rejection| format!("turn {}: {}", rejection.turn, rejection.reason))
        .collect();
    if !summary.connected {
        anomalies.push("amoeba ended in several pieces".to_string());
    }

    ScenarioResultLine {
        scenario: scenario.name.clone(),
        seed: scenario.options.seed,
        formation: scenario.formation,
        metabolism: scenario.options.metabolism,
        goal_size: scenario.options.goal_size,
        density: scenario.options.bacteria_density,
        turns: summary.turns,
        initial_size: summary.initial_size,
        final_size: summary.final_size,
        reached_goal: summary.reached_goal,
        absorbed: summary.absorbed,
        pass_turns: summary.pass_turns,
        anomalies,
    }
}

fn resolve_scenarios(cli: &Cli) -> Vec<Scenario> {
    let seed = cli.seed.unwrap_or_else(rand::random::<u32>);
    let formation = cli
        .formation
        .as_deref()
        .and_then(FormationKind::parse)
        .unwrap_or_default();
    let defaults = SimulationOptions::default();

    if cli.single
        || cli.formation.is_some()
        || cli.metabolism.is_some()
        || cli.goal_size.is_some()
        || cli.density.is_some()
        || cli.turns.is_some()
    {
        return vec![Scenario {
            name: format!("custom-{}", formation.as_str()),
            formation,
            options: SimulationOptions {
                goal_size: cli.goal_size.unwrap_or(defaults.goal_size),
                metabolism: cli.metabolism.unwrap_or(defaults.metabolism),
                bacteria_density: cli.density.unwrap_or(defaults.bacteria_density),
                max_turns: cli.turns.unwrap_or(defaults.max_turns),
                seed,
                ..defaults
            },
        }];
    }

    vec![
        Scenario {
            name: "quadrants-sparse".to_string(),
            formation: FormationKind::Quadrants,
            options: SimulationOptions {
                bacteria_density: 0.01,
                max_turns: 200,
                seed,
                ..defaults.clone()
            },
        },
        Scenario {
            name: "growth-dense".to_string(),
            formation: FormationKind::Growth,
            options: SimulationOptions {
                bacteria_density: 0.1,
                max_turns: 200,
                seed: seed.wrapping_add(1),
                ..defaults.clone()
            },
        },
        Scenario {
            name: "space-curve-slow".to_string(),
            formation: FormationKind::SpaceCurve,
            options: SimulationOptions {
                metabolism: 0.1,
                bacteria_density: 0.05,
                max_turns: 200,
                seed: seed.wrapping_add(2),
                ..defaults.clone()
            },
        },
        Scenario {
            name: "column-march".to_string(),
            formation: FormationKind::ColumnMarch,
            options: SimulationOptions {
                bacteria_density: 0.05,
                max_turns: 200,
                seed: seed.wrapping_add(3),
                ..defaults
            },
        },
    ]
}

fn default_match_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    match_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    scenarios: Vec<ScenarioResultLine>,
) -> RunSummary {
    let scenario_count = scenarios.len();
    let anomaly_count = scenarios.iter().map(|s| s.anomalies.len()).sum();
    let goals_reached = scenarios.iter().filter(|s| s.reached_goal).count();
    let total_turns: usize = scenarios.iter().map(|s| s.turns).sum();
    let average_turns = if scenario_count == 0 {
        0
    } else {
        total_turns / scenario_count
    };
    RunSummary {
        match_id,
        generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started_at_ms,
        finished_at_ms,
        scenario_count,
        anomaly_count,
        goals_reached,
        average_turns,
        scenarios,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    scenario: Option<&str>,
    seed: Option<u32>,
    turn: Option<usize>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        scenario: scenario.map(|value| value.to_string()),
        seed,
        turn,
        details,
    };
    eprintln!(
        "{}",
        serde_json::to_string(&log_line).expect("structured log should serialize")
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).expect("run summary should serialize");
    std::fs::write(path, summary_text)
}
