//! Scenario replay
//!
//! Builds a pool from a scenario's manifest, starts the background tasks
//! the configuration asks for, and applies every step as its own task.

use crate::error::CliError;
use banker_config::{Config, GrowthConfig, Scenario, Step};
use banker_errors::Error;
use banker_events::EventSender;
use banker_resources::{
    GrowerHandle, InvariantMonitor, MonitorHandle, MonitorReport, PoolGrower, ResourcePool,
};
use banker_types::PoolSnapshot;
use tracing::{debug, info, warn};

/// Result of applying one step
#[derive(Debug)]
pub struct StepOutcome {
    pub index: usize,
    pub step: Step,
    pub result: Result<(), Error>,
}

/// Everything a finished run reports
#[derive(Debug)]
pub struct RunSummary {
    pub outcomes: Vec<StepOutcome>,
    pub snapshot: PoolSnapshot,
    pub monitor: Option<MonitorReport>,
    pub grower_rounds: Option<u64>,
}

impl RunSummary {
    pub fn granted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Replay `scenario` and stop the background tasks once every step is done.
///
/// With `serial` each step's task is awaited before the next is spawned, so
/// the outcomes are deterministic. Otherwise all steps are spawned at once
/// and the pool lock decides their order.
pub async fn run_scenario(
    scenario: Scenario,
    config: &Config,
    serial: bool,
    events: EventSender,
) -> Result<RunSummary, CliError> {
    let pool = ResourcePool::from_manifest(&scenario.manifest)?.with_event_sender(events);
    info!(
        steps = scenario.steps.len(),
        serial,
        monitor = config.monitor.enabled,
        growth = config.growth.enabled,
        "Replaying scenario"
    );

    let grower = start_grower(&pool, &config.growth)?;
    let monitor = match start_monitor(&pool, config) {
        Ok(monitor) => monitor,
        Err(e) => {
            if let Some(handle) = grower {
                if let Err(stop_err) = handle.stop().await {
                    warn!(error = %stop_err, "Grower ended early");
                }
            }
            return Err(e.into());
        }
    };

    let outcomes = replay(&pool, scenario.steps, serial).await?;

    let grower_rounds = match grower {
        Some(handle) => match handle.stop().await {
            Ok(rounds) => Some(rounds),
            Err(e) if !e.is_fatal() => {
                warn!(error = %e, "Grower ended early");
                None
            }
            Err(e) => return Err(e.into()),
        },
        None => None,
    };
    let monitor = match monitor {
        Some(handle) => Some(handle.stop().await?),
        None => None,
    };

    if let Some(fatal) = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err())
        .find(|e| e.is_fatal())
    {
        return Err(fatal.clone().into());
    }

    let snapshot = pool.snapshot().await;
    Ok(RunSummary {
        outcomes,
        snapshot,
        monitor,
        grower_rounds,
    })
}

fn start_monitor(pool: &ResourcePool, config: &Config) -> Result<Option<MonitorHandle>, Error> {
    if !config.monitor.enabled {
        return Ok(None);
    }
    InvariantMonitor::from_config(pool.clone(), &config.monitor)
        .spawn()
        .map(Some)
}

fn start_grower(pool: &ResourcePool, config: &GrowthConfig) -> Result<Option<GrowerHandle>, Error> {
    if !config.enabled {
        return Ok(None);
    }
    if config.increment.is_zero() {
        warn!("Growth enabled without an increment, not starting grower");
        return Ok(None);
    }
    PoolGrower::from_config(pool.clone(), config).spawn().map(Some)
}

async fn replay(pool: &ResourcePool, steps: Vec<Step>, serial: bool) -> Result<Vec<StepOutcome>, Error> {
    if serial {
        let mut outcomes = Vec::with_capacity(steps.len());
        for (index, step) in steps.into_iter().enumerate() {
            let outcome = tokio::spawn(apply_step(pool.clone(), index, step))
                .await
                .map_err(step_failed)?;
            outcomes.push(outcome);
        }
        return Ok(outcomes);
    }

    let handles = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| tokio::spawn(apply_step(pool.clone(), index, step)));
    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.map_err(step_failed))
        .collect()
}

async fn apply_step(pool: ResourcePool, index: usize, step: Step) -> StepOutcome {
    let pool = pool.with_correlation_id(format!("step-{index}"));
    let result = match &step {
        Step::Request { process, vector } => pool.request(*process, vector).await.map(|_| ()),
        Step::Release { process, vector } => pool.release(*process, vector).await,
        Step::Grow { vector } => pool.grow(vector).await,
    };

    match &result {
        Ok(()) => debug!(step = index, action = %step.describe(), "Step applied"),
        Err(e) => debug!(step = index, action = %step.describe(), error = %e, "Step refused"),
    }
    StepOutcome {
        index,
        step,
        result,
    }
}

fn step_failed(e: tokio::task::JoinError) -> Error {
    Error::internal(format!("step task failed: {e}"))
}
