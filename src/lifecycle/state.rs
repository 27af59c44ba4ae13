use super::orchestrator::Lifecycle;
use super::types::{Stage, State};
use serde::Serialize;

/// Point-in-time view of a lifecycle for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleSnapshot {
    pub name: String,
    pub state: State,
    pub current_stage: Option<Stage>,
    pub stages: Vec<StageSummary>,
}

/// Handlers registered at one stage, in registration order
#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub handlers: Vec<String>,
}

impl Lifecycle {
    /// Current state; readable without waiting on a start or stop in progress
    pub fn state(&self) -> State {
        self.inner.state.load()
    }

    /// Stage most recently entered by `start()`, if it has been called
    pub fn current_stage(&self) -> Option<Stage> {
        self.inner.current_stage.load()
    }

    pub fn is_running(&self) -> bool {
        self.state() == State::Running
    }

    /// Number of handlers registered at `stage`. Does not wait on a start or
    /// stop in progress.
    pub fn handler_count(&self, stage: Stage) -> usize {
        self.inner.registry.lock().get(&stage).map_or(0, Vec::len)
    }

    /// Handlers are described after the registry is released, so a slow
    /// `describe()` never blocks registration.
    pub fn snapshot(&self) -> LifecycleSnapshot {
        let stages = Stage::ALL
            .into_iter()
            .map(|stage| StageSummary {
                stage,
                handlers: self
                    .inner
                    .handlers_at(stage)
                    .iter()
                    .map(|handler| handler.describe())
                    .collect(),
            })
            .collect();

        LifecycleSnapshot {
            name: self.inner.name.clone(),
            state: self.state(),
            current_stage: self.current_stage(),
            stages,
        }
    }
}
