//! First-run setup wizard state machine.

use std::collections::HashSet;

use crate::bridge::{Backend, BridgeError, CookieStatus, DependencyReport, ToolKind};

use super::step::SetupStep;

/// Linear wizard over [`SetupStep::ORDER`] with per-step completion gating.
///
/// Forward navigation requires the current step to be completed; going back
/// never does. Completion arrives from three places: informational steps
/// complete themselves on becoming current, externally gated steps complete
/// when [`SetupWizard::apply_report`] sees their signals satisfied, and
/// skippable steps complete through [`SetupWizard::skip_current`].
/// Completions only ever accumulate within a session.
#[derive(Debug)]
pub struct SetupWizard {
    current: usize,
    completed: HashSet<SetupStep>,
    busy: bool,
    finished: bool,
    last_error: Option<String>,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    /// A fresh session at the welcome step. Welcome is informational, so it
    /// is already completed when this returns.
    pub fn new() -> Self {
        let mut wizard = Self {
            current: 0,
            completed: HashSet::new(),
            busy: false,
            finished: false,
            last_error: None,
        };
        wizard.enter(0);
        wizard
    }

    pub fn current_step(&self) -> SetupStep {
        // `current` is only ever set through `enter`, which bounds it.
        SetupStep::ORDER[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_completed(&self, step: SetupStep) -> bool {
        self.completed.contains(&step)
    }

    /// True while an install/validate round-trip is outstanding. Callers
    /// disable duplicate submissions while this is set.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// True once `finish` succeeded on the terminal step.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Message from the most recent failed action, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Marks `step` completed. Idempotent.
    pub fn complete_step(&mut self, step: SetupStep) {
        if self.completed.insert(step) {
            tracing::debug!(step = step.as_str(), "setup step completed");
        }
    }

    fn enter(&mut self, index: usize) {
        debug_assert!(index < SetupStep::ORDER.len());
        self.current = index;
        let step = self.current_step();
        if step.is_informational() {
            self.complete_step(step);
        }
    }

    /// Advances to the next step if the current one is completed. A no-op
    /// when the gate fails or the wizard is already on the terminal step;
    /// returns whether it advanced.
    pub fn next_step(&mut self) -> bool {
        if !self.is_completed(self.current_step()) {
            return false;
        }
        if self.current + 1 >= SetupStep::ORDER.len() {
            return false;
        }
        self.enter(self.current + 1);
        true
    }

    /// Goes back one step. No completion requirement; a no-op at the first
    /// step. Returns whether it moved.
    pub fn prev_step(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.enter(self.current - 1);
        true
    }

    /// Completes the current step without its external signal. Only
    /// skippable steps accept this; returns whether anything happened.
    pub fn skip_current(&mut self) -> bool {
        let step = self.current_step();
        if !step.is_skippable() {
            return false;
        }
        tracing::debug!(step = step.as_str(), "setup step skipped");
        self.complete_step(step);
        true
    }

    /// Re-evaluates every externally gated step against a fresh dependency
    /// snapshot. Newly satisfied steps become completed; already completed
    /// steps stay completed even if the signal regressed. Safe to call on
    /// every report, including while a step is displayed.
    pub fn apply_report(&mut self, report: &DependencyReport) {
        for step in SetupStep::ORDER {
            if self.is_completed(step) {
                continue;
            }
            if step_satisfied(step, report) {
                self.complete_step(step);
            }
        }
    }

    /// Fetches a dependency snapshot and applies it.
    pub async fn refresh_report(
        &mut self,
        backend: &dyn Backend,
    ) -> Result<DependencyReport, BridgeError> {
        self.busy = true;
        let outcome = backend.dependency_report().await;
        self.busy = false;
        match outcome {
            Ok(report) => {
                self.apply_report(&report);
                Ok(report)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Runs one install attempt for `tool`, then refreshes the dependency
    /// snapshot. On failure the owning step stays incomplete and the error
    /// message is kept for display; there is no automatic retry.
    pub async fn run_install(
        &mut self,
        backend: &dyn Backend,
        tool: ToolKind,
    ) -> Result<DependencyReport, BridgeError> {
        self.busy = true;
        tracing::info!(tool = tool.as_str(), "installing tool");
        let outcome = backend.install_tool(tool).await;
        self.busy = false;
        if let Err(err) = outcome {
            tracing::warn!(tool = tool.as_str(), "install failed: {}", err);
            self.last_error = Some(err.to_string());
            return Err(err);
        }
        self.last_error = None;
        self.refresh_report(backend).await
    }

    /// Imports a cookies file and, when it validates, completes the cookies
    /// step. An invalid file keeps the step incomplete and records the
    /// backend's detail message.
    pub async fn run_import_cookies(
        &mut self,
        backend: &dyn Backend,
        path: &str,
    ) -> Result<CookieStatus, BridgeError> {
        self.busy = true;
        let outcome = backend.import_cookies(path).await;
        self.busy = false;
        match outcome {
            Ok(status) => {
                if status.valid {
                    self.last_error = None;
                    self.complete_step(SetupStep::Cookies);
                } else {
                    self.last_error = status.detail.clone();
                }
                Ok(status)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Ends the session: records setup as done with the backend. Effective
    /// only on the terminal step; anywhere else it is a no-op returning
    /// `Ok(false)`. A failed backend call leaves the session unfinished.
    pub async fn finish(&mut self, backend: &dyn Backend) -> Result<bool, BridgeError> {
        if self.current + 1 != SetupStep::ORDER.len() {
            return Ok(false);
        }
        self.busy = true;
        let outcome = backend.mark_setup_complete().await;
        self.busy = false;
        match outcome {
            Ok(()) => {
                self.finished = true;
                self.last_error = None;
                tracing::info!("first-run setup finished");
                Ok(true)
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Whether `report` satisfies the external gate of `step`. Informational
/// steps are not report-gated and always answer false here.
fn step_satisfied(step: SetupStep, report: &DependencyReport) -> bool {
    match step {
        SetupStep::Welcome | SetupStep::Complete => false,
        SetupStep::Cookies => report.cookies.valid,
        _ => {
            let tools = step.required_tools();
            !tools.is_empty() && tools.iter().all(|tool| report.tool(*tool).installed)
        }
    }
}
