//! Execution mode controller
//!
//! Routes a resolved request either into the dispatcher (EXECUTE) or to a
//! rendered plan with no side effects (EXPLAIN). The mode is process-wide
//! session state; switching takes effect on the next resolved command.

use launchkit_core::ExecutionMode;

use crate::dispatch::{Dispatcher, ExecutionReport};
use crate::error::Result;
use crate::request::{ActionPlan, ActionRequest};

/// What routing a request produced
#[derive(Debug)]
pub enum CommandOutcome {
    /// EXPLAIN mode: the rendered plan
    Explained(ActionPlan),

    /// EXECUTE mode: the handler ran and the registry was updated
    Executed(ExecutionReport),
}

/// Session-wide execute/explain switch
#[derive(Debug, Clone, Copy)]
pub struct ModeController {
    mode: ExecutionMode,
}

impl ModeController {
    /// Create a controller with an initial mode
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    /// The current mode
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Switch mode; applies from the next resolved command
    pub fn set_mode(&mut self, mode: ExecutionMode) {
        self.mode = mode;
    }

    /// Route a request according to the current mode
    pub async fn run(
        &self,
        dispatcher: &Dispatcher,
        request: &ActionRequest,
    ) -> Result<CommandOutcome> {
        match self.mode {
            ExecutionMode::Explain => Ok(CommandOutcome::Explained(dispatcher.explain(request)?)),
            ExecutionMode::Execute => {
                Ok(CommandOutcome::Executed(dispatcher.dispatch(request).await?))
            }
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(ExecutionMode::Execute)
    }
}
