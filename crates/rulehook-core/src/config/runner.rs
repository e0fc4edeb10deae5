//! Rule runner configuration.

use serde::{Deserialize, Serialize};

/// Dispatch behaviour of a rule runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// When `false` (the default) the first failing rule aborts the dispatch
    /// and its error is returned. When `true` the failure is recorded in the
    /// dispatch report and the remaining rules still run.
    #[serde(default)]
    pub continue_on_error: bool,
}

impl RunnerConfig {
    /// Fail-fast configuration.
    pub fn fail_fast() -> Self {
        Self {
            continue_on_error: false,
        }
    }

    /// Collect failures and keep dispatching.
    pub fn continue_on_error() -> Self {
        Self {
            continue_on_error: true,
        }
    }
}
