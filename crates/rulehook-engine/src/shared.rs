//! Shared rule runner for concurrent callers.
//!
//! Registration and deregistration take the write lock. Dispatch takes the
//! read lock on the rule collection while the caller holds exclusive access
//! to the context it passes in.

use std::sync::Arc;

use tokio::sync::RwLock;

use rulehook_core::AppResult;

use crate::context::RuleContext;
use crate::hooks::definitions::{FullEventName, HookKey};
use crate::rule::Rule;
use crate::runner::{DispatchReport, RuleRunner};

/// Clonable handle to a [`RuleRunner`] behind an async read/write lock.
#[derive(Debug, Clone)]
pub struct SharedRuleRunner {
    inner: Arc<RwLock<RuleRunner>>,
}

impl SharedRuleRunner {
    /// Wraps a runner for shared use.
    pub fn new(runner: RuleRunner) -> Self {
        Self {
            inner: Arc::new(RwLock::new(runner)),
        }
    }

    /// Registers a rule.
    pub async fn register(&self, rule: Rule) -> AppResult<()> {
        let mut runner = self.inner.write().await;
        runner.register(rule)
    }

    /// Removes a rule by name.
    pub async fn deregister(&self, name: &str) -> Option<Rule> {
        let mut runner = self.inner.write().await;
        runner.deregister(name)
    }

    /// Dispatches an event.
    pub async fn dispatch(
        &self,
        event: &FullEventName,
        ctx: &mut RuleContext,
    ) -> AppResult<DispatchReport> {
        let runner = self.inner.read().await;
        runner.dispatch(event, ctx)
    }

    /// Snapshot of the rules registered under `key`.
    pub async fn rules_for(&self, key: HookKey) -> Vec<Rule> {
        self.inner.read().await.rules_for(key)
    }

    /// Returns whether a rule with `name` is registered.
    pub async fn contains(&self, name: &str) -> bool {
        self.inner.read().await.contains(name)
    }

    /// Number of registered rules.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no rules are registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl From<RuleRunner> for SharedRuleRunner {
    fn from(runner: RuleRunner) -> Self {
        Self::new(runner)
    }
}
