//! Hook timing model: which timings each method permits and which validator
//! gates rules attached to it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use rulehook_core::config::EngineConfig;
use rulehook_core::{AppError, AppResult};

use super::definitions::{ActionHookMethod, ActionHookTime, HookKey};
use crate::context::RuleContext;

/// Per-method predicate gating rule eligibility.
pub type Validator = Arc<dyn Fn(&RuleContext) -> bool + Send + Sync>;

/// Permitted timings for each hook method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PossibleHookPerMethod {
    timings: BTreeMap<ActionHookMethod, Vec<ActionHookTime>>,
}

impl PossibleHookPerMethod {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            timings: BTreeMap::new(),
        }
    }

    /// Permits `timings` for `method`, replacing any previous entry.
    ///
    /// Duplicates are dropped; order of first appearance is kept.
    pub fn allow(mut self, method: ActionHookMethod, timings: &[ActionHookTime]) -> Self {
        let mut unique = Vec::with_capacity(timings.len());
        for timing in timings {
            if !unique.contains(timing) {
                unique.push(*timing);
            }
        }
        self.timings.insert(method, unique);
        self
    }

    /// Builds a table from raw configuration strings.
    pub fn from_raw(raw: &BTreeMap<String, Vec<String>>) -> AppResult<Self> {
        raw.iter().try_fold(Self::new(), |table, (method, timings)| {
            let method: ActionHookMethod = method
                .parse()
                .map_err(|e: AppError| AppError::configuration(e.message))?;
            let timings = timings
                .iter()
                .map(|t| {
                    t.parse::<ActionHookTime>()
                        .map_err(|e| AppError::configuration(e.message))
                })
                .collect::<AppResult<Vec<_>>>()?;
            Ok(table.allow(method, &timings))
        })
    }

    /// Returns the permitted timings for `method`.
    pub fn timings_for(&self, method: ActionHookMethod) -> AppResult<&[ActionHookTime]> {
        self.timings
            .get(&method)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::configuration(format!("No hook timings configured for method '{method}'"))
            })
    }

    /// Returns whether `timing` is permitted for `method`.
    pub fn is_allowed(&self, method: ActionHookMethod, timing: ActionHookTime) -> AppResult<bool> {
        Ok(self.timings_for(method)?.contains(&timing))
    }

    /// Methods that have a timing set.
    pub fn methods(&self) -> impl Iterator<Item = ActionHookMethod> + '_ {
        self.timings.keys().copied()
    }

    /// Every permitted hook key.
    pub fn keys(&self) -> impl Iterator<Item = HookKey> + '_ {
        self.timings.iter().flat_map(|(method, timings)| {
            timings.iter().map(move |timing| HookKey::new(*method, *timing))
        })
    }
}

impl Default for PossibleHookPerMethod {
    /// Mutating methods permit every timing; reads have no error hook.
    fn default() -> Self {
        let all = ActionHookTime::all();
        Self::new()
            .allow(ActionHookMethod::Create, all)
            .allow(
                ActionHookMethod::Read,
                &[ActionHookTime::Before, ActionHookTime::After],
            )
            .allow(ActionHookMethod::Update, all)
            .allow(ActionHookMethod::Delete, all)
            .allow(ActionHookMethod::Write, all)
    }
}

/// Validator for each hook method.
#[derive(Clone, Default)]
pub struct ValidateHookPerMethod {
    validators: HashMap<ActionHookMethod, Validator>,
}

impl fmt::Debug for ValidateHookPerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.validators.keys().collect();
        methods.sort();
        f.debug_struct("ValidateHookPerMethod")
            .field("methods", &methods)
            .finish()
    }
}

impl ValidateHookPerMethod {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Approves every context for each of `methods`.
    pub fn permissive(methods: impl IntoIterator<Item = ActionHookMethod>) -> Self {
        methods
            .into_iter()
            .fold(Self::new(), |table, method| table.with(method, |_| true))
    }

    /// Built-in validators: methods that write a record require the context
    /// data to be a JSON object; reads and deletes always pass.
    pub fn builtin() -> Self {
        Self::new()
            .with(ActionHookMethod::Create, data_is_object)
            .with(ActionHookMethod::Read, |_| true)
            .with(ActionHookMethod::Update, data_is_object)
            .with(ActionHookMethod::Delete, |_| true)
            .with(ActionHookMethod::Write, data_is_object)
    }

    /// Adds the permissive validator for each of `methods` that has none,
    /// keeping existing validators.
    pub fn or_permissive(mut self, methods: impl IntoIterator<Item = ActionHookMethod>) -> Self {
        for method in methods {
            if !self.contains(method) {
                self = self.with(method, |_| true);
            }
        }
        self
    }

    /// Sets the validator for `method`, replacing any previous one.
    pub fn with<F>(mut self, method: ActionHookMethod, validator: F) -> Self
    where
        F: Fn(&RuleContext) -> bool + Send + Sync + 'static,
    {
        self.validators.insert(method, Arc::new(validator));
        self
    }

    /// Returns the validator for `method`.
    pub fn validator_for(&self, method: ActionHookMethod) -> AppResult<Validator> {
        self.validators.get(&method).cloned().ok_or_else(|| {
            AppError::configuration(format!("No validator configured for method '{method}'"))
        })
    }

    /// Returns whether `method` has a validator.
    pub fn contains(&self, method: ActionHookMethod) -> bool {
        self.validators.contains_key(&method)
    }
}

fn data_is_object(ctx: &RuleContext) -> bool {
    ctx.data.is_object()
}

/// Read-only pairing of the timing table and the validator table.
#[derive(Debug, Clone)]
pub struct HookModel {
    possible: PossibleHookPerMethod,
    validators: ValidateHookPerMethod,
}

impl HookModel {
    /// Creates a model, failing if a method with timings has no validator.
    pub fn new(
        possible: PossibleHookPerMethod,
        validators: ValidateHookPerMethod,
    ) -> AppResult<Self> {
        if let Some(method) = possible.methods().find(|m| !validators.contains(*m)) {
            return Err(AppError::configuration(format!(
                "Method '{method}' has hook timings but no validator"
            )));
        }
        Ok(Self {
            possible,
            validators,
        })
    }

    /// Builds a model from engine configuration.
    ///
    /// Uses the configured timing table when present, the default table
    /// otherwise, with the built-in validators. Configured methods without a
    /// built-in validator get the permissive one.
    pub fn from_config(config: &EngineConfig) -> AppResult<Self> {
        let possible = match &config.hooks {
            Some(raw) => PossibleHookPerMethod::from_raw(raw)?,
            None => PossibleHookPerMethod::default(),
        };
        let validators = ValidateHookPerMethod::builtin().or_permissive(possible.methods());
        Self::new(possible, validators)
    }

    /// The timing table.
    pub fn possible(&self) -> &PossibleHookPerMethod {
        &self.possible
    }

    /// The validator table.
    pub fn validators(&self) -> &ValidateHookPerMethod {
        &self.validators
    }

    /// Checks that `timing` is permitted for `method`.
    pub fn check(&self, method: ActionHookMethod, timing: ActionHookTime) -> AppResult<()> {
        if self.possible.is_allowed(method, timing)? {
            Ok(())
        } else {
            Err(AppError::invalid_timing(format!(
                "Timing '{timing}' is not permitted for method '{method}'"
            )))
        }
    }

    /// Returns the validator for `method`.
    pub fn validator_for(&self, method: ActionHookMethod) -> AppResult<Validator> {
        self.validators.validator_for(method)
    }
}

impl Default for HookModel {
    fn default() -> Self {
        Self {
            possible: PossibleHookPerMethod::default(),
            validators: ValidateHookPerMethod::builtin(),
        }
    }
}
