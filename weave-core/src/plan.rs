use tracing::trace;

use crate::{CallError, CallMode, Function, Type, Value, VariadicSlot};

/// Collects a trailing run of values into one variadic sequence.
///
/// Applied to a tuple of length `n >= start`, the values at `start..n` are
/// packed, in order, into a single `Vec<E>` value, leaving a tuple of length
/// `start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    start: usize,
    slot: VariadicSlot,
}

impl Correction {
    pub(crate) fn new(start: usize, slot: VariadicSlot) -> Self {
        Self { start, slot }
    }

    /// Index of the first collected value.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Element type of the built sequence.
    #[must_use]
    pub fn element(&self) -> Type {
        self.slot.element()
    }

    fn apply(&self, mut values: Vec<Value>) -> Result<Vec<Value>, CallError> {
        if values.len() < self.start {
            return Err(CallError::TooFewArguments {
                minimum: self.start,
                found: values.len(),
            });
        }

        let tail = values.split_off(self.start);
        trace!(
            start = self.start,
            collected = tail.len(),
            element = %self.slot.element(),
            "collecting trailing values"
        );
        values.push(self.slot.pack(tail, self.start)?);

        Ok(values)
    }
}

/// One step of a [`Plan`].
#[derive(Debug, Clone)]
pub enum Step {
    /// Calls a function on the running values.
    Call { function: Function, mode: CallMode },
    /// Reshapes the running values for the next call.
    Correct(Correction),
}

impl Step {
    pub(crate) fn call(function: Function) -> Self {
        let mode = CallMode::for_signature(function.signature());
        Self::Call { function, mode }
    }

    fn run(&self, values: Vec<Value>) -> Result<Vec<Value>, CallError> {
        match self {
            Self::Call { function, mode } => function.call_with(*mode, values),
            Self::Correct(correction) => correction.apply(values),
        }
    }
}

/// The precomputed sequence of steps that runs a composition.
///
/// Built once by [`Composition::new`](crate::Composition::new) and read-only
/// afterwards. Each step's output is the next step's only input.
#[derive(Debug, Clone)]
pub struct Plan {
    steps: Vec<Step>,
}

impl Plan {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order, threading the values through.
    ///
    /// # Errors
    ///
    /// Returns the first [`CallError`] raised by a step.
    pub fn run(&self, values: Vec<Value>) -> Result<Vec<Value>, CallError> {
        self.steps.iter().try_fold(values, |values, step| step.run(values))
    }

    /// Returns a serializable description of the steps.
    #[cfg(feature = "serde-derive")]
    #[must_use]
    pub fn describe(&self) -> Vec<StepDescription> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Call { function, mode } => StepDescription::Call {
                    function: function.name().to_string(),
                    mode: *mode,
                },
                Step::Correct(correction) => StepDescription::Correct {
                    start: correction.start(),
                    element: correction.element().to_string(),
                },
            })
            .collect()
    }
}

/// A serializable view of a [`Step`].
#[cfg(feature = "serde-derive")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepDescription {
    Call { function: String, mode: CallMode },
    Correct { start: usize, element: String },
}
