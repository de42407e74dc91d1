use waypoint_graph::StateId;

/// One attempted hop along a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub from: StateId,
    pub to: StateId,
    /// Whether the executor reported arriving at `to`.
    pub succeeded: bool,
    /// Step number (monotonic within the trace).
    pub step_number: u64,
}

/// Record of the hops attempted by one traversal.
#[derive(Debug, Clone, Default)]
pub struct TraversalTrace {
    steps: Vec<TraceStep>,
    next_step: u64,
}

impl TraversalTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, from: StateId, to: StateId, succeeded: bool) {
        self.steps.push(TraceStep {
            from,
            to,
            succeeded,
            step_number: self.next_step,
        });
        self.next_step += 1;
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// The hop that failed, if any. A traversal stops at its first failure,
    /// so this is always the last step when present.
    pub fn failure(&self) -> Option<&TraceStep> {
        self.steps.last().filter(|step| !step.succeeded)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
