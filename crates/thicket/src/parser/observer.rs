//! Parse event observation.
//!
//! An observer receives evaluator events as they happen: rule entry and
//! exit, memo cache hits, and recorded failures. Useful for tracing a
//! misbehaving grammar or counting rule invocations in tests without
//! instrumenting the grammar itself.

/// An event emitted by the evaluator. Rule names borrow from the
/// grammar; positions are byte offsets into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    /// A rule started evaluating at `position`.
    RuleEntered { rule: &'a str, position: usize },
    /// A rule finished evaluating the attempt started at `position`.
    RuleExited {
        rule: &'a str,
        position: usize,
        success: bool,
    },
    /// A rule's outcome at `position` was answered from the memo cache.
    CacheHit { rule: &'a str, position: usize },
    /// An expression failed at `position` and the failure was recorded
    /// for error reporting.
    FailureNoted { position: usize },
}

/// Receives [`ParseEvent`]s during a parse.
pub trait ParseObserver: Send {
    fn observe(&mut self, event: ParseEvent<'_>);
}

/// Observer that discards all events. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ParseObserver for NullObserver {
    fn observe(&mut self, _event: ParseEvent<'_>) {}
}
