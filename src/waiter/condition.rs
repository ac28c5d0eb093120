//! Predicates over a response body.

use std::borrow::Cow;

/// Caller-defined condition for declaring the awaited state reached.
pub trait WaitCondition {
    fn is_met(&self, body: &str) -> bool;

    /// Human-readable form for log lines.
    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("custom predicate")
    }
}

impl<F> WaitCondition for F
where
    F: Fn(&str) -> bool,
{
    fn is_met(&self, body: &str) -> bool {
        self(body)
    }
}

/// Body contains a fixed substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains(pub String);

impl Contains {
    pub fn new(expected: impl Into<String>) -> Self {
        Self(expected.into())
    }
}

impl WaitCondition for Contains {
    fn is_met(&self, body: &str) -> bool {
        body.contains(self.0.as_str())
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Owned(format!("body contains {:?}", self.0))
    }
}

/// Any completed response satisfies it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyResponse;

impl WaitCondition for AnyResponse {
    fn is_met(&self, _body: &str) -> bool {
        true
    }

    fn describe(&self) -> Cow<'_, str> {
        Cow::Borrowed("any response")
    }
}
