//! Scripted counterpart for testing.

use super::traits::{Counterpart, Reply, Request};
use crate::protocol::GameEvent;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Answers requests from a fixed script and records everything it sees.
///
/// Once the script runs out every further request is answered with
/// `Reply::Abandon`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCounterpart {
    replies: VecDeque<Reply>,
    requests: Vec<Request>,
    events: Vec<GameEvent>,
}

impl ScriptedCounterpart {
    /// Create a counterpart that answers with `replies` in order
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Convenience for a script made only of numbers
    pub fn numbers(values: impl IntoIterator<Item = u32>) -> Self {
        Self::new(values.into_iter().map(Reply::Number))
    }

    /// Requests received so far
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// Events observed so far
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Replies not yet used
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

#[async_trait]
impl Counterpart for ScriptedCounterpart {
    async fn respond(&mut self, request: &Request) -> Reply {
        self.requests.push(request.clone());
        self.replies.pop_front().unwrap_or(Reply::Abandon)
    }

    fn observe(&mut self, event: &GameEvent) {
        self.events.push(event.clone());
    }
}
