//! One observable result slot per logical operation.
//!
//! A slot moves `Idle → Loading → terminal`, and back to `Idle` on reset.
//! Every trigger takes a new generation number; a result is only published
//! if its generation is still the current one, so neither a reset nor a newer
//! trigger can be overwritten by a slow, stale response.

use crate::state::ResultState;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;

/// What a trigger does while the previous call is still loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Drop the new trigger; the call in flight settles the slot
    #[default]
    IgnoreWhileLoading,
    /// Start the new call; the older one's result is discarded
    Supersede,
}

pub struct Operation<T> {
    name: &'static str,
    policy: TriggerPolicy,
    generation: Mutex<u64>,
    state: watch::Sender<ResultState<T>>,
}

impl<T: Clone> Operation<T> {
    pub fn new(name: &'static str, policy: TriggerPolicy) -> Self {
        let (state, _) = watch::channel(ResultState::Idle);
        Self {
            name,
            policy,
            generation: Mutex::new(0),
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResultState<T> {
        self.state.borrow().clone()
    }

    /// Receiver that wakes on every published transition
    pub fn subscribe(&self) -> watch::Receiver<ResultState<T>> {
        self.state.subscribe()
    }

    /// Back to `Idle`; whatever is still in flight will not be published
    pub fn reset(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        self.state.send_replace(ResultState::Idle);
        log::debug!("{}: reset to idle", self.name);
    }

    /// Runs `call` as a new trigger.
    ///
    /// Returns the terminal state it published, or `None` if the trigger was
    /// ignored or its result went stale before it arrived. Dropping the returned
    /// future before it settles puts a still-current slot back to `Idle`.
    pub async fn run<F>(&self, call: F) -> Option<ResultState<T>>
    where
        F: Future<Output = ResultState<T>>,
    {
        let generation = self.begin()?;
        let mut in_flight = InFlight {
            operation: self,
            generation,
            armed: true,
        };

        let result = call.await;
        debug_assert!(result.is_terminal(), "{} settled as {}", self.name, result);
        in_flight.armed = false;

        if self.publish(generation, result.clone()) {
            Some(result)
        } else {
            None
        }
    }

    fn begin(&self) -> Option<u64> {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);

        if self.state.borrow().is_loading() {
            match self.policy {
                TriggerPolicy::IgnoreWhileLoading => {
                    log::debug!("{}: already loading, trigger ignored", self.name);
                    return None;
                }
                TriggerPolicy::Supersede => {
                    log::debug!("{}: superseding call in flight", self.name);
                }
            }
        }

        *generation += 1;
        self.state.send_replace(ResultState::Loading);
        Some(*generation)
    }

    /// A trigger dropped before settling hands the slot back as `Idle`
    fn abandon(&self, generation: u64) {
        let mut current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            return;
        }
        *current += 1;
        self.state.send_replace(ResultState::Idle);
        log::debug!("{}: call dropped before settling, back to idle", self.name);
    }

    fn publish(&self, generation: u64, result: ResultState<T>) -> bool {
        let current = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != generation {
            log::debug!(
                "{}: discarding stale result of generation {} (current {})",
                self.name,
                generation,
                *current
            );
            return false;
        }

        log::info!("{}: {}", self.name, result);
        self.state.send_replace(result);
        true
    }
}

/// Releases the slot if `run` is dropped while its call is still pending
struct InFlight<'a, T: Clone> {
    operation: &'a Operation<T>,
    generation: u64,
    armed: bool,
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.operation.abandon(self.generation);
        }
    }
}
