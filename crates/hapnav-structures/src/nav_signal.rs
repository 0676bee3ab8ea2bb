// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use crate::{define_index, NavDataError};

define_index!(NavSignalIndex, u32, "A unique identifier for a subscription to a NavSignal");

/// Callback registry used to expose readings at their own cadence.
///
/// Subscribers are `FnMut` so they can capture and update external state,
/// typically through `Arc<Mutex<T>>`.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use hapnav_structures::NavSignal;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut signal = NavSignal::new();
///
/// let seen_clone = Arc::clone(&seen);
/// let handle = signal.connect(move |value: &f64| {
///     seen_clone.lock().unwrap().push(*value);
/// });
///
/// signal.emit(&0.25);
/// signal.disconnect(handle).unwrap();
/// signal.emit(&0.5);
/// assert_eq!(*seen.lock().unwrap(), vec![0.25]);
/// ```
pub struct NavSignal<T> {
    listeners: BTreeMap<NavSignalIndex, Box<dyn FnMut(&T) + Send>>,
    next_index: u32,
}

impl<T> NavSignal<T> {
    pub fn new() -> Self {
        Self {
            listeners: BTreeMap::new(),
            next_index: 0,
        }
    }

    /// Connects a callback; the returned handle disconnects it later.
    pub fn connect<F>(&mut self, f: F) -> NavSignalIndex
    where
        F: FnMut(&T) + Send + 'static,
    {
        let index = NavSignalIndex::from(self.next_index);
        self.listeners.insert(index, Box::new(f));
        self.next_index = self.next_index.wrapping_add(1);
        index
    }

    /// Disconnects a previously connected callback.
    pub fn disconnect(&mut self, index: NavSignalIndex) -> Result<(), NavDataError> {
        if self.listeners.remove(&index).is_some() {
            return Ok(());
        }
        Err(NavDataError::BadParameters(format!(
            "No subscription found with identifier {}!",
            index
        )))
    }

    /// Emits a value to all connected callbacks in connection order.
    pub fn emit(&mut self, value: &T) {
        for f in self.listeners.values_mut() {
            f(value);
        }
    }

    /// Connects a closure operating on shared state behind a mutex.
    ///
    /// A poisoned mutex skips the callback instead of panicking the emitter.
    pub fn connect_with_shared_state<S, F>(
        &mut self,
        state: Arc<Mutex<S>>,
        mut callback: F,
    ) -> NavSignalIndex
    where
        S: Send + 'static,
        F: FnMut(&mut S, &T) + Send + 'static,
    {
        self.connect(move |event| {
            if let Ok(mut guard) = state.lock() {
                callback(&mut *guard, event);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn disconnect_all(&mut self) {
        self.listeners.clear();
    }
}

impl<T> Default for NavSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for NavSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavSignal")
            .field("listener_count", &self.listeners.len())
            .field("next_index", &self.next_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_unknown_index_fails() {
        let mut signal: NavSignal<u8> = NavSignal::new();
        let handle = signal.connect(|_| {});
        assert!(signal.disconnect(handle).is_ok());
        assert!(signal.disconnect(handle).is_err());
    }

    #[test]
    fn test_shared_state_listener() {
        let counter = Arc::new(Mutex::new(0u32));
        let mut signal = NavSignal::new();
        signal.connect_with_shared_state(Arc::clone(&counter), |count, value: &u32| {
            *count += *value;
        });

        signal.emit(&2);
        signal.emit(&3);
        assert_eq!(*counter.lock().unwrap(), 5);
        assert_eq!(signal.listener_count(), 1);

        signal.disconnect_all();
        signal.emit(&10);
        assert_eq!(*counter.lock().unwrap(), 5);
    }
}
