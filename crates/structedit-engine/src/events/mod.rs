//! # Events
//!
//! Named events with prioritized, synchronous listeners.
//!
//! Listeners for one event name run from the highest priority down; equal
//! priorities run in registration order. Any listener may
//! [`stop`](EventInfo::stop) the event, which skips everything after it.
//!
//! The registry only stores listeners. Dispatching needs the context the
//! listeners act on (usually the [`crate::Editor`] that owns the registry),
//! so [`EventRegistry::listeners`] hands out a snapshot that the owner
//! runs with [`dispatch`] while it is free to borrow itself mutably.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Listener priority. Named tiers map to fixed numbers; `Custom` slots in
/// anywhere between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    Highest,
    High,
    #[default]
    Normal,
    Low,
    Lowest,
    Custom(i32),
}

impl Priority {
    pub fn value(self) -> i32 {
        match self {
            Self::Highest => 100_000,
            Self::High => 1_000,
            Self::Normal => 0,
            Self::Low => -1_000,
            Self::Lowest => -100_000,
            Self::Custom(value) => value,
        }
    }
}

/// Bookkeeping for one occurrence of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventInfo {
    name: &'static str,
    stopped: bool,
}

impl EventInfo {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stopped: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Skip the remaining listeners of this occurrence.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

pub type Listener<C, E> = Rc<dyn Fn(&mut C, &mut EventInfo, &mut E)>;

struct Entry<C, E> {
    priority: i32,
    listener: Listener<C, E>,
}

impl<C, E> Clone for Entry<C, E> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            listener: Rc::clone(&self.listener),
        }
    }
}

/// Listeners per event name, kept sorted by priority.
pub struct EventRegistry<C, E> {
    listeners: HashMap<&'static str, Vec<Entry<C, E>>>,
}

impl<C, E> Default for EventRegistry<C, E> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<C, E> Clone for EventRegistry<C, E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<C, E> fmt::Debug for EventRegistry<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&str, usize)> = self
            .listeners
            .iter()
            .map(|(name, entries)| (*name, entries.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventRegistry")
            .field("listeners", &counts)
            .finish()
    }
}

impl<C, E> EventRegistry<C, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(
        &mut self,
        name: &'static str,
        priority: Priority,
        listener: impl Fn(&mut C, &mut EventInfo, &mut E) + 'static,
    ) {
        let priority = priority.value();
        let entries = self.listeners.entry(name).or_default();
        let index = entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(entries.len());
        entries.insert(
            index,
            Entry {
                priority,
                listener: Rc::new(listener),
            },
        );
    }

    /// The listeners of `name` in call order, as of now.
    pub fn listeners(&self, name: &str) -> Vec<Listener<C, E>> {
        self.listeners
            .get(name)
            .map(|entries| entries.iter().map(|e| Rc::clone(&e.listener)).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }
}

/// Run `listeners` over `context` and `event` until one stops the event.
pub fn dispatch<C, E>(
    context: &mut C,
    name: &'static str,
    listeners: Vec<Listener<C, E>>,
    event: &mut E,
) -> EventInfo {
    let mut info = EventInfo::new(name);
    for listener in listeners {
        listener(context, &mut info, event);
        if info.is_stopped() {
            break;
        }
    }
    info
}
