//! The contract optional feature modules satisfy to plug into a host widget.
//!
//! Every optional feature (search, sorting, column menu, freezing, ...)
//! implements [`ActionModule`]: it wires its bus subscriptions at
//! construction, reacts to events, and fully unsubscribes on destroy.
//! Modules never hold references to one another; cross-module presence is
//! discovered at event time through the [`CapabilityRegistry`].
//!
//! # Lifecycle
//!
//! `Uninitialized → Subscribed → Active → Destroyed`
//!
//! A module becomes `Subscribed` when `add_event_listener` completes,
//! `Active` the first time one of its handlers fires, and `Destroyed` once
//! `destroy` runs. `Destroyed` is terminal; re-subscribing afterwards is
//! not supported.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;

/// Identity of an optional module, used for capability queries and for
/// addressing a module's configuration section in event payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Search,
    ColumnMenu,
    Freeze,
    Sort,
    Group,
    Filter,
    Resize,
    ColumnChooser,
}

impl ModuleKind {
    /// Stable string key, matching the module's configuration section name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::ColumnMenu => "columnMenu",
            Self::Freeze => "freeze",
            Self::Sort => "sort",
            Self::Group => "group",
            Self::Filter => "filter",
            Self::Resize => "resize",
            Self::ColumnChooser => "columnChooser",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an [`ActionModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleState {
    #[default]
    Uninitialized,
    Subscribed,
    Active,
    Destroyed,
}

impl ModuleState {
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

/// Uniform lifecycle every optional feature module implements.
///
/// Construction wires subscriptions and must not touch any UI yet.
/// `add_event_listener` and `remove_event_listener` are idempotent and
/// no-op once the host widget is flagged destroyed. `destroy` removes the
/// listeners, releases any bus-external resources, and is safe to call
/// repeatedly.
pub trait ActionModule: Send + Sync {
    /// The stable identity other modules and events address this module by.
    fn module_kind(&self) -> ModuleKind;

    /// Wire this module's bus subscriptions. Idempotent.
    fn add_event_listener(&self);

    /// Remove this module's bus subscriptions. Idempotent.
    fn remove_event_listener(&self);

    /// Unsubscribe and release bus-external resources. Idempotent;
    /// transitions the module to its terminal state.
    fn destroy(&self);

    /// Current lifecycle state.
    fn state(&self) -> ModuleState;

    /// Downcast support for hosts that keep typed handles to their modules.
    fn as_any(&self) -> &dyn Any;

    /// Arc-preserving downcast support.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// The set of optional-module identities constructed for one widget
/// instance.
///
/// Queried by name at event time (`ensure_injected`), never iterated: a
/// module asks "is sorting present?" and adapts, without a compile-time
/// dependency on the sort module.
#[derive(Default)]
pub struct CapabilityRegistry {
    injected: RwLock<HashSet<ModuleKind>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a module of `kind` was constructed. Idempotent.
    pub fn register(&self, kind: ModuleKind) {
        self.injected.write().insert(kind);
    }

    /// Whether a module of `kind` was constructed for this instance.
    pub fn ensure_injected(&self, kind: ModuleKind) -> bool {
        self.injected.read().contains(&kind)
    }

    /// Drop every capability. Teardown only.
    pub fn clear(&self) {
        self.injected.write().clear();
    }
}

static_assertions::assert_impl_all!(CapabilityRegistry: Send, Sync);
