//! The search module.
//!
//! Owns the search key in the grid's search settings and decides, per
//! request, between a full data re-bind (key changed) and a light refresh
//! (key unchanged). All coordination flows through the bus: the module
//! publishes `inBoundModelChanged` when it writes the key and reacts to the
//! same event to request the bind, so any listener can observe or veto the
//! settings change before data work starts.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use trellis_core::{
    ActionModule, ActionPhase, HandlerId, ModuleKind, ModuleState, NotifyArgs, RequestType, events,
};

use crate::grid::{Grid, GridWeak, PendingCommand};

const TARGET: &str = "trellis_grid::search";

struct SearchInner {
    lifecycle: ModuleState,
    subs: Vec<(&'static str, HandlerId)>,
}

/// Optional module implementing the search action.
pub struct Search {
    grid: GridWeak,
    me: Weak<Search>,
    state: Mutex<SearchInner>,
}

impl Search {
    pub(crate) fn construct(grid: &Grid) -> Arc<Self> {
        let module = Arc::new_cyclic(|me| Self {
            grid: grid.downgrade(),
            me: me.clone(),
            state: Mutex::new(SearchInner {
                lifecycle: ModuleState::Uninitialized,
                subs: Vec::new(),
            }),
        });
        module.add_event_listener();
        module
    }

    /// Search grid records by `key`.
    ///
    /// While a batch edit or another bind holds the grid, the request is
    /// captured as a pending command and replayed on `batchEnd`. A changed
    /// key raises `inBoundModelChanged` and rebinds; an unchanged key only
    /// refreshes, so repeating a search never costs a data round trip.
    pub fn search(&self, key: &str) {
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.is_destroyed() {
            return;
        }
        if grid.is_action_prevented() {
            tracing::debug!(target: TARGET, key, "search deferred, action prevented");
            grid.defer_command(PendingCommand::Search {
                key: key.to_owned(),
            });
            grid.notify(
                events::PREVENT_BATCH,
                &mut NotifyArgs::new().with_request_type(RequestType::Searching),
            );
            return;
        }
        if key == grid.search_key() {
            if let Err(error) = grid.refresh() {
                tracing::error!(target: TARGET, %error, "refresh after unchanged search key failed");
            }
            return;
        }
        grid.set_search_key(key);
    }

    fn mark_active(&self) {
        let mut state = self.state.lock();
        if state.lifecycle == ModuleState::Subscribed {
            state.lifecycle = ModuleState::Active;
        }
    }

    fn on_model_changed(&self, args: &mut NotifyArgs) {
        if args.module != Some(ModuleKind::Search) {
            return;
        }
        self.mark_active();
        if let Some(grid) = self.grid.upgrade() {
            grid.data_bind(RequestType::Searching);
        }
    }

    /// `searchComplete` is the module's private completion signal; the
    /// public surface is a regular `actionComplete`.
    fn on_search_complete(&self) {
        self.mark_active();
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        let mut args = NotifyArgs::for_module(ModuleKind::Search)
            .with_request_type(RequestType::Searching)
            .with_phase(ActionPhase::Complete)
            .with_search_string(grid.search_key());
        grid.notify(events::ACTION_COMPLETE, &mut args);
    }

    fn on_cancel_begin(&self, args: &mut NotifyArgs) {
        if args.request_type != Some(RequestType::Searching) {
            return;
        }
        self.mark_active();
        if let Some(grid) = self.grid.upgrade() {
            grid.reset_search_key();
        }
    }

    fn subscribe<F>(&self, grid: &Grid, event: &'static str, handler: F)
    where
        F: Fn(&Search, &mut NotifyArgs) + Send + Sync + 'static,
    {
        let me = self.me.clone();
        if let Some(id) = grid.on(event, move |args| {
            if let Some(module) = me.upgrade() {
                handler(&module, args);
            }
        }) {
            self.state.lock().subs.push((event, id));
        }
    }
}

impl ActionModule for Search {
    fn module_kind(&self) -> ModuleKind {
        ModuleKind::Search
    }

    fn add_event_listener(&self) {
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.is_destroyed() || self.state.lock().lifecycle != ModuleState::Uninitialized {
            return;
        }
        self.subscribe(&grid, events::IN_BOUND_MODEL_CHANGED, |module, args| {
            module.on_model_changed(args);
        });
        self.subscribe(&grid, events::SEARCH_COMPLETE, |module, _| {
            module.on_search_complete();
        });
        self.subscribe(&grid, events::CANCEL_BEGIN, |module, args| {
            module.on_cancel_begin(args);
        });
        self.subscribe(&grid, events::DESTROY, |module, _| module.destroy());
        self.state.lock().lifecycle = ModuleState::Subscribed;
    }

    fn remove_event_listener(&self) {
        let subs: Vec<_> = self.state.lock().subs.drain(..).collect();
        if let Some(grid) = self.grid.upgrade() {
            for (event, id) in subs {
                grid.off(event, id);
            }
        }
    }

    fn destroy(&self) {
        if self.state.lock().lifecycle.is_destroyed() {
            return;
        }
        self.remove_event_listener();
        self.state.lock().lifecycle = ModuleState::Destroyed;
    }

    fn state(&self) -> ModuleState {
        self.state.lock().lifecycle
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
        self
    }
}

static_assertions::assert_impl_all!(Search: Send, Sync);
