//! The freeze module.
//!
//! Substitutes split-pane renderers for the header and content targets
//! when columns are frozen. The substitution happens during `initialLoad`,
//! before the host registers its defaults, so the first-write-wins
//! renderer factory selects the freeze variants without the host knowing
//! the module exists. With frozen rows, the module additionally forwards
//! header double-clicks to the plain `dblclick` stream once the header is
//! in place.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use trellis_core::{
    ActionModule, HandlerId, ModuleKind, ModuleState, NotifyArgs, RenderTarget, RendererFactory,
    events,
};

use crate::grid::{Grid, GridWeak};
use crate::render::{FreezeContentRender, FreezeHeaderRender, Renderer};
use crate::services::names;

const TARGET: &str = "trellis_grid::freeze";

struct FreezeInner {
    lifecycle: ModuleState,
    subs: Vec<(&'static str, HandlerId)>,
}

/// Optional module implementing frozen columns and rows.
pub struct Freeze {
    grid: GridWeak,
    me: Weak<Freeze>,
    state: Mutex<FreezeInner>,
}

impl Freeze {
    pub(crate) fn construct(grid: &Grid) -> Arc<Self> {
        let module = Arc::new_cyclic(|me| Self {
            grid: grid.downgrade(),
            me: me.clone(),
            state: Mutex::new(FreezeInner {
                lifecycle: ModuleState::Uninitialized,
                subs: Vec::new(),
            }),
        });
        module.add_event_listener();
        module
    }

    fn mark_active(&self) {
        let mut state = self.state.lock();
        if state.lifecycle == ModuleState::Subscribed {
            state.lifecycle = ModuleState::Active;
        }
    }

    /// Claim the header and content render targets before the defaults
    /// register.
    fn on_initial_load(&self) {
        self.mark_active();
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.frozen_columns() == 0 {
            return;
        }
        let factory = match grid
            .locator()
            .get::<RendererFactory<dyn Renderer>>(names::RENDERER_FACTORY)
        {
            Ok(factory) => factory,
            Err(error) => {
                tracing::error!(target: TARGET, %error, "renderer factory unavailable");
                return;
            }
        };
        factory.add_renderer(RenderTarget::Header, Arc::new(FreezeHeaderRender));
        factory.add_renderer(RenderTarget::Content, Arc::new(FreezeContentRender));
        tracing::debug!(
            target: TARGET,
            frozen_columns = grid.frozen_columns(),
            "split-pane renderers registered"
        );
    }

    /// With frozen rows, the frozen header pane captures double-clicks;
    /// republish them on the plain stream so listeners need not know about
    /// the split.
    fn on_initial_end(&self) {
        self.mark_active();
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.frozen_rows() == 0 {
            return;
        }
        let weak = self.grid.clone();
        if let Some(id) = grid.on(events::HEADER_DBLCLICK, move |args| {
            if let Some(grid) = weak.upgrade() {
                let mut forwarded = NotifyArgs::new();
                forwarded.column_field = args.column_field.clone();
                grid.notify(events::DBLCLICK, &mut forwarded);
            }
        }) {
            self.state.lock().subs.push((events::HEADER_DBLCLICK, id));
        }
    }

    fn subscribe<F>(&self, grid: &Grid, event: &'static str, handler: F)
    where
        F: Fn(&Freeze) + Send + Sync + 'static,
    {
        let me = self.me.clone();
        if let Some(id) = grid.on(event, move |_| {
            if let Some(module) = me.upgrade() {
                handler(&module);
            }
        }) {
            self.state.lock().subs.push((event, id));
        }
    }
}

impl ActionModule for Freeze {
    fn module_kind(&self) -> ModuleKind {
        ModuleKind::Freeze
    }

    fn add_event_listener(&self) {
        let Some(grid) = self.grid.upgrade() else {
            return;
        };
        if grid.is_destroyed() || self.state.lock().lifecycle != ModuleState::Uninitialized {
            return;
        }
        self.subscribe(&grid, events::INITIAL_LOAD, |module| module.on_initial_load());
        self.subscribe(&grid, events::INITIAL_END, |module| module.on_initial_end());
        self.subscribe(&grid, events::DESTROY, |module| module.destroy());
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

static_assertions::assert_impl_all!(Freeze: Send, Sync);
