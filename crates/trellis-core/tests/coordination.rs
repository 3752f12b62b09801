//! Integration test wiring the coordination pieces together the way a host
//! widget does: services registered once, a module that subscribes at
//! construction, a renderer substitution race, and teardown.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::{
    ActionModule, CapabilityRegistry, CoreError, HandlerId, ModuleKind, ModuleState, NotifyArgs,
    NotifyBus, RenderTarget, RendererFactory, ServiceLocator, events,
};

trait Renderer: Send + Sync {
    fn name(&self) -> &'static str;
}

struct NamedRenderer(&'static str);

impl Renderer for NamedRenderer {
    fn name(&self) -> &'static str {
        self.0
    }
}

/// Minimal host: the pieces a widget instance owns.
struct Host {
    bus: NotifyBus,
    locator: ServiceLocator,
    capabilities: CapabilityRegistry,
}

impl Host {
    fn new() -> Arc<Self> {
        let host = Arc::new(Self {
            bus: NotifyBus::new(),
            locator: ServiceLocator::new(),
            capabilities: CapabilityRegistry::new(),
        });
        let factory: Arc<RendererFactory<dyn Renderer>> = Arc::new(RendererFactory::new());
        host.locator.register("rendererFactory", factory).unwrap();
        host
    }

    fn factory(&self) -> Arc<RendererFactory<dyn Renderer>> {
        self.locator.get("rendererFactory").unwrap()
    }
}

/// A module that substitutes the header renderer on `initialLoad`, in the
/// manner of a freeze module.
struct Substituter {
    host: Arc<Host>,
    state: Mutex<ModuleState>,
    subs: Mutex<Vec<(&'static str, HandlerId)>>,
}

impl Substituter {
    fn construct(host: &Arc<Host>) -> Arc<Self> {
        let module = Arc::new_cyclic(|me: &std::sync::Weak<Self>| {
            let me = me.clone();
            let id = host.bus.subscribe(events::INITIAL_LOAD, move |_| {
                if let Some(module) = me.upgrade() {
                    module.on_initial_load();
                }
            });
            Self {
                host: host.clone(),
                state: Mutex::new(ModuleState::Subscribed),
                subs: Mutex::new(vec![(events::INITIAL_LOAD, id)]),
            }
        });
        host.capabilities.register(module.module_kind());
        module
    }

    fn on_initial_load(&self) {
        {
            let mut state = self.state.lock();
            if *state == ModuleState::Subscribed {
                *state = ModuleState::Active;
            }
        }
        self.host
            .factory()
            .add_renderer(RenderTarget::Header, Arc::new(NamedRenderer("frozen")));
    }
}

impl ActionModule for Substituter {
    fn module_kind(&self) -> ModuleKind {
        ModuleKind::Freeze
    }

    fn add_event_listener(&self) {}

    fn remove_event_listener(&self) {
        for (event, id) in self.subs.lock().drain(..) {
            self.host.bus.unsubscribe(event, id);
        }
    }

    fn destroy(&self) {
        let mut state = self.state.lock();
        if state.is_destroyed() {
            return;
        }
        *state = ModuleState::Destroyed;
        drop(state);
        self.remove_event_listener();
    }

    fn state(&self) -> ModuleState {
        *self.state.lock()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[test]
fn module_substitutes_renderer_before_defaults() {
    let host = Host::new();
    let module = Substituter::construct(&host);
    assert_eq!(module.state(), ModuleState::Subscribed);

    // Host lifecycle: initialLoad first, then default registration.
    host.bus
        .publish(events::INITIAL_LOAD, &mut NotifyArgs::new());
    let factory = host.factory();
    factory.add_renderer(RenderTarget::Header, Arc::new(NamedRenderer("default")));
    factory.add_renderer(RenderTarget::Content, Arc::new(NamedRenderer("default")));

    assert_eq!(module.state(), ModuleState::Active);
    assert_eq!(
        factory.get_renderer(RenderTarget::Header).unwrap().name(),
        "frozen"
    );
    assert_eq!(
        factory.get_renderer(RenderTarget::Content).unwrap().name(),
        "default"
    );
    assert!(matches!(
        factory.get_renderer(RenderTarget::Footer).err().unwrap(),
        CoreError::RendererNotRegistered {
            target: RenderTarget::Footer
        }
    ));
}

#[test]
fn capability_query_without_module_reference() {
    let host = Host::new();
    let _module = Substituter::construct(&host);

    assert!(host.capabilities.ensure_injected(ModuleKind::Freeze));
    assert!(!host.capabilities.ensure_injected(ModuleKind::Sort));
}

#[test]
fn destroy_is_idempotent_and_unsubscribes() {
    let host = Host::new();
    let module = Substituter::construct(&host);
    assert_eq!(host.bus.handler_count(events::INITIAL_LOAD), 1);

    module.destroy();
    module.destroy();
    assert!(module.state().is_destroyed());
    assert_eq!(host.bus.handler_count(events::INITIAL_LOAD), 0);

    // Events after destroy reach nothing; the default then wins the race.
    host.bus
        .publish(events::INITIAL_LOAD, &mut NotifyArgs::new());
    let factory = host.factory();
    factory.add_renderer(RenderTarget::Header, Arc::new(NamedRenderer("default")));
    assert_eq!(
        factory.get_renderer(RenderTarget::Header).unwrap().name(),
        "default"
    );
}

#[test]
fn locator_is_per_instance() {
    let first = Host::new();
    let second = Host::new();

    first
        .locator
        .register("marker", Arc::new(NamedRenderer("first")))
        .unwrap();
    assert!(matches!(
        second.locator.get::<NamedRenderer>("marker").err().unwrap(),
        CoreError::ServiceNotFound { .. }
    ));
}
