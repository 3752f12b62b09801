//! Coordination core for Trellis, an extensible tabular-display widget.
//!
//! A grid widget is a host plus a variable set of optional feature modules
//! (sorting, filtering, grouping, searching, column menus, freezing, ...).
//! The hard problem is not drawing cells; it is letting those modules
//! observe a shared model, react to a common lifecycle, and swap rendering
//! strategies without direct references to one another. This crate is that
//! coordination layer:
//!
//! - **Notification bus** ([`NotifyBus`]): synchronous subscribe/publish
//!   keyed by named events; the only lateral channel between modules
//! - **Service locator** ([`ServiceLocator`]): per-instance singletons
//!   (localization, renderer factory, ...), no process-wide state
//! - **Renderer factory** ([`RendererFactory`]): first-write-wins mapping
//!   from render target to rendering strategy
//! - **Module contract** ([`ActionModule`]): the uniform lifecycle every
//!   optional feature implements
//! - **Capability registry** ([`CapabilityRegistry`]): lets one module
//!   discover at event time whether another is present
//!
//! # Example
//!
//! ```
//! use trellis_core::{NotifyArgs, NotifyBus, events};
//!
//! let bus = NotifyBus::new();
//! let id = bus.subscribe(events::UI_UPDATE, |args| {
//!     args.disabled = true;
//! });
//!
//! let answer = bus.request(events::UI_UPDATE, NotifyArgs::new());
//! assert!(answer.disabled);
//! bus.unsubscribe(events::UI_UPDATE, id);
//! ```

pub mod args;
pub mod error;
pub mod events;
pub mod locator;
pub mod logging;
pub mod module;
pub mod notify;
pub mod renderer;

pub use args::{ActionPhase, NotifyArgs, RequestType};
pub use error::{CoreError, Result};
pub use locator::ServiceLocator;
pub use module::{ActionModule, CapabilityRegistry, ModuleKind, ModuleState};
pub use notify::{HandlerId, NotifyBus};
pub use renderer::{RenderTarget, RendererFactory};
