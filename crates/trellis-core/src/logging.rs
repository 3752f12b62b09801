//! Tracing integration for the coordination core.
//!
//! The core instruments itself with the `tracing` crate; no subscriber is
//! installed here. Applications that want log output install one
//! themselves, e.g. `tracing_subscriber::fmt::init()`.

/// Target names for log filtering, one per subsystem.
pub mod targets {
    /// Notification bus dispatch.
    pub const NOTIFY: &str = "trellis_core::notify";
    /// Service locator registration and lookup.
    pub const LOCATOR: &str = "trellis_core::locator";
    /// Renderer factory registration.
    pub const RENDERER: &str = "trellis_core::renderer";
    /// Module lifecycle transitions.
    pub const MODULE: &str = "trellis_core::module";
}
