//! Renderer selection for the host widget's render targets.
//!
//! The factory maps each render target to exactly one registered rendering
//! strategy. Registration is first-write-wins: an optional module that
//! reacts to the `initialLoad` event can substitute its own renderer for a
//! target before the host registers the default, and the later default
//! registration becomes a no-op.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CoreError, Result};
use crate::logging::targets;

/// The fixed set of render targets a grid widget is composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    Header,
    Content,
    Footer,
}

impl RenderTarget {
    /// Stable string key used in traces and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Content => "content",
            Self::Footer => "footer",
        }
    }

    /// Every target, in render-pass order.
    pub const ALL: [RenderTarget; 3] = [Self::Header, Self::Content, Self::Footer];
}

impl std::fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target-to-renderer map with idempotent registration.
///
/// Generic over the renderer trait object so the coordination core stays
/// free of any drawing vocabulary; the host crate instantiates this as
/// `RendererFactory<dyn Renderer>` and registers it as a service.
pub struct RendererFactory<R: ?Sized> {
    renderers: RwLock<HashMap<RenderTarget, Arc<R>>>,
}

impl<R: ?Sized> Default for RendererFactory<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> RendererFactory<R> {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            renderers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a renderer for `target` unless one is already registered.
    ///
    /// First write wins; later calls for the same target are silently
    /// ignored. This is the idempotent race substitution modules rely on.
    pub fn add_renderer(&self, target: RenderTarget, renderer: Arc<R>) {
        let mut renderers = self.renderers.write();
        if renderers.contains_key(&target) {
            tracing::trace!(target: targets::RENDERER, render_target = %target, "already registered, ignoring");
            return;
        }
        tracing::trace!(target: targets::RENDERER, render_target = %target, "renderer registered");
        renderers.insert(target, renderer);
    }

    /// Look up the renderer for `target`.
    ///
    /// Fails with [`CoreError::RendererNotRegistered`] if none was ever
    /// added. That is a fatal configuration error; the render pass that
    /// needed the renderer must abort.
    pub fn get_renderer(&self, target: RenderTarget) -> Result<Arc<R>> {
        self.renderers
            .read()
            .get(&target)
            .cloned()
            .ok_or(CoreError::RendererNotRegistered { target })
    }

    /// Whether a renderer is registered for `target`.
    pub fn has_renderer(&self, target: RenderTarget) -> bool {
        self.renderers.read().contains_key(&target)
    }

    /// Drop every registration. Teardown only.
    pub fn clear(&self) {
        self.renderers.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Probe: Send + Sync {
        fn tag(&self) -> &'static str;
    }

    struct Tagged(&'static str);

    impl Probe for Tagged {
        fn tag(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_first_registration_wins() {
        let factory: RendererFactory<dyn Probe> = RendererFactory::new();
        factory.add_renderer(RenderTarget::Header, Arc::new(Tagged("frozen")));
        factory.add_renderer(RenderTarget::Header, Arc::new(Tagged("default")));

        let renderer = factory.get_renderer(RenderTarget::Header).unwrap();
        assert_eq!(renderer.tag(), "frozen");
    }

    #[test]
    fn test_missing_renderer_is_typed_error() {
        let factory: RendererFactory<dyn Probe> = RendererFactory::new();
        let err = factory.get_renderer(RenderTarget::Footer).err().unwrap();
        assert!(matches!(
            err,
            CoreError::RendererNotRegistered {
                target: RenderTarget::Footer
            }
        ));
    }

    #[test]
    fn test_targets_are_independent() {
        let factory: RendererFactory<dyn Probe> = RendererFactory::new();
        factory.add_renderer(RenderTarget::Header, Arc::new(Tagged("header")));
        factory.add_renderer(RenderTarget::Content, Arc::new(Tagged("content")));

        assert_eq!(
            factory.get_renderer(RenderTarget::Header).unwrap().tag(),
            "header"
        );
        assert_eq!(
            factory.get_renderer(RenderTarget::Content).unwrap().tag(),
            "content"
        );
        assert!(!factory.has_renderer(RenderTarget::Footer));
    }
}
