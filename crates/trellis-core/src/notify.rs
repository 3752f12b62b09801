//! Notification bus for widget-internal coordination.
//!
//! The bus is the backbone optional modules use instead of direct calls:
//! they subscribe to named events during construction, publish payloads at
//! action time, and never hold references to sibling modules.
//!
//! # Key Types
//!
//! - [`NotifyBus`] - Subscribe/unsubscribe/publish keyed by event name
//! - [`HandlerId`] - Unique identifier returned when subscribing
//! - [`NotifyArgs`](crate::NotifyArgs) - The mutable payload handlers share
//!
//! # Dispatch contract
//!
//! - Handlers for one event fire in subscription order.
//! - A handler subscribed during a dispatch of the same event is not
//!   invoked in that pass; dispatch iterates a snapshot.
//! - A handler unsubscribed mid-dispatch fires in no later position of the
//!   current pass and never again afterwards.
//! - Publishing from within a handler is permitted and runs depth-first
//!   before the outer dispatch resumes.
//! - There is no queuing and no deferral. The bus is synchronous; any
//!   deferred work is scheduled by the caller outside the bus.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::NotifyArgs;
use crate::logging::targets;

new_key_type! {
    /// A unique identifier for one event subscription.
    ///
    /// Returned by [`NotifyBus::subscribe`]; removal matches the event name
    /// together with this id, so the same closure can be registered under
    /// several events and removed from each independently.
    pub struct HandlerId;
}

type Handler = Arc<dyn Fn(&mut NotifyArgs) + Send + Sync>;

#[derive(Default)]
struct BusState {
    handlers: SlotMap<HandlerId, Handler>,
    /// Per-event invocation order. Insertion order is dispatch order.
    order: HashMap<&'static str, Vec<HandlerId>>,
}

/// Synchronous notification bus, one per widget instance.
pub struct NotifyBus {
    state: Mutex<BusState>,
}

impl Default for NotifyBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyBus {
    /// Create a bus with no subscriptions.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BusState::default()),
        }
    }

    /// Subscribe a handler to a named event.
    ///
    /// Returns the id needed to unsubscribe this registration.
    pub fn subscribe<F>(&self, event: &'static str, handler: F) -> HandlerId
    where
        F: Fn(&mut NotifyArgs) + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        let id = state.handlers.insert(Arc::new(handler));
        state.order.entry(event).or_default().push(id);
        tracing::trace!(target: targets::NOTIFY, event, ?id, "subscribed");
        id
    }

    /// Remove one subscription. Both the event name and the id must match.
    ///
    /// Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, event: &str, id: HandlerId) -> bool {
        let mut state = self.state.lock();
        let Some(ids) = state.order.get_mut(event) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|&existing| existing == id) else {
            return false;
        };
        ids.remove(pos);
        state.handlers.remove(id);
        tracing::trace!(target: targets::NOTIFY, event, ?id, "unsubscribed");
        true
    }

    /// Publish an event, invoking every live handler in subscription order.
    ///
    /// Fire-and-forget: nothing propagates back to the publisher except
    /// mutations handlers make to `args`.
    pub fn publish(&self, event: &str, args: &mut NotifyArgs) {
        let snapshot: Vec<(HandlerId, Handler)> = {
            let state = self.state.lock();
            let Some(ids) = state.order.get(event) else {
                return;
            };
            ids.iter()
                .filter_map(|&id| state.handlers.get(id).map(|h| (id, h.clone())))
                .collect()
        };
        tracing::trace!(target: targets::NOTIFY, event, handlers = snapshot.len(), "publish");

        for (id, handler) in snapshot {
            // Skip handlers removed earlier in this same pass.
            let live = self.state.lock().handlers.contains_key(id);
            if live {
                handler(args);
            }
        }
    }

    /// Synchronous query variant of [`publish`](Self::publish).
    ///
    /// Used when the publisher needs a module to compute and write a result
    /// into the shared payload before the call returns, e.g. a cancel veto
    /// or a disabled-state answer. The payload is returned with whatever
    /// the handlers wrote into it.
    pub fn request(&self, event: &str, mut args: NotifyArgs) -> NotifyArgs {
        self.publish(event, &mut args);
        args
    }

    /// Number of live subscriptions for one event.
    pub fn handler_count(&self, event: &str) -> usize {
        let state = self.state.lock();
        state
            .order
            .get(event)
            .map(|ids| {
                ids.iter()
                    .filter(|&&id| state.handlers.contains_key(id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Drop every subscription. Teardown only.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.handlers.clear();
        state.order.clear();
    }
}

static_assertions::assert_impl_all!(NotifyBus: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const EVENT: &str = "test";

    #[test]
    fn test_handlers_fire_in_subscription_order() {
        let bus = NotifyBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            bus.subscribe(EVENT, move |_| seen.lock().push(tag));
        }

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_requires_matching_event_and_id() {
        let bus = NotifyBus::new();
        let id = bus.subscribe(EVENT, |_| {});

        assert!(!bus.unsubscribe("other", id));
        assert!(bus.unsubscribe(EVENT, id));
        assert!(!bus.unsubscribe(EVENT, id));
        assert_eq!(bus.handler_count(EVENT), 0);
    }

    #[test]
    fn test_same_closure_under_multiple_events() {
        let bus = NotifyBus::new();
        let count = Arc::new(Mutex::new(0));

        let ids: Vec<HandlerId> = ["a", "b"]
            .iter()
            .map(|&event| {
                let count = count.clone();
                bus.subscribe(event, move |_| *count.lock() += 1)
            })
            .collect();

        bus.publish("a", &mut NotifyArgs::new());
        bus.publish("b", &mut NotifyArgs::new());
        assert_eq!(*count.lock(), 2);

        assert!(bus.unsubscribe("a", ids[0]));
        bus.publish("a", &mut NotifyArgs::new());
        bus.publish("b", &mut NotifyArgs::new());
        assert_eq!(*count.lock(), 3);
    }

    #[test]
    fn test_handler_added_during_dispatch_not_invoked_in_same_pass() {
        let bus = Arc::new(NotifyBus::new());
        let late_calls = Arc::new(Mutex::new(0));

        {
            let bus = bus.clone();
            let late_calls = late_calls.clone();
            bus.clone().subscribe(EVENT, move |_| {
                let late_calls = late_calls.clone();
                bus.subscribe(EVENT, move |_| *late_calls.lock() += 1);
            });
        }

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*late_calls.lock(), 0);

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*late_calls.lock(), 1);
    }

    #[test]
    fn test_handler_removed_mid_dispatch_does_not_fire() {
        let bus = Arc::new(NotifyBus::new());
        let victim_calls = Arc::new(Mutex::new(0));

        let victim_id = {
            let victim_calls = victim_calls.clone();
            bus.subscribe(EVENT, move |_| *victim_calls.lock() += 1)
        };
        // Removes the earlier handler; victim was subscribed first so it
        // already fired this pass, but must not fire in the next one.
        let remover_bus = bus.clone();
        bus.subscribe(EVENT, move |_| {
            remover_bus.unsubscribe(EVENT, victim_id);
        });

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*victim_calls.lock(), 1);

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*victim_calls.lock(), 1);
    }

    #[test]
    fn test_removal_of_later_handler_takes_effect_in_current_pass() {
        let bus = Arc::new(NotifyBus::new());
        let victim_calls = Arc::new(Mutex::new(0));

        let victim_id_slot: Arc<Mutex<Option<HandlerId>>> = Arc::new(Mutex::new(None));
        {
            let remover_bus = bus.clone();
            let slot = victim_id_slot.clone();
            bus.subscribe(EVENT, move |_| {
                if let Some(id) = *slot.lock() {
                    remover_bus.unsubscribe(EVENT, id);
                }
            });
        }
        let victim_id = {
            let victim_calls = victim_calls.clone();
            bus.subscribe(EVENT, move |_| *victim_calls.lock() += 1)
        };
        *victim_id_slot.lock() = Some(victim_id);

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert_eq!(*victim_calls.lock(), 0);
    }

    #[test]
    fn test_reentrant_publish_runs_depth_first() {
        let bus = Arc::new(NotifyBus::new());
        let trace = Arc::new(Mutex::new(Vec::new()));

        {
            let trace = trace.clone();
            bus.subscribe("inner", move |_| trace.lock().push("inner"));
        }
        {
            let bus_inner = bus.clone();
            let trace = trace.clone();
            bus.subscribe("outer", move |_| {
                trace.lock().push("outer-before");
                bus_inner.publish("inner", &mut NotifyArgs::new());
                trace.lock().push("outer-after");
            });
        }
        {
            let trace = trace.clone();
            bus.subscribe("outer", move |_| trace.lock().push("outer-second"));
        }

        bus.publish("outer", &mut NotifyArgs::new());
        assert_eq!(
            *trace.lock(),
            vec!["outer-before", "inner", "outer-after", "outer-second"]
        );
    }

    #[test]
    fn test_request_returns_written_payload() {
        let bus = NotifyBus::new();
        bus.subscribe(EVENT, |args| {
            args.disabled = true;
            args.cancel = true;
        });

        let args = bus.request(EVENT, NotifyArgs::new());
        assert!(args.disabled);
        assert!(args.cancel);
    }

    #[test]
    fn test_payload_mutation_visible_to_later_handlers() {
        let bus = NotifyBus::new();
        bus.subscribe(EVENT, |args| args.cancel = true);
        let observed = Arc::new(Mutex::new(false));
        {
            let observed = observed.clone();
            bus.subscribe(EVENT, move |args| *observed.lock() = args.cancel);
        }

        bus.publish(EVENT, &mut NotifyArgs::new());
        assert!(*observed.lock());
    }

    #[test]
    fn test_clear_drops_all_subscriptions() {
        let bus = NotifyBus::new();
        for _ in 0..4 {
            bus.subscribe(EVENT, |_| {});
        }
        assert_eq!(bus.handler_count(EVENT), 4);
        bus.clear();
        assert_eq!(bus.handler_count(EVENT), 0);
    }

    #[test]
    fn test_publish_unknown_event_is_noop() {
        let bus = NotifyBus::new();
        bus.publish("nobody-home", &mut NotifyArgs::new());
    }
}
