//! Type-indexed publish/subscribe event bus.
//!
//! Systems subscribe handlers to event types and other systems emit events,
//! so neither side has to know about the other. Dispatch is synchronous:
//! [`EventBus::emit`] returns only after every handler has run.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Objects of this trait represent *event* which could be emitted through the [`EventBus`].
///
/// Events are distinguished by their type only.
///
pub trait Event: Any {}

impl<T> Event for T where T: Any {}

type Handler<C> = Box<dyn FnMut(&mut dyn Any, &mut C)>;

/// Registry of event handlers, keyed by event type.
///
/// Every handler receives the emitted event and a mutable context `C`
/// (for the game it is the [`Registry`](crate::Registry)),
/// so handlers can change the world without holding references to it.
///
pub struct EventBus<C = ()> {
    subscribers: HashMap<TypeId, Vec<Handler<C>>>,
}

impl<C> EventBus<C>
where
    C: 'static,
{
    /// Creates event bus without any subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    /// Subscribes handler to events of type `E`.
    ///
    /// Handlers are invoked in order of subscription.
    ///
    pub fn subscribe<E, F>(&mut self, mut handler: F)
    where
        E: Event,
        F: FnMut(&mut E, &mut C) + 'static,
    {
        let handler: Handler<C> = Box::new(move |event, context| {
            if let Some(event) = event.downcast_mut::<E>() {
                handler(event, context)
            }
        });
        self.subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(handler);
    }

    /// Subscribes method of the owner instance to events of type `E`.
    ///
    /// If the owner is already borrowed when the event is emitted,
    /// this handler is skipped.
    ///
    pub fn subscribe_method<E, O>(
        &mut self,
        owner: Rc<RefCell<O>>,
        method: fn(&mut O, &mut E, &mut C),
    ) where
        E: Event,
        O: 'static,
    {
        self.subscribe(move |event: &mut E, context: &mut C| {
            match owner.try_borrow_mut() {
                Ok(mut owner) => method(&mut owner, event, context),
                Err(_) => log::error!(
                    "`{}` is borrowed, skipping its handler of `{}`",
                    type_name::<O>(),
                    type_name::<E>(),
                ),
            }
        });
    }

    /// Emits event, invoking all its handlers in order of subscription.
    ///
    /// All handlers see the same event instance, including changes made by previous handlers.
    /// Returns the event after the last handler has run.
    ///
    pub fn emit<E>(&mut self, mut event: E, context: &mut C) -> E
    where
        E: Event,
    {
        if let Some(handlers) = self.subscribers.get_mut(&TypeId::of::<E>()) {
            log::trace!(
                "emitting `{}` to {} handler(s)",
                type_name::<E>(),
                handlers.len(),
            );
            for handler in handlers.iter_mut() {
                handler(&mut event, context);
            }
        }
        event
    }

    /// Count of handlers subscribed to events of type `E`.
    pub fn subscriber_count<E>(&self) -> usize
    where
        E: Event,
    {
        self.subscribers
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Removes all handlers of all event types.
    pub fn reset(&mut self) {
        let handlers: usize = self.subscribers.values().map(Vec::len).sum();
        log::trace!("event bus reset, {} handler(s) removed", handlers);
        self.subscribers.clear();
    }
}

impl<C> Default for EventBus<C>
where
    C: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for EventBus<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let handlers: usize = self.subscribers.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("event_types", &self.subscribers.len())
            .field("handlers", &handlers)
            .finish()
    }
}
