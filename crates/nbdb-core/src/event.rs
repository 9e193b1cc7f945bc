//! Per-model event subscription and dispatch.
//!
//! Every model owns an [`EventRegistry`] mapping event names to subscriber
//! sets. Controller applications subscribe at startup; the change-processing
//! loop emits after a storage operation succeeds. A failing subscriber is
//! logged and skipped: it never stops the others from being notified and
//! never surfaces to the emitter.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use nbdb_proto::Value;
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::config::DispatchConfig;
use crate::error::{Error, Result};
use crate::model::ModelClass;
use crate::record::Record;

/// Lifecycle event emitted after a record is created.
pub const CREATED: &str = "created";
/// Lifecycle event emitted after a record is updated.
pub const UPDATED: &str = "updated";
/// Lifecycle event emitted after a record is deleted.
pub const DELETED: &str = "deleted";

/// Error a subscriber may return.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

type CallbackFn = dyn Fn(&Record, &[EventArg]) -> std::result::Result<(), SubscriberError> + Send + Sync;

/// Payload item passed to subscribers alongside the emitting record.
#[derive(Debug, Clone, PartialEq)]
pub enum EventArg {
    /// A plain value.
    Value(Value),
    /// Another record, typically the previous version.
    Record(Record),
    /// Names of changed fields, as returned by [`Record::update`].
    Fields(BTreeSet<String>),
}

/// A named event subscriber.
///
/// Identity is the shared function: clones of one `Callback` are the same
/// subscriber, while two callbacks built from identical closures are not.
#[derive(Clone)]
pub struct Callback {
    name: Arc<str>,
    func: Arc<CallbackFn>,
}

impl Callback {
    /// Wrap a function as a subscriber. `name` identifies it in logs.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Record, &[EventArg]) -> std::result::Result<(), SubscriberError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    /// Subscriber name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, record: &Record, args: &[EventArg]) -> std::result::Result<(), SubscriberError> {
        (self.func)(record, args)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").field(&self.name).finish()
    }
}

/// Subscriber sets for one model, keyed by event name.
///
/// The registry does not know which events are declared; that is checked by
/// [`ModelClass`] before it delegates here. Subscriber lists are guarded by a
/// lock and dispatch runs on a snapshot, so subscribers may register or
/// unregister while an event is being delivered.
pub struct EventRegistry {
    owner: String,
    dispatch: DispatchConfig,
    subscribers: RwLock<HashMap<String, Vec<Callback>>>,
}

impl EventRegistry {
    /// Create an empty registry for the named model.
    pub fn new(owner: impl Into<String>, dispatch: DispatchConfig) -> Self {
        Self {
            owner: owner.into(),
            dispatch,
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Name of the model that created this registry.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Dispatch settings.
    pub fn dispatch(&self) -> &DispatchConfig {
        &self.dispatch
    }

    /// Add a subscriber. Registering the same callback twice is a no-op.
    pub fn register(&self, event: &str, callback: Callback) -> Callback {
        let mut subscribers = self.subscribers.write();
        let set = subscribers.entry(event.to_string()).or_default();
        if !set.contains(&callback) {
            debug!(model = %self.owner, event, subscriber = %callback.name(), "subscriber registered");
            set.push(callback.clone());
        }
        callback
    }

    /// Remove a subscriber.
    pub fn unregister(&self, event: &str, callback: &Callback) -> Result<()> {
        let mut subscribers = self.subscribers.write();
        let pos = subscribers
            .get(event)
            .and_then(|set| set.iter().position(|cb| cb == callback));

        match pos {
            Some(pos) => {
                if let Some(set) = subscribers.get_mut(event) {
                    set.remove(pos);
                }
                debug!(model = %self.owner, event, subscriber = %callback.name(), "subscriber unregistered");
                Ok(())
            }
            None => Err(Error::NotRegistered {
                model: self.owner.clone(),
                event: event.to_string(),
                subscriber: callback.name().to_string(),
            }),
        }
    }

    /// Subscribers of an event, in registration order.
    pub fn subscribers(&self, event: &str) -> Vec<Callback> {
        self.subscribers
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of subscribers of an event.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.read().get(event).map_or(0, Vec::len)
    }

    /// Deliver an event to every subscriber.
    ///
    /// Subscriber errors, and panics when `catch_panics` is enabled, are
    /// logged and dispatch moves on to the next subscriber. With
    /// `catch_panics` disabled a subscriber panic propagates to the caller.
    pub fn emit(&self, event: &str, record: &Record, args: &[EventArg]) {
        for callback in self.subscribers(event) {
            let outcome = if self.dispatch.catch_panics {
                match panic::catch_unwind(AssertUnwindSafe(|| callback.call(record, args))) {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(payload) => Err(format!("panicked: {}", panic_message(&*payload))),
                }
            } else {
                callback.call(record, args).map_err(|e| e.to_string())
            };

            if let Err(reason) = outcome {
                self.log_failure(event, record, &callback, args, &reason);
            }
        }
    }

    fn log_failure(
        &self,
        event: &str,
        record: &Record,
        callback: &Callback,
        args: &[EventArg],
        reason: &str,
    ) {
        if self.dispatch.log_args {
            error!(
                model = %record.model_name(),
                event,
                subscriber = %callback.name(),
                record = ?record,
                args = ?args,
                error = %reason,
                "error while calling event subscriber"
            );
        } else {
            error!(
                model = %record.model_name(),
                event,
                subscriber = %callback.name(),
                error = %reason,
                "error while calling event subscriber"
            );
        }
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("owner", &self.owner)
            .field("subscribers", &*self.subscribers.read())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Entry point for one declared event of a model.
///
/// Obtained from [`ModelClass::event`]; only declared events have handles,
/// so calls through a handle cannot name an unknown event.
#[derive(Debug, Clone, Copy)]
pub struct EventHandle<'a> {
    class: &'a ModelClass,
    event: &'a str,
}

impl<'a> EventHandle<'a> {
    pub(crate) fn new(class: &'a ModelClass, event: &'a str) -> Self {
        Self { class, event }
    }

    /// Event name.
    pub fn name(&self) -> &'a str {
        self.event
    }

    /// Model the event belongs to.
    pub fn class(&self) -> &'a ModelClass {
        self.class
    }

    /// Subscribe to this event. Returns the callback for later
    /// unregistration.
    pub fn register(&self, callback: Callback) -> Callback {
        self.class.event_registry().register(self.event, callback)
    }

    /// Unsubscribe from this event.
    pub fn unregister(&self, callback: &Callback) -> Result<()> {
        self.class.event_registry().unregister(self.event, callback)
    }

    /// Deliver this event for `record` to every subscriber.
    pub fn emit(&self, record: &Record, args: &[EventArg]) {
        self.class.event_registry().emit(self.event, record, args);
    }

    /// Current subscribers.
    pub fn subscribers(&self) -> Vec<Callback> {
        self.class.event_registry().subscribers(self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn router_class() -> Arc<ModelClass> {
        ModelBuilder::new("Router")
            .events([CREATED, UPDATED, "route_changed"])
            .build()
            .unwrap()
    }

    fn counter(name: &str, hits: &Arc<AtomicUsize>) -> Callback {
        let hits = Arc::clone(hits);
        Callback::new(name, move |_, _| {
            hits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn test_register_is_idempotent() {
        let class = router_class();
        let hits = Arc::new(AtomicUsize::new(0));
        let cb = counter("count", &hits);

        let handle = class.event(CREATED).unwrap();
        handle.register(cb.clone());
        handle.register(cb.clone());
        assert_eq!(handle.subscribers().len(), 1);

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        record.emit(CREATED, &[]).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_subscriber_is_isolated() {
        let class = router_class();
        let hits = Arc::new(AtomicUsize::new(0));

        let handle = class.event(UPDATED).unwrap();
        handle.register(Callback::new("broken", |_, _| Err("flow table full".into())));
        handle.register(counter("second", &hits));

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        handle.emit(&record, &[]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let class = router_class();
        let hits = Arc::new(AtomicUsize::new(0));

        let handle = class.event(UPDATED).unwrap();
        handle.register(Callback::new("panics", |_, _| panic!("boom")));
        handle.register(counter("second", &hits));

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        handle.emit(&record, &[]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_panics_propagate_when_not_caught() {
        let class = ModelBuilder::new("Router")
            .event(UPDATED)
            .dispatch_config(DispatchConfig::default().catch_panics(false))
            .build()
            .unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let handle = class.event(UPDATED).unwrap();
        handle.register(Callback::new("panics", |_, _| panic!("boom")));
        handle.register(counter("second", &hits));

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        handle.emit(&record, &[]);
    }

    #[test]
    fn test_unregister_boundary() {
        let class = router_class();
        let hits = Arc::new(AtomicUsize::new(0));
        let cb = counter("count", &hits);
        let handle = class.event(CREATED).unwrap();

        assert!(matches!(
            handle.unregister(&cb),
            Err(Error::NotRegistered { .. })
        ));

        handle.register(cb.clone());
        handle.unregister(&cb).unwrap();
        assert!(matches!(
            handle.unregister(&cb),
            Err(Error::NotRegistered { ref subscriber, .. }) if subscriber == "count"
        ));
    }

    #[test]
    fn test_identity_is_the_shared_function() {
        let a = Callback::new("same", |_, _| Ok(()));
        let b = Callback::new("same", |_, _| Ok(()));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_payload_reaches_subscriber() {
        let class = router_class();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        class
            .register(
                "route_changed",
                Callback::new("collect", move |record, args| {
                    sink.lock()
                        .unwrap()
                        .push((record.id().map(String::from), args.to_vec()));
                    Ok(())
                }),
            )
            .unwrap();

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        let args = [EventArg::Value(Value::from("10.100.0.0/16"))];
        record.emit("route_changed", &args).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("r1"));
        assert_eq!(seen[0].1, args.to_vec());
    }

    #[test]
    fn test_subscriber_may_unregister_during_dispatch() {
        let class = router_class();
        let slot: Arc<Mutex<Option<Callback>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let owner = Arc::clone(&class);

        let once = Callback::new("once", move |_, _| {
            if let Some(me) = inner.lock().unwrap().take() {
                owner.unregister(CREATED, &me)?;
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(class.register(CREATED, once).unwrap());

        let record = Record::new(&class, [("id", "r1")]).unwrap();
        record.emit(CREATED, &[]).unwrap();

        assert_eq!(class.event_registry().subscriber_count(CREATED), 0);
    }
}
