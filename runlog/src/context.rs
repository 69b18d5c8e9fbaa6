//! # Logging Context
//!
//! A [`LoggingContext`] is the built form of a [`LoggingConfig`]: live
//! handlers, the logger routing table, and the guards that keep file writers
//! flushing. It can be used two ways:
//!
//! - scoped, through [`LoggingContext::subscriber`] and
//!   `tracing::subscriber::with_default`, which is how tests drive it;
//! - process-wide, through [`LoggingContext::install`], after which every
//!   `tracing` event and [`crate::Logger`] call in the process goes through it.
//!
//! ## Routing
//!
//! Logger names are hierarchical, split on `.` or `::` (`jobs.train` and
//! `runlog::setup` both work). A record is sent to the handlers bound to the
//! most specific matching logger, then to each ancestor's handlers, stopping
//! at the first binding with `propagate: false`, and finally to the root.
//! The logger-level gate uses the level carried by the record itself (set by
//! [`crate::Logger`]), else the first explicit level along that chain, else
//! the root's, else `WARNING`.
//!
//! `TRACE` events are never dispatched. The layer also disables callsites
//! more verbose than the most verbose handler, so rejected events are not
//! turned into records at all.

use crate::config::{LoggerBinding, LoggingConfig};
use crate::error::Result;
use crate::handler::Handler;
use crate::record::LogRecord;
use crate::severity::Severity;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::subscriber::Interest;
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, Default)]
struct Route {
    level: Option<Severity>,
    handlers: Vec<usize>,
    propagate: bool,
}

#[derive(Debug, Default)]
struct Router {
    loggers: HashMap<String, Route>,
    root: Route,
}

impl Router {
    fn new(config: &LoggingConfig, index: &HashMap<&str, usize>) -> Self {
        let resolve = |binding: &LoggerBinding| Route {
            level: binding.level,
            handlers: binding
                .handlers
                .iter()
                .filter_map(|name| index.get(name.as_str()).copied())
                .collect(),
            propagate: binding.propagate,
        };
        Self {
            loggers: config
                .loggers
                .iter()
                .map(|(name, binding)| (name.clone(), resolve(binding)))
                .collect(),
            root: config.root.as_ref().map(resolve).unwrap_or_default(),
        }
    }

    /// Handler indices `record` must be delivered to, in binding order.
    fn route(&self, record: &LogRecord) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = Some(record.name.as_str());
        while let Some(name) = current {
            if let Some(route) = self.loggers.get(name) {
                chain.push(route);
            }
            current = parent_logger(name);
        }

        let level = record
            .logger_level
            .or_else(|| chain.iter().find_map(|route| route.level))
            .or(self.root.level)
            .unwrap_or(Severity::Warning);
        if !level.admits(record.severity) {
            return Vec::new();
        }

        let mut targets = Vec::new();
        let mut reaches_root = true;
        for route in chain {
            extend_unique(&mut targets, &route.handlers);
            if !route.propagate {
                reaches_root = false;
                break;
            }
        }
        if reaches_root {
            extend_unique(&mut targets, &self.root.handlers);
        }
        targets
    }
}

fn extend_unique(targets: &mut Vec<usize>, handlers: &[usize]) {
    for handler in handlers {
        if !targets.contains(handler) {
            targets.push(*handler);
        }
    }
}

/// `a::b.c` → `a::b` → `a` → none.
fn parent_logger(name: &str) -> Option<&str> {
    let dot = name.rfind('.');
    let colons = name.rfind("::");
    match (dot, colons) {
        (Some(d), Some(c)) if d > c => Some(&name[..d]),
        (_, Some(c)) => Some(&name[..c]),
        (Some(d), None) => Some(&name[..d]),
        (None, None) => None,
    }
    .filter(|parent| !parent.is_empty())
}

#[derive(Debug)]
pub(crate) struct Dispatch {
    handlers: Vec<Handler>,
    router: Router,
    /// Most verbose threshold among the handlers.
    max_severity: Option<Severity>,
}

impl Dispatch {
    fn new(handlers: Vec<Handler>, router: Router) -> Self {
        let max_severity = handlers.iter().map(Handler::level).max();
        Self {
            handlers,
            router,
            max_severity,
        }
    }

    /// Whether an event at `level` could reach any handler.
    fn accepts(&self, level: &Level) -> bool {
        *level != Level::TRACE
            && self
                .max_severity
                .is_some_and(|max| max.admits(Severity::from(*level)))
    }

    fn dispatch(&self, record: &LogRecord) {
        for index in self.router.route(record) {
            self.handlers[index].handle(record);
        }
    }
}

/// Built logging state for one run.
pub struct LoggingContext {
    dispatch: Arc<Dispatch>,
    guards: Vec<WorkerGuard>,
}

impl std::fmt::Debug for LoggingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingContext")
            .field("handlers", &self.dispatch.handlers)
            .field("file_writers", &self.guards.len())
            .finish()
    }
}

impl LoggingContext {
    /// Validate `config` and open every handler it declares.
    pub fn build(config: &LoggingConfig) -> Result<Self> {
        config.validate()?;

        let mut handlers = Vec::with_capacity(config.handlers.len());
        let mut guards = Vec::new();
        for (name, handler_config) in &config.handlers {
            let (handler, guard) = Handler::build(name, handler_config, &config.formatters)?;
            handlers.push(handler);
            guards.extend(guard);
        }

        let index: HashMap<&str, usize> = handlers
            .iter()
            .enumerate()
            .map(|(i, handler)| (handler.name(), i))
            .collect();
        let router = Router::new(config, &index);

        Ok(Self {
            dispatch: Arc::new(Dispatch::new(handlers, router)),
            guards,
        })
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.dispatch.handlers
    }

    pub fn handler(&self, name: &str) -> Option<&Handler> {
        self.dispatch.handlers.iter().find(|h| h.name() == name)
    }

    /// Route `record` to its handlers directly, bypassing `tracing`.
    pub fn dispatch(&self, record: &LogRecord) {
        self.dispatch.dispatch(record);
    }

    /// A `tracing` layer feeding this context.
    pub fn layer(&self) -> DispatchLayer {
        DispatchLayer {
            dispatch: Arc::clone(&self.dispatch),
        }
    }

    /// A standalone subscriber for scoped use with
    /// `tracing::subscriber::with_default`.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.layer())
    }

    /// Install as the process-wide subscriber, replacing any context
    /// installed earlier.
    pub fn install(self) -> Result<()> {
        crate::utils::logging::install(self)
    }

    pub(crate) fn into_parts(self) -> (DispatchLayer, Vec<WorkerGuard>) {
        let layer = self.layer();
        (layer, self.guards)
    }
}

/// Turns `tracing` events into [`LogRecord`]s and dispatches them.
#[derive(Debug, Clone)]
pub struct DispatchLayer {
    dispatch: Arc<Dispatch>,
}

impl<S: Subscriber> Layer<S> for DispatchLayer {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.dispatch.accepts(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.dispatch.accepts(metadata.level())
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // Callsite interest is shared by every live dispatcher, so an event
        // can arrive here even though `enabled` would have refused it.
        if !self.dispatch.accepts(event.metadata().level()) {
            return;
        }
        self.dispatch.dispatch(&LogRecord::from_event(event));
    }
}
