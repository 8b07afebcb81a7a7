//! Span bracketing for store operations.
//!
//! [`traced`] runs an operation future inside a span and records the final
//! status on it. The span is entered only while the future is polled and
//! closes when the last handle drops, so an abandoned future still closes
//! its span. The operation result is returned untouched.

use std::future::Future;

use tracing::field::{Empty, display};
use tracing::{Instrument, Span, debug, warn};

use crate::error::{ErrorCategory, StoreError};

/// Creates the span for one store operation.
///
/// `operation` becomes the exported span name through `otel.name`.
pub fn operation_span(
    operation: &'static str,
    system: &'static str,
    collection: &str,
    id: Option<&str>,
) -> Span {
    let span = tracing::info_span!(
        "db.operation",
        otel.name = operation,
        otel.kind = "client",
        db.system = system,
        db.collection = %collection,
        entry.id = Empty,
        otel.status_code = Empty,
        otel.status_message = Empty,
        error.kind = Empty,
    );
    if let Some(id) = id {
        span.record("entry.id", id);
    }
    span
}

/// Runs `fut` in `span`, then records `OK` with `describe(value)` or
/// `ERROR` with the error text.
pub async fn traced<T, F, D>(span: Span, fut: F, describe: D) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
    D: FnOnce(&T) -> String,
{
    let result = fut.instrument(span.clone()).await;
    match &result {
        Ok(value) => {
            let message = describe(value);
            span.record("otel.status_code", "OK");
            span.record("otel.status_message", message.as_str());
            debug!(parent: &span, outcome = %message, "store operation succeeded");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("otel.status_message", display(err));
            span.record("error.kind", display(err.category()));
            match err.category() {
                ErrorCategory::Transport => {
                    warn!(parent: &span, error = %err, "store operation failed")
                }
                _ => debug!(parent: &span, error = %err, "store operation rejected"),
            }
        }
    }
    result
}

/// Outcome message for multi-document reads.
pub(crate) fn found(count: usize) -> String {
    match count {
        1 => "Found 1 document".to_string(),
        n => format!("Found {n} documents"),
    }
}

#[cfg(test)]
pub(crate) mod capture {
    //! Minimal layer that snapshots span fields for assertions.

    use std::collections::HashMap;
    use std::fmt::Debug;
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::registry::LookupSpan;

    #[derive(Debug, Clone, Default)]
    pub struct CapturedSpan {
        pub fields: HashMap<String, String>,
        /// Messages of events emitted while this span was current.
        pub events: Vec<String>,
        pub closed: bool,
    }

    impl CapturedSpan {
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    #[derive(Default)]
    struct State {
        spans: Vec<CapturedSpan>,
        live: HashMap<u64, usize>,
    }

    #[derive(Clone, Default)]
    pub struct Capture {
        state: Arc<Mutex<State>>,
    }

    impl Capture {
        pub fn spans(&self) -> Vec<CapturedSpan> {
            self.state.lock().unwrap().spans.clone()
        }
    }

    struct Visitor<'a>(&'a mut HashMap<String, String>);

    impl Visit for Visitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_string(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            self.0.insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    impl<S> Layer<S> for Capture
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
            let mut captured = CapturedSpan::default();
            attrs.record(&mut Visitor(&mut captured.fields));
            let mut state = self.state.lock().unwrap();
            state.spans.push(captured);
            let index = state.spans.len() - 1;
            state.live.insert(id.into_u64(), index);
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
            let mut state = self.state.lock().unwrap();
            if let Some(&index) = state.live.get(&id.into_u64()) {
                values.record(&mut Visitor(&mut state.spans[index].fields));
            }
        }

        fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
            let Some(span) = ctx.event_span(event) else {
                return;
            };
            let mut fields = HashMap::new();
            event.record(&mut Visitor(&mut fields));
            let mut state = self.state.lock().unwrap();
            if let Some(&index) = state.live.get(&span.id().into_u64()) {
                let message = fields.remove("message").unwrap_or_default();
                state.spans[index].events.push(message);
            }
        }

        fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
            let mut state = self.state.lock().unwrap();
            if let Some(index) = state.live.remove(&id.into_u64()) {
                state.spans[index].closed = true;
            }
        }
    }
}
