//! Router metrics.
//!
//! # Metrics
//! - `router_lookups_total` (counter): lookups by outcome (hit, miss, corrupted)
//! - `router_layers_matched` (histogram): layers returned per successful lookup
//! - `router_registrations_total` (counter): registrations by kind
//!   (handler, middleware, scope)
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host picks the exporter
//! - A global switch lets a manifest turn recording off

use std::sync::atomic::{AtomicBool, Ordering};

use ::metrics::{counter, describe_counter, describe_histogram, histogram};

pub const LOOKUPS_TOTAL: &str = "router_lookups_total";
pub const LAYERS_MATCHED: &str = "router_layers_matched";
pub const REGISTRATIONS_TOTAL: &str = "router_registrations_total";

static ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Register metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!(LOOKUPS_TOTAL, "Route lookups by outcome");
    describe_histogram!(LAYERS_MATCHED, "Layers returned per lookup");
    describe_counter!(REGISTRATIONS_TOTAL, "Route registrations by kind");
}

pub fn record_lookup(layers: usize) {
    if !is_enabled() {
        return;
    }
    let outcome = if layers == 0 { "miss" } else { "hit" };
    counter!(LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(LAYERS_MATCHED).record(layers as f64);
}

pub fn record_lookup_corrupted() {
    if !is_enabled() {
        return;
    }
    counter!(LOOKUPS_TOTAL, "outcome" => "corrupted").increment(1);
}

pub fn record_registration(kind: &'static str) {
    if !is_enabled() {
        return;
    }
    counter!(REGISTRATIONS_TOTAL, "kind" => kind).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::SWITCH_LOCK;
    use crate::routing::router::{Router, Routes};
    use ::metrics::{
        with_local_recorder, Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName,
        Metadata, Recorder, SharedString, Unit,
    };
    use axum::http::Method;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    type Totals = Arc<Mutex<BTreeMap<String, f64>>>;

    /// Sums every counter increment and histogram sample per `name{labels}`.
    struct Entry {
        key: String,
        totals: Totals,
    }

    impl Entry {
        fn add(&self, value: f64) {
            let mut totals = self.totals.lock().unwrap();
            *totals.entry(self.key.clone()).or_default() += value;
        }
    }

    impl CounterFn for Entry {
        fn increment(&self, value: u64) {
            self.add(value as f64);
        }

        fn absolute(&self, value: u64) {
            self.totals
                .lock()
                .unwrap()
                .insert(self.key.clone(), value as f64);
        }
    }

    impl HistogramFn for Entry {
        fn record(&self, value: f64) {
            self.add(value);
        }
    }

    #[derive(Default)]
    struct TotalsRecorder {
        totals: Totals,
    }

    impl TotalsRecorder {
        fn entry(&self, key: &Key) -> Arc<Entry> {
            let labels: Vec<String> = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            Arc::new(Entry {
                key: format!("{}{{{}}}", key.name(), labels.join(",")),
                totals: Arc::clone(&self.totals),
            })
        }

        fn total(&self, key: &str) -> f64 {
            self.totals.lock().unwrap().get(key).copied().unwrap_or(0.0)
        }
    }

    impl Recorder for TotalsRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            Counter::from_arc(self.entry(key))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, key: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::from_arc(self.entry(key))
        }
    }

    #[test]
    fn test_records_lookups_and_registrations() {
        let _guard = SWITCH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_enabled(true);
        let recorder = TotalsRecorder::default();

        with_local_recorder(&recorder, || {
            let mut router = Router::default();
            router
                .middleware("", "log")
                .unwrap()
                .get("/x", "h")
                .unwrap();
            router.lookup(&Method::GET, "/x", None).unwrap();
            router.lookup(&Method::GET, "/y", None).unwrap();
            record_lookup_corrupted();
        });

        assert_eq!(recorder.total("router_registrations_total{kind=middleware}"), 1.0);
        assert_eq!(recorder.total("router_registrations_total{kind=handler}"), 1.0);
        assert_eq!(recorder.total("router_lookups_total{outcome=hit}"), 1.0);
        assert_eq!(recorder.total("router_lookups_total{outcome=miss}"), 1.0);
        assert_eq!(recorder.total("router_lookups_total{outcome=corrupted}"), 1.0);
        // Layer counts of both lookups: 2 + 0
        assert_eq!(recorder.total("router_layers_matched{}"), 2.0);
    }

    #[test]
    fn test_disabled_switch_records_nothing() {
        let _guard = SWITCH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let recorder = TotalsRecorder::default();

        set_enabled(false);
        with_local_recorder(&recorder, || {
            record_lookup(3);
            record_lookup_corrupted();
            record_registration("handler");
        });
        set_enabled(true);

        assert!(recorder.totals.lock().unwrap().is_empty());
        assert!(is_enabled());
    }
}
