//! Prometheus metrics for the prediction cycles

use prometheus::{
    Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub cycles_total: IntCounterVec,
    pub cycle_duration_seconds: HistogramVec,
    pub predictions_generated_total: IntCounter,
    pub evaluations_recorded_total: IntCounter,
    pub model_weight: GaugeVec,
    pub mean_absolute_error: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cycles_total = IntCounterVec::new(
            Opts::new("cycles_total", "Completed cycles by kind and outcome"),
            &["cycle", "outcome"],
        )?;
        let cycle_duration_seconds = HistogramVec::new(
            HistogramOpts::new("cycle_duration_seconds", "Cycle wall-clock duration")
                .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
            &["cycle"],
        )?;
        let predictions_generated_total = IntCounter::new(
            "predictions_generated_total",
            "Predictions emitted by the weekly cycle",
        )?;
        let evaluations_recorded_total = IntCounter::new(
            "evaluations_recorded_total",
            "Matured predictions scored against realized prices",
        )?;
        let model_weight = GaugeVec::new(
            Opts::new("model_weight", "Current ensemble weight per component"),
            &["component"],
        )?;
        let mean_absolute_error = Gauge::new(
            "model_mean_absolute_error",
            "Mean absolute price error of the last evaluated batch",
        )?;

        registry.register(Box::new(cycles_total.clone()))?;
        registry.register(Box::new(cycle_duration_seconds.clone()))?;
        registry.register(Box::new(predictions_generated_total.clone()))?;
        registry.register(Box::new(evaluations_recorded_total.clone()))?;
        registry.register(Box::new(model_weight.clone()))?;
        registry.register(Box::new(mean_absolute_error.clone()))?;

        Ok(Self {
            registry,
            cycles_total,
            cycle_duration_seconds,
            predictions_generated_total,
            evaluations_recorded_total,
            model_weight,
            mean_absolute_error,
        })
    }

    pub fn record_weights(&self, momentum: f64, volume: f64, sector: f64) {
        self.model_weight.with_label_values(&["momentum"]).set(momentum);
        self.model_weight.with_label_values(&["volume"]).set(volume);
        self.model_weight.with_label_values(&["sector"]).set(sector);
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
