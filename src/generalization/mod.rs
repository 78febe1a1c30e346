// src/generalization/mod.rs

pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod sink;
pub mod sweep;

pub use self::config::{
    GeneralizationConfig, GeneralizationPolicy, Parameter, ParameterRange, ParameterSweep,
    ResampleSimplifySmoothPolicy, SweepPlan,
};
pub use self::metrics::{Metrics, MetricsDelta, PercentageChange, measure, percentage_change};
pub use self::pipeline::{
    GeneralizationPipeline, PolygonOutcome, Rejection, RejectionReason, SweepResult,
    run_configuration,
};
pub use self::sink::{FanOutSink, MemorySink, SweepSink};
pub use self::sweep::{
    CancellationToken, ProcessingMode, SweepError, SweepRunner, SweepSummary,
};
