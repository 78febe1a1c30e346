// src/generalization/sweep.rs

use crate::generalization::{
    config::GeneralizationConfig, metrics::Metrics, pipeline::run_configuration,
    pipeline::SweepResult, sink::SweepSink,
};
use crate::io::error::IoError;
use crate::math::geometry::PolygonSet;
use crossbeam_channel::{Receiver, bounded};
use rayon::prelude::*;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::thread;
use thiserror::Error;
use tracing::{info, warn};

/// Ausführungsmodus für die Konfigurationen eines Sweeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel auf allen verfügbaren Kernen
    #[default]
    Parallel,
    /// Parallel mit fester Thread-Anzahl
    ParallelWith(usize),
}

impl ProcessingMode {
    /// `0` bedeutet: alle Kerne
    pub fn from_threads(threads: Option<usize>) -> Self {
        match threads {
            Some(1) => ProcessingMode::Sequential,
            Some(0) | None => ProcessingMode::Parallel,
            Some(n) => ProcessingMode::ParallelWith(n),
        }
    }

    /// Führt `f` für jedes Element aus, je nach Modus sequentiell oder über rayon.
    fn for_each<T, F>(&self, items: &[T], f: F) -> Result<(), rayon::ThreadPoolBuildError>
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => {
                items.iter().for_each(f);
            }
            ProcessingMode::Parallel => {
                items.par_iter().for_each(f);
            }
            ProcessingMode::ParallelWith(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build()?;
                pool.install(|| items.par_iter().for_each(f));
            }
        }
        Ok(())
    }
}

/// Kooperativer Abbruch zwischen Konfigurationen. Klone teilen denselben Zustand.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    /// An den Sink übergebene Konfigurationen
    pub completed: usize,
    /// Konfigurationen mit ungültigen Parametern
    pub failed: usize,
    /// Wegen Abbruch nicht gestartete Konfigurationen
    pub cancelled: usize,
}

impl SweepSummary {
    pub fn total(&self) -> usize {
        self.completed + self.failed + self.cancelled
    }
}

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Sink failed: {0}")]
    Sink(#[from] IoError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Result writer thread panicked")]
    WriterPanicked,
}

/// Führt viele Konfigurationen auf derselben Eingabe aus.
///
/// Die Eingabe wird von allen Workern nur gelesen. Jedes Ergebnis geht über einen
/// Kanal an genau einen Writer-Thread, dem der Sink gehört.
#[derive(Debug, Clone, Default)]
pub struct SweepRunner {
    mode: ProcessingMode,
    token: CancellationToken,
}

impl SweepRunner {
    pub fn new(mode: ProcessingMode) -> Self {
        Self {
            mode,
            token: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn run<S>(
        &self,
        input: &PolygonSet,
        reference: &Metrics,
        configs: &[GeneralizationConfig],
        sink: &mut S,
    ) -> Result<SweepSummary, SweepError>
    where
        S: SweepSink + Send + ?Sized,
    {
        sink.begin(reference)?;
        info!(
            configurations = configs.len(),
            polygons = input.len(),
            mode = ?self.mode,
            "Starting sweep"
        );

        let failed = AtomicUsize::new(0);
        let cancelled = AtomicUsize::new(0);
        let (sender, receiver) = bounded::<SweepResult>(configs.len().clamp(1, 64));

        let (pool_result, writer_result) = thread::scope(|scope| {
            let writer = scope.spawn(|| write_results(receiver, sink, &self.token));

            let pool_result = self.mode.for_each(configs, |config| {
                if self.token.is_cancelled() {
                    cancelled.fetch_add(1, Ordering::Relaxed);
                    return;
                }

                match run_configuration(input, config) {
                    Ok(result) => {
                        // Schlägt nur fehl, wenn der Writer bereits aufgegeben hat
                        if sender.send(result).is_err() {
                            cancelled.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Err(error) => {
                        warn!(config = %config, %error, "Configuration failed");
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
            drop(sender);

            (pool_result, writer.join())
        });

        pool_result?;
        let completed = writer_result.map_err(|_| SweepError::WriterPanicked)??;
        sink.finish()?;

        let summary = SweepSummary {
            completed,
            failed: failed.into_inner(),
            cancelled: cancelled.into_inner(),
        };
        info!(
            completed = summary.completed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            "Sweep finished"
        );
        Ok(summary)
    }
}

/// Schreibt alle Ergebnisse in den Sink. Bei einem Sink-Fehler wird der Sweep abgebrochen,
/// damit keine weiteren Konfigurationen mehr starten.
fn write_results<S>(
    receiver: Receiver<SweepResult>,
    sink: &mut S,
    token: &CancellationToken,
) -> Result<usize, IoError>
where
    S: SweepSink + ?Sized,
{
    let mut completed = 0;
    for result in receiver {
        if let Err(error) = sink.record(&result) {
            token.cancel();
            return Err(error);
        }
        completed += 1;
    }
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generalization::{
        config::{GeneralizationPolicy, Parameter, ParameterRange, ParameterSweep, SweepPlan},
        sink::MemorySink,
    };
    use crate::io::error::IoResult;
    use crate::math::{geometry::ShapeGenerators, types::Point2D};

    fn input() -> PolygonSet {
        PolygonSet::new(
            None,
            (0..4)
                .map(|i| {
                    ShapeGenerators::jittered_circle(
                        Point2D::new(i as f64 * 3000.0, 0.0),
                        800.0,
                        120,
                        30.0,
                        i,
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn configs() -> Vec<GeneralizationConfig> {
        SweepPlan::new(
            GeneralizationConfig::default(),
            ParameterSweep::new(Parameter::StepDistance, ParameterRange::new(50.0, 200.0, 50.0)),
        )
        .with_secondary(ParameterSweep::new(
            Parameter::Epsilon,
            ParameterRange::new(10.0, 30.0, 10.0),
        ))
        .configurations()
        .unwrap()
    }

    #[test]
    fn test_processing_mode_from_threads() {
        assert_eq!(ProcessingMode::from_threads(None), ProcessingMode::Parallel);
        assert_eq!(ProcessingMode::from_threads(Some(0)), ProcessingMode::Parallel);
        assert_eq!(ProcessingMode::from_threads(Some(1)), ProcessingMode::Sequential);
        assert_eq!(
            ProcessingMode::from_threads(Some(3)),
            ProcessingMode::ParallelWith(3)
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let input = input();
        let reference = Metrics::of_set(&input);
        let configs = configs();
        assert_eq!(configs.len(), 12);

        let mut sequential = MemorySink::new();
        let summary = SweepRunner::new(ProcessingMode::Sequential)
            .run(&input, &reference, &configs, &mut sequential)
            .unwrap();
        assert_eq!(summary.completed, 12);

        let mut parallel = MemorySink::new();
        let summary = SweepRunner::new(ProcessingMode::ParallelWith(4))
            .run(&input, &reference, &configs, &mut parallel)
            .unwrap();
        assert_eq!(summary, SweepSummary { completed: 12, failed: 0, cancelled: 0 });
        assert_eq!(parallel.reference, Some(reference));

        // Reihenfolge im Sink ist nicht festgelegt
        let mut by_label = parallel.results.clone();
        by_label.sort_by_key(|r| r.config.label());
        let mut expected = sequential.results.clone();
        expected.sort_by_key(|r| r.config.label());
        assert_eq!(by_label, expected);
    }

    #[test]
    fn test_invalid_configurations_are_counted() {
        let input = input();
        let mut configs = configs();
        configs.push(
            GeneralizationConfig::default()
                .with_parameter(Parameter::Epsilon, -1.0)
                .unwrap(),
        );

        let mut sink = MemorySink::new();
        let summary = SweepRunner::default()
            .run(&input, &Metrics::of_set(&input), &configs, &mut sink)
            .unwrap();
        assert_eq!(summary.completed, 12);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 13);
    }

    #[test]
    fn test_cancelled_before_start() {
        let input = input();
        let runner = SweepRunner::new(ProcessingMode::Sequential);
        runner.cancellation_token().cancel();

        let mut sink = MemorySink::new();
        let summary = runner
            .run(&input, &Metrics::default(), &configs(), &mut sink)
            .unwrap();
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.cancelled, 12);
        assert!(sink.results.is_empty());
    }

    struct FailingSink;

    impl SweepSink for FailingSink {
        fn begin(&mut self, _reference: &Metrics) -> IoResult<()> {
            Ok(())
        }

        fn record(&mut self, _result: &SweepResult) -> IoResult<()> {
            Err(IoError::Stream(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn test_sink_error_stops_sweep() {
        let input = input();
        let token = CancellationToken::new();
        let runner = SweepRunner::new(ProcessingMode::Sequential).with_cancellation(token.clone());

        let result = runner.run(&input, &Metrics::default(), &configs(), &mut FailingSink);
        assert!(matches!(result, Err(SweepError::Sink(_))));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_decimation_sweep() {
        let input = input();
        let base = GeneralizationConfig::new(GeneralizationPolicy::Decimation(
            crate::math::algorithms::DecimationPolicy::DistanceThreshold { threshold: 1.0 },
        ));
        let configs = SweepPlan::new(
            base,
            ParameterSweep::new(
                Parameter::DistanceThreshold,
                ParameterRange::new(25.0, 100.0, 25.0),
            ),
        )
        .configurations()
        .unwrap();

        let mut sink = MemorySink::new();
        let summary = SweepRunner::default()
            .run(&input, &Metrics::of_set(&input), &configs, &mut sink)
            .unwrap();
        assert_eq!(summary.completed, 4);
        assert!(sink.results.iter().all(|r| r.after.vertex_count <= r.before.vertex_count));
    }
}
