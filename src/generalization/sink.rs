// src/generalization/sink.rs

use crate::generalization::{metrics::Metrics, pipeline::SweepResult};
use crate::io::error::IoResult;

/// Empfänger der Sweep-Ergebnisse.
///
/// Ein Sink wird nur von einem einzigen Writer-Thread benutzt; `record` sieht die
/// Ergebnisse in Fertigstellungsreihenfolge, nicht in Konfigurationsreihenfolge.
pub trait SweepSink {
    /// Wird einmal vor dem ersten Ergebnis mit den Referenzwerten der Eingabe aufgerufen.
    fn begin(&mut self, reference: &Metrics) -> IoResult<()>;

    fn record(&mut self, result: &SweepResult) -> IoResult<()>;

    /// Nach dem letzten Ergebnis, z.B. zum Flushen
    fn finish(&mut self) -> IoResult<()> {
        Ok(())
    }
}

impl<S: SweepSink + ?Sized> SweepSink for Box<S> {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        (**self).begin(reference)
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        (**self).record(result)
    }

    fn finish(&mut self) -> IoResult<()> {
        (**self).finish()
    }
}

impl<S: SweepSink + ?Sized> SweepSink for &mut S {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        (**self).begin(reference)
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        (**self).record(result)
    }

    fn finish(&mut self) -> IoResult<()> {
        (**self).finish()
    }
}

/// Sammelt alle Ergebnisse im Speicher
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reference: Option<Metrics>,
    pub results: Vec<SweepResult>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SweepSink for MemorySink {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        self.reference = Some(*reference);
        Ok(())
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

/// Reicht jedes Ergebnis an mehrere Sinks weiter. Der erste Fehler bricht ab.
#[derive(Default)]
pub struct FanOutSink {
    sinks: Vec<Box<dyn SweepSink + Send>>,
}

impl FanOutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl SweepSink + Send + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl SweepSink for FanOutSink {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.begin(reference))
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.record(result))
    }

    fn finish(&mut self) -> IoResult<()> {
        self.sinks.iter_mut().try_for_each(|sink| sink.finish())
    }
}
