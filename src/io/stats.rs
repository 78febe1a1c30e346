// src/io/stats.rs

use crate::generalization::{Metrics, SweepResult, SweepSink};
use crate::io::error::{IoError, IoResult};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Schreibt die Statistik-Datei: zuerst die Referenzwerte der Eingabeschicht,
/// danach einen Block pro Konfiguration.
pub struct StatsFileSink<W: Write> {
    writer: W,
}

impl StatsFileSink<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> IoResult<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| IoError::at(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> StatsFileSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SweepSink for StatsFileSink<W> {
    fn begin(&mut self, reference: &Metrics) -> IoResult<()> {
        let w = &mut self.writer;
        writeln!(w, "Reference values of the input layer:")?;
        writeln!(w, "Total area: {:.2}", reference.total_area)?;
        writeln!(w, "Total perimeter: {:.2}", reference.perimeter)?;
        writeln!(w, "Total vertex count: {}", reference.vertex_count)?;
        writeln!(w)?;
        Ok(())
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        let w = &mut self.writer;
        let (before, after, deltas) = (&result.before, &result.after, &result.deltas);

        writeln!(w, "{}", result.config)?;
        writeln!(w, "Total area before: {:.2}", before.total_area)?;
        writeln!(w, "Total area after: {:.2}", after.total_area)?;
        writeln!(w, "Area difference: {:.2}", deltas.area_difference)?;
        writeln!(w, "Area change: {}", deltas.total_area)?;
        writeln!(w, "Perimeter before: {:.2}", before.perimeter)?;
        writeln!(w, "Vertex count before: {}", before.vertex_count)?;
        writeln!(w, "Perimeter after: {:.2}", after.perimeter)?;
        writeln!(w, "Vertex count after: {}", after.vertex_count)?;
        writeln!(w, "Perimeter change: {}", deltas.perimeter)?;
        writeln!(w, "Vertex count change: {}", deltas.vertex_count)?;
        writeln!(
            w,
            "Polygons kept: {}, rejected: {}",
            result.output.len(),
            result.rejections.len()
        )?;
        writeln!(w)?;
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        Ok(self.writer.flush()?)
    }
}
