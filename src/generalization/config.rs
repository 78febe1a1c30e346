// src/generalization/config.rs

use crate::math::{
    algorithms::{ArcLengthResampler, ChaikinSmoother, DecimationPolicy, DouglasPeucker},
    error::{MathError, MathResult},
    utils::constants,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Resampling, Vereinfachung und Glättung hintereinander.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleSimplifySmoothPolicy {
    pub step_distance: f64,
    pub epsilon: f64,
    pub smoothing_iterations: u32,
}

impl Default for ResampleSimplifySmoothPolicy {
    fn default() -> Self {
        Self {
            step_distance: 50.0,
            epsilon: 50.0,
            smoothing_iterations: 2,
        }
    }
}

impl ResampleSimplifySmoothPolicy {
    pub fn new(step_distance: f64, epsilon: f64) -> Self {
        Self {
            step_distance,
            epsilon,
            ..Default::default()
        }
    }

    pub fn with_smoothing_iterations(mut self, iterations: u32) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Baut die drei Stufen; dabei werden alle Parameter geprüft.
    pub fn stages(&self) -> MathResult<(ArcLengthResampler, DouglasPeucker, ChaikinSmoother)> {
        Ok((
            ArcLengthResampler::new(self.step_distance)?,
            DouglasPeucker::new(self.epsilon)?,
            ChaikinSmoother::new(self.smoothing_iterations)?,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneralizationPolicy {
    Decimation(DecimationPolicy),
    ResampleSimplifySmooth(ResampleSimplifySmoothPolicy),
}

impl Default for GeneralizationPolicy {
    fn default() -> Self {
        GeneralizationPolicy::ResampleSimplifySmooth(ResampleSimplifySmoothPolicy::default())
    }
}

/// Eine vollständige Konfiguration für einen Pipeline-Lauf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralizationConfig {
    pub policy: GeneralizationPolicy,
    /// Polygone mit kleinerer Fläche werden verworfen (quadrierte CRS-Einheiten)
    pub min_area: f64,
    /// Mindestanzahl verbleibender Vertices, der Schlusspunkt zählt nicht mit
    pub min_vertices: u32,
}

impl Default for GeneralizationConfig {
    fn default() -> Self {
        Self {
            policy: GeneralizationPolicy::default(),
            min_area: 40_000.0,
            min_vertices: 4,
        }
    }
}

impl GeneralizationConfig {
    pub fn new(policy: GeneralizationPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    pub fn with_min_vertices(mut self, min_vertices: u32) -> Self {
        self.min_vertices = min_vertices;
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(MathError::invalid_parameter(
                "min_area",
                self.min_area,
                "must be a finite, non-negative area",
            ));
        }

        if (self.min_vertices as usize) < constants::MIN_POLYGON_VERTICES {
            return Err(MathError::invalid_parameter(
                "min_vertices",
                self.min_vertices,
                format!(
                    "a polygon needs at least {} vertices",
                    constants::MIN_POLYGON_VERTICES
                ),
            ));
        }

        match &self.policy {
            GeneralizationPolicy::Decimation(policy) => policy.validate(),
            GeneralizationPolicy::ResampleSimplifySmooth(policy) => policy.stages().map(|_| ()),
        }
    }

    /// Kopie mit einem geänderten Sweep-Parameter. Der Parameter muss zur Politik passen.
    pub fn with_parameter(mut self, parameter: Parameter, value: f64) -> MathResult<Self> {
        match (parameter, &mut self.policy) {
            (Parameter::MinArea, _) => self.min_area = value,
            (Parameter::StepDistance, GeneralizationPolicy::ResampleSimplifySmooth(policy)) => {
                policy.step_distance = value
            }
            (Parameter::Epsilon, GeneralizationPolicy::ResampleSimplifySmooth(policy)) => {
                policy.epsilon = value
            }
            (
                Parameter::SmoothingIterations,
                GeneralizationPolicy::ResampleSimplifySmooth(policy),
            ) => policy.smoothing_iterations = whole_number(parameter, value)?,
            (
                Parameter::DistanceThreshold,
                GeneralizationPolicy::Decimation(DecimationPolicy::DistanceThreshold { threshold }),
            ) => *threshold = value,
            (
                Parameter::Stride,
                GeneralizationPolicy::Decimation(DecimationPolicy::Stride { stride, .. }),
            ) => *stride = Some(whole_number(parameter, value)?),
            (parameter, policy) => {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Parameter {parameter} does not apply to policy {policy:?}"),
                });
            }
        }
        Ok(self)
    }

    /// Kurzer, dateinamentauglicher Name der Konfiguration, z.B. `step50_eps100_iter2_area40000`.
    pub fn label(&self) -> String {
        let policy = match &self.policy {
            GeneralizationPolicy::ResampleSimplifySmooth(p) => format!(
                "step{}_eps{}_iter{}",
                p.step_distance, p.epsilon, p.smoothing_iterations
            ),
            GeneralizationPolicy::Decimation(DecimationPolicy::Stride { stride, averaging }) => {
                let stride = stride.map_or_else(|| "auto".to_string(), |s| s.to_string());
                format!("stride{stride}_{averaging:?}").to_lowercase()
            }
            GeneralizationPolicy::Decimation(DecimationPolicy::DistanceThreshold { threshold }) => {
                format!("dist{threshold}")
            }
        };
        format!("{policy}_area{}", self.min_area)
    }
}

impl fmt::Display for GeneralizationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.policy {
            GeneralizationPolicy::ResampleSimplifySmooth(p) => write!(
                f,
                "step_distance: {}, epsilon: {}, smoothing_iterations: {}",
                p.step_distance, p.epsilon, p.smoothing_iterations
            )?,
            GeneralizationPolicy::Decimation(DecimationPolicy::Stride { stride, averaging }) => {
                match stride {
                    Some(stride) => write!(f, "stride: {stride}")?,
                    None => write!(f, "stride: auto")?,
                }
                write!(f, ", averaging: {averaging:?}")?
            }
            GeneralizationPolicy::Decimation(DecimationPolicy::DistanceThreshold { threshold }) => {
                write!(f, "distance_threshold: {threshold}")?
            }
        }
        write!(f, ", min_area: {}", self.min_area)
    }
}

/// Ganzzahliger Parameterwert; Werte außerhalb des Zieltyps sind ein Fehler.
fn whole_number<T: TryFrom<u64>>(parameter: Parameter, value: f64) -> MathResult<T> {
    // 2^64 ist als f64 exakt darstellbar
    const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= U64_LIMIT {
        return Err(MathError::invalid_parameter(
            parameter.name(),
            value,
            "must be a non-negative whole number",
        ));
    }
    T::try_from(value as u64)
        .map_err(|_| MathError::invalid_parameter(parameter.name(), value, "value out of range"))
}

/// Parameter, über die ein Sweep laufen kann
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    StepDistance,
    Epsilon,
    SmoothingIterations,
    DistanceThreshold,
    Stride,
    MinArea,
}

impl Parameter {
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::StepDistance => "step_distance",
            Parameter::Epsilon => "epsilon",
            Parameter::SmoothingIterations => "smoothing_iterations",
            Parameter::DistanceThreshold => "distance_threshold",
            Parameter::Stride => "stride",
            Parameter::MinArea => "min_area",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "step_distance" | "step" => Ok(Parameter::StepDistance),
            "epsilon" | "eps" => Ok(Parameter::Epsilon),
            "smoothing_iterations" | "iterations" => Ok(Parameter::SmoothingIterations),
            "distance_threshold" | "threshold" => Ok(Parameter::DistanceThreshold),
            "stride" => Ok(Parameter::Stride),
            "min_area" => Ok(Parameter::MinArea),
            other => Err(MathError::InvalidConfiguration {
                message: format!("Unknown sweep parameter: {other}"),
            }),
        }
    }
}

/// Inklusiver Wertebereich `start..=end` mit Schrittweite `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for ParameterRange {
    fn default() -> Self {
        Self {
            start: 50.0,
            end: 1000.0,
            step: 50.0,
        }
    }
}

impl ParameterRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Bereich mit genau einem Wert
    pub fn single(value: f64) -> Self {
        Self::new(value, value, 1.0)
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() || self.end < self.start {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Range {}..={} must be finite and ascending",
                    self.start, self.end
                ),
            });
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(MathError::invalid_parameter(
                "range_step",
                self.step,
                "must be a finite value greater than 0",
            ));
        }
        Ok(())
    }

    /// Anzahl der Werte im Bereich
    pub fn count(&self) -> usize {
        // Toleranz, damit z.B. 0.1-Schritte den Endwert nicht knapp verfehlen
        ((self.end - self.start) / self.step + constants::EPSILON).floor() as usize + 1
    }

    /// Werte als `start + i * step`, ohne Aufsummieren
    pub fn values(&self) -> MathResult<Vec<f64>> {
        self.validate()?;
        Ok((0..self.count())
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }
}

/// Ein Parameter mit seinem Wertebereich
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSweep {
    pub parameter: Parameter,
    pub range: ParameterRange,
}

impl ParameterSweep {
    pub fn new(parameter: Parameter, range: ParameterRange) -> Self {
        Self { parameter, range }
    }
}

/// Kreuzprodukt aus bis zu zwei Parameterbereichen über einer Basiskonfiguration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepPlan {
    pub base: GeneralizationConfig,
    pub primary: ParameterSweep,
    /// Fehlt das Feld, wird nur der primäre Parameter variiert
    #[serde(default)]
    pub secondary: Option<ParameterSweep>,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            base: GeneralizationConfig::default(),
            primary: ParameterSweep::new(Parameter::StepDistance, ParameterRange::default()),
            secondary: Some(ParameterSweep::new(
                Parameter::Epsilon,
                ParameterRange::default(),
            )),
        }
    }
}

impl SweepPlan {
    pub fn new(base: GeneralizationConfig, primary: ParameterSweep) -> Self {
        Self {
            base,
            primary,
            secondary: None,
        }
    }

    pub fn with_secondary(mut self, secondary: ParameterSweep) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn validate(&self) -> MathResult<()> {
        self.primary.range.validate()?;
        if let Some(secondary) = &self.secondary {
            secondary.range.validate()?;
            if secondary.parameter == self.primary.parameter {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Parameter {} is swept twice", secondary.parameter),
                });
            }
        }
        Ok(())
    }

    /// Alle Konfigurationen, äußere Schleife über den primären Parameter.
    /// Die einzelnen Konfigurationen werden hier nicht validiert; das geschieht pro Lauf.
    pub fn configurations(&self) -> MathResult<Vec<GeneralizationConfig>> {
        self.validate()?;

        let mut configs = Vec::new();
        for primary in self.primary.range.values()? {
            let config = self.base.with_parameter(self.primary.parameter, primary)?;
            match &self.secondary {
                Some(secondary) => {
                    for value in secondary.range.values()? {
                        configs.push(config.with_parameter(secondary.parameter, value)?);
                    }
                }
                None => configs.push(config),
            }
        }
        Ok(configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::algorithms::StrideAveraging;

    #[test]
    fn test_defaults() {
        let config = GeneralizationConfig::default();
        assert_eq!(config.min_area, 40_000.0);
        assert_eq!(config.min_vertices, 4);
        assert!(config.validate().is_ok());
        match config.policy {
            GeneralizationPolicy::ResampleSimplifySmooth(p) => assert_eq!(p.smoothing_iterations, 2),
            other => panic!("unexpected default policy {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let bad_step = GeneralizationConfig::new(GeneralizationPolicy::ResampleSimplifySmooth(
            ResampleSimplifySmoothPolicy::new(0.0, 10.0),
        ));
        assert!(matches!(
            bad_step.validate(),
            Err(MathError::InvalidParameter { name: "step_distance", .. })
        ));

        let bad_epsilon = GeneralizationConfig::new(GeneralizationPolicy::ResampleSimplifySmooth(
            ResampleSimplifySmoothPolicy::new(10.0, -1.0),
        ));
        assert!(matches!(
            bad_epsilon.validate(),
            Err(MathError::InvalidParameter { name: "epsilon", .. })
        ));

        let too_many_iterations =
            GeneralizationConfig::new(GeneralizationPolicy::ResampleSimplifySmooth(
                ResampleSimplifySmoothPolicy::new(10.0, 1.0).with_smoothing_iterations(40),
            ));
        assert!(too_many_iterations.validate().is_err());

        let bad_min_vertices = GeneralizationConfig::default().with_min_vertices(2);
        assert!(bad_min_vertices.validate().is_err());
        assert!(GeneralizationConfig::default().with_min_vertices(3).validate().is_ok());

        let bad_area = GeneralizationConfig::default().with_min_area(f64::NAN);
        assert!(bad_area.validate().is_err());
    }

    #[test]
    fn test_with_parameter() {
        let config = GeneralizationConfig::default()
            .with_parameter(Parameter::StepDistance, 150.0)
            .unwrap()
            .with_parameter(Parameter::Epsilon, 25.0)
            .unwrap()
            .with_parameter(Parameter::SmoothingIterations, 3.0)
            .unwrap();
        assert_eq!(
            config.policy,
            GeneralizationPolicy::ResampleSimplifySmooth(ResampleSimplifySmoothPolicy {
                step_distance: 150.0,
                epsilon: 25.0,
                smoothing_iterations: 3,
            })
        );

        assert!(matches!(
            config.with_parameter(Parameter::Stride, 5.0),
            Err(MathError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            config.with_parameter(Parameter::SmoothingIterations, 1.5),
            Err(MathError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_with_parameter_out_of_range() {
        // 2^32 + 1 passt nicht in u32 und darf nicht zu 1 abgeschnitten werden
        let result = GeneralizationConfig::default()
            .with_parameter(Parameter::SmoothingIterations, 4_294_967_297.0);
        assert!(matches!(
            result,
            Err(MathError::InvalidParameter { name: "smoothing_iterations", .. })
        ));

        let stride = GeneralizationConfig::new(GeneralizationPolicy::Decimation(
            DecimationPolicy::default(),
        ));
        assert!(matches!(
            stride.with_parameter(Parameter::Stride, 1e300),
            Err(MathError::InvalidParameter { name: "stride", .. })
        ));
    }

    #[test]
    fn test_with_parameter_decimation() {
        let stride = GeneralizationConfig::new(GeneralizationPolicy::Decimation(
            DecimationPolicy::default(),
        ))
        .with_parameter(Parameter::Stride, 4.0)
        .unwrap();
        assert_eq!(
            stride.policy,
            GeneralizationPolicy::Decimation(DecimationPolicy::Stride {
                stride: Some(4),
                averaging: StrideAveraging::YOnly,
            })
        );

        let distance = GeneralizationConfig::new(GeneralizationPolicy::Decimation(
            DecimationPolicy::DistanceThreshold { threshold: 1.0 },
        ))
        .with_parameter(Parameter::DistanceThreshold, 75.0)
        .unwrap()
        .with_parameter(Parameter::MinArea, 0.0)
        .unwrap();
        assert_eq!(distance.label(), "dist75_area0");
        assert_eq!(distance.min_area, 0.0);
    }

    #[test]
    fn test_label_and_display() {
        let config = GeneralizationConfig::new(GeneralizationPolicy::ResampleSimplifySmooth(
            ResampleSimplifySmoothPolicy::new(50.0, 100.0),
        ));
        assert_eq!(config.label(), "step50_eps100_iter2_area40000");
        assert_eq!(
            config.to_string(),
            "step_distance: 50, epsilon: 100, smoothing_iterations: 2, min_area: 40000"
        );

        let stride = GeneralizationConfig::new(GeneralizationPolicy::Decimation(
            DecimationPolicy::default(),
        ));
        assert_eq!(stride.label(), "strideauto_yonly_area40000");
        assert_eq!(stride.to_string(), "stride: auto, averaging: YOnly, min_area: 40000");
    }

    #[test]
    fn test_parameter_from_str() {
        assert_eq!("step".parse::<Parameter>().unwrap(), Parameter::StepDistance);
        assert_eq!("Epsilon".parse::<Parameter>().unwrap(), Parameter::Epsilon);
        assert_eq!(
            "distance-threshold".parse::<Parameter>().unwrap(),
            Parameter::DistanceThreshold
        );
        assert!("tolerance".parse::<Parameter>().is_err());
    }

    #[test]
    fn test_range_values() {
        let values = ParameterRange::default().values().unwrap();
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], 50.0);
        assert_eq!(values[19], 1000.0);

        let fine = ParameterRange::new(0.0, 1.0, 0.1).values().unwrap();
        assert_eq!(fine.len(), 11);

        assert_eq!(ParameterRange::single(7.0).values().unwrap(), vec![7.0]);
        assert!(ParameterRange::new(10.0, 0.0, 1.0).values().is_err());
        assert!(ParameterRange::new(0.0, 10.0, 0.0).values().is_err());
    }

    #[test]
    fn test_sweep_plan_cross_product() {
        let plan = SweepPlan::default();
        let configs = plan.configurations().unwrap();
        assert_eq!(configs.len(), 400);

        let plan = SweepPlan::new(
            GeneralizationConfig::default(),
            ParameterSweep::new(Parameter::StepDistance, ParameterRange::new(50.0, 100.0, 50.0)),
        )
        .with_secondary(ParameterSweep::new(
            Parameter::Epsilon,
            ParameterRange::new(1.0, 3.0, 1.0),
        ));
        let configs = plan.configurations().unwrap();
        assert_eq!(configs.len(), 6);
        assert_eq!(configs[0].label(), "step50_eps1_iter2_area40000");
        assert_eq!(configs[5].label(), "step100_eps3_iter2_area40000");
    }

    #[test]
    fn test_sweep_plan_rejects_duplicate_parameter() {
        let plan = SweepPlan::new(
            GeneralizationConfig::default(),
            ParameterSweep::new(Parameter::Epsilon, ParameterRange::default()),
        )
        .with_secondary(ParameterSweep::new(
            Parameter::Epsilon,
            ParameterRange::default(),
        ));
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "policy": {"decimation": {"kind": "distance_threshold", "threshold": 30.0}},
            "min_area": 100.0
        }"#;
        let config: GeneralizationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.min_vertices, 4);
        assert_eq!(config.label(), "dist30_area100");

        let plan: SweepPlan = serde_json::from_str(
            r#"{"primary": {"parameter": "step_distance", "range": {"start": 1, "end": 2, "step": 1}},
                "secondary": {"parameter": "epsilon", "range": {"start": 10, "end": 30, "step": 10}}}"#,
        )
        .unwrap();
        assert!(plan.secondary.is_some());
        assert_eq!(plan.configurations().unwrap().len(), 6);
    }

    #[test]
    fn test_decimation_plan_from_json() {
        let plan: SweepPlan = serde_json::from_str(
            r#"{
                "base": {
                    "policy": {"decimation": {"kind": "distance_threshold", "threshold": 50.0}},
                    "min_area": 0.0
                },
                "primary": {
                    "parameter": "distance_threshold",
                    "range": {"start": 25, "end": 100, "step": 25}
                }
            }"#,
        )
        .unwrap();
        assert!(plan.secondary.is_none());

        let configs = plan.configurations().unwrap();
        assert_eq!(configs.len(), 4);
        assert_eq!(configs[0].label(), "dist25_area0");
        assert_eq!(configs[3].label(), "dist100_area0");
    }
}
