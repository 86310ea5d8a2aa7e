//! Parameter sweeps: one simulation per value of a single varying parameter.
//!
//! A sweep specification carries an ordered parameter mapping in which one
//! entry is a `{min, max, step}` range and the rest are scalars. The first
//! range with a positive step (in insertion order) is the varying parameter;
//! any further range collapses to its `min`.

use crate::engine::{run_simulation, TimeSeries};
use crate::equations::{EquationId, EquationParameters};
use crate::error::{Result, SimError};
use crate::integrators::Method;
use crate::request::{validate_grid, SimulationRequest};
use rayon::prelude::*;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Every sweep frame is integrated with this method.
pub const SWEEP_METHOD: Method = Method::RungeKutta4;
/// Initial position used for every sweep frame.
pub const SWEEP_X0: f64 = 0.5;
/// Initial velocity used for every sweep frame.
pub const SWEEP_V0: f64 = 0.0;

const DEFAULT_RANGE_MIN: f64 = 1.0;
const DEFAULT_RANGE_MAX: f64 = 10.0;
const DEFAULT_RANGE_STEP: f64 = 1.0;

/// Range bounds as supplied by a caller; absent bounds take permissive defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl RangeSpec {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
        }
    }

    fn min_or_default(&self) -> f64 {
        self.min.unwrap_or(DEFAULT_RANGE_MIN)
    }

    fn step_or_default(&self) -> f64 {
        self.step.unwrap_or(DEFAULT_RANGE_STEP)
    }

    /// Fills absent bounds and checks `min < max`, `step > 0`.
    pub fn resolve(&self) -> Result<ParameterRange> {
        let min = self.min_or_default();
        let max = self.max.unwrap_or(DEFAULT_RANGE_MAX);
        let step = self.step_or_default();

        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(SimError::InvalidRange { min, max });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(SimError::InvalidStep(step));
        }
        Ok(ParameterRange { min, max, step })
    }
}

const INITIAL_CAPACITY: usize = 1024;

/// A validated inclusive arithmetic progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterRange {
    /// Values `min + i * step`, up to and including the first one that reaches
    /// `max`. The last value therefore never exceeds `max + step`, and rounding
    /// in `i * step` cannot drop the endpoint.
    pub fn values(&self, limit: usize) -> Result<Vec<f64>> {
        let estimate = ((self.max - self.min) / self.step).ceil() + 1.0;
        if !estimate.is_finite() || estimate < 1.0 {
            return Err(SimError::EmptyRange);
        }
        // The estimate can be off by one either way.
        if estimate > limit as f64 + 1.0 {
            return Err(SimError::TooManyFrames { limit });
        }

        let mut values = Vec::with_capacity((estimate as usize).min(INITIAL_CAPACITY));
        while values.len() <= limit {
            let value = self.min + values.len() as f64 * self.step;
            values.push(value);
            if value >= self.max {
                break;
            }
        }

        if values.is_empty() {
            return Err(SimError::EmptyRange);
        }
        if values.len() > limit {
            return Err(SimError::TooManyFrames { limit });
        }
        Ok(values)
    }
}

/// One entry of a sweep's parameter mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamEntry {
    Scalar(f64),
    Range(RangeSpec),
}

/// Sweep parameters in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepParams(Vec<(String, ParamEntry)>);

impl SweepParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `name`. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, entry: ParamEntry) {
        let name = name.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = entry,
            None => self.0.push((name, entry)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SweepParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SweepParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ParamsVisitor;

        impl<'de> Visitor<'de> for ParamsVisitor {
            type Value = SweepParams;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of parameter names to numbers or {min, max, step} ranges")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<SweepParams, A::Error> {
                let mut params = SweepParams::new();
                while let Some((name, entry)) = access.next_entry::<String, ParamEntry>()? {
                    params.insert(name, entry);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(ParamsVisitor)
    }
}

/// A sweep request as it arrives from a host. Every field is optional so that
/// a missing one can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSpecification {
    #[serde(default)]
    pub equation: Option<String>,
    #[serde(default)]
    pub params: Option<SweepParams>,
    #[serde(default)]
    pub t_total: Option<f64>,
    #[serde(default, rename = "N")]
    pub n: Option<i64>,
}

impl SweepSpecification {
    pub fn new(equation: impl Into<String>, t_total: f64, n: i64) -> Self {
        Self {
            equation: Some(equation.into()),
            params: Some(SweepParams::new()),
            t_total: Some(t_total),
            n: Some(n),
        }
    }

    pub fn with_scalar(mut self, name: impl Into<String>, value: f64) -> Self {
        self.params
            .get_or_insert_with(SweepParams::new)
            .insert(name, ParamEntry::Scalar(value));
        self
    }

    pub fn with_range(mut self, name: impl Into<String>, range: RangeSpec) -> Self {
        self.params
            .get_or_insert_with(SweepParams::new)
            .insert(name, ParamEntry::Range(range));
        self
    }
}

/// Sweep execution knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    /// Compute frames on the rayon thread pool.
    pub parallel: bool,
    /// Upper bound on the number of frames a single sweep may produce.
    pub max_frames: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            max_frames: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFrame {
    pub param_value: f64,
    pub series: TimeSeries,
}

/// A validated sweep: everything needed to build each frame's request.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPlan {
    equation: EquationId,
    varying: String,
    values: Vec<f64>,
    fixed: EquationParameters,
    t_total: f64,
    n: usize,
}

impl SweepPlan {
    pub fn equation(&self) -> EquationId {
        self.equation
    }

    pub fn varying_parameter(&self) -> &str {
        &self.varying
    }

    /// Swept values in ascending order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn fixed_parameters(&self) -> &EquationParameters {
        &self.fixed
    }

    /// The request for a single swept value.
    pub fn request_for(&self, value: f64) -> Result<SimulationRequest> {
        let params = self.fixed.clone().with(self.varying.clone(), value);
        SimulationRequest::new(
            SWEEP_METHOD,
            self.equation,
            params,
            SWEEP_X0,
            SWEEP_V0,
            self.t_total,
            self.n,
        )
    }

    fn frame(&self, value: f64) -> Result<SweepFrame> {
        log::trace!("{}: {} = {}", self.equation, self.varying, value);
        let series = run_simulation(&self.request_for(value)?)?;
        Ok(SweepFrame {
            param_value: value,
            series,
        })
    }
}

/// Validates `spec` and derives the swept values.
pub fn plan_sweep(spec: &SweepSpecification, settings: &SweepSettings) -> Result<SweepPlan> {
    let equation_name = spec
        .equation
        .as_deref()
        .ok_or(SimError::MissingField("equation"))?;
    let params = spec.params.as_ref().ok_or(SimError::MissingField("params"))?;
    let t_total = spec.t_total.ok_or(SimError::MissingField("t_total"))?;
    let n = spec.n.ok_or(SimError::MissingField("N"))?;

    if n <= 1 {
        return Err(SimError::InvalidStepCount(n));
    }

    let (varying, range) = select_varying(params)?;
    let range = range.resolve()?;
    let values = range.values(settings.max_frames)?;

    let mut fixed = EquationParameters::new();
    for (name, entry) in params.iter().filter(|(name, _)| *name != varying) {
        let value = match entry {
            ParamEntry::Scalar(value) => *value,
            ParamEntry::Range(extra) => {
                log::warn!(
                    "sweep already varies '{}'; range for '{}' collapses to its min",
                    varying,
                    name
                );
                extra.min_or_default()
            }
        };
        fixed.insert(name, value);
    }

    let equation: EquationId = equation_name.parse()?;
    let n = usize::try_from(n).map_err(|_| SimError::InvalidStepCount(n))?;
    validate_grid(t_total, n)?;

    log::debug!(
        "sweep of {} over {} from {} to {} (step {}): {} frames",
        equation,
        varying,
        range.min,
        range.max,
        range.step,
        values.len()
    );

    Ok(SweepPlan {
        equation,
        varying: varying.to_string(),
        values,
        fixed,
        t_total,
        n,
    })
}

/// The first range with a positive step. If every range has a non-positive
/// step the first range is returned so that validation can report the step.
fn select_varying(params: &SweepParams) -> Result<(&str, RangeSpec)> {
    let mut ranges = params.iter().filter_map(|(name, entry)| match entry {
        ParamEntry::Range(range) => Some((name, *range)),
        ParamEntry::Scalar(_) => None,
    });
    let first = ranges.next().ok_or(SimError::NoVaryingParameter)?;
    if first.1.step_or_default() > 0.0 {
        return Ok(first);
    }
    Ok(ranges
        .find(|(_, range)| range.step_or_default() > 0.0)
        .unwrap_or(first))
}

/// Runs a sweep with default settings.
pub fn run_sweep(spec: &SweepSpecification) -> Result<Vec<SweepFrame>> {
    run_sweep_with_settings(spec, &SweepSettings::default())
}

/// Runs one simulation per swept value. Frames come back in ascending order of
/// the swept value regardless of how they were scheduled.
pub fn run_sweep_with_settings(
    spec: &SweepSpecification,
    settings: &SweepSettings,
) -> Result<Vec<SweepFrame>> {
    let plan = plan_sweep(spec, settings)?;
    if settings.parallel {
        plan.values
            .par_iter()
            .map(|&value| plan.frame(value))
            .collect()
    } else {
        plan.values.iter().map(|&value| plan.frame(value)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepProgress {
    pub done: bool,
    pub completed: usize,
    pub total: usize,
    pub last_value: Option<f64>,
}

/// Stepped sweep: validated once, then advanced in caller-sized batches.
pub struct SweepRunner {
    plan: SweepPlan,
    frames: Vec<SweepFrame>,
}

impl SweepRunner {
    pub fn new(spec: &SweepSpecification, settings: &SweepSettings) -> Result<Self> {
        let plan = plan_sweep(spec, settings)?;
        let frames = Vec::with_capacity(plan.values.len());
        Ok(Self { plan, frames })
    }

    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    pub fn is_done(&self) -> bool {
        self.frames.len() >= self.plan.values.len()
    }

    /// Computes up to `batch_size` further frames.
    pub fn run_steps(&mut self, batch_size: usize) -> Result<SweepProgress> {
        let start = self.frames.len();
        let end = (start + batch_size).min(self.plan.values.len());
        for i in start..end {
            let frame = self.plan.frame(self.plan.values[i])?;
            self.frames.push(frame);
        }
        Ok(self.progress())
    }

    pub fn progress(&self) -> SweepProgress {
        SweepProgress {
            done: self.is_done(),
            completed: self.frames.len(),
            total: self.plan.values.len(),
            last_value: self.frames.last().map(|frame| frame.param_value),
        }
    }

    /// Frames computed so far.
    pub fn frames(&self) -> &[SweepFrame] {
        &self.frames
    }

    pub fn take_result(self) -> Vec<SweepFrame> {
        self.frames
    }
}
