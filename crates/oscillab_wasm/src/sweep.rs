//! Parameter sweep bindings: one-shot and stepped.

use crate::shared::{decode, default_settings, encode, sweep_settings, to_js_error};
use oscillab_core::{run_sweep_with_settings, SweepRunner, SweepSpecification};
use wasm_bindgen::prelude::*;

/// Runs a whole sweep and returns `[{param_value, series}]` in ascending order.
/// `settings` may be `undefined`.
#[wasm_bindgen(js_name = runSweep)]
pub fn run_sweep(spec: JsValue, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let spec: SweepSpecification = decode(spec, "sweep specification")?;
    let settings = sweep_settings(settings)?;
    let frames = run_sweep_with_settings(&spec, &settings).map_err(to_js_error)?;
    encode(&frames)
}

/// WASM-exported runner for stepped sweeps.
/// Lets the host render or report progress between batches of frames.
#[wasm_bindgen]
pub struct WasmSweepRunner {
    runner: Option<SweepRunner>,
}

#[wasm_bindgen]
impl WasmSweepRunner {
    /// Validates the sweep; no frames are computed yet.
    #[wasm_bindgen(constructor)]
    pub fn new(spec: JsValue) -> Result<WasmSweepRunner, JsValue> {
        console_error_panic_hook::set_once();

        let spec: SweepSpecification = decode(spec, "sweep specification")?;
        let runner = SweepRunner::new(&spec, &default_settings()).map_err(to_js_error)?;
        Ok(WasmSweepRunner {
            runner: Some(runner),
        })
    }

    /// Name of the parameter that changes between frames.
    #[wasm_bindgen(js_name = varyingParameter)]
    pub fn varying_parameter(&self) -> Option<String> {
        self.runner
            .as_ref()
            .map(|runner| runner.plan().varying_parameter().to_string())
    }

    /// Check if every frame has been computed.
    #[wasm_bindgen(js_name = isDone)]
    pub fn is_done(&self) -> bool {
        self.runner.as_ref().map_or(true, |runner| runner.is_done())
    }

    /// Compute a batch of frames and return progress.
    #[wasm_bindgen(js_name = runSteps)]
    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        let progress = runner
            .run_steps(batch_size as usize)
            .map_err(to_js_error)?;

        encode(&progress)
    }

    /// Get progress information.
    #[wasm_bindgen(js_name = getProgress)]
    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        encode(&runner.progress())
    }

    /// Take the computed frames. The runner cannot be used afterwards.
    #[wasm_bindgen(js_name = getResult)]
    pub fn get_result(&mut self) -> Result<JsValue, JsValue> {
        let runner = self
            .runner
            .take()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        encode(&runner.take_result())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use oscillab_core::{RangeSpec, SweepFrame, SweepProgress};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn spec_value(step: f64) -> JsValue {
        let spec = SweepSpecification::new("sho", 2.0, 20)
            .with_range("k", RangeSpec::new(1.0, 3.0, step))
            .with_scalar("m", 1.0);
        encode(&spec).expect("spec")
    }

    #[wasm_bindgen_test]
    fn run_sweep_returns_ordered_frames() {
        let value = run_sweep(spec_value(1.0), JsValue::UNDEFINED).expect("frames");
        let frames: Vec<SweepFrame> = from_value(value).expect("decode");
        let values: Vec<f64> = frames.iter().map(|f| f.param_value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[wasm_bindgen_test]
    fn runner_steps_to_completion() {
        let mut runner = WasmSweepRunner::new(spec_value(1.0)).expect("runner");
        assert_eq!(runner.varying_parameter().as_deref(), Some("k"));
        assert!(!runner.is_done());

        let progress: SweepProgress =
            from_value(runner.run_steps(2).expect("steps")).expect("progress");
        assert_eq!(progress.completed, 2);
        runner.run_steps(5).expect("steps");
        assert!(runner.is_done());

        let frames: Vec<SweepFrame> =
            from_value(runner.get_result().expect("result")).expect("decode");
        assert_eq!(frames.len(), 3);
        assert!(runner.get_result().is_err());
    }

    #[wasm_bindgen_test]
    fn runner_rejects_zero_step() {
        let message = WasmSweepRunner::new(spec_value(0.0))
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.starts_with("invalid_step"));
    }
}
