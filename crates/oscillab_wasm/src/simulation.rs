//! Single-run and comparison entry points, plus the model catalog.

use crate::shared::{decode, encode, to_js_error};
use oscillab_core::{
    compare_simulations as core_compare, run_simulation as core_run, EquationId, Method,
    RawSimulationRequest, SimulationRequest,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Integrates one request and returns `{time, position, velocity}`.
#[wasm_bindgen(js_name = runSimulation)]
pub fn run_simulation(request: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let raw: RawSimulationRequest = decode(request, "simulation request")?;
    let request = raw.resolve().map_err(to_js_error)?;
    let series = core_run(&request).map_err(to_js_error)?;
    encode(&series)
}

/// Integrates an array of requests and returns `[{label, series}]`.
/// Every request is resolved before any of them runs.
#[wasm_bindgen(js_name = compareSimulations)]
pub fn compare_simulations(requests: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let raws: Vec<RawSimulationRequest> = decode(requests, "simulation requests")?;
    let requests = raws
        .iter()
        .map(RawSimulationRequest::resolve)
        .collect::<Result<Vec<SimulationRequest>, _>>()
        .map_err(to_js_error)?;
    let compared = core_compare(&requests).map_err(to_js_error)?;
    encode(&compared)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ParameterInfo {
    name: &'static str,
    default: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct EquationInfo {
    name: &'static str,
    parameters: Vec<ParameterInfo>,
}

pub(crate) fn equation_catalog() -> Vec<EquationInfo> {
    EquationId::ALL
        .into_iter()
        .map(|id| EquationInfo {
            name: id.name(),
            parameters: id
                .default_parameters()
                .into_iter()
                .map(|(name, default)| ParameterInfo { name, default })
                .collect(),
        })
        .collect()
}

/// `[{name, parameters: [{name, default}]}]` for every equation.
#[wasm_bindgen(js_name = listEquations)]
pub fn list_equations() -> Result<JsValue, JsValue> {
    encode(&equation_catalog())
}

/// Names of every integration method.
#[wasm_bindgen(js_name = listMethods)]
pub fn list_methods() -> Vec<String> {
    Method::ALL.iter().map(|m| m.name().to_string()).collect()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::shared::encode;
    use oscillab_core::TimeSeries;
    use oscillab_core::EquationParameters;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn request_value(method: &str, equation: &str) -> JsValue {
        let raw = RawSimulationRequest {
            method: method.to_string(),
            equation: equation.to_string(),
            params: EquationParameters::new().with("g", -9.8),
            x0: 0.0,
            v0: 0.0,
            t_total: 1.0,
            n: 2,
        };
        encode(&raw).expect("request")
    }

    #[wasm_bindgen_test]
    fn run_simulation_returns_series() {
        let value = run_simulation(request_value("euler", "free_fall")).expect("series");
        let series: TimeSeries = from_value(value).expect("decode");
        assert_eq!(series.position, vec![0.0, 0.0]);
        assert_eq!(series.velocity, vec![0.0, -9.8]);
    }

    #[wasm_bindgen_test]
    fn run_simulation_reports_unknown_method() {
        let message = run_simulation(request_value("bogus", "free_fall"))
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.starts_with("unknown_method"));
    }

    #[wasm_bindgen_test]
    fn list_methods_includes_rk4() {
        assert!(list_methods().contains(&"runge_kutta4".to_string()));
    }
}
