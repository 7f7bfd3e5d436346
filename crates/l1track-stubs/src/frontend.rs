//! Front-end readout acceptance.
//!
//! Decides whether the on-detector electronics would transmit a stub. Only
//! front-end quantities are used, never digitized ones.

use l1track_config::Settings;

/// Quantities the front-end decision is made from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontendInputs {
    /// Pseudorapidity of the stub position
    pub eta: f32,
    /// Raw bend as measured in the front-end chip
    pub bend_in_frontend: f32,
    /// Bend resolution assumed in the front-end chip
    pub bend_res_in_frontend: f32,
    /// Bend after resolution degradation
    pub bend: f32,
    /// Bend resolution after degradation
    pub bend_res: f32,
    /// q/Pt per unit bend
    pub q_over_pt_over_bend: f32,
    /// The bend encoder flagged the bend as outside its window
    pub bend_out_of_window: bool,
}

/// Outcome of the front-end filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrontendDecision {
    /// The stub is transmitted
    pub pass: bool,
    /// Rejected only because the bend was outside the encoding window
    pub failed_window_only: bool,
}

/// Apply the front-end cuts.
///
/// A stub is rejected if |η| exceeds `max_stub_eta`; if low-Pt killing is
/// enabled and either the front-end bend or the degraded bend, reduced by
/// its resolution, implies |q/Pt| above the Hough cut; or if its bend was
/// outside the encoding window. `failed_window_only` is set only when the
/// window was the sole reason.
pub fn evaluate(settings: &Settings, inputs: &FrontendInputs) -> FrontendDecision {
    let mut pass = inputs.eta.abs() <= settings.stub_cuts.max_stub_eta;

    if settings.stub_cuts.kill_low_pt_stubs {
        let max_bend = settings.q_over_pt_cut() / inputs.q_over_pt_over_bend;
        if inputs.bend_in_frontend.abs() - inputs.bend_res_in_frontend > max_bend {
            pass = false;
        }
        if inputs.bend.abs() - inputs.bend_res > max_bend {
            pass = false;
        }
    }

    let mut failed_window_only = false;
    if inputs.bend_out_of_window {
        failed_window_only = pass;
        pass = false;
    }

    FrontendDecision {
        pass,
        failed_window_only,
    }
}
