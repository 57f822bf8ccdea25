//! Plant model tests
//!
//! Output length and initial condition, zero-input response, critically
//! damped step response, and from-scratch integration on every call.

use approx::assert_relative_eq;
use pdsim::prelude::*;

const PARAMETER_SETS: [(f64, f64, f64, f64, f64); 5] = [
    (1.0, 1.0, 1.0, 1.0, 1.0),
    (1.0, 0.0, 1.0, 2.0, 1.0),
    (0.0, 3.0, 2.0, 0.5, 4.0),
    (-1.0, 2.0, -0.5, 1.0, 0.0),
    (1.0, 1.0, 1.0, -1.0, -1.0), // unstable
];

fn plant(p: (f64, f64, f64, f64, f64), dt: f64, horizon: f64, mode: InputMode) -> Plant {
    Plant::from_coefficients(p.0, p.1, p.2, p.3, p.4, dt, horizon, mode).unwrap()
}

#[test]
fn test_output_length_and_initial_condition() {
    for &(dt, horizon) in &[(0.01, 10.0), (0.1, 1.0), (0.3, 1.0), (0.5, 0.2), (0.05, 3.33)] {
        for params in PARAMETER_SETS {
            for mode in [InputMode::Direct, InputMode::BackwardDifference] {
                let mut p = plant(params, dt, horizon, mode);
                let n = (horizon / dt).ceil() as usize;
                let u: Vec<f64> = (0..n).map(|i| (i as f64 * 0.7).sin()).collect();

                let (time, y) = p.advance(&u).unwrap();
                assert_eq!(time.len(), n);
                assert_eq!(y.len(), n);
                assert_eq!(y[0], 0.0);
                assert_eq!(time[0], 0.0);
            }
        }
    }
}

#[test]
fn test_zero_input_gives_zero_output() {
    for params in PARAMETER_SETS {
        for mode in [InputMode::Direct, InputMode::BackwardDifference] {
            let mut p = plant(params, 0.01, 5.0, mode);
            let (_, y) = p.advance(&vec![0.0; 500]).unwrap();
            assert!(y.iter().all(|&v| v == 0.0));
        }
    }
}

#[test]
fn test_critically_damped_step_response() {
    // y'' + 2y' + y = u: double pole at -1, no overshoot
    let mut p = plant((1.0, 0.0, 1.0, 2.0, 1.0), 0.01, 10.0, InputMode::Direct);
    let (_, y) = p.advance(&vec![1.0; 1000]).unwrap();

    for w in y.windows(2) {
        assert!(w[1] >= w[0], "output decreased: {} -> {}", w[0], w[1]);
    }
    assert!(y.iter().all(|&v| (0.0..=1.0).contains(&v)));

    // 1 - (1 + t) e^-t at t = 10 is ~0.9995; Euler lags slightly
    assert_relative_eq!(y[999], 1.0, epsilon = 2e-3);
}

#[test]
fn test_backward_difference_ignores_constant_input() {
    // a0 = 0: only the differenced term drives the plant
    let mut p = plant((1.0, 0.0, 1.0, 2.0, 1.0), 0.01, 2.0, InputMode::BackwardDifference);
    let (_, y) = p.advance(&vec![3.0; 200]).unwrap();
    assert!(y.iter().all(|&v| v == 0.0));
}

#[test]
fn test_every_call_integrates_from_scratch() {
    let params = (1.0, 0.5, 1.0, 2.0, 1.0);
    for mode in [InputMode::Direct, InputMode::BackwardDifference] {
        let full: Vec<f64> = (0..300).map(|i| 1.0 + (i as f64 * 0.05).cos()).collect();
        let mut prefix = vec![0.0; 300];
        prefix[..120].copy_from_slice(&full[..120]);

        let mut reused = plant(params, 0.01, 3.0, mode);
        reused.advance(&full).unwrap();
        let (_, from_reused) = reused.advance(&prefix).unwrap();

        let mut fresh = plant(params, 0.01, 3.0, mode);
        let (_, from_fresh) = fresh.advance(&prefix).unwrap();

        assert_eq!(from_reused, from_fresh);
    }
}

#[test]
fn test_incremental_steps_match_advance() {
    let params = (1.0, 2.0, 0.5, 1.0, 3.0);
    for mode in [InputMode::Direct, InputMode::BackwardDifference] {
        let u: Vec<f64> = (0..250).map(|i| (i as f64 * 0.1).sin()).collect();

        let mut p = plant(params, 0.02, 5.0, mode);
        let (_, expected) = p.advance(&u).unwrap();

        p.reset(u[0]);
        let stepped: Vec<f64> = std::iter::once(0.0)
            .chain(u[1..].iter().map(|&ui| p.step(ui)))
            .collect();

        assert_eq!(stepped, expected);
    }
}

#[test]
fn test_unstable_parameters_diverge_without_error() {
    let mut p = plant((1.0, 1.0, 1.0, -1000.0, 0.0), 0.01, 10.0, InputMode::Direct);
    let (_, y) = p.advance(&vec![1.0; 1000]).unwrap();
    assert!(y.iter().any(|v| !v.is_finite()));
}

#[test]
fn test_invalid_construction() {
    let err = Plant::from_coefficients(1.0, 1.0, 0.0, 1.0, 1.0, 0.01, 10.0, InputMode::Direct)
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { name: "b2", .. }));

    for (dt, horizon) in [(0.0, 10.0), (-0.01, 10.0), (0.01, 0.0), (0.01, -1.0)] {
        let err = Plant::from_coefficients(1.0, 1.0, 1.0, 1.0, 1.0, dt, horizon, InputMode::Direct)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { .. }));
    }
}

#[test]
fn test_struct_literal_parameters_are_validated() {
    let params = PlantParameters {
        b2: 0.0,
        ..PlantParameters::default()
    };
    let clock = SimulationClock::new(0.01, 0.1).unwrap();

    for mode in [InputMode::Direct, InputMode::BackwardDifference] {
        let err = Plant::new(params, clock, mode).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { name: "b2", .. }));
    }

    let params = PlantParameters {
        b2: f64::NAN,
        ..PlantParameters::default()
    };
    assert!(Plant::new(params, clock, InputMode::Direct).is_err());
}

#[test]
fn test_shape_mismatch() {
    let mut p = plant((1.0, 1.0, 1.0, 1.0, 1.0), 0.01, 1.0, InputMode::Direct);
    assert!(matches!(
        p.advance(&[0.0; 99]),
        Err(SimError::ShapeMismatch {
            expected: 100,
            actual: 99,
            ..
        })
    ));
    assert!(p.advance(&[0.0; 101]).is_err());
}
