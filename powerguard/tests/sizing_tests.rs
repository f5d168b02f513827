//! Wire sizing behavior across a grid of inputs

use powerguard::compliance::{evaluate_gauge, InsulationRating};
use powerguard::prelude::*;
use powerguard::{SizingStatus, WireCalculation};

const CURRENTS: [f64; 7] = [0.0, 1.0, 8.0, 25.0, 60.0, 120.0, 220.0];
const LENGTHS: [f64; 5] = [0.0, 2.0, 10.0, 25.0, 60.0];
const VOLTAGES: [f64; 3] = [12.0, 24.0, 48.0];

fn grid() -> impl Iterator<Item = SizingRequest> {
    CURRENTS.into_iter().flat_map(|current| {
        LENGTHS.into_iter().flat_map(move |length| {
            VOLTAGES
                .into_iter()
                .map(move |voltage| SizingRequest::new(current, length, voltage))
        })
    })
}

fn satisfies(request: &SizingRequest, result: &WireCalculation) -> bool {
    let eval = evaluate_gauge(request, result.recommended_gauge);
    eval.drop_ok() && eval.ampacity_ok(request.current_a)
}

#[test]
fn test_recommendation_meets_limits() {
    for request in grid() {
        let result = powerguard::size(&request);
        if result.status != SizingStatus::Error {
            assert!(satisfies(&request, &result), "{:?} -> {:?}", request, result);
        }
    }
}

#[test]
fn test_recommendation_is_smallest() {
    for request in grid() {
        let result = powerguard::size(&request);
        if result.status == SizingStatus::Error {
            continue;
        }
        let index = result.recommended_gauge.index();
        if index == 0 {
            continue;
        }
        let smaller = Gauge::ALL[index - 1];
        let eval = evaluate_gauge(&request, smaller);
        assert!(
            !(eval.drop_ok() && eval.ampacity_ok(request.current_a)),
            "{} would also work for {:?}",
            smaller,
            request
        );
    }
}

#[test]
fn test_floor_is_never_undercut() {
    for floor in [Gauge::Awg14, Gauge::Awg8, Gauge::Awg2_0] {
        for request in grid() {
            let result = powerguard::size(&request.clone().with_floor(Some(floor)));
            assert!(result.recommended_gauge >= floor);
        }
    }
}

#[test]
fn test_recommendation_round_trips_through_label() {
    for request in grid() {
        let result = powerguard::size(&request);
        let parsed: Gauge = result.recommended_gauge.to_string().parse().unwrap();
        assert_eq!(parsed, result.recommended_gauge);
        assert_eq!(powerguard::size(&request.clone().with_floor(Some(parsed))), result);
    }
}

#[test]
fn test_impossible_run_is_error() {
    let result = powerguard::size(&SizingRequest::new(500.0, 200.0, 12.0));

    assert_eq!(result.status, SizingStatus::Error);
    assert_eq!(result.recommended_gauge, Gauge::Awg4_0);
    assert!(result.message.contains("voltage drop"));
    assert!(result.message.contains("derated ampacity"));
}

#[test]
fn test_aluminum_needs_larger_conductor() {
    let copper = powerguard::size(&SizingRequest::new(50.0, 10.0, 12.0));
    let aluminum = powerguard::size(
        &SizingRequest::new(50.0, 10.0, 12.0).with_material(ConductorMaterial::Aluminum),
    );

    assert_eq!(copper.recommended_gauge, Gauge::Awg4);
    assert!(aluminum.recommended_gauge > copper.recommended_gauge);
}

#[test]
fn test_heat_and_bundling_derate() {
    // 30A over a short run is ampacity-bound.
    let cool = powerguard::size(&SizingRequest::new(30.0, 1.0, 12.0));
    let hot = powerguard::size(&SizingRequest::new(30.0, 1.0, 12.0).with_temperature(50.0));
    let bundled = powerguard::size(&SizingRequest::new(30.0, 1.0, 12.0).with_bundling_factor(0.7));

    assert_eq!(cool.recommended_gauge, Gauge::Awg10);
    assert!(hot.recommended_gauge > cool.recommended_gauge);
    assert!(bundled.recommended_gauge > cool.recommended_gauge);
}

#[test]
fn test_higher_insulation_rating_allows_smaller_wire() {
    let c60 = powerguard::size(
        &SizingRequest::new(30.0, 1.0, 12.0).with_insulation(InsulationRating::C60),
    );
    let c90 = powerguard::size(
        &SizingRequest::new(30.0, 1.0, 12.0).with_insulation(InsulationRating::C90),
    );

    assert!(c90.recommended_gauge <= c60.recommended_gauge);
}

#[test]
fn test_60c_insulation_small_gauges() {
    let at_60c = |amps| {
        powerguard::size(&SizingRequest::new(amps, 1.0, 12.0).with_insulation(InsulationRating::C60))
            .recommended_gauge
    };

    assert_eq!(at_60c(15.0), Gauge::Awg14);
    assert_eq!(at_60c(18.0), Gauge::Awg12);
    assert_eq!(at_60c(24.0), Gauge::Awg10);
}

#[test]
fn test_looser_drop_limit_never_upsizes() {
    for request in grid() {
        let strict = powerguard::size(&request.clone().with_max_drop_percent(2.0));
        let loose = powerguard::size(&request.clone().with_max_drop_percent(10.0));
        assert!(loose.recommended_gauge <= strict.recommended_gauge);
    }
}
