//! End-to-end scenarios through the public API.

use u_vrp::evaluation::{Objective, TrafficModel};
use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution, TimeWindow, ViolationType};
use u_vrp::neighborhood::Move;
use u_vrp::sa::SaConfig;
use u_vrp::solver::AlgorithmStats;
use u_vrp::tabu::TabuConfig;
use u_vrp::{solve, RoutingError, SolveOptions};

/// Depot plus two customers that cannot share a vehicle.
fn two_customer_instance() -> ProblemInstance {
    ProblemInstance::new("two", Customer::depot(0.0, 0.0))
        .with_customer(Customer::new(1, 10.0, 10.0, 10))
        .with_customer(Customer::new(2, 20.0, 0.0, 15))
        .with_fleet(Fleet::homogeneous(2, 20))
}

/// Two clusters of four customers each, east and west of the depot.
fn clustered_instance() -> ProblemInstance {
    let coords = [
        (20.0, 1.0),
        (22.0, -2.0),
        (25.0, 3.0),
        (21.0, 4.0),
        (-20.0, 1.0),
        (-23.0, -1.0),
        (-24.0, 4.0),
        (-19.0, -3.0),
    ];
    coords.iter().enumerate().fold(
        ProblemInstance::new("clusters", Customer::depot(0.0, 0.0))
            .with_fleet(Fleet::homogeneous(2, 40)),
        |inst, (i, &(x, y))| inst.with_customer(Customer::new(i + 1, x, y, 10)),
    )
}

/// Short runs that rank overloaded routes far behind any feasible plan.
fn fast_options(seed: u64) -> SolveOptions {
    SolveOptions::default()
        .with_seed(seed)
        .with_objective(Objective::Penalized {
            capacity_weight: 1.0,
            time_weight: 0.0,
        })
        .with_sa(SaConfig::default().with_max_iterations(2000))
        .with_tabu(TabuConfig::default().with_max_iterations(100))
}

#[test]
fn greedy_splits_customers_that_overload_one_vehicle() {
    let instance = two_customer_instance();
    let outcome = solve(&instance, "greedy", &SolveOptions::default()).expect("solve");
    let solution = &outcome.solution;

    assert_eq!(solution.num_routes(), 2);
    for route in solution.routes().iter() {
        assert_eq!(route.len(), 3);
    }
    for &load in solution.route_loads() {
        assert!(load <= 20);
    }
    let expected = 2.0 * 200f64.sqrt() + 2.0 * 20.0;
    assert!((solution.total_cost() - expected).abs() < 1e-10);
    assert!((solution.total_cost() - 68.28).abs() < 0.01);
    assert!(solution.is_feasible());
}

#[test]
fn swap_and_swap_back_restores_cost() {
    let instance = ProblemInstance::new("square", Customer::depot(0.0, 0.0))
        .with_customer(Customer::new(1, 10.0, 0.0, 1))
        .with_customer(Customer::new(2, 10.0, 10.0, 1))
        .with_customer(Customer::new(3, 0.0, 10.0, 1))
        .with_fleet(Fleet::homogeneous(1, 10));
    let mut solution = Solution::from_routes(0, &[vec![1, 2, 3]]);
    let original = solution.calculate_cost(&instance);
    assert!((original - 40.0).abs() < 1e-10);

    let swap = Move::Swap {
        route_a: 0,
        pos_a: 1,
        customer_a: 1,
        route_b: 0,
        pos_b: 2,
        customer_b: 2,
    };
    swap.apply(solution.routes_mut());
    let swapped = solution.calculate_cost(&instance);
    assert!(swapped > original);

    swap.inverse().apply(solution.routes_mut());
    assert!((solution.calculate_cost(&instance) - original).abs() < 1e-10);
    assert_eq!(solution.route(0), &[0, 1, 2, 3, 0]);
}

#[test]
fn every_algorithm_serves_every_customer() {
    let instance = clustered_instance();
    for name in ["greedy", "savings", "simulated_annealing", "tabu_search"] {
        let outcome = solve(&instance, name, &fast_options(3)).expect("solve");
        assert_eq!(outcome.solution.num_customers_served(0), 8, "{name}");
        assert_eq!(
            outcome.solution.served_set(0).len(),
            8,
            "{name} served a customer twice"
        );
        assert!(outcome.stats.feasible, "{name}");
        assert_eq!(outcome.stats.violation_count, 0);
        assert_eq!(outcome.stats.algorithm.name(), name);
    }
}

#[test]
fn metaheuristics_find_the_cluster_split() {
    let instance = clustered_instance();
    for name in ["simulated_annealing", "tabu_search"] {
        let outcome = solve(&instance, name, &fast_options(11)).expect("solve");
        for route in outcome.solution.routes().iter() {
            let east = route.iter().filter(|&&n| (1..=4).contains(&n)).count();
            let west = route.iter().filter(|&&n| (5..=8).contains(&n)).count();
            assert!(east == 0 || west == 0, "{name} mixed clusters: {route:?}");
        }
    }
}

#[test]
fn unknown_algorithm_is_a_configuration_error() {
    let err = solve(&two_customer_instance(), "genetic", &SolveOptions::default())
        .expect_err("unknown name");
    assert!(matches!(err, RoutingError::UnknownAlgorithm { ref name } if name == "genetic"));
}

#[test]
fn degenerate_fleet_fails_before_search() {
    let instance = two_customer_instance().with_fleet(Fleet::from_capacities(vec![20, 0]));
    let err = solve(&instance, "tabu_search", &SolveOptions::default()).expect_err("zero capacity");
    assert!(matches!(err, RoutingError::ZeroCapacity { vehicle: 1, .. }));
}

#[test]
fn unreachable_window_is_reported_not_raised() {
    let instance = ProblemInstance::new("late", Customer::depot(0.0, 0.0))
        .with_customer(Customer::new(1, 3.0, 4.0, 1))
        .with_customer(
            Customer::new(2, 30.0, 40.0, 1)
                .with_time_window(TimeWindow::new(0.0, 10.0).expect("valid window")),
        )
        .with_fleet(Fleet::homogeneous(1, 10));

    let outcome = solve(&instance, "greedy", &SolveOptions::default()).expect("solve");
    let solution = &outcome.solution;
    assert_eq!(solution.num_customers_served(0), 2);
    assert!(!solution.is_feasible());
    assert!(solution.violations().iter().any(|v| matches!(
        v.kind,
        ViolationType::LateArrival { customer_id: 2, .. }
    )));
    assert_eq!(outcome.stats.violation_count, solution.violations().len());
}

#[test]
fn penalized_objective_keeps_routes_within_capacity() {
    let instance = ProblemInstance::new("repair", Customer::depot(0.0, 0.0))
        .with_customer(Customer::new(1, 5.0, 0.0, 15))
        .with_customer(Customer::new(2, 6.0, 0.0, 15))
        .with_customer(Customer::new(3, -5.0, 0.0, 5))
        .with_fleet(Fleet::from_capacities(vec![20, 20]));
    for name in ["simulated_annealing", "tabu_search"] {
        let outcome = solve(&instance, name, &fast_options(5)).expect("solve");
        assert!(outcome.solution.is_feasible(), "{name}");
        for &load in outcome.solution.route_loads() {
            assert!(load <= 20);
        }
    }
}

#[test]
fn solution_view_serializes() {
    let outcome = solve(&two_customer_instance(), "savings", &SolveOptions::default()).expect("solve");
    let view = outcome.solution.to_view();
    let json = serde_json::to_value(&view).expect("serialize view");

    assert_eq!(json["routes"].as_array().map(Vec::len), Some(view.routes.len()));
    assert_eq!(json["feasible"], serde_json::Value::Bool(view.feasible));
    assert!(json["violations"].as_array().is_some());
    assert!((json["total_cost"].as_f64().expect("number") - view.total_cost).abs() < 1e-10);

    let back: u_vrp::models::SolutionView =
        serde_json::from_value(json).expect("deserialize view");
    assert_eq!(back, view);
}

#[test]
fn solve_stats_serialize_with_details() {
    let outcome = solve(&clustered_instance(), "tabu_search", &fast_options(2)).expect("solve");
    let AlgorithmStats::TabuSearch(ref tabu) = outcome.stats.details else {
        panic!("expected tabu stats");
    };
    assert!(tabu.iterations > 0);

    let json = serde_json::to_value(&outcome.stats).expect("serialize stats");
    assert_eq!(json["algorithm"], "tabu_search");
    assert_eq!(json["details"]["kind"], "tabu_search");
    assert!(json["details"]["best_cost_history"].as_array().is_some());
}

#[test]
fn instance_round_trips_through_json() {
    let instance = clustered_instance().with_euclidean_matrix();
    let json = serde_json::to_string(&instance).expect("serialize instance");
    let back: ProblemInstance = serde_json::from_str(&json).expect("deserialize instance");
    assert_eq!(back.num_customers(), 8);
    assert!((back.distance(1, 5) - instance.distance(1, 5)).abs() < 1e-10);
}

#[test]
fn best_departure_beats_rush_hour() {
    let instance = clustered_instance();
    let outcome = solve(&instance, "savings", &SolveOptions::default()).expect("solve");
    let traffic = TrafficModel::new(&instance);

    let best = traffic.best_departure_hours(&outcome.solution);
    assert_eq!(best.len(), outcome.solution.num_routes());
    assert!(best.iter().all(|&h| h % 2 == 0 && h < 24));

    let rush = vec![8; best.len()];
    assert!(
        traffic.traffic_cost(&outcome.solution, &best)
            <= traffic.traffic_cost(&outcome.solution, &rush) + 1e-10
    );
}
