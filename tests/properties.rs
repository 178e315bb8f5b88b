//! Property-based tests for construction, neighborhood moves and drivers.
//!
//! # Invariants tested
//!
//! - **Cost:** `calculate_cost` equals the sum of leg distances and is idempotent.
//! - **Coverage:** construction serves every customer exactly once.
//! - **Capacity:** a feasible solution never overloads a route.
//! - **Savings:** Clarke-Wright only links customers whose saving is positive.
//! - **Moves:** every operator keeps depot ends and the multiset of nodes;
//!   applying a move and then its inverse restores the routes.
//! - **Monotonicity:** both drivers return a solution no worse than their start.

use proptest::prelude::*;
use u_numflow::random::create_rng;
use u_vrp::constructive::{clarke_wright_savings, greedy_nearest_neighbor};
use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution};
use u_vrp::neighborhood::NeighborhoodOperator;
use u_vrp::sa::{SaConfig, SaRunner};
use u_vrp::tabu::{TabuConfig, TabuRunner};

/// Random capacitated instance with 2 to 12 customers.
fn instance_strategy() -> impl Strategy<Value = ProblemInstance> {
    (
        prop::collection::vec((-50.0..50.0f64, -50.0..50.0f64, 1..10i32), 2..12),
        1usize..4,
        10i32..40,
    )
        .prop_map(|(nodes, vehicles, capacity)| {
            nodes.into_iter().enumerate().fold(
                ProblemInstance::new("prop", Customer::depot(0.0, 0.0))
                    .with_fleet(Fleet::homogeneous(vehicles, capacity)),
                |inst, (i, (x, y, demand))| inst.with_customer(Customer::new(i + 1, x, y, demand)),
            )
        })
}

fn leg_sum(instance: &ProblemInstance, solution: &Solution) -> f64 {
    solution
        .routes()
        .iter()
        .flat_map(|route| route.windows(2))
        .map(|leg| instance.distance(leg[0], leg[1]))
        .sum()
}

fn served_sorted(solution: &Solution) -> Vec<usize> {
    let mut served: Vec<usize> = solution.routes().to_vecs().concat();
    served.retain(|&n| n != 0);
    served.sort_unstable();
    served
}

fn sorted_nodes(solution: &Solution) -> Vec<usize> {
    let mut nodes = solution.routes().to_vecs().concat();
    nodes.sort_unstable();
    nodes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: total cost is the sum of consecutive leg distances.
    #[test]
    fn cost_is_sum_of_legs(instance in instance_strategy()) {
        for mut solution in [greedy_nearest_neighbor(&instance), clarke_wright_savings(&instance)] {
            let expected = leg_sum(&instance, &solution);
            prop_assert!((solution.total_cost() - expected).abs() < 1e-9);
            let first = solution.calculate_cost(&instance);
            let second = solution.calculate_cost(&instance);
            prop_assert!((first - second).abs() < 1e-12);
            prop_assert!((first - expected).abs() < 1e-9);
        }
    }

    /// Property: every customer appears in exactly one route exactly once.
    #[test]
    fn construction_covers_every_customer(instance in instance_strategy()) {
        let expected: Vec<usize> = (1..=instance.num_customers()).collect();
        for solution in [greedy_nearest_neighbor(&instance), clarke_wright_savings(&instance)] {
            prop_assert_eq!(served_sorted(&solution), expected.clone());
            for route in solution.routes().iter() {
                prop_assert_eq!(route.first(), Some(&0));
                prop_assert_eq!(route.last(), Some(&0));
            }
        }
    }

    /// Property: a feasible solution never exceeds any route's capacity.
    #[test]
    fn feasible_means_within_capacity(instance in instance_strategy()) {
        for solution in [greedy_nearest_neighbor(&instance), clarke_wright_savings(&instance)] {
            if solution.is_feasible() {
                for (r, &load) in solution.route_loads().iter().enumerate() {
                    prop_assert!(load <= instance.fleet().capacity_of(r));
                }
            }
        }
    }

    /// Property: adjacent customers on a savings route were joined by a
    /// positive-saving merge, so no mid-route link appears from nowhere.
    #[test]
    fn savings_links_have_positive_saving(instance in instance_strategy()) {
        let depot = instance.depot();
        let solution = clarke_wright_savings(&instance);
        for route in solution.routes().iter() {
            for leg in route.windows(2) {
                if leg.contains(&depot) {
                    continue;
                }
                let (i, j) = (leg[0].min(leg[1]), leg[0].max(leg[1]));
                let saving = instance.distance(depot, i) + instance.distance(depot, j)
                    - instance.distance(i, j);
                prop_assert!(saving > 0.0, "{}-{} joined with saving {}", i, j, saving);
            }
        }
    }

    /// Property: operators keep depot ends and the multiset of nodes.
    #[test]
    fn operators_preserve_nodes(instance in instance_strategy(), seed in any::<u64>()) {
        let start = greedy_nearest_neighbor(&instance);
        let nodes = sorted_nodes(&start);
        let mut rng = create_rng(seed);
        let mut current = start;
        for _ in 0..40 {
            for op in NeighborhoodOperator::ALL {
                let (candidate, _) = op.neighbor(&current, 0, &mut rng);
                prop_assert_eq!(sorted_nodes(&candidate), nodes.clone());
                for route in candidate.routes().iter() {
                    prop_assert!(route.len() >= 2);
                    prop_assert_eq!(route.first(), Some(&0));
                    prop_assert_eq!(route.last(), Some(&0));
                }
                current = candidate;
            }
        }
    }

    /// Property: a move followed by its inverse restores the routes.
    #[test]
    fn move_then_inverse_is_identity(instance in instance_strategy(), seed in any::<u64>()) {
        let start = clarke_wright_savings(&instance);
        let mut rng = create_rng(seed);
        for _ in 0..20 {
            for op in NeighborhoodOperator::ALL {
                if let Some(mv) = op.sample(start.routes(), 0, &mut rng) {
                    let mut routes = start.routes().clone();
                    mv.apply(&mut routes);
                    mv.inverse().apply(&mut routes);
                    prop_assert_eq!(&routes, start.routes());
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: Simulated Annealing never returns a worse solution.
    #[test]
    fn sa_is_monotone(instance in instance_strategy(), seed in any::<u64>()) {
        let initial = greedy_nearest_neighbor(&instance);
        let config = SaConfig::default()
            .with_iterations_per_temperature(20)
            .with_max_iterations(200);
        let mut rng = create_rng(seed);
        let result = SaRunner::new(&instance, &config)
            .run(&initial, &mut rng)
            .expect("valid config");
        prop_assert!(result.best.total_cost() <= initial.total_cost() + 1e-9);
        prop_assert_eq!(served_sorted(&result.best), served_sorted(&initial));
    }

    /// Property: Tabu Search never returns a worse solution.
    #[test]
    fn tabu_is_monotone(instance in instance_strategy(), seed in any::<u64>()) {
        let initial = clarke_wright_savings(&instance);
        let config = TabuConfig::default().with_max_iterations(30);
        let mut rng = create_rng(seed);
        let result = TabuRunner::new(&instance, &config)
            .run(&initial, &mut rng)
            .expect("valid config");
        prop_assert!(result.best.total_cost() <= initial.total_cost() + 1e-9);
        prop_assert_eq!(served_sorted(&result.best), served_sorted(&initial));
    }
}
