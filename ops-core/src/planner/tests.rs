use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use proptest::{collection::vec, prelude::*};

use super::*;

fn raw_product(name: &str, bahan: f64, jam: f64, profit_per_unit: f64) -> RawProduct {
    RawProduct {
        name: name.to_owned(),
        consumption: [("bahan".to_owned(), bahan), ("jam".to_owned(), jam)]
            .into_iter()
            .collect(),
        profit_per_unit,
    }
}

fn ice_cream() -> RawPlanInput {
    RawPlanInput {
        resources: vec![
            RawResource {
                name: "bahan".to_owned(),
                capacity: 100.,
            },
            RawResource {
                name: "jam".to_owned(),
                capacity: 80.,
            },
        ],
        products: vec![
            raw_product("Chocolate", 3., 2., 3000.),
            raw_product("Vanilla", 2., 1.5, 2500.),
            raw_product("Strawberry", 4., 2.5, 3500.),
        ],
        constraints: vec![],
        equalize: false,
    }
}

fn optimal(outcome: PlanOutcome) -> ProductionPlan {
    match outcome {
        PlanOutcome::Optimal(plan) => plan,
        PlanOutcome::Infeasible { status } => panic!("expected an optimal plan, got {status}"),
    }
}

#[test]
fn ice_cream_mix_makes_only_vanilla() {
    let plan = optimal(Planner::run(ice_cream()).unwrap());

    assert_eq!(
        plan.quantities
            .iter()
            .map(|planned| (planned.product.as_str(), planned.quantity))
            .collect::<Vec<_>>(),
        vec![("Chocolate", 0.), ("Vanilla", 50.), ("Strawberry", 0.)]
    );
    assert_eq!(plan.total_profit, 125_000.);
    assert_eq!(plan.quantity(ProductId(1)), Some(50.));
    assert_eq!(
        plan.resource_usage,
        vec![
            ResourceUsage {
                resource: "bahan".to_owned(),
                used: 100.,
                capacity: 100.,
                slack: 0.,
            },
            ResourceUsage {
                resource: "jam".to_owned(),
                used: 75.,
                capacity: 80.,
                slack: 5.,
            },
        ]
    );
}

#[test]
fn repeated_solves_are_identical() {
    let params = Planner::validate(ice_cream()).unwrap();
    let first = Planner::compute(&params).unwrap();
    let second = Planner::compute(&params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn equalize_mode_chains_every_product() {
    let mut raw = ice_cream();
    raw.equalize = true;
    let params = Planner::validate(raw).unwrap();
    assert_eq!(
        params.extra_constraints,
        vec![
            ExtraConstraint::Equal(ProductId(0), ProductId(1)),
            ExtraConstraint::Equal(ProductId(1), ProductId(2)),
        ]
    );

    let plan = optimal(Planner::compute(&params).unwrap());
    for planned in &plan.quantities {
        assert_relative_eq!(planned.quantity, 100. / 9., max_relative = 1e-12);
    }
    assert_relative_eq!(plan.total_profit, 100_000., max_relative = 1e-12);
}

#[test]
fn equality_chain_order_does_not_change_the_plan() {
    let params = Planner::validate(ice_cream()).unwrap();
    let forward = solve_plan(&params.products, &params.capacities, &equalize_all(3)).unwrap();
    let backward = solve_plan(
        &params.products,
        &params.capacities,
        &[
            ExtraConstraint::Equal(ProductId(2), ProductId(1)),
            ExtraConstraint::Equal(ProductId(1), ProductId(0)),
        ],
    )
    .unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn minimum_quantity_is_respected() {
    let mut raw = ice_cream();
    raw.constraints.push(RawConstraint::Minimum {
        product: "Chocolate".to_owned(),
        quantity: 10.,
    });

    let plan = optimal(Planner::run(raw).unwrap());
    assert_eq!(plan.quantity(ProductId(0)), Some(10.));
    assert_eq!(plan.quantity(ProductId(1)), Some(35.));
    assert_eq!(plan.quantity(ProductId(2)), Some(0.));
    assert_eq!(plan.total_profit, 117_500.);
}

#[test]
fn unreachable_minimum_is_infeasible() {
    let mut raw = ice_cream();
    raw.constraints.push(RawConstraint::Minimum {
        product: "Strawberry".to_owned(),
        quantity: 30.,
    });

    assert_eq!(
        Planner::run(raw).unwrap(),
        PlanOutcome::Infeasible {
            status: SolverStatus::Infeasible
        }
    );
}

#[test]
fn free_product_is_unbounded() {
    let mut raw = ice_cream();
    raw.products.push(RawProduct {
        name: "Air".to_owned(),
        consumption: BTreeMap::new(),
        profit_per_unit: 1.,
    });

    assert_eq!(
        Planner::run(raw).unwrap(),
        PlanOutcome::Infeasible {
            status: SolverStatus::Unbounded
        }
    );
}

#[test]
fn free_product_with_unreachable_minimum_is_infeasible() {
    let mut raw = ice_cream();
    raw.products.push(RawProduct {
        name: "Air".to_owned(),
        consumption: BTreeMap::new(),
        profit_per_unit: 1.,
    });
    // 4 * 30 bahan exceeds the 100 available
    raw.constraints.push(RawConstraint::Minimum {
        product: "Strawberry".to_owned(),
        quantity: 30.,
    });

    assert_eq!(
        Planner::run(raw).unwrap(),
        PlanOutcome::Infeasible {
            status: SolverStatus::Infeasible
        }
    );
}

#[test]
fn unknown_resource_is_rejected() {
    let mut raw = ice_cream();
    raw.products[0].consumption.insert("milk".to_owned(), 1.);

    let err = Planner::validate(raw).unwrap_err();
    assert_eq!(err.field, "Chocolate.consumption");
    assert_eq!(err.reason, "unknown resource \"milk\"");
}

#[test]
fn duplicate_product_is_rejected() {
    let mut raw = ice_cream();
    raw.products.push(raw_product("Vanilla", 1., 1., 1.));

    let err = Planner::validate(raw).unwrap_err();
    assert_eq!(err.field, "products.3.name");
}

#[test]
fn negative_capacity_is_rejected() {
    let mut raw = ice_cream();
    raw.resources[1].capacity = -1.;

    let err = Planner::run(raw).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("jam.capacity"));
}

#[test]
fn constraint_on_unknown_product_is_rejected() {
    let mut raw = ice_cream();
    raw.constraints.push(RawConstraint::Equal {
        first: "Chocolate".to_owned(),
        second: "Mint".to_owned(),
    });

    let err = Planner::validate(raw).unwrap_err();
    assert_eq!(err.field, "constraints.0");
}

#[test]
fn mismatched_consumption_is_rejected_by_the_solver_entry() {
    let products = [ProductSpec::new("Chocolate".to_owned(), vec![1.], 1.)];
    let capacities = [
        ResourceCapacity::new("bahan".to_owned(), 1.),
        ResourceCapacity::new("jam".to_owned(), 1.),
    ];

    let err = solve_plan(&products, &capacities, &[]).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn raw_input_reads_from_json() {
    let raw: RawPlanInput = serde_json::from_str(
        r#"{
            "resources": [{ "name": "bahan", "capacity": 10 }],
            "products": [{ "name": "Mint", "consumption": { "bahan": 2 }, "profit_per_unit": 5 }],
            "constraints": [{ "kind": "minimum", "product": "Mint", "quantity": 1 }]
        }"#,
    )
    .unwrap();

    assert!(!raw.equalize);
    assert_eq!(
        raw.constraints,
        vec![RawConstraint::Minimum {
            product: "Mint".to_owned(),
            quantity: 1.
        }]
    );
    let plan = optimal(Planner::run(raw).unwrap());
    assert_eq!(plan.total_profit, 25.);
}

fn product_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.5..10.0, 0.5..10.0, 0.0..5000.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn plans_are_non_negative_and_within_capacity(
        specs in vec(product_strategy(), 1..=3),
        bahan in 10.0..200.0,
        jam in 10.0..200.0,
    ) {
        let products = specs
            .iter()
            .enumerate()
            .map(|(i, (b, j, profit))| ProductSpec::new(format!("p{i}"), vec![*b, *j], *profit))
            .collect::<Vec<_>>();
        let capacities = vec![
            ResourceCapacity::new("bahan".to_owned(), bahan),
            ResourceCapacity::new("jam".to_owned(), jam),
        ];

        let outcome = solve_plan(&products, &capacities, &[]).unwrap();
        let PlanOutcome::Optimal(plan) = outcome else {
            return Err(TestCaseError::fail("expected an optimal plan"));
        };
        for planned in &plan.quantities {
            prop_assert!(planned.quantity >= 0.);
        }
        for usage in &plan.resource_usage {
            prop_assert!(usage.used <= usage.capacity + 1e-9 * usage.capacity.max(1.));
        }
    }
}
