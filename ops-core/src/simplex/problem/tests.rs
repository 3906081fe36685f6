use pretty_assertions::assert_eq;

use super::*;

fn ratio(n: i64) -> BigRational {
    BigRational::from_integer(n.into())
}

fn row(values: &[f64]) -> RowDVector<f64> {
    RowDVector::from_row_slice(values)
}

fn finite(solution: Solution) -> (Vec<BigRational>, BigRational) {
    match solution {
        Solution::Finite {
            variables,
            function_value,
        } => (variables.iter().cloned().collect(), function_value),
        other => panic!("expected a finite solution, got {}", other.as_str()),
    }
}

#[test]
fn problem_normalize_lays_out_compensating_and_artificial_columns() {
    let problem = Problem::normalize(
        ObjectiveFunction::maximize(row(&[3., 5.])),
        vec![
            Constraint::new(row(&[1., 1.]), Sign::Less, 4.),
            Constraint::new(row(&[1.]), Sign::Greater, 1.),
            Constraint::new(row(&[1., -1.]), Sign::Equals, 0.),
        ],
    )
    .unwrap();

    assert_eq!(problem.n_variables, 2);
    assert_eq!(problem.first_artificial, 4);
    assert_eq!(problem.basis, vec![2, 4, 5]);
    assert_eq!(
        problem.constraints,
        DMatrix::from_row_slice(
            3,
            6,
            &[
                1, 1, 1, 0, 0, 0, //
                1, 0, 0, -1, 1, 0, //
                1, -1, 0, 0, 0, 1, //
            ]
            .map(ratio)
        )
    );
    assert_eq!(
        problem.rhs,
        DVector::from_column_slice(&[4, 1, 0].map(ratio))
    );
    assert_eq!(
        problem.coefficients,
        RowDVector::from_vec(vec![
            BigNumber::from(ratio(3)),
            BigNumber::from(ratio(5)),
            BigNumber::zero(),
            BigNumber::zero(),
            -BigNumber::one_big(),
            -BigNumber::one_big(),
        ])
    );
}

#[test]
fn problem_normalize_flips_negative_rhs() {
    let problem = Problem::normalize(
        ObjectiveFunction::minimize(row(&[1.])),
        vec![Constraint::new(row(&[-1.]), Sign::Less, -2.)],
    )
    .unwrap();

    // -x <= -2 becomes x >= 2: a surplus and an artificial column
    assert_eq!(
        problem.constraints,
        DMatrix::from_row_slice(1, 3, &[1, -1, 1].map(ratio))
    );
    assert_eq!(problem.rhs, DVector::from_column_slice(&[ratio(2)]));
    assert_eq!(problem.coefficients[2], BigNumber::one_big());
}

#[test]
fn problem_without_variables_is_rejected() {
    let err = Problem::new(ObjectiveFunction::maximize(row(&[])), vec![]).unwrap_err();
    assert!(err.is_empty());
}

#[test]
fn non_finite_coefficients_are_rejected() {
    let err = Problem::new(
        ObjectiveFunction::maximize(row(&[1.])),
        vec![Constraint::new(row(&[f64::NAN]), Sign::Less, 1.)],
    )
    .unwrap_err();
    assert!(err.is_non_finite());
}

#[test]
fn solves_textbook_maximization() {
    // max 3x + 5y; x <= 4, 2y <= 12, 3x + 2y <= 18
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[3., 5.])),
        vec![
            Constraint::new(row(&[1., 0.]), Sign::Less, 4.),
            Constraint::new(row(&[0., 2.]), Sign::Less, 12.),
            Constraint::new(row(&[3., 2.]), Sign::Less, 18.),
        ],
    )
    .unwrap();

    let (variables, function_value) = finite(problem.solve());
    assert_eq!(variables, vec![ratio(2), ratio(6)]);
    assert_eq!(function_value, ratio(36));
}

#[test]
fn solves_minimization_with_lower_bounds() {
    // min 2x + 3y; x + y >= 4, x + 3y >= 6
    let problem = Problem::new(
        ObjectiveFunction::minimize(row(&[2., 3.])),
        vec![
            Constraint::new(row(&[1., 1.]), Sign::Greater, 4.),
            Constraint::new(row(&[1., 3.]), Sign::Greater, 6.),
        ],
    )
    .unwrap();

    let (variables, function_value) = finite(problem.solve());
    assert_eq!(variables, vec![ratio(3), ratio(1)]);
    assert_eq!(function_value, ratio(9));
}

#[test]
fn solves_with_equality() {
    // max x + y; x - y = 0, x + 2y <= 6
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[1., 1.])),
        vec![
            Constraint::new(row(&[1., -1.]), Sign::Equals, 0.),
            Constraint::new(row(&[1., 2.]), Sign::Less, 6.),
        ],
    )
    .unwrap();

    let (variables, function_value) = finite(problem.solve());
    assert_eq!(variables, vec![ratio(2), ratio(2)]);
    assert_eq!(function_value, ratio(4));
}

#[test]
fn detects_infeasibility() {
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[1.])),
        vec![
            Constraint::new(row(&[1.]), Sign::Less, 1.),
            Constraint::new(row(&[1.]), Sign::Greater, 2.),
        ],
    )
    .unwrap();

    assert!(problem.solve().is_absent());
}

#[test]
fn detects_unboundedness() {
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[1., 1.])),
        vec![Constraint::new(row(&[1., -1.]), Sign::Less, 1.)],
    )
    .unwrap();

    assert!(problem.solve().is_infinite());
}

#[test]
fn free_direction_does_not_hide_infeasibility() {
    // y is unconstrained, but x <= 1 and x >= 2 contradict each other
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[1., 1.])),
        vec![
            Constraint::new(row(&[1., 0.]), Sign::Greater, 2.),
            Constraint::new(row(&[1., 0.]), Sign::Less, 1.),
        ],
    )
    .unwrap();

    assert!(problem.solve().is_absent());
}

#[test]
fn unbounded_with_lower_bound_stays_unbounded() {
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[1., 1.])),
        vec![Constraint::new(row(&[1., 0.]), Sign::Greater, 1.)],
    )
    .unwrap();

    assert!(problem.solve().is_infinite());
}

#[test]
fn feasibility_problem_prices_only_artificial_columns() {
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[3.])),
        vec![Constraint::new(row(&[1.]), Sign::Greater, 1.)],
    )
    .unwrap();
    let feasibility = problem.feasibility();

    assert!(feasibility.minimization);
    assert_eq!(
        feasibility.coefficients,
        RowDVector::from_vec(vec![
            BigNumber::zero(),
            BigNumber::zero(),
            BigNumber::from(ratio(1)),
        ])
    );
    assert_eq!(feasibility.constraints, problem.constraints);
}

#[test]
fn terminates_on_beale_cycling_example() {
    // The classic problem on which the largest-coefficient rule cycles forever
    let problem = Problem::new(
        ObjectiveFunction::minimize(row(&[-0.75, 20., -0.5, 6.])),
        vec![
            Constraint::new(row(&[0.25, -8., -1., 9.]), Sign::Less, 0.),
            Constraint::new(row(&[0.5, -12., -0.5, 3.]), Sign::Less, 0.),
            Constraint::new(row(&[0., 0., 1., 0.]), Sign::Less, 1.),
        ],
    )
    .unwrap();

    let (variables, function_value) = finite(problem.solve());
    assert_eq!(function_value, BigRational::new((-5).into(), 4.into()));
    assert_eq!(variables[0], ratio(1));
    assert_eq!(variables[2], ratio(1));
}

#[test]
fn table_estimations_start_from_the_penalized_basis() {
    let problem = Problem::new(
        ObjectiveFunction::maximize(row(&[2.])),
        vec![Constraint::new(row(&[1.]), Sign::Equals, 3.)],
    )
    .unwrap();
    let table = SimplexTable::new(problem);

    assert_eq!(table.basis(), &[1]);
    // z_0 - c_0 = (-M)(1) - 2
    assert_eq!(
        table.column_estimation(0),
        Some(BigNumber::new(ratio(-1), ratio(-2)))
    );
    assert_eq!(table.column_estimation(2), None);
    assert_eq!(
        table.function_estimation(),
        BigNumber::new(ratio(-3), ratio(0))
    );
}
