//! Tests for the clamped biharmonic solve.

use approx::assert_abs_diff_eq;
use vessel_mesh_dbihar::{
    Control, EdgeDerivatives, IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT, Outcome, Rectangle, Status,
    dbihar, required_workspace,
};

/// Grid plus edge data sampled from `u` and its gradient.
struct Problem {
    rect: Rectangle,
    f: Vec<f64>,
    bda: Vec<f64>,
    bdb: Vec<f64>,
    bdc: Vec<f64>,
    bdd: Vec<f64>,
}

impl Problem {
    fn sample(
        rect: Rectangle,
        u: impl Fn(f64, f64) -> f64,
        du_dx: impl Fn(f64, f64) -> f64,
        du_dy: impl Fn(f64, f64) -> f64,
    ) -> Self {
        let (hx, hy) = rect.spacing();
        let x = |i: usize| rect.a + i as f64 * hx;
        let y = |j: usize| rect.c + j as f64 * hy;
        let idf = rect.m + 2;

        let mut f = vec![0.0; idf * (rect.n + 2)];
        for j in 0..rect.n + 2 {
            for i in 0..rect.m + 2 {
                if i == 0 || j == 0 || i == rect.m + 1 || j == rect.n + 1 {
                    f[j * idf + i] = u(x(i), y(j));
                }
            }
        }

        Self {
            f,
            bda: (1..=rect.n).map(|j| du_dx(rect.a, y(j))).collect(),
            bdb: (1..=rect.n).map(|j| du_dx(rect.b, y(j))).collect(),
            bdc: (1..=rect.m).map(|i| du_dy(x(i), rect.c)).collect(),
            bdd: (1..=rect.m).map(|i| du_dy(x(i), rect.d)).collect(),
            rect,
        }
    }

    fn solve(&mut self, control: &Control) -> Outcome {
        let mut w = vec![
            0.0;
            required_workspace(control.iflag, self.rect.m, self.rect.n)
                .unwrap_or(0)
        ];
        let edges = EdgeDerivatives {
            bda: &self.bda,
            bdb: &self.bdb,
            bdc: &self.bdc,
            bdd: &self.bdd,
        };
        dbihar(
            &self.rect,
            &edges,
            &mut self.f,
            self.rect.m + 2,
            control,
            &mut w,
        )
    }

    fn value(&self, i: usize, j: usize) -> f64 {
        self.f[j * (self.rect.m + 2) + i]
    }
}

fn unit_square(m: usize, n: usize) -> Rectangle {
    Rectangle {
        a: 0.0,
        b: 1.0,
        m,
        c: 0.0,
        d: 1.0,
        n,
    }
}

fn tight(iflag: i32) -> Control {
    Control {
        iflag,
        tol: 1e-12,
        itcg: 200,
        ..Default::default()
    }
}

fn curved(rect: Rectangle) -> Problem {
    Problem::sample(
        rect,
        |x, y| x * x + 0.5 * y * y * y - x * y,
        |_, _| 0.0,
        |_, _| 0.0,
    )
}

#[test]
fn test_required_workspace() {
    assert_eq!(required_workspace(IFLAG_CONJUGATE_GRADIENT, 3, 3), Some(52));
    assert_eq!(required_workspace(IFLAG_DIRECT, 3, 3), Some(57));
    assert_eq!(
        required_workspace(IFLAG_CONJUGATE_GRADIENT, 99, 99),
        Some(1108)
    );
    assert_eq!(required_workspace(IFLAG_DIRECT, 99, 99), Some(6009));
    assert_eq!(required_workspace(3, 3, 3), None);
    assert_eq!(required_workspace(0, 3, 3), None);
}

#[test]
fn test_status_decoding() {
    assert_eq!(Status::try_from(-6), Ok(Status::NotConverged));
    assert_eq!(Status::try_from(0), Ok(Status::Unexpected));
    assert!(Status::try_from(-7).is_err());
    assert_eq!(Status::SingularSystem.code(), -5);
    assert_eq!(
        Status::NotConverged.to_string(),
        "conjugate gradient iteration failed to converge, try iflag = 4"
    );
}

#[test]
fn test_linear_data_is_reproduced() {
    let rect = Rectangle {
        a: 0.0,
        b: 1.0,
        m: 5,
        c: -1.0,
        d: 1.0,
        n: 3,
    };
    let u = |x: f64, y: f64| 2.0 * x + 3.0 * y + 1.0;

    for iflag in [IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT] {
        let mut problem = Problem::sample(rect, u, |_, _| 2.0, |_, _| 3.0);
        let outcome = problem.solve(&tight(iflag));
        assert_eq!(outcome.iflag, iflag);

        let (hx, hy) = rect.spacing();
        for j in 1..=rect.n {
            for i in 1..=rect.m {
                let expected = u(rect.a + i as f64 * hx, rect.c + j as f64 * hy);
                assert_abs_diff_eq!(problem.value(i, j), expected, epsilon = 1e-7);
            }
        }
    }
}

#[test]
fn test_bilinear_data_is_reproduced() {
    let rect = unit_square(3, 3);

    for iflag in [IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT] {
        let mut problem = Problem::sample(rect, |x, y| x * y, |_, y| y, |x, _| x);
        let outcome = problem.solve(&tight(iflag));
        assert!(outcome.is_success());
        assert_eq!(outcome.status(), None);

        for j in 1..=3 {
            for i in 1..=3 {
                let expected = (i as f64 * 0.25) * (j as f64 * 0.25);
                assert_abs_diff_eq!(problem.value(i, j), expected, epsilon = 1e-7);
            }
        }
    }
}

#[test]
fn test_lower_order_terms_keep_linear_solutions() {
    // Δ of a linear function vanishes, so any α leaves it a solution.
    let rect = unit_square(5, 5);
    let u = |x: f64, y: f64| 0.5 * x - y;

    for iflag in [IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT] {
        let mut problem = Problem::sample(rect, u, |_, _| 0.5, |_, _| -1.0);
        let control = Control {
            alpha: 1.5,
            ..tight(iflag)
        };
        assert_eq!(problem.solve(&control).iflag, iflag);

        for j in 1..=5 {
            for i in 1..=5 {
                let expected = u(i as f64 / 6.0, j as f64 / 6.0);
                assert_abs_diff_eq!(problem.value(i, j), expected, epsilon = 1e-6);
            }
        }
    }
}

#[test]
fn test_modes_agree() {
    let rect = Rectangle {
        a: -1.0,
        b: 2.0,
        m: 7,
        c: 0.0,
        d: 1.0,
        n: 5,
    };

    let mut iterative = curved(rect);
    let outcome = iterative.solve(&tight(IFLAG_CONJUGATE_GRADIENT));
    assert_eq!(outcome.iflag, IFLAG_CONJUGATE_GRADIENT);
    assert!(outcome.tol <= 1e-12);
    assert!(outcome.itcg > 0);

    let mut direct = curved(rect);
    let outcome = direct.solve(&tight(IFLAG_DIRECT));
    assert_eq!(outcome.iflag, IFLAG_DIRECT);
    assert_eq!(outcome.itcg, 0);
    assert!(outcome.tol < 1e-10);

    for (a, b) in iterative.f.iter().zip(&direct.f) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_lower_order_terms_modes_agree() {
    let rect = unit_square(5, 7);
    let control = |iflag| Control {
        alpha: -2.0,
        beta: 3.0,
        ..tight(iflag)
    };

    let mut iterative = curved(rect);
    assert!(iterative.solve(&control(IFLAG_CONJUGATE_GRADIENT)).is_success());
    let mut direct = curved(rect);
    assert!(direct.solve(&control(IFLAG_DIRECT)).is_success());

    for (a, b) in iterative.f.iter().zip(&direct.f) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_zero_data_converges_immediately() {
    let mut problem = Problem::sample(unit_square(3, 3), |_, _| 0.0, |_, _| 0.0, |_, _| 0.0);
    let outcome = problem.solve(&Control::default());

    assert_eq!(outcome.iflag, IFLAG_CONJUGATE_GRADIENT);
    assert_eq!(outcome.itcg, 0);
    assert!(problem.f.iter().all(|v| *v == 0.0));
}

#[test]
fn test_not_converged() {
    let mut problem = curved(unit_square(5, 5));
    let control = Control {
        tol: 1e-14,
        itcg: 1,
        ..Default::default()
    };
    let outcome = problem.solve(&control);

    assert_eq!(outcome.iflag, -6);
    assert_eq!(outcome.status(), Some(Status::NotConverged));
    assert_eq!(outcome.itcg, 1);
    assert!(outcome.tol > 1e-14);

    // The interior is left alone on failure.
    for j in 1..=5 {
        for i in 1..=5 {
            assert_eq!(problem.value(i, j), 0.0);
        }
    }
}

#[test]
fn test_default_control_converges_on_fine_grid() {
    let mut problem = curved(unit_square(63, 63));
    let outcome = problem.solve(&Control::default());

    assert_eq!(outcome.iflag, IFLAG_CONJUGATE_GRADIENT);
    assert!(outcome.itcg <= 10, "{outcome:?}");
    assert!(outcome.tol <= 1e-3, "{outcome:?}");
}

#[test]
fn test_fine_grid_modes_agree() {
    let rect = unit_square(31, 31);

    let mut iterative = curved(rect);
    let outcome = iterative.solve(&tight(IFLAG_CONJUGATE_GRADIENT));
    assert_eq!(outcome.iflag, IFLAG_CONJUGATE_GRADIENT);
    assert!(outcome.itcg < 100, "{outcome:?}");

    let mut direct = curved(rect);
    assert_eq!(direct.solve(&tight(IFLAG_DIRECT)).iflag, IFLAG_DIRECT);

    for (a, b) in iterative.f.iter().zip(&direct.f) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_indefinite_system() {
    let rect = unit_square(3, 3);
    let control = |iflag| Control {
        beta: -1e4,
        ..tight(iflag)
    };

    let mut problem = curved(rect);
    let outcome = problem.solve(&control(IFLAG_CONJUGATE_GRADIENT));
    assert_eq!(outcome.status(), Some(Status::NotConverged));
    assert_eq!(outcome.itcg, 0);
    for j in 1..=3 {
        for i in 1..=3 {
            assert_eq!(problem.value(i, j), 0.0);
        }
    }

    let mut problem = curved(rect);
    let outcome = problem.solve(&control(IFLAG_DIRECT));
    assert_eq!(outcome.status(), Some(Status::FactorizationFailed));
    assert_eq!(outcome.iflag, -4);
}

#[test]
fn test_workspace_contents_are_ignored() {
    let rect = unit_square(5, 7);

    for iflag in [IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT] {
        let mut clean = curved(rect);
        let expected = clean.solve(&tight(iflag));

        let mut dirty = curved(rect);
        let edges = EdgeDerivatives {
            bda: &dirty.bda,
            bdb: &dirty.bdb,
            bdc: &dirty.bdc,
            bdd: &dirty.bdd,
        };
        let mut w = vec![f64::NAN; required_workspace(iflag, 5, 7).unwrap()];
        let outcome = dbihar(&rect, &edges, &mut dirty.f, 7, &tight(iflag), &mut w);

        assert_eq!(outcome, expected);
        assert_eq!(dirty.f, clean.f);
    }
}

#[test]
fn test_resolve_is_deterministic() {
    let rect = unit_square(5, 3);
    for iflag in [IFLAG_CONJUGATE_GRADIENT, IFLAG_DIRECT] {
        let mut first = curved(rect);
        let mut second = curved(rect);
        let a = first.solve(&tight(iflag));
        let b = second.solve(&tight(iflag));
        assert_eq!(a, b);
        assert_eq!(first.f, second.f);
    }
}

#[test]
fn test_invalid_dimensions() {
    for (m, n) in [(4, 3), (3, 4), (1, 3), (3, 1), (2, 2)] {
        let mut problem = curved(unit_square(m, n));
        assert_eq!(problem.solve(&Control::default()).iflag, -1, "m = {m}, n = {n}");
    }

    // Dimensions are checked before the domain.
    let mut problem = curved(Rectangle {
        a: 1.0,
        b: 0.0,
        m: 4,
        c: 0.0,
        d: 1.0,
        n: 3,
    });
    assert_eq!(problem.solve(&Control::default()).iflag, -1);
}

#[test]
fn test_invalid_domain() {
    let degenerate = [(0.0, 0.0, 0.0, 1.0), (1.0, 0.0, 0.0, 1.0), (0.0, 1.0, 2.0, 1.0)];
    for (a, b, c, d) in degenerate {
        let mut problem = Problem::sample(
            Rectangle {
                a,
                b,
                m: 3,
                c,
                d,
                n: 3,
            },
            |_, _| 1.0,
            |_, _| 0.0,
            |_, _| 0.0,
        );
        let outcome = problem.solve(&Control::default());
        assert_eq!(outcome.status(), Some(Status::InvalidDomain));
    }
}

#[test]
fn test_insufficient_storage() {
    let rect = unit_square(3, 3);
    let mut problem = curved(rect);
    let edges = EdgeDerivatives {
        bda: &problem.bda,
        bdb: &problem.bdb,
        bdc: &problem.bdc,
        bdd: &problem.bdd,
    };
    let control = Control::default();

    // Row stride too small.
    let mut w = vec![0.0; 52];
    let outcome = dbihar(&rect, &edges, &mut problem.f, 4, &control, &mut w);
    assert_eq!(outcome.iflag, -3);

    // Workspace one short.
    let mut w = vec![0.0; 51];
    let outcome = dbihar(&rect, &edges, &mut problem.f, 5, &control, &mut w);
    assert_eq!(outcome.iflag, -3);

    // Direct mode needs more than the iterative one.
    let mut w = vec![0.0; 52];
    let direct = Control {
        iflag: IFLAG_DIRECT,
        ..control
    };
    let outcome = dbihar(&rect, &edges, &mut problem.f, 5, &direct, &mut w);
    assert_eq!(outcome.status(), Some(Status::InsufficientStorage));

    // Unknown mode.
    let mut w = vec![0.0; 1000];
    let unknown = Control { iflag: 3, ..control };
    let outcome = dbihar(&rect, &edges, &mut problem.f, 5, &unknown, &mut w);
    assert_eq!(outcome.iflag, -3);

    // Short derivative slice.
    let short = EdgeDerivatives {
        bdd: &problem.bdd[..2],
        ..edges
    };
    let mut w = vec![0.0; 52];
    let outcome = dbihar(&rect, &short, &mut problem.f, 5, &control, &mut w);
    assert_eq!(outcome.iflag, -3);
}
