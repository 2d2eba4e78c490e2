//! Tolerance assertions shared by unit and integration tests.

use crate::Qbit;

pub const EPS: f64 = 1e-10;

pub fn complex_within(expected_re: f64, expected_im: f64, actual: Qbit, eps: f64) -> bool {
    (expected_re - actual.re).abs() < eps && (expected_im - actual.im).abs() < eps
}

#[macro_export]
macro_rules! assert_approx_complex_eq {
    ($expected_re:expr, $expected_im:expr, $actual:expr) => {{
        let (expected_re, expected_im, actual) = ($expected_re, $expected_im, $actual);
        assert!(
            $crate::test_util::complex_within(
                expected_re,
                expected_im,
                actual,
                $crate::test_util::EPS
            ),
            "Expected {}+{}i,  but got {}",
            expected_re,
            expected_im,
            actual
        );
    }};
}

#[macro_export]
macro_rules! assert_approx_eq {
    ($expected:expr, $actual:expr) => {
        $crate::assert_approx_eq!($expected, $actual, $crate::test_util::EPS)
    };
    ($expected:expr, $actual:expr, $eps:expr) => {{
        let expected: f64 = $expected;
        let actual: f64 = $actual;
        assert!(
            (expected - actual).abs() < $eps,
            "Expected {}, but got {}",
            expected,
            actual
        );
    }};
}
