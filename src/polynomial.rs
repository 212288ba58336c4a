use bc_crypto::memzero;
use bc_rand::RandomNumberGenerator;

use crate::{
    ShamirError,
    field::{add, div, mul},
};

/// A polynomial over GF(2^8) whose intercept is one byte of a secret.
///
/// Coefficient 0 is the intercept; the remaining coefficients are random.
/// The coefficients are wiped when the polynomial is dropped.
pub struct Polynomial {
    coefficients: Vec<u8>,
}

impl Polynomial {
    /// Construct a random polynomial of the given degree with a fixed
    /// intercept.
    pub fn random(
        intercept: u8,
        degree: usize,
        random_generator: &mut impl RandomNumberGenerator,
    ) -> Self {
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = intercept;
        random_generator.fill_random_data(&mut coefficients[1..]);
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    /// Evaluate the polynomial at `x` using Horner's method.
    pub fn evaluate(&self, x: u8) -> u8 {
        if x == 0 {
            return self.coefficients[0];
        }
        self.coefficients
            .iter()
            .rev()
            .fold(0u8, |acc, &coefficient| add(mul(acc, x), coefficient))
    }
}

impl Drop for Polynomial {
    fn drop(&mut self) {
        memzero(self.coefficients.as_mut_slice());
    }
}

/// Evaluate at `x` the unique polynomial passing through the sample points
/// `(xs[i], ys[i])`, using Lagrange interpolation.
///
/// ```text
///               ---            ---     (x - xs[j])
///   result  =   \    ys[i] *   | |   ---------------
///               /            j != i  (xs[i] - xs[j])
///               ---
///                i
/// ```
///
/// The x-coordinates must be pairwise distinct.
pub fn interpolate(xs: &[u8], ys: &[u8], x: u8) -> Result<u8, ShamirError> {
    if xs.len() != ys.len() {
        return Err(ShamirError::SampleLengthMismatch);
    }
    let mut result = 0u8;
    for (i, (&xi, &yi)) in xs.iter().zip(ys).enumerate() {
        let mut basis = 1u8;
        for (j, &xj) in xs.iter().enumerate() {
            if i == j {
                continue;
            }
            let term = div(add(x, xj), add(xi, xj))?;
            basis = mul(basis, term);
        }
        result = add(result, mul(yi, basis));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_rand::SecureRandomNumberGenerator;

    fn polynomial(coefficients: &[u8]) -> Polynomial {
        Polynomial { coefficients: coefficients.to_vec() }
    }

    #[test]
    fn test_random_polynomial() {
        let mut rng = SecureRandomNumberGenerator;
        let p = Polynomial::random(42, 2, &mut rng);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coefficients().len(), 3);
        assert_eq!(p.coefficients()[0], 42);
    }

    #[test]
    fn test_evaluate() {
        let p = polynomial(&[42, 1, 2]);
        assert_eq!(p.evaluate(0), 42);
        // 2 * 1^2 + 1 * 1 + 42
        assert_eq!(p.evaluate(1), 42 ^ 1 ^ 2);
        // 2 * 2^2 + 1 * 2 + 42
        assert_eq!(p.evaluate(2), 42 ^ 2 ^ 8);
    }

    #[test]
    fn test_evaluate_constant() {
        let p = polynomial(&[7]);
        for x in 0..=255u8 {
            assert_eq!(p.evaluate(x), 7);
        }
    }

    #[test]
    fn test_interpolate_recovers_intercept() {
        let mut rng = SecureRandomNumberGenerator;
        for degree in 1..8usize {
            for intercept in [0u8, 1, 42, 0x80, 255] {
                let p = Polynomial::random(intercept, degree, &mut rng);
                let xs: Vec<u8> = (1..=(degree as u8 + 1)).map(|i| i * 3).collect();
                let ys: Vec<u8> = xs.iter().map(|&x| p.evaluate(x)).collect();
                assert_eq!(interpolate(&xs, &ys, 0), Ok(intercept));
            }
        }
    }

    #[test]
    fn test_interpolate_other_points() {
        let p = polynomial(&[42, 17, 99]);
        let xs = [10u8, 20, 30];
        let ys: Vec<u8> = xs.iter().map(|&x| p.evaluate(x)).collect();
        for x in [1u8, 77, 255] {
            assert_eq!(interpolate(&xs, &ys, x), Ok(p.evaluate(x)));
        }
    }

    #[test]
    fn test_interpolate_duplicate_x() {
        assert_eq!(
            interpolate(&[1, 1], &[2, 3], 0),
            Err(ShamirError::DivideByZero)
        );
    }

    #[test]
    fn test_interpolate_length_mismatch() {
        assert_eq!(
            interpolate(&[1, 2], &[3], 0),
            Err(ShamirError::SampleLengthMismatch)
        );
    }
}
