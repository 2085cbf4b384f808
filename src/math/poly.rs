use super::finite_field::{FiniteField, FiniteRing};
use super::ntt::serial_ntt;
use super::parallel_ntt::{parallel_ntt, Mode};
use crate::error::Result;

/// How the product is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Transform size covers the whole product, so nothing wraps around.
    Cyclic,
    /// Product modulo X^n + 1 with n = next_pow2(max(len(a), len(b))).
    NegativeWrapped,
}

impl Convention {
    /// Transform size for operands of the given (non-zero) lengths.
    pub fn domain_size(&self, len_a: usize, len_b: usize) -> usize {
        match self {
            Convention::Cyclic => (len_a + len_b - 1).next_power_of_two(),
            Convention::NegativeWrapped => len_a.max(len_b).next_power_of_two(),
        }
    }
}

/// Drops trailing zero coefficients. The zero polynomial condenses to an
/// empty vector.
pub fn condense<T: FiniteRing>(c: &mut Vec<T>) {
    while c.last() == Some(&T::ZERO) {
        c.pop();
    }
}

fn pad<T: FiniteRing>(a: &[T], n: usize) -> Vec<T> {
    let mut u = a.to_vec();
    u.resize(n, T::ZERO);
    u
}

/// x[i] *= start * step^i
fn weight<T: FiniteRing>(x: &mut [T], start: T, step: T) {
    let mut w = start;
    for v in x.iter_mut() {
        *v *= w;
        w *= step;
    }
}

/// Forward transform on the current thread or the current rayon pool.
fn transform<T: FiniteField>(x: &mut [T], omega: T, mode: Mode) -> Result<()> {
    match mode {
        Mode::Serial => serial_ntt(x, omega),
        Mode::Parallel { log_cpus } => parallel_ntt(x, omega, log_cpus),
    }
}

/// Multiplies two polynomials given by their coefficients, lowest degree
/// first, through forward transforms, a pointwise product and an inverse
/// transform.
///
/// For `NegativeWrapped`, psi of order 2n folds the reduction modulo X^n + 1
/// into the transform: inputs are weighted by psi^i, transformed with
/// omega = psi^2, and the output is weighted by psi^-i.
///
/// Fails before touching any data if the field has no root of the needed
/// order.
pub fn multiply<T: FiniteField>(
    a: &[T],
    b: &[T],
    mode: Mode,
    convention: Convention,
) -> Result<Vec<T>> {
    if a.is_empty() || b.is_empty() {
        return Ok(vec![]);
    }

    let n = convention.domain_size(a.len(), b.len());
    let (omega, psi) = match convention {
        Convention::Cyclic => (T::get_primitive_root_of_unity(n)?, None),
        Convention::NegativeWrapped => {
            let psi = T::get_primitive_root_of_unity(2 * n)?;
            (psi * psi, Some(psi))
        }
    };
    let omega_inv = omega.inv()?;
    let n_inv = T::from(n as u64).inv()?;

    let mut u = pad(a, n);
    let mut v = pad(b, n);
    if let Some(psi) = psi {
        weight(&mut u, T::ONE, psi);
        weight(&mut v, T::ONE, psi);
    }

    let mut c = mode.run(n, || {
        transform(&mut u, omega, mode)?;
        transform(&mut v, omega, mode)?;
        let mut c: Vec<T> = u.iter().zip(v.iter()).map(|(&x, &y)| x * y).collect();
        transform(&mut c, omega_inv, mode)?;
        Ok(c)
    })?;

    match psi {
        Some(psi) => weight(&mut c, n_inv, psi.inv()?),
        None => weight(&mut c, n_inv, T::ONE),
    }
    condense(&mut c);
    Ok(c)
}

/// Direct O(len(a) * len(b)) product, reduced the same way [`multiply`]
/// reduces it.
pub fn schoolbook_multiply<T: FiniteRing>(a: &[T], b: &[T], convention: Convention) -> Vec<T> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }

    let mut c = match convention {
        Convention::Cyclic => vec![T::ZERO; a.len() + b.len() - 1],
        Convention::NegativeWrapped => vec![T::ZERO; convention.domain_size(a.len(), b.len())],
    };
    let n = c.len();

    for (i, &ai) in a.iter().enumerate() {
        for (j, &bj) in b.iter().enumerate() {
            let k = i + j;
            if k < n {
                c[k] += ai * bj;
            } else {
                // X^n + 1 = 0
                c[k - n] += -(ai * bj);
            }
        }
    }
    condense(&mut c);
    c
}
