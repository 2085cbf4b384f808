use super::finite_field::FiniteField;
use crate::error::{Error, Result};

/// Returns `log2(n)`, or `DomainSize` when `n` is not a power of two.
pub(crate) fn log2_exact(n: usize) -> Result<u32> {
    if !n.is_power_of_two() {
        return Err(Error::DomainSize { len: n });
    }
    Ok(n.trailing_zeros())
}

/// Reverses the low `logn` bits of `k`.
#[inline]
pub(crate) fn bitreverse(k: usize, logn: u32) -> usize {
    if logn == 0 {
        return 0;
    }
    k.reverse_bits() >> (usize::BITS - logn)
}

/// bit reversal
/// the length of x should be a power of two
pub fn bitrev<T>(x: &mut [T]) -> Result<()> {
    let logn = log2_exact(x.len())?;
    for k in 0..x.len() {
        let rk = bitreverse(k, logn);
        if k < rk {
            x.swap(k, rk);
        }
    }
    Ok(())
}

/// Computes the forward number-theoretic transform of x in place, with respect
/// to `omega`, which must satisfy omega^n = 1 where n = x.len().
///
/// Iterative Cooley-Tukey: bit-reverse the input, then merge butterflies of
/// width 2, 4, ..., n. The length of x must be a power of 2; otherwise x is
/// left untouched and `DomainSize` is returned.
pub fn serial_ntt<T: FiniteField>(x: &mut [T], omega: T) -> Result<()> {
    let n = x.len();
    let logn = log2_exact(n)?;

    bitrev(x)?;

    // invariant: m = 2^{s-1}
    let mut m = 1;
    for _ in 1..=logn {
        // w_m is a 2m-th root of unity
        let w_m = omega.pow((n / (2 * m)) as u64);
        for group in x.chunks_exact_mut(2 * m) {
            let (lo, hi) = group.split_at_mut(m);
            let mut w = T::ONE;
            for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                let t = w * *v;
                *v = *u - t;
                *u += t;
                w *= w_m;
            }
        }
        m *= 2;
    }
    Ok(())
}

/// Multiplies every entry by 1/n.
pub(crate) fn scale_by_inverse_size<T: FiniteField>(x: &mut [T]) -> Result<()> {
    let n_inv = T::from(x.len() as u64).inv()?;
    for v in x.iter_mut() {
        *v *= n_inv;
    }
    Ok(())
}

/// Inverse of [`serial_ntt`] for the same `omega`, including the 1/n scaling.
pub fn inverse_serial_ntt<T: FiniteField>(x: &mut [T], omega: T) -> Result<()> {
    log2_exact(x.len())?;
    serial_ntt(x, omega.inv()?)?;
    scale_by_inverse_size(x)
}
