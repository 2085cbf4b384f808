use rand::Rng;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use super::prime::{modpow, prime_factors};
use crate::error::{Error, Result};

pub trait FiniteRing:
    Sized
    + Eq
    + Add<Output = Self>
    + Neg<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + MulAssign
    + Copy
    + Clone
{
    const ZERO: Self;
    const ONE: Self;
}

/// Everything the transform engine needs from a coefficient field.
pub trait FiniteField: FiniteRing + From<u64> + Debug + Send + Sync {
    fn inv(&self) -> Result<Self>;

    /// Returns an element of multiplicative order exactly `n`.
    /// `n` must be a power of two dividing `p - 1`.
    fn get_primitive_root_of_unity(n: usize) -> Result<Self>;

    /// Uniformly random element.
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    fn pow(&self, mut exp: u64) -> Self {
        let mut base = *self;
        let mut res = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                res *= base;
            }
            base *= base;
            exp >>= 1;
        }
        res
    }
}

/// Fixed-width canonical encoding, one record per element.
pub trait FieldBytes: Sized {
    const NUM_BYTES: usize;

    /// Little-endian limbs, low limb first.
    fn to_bytes_le(&self) -> Vec<u8>;

    /// Decodes exactly `NUM_BYTES` bytes. Values at or above the modulus are
    /// reduced.
    fn from_bytes_le(bytes: &[u8]) -> Result<Self>;
}

/// Prime field with a modulus known at compile time. `P` must be prime.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub struct Fp<const P: u64> {
    val: u64,
}

impl<const P: u64> Add for Fp<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            val: ((self.val as u128 + rhs.val as u128) % P as u128) as u64,
        }
    }
}

impl<const P: u64> Mul for Fp<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            val: ((self.val as u128 * rhs.val as u128) % P as u128) as u64,
        }
    }
}

impl<const P: u64> Neg for Fp<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.val == 0 {
            return Self::ZERO;
        }

        Self { val: P - self.val }
    }
}

impl<const P: u64> Sub for Fp<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl<const P: u64> AddAssign for Fp<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const P: u64> MulAssign for Fp<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const P: u64> FiniteRing for Fp<P> {
    const ZERO: Self = Self { val: 0 };
    const ONE: Self = Self { val: 1 };
}

impl<const P: u64> From<u64> for Fp<P> {
    fn from(val: u64) -> Self {
        Self { val: val % P }
    }
}

impl<const P: u64> From<Fp<P>> for u64 {
    fn from(x: Fp<P>) -> u64 {
        x.val
    }
}

impl<const P: u64> Fp<P> {
    /// The multiplicative group Fp^{*} is cyclic; returns its smallest generator.
    pub fn get_generator() -> Self {
        for i in 2..P {
            if is_primitive_root(i, P) {
                return Self { val: i };
            }
        }
        // Only F_2 reaches this point, where 1 generates the trivial group.
        Self::ONE
    }
}

impl<const P: u64> FiniteField for Fp<P> {
    fn inv(&self) -> Result<Self> {
        if self.val == 0 {
            return Err(Error::ZeroInverse);
        }
        Ok(Self {
            val: modpow(self.val, P - 2, P),
        })
    }

    fn get_primitive_root_of_unity(n: usize) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(Error::DomainSize { len: n });
        }
        if (P - 1) % (n as u64) != 0 {
            return Err(Error::NoRootOfUnity { order: n });
        }

        let g = Self::get_generator().val;
        let power = (P - 1) / n as u64;
        Ok(Self {
            val: modpow(g, power, P),
        })
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            val: rng.gen_range(0..P),
        }
    }
}

impl<const P: u64> FieldBytes for Fp<P> {
    const NUM_BYTES: usize = 8;

    fn to_bytes_le(&self) -> Vec<u8> {
        self.val.to_le_bytes().to_vec()
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self> {
        let record: [u8; 8] = bytes.try_into().map_err(|_| Error::InvalidRecord {
            len: bytes.len(),
            expected: Self::NUM_BYTES,
        })?;
        Ok(Self::from(u64::from_le_bytes(record)))
    }
}

fn is_primitive_root(val: u64, p: u64) -> bool {
    if modpow(val, p - 1, p) != 1 {
        return false;
    }
    for i in prime_factors(p - 1) {
        if modpow(val, (p - 1) / i, p) == 1 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::F998244353;

    #[test]
    fn test_generator() {
        assert_eq!(Fp::<17>::get_generator(), Fp::<17>::from(3));
        assert_eq!(Fp::<113>::get_generator(), Fp::<113>::from(3));
        assert_eq!(Fp::<22273>::get_generator(), Fp::<22273>::from(5));
        assert_eq!(Fp::<31489>::get_generator(), Fp::<31489>::from(7));
        assert_eq!(F998244353::get_generator(), F998244353::from(3));
    }

    #[test]
    fn test_arithmetic() {
        let a = Fp::<17>::from(15);
        let b = Fp::<17>::from(5);
        assert_eq!(a + b, Fp::from(3));
        assert_eq!(b - a, Fp::from(7));
        assert_eq!(a * b, Fp::from(7));
        assert_eq!(-Fp::<17>::ZERO, Fp::ZERO);
        assert_eq!(b.pow(16), Fp::ONE);
    }

    #[test]
    fn test_inv() {
        let a = Fp::<11>::from(4);
        assert_eq!(a.inv().unwrap(), Fp::from(3));
        assert!(matches!(Fp::<11>::ZERO.inv(), Err(Error::ZeroInverse)));
    }

    #[test]
    fn test_root_of_unity_order() {
        for log_n in 0..=10 {
            let n = 1usize << log_n;
            let w = F998244353::get_primitive_root_of_unity(n).unwrap();
            assert_eq!(w.pow(n as u64), F998244353::ONE);
            if n > 1 {
                assert_ne!(w.pow(n as u64 / 2), F998244353::ONE);
            }
        }
    }

    #[test]
    fn test_root_of_unity_rejects_bad_order() {
        assert!(matches!(
            F998244353::get_primitive_root_of_unity(12),
            Err(Error::DomainSize { len: 12 })
        ));
        // 998244353 - 1 = 119 * 2^23
        assert!(matches!(
            F998244353::get_primitive_root_of_unity(1 << 24),
            Err(Error::NoRootOfUnity { .. })
        ));
    }

    #[test]
    fn test_bytes() {
        let x = F998244353::from(0x0102_0304);
        assert_eq!(x.to_bytes_le(), vec![4, 3, 2, 1, 0, 0, 0, 0]);
        assert_eq!(F998244353::from_bytes_le(&x.to_bytes_le()).unwrap(), x);
        assert!(matches!(
            F998244353::from_bytes_le(&[1, 2, 3]),
            Err(Error::InvalidRecord { len: 3, expected: 8 })
        ));
    }
}
