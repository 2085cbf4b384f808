use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};
use std::sync::OnceLock;

use super::finite_field::{FieldBytes, FiniteField, FiniteRing};
use crate::error::{Error, Result};

/// r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
const MODULUS: [u64; 4] = [
    0xffff_ffff_0000_0001,
    0x53bd_a402_fffe_5bfe,
    0x3339_d808_09a1_d805,
    0x73ed_a753_299d_7d48,
];

/// r - 1 = 2^32 * t with t odd.
const TWO_ADICITY: u32 = 32;

/// Smallest generator of the multiplicative group.
const GENERATOR: u64 = 7;

fn modulus() -> &'static BigUint {
    static MODULUS_BIG: OnceLock<BigUint> = OnceLock::new();
    MODULUS_BIG.get_or_init(|| limbs_to_biguint(&MODULUS))
}

fn limbs_to_biguint(limbs: &[u64; 4]) -> BigUint {
    let bytes: Vec<u8> = limbs.iter().flat_map(|l| l.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

/// `x` must be below r.
fn biguint_to_limbs(x: &BigUint) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (limb, digit) in limbs.iter_mut().zip(x.to_u64_digits()) {
        *limb = digit;
    }
    limbs
}

#[inline]
fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = a as u128 + b as u128 + carry as u128;
    (t as u64, (t >> 64) as u64)
}

#[inline]
fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub(b as u128 + borrow as u128);
    (t as u64, (t >> 127) as u64)
}

fn add_limbs(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut res = [0u64; 4];
    let mut carry = 0;
    for i in 0..4 {
        (res[i], carry) = adc(a[i], b[i], carry);
    }
    res
}

fn sub_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut res = [0u64; 4];
    let mut borrow = 0;
    for i in 0..4 {
        (res[i], borrow) = sbb(a[i], b[i], borrow);
    }
    (res, borrow)
}

fn reduce_once(a: [u64; 4]) -> [u64; 4] {
    let (diff, borrow) = sub_limbs(&a, &MODULUS);
    if borrow == 0 {
        diff
    } else {
        a
    }
}

/// Element of the BLS12-381 scalar field, kept in canonical (non-Montgomery)
/// form as four little-endian u64 limbs.
#[derive(PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Fr([u64; 4]);

impl Fr {
    pub fn modulus() -> BigUint {
        modulus().clone()
    }

    pub fn to_biguint(&self) -> BigUint {
        limbs_to_biguint(&self.0)
    }

    pub fn from_biguint(x: &BigUint) -> Self {
        Self(biguint_to_limbs(&(x % modulus())))
    }

    pub fn limbs(&self) -> [u64; 4] {
        self.0
    }
}

impl Add for Fr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        // both operands are below r < 2^255, so the sum fits in four limbs
        Self(reduce_once(add_limbs(&self.0, &rhs.0)))
    }
}

impl Sub for Fr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        if borrow == 0 {
            Self(diff)
        } else {
            Self(add_limbs(&diff, &MODULUS))
        }
    }
}

impl Neg for Fr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::ZERO - self
    }
}

impl Mul for Fr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let prod = self.to_biguint() * rhs.to_biguint();
        Self(biguint_to_limbs(&(prod % modulus())))
    }
}

impl AddAssign for Fr {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl MulAssign for Fr {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl FiniteRing for Fr {
    const ZERO: Self = Self([0; 4]);
    const ONE: Self = Self([1, 0, 0, 0]);
}

impl From<u64> for Fr {
    fn from(val: u64) -> Self {
        Self([val, 0, 0, 0])
    }
}

impl FiniteField for Fr {
    fn inv(&self) -> Result<Self> {
        if *self == Self::ZERO {
            return Err(Error::ZeroInverse);
        }
        let exp = modulus() - 2u32;
        Ok(Self(biguint_to_limbs(
            &self.to_biguint().modpow(&exp, modulus()),
        )))
    }

    fn get_primitive_root_of_unity(n: usize) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(Error::DomainSize { len: n });
        }
        if n.trailing_zeros() > TWO_ADICITY {
            return Err(Error::NoRootOfUnity { order: n });
        }
        let exp = (modulus() - 1u32) / BigUint::from(n);
        let root = BigUint::from(GENERATOR).modpow(&exp, modulus());
        Ok(Self(biguint_to_limbs(&root)))
    }

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(biguint_to_limbs(&rng.gen_biguint_below(modulus())))
    }
}

impl FieldBytes for Fr {
    const NUM_BYTES: usize = 32;

    fn to_bytes_le(&self) -> Vec<u8> {
        self.0.iter().flat_map(|l| l.to_le_bytes()).collect()
    }

    fn from_bytes_le(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::NUM_BYTES {
            return Err(Error::InvalidRecord {
                len: bytes.len(),
                expected: Self::NUM_BYTES,
            });
        }
        Ok(Self::from_biguint(&BigUint::from_bytes_le(bytes)))
    }
}

impl fmt::Debug for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fr(0x{:x})", self.to_biguint())
    }
}

impl fmt::Display for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::LowerHex for Fr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_biguint(), f)
    }
}
