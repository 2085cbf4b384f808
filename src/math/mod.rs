use self::finite_field::Fp;

pub mod bls12_381;
pub mod finite_field;
pub mod ntt;
pub mod parallel_ntt;
pub mod poly;
mod prime;

/// 998244353 = 119 * 2^23 + 1, supports transforms up to 2^23 points.
pub type F998244353 = Fp<998244353>;
