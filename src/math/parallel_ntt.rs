use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use super::finite_field::FiniteField;
use super::ntt::{log2_exact, serial_ntt};
use crate::error::Result;

/// Scheduling regime for a transform or a multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Serial,
    /// Four-step transform split into `2^log_cpus` independent tasks, run on a
    /// pool of as many threads.
    Parallel { log_cpus: u32 },
}

impl Mode {
    /// Parallel mode with the largest power of two not exceeding the number of
    /// available processors.
    pub fn parallel_from_available() -> Self {
        let num_cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Mode::Parallel {
            log_cpus: num_cpus.ilog2(),
        }
    }

    /// Saturates at `usize::MAX` when `2^log_cpus` does not fit.
    pub fn num_workers(&self) -> usize {
        match *self {
            Mode::Serial => 1,
            Mode::Parallel { log_cpus } => 1usize.checked_shl(log_cpus).unwrap_or(usize::MAX),
        }
    }

    /// Threads needed to transform `len` points, or `None` when the transform
    /// runs serially (serial mode, or fewer than `2^log_cpus` points).
    pub(crate) fn pool_size(&self, len: usize) -> Option<usize> {
        match *self {
            Mode::Serial => None,
            Mode::Parallel { log_cpus } if len.checked_ilog2().unwrap_or(0) < log_cpus => None,
            Mode::Parallel { .. } => Some(self.num_workers()),
        }
    }

    /// Runs `op`, which transforms `len`-point sequences, on a dedicated pool of
    /// `pool_size(len)` threads, or directly on the calling thread when no pool
    /// is needed.
    pub(crate) fn run<R, F>(&self, len: usize, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> Result<R> + Send,
    {
        match self.pool_size(len) {
            None => op(),
            Some(num_threads) => {
                let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
                pool.install(op)
            }
        }
    }
}

/// Forward transform of `x` under the given scheduling regime.
pub fn ntt<T: FiniteField>(x: &mut [T], omega: T, mode: Mode) -> Result<()> {
    log2_exact(x.len())?;
    match mode {
        Mode::Serial => serial_ntt(x, omega),
        Mode::Parallel { log_cpus } => mode.run(x.len(), || parallel_ntt(x, omega, log_cpus)),
    }
}

/// Computes the same transform as [`serial_ntt`] with Bailey's four-step
/// decomposition into `2^log_cpus` tasks, on the current rayon pool.
///
/// With p = 2^log_cpus and n = p * r:
/// 1. task j builds the length-r row
///    `tmp[j][i] = sum_s x[i + s*r] * omega^(j * (i + s*r))`,
/// 2. every row is transformed with omega^p,
/// 3. `x[k*p + j] = tmp[j][k]`.
///
/// Each phase finishes before the next one starts. Falls back to
/// [`serial_ntt`] when n < p.
pub fn parallel_ntt<T: FiniteField>(x: &mut [T], omega: T, log_cpus: u32) -> Result<()> {
    let n = x.len();
    let log_n = log2_exact(n)?;

    if log_n < log_cpus {
        return serial_ntt(x, omega);
    }

    let num_cpus = 1usize << log_cpus;
    let log_row = log_n - log_cpus;
    let row_len = 1usize << log_row;

    let mut tmp = vec![vec![T::ZERO; row_len]; num_cpus];

    let input: &[T] = x;
    tmp.par_iter_mut().enumerate().for_each(|(j, row)| {
        let omega_j = omega.pow(j as u64);
        let omega_step = omega.pow((j << log_row) as u64);

        let mut elt = T::ONE;
        for (i, acc) in row.iter_mut().enumerate() {
            for s in 0..num_cpus {
                // invariant: elt is omega^(j*idx)
                let idx = i + (s << log_row);
                *acc += input[idx] * elt;
                elt *= omega_step;
            }
            elt *= omega_j;
        }
    });

    let omega_num_cpus = omega.pow(num_cpus as u64);
    tmp.par_iter_mut()
        .try_for_each(|row| serial_ntt(row, omega_num_cpus))?;

    x.par_iter_mut().enumerate().for_each(|(idx, out)| {
        // idx = (k << log_cpus) + j
        *out = tmp[idx & (num_cpus - 1)][idx >> log_cpus];
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::math::{bls12_381::Fr, F998244353};

    fn random_vec<T: FiniteField>(n: usize) -> Vec<T> {
        let mut rng = rand::thread_rng();
        (0..n).map(|_| T::random(&mut rng)).collect()
    }

    #[test]
    fn test_parallel_matches_serial() {
        for log_n in 0..=12 {
            let n = 1 << log_n;
            let omega = F998244353::get_primitive_root_of_unity(n).unwrap();
            let x = random_vec::<F998244353>(n);

            let mut expected = x.clone();
            serial_ntt(&mut expected, omega).unwrap();

            // log_cpus above log_n exercises the serial fallback
            for log_cpus in 0..=5 {
                let mut y = x.clone();
                parallel_ntt(&mut y, omega, log_cpus).unwrap();
                assert_eq!(y, expected, "n = {n}, log_cpus = {log_cpus}");
            }
        }
    }

    #[test]
    fn test_parallel_matches_serial_large() {
        let n = 1 << 16;
        let omega = F998244353::get_primitive_root_of_unity(n).unwrap();
        let x = random_vec::<F998244353>(n);

        let mut expected = x.clone();
        serial_ntt(&mut expected, omega).unwrap();
        let mut y = x;
        parallel_ntt(&mut y, omega, 3).unwrap();
        assert_eq!(y, expected);
    }

    #[test]
    fn test_parallel_bls12_381() {
        let n = 64;
        let omega = Fr::get_primitive_root_of_unity(n).unwrap();
        let x = random_vec::<Fr>(n);

        let mut expected = x.clone();
        serial_ntt(&mut expected, omega).unwrap();
        let mut y = x;
        parallel_ntt(&mut y, omega, 2).unwrap();
        assert_eq!(y, expected);
    }

    #[test]
    fn test_parallel_rejects_non_power_of_two() {
        let original = random_vec::<F998244353>(24);
        let mut x = original.clone();
        let omega = F998244353::get_primitive_root_of_unity(32).unwrap();
        assert!(matches!(
            parallel_ntt(&mut x, omega, 2),
            Err(Error::DomainSize { len: 24 })
        ));
        assert!(matches!(
            ntt(&mut x, omega, Mode::Parallel { log_cpus: 1 }),
            Err(Error::DomainSize { len: 24 })
        ));
        assert_eq!(x, original);
    }

    #[test]
    fn test_ntt_dispatch() {
        let n = 256;
        let omega = F998244353::get_primitive_root_of_unity(n).unwrap();
        let x = random_vec::<F998244353>(n);

        let mut serial = x.clone();
        ntt(&mut serial, omega, Mode::Serial).unwrap();
        let mut parallel = x;
        ntt(&mut parallel, omega, Mode::Parallel { log_cpus: 2 }).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_ntt_more_workers_than_points() {
        let n = 4;
        let omega = F998244353::get_primitive_root_of_unity(n).unwrap();
        let x = random_vec::<F998244353>(n);

        let mut expected = x.clone();
        serial_ntt(&mut expected, omega).unwrap();

        for log_cpus in [3, 13, 63, 64, u32::MAX] {
            let mut y = x.clone();
            ntt(&mut y, omega, Mode::Parallel { log_cpus }).unwrap();
            assert_eq!(y, expected, "log_cpus = {log_cpus}");
        }
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(Mode::Serial.pool_size(1 << 10), None);
        assert_eq!(Mode::Parallel { log_cpus: 2 }.pool_size(4), Some(4));
        assert_eq!(Mode::Parallel { log_cpus: 2 }.pool_size(1 << 10), Some(4));
        assert_eq!(Mode::Parallel { log_cpus: 13 }.pool_size(4), None);
        assert_eq!(Mode::Parallel { log_cpus: 64 }.pool_size(1 << 20), None);
        assert_eq!(Mode::Parallel { log_cpus: 0 }.pool_size(1), Some(1));
    }

    #[test]
    fn test_mode_workers() {
        assert_eq!(Mode::Serial.num_workers(), 1);
        assert_eq!(Mode::Parallel { log_cpus: 3 }.num_workers(), 8);
        assert_eq!(Mode::Parallel { log_cpus: 64 }.num_workers(), usize::MAX);

        let mode = Mode::parallel_from_available();
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let workers = mode.num_workers();
        assert!(workers.is_power_of_two());
        assert!(workers <= available && 2 * workers > available);
    }
}
