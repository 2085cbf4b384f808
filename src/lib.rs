pub mod error;
pub mod io;
pub mod math;

pub use error::{Error, Result};
pub use math::bls12_381::Fr;
pub use math::ntt::{bitrev, inverse_serial_ntt, serial_ntt};
pub use math::parallel_ntt::{ntt, parallel_ntt, Mode};
pub use math::poly::{condense, multiply, schoolbook_multiply, Convention};
