use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The sequence length is not a power of two, or the field has no
    /// subgroup of the required order.
    #[error("domain size {len} is not a supported power of two")]
    DomainSize { len: usize },

    #[error("the field has no root of unity of order {order}")]
    NoRootOfUnity { order: usize },

    #[error("zero has no multiplicative inverse")]
    ZeroInverse,

    /// A serialized coefficient stream ended inside a record.
    #[error("truncated field element record: got {len} bytes, expected {expected}")]
    InvalidRecord { len: usize, expected: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
