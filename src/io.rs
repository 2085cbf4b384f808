//! Coefficient vectors on disk: a flat run of fixed-width records, one per
//! coefficient in ascending degree order, with no header.

use rand::Rng;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::math::finite_field::{FieldBytes, FiniteField};

/// Reads records until end of stream. A partial trailing record is an error.
pub fn read_polynomial<T: FieldBytes, R: Read>(mut reader: R) -> Result<Vec<T>> {
    let mut poly = vec![];
    let mut record = vec![0u8; T::NUM_BYTES];
    loop {
        let mut filled = 0;
        while filled < record.len() {
            match reader.read(&mut record[filled..]) {
                Ok(0) => break,
                Ok(len) => filled += len,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        if filled == 0 {
            return Ok(poly);
        }
        if filled < record.len() {
            return Err(Error::InvalidRecord {
                len: filled,
                expected: T::NUM_BYTES,
            });
        }
        poly.push(T::from_bytes_le(&record)?);
    }
}

pub fn write_polynomial<T: FieldBytes, W: Write>(mut writer: W, poly: &[T]) -> Result<()> {
    for c in poly {
        writer.write_all(&c.to_bytes_le())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_polynomial_from_file<T: FieldBytes>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let file = File::open(path)?;
    read_polynomial(BufReader::new(file))
}

pub fn write_polynomial_to_file<T: FieldBytes>(path: impl AsRef<Path>, poly: &[T]) -> Result<()> {
    let file = File::create(path)?;
    write_polynomial(BufWriter::new(file), poly)
}

pub fn generate_random_polynomial<T: FiniteField, R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
) -> Vec<T> {
    (0..len).map(|_| T::random(&mut *rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{bls12_381::Fr, finite_field::FiniteRing, F998244353};

    #[test]
    fn test_read_write_stream() {
        let mut rng = rand::thread_rng();
        let poly: Vec<Fr> = generate_random_polynomial(&mut rng, 17);

        let mut buf = vec![];
        write_polynomial(&mut buf, &poly).unwrap();
        assert_eq!(buf.len(), 17 * 32);

        let read: Vec<Fr> = read_polynomial(buf.as_slice()).unwrap();
        assert_eq!(read, poly);
    }

    #[test]
    fn test_record_layout() {
        let poly = vec![Fr::ONE, -Fr::ONE];
        let mut buf = vec![];
        write_polynomial(&mut buf, &poly).unwrap();
        assert_eq!(
            hex::encode(&buf[..32]),
            format!("01{}", "00".repeat(31))
        );
        // r - 1, low limb first
        assert_eq!(
            hex::encode(&buf[32..]),
            "00000000fffffffffe5bfeff02a4bd5305d8a10908d83933487d9d2953a7ed73"
        );
    }

    #[test]
    fn test_empty_stream() {
        let read: Vec<F998244353> = read_polynomial(&[0u8; 0][..]).unwrap();
        assert!(read.is_empty());
    }

    #[test]
    fn test_truncated_record() {
        let bytes = [1u8, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0];
        let res: Result<Vec<F998244353>> = read_polynomial(&bytes[..]);
        assert!(matches!(
            res,
            Err(Error::InvalidRecord { len: 3, expected: 8 })
        ));
    }

    #[test]
    fn test_missing_file() {
        let res: Result<Vec<Fr>> = read_polynomial_from_file("/nonexistent/input_a.bin");
        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("parallel_ntt_io_{}.bin", std::process::id()));
        let poly: Vec<F998244353> = (1..=5u64).map(F998244353::from).collect();
        write_polynomial_to_file(&path, &poly).unwrap();
        let read: Vec<F998244353> = read_polynomial_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(read, poly);
    }
}
