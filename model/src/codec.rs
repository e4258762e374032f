//! Flat file formats for fitted models and reference matrices.
//!
//! Every file starts with a 4 byte magic followed by big endian `u64` dimensions.
//! The numeric payload is a row-major run of `f64` values in native byte order.
//!
//! PCA file: `NPCA | n_features | n_components | whiten: u8 | mean | components | explained_variance`
//!
//! Matrix file: `NMAT | rows | cols | values`

use std::{fs, path::Path};

use bytes::{Buf, BufMut};
use log::debug;
use ndarray::{Array1, Array2, ArrayView2};

use crate::{ModelErr, Pca, Result};

type Magic = [u8; 4];

const PCA_MAGIC: Magic = *b"NPCA";
const MATRIX_MAGIC: Magic = *b"NMAT";
const DIM_SIZE: usize = size_of::<u64>();
const F64_SIZE: usize = size_of::<f64>();

/// Appends the binary representation of `pca` to `buf`.
pub fn encode_pca<B: BufMut>(pca: &Pca, buf: &mut B) {
    buf.put_slice(&PCA_MAGIC);
    buf.put_u64(pca.n_features() as u64);
    buf.put_u64(pca.n_components() as u64);
    buf.put_u8(pca.whiten() as u8);
    put_floats(buf, pca.mean().iter());
    put_floats(buf, pca.components().iter());
    put_floats(buf, pca.explained_variance().iter());
}

/// Parses a whole buffer as a PCA model.
///
/// # Errors
/// Fails on a wrong magic, a short payload, leftover bytes or inconsistent parameters.
pub fn decode_pca(mut buf: &[u8]) -> Result<Pca> {
    expect_magic(&mut buf, PCA_MAGIC)?;
    let n_features = get_dim(&mut buf)?;
    let n_components = get_dim(&mut buf)?;
    ensure_remaining(buf, 1)?;
    let whiten = buf.get_u8() != 0;

    let mean = get_floats(&mut buf, n_features)?;
    let components = get_floats(&mut buf, checked_area(n_components, n_features)?)?;
    let explained_variance = get_floats(&mut buf, n_components)?;
    expect_empty(buf)?;

    let components = into_matrix(components, n_components, n_features)?;
    debug!(n_features = n_features, n_components = n_components, whiten = whiten; "decoded pca");

    Pca::new(
        Array1::from(mean),
        components,
        Array1::from(explained_variance),
        whiten,
    )
}

/// Appends the binary representation of `matrix` to `buf`.
pub fn encode_matrix<B: BufMut>(matrix: ArrayView2<f64>, buf: &mut B) {
    let (rows, cols) = matrix.dim();
    buf.put_slice(&MATRIX_MAGIC);
    buf.put_u64(rows as u64);
    buf.put_u64(cols as u64);
    put_floats(buf, matrix.iter());
}

/// Parses a whole buffer as a matrix.
///
/// # Errors
/// Fails on a wrong magic, a short payload or leftover bytes.
pub fn decode_matrix(mut buf: &[u8]) -> Result<Array2<f64>> {
    expect_magic(&mut buf, MATRIX_MAGIC)?;
    let rows = get_dim(&mut buf)?;
    let cols = get_dim(&mut buf)?;
    let values = get_floats(&mut buf, checked_area(rows, cols)?)?;
    expect_empty(buf)?;

    debug!(rows = rows, cols = cols; "decoded matrix");
    into_matrix(values, rows, cols)
}

/// Reads and decodes a PCA model file.
pub fn read_pca<P: AsRef<Path>>(path: P) -> Result<Pca> {
    let buf = fs::read(path)?;
    decode_pca(&buf)
}

/// Encodes and writes a PCA model file, replacing any existing one.
pub fn write_pca<P: AsRef<Path>>(path: P, pca: &Pca) -> Result<()> {
    let mut buf = Vec::new();
    encode_pca(pca, &mut buf);
    fs::write(path, buf)?;
    Ok(())
}

/// Reads and decodes a matrix file.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Array2<f64>> {
    let buf = fs::read(path)?;
    decode_matrix(&buf)
}

/// Encodes and writes a matrix file, replacing any existing one.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: ArrayView2<f64>) -> Result<()> {
    let mut buf = Vec::new();
    encode_matrix(matrix, &mut buf);
    fs::write(path, buf)?;
    Ok(())
}

fn put_floats<'a, B, I>(buf: &mut B, values: I)
where
    B: BufMut,
    I: Iterator<Item = &'a f64>,
{
    let values: Vec<f64> = values.copied().collect();
    buf.put_slice(bytemuck::cast_slice(&values));
}

fn ensure_remaining(buf: &[u8], expected: usize) -> Result<()> {
    if buf.len() < expected {
        return Err(ModelErr::Truncated {
            got: buf.len(),
            expected,
        });
    }

    Ok(())
}

fn expect_magic(buf: &mut &[u8], expected: Magic) -> Result<()> {
    ensure_remaining(*buf, expected.len())?;

    let mut got = Magic::default();
    buf.copy_to_slice(&mut got);

    if got != expected {
        return Err(ModelErr::BadMagic { got, expected });
    }

    Ok(())
}

fn expect_empty(buf: &[u8]) -> Result<()> {
    match buf.len() {
        0 => Ok(()),
        extra => Err(ModelErr::TrailingBytes { extra }),
    }
}

fn get_dim(buf: &mut &[u8]) -> Result<usize> {
    ensure_remaining(*buf, DIM_SIZE)?;
    let dim = buf.get_u64();

    usize::try_from(dim).map_err(|_| ModelErr::Truncated {
        got: buf.len(),
        expected: usize::MAX,
    })
}

fn checked_area(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(ModelErr::SizeMismatch {
        a: "rows",
        b: "cols",
        got: rows,
        expected: usize::MAX / cols.max(1),
    })
}

fn get_floats(buf: &mut &[u8], n: usize) -> Result<Vec<f64>> {
    let size = n.checked_mul(F64_SIZE).unwrap_or(usize::MAX);
    let slice: &[u8] = *buf;
    ensure_remaining(slice, size)?;

    let (head, rest) = slice.split_at(size);
    let values = bytemuck::pod_collect_to_vec(head);
    *buf = rest;

    Ok(values)
}

fn into_matrix(values: Vec<f64>, rows: usize, cols: usize) -> Result<Array2<f64>> {
    let got = values.len();
    Array2::from_shape_vec((rows, cols), values).map_err(|_| ModelErr::SizeMismatch {
        a: "payload",
        b: "header dimensions",
        got,
        expected: rows * cols,
    })
}
