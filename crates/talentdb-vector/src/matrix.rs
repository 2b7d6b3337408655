//! Little-endian f32 matrix file: `TDBM`, version, rows, dims, row-major data.

use std::fs;
use std::path::Path;

use talentdb_core::{Error, Result};

const MAGIC: &[u8; 4] = b"TDBM";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 8 + 8;

pub fn write_matrix(path: &Path, rows: &[Vec<f32>]) -> Result<()> {
    let dims = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != dims) {
        return Err(Error::IndexPersistence("ragged matrix cannot be persisted".into()));
    }
    let mut buf = Vec::with_capacity(HEADER_LEN + rows.len() * dims * 4);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&VERSION.to_le_bytes());
    buf.extend_from_slice(&(rows.len() as u64).to_le_bytes());
    buf.extend_from_slice(&(dims as u64).to_le_bytes());
    for x in rows.iter().flatten() {
        buf.extend_from_slice(&x.to_le_bytes());
    }
    write_atomic(path, &buf)
}

pub fn read_matrix(path: &Path) -> Result<Vec<Vec<f32>>> {
    let bytes = fs::read(path).map_err(|e| persistence(path, e))?;
    let (rows, dims, body) = parse_header(&bytes, MAGIC).map_err(|e| persistence(path, e))?;
    if dims == 0 {
        return Ok(vec![Vec::new(); rows]);
    }
    Ok(floats(body).chunks(dims).map(<[f32]>::to_vec).collect())
}

/// Split `bytes` after a `magic|version|rows|dims` header, checking that the
/// body holds exactly `rows * dims` floats.
pub(crate) fn parse_header<'a>(bytes: &'a [u8], magic: &[u8; 4]) -> std::result::Result<(usize, usize, &'a [u8]), String> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != magic {
        return Err("bad header".into());
    }
    let version = u32::from_le_bytes(word(&bytes[4..8]));
    if version != VERSION {
        return Err(format!("unsupported version {version}"));
    }
    let rows = u64::from_le_bytes(dword(&bytes[8..16])) as usize;
    let dims = u64::from_le_bytes(dword(&bytes[16..24])) as usize;
    let body = &bytes[HEADER_LEN..];
    let expected = rows.checked_mul(dims).and_then(|n| n.checked_mul(4));
    if expected != Some(body.len()) {
        return Err(format!("expected {rows}x{dims} floats, found {} bytes", body.len()));
    }
    Ok((rows, dims, body))
}

pub(crate) fn floats(body: &[u8]) -> Vec<f32> {
    body.chunks_exact(4).map(|c| f32::from_le_bytes(word(c))).collect()
}

fn word(b: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&b[..4]);
    out
}

fn dword(b: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&b[..8]);
    out
}

/// Write to a sibling temp file, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| persistence(parent, e))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(|e| persistence(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| persistence(path, e))
}

pub(crate) fn persistence(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::IndexPersistence(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_survives_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("m.f32");
        let rows = vec![vec![1.0, -2.5, 3.25], vec![0.0, 0.5, f32::MIN_POSITIVE]];
        write_matrix(&path, &rows).unwrap();
        assert_eq!(read_matrix(&path).unwrap(), rows);
    }

    #[test]
    fn truncated_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("m.f32");
        write_matrix(&path, &[vec![1.0, 2.0]]).unwrap();
        let mut bytes = fs::read(&path).unwrap();
        bytes.pop();
        fs::write(&path, bytes).unwrap();
        assert!(matches!(read_matrix(&path), Err(Error::IndexPersistence(_))));
    }
}
