//! Exact flat index over a contiguous row-major buffer.

use std::fs;
use std::path::Path;

use talentdb_core::traits::l2_normalize;
use talentdb_core::types::Metric;
use talentdb_core::{Error, Result};

use crate::matrix::{floats, parse_header, persistence, write_atomic};
use crate::search::{similarity, top_k};

const MAGIC_IP: &[u8; 4] = b"TDFI";
const MAGIC_L2: &[u8; 4] = b"TDFL";

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    metric: Metric,
    dim: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    /// Copy `rows` into one buffer; with the IP metric every row is
    /// normalized first.
    pub fn build(rows: &[Vec<f32>], metric: Metric) -> Result<Self> {
        let dim = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(Error::IndexPersistence(format!(
                    "row {i} has {} values, expected {dim}",
                    row.len()
                )));
            }
            let start = data.len();
            data.extend_from_slice(row);
            if metric == Metric::Ip {
                l2_normalize(&mut data[start..]);
            }
        }
        Ok(Self { metric, dim, data })
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.dim == 0 || k == 0 {
            return Vec::new();
        }
        let mut q = query.to_vec();
        if self.metric == Metric::Ip {
            l2_normalize(&mut q);
        }
        let scores = self
            .data
            .chunks_exact(self.dim)
            .map(|row| similarity(self.metric, row, &q))
            .collect();
        top_k(scores, k)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let magic = match self.metric {
            Metric::Ip => MAGIC_IP,
            Metric::L2 => MAGIC_L2,
        };
        let mut buf = Vec::with_capacity(24 + self.data.len() * 4);
        buf.extend_from_slice(magic);
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&(self.len() as u64).to_le_bytes());
        buf.extend_from_slice(&(self.dim as u64).to_le_bytes());
        for x in &self.data {
            buf.extend_from_slice(&x.to_le_bytes());
        }
        write_atomic(path, &buf)
    }

    pub fn load(path: &Path, metric: Metric) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| persistence(path, e))?;
        let magic = match metric {
            Metric::Ip => MAGIC_IP,
            Metric::L2 => MAGIC_L2,
        };
        let (_, dim, body) = parse_header(&bytes, magic).map_err(|e| persistence(path, e))?;
        Ok(Self { metric, dim, data: floats(body) })
    }
}
