//! Flat exact-search vector index
//!
//! Stores embeddings in one contiguous buffer with positionally parallel
//! metadata records and searches by brute-force inner product. Exact and
//! unpruned: acceptable for a personal document corpus, a known scaling
//! limit beyond that.
//!
//! Persisted as a directory pair: `faiss_index.bin` (little-endian blob:
//! u32 dimension, u32 count, then `dimension * count` f32 values) and
//! `metadata.json` (records in insertion order).

use lore_core::{ChunkMetadata, LoreError, Result};
use std::path::Path;

/// Binary index artifact name
pub const INDEX_FILE: &str = "faiss_index.bin";

/// Metadata artifact name
pub const METADATA_FILE: &str = "metadata.json";

/// Flat inner-product vector index with parallel metadata
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    /// Embedding dimension, discovered from the first vector at build time
    dimension: usize,

    /// Row-major vector data, `dimension` floats per record
    data: Vec<f32>,

    /// Record at position `i` describes the vector at position `i`
    metadata: Vec<ChunkMetadata>,
}

impl FlatIndex {
    /// Build an index from parallel vectors and metadata records.
    ///
    /// All vectors must share one length; the dimension is taken from the
    /// first vector, not hardcoded.
    pub fn build(vectors: Vec<Vec<f32>>, metadata: Vec<ChunkMetadata>) -> Result<Self> {
        if vectors.len() != metadata.len() {
            return Err(LoreError::CountMismatch {
                vectors: vectors.len(),
                metadata: metadata.len(),
            });
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(dimension * vectors.len());

        for vector in &vectors {
            if vector.len() != dimension {
                return Err(LoreError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self {
            dimension,
            data,
            metadata,
        })
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    /// Whether the index holds no vectors
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All metadata records, in insertion order
    pub fn metadata(&self) -> &[ChunkMetadata] {
        &self.metadata
    }

    /// Metadata record at a search-result position
    pub fn record(&self, index: usize) -> Option<&ChunkMetadata> {
        self.metadata.get(index)
    }

    /// Search for the `top_k` nearest vectors by inner product.
    ///
    /// Returns `(score, metadata_index)` pairs, highest score first. Scores
    /// are raw inner products; ties keep insertion order. An empty index
    /// returns an empty sequence.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(f32, usize)>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(LoreError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(i, row)| {
                let score = row.iter().zip(query).map(|(a, b)| a * b).sum();
                (score, i)
            })
            .collect();

        // Stable sort: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored)
    }

    /// Persist the index pair into `dir`, atomically with respect to readers.
    ///
    /// Both artifacts are written to temporary files first and then renamed
    /// over the previous pair, so a concurrent loader never observes a
    /// half-written index.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| LoreError::Persist(format!("creating {}: {e}", dir.display())))?;

        let index_tmp = dir.join(format!("{INDEX_FILE}.tmp"));
        let metadata_tmp = dir.join(format!("{METADATA_FILE}.tmp"));

        std::fs::write(&index_tmp, self.encode_vectors())
            .map_err(|e| LoreError::Persist(format!("writing index blob: {e}")))?;

        let metadata_json = serde_json::to_vec(&self.metadata)
            .map_err(|e| LoreError::Persist(format!("serializing metadata: {e}")))?;
        std::fs::write(&metadata_tmp, metadata_json)
            .map_err(|e| LoreError::Persist(format!("writing metadata: {e}")))?;

        std::fs::rename(&index_tmp, dir.join(INDEX_FILE))
            .map_err(|e| LoreError::Persist(format!("replacing index blob: {e}")))?;
        std::fs::rename(&metadata_tmp, dir.join(METADATA_FILE))
            .map_err(|e| LoreError::Persist(format!("replacing metadata: {e}")))?;

        Ok(())
    }

    /// Load a persisted index pair from `dir`.
    ///
    /// Any missing or corrupt artifact yields `IndexUnavailable`; callers at
    /// the serving boundary treat that as a degraded state, not a crash.
    pub fn load(dir: &Path) -> Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        let metadata_path = dir.join(METADATA_FILE);

        let blob = std::fs::read(&index_path).map_err(|e| {
            LoreError::IndexUnavailable(format!("reading {}: {e}", index_path.display()))
        })?;
        let (dimension, data) = Self::decode_vectors(&blob)?;

        let metadata_bytes = std::fs::read(&metadata_path).map_err(|e| {
            LoreError::IndexUnavailable(format!("reading {}: {e}", metadata_path.display()))
        })?;
        let metadata: Vec<ChunkMetadata> = serde_json::from_slice(&metadata_bytes)
            .map_err(|e| LoreError::IndexUnavailable(format!("parsing metadata: {e}")))?;

        let count = if dimension == 0 {
            0
        } else {
            data.len() / dimension
        };
        if metadata.len() != count {
            return Err(LoreError::IndexUnavailable(format!(
                "index holds {count} vectors but metadata has {} records",
                metadata.len()
            )));
        }

        Ok(Self {
            dimension,
            data,
            metadata,
        })
    }

    fn encode_vectors(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.data.len() * 4);
        bytes.extend_from_slice(&(self.dimension as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for value in &self.data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    fn decode_vectors(blob: &[u8]) -> Result<(usize, Vec<f32>)> {
        if blob.len() < 8 {
            return Err(LoreError::IndexUnavailable(
                "index blob truncated before header".to_string(),
            ));
        }

        let dimension = u32::from_le_bytes([blob[0], blob[1], blob[2], blob[3]]) as usize;
        let count = u32::from_le_bytes([blob[4], blob[5], blob[6], blob[7]]) as usize;

        let expected = 8 + dimension
            .checked_mul(count)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                LoreError::IndexUnavailable("index header overflows addressable size".to_string())
            })?;
        if blob.len() != expected {
            return Err(LoreError::IndexUnavailable(format!(
                "index blob is {} bytes, header implies {expected}",
                blob.len()
            )));
        }

        let data = blob[8..]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok((dimension, data))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(i: usize) -> ChunkMetadata {
        ChunkMetadata::new(format!("doc{i}.md"), i, format!("chunk {i}"), format!("/docs/doc{i}.md"))
    }

    fn sample_index() -> FlatIndex {
        FlatIndex::build(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.9, 0.1]],
            vec![meta(0), meta(1), meta(2)],
        )
        .unwrap()
    }

    #[test]
    fn search_ranks_by_inner_product() {
        let index = sample_index();

        let results = index.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].1, 0);
        assert!((results[0].0 - 1.0).abs() < 1e-6);
        assert_eq!(results[1].1, 2);
        assert!((results[1].0 - 0.9).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let index = FlatIndex::build(
            vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
            vec![meta(0), meta(1), meta(2)],
        )
        .unwrap();

        let results = index.search(&[2.0, 0.0], 3).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.1).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let err = FlatIndex::build(
            vec![vec![1.0], vec![2.0], vec![3.0]],
            vec![meta(0), meta(1)],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            LoreError::CountMismatch {
                vectors: 3,
                metadata: 2
            }
        ));
    }

    #[test]
    fn ragged_vectors_are_rejected() {
        let err = FlatIndex::build(
            vec![vec![1.0, 0.0], vec![0.5]],
            vec![meta(0), meta(1)],
        )
        .unwrap_err();

        assert!(matches!(err, LoreError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn empty_index_returns_no_results() {
        let index = FlatIndex::build(Vec::new(), Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0], 5).unwrap().is_empty());
    }

    #[test]
    fn wrong_query_dimension_is_rejected() {
        let index = sample_index();
        let err = index.search(&[1.0, 0.0, 0.0], 2).unwrap_err();
        assert!(matches!(err, LoreError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn top_k_bounds_result_length() {
        let index = sample_index();
        assert_eq!(index.search(&[1.0, 0.0], 10).unwrap().len(), 3);
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn persist_then_load_round_trips_search() {
        let dir = tempfile::tempdir().unwrap();
        let index = sample_index();
        index.persist(dir.path()).unwrap();

        let loaded = FlatIndex::load(dir.path()).unwrap();
        assert_eq!(loaded, index);

        let query = [0.3, 0.7];
        assert_eq!(
            loaded.search(&query, 3).unwrap(),
            index.search(&query, 3).unwrap()
        );
    }

    #[test]
    fn persist_overwrites_previous_pair() {
        let dir = tempfile::tempdir().unwrap();
        sample_index().persist(dir.path()).unwrap();

        let replacement =
            FlatIndex::build(vec![vec![5.0, 5.0]], vec![meta(9)]).unwrap();
        replacement.persist(dir.path()).unwrap();

        let loaded = FlatIndex::load(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.record(0).unwrap().chunk_id, 9);
    }

    #[test]
    fn missing_artifacts_load_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlatIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoreError::IndexUnavailable(_)));
    }

    #[test]
    fn corrupt_blob_loads_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        sample_index().persist(dir.path()).unwrap();

        // Truncate the blob mid-vector
        let blob_path = dir.path().join(INDEX_FILE);
        let blob = std::fs::read(&blob_path).unwrap();
        std::fs::write(&blob_path, &blob[..blob.len() - 3]).unwrap();

        let err = FlatIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoreError::IndexUnavailable(_)));
    }

    #[test]
    fn mismatched_metadata_count_loads_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        sample_index().persist(dir.path()).unwrap();

        std::fs::write(
            dir.path().join(METADATA_FILE),
            serde_json::to_vec(&vec![meta(0)]).unwrap(),
        )
        .unwrap();

        let err = FlatIndex::load(dir.path()).unwrap_err();
        assert!(matches!(err, LoreError::IndexUnavailable(_)));
    }
}
