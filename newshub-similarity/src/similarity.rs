//! Cosine similarity calculations

use ndarray::{Array2, ArrayView1};

use crate::error::{Result, SimilarityError};

/// Calculate cosine similarity between two vectors
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||)
///
/// A zero vector has similarity 0.0 with everything.
pub fn cosine_similarity(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SimilarityError::InvalidDimension {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Pairwise cosine similarity between all rows of `matrix`
///
/// The result is symmetric with 1.0 on the diagonal for non-zero rows.
pub fn similarity_matrix(matrix: &Array2<f64>) -> Result<Array2<f64>> {
    let n = matrix.nrows();
    let mut sim = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i..n {
            let score = cosine_similarity(matrix.row(i), matrix.row(j))?;
            sim[[i, j]] = score;
            sim[[j, i]] = score;
        }
    }

    Ok(sim)
}
