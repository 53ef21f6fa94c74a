//! Vector similarity scoring

use crate::domain::DomainError;

/// Calculate cosine similarity between two vectors.
///
/// Vectors of different lengths are rejected. A zero-norm input (including
/// empty vectors) scores 0.0 instead of dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, DomainError> {
    if a.len() != b.len() {
        return Err(DomainError::dimension_mismatch(a.len(), b.len()));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    // rounding can push identical vectors a hair past 1.0
    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
