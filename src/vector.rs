//! This is the vector math module
//! Provide the L2 norm, unit normalization and dot product

use crate::error::SearchError;

/// L2 magnitude
/// ||vec|| = sqrt(sum(vec[i]^2))
pub fn norm(vector: &[f32]) -> f32 {
    vector.iter()
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt()
}

/// L2 normalization
/// norm_vec = vec / ||vec||
/// A zero vector has no direction and yields `None`
pub fn l2_norm(vector: &[f32]) -> Option<Vec<f32>> {
    let norm = norm(vector);

    if norm == 0.0 {
        return None;
    }

    let normed_vec = vector.iter()
        .map(|x| x / norm)
        .collect();

    Some(normed_vec)
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions; `left` is the query side
pub fn dot_product(left: &[f32], right: &[f32]) -> Result<f32, SearchError> {
    if left.len() != right.len() {
        return Err(SearchError::DimensionMismatch {
            query: left.len(),
            stored: right.len(),
        });
    }

    let dot_prod = left.iter()
        .zip(right.iter())
        .map(|(x, y)| x * y)
        .sum();

    Ok(dot_prod)
}
