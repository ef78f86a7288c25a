//! Vector similarity used for relevance scoring.

/// Cosine similarity `dot(a,b) / (‖a‖·‖b‖)`.
///
/// Accumulates in `f64`. A zero-norm vector is unrelated to everything and
/// scores `0.0`. Callers must pass vectors of equal length; only the common
/// prefix is read otherwise.
///
/// # Example
/// ```
/// use corpus_store::similarity::cosine_similarity;
/// let s = cosine_similarity(&[1.0, 0.0], &[0.9, 0.1]);
/// assert!((s - 0.9939).abs() < 1e-3);
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())) as f32
}

/// Cosine distance `1 − cosine_similarity(a, b)`; ranges `0.0..=2.0`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Relatedness score used by the ranker: `1 − cosine_distance(a, b)`.
pub fn relatedness(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_similarity_is_one() {
        for v in [vec![1.0, 0.0], vec![0.3, -0.7, 2.5], vec![1e-3, 4e3, -7.0, 0.5]] {
            assert!((relatedness(&v, &v) - 1.0).abs() < 1e-6, "{v:?}");
        }
    }

    #[test]
    fn symmetric() {
        let a = [0.2, 0.9, -0.4];
        let b = [-1.0, 0.5, 0.25];
        assert_eq!(relatedness(&a, &b), relatedness(&b, &a));
    }

    #[test]
    fn orthogonal_and_opposite() {
        assert!(relatedness(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-7);
        assert!((relatedness(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 2.0], &[-1.0, -2.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(relatedness(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
