//! Exhaustive similarity ranking over an in-memory corpus.

use tracing::trace;

use crate::errors::StoreError;
use crate::record::{CorpusEntry, RankedCandidate};
use crate::similarity::relatedness;

/// Scores every entry against `query_embedding` and returns the `top_n` most
/// related, best first.
///
/// The sort is stable: entries with equal scores keep corpus order. A NaN
/// score sorts last. An empty corpus yields an empty ranking.
///
/// # Errors
/// [`StoreError::DimensionMismatch`] for the first entry whose embedding
/// length differs from the query's. The whole corpus is checked before any
/// scoring, so no partial ranking is produced.
///
/// # Example
/// ```
/// use corpus_store::{CorpusEntry, rank};
/// let corpus = vec![
///     CorpusEntry::new("Stay in your lane.", vec![1.0, 0.0]),
///     CorpusEntry::new("Signal before turning.", vec![0.0, 1.0]),
/// ];
/// let ranked = rank(&[0.9, 0.1], &corpus, 2).unwrap();
/// assert_eq!(ranked[0].text, "Stay in your lane.");
/// ```
pub fn rank(
    query_embedding: &[f32],
    corpus: &[CorpusEntry],
    top_n: usize,
) -> Result<Vec<RankedCandidate>, StoreError> {
    let expected = query_embedding.len();
    if let Some((index, e)) = corpus
        .iter()
        .enumerate()
        .find(|(_, e)| e.embedding.len() != expected)
    {
        return Err(StoreError::DimensionMismatch {
            index,
            expected,
            got: e.embedding.len(),
        });
    }

    let mut scored: Vec<(usize, f32)> = corpus
        .iter()
        .enumerate()
        .map(|(i, e)| (i, relatedness(query_embedding, &e.embedding)))
        .collect();

    scored.sort_by(|a, b| sort_key(b.1).total_cmp(&sort_key(a.1)));
    scored.truncate(top_n);

    trace!(corpus = corpus.len(), top_n, kept = scored.len(), "ranked corpus");

    Ok(scored
        .into_iter()
        .map(|(i, score)| RankedCandidate {
            text: corpus[i].text.clone(),
            score,
        })
        .collect())
}

fn sort_key(score: f32) -> f32 {
    if score.is_nan() { f32::NEG_INFINITY } else { score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handbook() -> Vec<CorpusEntry> {
        vec![
            CorpusEntry::new("Stay in your lane.", vec![1.0, 0.0]),
            CorpusEntry::new("Signal before turning.", vec![0.0, 1.0]),
        ]
    }

    #[test]
    fn lane_and_signal_scenario() {
        let ranked = rank(&[0.9, 0.1], &handbook(), 2).unwrap();
        let texts: Vec<_> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["Stay in your lane.", "Signal before turning."]);
        assert!((ranked[0].score - 0.994).abs() < 1e-3);
        assert!((ranked[1].score - 0.110).abs() < 1e-3);
    }

    #[test]
    fn truncates_to_top_n_and_handles_short_corpus() {
        assert_eq!(rank(&[0.9, 0.1], &handbook(), 1).unwrap().len(), 1);
        assert_eq!(rank(&[0.9, 0.1], &handbook(), 10).unwrap().len(), 2);
        assert!(rank(&[0.9, 0.1], &handbook(), 0).unwrap().is_empty());
    }

    #[test]
    fn empty_corpus_is_not_an_error() {
        assert!(rank(&[1.0, 2.0], &[], 5).unwrap().is_empty());
    }

    #[test]
    fn output_is_non_increasing() {
        let corpus: Vec<_> = (0..50)
            .map(|i| {
                let a = i as f32 * 0.37;
                CorpusEntry::new(format!("p{i}"), vec![a.cos(), a.sin(), (i % 7) as f32 - 3.0])
            })
            .collect();
        let ranked = rank(&[0.4, -0.2, 1.0], &corpus, 20).unwrap();
        assert_eq!(ranked.len(), 20);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_corpus_order() {
        let corpus = vec![
            CorpusEntry::new("first", vec![2.0, 0.0]),
            CorpusEntry::new("other", vec![0.0, 1.0]),
            CorpusEntry::new("second", vec![5.0, 0.0]),
            CorpusEntry::new("third", vec![0.5, 0.0]),
        ];
        let ranked = rank(&[1.0, 0.0], &corpus, 4).unwrap();
        let texts: Vec<_> = ranked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third", "other"]);
    }

    #[test]
    fn mismatched_dimension_fails_without_partial_result() {
        let mut corpus = handbook();
        corpus.push(CorpusEntry::new("Yield to pedestrians.", vec![0.1, 0.2, 0.3]));
        match rank(&[0.9, 0.1], &corpus, 3) {
            Err(StoreError::DimensionMismatch {
                index,
                expected,
                got,
            }) => assert_eq!((index, expected, got), (2, 2, 3)),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
