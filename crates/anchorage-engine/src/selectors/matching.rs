//! Fuzzy location of a quote in the flattened text.
//!
//! Every occurrence of the exact text is a candidate. Candidates are scored
//! by how closely their surrounding text matches the recorded prefix and
//! suffix (normalized Levenshtein similarity, weighted by context length).
//! A single occurrence always wins; among several, the best one must reach
//! `min_similarity` and beat the runner-up by more than `tie_margin`, unless
//! a position hint breaks the tie.

use log::trace;
use tokio_util::sync::CancellationToken;

use crate::error::{AnchorError, Result};
use crate::options::AnchorOptions;
use crate::text::TextIndex;

use super::TextQuoteSelector;

/// Occurrences scored between two yields to the scheduler.
const SCORE_BATCH: usize = 1024;

/// Where the quote occurs: flattened character offset and the byte offset of
/// the same point in [`TextIndex::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub byte: usize,
}

/// A scored occurrence of the quote, in flattened character offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

/// Every occurrence of `needle`, overlapping ones included, in document
/// order.
///
/// Scans `chunk_bytes` of text at a time and yields to the scheduler in
/// between, checking `cancel` before each chunk. Character offsets come from
/// a cursor that only moves forward, so the whole scan is linear in the text.
pub async fn find_occurrences<N>(
    index: &TextIndex<N>,
    needle: &str,
    chunk_bytes: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Occurrence>>
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let haystack = index.text();
    let mut found = Vec::new();
    if needle.is_empty() {
        return Ok(found);
    }

    let chunk_bytes = chunk_bytes.max(1);
    let mut chunk_start = 0;
    // (byte, char) of the last occurrence
    let mut cursor = (0, 0);
    while chunk_start < haystack.len() {
        if cancel.is_cancelled() {
            return Err(AnchorError::Cancelled);
        }

        // matches must start in [chunk_start, chunk_end); the window extends
        // far enough to contain a match starting at the last byte
        let chunk_end = ceil_char_boundary(haystack, chunk_start + chunk_bytes);
        let window_end = ceil_char_boundary(haystack, chunk_end + needle.len() - 1);
        let window = &haystack[chunk_start..window_end];

        let mut from = 0;
        while let Some(rel) = window[from..].find(needle) {
            let at = from + rel;
            if chunk_start + at >= chunk_end {
                break;
            }
            let byte = chunk_start + at;
            cursor = (byte, cursor.1 + haystack[cursor.0..byte].chars().count());
            found.push(Occurrence {
                start: cursor.1,
                byte,
            });
            from = at + window[at..].chars().next().map_or(1, char::len_utf8);
        }

        chunk_start = chunk_end;
        if chunk_start < haystack.len() {
            tokio::task::yield_now().await;
        }
    }

    Ok(found)
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Score every occurrence of `quote` against its recorded context.
///
/// Works through `SCORE_BATCH` occurrences at a time, checking `cancel` before
/// each batch and yielding between batches.
pub async fn score_occurrences<N>(
    index: &TextIndex<N>,
    occurrences: &[Occurrence],
    quote: &TextQuoteSelector,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>>
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let len = quote.exact.chars().count();
    let mut candidates = Vec::with_capacity(occurrences.len());

    for batch in occurrences.chunks(SCORE_BATCH) {
        if cancel.is_cancelled() {
            return Err(AnchorError::Cancelled);
        }

        for occurrence in batch {
            let (start, end) = (occurrence.start, occurrence.start + len);
            let score = context_score(index, occurrence, quote);
            trace!("quote candidate {start}..{end} scored {score:.3}");
            candidates.push(Candidate { start, end, score });
        }

        if candidates.len() < occurrences.len() {
            tokio::task::yield_now().await;
        }
    }

    Ok(candidates)
}

/// Similarity (0..=1) between the recorded context of `quote` and the text
/// actually surrounding `occurrence`.
pub fn context_score<N>(index: &TextIndex<N>, occurrence: &Occurrence, quote: &TextQuoteSelector) -> f64
where
    N: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let prefix_len = quote.prefix.chars().count();
    let suffix_len = quote.suffix.chars().count();
    if prefix_len + suffix_len == 0 {
        return 1.0;
    }

    let before = index.chars_before(occurrence.byte, prefix_len);
    let after = index.chars_after(occurrence.byte + quote.exact.len(), suffix_len);
    let prefix = strsim::normalized_levenshtein(&quote.prefix, before);
    let suffix = strsim::normalized_levenshtein(&quote.suffix, after);

    (prefix * prefix_len as f64 + suffix * suffix_len as f64) / (prefix_len + suffix_len) as f64
}

/// Pick the winning candidate, or explain why none is acceptable.
///
/// `hint` is a flattened offset where the quote is expected to start (from a
/// position selector); among tied candidates the closest one wins.
pub fn choose(mut candidates: Vec<Candidate>, hint: Option<usize>, options: &AnchorOptions) -> Result<Candidate> {
    match candidates.as_slice() {
        [] => return Err(AnchorError::NoMatchFound),
        [only] => return Ok(*only),
        _ => {}
    }

    // stable: equal scores keep document order
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let best = candidates[0];
    let ambiguous = AnchorError::AmbiguousMatch {
        candidates: candidates.len(),
        best_score: best.score,
    };

    if best.score < options.min_similarity {
        return Err(ambiguous);
    }

    let tied: Vec<Candidate> = candidates
        .iter()
        .copied()
        .take_while(|c| best.score - c.score <= options.tie_margin)
        .collect();
    if tied.len() == 1 {
        return Ok(best);
    }

    match hint {
        Some(hint) => tied
            .into_iter()
            .min_by_key(|c| c.start.abs_diff(hint))
            .ok_or(ambiguous),
        None => Err(ambiguous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::tree::{Document, NodeId};
    use pretty_assertions::assert_eq;

    fn index_of(parts: &[&str]) -> (Document, TextIndex<NodeId>) {
        let mut doc = Document::new("div");
        let root = doc.root();
        for part in parts {
            doc.append_text(root, *part);
        }
        let index = TextIndex::build(&doc, &root);
        (doc, index)
    }

    fn quote(exact: &str, prefix: &str, suffix: &str) -> TextQuoteSelector {
        TextQuoteSelector {
            exact: exact.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    fn candidate(start: usize, score: f64) -> Candidate {
        Candidate {
            start,
            end: start + 1,
            score,
        }
    }

    fn at(start: usize, byte: usize) -> Occurrence {
        Occurrence { start, byte }
    }

    async fn starts(index: &TextIndex<NodeId>, needle: &str, chunk: usize) -> Vec<usize> {
        find_occurrences(index, needle, chunk, &CancellationToken::new())
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.start)
            .collect()
    }

    #[tokio::test]
    async fn finds_overlapping_occurrences() {
        let (_doc, index) = index_of(&["aaa", "a"]);
        assert_eq!(starts(&index, "aa", 1024).await, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn chunking_does_not_lose_or_duplicate_matches() {
        let text = "the cat sat on the mat with the hat";
        let (_doc, index) = index_of(&[text]);
        let expected = vec![0, 15, 28];
        for chunk in [1, 2, 3, 5, 8, 64] {
            assert_eq!(starts(&index, "the", chunk).await, expected, "chunk size {chunk}");
        }
    }

    #[tokio::test]
    async fn reports_character_offsets() {
        let (_doc, index) = index_of(&["héllo wörld, ", "wörld"]);
        let found = find_occurrences(&index, "wörld", 3, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(found, vec![at(6, 7), at(13, 15)]);
    }

    #[tokio::test]
    async fn long_leaf_offsets_follow_the_cursor() {
        let repeats = 50_000;
        let (_doc, index) = index_of(&["é ".repeat(repeats).as_str()]);
        let found = find_occurrences(&index, "é", 1000, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(found.len(), repeats);
        assert_eq!(found[1], at(2, 3));
        assert_eq!(found[repeats - 1], at(2 * (repeats - 1), 3 * (repeats - 1)));
    }

    #[tokio::test]
    async fn empty_needle_matches_nothing() {
        let (_doc, index) = index_of(&["abc"]);
        let found = find_occurrences(&index, "", 8, &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn cancelled_search_stops() {
        let (_doc, index) = index_of(&["abcabcabc"]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = find_occurrences(&index, "abc", 2, &cancel).await.unwrap_err();
        assert_eq!(err, AnchorError::Cancelled);
    }

    #[test]
    fn exact_context_scores_one() {
        let (_doc, index) = index_of(&["one two three two four"]);
        let q = quote("two", "one ", " three");
        assert_eq!(context_score(&index, &at(4, 4), &q), 1.0);
        assert!(context_score(&index, &at(14, 14), &q) < 0.5);
    }

    #[test]
    fn context_clipped_at_document_start() {
        let (_doc, index) = index_of(&["two three"]);
        let q = quote("two", "", " three");
        assert_eq!(context_score(&index, &at(0, 0), &q), 1.0);
    }

    #[test]
    fn no_context_scores_one() {
        let (_doc, index) = index_of(&["abc"]);
        assert_eq!(context_score(&index, &at(0, 0), &quote("a", "", "")), 1.0);
    }

    #[test]
    fn context_is_read_around_multibyte_text() {
        let (_doc, index) = index_of(&["naïve café ", "naïve thé"]);
        let q = quote("naïve", "é ", " th");
        let found = [at(0, 0), at(11, 13)];
        assert!(context_score(&index, &found[0], &q) < 0.5);
        assert_eq!(context_score(&index, &found[1], &q), 1.0);
    }

    #[tokio::test]
    async fn scores_every_occurrence_in_batches() {
        let repeats = SCORE_BATCH * 2 + 3;
        let (_doc, index) = index_of(&["ab ".repeat(repeats).as_str()]);
        let q = quote("ab", "b ", " a");
        let cancel = CancellationToken::new();
        let found = find_occurrences(&index, "ab", 4096, &cancel).await.unwrap();

        let candidates = score_occurrences(&index, &found, &q, &cancel).await.unwrap();
        assert_eq!(candidates.len(), repeats);
        assert_eq!(candidates[1], Candidate { start: 3, end: 5, score: 1.0 });
        assert!(candidates[0].score < 1.0);
    }

    #[tokio::test]
    async fn cancelled_scoring_stops() {
        let (_doc, index) = index_of(&["ab ab ab"]);
        let q = quote("ab", "x", "y");
        let cancel = CancellationToken::new();
        let found = find_occurrences(&index, "ab", 64, &cancel).await.unwrap();

        cancel.cancel();
        let err = score_occurrences(&index, &found, &q, &cancel).await.unwrap_err();
        assert_eq!(err, AnchorError::Cancelled);
    }

    #[test]
    fn single_candidate_always_wins() {
        let options = AnchorOptions::default();
        let only = candidate(7, 0.0);
        assert_eq!(choose(vec![only], None, &options), Ok(only));
    }

    #[test]
    fn no_candidates_is_no_match() {
        let options = AnchorOptions::default();
        assert_eq!(choose(vec![], None, &options), Err(AnchorError::NoMatchFound));
    }

    #[test]
    fn clear_winner_is_chosen() {
        let options = AnchorOptions::default();
        let picked = choose(
            vec![candidate(0, 0.4), candidate(10, 0.9), candidate(20, 0.7)],
            None,
            &options,
        )
        .unwrap();
        assert_eq!(picked.start, 10);
    }

    #[test]
    fn low_scores_are_ambiguous() {
        let options = AnchorOptions::default();
        let err = choose(vec![candidate(0, 0.3), candidate(10, 0.1)], None, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
    }

    #[test]
    fn ties_are_ambiguous_without_hint() {
        let options = AnchorOptions::default();
        let err = choose(vec![candidate(0, 0.8), candidate(10, 0.78)], None, &options).unwrap_err();
        assert_eq!(
            err,
            AnchorError::AmbiguousMatch {
                candidates: 2,
                best_score: 0.8
            }
        );
    }

    #[test]
    fn hint_breaks_ties() {
        let options = AnchorOptions::default();
        let picked = choose(
            vec![candidate(0, 1.0), candidate(40, 1.0), candidate(90, 0.2)],
            Some(37),
            &options,
        )
        .unwrap();
        assert_eq!(picked.start, 40);
    }
}
