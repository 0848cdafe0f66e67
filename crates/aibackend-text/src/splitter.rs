use aibackend_core::{LengthCalculator, SplitterOptions, TextSplitter};

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits on paragraph breaks first, then lines, then words, then characters,
/// only descending a level for pieces that are still longer than the chunk
/// size. Neighbouring pieces are merged back into chunks of at most
/// `chunk_size`, with up to `chunk_overlap` of the previous chunk's tail
/// repeated at the start of the next.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    length: Box<dyn LengthCalculator>,
}

impl RecursiveCharacterSplitter {
    pub fn new(options: SplitterOptions) -> Self {
        let chunk_size = options.chunk_size.max(1);
        // overlap must stay below the chunk size or merging never advances
        let chunk_overlap = options.chunk_overlap.min(chunk_size - 1);
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| (*s).to_string()).collect(),
            length: options.length_calculator,
        }
    }

    #[must_use]
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Factory usable as a [`aibackend_core::traits::TextSplitterFactory`].
    pub fn boxed(options: SplitterOptions) -> Box<dyn TextSplitter> { Box::new(Self::new(options)) }

    pub fn chunk_size(&self) -> usize { self.chunk_size }

    pub fn chunk_overlap(&self) -> usize { self.chunk_overlap }

    fn len(&self, text: &str) -> usize { self.length.splitter_length(text) }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s.as_str()));
        let Some(position) = position else {
            return self.merge(&[text], "");
        };
        let separator = separators[position].as_str();
        let remaining = &separators[position + 1..];

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();
        for piece in pieces(text, separator) {
            if self.len(piece) <= self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting, separator));
                fitting.clear();
            }
            if remaining.is_empty() {
                if let Some(piece) = non_blank(piece) {
                    chunks.push(piece);
                }
            } else {
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }
        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting, separator));
        }
        chunks
    }

    /// Lengths are measured on the joined text rather than summed per piece,
    /// so calculators that are not additive (token estimates) still bound
    /// every chunk. Chunk ends and overlap starts are found by galloping over
    /// piece counts, which keeps the number of measurements per chunk
    /// logarithmic. Lengths must not shrink as pieces are added.
    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let len_of = |from: usize, to: usize| self.len(&pieces[from..to].join(separator));
        let mut chunks = Vec::new();
        let (mut start, mut end) = (0, 0);

        while end < pieces.len() {
            // the window always takes the next piece, even one too long alone
            end = last_fitting(end + 1, pieces.len(), |e| len_of(start, e) <= self.chunk_size);
            if let Some(chunk) = non_blank(&pieces[start..end].join(separator)) {
                chunks.push(chunk);
            }
            if end == pieces.len() {
                break;
            }
            // longest tail within the overlap that still leaves room for the next piece
            let kept = last_fitting(0, end - start, |k| {
                len_of(end - k, end) <= self.chunk_overlap
                    && len_of(end - k, end + 1) <= self.chunk_size
            });
            start = end - kept;
        }
        chunks
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }
}

fn pieces<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|p| !p.is_empty()).collect()
    }
}

/// Largest `k` in `lo..=hi` for which `fits(k)` holds, given that `fits` is
/// true up to some point and false after it. `lo` is taken without a check.
fn last_fitting(lo: usize, hi: usize, mut fits: impl FnMut(usize) -> bool) -> usize {
    let (mut good, mut bad) = (lo, hi + 1);
    let mut step = 1;
    while good + step < bad {
        let probe = good + step;
        if fits(probe) {
            good = probe;
            step *= 2;
        } else {
            bad = probe;
        }
    }
    while bad - good > 1 {
        let mid = good + (bad - good) / 2;
        if fits(mid) {
            good = mid;
        } else {
            bad = mid;
        }
    }
    good
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::{ApproximateTokenLengthCalculator, CharacterLengthCalculator};

    fn by_chars(chunk_size: usize, chunk_overlap: usize) -> RecursiveCharacterSplitter {
        RecursiveCharacterSplitter::new(SplitterOptions {
            chunk_size,
            chunk_overlap,
            length_calculator: Box::new(CharacterLengthCalculator),
        })
    }

    #[test]
    fn merges_words_up_to_chunk_size() {
        let chunks = by_chars(10, 0).split_text("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc dddd"]);
    }

    #[test]
    fn adjacent_chunks_share_overlap() {
        let chunks = by_chars(10, 4).split_text("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);
    }

    #[test]
    fn descends_separators_only_when_needed() {
        let chunks = by_chars(5, 0).split_text("one two\n\nthreefourfive");
        assert_eq!(chunks, vec!["one", "two", "three", "fourf", "ive"]);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(by_chars(100, 10).split_text("  Short text\n"), vec!["Short text"]);
        assert!(by_chars(100, 10).split_text(" \n\n ").is_empty());
    }

    #[test]
    fn oversized_overlap_is_clamped() {
        let splitter = by_chars(4, 40);
        assert_eq!(splitter.chunk_size(), 4);
        assert_eq!(splitter.chunk_overlap(), 3);
        let chunks = splitter.split_text("ab cd ef gh");
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    fn chunks_respect_size_for_prose() {
        let paragraph = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let text = format!("{paragraph}\n\n{paragraph}");
        let splitter = by_chars(120, 20);
        let chunks = splitter.split_text(&text);
        assert!(chunks.len() > 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 120));
    }

    #[test]
    fn token_lengths_bound_chunks_in_tokens() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa ".repeat(20);
        let splitter = RecursiveCharacterSplitter::new(SplitterOptions {
            chunk_size: 30,
            chunk_overlap: 5,
            length_calculator: Box::new(ApproximateTokenLengthCalculator),
        });
        let chunks = splitter.split_text(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(ApproximateTokenLengthCalculator.splitter_length(chunk) <= 30, "{chunk}");
        }
    }

    #[test]
    fn zero_chunk_size_is_treated_as_one() {
        let splitter = by_chars(0, 0);
        assert_eq!(splitter.chunk_size(), 1);
        assert_eq!(splitter.chunk_overlap(), 0);
        assert_eq!(splitter.split_text("ab"), vec!["a", "b"]);
    }

    #[test]
    fn last_fitting_finds_the_boundary() {
        assert_eq!(last_fitting(1, 100, |k| k <= 37), 37);
        assert_eq!(last_fitting(1, 100, |k| k <= 250), 100);
        assert_eq!(last_fitting(5, 100, |_| false), 5);
        assert_eq!(last_fitting(0, 0, |_| true), 0);
    }

    #[test]
    fn custom_separators() {
        let chunks = by_chars(6, 0).with_separators(["|", ""]).split_text("abc|def|ghi");
        assert_eq!(chunks, vec!["abc", "def", "ghi"]);
    }
}
