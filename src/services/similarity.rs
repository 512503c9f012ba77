//! Genre-based content similarity.
//!
//! Each movie's genre list is treated as a small text document, vectorized
//! with TF-IDF and compared with cosine similarity.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::Movie;

/// Minimum token length, in characters, kept by [`tokenize`]
const MIN_TOKEN_CHARS: usize = 2;

/// Splits text into lowercase terms made of word characters
///
/// A term is a maximal run of alphanumeric characters or `_` at least two
/// characters long, so `"Sci-Fi"` yields `sci` and `fi` while single letters
/// are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Sparse vector of `(term index, weight)` pairs sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product over the shared terms
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }
}

/// TF-IDF vectorizer with a lexicographically ordered vocabulary
///
/// Uses raw term counts and smoothed inverse document frequency,
/// `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, and L2-normalizes every vector.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and document frequencies of `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let unique: BTreeSet<String> = tokenize(document.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let idf = doc_freq
            .values()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let vocabulary = doc_freq
            .into_keys()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();

        Self { vocabulary, idf }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Inverse document frequency of a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&index| self.idf[index])
    }

    /// Maps a document to its normalized TF-IDF vector; unknown terms are ignored
    pub fn transform(&self, document: &str) -> TermVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        TermVector {
            entries: counts
                .into_iter()
                .map(|(index, tf)| (index, tf * self.idf[index]))
                .collect(),
        }
        .normalized()
    }
}

/// Pairwise cosine similarity between catalog movies, indexed by title
///
/// Rows follow catalog order. Entries are computed from the stored unit
/// vectors on lookup, so the full `n x n` table is never materialized.
/// Values lie in `[0, 1]`, the matrix is symmetric and the diagonal is 1.
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    titles: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<TermVector>,
}

impl SimilarityMatrix {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Titles in row order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Row position of a title; duplicates resolve to the first occurrence
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    /// Similarity between the movies at rows `i` and `j`
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn similarity_at(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 1.0;
        }
        self.vectors[i].dot(&self.vectors[j]).clamp(0.0, 1.0)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.similarity_at(self.index_of(a)?, self.index_of(b)?))
    }

    /// Full similarity row of `title` against every catalog movie
    pub fn row(&self, title: &str) -> Option<Vec<f64>> {
        let i = self.index_of(title)?;
        Some((0..self.len()).map(|j| self.similarity_at(i, j)).collect())
    }
}

/// Builds the genre similarity model for a catalog snapshot
pub fn build(catalog: &[Movie]) -> SimilarityMatrix {
    let documents: Vec<String> = catalog.iter().map(Movie::feature_text).collect();
    let vectorizer = TfidfVectorizer::fit(&documents);
    let vectors = documents
        .iter()
        .map(|document| vectorizer.transform(document))
        .collect();

    let mut index = HashMap::with_capacity(catalog.len());
    for (position, movie) in catalog.iter().enumerate() {
        index.entry(movie.title.clone()).or_insert(position);
    }

    SimilarityMatrix {
        titles: catalog.iter().map(|movie| movie.title.clone()).collect(),
        index,
        vectors,
    }
}
