//! Near-duplicate removal within one fetched batch
//!
//! Articles are compared on title + description with TF-IDF cosine
//! similarity. Selection is greedy in input order: the first article of each
//! group of near-duplicates is kept.
//!
//! Pairwise scoring is O(N²); batches from the provider are small (tens of
//! articles).

use ndarray::Array2;
use tracing::{debug, error, info};

use newshub_core::Article;

use crate::error::{Result, SimilarityError};
use crate::similarity::similarity_matrix;
use crate::tfidf::TfidfVectorizer;

/// Similarity above which two articles count as the same story
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct Deduplicator {
    vectorizer: TfidfVectorizer,
    threshold: f64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl Deduplicator {
    /// Create a deduplicator with a custom threshold in `0.0..=1.0`
    pub fn new(threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SimilarityError::InvalidThreshold(threshold));
        }
        Ok(Self {
            vectorizer: TfidfVectorizer::new(),
            threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Pairwise similarity of the given texts
    pub fn score(&self, texts: &[String]) -> Result<Array2<f64>> {
        let tfidf = self.vectorizer.fit_transform(texts)?;
        similarity_matrix(&tfidf)
    }

    /// Indices of the texts to keep, in ascending order
    pub fn select_unique(&self, texts: &[String]) -> Result<Vec<usize>> {
        let n = texts.len();
        if n <= 1 {
            return Ok((0..n).collect());
        }

        let sim = self.score(texts)?;
        let mut seen = vec![false; n];
        let mut kept = Vec::with_capacity(n);

        for i in 0..n {
            if seen[i] {
                continue;
            }
            seen[i] = true;
            kept.push(i);

            for j in (i + 1)..n {
                if !seen[j] && sim[[i, j]] > self.threshold {
                    debug!("Texts {} and {} are similar ({:.3})", i, j, sim[[i, j]]);
                    seen[j] = true;
                }
            }
        }

        Ok(kept)
    }

    /// Drop near-duplicate articles, keeping first-seen order
    ///
    /// If the similarity matrix cannot be built the batch is returned as-is.
    pub fn dedup(&self, articles: Vec<Article>) -> Vec<Article> {
        if articles.len() <= 1 {
            return articles;
        }

        let texts: Vec<String> = articles.iter().map(Article::similarity_text).collect();
        let kept = match self.select_unique(&texts) {
            Ok(kept) => kept,
            Err(e) => {
                error!("Error in content similarity detection: {}", e);
                return articles;
            }
        };

        let total = articles.len();
        let mut keep = vec![false; total];
        for i in kept {
            keep[i] = true;
        }

        let unique: Vec<Article> = articles
            .into_iter()
            .zip(keep)
            .filter_map(|(article, keep)| keep.then_some(article))
            .collect();

        info!("Removed {} similar articles", total - unique.len());
        unique
    }
}
