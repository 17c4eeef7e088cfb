//! TF-IDF vectorization over a single batch of documents

use std::collections::{HashMap, HashSet};

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, SimilarityError};
use crate::stop_words::is_stop_word;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("static token pattern"));

/// Fits a vocabulary on a batch and produces L2-normalized TF-IDF rows
///
/// Weights are raw term counts times a smoothed inverse document frequency:
///
/// `idf(t) = 1 + ln(1 + n / df(t))`
///
/// where `n` is the number of documents and `df(t)` the number of documents
/// containing `t`.
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase word tokens with English stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_RE
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|t| !is_stop_word(t))
            .map(String::from)
            .collect()
    }

    /// Build the document-term matrix, one row per text
    ///
    /// Fails with [`SimilarityError::EmptyVocabulary`] when no text contributes
    /// a single token.
    pub fn fit_transform(&self, texts: &[String]) -> Result<Array2<f64>> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| self.tokenize(t)).collect();

        let mut vocabulary: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for tokens in &docs {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for token in tokens {
                if !vocabulary.contains_key(token.as_str()) {
                    vocabulary.insert(token.as_str(), doc_freq.len());
                    doc_freq.push(0);
                }
            }
            for token in unique {
                doc_freq[vocabulary[token]] += 1;
            }
        }

        if vocabulary.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| 1.0 + (1.0 + n / df as f64).ln())
            .collect();

        let mut matrix = Array2::<f64>::zeros((docs.len(), vocabulary.len()));
        for (row, tokens) in docs.iter().enumerate() {
            for token in tokens {
                matrix[[row, vocabulary[token.as_str()]]] += 1.0;
            }
        }

        for mut row in matrix.rows_mut() {
            row.iter_mut()
                .zip(idf.iter())
                .for_each(|(weight, idf)| *weight *= idf);

            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|w| w / norm);
            }
        }

        debug!(
            "Built TF-IDF matrix: {} documents x {} terms",
            docs.len(),
            vocabulary.len()
        );

        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words() {
        let v = TfidfVectorizer::new();
        assert_eq!(
            v.tokenize("The Senate passed a BUDGET bill, and the House agreed."),
            vec!["senate", "passed", "budget", "house", "agreed"]
        );
    }

    #[test]
    fn test_rows_are_unit_length() {
        let v = TfidfVectorizer::new();
        let texts = vec![
            "markets rally on rate cut".to_string(),
            "rate cut lifts markets".to_string(),
            "storm hits coast".to_string(),
        ];
        let m = v.fit_transform(&texts).unwrap();
        assert_eq!(m.nrows(), 3);
        for row in m.rows() {
            assert!((row.dot(&row) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let v = TfidfVectorizer::new();
        let texts = vec!["alpha beta".to_string(), "alpha gamma".to_string()];
        let m = v.fit_transform(&texts).unwrap();
        // alpha occurs in both documents, beta only in the first
        let alpha = m[[0, 0]];
        let beta = m[[0, 1]];
        assert!(beta > alpha);
    }

    #[test]
    fn test_all_stop_words_is_empty_vocabulary() {
        let v = TfidfVectorizer::new();
        let texts = vec!["the and of".to_string(), "it is what it is".to_string()];
        assert_eq!(v.fit_transform(&texts), Err(SimilarityError::EmptyVocabulary));
    }
}
