//! Article enrichment
//!
//! Adds a short summary, a sentiment label and topic tags to each article.
//! Annotations are memoized by article id so a story seen in several feeds
//! is only analyzed once.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use newshub_core::Article;
use newshub_similarity::TfidfVectorizer;

use crate::cache::TtlCache;
use crate::error::ServiceError;

/// Characters kept by the truncating summarizer
pub const SUMMARY_MAX_CHARS: usize = 150;

/// Upper bound on tags per article
pub const MAX_TAGS: usize = 5;

/// How long a memoized annotation is reused
const ANNOTATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// POSITIVE, NEGATIVE or NEUTRAL
    pub label: String,
    /// Strength in 0.0..=1.0
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub summary: String,
    pub sentiment: Sentiment,
    pub tags: Vec<String>,
}

/// Produces an [`Annotation`] for an article body and title
#[async_trait]
pub trait ArticleAnnotator: Send + Sync {
    async fn analyze(&self, text: &str, title: &str) -> Result<Annotation, ServiceError>;
}

const TOPICS: &[(&str, &[&str])] = &[
    ("politics", &["election", "elections", "government", "minister", "parliament", "senate", "president", "policy", "vote", "congress"]),
    ("business", &["market", "markets", "economy", "stock", "stocks", "company", "trade", "finance", "bank", "investors"]),
    ("technology", &["tech", "technology", "software", "ai", "digital", "internet", "app", "startup", "cyber", "smartphone"]),
    ("sports", &["football", "cricket", "match", "tournament", "league", "olympics", "tennis", "player", "championship", "coach"]),
    ("entertainment", &["film", "movie", "music", "celebrity", "actor", "actress", "album", "festival", "hollywood", "bollywood"]),
    ("health", &["health", "hospital", "disease", "vaccine", "covid", "doctors", "medical", "virus", "patients"]),
    ("science", &["science", "research", "study", "scientists", "space", "nasa", "discovery", "physics"]),
    ("education", &["school", "schools", "university", "students", "education", "exam", "teachers", "college"]),
    ("environment", &["climate", "environment", "pollution", "emissions", "wildlife", "forest", "flood", "drought"]),
    ("world", &["international", "foreign", "war", "countries", "border", "diplomatic", "nations", "summit"]),
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "win", "wins", "won", "growth", "success", "gain", "gains", "rise", "rises",
    "record", "improve", "improves", "boost", "breakthrough", "celebrate", "hope", "strong",
    "positive", "agreement", "peace", "recovery", "best", "happy",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "crisis", "war", "death", "deaths", "dead", "killed", "loss", "losses", "fall", "falls",
    "decline", "attack", "crash", "fear", "fraud", "disaster", "worst", "negative", "collapse",
    "injured", "violence", "protest", "fails",
];

/// Lexicon and keyword based annotator
#[derive(Debug, Clone, Default)]
pub struct KeywordAnnotator {
    vectorizer: TfidfVectorizer,
}

impl KeywordAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    fn summarize(text: &str) -> String {
        if text.chars().count() <= SUMMARY_MAX_CHARS {
            return text.to_string();
        }
        let mut summary: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
        summary.push_str("...");
        summary
    }

    fn sentiment(tokens: &[String]) -> Sentiment {
        let positive = tokens
            .iter()
            .filter(|t| POSITIVE_WORDS.contains(&t.as_str()))
            .count() as f64;
        let negative = tokens
            .iter()
            .filter(|t| NEGATIVE_WORDS.contains(&t.as_str()))
            .count() as f64;

        let polarity = (positive - negative) / (positive + negative).max(1.0);
        let label = if polarity > 0.0 {
            "POSITIVE"
        } else if polarity < 0.0 {
            "NEGATIVE"
        } else {
            "NEUTRAL"
        };

        Sentiment {
            label: label.to_string(),
            score: polarity.abs(),
        }
    }

    fn topics(tokens: &[String]) -> Vec<String> {
        TOPICS
            .iter()
            .filter(|(_, keywords)| tokens.iter().any(|t| keywords.contains(&t.as_str())))
            .map(|(topic, _)| topic.to_string())
            .collect()
    }

    /// Most frequent tokens; ties keep first occurrence
    fn keywords(tokens: &[String], limit: usize) -> Vec<String> {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (position, token) in tokens.iter().enumerate() {
            if token.len() < 3 || token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            counts.entry(token.as_str()).or_insert((0, position)).0 += 1;
        }

        let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(token, _)| token.to_string())
            .collect()
    }
}

#[async_trait]
impl ArticleAnnotator for KeywordAnnotator {
    async fn analyze(&self, text: &str, title: &str) -> Result<Annotation, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::Annotation("article has no text".to_string()));
        }

        let tokens = self.vectorizer.tokenize(&format!("{} {}", title, text));

        let mut tags = Self::topics(&tokens);
        for keyword in Self::keywords(&tokens, MAX_TAGS) {
            if !tags.contains(&keyword) {
                tags.push(keyword);
            }
        }
        tags.truncate(MAX_TAGS);

        Ok(Annotation {
            summary: Self::summarize(text),
            sentiment: Self::sentiment(&tokens),
            tags,
        })
    }
}

/// Fills enrichment fields on articles, memoized by article id
pub struct Enricher {
    annotator: Arc<dyn ArticleAnnotator>,
    memo: TtlCache<Annotation>,
}

impl Enricher {
    pub fn new(annotator: Arc<dyn ArticleAnnotator>) -> Self {
        Self {
            annotator,
            memo: TtlCache::default(),
        }
    }

    /// Annotate every article in place
    ///
    /// A failed annotation leaves that article's fields empty.
    pub async fn enrich(&self, articles: &mut [Article]) {
        for article in articles.iter_mut() {
            let annotation = match self.memo.get(&article.id) {
                Some(annotation) => annotation,
                None => match self
                    .annotator
                    .analyze(&article.description, &article.title)
                    .await
                {
                    Ok(annotation) => {
                        self.memo
                            .set(article.id.clone(), annotation.clone(), ANNOTATION_TTL);
                        annotation
                    }
                    Err(e) => {
                        warn!("Could not annotate article {}: {}", article.id, e);
                        continue;
                    }
                },
            };

            article.summary = Some(annotation.summary);
            article.sentiment = Some(annotation.sentiment.label);
            article.tags = annotation.tags;
        }
        debug!("Enriched {} articles", articles.len());
    }
}
