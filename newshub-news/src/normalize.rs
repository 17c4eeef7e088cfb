//! Provider article normalization
//!
//! Maps [`RawArticle`] into the canonical [`Article`], rejecting records that
//! cannot be displayed and filling placeholders for the rest.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use newshub_core::{Article, PLACEHOLDER_IMAGE_URL, UNKNOWN_SOURCE, UNTITLED_ARTICLE};

use crate::types::RawArticle;

/// Timestamp format used by the provider
const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display format, e.g. "March 05, 2024 02:30 PM"
const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y %I:%M %p";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Reformat a provider timestamp for display
///
/// Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), PROVIDER_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Normalize one provider article, or `None` if it lacks a description or link
pub fn normalize(raw: &RawArticle) -> Option<Article> {
    let description = non_empty(&raw.description)?;
    let url = non_empty(&raw.link)?;

    let id = non_empty(&raw.article_id).unwrap_or(url);

    Some(Article {
        id: id.to_string(),
        title: non_empty(&raw.title).unwrap_or(UNTITLED_ARTICLE).to_string(),
        description: description.to_string(),
        url: url.to_string(),
        source: non_empty(&raw.source_id).unwrap_or(UNKNOWN_SOURCE).to_string(),
        published_at: non_empty(&raw.pub_date).map(format_date),
        image_url: non_empty(&raw.image_url)
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
            .to_string(),
        summary: None,
        sentiment: None,
        tags: Vec::new(),
    })
}

/// Normalize a provider batch, dropping rejects and exact repeats
///
/// A repeat is an article whose id or URL was already accepted earlier in the
/// batch. Order is preserved.
pub fn normalize_batch(raw: &[RawArticle]) -> Vec<Article> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut articles = Vec::with_capacity(raw.len());

    for item in raw {
        let Some(article) = normalize(item) else {
            debug!("Skipping article without description or link: {:?}", item.title);
            continue;
        };

        if seen_ids.contains(&article.id) || seen_urls.contains(&article.url) {
            debug!("Skipping repeated article: {}", article.id);
            continue;
        }

        seen_ids.insert(article.id.clone());
        seen_urls.insert(article.url.clone());
        articles.push(article);
    }

    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: Option<&str>, title: Option<&str>, description: Option<&str>, link: Option<&str>) -> RawArticle {
        RawArticle {
            article_id: id.map(String::from),
            title: title.map(String::from),
            description: description.map(String::from),
            link: link.map(String::from),
            ..RawArticle::default()
        }
    }

    #[test]
    fn test_rejects_missing_description_or_link() {
        assert!(normalize(&raw(Some("1"), Some("T"), None, Some("https://a"))).is_none());
        assert!(normalize(&raw(Some("1"), Some("T"), Some("  "), Some("https://a"))).is_none());
        assert!(normalize(&raw(Some("1"), Some("T"), Some("D"), None)).is_none());
        assert!(normalize(&raw(Some("1"), Some("T"), Some("D"), Some(""))).is_none());
    }

    #[test]
    fn test_fills_placeholders() {
        let article = normalize(&raw(None, None, Some("Body"), Some("https://a/1"))).unwrap();
        assert_eq!(article.title, UNTITLED_ARTICLE);
        assert_eq!(article.source, UNKNOWN_SOURCE);
        assert_eq!(article.image_url, PLACEHOLDER_IMAGE_URL);
        assert_eq!(article.published_at, None);
        assert!(article.tags.is_empty());
    }

    #[test]
    fn test_id_falls_back_to_url() {
        let article = normalize(&raw(None, Some("T"), Some("D"), Some("https://a/1"))).unwrap();
        assert_eq!(article.id, "https://a/1");

        let article = normalize(&raw(Some(""), Some("T"), Some("D"), Some("https://a/1"))).unwrap();
        assert_eq!(article.id, "https://a/1");

        let article = normalize(&raw(Some("abc"), Some("T"), Some("D"), Some("https://a/1"))).unwrap();
        assert_eq!(article.id, "abc");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05 14:30:00"), "March 05, 2024 02:30 PM");
        assert_eq!(format_date("yesterday-ish"), "yesterday-ish");
    }

    #[test]
    fn test_batch_drops_repeats_and_keeps_order() {
        let batch = vec![
            raw(Some("1"), Some("First"), Some("D"), Some("https://a/1")),
            raw(Some("2"), Some("No link"), Some("D"), None),
            raw(Some("1"), Some("Same id"), Some("D"), Some("https://a/other")),
            raw(Some("3"), Some("Same url"), Some("D"), Some("https://a/1")),
            raw(Some("4"), Some("Fourth"), Some("D"), Some("https://a/4")),
        ];

        let articles = normalize_batch(&batch);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Fourth"]);
    }
}
