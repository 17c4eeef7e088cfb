//! Scripted provider used by the service tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use newshub_news::{ArticleSource, ProviderQuery, RawArticle, RawPage};

/// Returns queued pages in order, then empty pages
pub struct ScriptedSource {
    pages: Mutex<VecDeque<RawPage>>,
    queries: Mutex<Vec<ProviderQuery>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<RawPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Every query received so far
    pub fn queries(&self) -> Vec<ProviderQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    async fn fetch_page(&self, query: &ProviderQuery) -> RawPage {
        self.queries.lock().unwrap().push(query.clone());
        self.pages.lock().unwrap().pop_front().unwrap_or_default()
    }
}

pub fn raw(id: &str, title: &str, description: &str) -> RawArticle {
    RawArticle {
        article_id: Some(id.to_string()),
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        link: Some(format!("https://news.example/{}", id)),
        source_id: Some("example".to_string()),
        ..RawArticle::default()
    }
}

/// A page of distinct articles with the given ids
pub fn page_of(ids: &[&str], next: Option<&str>) -> RawPage {
    const SUBJECTS: &[&str] = &[
        "harbor", "violin", "glacier", "orchard", "satellite", "bakery", "volcano", "library",
        "tram", "meadow", "canyon", "lighthouse", "vineyard", "reef", "monsoon", "quarry",
    ];
    RawPage {
        results: ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let subject = SUBJECTS[i % SUBJECTS.len()];
                raw(id, &format!("{} {}", subject, id), &format!("story about {} number {}", subject, id))
            })
            .collect(),
        next_page: next.map(String::from),
        suggested_query: None,
    }
}
