//! Feed identities and page requests

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NewsHubError;

/// News categories offered by the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Business,
    Sports,
    Science,
    Health,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Science,
        Category::Health,
        Category::Entertainment,
    ];

    /// Provider-side category name
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Science => "science",
            Category::Health => "health",
            Category::Entertainment => "entertainment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = NewsHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| NewsHubError::invalid_category(s))
    }
}

/// Where local headlines are taken from
///
/// `country` is a provider country code; `state` and `city` narrow the
/// results through the free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locality {
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl Locality {
    pub fn new(
        country: &str,
        state: Option<&str>,
        city: Option<&str>,
    ) -> Result<Self, NewsHubError> {
        let country = country.trim().to_lowercase();
        if country.is_empty() || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NewsHubError::invalid_feed_key(format!("local:{}", country)));
        }

        let place = |p: Option<&str>| {
            p.map(str::trim)
                .filter(|p| !p.is_empty() && !p.contains('/'))
                .map(String::from)
        };

        Ok(Self {
            country,
            state: place(state),
            city: place(city),
        })
    }

    /// Provider free-text query for the state and city, if any
    pub fn query(&self) -> Option<String> {
        match (&self.state, &self.city) {
            (Some(state), Some(city)) => Some(format!("{} OR {}", state, city)),
            (Some(place), None) | (None, Some(place)) => Some(place.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.country)?;
        match (&self.state, &self.city) {
            (state, Some(city)) => {
                write!(f, "/{}/{}", state.as_deref().unwrap_or_default(), city)
            }
            (Some(state), None) => write!(f, "/{}", state),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for Locality {
    type Err = NewsHubError;

    /// Parses `country[/state[/city]]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/');
        let country = parts.next().unwrap_or_default();
        let state = parts.next();
        let city = parts.next();
        if city.is_some_and(|c| c.contains('/')) {
            return Err(NewsHubError::invalid_feed_key(format!("local:{}", s)));
        }
        Locality::new(country, state, city)
    }
}

/// A named, parametrized stream of articles
///
/// The string form (`global`, `indian`, `breaking`, `category:<name>`,
/// `search:<query>`, `local:<country>[/<state>[/<city>]]`) is used as the
/// cache and session key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedKey {
    /// General headlines without a query
    Global,
    /// India-related headlines
    Indian,
    /// Live top stories
    Breaking,
    Category(Category),
    Search(String),
    Local(Locality),
}

impl FeedKey {
    /// Feeds kept warm by the background refresher
    pub fn core_feeds() -> Vec<FeedKey> {
        let mut feeds = vec![FeedKey::Global, FeedKey::Indian];
        feeds.extend(Category::ALL.into_iter().map(FeedKey::Category));
        feeds
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKey::Global => f.write_str("global"),
            FeedKey::Indian => f.write_str("indian"),
            FeedKey::Breaking => f.write_str("breaking"),
            FeedKey::Category(c) => write!(f, "category:{}", c),
            FeedKey::Search(q) => write!(f, "search:{}", q),
            FeedKey::Local(locality) => write!(f, "local:{}", locality),
        }
    }
}

impl FromStr for FeedKey {
    type Err = NewsHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => return Ok(FeedKey::Global),
            "indian" => return Ok(FeedKey::Indian),
            "breaking" => return Ok(FeedKey::Breaking),
            _ => {}
        }

        if let Some(name) = s.strip_prefix("category:") {
            return name
                .parse()
                .map(FeedKey::Category)
                .map_err(|_| NewsHubError::invalid_feed_key(s));
        }

        if let Some(query) = s.strip_prefix("search:") {
            let query = query.trim();
            if query.is_empty() {
                return Err(NewsHubError::invalid_feed_key(s));
            }
            return Ok(FeedKey::Search(query.to_string()));
        }

        if let Some(locality) = s.strip_prefix("local:") {
            return locality
                .parse()
                .map(FeedKey::Local)
                .map_err(|_| NewsHubError::invalid_feed_key(s));
        }

        Err(NewsHubError::invalid_feed_key(s))
    }
}

/// Which page of a feed to request from the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Initial,
    Token(String),
}

impl PageRequest {
    /// The provider token, if this is not the first page
    pub fn token(&self) -> Option<&str> {
        match self {
            PageRequest::Initial => None,
            PageRequest::Token(t) => Some(t.as_str()),
        }
    }
}
