//! TMDB API client.

use crate::core::resolver::SearchProvider;
use crate::models::media::{Candidate, MediaKind};
use crate::Result;
use serde::Deserialize;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default API key file, relative to the working directory.
const DEFAULT_API_KEY_FILE: &str = "./.tmdb-api-key";

/// TMDB client configuration.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API key or Bearer token (JWT)
    pub api_key: String,
    /// Whether to use Bearer token authentication (API v4 style)
    pub use_bearer: bool,
}

impl TmdbConfig {
    /// Create config from the key file or environment.
    ///
    /// Reads the file named by `TMDB_API_KEY_FILE` (default
    /// `./.tmdb-api-key`), falling back to the `TMDB_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        let key_file =
            std::env::var("TMDB_API_KEY_FILE").unwrap_or_else(|_| DEFAULT_API_KEY_FILE.to_string());

        let api_key = match std::fs::read_to_string(&key_file) {
            Ok(content) => content.trim().to_string(),
            Err(_) => std::env::var("TMDB_API_KEY").unwrap_or_default(),
        };

        if api_key.is_empty() {
            return Err(crate::Error::TmdbApiKeyMissing);
        }

        // Bearer tokens start with "eyJ" (base64 encoded JWT header)
        let use_bearer = api_key.starts_with("eyJ");

        Ok(Self {
            api_key,
            use_bearer,
        })
    }
}

/// TMDB API client.
pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
}

/// Movie search result.
#[derive(Debug, Deserialize)]
struct MovieSearchResult {
    results: Vec<MovieSearchItem>,
}

/// Movie search item.
#[derive(Debug, Deserialize)]
struct MovieSearchItem {
    id: u64,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
}

/// TV show search result.
#[derive(Debug, Deserialize)]
struct TvSearchResult {
    results: Vec<TvSearchItem>,
}

/// TV show search item.
#[derive(Debug, Deserialize)]
struct TvSearchItem {
    id: u64,
    name: String,
    original_name: Option<String>,
    first_air_date: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Create a new TMDB client from the key file or environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(TmdbConfig::from_env()?))
    }

    /// Build a request with proper authentication.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        if self.config.use_bearer {
            request.header("Authorization", format!("Bearer {}", self.config.api_key))
        } else {
            request
        }
    }

    /// Build URL with optional api_key parameter (only for v3 style).
    fn build_url(&self, path: &str, extra_params: &str) -> String {
        if self.config.use_bearer {
            format!("{}/{}?include_adult=true{}", TMDB_BASE_URL, path, extra_params)
        } else {
            format!(
                "{}/{}?include_adult=true&api_key={}{}",
                TMDB_BASE_URL, path, self.config.api_key, extra_params
            )
        }
    }

    /// Verify API key is valid.
    pub async fn verify_api_key(&self) -> Result<bool> {
        let url = if self.config.use_bearer {
            format!("{}/authentication", TMDB_BASE_URL)
        } else {
            format!(
                "{}/authentication?api_key={}",
                TMDB_BASE_URL, self.config.api_key
            )
        };

        match self.build_request(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Search for movies.
    pub async fn search_movie(&self, query: &str, year: Option<u16>) -> Result<Vec<Candidate>> {
        let year_param = year
            .map(|y| format!("&primary_release_year={}", y))
            .unwrap_or_default();
        let url = self.build_url(
            "search/movie",
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: MovieSearchResult = self.build_request(&url).send().await?.json().await?;
        Ok(resp
            .results
            .into_iter()
            .map(|item| Candidate {
                id: item.id.to_string(),
                display_name: item.title,
                year: parse_year(item.release_date.as_deref()),
                alternate_titles: item.original_title.into_iter().collect(),
            })
            .collect())
    }

    /// Search for TV shows.
    pub async fn search_tv(&self, query: &str, year: Option<u16>) -> Result<Vec<Candidate>> {
        let year_param = year
            .map(|y| format!("&first_air_date_year={}", y))
            .unwrap_or_default();
        let url = self.build_url(
            "search/tv",
            &format!("&query={}{}", urlencoding::encode(query), year_param),
        );

        let resp: TvSearchResult = self.build_request(&url).send().await?.json().await?;
        Ok(resp
            .results
            .into_iter()
            .map(|item| Candidate {
                id: item.id.to_string(),
                display_name: item.name,
                year: parse_year(item.first_air_date.as_deref()),
                alternate_titles: item.original_name.into_iter().collect(),
            })
            .collect())
    }
}

impl SearchProvider for TmdbClient {
    async fn search(
        &self,
        title: &str,
        year: Option<u16>,
        kind: MediaKind,
    ) -> Result<Vec<Candidate>> {
        match kind {
            MediaKind::Movie => self.search_movie(title, year).await,
            MediaKind::Show => self.search_tv(title, year).await,
        }
    }
}

/// First release / air year from a `YYYY-MM-DD` date string.
fn parse_year(date: Option<&str>) -> Option<u16> {
    date?.split('-').next()?.parse().ok()
}
