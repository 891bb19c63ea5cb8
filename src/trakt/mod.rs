use serde::Deserialize;

const TRAKT_API_URL: &str = "https://api.trakt.tv";

#[derive(Deserialize, Debug, Clone)]
struct TrendingMovie {
    movie: CatalogEntry,
}

#[derive(Deserialize, Debug, Clone)]
struct TrendingShow {
    show: CatalogEntry,
}

#[derive(Deserialize, Debug, Clone)]
struct CatalogEntry {
    ids: ProviderIds,
}

#[derive(Deserialize, Debug, Clone)]
struct ProviderIds {
    tmdb: Option<u64>,
}

pub struct Trakt {
    client_id: String,
}

impl Trakt {
    pub fn new(client_id: String) -> Self {
        Self { client_id }
    }

    async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> Result<Vec<T>, anyhow::Error> {
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/{}", TRAKT_API_URL, path))
            .query(&[("page", page)])
            .header("Content-Type", "application/json")
            .header("trakt-api-version", "2")
            .header("trakt-api-key", &self.client_id)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "trakt returned {} for {} page {}",
                response.status(),
                path,
                page
            ));
        }
        Ok(response.json().await?)
    }

    /// Trending tmdb ids over two pages of each endpoint: every movie id in
    /// source order, then every show id. Any failed page fails the whole
    /// fetch, so callers never see a partial window.
    pub async fn trending_ids(&self) -> Result<Vec<u64>, anyhow::Error> {
        let mut movies: Vec<u64> = Vec::new();
        let mut shows: Vec<u64> = Vec::new();
        for page in 1..=2 {
            let page_movies: Vec<TrendingMovie> = self.get_page("movies/trending", page).await?;
            movies.extend(page_movies.into_iter().filter_map(|e| e.movie.ids.tmdb));
            let page_shows: Vec<TrendingShow> = self.get_page("shows/trending", page).await?;
            shows.extend(page_shows.into_iter().filter_map(|e| e.show.ids.tmdb));
        }
        movies.extend(shows);
        Ok(movies)
    }
}
