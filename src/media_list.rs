#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub movies: Vec<String>,
    pub shows: Vec<String>,
}

impl ResolvedMedia {
    /// Sort an item id into movies or shows based on which folder marker its
    /// storage path carries. The movie marker is checked first, so a path
    /// containing both counts as a movie. A path with neither is dropped.
    pub fn classify(&mut self, item_id: String, path: &str, movie_marker: &str, tv_marker: &str) {
        if path.contains(movie_marker) {
            self.movies.push(item_id);
        } else if path.contains(tv_marker) {
            self.shows.push(item_id);
        }
    }
}

/// Interleave movie and show ids into spotlight slot order, one movie then
/// one show per round, for nine rounds. The per-category limits cap how many
/// rounds each side contributes.
pub fn build_media_list(
    resolved: &ResolvedMedia,
    movies_limit: usize,
    shows_limit: usize,
) -> Vec<String> {
    let mut media = Vec::new();
    for i in 0..9 {
        if i < movies_limit {
            if let Some(id) = resolved.movies.get(i) {
                media.push(id.clone());
            }
        }
        if i < shows_limit {
            if let Some(id) = resolved.shows.get(i) {
                media.push(id.clone());
            }
        }
    }
    media
}
