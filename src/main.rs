mod emby;
mod media_list;
mod organizer;
mod trakt;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use emby::client::Emby;
use media_list::build_media_list;
use trakt::Trakt;

#[derive(Parser, Debug)]
#[command(
    about = "Sync Emby's Top Picks spotlight with Trakt trending and tidy season metadata"
)]
struct Config {
    /// Base URL of the Emby server, e.g. http://emby:8096
    #[arg(long, env = "EMBY_URL")]
    emby_url: String,

    #[arg(long, env = "EMBY_API_KEY")]
    emby_api_key: String,

    #[arg(long, env = "TRAKT_CLIENT_ID")]
    trakt_client_id: String,

    /// Storage path marker that classifies a library item as a movie
    #[arg(long, env = "MOVIE_FOLDER_NAME", default_value = "movies-hd")]
    movie_folder_name: String,

    /// Storage path marker that classifies a library item as a show
    #[arg(long, env = "TV_FOLDER_NAME", default_value = "tv")]
    tv_folder_name: String,

    #[arg(long, env = "MOVIES_LIMIT", default_value_t = 6)]
    movies_limit: usize,

    #[arg(long, env = "SHOWS_LIMIT", default_value_t = 3)]
    shows_limit: usize,

    /// Root scanned for orphaned episode metadata files
    #[arg(long, default_value = "/media")]
    media_root: PathBuf,

    #[arg(long, default_value = "Top Picks")]
    plugin_name: String,

    #[arg(long, default_value = "Update Top Picks")]
    task_name: String,

    /// Wall-clock budget for the metadata organizer loop, in seconds
    #[arg(long, default_value_t = 60)]
    organize_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::parse();

    let trakt = Trakt::new(config.trakt_client_id.clone());
    let emby = Emby::new(config.emby_url.clone(), config.emby_api_key.clone());

    // a trakt outage degrades to an empty list rather than aborting
    let trending_ids = match trakt.trending_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            error!("Error fetching trending media: {}", e);
            Vec::new()
        }
    };
    info!("{} trending ids fetched from trakt", trending_ids.len());

    let resolved = emby::resolve_library_items(
        &emby,
        &trending_ids,
        &config.movie_folder_name,
        &config.tv_folder_name,
    )
    .await;
    let media_list = build_media_list(&resolved, config.movies_limit, config.shows_limit);
    info!(
        "resolved {} movies and {} shows, filling {} spotlight slots",
        resolved.movies.len(),
        resolved.shows.len(),
        media_list.len()
    );

    let Some(plugin_id) = emby::find_plugin_id(&emby, &config.plugin_name).await? else {
        error!("{} plugin not found.", config.plugin_name);
        return Ok(());
    };

    let status = emby::update_spotlight(&emby, &plugin_id, &media_list).await?;
    info!("plugin configuration updated, status {}", status);

    let status = emby::trigger_task(&emby, &config.task_name).await?;
    info!("task '{}' triggered, status {}", config.task_name, status);

    organizer::organize_metadata_files(
        &config.media_root,
        Duration::from_secs(config.organize_secs),
    )
    .await?;
    info!("Complete!");

    Ok(())
}
