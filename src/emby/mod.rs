use log::error;

use crate::media_list::ResolvedMedia;
use client::Emby;
use models::tasks::ScheduledTask;

pub mod client;
pub mod models;

/// Map trakt tmdb ids to library item ids, split into movies and shows by
/// which folder marker each item's storage path carries.
///
/// A lookup failure ends the loop early and whatever resolved so far is
/// returned, so the spotlight still gets filled with the items found before
/// the error.
pub async fn resolve_library_items(
    emby: &Emby,
    tmdb_ids: &[u64],
    movie_marker: &str,
    tv_marker: &str,
) -> ResolvedMedia {
    let mut resolved = ResolvedMedia::default();
    for tmdb_id in tmdb_ids {
        let page = match emby
            .items_by_provider_id(format!("tmdb.{}", tmdb_id).as_str())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                error!("Error fetching Emby media: {}", e);
                return resolved;
            }
        };
        // only the first hit counts
        let Some(item) = page.items.into_iter().next() else {
            continue;
        };
        let Some(path) = item.path else {
            continue;
        };
        resolved.classify(item.id, &path, movie_marker, tv_marker);
    }
    resolved
}

pub async fn find_plugin_id(
    emby: &Emby,
    plugin_name: &str,
) -> Result<Option<String>, anyhow::Error> {
    let plugins = emby.plugins().await?;
    Ok(plugins
        .into_iter()
        .find(|plugin| plugin.name == plugin_name)
        .map(|plugin| plugin.id))
}

/// Fetch the plugin configuration, fill the first `media.len()` spotlight
/// slots, and post the blob back. Returns the write's status code; partial
/// writes are not detected beyond that.
pub async fn update_spotlight(
    emby: &Emby,
    plugin_id: &str,
    media: &[String],
) -> Result<u16, anyhow::Error> {
    let mut configuration = emby.plugin_configuration(plugin_id).await?;
    fill_spotlight_slots(&mut configuration, media);
    emby.update_plugin_configuration(plugin_id, &configuration)
        .await
}

/// Overwrite `SpotlightItems[i].InternalId` positionally. The slot count is
/// never changed and slots past the media list keep whatever ids they held.
fn fill_spotlight_slots(configuration: &mut serde_json::Value, media: &[String]) {
    let Some(slots) = configuration
        .get_mut("SpotlightItems")
        .and_then(|value| value.as_array_mut())
    else {
        return;
    };
    for (slot, id) in slots.iter_mut().zip(media) {
        if let Some(slot) = slot.as_object_mut() {
            slot.insert(
                "InternalId".to_string(),
                serde_json::Value::String(id.clone()),
            );
        }
    }
}

/// Find a scheduled task by exact name and start it. An unknown name is a
/// hard error, unlike the soft failures elsewhere in the pipeline.
pub async fn trigger_task(emby: &Emby, task_name: &str) -> Result<u16, anyhow::Error> {
    let tasks = emby.scheduled_tasks().await?;
    let task = select_task(tasks, task_name)?;
    emby.run_scheduled_task(&task.id).await
}

/// Exact name match, first match wins.
fn select_task(
    tasks: Vec<ScheduledTask>,
    task_name: &str,
) -> Result<ScheduledTask, anyhow::Error> {
    tasks
        .into_iter()
        .find(|task| task.name == task_name)
        .ok_or_else(|| anyhow::anyhow!("Task '{}' not found.", task_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fills_only_the_first_slots() {
        let mut configuration = json!({
            "Mode": "Carousel",
            "SpotlightItems": [
                {"InternalId": "old-a", "Title": "A"},
                {"InternalId": "old-b", "Title": "B"},
                {"InternalId": "old-c", "Title": "C"},
            ]
        });
        let before_last = configuration["SpotlightItems"][2].clone();

        fill_spotlight_slots(
            &mut configuration,
            &["new-a".to_string(), "new-b".to_string()],
        );

        let slots = configuration["SpotlightItems"].as_array().unwrap();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0]["InternalId"], "new-a");
        assert_eq!(slots[1]["InternalId"], "new-b");
        assert_eq!(slots[2], before_last);
        // sibling fields on touched slots survive
        assert_eq!(slots[0]["Title"], "A");
    }

    #[test]
    fn extra_media_beyond_slot_count_is_ignored() {
        let mut configuration = json!({"SpotlightItems": [{"InternalId": "old"}]});
        fill_spotlight_slots(
            &mut configuration,
            &["a".to_string(), "b".to_string(), "c".to_string()],
        );
        let slots = configuration["SpotlightItems"].as_array().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0]["InternalId"], "a");
    }

    #[test]
    fn missing_spotlight_array_leaves_configuration_alone() {
        let mut configuration = json!({"Mode": "Carousel"});
        let before = configuration.clone();
        fill_spotlight_slots(&mut configuration, &["a".to_string()]);
        assert_eq!(configuration, before);
    }

    fn task(name: &str, id: &str) -> ScheduledTask {
        ScheduledTask {
            name: name.to_string(),
            id: id.to_string(),
        }
    }

    #[test]
    fn unknown_task_name_is_a_hard_error() {
        let tasks = vec![task("Scan Library", "t1")];
        let err = select_task(tasks, "Update Top Picks").unwrap_err();
        assert_eq!(err.to_string(), "Task 'Update Top Picks' not found.");
    }

    #[test]
    fn first_task_with_matching_name_wins() {
        let tasks = vec![
            task("Scan Library", "t1"),
            task("Update Top Picks", "t2"),
            task("Update Top Picks", "t3"),
        ];
        let selected = select_task(tasks, "Update Top Picks").unwrap();
        assert_eq!(selected.id, "t2");
    }
}
