use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use log::info;
use regex::Regex;
use walkdir::WalkDir;

const METADATA_EXTENSION: &str = "nfo";
const PASS_DELAY: Duration = Duration::from_secs(1);

// episode metadata files embed the season as "2x05" style tokens
static SEASON_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)x").unwrap());

fn extract_season_number(path: &Path) -> Option<u32> {
    SEASON_TOKEN
        .captures(path.to_string_lossy().as_ref())
        .and_then(|captures| captures[1].parse().ok())
        .filter(|season| *season != 0)
}

/// One scan of the tree: every metadata file with a season token that is not
/// already under a `Season` folder gets moved into a sibling `Season {n}`
/// directory. Returns how many files moved.
pub fn organize_pass(root: &Path) -> Result<usize, anyhow::Error> {
    let mut files_to_move: Vec<(PathBuf, PathBuf)> = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|entry| entry.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().map_or(true, |ext| ext != METADATA_EXTENSION) {
            continue;
        }
        // markers are matched below the scan root so the root's own name
        // can never look like a season token
        let rel = path.strip_prefix(root).unwrap_or(path);
        let Some(season) = extract_season_number(rel) else {
            continue;
        };
        if rel.to_string_lossy().contains("Season") {
            continue;
        }
        let Some(parent) = path.parent() else {
            continue;
        };
        let season_dir = parent.join(format!("Season {}", season));
        if !season_dir.exists() {
            fs::create_dir(&season_dir)?;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = season_dir.join(file_name);
        if !target.exists() {
            files_to_move.push((path.to_path_buf(), target));
        }
    }

    let mut moved = 0;
    for (src, dest) in files_to_move {
        if src.exists() {
            fs::rename(&src, &dest)?;
            info!("Moved {} to {}", src.display(), dest.display());
            moved += 1;
        }
    }
    Ok(moved)
}

/// Rescan the tree until the wall-clock budget runs out, pausing a second
/// between passes. Files moved by an earlier pass gain a `Season` path
/// segment, so later passes skip them.
pub async fn organize_metadata_files(root: &Path, budget: Duration) -> Result<(), anyhow::Error> {
    let start = Instant::now();
    while start.elapsed() < budget {
        organize_pass(root)?;
        tokio::time::sleep(PASS_DELAY).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"<episodedetails/>").unwrap();
    }

    #[test]
    fn extracts_season_from_token() {
        assert_eq!(extract_season_number(Path::new("/media/tv/Show/2x05.nfo")), Some(2));
        assert_eq!(extract_season_number(Path::new("/media/tv/Show/12x01.nfo")), Some(12));
        assert_eq!(extract_season_number(Path::new("/media/tv/Show/episode.nfo")), None);
        // a zero season never gets a folder
        assert_eq!(extract_season_number(Path::new("/media/tv/Show/0x01.nfo")), None);
    }

    #[test]
    fn moves_orphaned_metadata_into_season_folder() {
        let root = TempDir::new().unwrap();
        let show = root.path().join("Show");
        fs::create_dir(&show).unwrap();
        touch(&show.join("2x05.nfo"));

        let moved = organize_pass(root.path()).unwrap();

        assert_eq!(moved, 1);
        assert!(show.join("Season 2").join("2x05.nfo").exists());
        assert!(!show.join("2x05.nfo").exists());
    }

    #[test]
    fn already_organized_file_is_left_alone() {
        let root = TempDir::new().unwrap();
        let season = root.path().join("Show").join("Season 2");
        fs::create_dir_all(&season).unwrap();
        touch(&season.join("2x05.nfo"));

        let moved = organize_pass(root.path()).unwrap();

        assert_eq!(moved, 0);
        assert!(season.join("2x05.nfo").exists());
    }

    #[test]
    fn existing_destination_blocks_the_move() {
        let root = TempDir::new().unwrap();
        let show = root.path().join("Show");
        let season = show.join("Season 3");
        fs::create_dir_all(&season).unwrap();
        touch(&show.join("3x01.nfo"));
        fs::write(season.join("3x01.nfo"), b"already here").unwrap();

        let moved = organize_pass(root.path()).unwrap();

        assert_eq!(moved, 0);
        assert!(show.join("3x01.nfo").exists());
        assert_eq!(fs::read(season.join("3x01.nfo")).unwrap(), b"already here");
    }

    #[test]
    fn ignores_files_without_the_metadata_extension() {
        let root = TempDir::new().unwrap();
        let show = root.path().join("Show");
        fs::create_dir(&show).unwrap();
        fs::write(show.join("2x05.mkv"), b"video").unwrap();

        let moved = organize_pass(root.path()).unwrap();

        assert_eq!(moved, 0);
        assert!(show.join("2x05.mkv").exists());
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let root = TempDir::new().unwrap();
        let show = root.path().join("Show");
        fs::create_dir(&show).unwrap();
        touch(&show.join("4x02.nfo"));

        assert_eq!(organize_pass(root.path()).unwrap(), 1);
        assert_eq!(organize_pass(root.path()).unwrap(), 0);
        assert!(show.join("Season 4").join("4x02.nfo").exists());
    }
}
