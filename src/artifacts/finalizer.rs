use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Container extension searched for when none is given.
pub const DEFAULT_EXTENSION: &str = "mp4";

/// Finds the video an episode recording produced and renames it to include the episode score.
///
/// # Discovery heuristic
/// The recorder does not report which file it wrote, so the artifact is identified as the most
/// recently modified regular file directly inside the folder whose name both contains a given
/// substring and ends in the container extension. Ties on modification time go to the
/// lexicographically smallest name.
///
/// This is best-effort. It assumes a single writer per folder and name filter: if another
/// recording with a matching name is written concurrently the wrong file may be selected.
/// Concurrent episodes must use distinct folders or distinct name filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactFinalizer {
    extension: String,
}

impl Default for ArtifactFinalizer {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION)
    }
}

impl ArtifactFinalizer {
    /// Create a finalizer searching for files with the given extension (with or without a dot).
    pub fn new<S: Into<String>>(extension: S) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        Self { extension }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The most recently modified artifact in `folder` whose name contains `name_contains`.
    pub fn discover(&self, folder: &Path, name_contains: &str) -> io::Result<Option<PathBuf>> {
        Ok(self
            .find_latest(folder, name_contains)?
            .map(|candidate| candidate.path))
    }

    /// Rename the latest matching artifact in `folder` to embed `total_reward` as a score.
    ///
    /// The new name inserts `_score_<score>` before the extension, where the score is
    /// `total_reward` truncated toward zero. Never overwrites an existing file.
    ///
    /// Failures are reported in the returned [`Finalized`] rather than raised.
    pub fn finalize(&self, folder: &Path, name_contains: &str, total_reward: f64) -> Finalized {
        let candidate = match self.find_latest(folder, name_contains) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => {
                warn!(
                    folder = %folder.display(),
                    name_contains,
                    extension = %self.extension,
                    "no recorded video found"
                );
                return Finalized::NotFound {
                    folder: folder.to_path_buf(),
                };
            }
            Err(error) => {
                warn!(folder = %folder.display(), %error, "failed to search for recorded video");
                return Finalized::Failed {
                    path: folder.to_path_buf(),
                    error: FinalizeError::Io(error),
                };
            }
        };

        let target = folder.join(scored_file_name(&candidate.name, total_reward));
        match rename_no_clobber(&candidate.path, &target) {
            Ok(()) => {
                info!(
                    from = %candidate.path.display(),
                    to = %target.display(),
                    "renamed recorded video"
                );
                Finalized::Renamed {
                    from: candidate.path,
                    to: target,
                }
            }
            Err(error) => {
                warn!(path = %candidate.path.display(), %error, "failed to rename recorded video");
                Finalized::Failed {
                    path: candidate.path,
                    error,
                }
            }
        }
    }

    fn find_latest(&self, folder: &Path, name_contains: &str) -> io::Result<Option<Candidate>> {
        let suffix = format!(".{}", self.extension);
        let mut latest: Option<Candidate> = None;
        for entry in fs::read_dir(folder)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!(%error, "skipping unreadable directory entry");
                    continue;
                }
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if !(name.ends_with(&suffix) && name.contains(name_contains)) {
                continue;
            }
            let path = entry.path();
            let modified = match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => match metadata.modified() {
                    Ok(modified) => modified,
                    Err(_) => continue,
                },
                _ => continue,
            };

            let candidate = Candidate {
                path,
                name,
                modified,
            };
            if latest.as_ref().map_or(true, |best| candidate.is_newer_than(best)) {
                latest = Some(candidate);
            }
        }
        Ok(latest)
    }
}

#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    name: String,
    modified: SystemTime,
}

impl Candidate {
    fn is_newer_than(&self, other: &Self) -> bool {
        self.modified > other.modified || (self.modified == other.modified && self.name < other.name)
    }
}

fn rename_no_clobber(from: &Path, to: &Path) -> Result<(), FinalizeError> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(FinalizeError::RenameCollision(to.to_path_buf()));
    }
    fs::rename(from, to)?;
    Ok(())
}

/// Total reward truncated toward zero.
///
/// NaN maps to 0 and out-of-range values saturate.
#[allow(clippy::cast_possible_truncation)]
pub fn score(total_reward: f64) -> i64 {
    total_reward as i64
}

/// Insert `_score_<score>` before the extension of `file_name`.
///
/// ```
/// use rerecord::artifacts::scored_file_name;
/// assert_eq!(
///     scored_file_name("galaxian_episode-0.mp4", 530.0),
///     "galaxian_episode-0_score_530.mp4"
/// );
/// ```
pub fn scored_file_name(file_name: &str, total_reward: f64) -> String {
    let score = score(total_reward);
    match file_name.rfind('.') {
        Some(i) if i > 0 => format!("{}_score_{}{}", &file_name[..i], score, &file_name[i..]),
        _ => format!("{}_score_{}", file_name, score),
    }
}

/// Outcome of [`ArtifactFinalizer::finalize`].
#[derive(Debug)]
pub enum Finalized {
    /// The artifact was renamed.
    Renamed { from: PathBuf, to: PathBuf },
    /// No matching artifact exists. Nothing was changed.
    NotFound { folder: PathBuf },
    /// An artifact could not be located or renamed.
    ///
    /// `path` is the artifact if one was selected, otherwise the folder.
    Failed { path: PathBuf, error: FinalizeError },
}

impl Finalized {
    /// The final artifact path, or the unchanged folder if no artifact was found.
    pub fn path(&self) -> &Path {
        match self {
            Self::Renamed { to, .. } => to,
            Self::NotFound { folder } => folder,
            Self::Failed { path, .. } => path,
        }
    }

    pub const fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed { .. })
    }

    pub const fn error(&self) -> Option<&FinalizeError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Finalized {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Renamed { to, .. } => write!(f, "video renamed to {}", to.display()),
            Self::NotFound { folder } => {
                write!(f, "no recorded video found in {}", folder.display())
            }
            Self::Failed { path, error } => {
                write!(f, "could not finalize {}: {}", path.display(), error)
            }
        }
    }
}

/// Error locating or renaming an artifact.
#[derive(Error, Debug)]
pub enum FinalizeError {
    #[error("rename target {} already exists", .0.display())]
    RenameCollision(PathBuf),
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::Write;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    /// Create a file with the given contents and modification time (seconds past a base time).
    fn touch(dir: &Path, name: &str, age: u64) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(name.as_bytes()).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(1_600_000_000 + age))
            .unwrap();
        path
    }

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[fixture]
    fn folder() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn renames_example(folder: TempDir) {
        let original = touch(folder.path(), "galaxian_episode-0.mp4", 0);
        let finalized =
            ArtifactFinalizer::default().finalize(folder.path(), "galaxian_episode", 530.0);

        let expected = folder.path().join("galaxian_episode-0_score_530.mp4");
        assert!(finalized.is_renamed());
        assert_eq!(finalized.path(), expected);
        assert!(!original.exists());
        assert_eq!(fs::read(&expected).unwrap(), b"galaxian_episode-0.mp4");
    }

    #[rstest]
    fn picks_latest_matching(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "run_episode-0.mp4", 10);
        touch(dir, "run_episode-1.mp4", 20);
        touch(dir, "other_episode-2.mp4", 30);
        touch(dir, "run_episode-3.avi", 40);
        touch(dir, "run_episode-4.mp4.part", 50);

        let finalizer = ArtifactFinalizer::default();
        assert_eq!(
            finalizer.discover(dir, "run_episode").unwrap(),
            Some(dir.join("run_episode-1.mp4"))
        );
        let finalized = finalizer.finalize(dir, "run_episode", 3.0);
        assert_eq!(finalized.path(), dir.join("run_episode-1_score_3.mp4"));
        assert_eq!(
            names(dir),
            vec![
                "other_episode-2.mp4",
                "run_episode-0.mp4",
                "run_episode-1_score_3.mp4",
                "run_episode-3.avi",
                "run_episode-4.mp4.part",
            ]
        );
    }

    #[rstest]
    fn tie_goes_to_smallest_name(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "ep-b.mp4", 5);
        touch(dir, "ep-a.mp4", 5);
        touch(dir, "ep-c.mp4", 5);
        assert_eq!(
            ArtifactFinalizer::default().discover(dir, "ep-").unwrap(),
            Some(dir.join("ep-a.mp4"))
        );
    }

    #[rstest]
    fn not_found_leaves_folder(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "other_episode-0.mp4", 0);
        touch(dir, "galaxian_episode-0.avi", 0);

        let finalized = ArtifactFinalizer::default().finalize(dir, "galaxian_episode", 12.0);
        assert!(matches!(finalized, Finalized::NotFound { .. }));
        assert_eq!(finalized.path(), dir);
        assert!(finalized.error().is_none());
        assert_eq!(
            names(dir),
            vec!["galaxian_episode-0.avi", "other_episode-0.mp4"]
        );
    }

    #[rstest]
    fn empty_folder_not_found(folder: TempDir) {
        let finalized = ArtifactFinalizer::default().finalize(folder.path(), "x", 0.0);
        assert!(matches!(finalized, Finalized::NotFound { .. }));
        assert_eq!(finalized.path(), folder.path());
    }

    #[rstest]
    fn ignores_directories(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "ep-0.mp4", 0);
        fs::create_dir(dir.join("ep-1.mp4")).unwrap();
        assert_eq!(
            ArtifactFinalizer::default().discover(dir, "ep-").unwrap(),
            Some(dir.join("ep-0.mp4"))
        );
    }

    #[rstest]
    fn collision_does_not_overwrite(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "ep-1_score_7.mp4", 0);
        let original = touch(dir, "ep-1.mp4", 10);

        let finalized = ArtifactFinalizer::default().finalize(dir, "ep-1.", 7.9);
        assert!(matches!(
            finalized.error(),
            Some(FinalizeError::RenameCollision(path)) if path == &dir.join("ep-1_score_7.mp4")
        ));
        assert_eq!(finalized.path(), original);
        assert_eq!(fs::read(&original).unwrap(), b"ep-1.mp4");
        assert_eq!(
            fs::read(dir.join("ep-1_score_7.mp4")).unwrap(),
            b"ep-1_score_7.mp4"
        );
    }

    #[rstest]
    fn distinct_prefixes_do_not_mix(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "alpha-episode-0.mp4", 0);
        touch(dir, "beta-episode-0.mp4", 100);

        let alpha = ArtifactFinalizer::default().finalize(dir, "alpha", 1.0);
        let beta = ArtifactFinalizer::default().finalize(dir, "beta", -4.0);
        assert_eq!(alpha.path(), dir.join("alpha-episode-0_score_1.mp4"));
        assert_eq!(beta.path(), dir.join("beta-episode-0_score_-4.mp4"));
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let finalized = ArtifactFinalizer::default().finalize(&missing, "x", 1.0);
        assert!(matches!(finalized.error(), Some(FinalizeError::Io(_))));
        assert_eq!(finalized.path(), missing);
    }

    #[rstest]
    fn custom_extension(folder: TempDir) {
        let dir = folder.path();
        touch(dir, "catch-episode-0.y4m", 0);
        touch(dir, "catch-episode-1.mp4", 10);
        let finalizer = ArtifactFinalizer::new(".y4m");
        assert_eq!(finalizer.extension(), "y4m");
        let finalized = finalizer.finalize(dir, "catch", 2.0);
        assert_eq!(finalized.path(), dir.join("catch-episode-0_score_2.y4m"));
    }

    #[rstest]
    #[case("galaxian_episode-0.mp4", 530.0, "galaxian_episode-0_score_530.mp4")]
    #[case("galaxian_episode-0.mp4", 529.9, "galaxian_episode-0_score_529.mp4")]
    #[case("galaxian_episode-0.mp4", -2.5, "galaxian_episode-0_score_-2.mp4")]
    #[case("galaxian_episode-0.mp4", -0.5, "galaxian_episode-0_score_0.mp4")]
    #[case("a.b.mp4", 1.0, "a.b_score_1.mp4")]
    #[case("noext", 4.0, "noext_score_4")]
    #[case(".mp4", 4.0, ".mp4_score_4")]
    fn scored_names(#[case] name: &str, #[case] reward: f64, #[case] expected: &str) {
        assert_eq!(scored_file_name(name, reward), expected);
    }

    #[test]
    fn non_finite_scores() {
        assert_eq!(score(f64::NAN), 0);
        assert_eq!(score(f64::INFINITY), i64::MAX);
        assert_eq!(score(f64::NEG_INFINITY), i64::MIN);
    }

    #[test]
    fn display() {
        let finalized = Finalized::NotFound {
            folder: PathBuf::from("videos"),
        };
        assert_eq!(finalized.to_string(), "no recorded video found in videos");
    }
}
