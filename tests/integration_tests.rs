use clap::Parser;
use folderlib::cli::{Cli, run};
use folderlib::{CategoryKind, FolderError};
/// Integration tests for folderlib
///
/// These tests drive the command line end to end against temporary folders
/// and a temporary category cache.
///
/// Test categories:
/// 1. Populator workflows
/// 2. Cleaner workflows
/// 3. Category cache behaviour across runs
/// 4. Error scenarios
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture with a work folder and a private category cache.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("work")).expect("Failed to create work directory");
        TestFixture { temp_dir }
    }

    /// The folder being populated or cleaned.
    fn path(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    fn cache_dir(&self) -> PathBuf {
        self.temp_dir.path().join("cache")
    }

    /// Runs the CLI with `--cache-dir` pointing at the fixture cache.
    fn run(&self, args: &[&str]) -> Result<(), FolderError> {
        let cache_dir = self.cache_dir();
        let mut argv = vec![
            "folderlib".to_string(),
            "--cache-dir".to_string(),
            cache_dir.to_string_lossy().to_string(),
        ];
        argv.extend(args.iter().map(|arg| arg.to_string()));
        let cli = Cli::try_parse_from(argv).expect("Failed to parse arguments");
        run(cli)
    }

    fn folder_arg(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    fn create_file(&self, name: &str) {
        fs::write(self.path().join(name), name).expect("Failed to create file");
    }

    /// Writes a JSON document next to the work folder and returns its path.
    fn write_json(&self, name: &str, content: &str) -> String {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write JSON file");
        path.to_string_lossy().to_string()
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Names of the regular files directly inside `dir`.
    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn generated_name_pattern() -> Regex {
    Regex::new(r"^(?P<category>[a-z]+)_[0-9a-f]{16}_(?P<index>\d+)\.(?P<ext>[A-Za-z0-9]+)$")
        .expect("valid regex")
}

// ============================================================================
// Test Suite 1: Populator
// ============================================================================

#[test]
fn test_populate_two_categories() {
    let fixture = TestFixture::new();
    let target = fixture.path().join("generated");
    let target_arg = target.to_string_lossy().to_string();

    let result = fixture.run(&[
        "populator",
        "--folder",
        &target_arg,
        "--amount",
        "10",
        "--filters",
        "[audio, video]",
    ]);
    assert!(result.is_ok(), "populate failed: {:?}", result);

    let names = TestFixture::file_names(&target);
    assert_eq!(names.len(), 20);

    let supported = CategoryKind::Supported.defaults();
    let pattern = generated_name_pattern();
    let mut per_category = std::collections::BTreeMap::new();
    for name in &names {
        let caps = pattern
            .captures(name)
            .unwrap_or_else(|| panic!("unexpected file name {name}"));
        let category = caps["category"].to_string();
        let ext = caps["ext"].to_string();
        assert!(supported.get(&category).unwrap().contains(&ext));
        assert!(caps["index"].parse::<usize>().unwrap() < 10);
        *per_category.entry(category).or_insert(0) += 1;
    }
    assert_eq!(per_category.get("audio"), Some(&10));
    assert_eq!(per_category.get("video"), Some(&10));
}

#[test]
fn test_populate_all_categories_by_default() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    fixture
        .run(&["populator", "-f", &folder, "-a", "2"])
        .expect("populate failed");

    let expected = CategoryKind::Supported.defaults().len() * 2;
    assert_eq!(TestFixture::file_names(&fixture.path()).len(), expected);
}

#[test]
fn test_populate_random_picks_one_category() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    fixture
        .run(&["populator", "-f", &folder, "-a", "3", "--filters", "random"])
        .expect("populate failed");

    let names = TestFixture::file_names(&fixture.path());
    assert_eq!(names.len(), 3);
    let prefixes: std::collections::BTreeSet<_> =
        names.iter().map(|n| n.split('_').next().unwrap().to_string()).collect();
    assert_eq!(prefixes.len(), 1);
}

#[test]
fn test_populate_unknown_filter_names_produce_nothing() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    fixture
        .run(&["populator", "-f", &folder, "--filters", "[nothing, here]"])
        .expect("unknown category names are not an error");

    assert!(TestFixture::file_names(&fixture.path()).is_empty());
}

#[test]
fn test_populate_with_custom_supported_file() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();
    let json = fixture.write_json("supported.json", r#"{"fonts": ["ttf", "otf"]}"#);

    fixture
        .run(&[
            "populator", "-f", &folder, "-a", "4", "-s", &json, "--filters", "[fonts]",
        ])
        .expect("populate failed");

    let names = TestFixture::file_names(&fixture.path());
    assert_eq!(names.len(), 4);
    assert!(names.iter().all(|n| n.starts_with("fonts_")));
    assert!(fixture.cache_dir().join(".fw_supported").is_file());
}

#[test]
fn test_populate_bogus_keyword_fails() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    let err = fixture
        .run(&["populator", "-f", &folder, "--filters", "bogus"])
        .unwrap_err();
    assert!(matches!(err, FolderError::InvalidFilterKeyword { .. }));
}

// ============================================================================
// Test Suite 2: Cleaner
// ============================================================================

#[test]
fn test_clean_sorts_supported_files() {
    let fixture = TestFixture::new();
    for name in ["song.mp3", "clip.mp4", "photo.png", "notes.txt"] {
        fixture.create_file(name);
    }
    let folder = fixture.folder_arg();

    fixture.run(&["cleaner", "-f", &folder]).expect("clean failed");

    fixture.assert_file_exists("clean-folder/audio/song.mp3");
    fixture.assert_file_exists("clean-folder/video/clip.mp4");
    fixture.assert_file_exists("clean-folder/image/photo.png");
    fixture.assert_file_exists("clean-folder/text/notes.txt");
    fixture.assert_file_not_exists("song.mp3");
    assert!(TestFixture::file_names(&fixture.path()).is_empty());
}

#[test]
fn test_clean_leaves_excluded_files() {
    let fixture = TestFixture::new();
    for name in ["setup.exe", "lib.dll", "shortcut.lnk", "track.wav"] {
        fixture.create_file(name);
    }
    let folder = fixture.folder_arg();

    fixture
        .run(&["cleaner", "-f", &folder, "--group-unknowns", "yes"])
        .expect("clean failed");

    fixture.assert_file_exists("setup.exe");
    fixture.assert_file_exists("lib.dll");
    fixture.assert_file_exists("shortcut.lnk");
    fixture.assert_file_exists("clean-folder/audio/track.wav");
    assert!(!fixture.path().join("clean-folder/binaries").exists());
    assert!(!fixture.path().join("clean-folder/symlinks").exists());
}

#[test]
fn test_clean_unknowns_stay_without_grouping() {
    let fixture = TestFixture::new();
    for name in ["a.zzz", "b.qqq", "README"] {
        fixture.create_file(name);
    }
    let folder = fixture.folder_arg();

    fixture.run(&["cleaner", "-f", &folder]).expect("clean failed");

    assert_eq!(TestFixture::file_names(&fixture.path()).len(), 3);
    assert!(fixture.path().join("clean-folder").is_dir());
    assert!(!fixture.path().join("clean-folder/unknowns").exists());
}

#[test]
fn test_clean_groups_unknowns() {
    let fixture = TestFixture::new();
    for name in ["a.zzz", "README", "song.mp3"] {
        fixture.create_file(name);
    }
    let folder = fixture.folder_arg();

    fixture
        .run(&["cleaner", "-f", &folder, "--group-unknowns", "true"])
        .expect("clean failed");

    fixture.assert_file_exists("clean-folder/unknowns/a.zzz");
    fixture.assert_file_exists("clean-folder/unknowns/README");
    fixture.assert_file_exists("clean-folder/audio/song.mp3");
}

#[test]
fn test_clean_to_absolute_save_folder() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.jpg");
    let folder = fixture.folder_arg();
    let save = fixture.temp_dir.path().join("sorted");
    let save_arg = save.to_string_lossy().to_string();

    fixture
        .run(&["cleaner", "-f", &folder, "--save", &save_arg])
        .expect("clean failed");

    assert!(save.join("image").join("photo.jpg").is_file());
    assert!(!fixture.path().join("clean-folder").exists());
}

#[test]
fn test_clean_does_not_overwrite_existing_destination() {
    let fixture = TestFixture::new();
    fixture.create_file("song.mp3");
    fs::create_dir_all(fixture.path().join("clean-folder/audio")).unwrap();
    fs::write(fixture.path().join("clean-folder/audio/song.mp3"), "original").unwrap();
    let folder = fixture.folder_arg();

    fixture.run(&["cleaner", "-f", &folder]).expect("clean failed");

    fixture.assert_file_exists("song.mp3");
    assert_eq!(
        fs::read_to_string(fixture.path().join("clean-folder/audio/song.mp3")).unwrap(),
        "original"
    );
}

#[test]
fn test_populate_then_clean() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    fixture
        .run(&["populator", "-f", &folder, "-a", "5"])
        .expect("populate failed");
    fixture.run(&["cleaner", "-f", &folder]).expect("clean failed");

    assert!(TestFixture::file_names(&fixture.path()).is_empty());
    for category in CategoryKind::Supported.defaults().names() {
        let dir = fixture.path().join("clean-folder").join(category);
        assert_eq!(TestFixture::file_names(&dir).len(), 5, "category {category}");
    }
}

// ============================================================================
// Test Suite 3: Category cache
// ============================================================================

#[test]
fn test_pool_override_is_remembered() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();
    let json = fixture.write_json("pool.json", r#"{"notes": ["nfo"]}"#);

    fixture.create_file("first.nfo");
    fixture
        .run(&["cleaner", "-f", &folder, "-p", &json])
        .expect("clean failed");
    fixture.assert_file_exists("clean-folder/notes/first.nfo");

    // Second run without --pool still knows the "notes" category
    fixture.create_file("second.nfo");
    fixture.run(&["cleaner", "-f", &folder]).expect("clean failed");
    fixture.assert_file_exists("clean-folder/notes/second.nfo");
}

#[test]
fn test_pool_overrides_merge_across_runs() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();
    let first = fixture.write_json("first.json", r#"{"notes": ["nfo"]}"#);
    let second = fixture.write_json("second.json", r#"{"notes": ["diz", "nfo"], "fonts": ["ttf"]}"#);

    fixture.create_file("a.nfo");
    fixture.run(&["cleaner", "-f", &folder, "-p", &first]).unwrap();
    fixture.create_file("b.diz");
    fixture.create_file("c.ttf");
    fixture.run(&["cleaner", "-f", &folder, "-p", &second]).unwrap();

    fixture.assert_file_exists("clean-folder/notes/b.diz");
    fixture.assert_file_exists("clean-folder/fonts/c.ttf");

    let cached = fs::read_to_string(fixture.cache_dir().join(".fw_supported")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&cached).unwrap();
    assert_eq!(value["notes"], serde_json::json!(["nfo", "diz"]));
    assert_eq!(value["fonts"], serde_json::json!(["ttf"]));
}

#[test]
fn test_excluded_override() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();
    let json = fixture.write_json("excluded.json", r#"{"keep": ["mp3"]}"#);
    fixture.create_file("song.mp3");

    fixture
        .run(&["cleaner", "-f", &folder, "-e", &json])
        .expect("clean failed");

    fixture.assert_file_exists("song.mp3");
    assert!(fixture.cache_dir().join(".fw_excluded").is_file());
}

// ============================================================================
// Test Suite 4: Error scenarios
// ============================================================================

#[test]
fn test_clean_empty_directory_fails() {
    let fixture = TestFixture::new();
    let folder = fixture.folder_arg();

    let err = fixture.run(&["cleaner", "-f", &folder]).unwrap_err();

    assert!(matches!(err, FolderError::EmptyDirectory { .. }));
    // The destination is created before scanning
    assert!(fixture.path().join("clean-folder").is_dir());
}

#[test]
fn test_missing_pool_file_fails() {
    let fixture = TestFixture::new();
    fixture.create_file("song.mp3");
    let folder = fixture.folder_arg();
    let missing = fixture.temp_dir.path().join("missing.json");
    let missing_arg = missing.to_string_lossy().to_string();

    let err = fixture
        .run(&["cleaner", "-f", &folder, "-p", &missing_arg])
        .unwrap_err();

    assert!(matches!(err, FolderError::MissingJsonFile { .. }));
    fixture.assert_file_exists("song.mp3");
}

#[test]
fn test_invalid_pool_file_fails() {
    let fixture = TestFixture::new();
    fixture.create_file("song.mp3");
    let folder = fixture.folder_arg();
    let json = fixture.write_json("broken.json", "{ not json");

    let err = fixture
        .run(&["cleaner", "-f", &folder, "-p", &json])
        .unwrap_err();

    assert!(matches!(err, FolderError::InvalidJsonFile { .. }));
}

#[test]
fn test_pool_file_with_wrong_shape_fails() {
    let fixture = TestFixture::new();
    fixture.create_file("song.mp3");
    let folder = fixture.folder_arg();
    let json = fixture.write_json("list.json", r#"["mp3", "wav"]"#);

    let err = fixture
        .run(&["cleaner", "-f", &folder, "-p", &json])
        .unwrap_err();

    assert!(matches!(err, FolderError::InvalidPoolType { .. }));
}
