//! Two machines sharing one sync folder
//!
//! Each machine has its own local root, settings file and snapshot; the
//! only thing they share is the remote directory.

use std::fs;
use std::path::Path;

use pkgsync_core::{SettingsHost, SyncOrchestrator, SyncSettings, SyncStateStore};
use pkgsync_test_utils::{mtime_of, set_mtime};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Machine {
    root: TempDir,
    sync: SyncOrchestrator<SettingsHost>,
}

impl Machine {
    fn new(remote: &Path) -> Self {
        let root = TempDir::new().unwrap();
        SyncSettings {
            sync: true,
            sync_folder: Some(remote.to_path_buf()),
            dirs_to_ignore: vec![".git".into(), "Cache".into()],
            ..SyncSettings::default()
        }
        .save(root.path())
        .unwrap();
        let sync = SyncOrchestrator::new(SettingsHost::new(root.path()));
        Self { root, sync }
    }

    fn write(&self, rel: &str, content: &str, mtime: u64) {
        let path = self.root.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        set_mtime(&path, mtime);
    }

    fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root.path().join(rel)).ok()
    }

    fn remove(&self, rel: &str) {
        fs::remove_file(self.root.path().join(rel)).unwrap();
    }

    fn push(&self) -> usize {
        let report = self.sync.push().unwrap();
        assert!(report.is_success(), "push failed: {:?}", report.failures);
        report.actions.len()
    }

    fn pull(&self) -> usize {
        let report = self.sync.pull(false).unwrap();
        assert!(report.is_success(), "pull failed: {:?}", report.failures);
        report.actions.len()
    }
}

fn remote_has(remote: &Path, rel: &str) -> bool {
    remote.join(rel).is_file()
}

#[test]
fn test_edit_travels_from_one_machine_to_another() {
    let remote = TempDir::new().unwrap();
    let laptop = Machine::new(remote.path());
    let desktop = Machine::new(remote.path());

    laptop.write("Preferences.json", "{\"font_size\": 12}", 1_000);
    laptop.write("snippets/rust.json", "[]", 1_000);
    assert_eq!(laptop.push(), 2);

    assert_eq!(desktop.pull(), 2);
    assert_eq!(desktop.read("Preferences.json").as_deref(), Some("{\"font_size\": 12}"));

    desktop.write("Preferences.json", "{\"font_size\": 14}", 2_000);
    assert_eq!(desktop.push(), 1);

    assert_eq!(laptop.pull(), 1);
    assert_eq!(laptop.read("Preferences.json").as_deref(), Some("{\"font_size\": 14}"));
    assert_eq!(mtime_of(&laptop.root.path().join("Preferences.json")), 2_000);

    // Converged: nobody has anything left to do
    assert_eq!(laptop.push(), 0);
    assert_eq!(desktop.push(), 0);
    assert_eq!(laptop.pull(), 0);
    assert_eq!(desktop.pull(), 0);
}

#[test]
fn test_deletion_on_one_machine_is_not_undone_by_the_other() {
    let remote = TempDir::new().unwrap();
    let laptop = Machine::new(remote.path());
    let desktop = Machine::new(remote.path());

    laptop.write("old-theme.json", "{}", 1_000);
    laptop.push();
    desktop.pull();
    desktop.push();

    laptop.remove("old-theme.json");
    assert_eq!(laptop.push(), 1);
    assert!(!remote_has(remote.path(), "old-theme.json"));

    // Desktop still has the file and its snapshot still lists it, so the
    // remote deletion is respected rather than reverted
    assert_eq!(desktop.push(), 0);
    assert!(!remote_has(remote.path(), "old-theme.json"));

    // Pull never deletes, so the desktop copy stays until removed by hand
    assert_eq!(desktop.pull(), 0);
    assert!(desktop.read("old-theme.json").is_some());
}

#[test]
fn test_ignored_directories_stay_local() {
    let remote = TempDir::new().unwrap();
    let laptop = Machine::new(remote.path());

    laptop.write("Cache/index.json", "{}", 1_000);
    laptop.write(".git/HEAD", "ref", 1_000);
    laptop.write("keymap.json", "[]", 1_000);

    assert_eq!(laptop.push(), 1);
    assert!(remote_has(remote.path(), "keymap.json"));
    assert!(!remote.path().join("Cache").exists());
    assert!(!remote.path().join(".git").exists());
    assert!(!remote_has(remote.path(), "pkgsync.toml"));
}

#[test]
fn test_snapshot_tracks_only_the_pushing_machine() {
    let remote = TempDir::new().unwrap();
    let laptop = Machine::new(remote.path());
    let desktop = Machine::new(remote.path());

    laptop.write("a.json", "{}", 1_000);
    laptop.push();

    assert_eq!(SyncStateStore::new(laptop.root.path()).load().len(), 1);
    assert!(!SyncStateStore::new(desktop.root.path()).path().exists());

    desktop.pull();
    assert!(!SyncStateStore::new(desktop.root.path()).path().exists());
}

#[test]
fn test_corrupt_snapshot_behaves_like_first_push() {
    let remote = TempDir::new().unwrap();
    let laptop = Machine::new(remote.path());

    laptop.write("a.json", "{}", 1_000);
    laptop.write("b.json", "{}", 1_000);
    laptop.push();
    laptop.remove("a.json");

    fs::write(
        SyncStateStore::new(laptop.root.path()).path().to_native(),
        "not json",
    )
    .unwrap();

    // Without a snapshot the deletion cannot be detected, but nothing is lost
    assert_eq!(laptop.push(), 0);
    assert!(remote_has(remote.path(), "a.json"));

    // The push rewrote the snapshot, so the next deletion propagates again
    laptop.remove("b.json");
    assert_eq!(laptop.push(), 1);
    assert!(!remote_has(remote.path(), "b.json"));
}
