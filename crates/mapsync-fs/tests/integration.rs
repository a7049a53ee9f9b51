use std::fs;
use std::path::Path;

use mapsync_fs::{
    backup_slots, displace, find_matching_backup_and_swap, next_backup_slot, replace_with_buffer,
};
use mapsync_verify::Digest;
use tempfile::tempdir;

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_next_backup_slot_sequence() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.map");

    assert_eq!(next_backup_slot(&path).await.unwrap(), dir.path().join("a.map.bak"));

    fs::write(dir.path().join("a.map.bak"), b"0").unwrap();
    assert_eq!(next_backup_slot(&path).await.unwrap(), dir.path().join("a.map.bak1"));

    fs::write(dir.path().join("a.map.bak1"), b"1").unwrap();
    fs::write(dir.path().join("a.map.bak2"), b"2").unwrap();
    assert_eq!(next_backup_slot(&path).await.unwrap(), dir.path().join("a.map.bak3"));

    // probing creates nothing
    assert_eq!(names_in(dir.path()), vec!["a.map.bak", "a.map.bak1", "a.map.bak2"]);
}

#[tokio::test]
async fn test_displace_preserves_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.map");
    fs::write(&path, b"first").unwrap();

    let slot = displace(&path).await.unwrap();
    assert_eq!(slot, dir.path().join("a.map.bak"));

    fs::write(&path, b"second").unwrap();
    let slot = displace(&path).await.unwrap();
    assert_eq!(slot, dir.path().join("a.map.bak1"));

    assert!(!path.exists());
    assert_eq!(fs::read(dir.path().join("a.map.bak")).unwrap(), b"first");
    assert_eq!(fs::read(dir.path().join("a.map.bak1")).unwrap(), b"second");
}

#[tokio::test]
async fn test_backup_slots_ignores_unrelated_names() {
    let dir = tempdir().unwrap();
    for name in ["a.map.bak10", "a.map.bak", "a.map.bak2", "a.map.bak.ren", "a.map.old", "b.map.bak"] {
        fs::write(dir.path().join(name), name).unwrap();
    }
    fs::create_dir(dir.path().join("a.map.bak3")).unwrap();

    let slots = backup_slots(&dir.path().join("a.map")).await.unwrap();
    let slots: Vec<_> = slots.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
    assert_eq!(slots, vec!["a.map.bak", "a.map.bak2", "a.map.bak10"]);
}

#[tokio::test]
async fn test_swap_exchanges_live_and_backup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.map");
    fs::write(&path, b"modified").unwrap();
    fs::write(dir.path().join("a.map.bak"), b"unrelated").unwrap();
    fs::write(dir.path().join("a.map.bak1"), b"original").unwrap();

    let expected = Digest::of(b"original");
    assert!(find_matching_backup_and_swap(&path, &expected).await.unwrap());

    assert_eq!(fs::read(&path).unwrap(), b"original");
    assert_eq!(fs::read(dir.path().join("a.map.bak1")).unwrap(), b"modified");
    assert_eq!(fs::read(dir.path().join("a.map.bak")).unwrap(), b"unrelated");
    assert_eq!(names_in(dir.path()), vec!["a.map", "a.map.bak", "a.map.bak1"]);

    // swapping back restores the previous arrangement
    assert!(find_matching_backup_and_swap(&path, &Digest::of(b"modified")).await.unwrap());
    assert_eq!(fs::read(&path).unwrap(), b"modified");
    assert_eq!(fs::read(dir.path().join("a.map.bak1")).unwrap(), b"original");
}

#[tokio::test]
async fn test_swap_without_match_touches_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.map");
    fs::write(&path, b"live").unwrap();
    fs::write(dir.path().join("a.map.bak"), b"stale").unwrap();

    assert!(!find_matching_backup_and_swap(&path, &Digest::of(b"wanted")).await.unwrap());
    assert_eq!(fs::read(&path).unwrap(), b"live");
    assert_eq!(fs::read(dir.path().join("a.map.bak")).unwrap(), b"stale");
}

#[tokio::test]
async fn test_swap_into_absent_live_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine_x86.dll");
    fs::write(dir.path().join("engine_x86.dll.bak"), b"vendor").unwrap();

    assert!(find_matching_backup_and_swap(&path, &Digest::of(b"vendor")).await.unwrap());
    assert_eq!(fs::read(&path).unwrap(), b"vendor");
    assert_eq!(names_in(dir.path()), vec!["engine_x86.dll"]);
}

#[tokio::test]
async fn test_swap_keeps_leftover_parked_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.map");
    fs::write(&path, b"live").unwrap();
    fs::write(dir.path().join("a.map.bak"), b"wanted").unwrap();
    fs::write(dir.path().join("a.map.bak.ren"), b"leftover").unwrap();

    assert!(find_matching_backup_and_swap(&path, &Digest::of(b"wanted")).await.unwrap());
    assert_eq!(fs::read(&path).unwrap(), b"wanted");
    assert_eq!(fs::read(dir.path().join("a.map.bak")).unwrap(), b"live");
    assert_eq!(fs::read(dir.path().join("a.map.bak.ren")).unwrap(), b"leftover");
    assert_eq!(names_in(dir.path()), vec!["a.map", "a.map.bak", "a.map.bak.ren"]);
}

#[tokio::test]
async fn test_replace_with_buffer_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("serverlist.toml");

    replace_with_buffer(&path, b"servers = []\n").await.unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"servers = []\n");
}
