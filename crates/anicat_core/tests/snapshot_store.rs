use anicat_core::{AnimeEntry, AnimeStore, CustomList, Genre, ListStore, Repository, WatchStatus};
use std::fs;

fn naruto() -> AnimeEntry {
    AnimeEntry::series("Naruto", 2002, "Pierrot", 220, [Genre::Shonen], false).unwrap()
}

fn spirited_away() -> AnimeEntry {
    let mut entry = AnimeEntry::movie(
        "Spirited Away",
        2001,
        "Ghibli",
        125,
        [Genre::SliceOfLife, Genre::Shojo],
        "Miyazaki",
    )
    .unwrap();
    entry.status = WatchStatus::Finished;
    entry.set_rating(5).unwrap();
    entry
}

#[test]
fn missing_snapshot_loads_as_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));

    assert!(!store.is_loaded());
    assert!(store.find_all().unwrap().is_empty());
    assert!(store.is_loaded());
    assert!(!store.path().exists());
}

#[test]
fn every_field_survives_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("animes.json");

    let mut writer = AnimeStore::new(&path);
    writer.save(naruto()).unwrap();
    writer.save(spirited_away()).unwrap();

    let mut reader = AnimeStore::new(&path);
    let loaded = reader.find_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded[0].same_fields(&naruto()));
    assert!(loaded[1].same_fields(&spirited_away()));
}

#[test]
fn save_replaces_same_key_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));
    store.save(naruto()).unwrap();
    store.save(spirited_away()).unwrap();

    let mut updated = naruto();
    updated.title = "NARUTO".to_string();
    updated.set_rating(4).unwrap();
    store.save(updated).unwrap();

    let all = store.find_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "NARUTO");
    assert_eq!(all[0].rating, 4);
    assert_eq!(all[1].title, "Spirited Away");
}

#[test]
fn keyed_lookups_ignore_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));
    store.save(naruto()).unwrap();

    assert!(store.exists("nArUtO").unwrap());
    assert_eq!(store.find_by_key("naruto").unwrap().unwrap().title, "Naruto");
    assert!(store.find_by_key("Bleach").unwrap().is_none());
    assert!(store.delete_by_key("NARUTO").unwrap());
    assert!(!store.delete_by_key("NARUTO").unwrap());
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn replace_by_key_keeps_position_under_a_new_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));
    store.save(naruto()).unwrap();
    store.save(spirited_away()).unwrap();

    let mut renamed = naruto();
    renamed.title = "Naruto Classic".to_string();
    assert!(store.replace_by_key("naruto", renamed).unwrap());
    assert!(!store.replace_by_key("Bleach", naruto()).unwrap());

    let titles: Vec<String> = store
        .find_all()
        .unwrap()
        .into_iter()
        .map(|entry| entry.title)
        .collect();
    assert_eq!(titles, ["Naruto Classic", "Spirited Away"]);
}

#[test]
fn non_array_snapshot_is_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    fs::write(&path, r#"{"title": "Naruto"}"#).unwrap();

    let err = AnimeStore::new(&path).find_all().unwrap_err();
    assert_eq!(err.message(), "invalid format");
}

#[test]
fn corrupt_snapshot_keeps_the_parse_cause() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    fs::write(&path, "[{\"title\": ").unwrap();

    let mut store = AnimeStore::new(&path);
    let err = store.count().unwrap_err();
    assert!(err.has_cause());
    assert!(std::error::Error::source(&err).is_some());
    assert!(!store.is_loaded());
}

#[test]
fn persisted_records_are_validated_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    let mut broken = serde_json::to_value(vec![naruto()]).unwrap();
    broken[0]["release_year"] = serde_json::json!(1800);
    fs::write(&path, serde_json::to_vec(&broken).unwrap()).unwrap();

    let err = AnimeStore::new(&path).find_all().unwrap_err();
    assert!(err.to_string().contains("release year"));
}

#[test]
fn snapshot_uses_an_internally_tagged_variant() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    let mut store = AnimeStore::new(&path);
    store.save(spirited_away()).unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let record = &raw.as_array().unwrap()[0];
    assert_eq!(record["type"], "movie");
    assert_eq!(record["director"], "Miyazaki");
    assert_eq!(record["duration_minutes"], 125);
    assert_eq!(record["status"], "finished");
}

#[test]
fn invalidate_rereads_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    let mut first = AnimeStore::new(&path);
    let mut second = AnimeStore::new(&path);

    assert_eq!(second.count().unwrap(), 0);
    first.save(naruto()).unwrap();
    assert_eq!(second.count().unwrap(), 0);

    second.invalidate();
    assert!(!second.is_loaded());
    assert_eq!(second.count().unwrap(), 1);
}

#[test]
fn persist_leaves_only_the_snapshot_behind() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AnimeStore::new(dir.path().join("animes.json"));
    store.save(naruto()).unwrap();
    store.save(spirited_away()).unwrap();
    store.delete_by_key("Naruto").unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["animes.json"]);
}

#[test]
fn delete_all_writes_an_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lists.json");
    let mut store = ListStore::new(&path);
    store.save(CustomList::new("Favorites", "best ones").unwrap()).unwrap();
    store.delete_all().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    assert_eq!(ListStore::new(&path).count().unwrap(), 0);
}

#[test]
fn save_all_replaces_without_loading_first() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("animes.json");
    fs::write(&path, "not json").unwrap();

    let mut store = AnimeStore::new(&path);
    store.save_all(vec![naruto()]).unwrap();

    assert_eq!(AnimeStore::new(&path).count().unwrap(), 1);
}

#[test]
fn failed_write_does_not_serve_unsaved_changes() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let mut store = AnimeStore::new(data_dir.join("animes.json"));
    store.save(naruto()).unwrap();

    // A plain file where the data directory used to be makes the rewrite fail.
    fs::remove_dir_all(&data_dir).unwrap();
    fs::write(&data_dir, b"not a directory").unwrap();
    assert!(store.save(spirited_away()).is_err());
    assert!(!store.is_loaded());

    fs::remove_file(&data_dir).unwrap();
    assert!(store.find_by_key("Spirited Away").unwrap().is_none());
    assert_eq!(store.count().unwrap(), 0);
}
