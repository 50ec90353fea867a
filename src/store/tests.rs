use std::fs;

use tempfile::TempDir;

use crate::{
    book::BookStatus,
    store::{LibraryError, LibraryStore, SearchQuery},
};

/// Helper function to set up a store against a fresh location inside a
/// private temporary directory
#[allow(clippy::unwrap_used)]
fn temp_store() -> (LibraryStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = LibraryStore::new(dir.path().join("library.json"));
    (store, dir)
}

#[test]
#[allow(clippy::unwrap_used)]
fn load_missing_file_returns_empty() {
    let (store, _dir) = temp_store();
    assert!(store.load().unwrap().is_empty());
}

#[test]
#[allow(clippy::unwrap_used)]
fn add_assigns_monotonic_ids() {
    let (store, _dir) = temp_store();

    let first = store.add("Book One", "Author One", 2022).unwrap();
    let second = store.add("Book Two", "Author One", 2023).unwrap();
    let third = store.add("Book Three", "Author Two", 2024).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(third.id, 3);
}

#[test]
#[allow(clippy::unwrap_used)]
fn add_then_list_round_trip() {
    let (store, _dir) = temp_store();

    store.add("T", "A", 2024).unwrap();
    let books = store.list().unwrap();

    assert_eq!(books.len(), 1);
    let book = books.first().unwrap();
    assert_eq!(book.title, "T");
    assert_eq!(book.author, "A");
    assert_eq!(book.year, 2024);
    assert_eq!(book.status, BookStatus::Available);

    store.add("U", "B", 2025).unwrap();
    let books = store.list().unwrap();
    assert_eq!(books.len(), 2);
    // New records go last; stored order is preserved.
    assert_eq!(books.first().unwrap().title, "T");
    assert_eq!(books.last().unwrap().title, "U");
}

#[test]
#[allow(clippy::unwrap_used)]
fn removal_leaves_an_id_gap() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();
    store.add("Book Three", "Author Two", 2024).unwrap();

    assert!(store.remove(2).unwrap());

    let added = store.add("Book Four", "Author Two", 2025).unwrap();
    assert_eq!(added.id, 4);

    let ids: Vec<u64> = store.list().unwrap().iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
#[allow(clippy::unwrap_used)]
fn remove_missing_id_is_a_noop() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();
    let before = store.list().unwrap();

    assert!(!store.remove(99).unwrap());
    assert_eq!(store.list().unwrap(), before);
}

#[test]
#[allow(clippy::unwrap_used)]
fn search_filters_are_conjunctive() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();

    let by_author = store
        .search(&SearchQuery { author: Some("Author One".to_string()), ..SearchQuery::default() })
        .unwrap();
    assert_eq!(by_author.len(), 2);

    let by_title = store
        .search(&SearchQuery { title: Some("Book One".to_string()), ..SearchQuery::default() })
        .unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title.first().unwrap().title, "Book One");

    let combined = store
        .search(&SearchQuery {
            title: Some("Book".to_string()),
            year: Some(2023),
            ..SearchQuery::default()
        })
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined.first().unwrap().title, "Book Two");
}

#[test]
#[allow(clippy::unwrap_used)]
fn search_matches_case_insensitive_substrings() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();

    let by_fragment = store
        .search(&SearchQuery { title: Some("book o".to_string()), ..SearchQuery::default() })
        .unwrap();
    assert_eq!(by_fragment.len(), 1);

    let shouting = store
        .search(&SearchQuery { author: Some("AUTHOR".to_string()), ..SearchQuery::default() })
        .unwrap();
    assert_eq!(shouting.len(), 2);
}

#[test]
#[allow(clippy::unwrap_used)]
fn blank_filters_are_not_applied() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();

    let query = SearchQuery {
        title: Some(String::new()),
        author: Some(String::new()),
        year: None,
    };
    assert_eq!(store.search(&query).unwrap().len(), 2);
}

#[test]
#[allow(clippy::unwrap_used)]
fn update_status_round_trip() {
    let (store, _dir) = temp_store();

    let book = store.add("Book One", "Author One", 2022).unwrap();
    assert!(store.update_status(book.id, BookStatus::CheckedOut).unwrap());

    let books = store.list().unwrap();
    assert_eq!(books.first().unwrap().status, BookStatus::CheckedOut);
}

#[test]
#[allow(clippy::unwrap_used)]
fn update_status_unknown_id_does_not_save() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    let before = store.list().unwrap();

    assert!(!store.update_status(99, BookStatus::CheckedOut).unwrap());
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn invalid_status_label_is_rejected() {
    let result = "not-a-status".parse::<BookStatus>();
    assert!(matches!(result, Err(LibraryError::InvalidStatus(value)) if value == "not-a-status"));
}

#[test]
#[allow(clippy::unwrap_used)]
fn unparsable_file_loads_as_empty() {
    let (store, _dir) = temp_store();

    fs::write(store.path(), "not json at all").unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
#[allow(clippy::unwrap_used)]
fn record_missing_a_field_is_an_error() {
    let (store, _dir) = temp_store();

    fs::write(store.path(), r#"[{"id": 1, "title": "Half a record"}]"#).unwrap();

    let result = store.load();
    assert!(matches!(result, Err(LibraryError::MalformedRecord(_))));
}

#[test]
#[allow(clippy::unwrap_used)]
fn legacy_field_shapes_are_accepted() {
    let (store, _dir) = temp_store();

    let raw = r#"[
        {"id": "7", "title": "Older", "author": "Someone", "year": "1999", "status": "in stock"},
        {"id": 8, "title": "Newer", "author": "Someone", "year": 2005, "status": "checked out"}
    ]"#;
    fs::write(store.path(), raw).unwrap();

    let books = store.load().unwrap();
    assert_eq!(books.len(), 2);

    let older = books.first().unwrap();
    assert_eq!(older.id, 7);
    assert_eq!(older.year, 1999);
    assert_eq!(older.status, BookStatus::Available);

    let newer = books.last().unwrap();
    assert_eq!(newer.id, 8);
    assert_eq!(newer.status, BookStatus::CheckedOut);

    // Id assignment keeps counting from the legacy maximum.
    let added = store.add("Newest", "Someone", 2024).unwrap();
    assert_eq!(added.id, 9);
}

#[test]
#[allow(clippy::unwrap_used)]
fn canonical_labels_are_written_on_save() {
    let (store, _dir) = temp_store();

    let book = store.add("Book One", "Author One", 2022).unwrap();
    store.update_status(book.id, BookStatus::CheckedOut).unwrap();

    let raw = fs::read_to_string(store.path()).unwrap();
    assert!(raw.contains("\"checked-out\""));
    assert!(!raw.contains("checked out"));
}

#[test]
#[allow(clippy::unwrap_used)]
fn list_is_idempotent() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();

    assert_eq!(store.list().unwrap(), store.list().unwrap());
}

#[test]
#[allow(clippy::unwrap_used)]
fn save_overwrites_the_whole_file() {
    let (store, _dir) = temp_store();

    store.add("Book One", "Author One", 2022).unwrap();
    store.add("Book Two", "Author One", 2023).unwrap();

    store.save(&[]).unwrap();
    assert!(store.list().unwrap().is_empty());
}
