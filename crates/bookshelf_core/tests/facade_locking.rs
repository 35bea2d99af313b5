use bookshelf_core::db::open_db;
use bookshelf_core::{
    BookRequest, ErrorKind, SqliteUserRepository, UserBookRequest, UserBookResponse,
    UserDataFacade, UserDto, UserRequest, UserService,
};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn ann() -> UserRequest {
    UserRequest {
        full_name: "Ann Lee".to_string(),
        title: "reader".to_string(),
        age: 30,
    }
}

fn seed_user(path: &Path) -> i64 {
    let mut conn = open_db(path).unwrap();
    UserDataFacade::new(&mut conn)
        .create_user_with_books(&UserBookRequest::new(ann(), Vec::new()))
        .unwrap()
        .user_id
}

#[test]
fn locked_read_blocks_other_writers_until_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.sqlite3");
    let user_id = seed_user(&path);

    let mut holder = open_db(&path).unwrap();
    let mut contender = open_db(&path).unwrap();
    contender.busy_timeout(Duration::from_millis(50)).unwrap();
    let replacement = UserDto {
        id: Some(user_id),
        ..UserDto::new("Ann Lee", "critic", 31)
    };

    let tx = holder.transaction().unwrap();
    UserService::new(SqliteUserRepository::new(&tx))
        .get_user_by_id_for_update(user_id)
        .unwrap();

    let err = UserService::new(SqliteUserRepository::new(&contender))
        .update_user(&replacement)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);

    {
        let contender_tx = contender.transaction().unwrap();
        let err = UserService::new(SqliteUserRepository::new(&contender_tx))
            .get_user_by_id_for_update(user_id)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    tx.commit().unwrap();
    UserService::new(SqliteUserRepository::new(&contender))
        .update_user(&replacement)
        .unwrap();
}

#[test]
fn concurrent_updates_of_one_user_observe_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.sqlite3");
    let user_id = seed_user(&path);
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = ["Go", "Rust"]
        .into_iter()
        .map(|title| {
            let mut conn = open_db(&path).unwrap();
            let barrier = Arc::clone(&barrier);
            let request = UserBookRequest::new(
                ann(),
                vec![BookRequest {
                    title: title.to_string(),
                    author: "Donovan".to_string(),
                    page_count: 380,
                }],
            );
            thread::spawn(move || {
                barrier.wait();
                UserDataFacade::new(&mut conn)
                    .update_user_with_books(user_id, &request)
                    .unwrap()
            })
        })
        .collect();

    let mut responses: Vec<UserBookResponse> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    responses.sort_by_key(|response| response.books_id_list.len());

    let (first, second) = (&responses[0], &responses[1]);
    assert_eq!(first.books_id_list.len(), 1);
    assert_eq!(second.books_id_list.len(), 2);
    assert_eq!(second.books_id_list[1], first.books_id_list[0]);
}

#[test]
fn failed_commit_is_reported_and_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshelf.sqlite3");
    let mut writer = open_db(&path).unwrap();
    writer.busy_timeout(Duration::from_millis(50)).unwrap();
    let mut reader = open_db(&path).unwrap();

    let read_tx = reader.transaction().unwrap();
    let persons: i64 = read_tx
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(persons, 0);

    let err = UserDataFacade::new(&mut writer)
        .create_user_with_books(&UserBookRequest::new(ann(), Vec::new()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Store);

    read_tx.commit().unwrap();
    let persons: i64 = writer
        .query_row("SELECT COUNT(*) FROM persons;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(persons, 0);
}
