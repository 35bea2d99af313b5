use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    BookRequest, BookService, ErrorKind, ServiceError, SqliteBookRepository,
    SqliteUserRepository, UserBookRequest, UserBookResponse, UserDataFacade, UserRequest,
    UserService,
};
use rusqlite::Connection;

fn ann() -> UserRequest {
    UserRequest {
        full_name: "Ann Lee".to_string(),
        title: "reader".to_string(),
        age: 30,
    }
}

fn book(title: &str, author: &str, page_count: i64) -> BookRequest {
    BookRequest {
        title: title.to_string(),
        author: author.to_string(),
        page_count,
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn create(conn: &mut Connection, books: Vec<BookRequest>) -> UserBookResponse {
    UserDataFacade::new(conn)
        .create_user_with_books(&UserBookRequest::new(ann(), books))
        .unwrap()
}

#[test]
fn create_returns_user_id_and_one_id_per_book_in_order() {
    let mut conn = open_db_in_memory().unwrap();
    let response = create(
        &mut conn,
        vec![
            book("Go", "Donovan", 380),
            book("SICP", "Abelson", 657),
            book("K&R", "Kernighan", 272),
        ],
    );

    assert_eq!(response.books_id_list.len(), 3);
    let books = BookService::new(SqliteBookRepository::new(&conn));
    let titles: Vec<String> = response
        .books_id_list
        .iter()
        .map(|id| {
            let stored = books.get_book_by_id(*id).unwrap();
            assert_eq!(stored.user_id, Some(response.user_id));
            stored.title
        })
        .collect();
    assert_eq!(titles, ["Go", "SICP", "K&R"]);
}

#[test]
fn create_skips_null_book_entries() {
    let mut conn = open_db_in_memory().unwrap();
    let request = UserBookRequest {
        user_request: Some(ann()),
        book_requests: Some(vec![None, Some(book("Go", "Donovan", 380)), None]),
    };

    let response = UserDataFacade::new(&mut conn)
        .create_user_with_books(&request)
        .unwrap();
    assert_eq!(response.books_id_list.len(), 1);
    assert_eq!(count(&conn, "books"), 1);
}

#[test]
fn create_with_missing_parts_fails_before_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let mut facade = UserDataFacade::new(&mut conn);

    let no_user = UserBookRequest {
        user_request: None,
        book_requests: Some(Vec::new()),
    };
    let err = facade.create_user_with_books(&no_user).unwrap_err();
    assert!(matches!(err, ServiceError::MissingData(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let no_books = UserBookRequest {
        user_request: Some(ann()),
        book_requests: None,
    };
    let err = facade.create_user_with_books(&no_books).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("list of books"));

    drop(facade);
    assert_eq!(count(&conn, "persons"), 0);
}

#[test]
fn create_rolls_back_user_and_earlier_books_when_a_book_fails() {
    let mut conn = open_db_in_memory().unwrap();
    let request = UserBookRequest::new(
        ann(),
        vec![
            book("Go", "Donovan", 380),
            book("SICP", "Abelson", 657),
            book("Empty", "Nobody", 0),
        ],
    );

    let err = UserDataFacade::new(&mut conn)
        .create_user_with_books(&request)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(count(&conn, "persons"), 0);
    assert_eq!(count(&conn, "books"), 0);
}

#[test]
fn update_skips_books_equal_by_value_and_appends_existing_ids() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(
        &mut conn,
        vec![book("Go", "Donovan", 380), book("SICP", "Abelson", 657)],
    );
    let (id_a, id_b) = (created.books_id_list[0], created.books_id_list[1]);

    let request = UserBookRequest::new(
        ann(),
        vec![
            book("Go", "Donovan", 380),
            book("SICP", "Abelson", 657),
            book("K&R", "Kernighan", 272),
        ],
    );
    let updated = UserDataFacade::new(&mut conn)
        .update_user_with_books(created.user_id, &request)
        .unwrap();

    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.books_id_list.len(), 3);
    let id_c = updated.books_id_list[0];
    assert!(id_c != id_a && id_c != id_b);
    assert_eq!(&updated.books_id_list[1..], &[id_a, id_b]);
    assert_eq!(count(&conn, "books"), 3);
}

#[test]
fn update_writes_books_that_differ_in_any_semantic_field() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(&mut conn, vec![book("Go", "Donovan", 380)]);

    let request = UserBookRequest::new(ann(), vec![book("Go", "Donovan", 400)]);
    let updated = UserDataFacade::new(&mut conn)
        .update_user_with_books(created.user_id, &request)
        .unwrap();

    assert_eq!(updated.books_id_list.len(), 2);
    assert_eq!(updated.books_id_list[1], created.books_id_list[0]);
    assert_eq!(count(&conn, "books"), 2);
}

#[test]
fn update_replaces_user_fields_and_keeps_unmentioned_books() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(&mut conn, vec![book("Go", "Donovan", 380)]);

    let request = UserBookRequest::new(
        UserRequest {
            full_name: "Ann Lee-Smith".to_string(),
            title: "critic".to_string(),
            age: 31,
        },
        Vec::new(),
    );
    let updated = UserDataFacade::new(&mut conn)
        .update_user_with_books(created.user_id, &request)
        .unwrap();

    assert_eq!(updated, created);
    let stored = UserService::new(SqliteUserRepository::new(&conn))
        .get_user_by_id(created.user_id)
        .unwrap();
    assert_eq!(stored.id, Some(created.user_id));
    assert_eq!(stored.full_name, "Ann Lee-Smith");
    assert_eq!(stored.title, "critic");
    assert_eq!(stored.age, 31);
}

#[test]
fn update_of_unknown_user_is_not_found_and_writes_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let request = UserBookRequest::new(ann(), vec![book("Go", "Donovan", 380)]);

    let err = UserDataFacade::new(&mut conn)
        .update_user_with_books(77, &request)
        .unwrap_err();

    assert!(matches!(err, ServiceError::UserNotFound(77)));
    assert_eq!(count(&conn, "persons"), 0);
    assert_eq!(count(&conn, "books"), 0);
}

#[test]
fn update_rolls_back_written_books_when_user_update_fails() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(&mut conn, vec![book("Go", "Donovan", 380)]);

    let request = UserBookRequest::new(
        UserRequest {
            full_name: "Ann Lee".to_string(),
            title: "reader".to_string(),
            age: 3,
        },
        vec![book("SICP", "Abelson", 657)],
    );
    let err = UserDataFacade::new(&mut conn)
        .update_user_with_books(created.user_id, &request)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(count(&conn, "books"), 1);
}

#[test]
fn get_for_user_without_books_returns_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(&mut conn, Vec::new());

    let loaded = UserDataFacade::new(&mut conn)
        .get_user_with_books(created.user_id)
        .unwrap();
    assert_eq!(loaded.user_id, created.user_id);
    assert!(loaded.books_id_list.is_empty());
}

#[test]
fn get_for_unknown_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let err = UserDataFacade::new(&mut conn)
        .get_user_with_books(5)
        .unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound(5)));
}

#[test]
fn delete_removes_user_and_every_owned_book_only() {
    let mut conn = open_db_in_memory().unwrap();
    let doomed = create(
        &mut conn,
        vec![book("Go", "Donovan", 380), book("SICP", "Abelson", 657)],
    );
    let survivor = create(&mut conn, vec![book("Go", "Donovan", 380)]);

    UserDataFacade::new(&mut conn)
        .delete_user_with_books(doomed.user_id)
        .unwrap();

    let users = UserService::new(SqliteUserRepository::new(&conn));
    assert!(matches!(
        users.get_user_by_id(doomed.user_id),
        Err(ServiceError::UserNotFound(_))
    ));
    let books = BookService::new(SqliteBookRepository::new(&conn));
    for id in &doomed.books_id_list {
        assert!(matches!(
            books.get_book_by_id(*id),
            Err(ServiceError::BookNotFound(_))
        ));
    }
    assert!(books.get_book_by_id(survivor.books_id_list[0]).is_ok());
    assert_eq!(count(&conn, "persons"), 1);
}

#[test]
fn delete_of_unknown_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let err = UserDataFacade::new(&mut conn)
        .delete_user_with_books(9)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn create_get_delete_round_trip() {
    let mut conn = open_db_in_memory().unwrap();
    let created = create(&mut conn, vec![book("Go", "Donovan", 380)]);
    assert_eq!(created.books_id_list.len(), 1);

    let mut facade = UserDataFacade::new(&mut conn);
    assert_eq!(facade.get_user_with_books(created.user_id).unwrap(), created);
    facade.delete_user_with_books(created.user_id).unwrap();
    drop(facade);

    let err = BookService::new(SqliteBookRepository::new(&conn))
        .get_book_by_id(created.books_id_list[0])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn padded_overlong_title_is_invalid_input_not_a_store_constraint() {
    let mut conn = open_db_in_memory().unwrap();
    let request = UserBookRequest::new(
        UserRequest {
            title: format!("{}   ", "t".repeat(30)),
            ..ann()
        },
        vec![book("Go", "Donovan", 380)],
    );

    let err = UserDataFacade::new(&mut conn)
        .create_user_with_books(&request)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Invalid);
    assert_eq!(count(&conn, "persons"), 0);
}

#[test]
fn short_padded_values_are_stored_as_given() {
    let mut conn = open_db_in_memory().unwrap();
    let request = UserBookRequest::new(
        UserRequest {
            title: " a".to_string(),
            ..ann()
        },
        vec![book(" g", " d", 1)],
    );

    let created = UserDataFacade::new(&mut conn)
        .create_user_with_books(&request)
        .unwrap();

    let stored = UserService::new(SqliteUserRepository::new(&conn))
        .get_user_by_id(created.user_id)
        .unwrap();
    assert_eq!(stored.title, " a");
    assert_eq!(created.books_id_list.len(), 1);
}
