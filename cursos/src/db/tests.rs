// Cursos
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::{Course, CourseCode};
use cursos_core::db::{Db, DbError, Executor};

/// Syntactic sugar to instantiate a course.
fn course(code: &'static str, name: &str, hours: i32, price: i32) -> Course {
    Course::new(CourseCode::from(code), name.to_owned(), hours, price)
}

/// Runs a raw `query` on `ex` to bypass the validations of the typed operations.  The `query`
/// must be valid for all possible database implementations.
async fn exec_raw(ex: &mut Executor, query: &str) {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let _result = sqlx::query(query).execute(ex.conn()).await.unwrap();
        }

        Executor::Sqlite(ex) => {
            let _result = sqlx::query(query).execute(ex.conn()).await.unwrap();
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Returns the codes of `courses` for easier comparisons.
fn codes(courses: &[Course]) -> Vec<&str> {
    courses.iter().map(|c| c.code().as_str()).collect()
}

async fn test_courses_empty(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();
    let code = CourseCode::from("missing");

    assert!(get_courses(&mut ex).await.unwrap().is_empty());
    assert_eq!(None, get_course(&mut ex, &code).await.unwrap());
    assert!(!course_exists(&mut ex, &code).await.unwrap());
    assert!(get_courses_by_name_prefix(&mut ex, "a").await.unwrap().is_empty());
    assert!(get_courses_by_price_range(&mut ex, i32::MIN, i32::MAX).await.unwrap().is_empty());
    assert_eq!(DbError::NotFound, delete_course(&mut ex, &code).await.unwrap_err());

    drop(ex);
    db.close().await;
}

async fn test_put_course_and_get(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    let intro = course("C1", "Intro", 10, 100);
    put_course(&mut ex, &intro).await.unwrap();

    assert_eq!(Some(intro.clone()), get_course(&mut ex, intro.code()).await.unwrap());
    assert!(course_exists(&mut ex, intro.code()).await.unwrap());
    assert!(!course_exists(&mut ex, &CourseCode::from("C2")).await.unwrap());
    assert_eq!(vec![intro], get_courses(&mut ex).await.unwrap());

    drop(ex);
    db.close().await;
}

async fn test_put_course_replaces(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("C1", "Intro", 10, 100)).await.unwrap();
    put_course(&mut ex, &course("C2", "Other", 1, 1)).await.unwrap();
    let replacement = course("C1", "", 0, 0);
    put_course(&mut ex, &replacement).await.unwrap();

    assert_eq!(Some(replacement), get_course(&mut ex, &CourseCode::from("C1")).await.unwrap());
    assert_eq!(vec!["C1", "C2"], codes(&get_courses(&mut ex).await.unwrap()));

    drop(ex);
    db.close().await;
}

async fn test_get_courses_sorted(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("b", "x", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("c", "x", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("a", "x", 1, 1)).await.unwrap();

    assert_eq!(vec!["a", "b", "c"], codes(&get_courses(&mut ex).await.unwrap()));

    drop(ex);
    db.close().await;
}

async fn test_get_courses_by_name_prefix(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("1", "Introduction", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("2", "Intro", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("3", "intro", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("4", "In", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("5", "100% Rust", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("6", "1000 Rust", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("7", "A_B", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("8", "AxB", 1, 1)).await.unwrap();

    assert_eq!(
        vec!["1", "2"],
        codes(&get_courses_by_name_prefix(&mut ex, "Intro").await.unwrap())
    );
    assert_eq!(vec!["3"], codes(&get_courses_by_name_prefix(&mut ex, "intro").await.unwrap()));
    assert_eq!(
        vec!["1", "2", "4"],
        codes(&get_courses_by_name_prefix(&mut ex, "In").await.unwrap())
    );
    assert_eq!(vec!["5"], codes(&get_courses_by_name_prefix(&mut ex, "100%").await.unwrap()));
    assert_eq!(vec!["7"], codes(&get_courses_by_name_prefix(&mut ex, "A_").await.unwrap()));
    assert!(get_courses_by_name_prefix(&mut ex, "Introductions").await.unwrap().is_empty());

    drop(ex);
    db.close().await;
}

async fn test_get_courses_by_price_range(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("cheap", "x", 1, 40)).await.unwrap();
    put_course(&mut ex, &course("mid", "x", 1, 100)).await.unwrap();
    put_course(&mut ex, &course("expensive", "x", 1, 200)).await.unwrap();

    assert_eq!(vec!["mid"], codes(&get_courses_by_price_range(&mut ex, 50, 150).await.unwrap()));
    assert_eq!(
        vec!["cheap", "mid"],
        codes(&get_courses_by_price_range(&mut ex, 40, 100).await.unwrap())
    );
    assert_eq!(
        vec!["expensive", "mid"],
        codes(&get_courses_by_price_range(&mut ex, 100, 200).await.unwrap())
    );
    assert_eq!(vec!["mid"], codes(&get_courses_by_price_range(&mut ex, 100, 100).await.unwrap()));
    assert!(get_courses_by_price_range(&mut ex, 150, 50).await.unwrap().is_empty());
    assert!(get_courses_by_price_range(&mut ex, 201, i32::MAX).await.unwrap().is_empty());

    drop(ex);
    db.close().await;
}

async fn test_put_courses(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("C1", "Old", 1, 1)).await.unwrap();
    let courses = vec![course("C2", "Two", 2, 2), course("C1", "One", 1, 1)];
    put_courses(&mut ex, &courses).await.unwrap();
    put_courses(&mut ex, &[]).await.unwrap();

    assert_eq!(
        vec![course("C1", "One", 1, 1), course("C2", "Two", 2, 2)],
        get_courses(&mut ex).await.unwrap()
    );

    drop(ex);
    db.close().await;
}

async fn test_put_courses_rolled_back(db: Box<dyn Db>) {
    let mut tx = db.begin().await.unwrap();
    put_courses(tx.ex(), &[course("C1", "One", 1, 1), course("C2", "Two", 2, 2)]).await.unwrap();
    assert_eq!(2, get_courses(tx.ex()).await.unwrap().len());
    drop(tx);

    let mut ex = db.ex().await.unwrap();
    assert!(get_courses(&mut ex).await.unwrap().is_empty());

    drop(ex);
    db.close().await;
}

async fn test_delete_course(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    put_course(&mut ex, &course("C1", "One", 1, 1)).await.unwrap();
    put_course(&mut ex, &course("C2", "Two", 2, 2)).await.unwrap();

    delete_course(&mut ex, &CourseCode::from("C1")).await.unwrap();
    assert_eq!(vec!["C2"], codes(&get_courses(&mut ex).await.unwrap()));

    assert_eq!(
        DbError::NotFound,
        delete_course(&mut ex, &CourseCode::from("C1")).await.unwrap_err()
    );

    drop(ex);
    db.close().await;
}

async fn test_course_corrupted_code(db: Box<dyn Db>) {
    let mut ex = db.ex().await.unwrap();

    exec_raw(&mut ex, "INSERT INTO cursos (code, name, hours, price) VALUES ('', 'x', 1, 1)").await;

    match get_courses(&mut ex).await {
        Err(DbError::DataIntegrityError(e)) => assert!(e.contains("cannot be empty")),
        e => panic!("{:?}", e),
    }

    drop(ex);
    db.close().await;
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        cursos_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_courses_empty,
            test_put_course_and_get,
            test_put_course_replaces,
            test_get_courses_sorted,
            test_get_courses_by_name_prefix,
            test_get_courses_by_price_range,
            test_put_courses,
            test_put_courses_rolled_back,
            test_delete_course,
            test_course_corrupted_code
        );
    }
];

use generate_db_tests;

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use crate::db::init_schema;
    use cursos_core::db::Db;
    use cursos_core::db::postgres::PostgresDb;

    async fn setup() -> PostgresDb {
        let db = cursos_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        Box::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use crate::db::init_schema;
    use cursos_core::db::Db;
    use cursos_core::db::sqlite::SqliteDb;

    async fn setup() -> SqliteDb {
        let db = cursos_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(Box::new(setup().await));
}
