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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{Course, CourseCode};
#[cfg(feature = "postgres")]
use cursos_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use cursos_core::db::sqlite;
use cursos_core::db::{DbError, DbResult, Executor};
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Course {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let code: String = row.try_get("code").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let hours: i32 = row.try_get("hours").map_err(postgres::map_sqlx_error)?;
        let price: i32 = row.try_get("price").map_err(postgres::map_sqlx_error)?;

        Ok(Course::new(CourseCode::new(code)?, name, hours, price))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Course {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let code: String = row.try_get("code").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let hours: i32 = row.try_get("hours").map_err(sqlite::map_sqlx_error)?;
        let price: i32 = row.try_get("price").map_err(sqlite::map_sqlx_error)?;

        Ok(Course::new(CourseCode::new(code)?, name, hours, price))
    }
}

/// Gets all existing courses sorted by their code.
pub(crate) async fn get_courses(ex: &mut Executor) -> DbResult<Vec<Course>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM cursos ORDER BY code";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM cursos ORDER BY code";
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the course identified by `code`, if any.
pub(crate) async fn get_course(ex: &mut Executor, code: &CourseCode) -> DbResult<Option<Course>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM cursos WHERE code = $1";
            let row = sqlx::query(query_str)
                .bind(code.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Course::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM cursos WHERE code = ?";
            let row = sqlx::query(query_str)
                .bind(code.as_str())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Course::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all courses whose name starts with `prefix`, sorted by their code.
///
/// The comparison is case-sensitive and `prefix` is matched literally: characters like `%` or
/// `_` have no special meaning.
pub(crate) async fn get_courses_by_name_prefix(
    ex: &mut Executor,
    prefix: &str,
) -> DbResult<Vec<Course>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT * FROM cursos
                WHERE substr(name, 1, length($1)) = $1
                ORDER BY code";
            let rows = sqlx::query(query_str)
                .bind(prefix)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT * FROM cursos
                WHERE substr(name, 1, length(?1)) = ?1
                ORDER BY code";
            let rows = sqlx::query(query_str)
                .bind(prefix)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all courses with a price in the `[min, max]` range, sorted by their code.
pub(crate) async fn get_courses_by_price_range(
    ex: &mut Executor,
    min: i32,
    max: i32,
) -> DbResult<Vec<Course>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM cursos WHERE price >= $1 AND price <= $2 ORDER BY code";
            let rows = sqlx::query(query_str)
                .bind(min)
                .bind(max)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM cursos WHERE price >= ? AND price <= ? ORDER BY code";
            let rows = sqlx::query(query_str)
                .bind(min)
                .bind(max)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Course::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Checks if the course identified by `code` exists.
pub(crate) async fn course_exists(ex: &mut Executor, code: &CourseCode) -> DbResult<bool> {
    let count: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM cursos WHERE code = $1";
            let row = sqlx::query(query_str)
                .bind(code.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("total").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS total FROM cursos WHERE code = ?";
            let row = sqlx::query(query_str)
                .bind(code.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.try_get("total").map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(count > 0)
}

/// Inserts `course` or, if a course with the same code already exists, replaces it.
pub(crate) async fn put_course(ex: &mut Executor, course: &Course) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO cursos (code, name, hours, price) VALUES ($1, $2, $3, $4)
                ON CONFLICT (code) DO UPDATE
                SET name = EXCLUDED.name, hours = EXCLUDED.hours, price = EXCLUDED.price";
            let done = sqlx::query(query_str)
                .bind(course.code().as_str())
                .bind(course.name())
                .bind(course.hours())
                .bind(course.price())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO cursos (code, name, hours, price) VALUES (?, ?, ?, ?)
                ON CONFLICT (code) DO UPDATE
                SET name = excluded.name, hours = excluded.hours, price = excluded.price";
            let done = sqlx::query(query_str)
                .bind(course.code().as_str())
                .bind(course.name())
                .bind(course.hours())
                .bind(course.price())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError(format!(
            "Upsert of course {} affected {} rows",
            course.code().as_str(),
            rows_affected
        )));
    }
    Ok(())
}

/// Inserts or replaces every course in `courses`, in order.
///
/// Atomicity is only guaranteed if `ex` is backed by a transaction.
pub(crate) async fn put_courses(ex: &mut Executor, courses: &[Course]) -> DbResult<()> {
    for course in courses {
        put_course(ex, course).await?;
    }
    Ok(())
}

/// Deletes the course identified by `code`.
pub(crate) async fn delete_course(ex: &mut Executor, code: &CourseCode) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM cursos WHERE code = $1";
            let done = sqlx::query(query_str)
                .bind(code.as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM cursos WHERE code = ?";
            let done = sqlx::query(query_str)
                .bind(code.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        n => Err(DbError::BackendError(format!("Deletion affected {} rows", n))),
    }
}
