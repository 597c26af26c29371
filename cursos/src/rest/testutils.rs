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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::{Course, CourseCode};
use crate::rest::app;
use axum::Router;
use cursos_core::db::Db;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct inspection.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(cursos_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Returns a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Stores a course bypassing the app.
    pub(crate) async fn put_course(&self, code: &'static str, name: &str, hours: i32, price: i32) {
        db::put_course(&mut self.db.ex().await.unwrap(), &course(code, name, hours, price))
            .await
            .unwrap();
    }

    /// Fetches a course bypassing the app.
    pub(crate) async fn get_course(&self, code: &'static str) -> Option<Course> {
        db::get_course(&mut self.db.ex().await.unwrap(), &CourseCode::from(code)).await.unwrap()
    }

    /// Fetches all courses bypassing the app.
    pub(crate) async fn get_courses(&self) -> Vec<Course> {
        db::get_courses(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}

/// Syntactic sugar to instantiate a course.
pub(crate) fn course(code: &'static str, name: &str, hours: i32, price: i32) -> Course {
    Course::new(CourseCode::from(code), name.to_owned(), hours, price)
}
