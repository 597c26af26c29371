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

//! Operations on collections of courses.

use crate::db;
use crate::driver::{Driver, not_found};
use crate::model::Course;
use cursos_core::driver::DriverResult;

/// Treats an empty result set as a failed lookup.
fn non_empty(courses: Vec<Course>) -> DriverResult<Vec<Course>> {
    if courses.is_empty() { Err(not_found()) } else { Ok(courses) }
}

impl Driver {
    /// Gets all existing courses.  Having none is not an error.
    pub(crate) async fn list_courses(self) -> DriverResult<Vec<Course>> {
        let courses = db::get_courses(&mut self.db.ex().await?).await?;
        Ok(courses)
    }

    /// Gets all courses whose name starts with `prefix`.  Fails if there are none.
    pub(crate) async fn list_courses_by_name_prefix(
        self,
        prefix: &str,
    ) -> DriverResult<Vec<Course>> {
        let courses = db::get_courses_by_name_prefix(&mut self.db.ex().await?, prefix).await?;
        non_empty(courses)
    }

    /// Gets all courses with a price within `[min, max]`.  Fails if there are none, which is
    /// always the case when `min` is larger than `max`.
    pub(crate) async fn list_courses_by_price_range(
        self,
        min: i32,
        max: i32,
    ) -> DriverResult<Vec<Course>> {
        let courses = db::get_courses_by_price_range(&mut self.db.ex().await?, min, max).await?;
        non_empty(courses)
    }

    /// Stores all `courses` in order, replacing any existing courses with the same codes.
    ///
    /// Fails without touching the database if there is nothing to store.
    pub(crate) async fn create_courses(self, courses: Vec<Course>) -> DriverResult<Vec<Course>> {
        let courses = non_empty(courses)?;

        db::put_courses(&mut self.db.ex().await?, &courses).await?;
        Ok(courses)
    }
}
