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

//! Operations on one course.

use crate::db;
use crate::driver::{Driver, not_found};
use crate::model::{Course, CourseCode};
use cursos_core::driver::DriverResult;

impl Driver {
    /// Gets the course identified by `code`.
    pub(crate) async fn get_course(self, code: &CourseCode) -> DriverResult<Course> {
        db::get_course(&mut self.db.ex().await?, code).await?.ok_or_else(not_found)
    }

    /// Stores `course`, replacing any existing course with the same code.
    pub(crate) async fn create_course(self, course: Course) -> DriverResult<Course> {
        db::put_course(&mut self.db.ex().await?, &course).await?;
        Ok(course)
    }

    /// Replaces the existing course that has the same code as `course`.
    ///
    /// The existence check and the write are separate statements, so a concurrent delete of the
    /// same course can slip in between them.
    pub(crate) async fn update_course(self, course: Course) -> DriverResult<Course> {
        let mut ex = self.db.ex().await?;
        if !db::course_exists(&mut ex, course.code()).await? {
            return Err(not_found());
        }
        db::put_course(&mut ex, &course).await?;
        Ok(course)
    }

    /// Deletes the existing course identified by `code`.
    pub(crate) async fn delete_course(self, code: &CourseCode) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        if !db::course_exists(&mut ex, code).await? {
            return Err(not_found());
        }
        db::delete_course(&mut ex, code).await?;
        Ok(())
    }
}
