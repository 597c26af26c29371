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

//! Entry point to the REST server.

use crate::driver::{COURSE_NOT_FOUND, Driver};
use crate::model::CourseCode;
use axum::Router;
use cursos_core::rest::RestError;
use log::debug;

mod course_delete;
mod course_get;
mod course_post;
mod course_put;
mod courses_get;
mod courses_name_get;
mod courses_post;
mod courses_range_get;
#[cfg(test)]
mod testutils;

/// Parses the course code given in the path of a request.
///
/// Codes that fail validation cannot name a stored course, so they are reported as not found.
fn path_code(code: String) -> Result<CourseCode, RestError> {
    CourseCode::new(code).map_err(|e| {
        debug!("Invalid course code in path: {}", e);
        RestError::NotFound(COURSE_NOT_FOUND.to_owned())
    })
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    use axum::routing::post;
    Router::new()
        .route("/curso", post(course_post::handler).put(course_put::handler))
        .route("/curso/:codigo", get(course_get::handler).delete(course_delete::handler))
        .route("/cursos", get(courses_get::handler).post(courses_post::handler))
        .route("/cursos/nombre/:nombre", get(courses_name_get::handler))
        .route("/cursos/rango", get(courses_range_get::handler))
        .with_state(driver)
}
