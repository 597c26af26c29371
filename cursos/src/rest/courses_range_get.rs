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

//! API to get all courses within a price range.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use cursos_core::rest::{QueryParams, RestError};
use serde::Deserialize;

/// Query parameters for this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct PriceRange {
    /// Lowest price to return, inclusive.
    #[serde(rename = "precioMinimo")]
    min: i32,

    /// Highest price to return, inclusive.
    #[serde(rename = "precioMaximo")]
    max: i32,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    QueryParams(range): QueryParams<PriceRange>,
) -> Result<impl IntoResponse, RestError> {
    let courses = driver.list_courses_by_price_range(range.min, range.max).await?;

    Ok(Json(courses))
}
