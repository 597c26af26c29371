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

//! High-level data types.

use cursos_core::model::{ModelError, ModelResult};
use derive_getters::Getters;
use derive_more::Constructor;
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Maximum length of a course code as specified in the schema.
pub(crate) const MAX_COURSE_CODE_LENGTH: usize = 255;

/// Represents a correctly-formatted (but maybe non-existent) course code.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct CourseCode(String);

impl CourseCode {
    /// Creates a new course code from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.is_empty() {
            return Err(ModelError("Course code cannot be empty".to_owned()));
        }
        if s.chars().count() > MAX_COURSE_CODE_LENGTH {
            return Err(ModelError("Course code is too long".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the course code.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
impl From<&'static str> for CourseCode {
    /// Creates a new course code from a hardcoded string, which must be valid.
    fn from(code: &'static str) -> Self {
        CourseCode::new(code).expect("Hardcoded course codes must be valid")
    }
}

/// A deserialization visitor for a `CourseCode`.
struct CourseCodeVisitor;

impl Visitor<'_> for CourseCodeVisitor {
    type Value = CourseCode;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        CourseCode::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        CourseCode::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for CourseCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(CourseCodeVisitor)
    }
}

/// A course record.
///
/// Updates replace whole records, so any field other than `code` that is missing from an
/// incoming document takes its default value instead of keeping the stored one.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub(crate) struct Course {
    /// Unique identifier of the course.
    #[serde(alias = "codigo")]
    code: CourseCode,

    /// Human-readable name of the course.  Used for prefix searches.
    #[serde(default, alias = "nombre")]
    name: String,

    /// Number of hours the course lasts.
    #[serde(default, alias = "numeroHoras")]
    hours: i32,

    /// Price of the course.  Used for range searches.
    #[serde(default, alias = "precio")]
    price: i32,
}
