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

//! Entry point to the courses service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use cursos::{ServiceOptions, serve};
use log::error;
use std::process;

/// Prefix of the environment variables that configure the service.
const ENV_PREFIX: &str = "CURSOS";

#[tokio::main]
async fn main() {
    env_logger::init();

    let opts = match ServiceOptions::from_env(ENV_PREFIX) {
        Ok(opts) => opts,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = serve(opts).await {
        error!("Service failed: {}", e);
        process::exit(1);
    }
}
