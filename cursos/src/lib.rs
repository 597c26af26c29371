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

//! REST service to manage a catalog of courses.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use cursos_core::db::Db;
#[cfg(feature = "postgres")]
use cursos_core::db::postgres::{PostgresDb, PostgresOptions};
use cursos_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

mod db;
mod driver;
use driver::Driver;
mod model;
mod rest;
use rest::app;

/// Default port to listen on.
const DEFAULT_PORT: u16 = 3000;

/// Default address to bind to.
const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Prefix of the environment variables that configure the production PostgreSQL database.
#[cfg(feature = "postgres")]
const PGSQL_PREFIX: &str = "PGSQL_PROD";

/// Database to persist courses to.
#[derive(Debug)]
pub enum DatabaseOptions {
    /// Connect to a PostgreSQL server.
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),

    /// Open the SQLite database at the given URI.
    #[cfg(any(feature = "sqlite", test))]
    Sqlite(String),
}

impl DatabaseOptions {
    /// Initializes the database options from environment variables whose name is prefixed with
    /// the given `prefix`.
    ///
    /// `<prefix>_SQLITE_URI` selects an SQLite database when SQLite support is compiled in.
    /// Otherwise, the PostgreSQL connection is configured via the `PGSQL_PROD_*` variables.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        #[cfg(any(feature = "sqlite", test))]
        if let Some(uri) = get_optional_var::<String>(prefix, "SQLITE_URI")? {
            return Ok(DatabaseOptions::Sqlite(uri));
        }

        Self::fallback_from_env(prefix)
    }

    /// Configures the database to use when no other choice was made.
    #[cfg(feature = "postgres")]
    fn fallback_from_env(_prefix: &str) -> Result<Self, String> {
        Ok(DatabaseOptions::Postgres(PostgresOptions::from_env(PGSQL_PREFIX)?))
    }

    /// Configures the database to use when no other choice was made.
    #[cfg(not(feature = "postgres"))]
    fn fallback_from_env(prefix: &str) -> Result<Self, String> {
        Err(format!("Required environment variable {}_SQLITE_URI not present", prefix))
    }

    /// Establishes the connection to the configured database.
    async fn connect(self) -> Result<Arc<dyn Db + Send + Sync>, Box<dyn Error>> {
        let db: Arc<dyn Db + Send + Sync> = match self {
            #[cfg(feature = "postgres")]
            DatabaseOptions::Postgres(opts) => {
                info!("Using PostgreSQL database {} at {}:{}", opts.database, opts.host, opts.port);
                Arc::new(PostgresDb::connect(opts)?)
            }

            #[cfg(any(feature = "sqlite", test))]
            DatabaseOptions::Sqlite(uri) => {
                info!("Using SQLite database {}", uri);
                Arc::new(cursos_core::db::sqlite::connect(&uri).await?)
            }
        };
        Ok(db)
    }
}

/// Configuration of the service.
#[derive(Debug)]
pub struct ServiceOptions {
    /// Address to bind the HTTP server to.
    pub bind_address: IpAddr,

    /// Port to listen on.
    pub port: u16,

    /// Database to persist courses to.
    pub database: DatabaseOptions,
}

impl ServiceOptions {
    /// Initializes the service options from environment variables whose name is prefixed with
    /// the given `prefix`.
    ///
    /// This will use variables such as `<prefix>_BIND_ADDRESS` and `<prefix>_PORT`, plus the
    /// ones described in `DatabaseOptions::from_env`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(ServiceOptions {
            bind_address: get_optional_var::<IpAddr>(prefix, "BIND_ADDRESS")?
                .unwrap_or(DEFAULT_BIND_ADDRESS),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            database: DatabaseOptions::from_env(prefix)?,
        })
    }
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received; shutting down"),
        Err(e) => {
            warn!("Cannot listen for interrupts; graceful shutdown disabled: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Instantiates all resources to serve the application as configured by `opts`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(opts: ServiceOptions) -> Result<(), Box<dyn Error>> {
    let db = opts.database.connect().await?;
    db::init_schema(&mut db.ex().await?).await?;

    let driver = Driver::new(db.clone());
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind((opts.bind_address, opts.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    db.close().await;
    info!("Database closed");
    Ok(result?)
}
