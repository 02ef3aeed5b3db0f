// Tripdesk
// Copyright 2025 The Tripdesk Authors
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

use crate::driver::Driver;
use axum::Router;

mod client_trip_delete;
mod client_trip_put;
mod client_trips_get;
mod clients_post;
#[cfg(test)]
mod testutils;
mod trips_get;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{get, post, put};
    Router::new()
        .route("/api/trips", get(trips_get::handler))
        .route("/api/clients", post(clients_post::handler))
        .route("/api/clients/:client_id/trips", get(client_trips_get::handler))
        .route(
            "/api/clients/:client_id/trips/:trip_id",
            put(client_trip_put::handler).delete(client_trip_delete::handler),
        )
        .with_state(driver)
}
