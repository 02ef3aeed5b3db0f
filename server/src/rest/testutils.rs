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

//! Test utilities for the REST API.

use crate::db;
use crate::db::testutils::{create_country, create_trip, link_trip_country};
use crate::driver::Driver;
use crate::model::{ClientId, ClientName, Pesel, TripId};
use crate::rest::app;
use axum::Router;
use std::sync::Arc;
use time::macros::{date, datetime};
use tripdesk_core::clocks::testutils::SettableClock;
use tripdesk_core::db::{Db, Executor};
use tripdesk_core::model::{EmailAddress, Telephone};

pub(crate) struct TestContext {
    db: Arc<dyn Db + Send + Sync>,
    app: Router,
}

impl TestContext {
    /// Initializes the app against an in-memory database and a clock frozen at a known date.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(tripdesk_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-01-15 10:00:00 UTC)));
        let driver = Driver::new(db.clone(), clock);
        let app = app(driver);
        Self { db, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Syntactic sugar to create a client with fixed details for testing purposes.
    pub(crate) async fn create_simple_client(&self) -> ClientId {
        let client = db::create_client(
            &mut self.ex().await,
            ClientName::new("John").unwrap(),
            ClientName::new("Doe").unwrap(),
            EmailAddress::new("test@example.com").unwrap(),
            Telephone::new("+48 600 700 800").unwrap(),
            Pesel::new("12345678901").unwrap(),
        )
        .await
        .unwrap();
        *client.id()
    }

    /// Syntactic sugar to create a trip to `country` with room for `max_people` clients and to
    /// return its id.
    pub(crate) async fn create_simple_trip(&self, country: &str, max_people: u32) -> TripId {
        let mut ex = self.ex().await;
        let country_id = create_country(&mut ex, country).await;
        let trip_id = create_trip(
            &mut ex,
            "Highlights tour",
            "A guided visit to the most popular sights",
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 08),
            max_people,
        )
        .await;
        link_trip_country(&mut ex, trip_id, country_id).await;
        trip_id
    }
}
