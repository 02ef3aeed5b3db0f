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

//! Test utilities for the business layer.

use crate::db;
use crate::db::testutils::{create_country, create_trip, link_trip_country};
use crate::driver::Driver;
use crate::model::{ClientId, ClientName, Pesel, TripId};
use std::sync::Arc;
use time::macros::{date, datetime};
use tripdesk_core::clocks::testutils::SettableClock;
use tripdesk_core::db::{Db, Executor};
use tripdesk_core::model::{EmailAddress, Telephone};

/// State of a running test.
pub(crate) struct TestContext {
    /// The clock used by the driver, kept around so that tests can move the current date.
    clock: Arc<SettableClock>,

    /// The driver to handle booking operations.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a clock frozen at a known date.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(tripdesk_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-01-15 10:00:00 UTC)));
        let driver = Driver::new(db, clock.clone());
        Self { clock, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.driver.db.ex().await.unwrap()
    }

    /// Gets the clock used by the driver in this test context.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Syntactic sugar to create a client with fixed details for testing purposes.
    pub(crate) async fn create_simple_client(&self) -> ClientId {
        let client = self
            .driver
            .clone()
            .create_client(
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
