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

//! Operations to manage the registrations of clients for trips.

use crate::db;
use crate::driver::Driver;
use crate::model::{ClientId, TripId};
use tripdesk_core::db::DbError;
use tripdesk_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Registers `client_id` for `trip_id` if the trip still has room.
    ///
    /// The checks and the insertion all happen within one transaction, and the trip row stays
    /// locked throughout it, so two concurrent registrations cannot overcommit a trip.
    pub(crate) async fn register_client_trip(
        self,
        client_id: ClientId,
        trip_id: TripId,
    ) -> DriverResult<()> {
        let today = self.today()?;

        let mut tx = self.db.begin().await?;

        if !db::client_exists(tx.ex(), client_id).await? {
            return Err(DriverError::NotFound(format!(
                "Client with id: {} doesn't exist",
                client_id
            )));
        }

        let capacity = match db::get_trip_capacity(tx.ex(), trip_id).await? {
            Some(capacity) => capacity,
            None => {
                return Err(DriverError::NotFound(format!(
                    "Trip with id: {} doesn't exist",
                    trip_id
                )));
            }
        };

        if db::is_client_registered(tx.ex(), client_id, trip_id).await? {
            return Err(DriverError::AlreadyRegistered(format!(
                "Client with id: {} is already registered for trip with id: {}",
                client_id, trip_id
            )));
        }

        let count = db::count_trip_registrations(tx.ex(), trip_id).await?;
        if count >= capacity {
            return Err(DriverError::CapacityExceeded(format!(
                "No more places on trip with id: {}",
                trip_id
            )));
        }

        db::insert_registration(tx.ex(), client_id, trip_id, today).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Removes the registration of `client_id` for `trip_id`.
    pub(crate) async fn delete_client_trip(
        self,
        client_id: ClientId,
        trip_id: TripId,
    ) -> DriverResult<()> {
        match db::delete_registration(&mut self.db.ex().await?, client_id, trip_id).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound) => Err(DriverError::NotFound(format!(
                "Client with id: {} is not registered for trip with id: {}",
                client_id, trip_id
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
