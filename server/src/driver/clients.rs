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

//! Operations on clients and the trips they are registered for.

use crate::db;
use crate::driver::Driver;
use crate::model::{Client, ClientId, ClientName, ClientTripSummary, Pesel};
use tripdesk_core::driver::{DriverError, DriverResult};
use tripdesk_core::model::{EmailAddress, Telephone};

impl Driver {
    /// Registers a new client with the given personal details.
    ///
    /// Nothing other than field validity is checked here: two clients with identical details
    /// are recorded as separate entities.
    pub(crate) async fn create_client(
        self,
        first_name: ClientName,
        last_name: ClientName,
        email: EmailAddress,
        telephone: Telephone,
        pesel: Pesel,
    ) -> DriverResult<Client> {
        let mut ex = self.db.ex().await?;
        let client =
            db::create_client(&mut ex, first_name, last_name, email, telephone, pesel).await?;
        Ok(client)
    }

    /// Lists the trips that `client_id` is registered for.
    ///
    /// Registrations that have no payment date yet carry the current date in that field.
    pub(crate) async fn list_client_trips(
        self,
        client_id: ClientId,
    ) -> DriverResult<Vec<ClientTripSummary>> {
        let today = self.today()?;

        let mut ex = self.db.ex().await?;

        if !db::client_exists(&mut ex, client_id).await? {
            return Err(DriverError::NotFound(format!(
                "Client with id: {} doesn't exist",
                client_id
            )));
        }

        let trips = db::list_client_trips(&mut ex, client_id, today).await?;
        if trips.is_empty() {
            return Err(DriverError::NotFound(format!(
                "Client with id: {} is not registered for any trips",
                client_id
            )));
        }
        Ok(trips)
    }
}
