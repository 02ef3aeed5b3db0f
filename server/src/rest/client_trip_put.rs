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

//! API to register a client for a trip.

use crate::driver::Driver;
use crate::model::{ClientId, TripId};
use axum::extract::{Path, State};
use tripdesk_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path((client_id, trip_id)): Path<(ClientId, TripId)>,
    _: EmptyBody,
) -> Result<(), RestError> {
    driver.register_client_trip(client_id, trip_id).await?;
    Ok(())
}
