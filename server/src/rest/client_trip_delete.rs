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

//! API to remove the registration of a client for a trip.

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
    driver.delete_client_trip(client_id, trip_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::model::{ClientId, DateCode, TripId};
    use crate::rest::testutils::*;
    use tripdesk_core::rest::testutils::*;

    fn route(client_id: ClientId, trip_id: TripId) -> (http::Method, String) {
        (http::Method::DELETE, format!("/api/clients/{}/trips/{}", client_id, trip_id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let trip_id = context.create_simple_trip("Spain", 10).await;
        let client1_id = context.create_simple_client().await;
        let client2_id = context.create_simple_client().await;
        let registered_at = DateCode::from_u32(20240110).unwrap();
        db::insert_registration(&mut context.ex().await, client1_id, trip_id, registered_at)
            .await
            .unwrap();
        db::insert_registration(&mut context.ex().await, client2_id, trip_id, registered_at)
            .await
            .unwrap();

        OneShotBuilder::new(context.app(), route(client1_id, trip_id))
            .send_empty()
            .await
            .expect_empty()
            .await;

        let mut ex = context.ex().await;
        assert!(!db::is_client_registered(&mut ex, client1_id, trip_id).await.unwrap());
        assert!(db::is_client_registered(&mut ex, client2_id, trip_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_not_registered() {
        let context = TestContext::setup().await;

        let trip_id = context.create_simple_trip("Spain", 10).await;
        let client_id = context.create_simple_client().await;

        OneShotBuilder::new(context.into_app(), route(client_id, trip_id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("is not registered for trip")
            .await;
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let context = TestContext::setup().await;

        let trip_id = context.create_simple_trip("Spain", 10).await;
        let client_id = context.create_simple_client().await;
        db::insert_registration(
            &mut context.ex().await,
            client_id,
            trip_id,
            DateCode::from_u32(20240110).unwrap(),
        )
        .await
        .unwrap();

        OneShotBuilder::new(context.app(), route(client_id, trip_id))
            .send_empty()
            .await
            .expect_empty()
            .await;

        OneShotBuilder::new(context.into_app(), route(client_id, trip_id))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("is not registered for trip")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route(ClientId::new(1), TripId::new(1))
    );
}
