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

//! API to list the trips in the catalog.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use tripdesk_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<impl IntoResponse, RestError> {
    let trips = driver.list_trips().await?;

    Ok(Json(trips))
}

#[cfg(test)]
mod tests {
    use crate::model::TripSummary;
    use crate::rest::testutils::*;
    use time::macros::date;
    use tripdesk_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::GET, "/api/trips".to_owned())
    }

    #[tokio::test]
    async fn test_none() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<TripSummary>>()
            .await;
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let trip1_id = context.create_simple_trip("Iceland", 8).await;
        let trip2_id = context.create_simple_trip("Spain", 20).await;

        let response = OneShotBuilder::new(context.into_app(), route())
            .send_empty()
            .await
            .expect_json::<Vec<TripSummary>>()
            .await;
        let exp_response = vec![
            TripSummary::new(
                trip1_id,
                "Highlights tour".to_owned(),
                "A guided visit to the most popular sights".to_owned(),
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 08),
                8,
                "Iceland".to_owned(),
            ),
            TripSummary::new(
                trip2_id,
                "Highlights tour".to_owned(),
                "A guided visit to the most popular sights".to_owned(),
                date!(2024 - 03 - 01),
                date!(2024 - 03 - 08),
                20,
                "Spain".to_owned(),
            ),
        ];
        assert_eq!(exp_response, response);
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route());
}
