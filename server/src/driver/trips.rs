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

//! Operations on the trip catalog.

use crate::db;
use crate::driver::Driver;
use crate::model::TripSummary;
use tripdesk_core::driver::DriverResult;

impl Driver {
    /// Lists all trips in the catalog, with one entry per trip and country visited.
    pub(crate) async fn list_trips(self) -> DriverResult<Vec<TripSummary>> {
        let summaries = db::list_trips(&mut self.db.ex().await?).await?;
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::testutils::*;
    use crate::driver::testutils::*;
    use crate::model::TripSummary;
    use time::macros::date;

    #[tokio::test]
    async fn test_list_trips_none() {
        let context = TestContext::setup().await;

        let summaries = context.driver().list_trips().await.unwrap();
        assert!(summaries.is_empty());
    }

    #[tokio::test]
    async fn test_list_trips_ok() {
        let context = TestContext::setup().await;

        let country_id = create_country(&mut context.ex().await, "Iceland").await;
        let trip_id = create_trip(
            &mut context.ex().await,
            "Ring road",
            "Drive around the island",
            date!(2024 - 06 - 01),
            date!(2024 - 06 - 14),
            8,
        )
        .await;
        link_trip_country(&mut context.ex().await, trip_id, country_id).await;

        let exp_summaries = vec![TripSummary::new(
            trip_id,
            "Ring road".to_owned(),
            "Drive around the island".to_owned(),
            date!(2024 - 06 - 01),
            date!(2024 - 06 - 14),
            8,
            "Iceland".to_owned(),
        )];
        assert_eq!(exp_summaries, context.driver().list_trips().await.unwrap());
    }
}
