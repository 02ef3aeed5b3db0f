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

//! API to register a new client.

use crate::driver::Driver;
use crate::model::{ClientName, Pesel};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use tripdesk_core::model::{EmailAddress, Telephone};
use tripdesk_core::rest::RestError;

/// Message sent to the server to register a client.
///
/// The fields are plain strings, not model types, so that their validation errors surface as
/// bad request errors with our own messages and not as deserialization failures.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug, serde::Serialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateClientRequest {
    /// The client's first name.
    first_name: String,

    /// The client's last name.
    last_name: String,

    /// The client's contact email address.
    email: String,

    /// The client's contact telephone number.
    telephone: String,

    /// The client's national identification number.
    pesel: String,
}

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, RestError> {
    let first_name = ClientName::new(request.first_name)?;
    let last_name = ClientName::new(request.last_name)?;
    let email = EmailAddress::new(request.email)?;
    let telephone = Telephone::new(request.telephone)?;
    let pesel = Pesel::new(request.pesel)?;

    let client = driver.create_client(first_name, last_name, email, telephone, pesel).await?;

    let location = [(http::header::LOCATION, format!("clients/{}", client.id()))];
    Ok((http::StatusCode::CREATED, location, Json(client)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::model::Client;
    use crate::rest::testutils::*;
    use tripdesk_core::rest::testutils::*;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/clients".to_owned())
    }

    /// Returns a request message with valid contents for all fields.
    fn valid_request() -> CreateClientRequest {
        CreateClientRequest {
            first_name: "Jane".to_owned(),
            last_name: "Smith".to_owned(),
            email: "jane@example.com".to_owned(),
            telephone: "+48 500 600 700".to_owned(),
            pesel: "90010112345".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(valid_request())
            .await
            .expect_status(http::StatusCode::CREATED)
            .take_response()
            .await;

        let location = response.headers().get(http::header::LOCATION).unwrap();
        let location = location.to_str().unwrap().to_owned();

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let client = serde_json::from_slice::<Client>(&body).unwrap();
        assert_eq!(format!("clients/{}", client.id()), location);
        assert_eq!("Jane", client.first_name().as_str());
        assert_eq!("90010112345", client.pesel().as_str());

        assert!(db::client_exists(&mut context.ex().await, *client.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_identical_details_create_distinct_clients() {
        let context = TestContext::setup().await;

        let mut ids = vec![];
        for _ in 0..2 {
            let response = OneShotBuilder::new(context.app(), route())
                .send_json(valid_request())
                .await
                .expect_status(http::StatusCode::CREATED)
                .expect_json::<Client>()
                .await;
            ids.push(*response.id());
        }
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_empty_name() {
        let context = TestContext::setup().await;

        let mut request = valid_request();
        request.first_name = "".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Name cannot be empty")
            .await;
    }

    #[tokio::test]
    async fn test_long_name() {
        let context = TestContext::setup().await;

        let mut request = valid_request();
        request.last_name = "a".repeat(121);
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Name is too long")
            .await;
    }

    #[tokio::test]
    async fn test_bad_email() {
        let context = TestContext::setup().await;

        let mut request = valid_request();
        request.email = "jane.example.com".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("valid address")
            .await;
    }

    #[tokio::test]
    async fn test_bad_telephone() {
        let context = TestContext::setup().await;

        let mut request = valid_request();
        request.telephone = "call me".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("telephone number")
            .await;
    }

    #[tokio::test]
    async fn test_empty_pesel() {
        let context = TestContext::setup().await;

        let mut request = valid_request();
        request.pesel = " ".to_owned();
        OneShotBuilder::new(context.into_app(), route())
            .send_json(request)
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("National id cannot be empty")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
