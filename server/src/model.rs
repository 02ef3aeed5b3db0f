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

//! High-level data types for the booking service.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};
use time::{Date, Month};
use tripdesk_core::model::{EmailAddress, ModelError, ModelResult, Telephone};

/// Maximum length of client names and national id numbers per the schema.
const MAX_FIELD_LENGTH: usize = 120;

/// Identifier of a client as assigned by the database.
#[derive(Clone, Constructor, Copy, Deserialize, Display, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct ClientId(i32);

impl ClientId {
    /// Returns the identifier as an `i32` for database queries.
    pub(crate) fn as_i32(&self) -> i32 {
        self.0
    }
}

/// Identifier of a trip as assigned by the database.
#[derive(Clone, Constructor, Copy, Deserialize, Display, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct TripId(i32);

impl TripId {
    /// Returns the identifier as an `i32` for database queries.
    pub(crate) fn as_i32(&self) -> i32 {
        self.0
    }
}

/// A client's first or last name, kept verbatim as entered.
#[derive(Clone, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
#[serde(transparent)]
pub(crate) struct ClientName(String);

impl ClientName {
    /// Creates a new name from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Name cannot be empty".to_owned()));
        }
        if s.len() > MAX_FIELD_LENGTH {
            return Err(ModelError("Name is too long".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the name.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A client's national identification number.
///
/// Stored verbatim as entered.  Formats vary across issuing countries so validation only
/// bounds the length; in particular an 11-digit PESEL must survive a round trip through the
/// database without any reformatting.
#[derive(Clone, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
#[serde(transparent)]
pub(crate) struct Pesel(String);

impl Pesel {
    /// Creates a new national id from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("National id cannot be empty".to_owned()));
        }
        if s.len() > MAX_FIELD_LENGTH {
            return Err(ModelError("National id is too long".to_owned()));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the national id.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A date encoded as an 8-digit YYYYMMDD integer, which is how the `client_trips` table
/// tracks registration and payment dates.
///
/// We store this as an `u32` but guarantee that it is usable in an `i32` context because the
/// database backends need it, and that it decomposes into a real calendar date.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub(crate) struct DateCode(u32);

impl DateCode {
    /// Encodes the calendar date `date`.
    pub(crate) fn from_date(date: Date) -> ModelResult<DateCode> {
        let year = match u32::try_from(date.year()) {
            Ok(year) if year <= 9999 => year,
            _ => return Err(ModelError(format!("Date {} cannot be encoded as YYYYMMDD", date))),
        };
        let code = year * 10_000 + u32::from(u8::from(date.month())) * 100 + u32::from(date.day());
        Ok(DateCode(code))
    }

    /// Creates a date code from an `i32` with range validation.
    pub(crate) fn from_i32(code: i32) -> ModelResult<DateCode> {
        match u32::try_from(code) {
            Ok(code) => DateCode::from_u32(code),
            Err(e) => Err(ModelError(format!("Date code cannot be represented: {}", e))),
        }
    }

    /// Creates a date code from an `u32`, making sure it decomposes into a valid date.
    pub(crate) fn from_u32(code: u32) -> ModelResult<DateCode> {
        if i32::try_from(code).is_err() {
            return Err(ModelError(format!("Date code {} cannot be represented", code)));
        }

        let year = i32::try_from(code / 10_000).expect("Value always fits after division");
        let month = u8::try_from((code / 100) % 100).expect("Value always fits after modulo");
        let day = u8::try_from(code % 100).expect("Value always fits after modulo");

        let month = Month::try_from(month)
            .map_err(|e| ModelError(format!("Date code {} is invalid: {}", code, e)))?;
        Date::from_calendar_date(year, month, day)
            .map_err(|e| ModelError(format!("Date code {} is invalid: {}", code, e)))?;

        Ok(DateCode(code))
    }

    /// Returns the date code as an `i32`.
    pub(crate) fn as_i32(&self) -> i32 {
        i32::try_from(self.0).expect("i32 compatibility validated at construction time")
    }
}

/// Details about a registered client.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct Client {
    /// Identifier of the client.
    id: ClientId,

    /// The client's first name.
    first_name: ClientName,

    /// The client's last name.
    last_name: ClientName,

    /// The client's contact email address.
    email: EmailAddress,

    /// The client's contact telephone number.
    telephone: Telephone,

    /// The client's national identification number.
    pesel: Pesel,
}

/// Details about an individual trip, as returned by the trip listings.
///
/// A trip spanning multiple countries yields one summary per country, mirroring the join
/// table, so the trip id alone is not unique within a listing.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct TripSummary {
    /// Identifier of the trip.
    id: TripId,

    /// Short display name of the trip.
    name: String,

    /// Free-form description of the trip.
    description: String,

    /// First day of the trip.
    date_from: Date,

    /// Last day of the trip.
    date_to: Date,

    /// Maximum number of clients that can be registered at once.
    max_people: u32,

    /// Name of a country the trip goes through.
    country_name: String,
}

/// Details about a trip that a specific client is registered for.
#[derive(Constructor, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientTripSummary {
    /// Identifier of the trip.
    id: TripId,

    /// Short display name of the trip.
    name: String,

    /// Free-form description of the trip.
    description: String,

    /// First day of the trip.
    date_from: Date,

    /// Last day of the trip.
    date_to: Date,

    /// Maximum number of clients that can be registered at once.
    max_people: u32,

    /// Name of a country the trip goes through.
    country_name: String,

    /// Day the client registered for the trip.
    registered_at: DateCode,

    /// Day the client paid for the trip, or the current date if not paid yet.
    payment_date: DateCode,
}

impl ClientTripSummary {
    /// Combines a trip summary with the registration details of one specific client.
    pub(crate) fn from_trip(
        trip: TripSummary,
        registered_at: DateCode,
        payment_date: DateCode,
    ) -> Self {
        Self {
            id: trip.id,
            name: trip.name,
            description: trip.description,
            date_from: trip.date_from,
            date_to: trip.date_to,
            max_people: trip.max_people,
            country_name: trip.country_name,
            registered_at,
            payment_date,
        }
    }
}
