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

//! Database abstraction to manipulate clients, trips and registrations.

use crate::model::{
    Client, ClientId, ClientName, ClientTripSummary, DateCode, Pesel, TripId, TripSummary,
};
use futures::TryStreamExt;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use time::Date;
#[cfg(feature = "postgres")]
use tripdesk_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use tripdesk_core::db::sqlite;
use tripdesk_core::db::{DbError, DbResult, Executor};
use tripdesk_core::model::{EmailAddress, Telephone};


/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Converts a raw trip capacity loaded from the database into its model representation.
fn to_capacity(max_people: i32) -> DbResult<u32> {
    u32::try_from(max_people).map_err(|e| {
        DbError::DataIntegrityError(format!("Invalid max_people {}: {}", max_people, e))
    })
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for TripSummary {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(postgres::map_sqlx_error)?;
        let date_from: Date = row.try_get("date_from").map_err(postgres::map_sqlx_error)?;
        let date_to: Date = row.try_get("date_to").map_err(postgres::map_sqlx_error)?;
        let max_people: i32 = row.try_get("max_people").map_err(postgres::map_sqlx_error)?;
        let country_name: String =
            row.try_get("country_name").map_err(postgres::map_sqlx_error)?;

        let max_people = to_capacity(max_people)?;

        Ok(TripSummary::new(
            TripId::new(id),
            name,
            description,
            date_from,
            date_to,
            max_people,
            country_name,
        ))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for TripSummary {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i32 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(sqlite::map_sqlx_error)?;
        let date_from: Date = row.try_get("date_from").map_err(sqlite::map_sqlx_error)?;
        let date_to: Date = row.try_get("date_to").map_err(sqlite::map_sqlx_error)?;
        let max_people: i32 = row.try_get("max_people").map_err(sqlite::map_sqlx_error)?;
        let country_name: String = row.try_get("country_name").map_err(sqlite::map_sqlx_error)?;

        let max_people = to_capacity(max_people)?;

        Ok(TripSummary::new(
            TripId::new(id),
            name,
            description,
            date_from,
            date_to,
            max_people,
            country_name,
        ))
    }
}

/// Creates a new client with the given contact details and returns it with its newly-assigned
/// id.  Uniqueness of the fields is not enforced: two clients that share contact details are
/// still two different clients.
pub(crate) async fn create_client(
    ex: &mut Executor,
    first_name: ClientName,
    last_name: ClientName,
    email: EmailAddress,
    telephone: Telephone,
    pesel: Pesel,
) -> DbResult<Client> {
    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO clients (first_name, last_name, email, telephone, pesel)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id";
            let row = sqlx::query(query_str)
                .bind(first_name.as_str())
                .bind(last_name.as_str())
                .bind(email.as_str())
                .bind(telephone.as_str())
                .bind(pesel.as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
            id
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO clients (first_name, last_name, email, telephone, pesel)
                VALUES (?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(first_name.as_str())
                .bind(last_name.as_str())
                .bind(email.as_str())
                .bind(telephone.as_str())
                .bind(pesel.as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let id = done.last_insert_rowid();
            i32::try_from(id)
                .map_err(|e| DbError::DataIntegrityError(format!("Invalid id {}: {}", id, e)))?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Client::new(ClientId::new(id), first_name, last_name, email, telephone, pesel))
}

/// Checks whether the client `client_id` exists.
pub(crate) async fn client_exists(ex: &mut Executor, client_id: ClientId) -> DbResult<bool> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT id FROM clients WHERE id = $1";
            let maybe_row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(maybe_row.is_some())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id FROM clients WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(maybe_row.is_some())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the summaries of all known trips, one per (trip, country) pair, ordered by trip id
/// and country name.  An empty catalog yields an empty vector, not an error.
pub(crate) async fn list_trips(ex: &mut Executor) -> DbResult<Vec<TripSummary>> {
    let mut summaries = vec![];

    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT
                    t.id, t.name, t.description, t.date_from, t.date_to, t.max_people,
                    c.name AS country_name
                FROM trips AS t
                JOIN trip_countries AS tc ON tc.trip_id = t.id
                JOIN countries AS c ON c.id = tc.country_id
                ORDER BY t.id ASC, c.name ASC";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                summaries.push(TripSummary::try_from(row)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT
                    t.id, t.name, t.description, t.date_from, t.date_to, t.max_people,
                    c.name AS country_name
                FROM trips AS t
                JOIN trip_countries AS tc ON tc.trip_id = t.id
                JOIN countries AS c ON c.id = tc.country_id
                ORDER BY t.id ASC, c.name ASC";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                summaries.push(TripSummary::try_from(row)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }

    Ok(summaries)
}

/// Gets the summaries of the trips that the client `client_id` is registered for, one per
/// (trip, country) pair, ordered by trip id and country name.
///
/// Registrations that do not carry a payment date yet echo `today` instead.  The caller
/// supplies the date so that the substitution follows the service's clock and not the
/// database's.  An unregistered or unknown client yields an empty vector; existence policy
/// is the caller's concern.
pub(crate) async fn list_client_trips(
    ex: &mut Executor,
    client_id: ClientId,
    today: DateCode,
) -> DbResult<Vec<ClientTripSummary>> {
    /// Combines a decoded trip row with the raw registration columns, substituting `today`
    /// for a missing payment date.
    fn make_summary(
        trip: TripSummary,
        registered_at: i32,
        payment_date: Option<i32>,
        today: DateCode,
    ) -> DbResult<ClientTripSummary> {
        let registered_at = DateCode::from_i32(registered_at)?;
        let payment_date = match payment_date {
            Some(code) => DateCode::from_i32(code)?,
            None => today,
        };
        Ok(ClientTripSummary::from_trip(trip, registered_at, payment_date))
    }

    let mut summaries = vec![];

    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT
                    t.id, t.name, t.description, t.date_from, t.date_to, t.max_people,
                    c.name AS country_name, ct.registered_at, ct.payment_date
                FROM client_trips AS ct
                JOIN trips AS t ON t.id = ct.trip_id
                JOIN trip_countries AS tc ON tc.trip_id = t.id
                JOIN countries AS c ON c.id = tc.country_id
                WHERE ct.client_id = $1
                ORDER BY t.id ASC, c.name ASC";
            let mut rows = sqlx::query(query_str).bind(client_id.as_i32()).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                let registered_at: i32 =
                    row.try_get("registered_at").map_err(postgres::map_sqlx_error)?;
                let payment_date: Option<i32> =
                    row.try_get("payment_date").map_err(postgres::map_sqlx_error)?;
                let trip = TripSummary::try_from(row)?;
                summaries.push(make_summary(trip, registered_at, payment_date, today)?);
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT
                    t.id, t.name, t.description, t.date_from, t.date_to, t.max_people,
                    c.name AS country_name, ct.registered_at, ct.payment_date
                FROM client_trips AS ct
                JOIN trips AS t ON t.id = ct.trip_id
                JOIN trip_countries AS tc ON tc.trip_id = t.id
                JOIN countries AS c ON c.id = tc.country_id
                WHERE ct.client_id = ?
                ORDER BY t.id ASC, c.name ASC";
            let mut rows = sqlx::query(query_str).bind(client_id.as_i32()).fetch(ex.conn());
            while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                let registered_at: i32 =
                    row.try_get("registered_at").map_err(sqlite::map_sqlx_error)?;
                let payment_date: Option<i32> =
                    row.try_get("payment_date").map_err(sqlite::map_sqlx_error)?;
                let trip = TripSummary::try_from(row)?;
                summaries.push(make_summary(trip, registered_at, payment_date, today)?);
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }

    Ok(summaries)
}

/// Gets the maximum capacity of the trip `trip_id`, or `None` if the trip does not exist.
///
/// On PostgreSQL the read locks the trip row until the enclosing transaction completes so
/// that concurrent registrations for the same trip serialize.  SQLite admits a single writer
/// at a time, which provides the same guarantee.
pub(crate) async fn get_trip_capacity(
    ex: &mut Executor,
    trip_id: TripId,
) -> DbResult<Option<u32>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT max_people FROM trips WHERE id = $1 FOR UPDATE";
            let maybe_row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            match maybe_row {
                Some(row) => {
                    let max_people: i32 =
                        row.try_get("max_people").map_err(postgres::map_sqlx_error)?;
                    Ok(Some(to_capacity(max_people)?))
                }
                None => Ok(None),
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT max_people FROM trips WHERE id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match maybe_row {
                Some(row) => {
                    let max_people: i32 =
                        row.try_get("max_people").map_err(sqlite::map_sqlx_error)?;
                    Ok(Some(to_capacity(max_people)?))
                }
                None => Ok(None),
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Counts the clients currently registered for the trip `trip_id`.
pub(crate) async fn count_trip_registrations(ex: &mut Executor, trip_id: TripId) -> DbResult<u32> {
    let count = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM client_trips WHERE trip_id = $1";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let count: i64 = row.try_get("count").map_err(postgres::map_sqlx_error)?;
            count
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT COUNT(*) AS count FROM client_trips WHERE trip_id = ?";
            let row = sqlx::query(query_str)
                .bind(trip_id.as_i32())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            let count: i64 = row.try_get("count").map_err(sqlite::map_sqlx_error)?;
            count
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    u32::try_from(count)
        .map_err(|e| DbError::DataIntegrityError(format!("Invalid count {}: {}", count, e)))
}

/// Checks whether the client `client_id` is registered for the trip `trip_id`.
pub(crate) async fn is_client_registered(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
) -> DbResult<bool> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "SELECT client_id FROM client_trips WHERE client_id = $1 AND trip_id = $2";
            let maybe_row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            Ok(maybe_row.is_some())
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str =
                "SELECT client_id FROM client_trips WHERE client_id = ? AND trip_id = ?";
            let maybe_row = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(maybe_row.is_some())
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Registers the client `client_id` for the trip `trip_id` on the day `registered_at`,
/// with no payment date.
///
/// A duplicate registration surfaces as `DbError::AlreadyExists` through the table's
/// composite primary key.
pub(crate) async fn insert_registration(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
    registered_at: DateCode,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO client_trips (client_id, trip_id, registered_at)
                VALUES ($1, $2, $3)";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .bind(registered_at.as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO client_trips (client_id, trip_id, registered_at)
                VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .bind(registered_at.as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Deletes the registration of the client `client_id` for the trip `trip_id`.  Fails with
/// `DbError::NotFound` if the registration does not exist.
pub(crate) async fn delete_registration(
    ex: &mut Executor,
    client_id: ClientId,
    trip_id: TripId,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM client_trips WHERE client_id = $1 AND trip_id = $2";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM client_trips WHERE client_id = ? AND trip_id = ?";
            let done = sqlx::query(query_str)
                .bind(client_id.as_i32())
                .bind(trip_id.as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Test utilities to seed the read-only portion of the data model.
///
/// The service exposes no write path for trips or countries, so the tests insert them
/// directly at this level.
#[cfg(test)]
pub(crate) mod testutils {
    use super::*;

    /// Creates a country named `name` and returns its id.
    pub(crate) async fn create_country(ex: &mut Executor, name: &str) -> i32 {
        match ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "INSERT INTO countries (name) VALUES ($1) RETURNING id";
                let row =
                    sqlx::query(query_str).bind(name).fetch_one(ex.conn()).await.unwrap();
                row.try_get("id").unwrap()
            }

            Executor::Sqlite(ex) => {
                let query_str = "INSERT INTO countries (name) VALUES (?)";
                let done = sqlx::query(query_str).bind(name).execute(ex.conn()).await.unwrap();
                i32::try_from(done.last_insert_rowid()).unwrap()
            }
        }
    }

    /// Creates a trip with the given details and returns its id.  The trip is not associated
    /// with any country; use `link_trip_country` for that.
    pub(crate) async fn create_trip(
        ex: &mut Executor,
        name: &str,
        description: &str,
        date_from: Date,
        date_to: Date,
        max_people: u32,
    ) -> TripId {
        let max_people = i32::try_from(max_people).unwrap();
        match ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    INSERT INTO trips (name, description, date_from, date_to, max_people)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id";
                let row = sqlx::query(query_str)
                    .bind(name)
                    .bind(description)
                    .bind(date_from)
                    .bind(date_to)
                    .bind(max_people)
                    .fetch_one(ex.conn())
                    .await
                    .unwrap();
                TripId::new(row.try_get("id").unwrap())
            }

            Executor::Sqlite(ex) => {
                let query_str = "
                    INSERT INTO trips (name, description, date_from, date_to, max_people)
                    VALUES (?, ?, ?, ?, ?)";
                let done = sqlx::query(query_str)
                    .bind(name)
                    .bind(description)
                    .bind(date_from)
                    .bind(date_to)
                    .bind(max_people)
                    .execute(ex.conn())
                    .await
                    .unwrap();
                TripId::new(i32::try_from(done.last_insert_rowid()).unwrap())
            }
        }
    }

    /// Associates the trip `trip_id` with the country `country_id`.
    pub(crate) async fn link_trip_country(ex: &mut Executor, trip_id: TripId, country_id: i32) {
        match ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str =
                    "INSERT INTO trip_countries (trip_id, country_id) VALUES ($1, $2)";
                sqlx::query(query_str)
                    .bind(trip_id.as_i32())
                    .bind(country_id)
                    .execute(ex.conn())
                    .await
                    .unwrap();
            }

            Executor::Sqlite(ex) => {
                let query_str = "INSERT INTO trip_countries (trip_id, country_id) VALUES (?, ?)";
                sqlx::query(query_str)
                    .bind(trip_id.as_i32())
                    .bind(country_id)
                    .execute(ex.conn())
                    .await
                    .unwrap();
            }
        }
    }

    /// Sets the payment date of the existing registration of `client_id` for `trip_id`.
    pub(crate) async fn set_payment_date(
        ex: &mut Executor,
        client_id: ClientId,
        trip_id: TripId,
        payment_date: DateCode,
    ) {
        let rows_affected = match ex {
            #[cfg(feature = "postgres")]
            Executor::Postgres(ex) => {
                let query_str = "
                    UPDATE client_trips SET payment_date = $1
                    WHERE client_id = $2 AND trip_id = $3";
                sqlx::query(query_str)
                    .bind(payment_date.as_i32())
                    .bind(client_id.as_i32())
                    .bind(trip_id.as_i32())
                    .execute(ex.conn())
                    .await
                    .unwrap()
                    .rows_affected()
            }

            Executor::Sqlite(ex) => {
                let query_str = "
                    UPDATE client_trips SET payment_date = ?
                    WHERE client_id = ? AND trip_id = ?";
                sqlx::query(query_str)
                    .bind(payment_date.as_i32())
                    .bind(client_id.as_i32())
                    .bind(trip_id.as_i32())
                    .execute(ex.conn())
                    .await
                    .unwrap()
                    .rows_affected()
            }
        };
        assert_eq!(1, rows_affected);
    }
}
