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

//! Common data types for all services.
//!
//! Types in this module (and in the service-specific `model` modules) use the newtype pattern to
//! wrap primitive types and guarantee that they carry valid data.  Constructors return a
//! `ModelResult` so that validation failures can float up the layers of the application.

use thiserror::Error;

mod emailaddress;
pub use emailaddress::EmailAddress;
mod telephone;
pub use telephone::Telephone;

/// Errors caused by invalid data when constructing model types.
#[derive(Debug, Error, PartialEq)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;
