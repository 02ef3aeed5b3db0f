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

//! The `Telephone` data type.

use crate::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Maximum length of telephone numbers per the schema.
pub(crate) const MAX_TELEPHONE_LENGTH: usize = 120;

/// Separator characters tolerated within a telephone number.
const TELEPHONE_SEPARATORS: &str = " -().";

/// Represents a correctly-formatted telephone number.
///
/// Numbers are kept verbatim as entered, including any separators, because they are contact
/// details and not routing information.  Validation only guarantees that the string can plausibly
/// be dialed: an optional leading `+`, at least one digit, and nothing but digits and common
/// separators.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Telephone(String);

impl Telephone {
    /// Creates a new telephone number from an untrusted string `s`, making sure it is valid.
    pub fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        if s.trim().is_empty() {
            return Err(ModelError("Telephone number cannot be empty".to_owned()));
        }
        if s.len() > MAX_TELEPHONE_LENGTH {
            return Err(ModelError("Telephone number is too long".to_owned()));
        }

        let mut digits = 0;
        for ch in s.strip_prefix('+').unwrap_or(&s).chars() {
            if ch.is_ascii_digit() {
                digits += 1;
            } else if !TELEPHONE_SEPARATORS.contains(ch) {
                return Err(ModelError(format!(
                    "Unsupported character '{}' in telephone number '{}'",
                    ch, s
                )));
            }
        }
        if digits == 0 {
            return Err(ModelError(format!("Telephone number '{}' contains no digits", s)));
        }

        Ok(Self(s))
    }

    /// Creates a new telephone number from an untrusted string `s`, without validation.  Useful
    /// for testing purposes only.
    #[cfg(any(test, feature = "testutils"))]
    pub fn new_invalid<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns a string view of the telephone number.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(any(test, feature = "testutils"))]
impl From<&str> for Telephone {
    fn from(raw_telephone: &str) -> Self {
        Self::new(raw_telephone).expect("Hardcoded telephone numbers for testing must be valid")
    }
}

/// Visitor to deserialize a `Telephone` from a string.
struct TelephoneVisitor;

impl Visitor<'_> for TelephoneVisitor {
    type Value = Telephone;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(r#"a string with a telephone number"#)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match Telephone::new(v) {
            Ok(telephone) => Ok(telephone),
            Err(e) => Err(E::custom(format!("{}", e))),
        }
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match Telephone::new(v) {
            Ok(telephone) => Ok(telephone),
            Err(e) => Err(E::custom(format!("{}", e))),
        }
    }
}

impl<'de> Deserialize<'de> for Telephone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(TelephoneVisitor)
    }
}
