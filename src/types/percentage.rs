// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type used by dimming level and roller position commands.

use std::fmt;

use crate::error::ValueError;

/// A percentage in the range 0-100.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::Percentage;
///
/// let level = Percentage::new(75).unwrap();
/// assert_eq!(level.value(), 75);
/// assert!(Percentage::new(101).is_err());
/// assert_eq!(Percentage::clamped(150), Percentage::MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(u8);

impl Percentage {
    /// 0%.
    pub const MIN: Self = Self(0);

    /// 100%.
    pub const MAX: Self = Self(100);

    /// Creates a new percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a percentage, clamping values above 100.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for anything above 0%.
    #[must_use]
    pub const fn is_nonzero(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percentage {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
