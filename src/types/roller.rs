// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roller shutter motion state.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Motion state reported on `roller/<n>` topics.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::RollerState;
///
/// assert_eq!("open".parse::<RollerState>().unwrap(), RollerState::Opening);
/// assert_eq!(RollerState::Stopped.as_str(), "stop");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum RollerState {
    /// The roller is moving up.
    Opening,
    /// The roller is moving down.
    Closing,
    /// The roller is not moving.
    Stopped,
}

impl RollerState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Opening => "open",
            Self::Closing => "close",
            Self::Stopped => "stop",
        }
    }
}

impl fmt::Display for RollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollerState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Opening),
            "close" => Ok(Self::Closing),
            "stop" => Ok(Self::Stopped),
            _ => Err(ParseError::invalid_value(
                "roller state",
                format!("unknown roller state: {s}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wire_values() {
        assert_eq!("open".parse::<RollerState>().unwrap(), RollerState::Opening);
        assert_eq!("close".parse::<RollerState>().unwrap(), RollerState::Closing);
        assert_eq!("STOP".parse::<RollerState>().unwrap(), RollerState::Stopped);
    }

    #[test]
    fn parse_unknown_fails() {
        assert!("calibrating".parse::<RollerState>().is_err());
    }

    #[test]
    fn display_matches_wire() {
        for state in [RollerState::Opening, RollerState::Closing, RollerState::Stopped] {
            assert_eq!(state.to_string().parse::<RollerState>().unwrap(), state);
        }
    }
}
