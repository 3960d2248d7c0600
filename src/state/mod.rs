// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property state tracking and change detection.
//!
//! Every decoded value passes through the [`ChangeDetector`], which keeps one
//! [`PropertyCell`] per property channel in a [`StateStore`] and forwards the
//! value to the sink only when it differs from the stored one.
//!
//! ```text
//! Unknown ──first value──▶ Known(v1) ──v2 != v1──▶ Known(v2)
//!                             │  ▲
//!                             └──┘ same value, no notification
//! ```

mod change_detector;
mod property_state;
mod store;
mod value_update;

pub use change_detector::ChangeDetector;
pub use property_state::{PropertyCell, PropertyState};
pub use store::{StateKey, StateStore};
pub use value_update::{PropertyValue, ValueKind, ValueUpdate};
