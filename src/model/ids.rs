// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

// The surrounding CRUD layer hands us integer ids; these newtypes keep a
// page id from ever being used where a condition id is expected. Ids carry
// identity only; ordering between pages is carried by `position`, never
// by id.
macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifies a form (the transaction boundary for routing mutations).
    FormId
);
numeric_id!(
    /// Identifies a page within a form.
    PageId
);
numeric_id!(
    /// Identifies a routing condition (an overlay edge).
    ConditionId
);

#[cfg(test)]
mod tests {
    use super::{ConditionId, PageId};

    #[test]
    fn ids_display_as_their_numeric_value() {
        assert_eq!(PageId::new(42).to_string(), "42");
        assert_eq!(ConditionId::new(7).value(), 7);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = PageId::new(9);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "9");

        let back: PageId = serde_json::from_str("9").expect("deserialize");
        assert_eq!(back, id);
    }
}
