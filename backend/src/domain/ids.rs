//! UUID-backed identifiers for ledger rows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            utoipa::ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random (v4) identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s.trim())?))
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

uuid_identifier! {
    /// Identifier of a product row.
    ProductId
}

uuid_identifier! {
    /// Identifier of an employee.
    EmployeeId
}

uuid_identifier! {
    /// Identifier of a history log entry.
    HistoryLogId
}

uuid_identifier! {
    /// Correlates an assignment with its custody contract and eventual return.
    TransactionId
}

uuid_identifier! {
    /// Identifier of a category.
    CategoryId
}

uuid_identifier! {
    /// Identifier of a signed contract row.
    ContractId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_trimmed_uuid_text() {
        let id: ProductId = " 00000000-0000-0000-0000-000000000001 "
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[rstest]
    fn rejects_malformed_text() {
        assert!("not-a-uuid".parse::<EmployeeId>().is_err());
    }

    #[rstest]
    fn orders_by_uuid_bytes() {
        let low = ProductId::from_uuid(Uuid::from_u128(1));
        let high = ProductId::from_uuid(Uuid::from_u128(2));
        assert!(low < high);
    }
}
