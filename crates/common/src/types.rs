use serde::{Deserialize, Serialize};

/// Declares an integer identifier newtype assigned by the backend.
///
/// Each identifier wraps the backend's numeric primary key so that product,
/// category and user keys cannot be mixed up at compile time.
macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from the backend's numeric key.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the underlying numeric key.
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

backend_id!(
    /// Identifies a catalog product (`id_producto`).
    ProductId
);

backend_id!(
    /// Identifies a catalog category (`id_categoria`).
    CategoryId
);

backend_id!(
    /// Identifies a product supplier (`id_proveedor`).
    SupplierId
);

backend_id!(
    /// Identifies a registered user (`id_usuario`).
    UserId
);

backend_id!(
    /// Identifies a completed purchase (`id_compra`).
    PurchaseId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_preserves_value() {
        let id = ProductId::new(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn product_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&ProductId::new(7)).unwrap();
        assert_eq!(json, "7");

        let id: ProductId = serde_json::from_str("7").unwrap();
        assert_eq!(id, ProductId::new(7));
    }

    #[test]
    fn ids_parse_from_cli_strings() {
        assert_eq!(" 12 ".parse::<CategoryId>().unwrap(), CategoryId::new(12));
        assert!("twelve".parse::<UserId>().is_err());
    }

    #[test]
    fn id_display_is_numeric() {
        assert_eq!(PurchaseId::new(1001).to_string(), "1001");
    }
}
