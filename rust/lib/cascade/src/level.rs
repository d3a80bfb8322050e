//! Selection tiers.
//!
//! A tier enum lists the ranks of one hierarchy, root first. The order of
//! `Level::ALL` is the cascade order; the derived `Ord` agrees with it.

use std::fmt;
use std::hash::Hash;

/// A fixed, totally ordered set of selection tiers.
pub trait Level: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every tier, root first. Never empty.
    const ALL: &'static [Self];

    /// Short snake_case name, e.g. `"city"`.
    fn key(self) -> &'static str;

    /// Human label, e.g. `"City"`.
    fn label(self) -> &'static str;

    /// Wire name of this tier's id, e.g. `"city_id"`.
    fn payload_key(self) -> &'static str;

    /// Position in [`ALL`](Self::ALL).
    fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    fn root() -> Self {
        Self::ALL[0]
    }

    fn leaf() -> Self {
        Self::ALL[Self::ALL.len() - 1]
    }

    /// The next deeper tier, if any.
    fn child(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The next shallower tier, if any.
    fn parent(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Look a tier up by `key()` or `payload_key()`, ignoring case.
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.iter().copied().find(|l| {
            l.key().eq_ignore_ascii_case(key) || l.payload_key().eq_ignore_ascii_case(key)
        })
    }
}

/// Declare a tier enum and its [`Level`] impl.
///
/// ```ignore
/// tiers! {
///     pub enum TenantTier {
///         City => "city", "City",
///         Tenant => "tenant", "Tenant",
///     }
/// }
/// ```
///
/// The payload key is the tier key with an `_id` suffix. The enum
/// (de)serializes as its key.
#[macro_export]
macro_rules! tiers {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => $key:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $variant ),+
        }

        impl $crate::Level for $name {
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn key(self) -> &'static str {
                match self { $( $name::$variant => $key ),+ }
            }

            fn label(self) -> &'static str {
                match self { $( $name::$variant => $label ),+ }
            }

            fn payload_key(self) -> &'static str {
                match self { $( $name::$variant => concat!($key, "_id") ),+ }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::Level::label(*self))
            }
        }

        impl $crate::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::serde::Serializer,
            {
                serializer.serialize_str($crate::Level::key(*self))
            }
        }

        impl<'de> $crate::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::serde::Deserializer<'de>,
            {
                let key = <::std::string::String as $crate::serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::Level>::from_key(&key).ok_or_else(|| {
                    <D::Error as $crate::serde::de::Error>::custom(
                        ::std::format!("unknown {} tier: {}", stringify!($name), key),
                    )
                })
            }
        }
    };
}

tiers! {
    /// City → Property → Unit → Tenant. Used by offers, payment plans and units.
    pub enum TenantTier {
        City => "city", "City",
        Property => "property", "Property",
        Unit => "unit", "Unit",
        Tenant => "tenant", "Tenant",
    }
}

tiers! {
    /// City → Property → Unit → Vendor. Used by the vendor task tracker.
    pub enum VendorTier {
        City => "city", "City",
        Property => "property", "Property",
        Unit => "unit", "Unit",
        Vendor => "vendor", "Vendor",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_navigation() {
        assert_eq!(TenantTier::root(), TenantTier::City);
        assert_eq!(TenantTier::leaf(), TenantTier::Tenant);
        assert_eq!(TenantTier::Property.index(), 1);
        assert_eq!(TenantTier::Property.child(), Some(TenantTier::Unit));
        assert_eq!(TenantTier::City.parent(), None);
        assert_eq!(TenantTier::Tenant.child(), None);
        assert!(TenantTier::City < TenantTier::Tenant);
    }

    #[test]
    fn keys() {
        assert_eq!(VendorTier::Vendor.key(), "vendor");
        assert_eq!(VendorTier::Vendor.payload_key(), "vendor_id");
        assert_eq!(TenantTier::from_key("unit_id"), Some(TenantTier::Unit));
        assert_eq!(TenantTier::from_key("Property"), Some(TenantTier::Property));
        assert_eq!(TenantTier::from_key("vendor"), None);
        assert_eq!(TenantTier::Unit.to_string(), "Unit");
    }

    #[test]
    fn serde_as_key() {
        assert_eq!(serde_json::to_string(&TenantTier::Unit).unwrap(), "\"unit\"");
        let t: VendorTier = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(t, VendorTier::Vendor);
        assert!(serde_json::from_str::<TenantTier>("\"vendor\"").is_err());
    }
}
