// ── Entity identifier newtypes ──
//
// IDs are operator-visible strings (e.g. "SITE-20240101120000-AB12CD") minted
// at registration time and immutable afterwards. Each entity type gets its
// own newtype so a personnel ID can never be passed where a site ID belongs.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

id_newtype! {
    /// Identifier of a build site.
    SiteId
}

id_newtype! {
    /// Identifier of a field manager in the personnel pool.
    PersonnelId
}

id_newtype! {
    /// Identifier of a professional certificate in the certificate pool.
    CertificateId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_as_transparent_strings() {
        let id = SiteId::from("SITE-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SITE-1\"");
        let back: SiteId = serde_json::from_str("\"SITE-1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn display_is_the_raw_string() {
        assert_eq!(PersonnelId::from("MGR-7").to_string(), "MGR-7");
    }
}
