//! Store-assigned numeric identifiers

use derive_more::Display;
use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Service (event) identifier
    ServiceId
);
numeric_id!(SongId);
numeric_id!(
    /// Outfit palette identifier; outfits have no table of their own
    OutfitId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&ServiceId::new(7)).unwrap(), "7");
        let song: SongId = serde_json::from_str("12").unwrap();
        assert_eq!(song.as_i64(), 12);
        assert_eq!(OutfitId::from(3).to_string(), "3");
    }
}
