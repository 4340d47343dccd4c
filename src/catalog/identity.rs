use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stable identifier for a single inventory item.
///
/// The same token is quoted in reservation DMs and used as the cart key, so it
/// is carried verbatim (after trimming) and never re-cased.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        ItemId(value.to_string())
    }
}

/// Garment category shown as a catalog chip.
///
/// Known variants keep serialization consistent; `Other` preserves whatever
/// the feed contained so soft validation can report it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Other(String),
}

/// Wear condition as graded by the shop.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Condition {
    New,
    VeryGood,
    Good,
    Fair,
    Other(String),
}

/// Listing lifecycle: available, then reserved, then sold.
///
/// Only a republished feed moves an item along; nothing in this crate mutates
/// a status.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    Available,
    Reserved,
    Sold,
    Other(String),
}

/// Intended audience; absent from feeds that predate the audience column.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Audience {
    Mens,
    Womens,
    Unisex,
    Other(String),
}

macro_rules! string_enum_serde {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    let value = String::deserialize(deserializer)?;
                    Ok(Self::from(value.as_str()))
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl $ty {
                /// True unless the value fell through to `Other`.
                pub fn is_known(&self) -> bool {
                    !matches!(self, $ty::Other(_))
                }
            }
        )+
    };
}

string_enum_serde!(Category, Condition, Status, Audience);

impl Category {
    pub const KNOWN: [Category; 3] = [Category::Tops, Category::Bottoms, Category::Outerwear];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Tops => "Tops",
            Category::Bottoms => "Bottoms",
            Category::Outerwear => "Outerwear",
            Category::Other(value) => value.as_str(),
        }
    }

    /// Coerce free-text feed input by case-insensitive prefix.
    ///
    /// `top…`, `bottom…` and `outer…` map to the known categories; anything
    /// else is kept as typed and will fail soft validation.
    pub fn normalize(input: &str) -> Self {
        let value = input.trim().to_lowercase();
        if value.starts_with("top") {
            Category::Tops
        } else if value.starts_with("bottom") {
            Category::Bottoms
        } else if value.starts_with("outer") {
            Category::Outerwear
        } else {
            Category::Other(input.to_string())
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "Tops" => Category::Tops,
            "Bottoms" => Category::Bottoms,
            "Outerwear" => Category::Outerwear,
            other => Category::Other(other.to_string()),
        }
    }
}

impl Condition {
    pub const KNOWN: [Condition; 4] = [
        Condition::New,
        Condition::VeryGood,
        Condition::Good,
        Condition::Fair,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Condition::New => "New",
            Condition::VeryGood => "Very Good",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Other(value) => value.as_str(),
        }
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        match value {
            "New" => Condition::New,
            "Very Good" => Condition::VeryGood,
            "Good" => Condition::Good,
            "Fair" => Condition::Fair,
            other => Condition::Other(other.to_string()),
        }
    }
}

impl Status {
    pub const KNOWN: [Status; 3] = [Status::Available, Status::Reserved, Status::Sold];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Available => "available",
            Status::Reserved => "reserved",
            Status::Sold => "sold",
            Status::Other(value) => value.as_str(),
        }
    }

    /// Available and reserved items are listed; everything else is not.
    pub fn is_listed(&self) -> bool {
        matches!(self, Status::Available | Status::Reserved)
    }

    pub fn is_sold(&self) -> bool {
        matches!(self, Status::Sold)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "available" => Status::Available,
            "reserved" => Status::Reserved,
            "sold" => Status::Sold,
            other => Status::Other(other.to_string()),
        }
    }
}

impl Audience {
    pub const KNOWN: [Audience; 3] = [Audience::Mens, Audience::Womens, Audience::Unisex];

    pub fn as_str(&self) -> &str {
        match self {
            Audience::Mens => "mens",
            Audience::Womens => "womens",
            Audience::Unisex => "unisex",
            Audience::Other(value) => value.as_str(),
        }
    }
}

impl From<&str> for Audience {
    fn from(value: &str) -> Self {
        match value {
            "mens" => Audience::Mens,
            "womens" => Audience::Womens,
            "unisex" => Audience::Unisex,
            other => Audience::Other(other.to_string()),
        }
    }
}
