use alloc::string::{String, ToString};
use core::fmt;

/// Stable identity of an item, used for keying and id lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for ItemId {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for ItemId {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

/// Values past `i64::MAX` become their decimal string.
impl From<usize> for ItemId {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or_else(|_| Self::Str(v.to_string()), Self::Int)
    }
}

impl From<&str> for ItemId {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for ItemId {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// One entry of the windowed list.
///
/// `height`, when set, overrides whatever the list's height descriptor would return for this
/// item. Heights are in the same unit as scroll offsets and must be positive.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<T> {
    pub id: ItemId,
    pub data: T,
    pub height: Option<u32>,
}

impl<T> Item<T> {
    pub fn new(id: impl Into<ItemId>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            height: None,
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }
}
