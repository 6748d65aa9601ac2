use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::NotFound;

/// Rough estimate of how big a task is. `None` is a label of its own and is different from a
/// task that has no size at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum Size {
    None,
    S,
    M,
    L,
    XL,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::None, Size::S, Size::M, Size::L, Size::XL];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::None => "None",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
        }
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Size {
    type Err = NotFound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Size::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| NotFound::Size(s.to_string()))
    }
}

/// Older records keep an unset size as an empty string.
pub(crate) mod optional_size {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Size;

    pub fn serialize<S>(size: &Option<Size>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(size.map(|v| v.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Size>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(None);
        }
        s.parse().map(Some).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Size;
    use crate::error::NotFound;

    #[test]
    fn test_size_parse_ignores_case() {
        assert_eq!("xl".parse::<Size>(), Ok(Size::XL));
        assert_eq!(" None ".parse::<Size>(), Ok(Size::None));
        assert_eq!("m".parse::<Size>().map(|v| v.to_string()), Ok("M".into()));
    }

    #[test]
    fn test_size_parse_unknown() {
        assert_eq!("XXL".parse::<Size>(), Err(NotFound::Size("XXL".into())));
    }

    #[test]
    fn test_size_order_follows_labels() {
        let mut sizes = vec![Size::XL, Size::None, Size::M, Size::S, Size::L];
        sizes.sort();
        assert_eq!(sizes, Size::ALL);
    }
}
