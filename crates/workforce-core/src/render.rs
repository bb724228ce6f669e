//! # Rendering Context
//!
//! Locale-dependent inputs to every column accessor and display-name lookup.
//!
//! Accessors used to receive a bare "is right-to-left" boolean. They now take
//! a [`RenderContext`] so further locale concerns (number formatting,
//! calendar system) can be added without touching every accessor signature.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Writing direction of the active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left-to-right (English).
    #[default]
    Ltr,
    /// Right-to-left (Arabic).
    Rtl,
}

impl std::str::FromStr for TextDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ltr" => Ok(TextDirection::Ltr),
            "rtl" => Ok(TextDirection::Rtl),
            other => Err(format!(
                "Unknown text direction: '{}'. Valid options: ltr, rtl",
                other
            )),
        }
    }
}

impl std::fmt::Display for TextDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextDirection::Ltr => write!(f, "ltr"),
            TextDirection::Rtl => write!(f, "rtl"),
        }
    }
}

/// Everything a column accessor may need to know about the viewer's locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    /// Writing direction.
    pub direction: TextDirection,

    /// BCP 47 locale tag, e.g. `en-US` or `ar-SA`.
    pub locale: String,
}

impl RenderContext {
    /// Left-to-right context for the given locale.
    pub fn ltr(locale: impl Into<String>) -> Self {
        RenderContext {
            direction: TextDirection::Ltr,
            locale: locale.into(),
        }
    }

    /// Right-to-left context for the given locale.
    pub fn rtl(locale: impl Into<String>) -> Self {
        RenderContext {
            direction: TextDirection::Rtl,
            locale: locale.into(),
        }
    }

    #[inline]
    pub fn is_rtl(&self) -> bool {
        self.direction == TextDirection::Rtl
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext::ltr("en-US")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("RTL".parse::<TextDirection>().unwrap(), TextDirection::Rtl);
        assert_eq!("ltr".parse::<TextDirection>().unwrap(), TextDirection::Ltr);
        assert!("up".parse::<TextDirection>().is_err());
    }

    #[test]
    fn test_context_constructors() {
        assert!(RenderContext::rtl("ar-SA").is_rtl());
        assert!(!RenderContext::ltr("en-GB").is_rtl());
        assert_eq!(RenderContext::default().locale, "en-US");
    }
}
