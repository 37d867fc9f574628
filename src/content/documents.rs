//! Editorial documents served by the content API
//!
//! Field names follow the API's camelCase. Logos arrive as
//! `{ "asset": { "url": .. }, "alt": .. }` and are flattened to `Logo`.

use serde::{Deserialize, Deserializer, Serialize};

/// Alt text used when a logo has none
pub const DEFAULT_LOGO_ALT: &str = "Store logo";

/// Store name used by the fallback header and footer
pub const FALLBACK_STORE_NAME: &str = "Medusa Store";

/// A resolved logo image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Logo {
    /// Image URL
    pub url: String,
    /// Alternative text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Deserialize)]
struct AssetRef {
    url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogoWire {
    Flat {
        url: String,
        alt: Option<String>,
    },
    Asset {
        asset: Option<AssetRef>,
        alt: Option<String>,
    },
}

/// Accepts both the API's asset-reference shape and the flattened shape
/// this crate serializes. A logo without an asset URL is dropped.
fn deserialize_logo<'de, D>(deserializer: D) -> Result<Option<Logo>, D::Error>
where
    D: Deserializer<'de>,
{
    let wire = Option::<LogoWire>::deserialize(deserializer)?;
    Ok(match wire {
        Some(LogoWire::Flat { url, alt }) => Some(Logo { url, alt }),
        Some(LogoWire::Asset {
            asset: Some(AssetRef { url: Some(url) }),
            alt,
        }) => Some(Logo {
            url,
            alt: Some(alt.unwrap_or_else(|| DEFAULT_LOGO_ALT.to_string())),
        }),
        _ => None,
    })
}

/// Treats an explicit `null` like a missing key. Projections return `null`
/// for attributes an editor never filled in.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A navigation link in the header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub href: String,
}

/// One line of marquee text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqueeText {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

/// Scrolling announcement bar above the header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marquee {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text1: Option<MarqueeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text2: Option<MarqueeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text3: Option<MarqueeText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_on_hover: Option<bool>,
}

impl Marquee {
    /// Texts that are switched on, in display order
    pub fn active_texts(&self) -> Vec<&str> {
        if !self.enabled {
            return Vec::new();
        }
        [&self.text1, &self.text2, &self.text3]
            .into_iter()
            .flatten()
            .filter(|text| text.enabled && !text.content.is_empty())
            .map(|text| text.content.as_str())
            .collect()
    }
}

/// Site header copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_logo",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo: Option<Logo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<Vec<NavLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marquee: Option<Marquee>,
}

impl Header {
    /// Header served when the content API is unreachable and nothing is cached
    pub fn fallback() -> Self {
        let nav = |name: &str, href: &str| NavLink {
            name: name.to_string(),
            href: href.to_string(),
        };
        Self {
            store_name: Some(FALLBACK_STORE_NAME.to_string()),
            navigation: Some(vec![
                nav("Home", "/"),
                nav("Products", "/store"),
                nav("About us", "/about"),
                nav("Contact us", "/contact"),
            ]),
            ..Self::default()
        }
    }
}

/// A link inside a footer section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterLink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// A titled column of footer links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<FooterLink>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A social network link that can be toggled on and off
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMediaItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<SocialMediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<SocialMediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<SocialMediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<SocialMediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<SocialMediaItem>,
}

impl SocialMedia {
    /// `(network, url)` pairs for enabled networks that have a URL
    pub fn enabled_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("facebook", &self.facebook),
            ("instagram", &self.instagram),
            ("line", &self.line),
            ("youtube", &self.youtube),
            ("twitter", &self.twitter),
        ]
        .into_iter()
        .filter_map(|(network, item)| match item {
            Some(SocialMediaItem {
                enabled: true,
                url: Some(url),
            }) => Some((network, url.as_str())),
            _ => None,
        })
        .collect()
    }
}

/// Site footer copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_logo",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo: Option<Logo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<FooterSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl Footer {
    /// Footer served when the content API is unreachable and nothing is cached
    ///
    /// # Arguments
    /// * `year` - Year printed in the copyright line
    pub fn fallback(year: i32) -> Self {
        let link = |text: &str, url: &str| FooterLink {
            text: text.to_string(),
            url: url.to_string(),
        };
        Self {
            sections: Some(vec![
                FooterSection {
                    title: "Products".to_string(),
                    links: Some(vec![
                        link("All products", "/store"),
                        link("New arrivals", "/collections/new"),
                        link("On sale", "/collections/sale"),
                    ]),
                },
                FooterSection {
                    title: "Service".to_string(),
                    links: Some(vec![
                        link("Shipping", "/shipping"),
                        link("Returns", "/returns"),
                        link("Customer service", "/support"),
                    ]),
                },
            ]),
            copyright: Some(format!(
                "© {} {}. All rights reserved.",
                year, FALLBACK_STORE_NAME
            )),
            ..Self::default()
        }
    }
}

/// Marketing copy attached to a commerce product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCopy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

/// Header and footer fetched together for page chrome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub header: Header,
    pub footer: Footer,
}
