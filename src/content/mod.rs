//! Editorial content for the storefront
//!
//! This module contains the document types returned by the content API
//! (header, footer, product copy), the HTTP client that queries them, and a
//! service that serves them through the in-memory cache.

pub mod documents;
pub mod sanity;
pub mod service;

pub use documents::{
    ContactInfo, Footer, FooterLink, FooterSection, Header, Layout, Logo, Marquee, MarqueeText,
    NavLink, ProductCopy, SocialMedia, SocialMediaItem,
};
pub use sanity::{ContentError, SanityClient};
pub use service::ContentService;
