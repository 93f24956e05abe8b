//! Configuration module

mod site;

pub use site::SiteInfo;
pub use site::SiteSource;
pub use site::KNOWN_KEYS;
