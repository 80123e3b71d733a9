//! Configuration module

mod site;

pub use site::CollectionConfig;
pub use site::InvalidPolicy;
pub use site::RenderConfig;
pub use site::SiteConfig;
