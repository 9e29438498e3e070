//! Configuration module

mod site;

pub use site::LintConfig;
pub use site::SiteConfig;
