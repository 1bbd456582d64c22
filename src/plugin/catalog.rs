//! Plugins this crate provides, keyed by package name.

use super::Plugin;
use crate::sass::SassPlugin;

/// Package names resolving to the Sass plugin.
///
/// Komoe accepts both the distribution name and the module name.
pub const SASS_PACKAGES: &[&str] = &["komoe-sass", "komoe_sass"];

/// Create the plugin published as `package`, if this crate provides it.
pub fn instantiate(package: &str) -> Option<Box<dyn Plugin>> {
    let package = package.trim();
    if SASS_PACKAGES.contains(&package) {
        return Some(Box::new(SassPlugin::default()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_packages() {
        assert!(instantiate("komoe-sass").is_some());
        assert!(instantiate("komoe_sass").is_some());
        assert!(instantiate(" komoe-sass ").is_some());
    }

    #[test]
    fn test_unknown_package() {
        assert!(instantiate("komoe-katex").is_none());
        assert!(instantiate("").is_none());
    }
}
