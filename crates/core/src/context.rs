//! Build invocation context
//!
//! The host build tool describes the current `prepare` run through a project
//! root and the option tokens of its command line. The context is built once
//! by the caller and only ever borrowed by the hook.

use crate::path::AbsPath;

/// Option token that marks a release build
pub const RELEASE_FLAG: &str = "--release";

/// Immutable description of one build-preparation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    project_root: AbsPath,
    options: Vec<String>,
    platforms: Vec<String>,
}

impl BuildContext {
    /// Create a context for the given project root with no options
    pub fn new(project_root: AbsPath) -> Self {
        Self {
            project_root,
            options: Vec::new(),
            platforms: Vec::new(),
        }
    }

    /// Set the command-line option tokens of the build invocation
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the platforms being prepared
    #[must_use]
    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    /// Root directory of the mobile-app project
    #[inline]
    pub fn project_root(&self) -> &AbsPath {
        &self.project_root
    }

    /// Option tokens of the current build invocation
    #[inline]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Platforms being prepared (may be empty when the host doesn't say)
    #[inline]
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    /// Whether any option token is exactly the given flag
    pub fn has_option(&self, flag: &str) -> bool {
        self.options.iter().any(|opt| opt == flag)
    }

    /// Whether this invocation builds a release artifact
    pub fn is_release(&self) -> bool {
        self.has_option(RELEASE_FLAG)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::path::PathBuf;

    fn root() -> AbsPath {
        AbsPath::new(PathBuf::from("/work/app")).unwrap()
    }

    #[test]
    fn test_release_flag_anywhere_in_options() {
        let ctx = BuildContext::new(root()).with_options(["--verbose", "android", "--release"]);
        assert!(ctx.is_release());

        let ctx = BuildContext::new(root()).with_options(["--release", "--device"]);
        assert!(ctx.is_release());
    }

    #[test]
    fn test_release_flag_requires_exact_token() {
        let ctx = BuildContext::new(root()).with_options(["--release=false", "--releases", "release"]);
        assert!(!ctx.is_release());
    }

    #[test]
    fn test_empty_options_is_debug_build() {
        let ctx = BuildContext::new(root());
        assert!(!ctx.is_release());
        assert!(ctx.options().is_empty());
        assert!(ctx.platforms().is_empty());
    }

    #[test]
    fn test_platforms_are_kept_in_order() {
        let ctx = BuildContext::new(root()).with_platforms(["ios", "android"]);
        assert_eq!(ctx.platforms(), ["ios", "android"]);
    }
}
