use crate::error::XmlResultsSyntaxErrorKind;
use std::collections::BTreeSet;

/// The SPARQL results format versions accepted by default.
pub const DEFAULT_SUPPORTED_VERSIONS: [&str; 3] = ["1.1", "1.2", "1.2-basic"];

/// Which format versions a parser accepts.
///
/// A version is valid if it is in the supported set or if unsupported versions are permitted.
///
/// ```
/// use sparxml::VersionPolicy;
///
/// let policy = VersionPolicy::default();
/// assert!(policy.is_valid_version("1.2"));
/// assert!(!policy.is_valid_version("1.2-unknown"));
/// assert!(policy.permit_unsupported().is_valid_version("1.2-unknown"));
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct VersionPolicy {
    supported: BTreeSet<String>,
    permit_unsupported: bool,
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self {
            supported: DEFAULT_SUPPORTED_VERSIONS
                .into_iter()
                .map(str::to_owned)
                .collect(),
            permit_unsupported: false,
        }
    }
}

impl VersionPolicy {
    /// Replaces the set of supported versions.
    pub fn with_supported_versions(
        mut self,
        versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.supported = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Accepts any version.
    #[inline]
    pub fn permit_unsupported(mut self) -> Self {
        self.permit_unsupported = true;
        self
    }

    #[inline]
    pub fn is_valid_version(&self, version: &str) -> bool {
        self.permit_unsupported || self.supported.contains(version)
    }

    pub fn supported_versions(&self) -> impl Iterator<Item = &str> {
        self.supported.iter().map(String::as_str)
    }

    pub(crate) fn check(&self, version: &str) -> Result<(), XmlResultsSyntaxErrorKind> {
        if self.supported.contains(version) {
            Ok(())
        } else if self.permit_unsupported {
            tracing::warn!(version, "Accepting unsupported SPARQL results version");
            Ok(())
        } else {
            Err(XmlResultsSyntaxErrorKind::UnsupportedVersion(
                version.to_owned(),
            ))
        }
    }
}
