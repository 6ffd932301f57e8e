use crate::error::{ErrorKind, Result};

/// An addressable, optionally versioned reference to a data package.
///
/// The package name is `namespace/name` (e.g. `equilibrator/cache`). The
/// three selectors are optional and mutually informative; [`selector`]
/// collapses them with a fixed precedence.
///
/// [`selector`]: PackageSpec::selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    package: String,
    pub hash: Option<String>,
    pub tag: Option<String>,
    pub version: Option<String>,
}

impl PackageSpec {
    /// Create a spec for the latest revision of a package.
    ///
    /// Fails with [`InvalidSpec`](ErrorKind::InvalidSpec) unless the name is
    /// a non-empty `namespace/name` pair.
    pub fn new(package: impl Into<String>) -> Result<Self> {
        let package = package.into();
        let mut parts = package.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ns), Some(name), None) if !ns.is_empty() && !name.is_empty() => Ok(Self {
                package,
                hash: None,
                tag: None,
                version: None,
            }),
            _ => exn::bail!(ErrorKind::InvalidSpec(package)),
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Full `namespace/name` package name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The namespace and name halves, in that order.
    pub fn parts(&self) -> (&str, &str) {
        // new() guarantees exactly one separator.
        self.package.split_once('/').unwrap_or((&self.package, ""))
    }

    /// Collapse the selector triple into one selector.
    ///
    /// Precedence: hash beats tag beats version. A hash pins content
    /// exactly; tags and versions are mutable labels, so when several are
    /// given the most specific one wins.
    pub fn selector(&self) -> Selector<'_> {
        if let Some(hash) = &self.hash {
            Selector::Hash(hash)
        } else if let Some(tag) = &self.tag {
            Selector::Tag(tag)
        } else if let Some(version) = &self.version {
            Selector::Version(version)
        } else {
            Selector::Latest
        }
    }
}

impl std::fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.package)?;
        match self.selector() {
            Selector::Hash(hash) => write!(f, "@{hash}"),
            Selector::Tag(tag) => write!(f, ":{tag}"),
            Selector::Version(version) => write!(f, "={version}"),
            Selector::Latest => Ok(()),
        }
    }
}

/// A single collapsed revision selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Exact content hash of a revision.
    Hash(&'a str),
    /// A mutable label; may move between revisions over time.
    Tag(&'a str),
    /// A published version string.
    Version(&'a str),
    /// Whatever revision was published most recently.
    Latest,
}
