use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// A single capability an [Scope] rule can grant over a matching href prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    /// Read a STAC JSON document.
    ReadStac,
    /// Read an asset's bytes.
    ReadAsset,
    /// Write a STAC JSON document.
    WriteStac,
    /// Write an asset's bytes.
    WriteAsset,
}

impl Permission {
    fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadStac => "read-stac",
            Permission::ReadAsset => "read-asset",
            Permission::WriteStac => "write-stac",
            Permission::WriteAsset => "write-asset",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of href prefixes an IO instance is permitted to read from or
/// write to, and with which permissions.
///
/// Rules are matched longest-prefix-first: the most specific matching
/// prefix wins, regardless of the order rules were added in. A rule for
/// `base_href` is always present, granting full read/write access, so that
/// a freshly-constructed scope behaves as a normal same-repository IO.
#[derive(Debug, Clone)]
pub struct Scope {
    base_href: String,
    rules: Vec<(String, BTreeSet<Permission>)>,
}

const FULL_ACCESS: [Permission; 4] = [
    Permission::ReadStac,
    Permission::ReadAsset,
    Permission::WriteStac,
    Permission::WriteAsset,
];

impl Scope {
    /// Creates a scope rooted at `base_href` with full read/write access
    /// under that prefix and nothing else.
    pub fn new(base_href: impl Into<String>) -> Scope {
        let base_href = base_href.into();
        let rules = vec![(base_href.clone(), FULL_ACCESS.into_iter().collect())];
        Scope { base_href, rules }
    }

    /// This scope's base href.
    pub fn base_href(&self) -> &str {
        &self.base_href
    }

    /// Grants `permissions` to every href starting with `prefix`.
    ///
    /// Later calls for a more specific (longer) prefix win over earlier,
    /// shorter ones when both match the same href.
    pub fn allow(
        mut self,
        prefix: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Scope {
        self.rules
            .push((prefix.into(), permissions.into_iter().collect()));
        self
    }

    /// Grants read-only STAC access under `http://` and `https://`, the
    /// shape a default IO needs "when explicitly enabled for out-of-scope
    /// ingestion".
    pub fn allow_out_of_scope_reads(self) -> Scope {
        self.allow("http://", [Permission::ReadStac, Permission::ReadAsset])
            .allow("https://", [Permission::ReadStac, Permission::ReadAsset])
    }

    fn permitted(&self, href: &str, permission: Permission) -> bool {
        self.rules
            .iter()
            .filter(|(prefix, _)| href.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .is_some_and(|(_, permissions)| permissions.contains(&permission))
    }

    /// Checks that `href` is permitted to receive `permission`, returning
    /// [Error::OutOfScope] if not.
    pub fn check(&self, href: &str, permission: Permission) -> Result<()> {
        if self.permitted(href, permission) {
            Ok(())
        } else {
            Err(Error::OutOfScope {
                href: href.to_string(),
                operation: permission.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_href_is_read_write() {
        let scope = Scope::new("/repo");
        assert!(scope.check("/repo/catalog.json", Permission::ReadStac).is_ok());
        assert!(scope.check("/repo/catalog.json", Permission::WriteStac).is_ok());
    }

    #[test]
    fn outside_base_is_denied() {
        let scope = Scope::new("/repo");
        assert!(matches!(
            scope.check("/elsewhere/item.json", Permission::ReadStac),
            Err(Error::OutOfScope { .. })
        ));
    }

    #[test]
    fn out_of_scope_reads_are_read_only() {
        let scope = Scope::new("/repo").allow_out_of_scope_reads();
        assert!(
            scope
                .check("https://stac.test/item.json", Permission::ReadStac)
                .is_ok()
        );
        assert!(
            scope
                .check("https://stac.test/item.json", Permission::WriteStac)
                .is_err()
        );
    }

    #[test]
    fn longest_prefix_wins() {
        let scope = Scope::new("/repo").allow("/repo/locked", []);
        assert!(scope.check("/repo/open.json", Permission::WriteStac).is_ok());
        assert!(
            scope
                .check("/repo/locked/item.json", Permission::WriteStac)
                .is_err()
        );
    }
}
