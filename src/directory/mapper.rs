//! Translation of GitHub reviewers into Discord identities.

use super::IdentityDirectory;

/// Result of mapping one reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedIdentity<'directory> {
    /// The reviewer has a Discord identity.
    Mapped(&'directory str),
    /// The reviewer is not in the directory and must be skipped.
    Unmapped,
}

/// Pure lookup of reviewers against a loaded directory.
#[derive(Debug, Clone, Copy)]
pub struct IdentityMapper<'directory> {
    directory: &'directory IdentityDirectory,
}

impl<'directory> IdentityMapper<'directory> {
    /// Creates a mapper over `directory`.
    #[must_use]
    pub const fn new(directory: &'directory IdentityDirectory) -> Self {
        Self { directory }
    }

    /// Maps a GitHub login to its Discord username.
    #[must_use]
    pub fn map(&self, host_username: &str) -> MappedIdentity<'directory> {
        self.directory
            .resolve(host_username)
            .map_or(MappedIdentity::Unmapped, MappedIdentity::Mapped)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{IdentityMapper, MappedIdentity};
    use crate::directory::IdentityDirectory;

    #[rstest]
    fn maps_known_reviewer_and_reports_unknown_one() {
        let directory = IdentityDirectory::from_pairs([("alice", "alice#1"), ("bob", "bob#2")])
            .expect("directory should build");
        let mapper = IdentityMapper::new(&directory);

        assert_eq!(mapper.map("alice"), MappedIdentity::Mapped("alice#1"));
        assert_eq!(mapper.map("carol"), MappedIdentity::Unmapped);
    }

    #[rstest]
    fn lookup_is_case_sensitive() {
        let directory =
            IdentityDirectory::from_pairs([("Alice", "alice#1")]).expect("directory should build");

        assert_eq!(
            IdentityMapper::new(&directory).map("alice"),
            MappedIdentity::Unmapped
        );
    }
}
