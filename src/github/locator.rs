//! Target parsing and identity wrappers for repository access.

use std::fmt;

use url::Url;

use super::error::IntakeError;

/// Public GitHub REST API base.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidPullRequestNumber` for zero.
    pub const fn new(value: u64) -> Result<Self, IntakeError> {
        if value == 0 {
            return Err(IntakeError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

fn parse_api_base(api_base: &str) -> Result<Url, IntakeError> {
    Url::parse(api_base).map_err(|error| IntakeError::InvalidUrl(error.to_string()))
}

/// Repository identity with the API base used to reach it.
///
/// # Example
///
/// ```
/// use nudger::RepositoryLocator;
///
/// let locator = RepositoryLocator::from_owner_repo("unikraft", "unikraft")
///     .expect("should build locator");
/// assert_eq!(locator.owner().as_str(), "unikraft");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator for `github.com`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, IntakeError> {
        Self::with_api_base(owner, repo, GITHUB_API_BASE)
    }

    /// Creates a repository locator served from an explicit API base, such
    /// as a GitHub Enterprise instance.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingPathSegments` when owner or repo is empty
    /// and `IntakeError::InvalidUrl` when the API base cannot be parsed.
    pub fn with_api_base(owner: &str, repo: &str, api_base: &str) -> Result<Self, IntakeError> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// API base URL for this repository.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    pub(crate) fn pulls_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn requested_reviewers_path(&self, number: PullRequestNumber) -> String {
        format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            self.owner.as_str(),
            self.repository.as_str(),
            number.get()
        )
    }
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// Repository to scan, optionally narrowed to one pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    repository: RepositoryLocator,
    pull_request: Option<PullRequestNumber>,
}

impl ReviewTarget {
    /// Creates a target covering every open pull request in `repository`.
    #[must_use]
    pub const fn repository(repository: RepositoryLocator) -> Self {
        Self {
            repository,
            pull_request: None,
        }
    }

    /// Creates a target narrowed to a single pull request.
    #[must_use]
    pub const fn pull_request(repository: RepositoryLocator, number: PullRequestNumber) -> Self {
        Self {
            repository,
            pull_request: Some(number),
        }
    }

    /// Parses an `ORG/REPO` or `ORG/REPO/PRID` argument against `api_base`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidTarget` when the argument does not have two
    /// or three non-empty segments, and `IntakeError::InvalidPullRequestNumber`
    /// when the third segment is not a positive integer.
    pub fn parse(input: &str, api_base: &str) -> Result<Self, IntakeError> {
        let invalid = || IntakeError::InvalidTarget {
            target: input.to_owned(),
        };
        let segments: Vec<&str> = input.trim().trim_matches('/').split('/').collect();

        let (owner, repo, number) = match segments.as_slice() {
            [owner, repo] => (*owner, *repo, None),
            [owner, repo, number] => (*owner, *repo, Some(*number)),
            _ => return Err(invalid()),
        };

        let repository =
            RepositoryLocator::with_api_base(owner, repo, api_base).map_err(|error| match error {
                IntakeError::MissingPathSegments => invalid(),
                other => other,
            })?;

        match number {
            None => Ok(Self::repository(repository)),
            Some(raw) => {
                let parsed = raw
                    .parse::<u64>()
                    .map_err(|_| IntakeError::InvalidPullRequestNumber)
                    .and_then(PullRequestNumber::new)?;
                Ok(Self::pull_request(repository, parsed))
            }
        }
    }

    /// Repository being scanned.
    #[must_use]
    pub const fn locator(&self) -> &RepositoryLocator {
        &self.repository
    }

    /// Single pull request to notify for, when narrowed.
    #[must_use]
    pub const fn only_pull_request(&self) -> Option<PullRequestNumber> {
        self.pull_request
    }
}
