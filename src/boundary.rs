use std::fmt;

/// Recoverable conditions hit while preparing a release.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The latest release could not be read, a fallback version is used
    LatestReleaseUnavailable { reason: String, fallback: String },
    /// Syncing with the remote failed, the local branch state is used
    PullFailed { remote: String, reason: String },
    /// The bump kind is not major, minor or patch; the version is kept
    UnknownBumpKind { kind: String },
    /// The search matched no merged pull requests
    NoPullRequests { query: String },
    /// The changelog has no `## [Unreleased]` heading to insert notes under
    MissingUnreleasedHeading { file: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::LatestReleaseUnavailable { reason, fallback } => {
                write!(
                    f,
                    "Cannot determine latest release ({}), using {}",
                    reason, fallback
                )
            }
            BoundaryWarning::PullFailed { remote, reason } => {
                write!(
                    f,
                    "Could not pull from remote '{}': {}. Using local branch data.",
                    remote, reason
                )
            }
            BoundaryWarning::UnknownBumpKind { kind } => {
                write!(
                    f,
                    "Unknown bump kind '{}' (expected major, minor or patch), version left unchanged",
                    kind
                )
            }
            BoundaryWarning::NoPullRequests { query } => {
                write!(f, "No merged pull requests match '{}'", query)
            }
            BoundaryWarning::MissingUnreleasedHeading { file } => {
                write!(
                    f,
                    "{} has no '## [Unreleased]' heading, changelog left unchanged",
                    file
                )
            }
        }
    }
}
