use serde::{Deserialize, Serialize};

/// The three leading numeric components of a version string.
///
/// Field order matters: the derived `Ord` compares major, then minor, then
/// patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParsedVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl std::fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The coarsest component at which a newer version differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionDelta {
    None,
    Patch,
    Minor,
    Major,
    /// One of the versions could not be parsed.
    Unknown,
}

impl VersionDelta {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionDelta::None => "none",
            VersionDelta::Patch => "patch",
            VersionDelta::Minor => "minor",
            VersionDelta::Major => "major",
            VersionDelta::Unknown => "unknown",
        }
    }

    /// Position in the `none < patch < minor < major` order.
    ///
    /// `Unknown` is not comparable and has no rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            VersionDelta::None => Some(0),
            VersionDelta::Patch => Some(1),
            VersionDelta::Minor => Some(2),
            VersionDelta::Major => Some(3),
            VersionDelta::Unknown => None,
        }
    }
}

impl PartialOrd for VersionDelta {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self == other {
            return Some(std::cmp::Ordering::Equal);
        }
        Some(self.rank()?.cmp(&other.rank()?))
    }
}

impl std::fmt::Display for VersionDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses the leading `major.minor.patch` of a version string.
///
/// Whatever follows the third number (pre-release tags, build metadata,
/// range tails) is ignored. Returns `None` when the string does not start
/// with three dot-separated integers.
pub fn parse_version(s: &str) -> Option<ParsedVersion> {
    let mut rest = s;

    let major = take_number(&mut rest)?;
    rest = rest.strip_prefix('.')?;
    let minor = take_number(&mut rest)?;
    rest = rest.strip_prefix('.')?;
    let patch = take_number(&mut rest)?;

    Some(ParsedVersion {
        major,
        minor,
        patch,
    })
}

fn take_number(rest: &mut &str) -> Option<u64> {
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let (digits, tail) = rest.split_at(end);
    *rest = tail;
    digits.parse().ok()
}

/// Classifies how far `latest` is ahead of `current`.
///
/// A `current` that is ahead of `latest` is reported as [`VersionDelta::None`].
pub fn version_delta(current: &str, latest: &str) -> VersionDelta {
    let (Some(current), Some(latest)) = (parse_version(current), parse_version(latest)) else {
        return VersionDelta::Unknown;
    };

    if latest <= current {
        return VersionDelta::None;
    }

    if latest.major > current.major {
        VersionDelta::Major
    } else if latest.minor > current.minor {
        VersionDelta::Minor
    } else {
        VersionDelta::Patch
    }
}
