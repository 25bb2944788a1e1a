use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version string is empty")]
    Empty,
    #[error("invalid version component {component:?} at position {index}")]
    InvalidComponent { index: usize, component: String },
}

/// Dot-separated sequence of numeric components.
///
/// Missing trailing components compare as zero, so `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    components: Vec<u64>,
}

impl SemanticVersion {
    #[must_use]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl FromStr for SemanticVersion {
    type Err = VersionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let components = value
            .split('.')
            .enumerate()
            .map(|(index, part)| parse_component(part).ok_or_else(|| invalid(index, part)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

fn invalid(index: usize, component: &str) -> VersionParseError {
    VersionParseError::InvalidComponent {
        index,
        component: component.to_string(),
    }
}

// `u64::from_str` accepts a leading `+`, which is not a valid component here.
fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

/// Returns `true` only when `latest` is strictly newer than `current`.
///
/// Unparsable input on either side is never reported as newer.
#[must_use]
pub fn is_newer_version(latest: &str, current: &str) -> bool {
    match (
        latest.parse::<SemanticVersion>(),
        current.parse::<SemanticVersion>(),
    ) {
        (Ok(latest), Ok(current)) => latest > current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_comparison() {
        assert!(is_newer_version("1.0.1", "1.0.0"));
        assert!(is_newer_version("1.1.0", "1.0.0"));
        assert!(is_newer_version("2.0.0", "1.9.9"));
        assert!(is_newer_version("1.2", "1.1.9"));
        assert!(is_newer_version("1", "0.99.0"));
        assert!(is_newer_version("1.0.0.1", "1.0.0"));
        assert!(!is_newer_version("1.0.0", "1.0.0"));
        assert!(!is_newer_version("1.2", "1.2.0"));
        assert!(!is_newer_version("1.2.0", "1.2"));
        assert!(!is_newer_version("1.0.0", "1.0.1"));
        assert!(!is_newer_version("0.9.0", "1.0.0"));
    }

    #[test]
    fn first_differing_component_decides() {
        assert!(is_newer_version("1.10.0", "1.9.99"));
        assert!(!is_newer_version("1.9.99", "1.10.0"));
        assert!(is_newer_version("3.0", "2.999.999.999"));
    }

    #[test]
    fn malformed_input_is_never_newer() {
        assert!(!is_newer_version("abc", "1.0.0"));
        assert!(!is_newer_version("2.0.0", "abc"));
        assert!(!is_newer_version("", "1.0.0"));
        assert!(!is_newer_version("2..0", "1.0.0"));
        assert!(!is_newer_version("2.0.0-beta", "1.0.0"));
        assert!(!is_newer_version("+2.0.0", "1.0.0"));
        assert!(!is_newer_version("v2.0.0", "1.0.0"));
        assert!(!is_newer_version("99999999999999999999999", "1.0.0"));
    }

    #[test]
    fn trailing_zeros_are_equal() {
        let short: SemanticVersion = "1.2".parse().expect("valid version");
        let long: SemanticVersion = "1.2.0.0".parse().expect("valid version");

        assert_eq!(short, long);
        assert_eq!(short.cmp(&long), Ordering::Equal);
    }

    #[test]
    fn parse_reports_offending_component() {
        let error = "1.x.3"
            .parse::<SemanticVersion>()
            .expect_err("non-numeric component should fail");

        assert_eq!(
            error,
            VersionParseError::InvalidComponent {
                index: 1,
                component: "x".to_string()
            }
        );
        assert_eq!(
            "".parse::<SemanticVersion>().expect_err("empty should fail"),
            VersionParseError::Empty
        );
    }

    #[test]
    fn display_normalizes_leading_zeros() {
        let version: SemanticVersion = "10.04.1".parse().expect("valid version");
        assert_eq!(version.to_string(), "10.4.1");
        assert_eq!(version.components(), &[10, 4, 1]);
    }
}
