//! Dependency listing text and its typed form
//!
//! A listing is line oriented:
//!
//! ```text
//! # uv 0.4.18
//! # submodules/typing-extensions 3f1c7e2d...
//! anyio==4.0.0
//! idna==3.4
//! <static no-deps lines>
//! ```
//!
//! Parsing keeps line-pattern matching but hands the reconciler structured
//! data instead of raw substrings.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Submodule revision comments
static SUBMODULE_PIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^# submodules/(?P<name>[^\s]+)\s(?P<rev>[^\s]+)$")
        .expect("valid submodule pin regex")
});

/// Pinned requirements. Names follow the packaging name format: ASCII letters,
/// digits and `._-`, starting and ending with a letter or digit.
static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?miR)^(?P<name>[A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])==(?P<version>.+)$")
        .expect("valid requirement regex")
});

/// A submodule path and the commit it is pinned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmodulePin {
    /// Path below `submodules/`
    pub name: String,
    /// Pinned commit SHA
    pub rev: String,
}

impl SubmodulePin {
    pub fn new(name: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rev: rev.into(),
        }
    }
}

impl fmt::Display for SubmodulePin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "# submodules/{} {}", self.name, self.rev)
    }
}

/// A `Name==Version` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl Requirement {
    /// Whether this requirement names the same package, ignoring case
    pub fn same_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

/// Parsed listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Version from the `# <resolver> <version>` comment, if present
    pub resolver_version: Option<String>,
    /// Submodule pins in listing order
    pub submodules: Vec<SubmodulePin>,
    /// Pinned requirements in listing order
    pub requirements: Vec<Requirement>,
}

/// Parses listings whose version comment names one resolver
#[derive(Debug, Clone)]
pub struct ListingParser {
    marker: Regex,
}

impl ListingParser {
    /// Parser for listings headed by `# <resolver> <version>`
    pub fn new(resolver: &str) -> Self {
        let marker = Regex::new(&format!(
            r"(?mR)^# {}\s(?P<version>.+)$",
            regex::escape(resolver)
        ))
        .expect("escaped resolver name forms a valid regex");
        Self { marker }
    }

    pub fn parse(&self, text: &str) -> Listing {
        let resolver_version = self
            .marker
            .captures(text)
            .map(|caps| caps["version"].trim().to_string());

        let submodules = SUBMODULE_PIN
            .captures_iter(text)
            .map(|caps| SubmodulePin::new(&caps["name"], &caps["rev"]))
            .collect();

        let requirements = REQUIREMENT
            .captures_iter(text)
            .map(|caps| Requirement {
                name: caps["name"].to_string(),
                version: caps["version"].trim_end().to_string(),
            })
            .collect();

        Listing {
            resolver_version,
            submodules,
            requirements,
        }
    }
}

impl Listing {
    /// Find a requirement by package name, ignoring case
    pub fn find(&self, name: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|req| req.same_name(name))
    }

    /// Whether the exact `Name==Version` pin is present
    pub fn contains(&self, requirement: &Requirement) -> bool {
        self.requirements
            .iter()
            .any(|req| req.same_name(&requirement.name) && req.version == requirement.version)
    }
}

/// Assemble listing text from its parts.
///
/// Lines are trimmed, joined with `\n` and terminated with a final `\n`.
pub fn compose(
    resolver: &str,
    resolver_version: &str,
    pins: &[SubmodulePin],
    resolved: &str,
    nodeps: &[String],
) -> String {
    let mut lines = Vec::with_capacity(1 + pins.len() + nodeps.len());
    lines.push(format!("# {} {}", resolver, resolver_version));
    lines.extend(pins.iter().map(ToString::to_string));
    lines.extend(resolved.lines().map(|line| line.trim().to_string()));
    lines.extend(nodeps.iter().map(|line| line.trim().to_string()));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uv() -> ListingParser {
        ListingParser::new("uv")
    }

    const LISTING: &str = "\
# uv 0.4.18
# submodules/foo abc123
# submodules/bar/baz def456
# This file was autogenerated by uv via the following command:
#    uv pip compile --resolution lowest-direct requirements/dev.in
Anyio==4.0.0
    # via -r requirements/dev.in
idna==3.4
zope.interface==6.0
";

    #[test]
    fn parses_resolver_version() {
        let listing = uv().parse(LISTING);
        assert_eq!(listing.resolver_version.as_deref(), Some("0.4.18"));
    }

    #[test]
    fn resolver_marker_requires_exact_name() {
        let listing = uv().parse("#    uv pip compile\n# uvx 1.0\n");
        assert_eq!(listing.resolver_version, None);
    }

    #[test]
    fn parses_submodule_pins_in_order() {
        let listing = uv().parse(LISTING);
        assert_eq!(
            listing.submodules,
            vec![
                SubmodulePin::new("foo", "abc123"),
                SubmodulePin::new("bar/baz", "def456"),
            ]
        );
    }

    #[test]
    fn parses_requirements_skipping_comments() {
        let listing = uv().parse(LISTING);
        let names: Vec<_> = listing.requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Anyio", "idna", "zope.interface"]);
        assert_eq!(listing.requirements[1].version, "3.4");
    }

    #[test]
    fn find_ignores_case() {
        let listing = uv().parse(LISTING);
        assert_eq!(listing.find("anyio").unwrap().version, "4.0.0");
        assert_eq!(listing.find("ANYIO").unwrap().to_string(), "Anyio==4.0.0");
        assert!(listing.find("requests").is_none());
    }

    #[test]
    fn contains_checks_version() {
        let listing = uv().parse(LISTING);
        let pinned = Requirement {
            name: "IDNA".to_string(),
            version: "3.4".to_string(),
        };
        let moved = Requirement {
            name: "idna".to_string(),
            version: "3.5".to_string(),
        };
        assert!(listing.contains(&pinned));
        assert!(!listing.contains(&moved));
    }

    #[test]
    fn names_with_edge_separators_are_not_requirements() {
        let listing = uv().parse("foo-==1.0\n_bar==2.0\n.baz==3.0\nok-name==4.0\nx==5\n");
        let names: Vec<_> = listing.requirements.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ok-name", "x"]);
    }

    #[test]
    fn compose_orders_parts_and_trims() {
        let text = compose(
            "uv",
            "0.4.18",
            &[SubmodulePin::new("foo", "abc123")],
            "anyio==4.0.0\n  idna==3.4  \n",
            &["-e submodules/foo ".to_string()],
        );
        assert_eq!(
            text,
            "# uv 0.4.18\n# submodules/foo abc123\nanyio==4.0.0\nidna==3.4\n-e submodules/foo\n"
        );
    }

    #[test]
    fn compose_then_parse_recovers_header() {
        let pins = [SubmodulePin::new("foo", "abc123")];
        let text = compose("uv", "0.4.18", &pins, "anyio==4.0.0\n", &[]);
        let listing = uv().parse(&text);
        assert_eq!(listing.resolver_version.as_deref(), Some("0.4.18"));
        assert_eq!(listing.submodules, pins);
        assert_eq!(listing.requirements.len(), 1);
    }

    #[test]
    fn parses_crlf_listing() {
        let listing = uv().parse("# uv 0.4.18\r\n# submodules/foo abc123\r\nanyio==4.0.0\r\n");
        assert_eq!(listing.resolver_version.as_deref(), Some("0.4.18"));
        assert_eq!(listing.submodules, vec![SubmodulePin::new("foo", "abc123")]);
        assert_eq!(listing.requirements.len(), 1);
        assert_eq!(listing.requirements[0].version, "4.0.0");
    }

    #[test]
    fn parser_reused_across_listings() {
        let parser = uv();
        assert_eq!(parser.parse("# uv 0.1.0\n").resolver_version.as_deref(), Some("0.1.0"));
        assert_eq!(parser.parse("# uv 0.2.0\n").resolver_version.as_deref(), Some("0.2.0"));
    }
}
