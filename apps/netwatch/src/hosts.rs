use std::collections::HashSet;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use ipnet::Ipv4Net;
use tracing::{info, warn};

use crate::error::HostsError;

/// Written on first run when the hosts file is missing.
pub const DEFAULT_HOSTS: &str = "8.8.8.8\n1.1.1.1\ngoogle.com\n# 192.168.1.1-192.168.1.5\n";

/// Ceiling on how many addresses a single CIDR or range entry may
/// produce; oversized entries are skipped whole.
const MAX_EXPANSION: u64 = 256;

/// Load the hosts file (creating a default one if missing) and expand
/// its entries into the concrete target list.
pub fn load_targets(path: &Path) -> Result<Vec<String>, HostsError> {
    ensure_hosts_file(path)?;

    let raw = fs::read_to_string(path)?;
    let entries = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let targets = expand_targets(entries);
    if targets.is_empty() {
        return Err(HostsError::NoTargets { path: path.to_path_buf() });
    }
    Ok(targets)
}

fn ensure_hosts_file(path: &Path) -> Result<(), HostsError> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, DEFAULT_HOSTS)?;
    info!(path = %path.display(), "created default hosts file");
    Ok(())
}

/// Expand raw entries into concrete targets, deduplicated with
/// first-occurrence order preserved.
pub fn expand_targets<'a>(entries: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut targets = Vec::new();
    let mut seen = HashSet::new();

    for raw in entries {
        for target in expand_entry(clean_entry(raw.trim())) {
            if seen.insert(target.clone()) {
                targets.push(target);
            }
        }
    }
    targets
}

/// Strip a URI scheme and any path suffix that is not CIDR notation.
fn clean_entry(entry: &str) -> &str {
    let entry = entry
        .strip_prefix("https://")
        .or_else(|| entry.strip_prefix("http://"))
        .unwrap_or(entry);

    let Some((head, tail)) = entry.split_once('/') else {
        return entry;
    };
    // "/<digits>" is CIDR notation (validated during expansion); anything
    // else after the slash is a path suffix.
    let is_cidr = !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit());
    if is_cidr { entry } else { head }
}

fn expand_entry(entry: &str) -> Vec<String> {
    if entry.is_empty() {
        return Vec::new();
    }
    if entry.contains('/') {
        return expand_cidr(entry);
    }
    if entry.contains('-') {
        if let Some(expanded) = try_expand_range(entry) {
            return expanded;
        }
    }
    vec![entry.to_string()]
}

fn expand_cidr(entry: &str) -> Vec<String> {
    let net: Ipv4Net = match entry.parse() {
        Ok(net) => net,
        Err(_) => {
            warn!(entry, "invalid CIDR entry, skipping");
            return Vec::new();
        }
    };

    let addresses = 1u64 << (32 - net.prefix_len());
    if addresses > MAX_EXPANSION {
        warn!(entry, addresses, "CIDR block too large, skipping -- split it into /24 or smaller");
        return Vec::new();
    }

    net.hosts().map(|ip| ip.to_string()).collect()
}

/// `None` means the entry is not an address range (e.g. a hostname
/// containing a hyphen) and falls through to literal handling.
fn try_expand_range(entry: &str) -> Option<Vec<String>> {
    let (start, end) = entry.split_once('-')?;
    let start: Ipv4Addr = start.trim().parse().ok()?;
    let end: Ipv4Addr = end.trim().parse().ok()?;

    let (start, end) = (u32::from(start), u32::from(end));
    if end < start {
        warn!(entry, "range end precedes start, skipping");
        return Some(Vec::new());
    }
    if u64::from(end - start) > MAX_EXPANSION {
        warn!(entry, "address range too large, skipping");
        return Some(Vec::new());
    }

    Some((start..=end).map(|ip| Ipv4Addr::from(ip).to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(entries: &[&str]) -> Vec<String> {
        expand_targets(entries.iter().copied())
    }

    #[test]
    fn literals_pass_through() {
        assert_eq!(expand(&["8.8.8.8", "google.com"]), vec!["8.8.8.8", "google.com"]);
    }

    #[test]
    fn scheme_and_path_are_stripped() {
        assert_eq!(expand(&["https://example.com"]), vec!["example.com"]);
        assert_eq!(expand(&["http://example.com/health"]), vec!["example.com"]);
        // A CIDR suffix is not a path.
        assert_eq!(expand(&["192.168.0.0/30"]).len(), 2);
    }

    #[test]
    fn cidr_expands_to_usable_hosts_in_order() {
        let targets = expand(&["10.0.0.0/29"]);
        assert_eq!(
            targets,
            vec!["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5", "10.0.0.6"]
        );
    }

    #[test]
    fn slash_24_is_the_largest_accepted_block() {
        let targets = expand(&["192.168.1.0/24"]);
        assert_eq!(targets.len(), 254);
        assert_eq!(targets.first().map(String::as_str), Some("192.168.1.1"));
        assert_eq!(targets.last().map(String::as_str), Some("192.168.1.254"));

        assert!(expand(&["192.168.0.0/23"]).is_empty());
        assert!(expand(&["10.0.0.0/8"]).is_empty());
    }

    #[test]
    fn host_bits_in_cidr_are_ignored() {
        // Same network as 10.0.0.0/29.
        assert_eq!(expand(&["10.0.0.5/29"]), expand(&["10.0.0.0/29"]));
    }

    #[test]
    fn small_prefixes_include_all_addresses() {
        assert_eq!(expand(&["10.0.0.4/31"]), vec!["10.0.0.4", "10.0.0.5"]);
        assert_eq!(expand(&["10.0.0.7/32"]), vec!["10.0.0.7"]);
    }

    #[test]
    fn invalid_cidr_is_skipped_without_aborting() {
        assert_eq!(expand(&["10.0.0.0/99", "8.8.8.8"]), vec!["8.8.8.8"]);
        assert_eq!(expand(&["banana/24", "8.8.8.8"]), vec!["8.8.8.8"]);
    }

    #[test]
    fn range_expands_inclusively_ascending() {
        assert_eq!(
            expand(&["192.168.1.1-192.168.1.4"]),
            vec!["192.168.1.1", "192.168.1.2", "192.168.1.3", "192.168.1.4"]
        );
        assert_eq!(expand(&["10.0.0.9 - 10.0.0.9"]), vec!["10.0.0.9"]);
    }

    #[test]
    fn reversed_or_oversized_ranges_are_skipped() {
        assert!(expand(&["192.168.1.10-192.168.1.1"]).is_empty());
        assert!(expand(&["10.0.0.0-10.0.2.0"]).is_empty());
        // A numeric difference of exactly 256 is still accepted.
        assert_eq!(expand(&["10.0.0.0-10.0.1.0"]).len(), 257);
    }

    #[test]
    fn hyphenated_hostnames_are_literals() {
        assert_eq!(expand(&["my-host.example.com"]), vec!["my-host.example.com"]);
        assert_eq!(expand(&["10.0.0.1-not-an-ip"]), vec!["10.0.0.1-not-an-ip"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let targets = expand(&["10.0.0.2", "10.0.0.0/30", "10.0.0.2"]);
        assert_eq!(targets, vec!["10.0.0.2", "10.0.0.1"]);
    }

    #[test]
    fn loader_filters_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.txt");
        fs::write(&path, "# comment\n\n8.8.8.8\n  1.1.1.1  \n# 9.9.9.9\n").unwrap();

        let targets = load_targets(&path).unwrap();
        assert_eq!(targets, vec!["8.8.8.8", "1.1.1.1"]);
    }

    #[test]
    fn loader_bootstraps_a_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.txt");

        let targets = load_targets(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_HOSTS);
        assert_eq!(targets, vec!["8.8.8.8", "1.1.1.1", "google.com"]);
    }

    #[test]
    fn loader_fails_without_any_valid_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.txt");
        fs::write(&path, "# only comments\n10.0.0.0/8\n").unwrap();

        assert!(matches!(load_targets(&path), Err(HostsError::NoTargets { .. })));
    }
}
