// crates/optolink-rs/src/model/config.rs

//! Daemon configuration and the host access rule list.

use super::DeviceId;
use std::net::Ipv4Addr;

/// The `<config>` section of a compiled model.
#[derive(Debug)]
pub struct Config {
    /// `<serial><tty>`: serial device path.
    pub tty: String,
    /// `<net><port>`: network listen port.
    pub port: u16,
    /// `<logging><file>`: log file path.
    pub logfile: String,
    /// `<logging><syslog>`: forward log output to syslog.
    pub syslog: bool,
    /// `<logging><debug>`: verbose logging.
    pub debug: bool,
    /// `<device ID=...>`: the default device id, as written.
    pub device_id: String,
    /// The resolved default device; resolution failure fails the compile.
    pub default_device: DeviceId,
    /// `<allow>` rules, in declaration order.
    pub allows: Vec<Allow>,
}

/// One host access rule, derived from an `a.b.c.d[/len]` literal.
#[derive(Debug)]
pub struct Allow {
    /// The literal as written, kept for reporting.
    pub text: String,
    /// The rule's network address.
    pub addr: Ipv4Addr,
    /// Netmask derived from the CIDR suffix; /32 when omitted.
    pub mask: u32,
}

impl Allow {
    /// Builds a rule from an `a.b.c.d[/len]` literal. Returns `None` on a
    /// malformed literal; the caller skips the rule rather than failing.
    pub fn parse(text: &str) -> Option<Allow> {
        let (ip_part, size) = match text.split_once('/') {
            Some((ip, suffix)) => (ip, suffix.trim().parse::<u32>().ok()?),
            None => (text, 32),
        };
        if size > 32 {
            return None;
        }
        let addr: Ipv4Addr = ip_part.trim().parse().ok()?;
        let mask = if size == 0 { 0 } else { u32::MAX << (32 - size) };
        Some(Allow {
            text: text.to_string(),
            addr,
            mask,
        })
    }

    /// True if `candidate` falls inside this rule's network.
    pub fn matches(&self, candidate: Ipv4Addr) -> bool {
        (u32::from(self.addr) & self.mask) == (u32::from(candidate) & self.mask)
    }
}

impl Config {
    /// The first rule matching `candidate`, in declaration order.
    ///
    /// When no rule matches (including an empty list) the caller's own
    /// default policy applies; the dispatcher decides, not this crate.
    pub fn matching_allow(&self, candidate: Ipv4Addr) -> Option<&Allow> {
        self.allows.iter().find(|a| a.matches(candidate))
    }

    /// Convenience wrapper: true if some rule matched.
    pub fn is_allowed(&self, candidate: Ipv4Addr) -> bool {
        self.matching_allow(candidate).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(rules: &[&str]) -> Config {
        Config {
            tty: String::new(),
            port: 0,
            logfile: String::new(),
            syslog: false,
            debug: false,
            device_id: String::new(),
            default_device: DeviceId(0),
            allows: rules.iter().filter_map(|r| Allow::parse(r)).collect(),
        }
    }

    #[test]
    fn cidr_rule_matches_subnet() {
        let cfg = config_with(&["10.0.0.0/24"]);
        assert!(cfg.is_allowed(Ipv4Addr::new(10, 0, 0, 5)));
        assert!(!cfg.is_allowed(Ipv4Addr::new(10, 0, 1, 5)));
    }

    #[test]
    fn missing_suffix_means_host_rule() {
        let rule = Allow::parse("192.168.2.1").unwrap();
        assert_eq!(rule.mask, u32::MAX);
        assert!(rule.matches(Ipv4Addr::new(192, 168, 2, 1)));
        assert!(!rule.matches(Ipv4Addr::new(192, 168, 2, 2)));
    }

    #[test]
    fn zero_prefix_matches_everything() {
        let rule = Allow::parse("0.0.0.0/0").unwrap();
        assert!(rule.matches(Ipv4Addr::new(203, 0, 113, 9)));
    }

    #[test]
    fn malformed_literals_are_rejected() {
        assert!(Allow::parse("10.0.0.300/24").is_none());
        assert!(Allow::parse("10.0.0.0/33").is_none());
        assert!(Allow::parse("not-an-ip").is_none());
    }

    #[test]
    fn first_matching_rule_wins() {
        let cfg = config_with(&["10.0.0.0/24", "10.0.0.0/8"]);
        let hit = cfg.matching_allow(Ipv4Addr::new(10, 0, 0, 7)).unwrap();
        assert_eq!(hit.text, "10.0.0.0/24");
    }
}
