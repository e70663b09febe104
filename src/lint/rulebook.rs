use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use tracing::debug;

use super::{Report, Rule};
use crate::Directives;

const FIXED: &[(&str, &str)] = &[
    ("AuthenticationMethods", "publickey"),
    ("HostbasedAuthentication", "no"),
    ("IgnoreRhosts", "yes"),
    ("PasswordAuthentication", "no"),
    ("PermitEmptyPasswords", "no"),
    ("PermitRootLogin", "no"),
    ("Protocol", "2"),
    ("PubkeyAuthentication", "yes"),
    ("StrictModes", "yes"),
    ("UsePrivilegeSeparation", "yes"),
];

const RECOMMENDED: &[(&str, &[&str])] = &[
    (
        "HostKey",
        &["/etc/ssh/ssh_host_ed25519_key", "/etc/ssh/ssh_host_rsa_key"],
    ),
    (
        "KexAlgorithms",
        &[
            "curve25519-sha256@libssh.org",
            "diffie-hellman-group-exchange-sha256",
        ],
    ),
    (
        "Ciphers",
        &[
            "chacha20-poly1305@openssh.com",
            "aes256-gcm@openssh.com",
            "aes128-gcm@openssh.com",
            "aes256-ctr",
            "aes192-ctr",
            "aes128-ctr",
        ],
    ),
    (
        "MACs",
        &[
            "hmac-sha2-512-etm@openssh.com",
            "hmac-sha2-256-etm@openssh.com",
            "umac-128-etm@openssh.com",
            "hmac-sha2-512",
            "hmac-sha2-256",
            "umac-128@openssh.com",
        ],
    ),
];

const KNOWN_LISTS: &[(&str, &[&str])] = &[(
    "Ciphers",
    &[
        "3des-cbc",
        "aes128-cbc",
        "aes192-cbc",
        "aes256-cbc",
        "aes128-ctr",
        "aes192-ctr",
        "aes256-ctr",
        "arcfour128",
        "arcfour256",
        "arcfour",
        "blowfish-cbc",
        "cast128-cbc",
    ],
)];

const ENUMERATED: &[(&str, &[&str])] = &[
    ("AddressFamily", &["any", "inet", "inet6"]),
    ("Compression", &["yes", "no", "delayed"]),
    ("GatewayPorts", &["yes", "no", "clientspecified"]),
    (
        "LogLevel",
        &[
            "QUIET", "FATAL", "ERROR", "INFO", "VERBOSE", "DEBUG", "DEBUG1", "DEBUG2", "DEBUG3",
        ],
    ),
    (
        "PermitRootLogin",
        &["yes", "no", "forced-commands-only", "without-password"],
    ),
    ("PermitTunnel", &["yes", "no", "ethernet", "point-to-point"]),
    ("Protocol", &["1", "2", "1,2", "2,1"]),
    (
        "SyslogFacility",
        &[
            "DAEMON", "USER", "AUTH", "AUTHPRIV", "LOCAL0", "LOCAL1", "LOCAL2", "LOCAL3", "LOCAL4",
            "LOCAL5", "LOCAL6", "LOCAL7",
        ],
    ),
];

const INTEGERS: &[&str] = &[
    "ClientAliveCountMax",
    "ClientAliveInterval",
    "KeyRegenerationInterval",
    "LoginGraceTime",
    "MaxAuthTries",
    "MaxSessions",
    "MaxStartups",
    "Port",
    "ServerKeyBits",
    "X11DisplayOffset",
];

const BOOLEANS: &[&str] = &[
    "AllowAgentForwarding",
    "AllowTcpForwarding",
    "ChallengeResponseAuthentication",
    "GSSAPICleanupCredentials",
    "GSSAPIKeyExchange",
    "GSSAPIStrictAcceptorCheck",
    "HostbasedAuthentication",
    "HostbasedUsesNameFromPacketOnly",
    "IgnoreRhosts",
    "IgnoreUserKnownHosts",
    "KerberosAuthentication",
    "KerberosGetAFSToken",
    "KerberosOrLocalPasswd",
    "KerberosTicketCleanup",
    "KerberosUseKuserok",
    "PasswordAuthentication",
    "PermitEmptyPasswords",
    "PermitUserEnvironment",
    "PrintLastLog",
    "PrintMotd",
    "PubkeyAuthentication",
    "RhostsRSAAuthentication",
    "RSAAuthentication",
    "ShowPatchLevel",
    "StrictModes",
    "TCPKeepAlive",
    "UseDNS",
    "UseLogin",
    "UsePAM",
    "UsePrivilegeSeparation",
    "X11Forwarding",
    "X11UseLocalhost",
];

/// Directives that legitimately carry an empty value.
const MAY_BE_EMPTY: &[&str] = &["AuthorizedKeysCommand", "AuthorizedKeysCommandRunAs"];

/// Directives that may be declared more than once.
const MAY_REPEAT: &[&str] = &["AcceptEnv", "HostKey", "ListenAddress", "Port"];

static BEST_PRACTICES: LazyLock<Rulebook> = LazyLock::new(|| {
    let mut rulebook = Rulebook::new();

    for &(name, expected) in FIXED {
        rulebook.add_rule(name, Rule::Fixed(expected));
    }
    for &(name, allowed) in RECOMMENDED.iter().chain(KNOWN_LISTS) {
        rulebook.add_rule(name, Rule::CommaSubset(allowed));
    }
    for &(name, allowed) in ENUMERATED {
        rulebook.add_rule(name, Rule::OneOf(allowed));
    }
    for &name in INTEGERS {
        rulebook.add_rule(name, Rule::Integer);
    }
    for &name in BOOLEANS {
        rulebook.add_rule(name, Rule::Boolean);
    }
    for &name in MAY_BE_EMPTY {
        rulebook.allow_empty(name);
    }
    for &name in MAY_REPEAT {
        rulebook.allow_repeat(name);
    }

    debug!(directives = rulebook.rules.len(), "built best-practice rulebook");
    rulebook
});

/// A registry of validation rules keyed by directive name.
///
/// Every directive is implicitly subject to [`Rule::NonEmpty`] and
/// [`Rule::SingleValue`] unless it has been exempted with
/// [`Rulebook::allow_empty`] or [`Rulebook::allow_repeat`].
#[derive(Debug, Clone, Default)]
pub struct Rulebook {
    rules: HashMap<&'static str, Vec<Rule>>,
    may_be_empty: HashSet<&'static str>,
    may_repeat: HashSet<&'static str>,
}

impl Rulebook {
    /// An empty rulebook, applying only the implicit rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rulebook of sshd security best practices.
    #[must_use]
    pub fn best_practices() -> &'static Self {
        &BEST_PRACTICES
    }

    /// Register an explicit rule for a directive.
    pub fn add_rule(&mut self, name: &'static str, rule: Rule) -> &mut Self {
        self.rules.entry(name).or_default().push(rule);
        self
    }

    /// Exempt a directive from [`Rule::NonEmpty`].
    pub fn allow_empty(&mut self, name: &'static str) -> &mut Self {
        self.may_be_empty.insert(name);
        self
    }

    /// Exempt a directive from [`Rule::SingleValue`].
    pub fn allow_repeat(&mut self, name: &'static str) -> &mut Self {
        self.may_repeat.insert(name);
        self
    }

    /// Every rule that applies to the named directive, implicit rules last.
    pub fn rules_for(&self, name: &str) -> impl Iterator<Item = Rule> {
        let explicit = self.rules.get(name).map(Vec::as_slice).unwrap_or_default();
        let non_empty = (!self.may_be_empty.contains(name)).then_some(Rule::NonEmpty);
        let single_value = (!self.may_repeat.contains(name)).then_some(Rule::SingleValue);

        explicit
            .iter()
            .copied()
            .chain(non_empty)
            .chain(single_value)
    }

    /// Check every directive against its rules.
    ///
    /// All violations across all directives are collected. The directives are
    /// not modified.
    #[must_use]
    pub fn lint(&self, directives: &Directives) -> Report {
        let mut violations = Vec::new();

        for directive in directives {
            for rule in self.rules_for(directive.name()) {
                rule.check(directive, &mut violations);
            }
        }

        debug!(violations = violations.len(), "lint complete");
        Report::new(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_directive_gets_implicit_rules() {
        let rules: Vec<_> = Rulebook::best_practices().rules_for("Banner").collect();
        assert_eq!(rules, vec![Rule::NonEmpty, Rule::SingleValue]);
    }

    #[test]
    fn exemptions_remove_implicit_rules() {
        let rules: Vec<_> = Rulebook::best_practices()
            .rules_for("AuthorizedKeysCommand")
            .collect();
        assert_eq!(rules, vec![Rule::SingleValue]);

        let rules: Vec<_> = Rulebook::best_practices().rules_for("Port").collect();
        assert_eq!(rules, vec![Rule::Integer, Rule::NonEmpty]);
    }

    #[test]
    fn directive_can_carry_several_explicit_rules() {
        let rules: Vec<_> = Rulebook::best_practices()
            .rules_for("PermitRootLogin")
            .collect();
        assert!(rules.contains(&Rule::Fixed("no")));
        assert!(rules.iter().any(|rule| matches!(rule, Rule::OneOf(_))));

        let ciphers = Rulebook::best_practices()
            .rules_for("Ciphers")
            .filter(|rule| matches!(rule, Rule::CommaSubset(_)))
            .count();
        assert_eq!(ciphers, 2);
    }

    #[test]
    fn rule_lookup_is_case_sensitive() {
        let rules: Vec<_> = Rulebook::best_practices()
            .rules_for("permitrootlogin")
            .collect();
        assert_eq!(rules, vec![Rule::NonEmpty, Rule::SingleValue]);
    }

    #[test]
    fn custom_rulebook() {
        let mut rulebook = Rulebook::new();
        rulebook
            .add_rule("Banner", Rule::Fixed("none"))
            .allow_repeat("Banner");

        let directives: Directives = "Banner /etc/issue\nBanner none".parse().unwrap();
        let report = rulebook.lint(&directives);
        assert!(report.is_ok());

        let directives: Directives = "Banner none\nBanner /etc/issue".parse().unwrap();
        let report = rulebook.lint(&directives);
        assert_eq!(report.violations().len(), 1);
    }
}
