//! Well-known TCP service names.
//!
//! The table is built on first use and never mutated afterwards, so every
//! scanner worker can read it without synchronisation.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::UNKNOWN;

static SERVICE_TABLE: OnceLock<HashMap<u16, &'static str>> = OnceLock::new();

const SERVICES: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (13, "daytime"),
    (19, "chargen"),
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (37, "time"),
    (43, "whois"),
    (49, "tacacs"),
    (53, "domain"),
    (67, "bootps"),
    (68, "bootpc"),
    (69, "tftp"),
    (70, "gopher"),
    (79, "finger"),
    (80, "http"),
    (81, "hosts2-ns"),
    (88, "kerberos"),
    (102, "iso-tsap"),
    (110, "pop3"),
    (111, "rpcbind"),
    (113, "ident"),
    (119, "nntp"),
    (123, "ntp"),
    (135, "msrpc"),
    (137, "netbios-ns"),
    (138, "netbios-dgm"),
    (139, "netbios-ssn"),
    (143, "imap"),
    (161, "snmp"),
    (162, "snmptrap"),
    (179, "bgp"),
    (194, "irc"),
    (199, "smux"),
    (389, "ldap"),
    (427, "svrloc"),
    (443, "https"),
    (444, "snpp"),
    (445, "microsoft-ds"),
    (464, "kpasswd"),
    (465, "smtps"),
    (497, "retrospect"),
    (500, "isakmp"),
    (513, "login"),
    (514, "shell"),
    (515, "printer"),
    (520, "efs"),
    (523, "ibm-db2"),
    (530, "courier"),
    (543, "klogin"),
    (544, "kshell"),
    (548, "afp"),
    (554, "rtsp"),
    (563, "nntps"),
    (587, "submission"),
    (593, "http-rpc-epmap"),
    (623, "asf-rmcp"),
    (631, "ipp"),
    (636, "ldaps"),
    (646, "ldp"),
    (666, "doom"),
    (691, "resvc"),
    (749, "kerberos-adm"),
    (853, "domain-s"),
    (873, "rsync"),
    (902, "vmware-auth"),
    (989, "ftps-data"),
    (990, "ftps"),
    (992, "telnets"),
    (993, "imaps"),
    (995, "pop3s"),
    (1025, "nfs-or-iis"),
    (1080, "socks"),
    (1194, "openvpn"),
    (1433, "ms-sql-s"),
    (1434, "ms-sql-m"),
    (1521, "oracle"),
    (1723, "pptp"),
    (1883, "mqtt"),
    (1900, "upnp"),
    (2049, "nfs"),
    (2082, "cpanel"),
    (2083, "cpanel-ssl"),
    (2181, "zookeeper"),
    (2375, "docker"),
    (2376, "docker-ssl"),
    (3000, "ppp"),
    (3128, "squid-http"),
    (3268, "globalcatldap"),
    (3306, "mysql"),
    (3389, "ms-wbt-server"),
    (3690, "svn"),
    (4369, "epmd"),
    (5000, "upnp"),
    (5060, "sip"),
    (5061, "sip-tls"),
    (5353, "mdns"),
    (5432, "postgresql"),
    (5672, "amqp"),
    (5900, "vnc"),
    (5984, "couchdb"),
    (6379, "redis"),
    (6443, "kubernetes"),
    (6667, "irc"),
    (8000, "http-alt"),
    (8008, "http"),
    (8080, "http-proxy"),
    (8081, "blackice-icecap"),
    (8443, "https-alt"),
    (8883, "secure-mqtt"),
    (8888, "sun-answerbook"),
    (9000, "cslistener"),
    (9090, "zeus-admin"),
    (9100, "jetdirect"),
    (9200, "elasticsearch"),
    (9418, "git"),
    (10000, "snet-sensor-mgmt"),
    (11211, "memcache"),
    (27017, "mongod"),
    (32400, "plex"),
];

fn table() -> &'static HashMap<u16, &'static str> {
    SERVICE_TABLE.get_or_init(|| SERVICES.iter().copied().collect())
}

/// Conventional service name for `port`, if the table knows one.
pub fn lookup(port: u16) -> Option<&'static str> {
    table().get(&port).copied()
}

/// Conventional service name for `port`, or `unknown`.
pub fn service_name(port: u16) -> &'static str {
    lookup(port).unwrap_or(UNKNOWN)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
