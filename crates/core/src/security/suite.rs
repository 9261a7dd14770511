//! The ordered list of input-validation tests
//!
//! Detection is plain substring and signature matching: a payload counts as reflected when it
//! appears verbatim (or in its JSON-string form) in the response body, and
//! backend errors are recognized by a fixed set of signatures. Encoded or
//! partial reflections are missed, and a server that legitimately echoes a
//! harmless payload is flagged.

use super::client::{FormClient, Reply};
use super::{TestFinding, TestResult};
use crate::error::ProbeError;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// One named test in the suite
pub struct SecurityTest {
    pub name: &'static str,
    pub description: &'static str,
    run: fn(&FormClient, &mut TestResult),
}

impl SecurityTest {
    pub fn run(&self, client: &FormClient) -> TestResult {
        let mut result = TestResult::new(self.name, self.description);
        (self.run)(client, &mut result);
        result.finish();
        result
    }
}

/// All tests, in execution order
pub fn tests() -> &'static [SecurityTest] {
    const TESTS: &[SecurityTest] = &[
        SecurityTest {
            name: "testXSSPrevention",
            description: "Script payloads must not be reflected unescaped",
            run: xss_prevention,
        },
        SecurityTest {
            name: "testSQLInjection",
            description: "SQL metacharacters must not surface database errors",
            run: sql_injection,
        },
        SecurityTest {
            name: "testNoSQLInjection",
            description: "Query-operator objects must be rejected in string fields",
            run: nosql_injection,
        },
        SecurityTest {
            name: "testCommandInjection",
            description: "Shell metacharacters must not execute commands",
            run: command_injection,
        },
        SecurityTest {
            name: "testPathTraversal",
            description: "Traversal sequences must not expose server files",
            run: path_traversal,
        },
        SecurityTest {
            name: "testXXEPrevention",
            description: "External XML entities must not be resolved",
            run: xxe_prevention,
        },
        SecurityTest {
            name: "testHeaderInjection",
            description: "CRLF sequences must not inject response headers",
            run: header_injection,
        },
        SecurityTest {
            name: "testInputLengthLimits",
            description: "Oversized fields must be rejected",
            run: input_length_limits,
        },
        SecurityTest {
            name: "testEmailValidation",
            description: "Malformed email addresses must be rejected",
            run: email_validation,
        },
        SecurityTest {
            name: "testCSRFProtection",
            description: "Form posts without a CSRF token or session must be rejected",
            run: csrf_protection,
        },
    ];
    TESTS
}

pub const XSS_PAYLOADS: &[&str] = &[
    r#"<script>alert("XSS")</script>"#,
    r#"<img src=x onerror=alert("XSS")>"#,
    r#"<svg onload=alert("XSS")>"#,
    r#""><script>alert(document.cookie)</script>"#,
    "javascript:alert('XSS')",
];

pub const SQL_PAYLOADS: &[&str] = &[
    "' OR '1'='1",
    "'; DROP TABLE users; --",
    "1' UNION SELECT NULL, NULL--",
    "admin'--",
];

pub const COMMAND_PAYLOADS: &[&str] = &["; ls -la", "| cat /etc/passwd", "`whoami`", "$(id)"];

pub const TRAVERSAL_PAYLOADS: &[&str] = &[
    "../../../etc/passwd",
    "..\\..\\..\\windows\\win.ini",
    "%2e%2e%2f%2e%2e%2f%2e%2e%2fetc%2fpasswd",
    "....//....//....//etc/passwd",
];

pub const HEADER_PAYLOADS: &[&str] = &[
    "test\r\nX-Injected: true",
    "test\r\nSet-Cookie: injected=true",
    "test%0d%0aX-Injected:%20true",
];

pub const INVALID_EMAILS: &[&str] = &[
    "not-an-email",
    "@example.com",
    "user@",
    "user@@example.com",
    "user@example..com",
    "user name@example.com",
];

const XXE_PAYLOAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE contact [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<contact><name>&xxe;</name><email>test@example.com</email><message>hello</message></contact>"#;

/// Field lengths that a contact form should never accept
const OVERSIZED_FIELDS: &[(&str, usize)] = &[("name", 10_000), ("message", 100_000)];

struct Signature {
    name: &'static str,
    regex: Regex,
}

fn signatures(
    cell: &'static OnceLock<Vec<Signature>>,
    table: &[(&'static str, &str)],
) -> &'static [Signature] {
    cell.get_or_init(|| {
        table
            .iter()
            .map(|&(name, pattern)| Signature {
                name,
                regex: Regex::new(pattern).unwrap(),
            })
            .collect()
    })
}

fn sql_errors() -> &'static [Signature] {
    static CELL: OnceLock<Vec<Signature>> = OnceLock::new();
    signatures(
        &CELL,
        &[
            ("MySQL error", r"(?i)you have an error in your sql syntax|mysql_fetch|mysqli?_"),
            ("PostgreSQL error", r"(?i)syntax error at or near|unterminated quoted string|pg::"),
            ("SQLite error", r"(?i)sqlite_error|sqlite3::|SQLITE_"),
            ("Oracle error", r"ORA-\d{5}"),
            ("SQLSTATE", r"SQLSTATE\[\w+\]"),
        ],
    )
}

fn nosql_errors() -> &'static [Signature] {
    static CELL: OnceLock<Vec<Signature>> = OnceLock::new();
    signatures(
        &CELL,
        &[
            ("MongoDB error", r"(?i)mongo(?:error|servererror)|E11000"),
            ("Mongoose cast error", r"CastError"),
            ("BSON error", r"(?i)bsontypeerror|invalid bson"),
        ],
    )
}

fn file_disclosure() -> &'static [Signature] {
    static CELL: OnceLock<Vec<Signature>> = OnceLock::new();
    signatures(
        &CELL,
        &[
            ("/etc/passwd contents", r"root:[x*]?:0:0:"),
            ("win.ini contents", r"(?i)\[(?:fonts|extensions)\]"),
        ],
    )
}

fn command_output() -> &'static [Signature] {
    static CELL: OnceLock<Vec<Signature>> = OnceLock::new();
    signatures(
        &CELL,
        &[
            ("id output", r"uid=\d+\(\w+\)\s+gid=\d+"),
            ("directory listing", r"(?m)^total \d+\s*$|[d-]rwx"),
            ("/etc/passwd contents", r"root:[x*]?:0:0:"),
        ],
    )
}

fn first_match<'a>(body: &'a str, sigs: &[Signature]) -> Option<(&'static str, &'a str)> {
    sigs.iter()
        .find_map(|s| s.regex.find(body).map(|m| (s.name, m.as_str())))
}

/// Payload found verbatim, or as it would appear inside a JSON string
pub fn is_reflected(body: &str, payload: &str) -> bool {
    if body.contains(payload) {
        return true;
    }
    match serde_json::to_string(payload) {
        Ok(quoted) => {
            let escaped = &quoted[1..quoted.len() - 1];
            escaped != payload && body.contains(escaped)
        }
        Err(_) => false,
    }
}

fn contact(name: &str, email: &str, message: &str) -> Value {
    json!({ "name": name, "email": email, "message": message })
}

/// Record a request error, or hand the reply to `inspect`
fn check(
    result: &mut TestResult,
    reply: Result<Reply, ProbeError>,
    inspect: impl FnOnce(&Reply) -> Option<String>,
    payload: &str,
) {
    match reply {
        Ok(reply) => {
            if let Some(evidence) = inspect(&reply) {
                result.flag(TestFinding {
                    payload: payload.to_string(),
                    evidence,
                });
            }
        }
        Err(e) => result.errors.push(e.to_string()),
    }
}

fn xss_prevention(client: &FormClient, result: &mut TestResult) {
    for payload in XSS_PAYLOADS {
        let reply = client.submit_contact(&contact(payload, "test@example.com", payload));
        check(
            result,
            reply,
            |r| is_reflected(&r.body, payload).then(|| "payload reflected unescaped in response body".to_string()),
            payload,
        );
    }
}

fn sql_injection(client: &FormClient, result: &mut TestResult) {
    for payload in SQL_PAYLOADS {
        let reply = client.submit_contact(&contact(payload, "test@example.com", payload));
        check(
            result,
            reply,
            |r| first_match(&r.body, sql_errors()).map(|(name, hit)| format!("{}: {}", name, hit)),
            payload,
        );
    }
}

fn nosql_injection(client: &FormClient, result: &mut TestResult) {
    let operators = [
        json!({ "$gt": "" }),
        json!({ "$ne": null }),
        json!({ "$regex": ".*" }),
        json!({ "$where": "sleep(1000)" }),
    ];

    for operator in operators {
        let payload = operator.to_string();
        let body = json!({ "name": "Test User", "email": operator, "message": "hello" });
        check(
            result,
            client.submit_contact(&body),
            |r| {
                if let Some((name, hit)) = first_match(&r.body, nosql_errors()) {
                    Some(format!("{}: {}", name, hit))
                } else if r.is_success() {
                    Some(format!("operator object accepted as email (HTTP {})", r.status))
                } else {
                    None
                }
            },
            &payload,
        );
    }
}

fn command_injection(client: &FormClient, result: &mut TestResult) {
    for payload in COMMAND_PAYLOADS {
        let message = format!("hello{}", payload);
        check(
            result,
            client.submit_contact(&contact("Test User", "test@example.com", &message)),
            |r| first_match(&r.body, command_output()).map(|(name, hit)| format!("{}: {}", name, hit)),
            payload,
        );
    }
}

fn path_traversal(client: &FormClient, result: &mut TestResult) {
    for payload in TRAVERSAL_PAYLOADS {
        check(
            result,
            client.submit_contact(&contact(payload, "test@example.com", payload)),
            |r| first_match(&r.body, file_disclosure()).map(|(name, hit)| format!("{}: {}", name, hit)),
            payload,
        );
    }
}

fn xxe_prevention(client: &FormClient, result: &mut TestResult) {
    check(
        result,
        client.submit_raw("application/xml", XXE_PAYLOAD.to_string()),
        |r| first_match(&r.body, file_disclosure()).map(|(name, hit)| format!("{}: {}", name, hit)),
        XXE_PAYLOAD,
    );
}

fn header_injection(client: &FormClient, result: &mut TestResult) {
    for payload in HEADER_PAYLOADS {
        check(
            result,
            client.submit_contact(&contact(payload, "test@example.com", "hello")),
            |r| {
                if r.header("x-injected").next().is_some() {
                    Some("X-Injected header present in response".to_string())
                } else if r.header("set-cookie").any(|c| c.contains("injected=")) {
                    Some("injected Set-Cookie present in response".to_string())
                } else {
                    None
                }
            },
            payload,
        );
    }
}

fn input_length_limits(client: &FormClient, result: &mut TestResult) {
    for &(field, length) in OVERSIZED_FIELDS {
        let mut body = contact("Test User", "test@example.com", "hello");
        body[field] = Value::String("A".repeat(length));
        let payload = format!("{} of {} characters", field, length);
        check(
            result,
            client.submit_contact(&body),
            |r| r.is_success().then(|| format!("oversized {} accepted (HTTP {})", field, r.status)),
            &payload,
        );
    }
}

fn email_validation(client: &FormClient, result: &mut TestResult) {
    for email in INVALID_EMAILS {
        check(
            result,
            client.submit_contact(&contact("Test User", email, "hello")),
            |r| r.is_success().then(|| format!("invalid email accepted (HTTP {})", r.status)),
            email,
        );
    }
}

fn csrf_protection(client: &FormClient, result: &mut TestResult) {
    let body = contact("Test User", "test@example.com", "CSRF probe");
    check(
        result,
        client.submit_contact_anonymously(&body),
        |r| {
            r.is_success()
                .then(|| format!("form accepted without token or session (HTTP {})", r.status))
        },
        "request without X-CSRF-Token",
    );
}
