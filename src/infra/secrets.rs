use std::panic;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_MARKERS: [&str; 7] = [
    "accesskey",
    "authorization",
    "signature=",
    "token=",
    "password",
    "secret",
    "sig=",
];

/// Words after which the next chunk is a credential.
const CREDENTIAL_PREFIXES: [&str; 2] = ["bearer", "hmac-sha256"];

pub fn redact_text(input: &str) -> String {
    let mut redact_next = false;

    input
        .split_whitespace()
        .map(|chunk| {
            let redact = redact_next || is_sensitive(chunk);
            redact_next = CREDENTIAL_PREFIXES
                .iter()
                .any(|prefix| chunk.eq_ignore_ascii_case(prefix));
            if redact {
                REDACTED.to_owned()
            } else {
                chunk.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "acs-chat panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("acs-chat panic: {}", scrubbed);
        }
    }));
}

fn is_sensitive(chunk: &str) -> bool {
    let lowered = chunk.to_ascii_lowercase();

    SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
        || looks_like_secret_value(chunk)
}

/// Long opaque runs of letters and digits, such as JWTs or base64 keys.
/// Communication identifiers (`8:acs:…`, `19:…`) are left alone.
fn looks_like_secret_value(value: &str) -> bool {
    let cleaned = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
    if cleaned.contains(':') {
        return false;
    }

    let has_mixed = cleaned.chars().any(|ch| ch.is_ascii_alphabetic())
        && cleaned.chars().any(|ch| ch.is_ascii_digit());

    cleaned.len() >= 24 && has_mixed
}
