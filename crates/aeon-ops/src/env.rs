use std::env;
use std::sync::OnceLock;

static AEON_TRACE_TYPECHECK: OnceLock<bool> = OnceLock::new();

fn parse_bool(value: &str) -> bool {
    let normalized = value.trim().to_ascii_lowercase();
    matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
}

pub(crate) fn trace_typecheck_enabled() -> bool {
    *AEON_TRACE_TYPECHECK.get_or_init(|| match env::var("AEON_TRACE_TYPECHECK") {
        Ok(value) if !value.trim().is_empty() => parse_bool(&value),
        _ => false,
    })
}
