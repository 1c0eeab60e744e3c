//! Owner-name conversions between zone-relative and absolute forms.

/// `name` with exactly one trailing dot.
pub fn with_trailing_dot(name: &str) -> String {
    format!("{}.", name.trim_end_matches('.'))
}

fn is_in_zone(name: &str, bare_zone: &str) -> bool {
    let name = name.trim_end_matches('.');
    name.eq_ignore_ascii_case(bare_zone)
        || name
            .len()
            .checked_sub(bare_zone.len() + 1)
            .and_then(|at| name.get(at..))
            .is_some_and(|tail| {
                tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(bare_zone)
            })
}

/// Owner name as an absolute domain name with trailing dot.
///
/// `"@"` and `""` denote the apex. Names that already end in the zone are
/// only given a trailing dot:
///
/// - `"www"` + `"example.com."` → `"www.example.com."`
/// - `"@"` + `"example.com."` → `"example.com."`
/// - `"www.example.com"` + `"example.com."` → `"www.example.com."`
pub fn absolute_name(owner: &str, zone: &str) -> String {
    let zone = with_trailing_dot(zone);
    if owner.is_empty() || owner == "@" {
        return zone;
    }
    if owner.ends_with('.') || is_in_zone(owner, zone.trim_end_matches('.')) {
        return with_trailing_dot(owner);
    }
    format!("{owner}.{zone}")
}

/// Absolute name relative to its zone; the apex becomes `"@"`.
///
/// Names outside the zone are returned without their trailing dot.
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let full = fqdn.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');
    if full.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }
    if is_in_zone(full, zone) {
        return full[..full.len() - zone.len() - 1].to_string();
    }
    full.to_string()
}
