//! CSS color normalization for branding settings.
//!
//! Accepted inputs and their normalized forms:
//!
//! | Input | Output |
//! |-------|--------|
//! | `#abc`, `abc` | `#aabbcc` |
//! | `#A1B2C3`, `a1b2c3` | `#a1b2c3` |
//! | `rgb(10, 20, 30)` | `rgb(10,20,30)` |

/// Normalizes a user-supplied color, returning `None` when it is not a valid
/// hex or `rgb(...)` color.
pub fn normalize_color(raw: &str) -> Option<String> {
    let s = raw.trim();

    if is_rgb_function(s) {
        return normalize_rgb(s);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };

    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

/// `rgb` followed by optional whitespace and an opening parenthesis, any case.
fn is_rgb_function(s: &str) -> bool {
    s.get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("rgb"))
        && s[3..].trim_start().starts_with('(')
}

fn normalize_rgb(s: &str) -> Option<String> {
    let open = s.find('(')?;
    let close = open + s[open..].find(')')?;
    let inner = &s[open + 1..close];

    let channels = inner
        .split(',')
        .map(|part| {
            let digits: String = part.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok().filter(|n| *n <= 255)
        })
        .collect::<Option<Vec<u32>>>()?;

    if channels.len() < 3 {
        return None;
    }

    Some(format!(
        "rgb({},{},{})",
        channels[0], channels[1], channels[2]
    ))
}
