//! `{name}`-style placeholder interpolation (spec §3.5, §9).
//!
//! Deliberately not a general templating engine (design note §9): this is a
//! single-pass substring replace over `{key}` tokens. Unresolved
//! placeholders are left verbatim, which the caller may rely on (tested).

use std::collections::HashMap;

use crate::catalog::EventTemplate;

/// Renders `template`, replacing every `{key}` with `values[key]` when
/// present. Keys with no matching value are left untouched.
pub fn render(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some(end) = template[i..].find('}') {
                let key = &template[i + 1..i + end];
                if let Some(value) = values.get(key) {
                    out.push_str(value);
                } else {
                    // Leave unresolved placeholder verbatim, including braces.
                    out.push_str(&template[i..i + end + 1]);
                }
                i += end + 1;
                continue;
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    out
}

/// Renders a catalog event template's public/attacker/target variants with
/// the same value map (spec §3.6 messageTemplates).
pub fn render_event(tpl: &EventTemplate, values: &HashMap<&str, String>) -> (String, Option<String>, Option<String>) {
    (
        render(&tpl.public, values),
        tpl.attacker.as_ref().map(|t| render(t, values)),
        tpl.target.as_ref().map(|t| render(t, values)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholder() {
        let mut values = HashMap::new();
        values.insert("name", "Alice".to_string());
        assert_eq!(render("{name} attacks!", &values), "Alice attacks!");
    }

    #[test]
    fn leaves_unresolved_placeholder_verbatim() {
        let values = HashMap::new();
        assert_eq!(render("{name} attacks!", &values), "{name} attacks!");
    }

    #[test]
    fn idempotent_on_rerender() {
        let mut values = HashMap::new();
        values.insert("name", "Alice".to_string());
        let once = render("{name} hits {target}", &values);
        let twice = render(&once, &values);
        assert_eq!(once, twice);
    }
}
