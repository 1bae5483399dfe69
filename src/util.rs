/// Escape text for inclusion in HTML element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make serialized JSON safe to embed inside a `<script>` element.
///
/// `</` would end the script block early and `<!--` can switch the HTML
/// parser into comment mode; both are rewritten with JSON string escapes.
pub fn json_for_script(json: &str) -> String {
    json.replace("</", "<\\/").replace("<!--", "<\\u0021--")
}

/// Substitute `{{key}}` placeholders in a single pass.
///
/// Substituted values are never rescanned, so placeholder-like text inside a
/// value is emitted as-is. Unknown keys are left in place.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Short name for a feed source, used in log lines
pub fn source_name(source: &str) -> String {
    source
        .split(['?', '#'])
        .next()
        .unwrap_or(source)
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(source)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<b class="x">Tom's & Jerry's</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom&#39;s &amp; Jerry&#39;s&lt;/b&gt;"
        );
        assert_eq!(escape_html("10km N of Testville"), "10km N of Testville");
    }

    #[test]
    fn script_json_cannot_close_the_block() {
        let json = r#"{"place":"</script><script>alert(1)</script>"}"#;
        let safe = json_for_script(json);
        assert!(!safe.contains("</script>"));
        let back: serde_json::Value = serde_json::from_str(&safe).unwrap();
        assert_eq!(back["place"], "</script><script>alert(1)</script>");
    }

    #[test]
    fn fills_placeholders_once() {
        let out = fill_template(
            "<title>{{title}}</title>{{body}}{{missing}}",
            &[("title", "{{body}}"), ("body", "<p>x</p>")],
        );
        assert_eq!(out, "<title>{{body}}</title><p>x</p>{{missing}}");
        assert_eq!(fill_template("no placeholders {{", &[]), "no placeholders {{");
    }

    #[test]
    fn source_name_from_url_and_path() {
        assert_eq!(
            source_name(
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
            ),
            "all_week.geojson"
        );
        assert_eq!(source_name("data/plates.json"), "plates.json");
        assert_eq!(source_name("https://example.com/feed/?x=1"), "feed");
    }
}
