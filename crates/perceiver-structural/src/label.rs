use consign_core_types::EntityId;

const LINE_BREAKS: [&str; 3] = ["<br>", "<br/>", "<br />"];

/// Pick the line of a label's markup that carries the identifier.
///
/// Labels render as `"Title<br>ID: L1"`; without a break the whole text is used.
pub fn identifier_line(inner_html: &str, text_content: &str) -> Option<String> {
    for br in LINE_BREAKS {
        if inner_html.contains(br) {
            return inner_html.split(br).nth(1).map(|line| line.trim().to_string());
        }
    }
    Some(text_content.trim().to_string())
}

/// Strip `prefix` from `raw` and return what is left.
///
/// `None` when the prefix is missing or nothing follows it.
pub fn parse_entity_label(raw: &str, prefix: &str) -> Option<EntityId> {
    let rest = raw.trim().strip_prefix(prefix)?;
    EntityId::parse(rest)
}
