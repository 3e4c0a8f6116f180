/// `render_foo_bar` to `renderFooBar`.
pub fn snake_to_camel(s: &str) -> String {
    let mut segments = s.split('_').filter(|segment| !segment.is_empty());
    let mut out = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
