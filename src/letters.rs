/// Splits text into one `<span class="vision-letter">` per character with a
/// `--letter-index` custom property for CSS stagger. Characters are escaped.
pub fn letter_spans(text: &str) -> String {
    let mut html = String::with_capacity(text.len() * 48);

    for (index, ch) in text.chars().enumerate() {
        html.push_str(&format!(
            "<span class=\"vision-letter\" style=\"--letter-index: {index}\">"
        ));
        match ch {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            ' ' => html.push_str("&nbsp;"),
            other => html.push(other),
        }
        html.push_str("</span>");
    }

    html
}
