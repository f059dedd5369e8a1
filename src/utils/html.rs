use ammonia::Builder;

/// Strips every HTML tag from a player name and returns plain text.
///
/// `<script>` and `<style>` lose their content too. The entities the HTML
/// serializer writes back out are decoded, so "Ron & Hermione" is kept as typed.
pub fn clean_name(input: &str) -> String {
    let stripped = Builder::empty().clean(input).to_string();
    decode_text_entities(&stripped).trim().to_string()
}

/// Undoes the serializer's text escaping. `&amp;` must go last.
fn decode_text_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
