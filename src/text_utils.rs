use lazy_static::lazy_static;
use regex::{Captures, Regex};

pub const EXCERPT_MAX_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

lazy_static! {
    static ref ENTITY_REGEX: Regex = Regex::new(
        r"&(nbsp|amp|lt|gt|quot|#8216|#8217|#8220|#8221|#8211|#8212);"
    ).unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref IMG_SRC_REGEX: Regex = Regex::new(r#"<img[^>]+src="([^">]+)""#).unwrap();
    static ref SOURCE_REGEX: Regex = Regex::new(r"(?i)Fuente:\s*([^<]+)").unwrap();
}

fn entity_value(name: &str) -> &'static str {
    match name {
        "nbsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "#8216" | "#8217" => "'",
        "#8220" | "#8221" => "\"",
        "#8211" => "-",
        "#8212" => "--",
        _ => "",
    }
}

fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    // Decoding `&amp;` can produce a new entity (`&amp;lt;`), so run until nothing is left
    while ENTITY_REGEX.is_match(&decoded) {
        decoded = ENTITY_REGEX.replace_all(&decoded, |caps: &Captures| {
            entity_value(&caps[1])
        }).into_owned();
    }
    decoded
}

/// Decodes the supported entities, then collapses whitespace runs and trims.
/// Idempotent: the output contains no decodable entity and no whitespace run.
pub fn clean_text(text: &str) -> String {
    let decoded = decode_entities(text);
    WHITESPACE_REGEX.replace_all(&decoded, " ").trim().to_string()
}

pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, "").into_owned()
}

/// Upgrades `http:` to `https:`. Anything else is kept as is, and a missing
/// url resolves to `default_url`.
pub fn force_https(url: Option<&str>, default_url: &str) -> String {
    match url {
        None | Some("") => default_url.to_string(),
        Some(url) => match url.strip_prefix("http:") {
            Some(rest) => format!("https:{}", rest),
            None => url.to_string(),
        },
    }
}

/// `src` of the first `<img>` tag in document order
pub fn first_image_src(html: &str) -> Option<&str> {
    IMG_SRC_REGEX.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|src| src.as_str())
}

/// Text following the first `Fuente:` marker, up to the next tag
pub fn extract_source(html: &str) -> Option<String> {
    SOURCE_REGEX.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|text| format!("Fuente: {}", text.as_str().trim()))
}

pub fn take_chars(text: &str, count: usize) -> String {
    text.chars().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_entities() {
        assert_eq!(clean_text("Tom&nbsp;&amp;&nbsp;Jerry"), "Tom & Jerry");
        assert_eq!(clean_text("&lt;p&gt;"), "<p>");
        assert_eq!(clean_text("&quot;hola&quot;"), "\"hola\"");
        assert_eq!(clean_text("l&#8217;eau &#8216;x&#8217;"), "l'eau 'x'");
        assert_eq!(clean_text("&#8220;cita&#8221;"), "\"cita\"");
        assert_eq!(clean_text("2020&#8211;2024 &#8212; fin"), "2020-2024 -- fin");
    }

    #[test]
    fn test_clean_text_whitespace() {
        assert_eq!(clean_text("  a \n\t b  "), "a b");
        assert_eq!(clean_text("a&nbsp; &nbsp;b"), "a b");
        assert_eq!(clean_text("a\u{a0}\u{a0}b"), "a b");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn test_clean_text_idempotent() {
        let inputs = [
            "&amp;lt;b&amp;gt;",
            "&amp;amp;nbsp;x",
            "  <p>Hola&nbsp;&nbsp; mundo</p>\n\n",
            "&#8220;ya&#8221; &amp; &quot;luego&quot;",
            "&unknown; &amp",
            "plain",
        ];
        for input in inputs {
            let once = clean_text(input);
            assert_eq!(clean_text(&once), once, "input={}", input);
        }
        assert_eq!(clean_text("&amp;lt;b&amp;gt;"), "<b>");
    }

    #[test]
    fn test_unknown_entities_kept() {
        assert_eq!(clean_text("&copy; 2024"), "&copy; 2024");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hola <b>mundo</b></p>"), "Hola mundo");
        assert_eq!(strip_tags("sin etiquetas"), "sin etiquetas");
    }

    #[test]
    fn test_force_https() {
        assert_eq!(force_https(Some("http://a.com/x.jpg"), "/logo.png"), "https://a.com/x.jpg");
        assert_eq!(force_https(Some("https://a.com/x.jpg"), "/logo.png"), "https://a.com/x.jpg");
        assert_eq!(force_https(Some("//cdn.a.com/x.jpg"), "/logo.png"), "//cdn.a.com/x.jpg");
        assert_eq!(force_https(Some(""), "/logo.png"), "/logo.png");
        assert_eq!(force_https(None, "/logo.png"), "/logo.png");
    }

    #[test]
    fn test_first_image_src() {
        let html = r#"<p>a</p><img class="x" src="http://a.com/1.jpg"><img src="http://a.com/2.jpg">"#;
        assert_eq!(first_image_src(html), Some("http://a.com/1.jpg"));
        assert_eq!(first_image_src("<p>Hola</p>"), None);
        assert_eq!(first_image_src(r#"<img alt="no src">"#), None);
    }

    #[test]
    fn test_extract_source() {
        assert_eq!(extract_source("<p>texto</p><p>Fuente: Diario X<br></p>"), Some("Fuente: Diario X".to_string()));
        assert_eq!(extract_source("<p>FUENTE:   El Zonda </p>"), Some("Fuente: El Zonda".to_string()));
        assert_eq!(extract_source("fuente: a<br>Fuente: b<br>"), Some("Fuente: a".to_string()));
        assert_eq!(extract_source("<p>sin marcador</p>"), None);
    }

    #[test]
    fn test_take_chars() {
        assert_eq!(take_chars("áéíóú", 3), "áéí");
        assert_eq!(take_chars("ab", 10), "ab");
    }
}
