use std::fmt;

/// Inbound text classified as denoting a downloadable resource. The whole
/// message text is the reference; the resolver gets it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference(pub String);

/// A resolved, directly fetchable URL for the underlying file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLink(pub String);

impl fmt::Display for DirectLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classifies text by substring containment of the configured hosting-domain
/// markers. Deliberately loose: a marker appearing anywhere qualifies, even
/// mid-word, and text merely mentioning a marker counts as a reference.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    markers: Vec<String>,
}

impl LinkExtractor {
    pub fn new(markers: Vec<String>) -> Self {
        LinkExtractor { markers }
    }

    pub fn extract(&self, text: &str) -> Option<Reference> {
        if self.markers.iter().any(|marker| text.contains(marker.as_str())) {
            Some(Reference(text.to_owned()))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(vec!["terabox.com".to_string(), "teraboxapp.com".to_string()])
    }

    #[test]
    fn text_with_either_marker_is_a_reference() {
        assert_eq!(
            extractor().extract("https://terabox.com/s/abc"),
            Some(Reference("https://terabox.com/s/abc".to_string()))
        );
        assert_eq!(
            extractor().extract("https://teraboxapp.com/x"),
            Some(Reference("https://teraboxapp.com/x".to_string()))
        );
    }

    #[test]
    fn plain_text_is_not_a_reference() {
        assert_eq!(extractor().extract("hello world"), None);
        assert_eq!(extractor().extract(""), None);
    }

    #[test]
    fn mid_word_marker_still_qualifies() {
        // Known looseness of the matching policy, kept on purpose.
        assert!(extractor().extract("xterabox.community").is_some());
        assert!(extractor().extract("grab it from terabox.com please").is_some());
    }

    #[test]
    fn reference_carries_the_whole_text() {
        let text = "look: https://terabox.com/s/abc and more";
        assert_eq!(
            extractor().extract(text),
            Some(Reference(text.to_string()))
        );
    }
}
