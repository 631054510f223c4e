//! Coarse classification of a request body's media type.
use std::fmt;

/// Format negotiated from the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentTypeFormat {
    Html,
    Txt,
    Js,
    Css,
    Json,
    JsonLd,
    Xml,
    Rdf,
    Atom,
    Rss,
    Form,
}

impl ContentTypeFormat {
    const MIME_TYPES: &'static [(Self, &'static [&'static str])] = &[
        (Self::Html, &["text/html", "application/xhtml+xml"]),
        (Self::Txt, &["text/plain"]),
        (
            Self::Js,
            &[
                "application/javascript",
                "application/x-javascript",
                "text/javascript",
            ],
        ),
        (Self::Css, &["text/css"]),
        (Self::Json, &["application/json", "application/x-json"]),
        (Self::JsonLd, &["application/ld+json"]),
        (
            Self::Xml,
            &["text/xml", "application/xml", "application/x-xml"],
        ),
        (Self::Rdf, &["application/rdf+xml"]),
        (Self::Atom, &["application/atom+xml"]),
        (Self::Rss, &["application/rss+xml"]),
        (
            Self::Form,
            &["application/x-www-form-urlencoded", "multipart/form-data"],
        ),
    ];

    /// Maps a `Content-Type` value (parameters allowed) to a format.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self::MIME_TYPES
            .iter()
            .find(|(_, mimes)| mimes.contains(&essence.as_str()))
            .map(|(format, _)| *format)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Txt => "txt",
            Self::Js => "js",
            Self::Css => "css",
            Self::Json => "json",
            Self::JsonLd => "jsonld",
            Self::Xml => "xml",
            Self::Rdf => "rdf",
            Self::Atom => "atom",
            Self::Rss => "rss",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for ContentTypeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
