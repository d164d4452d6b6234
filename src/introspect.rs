//! The introspection front-end seam.
//!
//! Parsing native headers is left to an external tool. The driver hands it
//! the generated header and gets an entity [`Catalog`] back.

use std::path::{Path, PathBuf};

use bindsurface_core::{Catalog, ParseError, SourceLocation, Span};
use tracing::debug;

/// What the driver asks the front end to parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// The generated header text.
    pub header_fragment: &'a str,
    /// Where the header was written, if it was.
    pub header_path: Option<&'a Path>,
    pub include_paths: &'a [PathBuf],
}

/// An introspection front end.
///
/// Front ends are expected to be deterministic: the driver never retries a
/// failed parse.
pub trait Introspector {
    fn parse(&mut self, request: &ParseRequest<'_>) -> Result<Catalog, ParseError>;
}

impl<F> Introspector for F
where
    F: FnMut(&ParseRequest<'_>) -> Result<Catalog, ParseError>,
{
    fn parse(&mut self, request: &ParseRequest<'_>) -> Result<Catalog, ParseError> {
        self(request)
    }
}

/// Front end that replays a JSON catalog dump exported by a real parser.
///
/// ```json
/// { "entities": [
///     { "name": "Foo", "kind": "class" },
///     { "name": "Foo::bar", "kind": "method", "access": "public", "scope": "Foo" }
/// ] }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogDumpIntrospector {
    source: DumpSource,
}

#[derive(Debug, Clone)]
enum DumpSource {
    File(PathBuf),
    Inline(String),
}

impl CatalogDumpIntrospector {
    /// Read the dump from a file when parsing.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: DumpSource::File(path.into()),
        }
    }

    /// Use an in-memory dump.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            source: DumpSource::Inline(json.into()),
        }
    }

    fn load(&self) -> Result<(String, String), ParseError> {
        match &self.source {
            DumpSource::File(path) => {
                let name = path.display().to_string();
                let text = std::fs::read_to_string(path)
                    .map_err(|e| ParseError::new(format!("{name}: {e}")))?;
                Ok((name, text))
            }
            DumpSource::Inline(json) => Ok(("<catalog>".to_string(), json.clone())),
        }
    }
}

impl Introspector for CatalogDumpIntrospector {
    fn parse(&mut self, request: &ParseRequest<'_>) -> Result<Catalog, ParseError> {
        let (name, text) = self.load()?;
        debug!(
            dump = %name,
            header_bytes = request.header_fragment.len(),
            "loading catalog dump"
        );
        serde_json::from_str(&text).map_err(|e| {
            let span = Span::point(e.line() as u32, e.column() as u32);
            ParseError::at(SourceLocation::new(name, span), e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindsurface_core::QualifiedName;

    fn request() -> ParseRequest<'static> {
        ParseRequest {
            header_fragment: "#include <foo.h>\n",
            header_path: None,
            include_paths: &[],
        }
    }

    #[test]
    fn inline_dump() {
        let mut front_end = CatalogDumpIntrospector::from_json(
            r#"{"entities": [
                {"name": "Foo", "kind": "class"},
                {"name": "Foo::bar", "kind": "method", "access": "public", "scope": "Foo"}
            ]}"#,
        );
        let catalog = front_end.parse(&request()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup(&QualifiedName::from("Foo::bar")).is_some());
    }

    #[test]
    fn malformed_dump_reports_location() {
        let mut front_end = CatalogDumpIntrospector::from_json("{\n  \"entities\": [,]\n}");
        let err = front_end.parse(&request()).unwrap_err();
        let location = err.location.unwrap();
        assert_eq!(location.file, "<catalog>");
        assert_eq!(location.span.line, 2);
    }

    #[test]
    fn inconsistent_dump_is_a_parse_error() {
        let mut front_end = CatalogDumpIntrospector::from_json(
            r#"{"entities": [{"name": "Foo", "kind": "class"}, {"name": "Foo", "kind": "class"}]}"#,
        );
        let err = front_end.parse(&request()).unwrap_err();
        assert!(err.message.contains("duplicate entity: Foo"));
    }

    fn front_end<F>(f: F) -> F
    where
        F: FnMut(&ParseRequest<'_>) -> Result<Catalog, ParseError>,
    {
        f
    }

    #[test]
    fn closures_are_front_ends() {
        let mut calls = 0;
        let mut parse = front_end(|req| {
            calls += 1;
            assert!(req.header_fragment.contains("foo.h"));
            Ok(Catalog::default())
        });
        assert!(Introspector::parse(&mut parse, &request()).unwrap().is_empty());
        drop(parse);
        assert_eq!(calls, 1);
    }

    #[test]
    fn missing_file() {
        let mut front_end = CatalogDumpIntrospector::from_path("/nonexistent/catalog.json");
        let err = front_end.parse(&request()).unwrap_err();
        assert!(err.message.starts_with("/nonexistent/catalog.json"));
    }
}
