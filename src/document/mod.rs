//! Operation documents and the utilities that operate on them.
//!
//! A [`OperationDocument`] wraps the raw text of a GraphQL query, mutation, or
//! fragment together with the operation kind and the operation name extracted
//! from the source. Custom transports and tooling work against this same
//! representation, so the printer and transform hook live here rather than in
//! the client.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentError {
    EmptyDocument,
    UnknownOperation { found: String },
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::EmptyDocument => write!(f, "Operation document must not be empty"),
            DocumentError::UnknownOperation { found } => {
                write!(f, "Expected query, mutation, fragment, or a selection set; found '{found}'")
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Discriminant for the top-level definition of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Fragment,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Fragment => "fragment",
        }
    }
}

/// Parsed-enough representation of a GraphQL document.
///
/// The body is kept verbatim; only the leading keyword and operation name are
/// inspected. Anonymous shorthand documents (`{ hero { name } }`) parse as
/// unnamed queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperationDocument {
    kind: OperationKind,
    name: Option<String>,
    body: Arc<str>,
}

impl OperationDocument {
    pub fn parse(source: &str) -> DocumentResult<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }

        if trimmed.starts_with('{') {
            return Ok(Self {
                kind: OperationKind::Query,
                name: None,
                body: Arc::from(trimmed),
            });
        }

        let keyword: String = trimmed
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect();
        let kind = match keyword.as_str() {
            "query" => OperationKind::Query,
            "mutation" => OperationKind::Mutation,
            "fragment" => OperationKind::Fragment,
            _ => {
                return Err(DocumentError::UnknownOperation { found: keyword });
            }
        };

        let rest = trimmed[keyword.len()..].trim_start();
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        Ok(Self {
            kind,
            name: if name.is_empty() { None } else { Some(name) },
            body: Arc::from(trimmed),
        })
    }

    /// Convenience for `parse` when the caller already knows the text is a query.
    pub fn query(source: &str) -> DocumentResult<Self> {
        Self::expecting(source, OperationKind::Query)
    }

    pub fn mutation(source: &str) -> DocumentResult<Self> {
        Self::expecting(source, OperationKind::Mutation)
    }

    pub fn fragment(source: &str) -> DocumentResult<Self> {
        Self::expecting(source, OperationKind::Fragment)
    }

    fn expecting(source: &str, kind: OperationKind) -> DocumentResult<Self> {
        let document = Self::parse(source)?;
        if document.kind != kind {
            return Err(DocumentError::UnknownOperation {
                found: document.kind.as_str().to_string(),
            });
        }
        Ok(document)
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Serializes a document back to text with whitespace runs collapsed.
pub fn print_document(document: &OperationDocument) -> String {
    let mut printed = String::with_capacity(document.body.len());
    let mut last_was_space = false;
    for c in document.body.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                printed.push(' ');
            }
            last_was_space = true;
        } else {
            printed.push(c);
            last_was_space = false;
        }
    }
    printed.trim().to_string()
}

/// Hook applied to every query document before it reaches the transport.
pub type QueryTransform = Arc<dyn Fn(&OperationDocument) -> OperationDocument + Send + Sync>;

/// Applies an optional transform, returning the document untouched when none
/// is configured.
pub fn apply_query_transform(
    document: &OperationDocument,
    transform: Option<&QueryTransform>,
) -> OperationDocument {
    match transform {
        Some(transform) => transform(document),
        None => document.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_query() {
        let document = OperationDocument::parse("query GetHero { hero { name } }").unwrap();
        assert_eq!(document.kind(), OperationKind::Query);
        assert_eq!(document.operation_name(), Some("GetHero"));
    }

    #[test]
    fn parses_shorthand_as_anonymous_query() {
        let document = OperationDocument::parse("{ hero { name } }").unwrap();
        assert_eq!(document.kind(), OperationKind::Query);
        assert_eq!(document.operation_name(), None);
    }

    #[test]
    fn parses_mutation_and_fragment() {
        let mutation = OperationDocument::parse("mutation AddHero($name: String!) { addHero(name: $name) { id } }").unwrap();
        assert_eq!(mutation.kind(), OperationKind::Mutation);
        assert_eq!(mutation.operation_name(), Some("AddHero"));

        let fragment = OperationDocument::parse("fragment HeroDetails on Hero { name }").unwrap();
        assert_eq!(fragment.kind(), OperationKind::Fragment);
        assert_eq!(fragment.operation_name(), Some("HeroDetails"));
    }

    #[test]
    fn rejects_empty_and_unknown_documents() {
        assert!(matches!(
            OperationDocument::parse("   "),
            Err(DocumentError::EmptyDocument)
        ));
        assert!(matches!(
            OperationDocument::parse("subscribe { hero }"),
            Err(DocumentError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn typed_constructors_enforce_kind() {
        assert!(OperationDocument::query("mutation M { x }").is_err());
        assert!(OperationDocument::mutation("mutation M { x }").is_ok());
    }

    #[test]
    fn print_collapses_whitespace() {
        let document = OperationDocument::parse("query GetHero {\n  hero {\n    name\n  }\n}").unwrap();
        assert_eq!(print_document(&document), "query GetHero { hero { name } }");
    }

    #[test]
    fn transform_is_identity_when_absent() {
        let document = OperationDocument::parse("{ hero }").unwrap();
        assert_eq!(apply_query_transform(&document, None), document);
    }

    #[test]
    fn transform_rewrites_document() {
        let transform: QueryTransform = Arc::new(|doc| {
            OperationDocument::parse(&doc.body().replace("hero", "villain")).unwrap()
        });
        let document = OperationDocument::parse("{ hero }").unwrap();
        let transformed = apply_query_transform(&document, Some(&transform));
        assert_eq!(transformed.body(), "{ villain }");
    }
}
