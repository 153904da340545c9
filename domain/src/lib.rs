use chrono::{DateTime, Utc}; // Creation timestamps
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// --- Document ID ---
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)] // Plain string on the wire
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh, collision-free identifier (random UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id.to_string())
    }
}
impl From<DocumentId> for String {
    fn from(doc_id: DocumentId) -> Self {
        doc_id.0
    }
}
impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Author ---

/// The author a document is attributed to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// --- Document ---

/// A stored record. Every field may be absent until the document is saved;
/// after a save `id` and `created` are always present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_author(mut self, author: Author) -> Self {
        self.author = Some(author);
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Prepares the document for storage, returning its (now assigned) id.
    ///
    /// A document without an id gets a new id and `now` as its creation time.
    /// A document with an id but no creation time gets `now`.
    /// An existing creation time is never touched.
    pub fn stamp(&mut self, now: DateTime<Utc>) -> DocumentId {
        match self.id.clone() {
            None => {
                let id = DocumentId::generate();
                self.id = Some(id.clone());
                self.created = Some(now);
                id
            }
            Some(id) => {
                if self.created.is_none() {
                    self.created = Some(now);
                }
                id
            }
        }
    }
}

// --- Search Request ---

/// Filter criteria for a search. Criteria are ANDed together, list-valued
/// criteria are ORed within themselves. An absent or empty criterion
/// matches everything.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_prefixes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_contents: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_to: Option<DateTime<Utc>>,
}

impl SearchRequest {
    pub fn with_title_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_contains_contents<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains_contents = Some(contents.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_author_ids<I, S>(mut self, author_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.author_ids = Some(author_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_created_from(mut self, from: DateTime<Utc>) -> Self {
        self.created_from = Some(from);
        self
    }

    pub fn with_created_to(mut self, to: DateTime<Utc>) -> Self {
        self.created_to = Some(to);
        self
    }

    /// True when no criterion constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        fn empty(list: &Option<Vec<String>>) -> bool {
            list.as_ref().is_none_or(|values| values.is_empty())
        }
        empty(&self.title_prefixes)
            && empty(&self.contains_contents)
            && empty(&self.author_ids)
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn stamp_assigns_id_and_created_to_new_document() {
        let mut doc = Document::new().with_title("Draft");
        let id = doc.stamp(fixed_time());

        assert_eq!(doc.id.as_ref(), Some(&id));
        assert!(!id.as_str().is_empty());
        assert_eq!(doc.created, Some(fixed_time()));
    }

    #[test]
    fn stamp_generates_distinct_ids() {
        let mut first = Document::new();
        let mut second = Document::new();
        assert_ne!(first.stamp(fixed_time()), second.stamp(fixed_time()));
    }

    #[test]
    fn stamp_sets_created_when_id_preassigned() {
        let mut doc = Document::new().with_id("preset");
        let id = doc.stamp(fixed_time());

        assert_eq!(id.as_str(), "preset");
        assert_eq!(doc.created, Some(fixed_time()));
    }

    #[test]
    fn stamp_preserves_existing_created() {
        let original = fixed_time();
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut doc = Document::new().with_id("doc1").with_created(original);

        doc.stamp(later);
        doc.stamp(later);
        assert_eq!(doc.created, Some(original));
    }

    #[test]
    fn empty_request_is_unconstrained() {
        assert!(SearchRequest::default().is_unconstrained());
        assert!(
            SearchRequest::default()
                .with_title_prefixes(Vec::<String>::new())
                .is_unconstrained()
        );
        assert!(
            !SearchRequest::default()
                .with_created_to(fixed_time())
                .is_unconstrained()
        );
    }

    #[test]
    fn document_deserializes_with_missing_fields() {
        let doc: Document = serde_json::from_value(json!({
            "title": "Document Title",
            "author": { "id": "author1", "name": "John Doe" }
        }))
        .expect("valid document json");

        assert!(doc.id.is_none());
        assert!(doc.created.is_none());
        assert_eq!(doc.author, Some(Author::new("author1", "John Doe")));
    }

    #[test]
    fn search_request_uses_camel_case_fields() {
        let request: SearchRequest = serde_json::from_value(json!({
            "titlePrefixes": ["Doc"],
            "authorIds": ["a1", "a2"],
            "createdFrom": "2024-05-01T12:00:00Z"
        }))
        .expect("valid request json");

        assert_eq!(request.title_prefixes, Some(vec!["Doc".to_string()]));
        assert_eq!(request.author_ids.map(|ids| ids.len()), Some(2));
        assert_eq!(request.created_from, Some(fixed_time()));
        assert!(request.contains_contents.is_none());
    }
}
