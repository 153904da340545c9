use chrono::{DateTime, Utc};
use domain::{Document, SearchRequest};
use tracing::trace;

/// Checks a document against every criterion of the request.
/// Absent or empty criteria impose no constraint.
pub fn check_doc_matches_request(doc: &Document, request: &SearchRequest) -> bool {
    let doc_id = doc.id.as_ref().map_or("<unassigned>", |id| id.as_str());

    if let Some(prefixes) = active(&request.title_prefixes) {
        if !matches_title_prefix(doc.title.as_deref(), prefixes) {
            trace!(doc_id, "Title prefix criterion not met");
            return false;
        }
    }

    if let Some(fragments) = active(&request.contains_contents) {
        if !matches_content(doc.content.as_deref(), fragments) {
            trace!(doc_id, "Content criterion not met");
            return false;
        }
    }

    if let Some(author_ids) = active(&request.author_ids) {
        let author_id = doc.author.as_ref().map(|author| author.id.as_str());
        if !matches_author(author_id, author_ids) {
            trace!(doc_id, "Author criterion not met");
            return false;
        }
    }

    if !matches_created_range(doc.created, request.created_from, request.created_to) {
        trace!(doc_id, "Creation range criterion not met");
        return false;
    }

    trace!(doc_id, "All criteria met.");
    true
}

fn active(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|values| !values.is_empty())
}

// Case-sensitive, any prefix may match.
fn matches_title_prefix(title: Option<&str>, prefixes: &[String]) -> bool {
    title.is_some_and(|title| prefixes.iter().any(|prefix| title.starts_with(prefix.as_str())))
}

// Case-sensitive, any fragment may match.
fn matches_content(content: Option<&str>, fragments: &[String]) -> bool {
    content.is_some_and(|content| {
        fragments
            .iter()
            .any(|fragment| content.contains(fragment.as_str()))
    })
}

fn matches_author(author_id: Option<&str>, author_ids: &[String]) -> bool {
    author_id.is_some_and(|author_id| author_ids.iter().any(|id| id == author_id))
}

/// Both bounds are inclusive. A document without a creation time fails any bound.
fn matches_created_range(
    created: Option<DateTime<Utc>>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(created) = created else {
        return false;
    };
    from.is_none_or(|from| created >= from) && to.is_none_or(|to| created <= to)
}
