pub mod filter;

pub use filter::check_doc_matches_request;
