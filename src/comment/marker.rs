//! comment::marker
//!
//! Hidden markers that identify a logical comment across runs.
//!
//! # Format
//!
//! ```text
//! <!-- ThetaDev/action-comment-pull-request "<tag>" -->
//! ```
//!
//! The marker is an HTML comment, so it is invisible in rendered markdown.
//! It is appended after the visible content, separated by a newline, and
//! must round-trip byte-exact: search matches on the literal string.

/// Namespace embedded in every marker.
///
/// Kept stable so comments written by earlier runs (and by other
/// implementations using the same namespace) are still recognised.
pub const COMMENT_TAG_ID: &str = "ThetaDev/action-comment-pull-request";

/// Render the marker for a tag.
///
/// The tag is embedded verbatim; no escaping is applied.
///
/// # Example
///
/// ```
/// use pr_commenter::comment::marker;
///
/// assert_eq!(
///     marker("build-status"),
///     r#"<!-- ThetaDev/action-comment-pull-request "build-status" -->"#
/// );
/// ```
pub fn marker(tag: &str) -> String {
    format!("<!-- {} \"{}\" -->", COMMENT_TAG_ID, tag)
}

/// Build the comment body for `content`, appending the marker when tagged.
///
/// # Example
///
/// ```
/// use pr_commenter::comment::compose_body;
///
/// assert_eq!(compose_body("Result", None), "Result");
/// assert_eq!(
///     compose_body("Result", Some("build-status")),
///     "Result\n<!-- ThetaDev/action-comment-pull-request \"build-status\" -->"
/// );
/// ```
pub fn compose_body(content: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("{}\n{}", content, marker(tag)),
        None => content.to_string(),
    }
}
