//! HTML fragments for the scene views.
//!
//! Names and values are written verbatim. Nothing here escapes HTML, so an
//! object named `<script>` ends up in the page as markup.

use crate::scene::DirectoryRow;

/// Body rendered when a metadata query has no result.
pub const NO_FIELDS: &str = "(no fields)";

/// Renders a hyperlink to `current_path + "/" + name`.
///
/// ```rust
/// assert_eq!(
///     sceneprobe::html::link("/scenes", "root"),
///     r#"<a href="/scenes/root">root</a>"#,
/// );
/// ```
pub fn link(current_path: &str, name: &str) -> String {
    format!(r#"<a href="{current_path}/{name}">{name}</a>"#)
}

/// One link per entry, each followed by a line break.
pub fn link_list<S: AsRef<str>>(current_path: &str, entries: &[S]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&link(current_path, entry.as_ref()));
        out.push_str("<br>\n");
    }
    out
}

/// A three-column table: label, linked name, value.
pub fn attribute_table(current_path: &str, rows: &[DirectoryRow]) -> String {
    let mut out = String::from("<table border='0'>");
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.label,
            link(current_path, &row.child_name),
            row.value,
        ));
    }
    out.push_str("</table>");
    out
}
