/// Cell content when there is nothing to show.
pub const PLACEHOLDER: &str = "⨂";

/// Line break inside a pipe-table cell.
pub const LINE_BREAK: &str = "<br/>";

/// `| a | b |` plus newline; empty string for no cells.
pub fn row<S: AsRef<str>>(cells: &[S]) -> String {
    if cells.is_empty() {
        return String::new();
    }

    let joined = cells.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" | ");
    format!("| {joined} |\n")
}

/// Separator under a header of `column_count` cells: one pipe per column
/// boundary, so it lines up with the pipes [`row`] emits.
pub fn header_separator(column_count: usize) -> String {
    if column_count == 0 {
        return String::new();
    }

    let mut separator = vec!["|"; column_count + 1].join("--");
    separator.push('\n');
    separator
}

/// Header row followed by its separator.
pub fn header<S: AsRef<str>>(columns: &[S]) -> String {
    let mut out = row(columns);
    out.push_str(&header_separator(columns.len()));
    out
}

/// Joins cell lines with `<br/>`, or yields the placeholder when there are none.
pub fn cell(lines: &[String]) -> String {
    if lines.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        lines.join(LINE_BREAK)
    }
}
