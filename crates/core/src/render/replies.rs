//! Short conversational replies that sit next to the dashboard tables.

/// Reply listing the projects found in a space, one bullet per project.
///
/// A missing or blank `space_name` leaves the space out of the sentence.
pub fn project_names_reply<S: AsRef<str>>(space_name: Option<&str>, projects: &[S]) -> String {
    let space_name = space_name.map(str::trim).filter(|name| !name.is_empty());

    if projects.is_empty() {
        return match space_name {
            Some(space_name) => format!("I found no projects in the space {space_name}."),
            None => "I found no projects.".to_string(),
        };
    }

    let bullets = projects.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n* ");
    match space_name {
        Some(space_name) => format!(
            "I found {} projects in the space \"{space_name}\":\n* {bullets}",
            projects.len()
        ),
        None => format!("I found {} projects:\n* {bullets}", projects.len()),
    }
}
