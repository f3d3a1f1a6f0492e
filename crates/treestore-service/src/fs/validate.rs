//! Business-rule validation for creation operations.
//!
//! Each routine returns the ordered list of (rule description, violated)
//! pairs for one entity. Every rule is evaluated; the boundary that raises
//! the error aggregates all violated rules into a single message naming
//! the attempted action, so callers see every problem in one round trip.

use treestore_core::error::AppError;
use treestore_core::result::AppResult;
use treestore_entity::file::File;
use treestore_entity::folder::Folder;

/// A single validation rule: human-readable description and whether it
/// was violated.
pub type RuleCheck = (String, bool);

/// Rules for creating a root folder.
pub fn root_folder_rules(folder: &Folder, path_taken: bool) -> Vec<RuleCheck> {
    let mut checks = vec![
        ("Folder name not specified".to_string(), folder.name.is_empty()),
        (
            "Path not specified".to_string(),
            folder.path.as_deref().is_none_or(str::is_empty),
        ),
        (
            "Created time not specified".to_string(),
            folder.created_time.is_none(),
        ),
    ];

    if let Some(path) = folder.path() {
        checks.push((
            format!("Folder with a path {path} has been already created"),
            path_taken,
        ));
    }

    checks
}

/// Rules for creating a child folder under a parent.
pub fn child_folder_rules(folder: &Folder, parent: &Folder, path_taken: bool) -> Vec<RuleCheck> {
    let mut checks = vec![
        (
            "Child folder name not specified".to_string(),
            folder.name.is_empty(),
        ),
        (
            "Child folder path not specified".to_string(),
            folder.path.as_deref().is_none_or(str::is_empty),
        ),
        (
            "Child folder created time not specified".to_string(),
            folder.created_time.is_none(),
        ),
        (
            "Parent folder name not specified".to_string(),
            parent.name.is_empty(),
        ),
        (
            "Parent folder path not specified".to_string(),
            parent.path.as_deref().is_none_or(str::is_empty),
        ),
        (
            "Parent folder created time not specified".to_string(),
            parent.created_time.is_none(),
        ),
    ];

    if let Some(path) = folder.path() {
        checks.push((
            format!("Folder with a path {path} has been already created"),
            path_taken,
        ));
    }

    checks
}

/// Rules for creating a file.
pub fn file_rules(file: &File, path_taken: bool) -> Vec<RuleCheck> {
    vec![
        ("File name not specified".to_string(), file.name.is_empty()),
        ("Filesize not specified".to_string(), file.size.is_none()),
        (
            "Filesize cannot be negative".to_string(),
            file.size.is_some_and(|s| s < 0),
        ),
        (
            "Created time not specified".to_string(),
            file.created_time.is_none(),
        ),
        ("File path already exists".to_string(), path_taken),
    ]
}

/// Aggregate the violated rules into a single validation error naming the
/// attempted action, or succeed when nothing was violated.
pub fn report(action: &str, checks: &[RuleCheck]) -> AppResult<()> {
    let violated: Vec<&str> = checks
        .iter()
        .filter(|(_, violated)| *violated)
        .map(|(rule, _)| rule.as_str())
        .collect();

    if violated.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "The following problems occurred: {} when {action}",
            violated.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use treestore_core::error::ErrorKind;

    #[test]
    fn test_valid_root_folder_passes() {
        let mut folder = Folder::new("docs");
        folder.path = Some("/docs".to_string());
        folder.created_time = Some(Utc::now());

        let checks = root_folder_rules(&folder, false);
        assert!(report("creating root folder", &checks).is_ok());
    }

    #[test]
    fn test_report_collects_every_violation() {
        let folder = Folder::new("");

        let checks = root_folder_rules(&folder, false);
        let err = report("creating root folder", &checks).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Folder name not specified"));
        assert!(err.message.contains("Path not specified"));
        assert!(err.message.contains("Created time not specified"));
        assert!(err.message.ends_with("when creating root folder"));
    }

    #[test]
    fn test_empty_path_counts_as_missing() {
        let mut folder = Folder::new("docs");
        folder.path = Some(String::new());
        folder.created_time = Some(Utc::now());

        let err = report("creating root folder", &root_folder_rules(&folder, false)).unwrap_err();
        assert!(err.message.contains("Path not specified"));

        let mut parent = Folder::new("root");
        parent.path = Some(String::new());
        parent.created_time = Some(Utc::now());
        let mut child = Folder::new("child");
        child.path = Some("/root/child".to_string());
        child.created_time = Some(Utc::now());

        let err = report("creating folder", &child_folder_rules(&child, &parent, false))
            .unwrap_err();
        assert!(err.message.contains("Parent folder path not specified"));
    }

    #[test]
    fn test_duplicate_path_rule_mentions_path() {
        let mut folder = Folder::new("docs");
        folder.path = Some("/docs".to_string());
        folder.created_time = Some(Utc::now());

        let checks = root_folder_rules(&folder, true);
        let err = report("creating root folder", &checks).unwrap_err();
        assert!(
            err.message
                .contains("Folder with a path /docs has been already created")
        );
    }

    #[test]
    fn test_zero_size_file_is_valid() {
        let mut file = File::new("empty.txt", 0);
        file.created_time = Some(Utc::now());

        let checks = file_rules(&file, false);
        assert!(report("creating file", &checks).is_ok());
    }

    #[test]
    fn test_negative_size_is_violation() {
        let mut file = File::new("bad.txt", -1);
        file.created_time = Some(Utc::now());

        let checks = file_rules(&file, false);
        let err = report("creating file", &checks).unwrap_err();
        assert!(err.message.contains("Filesize cannot be negative"));
    }

    #[test]
    fn test_child_rules_cover_parent_fields() {
        let mut folder = Folder::new("child");
        folder.path = Some("/root/child".to_string());
        folder.created_time = Some(Utc::now());
        let parent = Folder::new("");

        let checks = child_folder_rules(&folder, &parent, false);
        let err = report("creating folder", &checks).unwrap_err();
        assert!(err.message.contains("Parent folder name not specified"));
        assert!(err.message.contains("Parent folder path not specified"));
        assert!(!err.message.contains("Child folder name"));
    }
}
