use docchat_transport::{suggested_filename, DEFAULT_ARCHIVE_NAME};

#[test]
fn quoted_filename_is_extracted_exactly() {
    assert_eq!(
        suggested_filename(r#"attachment; filename="report.zip""#),
        Some("report.zip".to_string())
    );
}

#[test]
fn unquoted_filename_is_extracted() {
    assert_eq!(
        suggested_filename("attachment; filename=report.zip"),
        Some("report.zip".to_string())
    );
}

#[test]
fn trailing_parameters_are_ignored() {
    assert_eq!(
        suggested_filename("attachment; filename=report.zip; size=1024"),
        Some("report.zip".to_string())
    );
}

#[test]
fn mixed_case_token_matches() {
    assert_eq!(
        suggested_filename(r#"Attachment; FILENAME="Report.Zip""#),
        Some("Report.Zip".to_string())
    );
}

#[test]
fn missing_token_yields_none() {
    assert_eq!(suggested_filename("inline"), None);
    assert_eq!(suggested_filename(""), None);
}

#[test]
fn empty_filename_yields_none() {
    assert_eq!(suggested_filename(r#"attachment; filename="""#), None);
    assert_eq!(suggested_filename("attachment; filename="), None);
}

#[test]
fn default_name_is_the_fixed_archive_literal() {
    assert_eq!(DEFAULT_ARCHIVE_NAME, "BatchQueryResponses.zip");
}
