use crate::{Code, Diagnostic, OutputMessageCollection, Severity};
use span::{span, FileSpan};

#[test]
fn codes_are_unique_and_in_range() {
    let mut numbers: Vec<_> = Code::ALL.iter().map(|code| code.number()).collect();
    numbers.sort_unstable();

    for window in numbers.windows(2) {
        assert_ne!(window[0], window[1], "duplicate diagnostic code {}", window[0]);
    }
    assert!(numbers.iter().all(|&number| number <= 9999));
}

#[test]
fn warning_levels_only_on_warnings() {
    for &code in Code::ALL {
        match code.severity() {
            Severity::Warning => assert!(code.warning_level() >= 1, "{code} has no level"),
            _ => assert_eq!(code.warning_level(), 0, "{code} is not a warning"),
        }
    }
}

#[test]
fn warning_index_lookup() {
    assert!(Code::is_valid_warning(78));
    assert!(Code::is_valid_warning(1030));
    assert!(Code::is_valid_warning(1691));
    assert!(!Code::is_valid_warning(1039));
    assert!(!Code::is_valid_warning(0));
    assert!(!Code::is_valid_warning(9999));
}

#[test]
fn message_rendering_with_location() {
    let message = Diagnostic::new(Code::CS1039)
        .at("demo.cs".into(), span((3, 14), (3, 20)))
        .into_message(Severity::Error);

    assert_eq!(message.to_string(), "demo.cs(3,14): error CS1039: Unterminated string literal");
}

#[test]
fn message_rendering_without_location() {
    let message = Diagnostic::new(Code::CS1029).arg("boom").into_message(Severity::Error);
    assert_eq!(message.to_string(), "error CS1029: #error: 'boom'");
}

#[test]
fn template_arguments_fill_in_order() {
    let diagnostic = Diagnostic::new(Code::CS1004).arg("public");
    assert_eq!(diagnostic.message, "Duplicate 'public' modifier");
}

#[test]
fn collection_tracks_errors_and_order() {
    let mut collection = OutputMessageCollection::default();
    assert!(!collection.has_errors());

    collection.add(Diagnostic::new(Code::CS0078).into_message(Severity::Warning));
    assert!(!collection.has_errors());

    collection.add(
        Diagnostic::new(Code::CS1002)
            .location(FileSpan::new("a.cs".into(), span((1, 1), (1, 1))))
            .into_message(Severity::Error),
    );
    assert!(collection.has_errors());
    assert_eq!(collection.messages()[0].code, Code::CS0078);
    assert_eq!(collection.messages()[1].code, Code::CS1002);
}
