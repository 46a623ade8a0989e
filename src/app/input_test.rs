use super::*;

#[test]
fn test_parse_input() {
    assert_eq!(Input::parse("   "), Input::Empty);
    assert_eq!(
        Input::parse("  Hello there  "),
        Input::Submit("Hello there".to_string())
    );
    assert_eq!(Input::parse("/new"), Input::NewChat);
    assert_eq!(Input::parse("/list"), Input::List);
    assert_eq!(Input::parse("/help"), Input::Help);
    assert_eq!(Input::parse("/quit"), Input::Quit);
    assert_eq!(Input::parse("/exit"), Input::Quit);
    assert_eq!(Input::parse("/load 1"), Input::Load(0));
    assert_eq!(Input::parse("/delete 3"), Input::Delete(2));
}

#[test]
fn test_parse_invalid_input() {
    assert!(matches!(Input::parse("/load 0"), Input::Invalid(_)));
    assert!(matches!(Input::parse("/load x"), Input::Invalid(_)));
    assert!(matches!(Input::parse("/delete"), Input::Invalid(_)));
    assert!(matches!(Input::parse("/new 2"), Input::Invalid(_)));
    assert_eq!(
        Input::parse("/rename"),
        Input::Invalid("unknown command: /rename".to_string())
    );
}
