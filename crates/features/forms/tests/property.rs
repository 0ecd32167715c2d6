use folio_dom::{DispatchOutcome, Document};
use folio_forms::{FormsConfig, MemoryNotifier, attach};
use proptest::prelude::*;
use std::sync::Arc;

/// A field value paired with whether the guard must treat it as blank.
fn field_value() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        Just((String::new(), true)),
        "[ \t\n\u{a0}\u{feff}\u{2028}]{1,4}".prop_map(|v| (v, true)),
        "[ \u{feff}]{0,2}[a-zA-Z0-9@.\u{85}]{1,10}[ ]{0,2}".prop_map(|v| (v, false)),
    ]
}

proptest! {
    #[test]
    fn exactly_the_blank_inputs_are_flagged(values in proptest::collection::vec(field_value(), 1..6)) {
        let inputs: String = (0..values.len())
            .map(|i| format!(r#"<input name="f{i}" required>"#))
            .collect();
        let doc = Document::parse_html(&format!(r#"<form class="auth-form">{inputs}</form>"#));
        let notifier = Arc::new(MemoryNotifier::new());
        let guard = attach(&doc, &FormsConfig::default(), notifier.clone()).unwrap();
        let form = guard.forms().remove(0);

        for (i, (value, _)) in values.iter().enumerate() {
            let input = doc.query_selector(&format!("input[name=f{i}]")).unwrap().unwrap();
            input.set_value(value.clone());
        }

        let any_blank = values.iter().any(|(_, blank)| *blank);
        let outcome = doc.submit(&form).unwrap();

        prop_assert_eq!(outcome.is_prevented(), any_blank);
        prop_assert_eq!(notifier.count(), usize::from(any_blank));
        prop_assert_eq!(doc.take_submissions().len(), usize::from(!any_blank));
        for (i, (_, blank)) in values.iter().enumerate() {
            let input = doc.query_selector(&format!("input[name=f{i}]")).unwrap().unwrap();
            prop_assert_eq!(input.class_list().contains("is-invalid"), *blank);
        }
        if !any_blank {
            prop_assert_eq!(outcome, DispatchOutcome::Proceed);
        }
    }
}
