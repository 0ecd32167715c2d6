use folio_dom::{Document, Selector};
use proptest::prelude::*;

fn class_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

proptest! {
    #[test]
    fn add_then_remove_restores_other_classes(
        existing in proptest::collection::btree_set(class_name(), 0..5),
        extra in class_name(),
    ) {
        prop_assume!(!existing.contains(&extra));

        let doc = Document::new();
        let el = doc.create_element("input");
        let initial: Vec<String> = existing.iter().cloned().collect();
        el.set_attribute("class", initial.join(" "));

        prop_assert!(el.class_list().add(&extra));
        prop_assert!(el.class_list().contains(&extra));
        prop_assert!(el.class_list().remove(&extra));
        prop_assert_eq!(el.class_list().to_vec(), initial);
    }

    #[test]
    fn class_selector_agrees_with_class_list(
        classes in proptest::collection::vec(class_name(), 0..5),
        probe in class_name(),
    ) {
        let doc = Document::new();
        let el = doc.create_element("div");
        el.set_attribute("class", classes.join(" "));

        let selector = Selector::parse(&format!(".{probe}")).unwrap();
        prop_assert_eq!(el.matches(&selector), classes.contains(&probe));
        prop_assert_eq!(el.class_list().contains(&probe), classes.contains(&probe));
    }
}
