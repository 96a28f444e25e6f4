//! Behaviour of the document model as seen from outside the crate.

use pretty_assertions::assert_eq;

use xml_dsx::{
    parse_str, Error, FnListener, IdGenerator, XmlContent, XmlElement, XmlParser, XmlText,
};

fn element(name: &str) -> XmlElement {
    XmlElement::new(name).unwrap()
}

#[test]
fn test_self_closing_rule() {
    let mut a = element("a");
    assert_eq!(a.to_xml(), "<a/>");

    a.add_text("");
    assert_eq!(a.to_xml(), "<a></a>");
}

#[test]
fn test_attribute_absent_versus_empty() {
    let mut a = element("a");
    a.set_attribute_value("hint", None);
    assert_eq!(a.to_xml(), "<a hint/>");

    a.set_attribute("hint", "");
    assert_eq!(a.to_xml(), r#"<a hint=""/>"#);
    assert_eq!(a.attribute("hint"), Some(Some("")));
}

#[test]
fn test_shallow_equality_ignores_children() {
    let mut one = element("a");
    one.add_element("x").unwrap();

    let mut three = element("a");
    three.add_text("y");
    three.add_comment("z");
    three.add_element("w").unwrap();

    assert!(one.content_equals(&three));
    assert!(!one.deep_equals(&three));
}

#[test]
fn test_deep_equality_ignores_child_order() {
    let left = parse_str(r#"<p><x k="1"><i/></x><y>t</y></p>"#).unwrap();
    let right = parse_str(r#"<p><y>t</y><x k="1"><i/></x></p>"#).unwrap();
    assert!(left.deep_equals(&right));
    assert!(right.deep_equals(&left));
}

#[test]
fn test_deep_equality_is_one_to_one() {
    // Every left child has some equal child on the right, but the right side
    // cannot pair each of them with a different node.
    let left = parse_str("<p><x/><y/><z/></p>").unwrap();
    let right = parse_str("<p><x/><x/><y/></p>").unwrap();
    assert!(!left.deep_equals(&right));

    let left = parse_str("<p><x/><x/><y/></p>").unwrap();
    let right = parse_str("<p><x/><y/><y/></p>").unwrap();
    assert!(!left.deep_equals(&right));
}

#[test]
fn test_lazy_identity_across_trees() {
    let first_tree = parse_str("<a><b/></a>").unwrap();
    let second_tree = parse_str("<a><b/></a>").unwrap();

    let b1 = first_tree.get_element("b").unwrap();
    let b2 = second_tree.get_element("b").unwrap();
    assert_eq!(b1.peek_id(), None);
    assert_eq!(b2.peek_id(), None);

    let ids = [b2.id(), first_tree.id(), b1.id(), second_tree.id()];
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(b2.id(), ids[0]);
}

#[test]
fn test_private_generator() {
    let generator = IdGenerator::new();
    let root = parse_str("<a>t<!--c--></a>").unwrap();

    let ids: Vec<u64> = root.children().iter().map(|c| c.id_from(&generator)).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(root.id_from(&generator), 3);
}

#[test]
fn test_name_validation_leaves_state_unchanged() {
    assert!(matches!(XmlElement::new("bad name"), Err(Error::InvalidName(_))));

    let mut a = element("a");
    a.set_attribute("k", "v");
    let err = a.set_name("b c").unwrap_err();
    assert!(matches!(err, Error::InvalidName(ref n) if n == "b c"));
    assert_eq!(a.to_xml(), r#"<a k="v"/>"#);
}

#[test]
fn test_get_value_errors_on_missing_child() {
    let root = parse_str("<person><name>Ada &amp; co</name></person>").unwrap();
    assert_eq!(root.get_value("name").unwrap(), "Ada &amp; co");
    assert!(matches!(root.get_value("age"), Err(Error::ElementNotFound(_))));
}

#[test]
fn test_content_accessors() {
    let root = parse_str("<a>t<![CDATA[c]]><!--m--><b/></a>").unwrap();
    let payloads: Vec<String> = root
        .children()
        .iter()
        .map(|c| match c {
            XmlContent::Element(e) => format!("element {}", e.name()),
            XmlContent::Text(t) => format!("text {}", t.text()),
            XmlContent::CData(c) => format!("cdata {}", c.text()),
            XmlContent::Comment(c) => format!("comment {}", c.text()),
        })
        .collect();
    assert_eq!(payloads, vec!["text t", "cdata c", "comment m", "element b"]);
}

#[test]
fn test_listener_can_collect_records_while_parsing() {
    let xml = r#"<orders><order id="1"><total>10</total></order><order id="2"><total>32</total></order></orders>"#;
    let mut totals = Vec::new();
    let mut listener = FnListener(|e: &XmlElement| {
        if e.name() == "order" {
            if let Ok(total) = e.get_value("total") {
                totals.push(total);
            }
        }
    });

    let root = XmlParser::new().parse_str_with(xml, &mut listener).unwrap();
    assert_eq!(totals, vec!["10", "32"]);
    assert_eq!(root.get_elements("order").len(), 2);
}

#[test]
fn test_display_matches_to_xml() {
    let mut a = element("a");
    a.add_child(XmlText::new("x & y"));
    let content = XmlContent::from(a.clone());
    assert_eq!(format!("{a}"), "<a>x &amp; y</a>");
    assert_eq!(content.to_string(), a.to_xml());
}
