use form_pilot::{
    form::{
        capture::capture_form,
        classifier::{
            classify_type, discover_questions, extract_title, popup_options, referenced_listbox,
            visible_listboxes, DEFAULT_TITLE_MAX_CHARS,
        },
        form_model::ContainerTier,
        locate::{locate_question_containers, locate_with_tier},
    },
    page::{
        document::FormDocument,
        dom::{DomNode, DomTree},
    },
    template::template_model::FieldType,
};

mod common;

use crate::common::{
    pages::{checkbox_question, form_page, heading, native_select_question, paragraph_question, radio_question, text_question},
    utils::load_fixture,
};

fn page(body: Vec<DomNode>) -> DomTree {
    DomTree::with_body("Test form", body).unwrap()
}

fn input(input_type: &str) -> DomNode {
    DomNode::new("input").attr("type", input_type)
}

// =========================================================================
// Container tiers
// =========================================================================

#[test]
fn list_items_take_precedence() {
    let doc = form_page(
        "Survey",
        vec![
            text_question("name", "Name", "text"),
            paragraph_question("bio", "About you"),
        ],
        vec![DomNode::new("fieldset").child(input("text"))],
    );

    let (tier, containers) = locate_with_tier(&doc).unwrap();
    assert_eq!(tier, ContainerTier::ListItem);
    assert_eq!(containers.len(), 2, "The fieldset is ignored once list items exist");
}

#[test]
fn fieldsets_and_form_groups_are_second_tier() {
    let doc = page(vec![DomNode::new("form").children([
        DomNode::new("fieldset")
            .child(DomNode::new("legend").text("Contact"))
            .child(input("email")),
        DomNode::new("div")
            .attr("class", "row form-group")
            .child(DomNode::new("label").text("Phone"))
            .child(input("tel")),
        DomNode::new("div").attr("class", "question").child(input("text")),
    ])]);

    let (tier, containers) = locate_with_tier(&doc).unwrap();
    assert_eq!(tier, ContainerTier::FormGroup);
    assert_eq!(containers.len(), 3);
}

#[test]
fn control_parents_are_last_resort() {
    let doc = page(vec![DomNode::new("form").children([
        DomNode::new("div")
            .child(DomNode::new("span").text("Name"))
            .child(input("text")),
        DomNode::new("section")
            .child(DomNode::new("label").text("Nickname").child(input("text"))),
        DomNode::new("div").child(DomNode::new("div").child(DomNode::new("p").text("No controls here"))),
    ])]);

    let (tier, containers) = locate_with_tier(&doc).unwrap();
    assert_eq!(tier, ContainerTier::ControlParent);
    assert_eq!(containers.len(), 2);
}

#[test]
fn page_without_controls_has_no_containers() {
    let doc = page(vec![DomNode::new("p").text("Hello")]);
    assert!(locate_with_tier(&doc).is_none());
    assert!(locate_question_containers(&doc).is_empty());
}

// =========================================================================
// Titles
// =========================================================================

#[test]
fn heading_wins_over_earlier_label() {
    let doc = page(vec![DomNode::new("div")
        .attr("role", "listitem")
        .child(DomNode::new("span").text("Required"))
        .child(heading("Your Email"))
        .child(input("email"))]);

    let container = locate_question_containers(&doc)[0];
    assert_eq!(extract_title(&doc, container, DEFAULT_TITLE_MAX_CHARS), "Your Email");
}

#[test]
fn html_headings_count_as_headings() {
    let doc = page(vec![DomNode::new("fieldset")
        .child(DomNode::new("label").text("hint"))
        .child(DomNode::new("h3").text("  Shipping address "))
        .child(input("text"))]);

    let container = locate_question_containers(&doc)[0];
    assert_eq!(extract_title(&doc, container, DEFAULT_TITLE_MAX_CHARS), "Shipping address");
}

#[test]
fn fallback_title_skips_long_text() {
    let long = "x".repeat(300);
    let almost = "y".repeat(299);

    let doc = page(vec![
        DomNode::new("div")
            .attr("class", "field")
            .child(DomNode::new("span").text(&long))
            .child(DomNode::new("label").text("Short title"))
            .child(input("text")),
        DomNode::new("div")
            .attr("class", "field")
            .child(DomNode::new("span").text(&almost))
            .child(input("text")),
    ]);

    let containers = locate_question_containers(&doc);
    assert_eq!(extract_title(&doc, containers[0], DEFAULT_TITLE_MAX_CHARS), "Short title");
    assert_eq!(extract_title(&doc, containers[1], DEFAULT_TITLE_MAX_CHARS), almost);
}

#[test]
fn fallback_title_skips_option_labels() {
    let doc = page(vec![DomNode::new("div")
        .attr("role", "listitem")
        .child(
            DomNode::new("div")
                .attr("role", "radio")
                .child(DomNode::new("span").text("Yes")),
        )
        .child(DomNode::new("span").text("Do you agree?"))]);

    let container = locate_question_containers(&doc)[0];
    assert_eq!(extract_title(&doc, container, DEFAULT_TITLE_MAX_CHARS), "Do you agree?");
}

#[test]
fn untitled_question_has_empty_title() {
    let doc = page(vec![DomNode::new("div").attr("role", "listitem").child(input("text"))]);
    let question = &discover_questions(&doc, DEFAULT_TITLE_MAX_CHARS)[0];
    assert_eq!(question.title, "");
    assert!(!question.is_supported());
}

// =========================================================================
// Types
// =========================================================================

#[test]
fn classify_each_widget_kind() {
    let doc = form_page(
        "Kinds",
        vec![
            text_question("a", "Email", "email"),
            paragraph_question("b", "Bio"),
            radio_question("Size", &[("S", false), ("M", false)]),
            checkbox_question("Extras", &[("Cheese", false)]),
            native_select_question("c", "Country", &[("ca", "Canada")]),
        ],
        vec![],
    );

    let types: Vec<FieldType> = discover_questions(&doc, DEFAULT_TITLE_MAX_CHARS)
        .into_iter()
        .map(|q| q.field_type)
        .collect();

    assert_eq!(
        types,
        vec![
            FieldType::Text,
            FieldType::Paragraph,
            FieldType::Radio,
            FieldType::Checkbox,
            FieldType::Dropdown,
        ]
    );
}

#[test]
fn classify_type_precedence_and_defaults() {
    let doc = page(vec![
        // textarea beats a single-line input
        DomNode::new("fieldset").child(input("text")).child(DomNode::new("textarea")),
        // no type attribute means text
        DomNode::new("fieldset").child(DomNode::new("input")),
        // password counts as text
        DomNode::new("fieldset").child(input("password")),
        // native radio
        DomNode::new("fieldset").child(input("radio")),
        // a file picker is not supported
        DomNode::new("fieldset").child(input("file")),
    ]);

    let containers = locate_question_containers(&doc);
    let types: Vec<FieldType> = containers.iter().map(|c| classify_type(&doc, *c)).collect();

    assert_eq!(
        types,
        vec![
            FieldType::Paragraph,
            FieldType::Text,
            FieldType::Text,
            FieldType::Radio,
            FieldType::Unknown,
        ]
    );
}

// =========================================================================
// Labels
// =========================================================================

#[test]
fn accessible_label_sources() {
    let doc = page(vec![
        DomNode::new("input").attr("id", "aria").attr("aria-label", "From aria").text("ignored"),
        DomNode::new("label").text("Wrapped").child(DomNode::new("input").attr("id", "wrapped")),
        DomNode::new("label").attr("for", "linked").text("Linked"),
        DomNode::new("input").attr("id", "linked"),
        DomNode::new("input").attr("id", "valued").attr("value", "Fallback"),
    ]);

    let label = |id: &str| doc.accessible_label(doc.find_by_id(id).unwrap());
    assert_eq!(label("aria"), "From aria");
    assert_eq!(label("wrapped"), "Wrapped");
    assert_eq!(label("linked"), "Linked");
    assert_eq!(label("valued"), "Fallback");
}

// =========================================================================
// Popup lookup
// =========================================================================

fn open_listbox(id: &str, option: &str) -> DomNode {
    DomNode::new("div")
        .attr("role", "listbox")
        .attr("id", id)
        .child(DomNode::new("div").attr("role", "option").text(option))
}

#[test]
fn popup_without_reference_skips_listboxes_open_before_click() {
    let doc = page(vec![
        DomNode::new("div").attr("role", "combobox").attr("id", "combo"),
        open_listbox("old", "Old"),
        open_listbox("new", "New"),
    ]);
    let trigger = doc.find_by_id("combo").unwrap();
    let old = doc.find_by_id("old").unwrap();

    assert_eq!(referenced_listbox(&doc, trigger), None);

    let options = popup_options(&doc, trigger, &[old]).unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].label, "New");

    let all_open = visible_listboxes(&doc);
    assert!(popup_options(&doc, trigger, &all_open).is_none());
}

#[test]
fn popup_reference_wins_over_other_open_listboxes() {
    let doc = page(vec![
        DomNode::new("div").attr("role", "combobox").attr("id", "combo").attr("aria-owns", "mine"),
        open_listbox("other", "Other"),
        open_listbox("mine", "Mine"),
        open_listbox("closed", "Closed").attr("hidden", ""),
        DomNode::new("div").attr("role", "combobox").attr("id", "shut").attr("aria-controls", "closed"),
    ]);
    let trigger = doc.find_by_id("combo").unwrap();
    let mine = doc.find_by_id("mine").unwrap();

    assert_eq!(referenced_listbox(&doc, trigger), Some(mine));
    let options = popup_options(&doc, trigger, &visible_listboxes(&doc)).unwrap();
    assert_eq!(options[0].label, "Mine");

    // a referenced popup that is still hidden yields nothing, even with others open
    let shut = doc.find_by_id("shut").unwrap();
    assert!(popup_options(&doc, shut, &[]).is_none());
}

// =========================================================================
// Capture
// =========================================================================

#[test]
fn capture_reads_current_answers() {
    let doc = load_fixture("signup_filled.json");
    let captured = capture_form(&doc);

    assert_eq!(captured.form_title, "Newsletter signup");

    let summary: Vec<(&str, FieldType, Vec<&str>)> = captured
        .fields
        .iter()
        .map(|f| (f.label.as_str(), f.field_type, f.values.iter().map(String::as_str).collect()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("Full name", FieldType::Text, vec!["Ada Lovelace"]),
            ("Email", FieldType::Text, vec!["ada@example.com"]),
            ("About you", FieldType::Paragraph, vec!["Mathematician"]),
            ("Plan", FieldType::Radio, vec!["Monthly"]),
            ("Topics", FieldType::Checkbox, vec!["Science", "History"]),
            ("Country", FieldType::Dropdown, vec!["United Kingdom"]),
        ]
    );
}

#[test]
fn capture_never_reads_passwords_or_blank_answers() {
    let doc = page(vec![
        DomNode::new("fieldset")
            .child(DomNode::new("legend").text("Password"))
            .child(input("password").value("hunter2")),
        DomNode::new("fieldset")
            .child(DomNode::new("legend").text("Nickname"))
            .child(input("text").value("   ")),
    ]);

    assert!(capture_form(&doc).fields.is_empty());
}
