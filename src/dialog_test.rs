use super::*;
use crate::registry::Registry;
use crate::view::render_content;

fn model_with(tag: &str) -> (ProjectModel, InstanceId) {
    let mut model = ProjectModel::new(Registry::new(), &["left", "right"]);
    let id = model.place(tag, "left").unwrap();
    (model, id)
}

#[test]
fn open_lists_every_field_in_order() {
    let (model, id) = model_with("quiz");
    let dialog = ConfigDialog::open(&model, &id).unwrap();
    let labels: Vec<_> = dialog.inputs().iter().map(|i| i.field.label).collect();
    assert_eq!(labels, ["Title", "Questions", "Time Limit"]);
    assert!(dialog.inputs().iter().all(|i| i.value.is_empty()));
    assert_eq!(dialog.title(), "Configure Quiz");
}

#[test]
fn open_prefills_stored_values() {
    let (mut model, id) = model_with("video");
    model.set_fields(&id, "left", [("title", "Intro")]).unwrap();
    let dialog = ConfigDialog::open(&model, &id).unwrap();
    assert_eq!(dialog.value("Title"), Some("Intro"));
    assert_eq!(dialog.value("url"), Some(""));
}

#[test]
fn open_missing_instance_fails() {
    let (model, _) = model_with("video");
    assert_eq!(ConfigDialog::open(&model, "video-0").unwrap_err(), BuilderError::NotFound("video-0".into()));
}

#[test]
fn confirm_writes_every_field() {
    let (mut model, id) = model_with("text");
    let mut dialog = ConfigDialog::open(&model, &id).unwrap();
    dialog.set_input("Title", "Photosynthesis").unwrap();
    dialog.confirm(&mut model).unwrap();

    let item = model.get(&id).unwrap();
    assert_eq!(item.field("title"), Some("Photosynthesis"));
    assert_eq!(item.field("content"), Some(""));
}

#[test]
fn confirm_stores_cleared_field_as_empty() {
    let (mut model, id) = model_with("text");
    model.set_fields(&id, "left", [("title", "Old")]).unwrap();
    let mut dialog = ConfigDialog::open(&model, &id).unwrap();
    dialog.set_input("title", "").unwrap();
    dialog.confirm(&mut model).unwrap();
    assert_eq!(model.get(&id).unwrap().field("title"), Some(""));
}

#[test]
fn cancel_leaves_model_unchanged() {
    let (model, id) = model_with("video");
    let before = model.clone();
    let mut dialog = ConfigDialog::open(&model, &id).unwrap();
    dialog.set_input("title", "Discarded").unwrap();
    assert_eq!(dialog.cancel(), id);
    assert_eq!(model, before);

    let item = model.get(&id).unwrap();
    assert!(item.fields.is_empty());
    let shown = render_content(item, model.registry().describe_kind(item.kind)).text_content();
    assert!(shown.contains("Untitled Video"));
    assert!(shown.contains("Not specified"));
}

#[test]
fn set_input_unknown_field_fails() {
    let (model, id) = model_with("code");
    let mut dialog = ConfigDialog::open(&model, &id).unwrap();
    let err = dialog.set_input("title", "x").unwrap_err();
    assert_eq!(err, BuilderError::UnknownField { kind: "code".into(), field: "title".into() });
}

#[test]
fn confirm_follows_a_moved_instance() {
    let (mut model, id) = model_with("diagram");
    let mut dialog = ConfigDialog::open(&model, &id).unwrap();
    model.move_to(&id, "left", "right").unwrap();
    dialog.set_input("Hotspots", "4").unwrap();
    dialog.confirm(&mut model).unwrap();
    let (container, item) = model.find(&id).unwrap();
    assert_eq!(container, "right");
    assert_eq!(item.field("hotspots"), Some("4"));
}

#[test]
fn confirm_after_removal_is_not_found() {
    let (mut model, id) = model_with("diagram");
    let dialog = ConfigDialog::open(&model, &id).unwrap();
    model.remove(&id, "left");
    assert_eq!(dialog.confirm(&mut model).unwrap_err(), BuilderError::NotFound(id));
}

#[test]
fn render_has_one_input_per_field() {
    let (model, id) = model_with("code");
    let dialog = ConfigDialog::open(&model, &id).unwrap();
    let html = dialog.render().to_html();
    assert!(html.contains("<h3>Configure Code Playground</h3>"));
    assert_eq!(html.matches("<input ").count(), 3);
    assert!(!html.contains("</input>"));
    assert!(html.contains("name=\"starting code\""));
    assert!(html.contains("<label for=\"language\">Language:</label>"));
}
