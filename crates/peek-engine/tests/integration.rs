//! End-to-end session flows: harvest, inspect, edit, override text.

use peek_css::{DeclId, RuleId};
use peek_dom::{Element, ElementPath, RawRule, SheetHandle};
use peek_engine::{CommitFunnel, CommitRequest, EditField, MatchedView, Session};
use peek_harvest::{HarvestError, SheetFetcher};
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Default)]
struct StubFetcher {
    sheets: HashMap<String, String>,
}

impl StubFetcher {
    fn with(mut self, url: &str, text: &str) -> Self {
        self.sheets.insert(url.to_string(), text.to_string());
        self
    }
}

impl SheetFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, HarvestError> {
        self.sheets
            .get(url)
            .cloned()
            .ok_or_else(|| HarvestError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

fn page_sheets() -> Vec<SheetHandle> {
    vec![
        SheetHandle::linked(
            "https://cdn.example/assets/app.css",
            vec![
                RawRule::style("div", "color: blue; padding: 2px"),
                RawRule::style(".card", "color: red; margin: 0"),
            ],
        ),
        SheetHandle::restricted("https://cdn.example/themes/dark.css"),
    ]
}

fn loaded_session() -> Session {
    let fetcher = StubFetcher::default().with(
        "https://cdn.example/themes/dark.css",
        ".card { background: black }",
    );
    let mut session = Session::new();
    assert!(smol::block_on(session.harvest(&page_sheets(), &fetcher)));
    session
}

#[test]
fn test_loading_until_first_harvest() {
    let session = Session::new();
    let chain = vec![Element::new("div")];
    let path = ElementPath::new(&chain).unwrap();

    assert!(session.is_loading());
    assert_eq!(session.matched_view(&path), MatchedView::Loading);
}

#[test]
fn test_harvest_and_match_view() {
    let session = loaded_session();
    let chain = vec![Element::new("div").with_class("card")];
    let path = ElementPath::new(&chain).unwrap();

    let MatchedView::Matched { blocks } = session.matched_view(&path) else {
        panic!("expected matches");
    };

    // .card blocks render before div; the later .card sheet wins the tie.
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].selector, ".card");
    assert_eq!(blocks[0].source_label.as_deref(), Some("dark.css"));
    assert_eq!(blocks[1].selector, ".card");
    assert_eq!(blocks[1].source_label.as_deref(), Some("app.css"));
    assert_eq!(blocks[2].selector, "div");

    // color: .card beats div; padding is div's alone.
    let div_color = &blocks[2].declarations[0];
    assert!(div_color.is_overridden);
    assert!(!blocks[2].declarations[1].is_overridden);
    assert!(!blocks[1].declarations[0].is_overridden);
}

#[test]
fn test_inline_style_block_renders_first() {
    let session = loaded_session();
    let chain = vec![Element::new("div")
        .with_class("card")
        .with_inline_style("color: green")];
    let path = ElementPath::new(&chain).unwrap();

    let MatchedView::Matched { blocks } = session.matched_view(&path) else {
        panic!("expected matches");
    };

    assert!(blocks[0].is_inline_block);
    assert_eq!(blocks[0].selector, "element.style");
    assert!(!blocks[0].declarations[0].is_editable);
    // Every stylesheet color now loses to the inline one.
    assert!(blocks[2].declarations[0].is_overridden);
}

#[test]
fn test_no_matching_rules_state() {
    let session = loaded_session();
    let chain = vec![Element::new("nav")];
    let path = ElementPath::new(&chain).unwrap();

    assert_eq!(session.matched_view(&path), MatchedView::NoMatchingRules);
}

#[test]
fn test_edit_commit_and_revert() {
    let mut session = loaded_session();

    // Rule 1 is .card from app.css with color: red.
    session.commit_field(RuleId(1), Some(DeclId(0)), EditField::Value, "hotpink");
    assert_eq!(
        session.override_style_text(),
        ".card {\n  color: hotpink !important;\n}\n"
    );

    // Reverting to the harvested value clears the log and the text.
    session.commit_field(RuleId(1), Some(DeclId(0)), EditField::Value, "red");
    assert_eq!(session.change_count(), 0);
    assert_eq!(session.override_style_text(), "");
}

#[test]
fn test_property_rename_coalesces_with_value() {
    let mut session = loaded_session();

    session.commit_field(RuleId(1), Some(DeclId(0)), EditField::Property, "colour");
    session.commit_field(RuleId(1), Some(DeclId(0)), EditField::Value, "blue");

    let text = session.override_style_text();
    assert!(text.contains("colour: blue !important"));
    // The rename absorbed the value change into one emitted declaration.
    assert!(!text.contains("color:"));
}

#[test]
fn test_new_declaration_ids_continue_rule_counter() {
    let mut session = loaded_session();

    // Rule 1 has two harvested declarations, so user rows start at 2.
    assert_eq!(session.add_declaration(RuleId(1)), Some(DeclId(2)));
    assert_eq!(session.add_declaration(RuleId(1)), Some(DeclId(3)));
    assert_eq!(session.add_declaration(RuleId(99)), None);

    session.commit_new_declaration(RuleId(1), DeclId(2), "opacity", "0.5");
    assert!(session
        .override_style_text()
        .contains("opacity: 0.5 !important"));

    // The committed row shows up in the view as an editable declaration.
    let chain = vec![Element::new("div").with_class("card")];
    let path = ElementPath::new(&chain).unwrap();
    let MatchedView::Matched { blocks } = session.matched_view(&path) else {
        panic!("expected matches");
    };
    let card = blocks
        .iter()
        .find(|b| b.rule_id == Some(1))
        .expect("card block");
    let row = card.declarations.last().unwrap();
    assert_eq!(row.decl_id, Some(2));
    assert_eq!(row.property, "opacity");
    assert!(row.is_editable);

    session.remove_new_declaration(RuleId(1), DeclId(2));
    assert_eq!(session.override_style_text(), "");
}

#[test]
fn test_reharvest_resets_edits() {
    let mut session = loaded_session();
    session.commit_field(RuleId(1), Some(DeclId(0)), EditField::Value, "hotpink");
    assert!(!session.override_style_text().is_empty());

    let fetcher = StubFetcher::default();
    let sheets = vec![SheetHandle::inline(vec![RawRule::style(".k", "top: 0")])];
    assert!(smol::block_on(session.harvest(&sheets, &fetcher)));

    assert_eq!(session.change_count(), 0);
    assert_eq!(session.override_style_text(), "");
    assert_eq!(session.database().unwrap().len(), 1);
}

#[test]
fn test_stale_harvest_discarded() {
    let mut session = Session::new();

    let old = session.begin_harvest();
    let newer = session.begin_harvest();

    let old_db = peek_css::RuleDatabase::new(old);
    assert!(!session.install_database(old_db));
    assert!(session.is_loading());

    let new_db = peek_css::RuleDatabase::new(newer);
    assert!(session.install_database(new_db));
    assert!(!session.is_loading());
}

#[test]
fn test_funnel_debounce_and_blur_against_session() {
    let mut session = loaded_session();
    let mut funnel = CommitFunnel::with_quiet_period(Duration::from_millis(300));
    let now = Instant::now();

    let keystroke = |text: &str| CommitRequest::Field {
        rule: RuleId(1),
        decl: Some(DeclId(0)),
        field: EditField::Value,
        text: text.to_string(),
    };

    funnel.debounce(keystroke("h"), now);
    funnel.debounce(keystroke("hotpink"), now + Duration::from_millis(100));
    assert_eq!(funnel.pending(), 1);
    assert_eq!(funnel.fire_due(now + Duration::from_millis(200), &mut session), 0);

    // Blur flushes immediately and the later tick has nothing left.
    funnel.commit_now(keystroke("hotpink"), &mut session);
    assert!(session.override_style_text().contains("hotpink"));
    assert_eq!(funnel.fire_due(now + Duration::from_secs(1), &mut session), 0);
}

#[test]
fn test_view_serializes_for_ui_host() {
    let session = loaded_session();
    let chain = vec![Element::new("div").with_class("card")];
    let path = ElementPath::new(&chain).unwrap();

    let json = serde_json::to_value(session.matched_view(&path)).unwrap();
    assert_eq!(json["state"], "matched");
    assert_eq!(json["blocks"][0]["sourceLabel"], "dark.css");
    assert_eq!(json["blocks"][0]["declarations"][0]["property"], "background");
}
