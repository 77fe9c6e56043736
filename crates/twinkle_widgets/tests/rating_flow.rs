//! End-to-end behaviour of the star rating widget inside a document

use std::sync::{Arc, Mutex};

use twinkle_dom::Document;
use twinkle_widgets::{
    ensure_star_rating_styles, star_rating, Rating, StarRating, StarRatingStyle,
    STAR_RATING_STYLE_ID,
};

fn rating(n: u8) -> Rating {
    Rating::new(n).unwrap()
}

/// Shared log of side effects in the order they happened
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

fn mount(doc: &mut Document, journal: &Journal) -> StarRating {
    let typing_log = journal.clone();
    let rate_log = journal.clone();
    let widget = star_rating()
        .typing(move |_: &mut Document| typing_log.push("typing"))
        .on_rate(move |r| rate_log.push(format!("rate:{r}")))
        .build(doc);
    doc.append_child(doc.body(), widget.container()).unwrap();
    widget
}

#[test]
fn record_scenario_three_then_one() {
    let mut doc = Document::new();
    ensure_star_rating_styles(&mut doc, &StarRatingStyle::default()).unwrap();

    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    let widget = star_rating()
        .on_rate(move |r| sink.lock().unwrap().push(r.get()))
        .build(&mut doc);
    doc.append_child(doc.body(), widget.container()).unwrap();

    doc.click(widget.star(rating(3)));
    assert_eq!(widget.selected_values(&doc), vec![1, 2, 3]);
    assert_eq!(*recorded.lock().unwrap(), vec![3]);

    doc.click(widget.star(rating(1)));
    assert_eq!(widget.selected_values(&doc), vec![1]);
    assert_eq!(*recorded.lock().unwrap(), vec![3, 1]);
}

#[test]
fn callback_fires_once_per_click_with_star_value() {
    for n in 1..=5u8 {
        let mut doc = Document::new();
        let journal = Journal::default();
        let widget = mount(&mut doc, &journal);

        doc.click(widget.star(rating(n)));

        let rates: Vec<_> = journal
            .entries()
            .into_iter()
            .filter(|e| e.starts_with("rate:"))
            .collect();
        assert_eq!(rates, vec![format!("rate:{n}")]);
    }
}

#[test]
fn typing_indicator_runs_before_callback_on_every_click() {
    let mut doc = Document::new();
    let journal = Journal::default();
    let widget = mount(&mut doc, &journal);

    doc.click(widget.star(rating(2)));
    doc.click(widget.star(rating(5)));

    assert_eq!(
        journal.entries(),
        vec!["typing", "rate:2", "typing", "rate:5"]
    );
}

#[test]
fn typing_indicator_can_write_to_the_document() {
    let mut doc = Document::new();
    let widget = star_rating()
        .typing(|doc: &mut Document| {
            let bubble = doc.create_element("div");
            doc.set_id(bubble, "typing");
            let body = doc.body();
            doc.append_child(body, bubble).unwrap();
        })
        .build(&mut doc);
    doc.append_child(doc.body(), widget.container()).unwrap();

    assert!(doc.get_element_by_id("typing").is_none());
    doc.click(widget.star(rating(4)));
    assert!(doc.get_element_by_id("typing").is_some());
}

#[test]
fn panicking_typing_indicator_does_not_block_callback() {
    let mut doc = Document::new();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = recorded.clone();
    let widget = star_rating()
        .typing(|_: &mut Document| panic!("typing indicator unavailable"))
        .on_rate(move |r| sink.lock().unwrap().push(r.get()))
        .build(&mut doc);

    doc.click(widget.star(rating(4)));

    assert_eq!(*recorded.lock().unwrap(), vec![4]);
    assert_eq!(widget.selected(&doc), Some(rating(4)));
}

#[test]
fn panicking_callback_leaves_widget_usable() {
    let mut doc = Document::new();
    let journal = Journal::default();
    let typing_log = journal.clone();
    let widget = star_rating()
        .typing(move |_: &mut Document| typing_log.push("typing"))
        .on_rate(|r| {
            if r.get() == 2 {
                panic!("host rejected rating");
            }
        })
        .build(&mut doc);

    doc.click(widget.star(rating(2)));
    doc.click(widget.star(rating(3)));

    assert_eq!(journal.entries(), vec!["typing", "typing"]);
    assert_eq!(widget.selected(&doc), Some(rating(3)));
}

#[test]
fn two_widgets_share_one_stylesheet() {
    let mut doc = Document::new();
    let style = StarRatingStyle::default();

    ensure_star_rating_styles(&mut doc, &style).unwrap();
    let first = star_rating().build(&mut doc);
    ensure_star_rating_styles(&mut doc, &style).unwrap();
    let second = star_rating().build(&mut doc);
    doc.append_child(doc.body(), first.container()).unwrap();
    doc.append_child(doc.body(), second.container()).unwrap();

    let head = doc.head_html();
    let marker = format!("id=\"{STAR_RATING_STYLE_ID}\"");
    assert_eq!(head.matches(&marker).count(), 1);
    assert_eq!(doc.styles().count(), 1);
}

#[test]
fn widgets_keep_independent_selections() {
    let mut doc = Document::new();
    let first = star_rating().build(&mut doc);
    let second = star_rating().build(&mut doc);

    doc.click(first.star(rating(5)));
    doc.click(second.star(rating(2)));

    assert_eq!(first.selected(&doc), Some(rating(5)));
    assert_eq!(second.selected(&doc), Some(rating(2)));
}

#[test]
fn rendered_markup_matches_chat_bubble_layout() {
    let mut doc = Document::new();
    let widget = star_rating().build(&mut doc);
    doc.click(widget.star(rating(1)));

    let html = doc.to_html(widget.container());
    assert!(html.starts_with(
        "<div class=\"rating-container\"><div class=\"botMsg\" style=\"margin-top: 10px;\">\
         <div class=\"stars\"><div class=\"star-wrapper\">\
         <span class=\"star selected\" data-value=\"1\">\u{2605}</span>\
         <div class=\"star-label\">1</div></div>"
    ), "{html}");
    assert_eq!(html.matches("class=\"star\"").count(), 4);
}
