use super::*;

/// Every char is 10px wide regardless of size.
struct FixedMeasure;

impl TextMeasure for FixedMeasure {
    fn measure(&mut self, text: &str, _size_px: f32) -> f64 {
        text.chars().count() as f64 * 10.0
    }
}

#[test]
fn wraps_greedily_at_word_boundaries() {
    let lines = wrap_greedy("the quick brown fox jumps", 110.0, 24.0, &mut FixedMeasure);
    assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
}

#[test]
fn fitting_text_stays_on_one_line() {
    let lines = wrap_greedy("hello there", 1000.0, 24.0, &mut FixedMeasure);
    assert_eq!(lines, vec!["hello there"]);
    assert_eq!(wrap_greedy("", 10.0, 24.0, &mut FixedMeasure), vec![String::new()]);
}

#[test]
fn oversized_word_is_placed_alone_unbroken() {
    let lines = wrap_greedy("hi supercalifragilistic yo", 60.0, 24.0, &mut FixedMeasure);
    assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
}

#[test]
fn no_line_exceeds_budget_unless_single_word() {
    let text = "Wishing you a year full of laughter sunshine and many tiny \
                adventures with the people who matter most to you";
    for budget in [40.0, 75.0, 120.0, 230.0, 600.0] {
        for line in wrap_greedy(text, budget, 24.0, &mut FixedMeasure) {
            let w = FixedMeasure.measure(&line, 24.0);
            assert!(w <= budget || !line.contains(' '), "{line:?} exceeds {budget}");
        }
    }
}

#[test]
fn approx_measure_scales_with_size() {
    let mut m = ApproxMeasure { em_advance: 0.5 };
    assert_eq!(m.measure("abcd", 10.0), 20.0);
    assert_eq!(m.measure("abcd", 20.0), 40.0);
}

#[test]
fn font_face_rejects_empty_and_missing() {
    assert!(FontFace::from_bytes(Vec::new()).is_err());
    assert!(FontFace::from_path(std::path::Path::new("/definitely/not/a/font.ttf")).is_err());
}

#[test]
fn engine_rejects_garbage_font_bytes() {
    let mut engine = TextLayoutEngine::new();
    assert!(engine.register(b"not a font").is_err());
}

#[test]
fn bundled_faces_register_and_measure_real_advances() {
    let book = FontBook::bundled().unwrap();
    let mut engine = TextLayoutEngine::new();
    let family = engine.register(book.body.unwrap().bytes()).unwrap();
    let mut m = ParleyMeasure {
        engine: &mut engine,
        family: &family,
    };
    let short = m.measure("Hi", 24.0);
    let long = m.measure("Hi there, friend", 24.0);
    assert!(short > 0.0);
    assert!(long > short);
    // Proportional: "iii" is narrower than "WWW" at the same size.
    assert!(m.measure("iii", 24.0) < m.measure("WWW", 24.0));
}

#[test]
fn or_bundled_keeps_configured_slots() {
    let custom = FontBook::bundled().unwrap().body;
    let book = FontBook {
        title: None,
        body: custom.clone(),
    }
    .or_bundled()
    .unwrap();
    assert!(book.title.is_some());
    assert_eq!(
        book.body.unwrap().bytes().len(),
        custom.unwrap().bytes().len()
    );
}
