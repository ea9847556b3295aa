//! End-to-end extraction from synthetic PDF files.

mod common;

use std::fs;

use common::{build_form_pdf, build_pdf, run, ten_page_book, Run, GLYPH_WIDTH};
use pdfbody::{
    extract_bytes, extract_bytes_with_options, extract_file, extract_file_to, BodyExtractor,
    Error, ExtractOptions, ExtractionWindow, Margins, MarkerScanner, PageSource, PdfDocument,
};

fn expected_body(pages: std::ops::RangeInclusive<u32>) -> String {
    pages.map(|n| format!("Page {} body\n", n)).collect()
}

#[test]
fn test_ten_page_book() {
    let text = extract_bytes(&ten_page_book()).unwrap();

    assert_eq!(text, expected_body(2..=8));
    assert!(!text.contains("HEADER"));
    assert!(!text.contains("Page 1 body"));
    assert!(!text.contains("Page 9 body"));
    assert!(!text.contains("Page 10 body"));
}

#[test]
fn test_extract_from_file_and_write_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("book.pdf");
    let output = dir.path().join("book.txt");
    fs::write(&input, ten_page_book()).unwrap();

    assert_eq!(extract_file(&input).unwrap(), expected_body(2..=8));

    let report = extract_file_to(&input, &output, &ExtractOptions::default()).unwrap();
    assert_eq!(report.window, ExtractionWindow { start: 2, end: 8 });
    assert_eq!(report.stats.pages, 7);
    assert_eq!(fs::read_to_string(&output).unwrap(), expected_body(2..=8));
}

#[test]
fn test_extraction_is_idempotent() {
    let pdf = ten_page_book();
    let first = extract_bytes(&pdf).unwrap();
    let second = extract_bytes(&pdf).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_window_is_inclusive() {
    let bodies: Vec<String> = (1..=12).map(|n| format!("Page {} body", n)).collect();
    let pages: Vec<Vec<Run<'_>>> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let mut runs = vec![run(body, 100.0, 400.0)];
            match i + 1 {
                3 | 7 => runs.push(run("Introduction", 300.0, 30.0)),
                2 | 9 => runs.push(run("Epilogue", 300.0, 30.0)),
                _ => {}
            }
            runs
        })
        .collect();
    let pdf = build_pdf(&pages);

    let doc = PdfDocument::from_bytes(&pdf).unwrap();
    let scanner = MarkerScanner::new();
    assert_eq!(scanner.find_start_page(&doc, "Introduction").unwrap(), Some(3));
    assert_eq!(
        scanner.find_end_page(&doc, &["Epilogue", "Conclusion"]).unwrap(),
        Some(9)
    );

    let text = BodyExtractor::default().extract(&doc).unwrap();
    assert_eq!(text, expected_body(3..=9));
}

#[test]
fn test_missing_start_marker_fails_closed() {
    let pdf = build_pdf(&[
        vec![run("Cover", 100.0, 400.0)],
        vec![run("Body", 100.0, 400.0)],
        vec![run("Conclusion", 100.0, 400.0)],
    ]);

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("no-start.pdf");
    let output = dir.path().join("no-start.txt");
    fs::write(&input, &pdf).unwrap();

    let err = extract_file_to(&input, &output, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::BoundaryNotFound(_)));
    assert!(err.is_boundary_failure());
    assert!(!output.exists());

    // No output and no leftover temporary file
    let entries: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("no-start.pdf")]);
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.pdf");
    let output = dir.path().join("out.txt");
    fs::write(&input, b"%PDF-1.4\nthis is not a real document").unwrap();
    fs::write(&output, "previous run\n").unwrap();

    let err = extract_file_to(&input, &output, &ExtractOptions::default()).unwrap_err();
    assert!(err.is_open_failure(), "unexpected error: {:?}", err);
    assert!(!err.is_boundary_failure());
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous run\n");
}

#[test]
fn test_end_before_start_is_rejected() {
    let pdf = build_pdf(&[
        vec![run("Conclusion", 100.0, 400.0)],
        vec![run("Body", 100.0, 400.0)],
        vec![run("Introduction", 100.0, 400.0)],
    ]);
    let err = extract_bytes(&pdf).unwrap_err();
    assert!(matches!(err, Error::EmptyWindow { start: 3, end: 1 }));
}

#[test]
fn test_straddling_run_keeps_inside_glyphs() {
    // Ten glyphs from x=20; the keep area starts at x=50, the sixth glyph
    let pdf = build_pdf(&[vec![
        run("Introduction", 100.0, 500.0),
        run("ABCDEFGHIJ", 50.0 - 5.0 * GLYPH_WIDTH, 400.0),
        run("Conclusion", 100.0, 300.0),
    ]]);

    let text = extract_bytes(&pdf).unwrap();
    assert_eq!(text, "IntroductionFGHIJConclusion\n");
}

#[test]
fn test_custom_markers_and_margins() {
    let pdf = build_pdf(&[
        vec![run("Preface", 100.0, 400.0)],
        vec![run("Chapter 1", 100.0, 400.0), run("note", 20.0, 400.0)],
        vec![run("Afterword", 100.0, 400.0), run("note", 20.0, 400.0)],
    ]);

    let options = ExtractOptions::new()
        .with_start_marker("Chapter 1")
        .with_end_markers(["Afterword"]);
    assert_eq!(
        extract_bytes_with_options(&pdf, &options).unwrap(),
        "Chapter 1\nAfterword\n"
    );

    let options = options.with_margins(Margins::zero());
    assert_eq!(
        extract_bytes_with_options(&pdf, &options).unwrap(),
        "Chapter 1note\nAfterwordnote\n"
    );
}

#[test]
fn test_glyph_on_keep_edge_is_kept() {
    // "left " spans x=20..50, so "n" starts exactly on the left margin
    let pdf = build_pdf(&[vec![
        run("Introduction", 100.0, 500.0),
        run("left note", 50.0 - 5.0 * GLYPH_WIDTH, 400.0),
        run("Conclusion", 100.0, 300.0),
    ]]);

    let text = extract_bytes(&pdf).unwrap();
    assert_eq!(text, "IntroductionnoteConclusion\n");
}

#[test]
fn test_body_drawn_through_form_xobject() {
    let pdf = build_form_pdf(&[
        vec![run("HEADER", 60.0, 760.0), run("Front matter", 100.0, 400.0)],
        vec![run("Introduction body", 100.0, 400.0)],
        vec![run("HEADER", 60.0, 760.0), run("Conclusion", 100.0, 400.0)],
    ]);

    let doc = PdfDocument::from_bytes(&pdf).unwrap();
    assert_eq!(doc.page_text(2).unwrap(), "Introduction body");

    let text = extract_bytes(&pdf).unwrap();
    assert_eq!(text, "Introduction body\nConclusion\n");
}

#[test]
fn test_page_text_is_unfiltered() {
    let doc = PdfDocument::from_bytes(&ten_page_book()).unwrap();
    assert_eq!(doc.page_count(), 10);
    assert_eq!(doc.version(), "1.5");
    assert_eq!(doc.page_text(2).unwrap(), "HEADERPage 2 bodyIntroduction");
    assert!(matches!(doc.page_text(11), Err(Error::PageOutOfRange(11, 10))));
}
