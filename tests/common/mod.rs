//! Synthetic PDF construction shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Helvetica without a Widths array draws 12pt glyphs 6pt wide.
pub const FONT_SIZE: i64 = 12;
pub const GLYPH_WIDTH: f32 = 6.0;

/// A run of text whose baseline starts at `(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    pub text: &'a str,
    pub x: f32,
    pub y: f32,
}

pub fn run(text: &str, x: f32, y: f32) -> Run<'_> {
    Run { text, x, y }
}

/// Build a US Letter PDF, one content stream per page.
pub fn build_pdf(pages: &[Vec<Run<'_>>]) -> Vec<u8> {
    build(pages, false)
}

/// Like [`build_pdf`], but every page paints its runs through a form
/// XObject that carries its own font resources.
pub fn build_form_pdf(pages: &[Vec<Run<'_>>]) -> Vec<u8> {
    build(pages, true)
}

fn build(pages: &[Vec<Run<'_>>], in_form: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for r in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), Object::Integer(FONT_SIZE)]));
            operations.push(Operation::new("Td", vec![Object::Real(r.x), Object::Real(r.y)]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(r.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let encoded = Content { operations }
            .encode()
            .expect("encode content stream");

        let page_id = if in_form {
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ],
                    "Resources" => resources_id,
                },
                encoded,
            ));
            let page_content = Content {
                operations: vec![
                    Operation::new("q", vec![]),
                    Operation::new("Do", vec!["Fm1".into()]),
                    Operation::new("Q", vec![]),
                ],
            }
            .encode()
            .expect("encode content stream");
            let content_id = doc.add_object(Stream::new(dictionary! {}, page_content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Fm1" => form_id },
                },
            })
        } else {
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            })
        };
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize PDF");
    bytes
}

/// The ten-page book: a header in the top margin of every page, a body line
/// inside the keep area, and the markers in the bottom margin of pages 2
/// and 8.
pub fn ten_page_book() -> Vec<u8> {
    let bodies: Vec<String> = (1..=10).map(|n| format!("Page {} body", n)).collect();
    let pages: Vec<Vec<Run<'_>>> = bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let mut runs = vec![run("HEADER", 60.0, 760.0), run(body, 100.0, 400.0)];
            match i + 1 {
                2 => runs.push(run("Introduction", 100.0, 40.0)),
                8 => runs.push(run("Conclusion", 100.0, 40.0)),
                _ => {}
            }
            runs
        })
        .collect();
    build_pdf(&pages)
}
