//! Document-to-sentence-file tests through the public API.
//!
//! Run with: cargo test --package sentex-core --test test_pipeline_e2e

use std::path::Path;

use pretty_assertions::assert_eq;
use sentex_core::{
    BlockNode, Document, DocumentOutcome, ExtractorConfig, HtmlParseOptions, PipelineContext,
    SegmenterConfig, Stage,
};

const REFERENCE_PARAGRAPH: &str =
    "Dr. Smith (Fig. 1) noted that levels rose. See p. 14) for details. et al. authors confirmed this result.";

fn context() -> PipelineContext {
    PipelineContext::new(
        ExtractorConfig::default(),
        &SegmenterConfig::default(),
        HtmlParseOptions::default(),
    )
    .expect("built-in model loads")
}

fn write_json(dir: &Path, doc: &Document) -> std::path::PathBuf {
    let path = dir.join(format!("{}.json", doc.key));
    std::fs::write(&path, serde_json::to_string(doc).unwrap()).unwrap();
    path
}

#[test]
fn test_reference_article_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let html = format!(
        "<html><body>\
         <h1>A study of levels</h1>\
         <p>Journal front matter, not part of the body.</p>\
         <h2>Abstract</h2>\
         <p>{REFERENCE_PARAGRAPH}</p>\
         <p>Too short.</p>\
         <h2>Results</h2>\
         <p>The second body paragraph is also kept because it is long enough.</p>\
         <h2>Author Contributions</h2>\
         <p>JS designed the study and wrote the manuscript with help from all.</p>\
         </body></html>"
    );
    let input = dir.path().join("PMC100.html");
    std::fs::write(&input, html).unwrap();
    let out = dir.path().join("out");

    let outcome = context().process_file(Stage::Full, &input, &out).unwrap();

    let expected = [
        "Dr. Smith (Fig. 1) noted that levels rose.",
        "See p. 14) for details.",
        "et al. authors confirmed this result.",
        "The second body paragraph is also kept because it is long enough.",
    ];
    assert_eq!(
        outcome,
        DocumentOutcome::Written { output: out.join("PMC100.txt"), items: expected.len() }
    );
    let written = std::fs::read_to_string(out.join("PMC100.txt")).unwrap();
    assert_eq!(written, expected.join("\n"));
}

#[test]
fn test_zero_sentences_iff_zero_paragraphs() {
    let ctx = context();
    let docs = [
        Document::new("empty", vec![]),
        Document::new("only-headings", vec![BlockNode::heading("Abstract"), BlockNode::heading("Methods")]),
        Document::new("body", vec![BlockNode::heading("Abstract"), BlockNode::paragraph(REFERENCE_PARAGRAPH)]),
        Document::new(
            "no-marker",
            vec![BlockNode::paragraph("Without any marker the scan starts at the first node of the page.")],
        ),
    ];
    for doc in &docs {
        let out = ctx.sentences(doc);
        assert_eq!(out.paragraphs == 0, out.sentences.is_empty(), "document {}", doc.key);
    }
}

#[test]
fn test_references_right_after_abstract_gives_no_content() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Document::new(
        "PMC200",
        vec![
            BlockNode::heading("Abstract"),
            BlockNode::heading("References"),
            BlockNode::paragraph("1. Smith J, Doe A. A long citation entry that ends with a period."),
        ],
    );
    let input = write_json(dir.path(), &doc);

    let outcome = context().process_file(Stage::Full, &input, dir.path()).unwrap();

    assert_eq!(outcome, DocumentOutcome::NoContent);
    assert!(!dir.path().join("PMC200.txt").exists());
}

#[test]
fn test_stop_phrase_paragraph_dropped_before_stop_heading() {
    let doc = Document::new(
        "PMC300",
        vec![
            BlockNode::heading("Abstract"),
            BlockNode::paragraph("The data availability statement for this work is given in the appendix."),
            BlockNode::paragraph("Expression increased in every treated group compared with controls."),
            BlockNode::heading("Footnotes"),
            BlockNode::paragraph("Publisher's note: claims in published maps remain neutral here."),
        ],
    );
    let out = context().sentences(&doc);
    assert_eq!(out.paragraphs, 1);
    assert_eq!(
        out.sentences,
        vec!["Expression increased in every treated group compared with controls."]
    );
}

#[test]
fn test_two_stage_output_matches_single_pass() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Document::new(
        "PMC400",
        vec![
            BlockNode::heading("ABSTRACT"),
            BlockNode::paragraph(REFERENCE_PARAGRAPH),
            BlockNode::paragraph("A second paragraph\nwith a hard   line break ends here. It also has e.g. an aside."),
        ],
    );
    let input = write_json(dir.path(), &doc);
    let ctx = context();

    let paragraphs_dir = dir.path().join("paragraphs");
    let full_dir = dir.path().join("full");
    let split_dir = dir.path().join("split");

    ctx.process_file(Stage::Extract, &input, &paragraphs_dir).unwrap();
    let paragraph_file = paragraphs_dir.join("PMC400.txt");
    let paragraph_text = std::fs::read_to_string(&paragraph_file).unwrap();
    assert_eq!(paragraph_text.split("\n\n").count(), 2);
    assert!(!paragraph_text.contains("   "));

    ctx.process_file(Stage::Segment, &paragraph_file, &split_dir).unwrap();
    ctx.process_file(Stage::Full, &input, &full_dir).unwrap();

    let two_pass = std::fs::read_to_string(split_dir.join("PMC400.txt")).unwrap();
    let one_pass = std::fs::read_to_string(full_dir.join("PMC400.txt")).unwrap();
    assert_eq!(two_pass, one_pass);
    assert!(!one_pass.ends_with('\n'));
}

#[test]
fn test_unparseable_documents_are_errors_not_panics() {
    let dir = tempfile::tempdir().unwrap();
    let bad_json = dir.path().join("PMC500.json");
    std::fs::write(&bad_json, "{\"nodes\": [").unwrap();
    let no_body = dir.path().join("PMC501.html");
    std::fs::write(&no_body, "").unwrap();

    let ctx = context();
    assert!(ctx.process_file(Stage::Full, &bad_json, dir.path()).is_err());
    assert!(ctx.process_file(Stage::Full, &no_body, dir.path()).is_err());
}
