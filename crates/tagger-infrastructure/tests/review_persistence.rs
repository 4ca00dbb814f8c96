use std::fs;
use std::sync::Arc;

use tagger_core::item::Item;
use tagger_core::taxonomy::TaxonomyRepository;
use tagger_core::{REVIEWED_TAG, ReviewSession};
use tagger_infrastructure::{CsvTaxonomyRepository, JsonItemRepository};
use tempfile::TempDir;

const ITEMS: &str = r#"[
    {"key": "AAA", "title": "Peatland carbon", "abstract": "Peat stores carbon.", "tags": [{"tag": "carbon", "type": 1}]},
    {"key": "BBB", "title": "Urban heat", "abstract": "Cities are warm.", "tags": []},
    {"key": "CCC", "title": "Bird counts", "abstract": "We counted birds.", "tags": []}
]"#;

const DICTIONARY: &str = "Category,Tag,Definition\ncat1,A,defA\ncat1,B,defB\n";

struct Fixture {
    _dir: TempDir,
    input: std::path::PathBuf,
    output: std::path::PathBuf,
    taxonomy: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("zotero_items.json");
    let output = dir.path().join("tagged_items.json");
    let taxonomy = dir.path().join("dictionary.csv");
    fs::write(&input, ITEMS).unwrap();
    fs::write(&taxonomy, DICTIONARY).unwrap();
    Fixture {
        _dir: dir,
        input,
        output,
        taxonomy,
    }
}

fn read_output(fixture: &Fixture) -> Vec<Item> {
    serde_json::from_str(&fs::read_to_string(&fixture.output).unwrap()).unwrap()
}

#[test]
fn test_commit_writes_whole_sequence_to_output() {
    let fixture = fixture();
    let taxonomy = Arc::new(CsvTaxonomyRepository::new(&fixture.taxonomy).load().unwrap());
    let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
    let mut session = ReviewSession::load(repository, taxonomy).unwrap();

    session.toggle("B").unwrap();
    session.commit().unwrap();

    let written = read_output(&fixture);
    assert_eq!(written.len(), 3);
    assert_eq!(
        written[0].assigned_tags,
        Some(vec!["B".to_string(), REVIEWED_TAG.to_string()])
    );
    assert_eq!(written[0].source_tag_names(), vec!["carbon"]);
    assert!(written[1].assigned_tags.is_none());

    // The item source is never rewritten
    assert_eq!(fs::read_to_string(&fixture.input).unwrap(), ITEMS);
}

#[test]
fn test_resumed_session_shows_saved_selection() {
    let fixture = fixture();
    let taxonomy = Arc::new(CsvTaxonomyRepository::new(&fixture.taxonomy).load().unwrap());

    {
        let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
        let mut session = ReviewSession::load(repository, taxonomy.clone()).unwrap();
        session.toggle("A").unwrap();
        session.toggle("B").unwrap();
        session.commit().unwrap();
    }

    let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
    let session = ReviewSession::load(repository, taxonomy).unwrap();
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.pending_ordered(), vec!["A".to_string(), "B".to_string()]);
    assert_eq!(session.progress().reviewed, 1);
}

#[test]
fn test_refetched_input_keeps_saved_selection_and_offers_new_items() {
    let fixture = fixture();
    let taxonomy = Arc::new(CsvTaxonomyRepository::new(&fixture.taxonomy).load().unwrap());
    fs::write(
        &fixture.input,
        r#"[{"key": "K1", "title": "First", "abstract": "One", "tags": []}]"#,
    )
    .unwrap();

    {
        let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
        let mut session = ReviewSession::load(repository, taxonomy.clone()).unwrap();
        session.toggle("A").unwrap();
        session.commit().unwrap();
    }

    // A later fetch adds a second item to the source
    fs::write(
        &fixture.input,
        r#"[
            {"key": "K1", "title": "First", "abstract": "One", "tags": []},
            {"key": "K2", "title": "Second", "abstract": "Two", "tags": []}
        ]"#,
    )
    .unwrap();

    let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
    let mut session = ReviewSession::load(repository, taxonomy).unwrap();
    assert_eq!(session.len(), 2);
    assert_eq!(session.current().unwrap().key, "K1");
    assert_eq!(session.pending_ordered(), vec!["A".to_string()]);

    // Reviewing the new item keeps the earlier review in the output
    session.skip();
    session.commit().unwrap();
    let written = read_output(&fixture);
    assert_eq!(
        written[0].assigned_tags,
        Some(vec!["A".to_string(), REVIEWED_TAG.to_string()])
    );
    assert!(written[1].is_reviewed());
}

#[test]
fn test_empty_output_file_does_not_block_startup() {
    let fixture = fixture();
    fs::write(&fixture.output, "").unwrap();

    let taxonomy = Arc::new(CsvTaxonomyRepository::new(&fixture.taxonomy).load().unwrap());
    let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
    let session = ReviewSession::load(repository, taxonomy).unwrap();
    assert_eq!(session.len(), 3);
}

#[test]
fn test_missing_item_source_prevents_session() {
    let fixture = fixture();
    fs::remove_file(&fixture.input).unwrap();

    let taxonomy = Arc::new(CsvTaxonomyRepository::new(&fixture.taxonomy).load().unwrap());
    let repository = Arc::new(JsonItemRepository::new(&fixture.input, &fixture.output, true));
    let result = ReviewSession::load(repository, taxonomy);
    assert!(matches!(result, Err(ref err) if err.is_not_found()));
}
