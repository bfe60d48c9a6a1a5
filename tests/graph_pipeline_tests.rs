use satgraph::ingestion::{load_documents, ExtractionPipeline, GazetteerRecognizer};
use satgraph::memory::{GraphStore, MemoryStore, SnapshotStore};
use satgraph::reasoning::Direction;
use satgraph::{ExtractionBatch, KgError, KnowledgeBase, KnowledgeGraph};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn write_page(dir: &TempDir, file: &str, content: &str) {
    let page = serde_json::json!({
        "url": format!("https://portal.example/{}", file),
        "title": file,
        "content": content,
    });
    fs::write(dir.path().join(file), page.to_string()).unwrap();
}

fn crawl_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_page(&dir, "01_sounder.json", "INSAT-3D Sounder measures humidity");
    write_page(&dir, "02_scat.json", "SCATSAT-1 Scatterometer measures wind speed");
    write_page(&dir, "03_empty.json", "");
    fs::write(dir.path().join("scraped_urls.json"), "[\"https://portal.example\"]").unwrap();
    dir
}

#[test]
fn crawled_pages_become_a_queryable_graph() {
    let crawl = crawl_fixture();
    let documents = load_documents(crawl.path()).unwrap();
    assert_eq!(documents.len(), 3);

    let pipeline = ExtractionPipeline::new(Arc::new(GazetteerRecognizer::default()));
    let batch = pipeline.extract(&documents);

    let mut kb = KnowledgeBase::open(MemoryStore::new());
    let report = kb.ingest(&batch).unwrap();
    assert_eq!(report.entities_added, 6);
    assert_eq!(report.relationships_added, 2);

    let related = kb.find_related("sounder", 2);
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].name, "humidity");
    assert_eq!(related[0].distance, 1);
    assert_eq!(related[0].relationship_path[0].as_str(), "MEASURES");

    let details = kb.get_entity_details("wind").unwrap();
    assert_eq!(details.relationships.len(), 1);
    assert_eq!(details.relationships[0].related_entity, "Scatterometer");
    assert_eq!(details.relationships[0].direction, Direction::Incoming);

    let hits = kb.search("Which sensor measures humidity or wind?", 10);
    let names: Vec<_> = hits.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Sounder", "Scatterometer"]);
}

#[test]
fn snapshot_store_round_trips_the_graph() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("graph.json");
    let batch: ExtractionBatch = serde_json::from_str(
        r#"{
            "entities": [
                {"text": "INSAT-3D", "label": "SATELLITE", "properties": {"orbit": "geostationary"}},
                {"text": "Imager", "label": "SENSOR"},
                {"text": "Meteorological data", "label": "DATA_PRODUCT"}
            ],
            "relationships": [
                {"subject": "INSAT-3D", "predicate": "provides", "object": "Meteorological data",
                 "confidence": 0.8, "source_text": "INSAT-3D provides meteorological data"},
                {"subject": "Imager", "predicate": "generates", "object": "Meteorological data"}
            ]
        }"#,
    )
    .unwrap();

    let mut kb = KnowledgeBase::open(SnapshotStore::new(&path));
    kb.ingest(&batch).unwrap();
    kb.save().unwrap();
    let original = kb.close().unwrap();

    let restored = SnapshotStore::new(&path).load().unwrap();
    assert_eq!(restored.node_count(), 3);
    assert_eq!(restored.edge_count(), 2);
    assert_eq!(
        original.entities().collect::<Vec<_>>(),
        restored.entities().collect::<Vec<_>>()
    );

    let restored_kb = KnowledgeBase::with_graph(restored, MemoryStore::new());
    let details = restored_kb.get_entity_details("insat").unwrap();
    assert_eq!(
        details.properties.extra.get("orbit"),
        Some(&serde_json::json!("geostationary"))
    );
    let related = restored_kb.find_related("insat-3d", 2);
    assert_eq!(related.len(), 2);
    assert_eq!(related[1].name, "Imager");
    assert_eq!(related[1].distance, 2);
}

#[test]
fn snapshot_save_replaces_previous_content() {
    let dir = TempDir::new().unwrap();
    let store = SnapshotStore::new(dir.path().join("graph.json"));

    let mut big = KnowledgeGraph::new();
    big.build(
        &[
            satgraph::ExtractedEntity::new("Oceansat-2", "SATELLITE"),
            satgraph::ExtractedEntity::new("OCM", "SENSOR"),
        ],
        &[],
    )
    .unwrap();
    store.save(&big).unwrap();
    store.save(&KnowledgeGraph::new()).unwrap();

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn missing_snapshot_loads_empty() {
    let dir = TempDir::new().unwrap();
    let graph = SnapshotStore::new(dir.path().join("absent.json")).load().unwrap();
    assert!(graph.is_empty());
}

#[test]
fn malformed_batch_is_rejected_as_a_whole() {
    let batch: ExtractionBatch = serde_json::from_str(
        r#"{
            "entities": [{"text": "ISRO", "label": "ORGANIZATION"}, {"text": " ", "label": "SATELLITE"}],
            "relationships": []
        }"#,
    )
    .unwrap();
    let mut kb = KnowledgeBase::open(MemoryStore::new());
    let err = kb.ingest(&batch).unwrap_err();
    assert!(matches!(err, KgError::MalformedInput { index: 1, field: "text", .. }));
    assert!(kb.graph().is_empty());

    let missing_field = serde_json::from_str::<ExtractionBatch>(
        r#"{"relationships": [{"subject": "ISRO", "object": "INSAT-3D"}]}"#,
    );
    assert!(missing_field.is_err());
}

#[test]
fn export_reports_the_assembled_graph() {
    let mut kb = KnowledgeBase::open(MemoryStore::new());
    let batch: ExtractionBatch = serde_json::from_str(
        r#"{
            "entities": [
                {"text": "Megha-Tropiques", "label": "SATELLITE"},
                {"text": "SAPHIR", "label": "SENSOR"},
                {"text": "1 km", "label": "RESOLUTION"},
                {"text": "rainfall", "label": "PARAMETER"}
            ],
            "relationships": [
                {"subject": "Megha-Tropiques", "predicate": "carries", "object": "SAPHIR"},
                {"subject": "SAPHIR", "predicate": "measures", "object": "rainfall"},
                {"subject": "SAPHIR", "predicate": "measures", "object": "cloud cover"}
            ]
        }"#,
    )
    .unwrap();
    kb.ingest(&batch).unwrap();

    let export = kb.export();
    assert_eq!(export.stats.node_count, 4);
    assert_eq!(export.stats.edge_count, 2);
    assert_eq!(
        export.stats.node_types.into_iter().collect::<Vec<_>>(),
        vec!["Instrument", "MeasurementType", "Mission", "Specification"]
    );
    assert_eq!(
        export.stats.relationship_types.into_iter().collect::<Vec<_>>(),
        vec!["CARRIES", "MEASURES"]
    );
}
