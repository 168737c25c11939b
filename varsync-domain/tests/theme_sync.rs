use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use varsync_core::{Color, ConfigLoader, SyncConfig};
use varsync_domain::modes::theme_mode_names;
use varsync_domain::primitives::SCALE_STEPS;
use varsync_domain::{
    export_collection, snapshot_store, InMemoryVariableStore, InteractionState, Literal, PrimitiveStore, SyncRequest,
    SyncResponse, ThemeDescriptor, ThemePipeline, TokenMapping, TokenSynchronizer, VariableStore,
};

fn themes() -> Vec<ThemeDescriptor> {
    vec![
        ThemeDescriptor::new("default", Color::from_hex("#3366ff").unwrap()).system(),
        ThemeDescriptor::new("forest", Color::from_hex("#228b22").unwrap()).light_only(),
    ]
}

fn mappings() -> Vec<TokenMapping> {
    vec![
        TokenMapping::new("bg", "brand", 500),
        TokenMapping::new("bg", "brand", 500).with_state(InteractionState::Hover),
        TokenMapping::new("text", "muted", 700).with_description("Secondary copy"),
        TokenMapping::new("border", "focus", 400).with_palette("brand"),
    ]
}

fn pipeline(store: Arc<InMemoryVariableStore>) -> ThemePipeline {
    let config = ConfigLoader::load_from_str("[sync]\nmax_alias_depth = 4\n").unwrap();
    let synchronizer = Arc::new(TokenSynchronizer::new(store, config.sync));
    ThemePipeline::new(synchronizer)
}

fn assert_clean(response: &SyncResponse) {
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert!(response.warnings.is_empty(), "warnings: {:?}", response.warnings);
}

#[tokio::test]
async fn test_pipeline_builds_primitives_and_semantic_tokens() {
    let store = Arc::new(InMemoryVariableStore::new());
    let report = pipeline(store.clone()).run(&themes(), &mappings(), "Semantic").await;

    assert_clean(&report.primitives);
    assert_clean(&report.semantic);
    assert_eq!(report.primitives.created, 2 * SCALE_STEPS.len());
    assert_eq!(report.semantic.created, 4);

    let primitives = store.find_collection_by_name("Primitives").await.unwrap().unwrap();
    let mode_names: Vec<&str> = primitives.modes.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(mode_names, vec!["Value"]);

    let semantic = store.find_collection_by_name("Semantic").await.unwrap().unwrap();
    let mode_names: Vec<String> = semantic.modes.iter().map(|m| m.name.clone()).collect();
    assert_eq!(mode_names, theme_mode_names(&themes(), "default"));
    assert_eq!(mode_names, vec!["light", "dark", "forest-light"]);
}

#[tokio::test]
async fn test_semantic_tokens_resolve_through_primitives() {
    let store = Arc::new(InMemoryVariableStore::new());
    let pipeline = pipeline(store.clone());
    pipeline.run(&themes(), &mappings(), "Semantic").await;

    let snapshot = snapshot_store(store.as_ref()).await.unwrap();
    let semantic = snapshot.collection_by_name("Semantic").unwrap().clone();
    let brand = PrimitiveStore::from_themes(&themes(), "default");

    let light = pipeline.export("Semantic", "light").await.unwrap();
    assert!(light.unresolved.is_empty(), "{:?}", light.unresolved);
    let expected_base = brand.lookup("brand/500").unwrap();
    let expected_hover = brand.lookup("brand/600").unwrap();
    let hex = |literal: Literal| match literal {
        Literal::Color(c) => c.to_hex_with_alpha(),
        other => panic!("expected a colour, got {:?}", other),
    };
    assert_eq!(light.tokens["bg"]["brand"], json!(hex(expected_base)));
    assert_eq!(light.tokens["bg"]["brandHover"], json!(hex(expected_hover)));

    let dark = export_collection(&snapshot, &semantic, "dark", 4);
    assert_eq!(dark.tokens["text"]["muted"], json!(hex(brand.lookup("brand/300").unwrap())));

    let forest = export_collection(&snapshot, &semantic, "forest-light", 4);
    assert_eq!(forest.tokens["bg"]["brand"], json!(hex(brand.lookup("forest/500").unwrap())));
    // fixed palette wins over the theme palette
    assert_eq!(forest.tokens["border"]["focus"], json!(hex(brand.lookup("brand/400").unwrap())));
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let store = Arc::new(InMemoryVariableStore::new());
    let pipeline = pipeline(store.clone());
    pipeline.run(&themes(), &mappings(), "Semantic").await;

    let second = pipeline.run(&themes(), &mappings(), "Semantic").await;
    assert!(second.is_success());
    assert_eq!((second.primitives.created, second.primitives.updated), (0, 0));
    assert_eq!((second.semantic.created, second.semantic.updated), (0, 0));
}

#[tokio::test]
async fn test_changing_a_brand_colour_updates_only_primitives() {
    let store = Arc::new(InMemoryVariableStore::new());
    let pipeline = pipeline(store.clone());
    pipeline.run(&themes(), &mappings(), "Semantic").await;

    let mut recoloured = themes();
    recoloured[1].brand_color = Color::from_hex("#006400").unwrap();
    let report = pipeline.run(&recoloured, &mappings(), "Semantic").await;

    assert_eq!(report.primitives.created, 0);
    assert!(report.primitives.updated > 0);
    assert!(report.primitives.updated <= SCALE_STEPS.len());
    // aliases still point at the same primitives
    assert_eq!(report.semantic.updated, 0);
}

#[tokio::test]
async fn test_semantic_pass_without_primitives_writes_nothing() {
    let store = Arc::new(InMemoryVariableStore::new());
    let synchronizer = TokenSynchronizer::new(store.clone(), SyncConfig::default());
    let request = SyncRequest::new("Semantic").requiring("Primitives");

    let response = synchronizer.synchronize(&request).await;
    assert_eq!(response.errors.len(), 1);
    assert!(store.list_collections().await.unwrap().is_empty());
}
