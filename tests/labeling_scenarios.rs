mod common;

use std::sync::Arc;

use motif::category::{CategoryStore, Label};
use motif::config::{LabelingStrategy, MotifConfig};
use motif::dataset::Response;
use motif::error::{MotifError, Result};
use motif::labeler::{KeywordLabeler, Labeler, SemanticLabeler, label_keyword};
use motif::pipeline::label_responses;

use common::{FailingEmbedder, LookupEmbedder};

#[test]
fn keyword_labeling_takes_first_matching_category() {
    let store = CategoryStore::from_pairs([("A", vec!["foo"]), ("B", vec!["foobar"])]);
    assert_eq!(label_keyword("this has foobar", &store), Label::assigned("A"));
    assert_eq!(label_keyword("nothing here", &store), Label::Unlabeled);
}

#[tokio::test]
async fn semantic_labeling_rejects_similarity_equal_to_threshold() -> Result<()> {
    // cos([1,0,0,0], [1,1,1,1]) == 0.5 exactly
    let embedder = LookupEmbedder::new(4)
        .with(&["respuesta"], &[1.0, 0.0, 0.0, 0.0])
        .with(&["A", "uno"], &[1.0, 1.0, 1.0, 1.0])
        .with(&["B", "dos"], &[1.0, 1.0, 1.0, 1.0]);
    let store = CategoryStore::from_pairs([("A", vec!["uno"]), ("B", vec!["dos"])]);
    let labeler = SemanticLabeler::new(embedder.cached());

    let outcome = labeler.label("respuesta", &store).await?;
    assert_eq!(outcome.label, Label::Unlabeled);
    assert_eq!(outcome.similarity, Some(0.5));

    let lenient = SemanticLabeler::new(
        LookupEmbedder::new(4)
            .with(&["respuesta"], &[1.0, 0.0, 0.0, 0.0])
            .with(&["A", "uno"], &[1.0, 1.0, 1.0, 1.0])
            .cached(),
    )
    .with_threshold(0.49);
    let outcome = lenient.label("respuesta", &store).await?;
    assert_eq!(outcome.label, Label::assigned("A"));
    Ok(())
}

#[tokio::test]
async fn end_to_end_drops_invalid_rows_and_labels_the_rest() -> Result<()> {
    let store = CategoryStore::from_pairs([
        ("Buena experiencia con ejecutivos", vec!["ejecutivo"]),
        ("Cercanía geográfica o conveniencia", vec!["faena"]),
    ]);
    let responses = vec![
        Response::new("1", "Buena atencion del ejecutivo"),
        Response::new("2", "..."),
        Response::new("3", "Cercania a mi faena"),
    ];
    let mut config = MotifConfig::default();
    config.labeling.strategy = LabelingStrategy::Keyword;

    let run = label_responses(responses, store, &KeywordLabeler::new(), &config).await?;

    let labels: Vec<&Label> = run.rows.iter().map(|row| &row.label).collect();
    assert_eq!(
        labels,
        vec![
            &Label::assigned("Buena experiencia con ejecutivos"),
            &Label::assigned("Cercanía geográfica o conveniencia"),
        ]
    );
    assert_eq!(run.filter.dropped, 1);
    assert_eq!(run.rows[1].response.id, "3");
    Ok(())
}

#[tokio::test]
async fn provider_failure_aborts_labeling() {
    let store = CategoryStore::from_pairs([("A", vec!["uno"])]);
    let labeler = SemanticLabeler::new(Arc::new(motif::embedding::CachedEmbedder::new(
        Arc::new(FailingEmbedder),
    )));
    let config = MotifConfig::default();

    let err = label_responses(vec![Response::new("1", "hola")], store, &labeler, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, MotifError::Provider(_)));
}

#[tokio::test]
async fn whitespace_only_text_is_unlabeled_without_embedding() -> Result<()> {
    let store = CategoryStore::from_pairs([("A", vec!["uno"])]);
    let labeler = SemanticLabeler::new(Arc::new(motif::embedding::CachedEmbedder::new(
        Arc::new(FailingEmbedder),
    )));

    let outcome = labeler.label("   ", &store).await?;
    assert_eq!(outcome.label, Label::Unlabeled);
    assert_eq!(outcome.similarity, Some(0.0));
    Ok(())
}
