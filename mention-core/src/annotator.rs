//! # Anotador de Menções — Orquestrador com Eventos Observáveis
//!
//! O anotador coordena todos os passos sobre um documento e, opcionalmente,
//! emite eventos em cada passo via um canal Rust (`mpsc`), permitindo que o
//! servidor WebSocket transmita o progresso para o cliente.
//!
//! ## Fluxo por documento
//!
//! 1. Para cada sentença, em ordem:
//!    - extração de corridas ([`crate::chunk`]);
//!    - construção das menções ([`crate::builder`], [`crate::confidence`]);
//!    - pronomes ([`crate::pronoun`]), só em inglês.
//! 2. Siglas ([`crate::acronym`]), se ligadas na configuração.
//! 3. Índices globais ([`crate::aggregate`]).
//!
//! Dentro de um documento tudo é sequencial e determinístico: o mesmo
//! documento sempre gera os mesmos índices.

use std::sync::mpsc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::acronym::{link_acronyms, AcronymPass};
use crate::aggregate::assign_indices;
use crate::builder::MentionBuilder;
use crate::chunk::{extract_spans, Span};
use crate::config::{AnnotatorConfig, Properties, ACRONYM_ORGANIZATION_CAP, DEFAULT_ANNOTATOR_NAME};
use crate::document::Document;
use crate::error::{MentionError, Result};
use crate::mention::{Mention, MentionSource};
use crate::pronoun::resolve_pronouns;

/// Eventos emitidos durante a anotação.
///
/// Permitem que a interface visualize cada passo; cada variante carrega os
/// dados necessários para renderizá-lo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AnnotationEvent {
    /// Corridas encontradas em uma sentença.
    SentenceChunked {
        sentence_index: usize,
        spans: Vec<Span>,
    },
    /// Uma menção construída a partir de uma corrida.
    MentionBuilt { mention: Mention },
    /// Um pronome virou menção PERSON.
    PronounResolved { mention: Mention },
    /// Uma sigla foi ligada a uma organização.
    AcronymLinked { mention: Mention },
    /// O passo de siglas foi pulado por excesso de organizações.
    AcronymPassSkipped { organizations: usize, cap: usize },
    /// Fim: lista global com índices definitivos.
    Done {
        mentions: Vec<Mention>,
        total_sentences: usize,
        processing_ms: u64,
    },
}

/// Envia eventos só quando há canal; sem canal, nada é construído.
struct Emitter<'a>(Option<&'a mpsc::Sender<AnnotationEvent>>);

impl Emitter<'_> {
    fn emit(&self, event: impl FnOnce() -> AnnotationEvent) {
        if let Some(tx) = self.0 {
            let _ = tx.send(event());
        }
    }
}

/// O anotador de menções de entidade.
///
/// Sem estado entre chamadas: só guarda a configuração imutável, então uma
/// instância pode ser compartilhada entre threads.
#[derive(Debug, Clone)]
pub struct EntityMentionsAnnotator {
    name: String,
    config: AnnotatorConfig,
}

impl EntityMentionsAnnotator {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            name: DEFAULT_ANNOTATOR_NAME.to_string(),
            config,
        }
    }

    /// Constrói a partir de propriedades prefixadas por `name`.
    pub fn from_properties(name: &str, props: &Properties) -> Self {
        Self {
            name: name.to_string(),
            config: AnnotatorConfig::from_properties(name, props),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Anota o documento no lugar.
    pub fn annotate(&self, document: &mut Document) {
        self.run(document, &Emitter(None));
    }

    /// Anota o documento enviando [`AnnotationEvent`]s pelo canal `tx`.
    ///
    /// O último evento é sempre `Done`. Um receptor descartado não
    /// interrompe a anotação.
    pub fn annotate_streaming(&self, document: &mut Document, tx: mpsc::Sender<AnnotationEvent>) {
        self.run(document, &Emitter(Some(&tx)));
    }

    /// Desserializa e anota um documento JSON.
    ///
    /// `null` é uma violação de pré-condição ([`MentionError::MissingDocument`]).
    pub fn annotate_json(&self, value: serde_json::Value) -> Result<Document> {
        if value.is_null() {
            return Err(MentionError::MissingDocument);
        }
        let mut document: Document = serde_json::from_value(value)?;
        self.annotate(&mut document);
        Ok(document)
    }

    /// Anota documentos independentes em paralelo (Rayon).
    ///
    /// Cada documento continua sendo processado sequencialmente, então o
    /// resultado é idêntico a chamar [`annotate`](Self::annotate) em cada um.
    pub fn annotate_batch(&self, documents: &mut [Document]) {
        documents.par_iter_mut().for_each(|document| self.annotate(document));
    }

    fn run(&self, document: &mut Document, events: &Emitter<'_>) {
        let start = Instant::now();
        let bindings = &self.config.bindings;
        let english = self.config.is_english();
        if !english {
            debug!(language = %self.config.language, "idioma não inglês; pulando pronomes");
        }

        let builder = MentionBuilder::new(document.text.as_deref(), bindings);
        let sentences = &mut document.sentences;

        for sentence in sentences.iter_mut() {
            if sentence.tokens.is_empty() {
                debug!(sentence = sentence.index, "sentença sem tokens");
            }
            if !bindings.mentions.is_present(sentence) {
                debug!(sentence = sentence.index, "sentença sem lista de menções; criando vazia");
            }

            // === Passo 1: corridas de tokens rotulados ===
            let spans = extract_spans(&sentence.tokens, bindings);
            events.emit(|| AnnotationEvent::SentenceChunked {
                sentence_index: sentence.index,
                spans: spans.clone(),
            });

            // === Passo 2: menções das corridas ===
            let chunk_mentions: Vec<Mention> = spans
                .iter()
                .map(|span| builder.build(sentence, span.start..span.end, &span.label, MentionSource::Chunk))
                .collect();
            for mention in &chunk_mentions {
                events.emit(|| AnnotationEvent::MentionBuilt {
                    mention: mention.clone(),
                });
            }
            debug!(
                sentence = sentence.index,
                tokens = sentence.tokens.len(),
                mentions = chunk_mentions.len(),
                "sentença processada"
            );
            bindings.mentions.get_mut(sentence).extend(chunk_mentions);

            // === Passo 3: pronomes ===
            if english {
                let pronouns = resolve_pronouns(sentence, &builder, bindings);
                for mention in &pronouns {
                    events.emit(|| AnnotationEvent::PronounResolved {
                        mention: mention.clone(),
                    });
                }
                bindings.mentions.get_mut(sentence).extend(pronouns);
            }
        }

        // === Passo 4: siglas ===
        if self.config.acronyms {
            match link_acronyms(sentences, &builder, bindings) {
                AcronymPass::Skipped { organizations } => {
                    info!(organizations, cap = ACRONYM_ORGANIZATION_CAP, "organizações demais; pulando siglas");
                    events.emit(|| AnnotationEvent::AcronymPassSkipped {
                        organizations,
                        cap: ACRONYM_ORGANIZATION_CAP,
                    });
                }
                AcronymPass::Linked(linked) => {
                    debug!(linked = linked.len(), "siglas ligadas");
                    for mention in linked {
                        events.emit(|| AnnotationEvent::AcronymLinked { mention });
                    }
                }
            }
        }

        // === Passo 5: índices globais ===
        assign_indices(document, bindings.mentions);

        events.emit(|| AnnotationEvent::Done {
            mentions: document.mentions.clone(),
            total_sentences: document.sentences.len(),
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}

impl Default for EntityMentionsAnnotator {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{demo_documents, labelled_document};
    use crate::document::{Gender, Sentence, Timex, Token};

    fn acronym_annotator() -> EntityMentionsAnnotator {
        EntityMentionsAnnotator::new(AnnotatorConfig::default().with_acronyms(true))
    }

    fn assert_well_formed(doc: &Document) {
        for (i, m) in doc.mentions.iter().enumerate() {
            assert_eq!(m.index, i);
            assert_eq!(m.canonical_index, i);
            let sentence = doc.sentences.iter().find(|s| s.index == m.sentence_index).unwrap();
            assert!(m.token_start < m.token_end && m.token_end <= sentence.tokens.len());
            for token in &sentence.tokens[m.token_range()] {
                assert_eq!(token.entity_mention_index, Some(i));
            }
        }
        let local: usize = doc.sentences.iter().map(|s| s.mentions().len()).sum();
        assert_eq!(local, doc.mentions.len());
    }

    #[test]
    fn test_acronym_linked_to_earlier_organization() {
        let mut doc = labelled_document(&[
            &[("International", "ORGANIZATION"), ("Business", "ORGANIZATION"), ("Machines", "ORGANIZATION"), ("grew", "O")],
            &[("IBM", "O"), ("hired", "O")],
        ]);
        acronym_annotator().annotate(&mut doc);

        assert_eq!(doc.mentions.len(), 2);
        assert_eq!(doc.mentions[0].text, "International Business Machines");
        let ibm = &doc.mentions[1];
        assert_eq!((ibm.text.as_str(), ibm.entity_type.as_str()), ("IBM", "ORGANIZATION"));
        assert_eq!(ibm.source, MentionSource::Acronym);
        assert_eq!(ibm.sentence_index, 1);
        assert_eq!(doc.sentences[1].tokens[0].ner.as_deref(), Some("O"));
        assert_well_formed(&doc);
    }

    #[test]
    fn test_acronym_skips_existing_mention_without_sentence_index() {
        let mut doc = labelled_document(&[
            &[("International", "ORGANIZATION"), ("Business", "ORGANIZATION"), ("Machines", "ORGANIZATION"), ("grew", "O")],
            &[("IBM", "O"), ("hired", "O")],
        ]);
        // Como chega de um JSON sem offsets nem `sentence_index`
        let bindings = Default::default();
        let mut existing =
            MentionBuilder::new(None, &bindings).build(&doc.sentences[1], 0..1, "MISC", MentionSource::Existing);
        existing.sentence_index = 0;
        existing.start = None;
        existing.end = None;
        doc.sentences[1].mentions = Some(vec![existing]);

        acronym_annotator().annotate(&mut doc);

        assert_eq!(doc.sentences[1].mentions().len(), 1);
        assert_eq!(doc.sentences[1].mentions()[0].entity_type, "MISC");
        assert_eq!(doc.mentions.len(), 2);
        assert!(doc.mentions.iter().all(|m| m.source != MentionSource::Acronym));
        assert_well_formed(&doc);
    }

    #[test]
    fn test_acronyms_disabled_by_default() {
        let mut doc = labelled_document(&[&[
            ("International", "ORGANIZATION"), ("Business", "ORGANIZATION"), ("Machines", "ORGANIZATION"), ("IBM", "O"),
        ]]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        assert_eq!(doc.mentions.len(), 1);
    }

    #[test]
    fn test_pronouns_resolved_in_english_only() {
        let words: &[(&str, &str)] = &[("she", "O"), ("told", "O"), ("him", "O"), ("they", "O"), ("left", "O")];

        let mut doc = labelled_document(&[words]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        let genders: Vec<Option<Gender>> = doc.mentions.iter().map(|m| m.gender).collect();
        assert_eq!(genders, vec![Some(Gender::Female), Some(Gender::Male)]);
        assert!(doc.mentions.iter().all(|m| m.entity_type == "PERSON"));
        assert_eq!(doc.sentences[0].tokens[0].gender, Some(Gender::Female));
        assert_eq!(doc.sentences[0].tokens[3].gender, None);

        let mut doc = labelled_document(&[words]);
        let spanish = EntityMentionsAnnotator::new(AnnotatorConfig::default().with_language("es"));
        spanish.annotate(&mut doc);
        assert!(doc.mentions.is_empty());
        assert_eq!(doc.sentences[0].tokens[0].gender, None);
    }

    #[test]
    fn test_sentence_order_chunks_then_pronouns() {
        let mut doc = labelled_document(&[&[("He", "O"), ("met", "O"), ("Ada", "PERSON"), ("Lovelace", "PERSON")]]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        let sources: Vec<MentionSource> = doc.mentions.iter().map(|m| m.source).collect();
        assert_eq!(sources, vec![MentionSource::Chunk, MentionSource::Pronoun]);
        assert_eq!(doc.mentions[0].text, "Ada Lovelace");
        assert_well_formed(&doc);
    }

    #[test]
    fn test_text_fallback_without_document_text() {
        let mut doc = Document::new(vec![Sentence::new(vec![
            Token::word("New").with_ner("LOCATION"),
            Token::word("York").with_ner("LOCATION"),
        ])]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        assert_eq!(doc.mentions[0].text, "New York");
        assert_eq!(doc.mentions[0].normalized, "New York");
    }

    #[test]
    fn test_numbers_and_dates() {
        let mut doc = Document::new(vec![Sentence::new(vec![
            Token::word("5").with_ner("NUMBER").with_normalized("5").with_numeric(5.0),
            Token::word("5").with_ner("NUMBER").with_normalized("5").with_numeric(500.0),
            Token::word("on").with_ner("O"),
            Token::word("March").with_ner("DATE").with_timex(Timex::new("t1")),
            Token::word("3").with_ner("DATE").with_timex(Timex::new("t1")),
            Token::word("April").with_ner("DATE").with_timex(Timex::new("t2")),
        ])]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        let ranges: Vec<_> = doc.mentions.iter().map(|m| m.token_range()).collect();
        assert_eq!(ranges, vec![0..1, 1..2, 3..5, 5..6]);
        assert_eq!(doc.mentions[2].timex.as_ref().map(|t| t.tid.as_str()), Some("t1"));
        assert_well_formed(&doc);
    }

    #[test]
    fn test_empty_and_tokenless_sentences() {
        let mut doc = Document::new(vec![Sentence::default(), Sentence::default().with_index(1)]);
        EntityMentionsAnnotator::default().annotate(&mut doc);
        assert!(doc.mentions.is_empty());
        assert!(doc.sentences.iter().all(|s| s.mentions == Some(vec![])));

        let mut empty = Document::default();
        EntityMentionsAnnotator::default().annotate(&mut empty);
        assert!(empty.mentions.is_empty());
    }

    #[test]
    fn test_existing_mentions_kept_first() {
        let mut doc = labelled_document(&[&[("Acme", "O"), ("sued", "O"), ("Bob", "PERSON")]]);
        let bindings = Default::default();
        let existing = MentionBuilder::new(doc.text.as_deref(), &bindings).build(
            &doc.sentences[0],
            0..1,
            "ORGANIZATION",
            MentionSource::Existing,
        );
        doc.sentences[0].mentions = Some(vec![existing]);

        EntityMentionsAnnotator::default().annotate(&mut doc);
        let texts: Vec<&str> = doc.mentions.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Acme", "Bob"]);
        assert_eq!(doc.mentions[0].source, MentionSource::Existing);
        assert_well_formed(&doc);
    }

    #[test]
    fn test_streaming_events() {
        let (_, mut doc) = demo_documents().into_iter().find(|(n, _)| *n == "acronyms").unwrap();
        let (tx, rx) = mpsc::channel();
        acronym_annotator().annotate_streaming(&mut doc, tx);
        let events: Vec<AnnotationEvent> = rx.try_iter().collect();

        assert!(matches!(&events[0], AnnotationEvent::SentenceChunked { sentence_index: 0, .. }));
        assert!(events.iter().any(|e| matches!(e, AnnotationEvent::PronounResolved { .. })));
        assert!(events.iter().any(|e| matches!(e, AnnotationEvent::AcronymLinked { .. })));
        match events.last() {
            Some(AnnotationEvent::Done { mentions, total_sentences, .. }) => {
                assert_eq!(mentions, &doc.mentions);
                assert_eq!(*total_sentences, 2);
            }
            other => panic!("último evento deveria ser Done, veio {other:?}"),
        }
    }

    #[test]
    fn test_streaming_reports_skipped_acronyms() {
        let org: &[(&str, &str)] = &[("Acme", "ORGANIZATION"), ("Corp", "ORGANIZATION")];
        let sentences: Vec<&[(&str, &str)]> = vec![org; ACRONYM_ORGANIZATION_CAP + 1];
        let mut doc = labelled_document(&sentences);
        let (tx, rx) = mpsc::channel();
        acronym_annotator().annotate_streaming(&mut doc, tx);
        assert!(rx.try_iter().any(|e| matches!(
            e,
            AnnotationEvent::AcronymPassSkipped { organizations, .. } if organizations == ACRONYM_ORGANIZATION_CAP + 1
        )));
    }

    #[test]
    fn test_json_entry_point() {
        let annotator = EntityMentionsAnnotator::default();
        assert!(matches!(
            annotator.annotate_json(serde_json::Value::Null),
            Err(MentionError::MissingDocument)
        ));
        assert!(matches!(
            annotator.annotate_json(serde_json::json!({"sentences": 3})),
            Err(MentionError::Json(_))
        ));

        let doc = annotator
            .annotate_json(serde_json::json!({
                "sentences": [
                    {"tokens": [{"text": "Paris", "ner": "LOCATION"}]},
                    {"index": 1}
                ]
            }))
            .unwrap();
        assert_eq!(doc.mentions.len(), 1);
        assert_eq!(doc.mentions[0].text, "Paris");
        assert_eq!(doc.sentences[1].mentions, Some(vec![]));
    }

    #[test]
    fn test_batch_matches_sequential() {
        let annotator = acronym_annotator();
        let originals: Vec<Document> = demo_documents().into_iter().map(|(_, d)| d).collect();

        let mut sequential = originals.clone();
        for doc in &mut sequential {
            annotator.annotate(doc);
        }
        let mut parallel = originals;
        annotator.annotate_batch(&mut parallel);

        assert_eq!(sequential, parallel);
        for doc in &parallel {
            assert_well_formed(doc);
        }
    }

    #[test]
    fn test_deterministic_indices() {
        let annotator = acronym_annotator();
        let (_, base) = demo_documents().remove(1);
        let mut a = base.clone();
        let mut b = base;
        annotator.annotate(&mut a);
        annotator.annotate(&mut b);
        assert_eq!(a.mentions, b.mentions);
    }

    #[test]
    fn test_from_properties_uses_name_prefix() {
        let props: Properties = [("ner.acronyms".to_string(), "true".to_string())].into_iter().collect();
        let annotator = EntityMentionsAnnotator::from_properties("ner", &props);
        assert_eq!(annotator.name(), "ner");
        assert!(annotator.config().acronyms);
    }
}
