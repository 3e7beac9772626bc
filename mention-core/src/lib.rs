//! # mention-core — Menções de Entidade a partir de Rótulos NER
//!
//! Este crate transforma rótulos NER **por token** (produzidos por um
//! classificador anterior) em **menções**: trechos contíguos de tokens com
//! tipo, texto, valor normalizado, confiança, TIMEX e link para a base de
//! conhecimento. No fim, cada menção recebe um índice estável no documento.
//!
//! ## Arquitetura
//!
//! O processamento é um pipeline linear sobre cada documento:
//!
//! 1.  **Entrada**: [`Document`] com sentenças e tokens já rotulados.
//! 2.  **Corridas** ([`chunk`]): tokens vizinhos com o mesmo rótulo se juntam
//!     se passarem no predicado de compatibilidade ([`label`]).
//! 3.  **Menções** ([`builder`]): texto, normalização, TIMEX, link e
//!     confiança agregada ([`confidence`]).
//! 4.  **Pronomes** ([`pronoun`]): "he"/"she" viram menções PERSON com gênero.
//! 5.  **Siglas** ([`acronym`], opcional): "IBM" ligado a
//!     "International Business Machines".
//! 6.  **Índices** ([`aggregate`]): lista global com índices 0..N-1.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use mention_core::{AnnotatorConfig, EntityMentionsAnnotator};
//! use mention_core::demo::labelled_document;
//!
//! let annotator = EntityMentionsAnnotator::new(AnnotatorConfig::default().with_acronyms(true));
//!
//! let mut doc = labelled_document(&[&[
//!     ("International", "ORGANIZATION"),
//!     ("Business", "ORGANIZATION"),
//!     ("Machines", "ORGANIZATION"),
//!     ("or", "O"),
//!     ("IBM", "O"),
//! ]]);
//! annotator.annotate(&mut doc);
//!
//! for mention in &doc.mentions {
//!     println!("#{} {} ({})", mention.index, mention.text, mention.entity_type);
//! }
//! assert_eq!(doc.mentions.len(), 2);
//! ```
//!
//! ## Módulos Principais
//!
//! - [`annotator`]: orquestrador que conecta todos os passos.
//! - [`config`]: propriedades `<nome>.*` e campos configuráveis ([`bindings`]).
//! - [`document`] e [`mention`]: modelo de dados.
//! - [`demo`]: documentos rotulados para testes e demonstração.

pub mod acronym;
pub mod aggregate;
pub mod annotator;
pub mod bindings;
pub mod builder;
pub mod chunk;
pub mod confidence;
pub mod config;
pub mod demo;
pub mod document;
pub mod error;
pub mod label;
pub mod mention;
pub mod pronoun;

pub use annotator::{AnnotationEvent, EntityMentionsAnnotator};
pub use config::{AnnotatorConfig, Properties};
pub use document::{Document, Gender, Sentence, Timex, Token};
pub use error::{MentionError, Result};
pub use mention::{Mention, MentionSource};
