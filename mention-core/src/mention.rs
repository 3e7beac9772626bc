//! # Menções de Entidade
//!
//! Uma menção é um trecho contíguo de tokens de **uma** sentença reconhecido
//! como uma instância de entidade (ex: "International Business Machines" → ORGANIZATION).
//!
//! Os índices `index` e `canonical_index` só têm valor definitivo depois do
//! agregador de documento ([`crate::aggregate`]); antes disso valem 0.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::document::{Gender, Timex};

/// Qual passo do anotador produziu a menção.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionSource {
    /// Já estava na sentença antes da anotação.
    #[default]
    Existing,
    /// Corrida contígua de tokens rotulados.
    Chunk,
    /// Pronome pessoal com gênero.
    Pronoun,
    /// Sigla ligada a uma organização.
    Acronym,
}

impl MentionSource {
    pub fn name(&self) -> &'static str {
        match self {
            MentionSource::Existing => "existing",
            MentionSource::Chunk => "chunk",
            MentionSource::Pronoun => "pronoun",
            MentionSource::Acronym => "acronym",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Índice da sentença dona.
    #[serde(default)]
    pub sentence_index: usize,
    /// Primeiro token (inclusivo), relativo à sentença.
    pub token_start: usize,
    /// Último token (exclusivo), relativo à sentença.
    pub token_end: usize,
    /// `token_start` deslocado pelo `token_begin` da sentença.
    #[serde(default)]
    pub doc_token_start: usize,
    #[serde(default)]
    pub doc_token_end: usize,
    /// Byte inicial no texto do documento, se conhecido.
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
    pub entity_type: String,
    pub text: String,
    pub normalized: String,
    /// Confiança agregada por rótulo; ausente se nenhum token trouxe probabilidades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timex: Option<Timex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Posição na lista global do documento.
    #[serde(default)]
    pub index: usize,
    /// Índice da menção canônica (sem correferência: a própria menção).
    #[serde(default)]
    pub canonical_index: usize,
    #[serde(default)]
    pub source: MentionSource,
}

impl Mention {
    /// Intervalo de tokens dentro da sentença.
    pub fn token_range(&self) -> Range<usize> {
        self.token_start..self.token_end
    }

    pub fn len(&self) -> usize {
        self.token_end.saturating_sub(self.token_start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Intervalo de bytes, quando os dois offsets são conhecidos.
    pub fn char_span(&self) -> Option<Range<usize>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        }
    }

    /// Verifica sobreposição com outra menção da mesma sentença.
    ///
    /// Usa offsets de byte quando ambos os lados os têm; caso contrário
    /// compara os intervalos de tokens. Os dois lados precisam vir da mesma
    /// lista de sentença: `sentence_index` não é consultado, pois menções
    /// recebidas em JSON podem chegar sem ele.
    pub fn overlaps(&self, other: &Mention) -> bool {
        match (self.char_span(), other.char_span()) {
            (Some(a), Some(b)) => a.start < b.end && b.start < a.end,
            _ => self.token_start < other.token_end && other.token_start < self.token_end,
        }
    }
}
