//! # Documento, Sentenças e Tokens
//!
//! Estruturas de entrada do anotador. Tudo aqui é produzido por estágios
//! anteriores do pipeline (tokenização, segmentação de sentenças, classificador
//! NER, normalizador temporal) e chega pronto; o anotador apenas **acrescenta**
//! informação: menções nas sentenças, gênero nos pronomes e o índice da menção
//! dona em cada token.
//!
//! ## Offsets
//!
//! `start`/`end` são índices de byte no texto do documento, como no resto do
//! workspace. Um offset desconhecido é `None`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mention::Mention;

/// Rótulo usado pelos classificadores para "fora de entidade".
pub const OUTSIDE_LABEL: &str = "O";

/// Valor de link que significa "explicitamente sem link".
pub const NO_LINK: &str = "O";

/// Referência temporal resolvida (TIMEX).
///
/// Dois tokens com o mesmo `tid` apontam para o mesmo tempo resolvido; o
/// anotador compara apenas o `tid`, os demais campos são carregados adiante.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timex {
    pub tid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub timex_type: Option<String>,
}

impl Timex {
    pub fn new(tid: impl Into<String>) -> Self {
        Self {
            tid: tid.into(),
            value: None,
            timex_type: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Gênero gramatical atribuído a pronomes pessoais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn name(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

/// Um token já rotulado por estágios anteriores.
///
/// Os campos de rótulo (`ner`, `coarse_ner`, `fine_grained_ner`) coexistem
/// porque o anotador pode ser configurado para ler qualquer um deles
/// (ver [`crate::bindings`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Forma de superfície (ex: "Machines").
    pub text: String,
    /// Byte inicial no texto do documento (inclusivo).
    #[serde(default)]
    pub start: Option<usize>,
    /// Byte final no texto do documento (exclusivo).
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coarse_ner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine_grained_ner: Option<String>,
    /// Forma canônica da entidade (ex: "2024-03-01" para "1º de março").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_ner: Option<String>,
    /// Probabilidade por rótulo vinda do classificador.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ner_probs: Option<BTreeMap<String, f64>>,
    /// Valor numérico resolvido (NUMBER/ORDINAL/PERCENT).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_composite_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timex: Option<Timex>,
    /// Link para a base de conhecimento; [`NO_LINK`] significa "sem link".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_entity: Option<String>,
    /// Preenchido pelo resolvedor de pronomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Índice (no documento) da menção que contém este token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_mention_index: Option<usize>,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    /// Token sem offsets conhecidos.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_ner(mut self, label: impl Into<String>) -> Self {
        self.ner = Some(label.into());
        self
    }

    pub fn with_normalized(mut self, value: impl Into<String>) -> Self {
        self.normalized_ner = Some(value.into());
        self
    }

    pub fn with_probs<I, S>(mut self, probs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.ner_probs = Some(probs.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    pub fn with_numeric(mut self, value: f64) -> Self {
        self.numeric_composite_value = Some(value);
        self
    }

    pub fn with_timex(mut self, timex: Timex) -> Self {
        self.timex = Some(timex);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.wikipedia_entity = Some(link.into());
        self
    }
}

/// Uma sentença: sequência ordenada de tokens mais as menções encontradas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Posição do primeiro token desta sentença no documento inteiro.
    #[serde(default)]
    pub token_begin: usize,
    /// Índice da sentença no documento.
    #[serde(default)]
    pub index: usize,
    /// `None` até o anotador (ou o chamador) criar a lista.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<Mention>>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_token_begin(mut self, token_begin: usize) -> Self {
        self.token_begin = token_begin;
        self
    }

    /// Lista de menções, criada vazia se ainda não existir.
    pub fn mentions_mut(&mut self) -> &mut Vec<Mention> {
        self.mentions.get_or_insert_with(Vec::new)
    }

    pub fn mentions(&self) -> &[Mention] {
        self.mentions.as_deref().unwrap_or(&[])
    }
}

/// Documento completo: texto bruto opcional e sentenças em ordem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
    /// Lista global de menções; reconstruída a cada anotação.
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl Document {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            text: None,
            sentences,
            mentions: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Total de tokens em todas as sentenças.
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(|s| s.tokens.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_list_created_lazily() {
        let mut sentence = Sentence::new(vec![Token::word("oi")]);
        assert!(sentence.mentions.is_none());
        assert!(sentence.mentions().is_empty());
        sentence.mentions_mut();
        assert_eq!(sentence.mentions, Some(vec![]));
    }

    #[test]
    fn test_sentence_without_tokens_deserializes() {
        let sentence: Sentence = serde_json::from_str(r#"{"index": 3}"#).unwrap();
        assert!(sentence.tokens.is_empty());
        assert_eq!(sentence.index, 3);
        assert_eq!(sentence.token_begin, 0);
    }

    #[test]
    fn test_token_roundtrip_skips_absent_fields() {
        let token = Token::new("IBM", 0, 3).with_ner("ORGANIZATION");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["ner"], "ORGANIZATION");
        assert!(json.get("timex").is_none());
        let back: Token = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }
}
