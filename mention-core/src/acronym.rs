//! # Casamento de Siglas
//!
//! Passo opcional (ligado por `<nome>.acronyms`): liga tokens soltos em
//! maiúsculas a organizações já extraídas no documento, pelas iniciais.
//!
//! ## Algoritmo
//! 1. Conta as menções ORGANIZATION do documento. Acima de
//!    [`ACRONYM_ORGANIZATION_CAP`] o passo é pulado inteiro (custo quadrático).
//! 2. Candidatos: tokens sem entidade, todo em maiúsculas, com mais de um caractere.
//! 3. O candidato casa com uma organização se cada letra, em ordem, é a
//!    inicial de uma palavra distinta do texto da organização, usando todas as
//!    palavras. A comparação diferencia maiúsculas: "IBM" casa com
//!    "International Business Machines", "IbM" nunca casa.
//! 4. Cada casamento vira uma menção ORGANIZATION de um token, acrescentada
//!    à sentença se não se sobrepuser a nenhuma menção existente.

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::bindings::FieldBindings;
use crate::builder::MentionBuilder;
use crate::config::ACRONYM_ORGANIZATION_CAP;
use crate::document::Sentence;
use crate::label::is_entity_label;
use crate::mention::{Mention, MentionSource};

pub const ORGANIZATION_LABEL: &str = "ORGANIZATION";

fn candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\p{Lu}{2,}$").expect("padrão de sigla válido"))
}

/// Token todo em maiúsculas com pelo menos dois caracteres.
pub fn is_acronym_candidate(word: &str) -> bool {
    candidate_pattern().is_match(word)
}

/// Teste clássico de iniciais entre uma sigla e um nome de várias palavras.
///
/// A sigla precisa ser um candidato válido (toda em maiúsculas), e cada
/// palavra do nome contribui com exatamente uma letra.
pub fn is_acronym(candidate: &str, phrase: &str) -> bool {
    if !is_acronym_candidate(candidate) {
        return false;
    }
    let words: Vec<&str> = phrase.unicode_words().collect();
    if words.len() < 2 || candidate.chars().count() != words.len() {
        return false;
    }
    candidate
        .chars()
        .zip(&words)
        .all(|(c, word)| word.chars().next() == Some(c))
}

/// Resultado do passo de siglas.
#[derive(Debug, Clone, PartialEq)]
pub enum AcronymPass {
    /// Organizações demais no documento.
    Skipped { organizations: usize },
    /// Menções criadas, na ordem das sentenças.
    Linked(Vec<Mention>),
}

/// Executa o passo de siglas sobre todas as sentenças do documento.
pub fn link_acronyms(
    sentences: &mut [Sentence],
    builder: &MentionBuilder<'_>,
    bindings: &FieldBindings,
) -> AcronymPass {
    let organizations: Vec<String> = sentences
        .iter()
        .flat_map(|s| bindings.mentions.get(s))
        .filter(|m| m.entity_type == ORGANIZATION_LABEL)
        .map(|m| m.text.clone())
        .collect();

    if organizations.len() > ACRONYM_ORGANIZATION_CAP {
        return AcronymPass::Skipped {
            organizations: organizations.len(),
        };
    }

    let mut linked = Vec::new();
    if organizations.is_empty() {
        return AcronymPass::Linked(linked);
    }

    for sentence in sentences.iter_mut() {
        let candidates: Vec<usize> = sentence
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !is_entity_label(bindings.label.get(t)) && is_acronym_candidate(&t.text))
            .filter(|(_, t)| organizations.iter().any(|org| is_acronym(&t.text, org)))
            .map(|(i, _)| i)
            .collect();

        for i in candidates {
            let mention = builder.build(sentence, i..i + 1, ORGANIZATION_LABEL, MentionSource::Acronym);
            let mentions = bindings.mentions.get_mut(sentence);
            if mentions.iter().any(|m| m.overlaps(&mention)) {
                continue;
            }
            mentions.push(mention.clone());
            linked.push(mention);
        }
    }
    AcronymPass::Linked(linked)
}
