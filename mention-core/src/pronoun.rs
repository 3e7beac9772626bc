//! # Resolvedor de Pronomes
//!
//! Cria menções PERSON de um token para pronomes pessoais com gênero.
//! Só tokens sem entidade (rótulo ausente ou "O") são considerados, e a
//! comparação é feita em minúsculas:
//!
//! | Pronomes          | Gênero |
//! |-------------------|--------|
//! | he, him, his      | MALE   |
//! | she, her, hers    | FEMALE |
//!
//! Qualquer outro ("they", "it", "them") não gera menção. O gênero também é
//! gravado no token de origem. O léxico é inglês: o anotador só roda este
//! passo quando o idioma configurado é inglês.

use crate::bindings::FieldBindings;
use crate::builder::MentionBuilder;
use crate::document::{Gender, Sentence};
use crate::label::is_entity_label;
use crate::mention::{Mention, MentionSource};

/// Tipo de entidade das menções pronominais.
pub const PERSON_LABEL: &str = "PERSON";

const MALE_PRONOUNS: &[&str] = &["he", "him", "his"];
const FEMALE_PRONOUNS: &[&str] = &["she", "her", "hers"];

/// Gênero de um pronome do léxico, se for um.
pub fn pronoun_gender(word: &str) -> Option<Gender> {
    let lower = word.to_lowercase();
    if MALE_PRONOUNS.contains(&lower.as_str()) {
        Some(Gender::Male)
    } else if FEMALE_PRONOUNS.contains(&lower.as_str()) {
        Some(Gender::Female)
    } else {
        None
    }
}

/// Encontra os pronomes da sentença, grava o gênero nos tokens e devolve
/// as menções na ordem dos tokens.
pub fn resolve_pronouns(
    sentence: &mut Sentence,
    builder: &MentionBuilder<'_>,
    bindings: &FieldBindings,
) -> Vec<Mention> {
    let hits: Vec<(usize, Gender)> = sentence
        .tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| !is_entity_label(bindings.label.get(t)))
        .filter_map(|(i, t)| pronoun_gender(&t.text).map(|g| (i, g)))
        .collect();

    let mut mentions = Vec::with_capacity(hits.len());
    for (i, gender) in hits {
        sentence.tokens[i].gender = Some(gender);
        let mut mention = builder.build(sentence, i..i + 1, PERSON_LABEL, MentionSource::Pronoun);
        mention.gender = Some(gender);
        mentions.push(mention);
    }
    mentions
}
