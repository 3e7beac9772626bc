//! # Agregação no Documento
//!
//! Último passo do anotador: concatena as listas de menções das sentenças,
//! na ordem das sentenças, e atribui a cada menção
//!
//! - `index`: posição 0..N-1 na lista global;
//! - `canonical_index`: o próprio `index` (correferência fica fora deste crate);
//! - `sentence_index`: o índice da sentença dona.
//!
//! O `index` também é gravado em cada token da menção
//! (`Token::entity_mention_index`).

use tracing::debug;

use crate::bindings::MentionsField;
use crate::document::Document;
use crate::mention::Mention;

/// Reconstrói `document.mentions` e grava os índices nas sentenças e tokens.
pub fn assign_indices(document: &mut Document, field: MentionsField) {
    let mut all: Vec<Mention> = Vec::new();

    for sentence in document.sentences.iter_mut() {
        if !field.is_present(sentence) {
            debug!(sentence = sentence.index, "sentença sem lista de menções; criando vazia");
        }
        let mut mentions = std::mem::take(field.get_mut(sentence));

        for mention in mentions.iter_mut() {
            let index = all.len();
            mention.index = index;
            mention.canonical_index = index;
            mention.sentence_index = sentence.index;
            if let Some(tokens) = sentence.tokens.get_mut(mention.token_range()) {
                for token in tokens {
                    token.entity_mention_index = Some(index);
                }
            }
            all.push(mention.clone());
        }

        *field.get_mut(sentence) = mentions;
    }

    document.mentions = all;
}
