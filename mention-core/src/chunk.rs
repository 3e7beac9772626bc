//! # Extração de Corridas (Chunks)
//!
//! Percorre os tokens de uma sentença da esquerda para a direita e agrupa
//! corridas **maximais** de tokens rotulados:
//!
//! 1. Token sem rótulo ou com "O" fecha a corrida atual e não abre outra.
//! 2. Rótulo diferente do anterior fecha a corrida e abre uma nova.
//! 3. Mesmo rótulo: continua só se o par passar em [`is_compatible`];
//!    caso contrário abre uma nova corrida com o mesmo rótulo.
//!
//! ## Exemplo
//! `[Bill/PERSON, Gates/PERSON, visited/O, Paris/LOCATION]`
//! → `[Span(0..2, PERSON), Span(3..4, LOCATION)]`

use serde::{Deserialize, Serialize};

use crate::bindings::FieldBindings;
use crate::document::Token;
use crate::label::{is_compatible, is_entity_label};

/// Intervalo de tokens com um rótulo.
///
/// Em "International Business Machines anunciou", o chunk da organização é
/// `Span { start: 0, end: 3, label: "ORGANIZATION" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
    pub label: String,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Extrai as corridas de tokens rotulados de uma sentença.
pub fn extract_spans(tokens: &[Token], bindings: &FieldBindings) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut current: Option<Span> = None;

    for (i, token) in tokens.iter().enumerate() {
        let label = bindings.label.get(token);
        if !is_entity_label(label) {
            spans.extend(current.take());
            continue;
        }
        let label = label.unwrap_or_default();

        let continues = current.as_ref().is_some_and(|span| {
            span.label == label && is_compatible(&tokens[i - 1], token, label, bindings.normalized)
        });

        if continues {
            if let Some(span) = current.as_mut() {
                span.end = i + 1;
            }
        } else {
            spans.extend(current.take());
            current = Some(Span {
                start: i,
                end: i + 1,
                label: label.to_string(),
            });
        }
    }

    // Fecha a última corrida, se aberta
    spans.extend(current);
    spans
}
