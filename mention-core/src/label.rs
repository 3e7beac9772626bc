//! # Classes de Rótulo e Predicado de Compatibilidade
//!
//! Dois tokens vizinhos com o **mesmo** rótulo grosso só pertencem à mesma
//! menção se forem compatíveis. O critério depende da classe do rótulo:
//!
//! | Classe   | Rótulos                          | Compatível se                                   |
//! |----------|----------------------------------|-------------------------------------------------|
//! | Numeric  | NUMBER, ORDINAL, PERCENT         | normalizados iguais **e** valores numéricos iguais |
//! | Temporal | DATE, TIME, DURATION, SET        | normalizados iguais **e** `tid` iguais (ausente casa com qualquer) |
//! | Default  | todos os outros                  | normalizados iguais                             |
//!
//! "Iguais" compara `Option`: ausente só é igual a ausente.
//!
//! ## Exemplo
//! "5 5" com `normalized = "5"` nos dois, mas valores compostos 5 e 5:
//! uma menção só. Com valores 5 e 50: duas menções.

use serde::{Deserialize, Serialize};

use crate::bindings::NormalizedField;
use crate::document::{Token, OUTSIDE_LABEL};

/// Classe de um rótulo, para escolher o teste de compatibilidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelClass {
    Numeric,
    Temporal,
    Default,
}

impl LabelClass {
    pub fn of(label: &str) -> Self {
        match label {
            "NUMBER" | "ORDINAL" | "PERCENT" => LabelClass::Numeric,
            "DATE" | "TIME" | "DURATION" | "SET" => LabelClass::Temporal,
            _ => LabelClass::Default,
        }
    }
}

/// Um rótulo marca entidade quando existe e não é "O".
pub fn is_entity_label(label: Option<&str>) -> bool {
    matches!(label, Some(l) if l != OUTSIDE_LABEL)
}

/// Decide se `cur` continua a menção que termina em `prev`.
///
/// Só deve ser chamado quando os dois tokens já têm o rótulo `label`;
/// rótulos diferentes nunca se juntam e isso é responsabilidade do chamador.
pub fn is_compatible(prev: &Token, cur: &Token, label: &str, normalized: NormalizedField) -> bool {
    if normalized.get(prev) != normalized.get(cur) {
        return false;
    }
    match LabelClass::of(label) {
        LabelClass::Numeric => prev.numeric_composite_value == cur.numeric_composite_value,
        LabelClass::Temporal => match (&prev.timex, &cur.timex) {
            (Some(a), Some(b)) => a.tid == b.tid,
            // Só um lado (ou nenhum) com TIMEX: junta.
            _ => true,
        },
        LabelClass::Default => true,
    }
}
