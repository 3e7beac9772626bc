//! # Agregação de Confiança
//!
//! A confiança de uma menção é calculada a partir das probabilidades por
//! rótulo de cada token. Para cada rótulo vale o **mínimo** entre os tokens:
//! uma menção é tão confiável quanto seu token mais fraco.
//!
//! Regras para dados incompletos:
//! - Nenhum token com mapa de probabilidades → sem confiança (`None`).
//! - Token **sem mapa** → se abstém de todos os rótulos.
//! - Token com mapa que **omite** um rótulo → vota -1.0 para aquele rótulo.
//!
//! ## Exemplo
//! `[{LOCATION: 0.95, PERSON: 0.80}, {PERSON: 0.4, LOCATION: 0.3}]`
//! → `{LOCATION: 0.3, PERSON: 0.4}`

use std::collections::BTreeMap;

use crate::document::Token;

/// Voto de um token que tem mapa mas não traz o rótulo.
pub const MISSING_LABEL_SCORE: f64 = -1.0;

pub fn aggregate_confidence(tokens: &[Token]) -> Option<BTreeMap<String, f64>> {
    let maps: Vec<&BTreeMap<String, f64>> = tokens.iter().filter_map(|t| t.ner_probs.as_ref()).collect();
    if maps.is_empty() {
        return None;
    }

    let mut result: BTreeMap<String, f64> = BTreeMap::new();
    for label in maps.iter().flat_map(|m| m.keys()) {
        if result.contains_key(label) {
            continue;
        }
        let score = maps
            .iter()
            .map(|m| m.get(label).copied().unwrap_or(MISSING_LABEL_SCORE))
            .fold(f64::INFINITY, f64::min);
        result.insert(label.clone(), score);
    }
    Some(result)
}
