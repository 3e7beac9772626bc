//! # Registro de Campos Configuráveis
//!
//! O anotador pode ler o rótulo NER e o valor normalizado de campos diferentes
//! do token, e gravar as menções em um contêiner configurável da sentença.
//! Os nomes vêm da configuração (`<nome>.nerCoreAnnotation`, etc.) e são
//! resolvidos **uma vez**, na construção do anotador.
//!
//! | Opção                         | Nomes aceitos                                   |
//! |-------------------------------|-------------------------------------------------|
//! | `nerCoreAnnotation`           | `Token.ner`, `Token.coarse_ner`, `Token.fine_grained_ner` |
//! | `nerNormalizedCoreAnnotation` | `Token.normalized_ner`                          |
//! | `mentionsCoreAnnotation`      | `Sentence.mentions`                             |
//!
//! A forma curta (sem o prefixo `Token.`/`Sentence.`) também é aceita.
//! Um nome desconhecido é registrado em log e o padrão é mantido.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::{Sentence, Token};
use crate::error::MentionError;
use crate::mention::Mention;

/// Campo do token que contém o rótulo grosso da entidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelField {
    #[default]
    Ner,
    CoarseNer,
    FineGrainedNer,
}

impl LabelField {
    pub fn from_name(name: &str) -> Option<Self> {
        match strip_owner(name, "Token") {
            "ner" => Some(LabelField::Ner),
            "coarse_ner" => Some(LabelField::CoarseNer),
            "fine_grained_ner" => Some(LabelField::FineGrainedNer),
            _ => None,
        }
    }

    pub fn get<'a>(&self, token: &'a Token) -> Option<&'a str> {
        match self {
            LabelField::Ner => token.ner.as_deref(),
            LabelField::CoarseNer => token.coarse_ner.as_deref(),
            LabelField::FineGrainedNer => token.fine_grained_ner.as_deref(),
        }
    }
}

/// Campo do token que contém o valor normalizado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedField {
    #[default]
    NormalizedNer,
}

impl NormalizedField {
    pub fn from_name(name: &str) -> Option<Self> {
        match strip_owner(name, "Token") {
            "normalized_ner" => Some(NormalizedField::NormalizedNer),
            _ => None,
        }
    }

    pub fn get<'a>(&self, token: &'a Token) -> Option<&'a str> {
        match self {
            NormalizedField::NormalizedNer => token.normalized_ner.as_deref(),
        }
    }
}

/// Contêiner da sentença onde as menções são gravadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionsField {
    #[default]
    Mentions,
}

impl MentionsField {
    pub fn from_name(name: &str) -> Option<Self> {
        match strip_owner(name, "Sentence") {
            "mentions" => Some(MentionsField::Mentions),
            _ => None,
        }
    }

    pub fn get<'a>(&self, sentence: &'a Sentence) -> &'a [Mention] {
        match self {
            MentionsField::Mentions => sentence.mentions(),
        }
    }

    /// Acesso mutável; cria a lista vazia se necessário.
    pub fn get_mut<'a>(&self, sentence: &'a mut Sentence) -> &'a mut Vec<Mention> {
        match self {
            MentionsField::Mentions => sentence.mentions_mut(),
        }
    }

    pub fn is_present(&self, sentence: &Sentence) -> bool {
        match self {
            MentionsField::Mentions => sentence.mentions.is_some(),
        }
    }
}

fn strip_owner<'a>(name: &'a str, owner: &str) -> &'a str {
    let name = name.trim();
    name.strip_prefix(owner)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name)
}

/// Conjunto de campos resolvidos para uma instância do anotador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldBindings {
    #[serde(default)]
    pub label: LabelField,
    #[serde(default)]
    pub normalized: NormalizedField,
    #[serde(default)]
    pub mentions: MentionsField,
}

impl FieldBindings {
    /// Resolve os nomes configurados; `None` mantém o padrão.
    ///
    /// `keys` são os nomes completos das propriedades, usados apenas nas
    /// mensagens de log.
    pub fn resolve(
        keys: [&str; 3],
        label: Option<&str>,
        normalized: Option<&str>,
        mentions: Option<&str>,
    ) -> Self {
        let mut bindings = FieldBindings::default();
        if let Some(name) = label {
            match LabelField::from_name(name) {
                Some(field) => bindings.label = field,
                None => report_unresolved(keys[0], name),
            }
        }
        if let Some(name) = normalized {
            match NormalizedField::from_name(name) {
                Some(field) => bindings.normalized = field,
                None => report_unresolved(keys[1], name),
            }
        }
        if let Some(name) = mentions {
            match MentionsField::from_name(name) {
                Some(field) => bindings.mentions = field,
                None => report_unresolved(keys[2], name),
            }
        }
        bindings
    }
}

fn report_unresolved(key: &str, name: &str) {
    let err = MentionError::unresolved_binding(key, name);
    warn!(error = %err, "ignorando campo configurado");
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 3] = ["m.nerCoreAnnotation", "m.nerNormalizedCoreAnnotation", "m.mentionsCoreAnnotation"];

    #[test]
    fn test_qualified_and_short_names() {
        assert_eq!(LabelField::from_name("Token.fine_grained_ner"), Some(LabelField::FineGrainedNer));
        assert_eq!(LabelField::from_name("coarse_ner"), Some(LabelField::CoarseNer));
        assert_eq!(MentionsField::from_name("Sentence.mentions"), Some(MentionsField::Mentions));
        assert_eq!(LabelField::from_name("Sentence.ner"), None);
    }

    #[test]
    fn test_unresolved_names_keep_defaults() {
        let bindings = FieldBindings::resolve(
            KEYS,
            Some("com.example.NoSuchField"),
            Some("Token.nope"),
            Some("Sentence.entities"),
        );
        assert_eq!(bindings, FieldBindings::default());
    }

    #[test]
    fn test_label_binding_reads_selected_field() {
        let bindings = FieldBindings::resolve(KEYS, Some("Token.coarse_ner"), None, None);
        let mut token = Token::word("Paris").with_ner("CITY");
        token.coarse_ner = Some("LOCATION".to_string());
        assert_eq!(bindings.label.get(&token), Some("LOCATION"));
        assert_eq!(LabelField::Ner.get(&token), Some("CITY"));
    }
}
