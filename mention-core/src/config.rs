//! # Configuração do Anotador
//!
//! A configuração chega como um mapa de propriedades `chave → valor`, com as
//! chaves prefixadas pelo nome do anotador:
//!
//! ```text
//! entitymentions.acronyms = true
//! entitymentions.language = en
//! entitymentions.nerCoreAnnotation = Token.fine_grained_ner
//! ```
//!
//! O resultado é um [`AnnotatorConfig`] imutável, fixado na construção do
//! anotador. Não há estado global: duas instâncias com propriedades
//! diferentes convivem sem interferência.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bindings::FieldBindings;
use crate::error::MentionError;

/// Mapa de propriedades `"<nome>.<opção>" → valor`.
pub type Properties = BTreeMap<String, String>;

/// Nome padrão do anotador (prefixo das propriedades).
pub const DEFAULT_ANNOTATOR_NAME: &str = "entitymentions";

/// Idioma padrão dos documentos.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Limite de organizações acima do qual o passo de siglas é pulado.
pub const ACRONYM_ORGANIZATION_CAP: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Liga o passo de siglas (padrão: desligado).
    #[serde(default)]
    pub acronyms: bool,
    /// Código do idioma; o resolvedor de pronomes só roda em inglês.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub bindings: FieldBindings,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            acronyms: false,
            language: default_language(),
            bindings: FieldBindings::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Lê as opções `<name>.*` do mapa de propriedades.
    ///
    /// Valores inválidos nunca abortam: são registrados e o padrão é mantido.
    pub fn from_properties(name: &str, props: &Properties) -> Self {
        let key = |option: &str| format!("{name}.{option}");
        let get = |option: &str| lookup(props, &key(option));

        let acronyms = match get("acronyms") {
            Some(raw) => parse_bool(&key("acronyms"), raw).unwrap_or(false),
            None => false,
        };
        let language = get("language")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_string();

        let bindings = FieldBindings::resolve(
            [
                key("nerCoreAnnotation").as_str(),
                key("nerNormalizedCoreAnnotation").as_str(),
                key("mentionsCoreAnnotation").as_str(),
            ],
            get("nerCoreAnnotation"),
            get("nerNormalizedCoreAnnotation"),
            get("mentionsCoreAnnotation"),
        );

        let config = Self {
            acronyms,
            language,
            bindings,
        };
        debug!(annotator = name, ?config, "configuração carregada");
        config
    }

    pub fn with_acronyms(mut self, enabled: bool) -> Self {
        self.acronyms = enabled;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_bindings(mut self, bindings: FieldBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// `true` para "en", "english", "en-US", "en_GB"...
    pub fn is_english(&self) -> bool {
        let lang = self.language.trim().to_lowercase();
        lang == "en" || lang == "english" || lang.starts_with("en-") || lang.starts_with("en_")
    }
}

fn lookup<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get(key).map(String::as_str)
}

fn parse_bool(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            let err = MentionError::invalid_property(key, raw);
            warn!(error = %err, "usando valor padrão");
            None
        }
    }
}
