//! # Erros do anotador de menções
//!
//! Quase todo dado ausente tem um valor padrão definido (lista de tokens vazia,
//! lista de menções criada sob demanda), então o anotador raramente falha.
//! Os únicos erros propagados com `?` vêm da entrada JSON: documento ausente
//! (violação de pré-condição) ou JSON malformado.
//!
//! Erros de configuração ([`MentionError::UnresolvedBinding`] e
//! [`MentionError::InvalidProperty`]) nunca são retornados: são registrados
//! via `tracing` e o valor padrão é mantido.

use thiserror::Error;

/// Resultado padrão das operações do crate.
pub type Result<T> = std::result::Result<T, MentionError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MentionError {
    /// O documento alvo não foi fornecido (ex: `null` no JSON).
    #[error("documento ausente: o anotador exige um documento alvo")]
    MissingDocument,

    /// Um nome de campo configurado não existe no registro de campos.
    #[error("campo '{value}' configurado em '{key}' não foi encontrado; mantendo o padrão")]
    UnresolvedBinding { key: String, value: String },

    /// Uma propriedade tem um valor que não pode ser interpretado.
    #[error("valor inválido '{value}' para a propriedade '{key}'")]
    InvalidProperty { key: String, value: String },

    /// JSON de entrada malformado.
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}

impl MentionError {
    pub fn unresolved_binding(key: impl Into<String>, value: impl Into<String>) -> Self {
        MentionError::UnresolvedBinding {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn invalid_property(key: impl Into<String>, value: impl Into<String>) -> Self {
        MentionError::InvalidProperty {
            key: key.into(),
            value: value.into(),
        }
    }
}
