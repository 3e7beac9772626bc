//! # Construção de Menções
//!
//! Transforma um intervalo de tokens em um [`Mention`] completo:
//!
//! - **Texto**: trecho exato do texto do documento entre o início do primeiro
//!   token e o fim do último. Sem texto, com offsets desconhecidos ou fora dos
//!   limites, usa as palavras dos tokens unidas por espaço.
//! - **Normalizado**: primeiro valor normalizado presente nos tokens; se
//!   nenhum, o próprio texto.
//! - **TIMEX**: primeiro presente nos tokens.
//! - **Link**: primeiro token cujo link existe e não é "O".
//! - **Confiança**: ver [`crate::confidence`].

use std::ops::Range;

use crate::bindings::FieldBindings;
use crate::confidence::aggregate_confidence;
use crate::document::{Sentence, Token, NO_LINK};
use crate::mention::{Mention, MentionSource};

/// Monta menções de um documento; guarda o texto bruto e os campos configurados.
pub struct MentionBuilder<'a> {
    text: Option<&'a str>,
    bindings: &'a FieldBindings,
}

impl<'a> MentionBuilder<'a> {
    pub fn new(text: Option<&'a str>, bindings: &'a FieldBindings) -> Self {
        Self { text, bindings }
    }

    /// Constrói a menção dos tokens `range` da sentença.
    ///
    /// `range` precisa ser não vazio e estar dentro da sentença.
    pub fn build(
        &self,
        sentence: &Sentence,
        range: Range<usize>,
        entity_type: &str,
        source: MentionSource,
    ) -> Mention {
        let tokens = &sentence.tokens[range.clone()];
        let start = tokens.first().and_then(|t| t.start);
        let end = tokens.last().and_then(|t| t.end);
        let text = self.mention_text(tokens, start, end);

        let normalized = tokens
            .iter()
            .find_map(|t| self.bindings.normalized.get(t))
            .map(str::to_string)
            .unwrap_or_else(|| text.clone());
        let timex = tokens.iter().find_map(|t| t.timex.clone());

        let mut mention = Mention {
            sentence_index: sentence.index,
            token_start: range.start,
            token_end: range.end,
            doc_token_start: sentence.token_begin + range.start,
            doc_token_end: sentence.token_begin + range.end,
            start,
            end,
            entity_type: entity_type.to_string(),
            text,
            normalized,
            confidence: aggregate_confidence(tokens),
            timex,
            wikipedia_entity: None,
            gender: None,
            index: 0,
            canonical_index: 0,
            source,
        };
        link_mention(&mut mention, tokens);
        mention
    }

    fn mention_text(&self, tokens: &[Token], start: Option<usize>, end: Option<usize>) -> String {
        if let (Some(text), Some(start), Some(end)) = (self.text, start, end) {
            // `get` recusa intervalos invertidos, fora dos limites ou fora de fronteira UTF-8
            if let Some(slice) = text.get(start..end) {
                return slice.to_string();
            }
        }
        join_words(tokens)
    }
}

/// Palavras dos tokens separadas por um espaço.
pub fn join_words(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Preenche o link da menção com o primeiro link válido dos tokens.
///
/// Um link já definido na menção nunca é sobrescrito.
pub fn link_mention(mention: &mut Mention, tokens: &[Token]) {
    if mention.wikipedia_entity.is_some() {
        return;
    }
    mention.wikipedia_entity = tokens
        .iter()
        .filter_map(|t| t.wikipedia_entity.as_deref())
        .find(|link| *link != NO_LINK)
        .map(str::to_string);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Timex;

    fn sentence(tokens: Vec<Token>) -> Sentence {
        Sentence::new(tokens).with_index(2).with_token_begin(10)
    }

    #[test]
    fn test_text_from_document_offsets() {
        let text = "Visit New  York today";
        let s = sentence(vec![
            Token::new("Visit", 0, 5),
            Token::new("New", 6, 9).with_ner("LOCATION"),
            Token::new("York", 11, 15).with_ner("LOCATION"),
        ]);
        let bindings = FieldBindings::default();
        let builder = MentionBuilder::new(Some(text), &bindings);
        let m = builder.build(&s, 1..3, "LOCATION", MentionSource::Chunk);
        assert_eq!(m.text, "New  York");
        assert_eq!(m.normalized, "New  York");
        assert_eq!((m.start, m.end), (Some(6), Some(15)));
        assert_eq!((m.sentence_index, m.doc_token_start, m.doc_token_end), (2, 11, 13));
    }

    #[test]
    fn test_text_falls_back_to_words() {
        let s = sentence(vec![Token::new("New", 0, 3), Token::new("York", 4, 8)]);
        let bindings = FieldBindings::default();

        let no_text = MentionBuilder::new(None, &bindings).build(&s, 0..2, "LOCATION", MentionSource::Chunk);
        assert_eq!(no_text.text, "New York");

        let short = MentionBuilder::new(Some("New"), &bindings).build(&s, 0..2, "LOCATION", MentionSource::Chunk);
        assert_eq!(short.text, "New York");

        let unknown = sentence(vec![Token::word("New"), Token::word("York")]);
        let m = MentionBuilder::new(Some("New York"), &bindings).build(&unknown, 0..2, "LOCATION", MentionSource::Chunk);
        assert_eq!(m.text, "New York");
    }

    #[test]
    fn test_text_off_char_boundary_falls_back() {
        let s = sentence(vec![Token::new("São", 0, 2)]);
        let bindings = FieldBindings::default();
        let m = MentionBuilder::new(Some("São Paulo"), &bindings).build(&s, 0..1, "LOCATION", MentionSource::Chunk);
        assert_eq!(m.text, "São");
    }

    #[test]
    fn test_first_present_metadata_wins() {
        let s = sentence(vec![
            Token::word("March").with_link("O"),
            Token::word("third").with_normalized("2024-03-03").with_timex(Timex::new("t7")).with_link("March_3"),
            Token::word("2024").with_normalized("2024").with_timex(Timex::new("t9")).with_link("Year_2024"),
        ]);
        let bindings = FieldBindings::default();
        let m = MentionBuilder::new(None, &bindings).build(&s, 0..3, "DATE", MentionSource::Chunk);
        assert_eq!(m.normalized, "2024-03-03");
        assert_eq!(m.timex.map(|t| t.tid), Some("t7".to_string()));
        assert_eq!(m.wikipedia_entity.as_deref(), Some("March_3"));
        assert_eq!(m.confidence, None);
    }

    #[test]
    fn test_only_no_link_sentinels_leave_link_absent() {
        let s = sentence(vec![Token::word("a").with_link("O"), Token::word("b").with_link("O")]);
        let bindings = FieldBindings::default();
        let m = MentionBuilder::new(None, &bindings).build(&s, 0..2, "MISC", MentionSource::Chunk);
        assert_eq!(m.wikipedia_entity, None);
    }

    #[test]
    fn test_existing_link_is_not_overwritten() {
        let s = sentence(vec![Token::word("IBM").with_link("IBM")]);
        let bindings = FieldBindings::default();
        let mut m = MentionBuilder::new(None, &bindings).build(&s, 0..1, "ORGANIZATION", MentionSource::Chunk);
        m.wikipedia_entity = Some("International_Business_Machines".to_string());
        link_mention(&mut m, &s.tokens);
        assert_eq!(m.wikipedia_entity.as_deref(), Some("International_Business_Machines"));
    }
}
