//! # Corpus de Demonstração
//!
//! Documentos em inglês já rotulados token a token, no formato de pares
//! `(palavra, rótulo)`. Os offsets são calculados juntando as palavras com um
//! espaço, e o texto do documento é o resultado dessa junção (sentenças
//! separadas por um espaço).
//!
//! Usado pelos testes e pela rota `/demo-documents` do servidor web.

use crate::document::{Document, Sentence, Timex, Token};

/// Uma sentença anotada: pares (palavra, rótulo).
///
/// Exemplo: `[("Bill", "PERSON"), ("visited", "O")]`
pub struct AnnotatedSentence {
    pub annotations: &'static [(&'static str, &'static str)],
}

/// Um documento de demonstração com um nome curto.
pub struct DemoDocument {
    pub name: &'static str,
    pub sentences: &'static [AnnotatedSentence],
}

/// Monta um [`Document`] com offsets e texto a partir de pares (palavra, rótulo).
pub fn labelled_document(sentences: &[&[(&str, &str)]]) -> Document {
    let mut text = String::new();
    let mut built = Vec::with_capacity(sentences.len());
    let mut token_begin = 0;

    for (index, pairs) in sentences.iter().enumerate() {
        let mut tokens = Vec::with_capacity(pairs.len());
        for (word, label) in pairs.iter() {
            if !text.is_empty() {
                text.push(' ');
            }
            let start = text.len();
            text.push_str(word);
            tokens.push(Token::new(*word, start, text.len()).with_ner(*label));
        }
        let count = tokens.len();
        built.push(Sentence::new(tokens).with_index(index).with_token_begin(token_begin));
        token_begin += count;
    }

    Document::new(built).with_text(text)
}

const DEMO: &[DemoDocument] = &[
    DemoDocument {
        name: "acronyms",
        sentences: &[
            AnnotatedSentence {
                annotations: &[
                    ("International", "ORGANIZATION"), ("Business", "ORGANIZATION"),
                    ("Machines", "ORGANIZATION"), ("hired", "O"), ("Ada", "PERSON"),
                    ("Lovelace", "PERSON"), ("in", "O"), ("New", "LOCATION"), ("York", "LOCATION"), (".", "O"),
                ],
            },
            AnnotatedSentence {
                annotations: &[
                    ("She", "O"), ("said", "O"), ("IBM", "O"), ("pays", "O"), ("well", "O"), (".", "O"),
                ],
            },
        ],
    },
    DemoDocument {
        name: "pronouns",
        sentences: &[
            AnnotatedSentence {
                annotations: &[
                    ("Marie", "PERSON"), ("Curie", "PERSON"), ("met", "O"), ("Pierre", "PERSON"),
                    ("in", "O"), ("Paris", "LOCATION"), (".", "O"),
                ],
            },
            AnnotatedSentence {
                annotations: &[
                    ("He", "O"), ("admired", "O"), ("her", "O"), ("and", "O"), ("they", "O"),
                    ("married", "O"), ("in", "O"), ("1895", "DATE"), (".", "O"),
                ],
            },
        ],
    },
    DemoDocument {
        name: "numbers",
        sentences: &[AnnotatedSentence {
            annotations: &[
                ("Revenue", "O"), ("grew", "O"), ("12", "PERCENT"), ("%", "PERCENT"),
                ("to", "O"), ("five", "NUMBER"), ("million", "NUMBER"), ("dollars", "O"), (".", "O"),
            ],
        }],
    },
];

/// Documentos de demonstração prontos para anotar.
///
/// O documento "numbers" recebe valores normalizados e numéricos, como faria
/// o normalizador de quantidades; o "pronouns" recebe um TIMEX no ano.
pub fn demo_documents() -> Vec<(&'static str, Document)> {
    DEMO.iter()
        .map(|demo| {
            let sentences: Vec<&[(&str, &str)]> = demo.sentences.iter().map(|s| s.annotations).collect();
            let mut document = labelled_document(&sentences);
            enrich(demo.name, &mut document);
            (demo.name, document)
        })
        .collect()
}

fn enrich(name: &str, document: &mut Document) {
    match name {
        "numbers" => {
            let tokens = &mut document.sentences[0].tokens;
            for token in &mut tokens[2..4] {
                token.normalized_ner = Some("%12.0".to_string());
                token.numeric_composite_value = Some(12.0);
            }
            for token in &mut tokens[5..7] {
                token.normalized_ner = Some("5000000.0".to_string());
                token.numeric_composite_value = Some(5_000_000.0);
            }
        }
        "pronouns" => {
            let year = &mut document.sentences[1].tokens[7];
            year.normalized_ner = Some("1895".to_string());
            year.timex = Some(Timex::new("t1").with_value("1895"));
        }
        _ => {}
    }
}
