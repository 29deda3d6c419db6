//! Fixture builder for hand-authored parses, shared across the integration
//! test binaries in this directory. Not a test module itself -- `mod.rs`
//! under a subdirectory keeps cargo from compiling it as its own test
//! binary.

use entia_core::{ParsedDocument, ParsedSentence, Token};

/// Builds a single token with sensible defaults, overridable via the setter
/// methods. Character offsets are supplied explicitly since that's the
/// coordinate system the pipeline runs in.
#[derive(Clone)]
pub struct TokenBuilder {
    token: Token,
}

impl TokenBuilder {
    pub fn new(i: usize, text: &str, start: usize) -> Self {
        let end = start + text.chars().count();
        TokenBuilder {
            token: Token {
                i,
                text: text.to_string(),
                lemma: text.to_lowercase(),
                pos: "NOUN".to_string(),
                dep: "dep".to_string(),
                head: i,
                ent: String::new(),
                start,
                end,
            },
        }
    }

    pub fn pos(mut self, pos: &str) -> Self {
        self.token.pos = pos.to_string();
        self
    }

    pub fn dep(mut self, dep: &str) -> Self {
        self.token.dep = dep.to_string();
        self
    }

    pub fn head(mut self, head: usize) -> Self {
        self.token.head = head;
        self
    }

    pub fn ent(mut self, ent: &str) -> Self {
        self.token.ent = ent.to_string();
        self
    }

    pub fn lemma(mut self, lemma: &str) -> Self {
        self.token.lemma = lemma.to_string();
        self
    }

    pub fn build(self) -> Token {
        self.token
    }
}

/// Builds a sentence from a closure that appends tokens via [`TokenBuilder`].
pub struct SentenceBuilder {
    start: usize,
    end: usize,
    tokens: Vec<Token>,
}

impl SentenceBuilder {
    pub fn new(start: usize, end: usize) -> Self {
        SentenceBuilder {
            start,
            end,
            tokens: Vec::new(),
        }
    }

    pub fn token(mut self, builder: TokenBuilder) -> Self {
        self.tokens.push(builder.build());
        self
    }

    pub fn build(self) -> ParsedSentence {
        ParsedSentence {
            start: self.start,
            end: self.end,
            tokens: self.tokens,
        }
    }
}

/// Assembles multiple sentences into a [`ParsedDocument`].
pub fn document(sentences: Vec<ParsedSentence>) -> ParsedDocument {
    ParsedDocument { sentences }
}

/// Convenience: a proper-noun token acting as its own sentence root, the
/// shape most scenario tests need for a bare subject mention.
pub fn propn_root(i: usize, text: &str, start: usize, ent: &str) -> TokenBuilder {
    TokenBuilder::new(i, text, start).pos("PROPN").dep("ROOT").head(i).ent(ent)
}
