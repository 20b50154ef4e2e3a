//! Event-driven markup scanning.
//!
//! [`scan`] runs the html5ever tokenizer over a document and forwards one
//! callback per open tag, close tag, and text run to a [`MarkupEvents`]
//! implementation. Callers never see html5ever types, so the extractor in
//! [`structure`] does not depend on the parsing library. The tokenizer
//! recovers from malformed input; each recovery is reported through
//! [`MarkupEvents::parse_error`] and scanning continues.

pub mod structure;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

pub use structure::{extract, Extraction, HtmlStructureFacts};

/// Receives markup events in document order.
pub trait MarkupEvents {
    /// An opening (or self-closing) tag. `name` is lower-case; attribute
    /// names are lower-case and values are unescaped.
    fn open_tag(&mut self, name: &str, attrs: &[(String, String)]);

    /// A closing tag.
    fn close_tag(&mut self, name: &str);

    /// A run of character data.
    fn text(&mut self, text: &str);

    /// The tokenizer recovered from malformed input at `line`.
    fn parse_error(&mut self, _line: u64, _message: &str) {}
}

struct Sink<'a, E: MarkupEvents> {
    events: &'a mut E,
}

impl<E: MarkupEvents> Sink<'_, E> {
    fn tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string().to_ascii_lowercase();
        match tag.kind {
            TagKind::StartTag => {
                let attrs: Vec<(String, String)> = tag
                    .attrs
                    .iter()
                    .map(|a| (a.name.local.to_string().to_ascii_lowercase(), a.value.to_string()))
                    .collect();
                self.events.open_tag(&name, &attrs);
                if tag.self_closing {
                    return TokenSinkResult::Continue;
                }
                // Switch to the raw-text states the tree builder would use,
                // so script bodies and titles are not tokenized as markup.
                match name.as_str() {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                        TokenSinkResult::RawData(RawKind::Rawtext)
                    }
                    "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
                    _ => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                self.events.close_tag(&name);
                TokenSinkResult::Continue
            }
        }
    }
}

impl<E: MarkupEvents> TokenSink for Sink<'_, E> {
    type Handle = ();

    fn process_token(&mut self, token: Token, line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => self.tag(tag),
            Token::CharacterTokens(text) => {
                self.events.text(&text);
                TokenSinkResult::Continue
            }
            Token::ParseError(message) => {
                self.events.parse_error(line_number, &message);
                TokenSinkResult::Continue
            }
            Token::DoctypeToken(_)
            | Token::CommentToken(_)
            | Token::NullCharacterToken
            | Token::EOFToken => TokenSinkResult::Continue,
        }
    }
}

/// Tokenizes `html` and forwards every event to `events`.
pub fn scan<E: MarkupEvents>(html: &str, events: &mut E) {
    let sink = Sink { events };
    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
}
