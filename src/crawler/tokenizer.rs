//! Incremental HTML tokenizing
//!
//! Wraps html5ever's tokenizer so that a page body can be pushed through it
//! chunk by chunk as it arrives from the network. Tokens are queued and pulled
//! back out by the link extractor, so no document tree is ever built.

use html5ever::tendril::fmt::UTF8;
use html5ever::tendril::stream::Utf8LossyDecoder;
use html5ever::tendril::{ByteTendril, StrTendril, TendrilSink};
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as HtmlToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use std::borrow::Cow;
use std::collections::VecDeque;

/// A markup token as seen by the link extractor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An opening tag with its attributes in source order
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },

    /// A tag written as `<name ... />`; it never opens an element
    SelfClosingTag {
        name: String,
        attrs: Vec<(String, String)>,
    },

    /// A closing tag
    EndTag { name: String },

    /// A run of character data
    Text(String),

    /// End of the document
    Eof,

    /// The input stream failed; nothing after this point is trustworthy
    Error(String),
}

impl Token {
    /// Convenience constructor used heavily in tests
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        Token::StartTag {
            name: name.to_string(),
            attrs: owned_attrs(attrs),
        }
    }

    /// Convenience constructor for `<name ... />` tags
    pub fn self_closing(name: &str, attrs: &[(&str, &str)]) -> Self {
        Token::SelfClosingTag {
            name: name.to_string(),
            attrs: owned_attrs(attrs),
        }
    }

    /// Convenience constructor for closing tags
    pub fn end(name: &str) -> Self {
        Token::EndTag {
            name: name.to_string(),
        }
    }

    /// Convenience constructor for text
    pub fn text(text: &str) -> Self {
        Token::Text(text.to_string())
    }
}

fn owned_attrs(attrs: &[(&str, &str)]) -> Vec<(String, String)> {
    attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// html5ever sink that queues converted tokens
struct TokenCollector {
    tokens: VecDeque<Token>,
}

impl TokenCollector {
    fn push_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();

        match tag.kind {
            TagKind::StartTag => {
                let attrs = tag
                    .attrs
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();

                if tag.self_closing {
                    self.tokens.push_back(Token::SelfClosingTag { name, attrs });
                    return TokenSinkResult::Continue;
                }

                let raw_kind = raw_text_kind(&name);
                self.tokens.push_back(Token::StartTag { name, attrs });

                match raw_kind {
                    Some(kind) => TokenSinkResult::RawData(kind),
                    None => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                self.tokens.push_back(Token::EndTag { name });
                TokenSinkResult::Continue
            }
        }
    }
}

impl TokenSink for TokenCollector {
    type Handle = ();

    fn process_token(&mut self, token: HtmlToken, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            HtmlToken::TagToken(tag) => return self.push_tag(tag),
            HtmlToken::CharacterTokens(text) => self.tokens.push_back(Token::Text(text.to_string())),
            HtmlToken::NullCharacterToken => {
                self.tokens
                    .push_back(Token::Text(char::REPLACEMENT_CHARACTER.to_string()));
            }
            HtmlToken::EOFToken => self.tokens.push_back(Token::Eof),
            // html5ever recovers from these on its own
            HtmlToken::ParseError(message) => {
                tracing::trace!("Recoverable markup error: {}", message);
            }
            HtmlToken::CommentToken(_) | HtmlToken::DoctypeToken(_) => {}
        }
        TokenSinkResult::Continue
    }
}

/// Elements whose content must not be tokenized as markup
fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            Some(RawKind::Rawtext)
        }
        "textarea" | "title" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Decoded text sink in front of the html5ever tokenizer
///
/// Finishing it ends the tokenizer and hands back the tokens still queued.
struct TokenizerInput {
    tokenizer: Tokenizer<TokenCollector>,
    input: BufferQueue,
}

impl TendrilSink<UTF8> for TokenizerInput {
    type Output = VecDeque<Token>;

    fn process(&mut self, text: StrTendril) {
        if text.is_empty() {
            return;
        }

        self.input.push_back(text);
        let _ = self.tokenizer.feed(&mut self.input);
    }

    // Invalid sequences have already been replaced with U+FFFD
    fn error(&mut self, description: Cow<'static, str>) {
        tracing::trace!("Invalid UTF-8 in page body: {}", description);
    }

    fn finish(mut self) -> VecDeque<Token> {
        self.tokenizer.end();
        std::mem::take(&mut self.tokenizer.sink.tokens)
    }
}

/// Push-in, pull-out HTML token stream
///
/// Feed body chunks with [`HtmlTokenStream::feed`], pull ready tokens with
/// [`HtmlTokenStream::next_token`], and call [`HtmlTokenStream::end`] once the
/// body is exhausted to flush the tokenizer and queue [`Token::Eof`].
///
/// Bytes are decoded with tendril's lossy UTF-8 decoder, which carries
/// multi-byte sequences split across chunks over to the next chunk.
pub struct HtmlTokenStream {
    decoder: Option<Utf8LossyDecoder<TokenizerInput>>,
    remaining: VecDeque<Token>,
}

impl HtmlTokenStream {
    /// Creates an empty stream
    pub fn new() -> Self {
        let sink = TokenCollector {
            tokens: VecDeque::new(),
        };
        let input = TokenizerInput {
            tokenizer: Tokenizer::new(sink, TokenizerOpts::default()),
            input: BufferQueue::new(),
        };

        Self {
            decoder: Some(Utf8LossyDecoder::new(input)),
            remaining: VecDeque::new(),
        }
    }

    /// Pushes a chunk of raw body bytes through the tokenizer
    ///
    /// Ignored once [`HtmlTokenStream::end`] has been called.
    pub fn feed(&mut self, bytes: &[u8]) {
        if let Some(decoder) = self.decoder.as_mut() {
            decoder.process(ByteTendril::from_slice(bytes));
        }
    }

    /// Signals end of input; queues any remaining tokens followed by `Eof`
    pub fn end(&mut self) {
        if let Some(decoder) = self.decoder.take() {
            let mut rest = decoder.finish();
            self.remaining.append(&mut rest);
        }
    }

    /// Pops the next ready token, if any
    pub fn next_token(&mut self) -> Option<Token> {
        if let Some(token) = self.remaining.pop_front() {
            return Some(token);
        }

        self.decoder
            .as_mut()
            .and_then(|decoder| decoder.inner_sink.tokenizer.sink.tokens.pop_front())
    }
}

impl Default for HtmlTokenStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes a complete document in one go
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut stream = HtmlTokenStream::new();
    stream.feed(html.as_bytes());
    stream.end();

    std::iter::from_fn(|| stream.next_token()).collect()
}
