//! MDX Tokens - the atomic units of MDX output.
//!
//! Every AST node lowers to a flat token stream; the stream is what
//! turns into text. Keeping the two steps apart means quoting and
//! escaping live in exactly one place.

/// MDX Token - every possible element in an MDX statement.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    With,
    Member,
    Set,
    As,
    Select,
    NonEmpty,
    On,
    From,
    Where,
    And,
    Or,
    Xor,
    Not,
    Null,

    // === Punctuation ===
    Comma,
    Dot,
    Colon,
    Amp,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Concat,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Indent(usize),

    // === Dynamic Content ===
    /// Bracket-quoted name segment: `[Product]`
    QuotedIdent(String),
    /// Bare name segment: `Members`
    Ident(String),
    /// Key segment: `&[1997]`
    KeyIdent(String),
    /// Integer literal
    LitInt(i64),
    /// Float literal
    LitFloat(f64),
    /// String literal
    LitString(String),
    /// Symbol literal, written verbatim (`ASC`, `POST`)
    Symbol(String),
    /// Axis name: `COLUMNS`, `ROWS`, `PAGES`
    AxisName(&'static str),

    // === Function Names ===
    /// Function name, rendered as written.
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string.
    pub fn serialize(&self) -> String {
        match self {
            // Keywords
            Token::With => "WITH".into(),
            Token::Member => "MEMBER".into(),
            Token::Set => "SET".into(),
            Token::As => "AS".into(),
            Token::Select => "SELECT".into(),
            Token::NonEmpty => "NON EMPTY".into(),
            Token::On => "ON".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Xor => "XOR".into(),
            Token::Not => "NOT".into(),
            Token::Null => "NULL".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Colon => ":".into(),
            Token::Amp => "&".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::Div => "/".into(),
            Token::Concat => "||".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Indent(n) => "    ".repeat(*n),

            // Dynamic
            Token::QuotedIdent(name) => quote_name(name),
            Token::Ident(name) => name.clone(),
            Token::KeyIdent(key) => format!("&{}", quote_name(key)),
            Token::LitInt(n) => n.to_string(),
            Token::LitFloat(f) => {
                if f.is_nan() {
                    panic!("Cannot serialize NaN to MDX")
                }
                if f.is_infinite() {
                    panic!("Cannot serialize Infinity to MDX")
                }
                let mut buffer = ryu::Buffer::new();
                buffer.format(*f).to_string()
            }
            Token::LitString(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Token::Symbol(s) => s.clone(),
            Token::AxisName(name) => (*name).into(),

            Token::FunctionName(name) => name.clone(),
        }
    }
}

/// Wrap a name in brackets, doubling any closing bracket inside it.
pub fn quote_name(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// A stream of tokens that can be serialized to MDX.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Serialize all tokens to an MDX string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(Token::serialize).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn lbrace(&mut self) -> &mut Self {
        self.push(Token::LBrace)
    }
    pub fn rbrace(&mut self) -> &mut Self {
        self.push(Token::RBrace)
    }
}
