/// SQL keywords and punctuation emitted by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum Token {
    // Statements and clauses
    SELECT,
    FROM,
    WHERE,
    ORDER,
    BY,
    LIMIT,
    OFFSET,
    AS,
    ON,
    // Joins
    JOIN,
    INNER,
    LEFT,
    // Logic
    AND,
    OR,
    NOT,
    EXISTS,
    IN,
    IS,
    NULL,
    LIKE,
    ILIKE,
    // Ordering
    ASC,
    DESC,
    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    DOT,
    STAR,
    // Comparison operators
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
}

impl Token {
    /// Returns the SQL text for this token
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::ORDER => "ORDER",
            Token::BY => "BY",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::AS => "AS",
            Token::ON => "ON",
            Token::JOIN => "JOIN",
            Token::INNER => "INNER",
            Token::LEFT => "LEFT",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::EXISTS => "EXISTS",
            Token::IN => "IN",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIKE => "LIKE",
            Token::ILIKE => "ILIKE",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
        }
    }

    /// Comparison operators get a space on both sides
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ | Token::NE | Token::LT | Token::GT | Token::LE | Token::GE
        )
    }
}
