use Token::*;

/*************\
|* Tokenizer *|
\*************/
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub(super) sigil: String,
    pub(super) mark: char,
    pub(super) content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    BracketStart,
    BracketEnd,
    /// `#(`
    TupleStart,
    /// `Name(`
    RecordStart(String),
    /// a bare `(`, which never starts a value
    ParenStart,
    ParenEnd,
    Dash,
    Word(String),
    StringLit(Quote),
}

pub fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = vec![];
    let mut current_word: String = "".to_string();
    let mut current_quote: Option<Quote> = None;
    let mut is_escaped: bool = false;

    for char in s.chars() {
        /**********************************\
        |* Quoted string literal handling *|
        \**********************************/
        if let Some(mut quote) = current_quote.take() {
            if is_escaped {
                // keep the escape, the literal parser resolves it
                quote.content.push('\\');
                quote.content.push(char);
                is_escaped = false;
            } else if char == quote.mark {
                tokens.push(StringLit(quote));
                continue;
            } else if char == '\\' {
                is_escaped = true;
            } else if char == '"' {
                // single-quoted content is re-wrapped in double quotes
                quote.content.push_str("\\\"");
            } else {
                quote.content.push(char);
            }
            current_quote = Some(quote);
        }
        /***************\
        |* Quote start *|
        \***************/
        else if char == '\'' || char == '"' {
            current_quote = Some(Quote {
                sigil: current_word.clone(),
                mark: char,
                content: String::new(),
            });
            current_word.clear();
        }
        /*******************************\
        |* Openers glued to their word *|
        \*******************************/
        else if char == '(' && !current_word.is_empty() {
            if current_word == "#" {
                tokens.push(TupleStart);
            } else {
                tokens.push(RecordStart(current_word.clone()));
            }
            current_word.clear();
        }
        /**************************************\
        |* Everything besides string literals *|
        \**************************************/
        else if "()[],".contains(char) || char.is_whitespace() {
            push_word(&mut tokens, &mut current_word);
            match char {
                '(' => tokens.push(ParenStart),
                ')' => tokens.push(ParenEnd),
                '[' => tokens.push(BracketStart),
                ']' => tokens.push(BracketEnd),
                _ => (),
            }
        }
        // leading dashes become the "dash" token
        else if current_word.is_empty() && char == '-' {
            tokens.push(Dash)

        // continue with current word
        } else {
            current_word.push(char);
        }
    }
    push_word(&mut tokens, &mut current_word);

    tokens
}

#[inline]
fn push_word(tokens: &mut Vec<Token>, current_word: &mut String) {
    if !current_word.is_empty() {
        tokens.push(Word(current_word.clone()));
        current_word.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_quote() {
        assert_eq!(
            tokenize("[bee'hi']"),
            vec![
                BracketStart,
                StringLit(Quote {
                    sigil: "bee".to_string(),
                    mark: '\'',
                    content: "hi".to_string()
                },),
                BracketEnd
            ]
        )
    }

    #[test]
    fn test_escapes_are_kept() {
        assert_eq!(
            tokenize("'hi\\'hi\\n\"'"),
            vec![StringLit(Quote {
                sigil: String::new(),
                mark: '\'',
                content: "hi\\'hi\\n\\\"".to_string()
            })]
        )
    }

    #[test]
    fn test_negative_numbers() {
        assert_eq!(
            tokenize("-4.31"),
            vec![Dash, Word("4.31".to_string())]
        )
    }

    #[test]
    fn test_compound_openers() {
        assert_eq!(
            tokenize("#(1, Point(2,3)) ( :k"),
            vec![
                TupleStart,
                Word("1".to_string()),
                RecordStart("Point".to_string()),
                Word("2".to_string()),
                Word("3".to_string()),
                ParenEnd,
                ParenEnd,
                ParenStart,
                Word(":k".to_string()),
            ]
        )
    }
}
