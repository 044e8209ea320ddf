//! ODF enhanced-geometry equation solving.
//!
//! Equations parameterize a shape's path ("f0" through "fN" in most shapes
//! shipped by office suites). Each formula is a small arithmetic expression
//! over positional modifiers, previously solved equations and the view-box
//! constants, plus a fixed function set. The grammar is parsed by a
//! recursive-descent parser into a tiny AST and tree-walk evaluated; nothing
//! outside the function table is reachable from a formula.
//!
//! Solving is best-effort by design: a malformed formula, an unknown
//! reference or an arithmetic error resolves that one equation to 0.0 so a
//! single bad equation never discards a document's geometry.

use super::env::VariableEnv;
use thiserror::Error;

/// Why a single formula failed to evaluate. Never escapes the solver; the
/// failing equation resolves to 0.0.
#[derive(Error, Debug, PartialEq)]
pub enum FormulaError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("function '{0}' called with {1} arguments")]
    Arity(String, usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result is not a finite number")]
    NotFinite,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    /// `$N` positional modifier reference
    Modifier(u32),
    /// `?name` reference or bare constant name
    Ref(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

#[derive(Debug, Clone)]
enum Expr {
    Number(f64),
    Modifier(u32),
    Ref(String),
    Neg(Box<Expr>),
    Binary(char, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

fn lex(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            },
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            },
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            },
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            },
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            },
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            },
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            },
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            },
            '$' => {
                chars.next();
                let mut digits = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        digits.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let index = digits.parse().map_err(|_| FormulaError::UnexpectedChar('$'))?;
                tokens.push(Token::Modifier(index));
            },
            '?' => {
                chars.next();
                let name = lex_ident(&mut chars);
                if name.is_empty() {
                    return Err(FormulaError::UnexpectedChar('?'));
                }
                tokens.push(Token::Ref(name));
            },
            c if c.is_ascii_digit() || c == '.' => {
                let mut number = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        number.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value = number
                    .parse()
                    .map_err(|_| FormulaError::UnexpectedChar(c))?;
                tokens.push(Token::Number(value));
            },
            c if c.is_ascii_alphabetic() => {
                tokens.push(Token::Ref(lex_ident(&mut chars)));
            },
            other => return Err(FormulaError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn lex_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, FormulaError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FormulaError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, token: Token) -> Result<(), FormulaError> {
        if self.next()? == token {
            Ok(())
        } else {
            Err(FormulaError::UnexpectedToken(self.pos - 1))
        }
    }

    /// expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => '+',
                Some(Token::Minus) => '-',
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => '*',
                Some(Token::Slash) => '/',
                _ => break,
            };
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// factor := '-' factor | primary
    fn factor(&mut self) -> Result<Expr, FormulaError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            return Ok(Expr::Neg(Box::new(self.factor()?)));
        }
        self.primary()
    }

    /// primary := number | modifier | ref | ref '(' args ')' | '(' expr ')'
    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next()? {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Modifier(index) => Ok(Expr::Modifier(index)),
            Token::Ref(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let mut args = Vec::new();
                    if self.peek() != Some(&Token::RParen) {
                        loop {
                            args.push(self.expr()?);
                            if self.peek() == Some(&Token::Comma) {
                                self.pos += 1;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(Token::RParen)?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Ref(name))
                }
            },
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            },
            _ => Err(FormulaError::UnexpectedToken(self.pos - 1)),
        }
    }
}

fn eval(expr: &Expr, env: &VariableEnv) -> Result<f64, FormulaError> {
    let value = match expr {
        Expr::Number(value) => *value,
        Expr::Modifier(index) => env
            .modifier(*index)
            .ok_or_else(|| FormulaError::UnknownVariable(format!("${}", index)))?,
        Expr::Ref(name) => env
            .get(name)
            .ok_or_else(|| FormulaError::UnknownVariable(name.clone()))?,
        Expr::Neg(inner) => -eval(inner, env)?,
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(lhs, env)?;
            let rhs = eval(rhs, env)?;
            match op {
                '+' => lhs + rhs,
                '-' => lhs - rhs,
                '*' => lhs * rhs,
                '/' => {
                    if rhs == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    lhs / rhs
                },
                _ => unreachable!("parser only emits + - * /"),
            }
        },
        Expr::Call(name, args) => {
            let values: Vec<f64> = args
                .iter()
                .map(|a| eval(a, env))
                .collect::<Result<_, _>>()?;
            call(name, &values)?
        },
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NotFinite)
    }
}

/// The complete function table. Nothing else is callable from a formula.
fn call(name: &str, args: &[f64]) -> Result<f64, FormulaError> {
    let arity = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(FormulaError::Arity(name.to_string(), args.len()))
        }
    };

    match name {
        "sin" => {
            arity(1)?;
            Ok(args[0].sin())
        },
        "cos" => {
            arity(1)?;
            Ok(args[0].cos())
        },
        "tan" => {
            arity(1)?;
            Ok(args[0].tan())
        },
        "sqrt" => {
            arity(1)?;
            Ok(args[0].sqrt())
        },
        "abs" => {
            arity(1)?;
            Ok(args[0].abs())
        },
        "min" => {
            arity(2)?;
            Ok(args[0].min(args[1]))
        },
        "max" => {
            arity(2)?;
            Ok(args[0].max(args[1]))
        },
        "if" => {
            arity(3)?;
            Ok(if args[0] != 0.0 { args[1] } else { args[2] })
        },
        _ => Err(FormulaError::UnknownFunction(name.to_string())),
    }
}

/// Evaluate one formula against the environment.
pub fn evaluate(formula: &str, env: &VariableEnv) -> Result<f64, FormulaError> {
    let tokens = lex(formula)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::UnexpectedToken(parser.pos));
    }
    eval(&expr, env)
}

/// Solve an ordered list of `(name, formula)` equations into the
/// environment. Later equations may reference any earlier result; a failing
/// equation binds 0.0 and solving continues.
pub fn solve_equations<'a, I>(equations: I, env: &mut VariableEnv)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (name, formula) in equations {
        let value = match evaluate(formula, env) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("equation '{}' failed ({}), defaulting to 0", name, e);
                0.0
            },
        };
        env.set(name, value);
    }
}
