use crate::prelude::*;

/// Renders an expression tree in parenthesized prefix form, mostly for
/// debugging the parser: `-123 * (45.67)` becomes
/// `(* (- 123) (group 45.67))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn to_string(expr: &Expr) -> String {
        match expr {
            Expr::Literal { value } => format!("{value}"),
            Expr::Grouping { expr } => format!("(group {})", Self::to_string(expr)),
            Expr::Unary { operator, right } => {
                format!("({} {})", operator.lexeme, Self::to_string(right))
            }
            Expr::Binary { left, operator, right } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::to_string(left),
                Self::to_string(right)
            ),
            Expr::Logical { left, operator, right } => format!(
                "({} {} {})",
                operator.lexeme,
                Self::to_string(left),
                Self::to_string(right)
            ),
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(? {} {} {})",
                Self::to_string(condition),
                Self::to_string(then_branch),
                Self::to_string(else_branch)
            ),
            Expr::Variable { name } => name.lexeme.clone(),
            Expr::Assignment { name, value } => {
                format!("(= {} {})", name.lexeme, Self::to_string(value))
            }
            Expr::Call { callee, arguments, .. } => {
                let mut out = format!("(call {}", Self::to_string(callee));
                for arg in arguments {
                    out.push(' ');
                    out.push_str(&Self::to_string(arg));
                }
                out.push(')');
                out
            }
            Expr::Get { object, name } => {
                format!("(. {} {})", Self::to_string(object), name.lexeme)
            }
            Expr::Set { object, name, value } => format!(
                "(.= {} {} {})",
                Self::to_string(object),
                name.lexeme,
                Self::to_string(value)
            ),
            Expr::This { .. } => "this".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    #[test]
    fn print_an_ast() {
        // This is '-123 * (45.67)'
        let expr = Expr::Binary {
            left: Box::new(Expr::Unary {
                operator: Token::new(TokenType::Minus, "-", None, 1),
                right: Box::new(Expr::number_literal(123.0)),
            }),
            operator: Token::new(TokenType::Star, "*", None, 1),
            right: Box::new(Expr::Grouping {
                expr: Box::new(Expr::number_literal(45.67)),
            }),
        };

        assert_eq!(AstPrinter::to_string(&expr), "(* (- 123) (group 45.67))");
    }

    #[test]
    fn print_a_call() {
        let expr = Expr::Call {
            callee: Box::new(Expr::Variable {
                name: Token::new(TokenType::Identifier, "f", None, 1),
            }),
            paren: Token::new(TokenType::RightParen, ")", None, 1),
            arguments: vec![Expr::number_literal(1.0), Expr::str_literal("two")],
        };

        assert_eq!(AstPrinter::to_string(&expr), "(call f 1 two)");
    }
}
