use std::fmt::{self, Display};

/// Comparison and logical operators usable in a tag predicate expression.
///
/// Only `{=, !=, =~, !~, AND, OR}` are accepted by the storage engine's
/// validators; the remaining comparison operators exist because predicates
/// arrive from the general expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    EqRegex,
    NotEqRegex,
    And,
    Or,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::EqRegex => "=~",
            Operator::NotEqRegex => "!~",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: Operator,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

/// Tag predicate expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(BinaryExpr),
    /// Reference to a tag key.
    VarRef(String),
    StringLiteral(String),
    RegexLiteral(String),
    Paren(Box<Expr>),
}

impl Expr {
    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// `key = 'value'`
    pub fn tag_eq(key: &str, value: &str) -> Expr {
        Expr::binary(
            Operator::Eq,
            Expr::VarRef(key.to_string()),
            Expr::StringLiteral(value.to_string()),
        )
    }

    /// `key != 'value'`
    pub fn tag_not_eq(key: &str, value: &str) -> Expr {
        Expr::binary(
            Operator::NotEq,
            Expr::VarRef(key.to_string()),
            Expr::StringLiteral(value.to_string()),
        )
    }

    /// `key =~ /pattern/`
    pub fn tag_regex(key: &str, pattern: &str) -> Expr {
        Expr::binary(
            Operator::EqRegex,
            Expr::VarRef(key.to_string()),
            Expr::RegexLiteral(pattern.to_string()),
        )
    }

    /// `key !~ /pattern/`
    pub fn tag_not_regex(key: &str, pattern: &str) -> Expr {
        Expr::binary(
            Operator::NotEqRegex,
            Expr::VarRef(key.to_string()),
            Expr::RegexLiteral(pattern.to_string()),
        )
    }

    pub fn and(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(Operator::And, lhs, rhs)
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary(Operator::Or, lhs, rhs)
    }

    pub fn paren(expr: Expr) -> Expr {
        Expr::Paren(Box::new(expr))
    }
}

/// Preorder traversal of the expression tree.
pub fn walk(expr: &Expr, visit: &mut impl FnMut(&Expr)) {
    visit(expr);
    match expr {
        Expr::Binary(b) => {
            walk(&b.lhs, visit);
            walk(&b.rhs, visit);
        }
        Expr::Paren(inner) => walk(inner, visit),
        _ => {}
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary(b) => write!(f, "{} {} {}", b.lhs, b.op, b.rhs),
            Expr::VarRef(name) => write!(f, "{}", name),
            Expr::StringLiteral(s) => write!(f, "'{}'", s),
            Expr::RegexLiteral(s) => write!(f, "/{}/", s),
            Expr::Paren(inner) => write!(f, "({})", inner),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_walk_preorder() {
        let expr = Expr::and(
            Expr::tag_eq("host", "h1"),
            Expr::paren(Expr::tag_regex("region", "eu.*")),
        );

        let mut kinds = Vec::new();
        walk(&expr, &mut |node| {
            kinds.push(match node {
                Expr::Binary(b) => format!("binary({})", b.op),
                Expr::VarRef(..) => "var".to_string(),
                Expr::StringLiteral(..) => "string".to_string(),
                Expr::RegexLiteral(..) => "regex".to_string(),
                Expr::Paren(..) => "paren".to_string(),
            });
        });

        assert_eq!(
            kinds,
            vec![
                "binary(AND)",
                "binary(=)",
                "var",
                "string",
                "paren",
                "binary(=~)",
                "var",
                "regex"
            ]
        );
    }

    #[test]
    fn test_display() {
        let expr = Expr::or(Expr::tag_eq("host", "h1"), Expr::tag_not_regex("az", "us.*"));
        assert_eq!(expr.to_string(), "host = 'h1' OR az !~ /us.*/");
    }
}
