use crate::ast::*;

// §14.7.5.2 IsDestructuring
//   ForDeclaration : LetOrConst ForBinding
pub fn is_destructuring_for_declaration(decl: &VariableDeclaration) -> bool {
    let Some(first) = decl.declarations.first() else {
        unreachable!("IsDestructuring: for-declaration without a binding");
    };
    is_destructuring_for_binding(&first.pattern)
}

//   ForBinding : BindingIdentifier | BindingPattern
//   plus a plain assignment target reached through the LeftHandSideExpression form
pub fn is_destructuring_for_binding(binding: &Pattern) -> bool {
    match binding {
        Pattern::Identifier(_) => false,
        Pattern::Array(_) | Pattern::Object(_) => true,
        Pattern::MemberExpression(expr) if matches!(**expr, Expression::Member(..)) => false,
        other => unreachable!("IsDestructuring: unexpected binding shape {other:?}"),
    }
}

pub fn is_destructuring(left: &ForInOfLeft) -> bool {
    match left {
        ForInOfLeft::Variable(decl) => is_destructuring_for_declaration(decl),
        ForInOfLeft::Pattern(pattern) => is_destructuring_for_binding(pattern),
    }
}
