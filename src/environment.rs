use std::collections::HashMap;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;
use crate::Shared;

/// One scope of name bindings, chained to its lexically enclosing scope.
/// The chain is a tree rooted at the globals; blocks and call frames add a
/// level, and closures keep their level alive past the block that made it.
#[derive(Debug, Default)]
pub struct Environment {
    pub enclosing: Option<Shared<Environment>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(self, enclosing: Shared<Environment>) -> Self {
        Self {
            enclosing: Some(enclosing),
            ..Default::default()
        }
    }

    pub fn as_shared(self) -> Shared<Self> {
        std::rc::Rc::new(std::cell::RefCell::new(self))
    }

    /// Bind `name` in this scope, silently replacing any previous binding
    /// of the same name in this same scope.
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_owned(), value);
    }

    /// Look `name` up, innermost scope first.
    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(ref enclosing) = self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::UndefinedVariable { name: name.clone() })
    }

    /// Mutate the nearest existing binding of `name`. Never creates one;
    /// an unbound name is an error no matter how deep the chain goes.
    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(ref enclosing) = self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::UndefinedVariable { name: name.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn name(s: &str) -> Token {
        Token::new(TokenType::Identifier, s, None, 1)
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("x", Object::Number(42.0));
        assert_eq!(env.get(&name("x")).unwrap(), Object::Number(42.0));
    }

    #[test]
    fn redefine_in_same_scope_shadows() {
        let mut env = Environment::new();
        env.define("x", Object::Number(1.0));
        env.define("x", Object::Number(2.0));
        assert_eq!(env.get(&name("x")).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn get_walks_the_chain() {
        let globals = {
            let mut env = Environment::new();
            env.define("x", Object::String("outer".to_owned()));
            env.as_shared()
        };
        let inner = Environment::new().with_enclosing(globals);

        assert_eq!(
            inner.get(&name("x")).unwrap(),
            Object::String("outer".to_owned())
        );
    }

    #[test]
    fn assign_mutates_the_enclosing_binding() {
        let globals = {
            let mut env = Environment::new();
            env.define("x", Object::Number(1.0));
            env.as_shared()
        };
        let mut inner = Environment::new().with_enclosing(globals.clone());

        inner.assign(&name("x"), Object::Number(2.0)).unwrap();
        assert_eq!(globals.borrow().get(&name("x")).unwrap(), Object::Number(2.0));
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::new();
        let err = env.assign(&name("missing"), Object::Null).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn get_fails_when_the_chain_is_exhausted() {
        let globals = Environment::new().as_shared();
        let inner = Environment::new().with_enclosing(globals);
        assert!(inner.get(&name("missing")).is_err());
    }
}
