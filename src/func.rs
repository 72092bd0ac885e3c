use std::fmt::Display;
use std::rc::Rc;

use crate::prelude::*;
use crate::Shared;

/// A user-declared function value. Holds the environment that was current
/// at its declaration site; calls chain their frame to that environment,
/// never to the caller's, which is what makes scoping lexical.
#[derive(Debug, Clone)]
pub struct RillFunction {
    name: Token,
    params: Vec<Token>,
    body: Vec<Rc<Stmt>>,
    closure: Shared<Environment>,
}

impl RillFunction {
    pub fn new(
        name: Token,
        params: Vec<Token>,
        body: &[Rc<Stmt>],
        closure: Shared<Environment>,
    ) -> Self {
        Self {
            name,
            params,
            body: body.to_vec(),
            closure,
        }
    }
}

impl Callable for RillFunction {
    fn arity(&self) -> usize {
        self.params.len()
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        let environment = Environment::new().with_enclosing(self.closure.clone()).as_shared();

        {
            let mut frame = environment.borrow_mut();
            for (param, arg) in self.params.iter().zip(arguments) {
                frame.define(param.lexeme.as_str(), arg);
            }
        }

        // A Return unwinding from any depth of the body ends the call and
        // carries the call's result; a body that runs off the end is nil.
        match interpreter.execute_block(&self.body, environment)? {
            Flow::Return { value, .. } => Ok(value),
            Flow::Normal => Ok(Object::Null),
        }
    }
}

impl Display for RillFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<fn {}>", self.name.lexeme)
    }
}
