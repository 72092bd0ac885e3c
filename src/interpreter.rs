use std::rc::Rc;

use crate::prelude::*;
use crate::{Shared, SharedErrorReporter};

type EvalResult = Result<Object, RuntimeError>;

/// The outcome of executing one statement. `Return` travels back up
/// through every statement executor until a function call (or the top
/// level) consumes it; it is ordinary data, not an error.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return { keyword: Token, value: Object },
}

/// Evaluation context: the global scope, the currently active scope, and
/// an optional reporter for surfacing runtime errors. Each `Interpreter`
/// is independent, so tests can run many sessions side by side.
pub struct Interpreter {
    pub globals: Shared<Environment>,
    environment: Shared<Environment>,
    error_reporter: Option<SharedErrorReporter>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Environment::new().as_shared();
        let environment = globals.clone();

        globals
            .borrow_mut()
            .define("clock", Object::Callable(crate::native::clock()));

        Self {
            globals,
            environment,
            error_reporter: None,
        }
    }

    pub fn with_error_reporting(self, error_reporter: SharedErrorReporter) -> Self {
        Self {
            error_reporter: Some(error_reporter),
            ..self
        }
    }

    /// Run top-level statements in order, stopping at the first runtime
    /// error. Effects produced before the error stay produced.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            match self.execute(stmt) {
                Ok(Flow::Normal) => {}
                Ok(Flow::Return { keyword, .. }) => {
                    self.report_runtime_error(&RuntimeError::Unsupported {
                        token: keyword,
                        msg: "Cannot return from top-level code.".to_owned(),
                    });
                    return;
                }
                Err(e) => {
                    self.report_runtime_error(&e);
                    return;
                }
            }
        }
    }

    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate_expr(expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Print { expr } => {
                let value = self.evaluate_expr(expr)?;
                println!("{value}");
                Ok(Flow::Normal)
            }
            Stmt::Var { name, initializer } => {
                // The initializer runs before the name exists, so
                // 'var x = x;' reads an outer 'x' (or fails).
                let value = match initializer {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Object::Null,
                };

                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }
            Stmt::Block { statements } => {
                let new_env = Environment::new().with_enclosing(self.environment.clone()).as_shared();

                self.execute_block(statements, new_env)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.evaluate_expr(condition)?;

                if is_truthy(&condition) {
                    self.execute(then_branch)
                } else if let Some(stmt) = else_branch {
                    self.execute(stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body } => {
                loop {
                    let value = self.evaluate_expr(condition)?;
                    if !is_truthy(&value) {
                        break;
                    }

                    // A Return inside the body ends the loop along with
                    // the enclosing call
                    if let flow @ Flow::Return { .. } = self.execute(body)? {
                        return Ok(flow);
                    }
                }

                Ok(Flow::Normal)
            }
            Stmt::Function { name, params, body } => {
                // Capture the environment current at declaration time, not
                // call time. Defining the function into that same
                // environment is what allows recursive self-reference.
                let function =
                    RillFunction::new(name.clone(), params.to_vec(), body, self.environment.clone());
                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Object::Callable(Rc::new(function)));
                Ok(Flow::Normal)
            }
            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Object::Null,
                };

                Ok(Flow::Return {
                    keyword: keyword.clone(),
                    value,
                })
            }
            Stmt::Class { name, .. } => Err(RuntimeError::Unsupported {
                token: name.clone(),
                msg: "Classes are not supported at runtime.".to_owned(),
            }),
        }
    }

    /// Run `statements` with `environment` as the current scope. The
    /// previous scope comes back no matter how the block ends: normal
    /// completion, runtime error, or a Return unwinding through it.
    pub fn execute_block<I, R>(
        &mut self,
        statements: I,
        environment: Shared<Environment>,
    ) -> Result<Flow, RuntimeError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<Stmt>,
    {
        let previous = self.environment.clone();
        self.environment = environment;

        for stmt in statements {
            match self.execute(stmt.as_ref()) {
                Ok(Flow::Normal) => {}
                other => {
                    self.environment = previous;
                    return other;
                }
            }
        }

        self.environment = previous;
        Ok(Flow::Normal)
    }

    pub fn evaluate_expr(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr: inner } => self.evaluate_expr(inner),
            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),
            Expr::Binary { left, operator, right } => self.evaluate_binary(left, operator, right),
            Expr::Logical { left, operator, right } => {
                let left_value = self.evaluate_expr(left)?;

                // Short-circuit: the deciding operand is the result, and
                // the right side never runs when the left decides
                if operator.token_type == TokenType::Or {
                    if is_truthy(&left_value) {
                        return Ok(left_value);
                    }
                } else if !is_truthy(&left_value) {
                    return Ok(left_value);
                }

                self.evaluate_expr(right)
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.evaluate_expr(condition)?;

                // Exactly one branch runs
                if is_truthy(&condition) {
                    self.evaluate_expr(then_branch)
                } else {
                    self.evaluate_expr(else_branch)
                }
            }
            Expr::Variable { name } => self.environment.borrow().get(name),
            Expr::Assignment { name, value } => {
                let value = self.evaluate_expr(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee_value = self.evaluate_expr(callee)?;

                // Arguments evaluate left to right before any checks, so
                // their side effects happen even when the call fails
                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate_expr(arg)?);
                }

                match callee_value {
                    Object::Callable(callable) => {
                        if callable.arity() != args.len() {
                            return Err(RuntimeError::ArityMismatch {
                                paren: paren.clone(),
                                expected: callable.arity(),
                                actual: args.len(),
                            });
                        }

                        callable.call(self, args)
                    }
                    _ => Err(RuntimeError::NotCallable { paren: paren.clone() }),
                }
            }
            Expr::Get { object, name } => {
                self.evaluate_expr(object)?;
                Err(RuntimeError::invalid_operand(
                    name,
                    "Only instances have properties.",
                ))
            }
            Expr::Set { object, name, .. } => {
                self.evaluate_expr(object)?;
                Err(RuntimeError::invalid_operand(
                    name,
                    "Only instances have properties.",
                ))
            }
            Expr::This { keyword } => self.environment.borrow().get(keyword),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> EvalResult {
        let value = self.evaluate_expr(right)?;

        match operator.token_type {
            TokenType::Minus => match value.number() {
                Some(n) => Ok(Object::Number(-n)),
                None => Err(RuntimeError::invalid_operand(
                    operator,
                    "Operand must be a number.",
                )),
            },
            TokenType::Bang => Ok(Object::Boolean(!is_truthy(&value))),

            // The parser only builds '!' and '-' unaries
            _ => Ok(Object::Null),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult {
        let left_value = self.evaluate_expr(left)?;
        let right_value = self.evaluate_expr(right)?;

        match operator.token_type {
            TokenType::Plus => {
                if let (Some(l), Some(r)) = (left_value.number(), right_value.number()) {
                    Ok(Object::Number(l + r))
                } else if left_value.is_string() || right_value.is_string() {
                    // One string operand turns '+' into concatenation and
                    // stringifies the other operand
                    Ok(Object::String(format!("{left_value}{right_value}")))
                } else {
                    Err(RuntimeError::invalid_operand(
                        operator,
                        "Operands must be two numbers or two strings.",
                    ))
                }
            }
            TokenType::Minus => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Number(l - r)),
            TokenType::Star => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Number(l * r)),
            TokenType::Slash => {
                let (l, r) = self.check_number_operands(operator, &left_value, &right_value)?;
                if r == 0.0 {
                    // An error, never IEEE infinity
                    return Err(RuntimeError::DivisionByZero {
                        operator: operator.clone(),
                    });
                }

                Ok(Object::Number(l / r))
            }
            TokenType::Greater => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l > r)),
            TokenType::GreaterEqual => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l >= r)),
            TokenType::Less => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l < r)),
            TokenType::LessEqual => self
                .check_number_operands(operator, &left_value, &right_value)
                .map(|(l, r)| Object::Boolean(l <= r)),

            TokenType::EqualEqual => Ok(Object::Boolean(left_value == right_value)),
            TokenType::BangEqual => Ok(Object::Boolean(left_value != right_value)),

            // The comma operator: the left value is evaluated and dropped
            TokenType::Comma => Ok(right_value),

            // The parser builds no other binary operators
            _ => Ok(Object::Null),
        }
    }

    fn check_number_operands(
        &self,
        operator: &Token,
        left: &Object,
        right: &Object,
    ) -> Result<(f64, f64), RuntimeError> {
        if let (Some(l), Some(r)) = (left.number(), right.number()) {
            Ok((l, r))
        } else {
            Err(RuntimeError::invalid_operand(
                operator,
                "Operands must be numbers.",
            ))
        }
    }

    fn report_runtime_error(&self, e: &RuntimeError) {
        if let Some(ref reporter) = self.error_reporter {
            reporter.borrow_mut().runtime_error(e);
        }
    }
}

/// nil and false are falsy; every other value, zero and the empty string
/// included, is truthy.
fn is_truthy(value: &Object) -> bool {
    !matches!(value, Object::Null | Object::Boolean(false))
}
