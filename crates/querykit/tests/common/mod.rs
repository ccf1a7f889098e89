#![allow(dead_code)]

use querykit::{
    Bindings, Connection, Formatter, GenericFormatter, QueryConfig, QueryResult, Row, Value,
};
use std::cell::RefCell;

type Responder = Box<dyn Fn(&str, &Bindings) -> Vec<Row>>;

/// In-memory connection: records every statement and answers with a closure.
pub struct MockConnection {
    formatter: Box<dyn Formatter>,
    config: QueryConfig,
    responder: Responder,
    affected: u64,
    log: RefCell<Vec<(String, Bindings)>>,
}

impl MockConnection {
    pub fn new(responder: impl Fn(&str, &Bindings) -> Vec<Row> + 'static) -> Self {
        Self {
            formatter: Box::new(GenericFormatter),
            config: QueryConfig::default(),
            responder: Box::new(responder),
            affected: 0,
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn returning(rows: Vec<Row>) -> Self {
        Self::new(move |_, _| rows.clone())
    }

    pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    pub fn statements(&self) -> Vec<String> {
        self.log.borrow().iter().map(|(sql, _)| sql.clone()).collect()
    }

    pub fn last(&self) -> Option<(String, Vec<Value>)> {
        self.log
            .borrow()
            .last()
            .map(|(sql, b)| (sql.clone(), b.positional().to_vec()))
    }
}

impl Connection for MockConnection {
    fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    fn config(&self) -> &QueryConfig {
        &self.config
    }

    fn query(&self, sql: &str, bindings: &Bindings) -> QueryResult<Vec<Row>> {
        self.log
            .borrow_mut()
            .push((sql.to_string(), bindings.clone()));
        Ok((self.responder)(sql, bindings))
    }

    fn affecting_query(&self, sql: &str, bindings: &Bindings) -> QueryResult<u64> {
        self.log
            .borrow_mut()
            .push((sql.to_string(), bindings.clone()));
        Ok(self.affected)
    }
}

pub fn row(pairs: &[(&str, Value)]) -> Row {
    Row::from_pairs(pairs.iter().cloned())
}

/// `LIMIT n` of a rendered statement, if any.
pub fn limit_of(sql: &str) -> Option<usize> {
    let (_, rest) = sql.split_once(" LIMIT ")?;
    rest.split_whitespace().next()?.parse().ok()
}
