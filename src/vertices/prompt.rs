use std::io::{self, BufRead, Write};

/// Supplies a corrective search term when a lookup finds nothing.
pub trait Operator: Send + Sync {
    /// Asks for a new query for `name` after `query` failed.
    /// `None` gives up on the vertex.
    fn search_term(&self, name: &str, query: &str) -> io::Result<Option<String>>;
}

/// Asks on the terminal. An empty answer gives up.
pub struct StdinOperator;

impl Operator for StdinOperator {
    fn search_term(&self, name: &str, query: &str) -> io::Result<Option<String>> {
        let mut stderr = io::stderr();
        write!(
            stderr,
            "No location found for '{name}' (searched '{query}'). Enter search term: "
        )?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let term = line.trim();

        Ok((!term.is_empty()).then(|| term.to_string()))
    }
}

/// Never answers; unresolved vertices fail the run.
pub struct NoOperator;

impl Operator for NoOperator {
    fn search_term(&self, _name: &str, _query: &str) -> io::Result<Option<String>> {
        Ok(None)
    }
}
