//! Interactive fallbacks for arguments left off the command line.

use std::io::{self, BufRead, Write};

/// Ask `question` and return the trimmed answer.
pub fn ask<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no input provided",
        ));
    }
    Ok(answer.trim().to_string())
}

/// Ask on the process's stdin/stdout.
pub fn ask_stdin(question: &str) -> io::Result<String> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    ask(question, &mut input, &mut io::stdout())
}

/// Parse the requested video count.
///
/// Accepts a non-negative integer with surrounding whitespace.
pub fn parse_count(raw: &str) -> Result<usize, String> {
    let trimmed = raw.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid video count", trimmed))
}
