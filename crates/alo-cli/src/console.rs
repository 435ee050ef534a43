//! Console prompt helpers. Everything is generic over `BufRead`/`Write` so
//! tests can script the exchange.

use regex::Regex;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const POSITIVE_ANSWERS: [&str; 2] = ["YES", "Y"];
const NEGATIVE_ANSWERS: [&str; 2] = ["NO", "N"];

/// Expands `%VAR%` (Windows style) and `$VAR` references against the
/// process environment. Unknown variables are left as typed.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"%([A-Za-z0-9_]+)%|\$([A-Za-z0-9_]+)").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
        match name.and_then(|n| env::var(n).ok()) {
            Some(value) => value,
            None => caps[0].to_string(),
        }
    })
    .into_owned()
}

/// Reads directory paths until one exists and passes `extra` validation.
///
/// `extra` gets the candidate path and the output stream, so validators can
/// print their own diagnostics; set `suppress_builtin_message` when they do.
pub fn prompt_directory<R, W, F>(
    input: &mut R,
    output: &mut W,
    mut extra: F,
    suppress_builtin_message: bool,
) -> io::Result<PathBuf>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Path, &mut W) -> io::Result<bool>,
{
    loop {
        let line = match read_line(input)? {
            Some(l) => l,
            None => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")),
        };

        let expanded = expand_env_vars(line.trim());
        let path = PathBuf::from(&expanded);

        if !path.is_dir() {
            writeln!(output, "The given directory does not exist, please try again:")?;
            continue;
        }

        if extra(&path, output)? {
            return Ok(path);
        }

        if !suppress_builtin_message {
            writeln!(output, "Failed to validate input, please try again:")?;
        }
    }
}

/// Converts a Yes/No answer to a bool. In strict mode anything else
/// re-prompts; otherwise unknown input counts as no.
pub fn read_yes_no<R, W>(input: &mut R, output: &mut W, strict: bool) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    loop {
        let line = match read_line(input)? {
            Some(l) => l,
            None => return Ok(false),
        };
        let answer = line.trim().to_uppercase();

        if POSITIVE_ANSWERS.contains(&answer.as_str()) {
            return Ok(true);
        }
        if NEGATIVE_ANSWERS.contains(&answer.as_str()) {
            return Ok(false);
        }

        if strict {
            writeln!(
                output,
                "Please answer \"Yes\" or \"No\". (\"Y\" and \"N\" are also accepted)"
            )?;
        } else {
            return Ok(false);
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
