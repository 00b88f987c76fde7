use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use subforge::SfResult;

/// File when given, stdin otherwise.
pub fn open_input(path: Option<&Path>) -> SfResult<Box<dyn BufRead>> {
    Ok(match path {
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

/// File when given, stdout otherwise.
pub fn open_output(path: Option<&Path>) -> SfResult<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Inline text wins over a file, a file over stdin.
pub fn read_text(text: Option<&str>, path: Option<&Path>) -> SfResult<String> {
    if let Some(t) = text {
        return Ok(t.to_string());
    }
    let mut buf = String::new();
    open_input(path)?.read_to_string(&mut buf)?;
    Ok(buf)
}
