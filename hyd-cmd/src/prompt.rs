//! Interactive input-directory prompt.

use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Mask convention shown before asking for the input directory.
pub const MASK_CONVENTION: &str = "The input files should be binary inundation maps in \
'tif' or 'tiff' format, named by acquisition date (e.g. 2020_01_15.tif).\n\
Pixel values: 0 = not inundated, 1 = inundated.";

const DIRECTORY_PROMPT: &str = "Enter the inputs' full path here: ";

/// Print the mask convention, ask for the input directory and read one line.
///
/// Surrounding whitespace and a single pair of matching quotes are removed,
/// since paths copied from a file manager often carry them.
pub fn prompt_directory<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> anyhow::Result<PathBuf> {
    writeln!(output, "{}", MASK_CONVENTION)?;
    write!(output, "{}", DIRECTORY_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("no input directory given (end of input)");
    }

    let path = strip_quotes(line.trim());
    if path.is_empty() {
        anyhow::bail!("no input directory given");
    }
    Ok(PathBuf::from(path))
}

fn strip_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return s[1..s.len() - 1].trim();
        }
    }
    s
}
