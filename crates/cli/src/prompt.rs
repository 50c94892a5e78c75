//! Interactive entry of the text to insert.

use anyhow::Result;
use appendfilename_core::{Completer, WordListProvider};
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq, Eq)]
enum Expansion {
    Text(String),
    Ambiguous(Vec<String>),
}

/// Ask for the text on stdin. `None` means nothing was entered.
pub fn ask_for_text(vocabulary: &dyn WordListProvider) -> Result<Option<String>> {
    let completer = Completer::from_provider(vocabulary).unwrap_or_else(|err| {
        log::warn!("no tab completion available: {err:#}");
        Completer::default()
    });
    let stdin = io::stdin();
    ask_for_text_from(&mut stdin.lock(), &mut io::stdout(), &completer)
}

fn ask_for_text_from(
    input: &mut impl BufRead,
    output: &mut impl Write,
    completer: &Completer,
) -> Result<Option<String>> {
    let hint = if completer.is_empty() {
        String::new()
    } else {
        format!("; complete {} words with TAB", completer.len())
    };
    writeln!(output, "         (abort with Ctrl-C{hint})")?;
    writeln!(output)?;

    loop {
        write!(output, "Please enter text: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\n', '\r']);

        match expand_tabs(line, completer) {
            Expansion::Text(text) => {
                let text = text.trim();
                return Ok((!text.is_empty()).then(|| text.to_string()));
            }
            Expansion::Ambiguous(matches) => {
                writeln!(output, "{}", matches.join("  "))?;
            }
        }
    }
}

/// Complete every word that is followed by a tab character.
fn expand_tabs(line: &str, completer: &Completer) -> Expansion {
    let mut pieces = line.split('\t').peekable();
    let mut out = String::with_capacity(line.len());

    while let Some(piece) = pieces.next() {
        out.push_str(piece);
        if pieces.peek().is_none() {
            break;
        }

        let word_start = out.rfind(' ').map_or(0, |i| i + 1);
        let matches = completer.complete(&out[word_start..]);
        match matches.as_slice() {
            [] => {}
            [single] => {
                let single = single.to_string();
                out.truncate(word_start);
                out.push_str(&single);
            }
            _ => {
                return Expansion::Ambiguous(matches.iter().map(ToString::to_string).collect());
            }
        }
    }

    Expansion::Text(out)
}
